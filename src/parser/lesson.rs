//! Lesson document parser.
//!
//! A lesson document is UTF-8 text with two delimited JSON blocks and any
//! number of named sections:
//!
//! ```text
//! {| metadata |}
//! { "title": "...", "description": "...", "tags": ["..."] }
//! {| endmetadata |}
//!
//! === Section: Overview ===
//! Free text, any number of lines.
//! === EndSection: Overview ===
//!
//! {| questions |}
//! [ { "id": "q1", "type": "...", ... } ]
//! {| endquestions |}
//! ```
//!
//! A section only counts when its closing marker repeats the opening title
//! exactly. Unclosed or mismatched sections are dropped without error.
//! Markers are matched anywhere in the text, not only as whole lines.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::error::{BlockError, ParseError};
use super::sanitize::sanitize;
use crate::domain::{ContentSection, Lesson, LessonMetadata, Question};

pub const METADATA_OPEN: &str = "{| metadata |}";
pub const METADATA_CLOSE: &str = "{| endmetadata |}";
pub const QUESTIONS_OPEN: &str = "{| questions |}";
pub const QUESTIONS_CLOSE: &str = "{| endquestions |}";

/// Default file extension of lesson documents
pub const DEFAULT_LESSON_EXTENSION: &str = "lesson";

/// Opening section marker. The title is lazy and confined to one line.
fn section_open() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"=== Section: ([^\n]+?) ===").expect("valid section regex"))
}

fn section_close_marker(title: &str) -> String {
    format!("=== EndSection: {} ===", title)
}

/// Parse one lesson document
pub fn parse_lesson(text: &str) -> Result<Lesson, ParseError> {
    let metadata = parse_metadata(text)?;
    let sections = parse_sections(text);
    let questions = parse_questions(text)?;

    Ok(Lesson {
        metadata,
        sections,
        questions,
    })
}

/// Parse the lesson document stored at `path`
pub fn parse_lesson_file(path: &Path) -> Result<Lesson, ParseError> {
    let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_lesson(&text).map_err(|e| e.in_file(path))
}

/// Parse every `*.<extension>` document in `dir`.
///
/// Stops at the first document that fails; no partial result is returned.
pub fn parse_lessons(dir: &Path, extension: &str) -> Result<Vec<Lesson>, ParseError> {
    let paths = super::documents_in(dir, extension)?;
    debug!(dir = %dir.display(), count = paths.len(), "Parsing lesson documents");

    paths.iter().map(|path| parse_lesson_file(path)).collect()
}

/// Text strictly between the first `open` and the next `close`, trimmed
fn delimited<'a>(
    text: &'a str,
    open: &'static str,
    close: &'static str,
) -> Result<&'a str, BlockError> {
    let start = text
        .find(open)
        .map(|i| i + open.len())
        .ok_or(BlockError::MissingDelimiter(open))?;

    let len = text[start..]
        .find(close)
        .ok_or(BlockError::MissingDelimiter(close))?;

    Ok(text[start..start + len].trim())
}

fn parse_metadata(text: &str) -> Result<LessonMetadata, ParseError> {
    let block = delimited(text, METADATA_OPEN, METADATA_CLOSE)
        .map_err(ParseError::MetadataParsingFailed)?;

    serde_json::from_str(block).map_err(|e| ParseError::MetadataParsingFailed(e.into()))
}

fn parse_questions(text: &str) -> Result<Vec<Question>, ParseError> {
    let block = delimited(text, QUESTIONS_OPEN, QUESTIONS_CLOSE)
        .map_err(ParseError::QuestionsParsingFailed)?;

    serde_json::from_str(block).map_err(|e| ParseError::QuestionsParsingFailed(e.into()))
}

/// Collect matched sections in the order they appear.
///
/// Scanning is leftmost-first and non-overlapping: once a section is
/// captured, the search resumes after its closing marker. An opening marker
/// with no identically-titled closing marker is skipped and the search
/// resumes right after that opening marker.
fn parse_sections(text: &str) -> Vec<ContentSection> {
    let mut sections = Vec::new();
    let mut pos = 0;

    while let Some(caps) = section_open().captures_at(text, pos) {
        let (Some(open), Some(title)) = (caps.get(0), caps.get(1)) else {
            break;
        };

        let close = section_close_marker(title.as_str());
        match text[open.end()..].find(&close) {
            Some(offset) => {
                let body_end = open.end() + offset;
                sections.push(ContentSection::new(
                    title.as_str(),
                    text[open.end()..body_end].trim(),
                ));
                pos = body_end + close.len();
            }
            None => {
                debug!(title = title.as_str(), "Dropping section without closing marker");
                pos = open.end();
            }
        }
    }

    sections
}

/// Metadata block as written by authors (no id)
#[derive(Serialize)]
struct MetadataBlock<'a> {
    title: &'a str,
    description: &'a str,
    tags: &'a [String],
}

/// Render a lesson back to the authoring format.
///
/// Parsing the output yields an equal lesson (section content is trimmed on
/// parse, so content with surrounding whitespace comes back trimmed).
pub fn render_lesson(lesson: &Lesson) -> Result<String, serde_json::Error> {
    let metadata = serde_json::to_string_pretty(&MetadataBlock {
        title: &lesson.metadata.title,
        description: &lesson.metadata.description,
        tags: &lesson.metadata.tags,
    })?;
    let questions = serde_json::to_string_pretty(&lesson.questions)?;

    let mut out = format!("{}\n{}\n{}\n\n", METADATA_OPEN, metadata, METADATA_CLOSE);

    for section in &lesson.sections {
        out.push_str(&format!(
            "=== Section: {} ===\n{}\n{}\n\n",
            section.title,
            section.content,
            section_close_marker(&section.title)
        ));
    }

    out.push_str(&format!("{}\n{}\n{}\n", QUESTIONS_OPEN, questions, QUESTIONS_CLOSE));
    Ok(out)
}

/// Write a skeleton lesson named after `title` into `dir`.
///
/// The file name is `sanitize(title)` plus `extension`. An existing file is
/// never overwritten.
pub fn scaffold_lesson(dir: &Path, title: &str, extension: &str) -> Result<PathBuf, ParseError> {
    let path = dir.join(format!("{}.{}", sanitize(title), extension));
    let io_err = |source: std::io::Error| ParseError::Io {
        path: path.clone(),
        source,
    };

    let lesson = Lesson {
        metadata: LessonMetadata::new(title, "", Vec::<String>::new()),
        sections: vec![ContentSection::new("Introduction", "Write the lesson content here.")],
        questions: Vec::new(),
    };
    let text = render_lesson(&lesson)?;

    fs::create_dir_all(dir).map_err(io_err)?;
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(io_err)?;
    file.write_all(text.as_bytes()).map_err(io_err)?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const METADATA: &str = r#"{| metadata |}
{ "title": "Swift Optionals", "description": "Unwrapping safely", "tags": ["swift", "basics"] }
{| endmetadata |}"#;

    const QUESTIONS: &str = r#"{| questions |}
[
  {
    "id": "q1",
    "type": "multiple_choice",
    "proficiency": "beginner",
    "question": "Which keyword unwraps conditionally?",
    "answers": ["if let", "try!"],
    "correctAnswerIndex": 0,
    "explanation": "if let binds only when a value is present."
  }
]
{| endquestions |}"#;

    fn document(body: &str) -> String {
        format!("{}\n\n{}\n\n{}\n", METADATA, body, QUESTIONS)
    }

    #[test]
    fn test_parse_full_document() {
        let text = document(
            "=== Section: Overview ===\nOptionals model absence.\n=== EndSection: Overview ===\n\n\
             === Section: Unwrapping ===\nUse if let.\nOr guard let.\n=== EndSection: Unwrapping ===",
        );

        let lesson = parse_lesson(&text).unwrap();
        assert_eq!(lesson.id(), "swift_optionals");
        assert_eq!(lesson.metadata.tags, vec!["swift", "basics"]);
        assert_eq!(lesson.sections.len(), 2);
        assert_eq!(lesson.sections[0].title, "Overview");
        assert_eq!(lesson.sections[0].content, "Optionals model absence.");
        assert_eq!(lesson.sections[1].content, "Use if let.\nOr guard let.");
        assert_eq!(lesson.questions.len(), 1);
        assert_eq!(lesson.questions[0].correct_answer(), Some("if let"));
    }

    #[test]
    fn test_no_sections_is_valid() {
        let lesson = parse_lesson(&document("")).unwrap();
        assert!(lesson.sections.is_empty());
    }

    #[test]
    fn test_mismatched_section_is_dropped() {
        let text = document(
            "=== Section: Intro ===\ntext\n=== EndSection: Introduction ===\n\
             === Section: Kept ===\nkept\n=== EndSection: Kept ===",
        );

        let lesson = parse_lesson(&text).unwrap();
        assert_eq!(lesson.sections.len(), 1);
        assert_eq!(lesson.sections[0].title, "Kept");
    }

    #[test]
    fn test_unclosed_section_does_not_swallow_later_sections() {
        let text = document(
            "=== Section: Dangling ===\nno end\n\
             === Section: Closed ===\nbody\n=== EndSection: Closed ===",
        );

        let lesson = parse_lesson(&text).unwrap();
        assert_eq!(lesson.sections, vec![ContentSection::new("Closed", "body")]);
    }

    #[test]
    fn test_duplicate_titles_use_first_match() {
        let text = document(
            "=== Section: A ===\none\n=== EndSection: A ===\n\
             === Section: A ===\ntwo\n=== EndSection: A ===",
        );

        let lesson = parse_lesson(&text).unwrap();
        let contents: Vec<_> = lesson.sections.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two"]);
    }

    #[test]
    fn test_nested_same_title_closes_at_first_end_marker() {
        let text = document(
            "=== Section: A ===\nouter\n=== Section: A ===\ninner\n=== EndSection: A ===\n=== EndSection: A ===",
        );

        let lesson = parse_lesson(&text).unwrap();
        assert_eq!(lesson.sections.len(), 1);
        assert_eq!(
            lesson.sections[0].content,
            "outer\n=== Section: A ===\ninner"
        );
    }

    #[test]
    fn test_markers_need_not_stand_on_their_own_line() {
        let text = document("See === Section: Inline === here and === EndSection: Inline ===!");

        let lesson = parse_lesson(&text).unwrap();
        assert_eq!(lesson.sections, vec![ContentSection::new("Inline", "here and")]);
    }

    #[test]
    fn test_missing_metadata_delimiter() {
        let text = format!("{}\n", QUESTIONS);
        let err = parse_lesson(&text).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MetadataParsingFailed(BlockError::MissingDelimiter(METADATA_OPEN))
        ));
    }

    #[test]
    fn test_missing_metadata_end_delimiter() {
        let text = format!("{{| metadata |}}\n{{}}\n{}\n", QUESTIONS);
        let err = parse_lesson(&text).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MetadataParsingFailed(BlockError::MissingDelimiter(METADATA_CLOSE))
        ));
    }

    #[test]
    fn test_invalid_metadata_json() {
        let text = format!("{{| metadata |}}\n{{ \"title\": 3 }}\n{{| endmetadata |}}\n{}", QUESTIONS);
        let err = parse_lesson(&text).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MetadataParsingFailed(BlockError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_missing_questions_block() {
        let err = parse_lesson(METADATA).unwrap_err();
        assert!(matches!(
            err,
            ParseError::QuestionsParsingFailed(BlockError::MissingDelimiter(QUESTIONS_OPEN))
        ));
    }

    #[test]
    fn test_questions_must_be_an_array() {
        let text = format!(
            "{}\n{{| questions |}}\n{{ \"id\": \"q1\" }}\n{{| endquestions |}}",
            METADATA
        );
        let err = parse_lesson(&text).unwrap_err();
        assert!(matches!(
            err,
            ParseError::QuestionsParsingFailed(BlockError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_render_then_parse() {
        let text = document("=== Section: Overview ===\nBody\n=== EndSection: Overview ===");
        let lesson = parse_lesson(&text).unwrap();

        let rendered = render_lesson(&lesson).unwrap();
        assert_eq!(parse_lesson(&rendered).unwrap(), lesson);
    }

    #[test]
    fn test_scaffold_uses_sanitized_name() {
        let temp = tempfile::TempDir::new().unwrap();

        let path = scaffold_lesson(temp.path(), "Grand Central Dispatch (GCD): Basics", "lesson").unwrap();
        assert_eq!(
            path.file_name().unwrap(),
            "grand_central_dispatch_gcd_basics.lesson"
        );

        let lesson = parse_lesson_file(&path).unwrap();
        assert_eq!(lesson.metadata.title, "Grand Central Dispatch (GCD): Basics");
        assert_eq!(lesson.sections.len(), 1);

        // Second scaffold with the same title must not clobber the first
        let err = scaffold_lesson(temp.path(), "Grand Central Dispatch (GCD): Basics", "lesson").unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }
}
