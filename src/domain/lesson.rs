//! Lesson records recovered from authoring documents.
//!
//! A lesson is a metadata header, an ordered list of free-text sections
//! and a list of quiz questions. Records are plain values: they are built
//! once by the parser (or decoded from a published artifact) and never
//! mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::parser::sanitize::simple_id;

/// Lesson header
///
/// `id` is never read from input. It is recomputed from `title` on every
/// decode, so renaming a lesson changes its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLessonMetadata")]
pub struct LessonMetadata {
    /// Identifier derived from the title
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// Short summary shown in lesson lists
    pub description: String,

    /// Ordered tags (duplicates allowed)
    pub tags: Vec<String>,
}

/// Wire shape of the metadata block (no `id`)
#[derive(Deserialize)]
struct RawLessonMetadata {
    title: String,
    description: String,
    tags: Vec<String>,
}

impl From<RawLessonMetadata> for LessonMetadata {
    fn from(raw: RawLessonMetadata) -> Self {
        Self::new(raw.title, raw.description, raw.tags)
    }
}

impl LessonMetadata {
    /// Create metadata, deriving the id from the title
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        tags: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let title = title.into();
        Self {
            id: simple_id(&title),
            title,
            description: description.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

/// A named span of free text within a lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSection {
    pub title: String,
    pub content: String,
}

impl ContentSection {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// A multiple-choice quiz question
///
/// `correct_answer_index` is expected to index into `answers`; the parser
/// does not check it. See [`Question::correct_answer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,

    /// Question kind (e.g. "multiple_choice")
    #[serde(rename = "type")]
    pub kind: String,

    /// Proficiency level the question targets
    pub proficiency: String,

    /// The prompt shown to the learner
    pub question: String,

    /// Candidate answers, in display order
    pub answers: Vec<String>,

    pub correct_answer_index: usize,

    /// Why the correct answer is correct
    pub explanation: String,
}

impl Question {
    /// The answer `correct_answer_index` points at, if it is in range
    pub fn correct_answer(&self) -> Option<&str> {
        self.answers
            .get(self.correct_answer_index)
            .map(String::as_str)
    }
}

/// A complete lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub metadata: LessonMetadata,

    /// Sections in order of appearance in the source document
    pub sections: Vec<ContentSection>,

    pub questions: Vec<Question>,
}

impl Lesson {
    /// Identifier of the lesson (same as `metadata.id`)
    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    /// Find a section by its exact title
    pub fn section(&self, title: &str) -> Option<&ContentSection> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// Metadata of each lesson, in input order
    pub fn metadata_projection(lessons: &[Lesson]) -> Vec<&LessonMetadata> {
        lessons.iter().map(|l| &l.metadata).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question() -> Question {
        Question {
            id: "q1".to_string(),
            kind: "multiple_choice".to_string(),
            proficiency: "beginner".to_string(),
            question: "What does GCD stand for?".to_string(),
            answers: vec![
                "Grand Central Dispatch".to_string(),
                "Global Code Dispatcher".to_string(),
            ],
            correct_answer_index: 0,
            explanation: "GCD is Grand Central Dispatch.".to_string(),
        }
    }

    #[test]
    fn test_metadata_id_is_derived_from_title() {
        let metadata = LessonMetadata::new("Memory Management Basics", "ARC and friends", ["swift"]);
        assert_eq!(metadata.id, "memory_management_basics");
    }

    #[test]
    fn test_metadata_ignores_serialized_id() {
        let json = r#"{
            "id": "stale_id",
            "title": "Renamed Lesson",
            "description": "d",
            "tags": ["a", "a"]
        }"#;

        let metadata: LessonMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.id, "renamed_lesson");
        assert_eq!(metadata.tags, vec!["a", "a"]);
    }

    #[test]
    fn test_question_uses_camel_case_and_type_keys() {
        let json = serde_json::to_value(sample_question()).unwrap();
        assert_eq!(json["type"], "multiple_choice");
        assert_eq!(json["correctAnswerIndex"], 0);
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_metadata_projection_keeps_order() {
        let lessons: Vec<Lesson> = ["Zeta", "Alpha"]
            .into_iter()
            .map(|title| Lesson {
                metadata: LessonMetadata::new(title, "d", ["t"]),
                sections: vec![ContentSection::new("Body", "text")],
                questions: vec![sample_question()],
            })
            .collect();

        let projection = Lesson::metadata_projection(&lessons);
        let ids: Vec<&str> = projection.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha"]);

        // Only header fields reach the projection artifact
        let json = serde_json::to_value(&projection).unwrap();
        assert_eq!(json[1]["title"], "Alpha");
        assert!(json[1].get("sections").is_none());
        assert!(json[1].get("questions").is_none());
    }

    #[test]
    fn test_correct_answer_lookup() {
        let mut question = sample_question();
        assert_eq!(question.correct_answer(), Some("Grand Central Dispatch"));

        question.correct_answer_index = 7;
        assert_eq!(question.correct_answer(), None);
    }
}
