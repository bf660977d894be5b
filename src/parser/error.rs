//! Parse failure kinds.

use std::path::PathBuf;

use thiserror::Error;

/// Why a delimited JSON block could not be recovered
#[derive(Debug, Error)]
pub enum BlockError {
    #[error("missing delimiter `{0}`")]
    MissingDelimiter(&'static str),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Errors raised while parsing lesson and module documents
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Metadata parsing failed: {0}")]
    MetadataParsingFailed(#[source] BlockError),

    #[error("Questions parsing failed: {0}")]
    QuestionsParsingFailed(#[source] BlockError),

    #[error("Lesson rendering failed: {0}")]
    Render(#[from] serde_json::Error),

    #[error("Module document decoding failed: {0}")]
    YamlDecodingFailed(#[from] serde_yaml::Error),

    #[error("Invalid directory pattern {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Attach the path of the document that failed
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        ParseError::InFile {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with file context stripped
    pub fn root(&self) -> &ParseError {
        match self {
            ParseError::InFile { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializer_failure_is_a_render_error() {
        let json_err = serde_json::from_str::<u8>("not json").unwrap_err();
        let err: ParseError = json_err.into();

        assert!(matches!(err, ParseError::Render(_)));
        assert!(err.to_string().starts_with("Lesson rendering failed"));
    }

    #[test]
    fn test_root_strips_file_context() {
        let err = ParseError::QuestionsParsingFailed(BlockError::MissingDelimiter("{| questions |}"))
            .in_file("a.lesson")
            .in_file("outer");

        assert!(matches!(
            err.root(),
            ParseError::QuestionsParsingFailed(BlockError::MissingDelimiter(_))
        ));
    }
}
