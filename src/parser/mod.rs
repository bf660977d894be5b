//! Parsers for authoring documents.
//!
//! - `lesson`: delimited lesson documents (metadata, sections, questions)
//! - `module`: YAML module trees
//! - `sanitize`: slug rules for filenames and record ids

pub mod error;
pub mod lesson;
pub mod module;
pub mod sanitize;

use std::io;
use std::path::{Path, PathBuf};

pub use error::{BlockError, ParseError};
pub use lesson::{parse_lesson, parse_lesson_file, parse_lessons, render_lesson, scaffold_lesson};
pub use module::{parse_module, parse_module_file, parse_modules};
pub use sanitize::{sanitize, simple_id};

/// List the `*.<extension>` files directly inside `dir`.
///
/// Order follows glob's sorted output; callers must not rely on it.
pub(crate) fn documents_in(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, ParseError> {
    if !dir.is_dir() {
        return Err(ParseError::Io {
            path: dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        extension
    );

    let entries = glob::glob(&pattern).map_err(|source| ParseError::InvalidPattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ParseError::Io {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })?;
        if path.is_file() {
            paths.push(path);
        }
    }

    Ok(paths)
}
