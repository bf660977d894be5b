//! Module tree parser.
//!
//! Module documents are YAML trees:
//!
//! ```yaml
//! title: Concurrency
//! description: Threads, queues and actors
//! lessons: [threads_101]
//! subModules:
//!   - title: Dispatch
//!     description: Grand Central Dispatch
//! ```
//!
//! `subModules` and `lessons` default to empty lists. Ids are derived from
//! titles after decoding. Nesting depth is not limited here beyond the
//! YAML decoder's own recursion limit.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::error::ParseError;
use crate::domain::LearningModule;

/// Default file extension of module documents
pub const DEFAULT_MODULE_EXTENSION: &str = "yaml";

/// Decode one module tree document
pub fn parse_module(text: &str) -> Result<LearningModule, ParseError> {
    Ok(serde_yaml::from_str(text)?)
}

/// Decode the module document stored at `path`
pub fn parse_module_file(path: &Path) -> Result<LearningModule, ParseError> {
    let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_module(&text).map_err(|e| e.in_file(path))
}

/// Decode every `*.<extension>` document in `dir`, failing on the first error
pub fn parse_modules(dir: &Path, extension: &str) -> Result<Vec<LearningModule>, ParseError> {
    let paths = super::documents_in(dir, extension)?;
    debug!(dir = %dir.display(), count = paths.len(), "Parsing module documents");

    paths.iter().map(|path| parse_module_file(path)).collect()
}
