//! Relative locations of the four corpus artifacts.
//!
//! Shared by the publisher (writes them under an output root), the HTTP
//! fetcher (requests them under a base URL) and the file storage backend.
//!
//! ```text
//! <root>/
//! ├── metadata.json                 # { "lastUpdatedTimestamp": ... }
//! ├── lessons/
//! │   ├── lessons.json              # full lessons
//! │   └── lessons_metadata.json     # metadata projection
//! └── modules/
//!     └── modules.json              # full module trees
//! ```

use std::path::{Path, PathBuf};

pub const LESSONS_DIR: &str = "lessons";
pub const MODULES_DIR: &str = "modules";

pub const LESSONS_FILE: &str = "lessons/lessons.json";
pub const LESSONS_METADATA_FILE: &str = "lessons/lessons_metadata.json";
pub const MODULES_FILE: &str = "modules/modules.json";
pub const METADATA_FILE: &str = "metadata.json";

/// Resolve a slash-separated artifact path under `root`
pub fn resolve(root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .fold(root.to_path_buf(), |path, part| path.join(part))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_nested_path() {
        let path = resolve(Path::new("/srv/public"), LESSONS_METADATA_FILE);
        assert_eq!(
            path,
            PathBuf::from("/srv/public")
                .join("lessons")
                .join("lessons_metadata.json")
        );
    }
}
