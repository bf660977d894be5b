//! Local persistence of the cached corpus.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::fs;

use crate::domain::{ContentMetadata, LearningModule, Lesson};
use crate::publish::layout;

/// Errors raised by a [`ContentStorage`] backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt data in {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Backend-agnostic persistence for lessons, modules and the freshness marker
#[async_trait]
pub trait ContentStorage: Send + Sync {
    async fn save_lessons(&self, lessons: &[Lesson]) -> Result<(), StorageError>;

    async fn save_modules(&self, modules: &[LearningModule]) -> Result<(), StorageError>;

    async fn save_metadata(&self, metadata: &ContentMetadata) -> Result<(), StorageError>;

    /// Persisted lessons (empty when nothing was saved yet)
    async fn load_lessons(&self) -> Result<Vec<Lesson>, StorageError>;

    /// Persisted modules (empty when nothing was saved yet)
    async fn load_modules(&self) -> Result<Vec<LearningModule>, StorageError>;

    /// Persisted freshness marker (`None` on first run)
    async fn load_metadata(&self) -> Result<Option<ContentMetadata>, StorageError>;
}

/// Stores the cache as pretty-printed JSON files under one directory,
/// using the same layout as a published corpus
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn write<T: Serialize + ?Sized>(&self, relative: &str, value: &T) -> Result<(), StorageError> {
        let path = layout::resolve(&self.root, relative);

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| StorageError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let content = serde_json::to_string_pretty(value)?;
        fs::write(&path, content)
            .await
            .map_err(|source| StorageError::Io { path, source })
    }

    async fn read<T: DeserializeOwned>(&self, relative: &str) -> Result<Option<T>, StorageError> {
        let path = layout::resolve(&self.root, relative);

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StorageError::Corrupt { path, source })
    }
}

#[async_trait]
impl ContentStorage for FileStorage {
    async fn save_lessons(&self, lessons: &[Lesson]) -> Result<(), StorageError> {
        self.write(layout::LESSONS_FILE, lessons).await
    }

    async fn save_modules(&self, modules: &[LearningModule]) -> Result<(), StorageError> {
        self.write(layout::MODULES_FILE, modules).await
    }

    async fn save_metadata(&self, metadata: &ContentMetadata) -> Result<(), StorageError> {
        self.write(layout::METADATA_FILE, metadata).await
    }

    async fn load_lessons(&self) -> Result<Vec<Lesson>, StorageError> {
        Ok(self.read(layout::LESSONS_FILE).await?.unwrap_or_default())
    }

    async fn load_modules(&self) -> Result<Vec<LearningModule>, StorageError> {
        Ok(self.read(layout::MODULES_FILE).await?.unwrap_or_default())
    }

    async fn load_metadata(&self) -> Result<Option<ContentMetadata>, StorageError> {
        self.read(layout::METADATA_FILE).await
    }
}
