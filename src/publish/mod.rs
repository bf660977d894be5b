//! Corpus publisher.
//!
//! Parses a lesson directory and a module directory and writes one corpus
//! generation: full lessons, the lesson metadata projection, full modules
//! and a freshness marker. The marker is the wall-clock time of the run, so
//! republishing unchanged inputs still produces a newer generation.

pub mod layout;

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tokio::fs;
use tracing::{info, instrument};

use crate::domain::{ContentMetadata, LearningModule, Lesson};
use crate::parser::lesson::DEFAULT_LESSON_EXTENSION;
use crate::parser::module::DEFAULT_MODULE_EXTENSION;
use crate::parser::{self, ParseError};

/// Errors that can occur while publishing a corpus
#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a publish run produced
#[derive(Debug, Clone)]
pub struct PublishSummary {
    /// Number of lessons written
    pub lessons: usize,

    /// Number of top-level modules written
    pub modules: usize,

    /// Freshness marker of this generation
    pub metadata: ContentMetadata,

    /// Every artifact file written, in write order
    pub files: Vec<PathBuf>,
}

/// Writes corpus generations under an output root
#[derive(Debug, Clone)]
pub struct CorpusPublisher {
    output_root: PathBuf,
    lesson_extension: String,
    module_extension: String,
}

impl CorpusPublisher {
    /// Create a publisher with the default document extensions
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            lesson_extension: DEFAULT_LESSON_EXTENSION.to_string(),
            module_extension: DEFAULT_MODULE_EXTENSION.to_string(),
        }
    }

    /// Override the lesson and module document extensions
    pub fn with_extensions(
        mut self,
        lesson_extension: impl Into<String>,
        module_extension: impl Into<String>,
    ) -> Self {
        self.lesson_extension = lesson_extension.into();
        self.module_extension = module_extension.into();
        self
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Parse both directories and publish the result.
    ///
    /// Any document that fails to parse aborts the run before anything is
    /// written.
    #[instrument(skip(self), fields(output = %self.output_root.display()))]
    pub async fn publish(
        &self,
        lessons_dir: &Path,
        modules_dir: &Path,
    ) -> Result<PublishSummary, PublishError> {
        let lessons = parser::parse_lessons(lessons_dir, &self.lesson_extension)?;
        let modules = parser::parse_modules(modules_dir, &self.module_extension)?;

        self.publish_corpus(&lessons, &modules, ContentMetadata::now())
            .await
    }

    /// Write already-parsed records as one corpus generation
    pub async fn publish_corpus(
        &self,
        lessons: &[Lesson],
        modules: &[LearningModule],
        metadata: ContentMetadata,
    ) -> Result<PublishSummary, PublishError> {
        self.ensure_dirs().await?;

        let projection = Lesson::metadata_projection(lessons);

        let files = vec![
            self.write_json(layout::LESSONS_FILE, &lessons).await?,
            self.write_json(layout::LESSONS_METADATA_FILE, &projection)
                .await?,
            self.write_json(layout::MODULES_FILE, &modules).await?,
            self.write_json(layout::METADATA_FILE, &metadata).await?,
        ];

        info!(
            lessons = lessons.len(),
            modules = modules.len(),
            timestamp = metadata.last_updated_timestamp,
            "Corpus published"
        );

        Ok(PublishSummary {
            lessons: lessons.len(),
            modules: modules.len(),
            metadata,
            files,
        })
    }

    /// Create the output root and artifact subdirectories (idempotent)
    async fn ensure_dirs(&self) -> Result<(), PublishError> {
        for dir in [layout::LESSONS_DIR, layout::MODULES_DIR] {
            let path = self.output_root.join(dir);
            fs::create_dir_all(&path)
                .await
                .map_err(|source| PublishError::Io { path, source })?;
        }
        Ok(())
    }

    async fn write_json<T: Serialize + ?Sized>(
        &self,
        relative: &str,
        value: &T,
    ) -> Result<PathBuf, PublishError> {
        let path = layout::resolve(&self.output_root, relative);
        let content = serde_json::to_string_pretty(value)?;

        fs::write(&path, content)
            .await
            .map_err(|source| PublishError::Io {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }
}
