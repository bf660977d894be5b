//! curriculum - Lesson corpus publisher and synchronized content cache
//!
//! Turns hand-authored lesson and module documents into a validated,
//! canonical JSON corpus, and keeps a local replica of a published corpus
//! in sync with its remote source.
//!
//! # Architecture
//!
//! ```text
//! *.lesson / *.yaml ──parser──▶ Lesson / LearningModule
//!                                   │
//!                               publish ──▶ lessons.json, lessons_metadata.json,
//!                                           modules.json, metadata.json
//!                                                 │ (served over HTTP)
//!                                                 ▼
//!                              repository ◀── fetcher, storage
//! ```
//!
//! # Modules
//!
//! - `domain`: Data structures (Lesson, LearningModule, ContentMetadata)
//! - `parser`: Lesson document parser, module tree parser, slug rules
//! - `publish`: Corpus publisher and artifact layout
//! - `repository`: Client-side cache with staleness check and refresh
//! - `config`: Layered configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Publish the corpus
//! curriculum publish --lessons lessons --modules modules --output public
//!
//! # Refresh the local cache from a published corpus
//! curriculum sync --remote https://cdn.example.com/corpus
//!
//! # Show a cached lesson
//! curriculum lesson swift_optionals --full
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod parser;
pub mod publish;
pub mod repository;

// Re-export main types at crate root for convenience
pub use config::ResolvedConfig;
pub use domain::{ContentMetadata, ContentSection, LearningModule, Lesson, LessonMetadata, Question};
pub use parser::{parse_lesson, parse_module, sanitize, ParseError};
pub use publish::{CorpusPublisher, PublishError, PublishSummary};
pub use repository::{ContentFetcher, ContentRepository, ContentStorage, FileStorage, HttpFetcher};
