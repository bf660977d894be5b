//! Domain types for the curriculum corpus.
//!
//! This module contains the core data structures:
//! - Lesson: metadata, ordered sections and questions
//! - LearningModule: recursive module hierarchy
//! - ContentMetadata: freshness marker of a published corpus

pub mod lesson;
pub mod metadata;
pub mod module;

// Re-export commonly used types
pub use lesson::{ContentSection, Lesson, LessonMetadata, Question};
pub use metadata::ContentMetadata;
pub use module::LearningModule;
