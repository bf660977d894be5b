//! Learning modules: a recursive tree of sub-modules and lesson references.

use serde::{Deserialize, Serialize};

use crate::parser::sanitize::simple_id;

/// A node in the module hierarchy
///
/// The tree is owned top-down (each module owns its `sub_modules`), so it is
/// acyclic by construction. Like [`LessonMetadata`](super::LessonMetadata),
/// `id` is recomputed from `title` whenever a module is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLearningModule", rename_all = "camelCase")]
pub struct LearningModule {
    pub id: String,
    pub title: String,
    pub description: String,

    /// Nested modules, in document order
    pub sub_modules: Vec<LearningModule>,

    /// Lesson ids referenced by this module, in document order
    pub lessons: Vec<String>,
}

/// Wire shape shared by module tree documents and published artifacts
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLearningModule {
    title: String,
    description: String,
    #[serde(default)]
    sub_modules: Vec<LearningModule>,
    #[serde(default)]
    lessons: Vec<String>,
}

impl From<RawLearningModule> for LearningModule {
    fn from(raw: RawLearningModule) -> Self {
        Self {
            id: simple_id(&raw.title),
            title: raw.title,
            description: raw.description,
            sub_modules: raw.sub_modules,
            lessons: raw.lessons,
        }
    }
}

impl LearningModule {
    /// Create a leaf module with no children and no lessons
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: simple_id(&title),
            title,
            description: description.into(),
            sub_modules: Vec::new(),
            lessons: Vec::new(),
        }
    }

    /// Add a nested module
    pub fn with_sub_module(mut self, module: LearningModule) -> Self {
        self.sub_modules.push(module);
        self
    }

    /// Add a lesson reference
    pub fn with_lesson(mut self, lesson_id: impl Into<String>) -> Self {
        self.lessons.push(lesson_id.into());
        self
    }

    /// Number of module levels below this one (a leaf has depth 0)
    pub fn depth(&self) -> usize {
        self.sub_modules
            .iter()
            .map(|m| m.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Every lesson id referenced by this module or any descendant,
    /// in pre-order
    pub fn all_lessons(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.lessons.iter().map(String::as_str).collect();
        for sub in &self.sub_modules {
            ids.extend(sub.all_lessons());
        }
        ids
    }
}
