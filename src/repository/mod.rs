//! Client-side cache of a published corpus.
//!
//! The repository keeps lessons and modules in memory, persists them through
//! a [`ContentStorage`] backend and refreshes them from a [`ContentFetcher`]
//! when the remote freshness marker is strictly newer than the local one.
//!
//! # Refresh semantics
//!
//! - No local marker: always refresh.
//! - Remote probe fails: report "not updated", touch nothing.
//! - `remote > local`: fetch lessons and modules concurrently. Each kind that
//!   arrives is persisted and merged into its map; a kind that fails leaves
//!   its map and storage as they were. The call reports "updated" once both
//!   fetches have finished, whatever their outcome.
//!
//! Refreshes are serialized. Lookups take a read lock and may run alongside
//! each other and alongside a refresh.

pub mod fetcher;
pub mod storage;

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

pub use fetcher::{ContentFetcher, FetchError, HttpFetcher};
pub use storage::{ContentStorage, FileStorage, StorageError};

use crate::domain::{ContentMetadata, LearningModule, Lesson};

/// Cached corpus with on-demand remote synchronization
pub struct ContentRepository<F, S> {
    fetcher: F,
    storage: S,

    /// Lesson id -> lesson
    lessons: RwLock<HashMap<String, Lesson>>,

    /// Module id -> module
    modules: RwLock<HashMap<String, LearningModule>>,

    /// Last persisted freshness marker
    metadata: RwLock<Option<ContentMetadata>>,

    /// Held for the duration of a refresh (single writer)
    refresh_lock: Mutex<()>,
}

impl<F, S> ContentRepository<F, S>
where
    F: ContentFetcher,
    S: ContentStorage,
{
    /// Create a repository and load whatever `storage` already holds.
    ///
    /// Performs no network activity. Storage failures are logged and leave
    /// the corresponding part of the cache empty.
    pub async fn new(fetcher: F, storage: S) -> Self {
        let lessons = storage.load_lessons().await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load persisted lessons");
            Vec::new()
        });
        let modules = storage.load_modules().await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load persisted modules");
            Vec::new()
        });
        let metadata = storage.load_metadata().await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load persisted metadata");
            None
        });

        debug!(
            lessons = lessons.len(),
            modules = modules.len(),
            has_metadata = metadata.is_some(),
            "Loaded persisted content"
        );

        Self {
            fetcher,
            storage,
            lessons: RwLock::new(index_lessons(lessons)),
            modules: RwLock::new(index_modules(modules)),
            metadata: RwLock::new(metadata),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Refresh from the remote source if it is newer.
    ///
    /// Returns `true` when a refresh ran (even if one of the two fetches
    /// failed) and `false` when the cache was left untouched. Errors are
    /// logged, never returned.
    #[instrument(skip(self))]
    pub async fn update_data_if_needed(&self) -> bool {
        let _guard = self.refresh_lock.lock().await;

        let remote = match self.local_metadata() {
            None => {
                info!("No local metadata, refreshing content");
                match self.fetcher.fetch_metadata().await {
                    Ok(remote) => Some(remote),
                    Err(e) => {
                        debug!(error = %e, "Remote metadata unavailable");
                        None
                    }
                }
            }
            Some(local) => {
                let remote = match self.fetcher.fetch_metadata().await {
                    Ok(remote) => remote,
                    Err(e) => {
                        warn!(error = %e, "Failed to fetch remote metadata, keeping cache");
                        return false;
                    }
                };

                if !remote.is_newer_than(&local) {
                    debug!(
                        local = local.last_updated_timestamp,
                        remote = remote.last_updated_timestamp,
                        "Content is up to date"
                    );
                    return false;
                }

                info!(
                    local = local.last_updated_timestamp,
                    remote = remote.last_updated_timestamp,
                    "Remote content is newer, refreshing"
                );
                Some(remote)
            }
        };

        self.refresh(remote).await;
        true
    }

    /// Fetch both kinds concurrently and wait for both
    async fn refresh(&self, remote: Option<ContentMetadata>) {
        let (lessons_ok, modules_ok) =
            tokio::join!(self.refresh_lessons(), self.refresh_modules());

        // A partial refresh keeps the old marker so the next call retries
        if !(lessons_ok && modules_ok) {
            warn!(lessons_ok, modules_ok, "Refresh completed partially");
            return;
        }

        let Some(remote) = remote else {
            return;
        };

        match self.storage.save_metadata(&remote).await {
            Ok(()) => {
                *write_lock(&self.metadata) = Some(remote);
                info!(timestamp = remote.last_updated_timestamp, "Refresh completed");
            }
            Err(e) => warn!(error = %e, "Failed to persist metadata"),
        }
    }

    /// Returns whether lessons were fetched and persisted
    async fn refresh_lessons(&self) -> bool {
        let lessons = match self.fetcher.fetch_lessons().await {
            Ok(lessons) => lessons,
            Err(e) => {
                warn!(error = %e, "Failed to fetch lessons, keeping cached lessons");
                return false;
            }
        };

        let saved = match self.storage.save_lessons(&lessons).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to persist lessons");
                false
            }
        };

        let count = lessons.len();
        write_lock(&self.lessons).extend(index_lessons(lessons));
        debug!(count, "Lessons merged into cache");

        saved
    }

    /// Returns whether modules were fetched and persisted
    async fn refresh_modules(&self) -> bool {
        let modules = match self.fetcher.fetch_modules().await {
            Ok(modules) => modules,
            Err(e) => {
                warn!(error = %e, "Failed to fetch modules, keeping cached modules");
                return false;
            }
        };

        let saved = match self.storage.save_modules(&modules).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to persist modules");
                false
            }
        };

        let count = modules.len();
        write_lock(&self.modules).extend(index_modules(modules));
        debug!(count, "Modules merged into cache");

        saved
    }

    /// Look up a cached lesson. Never triggers I/O.
    pub fn fetch_lesson(&self, id: &str) -> Option<Lesson> {
        read_lock(&self.lessons).get(id).cloned()
    }

    /// Look up a cached module. Never triggers I/O.
    pub fn fetch_module(&self, id: &str) -> Option<LearningModule> {
        read_lock(&self.modules).get(id).cloned()
    }

    /// All cached lessons, sorted by id
    pub fn lessons(&self) -> Vec<Lesson> {
        let mut lessons: Vec<_> = read_lock(&self.lessons).values().cloned().collect();
        lessons.sort_by(|a, b| a.metadata.id.cmp(&b.metadata.id));
        lessons
    }

    /// All cached modules, sorted by id
    pub fn modules(&self) -> Vec<LearningModule> {
        let mut modules: Vec<_> = read_lock(&self.modules).values().cloned().collect();
        modules.sort_by(|a, b| a.id.cmp(&b.id));
        modules
    }

    pub fn lesson_count(&self) -> usize {
        read_lock(&self.lessons).len()
    }

    pub fn module_count(&self) -> usize {
        read_lock(&self.modules).len()
    }

    /// Freshness marker of the cached generation, if any
    pub fn local_metadata(&self) -> Option<ContentMetadata> {
        *read_lock(&self.metadata)
    }
}

fn index_lessons(lessons: Vec<Lesson>) -> HashMap<String, Lesson> {
    lessons
        .into_iter()
        .map(|l| (l.metadata.id.clone(), l))
        .collect()
}

fn index_modules(modules: Vec<LearningModule>) -> HashMap<String, LearningModule> {
    modules.into_iter().map(|m| (m.id.clone(), m)).collect()
}

// Writers only insert whole values, so a poisoned lock still holds valid data.
fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
