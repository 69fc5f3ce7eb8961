//! The continue-watching rail: in-progress records joined with the
//! catalog.
//!
//! Derived, never persisted. Records whose content no longer resolves
//! in the catalog (title removed after progress was recorded) are
//! silently excluded. Ordering is most-recently-watched first.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use cineflux_model::{Content, ContentId, ContinueWatchingEntry};

use crate::ports::CatalogPort;
use crate::progress::ProgressTracker;

pub struct ContinueWatching {
    tracker: Arc<ProgressTracker>,
    catalog_port: Arc<dyn CatalogPort>,
    /// Last derived list, served when the catalog is unreachable.
    last: RwLock<Vec<ContinueWatchingEntry>>,
}

impl std::fmt::Debug for ContinueWatching {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContinueWatching").finish()
    }
}

impl ContinueWatching {
    pub fn new(
        tracker: Arc<ProgressTracker>,
        catalog_port: Arc<dyn CatalogPort>,
    ) -> Self {
        Self {
            tracker,
            catalog_port,
            last: RwLock::new(Vec::new()),
        }
    }

    /// Re-derive the rail from current tracker state.
    ///
    /// Fail-open: if the catalog cannot be fetched the last derived
    /// list is returned unchanged.
    pub async fn list(&self) -> Vec<ContinueWatchingEntry> {
        let records = self.tracker.in_progress().await;

        let contents = match self.catalog_port.fetch_contents(None).await {
            Ok(contents) => contents,
            Err(err) => {
                tracing::warn!(%err, "catalog unreachable, serving last derived rail");
                return self.last.read().await.clone();
            }
        };

        let by_id: HashMap<ContentId, Content> = contents
            .into_iter()
            .map(|content| (content.id, content))
            .collect();

        let entries: Vec<ContinueWatchingEntry> = records
            .into_iter()
            .filter_map(|record| {
                by_id.get(&record.content_id).map(|content| {
                    ContinueWatchingEntry {
                        content: content.clone(),
                        record,
                    }
                })
            })
            .collect();

        *self.last.write().await = entries.clone();
        entries
    }
}
