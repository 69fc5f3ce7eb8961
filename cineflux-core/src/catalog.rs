//! Content catalog queries with stale-result suppression.
//!
//! Filter changes can race: the user edits the search term before the
//! previous request resolves. Every query takes a generation ticket;
//! only the most recently issued query may apply its result to the
//! visible list, and a transient failure never clears what is already
//! rendered.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use cineflux_model::{CatalogFilter, Content, ContentId};

use crate::error::Result;
use crate::ports::CatalogPort;

/// Outcome of one catalog query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// This query was still the newest when it resolved; its results
    /// are now the visible list.
    Applied(Vec<Content>),
    /// A newer query was issued before this one resolved; the result
    /// was discarded.
    Superseded,
}

/// Filtered/searched view over the published titles.
pub struct CatalogService {
    port: Arc<dyn CatalogPort>,
    visible: RwLock<Vec<Content>>,
    generation: AtomicU64,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}

impl CatalogService {
    pub fn new(port: Arc<dyn CatalogPort>) -> Self {
        Self {
            port,
            visible: RwLock::new(Vec::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Run a filtered query. Category restriction is pushed to the
    /// backend; the search term is applied here so the documented
    /// policy (title or description, case-insensitive) holds for every
    /// backend.
    pub async fn query(&self, filter: &CatalogFilter) -> Result<QueryOutcome> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let fetched = self
            .port
            .fetch_contents(filter.category_restriction())
            .await;

        let mut contents = match fetched {
            Ok(contents) => contents,
            Err(err) => {
                // Keep whatever is rendered; a blip must not blank the UI.
                tracing::warn!(%err, "catalog query failed, retaining visible list");
                return Err(err);
            }
        };

        contents.retain(|content| filter.search_matches(content));

        if self.generation.load(Ordering::SeqCst) != ticket {
            tracing::debug!(ticket, "catalog query superseded, discarding result");
            return Ok(QueryOutcome::Superseded);
        }

        *self.visible.write().await = contents.clone();
        Ok(QueryOutcome::Applied(contents))
    }

    /// The last applied query result. Stable between queries; survives
    /// transient failures.
    pub async fn visible(&self) -> Vec<Content> {
        self.visible.read().await.clone()
    }

    pub async fn get(&self, content_id: &ContentId) -> Result<Content> {
        self.port.fetch_content(content_id).await
    }

    pub async fn categories(&self) -> Result<Vec<String>> {
        self.port.fetch_categories().await
    }
}
