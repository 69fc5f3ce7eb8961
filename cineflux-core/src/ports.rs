//! Backend ports: the contracts the engine requires from the external
//! content/account service. Persistence lives behind these traits; the
//! engine owns in-memory session state and sync policy only.

use async_trait::async_trait;
use cineflux_model::{
    Content, ContentId, FavoriteEntry, PlayerPosition, ProgressRecord,
};

use crate::error::Result;

/// Read-only catalog queries.
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// Published titles, optionally restricted to one category.
    async fn fetch_contents(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<Content>>;

    async fn fetch_content(&self, content_id: &ContentId) -> Result<Content>;

    /// Distinct category vocabulary.
    async fn fetch_categories(&self) -> Result<Vec<String>>;
}

/// Per-user favorite membership.
#[async_trait]
pub trait FavoritesPort: Send + Sync {
    async fn fetch_favorites(&self) -> Result<Vec<FavoriteEntry>>;

    async fn add_favorite(&self, content_id: &ContentId) -> Result<()>;

    async fn remove_favorite(&self, content_id: &ContentId) -> Result<()>;
}

/// Per-(user, content) watch progress.
#[async_trait]
pub trait ProgressPort: Send + Sync {
    /// `None` when the pair is unstarted (no record yet).
    async fn fetch_progress(
        &self,
        content_id: &ContentId,
    ) -> Result<Option<ProgressRecord>>;

    /// Upsert keyed by (user, content); last write wins.
    async fn upsert_progress(
        &self,
        content_id: &ContentId,
        position: PlayerPosition,
    ) -> Result<()>;

    /// Every progress record the service holds for the current user.
    async fn fetch_all_progress(&self) -> Result<Vec<ProgressRecord>>;
}
