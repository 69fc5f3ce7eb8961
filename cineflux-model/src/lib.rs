//! Core data model definitions shared across Cineflux crates.

pub mod content;
pub mod error;
pub mod favorite;
pub mod filter;
pub mod ids;
pub mod watch;

// Intentionally curated re-exports for downstream consumers.
pub use content::{Content, ContentType, VideoSource};
pub use error::{ModelError, Result as ModelResult};
pub use favorite::{FavoriteEntry, FavoriteState};
pub use filter::{CatalogFilter, CATEGORY_ALL};
pub use ids::{ContentId, UserId};
pub use watch::{
    ContinueWatchingEntry, PlayerPosition, ProgressRecord, WatchProgress,
    WatchState,
};
