//! Playback progress and continue-watching engine for the Cineflux VOD
//! client.
//!
//! The engine tracks, persists, deduplicates, and resumes per-user
//! watch position for each catalog title, and derives the
//! continue-watching rail and the favorite overlay over catalog
//! listings. Persistence lives behind the [`ports`] traits; the engine
//! owns in-memory session state and the sync policy only.

pub mod backend;
pub mod catalog;
pub mod config;
pub mod continue_watching;
pub mod embed;
pub mod engine;
pub mod error;
pub mod favorites;
pub mod ports;
pub mod progress;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::HttpBackend;
pub use catalog::{CatalogService, QueryOutcome};
pub use config::EngineConfig;
pub use continue_watching::ContinueWatching;
pub use engine::Engine;
pub use error::{CoreError, Result};
pub use favorites::FavoritesService;
pub use progress::ProgressTracker;
pub use session::{PlaybackSession, SessionState};
