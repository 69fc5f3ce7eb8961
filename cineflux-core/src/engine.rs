//! The engine facade: one explicit state container holding every
//! service, passed by reference to whatever UI hosts it. Mutation goes
//! through the service operations; there are no ambient globals.

use std::sync::Arc;

use cineflux_model::Content;

use crate::backend::HttpBackend;
use crate::catalog::CatalogService;
use crate::config::EngineConfig;
use crate::continue_watching::ContinueWatching;
use crate::error::Result;
use crate::favorites::FavoritesService;
use crate::ports::{CatalogPort, FavoritesPort, ProgressPort};
use crate::progress::ProgressTracker;
use crate::session::PlaybackSession;

#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    catalog: Arc<CatalogService>,
    favorites: Arc<FavoritesService>,
    tracker: Arc<ProgressTracker>,
    continue_watching: ContinueWatching,
}

impl Engine {
    /// Engine over the HTTP backend. The caller keeps the backend
    /// handle to manage the bearer credential.
    pub fn with_backend(backend: Arc<HttpBackend>, config: EngineConfig) -> Self {
        Self::with_ports(
            backend.clone(),
            backend.clone(),
            backend,
            config,
        )
    }

    pub fn with_ports(
        catalog_port: Arc<dyn CatalogPort>,
        favorites_port: Arc<dyn FavoritesPort>,
        progress_port: Arc<dyn ProgressPort>,
        config: EngineConfig,
    ) -> Self {
        let catalog = Arc::new(CatalogService::new(catalog_port.clone()));
        let favorites = Arc::new(FavoritesService::new(favorites_port));
        let tracker = Arc::new(ProgressTracker::new(progress_port));
        let continue_watching =
            ContinueWatching::new(tracker.clone(), catalog_port);

        Self {
            config,
            catalog,
            favorites,
            tracker,
            continue_watching,
        }
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn favorites(&self) -> &FavoritesService {
        &self.favorites
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub fn continue_watching(&self) -> &ContinueWatching {
        &self.continue_watching
    }

    /// Reload per-user state after sign-in: favorite membership and the
    /// progress mirror.
    pub async fn refresh_user_state(&self) -> Result<()> {
        self.favorites.refresh().await?;
        self.tracker.refresh().await?;
        Ok(())
    }

    /// Open a playback session for a selected title.
    pub async fn open_session(&self, content: Content) -> PlaybackSession {
        PlaybackSession::open(
            content,
            self.tracker.clone(),
            self.config.report_interval(),
        )
        .await
    }
}
