//! Per-user favorite membership with reconciled toggles.
//!
//! The service keeps the last server-confirmed membership set. A toggle
//! writes the flip implied by that set, then re-fetches membership so
//! the confirmed state always resolves to server truth, never to the
//! client guess. On failure the confirmed set is left untouched, so a
//! UI that rendered optimistically can revert to it.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;

use cineflux_model::{ContentId, FavoriteEntry, FavoriteState};

use crate::error::{CoreError, Result};
use crate::ports::FavoritesPort;

pub struct FavoritesService {
    port: Arc<dyn FavoritesPort>,
    confirmed: RwLock<HashSet<ContentId>>,
}

impl std::fmt::Debug for FavoritesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesService").finish()
    }
}

impl FavoritesService {
    pub fn new(port: Arc<dyn FavoritesPort>) -> Self {
        Self {
            port,
            confirmed: RwLock::new(HashSet::new()),
        }
    }

    /// Reload the confirmed membership set from the service.
    pub async fn refresh(&self) -> Result<()> {
        let entries = self.port.fetch_favorites().await?;
        let set: HashSet<ContentId> =
            entries.iter().map(|entry| entry.content.id).collect();
        *self.confirmed.write().await = set;
        Ok(())
    }

    /// Favorite entries with their content, for list rendering.
    pub async fn entries(&self) -> Result<Vec<FavoriteEntry>> {
        self.port.fetch_favorites().await
    }

    /// Membership against the last confirmed server state.
    pub async fn is_favorite(&self, content_id: &ContentId) -> bool {
        self.confirmed.read().await.contains(content_id)
    }

    /// Flip membership for one title and return the confirmed result.
    ///
    /// Repeated toggles are idempotent in effect: a write that finds the
    /// server already in the desired state (favorite exists on add, or
    /// is gone on remove) counts as drift, not failure, and converges
    /// through the reconcile fetch.
    pub async fn toggle(&self, content_id: &ContentId) -> Result<FavoriteState> {
        let currently = self.is_favorite(content_id).await;

        let write = if currently {
            self.port.remove_favorite(content_id).await
        } else {
            self.port.add_favorite(content_id).await
        };

        match write {
            Ok(()) => {}
            Err(CoreError::Validation(_)) if !currently => {
                tracing::debug!(%content_id, "favorite already present, converging");
            }
            Err(CoreError::NotFound(_)) if currently => {
                tracing::debug!(%content_id, "favorite already gone, converging");
            }
            // Confirmed set untouched: the UI reverts to the last
            // confirmed state, never stays on the unconfirmed guess.
            Err(err) => return Err(err),
        }

        if let Err(err) = self.refresh().await {
            // The write itself completed; apply its implied state
            // rather than leaving the set a full toggle behind.
            tracing::warn!(
                %content_id,
                %err,
                "favorite reconcile fetch failed, applying completed write"
            );
            let mut confirmed = self.confirmed.write().await;
            if currently {
                confirmed.remove(content_id);
            } else {
                confirmed.insert(*content_id);
            }
        }

        Ok(FavoriteState::from_membership(
            self.is_favorite(content_id).await,
        ))
    }
}
