//! Progress tracking: resume reads and last-write-wins sync.
//!
//! The tracker owns the engine's sync policy. Reads fail open so
//! playback can always start; writes are fire-and-forget against the
//! external store, with transient failures dropped and implicitly
//! retried by the next scheduled tick (only the latest position
//! matters, so a lost report is superseded anyway). A later report with
//! a smaller watched time legitimately overwrites a larger one — the
//! user rewinding is not a conflict.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use cineflux_model::{
    ContentId, PlayerPosition, ProgressRecord, WatchState,
};

use crate::error::Result;
use crate::ports::ProgressPort;

pub struct ProgressTracker {
    port: Arc<dyn ProgressPort>,
    /// In-memory mirror of the user's records, keyed (thus
    /// deduplicated) by content id.
    mirror: RwLock<HashMap<ContentId, ProgressRecord>>,
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker").finish()
    }
}

impl ProgressTracker {
    pub fn new(port: Arc<dyn ProgressPort>) -> Self {
        Self {
            port,
            mirror: RwLock::new(HashMap::new()),
        }
    }

    /// Seed the mirror with every record the store holds for the user.
    pub async fn refresh(&self) -> Result<()> {
        let records = self.port.fetch_all_progress().await?;
        let mut mirror = self.mirror.write().await;
        mirror.clear();
        for record in records {
            mirror.insert(record.content_id, record);
        }
        Ok(())
    }

    /// Resume position for a playback session about to open.
    ///
    /// Fail-open: unstarted pairs and fetch failures both come back as
    /// the zero position so playback can still start from the
    /// beginning.
    pub async fn initial_position(
        &self,
        content_id: &ContentId,
    ) -> PlayerPosition {
        match self.port.fetch_progress(content_id).await {
            Ok(Some(record)) => {
                let position = record.position();
                self.mirror.write().await.insert(record.content_id, record);
                position
            }
            Ok(None) => PlayerPosition::START,
            Err(err) => {
                tracing::warn!(
                    %content_id,
                    %err,
                    "progress fetch failed, starting from the beginning"
                );
                PlayerPosition::START
            }
        }
    }

    /// Persist a position report. Last write wins; upsert keyed by
    /// (user, content), so reporting the same pair twice is a no-op on
    /// stored state.
    ///
    /// Transient failures are swallowed (the next tick carries a newer
    /// position); credential and validation failures propagate and are
    /// never auto-retried.
    pub async fn report(
        &self,
        content_id: &ContentId,
        position: PlayerPosition,
    ) -> Result<()> {
        match self.port.upsert_progress(content_id, position).await {
            Ok(()) => {
                self.mirror.write().await.insert(
                    *content_id,
                    ProgressRecord {
                        content_id: *content_id,
                        watched_time: position.watched_time,
                        total_duration: position.total_duration,
                        last_watched: Utc::now(),
                    },
                );
                Ok(())
            }
            Err(err) if err.is_transient() => {
                tracing::warn!(
                    %content_id,
                    %err,
                    "dropping progress write, next tick supersedes it"
                );
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Derived watch state for one pair, from the mirror.
    pub async fn state(&self, content_id: &ContentId) -> WatchState {
        self.mirror
            .read()
            .await
            .get(content_id)
            .map(|record| record.state())
            .unwrap_or(WatchState::Unstarted)
    }

    /// In-progress records, most recently watched first.
    pub async fn in_progress(&self) -> Vec<ProgressRecord> {
        let mirror = self.mirror.read().await;
        let mut records: Vec<ProgressRecord> = mirror
            .values()
            .filter(|record| record.state() == WatchState::InProgress)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.last_watched.cmp(&a.last_watched));
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;

    #[tokio::test]
    async fn report_then_read_returns_the_written_pair() {
        let backend = Arc::new(FakeBackend::default());
        let tracker = ProgressTracker::new(backend.clone());
        let id = ContentId::new();

        tracker
            .report(&id, PlayerPosition::new(300, 5400))
            .await
            .unwrap();

        let position = tracker.initial_position(&id).await;
        assert_eq!(position, PlayerPosition::new(300, 5400));
    }

    #[tokio::test]
    async fn last_write_wins_over_a_larger_position() {
        let backend = Arc::new(FakeBackend::default());
        let tracker = ProgressTracker::new(backend.clone());
        let id = ContentId::new();

        tracker.report(&id, PlayerPosition::new(30, 120)).await.unwrap();
        tracker.report(&id, PlayerPosition::new(10, 120)).await.unwrap();

        // Rewind sticks: (10, 120), not max-write-wins.
        assert_eq!(
            tracker.initial_position(&id).await,
            PlayerPosition::new(10, 120)
        );
    }

    #[tokio::test]
    async fn initial_position_fails_open() {
        let backend = Arc::new(FakeBackend::default());
        backend.fail_progress(true).await;

        let tracker = ProgressTracker::new(backend);
        let position = tracker.initial_position(&ContentId::new()).await;
        assert_eq!(position, PlayerPosition::START);
    }

    #[tokio::test]
    async fn transient_write_failure_is_silent() {
        let backend = Arc::new(FakeBackend::default());
        let tracker = ProgressTracker::new(backend.clone());
        let id = ContentId::new();

        backend.fail_progress(true).await;
        tracker
            .report(&id, PlayerPosition::new(30, 120))
            .await
            .expect("transient failure must not surface");
        assert_eq!(backend.upsert_count(), 0);

        // The next tick carries a newer position and succeeds.
        backend.fail_progress(false).await;
        tracker.report(&id, PlayerPosition::new(60, 120)).await.unwrap();
        assert_eq!(
            tracker.initial_position(&id).await,
            PlayerPosition::new(60, 120)
        );
    }

    #[tokio::test]
    async fn mirror_deduplicates_by_content_id() {
        let backend = Arc::new(FakeBackend::default());
        let tracker = ProgressTracker::new(backend.clone());
        let id = ContentId::new();

        tracker.report(&id, PlayerPosition::new(10, 600)).await.unwrap();
        tracker.report(&id, PlayerPosition::new(40, 600)).await.unwrap();

        let in_progress = tracker.in_progress().await;
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].watched_time, 40);
    }

    #[tokio::test]
    async fn completed_pairs_leave_in_progress() {
        let backend = Arc::new(FakeBackend::default());
        let tracker = ProgressTracker::new(backend.clone());
        let id = ContentId::new();

        tracker.report(&id, PlayerPosition::new(60, 120)).await.unwrap();
        assert_eq!(tracker.state(&id).await, WatchState::InProgress);

        tracker.report(&id, PlayerPosition::new(120, 120)).await.unwrap();
        assert_eq!(tracker.state(&id).await, WatchState::Completed);
        assert!(tracker.in_progress().await.is_empty());
    }
}
