//! Playback session controller.
//!
//! One active playback instance: `Idle → Loading → Playing → Closed`.
//! Opening a session resolves the resume position (fail-open) and the
//! provider embed URL, then spawns a ticker that persists the player's
//! self-reported position on a fixed wall-clock cadence. Closing
//! cancels the ticker before anything else, so no write can land
//! against a dead session, then flushes the last reported position
//! once, best-effort.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use cineflux_model::{Content, ContentId, PlayerPosition};

use crate::embed;
use crate::progress::ProgressTracker;

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Idle,
    Loading,
    Playing,
    Closed,
}

/// One active playback of a catalog title.
pub struct PlaybackSession {
    content: Content,
    embed_url: String,
    resume: PlayerPosition,
    position_tx: watch::Sender<PlayerPosition>,
    cancel: CancellationToken,
    ticker: Mutex<Option<JoinHandle<()>>>,
    state: Mutex<SessionState>,
    tracker: Arc<ProgressTracker>,
}

impl std::fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("content_id", &self.content.id)
            .field("embed_url", &self.embed_url)
            .field("resume", &self.resume)
            .finish()
    }
}

impl PlaybackSession {
    /// Open a session for a selected title.
    ///
    /// Loads the initial position (zero on unstarted pairs and on fetch
    /// failure, so playback always starts), resolves the embed URL, and
    /// starts the periodic reporter.
    pub async fn open(
        content: Content,
        tracker: Arc<ProgressTracker>,
        report_interval: Duration,
    ) -> Self {
        // Idle → Loading
        let resume = tracker.initial_position(&content.id).await;
        let embed_url = embed::embed_url(content.video_source, &content.video_url);

        // Loading → Playing
        let (position_tx, position_rx) = watch::channel(resume);
        let cancel = CancellationToken::new();
        let ticker = tokio::spawn(run_ticker(
            tracker.clone(),
            content.id,
            position_rx,
            report_interval,
            cancel.clone(),
        ));

        tracing::info!(
            content_id = %content.id,
            watched_time = resume.watched_time,
            "playback session opened"
        );

        Self {
            content,
            embed_url,
            resume,
            position_tx,
            cancel,
            ticker: Mutex::new(Some(ticker)),
            state: Mutex::new(SessionState::Playing),
            tracker,
        }
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Provider URL for the embedded player.
    pub fn embed_url(&self) -> &str {
        &self.embed_url
    }

    /// Position playback was seeded from.
    pub fn resume_position(&self) -> PlayerPosition {
        self.resume
    }

    pub async fn state(&self) -> SessionState {
        *self.state.lock().await
    }

    /// Feed the player's self-reported position. Sampled by the ticker
    /// at the moment a tick fires; never extrapolated.
    pub fn report_position(&self, position: PlayerPosition) {
        let _ = self.position_tx.send(position);
    }

    /// Close the session: cancel the ticker, then flush the last
    /// reported position once. Idempotent; no retry queue survives the
    /// session.
    pub async fn close(&self) {
        {
            let mut state = self.state.lock().await;
            if *state == SessionState::Closed {
                return;
            }
            *state = SessionState::Closed;
        }

        self.cancel.cancel();
        if let Some(ticker) = self.ticker.lock().await.take() {
            let _ = ticker.await;
        }

        let last = *self.position_tx.borrow();
        if last.duration_known() {
            if let Err(err) = self.tracker.report(&self.content.id, last).await
            {
                tracing::warn!(
                    content_id = %self.content.id,
                    %err,
                    "final progress flush failed"
                );
            }
        }

        tracing::info!(content_id = %self.content.id, "playback session closed");
    }
}

/// Periodic reporter. Ticks on a fixed wall-clock cadence and samples
/// the newest player-reported position. Reports run inline, so a tick
/// that fires while a report is still pending is skipped rather than
/// overlapped.
async fn run_ticker(
    tracker: Arc<ProgressTracker>,
    content_id: ContentId,
    mut position_rx: watch::Receiver<PlayerPosition>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; the cadence starts after it.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let position = *position_rx.borrow_and_update();
                if !position.duration_known() {
                    // Player has not reported a usable position yet.
                    continue;
                }
                if let Err(err) = tracker.report(&content_id, position).await {
                    tracing::warn!(
                        %content_id,
                        %err,
                        "scheduled progress report failed"
                    );
                }
            }
        }
    }
}
