//! Watch position types and the derived watch-state predicate.
//!
//! Progress is tracked as a watched-time / total-duration pair per
//! (user, content). Completion is a derived predicate over that pair,
//! never a stored flag: a record counts as completed once
//! `watched_time >= total_duration` for a known duration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::Content;
use crate::ids::ContentId;

/// Player-reported position used to seed and sync playback.
///
/// `total_duration == 0` means the duration is not yet known (the player
/// has not reported it, or no record exists). Unknown duration never
/// counts as completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPosition {
    /// Seconds watched
    pub watched_time: u32,
    /// Total runtime in seconds, 0 while unknown
    pub total_duration: u32,
}

impl PlayerPosition {
    pub const START: PlayerPosition = PlayerPosition {
        watched_time: 0,
        total_duration: 0,
    };

    pub fn new(watched_time: u32, total_duration: u32) -> Self {
        Self {
            watched_time,
            total_duration,
        }
    }

    pub fn duration_known(&self) -> bool {
        self.total_duration > 0
    }
}

/// Persisted progress for one (user, content) pair.
///
/// The pair key is unique; writes are upserts with last-write-wins
/// semantics. `watched_time` may briefly overshoot `total_duration`
/// (player reporting quirks) — no hard clamp is applied on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub content_id: ContentId,
    pub watched_time: u32,
    pub total_duration: u32,
    /// When the record was last written
    pub last_watched: DateTime<Utc>,
}

impl ProgressRecord {
    pub fn position(&self) -> PlayerPosition {
        PlayerPosition::new(self.watched_time, self.total_duration)
    }

    /// Progress fraction, `None` while the duration is unknown.
    pub fn progress(&self) -> Option<WatchProgress> {
        WatchProgress::of(self.watched_time, self.total_duration)
    }

    /// Derived watch state for this record.
    pub fn state(&self) -> WatchState {
        if self.total_duration > 0 && self.watched_time >= self.total_duration
        {
            WatchState::Completed
        } else if self.watched_time > 0 {
            WatchState::InProgress
        } else {
            WatchState::Unstarted
        }
    }
}

/// Derived per-pair watch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchState {
    Unstarted,
    InProgress,
    Completed,
}

/// Watch progress fraction, clamped on read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchProgress(f32);

impl WatchProgress {
    /// Create a new watch progress, clamping between 0.0 and 1.0
    pub fn new(fraction: f32) -> Self {
        WatchProgress(fraction.clamp(0.0, 1.0))
    }

    /// Fraction for a watched/duration pair, or `None` while the
    /// duration is unknown (avoids treating 0/0 as either complete or
    /// divisible).
    pub fn of(watched_time: u32, total_duration: u32) -> Option<Self> {
        if total_duration == 0 {
            None
        } else {
            Some(WatchProgress::new(
                watched_time as f32 / total_duration as f32,
            ))
        }
    }

    /// Get the progress as a fraction (0.0 to 1.0)
    pub fn as_fraction(&self) -> f32 {
        self.0
    }

    pub fn is_started(&self) -> bool {
        self.0 > 0.0
    }
}

/// One row of the continue-watching rail: a catalog title joined with
/// the user's in-progress record. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinueWatchingEntry {
    pub content: Content,
    pub record: ProgressRecord,
}

impl ContinueWatchingEntry {
    pub fn resume_position(&self) -> PlayerPosition {
        self.record.position()
    }
}
