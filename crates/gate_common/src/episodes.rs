//! Episode detection over the classified timeline.
//!
//! An episode is a maximal run of consecutive close attempts sharing one
//! fault signature. Single forward pass; consumed entries are never
//! revisited, so episodes never overlap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::{Outcome, TimelineEntry};

/// Fault signature of a run. Declaration order is trigger priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EpisodeKind {
    MechanicalHardFailWindow,
    HumidityDragWindow,
    PostCloseDriftWindow,
}

impl EpisodeKind {
    /// Trigger priority order
    pub const PRIORITY: [EpisodeKind; 3] = [
        EpisodeKind::MechanicalHardFailWindow,
        EpisodeKind::HumidityDragWindow,
        EpisodeKind::PostCloseDriftWindow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EpisodeKind::MechanicalHardFailWindow => "MECHANICAL_HARD_FAIL_WINDOW",
            EpisodeKind::HumidityDragWindow => "HUMIDITY_DRAG_WINDOW",
            EpisodeKind::PostCloseDriftWindow => "POST_CLOSE_DRIFT_WINDOW",
        }
    }

    /// Whether an entry carries this signature
    pub fn matches(&self, entry: &TimelineEntry) -> bool {
        match self {
            EpisodeKind::MechanicalHardFailWindow => entry.outcome == Outcome::HardFail,
            EpisodeKind::HumidityDragWindow => entry.is_slow_and_wet(),
            EpisodeKind::PostCloseDriftWindow => entry.drift,
        }
    }

    /// First signature an entry carries, by priority
    pub fn trigger(entry: &TimelineEntry) -> Option<Self> {
        Self::PRIORITY.into_iter().find(|kind| kind.matches(entry))
    }
}

/// A run of same-signature attempts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub kind: EpisodeKind,
    pub start_ts: Option<DateTime<Utc>>,
    pub end_ts: Option<DateTime<Utc>>,
    /// Number of attempts in the run
    pub count: usize,
}

/// Group the timeline into episodes
pub fn detect_episodes(timeline: &[TimelineEntry]) -> Vec<Episode> {
    let mut episodes = Vec::new();
    let mut i = 0;

    while i < timeline.len() {
        let Some(kind) = EpisodeKind::trigger(&timeline[i]) else {
            i += 1;
            continue;
        };

        // Extend only while the *same* condition holds
        let mut j = i;
        while j + 1 < timeline.len() && kind.matches(&timeline[j + 1]) {
            j += 1;
        }

        episodes.push(Episode {
            kind,
            start_ts: timeline[i].ts,
            end_ts: timeline[j].ts,
            count: j - i + 1,
        });
        i = j + 1;
    }

    episodes
}
