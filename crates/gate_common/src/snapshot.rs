//! Humidity snapshot index.
//!
//! Sorted SNAPSHOT humidity series with nearest-neighbour lookup bounded by
//! a maximum age, so a close attempt is only attributed to a reading that
//! was actually taken nearby.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{Event, SNAPSHOT};
use crate::stats::median;

/// Default correlation window between a move and a snapshot
pub const DEFAULT_MAX_AGE_SECS: i64 = 600;

/// One humidity reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPoint {
    pub ts: DateTime<Utc>,
    /// Relative humidity, always finite
    pub hum: f64,
}

/// Humidity readings sorted ascending by timestamp.
/// Built once per analysis and never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotIndex {
    points: Vec<SnapshotPoint>,
}

impl SnapshotIndex {
    /// Build from SNAPSHOT events carrying a timestamp and finite `hum`
    pub fn from_events(events: &[Event]) -> Self {
        let points = events
            .iter()
            .filter(|e| e.is(SNAPSHOT))
            .filter_map(|e| Some(SnapshotPoint { ts: e.ts?, hum: e.finite("hum")? }))
            .collect();
        Self::from_points(points)
    }

    /// Build from arbitrary points; sorts them (stable, so equal timestamps
    /// keep log order)
    pub fn from_points(mut points: Vec<SnapshotPoint>) -> Self {
        points.sort_by_key(|p| p.ts);
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SnapshotPoint] {
        &self.points
    }

    /// Median humidity across every reading
    pub fn median_humidity(&self) -> Option<f64> {
        let hums: Vec<f64> = self.points.iter().map(|p| p.hum).collect();
        median(&hums)
    }

    /// Humidity of the reading nearest to `target`, if within `max_age`.
    ///
    /// Tie-break rule: when the predecessor and successor of the insertion
    /// point are equally distant, the predecessor (earlier reading) wins.
    /// An exact timestamp match returns the first reading at that time.
    pub fn lookup(&self, target: Option<DateTime<Utc>>, max_age: Duration) -> Option<f64> {
        let target = target?;
        if self.points.is_empty() {
            return None;
        }

        let idx = self.points.partition_point(|p| p.ts < target);
        if let Some(hit) = self.points.get(idx).filter(|p| p.ts == target) {
            return Some(hit.hum);
        }

        let predecessor = idx.checked_sub(1).map(|i| self.points[i]);
        let successor = self.points.get(idx).copied();

        let distance = |p: &SnapshotPoint| (p.ts - target).abs();
        let best = match (predecessor, successor) {
            (Some(pred), Some(succ)) => {
                if distance(&succ) < distance(&pred) {
                    succ
                } else {
                    pred
                }
            }
            (Some(only), None) | (None, Some(only)) => only,
            (None, None) => return None,
        };

        (distance(&best) <= max_age).then_some(best.hum)
    }
}
