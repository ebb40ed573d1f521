//! Close-attempt outcome classification.
//!
//! Sensor truth first: the reed switch decides whether a close succeeded,
//! inferred travel percentage only grades how. Each close attempt yields one
//! [`TimelineEntry`]; aggregate counts and correlation features are
//! collected into [`Features`] after the pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::baseline::Baselines;
use crate::config::AnalysisConfig;
use crate::event::{Event, MoveRecord, ReedState};
use crate::snapshot::SnapshotIndex;
use crate::stats::median;

// ============================================================================
// Outcome bands
// ============================================================================

/// Travel fraction at or above which a reed-confirmed close is clean
pub const GOOD_TRAVEL_MIN: f64 = 0.95;

/// Split inside the marginal band (reed closed, travel short)
pub const MARGINAL_TRAVEL_SPLIT: f64 = 0.80;

/// Travel fraction below which an unconfirmed close is a hard failure
pub const HARD_FAIL_TRAVEL_MAX: f64 = 0.60;

/// Split inside the latch-miss band (reed open, travel mostly complete)
pub const LATCH_TRAVEL_SPLIT: f64 = 0.80;

/// Per-attempt result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    GoodClose,
    MarginalClose,
    LatchMiss,
    HardFail,
    Unknown,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::GoodClose => "GOOD_CLOSE",
            Outcome::MarginalClose => "MARGINAL_CLOSE",
            Outcome::LatchMiss => "LATCH_MISS",
            Outcome::HardFail => "HARD_FAIL",
            Outcome::Unknown => "UNKNOWN",
        }
    }
}

/// Classify one attempt from reed truth and travel fraction.
///
/// Each reed value keeps two travel bands that currently map to the same
/// outcome (`MARGINAL_TRAVEL_SPLIT`, `LATCH_TRAVEL_SPLIT`). They are tuning
/// points: split the outcome there when field data justifies it.
pub fn classify_outcome(reed: ReedState, travel_pct: Option<f64>) -> Outcome {
    match reed {
        ReedState::Closed => match travel_pct {
            None => Outcome::GoodClose,
            Some(tp) if tp >= GOOD_TRAVEL_MIN => Outcome::GoodClose,
            Some(tp) if tp >= MARGINAL_TRAVEL_SPLIT => Outcome::MarginalClose,
            Some(_) => Outcome::MarginalClose,
        },
        ReedState::NotClosed => match travel_pct {
            None => Outcome::HardFail,
            Some(tp) if tp < HARD_FAIL_TRAVEL_MAX => Outcome::HardFail,
            Some(tp) if tp < LATCH_TRAVEL_SPLIT => Outcome::LatchMiss,
            Some(_) => Outcome::LatchMiss,
        },
        ReedState::Unknown => Outcome::Unknown,
    }
}

// ============================================================================
// Timeline and features
// ============================================================================

/// One classified close attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub ts: Option<DateTime<Utc>>,
    pub outcome: Outcome,
    /// Raw duration, -1 when unknown
    pub duration_ms: i64,
    pub slow: bool,
    /// Humidity correlated to this attempt (inline or nearest snapshot)
    pub hum_near: Option<f64>,
    pub wet: bool,
    pub start_deg: Option<f64>,
    pub end_deg: Option<f64>,
    /// Fraction of learned max travel covered
    pub travel_pct: Option<f64>,
    pub end_reason: String,
    /// Raw reed value at end of travel
    pub reed_end: i64,
    /// Raw reed value 30s after end of travel
    pub reed_settle_30s: i64,
    /// Reed confirmed closed, then the settle check read open
    pub drift: bool,
}

impl TimelineEntry {
    pub fn is_slow_and_wet(&self) -> bool {
        self.slow && self.wet
    }

    pub fn reed_known(&self) -> bool {
        ReedState::from_raw(self.reed_end).is_known()
    }
}

/// Aggregated features over all close attempts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Features {
    pub good: u32,
    pub marginal: u32,
    pub latch_miss: u32,
    pub hard_fail: u32,
    pub unknown: u32,
    pub drift: u32,

    /// Median across every snapshot reading
    pub median_humidity: Option<f64>,
    /// Worst close duration relative to nominal
    pub slow_ratio: f64,

    /// Median humidity of slow closes with a known humidity
    pub slow_close_humidity_median: Option<f64>,
    pub slow_close_samples: u32,

    /// Slow closes correlate with high humidity
    pub intermittent_soft: bool,
    /// Hard failures interleaved with successes
    pub intermittent_hard: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            good: 0,
            marginal: 0,
            latch_miss: 0,
            hard_fail: 0,
            unknown: 0,
            drift: 0,
            median_humidity: None,
            slow_ratio: 1.0,
            slow_close_humidity_median: None,
            slow_close_samples: 0,
            intermittent_soft: false,
            intermittent_hard: false,
        }
    }
}

impl Features {
    /// Hard failures or latch misses observed
    pub fn has_failures(&self) -> bool {
        self.hard_fail > 0 || self.latch_miss > 0
    }

    fn count(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::GoodClose => self.good += 1,
            Outcome::MarginalClose => self.marginal += 1,
            Outcome::LatchMiss => self.latch_miss += 1,
            Outcome::HardFail => self.hard_fail += 1,
            Outcome::Unknown => self.unknown += 1,
        }
    }
}

/// Result of the classification pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub timeline: Vec<TimelineEntry>,
    pub features: Features,
}

/// Nominal close duration: median of the fastest third (at least one sample)
pub fn nominal_duration(sorted_durations: &[f64]) -> Option<f64> {
    let take = (sorted_durations.len() / 3).max(1).min(sorted_durations.len());
    median(&sorted_durations[..take])
}

/// Classify every close attempt in log order
pub fn classify_closes(
    events: &[Event],
    baselines: &Baselines,
    snapshots: &SnapshotIndex,
    config: &AnalysisConfig,
) -> Classification {
    let closes: Vec<MoveRecord<'_>> = events
        .iter()
        .filter_map(MoveRecord::from_event)
        .filter(MoveRecord::is_close)
        .collect();

    let mut features = Features {
        median_humidity: snapshots.median_humidity(),
        ..Features::default()
    };

    let mut durations: Vec<f64> = closes
        .iter()
        .filter_map(MoveRecord::positive_duration)
        .map(|d| d as f64)
        .collect();
    durations.sort_by(f64::total_cmp);

    let nominal = nominal_duration(&durations);
    if let Some(base) = nominal {
        features.slow_ratio = durations
            .iter()
            .map(|d| d / base)
            .fold(f64::NEG_INFINITY, f64::max);
    }

    let max_age = config.snapshot_max_age();
    let travel_ref = baselines.travel_reference();
    let mut slow_hums = Vec::new();
    let mut timeline = Vec::with_capacity(closes.len());

    for mv in &closes {
        let travel_pct = travel_ref.and_then(|max| mv.travel().map(|t| t / max));

        let slow = match (mv.positive_duration(), nominal) {
            (Some(d), Some(base)) => d as f64 > base * config.slow_factor,
            _ => false,
        };

        let hum_near = mv.hum.or_else(|| snapshots.lookup(mv.ts, max_age));
        if slow {
            if let Some(h) = hum_near {
                slow_hums.push(h);
            }
        }

        let outcome = classify_outcome(mv.reed(), travel_pct);
        features.count(outcome);

        let drift = mv.reed() == ReedState::Closed
            && ReedState::from_raw(mv.reed_settle_30s) == ReedState::NotClosed;
        if drift {
            features.drift += 1;
        }

        timeline.push(TimelineEntry {
            ts: mv.ts,
            outcome,
            duration_ms: mv.duration_ms,
            slow,
            hum_near,
            wet: hum_near.is_some_and(|h| h >= config.wet_humidity),
            start_deg: mv.start_deg,
            end_deg: mv.end_deg,
            travel_pct,
            end_reason: mv.end_reason.to_string(),
            reed_end: mv.reed_end,
            reed_settle_30s: mv.reed_settle_30s,
            drift,
        });
    }

    features.slow_close_samples = slow_hums.len() as u32;
    features.slow_close_humidity_median = median(&slow_hums);
    features.intermittent_hard =
        features.hard_fail > 0 && (features.good + features.marginal) > 0;
    features.intermittent_soft = features
        .slow_close_humidity_median
        .is_some_and(|h| h >= config.wet_humidity)
        && features.slow_ratio > config.slow_factor;

    tracing::debug!(
        closes = timeline.len(),
        nominal_ms = ?nominal,
        good = features.good,
        hard_fail = features.hard_fail,
        latch_miss = features.latch_miss,
        drift = features.drift,
        "classified close attempts"
    );

    Classification { timeline, features }
}
