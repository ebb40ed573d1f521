//! Installer-facing recommendations.
//!
//! Fixed advisory blocks keyed on aggregated features, emitted in a fixed
//! order: mechanical, latch zone, environment, post-close drift. Each block
//! also contributes one explanatory note.

use serde::{Deserialize, Serialize};

use crate::classifier::Features;

const MECHANICAL: &[&str] = &[
    "Mechanical (priority): Inspect for physical obstruction (debris, stones, ice), leaf binding, or fouling at end-stops.",
    "Mechanical: Check hinges/rollers/bearings and gate geometry (sag, dropped leaf, tight spots across travel).",
    "Mechanical: Verify mechanical stops and latch alignment (a mis-set stop can mimic obstruction).",
    "Mechanical: Check the operator manual release isn't partially engaged and the leaf moves freely by hand.",
];
const MECHANICAL_NOTE: &str =
    "Hard failures detected: reed did not confirm closed on some close attempts.";

const LATCH_ZONE: &[&str] = &[
    "Latch-zone: Check magnet + reed alignment (mounting, gap, magnet strength).",
    "Latch-zone: Check latch/keep alignment and final closing force margin.",
    "Latch-zone: Check for bounce-back from ground stop or latch impact (can prevent reed confirmation).",
];
const LATCH_ZONE_NOTE: &str =
    "Latch misses detected: gate travelled most of the way but reed did not confirm closed.";

const ENVIRONMENT: &[&str] = &[
    "Environment: High humidity correlates with slow closes. Inspect lubrication, swelling timber/composite, and water ingress points.",
    "Environment: Check force/torque margin (marginal setups fail under wet/temperature changes).",
    "Environment: Check seals/drainage around track and operator enclosure; water + grit increases resistance.",
];
const ENVIRONMENT_NOTE: &str =
    "Soft intermittent detected: slow closes correlate with high humidity (nearest SNAPSHOT correlation).";

const DRIFT: &[&str] = &[
    "Post-close drift: Gate reaches closed then re-opens/rolls back; check latch holding, wind load, and closing force.",
    "Post-close drift: Inspect back-driving/rollback on operator and mechanical play in linkages.",
];
const DRIFT_NOTE: &str =
    "Drift detected: reed confirmed closed initially, but did not remain closed.";

/// Emitted when no fault flag is raised
pub const FALLBACK: &str = "No clear fault pattern detected from this log. Capture more events, or add intent signals (command accepted, safety inhibit) from the controller for higher certainty.";

/// Recommendations plus explanatory notes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    pub recommendations: Vec<String>,
    pub notes: Vec<String>,
}

impl Advice {
    fn block(&mut self, advisories: &[&str], note: &str) {
        self.recommendations
            .extend(advisories.iter().map(|s| s.to_string()));
        self.notes.push(note.to_string());
    }
}

/// Build advice from features
pub fn recommend(features: &Features) -> Advice {
    let mut advice = Advice::default();

    if features.hard_fail > 0 {
        advice.block(MECHANICAL, MECHANICAL_NOTE);
    }
    if features.latch_miss > 0 {
        advice.block(LATCH_ZONE, LATCH_ZONE_NOTE);
    }
    if features.intermittent_soft {
        advice.block(ENVIRONMENT, ENVIRONMENT_NOTE);
    }
    if features.drift > 0 {
        advice.block(DRIFT, DRIFT_NOTE);
    }

    if advice.recommendations.is_empty() {
        advice.recommendations.push(FALLBACK.to_string());
    }

    advice
}
