//! Likely-cause distribution.
//!
//! Three fixed buckets get fixed weights from the aggregated features, then
//! are normalized to sum to 1. With no evidence they stay at zero.

use serde::{Deserialize, Serialize};

use crate::classifier::Features;

/// Weight when hard failures or latch misses are present
pub const MECHANICAL_WEIGHT: f64 = 0.8;

/// Weight when slow closes correlate with humidity
pub const ENVIRONMENT_WEIGHT: f64 = 0.4;

/// Weight when post-close drift is present
pub const BOUNCE_BACK_WEIGHT: f64 = 0.3;

/// Normalized cause scores; serialized as a map with exactly these keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CauseScores {
    pub environment_related_resistance: f64,
    pub mechanical_drag_or_obstruction: f64,
    pub bounce_back_or_force_issue: f64,
}

impl CauseScores {
    /// Weight the features and normalize
    pub fn from_features(features: &Features) -> Self {
        let mut raw = Self::default();
        if features.has_failures() {
            raw.mechanical_drag_or_obstruction += MECHANICAL_WEIGHT;
        }
        if features.intermittent_soft {
            raw.environment_related_resistance += ENVIRONMENT_WEIGHT;
        }
        if features.drift > 0 {
            raw.bounce_back_or_force_issue += BOUNCE_BACK_WEIGHT;
        }
        raw.normalized()
    }

    pub fn total(&self) -> f64 {
        self.environment_related_resistance
            + self.mechanical_drag_or_obstruction
            + self.bounce_back_or_force_issue
    }

    /// Divide by the sum; an all-zero distribution is left as is
    pub fn normalized(self) -> Self {
        let total = self.total();
        if total == 0.0 {
            return self;
        }
        Self {
            environment_related_resistance: self.environment_related_resistance / total,
            mechanical_drag_or_obstruction: self.mechanical_drag_or_obstruction / total,
            bounce_back_or_force_issue: self.bounce_back_or_force_issue / total,
        }
    }

    /// Largest bucket value
    pub fn dominant(&self) -> f64 {
        self.environment_related_resistance
            .max(self.mechanical_drag_or_obstruction)
            .max(self.bounce_back_or_force_issue)
    }

    /// (name, score) pairs in report order
    pub fn entries(&self) -> [(&'static str, f64); 3] {
        [
            ("environment_related_resistance", self.environment_related_resistance),
            ("mechanical_drag_or_obstruction", self.mechanical_drag_or_obstruction),
            ("bounce_back_or_force_issue", self.bounce_back_or_force_issue),
        ]
    }
}
