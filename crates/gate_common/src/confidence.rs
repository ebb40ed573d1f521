//! Confidence grading for a diagnosis.
//!
//! Additive evidence terms, each recording one human-readable reason, summed
//! and clamped to [0, 1]. Weights and reason phrasing are locked by tests.

use serde::{Deserialize, Serialize};

use crate::baseline::Baselines;
use crate::causes::CauseScores;
use crate::classifier::{Features, TimelineEntry};

/// Score at or above which confidence is HIGH
pub const HIGH_THRESHOLD: f64 = 0.75;

/// Score at or above which confidence is MED
pub const MED_THRESHOLD: f64 = 0.50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceLevel {
    High,
    Med,
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_THRESHOLD {
            ConfidenceLevel::High
        } else if score >= MED_THRESHOLD {
            ConfidenceLevel::Med
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "HIGH",
            ConfidenceLevel::Med => "MED",
            ConfidenceLevel::Low => "LOW",
        }
    }
}

/// Graded confidence with its justification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    /// Always within [0, 1]
    pub score: f64,
    pub level: ConfidenceLevel,
    /// One entry per evidence rule evaluated, in evaluation order
    pub reasons: Vec<String>,
}

/// Accumulates evidence terms
#[derive(Debug, Default)]
struct Evidence {
    score: f64,
    reasons: Vec<String>,
}

impl Evidence {
    fn add(&mut self, weight: f64, reason: impl Into<String>) {
        self.score += weight;
        self.reasons.push(reason.into());
    }

    fn finish(self) -> Confidence {
        let score = self.score.clamp(0.0, 1.0);
        Confidence {
            score,
            level: ConfidenceLevel::from_score(score),
            reasons: self.reasons,
        }
    }
}

/// Grade how much the diagnosis can be trusted
pub fn score_confidence(
    timeline: &[TimelineEntry],
    baselines: &Baselines,
    features: &Features,
    scores: &CauseScores,
) -> Confidence {
    let mut ev = Evidence::default();
    let closes = timeline.len();

    // Sample size
    if closes >= 10 {
        ev.add(0.20, format!("Good sample size: {} close events.", closes));
    } else if closes >= 5 {
        ev.add(0.12, format!("Moderate sample size: {} close events.", closes));
    } else {
        ev.add(0.05, format!("Small sample size: {} close events.", closes));
    }

    if baselines.learned {
        ev.add(0.15, "Baselines learned (travel geometry available).");
    } else {
        ev.add(0.0, "Baselines not learned (reduced travel inference).");
    }

    // Reed coverage is undefined without attempts
    if closes > 0 {
        let known = timeline.iter().filter(|t| t.reed_known()).count();
        let coverage = known as f64 / closes as f64;
        if coverage >= 0.9 {
            ev.add(0.15, "Reed coverage high (physical truth available on most events).");
        } else if coverage >= 0.6 {
            ev.add(0.08, "Reed coverage moderate.");
        } else {
            ev.add(0.0, "Reed coverage low (reduced certainty).");
        }
    }

    let top = scores.dominant();
    if top >= 0.8 {
        ev.add(0.25, "Strongly dominant root cause signal.");
    } else if top >= 0.6 {
        ev.add(0.18, "Clear primary root cause signal.");
    } else {
        ev.add(0.08, "Mixed/weak root cause separation.");
    }

    if features.has_failures() {
        ev.add(0.10, "Failure evidence present (hard_fail/latch_miss).");
    }
    if features.intermittent_soft {
        ev.add(0.08, "Environment correlation evidence present (slow+wet window).");
    }
    if features.drift > 0 {
        ev.add(0.05, "Post-close drift evidence present.");
    }

    ev.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Outcome;
    use approx::assert_relative_eq;

    fn attempt(reed_end: i64) -> TimelineEntry {
        TimelineEntry {
            ts: None,
            outcome: Outcome::GoodClose,
            duration_ms: -1,
            slow: false,
            hum_near: None,
            wet: false,
            start_deg: None,
            end_deg: None,
            travel_pct: None,
            end_reason: String::new(),
            reed_end,
            reed_settle_30s: -1,
            drift: false,
        }
    }

    #[test]
    fn test_level_thresholds_inclusive() {
        assert_eq!(ConfidenceLevel::from_score(0.75), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(0.7499), ConfidenceLevel::Med);
        assert_eq!(ConfidenceLevel::from_score(0.50), ConfidenceLevel::Med);
        assert_eq!(ConfidenceLevel::from_score(0.4999), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_score(0.0), ConfidenceLevel::Low);
    }

    #[test]
    fn test_empty_evidence() {
        let c = score_confidence(
            &[],
            &Baselines::default(),
            &Features::default(),
            &CauseScores::default(),
        );
        assert_relative_eq!(c.score, 0.13, epsilon = 1e-9);
        assert_eq!(c.level, ConfidenceLevel::Low);
        assert_eq!(
            c.reasons,
            vec![
                "Small sample size: 0 close events.",
                "Baselines not learned (reduced travel inference).",
                "Mixed/weak root cause separation.",
            ]
        );
    }

    #[test]
    fn test_reed_coverage_bands() {
        let features = Features::default();
        let scores = CauseScores::default();
        let bl = Baselines::default();

        let mut timeline: Vec<_> = (0..10).map(|_| attempt(1)).collect();
        let c = score_confidence(&timeline, &bl, &features, &scores);
        assert!(c.reasons.iter().any(|r| r.starts_with("Reed coverage high")));

        for t in timeline.iter_mut().take(3) {
            t.reed_end = -1;
        }
        let c = score_confidence(&timeline, &bl, &features, &scores);
        assert!(c.reasons.iter().any(|r| r == "Reed coverage moderate."));

        for t in timeline.iter_mut().take(5) {
            t.reed_end = 7;
        }
        let c = score_confidence(&timeline, &bl, &features, &scores);
        assert!(c.reasons.iter().any(|r| r.starts_with("Reed coverage low")));
    }

    #[test]
    fn test_full_evidence_sums_all_terms() {
        let timeline: Vec<_> = (0..12).map(|_| attempt(1)).collect();
        let bl = Baselines {
            closed: Some(0.0),
            max_travel: Some(90.0),
            learned: true,
            ..Default::default()
        };
        let features = Features {
            hard_fail: 1,
            drift: 1,
            intermittent_soft: true,
            ..Default::default()
        };
        let scores = CauseScores {
            mechanical_drag_or_obstruction: 1.0,
            ..Default::default()
        };
        // 0.20 + 0.15 + 0.15 + 0.25 + 0.10 + 0.08 + 0.05 = 0.98
        let c = score_confidence(&timeline, &bl, &features, &scores);
        assert_relative_eq!(c.score, 0.98, epsilon = 1e-9);
        assert_eq!(c.level, ConfidenceLevel::High);
        assert_eq!(c.reasons.len(), 7);
    }

    #[test]
    fn test_finish_clamps_score() {
        let mut ev = Evidence::default();
        ev.add(0.9, "a");
        ev.add(0.4, "b");
        let c = ev.finish();
        assert_eq!(c.score, 1.0);
        assert_eq!(c.level, ConfidenceLevel::High);
        assert_eq!(c.reasons, vec!["a", "b"]);

        let mut ev = Evidence::default();
        ev.add(-0.5, "negative");
        assert_eq!(ev.finish().score, 0.0);
    }

    #[test]
    fn test_level_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&ConfidenceLevel::Med).unwrap(),
            "\"MED\""
        );
    }
}
