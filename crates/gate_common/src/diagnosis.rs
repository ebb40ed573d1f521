//! Analysis pipeline.
//!
//! parse -> baselines + snapshot index -> classification -> episodes,
//! causes, confidence, advice. Every stage takes plain values and returns a
//! new one; nothing is cached between calls.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::baseline::{learn_baselines, Baselines};
use crate::causes::CauseScores;
use crate::classifier::{classify_closes, Features, TimelineEntry};
use crate::confidence::{score_confidence, Confidence};
use crate::config::AnalysisConfig;
use crate::episodes::{detect_episodes, Episode};
use crate::event::ParsedLog;
use crate::recommend::recommend;
use crate::snapshot::SnapshotIndex;

/// The diagnosis handed to renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub scores: CauseScores,
    pub recommendations: Vec<String>,
    pub notes: Vec<String>,
    pub confidence: Confidence,
    pub timeline_events: Vec<TimelineEntry>,
    pub episodes: Vec<Episode>,
}

/// Everything one analysis produces
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub baselines: Baselines,
    pub features: Features,
    pub diagnosis: Diagnosis,
}

/// Analyze with default thresholds
pub fn analyze(parsed: &ParsedLog) -> Analysis {
    analyze_with(parsed, &AnalysisConfig::default())
}

/// Analyze with explicit thresholds
pub fn analyze_with(parsed: &ParsedLog, config: &AnalysisConfig) -> Analysis {
    let baselines = learn_baselines(&parsed.events);
    let snapshots = SnapshotIndex::from_events(&parsed.events);
    debug!(
        learned = baselines.learned,
        snapshots = snapshots.len(),
        "baselines and snapshot index built"
    );

    let classification = classify_closes(&parsed.events, &baselines, &snapshots, config);
    let timeline = classification.timeline;
    let features = classification.features;

    let scores = CauseScores::from_features(&features);
    let advice = recommend(&features);
    let episodes = detect_episodes(&timeline);
    let confidence = score_confidence(&timeline, &baselines, &features, &scores);

    debug!(
        episodes = episodes.len(),
        score = confidence.score,
        level = confidence.level.as_str(),
        "diagnosis complete"
    );

    Analysis {
        baselines,
        features,
        diagnosis: Diagnosis {
            scores,
            recommendations: advice.recommendations,
            notes: advice.notes,
            confidence,
            timeline_events: timeline,
            episodes,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confidence::ConfidenceLevel;
    use crate::parser::parse_log;
    use crate::recommend::FALLBACK;

    #[test]
    fn test_empty_input_is_complete() {
        let analysis = analyze(&parse_log(""));
        let dx = &analysis.diagnosis;

        assert!(!analysis.baselines.learned);
        assert_eq!(analysis.features, Features::default());
        assert!(dx.timeline_events.is_empty());
        assert!(dx.episodes.is_empty());
        assert_eq!(dx.scores, CauseScores::default());
        assert_eq!(dx.recommendations, vec![FALLBACK.to_string()]);
        assert!(dx.notes.is_empty());
        assert_eq!(dx.confidence.level, ConfidenceLevel::Low);
    }

    #[test]
    fn test_config_threshold_changes_wet() {
        let text = "\
2024-03-01T06:00:00Z|MOVE|to=closed start_deg=90 end_deg=0 reed_end=1 hum=72
";
        let parsed = parse_log(text);
        assert!(!analyze(&parsed).diagnosis.timeline_events[0].wet);

        let config = AnalysisConfig {
            wet_humidity: 70.0,
            ..Default::default()
        };
        assert!(analyze_with(&parsed, &config).diagnosis.timeline_events[0].wet);
    }

    #[test]
    fn test_huge_max_age_does_not_panic() {
        let text = "\
2024-03-01T06:00:00Z|SNAPSHOT|hum=80
2024-03-01T06:01:00Z|MOVE|to=closed start_deg=90 end_deg=0 reed_end=1
";
        let config = AnalysisConfig {
            snapshot_max_age_secs: i64::MAX,
            ..Default::default()
        };
        let analysis = analyze_with(&parse_log(text), &config);
        assert_eq!(analysis.diagnosis.timeline_events[0].hum_near, Some(80.0));
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let text = "\
2024-03-01T06:00:00Z|SNAPSHOT|hum=80
2024-03-01T06:01:00Z|MOVE|to=closed start_deg=90 end_deg=0 duration_ms=9000 reed_end=1
2024-03-01T06:05:00Z|MOVE|to=closed start_deg=90 end_deg=30 duration_ms=15000 reed_end=0
";
        let parsed = parse_log(text);
        assert_eq!(analyze(&parsed), analyze(&parsed));
    }
}
