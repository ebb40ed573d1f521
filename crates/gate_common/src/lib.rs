//! Shared analysis engine for gate operator logs.
//!
//! Turns the text log of an automated gate/door operator into a diagnosis:
//! per-attempt close outcomes, fault episodes, a normalized likely-cause
//! distribution and a confidence grade. Everything here is synchronous and
//! pure; the CLI (`gatectl`) and the upload service (`gated`) are thin
//! wrappers around [`analyze`].

pub mod baseline;
pub mod causes;
pub mod classifier;
pub mod confidence;
pub mod config;
pub mod diagnosis;
pub mod episodes;
pub mod error;
pub mod event;
pub mod parser;
pub mod recommend;
pub mod report;
pub mod snapshot;
pub mod stats;

pub use baseline::{learn_baselines, Baselines};
pub use causes::CauseScores;
pub use classifier::{classify_closes, Classification, Features, Outcome, TimelineEntry};
pub use confidence::{score_confidence, Confidence, ConfidenceLevel};
pub use config::{AnalysisConfig, GateConfig, ServerConfig};
pub use diagnosis::{analyze, analyze_with, Analysis, Diagnosis};
pub use episodes::{detect_episodes, Episode, EpisodeKind};
pub use error::GateError;
pub use event::{Event, MoveRecord, MoveTarget, ParsedLog, ReedState};
pub use parser::{parse_kv, parse_log, parse_timestamp};
pub use recommend::{recommend, Advice};
pub use report::AnalysisReport;
pub use snapshot::{SnapshotIndex, SnapshotPoint};

/// Engine version, reported in every analysis report
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
