//! Serialized analysis report.
//!
//! Field names and nesting are a stable contract: the CLI `--json` output
//! and the upload service both emit exactly this shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::baseline::Baselines;
use crate::classifier::Features;
use crate::diagnosis::{Analysis, Diagnosis};
use crate::event::ParsedLog;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub version: String,
    pub header: BTreeMap<String, String>,
    pub baselines: Baselines,
    pub features: Features,
    pub diagnosis: Diagnosis,
}

impl AnalysisReport {
    pub fn new(parsed: &ParsedLog, analysis: Analysis) -> Self {
        Self {
            version: crate::VERSION.to_string(),
            header: parsed.header.clone(),
            baselines: analysis.baselines,
            features: analysis.features,
            diagnosis: analysis.diagnosis,
        }
    }

    /// Parse and analyze text in one go
    pub fn from_text(text: &str, config: &crate::config::AnalysisConfig) -> Self {
        let parsed = crate::parser::parse_log(text);
        let analysis = crate::diagnosis::analyze_with(&parsed, config);
        Self::new(&parsed, analysis)
    }

    /// Header value or "?" for display
    pub fn header_or_unknown(&self, key: &str) -> &str {
        crate::event::header_or_unknown(&self.header, key)
    }

    pub fn to_json_pretty(&self) -> Result<String, crate::error::GateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
