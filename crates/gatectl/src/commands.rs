//! Command implementations for gatectl

use anyhow::{Context, Result};
use gate_common::{analyze_with, parse_log, AnalysisReport, GateConfig, GateError};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::cli::AnalyzeArgs;
use crate::report_display::render_report;

/// Read a log file as text; invalid UTF-8 is replaced, never rejected
pub fn read_log(path: &Path) -> Result<String, GateError> {
    let bytes = fs::read(path).map_err(|source| GateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Run `analyze` and return what should be printed
pub fn analyze(args: &AnalyzeArgs) -> Result<String> {
    let config = GateConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    let text = read_log(&args.logfile)
        .with_context(|| format!("Failed to read log {}", args.logfile.display()))?;
    let parsed = parse_log(&text);
    debug!(events = parsed.events.len(), "log parsed");

    let analysis = analyze_with(&parsed, &config.analysis);
    let report = AnalysisReport::new(&parsed, analysis);
    info!(
        closes = report.diagnosis.timeline_events.len(),
        level = report.diagnosis.confidence.level.as_str(),
        "analysis complete"
    );

    if args.json {
        Ok(report.to_json_pretty()?)
    } else {
        Ok(render_report(&report))
    }
}

/// Run `version`
pub fn version() -> String {
    format!("gatectl v{}", gate_common::VERSION)
}
