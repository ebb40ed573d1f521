//! Plain-text rendering of an analysis report.
//!
//! Section order is fixed so installers can diff two runs. The only styling
//! is the confidence level colour, which console drops when stdout is not a
//! terminal.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use console::style;
use gate_common::confidence::ConfidenceLevel;
use gate_common::{AnalysisReport, TimelineEntry};

const RULE_WIDE: usize = 60;
const RULE_TABLE: usize = 72;

const LIMITATIONS: &str =
    "Standalone log analysis cannot confirm INTENT (command accepted) or safety inhibits.";

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

fn ts(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(
        || "?".to_string(),
        |t| t.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    )
}

fn styled_level(level: ConfidenceLevel) -> String {
    let text = level.as_str();
    match level {
        ConfidenceLevel::High => style(text).green().to_string(),
        ConfidenceLevel::Med => style(text).yellow().to_string(),
        ConfidenceLevel::Low => style(text).red().to_string(),
    }
}

fn bullets(out: &mut String, items: &[String]) {
    if items.is_empty() {
        out.push_str("  - None\n");
    }
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

/// One timeline row
pub fn render_timeline_row(entry: &TimelineEntry) -> String {
    format!(
        "{} | {:14} | {:>6} ms | {} {} | hum~{}",
        ts(entry.ts),
        entry.outcome.as_str(),
        entry.duration_ms,
        if entry.slow { "SLOW" } else { "    " },
        if entry.wet { "WET" } else { "   " },
        entry
            .hum_near
            .map_or_else(|| "n/a".to_string(), |h| format!("{h:.1}")),
    )
}

/// Render the full text report
pub fn render_report(report: &AnalysisReport) -> String {
    let bl = &report.baselines;
    let ft = &report.features;
    let dx = &report.diagnosis;
    let conf = &dx.confidence;

    let mut out = String::new();
    let _ = writeln!(out, "Gate diagnostics v{}", report.version);
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDE));
    let _ = writeln!(
        out,
        "Device: {}  FW: {}  Schema: {}",
        report.header_or_unknown("device_id"),
        report.header_or_unknown("fw"),
        report.header_or_unknown("log_schema")
    );

    let _ = writeln!(out, "\nConfidence:");
    let _ = writeln!(out, "  level={}", styled_level(conf.level));
    let _ = writeln!(out, "  score={:.2}", conf.score);

    let _ = writeln!(out, "\nBaselines:");
    let _ = writeln!(out, "  closed={}", opt(bl.closed));
    let _ = writeln!(out, "  open={}", opt(bl.open));
    let _ = writeln!(out, "  max_travel={}", opt(bl.max_travel));
    let _ = writeln!(out, "  learned={}", bl.learned);

    let _ = writeln!(out, "\nClose outcomes:");
    let _ = writeln!(out, "  good={}", ft.good);
    let _ = writeln!(out, "  marginal={}", ft.marginal);
    let _ = writeln!(out, "  latch_miss={}", ft.latch_miss);
    let _ = writeln!(out, "  hard_fail={}", ft.hard_fail);
    let _ = writeln!(out, "  unknown={}", ft.unknown);
    let _ = writeln!(out, "  drift_after_close={}", ft.drift);

    let _ = writeln!(out, "\nEnvironment:");
    let _ = writeln!(out, "  median_humidity_global={}", opt(ft.median_humidity));
    let _ = writeln!(out, "  slow_ratio={:.2}", ft.slow_ratio);
    let _ = writeln!(
        out,
        "  slow_close_humidity_median={}",
        opt(ft.slow_close_humidity_median)
    );
    let _ = writeln!(out, "  slow_close_samples={}", ft.slow_close_samples);

    let _ = writeln!(out, "\nIntermittent:");
    let _ = writeln!(out, "  hard={}", ft.intermittent_hard);
    let _ = writeln!(out, "  soft={}", ft.intermittent_soft);

    let _ = writeln!(out, "\nLikely causes (normalized):");
    for (name, score) in dx.scores.entries() {
        let _ = writeln!(out, "  {name}={score:.2}");
    }

    let _ = writeln!(out, "\nInstaller recommendations:");
    bullets(&mut out, &dx.recommendations);

    let _ = writeln!(out, "\nNotes:");
    bullets(&mut out, &dx.notes);

    let _ = writeln!(out, "\nConfidence reasons:");
    bullets(&mut out, &conf.reasons);

    let _ = writeln!(out, "\nTimeline (close attempts)");
    let _ = writeln!(out, "{}", "-".repeat(RULE_TABLE));
    for entry in &dx.timeline_events {
        let _ = writeln!(out, "{}", render_timeline_row(entry));
    }

    let _ = writeln!(out, "\nEpisodes");
    let _ = writeln!(out, "{}", "-".repeat(RULE_TABLE));
    if dx.episodes.is_empty() {
        out.push_str("None\n");
    }
    for episode in &dx.episodes {
        let _ = writeln!(
            out,
            "{}: {} -> {}  (events={})",
            episode.kind.as_str(),
            ts(episode.start_ts),
            ts(episode.end_ts),
            episode.count
        );
    }

    let _ = writeln!(out, "\nLimitations:");
    let _ = writeln!(out, "  {LIMITATIONS}");

    out
}
