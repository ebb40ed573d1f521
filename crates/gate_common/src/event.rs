//! Typed gate log events.
//!
//! Every event line becomes an [`Event`]: optional UTC timestamp, a type tag
//! and a bag of `key=value` fields. Field values stay strings; typed getters
//! convert them with declared defaults and never fail. [`MoveRecord`] is the
//! typed view over a MOVE event that the analysis stages consume.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Movement attempt event type
pub const MOVE: &str = "MOVE";

/// Periodic environment reading event type
pub const SNAPSHOT: &str = "SNAPSHOT";

/// Default for integer-coded sensor fields that are missing or malformed
pub const INT_SENTINEL: i64 = -1;

/// A single parsed log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Timestamp, if the first segment was a valid `YYYY-MM-DDTHH:MM:SSZ`
    pub ts: Option<DateTime<Utc>>,
    /// Event type tag (MOVE, SNAPSHOT, ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Raw key/value fields; last write wins within a line
    pub fields: BTreeMap<String, String>,
    /// 1-indexed source line
    pub line: usize,
}

impl Event {
    pub fn new(
        ts: Option<DateTime<Utc>>,
        kind: &str,
        fields: BTreeMap<String, String>,
        line: usize,
    ) -> Self {
        Self {
            ts,
            kind: kind.to_string(),
            fields,
            line,
        }
    }

    /// Check the event type tag
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// Raw string value of a field
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Float value of a field, or `default` when missing or unparseable.
    /// Non-finite spellings ("nan", "inf") parse as themselves.
    pub fn float_or(&self, key: &str, default: f64) -> f64 {
        self.text(key)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(default)
    }

    /// Integer value of a field, or `default` when missing or unparseable
    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        self.text(key)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(default)
    }

    /// Finite float value of a field; NaN/inf and garbage are absent
    pub fn finite(&self, key: &str) -> Option<f64> {
        Some(self.float_or(key, f64::NAN)).filter(|v| v.is_finite())
    }
}

/// Header value or "?" when the log did not declare it
pub fn header_or_unknown<'a>(header: &'a BTreeMap<String, String>, key: &str) -> &'a str {
    header.get(key).map(String::as_str).unwrap_or("?")
}

/// Parsed log: header plus events in log order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedLog {
    /// Header keys from `#` lines; last value wins across lines
    pub header: BTreeMap<String, String>,
    /// Events in original log order (timestamps need not be monotonic)
    pub events: Vec<Event>,
}

impl ParsedLog {
    /// Header value or "?" for display
    pub fn header_or_unknown(&self, key: &str) -> &str {
        header_or_unknown(&self.header, key)
    }
}

/// Where a movement was heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveTarget {
    Closed,
    Open,
    Other,
}

impl MoveTarget {
    fn from_field(value: Option<&str>) -> Self {
        match value {
            Some("closed") => MoveTarget::Closed,
            Some("open") => MoveTarget::Open,
            _ => MoveTarget::Other,
        }
    }
}

/// Reed switch reading, decoded from its integer wire value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReedState {
    /// 1: magnet at the closed position
    Closed,
    /// 0: not at the closed position
    NotClosed,
    /// Anything else, including the -1 sentinel
    Unknown,
}

impl ReedState {
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => ReedState::Closed,
            0 => ReedState::NotClosed,
            _ => ReedState::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ReedState::Unknown)
    }
}

/// Typed view of a MOVE event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveRecord<'a> {
    pub ts: Option<DateTime<Utc>>,
    pub target: MoveTarget,
    pub start_deg: Option<f64>,
    pub end_deg: Option<f64>,
    /// Milliseconds, `INT_SENTINEL` when unknown
    pub duration_ms: i64,
    pub end_reason: &'a str,
    /// Raw reed value at the end of travel
    pub reed_end: i64,
    /// Raw reed value 30 seconds after the end of travel
    pub reed_settle_30s: i64,
    /// Humidity reported inline on the MOVE line
    pub hum: Option<f64>,
    pub line: usize,
}

impl<'a> MoveRecord<'a> {
    /// Build the typed view; `None` for anything that is not a MOVE
    pub fn from_event(event: &'a Event) -> Option<Self> {
        if !event.is(MOVE) {
            return None;
        }

        Some(Self {
            ts: event.ts,
            target: MoveTarget::from_field(event.text("to")),
            start_deg: event.finite("start_deg"),
            end_deg: event.finite("end_deg"),
            duration_ms: event.int_or("duration_ms", INT_SENTINEL),
            end_reason: event.text("end_reason").unwrap_or(""),
            reed_end: event.int_or("reed_end", INT_SENTINEL),
            reed_settle_30s: event.int_or("reed_settle_30s", INT_SENTINEL),
            hum: event.finite("hum"),
            line: event.line,
        })
    }

    pub fn is_close(&self) -> bool {
        self.target == MoveTarget::Closed
    }

    pub fn timed_out(&self) -> bool {
        self.end_reason == "timeout"
    }

    /// Angular distance covered, when both ends are known
    pub fn travel(&self) -> Option<f64> {
        match (self.start_deg, self.end_deg) {
            (Some(start), Some(end)) => Some((end - start).abs()),
            _ => None,
        }
    }

    /// Positive duration, if one was recorded
    pub fn positive_duration(&self) -> Option<i64> {
        Some(self.duration_ms).filter(|d| *d > 0)
    }

    pub fn reed(&self) -> ReedState {
        ReedState::from_raw(self.reed_end)
    }
}
