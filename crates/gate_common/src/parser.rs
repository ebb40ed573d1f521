//! Gate log tokenizer.
//!
//! Format:
//! - `# key=value key=value` header lines
//! - `TIMESTAMP|TYPE|key=value ...` event lines
//!
//! The parser never fails. Lines with fewer than two `|` segments are
//! dropped, unparseable timestamps become `None`, tokens without `=` are
//! ignored.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

use crate::event::{Event, ParsedLog};

static ISO_TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z$").unwrap());

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse a strict `YYYY-MM-DDTHH:MM:SSZ` UTC timestamp
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if !ISO_TIMESTAMP.is_match(s) {
        return None;
    }
    // Pattern matches but the date may still be impossible (month 13)
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Tokenize whitespace-separated `key=value` pairs.
/// Splits at the first `=`; later duplicates overwrite earlier ones.
pub fn parse_kv(s: &str) -> BTreeMap<String, String> {
    s.split_whitespace()
        .filter_map(|tok| tok.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Split text into lines on `\n`, `\r\n` or a lone `\r`.
/// A trailing terminator does not produce an empty final line.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let Some(end) = rest.find(['\r', '\n']) else {
            return Some(std::mem::take(&mut rest));
        };
        let line = &rest[..end];
        let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[end + terminator..];
        Some(line)
    })
}

/// Parse a whole log
pub fn parse_log(text: &str) -> ParsedLog {
    let mut parsed = ParsedLog::default();
    let mut dropped = 0usize;

    for (idx, raw) in split_lines(text).enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix('#') {
            parsed.header.extend(parse_kv(rest));
            continue;
        }

        let parts: Vec<&str> = line.split('|').map(str::trim).collect();
        if parts.len() < 2 {
            dropped += 1;
            continue;
        }

        let fields = parts.get(2).map(|s| parse_kv(s)).unwrap_or_default();
        parsed
            .events
            .push(Event::new(parse_timestamp(parts[0]), parts[1], fields, idx + 1));
    }

    tracing::debug!(
        events = parsed.events.len(),
        header_keys = parsed.header.len(),
        dropped,
        "parsed gate log"
    );

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_strict() {
        let ts = parse_timestamp("2024-03-01T06:30:00Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 3, 1, 6, 30, 0).unwrap());

        assert!(parse_timestamp("2024-03-01 06:30:00").is_none());
        assert!(parse_timestamp("2024-3-1T06:30:00Z").is_none());
        assert!(parse_timestamp("2024-03-01T06:30:00Zjunk").is_none());
        assert!(parse_timestamp("2024-13-01T06:30:00Z").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_parse_kv() {
        let kv = parse_kv("a=1 b=x=y junk c= a=2");
        assert_eq!(kv.get("a").map(String::as_str), Some("2"));
        assert_eq!(kv.get("b").map(String::as_str), Some("x=y"));
        assert_eq!(kv.get("c").map(String::as_str), Some(""));
        assert!(!kv.contains_key("junk"));
    }

    #[test]
    fn test_header_merge_last_wins() {
        let parsed = parse_log("# device_id=G1 fw=1.0\n# fw=1.2 log_schema=3\n");
        assert_eq!(parsed.header_or_unknown("device_id"), "G1");
        assert_eq!(parsed.header_or_unknown("fw"), "1.2");
        assert_eq!(parsed.header_or_unknown("log_schema"), "3");
        assert_eq!(parsed.header_or_unknown("missing"), "?");
        assert!(parsed.events.is_empty());
    }

    #[test]
    fn test_event_lines() {
        let text = "\
2024-03-01T06:30:00Z|MOVE|to=closed start_deg=90 end_deg=0
garbage line without pipes

not-a-time|SNAPSHOT|hum=80
|BOOT
";
        let parsed = parse_log(text);
        assert_eq!(parsed.events.len(), 3);

        let mv = &parsed.events[0];
        assert_eq!(mv.kind, "MOVE");
        assert!(mv.ts.is_some());
        assert_eq!(mv.text("to"), Some("closed"));
        assert_eq!(mv.line, 1);

        let snap = &parsed.events[1];
        assert!(snap.ts.is_none());
        assert_eq!(snap.line, 4);

        let boot = &parsed.events[2];
        assert_eq!(boot.kind, "BOOT");
        assert!(boot.fields.is_empty());
        assert_eq!(boot.line, 5);
    }

    #[test]
    fn test_segments_are_trimmed() {
        let parsed = parse_log("  2024-03-01T06:30:00Z | MOVE | to=open  ");
        assert_eq!(parsed.events[0].kind, "MOVE");
        assert!(parsed.events[0].ts.is_some());
        assert_eq!(parsed.events[0].text("to"), Some("open"));
    }

    #[test]
    fn test_duplicate_keys_on_line_last_wins() {
        let parsed = parse_log("2024-03-01T06:30:00Z|MOVE|reed_end=0 reed_end=1");
        assert_eq!(parsed.events[0].text("reed_end"), Some("1"));
    }

    #[test]
    fn test_empty_input() {
        let parsed = parse_log("");
        assert!(parsed.header.is_empty());
        assert!(parsed.events.is_empty());
    }

    #[test]
    fn test_split_lines_terminators() {
        let lines: Vec<&str> = split_lines("a\rb\r\nc\nd\r\r\ne\n").collect();
        assert_eq!(lines, vec!["a", "b", "c", "d", "", "e"]);
        assert_eq!(split_lines("").count(), 0);
        assert_eq!(split_lines("\n").collect::<Vec<_>>(), vec![""]);
    }

    #[test]
    fn test_lone_cr_endings() {
        let text = "# device_id=G1\r\
2024-03-01T06:00:00Z|MOVE|to=closed start_deg=90 end_deg=0 reed_end=1\r\
\r\
2024-03-01T07:00:00Z|MOVE|to=closed start_deg=90 end_deg=40 reed_end=0\r";
        let parsed = parse_log(text);
        assert_eq!(parsed.header_or_unknown("device_id"), "G1");
        assert_eq!(parsed.events.len(), 2);
        assert_eq!(parsed.events[0].text("reed_end"), Some("1"));
        assert_eq!(parsed.events[1].text("reed_end"), Some("0"));
        let lines: Vec<usize> = parsed.events.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn test_line_numbers_monotonic() {
        let text = "# a=1\nx\n2024-03-01T06:30:00Z|A\n\n|B|k=v\nC|D\n";
        let parsed = parse_log(text);
        let lines: Vec<usize> = parsed.events.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 5, 6]);
        assert!(lines.windows(2).all(|w| w[0] < w[1]));
    }
}
