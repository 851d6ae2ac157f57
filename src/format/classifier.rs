use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rayon::prelude::*;
use serde_json::Value;

use super::version::at_least_1_0_9;
use crate::utils::classify_debug_enabled;

/// Log-schema revision a record conforms to.
///
/// `Legacy` entries always carry a realized `costUSD`; `V1_0_9` entries
/// introduced `uuid` and `message.ttftMs` and dropped the pre-computed cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogFormat {
    Legacy,
    V1_0_9,
    Unknown,
}

impl LogFormat {
    /// Aggregation rank: newer-format evidence dominates, because a mixed
    /// log set containing any v1.0.9 record needs the newer extraction path.
    fn priority(self) -> u8 {
        match self {
            LogFormat::V1_0_9 => 2,
            LogFormat::Legacy => 1,
            LogFormat::Unknown => 0,
        }
    }
}

fn is_assistant_entry(entry: &Value) -> bool {
    entry.get("type").and_then(Value::as_str) == Some("assistant")
}

fn has_field(entry: &Value, field: &str) -> bool {
    entry.get(field).is_some_and(|v| !v.is_null())
}

fn has_message_field(entry: &Value, field: &str) -> bool {
    entry
        .get("message")
        .and_then(|m| m.get(field))
        .is_some_and(|v| !v.is_null())
}

/// An explicit realized cost marks the older schema.
fn has_cost_usd(entry: &Value) -> bool {
    has_field(entry, "costUSD")
}

fn has_version_marker(entry: &Value) -> bool {
    entry
        .get("version")
        .and_then(Value::as_str)
        .is_some_and(at_least_1_0_9)
}

fn has_ttft_marker(entry: &Value) -> bool {
    has_field(entry, "uuid") && has_message_field(entry, "ttftMs")
}

/// v1.0.9 markers: uuid together with a time-to-first-token field, or a
/// version stamp at or past 1.0.9.
fn has_v1_0_9_markers(entry: &Value) -> bool {
    has_ttft_marker(entry) || has_version_marker(entry)
}

/// Weaker legacy signal for transitional records that dropped `costUSD`
/// early: session id plus nested model plus timestamp.
fn has_legacy_shape(entry: &Value) -> bool {
    has_field(entry, "sessionId")
        && has_message_field(entry, "model")
        && has_field(entry, "timestamp")
}

/// Classifies one raw record.
///
/// Only assistant turns carry usage data worth classifying; anything else,
/// including non-object input, is `Unknown`. A record carrying `costUSD` is
/// always `Legacy` even when newer markers are also present: a realized
/// cost is authoritative and must never be reinterpreted through the
/// fallback-pricing path.
pub fn classify_entry(entry: &Value) -> LogFormat {
    if !entry.is_object() || !is_assistant_entry(entry) {
        return LogFormat::Unknown;
    }
    if has_cost_usd(entry) {
        return LogFormat::Legacy;
    }
    if has_v1_0_9_markers(entry) {
        return LogFormat::V1_0_9;
    }
    if has_legacy_shape(entry) {
        return LogFormat::Legacy;
    }
    LogFormat::Unknown
}

/// Classifies a JSONL file by its first recognizable record.
///
/// Blank lines and undecodable JSON are skipped; a missing or unreadable
/// file means "no information", never an error.
pub fn classify_file(path: &Path) -> LogFormat {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(err) => {
            if classify_debug_enabled() {
                eprintln!("Failed to open {}: {}", path.display(), err);
            }
            return LogFormat::Unknown;
        }
    };
    let reader = BufReader::new(file);

    for (line_no, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };
        if line.trim().is_empty() {
            continue;
        }
        let entry: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(err) => {
                if classify_debug_enabled() {
                    eprintln!(
                        "Skipping undecodable line {} in {}: {}",
                        line_no + 1,
                        path.display(),
                        err
                    );
                }
                continue;
            }
        };
        let format = classify_entry(&entry);
        if format != LogFormat::Unknown {
            return format;
        }
    }
    LogFormat::Unknown
}

/// Classifies a set of files into one aggregate label, fixed priority
/// V1_0_9 > Legacy > Unknown. Files are independent, so classification
/// runs in parallel.
pub fn classify_files<P: AsRef<Path> + Sync>(paths: &[P]) -> LogFormat {
    paths
        .par_iter()
        .map(|path| classify_file(path.as_ref()))
        .max_by_key(|format| format.priority())
        .unwrap_or(LogFormat::Unknown)
}

/// Raw weight of the v1.0.9 markers present, in [0, 1].
fn v1_0_9_marker_weight(entry: &Value) -> f64 {
    let mut weight: f64 = 0.0;
    if has_field(entry, "uuid") {
        weight += 0.3;
    }
    if has_message_field(entry, "ttftMs") {
        weight += 0.4;
    }
    if has_version_marker(entry) {
        weight += 0.3;
    }
    weight.min(1.0)
}

/// Confidence distribution over the three labels.
///
/// Anchored to the classification itself: whichever label
/// [`classify_entry`] picks starts at 0.6 and grows with corroborating
/// markers, while the losing label's markers are discounted to at most
/// 0.4. The classified label therefore always scores above 0.5 and above
/// its rival; a record with no recognizable structure puts 1.0 on Unknown.
pub fn format_confidence(entry: &Value) -> HashMap<LogFormat, f64> {
    let (legacy, v1_0_9, unknown) = match classify_entry(entry) {
        LogFormat::Legacy => {
            let mut score: f64 = 0.6;
            if has_cost_usd(entry) {
                score += 0.2;
            }
            if has_legacy_shape(entry) {
                score += 0.2;
            }
            (score.min(1.0), v1_0_9_marker_weight(entry) * 0.4, 0.0)
        }
        LogFormat::V1_0_9 => {
            let mut score: f64 = 0.6;
            if has_ttft_marker(entry) {
                score += 0.2;
            }
            if has_version_marker(entry) {
                score += 0.2;
            }
            // costUSD cannot be present here, or the record would have
            // classified Legacy; only the shape signal can compete
            let legacy = if has_legacy_shape(entry) { 0.4 } else { 0.0 };
            (legacy, score.min(1.0), 0.0)
        }
        LogFormat::Unknown => (0.0, 0.0, 1.0),
    };

    HashMap::from([
        (LogFormat::Legacy, legacy),
        (LogFormat::V1_0_9, v1_0_9),
        (LogFormat::Unknown, unknown),
    ])
}
