//! Run-batch discovery: scan a directory for timestamped result files,
//! select the most recent run, and load its per-source records.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use insight_core::{InsightError, RawSourceRecord};
use regex::Regex;
use serde_json::Value;

/// Per-source record lists sharing the most recent filename timestamp
/// found during one directory scan.
#[derive(Debug, Default)]
pub struct RunBatch {
    pub timestamp: String,
    pub records: BTreeMap<String, Vec<RawSourceRecord>>,
}

fn timestamp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:^|_)(\d{8}_\d{6})(?:$|[._])").expect("valid timestamp pattern")
    })
}

/// Extract the embedded `YYYYMMDD_HHMMSS` stamp from a filename.
///
/// The fixed-width shape is validated defensively: the stamp must be
/// bounded by underscores, dots, or the name's ends, so stray digit runs
/// cannot masquerade as timestamps. Lexicographic comparison of the result
/// orders chronologically only because the width is fixed and zero-padded.
pub fn extract_timestamp(filename: &str) -> Option<String> {
    timestamp_pattern()
        .captures(filename)
        .map(|caps| caps[1].to_string())
}

/// Translate a `*`-wildcard filename pattern into an anchored matcher.
fn compile_pattern(pattern: &str) -> Regex {
    let escaped = regex::escape(pattern).replace(r"\*", ".*");
    Regex::new(&format!("^{escaped}$")).expect("escaped pattern is valid")
}

/// List files in `dir` matching `pattern`, paired with their extracted
/// timestamps. Files without a parseable timestamp are excluded from batch
/// membership entirely. Errors when nothing usable matches.
pub fn discover(dir: &Path, pattern: &str) -> Result<Vec<(PathBuf, String)>, InsightError> {
    let matcher = compile_pattern(pattern);

    let mut stamped = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !matcher.is_match(name) {
            continue;
        }
        match extract_timestamp(name) {
            Some(timestamp) => stamped.push((entry.path(), timestamp)),
            None => {
                tracing::debug!(file = name, "no run timestamp in filename, excluded");
            }
        }
    }

    if stamped.is_empty() {
        return Err(InsightError::NoInputFiles(format!(
            "no files matching `{pattern}` with a run timestamp in {}",
            dir.display()
        )));
    }
    Ok(stamped)
}

/// Load the most recent run batch: select every file carrying the maximum
/// timestamp and accumulate its per-source records. An unreadable or
/// malformed file is logged and skipped; it never aborts the batch.
pub fn load_batch(dir: &Path, pattern: &str) -> Result<RunBatch, InsightError> {
    let stamped = discover(dir, pattern)?;
    let timestamp = match stamped.iter().map(|(_, ts)| ts.as_str()).max() {
        Some(max) => max.to_string(),
        None => {
            return Err(InsightError::NoInputFiles(format!(
                "no files matching `{pattern}` in {}",
                dir.display()
            )))
        }
    };

    let mut records: BTreeMap<String, Vec<RawSourceRecord>> = BTreeMap::new();
    for (path, stamp) in &stamped {
        if stamp != &timestamp {
            continue;
        }

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(file = %path.display(), %err, "unreadable result file, skipping");
                continue;
            }
        };
        let parsed: Value = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(file = %path.display(), %err, "malformed result file, skipping");
                continue;
            }
        };
        let Some(sources) = parsed.as_object() else {
            tracing::warn!(file = %path.display(), "top level is not an object, skipping");
            continue;
        };

        for (source, payload) in sources {
            // A source key maps either to one record object or to an array
            // of record objects; scalar payloads are not records.
            let items: Vec<RawSourceRecord> = match payload {
                Value::Object(_) => vec![payload.clone()],
                Value::Array(items) => items.iter().filter(|i| i.is_object()).cloned().collect(),
                _ => Vec::new(),
            };
            if !items.is_empty() {
                records.entry(source.clone()).or_default().extend(items);
            }
        }
    }

    Ok(RunBatch { timestamp, records })
}
