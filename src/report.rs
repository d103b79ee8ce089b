//! Rendering of extracted records for standard output.
//!
//! Three formats: a literal mapping (`{benchmark: "...", score: 1.0}`), a JSON
//! object, and a JSON array of bench entries (`name`/`value`/`unit`/`extra`)
//! as stored in benchmark-tracking dashboards.

use crate::extract::BenchRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Unit of every score this tool recognizes.
pub const SCORE_UNIT: &str = "ms/op";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Literal mapping of field names to values.
    #[default]
    Map,
    /// JSON object with the present fields.
    Json,
    /// JSON array of bench entries.
    Bench,
}

/// One entry of a dashboard `benches` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchEntry {
    pub name: String,
    pub value: f64,
    pub unit: &'static str,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub extra: String,
}

impl fmt::Display for BenchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        if let Some(name) = &self.benchmark {
            write!(f, "benchmark: {name:?}")?;
            first = false;
        }
        for (key, value) in self.numeric_fields() {
            if !first {
                write!(f, ", ")?;
            }
            // Debug keeps the fractional part on whole numbers (10.0, not 10).
            write!(f, "{key}: {value:?}")?;
            first = false;
        }
        write!(f, "}}")
    }
}

/// Build the bench entries for a record. `source` names the entry when the
/// log carries no `Benchmark:` line.
pub fn bench_entries(record: &BenchRecord, source: &Path) -> Vec<BenchEntry> {
    let Some(value) = record.score else {
        return Vec::new();
    };

    let name = record.benchmark.clone().unwrap_or_else(|| {
        source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.display().to_string())
    });

    let mut extra = Vec::new();
    if let (Some(pct), Some(err)) = (record.error_percent, record.error) {
        extra.push(format!("error: ±{err:?} {SCORE_UNIT} ({pct:?}%)"));
    }
    for (key, v) in [("min", record.min), ("avg", record.avg), ("max", record.max)] {
        if let Some(v) = v {
            extra.push(format!("{key}: {v:?}"));
        }
    }

    vec![BenchEntry {
        name,
        value,
        unit: SCORE_UNIT,
        extra: extra.join("\n"),
    }]
}

/// Render `record` in the requested format.
pub fn render(
    record: &BenchRecord,
    format: OutputFormat,
    pretty: bool,
    source: &Path,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Map => Ok(record.to_string()),
        OutputFormat::Json => to_json(record, pretty),
        OutputFormat::Bench => to_json(&bench_entries(record, source), pretty),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
