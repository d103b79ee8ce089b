/// Benchmark log extraction: pull the benchmark name, score/error bounds and
/// min/avg/max statistics out of JMH-style text output.
///
/// Looks for patterns like:
/// - `Benchmark: com.example.MyBenchmark`
/// - `12.345 ±(1.23%) 0.456 ms/op`
/// - `(min, avg, max) = (10.0, 12.3, 15.0)`
///
/// Each pattern is searched independently against the whole text; the first
/// match wins. Numbers are ASCII `[0-9.]+` only (no sign, no exponent).
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static BENCHMARK_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Benchmark: ([\w.]+)").unwrap());

static SCORE_ERROR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9.]+) ±\(([0-9.]+)%\) ([0-9.]+) ms/op").unwrap());

static MIN_AVG_MAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(min, avg, max\) = \(([0-9.]+), ([0-9.]+), ([0-9.]+)\)").unwrap()
});

/// Fields extracted from one benchmark log. Every field is optional and stays
/// `None` when its pattern did not match.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BenchRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_percent: Option<f64>,
    /// Absolute error, same unit as `score` (ms/op).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl BenchRecord {
    /// True when no pattern matched.
    pub fn is_empty(&self) -> bool {
        *self == BenchRecord::default()
    }

    /// Present numeric fields in rendering order, paired with their names.
    pub fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        [
            ("score", self.score),
            ("error_percent", self.error_percent),
            ("error", self.error),
            ("min", self.min),
            ("avg", self.avg),
            ("max", self.max),
        ]
        .into_iter()
        .filter_map(|(name, v)| v.map(|v| (name, v)))
        .collect()
    }
}

/// Errors produced by extraction.
#[derive(Debug)]
pub enum ExtractError {
    /// The log file does not exist.
    FileNotFound(PathBuf),
    /// Any other read or parse failure.
    ParseFailure(String),
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::FileNotFound(path) => {
                write!(f, "Error: File not found: {}", path.display())
            }
            ExtractError::ParseFailure(msg) => write!(f, "An error occurred: {msg}"),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<std::io::Error> for ExtractError {
    fn from(e: std::io::Error) -> Self {
        ExtractError::ParseFailure(e.to_string())
    }
}

/// Read `path` and extract all recognized fields from its contents.
pub fn extract(path: &Path) -> Result<BenchRecord, ExtractError> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ExtractError::FileNotFound(path.to_path_buf()),
        _ => ExtractError::from(e),
    })?;

    tracing::debug!(path = %path.display(), bytes = text.len(), "read benchmark log");
    extract_from_text(&text)
}

/// Extract all recognized fields from in-memory log text.
pub fn extract_from_text(text: &str) -> Result<BenchRecord, ExtractError> {
    let mut record = BenchRecord::default();

    if let Some(caps) = BENCHMARK_NAME.captures(text) {
        record.benchmark = Some(caps[1].to_string());
    }

    if let Some(caps) = SCORE_ERROR.captures(text) {
        record.score = Some(parse_number(&caps[1])?);
        record.error_percent = Some(parse_number(&caps[2])?);
        record.error = Some(parse_number(&caps[3])?);
    }

    if let Some(caps) = MIN_AVG_MAX.captures(text) {
        record.min = Some(parse_number(&caps[1])?);
        record.avg = Some(parse_number(&caps[2])?);
        record.max = Some(parse_number(&caps[3])?);
    }

    tracing::debug!(?record, "extraction finished");
    Ok(record)
}

/// Extract from `path`, printing a human-readable message on failure.
///
/// Returns `None` on any error; the caller only learns that nothing was
/// extracted.
pub fn extract_or_report(path: &Path) -> Option<BenchRecord> {
    match extract(path) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::debug!(error = ?e, path = %path.display(), "extraction failed");
            println!("{e}");
            None
        }
    }
}

fn parse_number(s: &str) -> Result<f64, ExtractError> {
    s.parse::<f64>()
        .map_err(|e| ExtractError::ParseFailure(format!("could not convert '{s}' to float: {e}")))
}
