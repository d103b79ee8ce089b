mod config;
mod extract;
mod report;

use clap::Parser;
use config::{ExtractorConfig, DEFAULT_CONFIG_FILE};
use report::OutputFormat;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Extract the benchmark name, score, error bounds and min/avg/max
/// statistics from a JMH-style benchmark log.
#[derive(Parser, Debug)]
#[command(name = "jmh-extract", version, about)]
pub struct Cli {
    /// Benchmark log file to read
    #[arg(value_name = "LOG_FILE")]
    log_file: PathBuf,

    /// Output format (default: from config, else map)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Config file path [default: jmh-extract.toml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

/// Output settings after CLI overrides are applied to the config.
#[derive(Debug, PartialEq)]
struct Resolved {
    format: OutputFormat,
    pretty: bool,
    log_level: String,
}

fn resolve(cli: &Cli, cfg: &ExtractorConfig) -> Resolved {
    let log_level = if cli.verbose {
        "debug".to_string()
    } else if cli.quiet {
        "error".to_string()
    } else {
        cfg.logging.level.clone()
    };

    Resolved {
        format: cli.format.unwrap_or(cfg.output.format),
        pretty: cli.pretty || cfg.output.pretty,
        log_level,
    }
}

/// Text to print on stdout for a record, or `None` when there is nothing to
/// show. An empty record prints nothing in map form; the JSON forms always
/// emit a document so consumers can parse the output.
fn stdout_output(
    record: &extract::BenchRecord,
    settings: &Resolved,
    source: &Path,
) -> Result<Option<String>, serde_json::Error> {
    if settings.format == OutputFormat::Map && record.is_empty() {
        return Ok(None);
    }
    report::render(record, settings.format, settings.pretty, source).map(Some)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config_path, explicit) = match &cli.config {
        Some(p) => (p.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    let cfg = match ExtractorConfig::load(&config_path, explicit) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {e}", config_path.display());
            return ExitCode::FAILURE;
        }
    };
    let settings = resolve(&cli, &cfg);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    tracing::debug!(?cli, ?settings, "parsed CLI arguments");

    let Some(record) = extract::extract_or_report(&cli.log_file) else {
        return ExitCode::FAILURE;
    };

    match stdout_output(&record, &settings, &cli.log_file) {
        Ok(Some(out)) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Ok(None) => {
            tracing::info!(path = %cli.log_file.display(), "no benchmark fields found");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to render record");
            println!("An error occurred: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_log_file() {
        assert!(Cli::try_parse_from(["jmh-extract"]).is_err());
    }

    #[test]
    fn test_cli_rejects_extra_positional() {
        assert!(Cli::try_parse_from(["jmh-extract", "a.log", "b.log"]).is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["jmh-extract", "run.log"]).unwrap();
        assert_eq!(cli.log_file, PathBuf::from("run.log"));
        assert!(cli.format.is_none());
        assert!(cli.config.is_none());
        assert!(!cli.pretty);
    }

    #[test]
    fn test_cli_format_flag() {
        let cli = Cli::try_parse_from(["jmh-extract", "-f", "bench", "run.log"]).unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Bench));
        assert!(Cli::try_parse_from(["jmh-extract", "--format", "csv", "run.log"]).is_err());
    }

    #[test]
    fn test_cli_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["jmh-extract", "-v", "-q", "run.log"]).is_err());
    }

    #[test]
    fn test_resolve_uses_config_when_no_flags() {
        let cli = Cli::try_parse_from(["jmh-extract", "run.log"]).unwrap();
        let cfg = ExtractorConfig::parse("[output]\nformat = \"json\"\npretty = true\n").unwrap();
        assert_eq!(
            resolve(&cli, &cfg),
            Resolved {
                format: OutputFormat::Json,
                pretty: true,
                log_level: "warn".to_string(),
            }
        );
    }

    #[test]
    fn test_resolve_cli_overrides_config() {
        let cli = Cli::try_parse_from(["jmh-extract", "--format", "map", "-v", "run.log"]).unwrap();
        let cfg = ExtractorConfig::parse("[output]\nformat = \"bench\"\n").unwrap();
        let settings = resolve(&cli, &cfg);
        assert_eq!(settings.format, OutputFormat::Map);
        assert_eq!(settings.log_level, "debug");
    }

    fn settings(format: OutputFormat) -> Resolved {
        Resolved {
            format,
            pretty: false,
            log_level: "warn".to_string(),
        }
    }

    #[test]
    fn test_empty_record_prints_nothing_in_map_form() {
        let record = extract::extract_from_text("nothing").unwrap();
        let out = stdout_output(&record, &settings(OutputFormat::Map), Path::new("run.log"));
        assert_eq!(out.unwrap(), None);
    }

    #[test]
    fn test_empty_record_still_emits_json_documents() {
        let record = extract::BenchRecord::default();
        let source = Path::new("run.log");
        let json = stdout_output(&record, &settings(OutputFormat::Json), source).unwrap();
        assert_eq!(json.as_deref(), Some("{}"));
        let bench = stdout_output(&record, &settings(OutputFormat::Bench), source).unwrap();
        assert_eq!(bench.as_deref(), Some("[]"));
    }

    #[test]
    fn test_non_empty_record_prints_map() {
        let record = extract::extract_from_text("(min, avg, max) = (1.0, 2.0, 3.0)").unwrap();
        let out = stdout_output(&record, &settings(OutputFormat::Map), Path::new("run.log"));
        assert_eq!(
            out.unwrap().as_deref(),
            Some("{min: 1.0, avg: 2.0, max: 3.0}")
        );
    }

    #[test]
    fn test_resolve_quiet() {
        let cli = Cli::try_parse_from(["jmh-extract", "-q", "run.log"]).unwrap();
        let settings = resolve(&cli, &ExtractorConfig::default());
        assert_eq!(settings.log_level, "error");
        assert_eq!(settings.format, OutputFormat::Map);
    }
}
