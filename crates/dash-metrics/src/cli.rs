use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};

use crate::builders::MAX_SYNTHETIC_ROWS;
use crate::error::{MetricsError, MetricsResult};
use crate::synth::Domain;

#[derive(Debug, Parser)]
#[command(
    name = "dash-metrics",
    about = "deterministic dashboard metrics with locale-aware formatting"
)]
pub struct Args {
    #[arg(long, env = "DASH_METRICS_CONFIG")]
    pub config: Option<PathBuf>,
    #[arg(long, env = "DASH_METRICS_LOCALE")]
    pub locale: Option<String>,
    /// Directory of recorded API responses (`<domain>/<range>.json`).
    #[arg(long, env = "DASH_METRICS_FIXTURES")]
    pub fixtures_dir: Option<PathBuf>,
    #[arg(long, env = "DASH_METRICS_LOG", default_value = "warn")]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the multiplier and seed for every time range.
    Ranges {
        #[arg(long, default_value = "ads")]
        domain: String,
    },
    /// Build one view (or `all`) and print its JSON report.
    Generate {
        #[arg(long, default_value = "ads")]
        domain: String,
        #[arg(long)]
        range: Option<String>,
        /// Rows per table, at most 10000; defaults to the domain's natural size.
        #[arg(long)]
        count: Option<usize>,
        /// Last day of the reporting window, `YYYY-MM-DD`; defaults to today (UTC).
        #[arg(long)]
        as_of: Option<String>,
        #[arg(long, default_value = "local")]
        label: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Format a single value with one of the dashboard formatters.
    Format {
        #[arg(value_enum)]
        kind: FormatKind,
        #[arg(allow_hyphen_values = true)]
        value: f64,
    },
    Doctor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatKind {
    Percent,
    SignedPercent,
    Ratio,
    Currency,
    CompactCurrency,
    Number,
}

/// Report labels end up in file names, so only `[A-Za-z0-9._-]` is accepted.
pub fn validate_label(label: &str) -> MetricsResult<()> {
    let reject =
        |reason: String| -> MetricsResult<()> { Err(MetricsError::InvalidArgument(reason)) };
    match label {
        "" => reject("report label must not be empty".to_string()),
        "." | ".." => reject(format!("report label '{label}' is not allowed")),
        _ if label
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))) =>
        {
            reject(format!(
                "report label '{label}' contains invalid characters; allowed: [A-Za-z0-9._-]"
            ))
        }
        _ => Ok(()),
    }
}

pub fn validate_count(count: Option<usize>) -> MetricsResult<()> {
    match count {
        Some(n) if n == 0 || n > MAX_SYNTHETIC_ROWS => Err(MetricsError::InvalidArgument(
            format!("--count must be between 1 and {MAX_SYNTHETIC_ROWS}, got {n}"),
        )),
        _ => Ok(()),
    }
}

pub fn parse_domains(value: &str) -> MetricsResult<Vec<Domain>> {
    if value.trim() == "all" {
        return Ok(Domain::ALL.to_vec());
    }
    value
        .split(',')
        .map(|part| part.parse::<Domain>())
        .collect()
}

pub fn parse_as_of(value: Option<&str>) -> MetricsResult<NaiveDate> {
    match value {
        None => Ok(Utc::now().date_naive()),
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
            MetricsError::InvalidArgument(format!("invalid as-of date '{raw}': {e}"))
        }),
    }
}
