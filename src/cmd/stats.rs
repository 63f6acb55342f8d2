//! `stats`: prints the hourly departure report for a date range.

use std::fmt::Write as _;

use clap::Parser;
use thiserror::Error;

use crate::{
    config::AppConfig,
    models::{RecordParseError, StatisticsReport, parse_record_date},
    persistence::{PersistenceError, StatisticsSink, TextFileStatisticsSink},
};

/// Errors of the `stats` command.
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    /// A date argument is not `DD.MM.YYYY`.
    #[error("Invalid date argument: {0}")]
    Date(#[from] RecordParseError),
    /// The statistics file could not be read.
    #[error("Statistics error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Arguments of the `stats` command.
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// First date of the report, `DD.MM.YYYY`.
    #[arg(short, long)]
    pub from: String,
    /// Last date of the report (inclusive), `DD.MM.YYYY`.
    #[arg(short, long)]
    pub to: String,
    /// Read this file instead of the configured `statistics_path`.
    #[arg(long)]
    pub file: Option<String>,
}

/// Runs the command.
pub async fn execute(args: StatsArgs, config_dir: Option<&str>) -> Result<(), Error> {
    let from = parse_record_date(&args.from)?;
    let to = parse_record_date(&args.to)?;

    let path = match args.file {
        Some(file) => file.into(),
        None => AppConfig::new(config_dir)?.statistics_path,
    };
    tracing::debug!(path = %path.display(), %from, %to, "Reading statistics.");

    let sink = TextFileStatisticsSink::new(path);
    let records = sink.records_between(from, to).await?;
    let report = StatisticsReport::from_records(&records);

    print!("{}", render_report(&report, &args.from, &args.to));
    Ok(())
}

/// Renders the report as plain text, one block per date.
pub fn render_report(report: &StatisticsReport, from: &str, to: &str) -> String {
    if report.is_empty() {
        return format!("No records between {} and {}.\n", from.trim(), to.trim());
    }

    let mut out = String::new();
    for day in &report.days {
        let _ = writeln!(out, "{}", day.date.format(crate::models::hour::RECORD_DATE_FORMAT));
        for hour in &day.hours {
            let _ = writeln!(out, "  {}  {}", hour.hours, hour.count);
        }
        let _ = writeln!(out, "  total  {}", day.total);
        out.push('\n');
    }
    let _ = writeln!(out, "Total: {}", report.total);
    out
}
