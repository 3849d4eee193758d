use anyhow::Result;
use chrono::{Days, NaiveDate, Utc};
use clap::Parser;
use recount_config::{GratiaPassword, ReconcileConfig};
use recount_core::{run_range, DateRange};
use recount_report::ReportWriter;
use recount_sources::{GraccLedger, GratiaLedger};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recount")]
#[command(about = "Compare gracc and gratia record counts by day", long_about = None)]
struct Cli {
    /// Start date (YYYY-MM-DD). Defaults to 31 days before today.
    #[arg(short = 's', long, value_parser = parse_date)]
    start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD), inclusive. Defaults to yesterday.
    #[arg(short = 'e', long, value_parser = parse_date)]
    end: Option<NaiveDate>,

    /// Gratia DB password. Falls back to the env var named in config.
    #[arg(short = 'p', long)]
    password: Option<String>,

    /// Raise log verbosity to debug.
    #[arg(short = 'v', long, default_value_t = false)]
    verbose: bool,

    /// Config layer(s) in merge order; later files override earlier ones.
    /// Built-in defaults apply when none are given.
    #[arg(long = "config")]
    config_paths: Vec<PathBuf>,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{s}': expected YYYY-MM-DD ({e})"))
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Dev-time .env bootstrap; a missing file is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ReconcileConfig::load_layered(&cli.config_paths)?;
    let password = GratiaPassword::resolve(cli.password.as_deref(), &config.gratia.password_env)?;

    let today = Utc::now().date_naive();
    let range = DateRange::new(
        cli.start.unwrap_or_else(|| today - Days::new(31)),
        cli.end.unwrap_or_else(|| today - Days::new(1)),
    );
    tracing::info!(start = %range.start, end = %range.end, "reconciling record counts");

    // Both clients are built once and reused for the whole run.
    let gratia = GratiaLedger::connect(&config.gratia, &password).await?;
    let gracc = GraccLedger::connect(&config.gracc)?;

    let mut writer = ReportWriter::initialize(
        &config.report.file,
        &config.report.backup_file,
        Utc::now(),
    )?;

    let outcome = run_range(&range, &gratia, &gracc, &mut writer).await;

    gratia.close().await;

    match outcome {
        Ok(summary) => {
            writer.finalize(true)?;
            println!("report={}", config.report.file.display());
            println!("days={}", summary.days_requested);
            println!("rows_written={}", summary.rows_written);
            println!("undefined_days={}", summary.undefined_days);
            println!("success=true");
            Ok(())
        }
        Err(e) => {
            // No terminal marker: the next run's initialize() preserves the
            // partial report as a backup.
            writer.finalize(false).ok();
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_parser_accepts_iso_dates() {
        assert_eq!(
            parse_date("2020-01-31").unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 31).unwrap()
        );
    }

    #[test]
    fn date_parser_rejects_garbage() {
        assert!(parse_date("2020-13-01").is_err());
        assert!(parse_date("01/31/2020").is_err());
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn cli_parses_short_and_long_flags() {
        let cli = Cli::parse_from([
            "recount", "-s", "2020-01-01", "-e", "2020-01-03", "-p", "pw", "-v",
        ]);
        assert_eq!(cli.start.unwrap().to_string(), "2020-01-01");
        assert_eq!(cli.end.unwrap().to_string(), "2020-01-03");
        assert_eq!(cli.password.as_deref(), Some("pw"));
        assert!(cli.verbose);
        assert!(cli.config_paths.is_empty());
    }
}
