use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::{DateTime, FixedOffset, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use tailorshop_core::{DateRange, parse_utc_offset};
use tailorshop_observability::LogFormat;
use tailorshop_reporting::{DateFilter, ReportConfig, Snapshot};

/// Profit and cash-collection reports for the tailoring shop.
///
/// Reads a JSON snapshot `{"orders": [...], "bills": [...],
/// "daily_expenses": [...], "worker_expenses": [...]}` and prints the report
/// as JSON on stdout. Logs go to stderr.
#[derive(Debug, Parser)]
#[command(name = "tailorshop-report", author, version, about, long_about = None)]
struct Cli {
    /// Snapshot file; `-` or absent reads stdin.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// UTC offset of the reporting calendar, e.g. "+05:30". Defaults to
    /// $TAILORSHOP_UTC_OFFSET, then IST.
    #[arg(long, global = true, value_parser = offset)]
    utc_offset: Option<FixedOffset>,

    /// Log format on stderr: "json" or "compact".
    #[arg(long, global = true, default_value = "json")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Revenue, expenses and net profit for a scope.
    Profit(FilterArgs),
    /// One row per day with summary statistics.
    Daily(FilterArgs),
    /// Sunday-to-Saturday weeks with summary statistics.
    Weekly(FilterArgs),
    /// Advances and settled balances actually collected, net of expenses.
    Collections(FilterArgs),
}

#[derive(Debug, Args)]
struct FilterArgs {
    /// all, today, week, month, this-week, this-month, YYYY-MM-DD or
    /// YYYY-MM-DD..YYYY-MM-DD.
    #[arg(long, short = 's', default_value = "today")]
    scope: DateFilter,
}

fn offset(text: &str) -> Result<FixedOffset, String> {
    parse_utc_offset(text).map_err(|e| e.to_string())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tailorshop_observability::tracing::init(cli.log_format);

    let snapshot = match &cli.snapshot {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .with_context(|| format!("opening snapshot {}", path.display()))?;
            read_snapshot(BufReader::new(file))?
        }
        _ => read_snapshot(io::stdin().lock())?,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&cli, &snapshot, Utc::now(), &mut out)?;
    writeln!(out)?;
    Ok(())
}

fn read_snapshot<R: Read>(reader: R) -> anyhow::Result<Snapshot> {
    Snapshot::from_reader(reader).context("reading snapshot")
}

fn config(cli: &Cli) -> ReportConfig {
    let config = ReportConfig::from_env();
    match cli.utc_offset {
        Some(offset) => config.with_utc_offset(offset),
        None => config,
    }
}

/// Computes the requested report as of `now` and writes it as JSON.
fn run<W: Write>(
    cli: &Cli,
    snapshot: &Snapshot,
    now: DateTime<Utc>,
    out: &mut W,
) -> anyhow::Result<()> {
    let config = config(cli);
    let aggregator = config.aggregator();
    let bucketer = config.bucketer();

    match &cli.command {
        Commands::Profit(args) => {
            let scope = args.scope.resolve(&bucketer, now);
            emit(out, &aggregator.compute_profit(snapshot, scope))
        }
        Commands::Daily(args) => {
            let range = bounded(args, &bucketer, now)?;
            emit(out, &aggregator.daily_breakdown(snapshot, range))
        }
        Commands::Weekly(args) => {
            let range = bounded(args, &bucketer, now)?;
            emit(out, &aggregator.weekly_breakdown(snapshot, range))
        }
        Commands::Collections(args) => {
            let scope = args.scope.resolve(&bucketer, now);
            emit(out, &aggregator.compute_collections(snapshot, scope))
        }
    }
}

fn bounded(
    args: &FilterArgs,
    bucketer: &tailorshop_core::DayBucketer,
    now: DateTime<Utc>,
) -> anyhow::Result<DateRange> {
    match args.scope.range(bucketer, now) {
        Some(range) => Ok(range),
        None => bail!("breakdowns need a bounded scope, not all time"),
    }
}

fn emit<W: Write, T: Serialize>(out: &mut W, report: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report).context("writing report")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn snapshot() -> Snapshot {
        Snapshot::from_json(&json!({
            "orders": [
                {"id": 1, "bill_id": 10, "payment_status": "paid", "order_date": "2025-09-09",
                 "total_amt": 1500, "payment_amount": 500, "updated_at": "2025-09-09T12:00:00Z"}
            ],
            "bills": [{"id": 10, "total_amt": 1500, "today_date": "2025-09-09T10:00:00Z"}],
            "daily_expenses": [{"material_cost": 100, "Date": "2025-09-09"}],
            "worker_expenses": [{"Amt_Paid": 200, "date": "2025-09-09"}]
        }))
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-09-09T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn report(args: &[&str]) -> Value {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut out = Vec::new();
        run(&cli, &snapshot(), now(), &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn profit_defaults_to_today() {
        let value = report(&["tailorshop-report", "profit", "--utc-offset", "+05:30"]);
        assert_eq!(value["scope"], json!("2025-09-09"));
        assert_eq!(value["revenue"], json!(1500.0));
        assert_eq!(value["expenses"], json!(300.0));
        assert_eq!(value["net_profit"], json!(1200.0));
        assert_eq!(value["order_count"], json!(1));
    }

    #[test]
    fn daily_breakdown_over_an_explicit_range() {
        let value = report(&[
            "tailorshop-report",
            "daily",
            "--scope",
            "2025-09-08..2025-09-10",
            "--utc-offset",
            "+05:30",
        ]);
        let days = value["days"].as_array().unwrap();
        assert_eq!(days.len(), 3);
        assert_eq!(days[1]["date"], json!("2025-09-09"));
        assert_eq!(value["summary"]["best_day"], json!("2025-09-09"));
    }

    #[test]
    fn weekly_this_month_has_five_weeks() {
        let value = report(&[
            "tailorshop-report",
            "weekly",
            "-s",
            "this-month",
            "--utc-offset",
            "+05:30",
        ]);
        assert_eq!(value["weeks"].as_array().unwrap().len(), 5);
        assert_eq!(value["weeks"][1]["label"], json!("Week 2"));
    }

    #[test]
    fn collections_split_advance_and_balance() {
        let value = report(&["tailorshop-report", "collections", "--utc-offset", "+05:30"]);
        assert_eq!(value["advance"], json!(500.0));
        assert_eq!(value["remaining"], json!(1000.0));
        assert_eq!(value["net_cash"], json!(1200.0));
    }

    #[test]
    fn breakdown_rejects_all_time() {
        let cli = Cli::try_parse_from(["tailorshop-report", "daily", "--scope", "all"]).unwrap();
        let mut out = Vec::new();
        assert!(run(&cli, &snapshot(), now(), &mut out).is_err());
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(Cli::try_parse_from(["tailorshop-report", "profit", "--scope", "fortnight"]).is_err());
        assert!(Cli::try_parse_from(["tailorshop-report", "--utc-offset", "IST", "profit"]).is_err());
        assert!(Cli::try_parse_from(["tailorshop-report", "--log-format", "xml", "profit"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
