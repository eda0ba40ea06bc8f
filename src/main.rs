/// Command-line entry point for the bias monitoring service.
///
/// Subcommands:
///   report   <LOCATION> <START> <END>       per-horizon bias report
///   coverage <LOCATION> <START> <END>       data coverage diagnostics
///   spread   <LOCATION> <DATE> <HORIZON>    gridpoint disagreement for one key
///
/// Dates are YYYY-MM-DD. `--dev` runs against a seeded in-memory store
/// instead of Postgres; otherwise the connection string comes from
/// `DATABASE_URL` (dotenv is honored).

use chrono::NaiveDate;
use std::error::Error;

use biasmon_service::analysis::consensus::gridpoint_spread;
use biasmon_service::config::{self, AnalysisSettings};
use biasmon_service::dev_mode::DevMode;
use biasmon_service::locations;
use biasmon_service::logging::{self, DataSource, LogLevel};
use biasmon_service::report::build_report;
use biasmon_service::store::postgres::PgForecastStore;
use biasmon_service::store::ForecastStore;
use biasmon_service::verify::{print_summary, run_full_coverage};

const SETTINGS_PATH: &str = "./biasmon.toml";

fn main() {
    dotenv::dotenv().ok();
    logging::init_logger(LogLevel::Info, None, false);

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&args) {
        logging::error(DataSource::System, None, &e.to_string());
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let dev = args.iter().any(|a| a == "--dev");
    let positional: Vec<&String> = args[1..].iter().filter(|a| !a.starts_with("--")).collect();

    let Some(command) = positional.first() else {
        print_usage();
        return Ok(());
    };

    match command.as_str() {
        "report" => {
            let (location, start, end) = parse_range_args(&positional)?;
            let settings = AnalysisSettings::load_or_default(SETTINGS_PATH)?;
            let mut store = open_store(dev, &location, start)?;

            let rows = build_report(store.as_mut(), &location, start, end, &settings)?;
            print_report(&location, start, end, &rows);
        }
        "coverage" => {
            let (location, start, end) = parse_range_args(&positional)?;
            let settings = AnalysisSettings::load_or_default(SETTINGS_PATH)?;
            let mut store = open_store(dev, &location, start)?;

            let report =
                run_full_coverage(store.as_mut(), &location, start, end, settings.min_grid_count)?;
            print_summary(&report);

            let json = serde_json::to_string_pretty(&report)?;
            std::fs::write("coverage_report.json", json)?;
            println!("\n📄 Full report saved to: coverage_report.json");
        }
        "spread" => {
            let location = resolve_location(&positional, 1)?;
            let date = parse_date(&positional, 2)?;
            let horizon: u32 = positional
                .get(3)
                .ok_or("missing HORIZON argument")?
                .parse()
                .map_err(|_| "HORIZON must be an integer 0-9")?;
            let mut store = open_store(dev, &location, date)?;

            let forecasts = store.query_grid_forecasts(&location, date, horizon)?;
            match gridpoint_spread(&forecasts) {
                Some(spread) => {
                    println!("\nGridpoint spread for {} on {} (horizon {}):", location, date, horizon);
                    println!("  Gridpoints: {}", spread.grid_count);
                    println!("  High range: {:.1}°F  std: {}", spread.high_range, fmt_std(spread.high_std));
                    println!("  Low range:  {:.1}°F  std: {}", spread.low_range, fmt_std(spread.low_std));
                }
                None => println!("No forecasts recorded for {} on {} at horizon {}", location, date, horizon),
            }
        }
        other => {
            print_usage();
            return Err(format!("unknown command '{}'", other).into());
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Argument handling
// ---------------------------------------------------------------------------

fn parse_range_args(positional: &[&String]) -> Result<(String, NaiveDate, NaiveDate), Box<dyn Error>> {
    let location = resolve_location(positional, 1)?;
    let start = parse_date(positional, 2)?;
    let end = parse_date(positional, 3)?;
    Ok((location, start, end))
}

fn resolve_location(positional: &[&String], index: usize) -> Result<String, Box<dyn Error>> {
    let id = positional.get(index).ok_or("missing LOCATION argument")?;
    if locations::find_location(id).is_none() {
        logging::warn(
            DataSource::System,
            Some(id),
            "location is not in the registry; querying anyway",
        );
    }
    Ok(id.to_string())
}

fn parse_date(positional: &[&String], index: usize) -> Result<NaiveDate, Box<dyn Error>> {
    let raw = positional.get(index).ok_or("missing date argument")?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a YYYY-MM-DD date", raw).into())
}

/// Opens the Postgres store, or a seeded memory store under `--dev`.
fn open_store(
    dev: bool,
    location: &str,
    start: NaiveDate,
) -> Result<Box<dyn ForecastStore>, Box<dyn Error>> {
    if dev {
        logging::info(
            DataSource::System,
            Some(location),
            "dev mode: using seeded in-memory store",
        );
        return Ok(Box::new(DevMode::new(45).seed_store(location, start)));
    }

    let url = config::database_url()?;
    let store = PgForecastStore::connect(&url).inspect_err(|e| {
        logging::log_store_failure(location, "connect", e);
    })?;
    Ok(Box::new(store))
}

// ---------------------------------------------------------------------------
// Console output
// ---------------------------------------------------------------------------

fn print_report(
    location: &str,
    start: NaiveDate,
    end: NaiveDate,
    rows: &[biasmon_service::report::ReportRow],
) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("📊 BIAS REPORT — {} ({} to {})", location, start, end);
    println!("═══════════════════════════════════════════════════════════");

    if rows.is_empty() {
        println!("\nNo horizon had any matched days in this range.");
        println!("Run the coverage command to see where the data is missing.");
        return;
    }

    println!();
    println!("Horizon   Days   Mean High   Mean Low   MAE High   MAE Low   Detected");
    for row in rows {
        let detected = match (row.high_bias_detected, row.low_bias_detected) {
            (true, true) => "high+low",
            (true, false) => "high",
            (false, true) => "low",
            (false, false) => "-",
        };
        println!(
            "{:>7}   {:>4}   {:>+9.2}   {:>+8.2}   {:>8.2}   {:>7.2}   {}",
            row.horizon_days,
            row.n_days,
            row.mean_high_bias,
            row.mean_low_bias,
            row.mae_high,
            row.mae_low,
            detected
        );
    }
    println!("═══════════════════════════════════════════════════════════");
}

fn fmt_std(std: Option<f64>) -> String {
    match std {
        Some(v) => format!("{:.2}", v),
        None => "n/a".to_string(),
    }
}

fn print_usage() {
    println!("Usage:");
    println!("  biasmon_service report   <LOCATION> <START> <END> [--dev]");
    println!("  biasmon_service coverage <LOCATION> <START> <END> [--dev]");
    println!("  biasmon_service spread   <LOCATION> <DATE> <HORIZON> [--dev]");
    println!();
    println!("Dates are YYYY-MM-DD. Without --dev, DATABASE_URL must point at");
    println!("the forecast database (a .env file is honored).");
    println!();
    println!("Known locations: {}", locations::all_location_ids().join(", "));
}
