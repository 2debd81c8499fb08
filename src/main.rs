//! pick-distance - warehouse trip travel analysis
//!
//! Reads a slot layout table and a pick table (CSV), computes the
//! aisle-constrained hybrid distance (ACHD) of every trip, and writes:
//!   <output-dir>/trip_analysis_results_ALL_CATEGORIES.csv
//!   <output-dir>/category_summary.csv
//!   <output-dir>/longest_route.json
//!   <output-dir>/longest_route.png
//!
//! Usage:
//!   pick-distance --layout Layout.csv --picks PickData.csv
//!   pick-distance --config config/site.toml --layout Layout.csv --picks PickData.csv --no-render

use clap::Parser;
use pick_distance::domain::CategoryKey;
use pick_distance::infra::Config;
use pick_distance::services::run_analysis;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// pick-distance - aisle-aware travel distance per pick trip
#[derive(Parser, Debug)]
#[command(name = "pick-distance", version, about, long_about = None)]
struct Args {
    /// Path to TOML configuration file
    ///
    /// Falls back to the CONFIG_FILE environment variable, then to built-in
    /// defaults for the reference warehouse.
    #[arg(short, long)]
    config: Option<String>,

    /// Layout table (CSV) with item, slot, X, Y and pick sequence columns
    #[arg(short, long, default_value = "Layout.csv")]
    layout: String,

    /// Pick table (CSV) with trip, item, trip type and warehouse area columns
    #[arg(short, long, default_value = "PickData.csv")]
    picks: String,

    /// Directory for report output (overrides report.output_dir)
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Category key for summaries: trip_category, trip_type or whse_area
    /// (overrides report.group_by)
    #[arg(short, long)]
    group_by: Option<CategoryKey>,

    /// Skip rendering the longest route image
    #[arg(long)]
    no_render: bool,
}

fn main() -> ExitCode {
    // Default: INFO, use RUST_LOG=debug to see every zero-distance pair
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), git = env!("GIT_HASH"), "pick_distance_starting");

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref());
    if let Some(dir) = args.output_dir {
        config = config.with_output_dir(dir);
    }
    if let Some(group_by) = args.group_by {
        config = config.with_group_by(group_by);
    }
    if args.no_render {
        config = config.without_render();
    }

    info!(
        config_file = %config.config_file(),
        layout = %args.layout,
        picks = %args.picks,
        crossover_y = ?config.crossover_y(),
        distance_divisor = %config.distance_divisor(),
        group_by = %config.group_by().as_str(),
        output_dir = %config.output_dir(),
        render = %config.render().enabled,
        "config_loaded"
    );

    match run_analysis(&config, &args.layout, &args.picks) {
        Ok(output) => {
            info!(
                trips = output.trips.len(),
                categories = output.categories.len(),
                longest_trip = %output.route.trip,
                longest_distance = format!("{:.2}", output.route.total_distance),
                degraded_pairs = output.metrics.degraded(),
                "pick_distance_done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "analysis_failed");
            ExitCode::FAILURE
        }
    }
}
