//! Report output: per-trip and per-category CSV tables plus the longest
//! route as JSON.
//!
//! Files written to the output directory:
//!   trip_analysis_results_ALL_CATEGORIES.csv
//!   category_summary.csv
//!   longest_route.json

use crate::domain::{Point, TripMetrics};
use crate::error::Result;
use crate::services::aggregator::CategorySummary;
use crate::services::route::RoutePlan;
use chrono::Utc;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const TRIPS_FILE: &str = "trip_analysis_results_ALL_CATEGORIES.csv";
pub const CATEGORIES_FILE: &str = "category_summary.csv";
pub const ROUTE_FILE: &str = "longest_route.json";

/// One line of the per-trip table
#[derive(Debug, Serialize)]
struct TripRow<'a> {
    #[serde(rename = "Trip_Category")]
    category: &'a str,
    #[serde(rename = "Trip")]
    trip: &'a str,
    #[serde(rename = "Total Distance")]
    total_distance: f64,
    #[serde(rename = "Average Distance")]
    avg_distance_per_pick: f64,
    #[serde(rename = "Average Hop Distance")]
    avg_distance_per_hop: f64,
    #[serde(rename = "Num Picks")]
    pick_count: usize,
    #[serde(rename = "Degraded Hops")]
    degraded_hops: usize,
}

impl<'a> From<&'a TripMetrics> for TripRow<'a> {
    fn from(m: &'a TripMetrics) -> Self {
        Self {
            category: &m.category,
            trip: &m.trip.0,
            total_distance: m.total_distance,
            avg_distance_per_pick: m.avg_distance_per_pick,
            avg_distance_per_hop: m.avg_distance_per_hop,
            pick_count: m.pick_count,
            degraded_hops: m.degraded_hops,
        }
    }
}

/// Route document handed to the renderer and kept next to the image
#[derive(Debug, Serialize)]
struct RouteDocument<'a> {
    generated_at: String,
    #[serde(flatten)]
    plan: &'a RoutePlan,
    polyline: Vec<Point>,
}

/// Writes report files into one output directory
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    /// Create the writer, creating the output directory if needed
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn write_trips(&self, metrics: &[TripMetrics]) -> Result<PathBuf> {
        let path = self.output_dir.join(TRIPS_FILE);
        let mut wtr = csv::Writer::from_path(&path)?;
        for m in metrics {
            wtr.serialize(TripRow::from(m))?;
        }
        wtr.flush()?;
        info!(path = %path.display(), trips = metrics.len(), "trip_report_written");
        Ok(path)
    }

    pub fn write_categories(&self, summaries: &[CategorySummary]) -> Result<PathBuf> {
        let path = self.output_dir.join(CATEGORIES_FILE);
        let mut wtr = csv::Writer::from_path(&path)?;
        for summary in summaries {
            wtr.serialize(summary)?;
        }
        wtr.flush()?;
        info!(path = %path.display(), categories = summaries.len(), "category_report_written");
        Ok(path)
    }

    pub fn write_route(&self, plan: &RoutePlan) -> Result<PathBuf> {
        let path = self.output_dir.join(ROUTE_FILE);
        let doc = RouteDocument {
            generated_at: Utc::now().to_rfc3339(),
            plan,
            polyline: plan.polyline(),
        };
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, &doc)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        info!(path = %path.display(), trip = %plan.trip, "route_written");
        Ok(path)
    }
}
