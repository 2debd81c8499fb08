//! End-to-end analysis run
//!
//! tables → LayoutIndex → PickFilter → TripAggregator (DistanceEngine) →
//! category summaries → RouteSelector → reports and route image.

use crate::domain::{LayoutRow, PickRecord};
use crate::error::Result;
use crate::infra::config::Config;
use crate::infra::metrics::{MetricsSummary, RunMetrics};
use crate::io::render::RouteRenderer;
use crate::io::report::ReportWriter;
use crate::io::tables;
use crate::services::aggregator::{
    summarize_by_category, AnalyzedTrip, CategorySummary, TripAggregator,
};
use crate::services::distance::DistanceEngine;
use crate::services::filter::PickFilter;
use crate::services::layout_index::LayoutIndex;
use crate::services::route::{RoutePlan, RouteSelector};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub const ROUTE_IMAGE_FILE: &str = "longest_route.png";

/// Everything one run produces
#[derive(Debug)]
pub struct AnalysisOutput {
    pub trips: Vec<AnalyzedTrip>,
    pub categories: Vec<CategorySummary>,
    pub route: RoutePlan,
    pub metrics: MetricsSummary,
    pub records_kept: usize,
    pub records_dropped: usize,
    /// Files written, empty for in-memory runs
    pub files: Vec<PathBuf>,
}

/// Run the analysis over already-loaded tables, without touching the disk.
///
/// Fails with `EmptyTripSet` when no trip survives filtering.
pub fn analyze(
    config: &Config,
    layout_rows: Vec<LayoutRow>,
    picks: Vec<PickRecord>,
) -> Result<AnalysisOutput> {
    let index = LayoutIndex::build(layout_rows);
    let filtered = PickFilter::new(config.filter(), config.group_by()).apply(picks);
    let records_dropped = filtered.dropped();

    let metrics = Arc::new(RunMetrics::new());
    let engine = DistanceEngine::with_metrics(&index, config.layout(), Arc::clone(&metrics));

    let trips = TripAggregator::new(&engine, config.group_by()).analyze(&filtered.kept);

    let trip_metrics: Vec<_> = trips.iter().map(|t| t.metrics.clone()).collect();
    let categories = summarize_by_category(&trip_metrics);
    for summary in &categories {
        summary.log();
    }

    let route = RouteSelector::new(&engine).longest_route(&trips)?;

    let summary = metrics.report();
    summary.log();

    Ok(AnalysisOutput {
        trips,
        categories,
        route,
        metrics: summary,
        records_kept: filtered.kept.len(),
        records_dropped,
        files: Vec::new(),
    })
}

/// Load both tables, analyze, and write every report into the configured
/// output directory.
pub fn run_analysis(
    config: &Config,
    layout_path: impl AsRef<Path>,
    picks_path: impl AsRef<Path>,
) -> Result<AnalysisOutput> {
    // Both tables are loaded (and validated) before any distance work
    let layout_rows = tables::load_layout(layout_path, config.layout_columns())?;
    let picks = tables::load_picks(picks_path, config.pick_columns())?;

    let mut output = analyze(config, layout_rows, picks)?;

    let writer = ReportWriter::new(config.output_dir())?;
    let trip_metrics: Vec<_> = output.trips.iter().map(|t| t.metrics.clone()).collect();
    output.files.push(writer.write_trips(&trip_metrics)?);
    output.files.push(writer.write_categories(&output.categories)?);
    output.files.push(writer.write_route(&output.route)?);

    if config.render().enabled {
        let image_path = writer.output_dir().join(ROUTE_IMAGE_FILE);
        RouteRenderer::new(config.render(), config.crossover_y())
            .render_to_file(&output.route, &image_path)?;
        output.files.push(image_path);
    }

    info!(
        output_dir = %writer.output_dir().display(),
        files = output.files.len(),
        trips = output.trips.len(),
        longest_trip = %output.route.trip,
        "analysis_complete"
    );

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryKey;
    use crate::error::AnalysisError;
    use crate::services::filter::pick;
    use crate::services::layout_index::row;

    #[test]
    fn test_analyze_in_memory() {
        let layout = vec![
            row("a", "A1", 0.0, 0.0, 1),
            row("b", "A2", 0.0, 120.0, 2),
            row("c", "B1", 100.0, 2000.0, 3),
        ];
        let picks = vec![
            pick("T1", "a", "Cart", "Storage"),
            pick("T1", "b", "Cart", "Storage"),
            pick("T2", "a", "Cart", "Storage"),
            pick("T2", "c", "Cart", "Storage"),
            pick("T3", "c", "Full Pull", "Storage"),
        ];

        let config = Config::default().with_group_by(CategoryKey::TripType);
        let output = analyze(&config, layout, picks).unwrap();
        assert_eq!(output.trips.len(), 2);
        assert_eq!(output.records_kept, 4);
        assert_eq!(output.records_dropped, 1);
        assert_eq!(output.route.trip.0, "T2");
        assert_eq!(output.route.total_distance, 175.0);
        assert_eq!(output.metrics.trips_analyzed, 2);
        assert_eq!(output.metrics.degraded(), 0);
        assert!(output.files.is_empty());
    }

    #[test]
    fn test_analyze_everything_filtered_is_error() {
        let layout = vec![row("a", "A1", 0.0, 0.0, 1)];
        let picks = vec![pick("T1", "a", "Cart", "Dock")];
        let err = analyze(&Config::default(), layout, picks).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyTripSet));
    }

    #[test]
    fn test_analyze_by_category_leaves_out_uncategorized() {
        let layout = vec![row("a", "A1", 0.0, 0.0, 1), row("b", "A2", 0.0, 120.0, 2)];
        let mut categorized = vec![
            pick("T1", "a", "Cart", "Storage"),
            pick("T1", "b", "Cart", "Storage"),
        ];
        for record in &mut categorized {
            record.trip_category = Some("Single Cart".into());
        }
        let mut picks = categorized;
        picks.push(pick("T2", "a", "Cart", "Storage"));
        picks.push(pick("T2", "b", "Cart", "Storage"));

        let output = analyze(&Config::default(), layout, picks).unwrap();
        let categories: Vec<&str> = output.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(categories, ["Single Cart"]);
        assert_eq!(output.trips.len(), 1);
        assert_eq!(output.records_dropped, 2);
    }
}
