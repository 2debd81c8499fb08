//! Services - distance computation and trip analysis
//!
//! This module contains the core analysis services:
//! - `layout_index` - Item/slot/coordinate lookup tables
//! - `distance` - ACHD distance engine and crossover search
//! - `filter` - Pick record filtering rules
//! - `aggregator` - Trip grouping, ordering and distance totals
//! - `route` - Longest trip selection and path reconstruction
//! - `pipeline` - End-to-end analysis run

pub mod aggregator;
pub mod distance;
pub mod filter;
pub mod layout_index;
pub mod pipeline;
pub mod route;

// Re-export commonly used types
pub use aggregator::{summarize_by_category, AnalyzedTrip, CategorySummary, TripAggregator};
pub use distance::{best_crossover, Crossover, DistanceEngine, Hop};
pub use filter::{FilterOutcome, PickFilter};
pub use layout_index::LayoutIndex;
pub use pipeline::{run_analysis, AnalysisOutput};
pub use route::{longest_index, RoutePlan, RouteSelector};
