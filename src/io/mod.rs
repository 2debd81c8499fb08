//! IO modules - tables in, reports and images out
//!
//! - `tables` - CSV loading of the layout and pick tables
//! - `report` - Per-trip/per-category CSV and route JSON output
//! - `render` - PNG rendering of the longest route

pub mod render;
pub mod report;
pub mod tables;

// Re-export commonly used types
pub use render::RouteRenderer;
pub use report::ReportWriter;
pub use tables::{load_layout, load_picks, read_layout, read_picks};
