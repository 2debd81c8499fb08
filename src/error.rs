//! Error type for table loading, analysis, and report output

use thiserror::Error;

/// Failures surfaced by the analysis pipeline.
///
/// Unmapped items and slots without coordinates are not errors; they degrade
/// to zero-distance hops and are counted in `RunMetrics`.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: &'static str, column: String },
    #[error("{table} table row {row}: column '{column}' has non-numeric value '{value}'")]
    InvalidNumber { table: &'static str, row: usize, column: String, value: String },
    #[error("no trips left after filtering; cannot select a longest trip")]
    EmptyTripSet,
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("route image: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
