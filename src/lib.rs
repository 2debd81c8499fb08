//! Pick distance analyzer library
//!
//! Computes aisle-constrained hybrid distances (ACHD) between warehouse pick
//! slots, totals them per trip, and reconstructs the longest trip's path.
//! Exposes modules for integration testing and binary reuse.

pub mod domain;
pub mod error;
pub mod infra;
pub mod io;
pub mod services;

pub use error::{AnalysisError, Result};
