//! Domain models - core warehouse types and the trip model
//!
//! This module contains the canonical data types used throughout the system:
//! - `SlotId`, `ItemId`, `TripId` - identifier newtypes
//! - `LayoutRow`, `PickRecord` - raw input rows
//! - `Trip`, `Stop` - a worker's ordered pick sequence
//! - `TripMetrics` - per-trip distance figures

pub mod trip;
pub mod types;

pub use trip::{Stop, Trip, TripMetrics};
pub use types::{CategoryKey, ItemId, LayoutRow, PickRecord, Point, SlotId, TripId};
