//! Trip data model: one worker's ordered sequence of picks

use crate::domain::types::{ItemId, SlotId, TripId};
use serde::Serialize;

/// Sort key for stops without a pick sequence; they go after every sequenced stop
pub const MISSING_SEQ: i64 = i64::MAX;

/// A single stop of a trip, resolved against the layout
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub item: ItemId,
    pub slot: Option<SlotId>, // None if the item is not in the layout
    pub pick_seq: Option<i64>,
}

impl Stop {
    #[inline]
    pub fn sort_key(&self) -> i64 {
        self.pick_seq.unwrap_or(MISSING_SEQ)
    }
}

/// A trip with its stops in visiting order
#[derive(Debug, Clone)]
pub struct Trip {
    pub id: TripId,
    pub category: String,
    pub stops: Vec<Stop>,
}

impl Trip {
    pub fn new(id: TripId, category: impl Into<String>) -> Self {
        Self { id, category: category.into(), stops: Vec::with_capacity(16) }
    }

    /// Order stops by pick sequence. Stable, so equal keys keep input order.
    pub fn sort_stops(&mut self) {
        self.stops.sort_by_key(Stop::sort_key);
    }
}

/// Per-trip distance figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripMetrics {
    pub trip: TripId,
    pub category: String,
    /// Sum of ACHD distances along the visiting order (feet)
    pub total_distance: f64,
    pub pick_count: usize,
    /// `total_distance / pick_count`, 0 for an empty trip
    pub avg_distance_per_pick: f64,
    /// `total_distance / max(hops, 1)`
    pub avg_distance_per_hop: f64,
    /// Hops that contributed 0 because a slot or coordinate was missing
    pub degraded_hops: usize,
}

impl TripMetrics {
    pub fn new(trip: &Trip, total_distance: f64, degraded_hops: usize) -> Self {
        let pick_count = trip.stops.len();
        let hops = pick_count.saturating_sub(1);
        let avg_distance_per_pick =
            if pick_count > 0 { total_distance / pick_count as f64 } else { 0.0 };
        Self {
            trip: trip.id.clone(),
            category: trip.category.clone(),
            total_distance,
            pick_count,
            avg_distance_per_pick,
            avg_distance_per_hop: total_distance / hops.max(1) as f64,
            degraded_hops,
        }
    }
}
