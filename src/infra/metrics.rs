//! Run metrics for the distance engine
//!
//! Counters are atomics so the engine can record through `&self` while the
//! layout tables stay shared and read-only. All atomics use Relaxed ordering;
//! these are statistical counters only.

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

/// How a single distance evaluation was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    /// Both stops on the same slot
    Identical,
    SameAisle,
    CrossAisle,
    /// A stop had no slot in the layout
    MissingSlot,
    /// A slot had no coordinate, or no crossover line is configured
    MissingCoord,
}

/// Counters for one analysis run
#[derive(Debug, Default)]
pub struct RunMetrics {
    pairs_total: AtomicU64,
    identical: AtomicU64,
    same_aisle: AtomicU64,
    cross_aisle: AtomicU64,
    degraded_missing_slot: AtomicU64,
    degraded_missing_coord: AtomicU64,
    trips_analyzed: AtomicU64,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one distance evaluation
    #[inline]
    pub fn record_pair(&self, kind: PairKind) {
        self.pairs_total.fetch_add(1, Ordering::Relaxed);
        let counter = match kind {
            PairKind::Identical => &self.identical,
            PairKind::SameAisle => &self.same_aisle,
            PairKind::CrossAisle => &self.cross_aisle,
            PairKind::MissingSlot => &self.degraded_missing_slot,
            PairKind::MissingCoord => &self.degraded_missing_coord,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_trip(&self) {
        self.trips_analyzed.fetch_add(1, Ordering::Relaxed);
    }

    /// Pairs that contributed zero distance because data was missing
    pub fn degraded_pairs(&self) -> u64 {
        self.degraded_missing_slot.load(Ordering::Relaxed)
            + self.degraded_missing_coord.load(Ordering::Relaxed)
    }

    pub fn pairs_total(&self) -> u64 {
        self.pairs_total.load(Ordering::Relaxed)
    }

    /// Take a snapshot of all counters
    pub fn report(&self) -> MetricsSummary {
        MetricsSummary {
            pairs_total: self.pairs_total.load(Ordering::Relaxed),
            identical: self.identical.load(Ordering::Relaxed),
            same_aisle: self.same_aisle.load(Ordering::Relaxed),
            cross_aisle: self.cross_aisle.load(Ordering::Relaxed),
            degraded_missing_slot: self.degraded_missing_slot.load(Ordering::Relaxed),
            degraded_missing_coord: self.degraded_missing_coord.load(Ordering::Relaxed),
            trips_analyzed: self.trips_analyzed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of `RunMetrics`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSummary {
    pub pairs_total: u64,
    pub identical: u64,
    pub same_aisle: u64,
    pub cross_aisle: u64,
    pub degraded_missing_slot: u64,
    pub degraded_missing_coord: u64,
    pub trips_analyzed: u64,
}

impl MetricsSummary {
    pub fn degraded(&self) -> u64 {
        self.degraded_missing_slot + self.degraded_missing_coord
    }

    pub fn log(&self) {
        info!(
            trips = %self.trips_analyzed,
            pairs = %self.pairs_total,
            identical = %self.identical,
            same_aisle = %self.same_aisle,
            cross_aisle = %self.cross_aisle,
            degraded = %self.degraded(),
            "run_metrics"
        );
        if self.degraded() > 0 {
            warn!(
                missing_slot = %self.degraded_missing_slot,
                missing_coord = %self.degraded_missing_coord,
                "zero_distance_pairs_from_missing_layout_data"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = RunMetrics::new();
        assert_eq!(metrics.pairs_total(), 0);
        assert_eq!(metrics.degraded_pairs(), 0);
    }

    #[test]
    fn test_record_pair_kinds() {
        let metrics = RunMetrics::new();
        metrics.record_pair(PairKind::SameAisle);
        metrics.record_pair(PairKind::CrossAisle);
        metrics.record_pair(PairKind::CrossAisle);
        metrics.record_pair(PairKind::MissingSlot);
        metrics.record_pair(PairKind::MissingCoord);
        metrics.record_trip();

        let summary = metrics.report();
        assert_eq!(summary.pairs_total, 5);
        assert_eq!(summary.same_aisle, 1);
        assert_eq!(summary.cross_aisle, 2);
        assert_eq!(summary.degraded(), 2);
        assert_eq!(summary.trips_analyzed, 1);
        assert_eq!(metrics.degraded_pairs(), 2);
    }
}
