//! Trip aggregation: group pick records into trips, order their stops, and
//! sum ACHD distances along the visiting order.

use crate::domain::{CategoryKey, PickRecord, Stop, Trip, TripId, TripMetrics};
use crate::infra::metrics::PairKind;
use crate::services::distance::DistanceEngine;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tracing::{debug, info};

/// A trip together with its computed metrics
#[derive(Debug, Clone)]
pub struct AnalyzedTrip {
    pub trip: Trip,
    pub metrics: TripMetrics,
}

pub struct TripAggregator<'e, 'a> {
    engine: &'e DistanceEngine<'a>,
    group_by: CategoryKey,
}

impl<'e, 'a> TripAggregator<'e, 'a> {
    pub fn new(engine: &'e DistanceEngine<'a>, group_by: CategoryKey) -> Self {
        Self { engine, group_by }
    }

    /// Partition records by (trip id, category label), resolving each item
    /// against the layout.
    ///
    /// A trip id whose records carry several labels yields one trip per
    /// label. Trips come back in order of first appearance with stops sorted
    /// by pick sequence. Records without a label are skipped.
    pub fn group(&self, records: &[PickRecord]) -> Vec<Trip> {
        let index = self.engine.index();
        let mut positions: FxHashMap<(&TripId, &str), usize> = FxHashMap::default();
        let mut trips: Vec<Trip> = Vec::new();
        let mut unlabeled = 0usize;

        for record in records {
            let Some(label) = self.group_by.label(record) else {
                unlabeled += 1;
                continue;
            };
            let pos = *positions.entry((&record.trip, label)).or_insert_with(|| {
                trips.push(Trip::new(record.trip.clone(), label));
                trips.len() - 1
            });

            trips[pos].stops.push(Stop {
                item: record.item.clone(),
                slot: index.slot_of(&record.item).cloned(),
                pick_seq: index.pick_seq_of(&record.item),
            });
        }

        for trip in &mut trips {
            trip.sort_stops();
        }

        let trip_ids: FxHashSet<&TripId> = positions.keys().map(|(id, _)| *id).collect();
        let split = trips.len() - trip_ids.len();
        if split > 0 {
            debug!(extra_trips = split, "trip_ids_split_across_categories");
        }
        if unlabeled > 0 {
            debug!(
                records = unlabeled,
                group_by = self.group_by.as_str(),
                "unlabeled_records_skipped"
            );
        }

        trips
    }

    /// Total ACHD distance over consecutive stops of an ordered trip
    pub fn measure(&self, trip: &Trip) -> TripMetrics {
        let mut total = 0.0;
        let mut degraded = 0;

        for pair in trip.stops.windows(2) {
            let hop = self.engine.hop_between(pair[0].slot.as_ref(), pair[1].slot.as_ref());
            if matches!(hop.kind(), PairKind::MissingSlot | PairKind::MissingCoord) {
                degraded += 1;
            }
            total += self.engine.length(&hop);
        }

        if let Some(metrics) = self.engine.metrics() {
            metrics.record_trip();
        }
        if degraded > 0 {
            debug!(trip = %trip.id, degraded_hops = degraded, "trip_has_zero_distance_hops");
        }

        TripMetrics::new(trip, total, degraded)
    }

    /// Group, order and measure every trip
    pub fn analyze(&self, records: &[PickRecord]) -> Vec<AnalyzedTrip> {
        let analyzed: Vec<AnalyzedTrip> = self
            .group(records)
            .into_iter()
            .map(|trip| {
                let metrics = self.measure(&trip);
                AnalyzedTrip { trip, metrics }
            })
            .collect();

        info!(records = records.len(), trips = analyzed.len(), "trips_analyzed");
        analyzed
    }
}

/// Distance statistics for one category of trips
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub trips: usize,
    pub total_distance: f64,
    pub mean_distance: f64,
    pub median_distance: f64,
    pub p90_distance: f64,
    pub max_distance: f64,
    pub mean_picks: f64,
}

impl CategorySummary {
    pub fn log(&self) {
        info!(
            category = %self.category,
            trips = self.trips,
            mean = format!("{:.2}", self.mean_distance),
            median = format!("{:.2}", self.median_distance),
            p90 = format!("{:.2}", self.p90_distance),
            "category_statistics"
        );
    }
}

/// Quantile with linear interpolation between closest ranks; `sorted` must
/// be ascending and non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Reduce trip metrics per category, categories in order of first appearance
pub fn summarize_by_category(metrics: &[TripMetrics]) -> Vec<CategorySummary> {
    let mut positions: FxHashMap<&str, usize> = FxHashMap::default();
    let mut groups: Vec<(&str, Vec<&TripMetrics>)> = Vec::new();

    for m in metrics {
        let pos = *positions.entry(m.category.as_str()).or_insert_with(|| {
            groups.push((m.category.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[pos].1.push(m);
    }

    groups
        .into_iter()
        .map(|(category, trips)| {
            let mut totals: Vec<f64> = trips.iter().map(|m| m.total_distance).collect();
            totals.sort_by(f64::total_cmp);
            let n = totals.len() as f64;
            let sum: f64 = totals.iter().sum();
            let picks: usize = trips.iter().map(|m| m.pick_count).sum();

            CategorySummary {
                category: category.to_string(),
                trips: trips.len(),
                total_distance: sum,
                mean_distance: sum / n,
                median_distance: quantile(&totals, 0.5),
                p90_distance: quantile(&totals, 0.9),
                max_distance: totals[totals.len() - 1],
                mean_picks: picks as f64 / n,
            }
        })
        .collect()
}
