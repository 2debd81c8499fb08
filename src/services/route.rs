//! Longest-trip selection and walking path reconstruction
//!
//! The reconstructed route is what gets handed to the renderer: one polyline
//! per hop (straight for same-aisle hops, vertical-horizontal-vertical through
//! the chosen crossover line otherwise) plus start and end markers.

use crate::domain::{ItemId, Point, SlotId, TripId, TripMetrics};
use crate::error::{AnalysisError, Result};
use crate::services::aggregator::AnalyzedTrip;
use crate::services::distance::{DistanceEngine, Hop};
use serde::Serialize;
use tracing::{info, warn};

/// Position of the trip with the largest total distance.
///
/// Ties keep the first trip in iteration order. Trips with a non-finite
/// total are skipped. Fails when no trip is left.
pub fn longest_index<'t, I>(metrics: I) -> Result<usize>
where
    I: IntoIterator<Item = &'t TripMetrics>,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, m) in metrics.into_iter().enumerate() {
        if !m.total_distance.is_finite() {
            warn!(
                trip = %m.trip,
                total_distance = %m.total_distance,
                "non_finite_trip_total_skipped"
            );
            continue;
        }
        if best.map_or(true, |(_, total)| m.total_distance > total) {
            best = Some((i, m.total_distance));
        }
    }
    best.map(|(i, _)| i).ok_or(AnalysisError::EmptyTripSet)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStop {
    pub item: ItemId,
    pub slot: Option<SlotId>,
    pub pick_seq: Option<i64>,
    pub coord: Option<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteHop {
    pub from: SlotId,
    pub to: SlotId,
    /// Crossover line used, None for same-aisle hops
    pub crossover_y: Option<f64>,
    pub distance: f64,
    pub waypoints: Vec<Point>,
}

/// Walking path of one trip, ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub trip: TripId,
    pub category: String,
    pub title: String,
    pub total_distance: f64,
    pub stops: Vec<RouteStop>,
    pub hops: Vec<RouteHop>,
    pub start: Option<Point>,
    pub end: Option<Point>,
}

impl RoutePlan {
    /// All hop waypoints joined into one polyline, shared joints not repeated
    pub fn polyline(&self) -> Vec<Point> {
        let mut points: Vec<Point> = Vec::new();
        for hop in &self.hops {
            for p in &hop.waypoints {
                if points.last() != Some(p) {
                    points.push(*p);
                }
            }
        }
        points
    }
}

pub struct RouteSelector<'e, 'a> {
    engine: &'e DistanceEngine<'a>,
}

impl<'e, 'a> RouteSelector<'e, 'a> {
    pub fn new(engine: &'e DistanceEngine<'a>) -> Self {
        Self { engine }
    }

    /// Select the longest trip and reconstruct its path
    pub fn longest_route(&self, trips: &[AnalyzedTrip]) -> Result<RoutePlan> {
        let idx = longest_index(trips.iter().map(|t| &t.metrics))?;
        let plan = self.reconstruct(&trips[idx]);
        info!(
            trip = %plan.trip,
            category = %plan.category,
            total_distance = format!("{:.2}", plan.total_distance),
            stops = plan.stops.len(),
            hops = plan.hops.len(),
            "longest_trip_selected"
        );
        Ok(plan)
    }

    /// Rebuild the walking geometry of a trip in its visiting order.
    ///
    /// Hops with an unmapped stop or missing coordinate have no geometry and
    /// are left out, as are hops between identical slots.
    pub fn reconstruct(&self, analyzed: &AnalyzedTrip) -> RoutePlan {
        let index = self.engine.index();
        let stops: Vec<RouteStop> = analyzed
            .trip
            .stops
            .iter()
            .map(|s| RouteStop {
                item: s.item.clone(),
                slot: s.slot.clone(),
                pick_seq: s.pick_seq,
                coord: s.slot.as_ref().and_then(|slot| index.coord_of(slot)),
            })
            .collect();

        let mut hops = Vec::with_capacity(stops.len().saturating_sub(1));
        for pair in analyzed.trip.stops.windows(2) {
            let (Some(from), Some(to)) = (&pair[0].slot, &pair[1].slot) else {
                continue;
            };
            let hop = self.engine.hop(from, to);
            let crossover_y = match &hop {
                Hop::Elbow { crossover, .. } => Some(crossover.y),
                Hop::Straight { .. } => None,
                Hop::Identical | Hop::Degraded(_) => continue,
            };
            hops.push(RouteHop {
                from: from.clone(),
                to: to.clone(),
                crossover_y,
                distance: hop.raw_length() / self.engine.divisor(),
                waypoints: hop.waypoints().to_vec(),
            });
        }

        let metrics = &analyzed.metrics;
        RoutePlan {
            trip: metrics.trip.clone(),
            category: metrics.category.clone(),
            title: format!(
                "Longest trip {} ({}): {:.2} over {} picks",
                metrics.trip, metrics.category, metrics.total_distance, metrics.pick_count
            ),
            total_distance: metrics.total_distance,
            start: stops.iter().find_map(|s| s.coord),
            end: stops.iter().rev().find_map(|s| s.coord),
            stops,
            hops,
        }
    }
}
