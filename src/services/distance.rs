//! Aisle-constrained hybrid distance (ACHD) between pick slots
//!
//! Resolution order for a pair of slots:
//! 1. identical identifiers: 0
//! 2. either slot without a coordinate: 0 (degraded, counted)
//! 3. same aisle prefix: straight-line distance / divisor
//! 4. different aisles: walk vertically to a crossover line, across to the
//!    target X, then vertically to the target Y. The cheapest configured line
//!    wins; on equal cost the first line in configured order is kept.

use crate::domain::{Point, SlotId};
use crate::infra::config::LayoutConfig;
use crate::infra::metrics::{PairKind, RunMetrics};
use crate::services::layout_index::LayoutIndex;
use smallvec::{smallvec, SmallVec};
use std::sync::Arc;
use tracing::debug;

/// Cheapest crossover line for a cross-aisle hop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossover {
    pub y: f64,
    /// L1 length of the elbow path, in raw layout units
    pub cost: f64,
}

/// Pick the crossover line minimising |y1 - c| + |x1 - x2| + |c - y2|.
///
/// Returns None when no line is configured.
pub fn best_crossover(from: Point, to: Point, lines: &[f64]) -> Option<Crossover> {
    let dx = (from.x - to.x).abs();
    let mut best: Option<Crossover> = None;
    for &y in lines {
        let cost = (from.y - y).abs() + dx + (y - to.y).abs();
        if best.map_or(true, |b| cost < b.cost) {
            best = Some(Crossover { y, cost });
        }
    }
    best
}

/// Geometry of one hop between consecutive stops
#[derive(Debug, Clone, PartialEq)]
pub enum Hop {
    Identical,
    /// Zero-length because layout data was missing
    Degraded(PairKind),
    Straight { from: Point, to: Point },
    Elbow { from: Point, to: Point, crossover: Crossover },
}

impl Hop {
    pub fn kind(&self) -> PairKind {
        match self {
            Hop::Identical => PairKind::Identical,
            Hop::Degraded(kind) => *kind,
            Hop::Straight { .. } => PairKind::SameAisle,
            Hop::Elbow { .. } => PairKind::CrossAisle,
        }
    }

    /// Length in raw layout units (before the divisor)
    pub fn raw_length(&self) -> f64 {
        match self {
            Hop::Identical | Hop::Degraded(_) => 0.0,
            Hop::Straight { from, to } => from.euclidean(to),
            Hop::Elbow { crossover, .. } => crossover.cost,
        }
    }

    /// Walking polyline for this hop; empty for zero-length hops
    pub fn waypoints(&self) -> SmallVec<[Point; 4]> {
        match *self {
            Hop::Identical | Hop::Degraded(_) => SmallVec::new(),
            Hop::Straight { from, to } => smallvec![from, to],
            Hop::Elbow { from, to, crossover } => smallvec![
                from,
                Point::new(from.x, crossover.y),
                Point::new(to.x, crossover.y),
                to
            ],
        }
    }
}

/// ACHD calculator over a built `LayoutIndex`
pub struct DistanceEngine<'a> {
    index: &'a LayoutIndex,
    layout: &'a LayoutConfig,
    metrics: Option<Arc<RunMetrics>>,
}

impl<'a> DistanceEngine<'a> {
    pub fn new(index: &'a LayoutIndex, layout: &'a LayoutConfig) -> Self {
        Self { index, layout, metrics: None }
    }

    /// Create an engine that records every evaluation in `metrics`
    pub fn with_metrics(
        index: &'a LayoutIndex,
        layout: &'a LayoutConfig,
        metrics: Arc<RunMetrics>,
    ) -> Self {
        Self { index, layout, metrics: Some(metrics) }
    }

    pub fn index(&self) -> &LayoutIndex {
        self.index
    }

    pub fn divisor(&self) -> f64 {
        self.layout.distance_divisor
    }

    pub fn metrics(&self) -> Option<&RunMetrics> {
        self.metrics.as_deref()
    }

    /// Resolve the walking geometry between two slots
    pub fn hop(&self, a: &SlotId, b: &SlotId) -> Hop {
        if a == b {
            return Hop::Identical;
        }

        let (Some(from), Some(to)) = (self.index.coord_of(a), self.index.coord_of(b)) else {
            debug!(slot_a = %a, slot_b = %b, "missing_coordinates");
            return Hop::Degraded(PairKind::MissingCoord);
        };

        if a.same_aisle(b) {
            return Hop::Straight { from, to };
        }

        match best_crossover(from, to, &self.layout.crossover_y) {
            Some(crossover) => Hop::Elbow { from, to, crossover },
            None => {
                debug!(slot_a = %a, slot_b = %b, "no_crossover_lines_configured");
                Hop::Degraded(PairKind::MissingCoord)
            }
        }
    }

    /// Hop between two possibly-unmapped stops
    pub fn hop_between(&self, a: Option<&SlotId>, b: Option<&SlotId>) -> Hop {
        match (a, b) {
            (Some(a), Some(b)) => self.hop(a, b),
            _ => {
                debug!(
                    slot_a = a.map_or("-", |s| s.0.as_str()),
                    slot_b = b.map_or("-", |s| s.0.as_str()),
                    "unmapped_stop"
                );
                Hop::Degraded(PairKind::MissingSlot)
            }
        }
    }

    /// ACHD distance between two slots, in reported units
    pub fn distance(&self, a: &SlotId, b: &SlotId) -> f64 {
        self.length(&self.hop(a, b))
    }

    /// ACHD distance between two possibly-unmapped stops; unmapped gives 0
    pub fn distance_between(&self, a: Option<&SlotId>, b: Option<&SlotId>) -> f64 {
        self.length(&self.hop_between(a, b))
    }

    /// Reported length of a resolved hop, recorded in the run metrics
    pub fn length(&self, hop: &Hop) -> f64 {
        if let Some(metrics) = &self.metrics {
            metrics.record_pair(hop.kind());
        }
        hop.raw_length() / self.layout.distance_divisor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::layout_index::row;

    fn layout() -> LayoutConfig {
        LayoutConfig::default()
    }

    fn index() -> LayoutIndex {
        LayoutIndex::build([
            row("i-a1", "A1", 0.0, 0.0, 1),
            row("i-a2", "A2", 36.0, 48.0, 2),
            row("i-b1", "B1", 100.0, 2000.0, 3),
            row("i-c1", "C1", 500.0, 3500.0, 4),
        ])
    }

    fn slot(s: &str) -> SlotId {
        SlotId(s.into())
    }

    #[test]
    fn test_identical_slot_is_zero() {
        let index = index();
        let layout = layout();
        let engine = DistanceEngine::new(&index, &layout);
        for s in ["A1", "A2", "B1", "C1", "UNKNOWN7"] {
            assert_eq!(engine.distance(&slot(s), &slot(s)), 0.0);
        }
    }

    #[test]
    fn test_same_aisle_is_euclidean_over_divisor() {
        let index = index();
        let layout = layout();
        let engine = DistanceEngine::new(&index, &layout);
        // 3-4-5 triangle scaled by 12
        assert_eq!(engine.distance(&slot("A1"), &slot("A2")), 5.0);
    }

    #[test]
    fn test_cross_aisle_hand_computed() {
        let index = index();
        let layout = layout();
        let engine = DistanceEngine::new(&index, &layout);
        // Costs per line: 2100, 2100, 4150, 5870
        assert_eq!(engine.distance(&slot("A1"), &slot("B1")), 175.0);
        match engine.hop(&slot("A1"), &slot("B1")) {
            Hop::Elbow { crossover, .. } => assert_eq!(crossover.y, 109.0),
            other => panic!("expected elbow, got {other:?}"),
        }
    }

    #[test]
    fn test_symmetry() {
        let index = index();
        let layout = layout();
        let engine = DistanceEngine::new(&index, &layout);
        let slots = ["A1", "A2", "B1", "C1"];
        for a in slots {
            for b in slots {
                assert_eq!(
                    engine.distance(&slot(a), &slot(b)),
                    engine.distance(&slot(b), &slot(a)),
                    "{a} <-> {b}"
                );
            }
        }
    }

    #[test]
    fn test_missing_coordinate_degrades_to_zero() {
        let mut rows = vec![row("i-a1", "A1", 0.0, 0.0, 1)];
        let mut no_xy = row("i-b9", "B9", 0.0, 0.0, 2);
        no_xy.x = None;
        rows.push(no_xy);
        let index = LayoutIndex::build(rows);
        let layout = layout();
        let metrics = Arc::new(RunMetrics::new());
        let engine = DistanceEngine::with_metrics(&index, &layout, Arc::clone(&metrics));

        assert_eq!(engine.distance(&slot("A1"), &slot("B9")), 0.0);
        assert_eq!(engine.distance(&slot("A1"), &slot("NOPE1")), 0.0);
        assert_eq!(engine.distance_between(Some(&slot("A1")), None), 0.0);

        let summary = metrics.report();
        assert_eq!(summary.degraded_missing_coord, 2);
        assert_eq!(summary.degraded_missing_slot, 1);
    }

    #[test]
    fn test_unmapped_stop_either_side() {
        let index = index();
        let layout = layout();
        let engine = DistanceEngine::new(&index, &layout);
        let a1 = slot("A1");
        for (a, b) in [(None, Some(&a1)), (Some(&a1), None), (None, None)] {
            assert_eq!(engine.hop_between(a, b), Hop::Degraded(PairKind::MissingSlot));
        }
    }

    #[test]
    fn test_crossover_tie_keeps_first_line() {
        // Lines equidistant from both points
        let c = best_crossover(Point::new(0.0, 50.0), Point::new(10.0, 50.0), &[0.0, 100.0])
            .unwrap();
        assert_eq!(c.y, 0.0);
        assert_eq!(c.cost, 110.0);
    }

    #[test]
    fn test_no_crossover_lines() {
        assert_eq!(best_crossover(Point::new(0.0, 0.0), Point::new(1.0, 1.0), &[]), None);

        let index = index();
        let layout = LayoutConfig { crossover_y: vec![], distance_divisor: 12.0 };
        let engine = DistanceEngine::new(&index, &layout);
        assert_eq!(engine.distance(&slot("A1"), &slot("B1")), 0.0);
        assert_eq!(engine.distance(&slot("A1"), &slot("A2")), 5.0);
    }

    #[test]
    fn test_elbow_waypoints() {
        let index = index();
        let layout = layout();
        let engine = DistanceEngine::new(&index, &layout);
        let hop = engine.hop(&slot("A1"), &slot("B1"));
        let points = hop.waypoints();
        assert_eq!(
            points.as_slice(),
            &[
                Point::new(0.0, 0.0),
                Point::new(0.0, 109.0),
                Point::new(100.0, 109.0),
                Point::new(100.0, 2000.0),
            ]
        );
        assert!(engine.hop(&slot("A1"), &slot("A1")).waypoints().is_empty());
    }

    #[test]
    fn test_custom_divisor() {
        let index = index();
        let layout = LayoutConfig { crossover_y: vec![109.0], distance_divisor: 1.0 };
        let engine = DistanceEngine::new(&index, &layout);
        assert_eq!(engine.distance(&slot("A1"), &slot("A2")), 60.0);
        assert_eq!(engine.distance(&slot("A1"), &slot("B1")), 2100.0);
    }
}
