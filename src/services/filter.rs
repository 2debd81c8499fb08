//! Pick record filtering applied before trip aggregation
//!
//! Drops, in order: full-pull trip types, records outside the storage area,
//! every record of a trip that touches an excluded pick slot, records in
//! excluded trip categories, and records with no label under the grouping key.

use crate::domain::{CategoryKey, PickRecord, TripId};
use crate::infra::config::FilterConfig;
use rustc_hash::FxHashSet;
use tracing::{info, warn};

/// Records that survived filtering, plus drop counts per rule
#[derive(Debug, Default)]
pub struct FilterOutcome {
    pub kept: Vec<PickRecord>,
    pub dropped_full_pull: usize,
    pub dropped_area: usize,
    pub dropped_pick_slot: usize,
    pub dropped_category: usize,
    /// No trip category while grouping by trip category
    pub dropped_uncategorized: usize,
}

impl FilterOutcome {
    pub fn dropped(&self) -> usize {
        self.dropped_full_pull
            + self.dropped_area
            + self.dropped_pick_slot
            + self.dropped_category
            + self.dropped_uncategorized
    }
}

pub struct PickFilter<'a> {
    config: &'a FilterConfig,
    group_by: CategoryKey,
}

impl<'a> PickFilter<'a> {
    pub fn new(config: &'a FilterConfig, group_by: CategoryKey) -> Self {
        Self { config, group_by }
    }

    pub fn apply(&self, records: Vec<PickRecord>) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();
        let mut candidates = Vec::with_capacity(records.len());

        for record in records {
            if record.trip_type == self.config.full_pull_label {
                outcome.dropped_full_pull += 1;
            } else if record.whse_area != self.config.storage_label {
                outcome.dropped_area += 1;
            } else {
                candidates.push(record);
            }
        }

        let tainted: FxHashSet<TripId> = candidates
            .iter()
            .filter(|r| {
                r.pick_slot
                    .as_ref()
                    .is_some_and(|slot| self.config.excluded_pick_slots.contains(slot))
            })
            .map(|r| r.trip.clone())
            .collect();

        for record in candidates {
            if tainted.contains(&record.trip) {
                outcome.dropped_pick_slot += 1;
            } else if record
                .trip_category
                .as_ref()
                .is_some_and(|c| self.config.excluded_categories.contains(c))
            {
                outcome.dropped_category += 1;
            } else if self.group_by.label(&record).is_none() {
                outcome.dropped_uncategorized += 1;
            } else {
                outcome.kept.push(record);
            }
        }

        info!(
            kept = outcome.kept.len(),
            full_pull = outcome.dropped_full_pull,
            non_storage = outcome.dropped_area,
            excluded_slot_trips = tainted.len(),
            excluded_slot_records = outcome.dropped_pick_slot,
            excluded_category = outcome.dropped_category,
            uncategorized = outcome.dropped_uncategorized,
            "pick_records_filtered"
        );
        if outcome.dropped_uncategorized > 0 {
            warn!(
                records = outcome.dropped_uncategorized,
                group_by = self.group_by.as_str(),
                "records_without_category_dropped"
            );
        }

        outcome
    }
}

#[cfg(test)]
pub(crate) fn pick(trip: &str, item: &str, trip_type: &str, area: &str) -> PickRecord {
    use crate::domain::ItemId;
    PickRecord {
        trip: TripId(trip.into()),
        item: ItemId(item.into()),
        trip_type: trip_type.into(),
        whse_area: area.into(),
        trip_category: None,
        pick_slot: None,
    }
}
