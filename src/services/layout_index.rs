//! Lookup tables built from the layout table
//!
//! Built once per run and read-only afterwards. Duplicate item rows keep the
//! first occurrence; later rows for the same item are dropped, as are later
//! coordinates for an already-seen slot.

use crate::domain::{ItemId, LayoutRow, Point, SlotId};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, info};

/// Item → slot, slot → coordinate, item → pick sequence
#[derive(Debug, Default)]
pub struct LayoutIndex {
    item_to_slot: FxHashMap<ItemId, SlotId>,
    item_to_seq: FxHashMap<ItemId, i64>,
    slot_to_coord: FxHashMap<SlotId, Option<Point>>,
    duplicate_items: usize,
}

impl LayoutIndex {
    pub fn build<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = LayoutRow>,
    {
        let mut index = Self::default();

        for row in rows {
            match index.item_to_slot.entry(row.item.clone()) {
                Entry::Occupied(existing) => {
                    debug!(
                        item = %row.item,
                        kept_slot = %existing.get(),
                        dropped_slot = %row.slot,
                        "duplicate_layout_item_dropped"
                    );
                    index.duplicate_items += 1;
                    continue;
                }
                Entry::Vacant(entry) => {
                    entry.insert(row.slot.clone());
                }
            }

            if let Some(seq) = row.pick_seq {
                index.item_to_seq.insert(row.item, seq);
            }

            let coord = match (row.x, row.y) {
                (Some(x), Some(y)) => Some(Point::new(x, y)),
                _ => None,
            };
            index.slot_to_coord.entry(row.slot).or_insert(coord);
        }

        info!(
            items = index.item_to_slot.len(),
            slots = index.slot_to_coord.len(),
            sequenced_items = index.item_to_seq.len(),
            duplicate_items = index.duplicate_items,
            "layout_index_built"
        );

        index
    }

    pub fn slot_of(&self, item: &ItemId) -> Option<&SlotId> {
        self.item_to_slot.get(item)
    }

    pub fn pick_seq_of(&self, item: &ItemId) -> Option<i64> {
        self.item_to_seq.get(item).copied()
    }

    /// Coordinate of a slot; None if the slot is unknown or has no X/Y
    pub fn coord_of(&self, slot: &SlotId) -> Option<Point> {
        self.slot_to_coord.get(slot).copied().flatten()
    }

    pub fn item_count(&self) -> usize {
        self.item_to_slot.len()
    }

    pub fn slot_count(&self) -> usize {
        self.slot_to_coord.len()
    }

    /// Layout rows dropped because their item was already mapped
    pub fn duplicate_items(&self) -> usize {
        self.duplicate_items
    }
}

#[cfg(test)]
pub(crate) fn row(item: &str, slot: &str, x: f64, y: f64, seq: i64) -> LayoutRow {
    LayoutRow {
        item: ItemId(item.into()),
        slot: SlotId(slot.into()),
        x: Some(x),
        y: Some(y),
        pick_seq: Some(seq),
    }
}
