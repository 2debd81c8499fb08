//! CSV loading for the layout and pick tables
//!
//! Required columns are resolved from the header before any row is read, so a
//! malformed table fails up front. Empty or NaN numeric cells become None;
//! cells that are present but not a finite number are an error.

use crate::domain::{ItemId, LayoutRow, PickRecord, SlotId, TripId};
use crate::error::{AnalysisError, Result};
use crate::infra::config::{LayoutColumns, PickColumns};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

const LAYOUT: &str = "layout";
const PICKS: &str = "pick";

fn required(headers: &StringRecord, table: &'static str, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| AnalysisError::MissingColumn { table, column: name.to_string() })
}

fn optional(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn cell(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).filter(|v| !v.is_empty())
}

fn parse_f64(
    record: &StringRecord,
    idx: usize,
    table: &'static str,
    row: usize,
    column: &str,
) -> Result<Option<f64>> {
    let Some(raw) = cell(record, idx) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_nan() => Ok(None),
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(AnalysisError::InvalidNumber {
            table,
            row,
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Integer cell; spreadsheet exports may write whole numbers as "12.0"
fn parse_i64(
    record: &StringRecord,
    idx: usize,
    table: &'static str,
    row: usize,
    column: &str,
) -> Result<Option<i64>> {
    let Some(raw) = cell(record, idx) else {
        return Ok(None);
    };
    if let Ok(v) = raw.parse::<i64>() {
        return Ok(Some(v));
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_nan() => Ok(None),
        Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(Some(v as i64)),
        _ => Err(AnalysisError::InvalidNumber {
            table,
            row,
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Read layout rows from any CSV source
pub fn read_layout<R: Read>(reader: R, columns: &LayoutColumns) -> Result<Vec<LayoutRow>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let item_idx = required(&headers, LAYOUT, &columns.item)?;
    let slot_idx = required(&headers, LAYOUT, &columns.slot)?;
    let x_idx = required(&headers, LAYOUT, &columns.x)?;
    let y_idx = required(&headers, LAYOUT, &columns.y)?;
    let seq_idx = required(&headers, LAYOUT, &columns.pick_seq)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 2; // 1-based, after the header line

        let (Some(item), Some(slot)) = (cell(&record, item_idx), cell(&record, slot_idx)) else {
            debug!(row, "layout_row_without_item_or_slot_skipped");
            skipped += 1;
            continue;
        };

        rows.push(LayoutRow {
            item: ItemId(item.to_string()),
            slot: SlotId(slot.to_string()),
            x: parse_f64(&record, x_idx, LAYOUT, row, &columns.x)?,
            y: parse_f64(&record, y_idx, LAYOUT, row, &columns.y)?,
            pick_seq: parse_i64(&record, seq_idx, LAYOUT, row, &columns.pick_seq)?,
        });
    }

    info!(rows = rows.len(), skipped, "layout_table_loaded");
    Ok(rows)
}

/// Read pick records from any CSV source
pub fn read_picks<R: Read>(reader: R, columns: &PickColumns) -> Result<Vec<PickRecord>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let trip_idx = required(&headers, PICKS, &columns.trip)?;
    let item_idx = required(&headers, PICKS, &columns.item)?;
    let type_idx = required(&headers, PICKS, &columns.trip_type)?;
    let area_idx = required(&headers, PICKS, &columns.whse_area)?;
    let category_idx = optional(&headers, &columns.trip_category);
    let pick_slot_idx = optional(&headers, &columns.pick_slot);

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (i, record) in rdr.records().enumerate() {
        let record = record?;

        let Some(trip) = cell(&record, trip_idx) else {
            debug!(row = i + 2, "pick_row_without_trip_skipped");
            skipped += 1;
            continue;
        };

        let text = |idx: usize| record.get(idx).unwrap_or_default().to_string();
        let maybe = |idx: Option<usize>| idx.and_then(|i| cell(&record, i)).map(String::from);

        records.push(PickRecord {
            trip: TripId(trip.to_string()),
            item: ItemId(text(item_idx)),
            trip_type: text(type_idx),
            whse_area: text(area_idx),
            trip_category: maybe(category_idx),
            pick_slot: maybe(pick_slot_idx),
        });
    }

    info!(
        rows = records.len(),
        skipped,
        has_trip_category = category_idx.is_some(),
        has_pick_slot = pick_slot_idx.is_some(),
        "pick_table_loaded"
    );
    Ok(records)
}

pub fn load_layout(path: impl AsRef<Path>, columns: &LayoutColumns) -> Result<Vec<LayoutRow>> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading_layout_table");
    read_layout(File::open(path)?, columns)
}

pub fn load_picks(path: impl AsRef<Path>, columns: &PickColumns) -> Result<Vec<PickRecord>> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading_pick_table");
    read_picks(File::open(path)?, columns)
}
