//! Serializable query results.
//!
//! Every mapping keeps its result order when written as a JSON object;
//! cells used as keys are rendered with [`Cell::to_key`].

use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::data::model::{Cell, Column, Table};

// ---------------------------------------------------------------------------
// Counts – ordered value → count mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Counts(pub Vec<(Cell, usize)>);

impl Counts {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Cell, usize)> {
        self.0.iter()
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, n)| n).sum()
    }
}

impl Serialize for Counts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (cell, count) in &self.0 {
            map.serialize_entry(&cell.to_key(), count)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Histogram – pivoted pair counts
// ---------------------------------------------------------------------------

/// Pair counts pivoted into `row_keys × column_keys`.
///
/// Absent combinations hold `0`. Serialized column-oriented:
/// `{ column_key: { row_key: count, ... }, ... }`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    pub row_keys: Vec<Cell>,
    pub column_keys: Vec<Cell>,
    /// One entry per row key, each with one count per column key.
    pub counts: Vec<Vec<usize>>,
}

impl Histogram {
    pub fn row_total(&self, row: usize) -> usize {
        self.counts[row].iter().sum()
    }

    /// Count for a `(row_key, column_key)` pair, if both keys are present.
    pub fn get(&self, row_key: &Cell, column_key: &Cell) -> Option<usize> {
        let r = self.row_keys.iter().position(|k| k == row_key)?;
        let c = self.column_keys.iter().position(|k| k == column_key)?;
        Some(self.counts[r][c])
    }
}

struct HistogramColumn<'a> {
    hist: &'a Histogram,
    col: usize,
}

impl Serialize for HistogramColumn<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.hist.row_keys.len()))?;
        for (key, row) in self.hist.row_keys.iter().zip(&self.hist.counts) {
            map.serialize_entry(&key.to_key(), &row[self.col])?;
        }
        map.end()
    }
}

impl Serialize for Histogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.column_keys.len()))?;
        for (col, key) in self.column_keys.iter().enumerate() {
            map.serialize_entry(&key.to_key(), &HistogramColumn { hist: self, col })?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// TableDump – the whole table, column-oriented
// ---------------------------------------------------------------------------

/// Serializes as `{ column: { "0": cell, "1": cell, ... }, ... }`.
#[derive(Debug, Clone)]
pub struct TableDump(pub Arc<Table>);

struct ColumnDump<'a>(&'a Column);

impl Serialize for ColumnDump<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (row, cell) in self.0.cells.iter().enumerate() {
            map.serialize_entry(&row.to_string(), cell)?;
        }
        map.end()
    }
}

impl Serialize for TableDump {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.num_columns()))?;
        for column in self.0.columns() {
            map.serialize_entry(&column.name, &ColumnDump(column))?;
        }
        map.end()
    }
}
