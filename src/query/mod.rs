//! Read-only query operations over the loaded dataset.

pub mod aggregate;
pub mod output;

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::data::filter::matching_rows;
use crate::data::model::{Cell, Column, Table};
use output::{Counts, Histogram, TableDump};

/// Size of every truncated result.
pub const TOP_N: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Dataset unavailable: {0}")]
    DataUnavailable(String),

    #[error("Column '{0}' not found in dataset")]
    UnknownColumn(String),

    /// Distinct values of a column render to the same JSON object key,
    /// e.g. `2016` and `"2016"`.
    #[error("Column '{column}' has distinct values sharing the key '{key}'")]
    KeyCollision { column: String, key: String },
}

pub type QueryResult<T> = Result<T, QueryError>;

// ---------------------------------------------------------------------------
// QueryService
// ---------------------------------------------------------------------------

/// Holds the dataset snapshot (or the reason it failed to load) and answers
/// queries against it.
///
/// Every operation validates all referenced columns before computing, so a
/// failed call never produces a partial result.
#[derive(Debug, Clone)]
pub struct QueryService {
    table: Result<Arc<Table>, String>,
}

impl QueryService {
    pub fn new(table: Table) -> Self {
        Self {
            table: Ok(Arc::new(table)),
        }
    }

    /// A service whose every query fails with [`QueryError::DataUnavailable`].
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            table: Err(reason.into()),
        }
    }

    /// Build from a load outcome, logging a failure instead of propagating it.
    pub fn from_load(loaded: anyhow::Result<Table>) -> Self {
        match loaded {
            Ok(table) => Self::new(table),
            Err(e) => {
                log::error!("Error loading dataset: {e:#}");
                Self::unavailable(format!("{e:#}"))
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.table.is_ok()
    }

    fn table(&self) -> QueryResult<&Arc<Table>> {
        self.table
            .as_ref()
            .map_err(|reason| QueryError::DataUnavailable(reason.clone()))
    }

    fn column(&self, name: &str) -> QueryResult<&Column> {
        self.table()?
            .column(name)
            .ok_or_else(|| QueryError::UnknownColumn(name.to_string()))
    }

    /// The whole table, column-oriented.
    pub fn full_dump(&self) -> QueryResult<TableDump> {
        Ok(TableDump(Arc::clone(self.table()?)))
    }

    pub fn list_columns(&self) -> QueryResult<Vec<String>> {
        Ok(self.table()?.column_names().map(str::to_string).collect())
    }

    /// The [`TOP_N`] most frequent values of `column`.
    pub fn value_counts(&self, column: &str) -> QueryResult<Counts> {
        let column = self.column(column)?;
        let counts = aggregate::value_counts(&column.cells, TOP_N);
        ensure_unique_keys(&column.name, counts.iter().map(|(cell, _)| cell))?;
        Ok(counts)
    }

    /// First [`TOP_N`] cells of `column_b` among rows where `column_a`
    /// equals `constraint`, in row order.
    pub fn filtered_slice(
        &self,
        column_a: &str,
        constraint: &Cell,
        column_b: &str,
    ) -> QueryResult<Vec<Cell>> {
        let filter_col = self.column(column_a)?;
        let value_col = self.column(column_b)?;
        Ok(matching_rows(filter_col, constraint)
            .into_iter()
            .take(TOP_N)
            .map(|row| value_col.cells[row].clone())
            .collect())
    }

    /// Pair counts pivoted with `column_a` as rows and `column_b` as
    /// columns; top [`TOP_N`] rows by total.
    pub fn grouped_histogram(&self, column_a: &str, column_b: &str) -> QueryResult<Histogram> {
        let rows = self.column(column_a)?;
        let cols = self.column(column_b)?;
        let histogram = aggregate::grouped_histogram(&rows.cells, &cols.cells, TOP_N);
        ensure_unique_keys(&rows.name, histogram.row_keys.iter())?;
        ensure_unique_keys(&cols.name, histogram.column_keys.iter())?;
        Ok(histogram)
    }

    /// Group sizes of `column` in key order, first [`TOP_N`] groups.
    pub fn grouped_counts(&self, column: &str) -> QueryResult<Counts> {
        let column = self.column(column)?;
        let counts = aggregate::grouped_counts(&column.cells, TOP_N);
        ensure_unique_keys(&column.name, counts.iter().map(|(cell, _)| cell))?;
        Ok(counts)
    }

    pub fn unique_values(&self, column: &str) -> QueryResult<Vec<Cell>> {
        let column = self.column(column)?;
        Ok(aggregate::unique_values(&column.cells))
    }
}

/// Keyed results are JSON objects; two distinct cells with the same key
/// text would silently collapse on the client.
fn ensure_unique_keys<'a>(column: &str, keys: impl Iterator<Item = &'a Cell>) -> QueryResult<()> {
    let mut seen = HashSet::new();
    for cell in keys {
        let key = cell.to_key();
        if !seen.insert(key.clone()) {
            return Err(QueryError::KeyCollision {
                column: column.to_string(),
                key,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Cell {
        Cell::String(v.to_string())
    }

    fn service() -> QueryService {
        let table = Table::new(vec![
            Column::new("country", vec![s("India"), s("India"), s("US")]),
            Column::new("likelihood", vec![s("High"), s("Low"), s("High")]),
        ])
        .unwrap();
        QueryService::new(table)
    }

    #[test]
    fn test_scenario() {
        let svc = service();
        assert_eq!(
            serde_json::to_string(&svc.value_counts("country").unwrap()).unwrap(),
            r#"{"India":2,"US":1}"#
        );
        assert_eq!(
            svc.filtered_slice("country", &s("India"), "likelihood").unwrap(),
            vec![s("High"), s("Low")]
        );
        assert_eq!(svc.unique_values("country").unwrap(), vec![s("India"), s("US")]);
        assert_eq!(svc.list_columns().unwrap(), vec!["country", "likelihood"]);
    }

    #[test]
    fn test_filtered_slice_without_match_is_empty() {
        let svc = service();
        assert!(svc.filtered_slice("country", &s("Peru"), "likelihood").unwrap().is_empty());
        assert!(svc
            .filtered_slice("country", &Cell::Integer(1), "likelihood")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_filtered_slice_takes_first_ten() {
        let countries: Vec<Cell> = (0..25).map(|i| s(if i % 2 == 0 { "India" } else { "US" })).collect();
        let ids: Vec<Cell> = (0..25).map(Cell::Integer).collect();
        let svc = QueryService::new(
            Table::new(vec![Column::new("country", countries), Column::new("id", ids)]).unwrap(),
        );
        let slice = svc.filtered_slice("country", &s("India"), "id").unwrap();
        let expected: Vec<Cell> = (0..10).map(|i| Cell::Integer(i * 2)).collect();
        assert_eq!(slice, expected);
    }

    #[test]
    fn test_unknown_column() {
        let svc = service();
        let missing = QueryError::UnknownColumn("nonexistent_col".into());
        assert_eq!(svc.value_counts("nonexistent_col").unwrap_err(), missing);
        assert_eq!(svc.grouped_counts("nonexistent_col").unwrap_err(), missing);
        assert_eq!(svc.unique_values("nonexistent_col").unwrap_err(), missing);
        assert_eq!(
            svc.grouped_histogram("country", "nonexistent_col").unwrap_err(),
            missing
        );
        assert_eq!(
            svc.filtered_slice("nonexistent_col", &s("India"), "country").unwrap_err(),
            missing
        );
    }

    #[test]
    fn test_mixed_type_keys_are_rejected() {
        let svc = QueryService::new(
            Table::new(vec![
                Column::new("start_year", vec![Cell::Integer(2016), s("2016"), Cell::Integer(2016)]),
                Column::new("country", vec![s("India"), s("US"), s("India")]),
            ])
            .unwrap(),
        );
        let collision = QueryError::KeyCollision {
            column: "start_year".into(),
            key: "2016".into(),
        };
        assert_eq!(svc.value_counts("start_year").unwrap_err(), collision);
        assert_eq!(svc.grouped_counts("start_year").unwrap_err(), collision);
        assert_eq!(svc.grouped_histogram("start_year", "country").unwrap_err(), collision);
        assert_eq!(svc.grouped_histogram("country", "start_year").unwrap_err(), collision);

        // unique values are an array, so both cells are kept
        assert_eq!(
            svc.unique_values("start_year").unwrap(),
            vec![Cell::Integer(2016), s("2016")]
        );
    }

    #[test]
    fn test_unavailable_dataset() {
        let svc = QueryService::from_load(Err(anyhow::anyhow!("file not found")));
        assert!(!svc.is_available());
        assert!(matches!(svc.full_dump(), Err(QueryError::DataUnavailable(_))));
        assert!(matches!(svc.list_columns(), Err(QueryError::DataUnavailable(_))));
        assert!(matches!(svc.value_counts("country"), Err(QueryError::DataUnavailable(_))));
    }
}
