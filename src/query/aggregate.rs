//! Single-pass aggregations over column cells.
//!
//! Null cells are never grouping keys: counts and pivots skip them, while
//! [`unique_values`] keeps one `Null` if any is present.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::output::{Counts, Histogram};
use crate::data::model::Cell;

/// Most frequent values, count descending. Ties keep first-occurrence order.
pub fn value_counts(cells: &[Cell], limit: usize) -> Counts {
    let mut slots: HashMap<&Cell, usize> = HashMap::new();
    let mut counts: Vec<(&Cell, usize)> = Vec::new();

    for cell in cells.iter().filter(|c| !c.is_null()) {
        match slots.get(cell) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(cell, counts.len());
                counts.push((cell, 1));
            }
        }
    }

    // stable: equal counts stay in first-occurrence order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    Counts(counts.into_iter().map(|(c, n)| (c.clone(), n)).collect())
}

/// Group sizes in ascending key order, truncated to `limit` groups.
pub fn grouped_counts(cells: &[Cell], limit: usize) -> Counts {
    let mut groups: BTreeMap<&Cell, usize> = BTreeMap::new();
    for cell in cells.iter().filter(|c| !c.is_null()) {
        *groups.entry(cell).or_default() += 1;
    }
    Counts(
        groups
            .into_iter()
            .take(limit)
            .map(|(c, n)| (c.clone(), n))
            .collect(),
    )
}

/// Count rows per `(row, column)` key pair and pivot.
///
/// Rows and columns start in ascending key order; rows are then stable-sorted
/// by their total, descending, and the first `limit` rows are kept. Every
/// column key seen in the data is kept.
pub fn grouped_histogram(row_cells: &[Cell], column_cells: &[Cell], limit: usize) -> Histogram {
    let mut pairs: BTreeMap<(&Cell, &Cell), usize> = BTreeMap::new();
    for (r, c) in row_cells.iter().zip(column_cells) {
        if r.is_null() || c.is_null() {
            continue;
        }
        *pairs.entry((r, c)).or_default() += 1;
    }

    let mut row_keys: Vec<&Cell> = pairs.keys().map(|(r, _)| *r).collect();
    row_keys.dedup();
    let column_keys: Vec<&Cell> = pairs
        .keys()
        .map(|(_, c)| *c)
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    let column_pos: HashMap<&Cell, usize> = column_keys
        .iter()
        .enumerate()
        .map(|(i, c)| (*c, i))
        .collect();

    // pairs are ordered by row key first, so rows fill in sequence
    let mut rows: Vec<(&Cell, Vec<usize>)> = row_keys
        .iter()
        .map(|r| (*r, vec![0; column_keys.len()]))
        .collect();
    let mut current = 0;
    for ((r, c), n) in &pairs {
        while rows[current].0 != *r {
            current += 1;
        }
        rows[current].1[column_pos[c]] = *n;
    }

    rows.sort_by_key(|(_, counts)| std::cmp::Reverse(counts.iter().sum::<usize>()));
    rows.truncate(limit);

    let (row_keys, counts): (Vec<Cell>, Vec<Vec<usize>>) =
        rows.into_iter().map(|(k, v)| (k.clone(), v)).unzip();
    Histogram {
        row_keys,
        column_keys: column_keys.into_iter().cloned().collect(),
        counts,
    }
}

/// Distinct cells in first-occurrence order.
pub fn unique_values(cells: &[Cell]) -> Vec<Cell> {
    let mut seen: HashSet<&Cell> = HashSet::new();
    cells
        .iter()
        .filter(|c| seen.insert(*c))
        .cloned()
        .collect()
}
