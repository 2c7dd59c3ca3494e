use super::model::{Cell, Column};

// ---------------------------------------------------------------------------
// Equality predicate over one column
// ---------------------------------------------------------------------------

/// Return indices of rows whose cell in `column` equals `constraint`.
///
/// Comparison is exact and type-sensitive (no coercion). A null cell never
/// matches, not even a null constraint.
pub fn matching_rows(column: &Column, constraint: &Cell) -> Vec<usize> {
    column
        .cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| !cell.is_null() && *cell == constraint)
        .map(|(i, _)| i)
        .collect()
}
