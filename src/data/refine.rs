use super::model::{Cell, Column, Table, TableError};

// ---------------------------------------------------------------------------
// Refine options
// ---------------------------------------------------------------------------

/// Cleaning rules applied once, right after loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefineOptions {
    /// `(old, new)` column renames, applied in order.
    pub renames: Vec<(String, String)>,
}

// ---------------------------------------------------------------------------
// Refinement
// ---------------------------------------------------------------------------

/// Clean a freshly loaded table.
///
/// * string cells are trimmed; empty strings become [`Cell::Null`]
/// * NaN and infinite floats become [`Cell::Null`]
/// * a column holding only integers and floats (plus nulls) becomes all floats
/// * configured renames are applied; renaming a missing column is a no-op
pub fn refine(table: Table, options: &RefineOptions) -> Result<Table, TableError> {
    let mut columns: Vec<Column> = table.into_columns();

    for column in &mut columns {
        for cell in &mut column.cells {
            let replacement = match cell {
                Cell::String(s) if s.trim().is_empty() => Cell::Null,
                Cell::String(s) if s.trim().len() != s.len() => Cell::String(s.trim().to_string()),
                Cell::Float(f) if !f.is_finite() => Cell::Null,
                _ => continue,
            };
            *cell = replacement;
        }
        unify_numeric(column);
    }

    for (old, new) in &options.renames {
        match columns.iter_mut().find(|c| &c.name == old) {
            Some(column) => column.name = new.clone(),
            None => log::warn!("Rename skipped: column '{old}' not found"),
        }
    }

    Table::new(columns)
}

fn unify_numeric(column: &mut Column) {
    let mut has_int = false;
    let mut has_float = false;
    for cell in &column.cells {
        match cell {
            Cell::Integer(_) => has_int = true,
            Cell::Float(_) => has_float = true,
            Cell::Null => {}
            _ => return,
        }
    }
    if !(has_int && has_float) {
        return;
    }

    log::debug!("Column '{}': integers widened to floats", column.name);
    for cell in &mut column.cells {
        if let Cell::Integer(i) = *cell {
            *cell = Cell::Float(i as f64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Cell {
        Cell::String(v.to_string())
    }

    fn table(columns: Vec<Column>) -> Table {
        Table::new(columns).unwrap()
    }

    #[test]
    fn test_blank_strings_become_null() {
        let t = table(vec![Column::new("topic", vec![s(" oil "), s(""), s("   "), s("gas")])]);
        let refined = refine(t, &RefineOptions::default()).unwrap();
        assert_eq!(
            refined.column("topic").unwrap().cells,
            vec![s("oil"), Cell::Null, Cell::Null, s("gas")]
        );
    }

    #[test]
    fn test_mixed_numeric_column_is_widened() {
        let t = table(vec![
            Column::new("relevance", vec![Cell::Integer(2), Cell::Float(1.5), Cell::Null]),
            Column::new("end_year", vec![Cell::Integer(2030), Cell::Null, Cell::Integer(2040)]),
            Column::new("mixed", vec![Cell::Integer(1), Cell::Float(1.0), s("x")]),
        ]);
        let refined = refine(t, &RefineOptions::default()).unwrap();
        assert_eq!(
            refined.column("relevance").unwrap().cells,
            vec![Cell::Float(2.0), Cell::Float(1.5), Cell::Null]
        );
        assert_eq!(
            refined.column("end_year").unwrap().cells,
            vec![Cell::Integer(2030), Cell::Null, Cell::Integer(2040)]
        );
        assert_eq!(refined.column("mixed").unwrap().cells[0], Cell::Integer(1));
    }

    #[test]
    fn test_non_finite_floats_become_null() {
        let t = table(vec![Column::new(
            "intensity",
            vec![
                Cell::Float(f64::NAN),
                Cell::Integer(3),
                Cell::Float(f64::INFINITY),
                Cell::Float(f64::NEG_INFINITY),
                Cell::Float(2.5),
            ],
        )]);
        let refined = refine(t, &RefineOptions::default()).unwrap();
        assert_eq!(
            refined.column("intensity").unwrap().cells,
            vec![Cell::Null, Cell::Float(3.0), Cell::Null, Cell::Null, Cell::Float(2.5)]
        );

        // a column left with only integers is not widened
        let t = table(vec![Column::new("impact", vec![Cell::Integer(1), Cell::Float(f64::NAN)])]);
        let refined = refine(t, &RefineOptions::default()).unwrap();
        assert_eq!(refined.column("impact").unwrap().cells, vec![Cell::Integer(1), Cell::Null]);
    }

    #[test]
    fn test_renames() {
        let t = table(vec![
            Column::new("Country", vec![s("India")]),
            Column::new("region", vec![s("Asia")]),
        ]);
        let options = RefineOptions {
            renames: vec![
                ("Country".into(), "country".into()),
                ("absent".into(), "whatever".into()),
            ],
        };
        let refined = refine(t.clone(), &options).unwrap();
        let names: Vec<&str> = refined.column_names().collect();
        assert_eq!(names, vec!["country", "region"]);

        let clash = RefineOptions {
            renames: vec![("Country".into(), "region".into())],
        };
        assert_eq!(
            refine(t, &clash).unwrap_err(),
            TableError::DuplicateColumn("region".into())
        );
    }
}
