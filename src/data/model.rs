use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Cell – a single value in a column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common DataFrame dtypes.
///
/// Equality is type-sensitive: `Integer(2016)`, `Float(2016.0)` and
/// `String("2016")` are three different values.
#[derive(Debug, Clone)]
pub enum Cell {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date or timestamp kept as text.
    Date(String),
    Null,
}

// -- Manual Eq/Ord/Hash so cells can key maps and sets --

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cell {}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        use Cell::*;
        fn rank(v: &Cell) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl std::hash::Hash for Cell {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::String(s) | Cell::Date(s) => s.hash(state),
            Cell::Integer(i) => i.hash(state),
            Cell::Float(f) => f.to_bits().hash(state),
            Cell::Bool(b) => b.hash(state),
            Cell::Null => {}
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::String(s) => write!(f, "{s}"),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v:?}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Date(d) => write!(f, "{d}"),
            Cell::Null => write!(f, "null"),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::String(s) | Cell::Date(s) => serializer.serialize_str(s),
            Cell::Integer(i) => serializer.serialize_i64(*i),
            Cell::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            Cell::Float(_) | Cell::Null => serializer.serialize_unit(),
            Cell::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl From<&JsonValue> for Cell {
    /// Type-preserving conversion: integral numbers become `Integer`,
    /// other numbers `Float`. Arrays and objects keep their JSON text.
    fn from(val: &JsonValue) -> Self {
        match val {
            JsonValue::String(s) => Cell::String(s.clone()),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Cell::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    Cell::Float(f)
                } else {
                    Cell::String(n.to_string())
                }
            }
            JsonValue::Bool(b) => Cell::Bool(*b),
            JsonValue::Null => Cell::Null,
            other => Cell::String(other.to_string()),
        }
    }
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Text used when the cell becomes a JSON object key.
    pub fn to_key(&self) -> String {
        self.to_string()
    }
}

// ---------------------------------------------------------------------------
// Column / Table
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("column '{name}' has {found} rows, expected {expected}")]
    RaggedColumn {
        name: String,
        expected: usize,
        found: usize,
    },
}

/// A named, row-aligned sequence of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// The loaded dataset: ordered columns plus a name → position index.
///
/// Once built a table is never mutated; every query derives transient
/// values from it.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    rows: usize,
}

impl Table {
    /// Build a table, rejecting duplicate names and ragged columns.
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let rows = columns.first().map(Column::len).unwrap_or(0);
        let mut index = HashMap::with_capacity(columns.len());

        for (pos, col) in columns.iter().enumerate() {
            if col.len() != rows {
                return Err(TableError::RaggedColumn {
                    name: col.name.clone(),
                    expected: rows,
                    found: col.len(),
                });
            }
            if index.insert(col.name.clone(), pos).is_some() {
                return Err(TableError::DuplicateColumn(col.name.clone()));
            }
        }

        Ok(Self {
            columns,
            index,
            rows,
        })
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&pos| &self.columns[pos])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in table order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}

// ---------------------------------------------------------------------------
// RecordBuilder – row-wise assembly for record-oriented sources
// ---------------------------------------------------------------------------

/// Assembles a [`Table`] from records that may not share the same keys.
///
/// Columns appear in first-seen order; cells a record does not provide
/// are filled with [`Cell::Null`].
#[derive(Debug, Default)]
pub struct RecordBuilder {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    rows: usize,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record. A key repeated within a record keeps its last value.
    pub fn push_record<I, K>(&mut self, record: I)
    where
        I: IntoIterator<Item = (K, Cell)>,
        K: AsRef<str>,
    {
        for (key, cell) in record {
            let pos = self.column_position(key.as_ref());
            let cells = &mut self.columns[pos].cells;
            if cells.len() == self.rows {
                cells.push(cell);
            } else {
                cells[self.rows] = cell;
            }
        }
        self.rows += 1;
        for col in &mut self.columns {
            col.cells.resize(self.rows, Cell::Null);
        }
    }

    fn column_position(&mut self, name: &str) -> usize {
        if let Some(&pos) = self.index.get(name) {
            return pos;
        }
        let pos = self.columns.len();
        self.columns
            .push(Column::new(name, vec![Cell::Null; self.rows]));
        self.index.insert(name.to_string(), pos);
        pos
    }

    pub fn finish(self) -> Result<Table, TableError> {
        Table::new(self.columns)
    }
}
