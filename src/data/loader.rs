use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float16Array, Float32Array, Float64Array,
    Int16Array, Int32Array, Int64Array, Int8Array, UInt16Array, UInt32Array, UInt64Array,
    UInt8Array,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatchReader;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Cell, Column, RecordBuilder, Table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a tabular dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – records `[{ "country": "India", ... }, ...]` or the
///   column-oriented dump `{ "country": { "0": "India", ... }, ... }`
/// * `.csv`     – header row with column names, one record per line
/// * `.parquet` – any flat Arrow schema
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading dataset from {}", path.display()))?;

    log::info!(
        "Loaded {} rows x {} columns from {}",
        table.num_rows(),
        table.num_columns(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    json_to_table(&root)
}

/// Build a table from a parsed JSON document (records array or
/// column-oriented object).
pub fn json_to_table(root: &JsonValue) -> Result<Table> {
    match root {
        JsonValue::Array(records) => json_records(records),
        JsonValue::Object(columns) => {
            let mut out = Vec::with_capacity(columns.len());
            // row indices of the first column; every other column must match
            let mut expected: Option<(&str, Vec<usize>)> = None;
            for (name, col) in columns {
                let rows = col
                    .as_object()
                    .with_context(|| format!("Column '{name}' is not an index → value object"))?;
                let mut indexed = Vec::with_capacity(rows.len());
                for (idx, val) in rows {
                    let idx: usize = idx
                        .parse()
                        .with_context(|| format!("Column '{name}': row index '{idx}' is not an integer"))?;
                    indexed.push((idx, Cell::from(val)));
                }
                indexed.sort_by_key(|(idx, _)| *idx);
                let indices: Vec<usize> = indexed.iter().map(|(idx, _)| *idx).collect();
                match &expected {
                    Some((first, first_indices)) => {
                        if *first_indices != indices {
                            bail!("Column '{name}' row indices differ from column '{first}'");
                        }
                    }
                    None => expected = Some((name.as_str(), indices)),
                }
                out.push(Column::new(
                    name.clone(),
                    indexed.into_iter().map(|(_, cell)| cell).collect(),
                ));
            }
            Ok(Table::new(out)?)
        }
        _ => bail!("Expected top-level JSON array or object"),
    }
}

fn json_records(records: &[JsonValue]) -> Result<Table> {
    let mut builder = RecordBuilder::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        builder.push_record(obj.iter().map(|(key, val)| (key, Cell::from(val))));
    }
    Ok(builder.finish()?)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Table> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    csv_to_table(reader)
}

/// CSV layout: header row with column names; every cell type is guessed.
pub fn csv_to_table<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Table> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut columns: Vec<Column> = headers
        .iter()
        .map(|h| Column::new(h.clone(), Vec::new()))
        .collect();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col_idx, column) in columns.iter_mut().enumerate() {
            column
                .cells
                .push(guess_cell_type(record.get(col_idx).unwrap_or("")));
        }
    }

    Ok(Table::new(columns)?)
}

fn guess_cell_type(s: &str) -> Cell {
    if s.is_empty() {
        return Cell::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Cell::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Cell::Float(f);
    }
    if s == "true" || s == "false" {
        return Cell::Bool(s == "true");
    }
    Cell::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas, Polars or Arrow.
///
/// Columns are concatenated across record batches in file order.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<Column> = reader
        .schema()
        .fields()
        .iter()
        .map(|f| Column::new(f.name().clone(), Vec::new()))
        .collect();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (column, array) in columns.iter_mut().zip(batch.columns()) {
            append_cells(array, &mut column.cells)
                .with_context(|| format!("reading column '{}'", column.name))?;
        }
    }

    Ok(Table::new(columns)?)
}

// -- Arrow helpers --

macro_rules! push_primitive {
    ($col:expr, $out:expr, $arr:ty, $conv:expr) => {{
        let arr = $col
            .as_any()
            .downcast_ref::<$arr>()
            .context(concat!("expected ", stringify!($arr)))?;
        $out.extend(arr.iter().map(|v| v.map($conv).unwrap_or(Cell::Null)));
    }};
}

/// Convert one Arrow array into cells, appending to `out`.
fn append_cells(col: &ArrayRef, out: &mut Vec<Cell>) -> Result<()> {
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col.as_string::<i32>();
            out.extend(arr.iter().map(|v| v.map(|s| Cell::String(s.to_string())).unwrap_or(Cell::Null)));
        }
        DataType::LargeUtf8 => {
            let arr = col.as_string::<i64>();
            out.extend(arr.iter().map(|v| v.map(|s| Cell::String(s.to_string())).unwrap_or(Cell::Null)));
        }
        DataType::Int8 => push_primitive!(col, out, Int8Array, |v| Cell::Integer(v as i64)),
        DataType::Int16 => push_primitive!(col, out, Int16Array, |v| Cell::Integer(v as i64)),
        DataType::Int32 => push_primitive!(col, out, Int32Array, |v| Cell::Integer(v as i64)),
        DataType::Int64 => push_primitive!(col, out, Int64Array, Cell::Integer),
        DataType::UInt8 => push_primitive!(col, out, UInt8Array, |v| Cell::Integer(v as i64)),
        DataType::UInt16 => push_primitive!(col, out, UInt16Array, |v| Cell::Integer(v as i64)),
        DataType::UInt32 => push_primitive!(col, out, UInt32Array, |v| Cell::Integer(v as i64)),
        DataType::UInt64 => push_primitive!(col, out, UInt64Array, |v| match i64::try_from(v) {
            Ok(i) => Cell::Integer(i),
            Err(_) => Cell::Float(v as f64),
        }),
        DataType::Float16 => push_primitive!(col, out, Float16Array, |v| Cell::Float(v.to_f64())),
        DataType::Float32 => push_primitive!(col, out, Float32Array, |v| Cell::Float(v as f64)),
        DataType::Float64 => push_primitive!(col, out, Float64Array, Cell::Float),
        DataType::Boolean => push_primitive!(col, out, BooleanArray, Cell::Bool),
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            push_formatted(col, out, Cell::Date)?
        }
        _ => push_formatted(col, out, Cell::String)?,
    }
    Ok(())
}

/// Fallback: render each value with Arrow's display formatter.
fn push_formatted(col: &ArrayRef, out: &mut Vec<Cell>, wrap: fn(String) -> Cell) -> Result<()> {
    let options = FormatOptions::default();
    let formatter = ArrayFormatter::try_new(col.as_ref(), &options)
        .with_context(|| format!("no display format for {:?}", col.data_type()))?;
    for row in 0..col.len() {
        if col.is_null(row) {
            out.push(Cell::Null);
        } else {
            out.push(wrap(formatter.value(row).to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::tempdir;

    fn s(v: &str) -> Cell {
        Cell::String(v.to_string())
    }

    #[test]
    fn test_load_json_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(
            &path,
            r#"[{"country": "India", "intensity": 6, "relevance": 2.5},
                {"country": "US", "topic": "oil"}]"#,
        )
        .unwrap();

        let table = load_file(&path).unwrap();
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["country", "intensity", "relevance", "topic"]);
        assert_eq!(table.column("intensity").unwrap().cells, vec![Cell::Integer(6), Cell::Null]);
        assert_eq!(table.column("topic").unwrap().cells, vec![Cell::Null, s("oil")]);
    }

    #[test]
    fn test_load_json_column_oriented_dump() {
        let root = serde_json::json!({
            "country": {"1": "US", "0": "India", "10": "China"},
            "likelihood": {"0": 3, "1": 2, "10": 1}
        });
        let table = json_to_table(&root).unwrap();
        assert_eq!(
            table.column("country").unwrap().cells,
            vec![s("India"), s("US"), s("China")]
        );
    }

    #[test]
    fn test_column_oriented_dump_rejects_mismatched_indices() {
        let root = serde_json::json!({
            "country": {"0": "India", "5": "US"},
            "likelihood": {"0": 3, "1": 2}
        });
        let err = json_to_table(&root).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Column 'likelihood' row indices differ from column 'country'"
        );

        // same index set in a different key order is fine
        let root = serde_json::json!({
            "country": {"0": "India", "5": "US"},
            "likelihood": {"5": 2, "0": 3}
        });
        let table = json_to_table(&root).unwrap();
        assert_eq!(
            table.column("likelihood").unwrap().cells,
            vec![Cell::Integer(3), Cell::Integer(2)]
        );
    }

    #[test]
    fn test_load_csv_guesses_types() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "country,end_year,relevance,flag").unwrap();
        writeln!(file, "India,2027,1.5,true").unwrap();
        writeln!(file, "US,,2,false").unwrap();
        drop(file);

        let table = load_file(&path).unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(
            table.column("end_year").unwrap().cells,
            vec![Cell::Integer(2027), Cell::Null]
        );
        assert_eq!(
            table.column("relevance").unwrap().cells,
            vec![Cell::Float(1.5), Cell::Integer(2)]
        );
        assert_eq!(table.column("flag").unwrap().cells, vec![Cell::Bool(true), Cell::Bool(false)]);
    }

    #[test]
    fn test_load_parquet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("country", DataType::Utf8, true),
            Field::new("start_year", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("India"), None])),
                Arc::new(Int64Array::from(vec![Some(2016), Some(2017)])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.column("country").unwrap().cells, vec![s("India"), Cell::Null]);
        assert_eq!(
            table.column("start_year").unwrap().cells,
            vec![Cell::Integer(2016), Cell::Integer(2017)]
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported file extension"));
    }
}
