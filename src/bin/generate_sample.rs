use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }

    /// `None` roughly `percent` % of the time.
    fn sometimes_missing<T>(&mut self, percent: u64, value: T) -> Option<T> {
        (self.below(100) >= percent).then_some(value)
    }
}

/// One climate-impact record.
#[derive(Debug, Serialize)]
struct Record {
    country: String,
    region: String,
    sector: String,
    topic: String,
    pestle: String,
    source: String,
    likelihood: i64,
    relevance: i64,
    intensity: i64,
    impact: Option<i64>,
    start_year: Option<i64>,
    end_year: Option<i64>,
}

const COUNTRIES: &[(&str, &str)] = &[
    ("United States of America", "Northern America"),
    ("India", "Southern Asia"),
    ("China", "Eastern Asia"),
    ("Russia", "Eastern Europe"),
    ("Saudi Arabia", "Western Asia"),
    ("Nigeria", "Western Africa"),
    ("Brazil", "South America"),
    ("Mexico", "Central America"),
    ("Iran", "Western Asia"),
    ("Canada", "Northern America"),
    ("Australia", "Oceania"),
    ("Germany", "Western Europe"),
    ("Egypt", "Northern Africa"),
    ("Indonesia", "South-Eastern Asia"),
];
const SECTORS: &[&str] = &["Energy", "Environment", "Government", "Manufacturing", "Retail"];
const TOPICS: &[&str] = &["oil", "gas", "climate", "emission", "policy", "water", "economy"];
const PESTLE: &[&str] = &["Economic", "Environmental", "Political", "Social", "Technological"];
const SOURCES: &[&str] = &["EIA", "Reuters", "OPEC", "World Bank", "IEA"];

fn generate(rows: usize, rng: &mut SimpleRng) -> Vec<Record> {
    (0..rows)
        .map(|_| {
            // skew towards the first countries so counts differ
            let idx = rng.below(COUNTRIES.len() as u64).min(rng.below(COUNTRIES.len() as u64));
            let (country, region) = COUNTRIES[idx as usize];
            let start = 2014 + rng.below(10) as i64;
            let impact = 1 + rng.below(4) as i64;
            let end = start + rng.below(30) as i64;
            Record {
                country: country.to_string(),
                region: region.to_string(),
                sector: rng.pick(SECTORS).to_string(),
                topic: rng.pick(TOPICS).to_string(),
                pestle: rng.pick(PESTLE).to_string(),
                source: rng.pick(SOURCES).to_string(),
                likelihood: 1 + rng.below(4) as i64,
                relevance: 1 + rng.below(7) as i64,
                intensity: 1 + rng.below(48) as i64,
                impact: rng.sometimes_missing(70, impact),
                start_year: rng.sometimes_missing(40, start),
                end_year: rng.sometimes_missing(40, end),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

fn write_parquet(path: &Path, records: &[Record]) -> Result<()> {
    fn strings(records: &[Record], f: impl Fn(&Record) -> &str) -> ArrayRef {
        Arc::new(StringArray::from(records.iter().map(f).collect::<Vec<_>>()))
    }
    fn ints(records: &[Record], f: impl Fn(&Record) -> Option<i64>) -> ArrayRef {
        Arc::new(Int64Array::from(records.iter().map(f).collect::<Vec<_>>()))
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("country", DataType::Utf8, false),
        Field::new("region", DataType::Utf8, false),
        Field::new("sector", DataType::Utf8, false),
        Field::new("topic", DataType::Utf8, false),
        Field::new("pestle", DataType::Utf8, false),
        Field::new("source", DataType::Utf8, false),
        Field::new("likelihood", DataType::Int64, false),
        Field::new("relevance", DataType::Int64, false),
        Field::new("intensity", DataType::Int64, false),
        Field::new("impact", DataType::Int64, true),
        Field::new("start_year", DataType::Int64, true),
        Field::new("end_year", DataType::Int64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            strings(records, |r| r.country.as_str()),
            strings(records, |r| r.region.as_str()),
            strings(records, |r| r.sector.as_str()),
            strings(records, |r| r.topic.as_str()),
            strings(records, |r| r.pestle.as_str()),
            strings(records, |r| r.source.as_str()),
            ints(records, |r| Some(r.likelihood)),
            ints(records, |r| Some(r.relevance)),
            ints(records, |r| Some(r.intensity)),
            ints(records, |r| r.impact),
            ints(records, |r| r.start_year),
            ints(records, |r| r.end_year),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn write_json(path: &Path, records: &[Record]) -> Result<()> {
    let file = std::fs::File::create(path).context("creating output file")?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), records).context("writing JSON")
}

fn write_csv(path: &Path, records: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV writer")?;
    for record in records {
        writer.serialize(record).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

/// Write a synthetic climate-impact dataset.
#[derive(Debug, Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Output file; the format follows the extension (.json, .csv, .parquet)
    #[arg(default_value = "data/jsondata.json")]
    output: PathBuf,

    /// Number of records to generate
    #[arg(default_value_t = 1000)]
    rows: usize,
}

fn main() -> Result<()> {
    env_logger::init();

    let Args { output: output_path, rows } = Args::parse();

    let mut rng = SimpleRng::new(42);
    let records = generate(rows, &mut rng);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("creating output directory")?;
    }

    let ext = output_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "parquet" | "pq" => write_parquet(&output_path, &records)?,
        "json" => write_json(&output_path, &records)?,
        "csv" => write_csv(&output_path, &records)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    log::info!("Wrote {} records to {}", records.len(), output_path.display());
    println!("Wrote {} climate-impact records to {}", records.len(), output_path.display());
    Ok(())
}
