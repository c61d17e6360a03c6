use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use super::model::{DateField, NumericField, Row, Schema, Table, TextField};

/// Structural problems with an otherwise readable CSV.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("CSV is missing required column '{0}'")]
    MissingColumn(&'static str),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a statistics export from a CSV file on disk.
pub fn load_file(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    read_csv(file).with_context(|| format!("loading {}", path.display()))
}

/// Parse a CSV stream into a [`Table`].
///
/// The header row is required and must contain a `Views` column. Every other
/// known column is optional. Rows shorter than the header are padded with
/// empty cells; rows longer than the header are rejected.
pub fn read_csv<R: Read>(input: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let schema = Schema::resolve(headers);
    if !schema.contains(NumericField::Views) {
        return Err(SchemaError::MissingColumn(NumericField::Views.header()).into());
    }
    let width = schema.headers().len();

    let mut rows = Vec::new();
    let mut coercion_failures = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() > width {
            bail!(
                "CSV row {row_no}: expected {width} fields but found {}",
                record.len()
            );
        }
        let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
        cells.resize(width, String::new());

        let (row, failures) = coerce_row(&schema, cells);
        coercion_failures += failures;
        rows.push(row);
    }

    if coercion_failures > 0 {
        log::warn!(
            "{coercion_failures} date/numeric cells could not be parsed \
             and were treated as missing"
        );
    }

    Ok(Table::new(schema, rows))
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

/// Type the known fields of a row. Returns the row and the number of
/// non-empty cells that failed to coerce.
pub(crate) fn coerce_row(schema: &Schema, cells: Vec<String>) -> (Row, usize) {
    let mut failures = 0;
    let cell = |pos: Option<usize>| pos.and_then(|i| cells.get(i)).map(|s| s.trim());

    let mut dates = [None; 2];
    for field in DateField::ALL {
        if let Some(raw) = cell(schema.position(field)) {
            dates[field.slot()] = parse_datetime(raw);
            if dates[field.slot()].is_none() && !raw.is_empty() {
                failures += 1;
            }
        }
    }

    let mut numbers = [None; 2];
    for field in NumericField::ALL {
        if let Some(raw) = cell(schema.position(field)) {
            numbers[field.slot()] = parse_number(raw);
            if numbers[field.slot()].is_none() && !raw.is_empty() {
                failures += 1;
            }
        }
    }

    let mut texts: [Option<String>; 2] = [None, None];
    for field in TextField::ALL {
        texts[field.slot()] = cell(schema.position(field))
            .filter(|s| !s.is_empty())
            .map(str::to_string);
    }

    let row = Row {
        cells,
        dates,
        numbers,
        texts,
    };
    (row, failures)
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Leniently parse a date or timestamp cell. Returns `None` for anything
/// unrecognised.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Parse a numeric cell; NaN counts as missing.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}
