use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// Fields – the fixed set of columns the dashboard knows how to filter
// ---------------------------------------------------------------------------

/// Columns holding a date or timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DateField {
    Date,
    PublishTime,
}

/// Columns holding a number (views, seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericField {
    Views,
    Duration,
}

/// Columns holding a label or free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextField {
    Content,
    VideoTitle,
}

impl DateField {
    pub const ALL: [DateField; 2] = [DateField::Date, DateField::PublishTime];

    pub fn header(self) -> &'static str {
        match self {
            DateField::Date => "Date",
            DateField::PublishTime => "Video publish time",
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            DateField::Date => 0,
            DateField::PublishTime => 1,
        }
    }
}

impl NumericField {
    pub const ALL: [NumericField; 2] = [NumericField::Views, NumericField::Duration];

    pub fn header(self) -> &'static str {
        match self {
            NumericField::Views => "Views",
            NumericField::Duration => "Duration",
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            NumericField::Views => 0,
            NumericField::Duration => 1,
        }
    }
}

impl TextField {
    pub const ALL: [TextField; 2] = [TextField::Content, TextField::VideoTitle];

    pub fn header(self) -> &'static str {
        match self {
            TextField::Content => "Content",
            TextField::VideoTitle => "Video title",
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            TextField::Content => 0,
            TextField::VideoTitle => 1,
        }
    }
}

/// Any known column, tagged with how its cells are typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Date(DateField),
    Numeric(NumericField),
    Text(TextField),
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Date(DateField::Date),
        Field::Date(DateField::PublishTime),
        Field::Text(TextField::Content),
        Field::Text(TextField::VideoTitle),
        Field::Numeric(NumericField::Duration),
        Field::Numeric(NumericField::Views),
    ];

    pub fn header(self) -> &'static str {
        match self {
            Field::Date(f) => f.header(),
            Field::Numeric(f) => f.header(),
            Field::Text(f) => f.header(),
        }
    }

    /// Resolve a CSV header to a known field. Surrounding whitespace is ignored.
    pub fn from_header(header: &str) -> Option<Field> {
        let header = header.trim();
        Field::ALL.into_iter().find(|f| f.header() == header)
    }
}

impl From<DateField> for Field {
    fn from(f: DateField) -> Self {
        Field::Date(f)
    }
}

impl From<NumericField> for Field {
    fn from(f: NumericField) -> Self {
        Field::Numeric(f)
    }
}

impl From<TextField> for Field {
    fn from(f: TextField) -> Self {
        Field::Text(f)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ---------------------------------------------------------------------------
// Schema – header order plus the position of every known field
// ---------------------------------------------------------------------------

/// Column layout of a loaded file, resolved once at load time.
///
/// Every header is kept (so exports reproduce the source columns), but only
/// headers matching a [`Field`] are typed. When a header is repeated the first
/// occurrence wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    headers: Vec<String>,
    positions: BTreeMap<Field, usize>,
}

impl Schema {
    pub fn resolve(headers: Vec<String>) -> Self {
        let mut positions = BTreeMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(field) = Field::from_header(header) {
                positions.entry(field).or_insert(idx);
            }
        }
        Schema { headers, positions }
    }

    /// All source headers in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn position(&self, field: impl Into<Field>) -> Option<usize> {
        self.positions.get(&field.into()).copied()
    }

    pub fn contains(&self, field: impl Into<Field>) -> bool {
        self.positions.contains_key(&field.into())
    }

    /// Known fields present in this file, in header order.
    pub fn fields(&self) -> Vec<Field> {
        let mut fields: Vec<(usize, Field)> =
            self.positions.iter().map(|(f, i)| (*i, *f)).collect();
        fields.sort();
        fields.into_iter().map(|(_, f)| f).collect()
    }
}

// ---------------------------------------------------------------------------
// Row – one line of the source CSV
// ---------------------------------------------------------------------------

/// A single record: the raw cells plus the typed value of each known field.
///
/// Typed values are `None` when the column is absent, the cell is empty, or
/// the cell could not be coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Raw cells in header order.
    pub cells: Vec<String>,
    pub(crate) dates: [Option<NaiveDateTime>; 2],
    pub(crate) numbers: [Option<f64>; 2],
    pub(crate) texts: [Option<String>; 2],
}

impl Row {
    pub fn date(&self, field: DateField) -> Option<NaiveDateTime> {
        self.dates[field.slot()]
    }

    /// The field's value truncated to its calendar date.
    pub fn day(&self, field: DateField) -> Option<NaiveDate> {
        self.date(field).map(|dt| dt.date())
    }

    pub fn number(&self, field: NumericField) -> Option<f64> {
        self.numbers[field.slot()]
    }

    pub fn text(&self, field: TextField) -> Option<&str> {
        self.texts[field.slot()].as_deref()
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded file
// ---------------------------------------------------------------------------

/// All rows of a loaded file, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub schema: Schema,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(schema: Schema, rows: Vec<Row>) -> Self {
        Table { schema, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Earliest and latest calendar date observed in a date column.
    pub fn date_bounds(&self, field: DateField) -> Option<(NaiveDate, NaiveDate)> {
        let mut days = self.rows.iter().filter_map(|r| r.day(field));
        let first = days.next()?;
        Some(days.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// Smallest and largest value observed in a numeric column.
    pub fn numeric_bounds(&self, field: NumericField) -> Option<(f64, f64)> {
        let mut values = self.rows.iter().filter_map(|r| r.number(field));
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Sorted set of distinct non-missing labels in a text column.
    pub fn unique_labels(&self, field: TextField) -> BTreeSet<String> {
        self.rows
            .iter()
            .filter_map(|r| r.text(field))
            .map(str::to_string)
            .collect()
    }

    /// A new table with the same schema holding the rows at `indices`.
    /// Out-of-range indices are skipped.
    pub fn select(&self, indices: &[usize]) -> Table {
        Table {
            schema: self.schema.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i))
                .cloned()
                .collect(),
        }
    }
}
