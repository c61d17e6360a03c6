use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use ytdat::data::aggregate::{Summary, series_by_label, time_series};
use ytdat::data::filter::{FilterCriteria, FilteredResult, filter};
use ytdat::data::model::{DateField, NumericField, Table, TextField};
use ytdat::data::{export, loader};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Widget state
// ---------------------------------------------------------------------------

/// A date range picker, seeded with the observed first and last day.
#[derive(Debug, Clone, PartialEq)]
pub struct DateControl {
    pub field: DateField,
    pub bounds: (NaiveDate, NaiveDate),
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A min/max pair, seeded with the observed extremes.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericControl {
    pub field: NumericField,
    pub bounds: (f64, f64),
    pub min: f64,
    pub max: f64,
}

/// A multi-select over the distinct labels of a column.
#[derive(Debug, Clone, PartialEq)]
pub struct TextControl {
    pub field: TextField,
    pub options: BTreeSet<String>,
    pub selected: BTreeSet<String>,
}

/// Sidebar widget values for the loaded table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterControls {
    pub dates: Vec<DateControl>,
    pub numbers: Vec<NumericControl>,
    pub texts: Vec<TextControl>,
}

impl FilterControls {
    /// One widget per known column present in `table`, each set to its full
    /// extent. Range widgets are skipped for columns with no parsable values.
    pub fn seed(table: &Table) -> Self {
        let dates = DateField::ALL
            .into_iter()
            .filter(|f| table.schema.contains(*f))
            .filter_map(|field| {
                let (lo, hi) = table.date_bounds(field)?;
                Some(DateControl {
                    field,
                    bounds: (lo, hi),
                    start: lo,
                    end: hi,
                })
            })
            .collect();

        let numbers = NumericField::ALL
            .into_iter()
            .filter(|f| table.schema.contains(*f))
            .filter_map(|field| {
                let (lo, hi) = table.numeric_bounds(field)?;
                Some(NumericControl {
                    field,
                    bounds: (lo, hi),
                    min: lo,
                    max: hi,
                })
            })
            .collect();

        let texts = TextField::ALL
            .into_iter()
            .filter(|f| table.schema.contains(*f))
            .map(|field| {
                let options = table.unique_labels(field);
                TextControl {
                    field,
                    selected: options.clone(),
                    options,
                }
            })
            .collect();

        FilterControls {
            dates,
            numbers,
            texts,
        }
    }

    /// Criteria for the widgets the user has moved away from their full
    /// extent. Untouched widgets add no constraint, so rows with missing
    /// values stay visible until the user narrows that column.
    pub fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::default();
        for c in &self.dates {
            if (c.start, c.end) != c.bounds {
                criteria = criteria.with_date_range(c.field, c.start, c.end);
            }
        }
        for c in &self.numbers {
            if (c.min, c.max) != c.bounds {
                criteria = criteria.with_numeric_range(c.field, c.min, c.max);
            }
        }
        for c in &self.texts {
            if c.selected != c.options {
                criteria = criteria.with_inclusion(c.field, c.selected.iter().cloned());
            }
        }
        criteria
    }
}

impl TextControl {
    pub fn select_all(&mut self) {
        self.selected = self.options.clone();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    /// Flip a single label in or out of the selection.
    pub fn toggle(&mut self, label: &str) {
        if !self.selected.remove(label) {
            self.selected.insert(label.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded table (None until the user opens a file).
    pub table: Option<Table>,

    /// Path the table was read from.
    pub source: Option<PathBuf>,

    /// Sidebar widget values.
    pub controls: FilterControls,

    /// Rows passing the current controls (recomputed on every change).
    pub result: FilteredResult,

    /// Metrics over `result`.
    pub summary: Option<Summary>,

    /// Views per day over `result`.
    pub series: Vec<(NaiveDate, f64)>,

    /// Views per day over `result`, one series per `Content` label.
    pub series_by_content: BTreeMap<String, Vec<(NaiveDate, f64)>>,

    /// Draw one line per `Content` label instead of the total.
    pub split_by_content: bool,

    /// Line colour per `Content` label.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded table and reset every widget to its full extent.
    pub fn set_table(&mut self, table: Table, source: Option<PathBuf>) {
        self.controls = FilterControls::seed(&table);
        self.color_map = table
            .schema
            .contains(TextField::Content)
            .then(|| ColorMap::new(&table.unique_labels(TextField::Content)));
        self.table = Some(table);
        self.source = source;
        self.status_message = None;
        self.refilter();
    }

    /// Load `path`, replacing the current table on success. On failure the
    /// error is logged and shown, and the current table is kept.
    pub fn open_path(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows with columns {:?} from {}",
                    table.len(),
                    table.schema.headers(),
                    path.display()
                );
                self.set_table(table, Some(path.to_path_buf()));
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Write the current selection to `path`.
    pub fn save_path(&mut self, path: &Path) {
        let Some(table) = &self.table else {
            return;
        };
        match export::save_csv(path, table, &self.result) {
            Ok(()) => {
                log::info!("Saved {} rows to {}", self.result.len(), path.display());
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to save file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// The date column the chart is drawn against.
    pub fn chart_date_field(&self) -> Option<DateField> {
        self.table.as_ref().and_then(chart_date_field)
    }

    /// Recompute the result and everything derived from it.
    pub fn refilter(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        let criteria = self.controls.criteria();
        self.result = filter(table, &criteria);
        self.summary = Some(Summary::of(table, &self.result, NumericField::Views));

        (self.series, self.series_by_content) = match chart_date_field(table) {
            Some(date) => (
                time_series(table, &self.result, date, NumericField::Views),
                series_by_label(
                    table,
                    &self.result,
                    date,
                    NumericField::Views,
                    TextField::Content,
                ),
            ),
            None => Default::default(),
        };

        log::debug!(
            "{} of {} rows match {criteria:?}",
            self.result.len(),
            table.len()
        );
    }

    /// Put every widget back to its full extent.
    pub fn reset_filters(&mut self) {
        if let Some(table) = &self.table {
            self.controls = FilterControls::seed(table);
            self.refilter();
        }
    }
}

/// `Date` when present, otherwise `Video publish time`.
fn chart_date_field(table: &Table) -> Option<DateField> {
    DateField::ALL
        .into_iter()
        .find(|f| table.schema.contains(*f))
}
