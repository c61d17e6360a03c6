use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::filter::FilteredResult;
use super::model::{DateField, NumericField, Table, TextField};

/// Shown in place of a mean when there are no values to average.
pub const NO_DATA: &str = "no data";

/// Round to two decimal places for display.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Headline metrics for one numeric field over a filtered result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Number of rows in the result.
    pub count: usize,
    /// Sum of the non-missing values.
    pub sum: f64,
    /// Mean of the non-missing values; `None` when there are none.
    pub mean: Option<f64>,
}

impl Summary {
    pub fn of(table: &Table, result: &FilteredResult, field: NumericField) -> Self {
        let (sum, n) = result
            .rows(table)
            .filter_map(|r| r.number(field))
            .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));

        Summary {
            count: result.len(),
            sum,
            mean: (n > 0).then(|| sum / n as f64),
        }
    }

    pub fn sum_label(&self) -> String {
        let sum = round2(self.sum);
        if sum.fract() == 0.0 {
            format!("{sum:.0}")
        } else {
            format!("{sum:.2}")
        }
    }

    pub fn mean_label(&self) -> String {
        match self.mean {
            Some(mean) => format!("{:.2}", round2(mean)),
            None => NO_DATA.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Time series for the chart
// ---------------------------------------------------------------------------

/// Sum `value` per calendar date of `date`, ordered by date.
///
/// Only dates present in the result appear. Rows with a missing date are
/// dropped; missing values contribute nothing to their date's total.
pub fn time_series(
    table: &Table,
    result: &FilteredResult,
    date: DateField,
    value: NumericField,
) -> Vec<(NaiveDate, f64)> {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for row in result.rows(table) {
        if let Some(day) = row.day(date) {
            *totals.entry(day).or_insert(0.0) += row.number(value).unwrap_or(0.0);
        }
    }
    totals.into_iter().collect()
}

/// [`time_series`] split per label of `label`; unlabelled rows are dropped.
pub fn series_by_label(
    table: &Table,
    result: &FilteredResult,
    date: DateField,
    value: NumericField,
    label: TextField,
) -> BTreeMap<String, Vec<(NaiveDate, f64)>> {
    let mut totals: BTreeMap<String, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
    for row in result.rows(table) {
        let (Some(name), Some(day)) = (row.text(label), row.day(date)) else {
            continue;
        };
        *totals
            .entry(name.to_string())
            .or_default()
            .entry(day)
            .or_insert(0.0) += row.number(value).unwrap_or(0.0);
    }
    totals
        .into_iter()
        .map(|(name, per_day)| (name, per_day.into_iter().collect()))
        .collect()
}
