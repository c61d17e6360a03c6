use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use chrono::NaiveDate;

use super::model::{DateField, NumericField, Row, Table, TextField};

// ---------------------------------------------------------------------------
// Criteria: the active bounds and selections
// ---------------------------------------------------------------------------

/// Every active constraint on a table.
///
/// A field without an entry is unconstrained. Ranges are closed on both ends
/// and an inverted range (start > end) matches nothing. An inclusion set that
/// is present but empty also matches nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub date_ranges: BTreeMap<DateField, RangeInclusive<NaiveDate>>,
    pub numeric_ranges: BTreeMap<NumericField, RangeInclusive<f64>>,
    pub inclusion_sets: BTreeMap<TextField, BTreeSet<String>>,
}

impl FilterCriteria {
    pub fn with_date_range(mut self, field: DateField, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_ranges.insert(field, start..=end);
        self
    }

    pub fn with_numeric_range(mut self, field: NumericField, min: f64, max: f64) -> Self {
        self.numeric_ranges.insert(field, min..=max);
        self
    }

    pub fn with_inclusion<I, S>(mut self, field: TextField, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inclusion_sets
            .insert(field, allowed.into_iter().map(Into::into).collect());
        self
    }

    /// Whether no constraint is active.
    pub fn is_unconstrained(&self) -> bool {
        self.date_ranges.is_empty()
            && self.numeric_ranges.is_empty()
            && self.inclusion_sets.is_empty()
    }

    /// Conjunction of two criteria sets: ranges on the same field intersect,
    /// inclusion sets on the same field intersect.
    pub fn and(mut self, other: &FilterCriteria) -> Self {
        for (field, range) in &other.date_ranges {
            let merged = match self.date_ranges.get(field) {
                Some(cur) => *cur.start().max(range.start())..=*cur.end().min(range.end()),
                None => range.clone(),
            };
            self.date_ranges.insert(*field, merged);
        }
        for (field, range) in &other.numeric_ranges {
            let merged = match self.numeric_ranges.get(field) {
                Some(cur) => {
                    f64::max(*cur.start(), *range.start())..=f64::min(*cur.end(), *range.end())
                }
                None => range.clone(),
            };
            self.numeric_ranges.insert(*field, merged);
        }
        for (field, allowed) in &other.inclusion_sets {
            let merged = match self.inclusion_sets.get(field) {
                Some(cur) => cur.intersection(allowed).cloned().collect(),
                None => allowed.clone(),
            };
            self.inclusion_sets.insert(*field, merged);
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Rows of a table that passed a [`FilterCriteria`], as ascending indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredResult {
    indices: Vec<usize>,
}

impl FilteredResult {
    /// Every row of `table`, in order.
    pub fn all(table: &Table) -> Self {
        FilteredResult {
            indices: (0..table.len()).collect(),
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The selected rows of `table`, in table order.
    ///
    /// `table` should be the table this result was computed from. Indices
    /// past the end of a different table are skipped.
    pub fn rows<'a>(&'a self, table: &'a Table) -> impl Iterator<Item = &'a Row> + 'a {
        self.indices.iter().filter_map(move |&i| table.rows.get(i))
    }

    /// Copy the selected rows into a standalone table with the same schema.
    /// Same precondition as [`FilteredResult::rows`].
    pub fn to_table(&self, table: &Table) -> Table {
        table.select(&self.indices)
    }
}

/// Return the rows of `table` that satisfy every active criterion.
///
/// A row passes when:
/// * each date criterion contains the row's calendar date for that field
/// * each numeric criterion contains the row's value for that field
/// * each inclusion set contains the row's label for that field
///
/// Missing values never satisfy a criterion. Criteria on a column the table
/// does not have are ignored.
pub fn filter(table: &Table, criteria: &FilterCriteria) -> FilteredResult {
    let schema = &table.schema;
    let dates: Vec<_> = criteria
        .date_ranges
        .iter()
        .filter(|(f, _)| schema.contains(**f))
        .collect();
    let numbers: Vec<_> = criteria
        .numeric_ranges
        .iter()
        .filter(|(f, _)| schema.contains(**f))
        .collect();
    let sets: Vec<_> = criteria
        .inclusion_sets
        .iter()
        .filter(|(f, _)| schema.contains(**f))
        .collect();

    let indices = table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            dates
                .iter()
                .all(|(f, range)| row.day(**f).is_some_and(|d| range.contains(&d)))
                && numbers
                    .iter()
                    .all(|(f, range)| row.number(**f).is_some_and(|v| range.contains(&v)))
                && sets
                    .iter()
                    .all(|(f, allowed)| row.text(**f).is_some_and(|t| allowed.contains(t)))
        })
        .map(|(i, _)| i)
        .collect();

    FilteredResult { indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn two_rows() -> Table {
        read_csv("Date,Views,Content\n2024-01-01,100,A\n2024-01-05,50,B\n".as_bytes()).unwrap()
    }

    fn sample() -> Table {
        let csv = "Date,Content,Video title,Duration,Views\n\
                   2024-01-01 08:00:00,Shorts,Intro,30,100\n\
                   2024-01-02,Videos,Deep dive,600,2500\n\
                   bogus,Videos,Broken date,45,70\n\
                   2024-01-03 23:59:59,Shorts,Recap,,900\n\
                   2024-01-04,Live,Stream,3600,n/a\n\
                   2024-01-05,Videos,,120,10\n";
        read_csv(csv.as_bytes()).unwrap()
    }

    #[test]
    fn unconstrained_is_identity() {
        let table = sample();
        let result = filter(&table, &FilterCriteria::default());
        assert_eq!(result, FilteredResult::all(&table));
        assert_eq!(result.to_table(&table), table);
    }

    #[test]
    fn empty_table_yields_empty_result() {
        let table = read_csv("Date,Views\n".as_bytes()).unwrap();
        let criteria =
            FilterCriteria::default().with_numeric_range(NumericField::Views, 0.0, 10.0);
        assert!(filter(&table, &criteria).is_empty());
    }

    #[test]
    fn date_range_truncates_timestamps_to_days() {
        let table = two_rows();
        let criteria = FilterCriteria::default()
            .with_date_range(DateField::Date, ymd(2024, 1, 1), ymd(2024, 1, 3));
        let result = filter(&table, &criteria);
        assert_eq!(result.indices(), [0]);

        let table = sample();
        let criteria = FilterCriteria::default()
            .with_date_range(DateField::Date, ymd(2024, 1, 3), ymd(2024, 1, 3));
        assert_eq!(filter(&table, &criteria).indices(), [3]);
    }

    #[test]
    fn unparsable_values_never_match_a_range() {
        let table = sample();
        let wide = FilterCriteria::default().with_date_range(
            DateField::Date,
            NaiveDate::MIN,
            NaiveDate::MAX,
        );
        assert_eq!(filter(&table, &wide).indices(), [0, 1, 3, 4, 5]);

        let views = FilterCriteria::default().with_numeric_range(
            NumericField::Views,
            f64::NEG_INFINITY,
            f64::INFINITY,
        );
        assert_eq!(filter(&table, &views).indices(), [0, 1, 2, 3, 5]);
    }

    #[test]
    fn numeric_ranges_are_inclusive() {
        let table = sample();
        let criteria =
            FilterCriteria::default().with_numeric_range(NumericField::Views, 100.0, 900.0);
        assert_eq!(filter(&table, &criteria).indices(), [0, 3]);
    }

    #[test]
    fn inverted_ranges_match_nothing() {
        let table = sample();
        let dates = FilterCriteria::default()
            .with_date_range(DateField::Date, ymd(2024, 1, 5), ymd(2024, 1, 1));
        assert!(filter(&table, &dates).is_empty());

        let views = FilterCriteria::default().with_numeric_range(NumericField::Views, 500.0, 10.0);
        assert!(filter(&table, &views).is_empty());
    }

    #[test]
    fn empty_inclusion_set_differs_from_unset() {
        let table = two_rows();
        let none =
            FilterCriteria::default().with_inclusion(TextField::Content, Vec::<String>::new());
        assert!(filter(&table, &none).is_empty());
        assert_eq!(filter(&table, &FilterCriteria::default()).len(), 2);
    }

    #[test]
    fn inclusion_set_excludes_missing_labels() {
        let table = sample();
        let criteria = FilterCriteria::default()
            .with_inclusion(TextField::VideoTitle, ["Intro", "Deep dive", "Stream"]);
        assert_eq!(filter(&table, &criteria).indices(), [0, 1, 4]);
    }

    #[test]
    fn criteria_on_absent_columns_are_skipped() {
        let table = two_rows();
        let criteria = FilterCriteria::default()
            .with_numeric_range(NumericField::Duration, 0.0, 1.0)
            .with_inclusion(TextField::VideoTitle, Vec::<String>::new());
        assert_eq!(filter(&table, &criteria).len(), 2);
    }

    #[test]
    fn criteria_combine_as_conjunction() {
        let table = sample();
        let criteria = FilterCriteria::default()
            .with_inclusion(TextField::Content, ["Videos", "Shorts"])
            .with_numeric_range(NumericField::Duration, 0.0, 200.0);
        assert_eq!(filter(&table, &criteria).indices(), [0, 2, 5]);
    }

    #[test]
    fn result_is_an_ordered_subset_without_duplicates() {
        let table = sample();
        let criteria = FilterCriteria::default()
            .with_inclusion(TextField::Content, ["Videos", "Live"])
            .with_numeric_range(NumericField::Views, 0.0, 5000.0);
        let result = filter(&table, &criteria);
        assert!(result.indices().windows(2).all(|w| w[0] < w[1]));
        assert!(result.indices().iter().all(|&i| i < table.len()));
    }

    #[test]
    fn refiltering_equals_filtering_by_the_conjunction() {
        let table = sample();
        let c1 = FilterCriteria::default()
            .with_date_range(DateField::Date, ymd(2024, 1, 1), ymd(2024, 1, 4))
            .with_inclusion(TextField::Content, ["Videos", "Shorts", "Live"]);
        let c2 = FilterCriteria::default()
            .with_date_range(DateField::Date, ymd(2024, 1, 2), ymd(2024, 1, 5))
            .with_inclusion(TextField::Content, ["Shorts", "Live"])
            .with_numeric_range(NumericField::Duration, 0.0, 5000.0);

        let once = filter(&table, &c1).to_table(&table);
        let twice = filter(&once, &c2).to_table(&once);
        let combined = filter(&table, &c1.clone().and(&c2)).to_table(&table);
        assert_eq!(twice, combined);
        assert_eq!(combined.len(), 1);
        assert_eq!(combined.rows[0].text(TextField::VideoTitle), Some("Stream"));
    }

    #[test]
    fn filtering_is_idempotent_and_leaves_input_untouched() {
        let table = sample();
        let before = table.clone();
        let criteria =
            FilterCriteria::default().with_numeric_range(NumericField::Views, 50.0, 1000.0);
        let first = filter(&table, &criteria);
        let second = filter(&table, &criteria);
        assert_eq!(first, second);
        assert_eq!(table, before);

        let narrowed = first.to_table(&table);
        assert_eq!(filter(&narrowed, &criteria).len(), narrowed.len());
    }

    #[test]
    fn result_applied_to_a_smaller_table_skips_missing_rows() {
        let table = sample();
        let criteria = FilterCriteria::default().with_inclusion(TextField::Content, ["Videos"]);
        let result = filter(&table, &criteria);
        assert_eq!(result.indices(), [1, 2, 5]);

        let smaller = two_rows();
        let rows: Vec<_> = result.rows(&smaller).collect();
        assert_eq!(rows, [&smaller.rows[1]]);

        let copied = result.to_table(&smaller);
        assert_eq!(copied.schema, smaller.schema);
        assert_eq!(copied.rows, [smaller.rows[1].clone()]);
    }
}
