use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, NaiveTime};

use super::filter::FilteredResult;
use super::model::{DateField, Table, TextField};

pub const FILTERED_FILE_NAME: &str = "filtered_data.csv";
pub const FILTERED_YOUTUBE_FILE_NAME: &str = "filtered_youtube_data.csv";

/// Suggested name for a saved selection. Exports with a `Content` column are
/// per-video YouTube reports and get the more specific name.
pub fn default_file_name(table: &Table) -> &'static str {
    if table.schema.contains(TextField::Content) {
        FILTERED_YOUTUBE_FILE_NAME
    } else {
        FILTERED_FILE_NAME
    }
}

/// ISO form used when writing date columns back out.
pub fn format_datetime(dt: NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()
    }
}

/// Write the selected rows as CSV: original header row, original column order,
/// no index column.
///
/// Date columns are re-rendered from their parsed value (missing → empty);
/// every other cell is written exactly as it was read.
pub fn write_csv<W: Write>(table: &Table, result: &FilteredResult, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(table.schema.headers())
        .context("writing CSV header")?;

    let date_columns: Vec<(usize, DateField)> = DateField::ALL
        .into_iter()
        .filter_map(|f| table.schema.position(f).map(|pos| (pos, f)))
        .collect();

    for row in result.rows(table) {
        let record = row.cells.iter().enumerate().map(|(idx, cell)| {
            match date_columns.iter().find(|(pos, _)| *pos == idx) {
                Some((_, field)) => row.date(*field).map(format_datetime).unwrap_or_default(),
                None => cell.clone(),
            }
        });
        writer.write_record(record).context("writing CSV row")?;
    }

    writer.flush().context("flushing CSV output")?;
    Ok(())
}

/// [`write_csv`] into an in-memory string.
pub fn to_csv_string(table: &Table, result: &FilteredResult) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(table, result, &mut buf)?;
    String::from_utf8(buf).context("CSV output is not valid UTF-8")
}

/// [`write_csv`] into a file, replacing it if it exists.
pub fn save_csv(path: &Path, table: &Table, result: &FilteredResult) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(table, result, std::io::BufWriter::new(file))
        .with_context(|| format!("saving {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{FilterCriteria, filter};
    use crate::data::loader::read_csv;
    use crate::data::model::{Field, NumericField};

    const SOURCE: &str = "Content,Date,Video title,Channel,Duration,Views\n\
                          Shorts,\"Jan 5, 2024\",\"Hello, world\",main,30,100\n\
                          Videos,2024-01-06 14:30:00,Deep dive,main,600,2500\n\
                          Videos,oops,Broken,alt,45,70\n";

    fn assert_same_values(a: &Table, b: &Table) {
        assert_eq!(a.len(), b.len());
        for (ra, rb) in a.rows.iter().zip(&b.rows) {
            for field in Field::ALL {
                match field {
                    Field::Date(f) => assert_eq!(ra.date(f), rb.date(f)),
                    Field::Numeric(f) => assert_eq!(ra.number(f), rb.number(f)),
                    Field::Text(f) => assert_eq!(ra.text(f), rb.text(f)),
                }
            }
        }
    }

    #[test]
    fn keeps_header_and_column_order() {
        let table = read_csv(SOURCE.as_bytes()).unwrap();
        let out = to_csv_string(&table, &FilteredResult::all(&table)).unwrap();
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("Content,Date,Video title,Channel,Duration,Views")
        );
        assert_eq!(lines.next(), Some("Shorts,2024-01-05,\"Hello, world\",main,30,100"));
        assert_eq!(lines.next(), Some("Videos,2024-01-06 14:30:00,Deep dive,main,600,2500"));
        assert_eq!(lines.next(), Some("Videos,,Broken,alt,45,70"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_result_is_header_only() {
        let table = read_csv(SOURCE.as_bytes()).unwrap();
        let none = filter(
            &table,
            &FilterCriteria::default().with_numeric_range(NumericField::Views, 1.0, 0.0),
        );
        let out = to_csv_string(&table, &none).unwrap();
        assert_eq!(out, "Content,Date,Video title,Channel,Duration,Views\n");
    }

    #[test]
    fn filtered_output_reads_back_to_the_same_values() {
        let table = read_csv(SOURCE.as_bytes()).unwrap();
        let criteria = FilterCriteria::default().with_inclusion(TextField::Content, ["Videos"]);
        let result = filter(&table, &criteria);

        let out = to_csv_string(&table, &result).unwrap();
        let reread = read_csv(out.as_bytes()).unwrap();

        assert_eq!(reread.schema.headers(), table.schema.headers());
        assert_same_values(&reread, &result.to_table(&table));
        assert_eq!(reread.rows[1].cells[3], "alt");
    }

    #[test]
    fn fractional_seconds_survive_export() {
        let table = read_csv("Date,Views\n2024-01-05 13:45:10.500,5\n".as_bytes()).unwrap();
        let out = to_csv_string(&table, &FilteredResult::all(&table)).unwrap();
        assert_eq!(out, "Date,Views\n2024-01-05 13:45:10.500,5\n");

        let reread = read_csv(out.as_bytes()).unwrap();
        assert_eq!(
            reread.rows[0].date(DateField::Date),
            table.rows[0].date(DateField::Date)
        );
    }

    #[test]
    fn default_name_depends_on_content_column() {
        let youtube = read_csv(SOURCE.as_bytes()).unwrap();
        assert_eq!(default_file_name(&youtube), FILTERED_YOUTUBE_FILE_NAME);

        let plain = read_csv("Date,Views\n2024-01-01,3\n".as_bytes()).unwrap();
        assert_eq!(default_file_name(&plain), FILTERED_FILE_NAME);
    }

    #[test]
    fn saves_to_disk() {
        let table = read_csv(SOURCE.as_bytes()).unwrap();
        let path = std::env::temp_dir().join(format!("ytdat-export-{}.csv", std::process::id()));
        save_csv(&path, &table, &FilteredResult::all(&table)).unwrap();
        let reread = crate::data::loader::load_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_same_values(&reread, &table);
    }
}
