//! Font-size table CSV
//!
//! Two columns: `Dauer` (duration threshold in hours, may be fractional) and
//! `Schriftgröße` (font size in pixels). English headers `hours` and `size`
//! are accepted too.

use serde::Deserialize;
use std::io::{Read, Write};
use weekplan_core::{FontSizeRow, FontSizeTable};

use crate::ParseError;

#[derive(Debug, Deserialize)]
struct FontSizeCsvRow {
    #[serde(rename = "Dauer", alias = "hours", alias = "duration")]
    hours: f64,
    #[serde(rename = "Schriftgröße", alias = "size", alias = "Schriftgroesse")]
    size: u32,
}

/// Parse a font-size table; blank rows are skipped
pub fn parse_font_sizes<R: Read>(reader: R) -> Result<FontSizeTable, ParseError> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv.headers()?.clone();

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        let row: FontSizeCsvRow = record.deserialize(Some(&headers))?;
        if !row.hours.is_finite() || row.hours < 0.0 {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(ParseError::InvalidValue(format!(
                "duration threshold {} at line {line} must be a non-negative number of hours",
                row.hours
            )));
        }
        rows.push(FontSizeRow::hours(row.hours, row.size));
    }

    Ok(FontSizeTable::new(rows))
}

/// Write a font-size table in ascending threshold order
pub fn write_font_sizes<W: Write>(table: &FontSizeTable, writer: W) -> Result<(), ParseError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Dauer", "Schriftgröße"])?;
    for row in table.rows() {
        let hours = row.threshold_minutes as f64 / 60.0;
        csv.write_record([hours.to_string(), row.size.to_string()])?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_and_sorts_rows() {
        let csv = "\
Dauer,Schriftgröße
2,14
0,10
1,12
";
        let table = parse_font_sizes(csv.as_bytes()).unwrap();
        let thresholds: Vec<i64> = table.rows().iter().map(|r| r.threshold_minutes).collect();
        assert_eq!(thresholds, vec![0, 60, 120]);
        assert_eq!(table.select(Duration::minutes(90)).unwrap(), 12);
    }

    #[test]
    fn accepts_fractional_hours_and_english_headers() {
        let csv = "hours,size\n0.5,9\n1.25,11\n";
        let table = parse_font_sizes(csv.as_bytes()).unwrap();
        assert_eq!(table.rows()[0], FontSizeRow::minutes(30, 9));
        assert_eq!(table.rows()[1], FontSizeRow::minutes(75, 11));
    }

    #[test]
    fn skips_blank_rows() {
        let csv = "Dauer,Schriftgröße\n1,12\n,\n";
        let table = parse_font_sizes(csv.as_bytes()).unwrap();
        assert_eq!(table.rows().len(), 1);
    }

    #[test]
    fn rejects_negative_threshold() {
        let csv = "Dauer,Schriftgröße\n-1,12\n";
        assert!(matches!(
            parse_font_sizes(csv.as_bytes()),
            Err(ParseError::InvalidValue(_))
        ));
    }

    #[test]
    fn rejects_non_numeric_size() {
        let csv = "Dauer,Schriftgröße\n1,groß\n";
        assert!(matches!(
            parse_font_sizes(csv.as_bytes()),
            Err(ParseError::Csv { .. })
        ));
    }

    #[test]
    fn writes_sorted_table() {
        let table = FontSizeTable::new([FontSizeRow::hours(2.0, 14), FontSizeRow::hours(0.5, 9)]);
        let mut out = Vec::new();
        write_font_sizes(&table, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Dauer,Schriftgröße\n0.5,9\n2,14\n");
    }
}
