//! Timetable CSV parsing
//!
//! Headers follow the planner's German column names; English aliases are
//! accepted as well:
//!
//! | Column | Alias | Required |
//! |--------|-------|----------|
//! | `Tag` | `day` | yes |
//! | `Startzeit` | `start` | yes |
//! | `Endzeit` | `end` | yes |
//! | `Tutor:in` | `tutor` | no |
//! | `Schwerpunkt` | `topic` | no |
//! | `Ort` | `location` | no |
//! | `Raum` | `room` | no |
//! | `color` | `Farbe` | no |
//!
//! Completely blank rows are skipped, as are rows without a start time.
//! Intervals are not checked here; layout rejects `end <= start`.
//!
//! [`read_timetable`] keeps going past rows with an unknown day or a bad
//! time and hands them back in [`Timetable::invalid_rows`].
//! [`parse_timetable`] fails on the first one.

use chrono::NaiveTime;
use serde::Deserialize;
use std::io::Read;
use tracing::{debug, warn};
use weekplan_core::{Session, Weekday};

use crate::ParseError;

#[derive(Debug, Deserialize)]
struct TimetableRow {
    #[serde(rename = "Tag", alias = "day", default)]
    day: String,
    #[serde(rename = "Startzeit", alias = "start", default)]
    start: String,
    #[serde(rename = "Endzeit", alias = "end", default)]
    end: String,
    #[serde(rename = "Tutor:in", alias = "tutor", default)]
    tutor: String,
    #[serde(rename = "Schwerpunkt", alias = "topic", default)]
    topic: String,
    #[serde(rename = "Ort", alias = "location", default)]
    location: String,
    #[serde(rename = "Raum", alias = "room", default)]
    room: String,
    #[serde(alias = "Farbe", default)]
    color: String,
}

impl TimetableRow {
    fn is_blank(&self) -> bool {
        [
            &self.day,
            &self.start,
            &self.end,
            &self.tutor,
            &self.topic,
            &self.location,
            &self.room,
            &self.color,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }
}

/// Sessions read from a timetable, with the rows that could not be read
#[derive(Debug, Default)]
pub struct Timetable {
    pub sessions: Vec<Session>,
    /// Row-level errors (`UnknownDay`, `InvalidTime`) in file order
    pub invalid_rows: Vec<ParseError>,
}

/// Read timetable CSV data, collecting invalid rows instead of stopping
///
/// Only structural CSV errors abort the read.
pub fn read_timetable<R: Read>(reader: R) -> Result<Timetable, ParseError> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv.headers()?.clone();

    let mut timetable = Timetable::default();
    for record in csv.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: TimetableRow = record.deserialize(Some(&headers))?;

        if row.is_blank() {
            debug!(line, "skipping blank row");
            continue;
        }
        if row.start.is_empty() {
            warn!(line, tutor = %row.tutor, "skipping row without start time");
            continue;
        }

        match session_from_row(row, line) {
            Ok(session) => timetable.sessions.push(session),
            Err(err) => {
                debug!(line, error = %err, "invalid timetable row");
                timetable.invalid_rows.push(err);
            }
        }
    }

    debug!(
        count = timetable.sessions.len(),
        invalid = timetable.invalid_rows.len(),
        "parsed timetable"
    );
    Ok(timetable)
}

/// Parse timetable CSV data into sessions, keeping row order
pub fn parse_timetable<R: Read>(reader: R) -> Result<Vec<Session>, ParseError> {
    let timetable = read_timetable(reader)?;
    match timetable.invalid_rows.into_iter().next() {
        Some(err) => Err(err),
        None => Ok(timetable.sessions),
    }
}

fn session_from_row(row: TimetableRow, line: u64) -> Result<Session, ParseError> {
    let day = Weekday::parse_label(&row.day).ok_or_else(|| ParseError::UnknownDay {
        line,
        value: row.day.clone(),
    })?;
    let start = parse_time(&row.start, line)?;
    let end = parse_time(&row.end, line)?;

    let mut session = Session::new(day, start, end)
        .tutor(row.tutor)
        .topic(row.topic)
        .location(row.location);
    if !row.room.is_empty() {
        session = session.room(row.room);
    }
    if !row.color.is_empty() {
        session = session.color(row.color);
    }
    Ok(session)
}

/// Parse `HH:MM` or `HH:MM:SS`
pub fn parse_time(value: &str, line: u64) -> Result<NaiveTime, ParseError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| ParseError::InvalidTime {
            line,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_german_headers() {
        let csv = "\
Tag,Startzeit,Endzeit,Tutor:in,Schwerpunkt,Ort,Raum,color
Montag,09:00,10:30,Anna,Mathe,WBS,A12,
Mittwoch,14:00,15:00,Ben,Physik,Rüsselsheim,,lightblue
";
        let sessions = parse_timetable(csv.as_bytes()).unwrap();
        assert_eq!(
            sessions,
            vec![
                Session::new(Weekday::Monday, t(9, 0), t(10, 30))
                    .tutor("Anna")
                    .topic("Mathe")
                    .location("WBS")
                    .room("A12"),
                Session::new(Weekday::Wednesday, t(14, 0), t(15, 0))
                    .tutor("Ben")
                    .topic("Physik")
                    .location("Rüsselsheim")
                    .color("lightblue"),
            ]
        );
    }

    #[test]
    fn parses_english_headers_in_any_order() {
        let csv = "\
location,day,end,start,tutor,topic
Online,FR,12:00:00,11:15:00,Cleo,Chemie
";
        let sessions = parse_timetable(csv.as_bytes()).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].day, Weekday::Friday);
        assert_eq!(sessions[0].start, t(11, 15));
        assert_eq!(sessions[0].end, t(12, 0));
        assert_eq!(sessions[0].room, None);
        assert_eq!(sessions[0].color, None);
    }

    #[test]
    fn skips_blank_rows_and_rows_without_start() {
        let csv = "\
Tag,Startzeit,Endzeit,Tutor:in,Schwerpunkt,Ort,Raum,color
,,,,,,,
Dienstag,,,Dana,Informatik,WBS,,
Dienstag,08:00,09:00,Eli,Informatik,WBS,,
";
        let sessions = parse_timetable(csv.as_bytes()).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].tutor, "Eli");
    }

    #[test]
    fn unknown_day_reports_line() {
        let csv = "\
Tag,Startzeit,Endzeit
Montag,09:00,10:00
Feiertag,09:00,10:00
";
        let err = parse_timetable(csv.as_bytes()).unwrap_err();
        match err {
            ParseError::UnknownDay { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "Feiertag");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn read_collects_every_invalid_row() {
        let csv = "\
Tag,Startzeit,Endzeit,Tutor:in
Montag,09:00,10:00,Anna
Feiertag,09:00,10:00,Ben
Dienstag,9 Uhr,10:00,Cleo
Brückentag,11:00,12:00,Dana
Mittwoch,11:00,12:00,Eli
";
        let timetable = read_timetable(csv.as_bytes()).unwrap();
        let tutors: Vec<&str> = timetable.sessions.iter().map(|s| s.tutor.as_str()).collect();
        assert_eq!(tutors, vec!["Anna", "Eli"]);

        let invalid: Vec<(u64, String)> = timetable
            .invalid_rows
            .iter()
            .map(|err| match err {
                ParseError::UnknownDay { line, value } | ParseError::InvalidTime { line, value } => {
                    (*line, value.clone())
                }
                other => panic!("unexpected error: {other}"),
            })
            .collect();
        assert_eq!(
            invalid,
            vec![
                (3, "Feiertag".to_string()),
                (4, "9 Uhr".to_string()),
                (5, "Brückentag".to_string()),
            ]
        );
    }

    #[test]
    fn bad_time_reports_value() {
        let csv = "\
Tag,Startzeit,Endzeit
Montag,9 Uhr,10:00
";
        let err = parse_timetable(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidTime { line: 2, ref value } if value == "9 Uhr"));
    }

    #[test]
    fn missing_end_is_an_error() {
        let csv = "\
Tag,Startzeit,Endzeit
Montag,09:00,
";
        assert!(matches!(
            parse_timetable(csv.as_bytes()),
            Err(ParseError::InvalidTime { .. })
        ));
    }

    #[test]
    fn inverted_interval_passes_through_to_layout() {
        let csv = "\
Tag,Startzeit,Endzeit
Montag,11:00,10:00
";
        let sessions = parse_timetable(csv.as_bytes()).unwrap();
        assert!(!sessions[0].has_valid_interval());
    }
}
