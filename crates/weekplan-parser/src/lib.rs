//! # weekplan-parser
//!
//! Input loading for weekplan.
//!
//! This crate provides:
//! - Timetable CSV parsing (`Tag, Startzeit, Endzeit, Tutor:in, Schwerpunkt, Ort, Raum, color`)
//! - Font-size table CSV parsing and writing (`Dauer, Schriftgröße`)
//! - TOML plan configuration
//!
//! ## Example
//!
//! ```rust
//! use weekplan_core::Weekday;
//! use weekplan_parser::parse_timetable;
//!
//! let csv = "\
//! Tag,Startzeit,Endzeit,Tutor:in,Schwerpunkt,Ort,Raum,color
//! Montag,09:00,10:30,Anna,Mathe,WBS,A12,
//! ";
//!
//! let sessions = parse_timetable(csv.as_bytes()).unwrap();
//! assert_eq!(sessions.len(), 1);
//! assert_eq!(sessions[0].day, Weekday::Monday);
//! assert_eq!(sessions[0].tutor, "Anna");
//! ```

pub mod config;
pub mod font_sizes;
pub mod timetable;

pub use config::{parse_config, FontSizeEntry, PlanConfig};
pub use font_sizes::{parse_font_sizes, write_font_sizes};
pub use timetable::{parse_timetable, read_timetable, Timetable};

use std::path::Path;
use thiserror::Error;
use weekplan_core::{FontSizeTable, Session};

/// Parsing error
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("CSV error at line {line}: {message}")]
    Csv { line: u64, message: String },

    #[error("Invalid time {value:?} at line {line}: expected HH:MM")]
    InvalidTime { line: u64, value: String },

    #[error("Unknown day {value:?} at line {line}")]
    UnknownDay { line: u64, value: String },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        ParseError::Csv {
            line,
            message: err.to_string(),
        }
    }
}

/// Parse a timetable CSV file
pub fn parse_timetable_file(path: &Path) -> Result<Vec<Session>, ParseError> {
    let file = std::fs::File::open(path)?;
    parse_timetable(file)
}

/// Read a timetable CSV file, collecting invalid rows
pub fn read_timetable_file(path: &Path) -> Result<Timetable, ParseError> {
    let file = std::fs::File::open(path)?;
    read_timetable(file)
}

/// Parse a font-size table CSV file
pub fn parse_font_sizes_file(path: &Path) -> Result<FontSizeTable, ParseError> {
    let file = std::fs::File::open(path)?;
    parse_font_sizes(file)
}

/// Write a font-size table CSV file, sorted by threshold
pub fn write_font_sizes_file(table: &FontSizeTable, path: &Path) -> Result<(), ParseError> {
    let file = std::fs::File::create(path)?;
    write_font_sizes(table, file)
}

/// Parse a TOML plan configuration file
pub fn parse_config_file(path: &Path) -> Result<PlanConfig, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn timetable_file_not_found() {
        let result = parse_timetable_file(Path::new("/nonexistent/timetable.csv"));
        assert!(matches!(result, Err(ParseError::Io(_))));
    }

    #[test]
    fn timetable_file_roundtrip_through_disk() {
        let mut file = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "Tag,Startzeit,Endzeit,Tutor:in,Schwerpunkt,Ort,Raum,color").unwrap();
        writeln!(file, "Dienstag,13:00,14:00,Ben,Physik,Online,,").unwrap();

        let sessions = parse_timetable_file(file.path()).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].location, "Online");
        assert_eq!(sessions[0].room, None);
    }

    #[test]
    fn font_sizes_written_and_read_back() {
        let table = FontSizeTable::new([
            weekplan_core::FontSizeRow::hours(1.5, 12),
            weekplan_core::FontSizeRow::hours(0.0, 9),
        ]);
        let file = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
        write_font_sizes_file(&table, file.path()).unwrap();

        let read = parse_font_sizes_file(file.path()).unwrap();
        assert_eq!(read, table);
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::InvalidTime {
            line: 4,
            value: "9h".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 4"));
        assert!(msg.contains("9h"));

        let err = ParseError::UnknownDay {
            line: 2,
            value: "Funday".into(),
        };
        assert!(err.to_string().contains("Funday"));

        let err = ParseError::Config("bad".into());
        assert!(err.to_string().contains("bad"));
    }
}
