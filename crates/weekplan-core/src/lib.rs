//! # weekplan-core
//!
//! Core domain model and traits for the weekplan session planner.
//!
//! This crate provides:
//! - Domain types: `Weekday`, `Session`, `WeekConfig`, `FontSizeTable`, `WeekPlan`
//! - Layout results: `WeekLayout`, `DayLayout`, `Placement`
//! - Core traits: `Layouter`, `Renderer`
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveTime;
//! use weekplan_core::{Session, Weekday, WeekConfig};
//!
//! let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
//! let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
//! let eleven = NaiveTime::from_hms_opt(11, 0, 0).unwrap();
//!
//! let math = Session::new(Weekday::Monday, nine, ten).tutor("Anna").topic("Mathe");
//! let physics = Session::new(Weekday::Monday, ten, eleven).tutor("Ben").topic("Physik");
//!
//! // Back-to-back sessions do not overlap
//! assert!(!math.overlaps(&physics));
//!
//! let week = WeekConfig::through(Weekday::Friday);
//! assert_eq!(week.slot(Weekday::Monday), Some(0));
//! assert_eq!(week.slot(Weekday::Saturday), None);
//! ```

pub mod layout;

pub use layout::{Bar, DayLayout, PlacedSession, Placement, WeekLayout};

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Identity of a session: its position in the caller-owned session slice
pub type SessionId = usize;

/// Default title; `{week}` is replaced with the ISO calendar week
pub const DEFAULT_TITLE: &str = "Helpdeskplan für KW {week}";

// ============================================================================
// Weekday
// ============================================================================

/// One of the seven weekday buckets a session can belong to
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Zero-based position within the week (Monday = 0)
    pub fn index(self) -> usize {
        self as usize
    }

    /// German label as used in timetables ("Montag", ...)
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Monday => "Montag",
            Weekday::Tuesday => "Dienstag",
            Weekday::Wednesday => "Mittwoch",
            Weekday::Thursday => "Donnerstag",
            Weekday::Friday => "Freitag",
            Weekday::Saturday => "Samstag",
            Weekday::Sunday => "Sonntag",
        }
    }

    /// English name
    pub fn english(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Two-letter German abbreviation ("MO", "DI", ...)
    pub fn abbreviation(self) -> &'static str {
        match self {
            Weekday::Monday => "MO",
            Weekday::Tuesday => "DI",
            Weekday::Wednesday => "MI",
            Weekday::Thursday => "DO",
            Weekday::Friday => "FR",
            Weekday::Saturday => "SA",
            Weekday::Sunday => "SO",
        }
    }

    /// Recognise a weekday label.
    ///
    /// Accepts German and English names, German two-letter abbreviations,
    /// and English two- and three-letter abbreviations, ignoring case and
    /// surrounding whitespace.
    pub fn parse_label(label: &str) -> Option<Self> {
        let needle = label.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        Self::ALL.into_iter().find(|day| {
            let english = day.english().to_lowercase();
            needle == day.label().to_lowercase()
                || needle == english
                || needle == day.abbreviation().to_lowercase()
                || needle == english[..2]
                || needle == english[..3]
        })
    }

    /// Convert from chrono's weekday
    pub fn from_chrono(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_monday() as usize]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A label that names none of the seven weekdays
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Unknown weekday: {0:?}")]
pub struct UnknownWeekday(pub String);

impl FromStr for Weekday {
    type Err = UnknownWeekday;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_label(s).ok_or_else(|| UnknownWeekday(s.to_string()))
    }
}

// ============================================================================
// Session
// ============================================================================

/// A tutoring session occupying a half-open time interval `[start, end)` on one day
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// Tutor running the session
    pub tutor: String,
    /// Subject focus
    pub topic: String,
    /// Site ("Rüsselsheim", "WBS", "Online", ...)
    pub location: String,
    /// Room within the site
    pub room: Option<String>,
    /// Explicit fill colour, overriding the location colour
    pub color: Option<String>,
}

impl Session {
    /// Create a session with empty payload
    pub fn new(day: Weekday, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            day,
            start,
            end,
            tutor: String::new(),
            topic: String::new(),
            location: String::new(),
            room: None,
            color: None,
        }
    }

    /// Set the tutor
    pub fn tutor(mut self, tutor: impl Into<String>) -> Self {
        self.tutor = tutor.into();
        self
    }

    /// Set the topic
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    /// Set the location
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Set the room
    pub fn room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// Set an explicit colour
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Length of the session
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// `end` strictly after `start`
    pub fn has_valid_interval(&self) -> bool {
        self.end > self.start
    }

    /// Whether two sessions on the same day share any instant.
    ///
    /// Touching endpoints do not count: `[9:00, 10:00)` and `[10:00, 11:00)`
    /// do not overlap.
    pub fn overlaps(&self, other: &Session) -> bool {
        self.day == other.day && intervals_overlap(self.start, self.end, other.start, other.end)
    }

    /// Time range as displayed on charts, e.g. "09:00-10:30"
    pub fn time_range(&self) -> String {
        format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Half-open interval intersection test
pub fn intervals_overlap<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && b_start < a_end
}

// ============================================================================
// Week Configuration
// ============================================================================

/// Which weekdays are laid out, in which order, and how wide each one is.
///
/// Widths are relative factors: a day of width 2 is drawn twice as wide as a
/// day of width 1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeekConfig {
    /// Day for each layout slot
    pub days: Vec<Weekday>,
    /// Width factor for each slot
    pub day_widths: Vec<f64>,
}

impl Default for WeekConfig {
    fn default() -> Self {
        Self::through(Weekday::Friday)
    }
}

impl WeekConfig {
    /// Lay out the given days, each with width 1
    pub fn new(days: Vec<Weekday>) -> Self {
        let day_widths = vec![1.0; days.len()];
        Self { days, day_widths }
    }

    /// Monday up to and including `last`
    pub fn through(last: Weekday) -> Self {
        Self::new(Weekday::ALL[..=last.index()].to_vec())
    }

    /// Set per-day width factors
    pub fn with_widths(mut self, widths: Vec<f64>) -> Self {
        self.day_widths = widths;
        self
    }

    /// Layout slot of a day, if the day is part of the week
    pub fn slot(&self, day: Weekday) -> Option<usize> {
        self.days.iter().position(|d| *d == day)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Width factor of a slot
    pub fn day_width(&self, slot: usize) -> f64 {
        self.day_widths.get(slot).copied().unwrap_or(1.0)
    }

    /// Left edge of every slot plus the right edge of the last one
    pub fn day_offsets(&self) -> Vec<f64> {
        let mut offsets = Vec::with_capacity(self.days.len() + 1);
        let mut acc = 0.0;
        offsets.push(acc);
        for slot in 0..self.days.len() {
            acc += self.day_width(slot);
            offsets.push(acc);
        }
        offsets
    }

    /// Sum of all width factors
    pub fn total_width(&self) -> f64 {
        (0..self.days.len()).map(|slot| self.day_width(slot)).sum()
    }

    /// Reject empty weeks, repeated days, and bad widths
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.days.is_empty() {
            return Err(LayoutError::InvalidConfig("week has no days".into()));
        }
        for (i, day) in self.days.iter().enumerate() {
            if self.days[..i].contains(day) {
                return Err(LayoutError::InvalidConfig(format!("{day} appears twice")));
            }
        }
        if self.day_widths.len() != self.days.len() {
            return Err(LayoutError::InvalidConfig(format!(
                "{} day widths given for {} days",
                self.day_widths.len(),
                self.days.len()
            )));
        }
        if let Some(width) = self.day_widths.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "day width must be positive, got {width}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Font Size Table
// ============================================================================

/// One bucket: sessions lasting at least `threshold_minutes` use `size`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSizeRow {
    pub threshold_minutes: i64,
    pub size: u32,
}

impl FontSizeRow {
    pub const fn minutes(threshold_minutes: i64, size: u32) -> Self {
        Self {
            threshold_minutes,
            size,
        }
    }

    /// Threshold given in (possibly fractional) hours
    pub fn hours(threshold_hours: f64, size: u32) -> Self {
        Self::minutes((threshold_hours * 60.0).round() as i64, size)
    }

    pub fn threshold(&self) -> Duration {
        Duration::minutes(self.threshold_minutes)
    }
}

/// Duration-keyed font size lookup.
///
/// Rows are kept in ascending threshold order; rows with equal thresholds
/// keep their insertion order, so the later one wins on lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSizeTable {
    rows: Vec<FontSizeRow>,
}

impl Default for FontSizeTable {
    fn default() -> Self {
        Self::new([
            FontSizeRow::hours(0.0, 10),
            FontSizeRow::hours(1.0, 12),
            FontSizeRow::hours(2.0, 14),
        ])
    }
}

impl FontSizeTable {
    pub fn new(rows: impl IntoIterator<Item = FontSizeRow>) -> Self {
        let mut rows: Vec<FontSizeRow> = rows.into_iter().collect();
        rows.sort_by_key(|r| r.threshold_minutes);
        Self { rows }
    }

    pub fn rows(&self) -> &[FontSizeRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Size of the last bucket whose threshold is not above `duration`.
    ///
    /// The final bucket is open-ended. A duration below the smallest
    /// threshold is a configuration error.
    pub fn select(&self, duration: Duration) -> Result<u32, LayoutError> {
        let seconds = duration.num_seconds();
        self.rows
            .iter()
            .rev()
            .find(|row| row.threshold_minutes * 60 <= seconds)
            .map(|row| row.size)
            .ok_or(LayoutError::NoDurationBucket {
                minutes: duration.num_minutes(),
            })
    }
}

// ============================================================================
// Week Plan
// ============================================================================

/// Everything one layout and render run works on
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeekPlan {
    /// Chart title, `{week}` is replaced by the ISO week number
    pub title: String,
    /// Any date inside the planned week
    pub week_of: NaiveDate,
    /// Sessions in input order; positions are the session ids
    pub sessions: Vec<Session>,
    pub week: WeekConfig,
    pub font_sizes: FontSizeTable,
    /// Fill colour per location
    pub colors: BTreeMap<String, String>,
    /// First time shown on the planner grid
    pub grid_start: NaiveTime,
    /// Last time shown on the planner grid
    pub grid_end: NaiveTime,
    /// Planner row height in minutes
    pub slot_minutes: u32,
}

impl WeekPlan {
    /// Create a plan with default week, colours and grid
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            week_of: NaiveDate::default(),
            sessions: Vec::new(),
            week: WeekConfig::default(),
            font_sizes: FontSizeTable::default(),
            colors: Self::default_colors(),
            grid_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            grid_end: NaiveTime::from_hms_opt(20, 0, 0).unwrap_or_default(),
            slot_minutes: 30,
        }
    }

    /// Location colours of the helpdesk sites
    pub fn default_colors() -> BTreeMap<String, String> {
        [
            ("Rüsselsheim", "#E2EFDA"),
            ("WBS", "#DDEBF7"),
            ("Online", "#FFF2CC"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    pub fn week_of(mut self, date: NaiveDate) -> Self {
        self.week_of = date;
        self
    }

    pub fn sessions(mut self, sessions: Vec<Session>) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn week(mut self, week: WeekConfig) -> Self {
        self.week = week;
        self
    }

    pub fn font_sizes(mut self, table: FontSizeTable) -> Self {
        self.font_sizes = table;
        self
    }

    /// Set or replace the colour of one location
    pub fn color(mut self, location: impl Into<String>, color: impl Into<String>) -> Self {
        self.colors.insert(location.into(), color.into());
        self
    }

    /// Set the planner grid
    pub fn grid(mut self, start: NaiveTime, end: NaiveTime, slot_minutes: u32) -> Self {
        self.grid_start = start;
        self.grid_end = end;
        self.slot_minutes = slot_minutes;
        self
    }

    /// ISO calendar week and ISO year of the planned week
    pub fn calendar_week(&self) -> (u32, i32) {
        let iso = self.week_of.iso_week();
        (iso.week(), iso.year())
    }

    /// Monday of the planned week
    pub fn week_monday(&self) -> NaiveDate {
        let back = self.week_of.weekday().num_days_from_monday();
        self.week_of - Duration::days(i64::from(back))
    }

    /// Calendar date of a weekday in the planned week
    pub fn date_of(&self, day: Weekday) -> NaiveDate {
        self.week_monday() + Duration::days(day.index() as i64)
    }

    /// Title with the calendar week filled in
    pub fn display_title(&self) -> String {
        let (week, _) = self.calendar_week();
        self.title.replace("{week}", &week.to_string())
    }

    /// Configured colour for a location (case-insensitive)
    pub fn location_color(&self, location: &str) -> Option<&str> {
        let needle = location.trim().to_lowercase();
        self.colors
            .iter()
            .find(|(name, _)| name.to_lowercase() == needle)
            .map(|(_, color)| color.as_str())
    }

    /// Explicit session colour, falling back to the location colour
    pub fn session_color<'a>(&'a self, session: &'a Session) -> Option<&'a str> {
        session
            .color
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .or_else(|| self.location_color(&session.location))
    }

    /// Check the grid and week settings
    pub fn validate(&self) -> Result<(), LayoutError> {
        self.week.validate()?;
        if self.grid_end <= self.grid_start {
            return Err(LayoutError::InvalidConfig(format!(
                "grid end {} is not after grid start {}",
                self.grid_end.format("%H:%M"),
                self.grid_start.format("%H:%M")
            )));
        }
        if self.slot_minutes == 0 {
            return Err(LayoutError::InvalidConfig("slot length must be positive".into()));
        }
        Ok(())
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Assigns every session a visual lane within its day
pub trait Layouter: Send + Sync {
    /// Compute the lane layout for the given sessions
    fn layout(&self, sessions: &[Session], week: &WeekConfig) -> Result<WeekLayout, LayoutError>;

    /// Report every defect that would keep a session out of the layout
    fn check(&self, sessions: &[Session], week: &WeekConfig) -> Vec<LayoutError>;
}

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a laid-out plan to the output format
    fn render(&self, plan: &WeekPlan, layout: &WeekLayout) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Layout error
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Invalid interval for session {id} on {day}: {start}-{end} (end must be after start)")]
    InvalidInterval {
        id: SessionId,
        day: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    },

    #[error("Unknown day for session {id}: {day} is not part of the planned week")]
    UnknownDay { id: SessionId, day: Weekday },

    #[error("No font size bucket covers a duration of {minutes} minutes")]
    NoDurationBucket { minutes: i64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LayoutError {
    /// Session the error refers to, if any
    pub fn session_id(&self) -> Option<SessionId> {
        match self {
            LayoutError::InvalidInterval { id, .. } | LayoutError::UnknownDay { id, .. } => Some(*id),
            LayoutError::NoDurationBucket { .. } | LayoutError::InvalidConfig(_) => None,
        }
    }
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn weekday_labels_parse() {
        assert_eq!("Montag".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!(" donnerstag ".parse::<Weekday>().unwrap(), Weekday::Thursday);
        assert_eq!("Sunday".parse::<Weekday>().unwrap(), Weekday::Sunday);
        assert_eq!("FR".parse::<Weekday>().unwrap(), Weekday::Friday);
        assert_eq!("SO".parse::<Weekday>().unwrap(), Weekday::Sunday);
        assert_eq!("Tue".parse::<Weekday>().unwrap(), Weekday::Tuesday);
        assert_eq!("th".parse::<Weekday>().unwrap(), Weekday::Thursday);
    }

    #[test]
    fn weekday_unknown_label_rejected() {
        let err = "Funday".parse::<Weekday>().unwrap_err();
        assert_eq!(err, UnknownWeekday("Funday".into()));
        assert!("".parse::<Weekday>().is_err());
    }

    #[test]
    fn weekday_display_uses_german_label() {
        assert_eq!(Weekday::Wednesday.to_string(), "Mittwoch");
        assert_eq!(Weekday::from_chrono(chrono::Weekday::Sat), Weekday::Saturday);
    }

    #[test]
    fn back_to_back_sessions_do_not_overlap() {
        let a = Session::new(Weekday::Monday, t(9, 0), t(10, 0));
        let b = Session::new(Weekday::Monday, t(10, 0), t(11, 0));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn nested_sessions_overlap() {
        let outer = Session::new(Weekday::Monday, t(9, 0), t(12, 0));
        let inner = Session::new(Weekday::Monday, t(10, 0), t(11, 0));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn sessions_on_different_days_never_overlap() {
        let a = Session::new(Weekday::Monday, t(9, 0), t(12, 0));
        let b = Session::new(Weekday::Tuesday, t(9, 0), t(12, 0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn session_builder_and_helpers() {
        let s = Session::new(Weekday::Friday, t(14, 15), t(15, 45))
            .tutor("Anna")
            .topic("Statistik")
            .location("WBS")
            .room("A12");
        assert_eq!(s.duration(), Duration::minutes(90));
        assert_eq!(s.time_range(), "14:15-15:45");
        assert_eq!(s.room.as_deref(), Some("A12"));
        assert!(s.has_valid_interval());
        assert!(!Session::new(Weekday::Friday, t(9, 0), t(9, 0)).has_valid_interval());
    }

    #[test]
    fn week_through_friday() {
        let week = WeekConfig::through(Weekday::Friday);
        assert_eq!(week.len(), 5);
        assert_eq!(week.slot(Weekday::Friday), Some(4));
        assert_eq!(week.slot(Weekday::Sunday), None);
        assert!(week.validate().is_ok());
    }

    #[test]
    fn week_offsets_follow_widths() {
        let week = WeekConfig::through(Weekday::Wednesday).with_widths(vec![1.0, 2.0, 1.5]);
        assert_eq!(week.day_offsets(), vec![0.0, 1.0, 3.0, 4.5]);
        assert_eq!(week.total_width(), 4.5);
    }

    #[test]
    fn week_validation_rejects_bad_config() {
        assert!(WeekConfig::new(vec![]).validate().is_err());
        assert!(WeekConfig::new(vec![Weekday::Monday, Weekday::Monday])
            .validate()
            .is_err());
        assert!(WeekConfig::through(Weekday::Tuesday)
            .with_widths(vec![1.0])
            .validate()
            .is_err());
        assert!(WeekConfig::through(Weekday::Tuesday)
            .with_widths(vec![1.0, 0.0])
            .validate()
            .is_err());
    }

    #[test]
    fn font_size_selects_last_qualifying_bucket() {
        let table = FontSizeTable::new([
            FontSizeRow::hours(2.0, 14),
            FontSizeRow::hours(0.5, 9),
            FontSizeRow::hours(1.0, 12),
        ]);
        assert_eq!(table.select(Duration::minutes(30)).unwrap(), 9);
        assert_eq!(table.select(Duration::minutes(59)).unwrap(), 9);
        assert_eq!(table.select(Duration::minutes(60)).unwrap(), 12);
        assert_eq!(table.select(Duration::minutes(119)).unwrap(), 12);
        // Open-ended last bucket
        assert_eq!(table.select(Duration::hours(8)).unwrap(), 14);
    }

    #[test]
    fn font_size_below_smallest_threshold_fails() {
        let table = FontSizeTable::new([FontSizeRow::hours(1.0, 12)]);
        assert_eq!(
            table.select(Duration::minutes(45)),
            Err(LayoutError::NoDurationBucket { minutes: 45 })
        );
        assert!(FontSizeTable::new([]).select(Duration::hours(1)).is_err());
    }

    #[test]
    fn font_size_equal_thresholds_later_row_wins() {
        let table = FontSizeTable::new([FontSizeRow::hours(1.0, 11), FontSizeRow::hours(1.0, 13)]);
        assert_eq!(table.select(Duration::hours(1)).unwrap(), 13);
    }

    #[test]
    fn plan_calendar_week_and_title() {
        let plan = WeekPlan::new(DEFAULT_TITLE).week_of(NaiveDate::from_ymd_opt(2024, 3, 27).unwrap());
        assert_eq!(plan.calendar_week(), (13, 2024));
        assert_eq!(plan.week_monday(), NaiveDate::from_ymd_opt(2024, 3, 25).unwrap());
        assert_eq!(plan.date_of(Weekday::Friday), NaiveDate::from_ymd_opt(2024, 3, 29).unwrap());
        assert_eq!(plan.display_title(), "Helpdeskplan für KW 13");
    }

    #[test]
    fn plan_colors_fall_back_to_location() {
        let plan = WeekPlan::new("Plan");
        let online = Session::new(Weekday::Monday, t(9, 0), t(10, 0)).location("online");
        assert_eq!(plan.session_color(&online), Some("#FFF2CC"));

        let custom = online.clone().color("tomato");
        assert_eq!(plan.session_color(&custom), Some("tomato"));

        let blank = online.color("  ");
        assert_eq!(plan.session_color(&blank), Some("#FFF2CC"));

        let unknown = Session::new(Weekday::Monday, t(9, 0), t(10, 0)).location("Mainz");
        assert_eq!(plan.session_color(&unknown), None);
    }

    #[test]
    fn plan_validation() {
        assert!(WeekPlan::new("Plan").validate().is_ok());
        let inverted = WeekPlan::new("Plan").grid(t(18, 0), t(8, 0), 30);
        assert!(inverted.validate().is_err());
        let zero_slot = WeekPlan::new("Plan").grid(t(8, 0), t(18, 0), 0);
        assert!(zero_slot.validate().is_err());
    }

    #[test]
    fn layout_error_display() {
        let err = LayoutError::InvalidInterval {
            id: 3,
            day: Weekday::Monday,
            start: t(9, 0),
            end: t(9, 0),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid interval"));
        assert!(msg.contains("Montag"));
        assert_eq!(err.session_id(), Some(3));

        let err = LayoutError::NoDurationBucket { minutes: 15 };
        assert!(err.to_string().contains("15 minutes"));
        assert_eq!(err.session_id(), None);
    }
}
