//! TOML plan configuration
//!
//! ```toml
//! title = "Helpdeskplan für KW {week}"
//! week_of = "2024-03-25"
//! last_day = "Freitag"
//! day_widths = [1, 1, 2, 1, 1]
//! grid_start = "08:00"
//! grid_end = "20:00"
//! slot_minutes = 30
//!
//! [colors]
//! WBS = "#DDEBF7"
//!
//! [[font_sizes]]
//! hours = 0
//! size = 10
//! ```
//!
//! Every key is optional. `days` (a list of day labels) takes precedence
//! over `last_day`; without either the week runs Monday to Friday.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use weekplan_core::{FontSizeRow, FontSizeTable, Session, WeekConfig, WeekPlan, Weekday, DEFAULT_TITLE};

use crate::timetable::parse_time;
use crate::ParseError;

/// One `[[font_sizes]]` entry
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FontSizeEntry {
    pub hours: f64,
    pub size: u32,
}

/// Plan settings as read from a TOML file
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlanConfig {
    pub title: Option<String>,
    /// Any date in the planned week, `YYYY-MM-DD`
    pub week_of: Option<String>,
    /// Last laid-out day, the week always starts on Monday
    pub last_day: Option<String>,
    /// Explicit day order
    pub days: Option<Vec<String>>,
    pub day_widths: Option<Vec<f64>>,
    pub grid_start: Option<String>,
    pub grid_end: Option<String>,
    pub slot_minutes: Option<u32>,
    /// Location colours, merged over the defaults
    pub colors: BTreeMap<String, String>,
    pub font_sizes: Vec<FontSizeEntry>,
}

/// Parse TOML plan configuration
pub fn parse_config(input: &str) -> Result<PlanConfig, ParseError> {
    toml::from_str(input).map_err(|e| ParseError::Config(e.to_string()))
}

fn parse_day(label: &str) -> Result<Weekday, ParseError> {
    Weekday::parse_label(label).ok_or_else(|| ParseError::Config(format!("unknown day {label:?}")))
}

impl PlanConfig {
    /// Day slots and widths
    pub fn week_config(&self) -> Result<WeekConfig, ParseError> {
        let mut week = match (&self.days, &self.last_day) {
            (Some(days), _) => WeekConfig::new(days.iter().map(|d| parse_day(d)).collect::<Result<Vec<_>, _>>()?),
            (None, Some(last)) => WeekConfig::through(parse_day(last)?),
            (None, None) => WeekConfig::default(),
        };
        if let Some(widths) = &self.day_widths {
            week = week.with_widths(widths.clone());
        }
        week.validate().map_err(|e| ParseError::Config(e.to_string()))?;
        Ok(week)
    }

    /// Parsed `week_of`, if set
    pub fn week_of_date(&self) -> Result<Option<NaiveDate>, ParseError> {
        self.week_of
            .as_deref()
            .map(|s| {
                NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                    .map_err(|_| ParseError::Config(format!("invalid week_of date {s:?}")))
            })
            .transpose()
    }

    /// Configured font sizes, if any
    ///
    /// Every threshold must be a finite, non-negative number of hours.
    pub fn font_size_table(&self) -> Result<Option<FontSizeTable>, ParseError> {
        if self.font_sizes.is_empty() {
            return Ok(None);
        }
        if let Some(bad) = self.font_sizes.iter().find(|e| !e.hours.is_finite() || e.hours < 0.0) {
            return Err(ParseError::Config(format!(
                "font size threshold {} must be a non-negative number of hours",
                bad.hours
            )));
        }
        Ok(Some(FontSizeTable::new(
            self.font_sizes.iter().map(|e| FontSizeRow::hours(e.hours, e.size)),
        )))
    }

    /// Build a validated plan around the given sessions
    pub fn into_plan(self, sessions: Vec<Session>) -> Result<WeekPlan, ParseError> {
        let week = self.week_config()?;
        let mut plan = WeekPlan::new(self.title.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string()))
            .sessions(sessions)
            .week(week);

        if let Some(date) = self.week_of_date()? {
            plan = plan.week_of(date);
        }
        if let Some(table) = self.font_size_table()? {
            plan = plan.font_sizes(table);
        }
        for (location, color) in self.colors {
            plan = plan.color(location, color);
        }

        let grid_start = match &self.grid_start {
            Some(s) => parse_time(s, 0).map_err(|_| ParseError::Config(format!("invalid grid_start {s:?}")))?,
            None => plan.grid_start,
        };
        let grid_end = match &self.grid_end {
            Some(s) => parse_time(s, 0).map_err(|_| ParseError::Config(format!("invalid grid_end {s:?}")))?,
            None => plan.grid_end,
        };
        let slot_minutes = self.slot_minutes.unwrap_or(plan.slot_minutes);
        plan = plan.grid(grid_start, grid_end, slot_minutes);

        plan.validate().map_err(|e| ParseError::Config(e.to_string()))?;
        Ok(plan)
    }
}
