//! # weekplan-solver
//!
//! Lane layout for weekly session plans.
//!
//! This crate provides:
//! - Overlap grouping: per-day, chronologically sorted session groups and
//!   the overlap relation within each day
//! - Lane allocation: greedy interval colouring in start order, which uses
//!   the minimum possible number of lanes per day
//! - [`LaneLayouter`], the [`Layouter`] implementation tying both together
//!
//! Layout is a pure function of its input. Lanes are recomputed from scratch
//! on every call and the input sessions are never modified.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveTime;
//! use weekplan_core::{Layouter, Session, WeekConfig, Weekday};
//! use weekplan_solver::LaneLayouter;
//!
//! let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
//! let sessions = vec![
//!     Session::new(Weekday::Monday, t(9, 0), t(11, 0)),
//!     Session::new(Weekday::Monday, t(9, 30), t(10, 30)),
//!     Session::new(Weekday::Monday, t(10, 0), t(10, 45)),
//! ];
//!
//! let layout = LaneLayouter::new()
//!     .layout(&sessions, &WeekConfig::default())
//!     .unwrap();
//!
//! assert_eq!(layout.day(Weekday::Monday).unwrap().lane_count, 3);
//! assert_eq!(layout.lane_of(2), Some(2));
//! ```

pub mod grouping;
pub mod lanes;

pub use grouping::{check_sessions, group_by_day, overlap_lists, validate_session, DayGroup};
pub use lanes::{allocate_lanes, lowest_missing, peak_concurrency};

use tracing::{debug, warn};
use weekplan_core::{DayLayout, LayoutError, Layouter, PlacedSession, Session, WeekConfig, WeekLayout};

/// Greedy lane layouter
#[derive(Clone, Debug, Default)]
pub struct LaneLayouter {
    /// Leave invalid sessions out instead of failing
    pub skip_invalid: bool,
}

impl LaneLayouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave invalid sessions out of the layout and list them in
    /// [`WeekLayout::rejected`] instead of failing on the first one
    pub fn skip_invalid(mut self) -> Self {
        self.skip_invalid = true;
        self
    }
}

impl Layouter for LaneLayouter {
    fn layout(&self, sessions: &[Session], week: &WeekConfig) -> Result<WeekLayout, LayoutError> {
        week.validate()?;

        let mut accepted = Vec::with_capacity(sessions.len());
        let mut rejected = Vec::new();
        for (id, session) in sessions.iter().enumerate() {
            match validate_session(id, session, week) {
                Ok(()) => accepted.push(id),
                Err(err) if self.skip_invalid => {
                    warn!(session = id, error = %err, "leaving session out of layout");
                    rejected.push(err);
                }
                Err(err) => return Err(err),
            }
        }

        let days = grouping::group_ids(sessions, week, accepted)
            .iter()
            .map(|group| layout_day(group, sessions))
            .collect();

        Ok(WeekLayout { days, rejected })
    }

    fn check(&self, sessions: &[Session], week: &WeekConfig) -> Vec<LayoutError> {
        let mut errors: Vec<LayoutError> = week.validate().err().into_iter().collect();
        errors.extend(check_sessions(sessions, week));
        errors
    }
}

/// Lay out one sorted day group
pub fn layout_day(group: &DayGroup, sessions: &[Session]) -> DayLayout {
    let overlaps = overlap_lists(group, sessions);
    let (lanes, lane_count) = allocate_lanes(&overlaps);

    debug_assert_eq!(
        lane_count,
        peak_concurrency(
            &group
                .ids
                .iter()
                .map(|&id| (sessions[id].start, sessions[id].end))
                .collect::<Vec<_>>()
        ),
        "greedy allocation must match the peak number of concurrent sessions"
    );
    debug!(day = %group.day, sessions = group.len(), lanes = lane_count, "laid out day");

    DayLayout {
        day: group.day,
        slot: group.slot,
        sessions: group
            .ids
            .iter()
            .zip(lanes)
            .map(|(&id, lane)| PlacedSession { id, lane })
            .collect(),
        overlaps,
        lane_count,
    }
}

/// Lay out sessions with the default strict [`LaneLayouter`]
pub fn layout_sessions(sessions: &[Session], week: &WeekConfig) -> Result<WeekLayout, LayoutError> {
    LaneLayouter::new().layout(sessions, week)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use weekplan_core::Weekday;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn layouter_creation() {
        assert!(!LaneLayouter::new().skip_invalid);
        assert!(LaneLayouter::new().skip_invalid().skip_invalid);
    }

    #[test]
    fn strict_layout_fails_on_invalid_session() {
        let sessions = vec![Session::new(Weekday::Monday, t(9, 0), t(8, 0))];
        assert!(layout_sessions(&sessions, &WeekConfig::default()).is_err());
    }

    #[test]
    fn lenient_layout_records_rejections() {
        let sessions = vec![
            Session::new(Weekday::Monday, t(9, 0), t(10, 0)),
            Session::new(Weekday::Monday, t(9, 0), t(9, 0)),
            Session::new(Weekday::Sunday, t(9, 0), t(10, 0)),
        ];
        let layout = LaneLayouter::new()
            .skip_invalid()
            .layout(&sessions, &WeekConfig::default())
            .unwrap();
        assert_eq!(layout.placed_count(), 1);
        assert_eq!(layout.rejected.len(), 2);
        assert_eq!(layout.lane_of(1), None);
    }

    #[test]
    fn invalid_week_rejected_before_sessions() {
        let week = WeekConfig::new(vec![]);
        let err = layout_sessions(&[], &week).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidConfig(_)));
        assert_eq!(LaneLayouter::new().check(&[], &week).len(), 1);
    }

    #[test]
    fn empty_days_are_kept_with_zero_lanes() {
        let layout = layout_sessions(&[], &WeekConfig::through(Weekday::Sunday)).unwrap();
        assert_eq!(layout.days.len(), 7);
        assert!(layout.days.iter().all(|d| d.lane_count == 0 && d.is_empty()));
    }
}
