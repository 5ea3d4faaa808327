//! Lane layout results
//!
//! A [`WeekLayout`] is what the renderers consume: for every laid-out
//! session its lane index, and for every day the number of lanes the day
//! needs. Lane indices are dense from 0 within a day and unrelated across
//! days.
//!
//! Horizontal geometry is derived with [`Placement::bar`]:
//!
//! ```text
//! width  = day_width / lane_count
//! offset = width * lane
//! ```
//!
//! # Example
//!
//! ```rust
//! use weekplan_core::{Placement, Weekday};
//!
//! let placement = Placement { day: Weekday::Monday, slot: 0, lane: 1, lane_count: 4 };
//! let bar = placement.bar(2.0);
//! assert_eq!(bar.width, 0.5);
//! assert_eq!(bar.offset, 0.5);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{LayoutError, SessionId, Weekday};

/// A session together with the lane it was assigned
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedSession {
    pub id: SessionId,
    pub lane: usize,
}

/// Lane assignment for one day
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLayout {
    pub day: Weekday,
    /// Position of the day in the configured week
    pub slot: usize,
    /// Sessions in `(start, end)` order
    pub sessions: Vec<PlacedSession>,
    /// For each entry of `sessions`, the positions of the entries it overlaps
    pub overlaps: Vec<Vec<usize>>,
    /// Number of lanes in use; 0 for an empty day
    pub lane_count: usize,
}

impl DayLayout {
    pub fn empty(day: Weekday, slot: usize) -> Self {
        Self {
            day,
            slot,
            sessions: Vec::new(),
            overlaps: Vec::new(),
            lane_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Lane of a session laid out on this day
    pub fn lane_of(&self, id: SessionId) -> Option<usize> {
        self.sessions.iter().find(|s| s.id == id).map(|s| s.lane)
    }

    /// Ids of the sessions overlapping the session at `position`
    pub fn overlapping_ids(&self, position: usize) -> Vec<SessionId> {
        self.overlaps
            .get(position)
            .map(|others| others.iter().map(|&p| self.sessions[p].id).collect())
            .unwrap_or_default()
    }
}

/// Where a session sits horizontally within its day
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub day: Weekday,
    pub slot: usize,
    pub lane: usize,
    pub lane_count: usize,
}

/// Horizontal extent of a session bar relative to the left edge of its day
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub offset: f64,
    pub width: f64,
}

impl Placement {
    /// Bar geometry for a day of the given width
    pub fn bar(&self, day_width: f64) -> Bar {
        let width = day_width / self.lane_count as f64;
        let offset = width * self.lane as f64;
        Bar { offset, width }
    }
}

/// Lane assignment for a whole week
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WeekLayout {
    /// One entry per configured day, in week order
    pub days: Vec<DayLayout>,
    /// Sessions left out of the layout, when the layouter was told to skip them
    #[serde(skip)]
    pub rejected: Vec<LayoutError>,
}

impl WeekLayout {
    /// Layout of a given weekday
    pub fn day(&self, day: Weekday) -> Option<&DayLayout> {
        self.days.iter().find(|d| d.day == day)
    }

    /// Lane and lane count of a session
    pub fn placement(&self, id: SessionId) -> Option<Placement> {
        self.days.iter().find_map(|day| {
            day.lane_of(id).map(|lane| Placement {
                day: day.day,
                slot: day.slot,
                lane,
                lane_count: day.lane_count,
            })
        })
    }

    pub fn lane_of(&self, id: SessionId) -> Option<usize> {
        self.placement(id).map(|p| p.lane)
    }

    /// Session id to lane
    pub fn assignments(&self) -> BTreeMap<SessionId, usize> {
        self.days
            .iter()
            .flat_map(|day| day.sessions.iter().map(|s| (s.id, s.lane)))
            .collect()
    }

    /// Session ids day by day, chronological within each day
    pub fn session_order(&self) -> Vec<SessionId> {
        self.days
            .iter()
            .flat_map(|day| day.sessions.iter().map(|s| s.id))
            .collect()
    }

    /// Number of laid-out sessions
    pub fn placed_count(&self) -> usize {
        self.days.iter().map(|d| d.sessions.len()).sum()
    }

    /// Widest day in lanes
    pub fn max_lanes(&self) -> usize {
        self.days.iter().map(|d| d.lane_count).max().unwrap_or(0)
    }
}
