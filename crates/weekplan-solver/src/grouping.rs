//! Overlap Grouping
//!
//! Partitions sessions by configured day, orders each day chronologically
//! and computes the overlap relation inside a day.

use weekplan_core::{LayoutError, Session, SessionId, WeekConfig, Weekday};

/// Sessions of one configured day, ordered by `(start, end)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayGroup {
    pub day: Weekday,
    pub slot: usize,
    pub ids: Vec<SessionId>,
}

impl DayGroup {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

/// Check that a session may enter lane allocation
pub fn validate_session(id: SessionId, session: &Session, week: &WeekConfig) -> Result<(), LayoutError> {
    if !session.has_valid_interval() {
        return Err(LayoutError::InvalidInterval {
            id,
            day: session.day,
            start: session.start,
            end: session.end,
        });
    }
    if week.slot(session.day).is_none() {
        return Err(LayoutError::UnknownDay { id, day: session.day });
    }
    Ok(())
}

/// Every defect in the input, in session order
pub fn check_sessions(sessions: &[Session], week: &WeekConfig) -> Vec<LayoutError> {
    sessions
        .iter()
        .enumerate()
        .filter_map(|(id, session)| validate_session(id, session, week).err())
        .collect()
}

/// Group sessions by day, one group per configured slot.
///
/// Fails on the first invalid session; nothing is grouped in that case.
pub fn group_by_day(sessions: &[Session], week: &WeekConfig) -> Result<Vec<DayGroup>, LayoutError> {
    for (id, session) in sessions.iter().enumerate() {
        validate_session(id, session, week)?;
    }
    Ok(group_ids(sessions, week, 0..sessions.len()))
}

/// Group the given (already validated) sessions.
///
/// Ordering within a day is a stable sort on `(start, end)`, so sessions with
/// identical times keep the order in which `ids` yields them.
pub(crate) fn group_ids(
    sessions: &[Session],
    week: &WeekConfig,
    ids: impl IntoIterator<Item = SessionId>,
) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = week
        .days
        .iter()
        .enumerate()
        .map(|(slot, &day)| DayGroup {
            day,
            slot,
            ids: Vec::new(),
        })
        .collect();

    for id in ids {
        if let Some(slot) = week.slot(sessions[id].day) {
            groups[slot].ids.push(id);
        }
    }

    for group in &mut groups {
        group.ids.sort_by_key(|&id| (sessions[id].start, sessions[id].end));
    }
    groups
}

/// For every position in the group, the positions of the sessions it overlaps.
///
/// The relation is symmetric and irreflexive. Because the group is sorted by
/// start time, the scan for each session stops at the first later session
/// starting at or after its end.
pub fn overlap_lists(group: &DayGroup, sessions: &[Session]) -> Vec<Vec<usize>> {
    let n = group.ids.len();
    let mut lists = vec![Vec::new(); n];
    for i in 0..n {
        let a = &sessions[group.ids[i]];
        for j in (i + 1)..n {
            let b = &sessions[group.ids[j]];
            if b.start >= a.end {
                break;
            }
            if a.overlaps(b) {
                lists[i].push(j);
                lists[j].push(i);
            }
        }
    }
    for list in &mut lists {
        list.sort_unstable();
    }
    lists
}
