//! Property-based invariant tests for lane allocation.
//!
//! For any set of valid sessions:
//!
//! 1. Two sessions on the same lane of the same day never overlap.
//! 2. A day's lane count equals the peak number of concurrent sessions,
//!    checked by brute force over every start instant.
//! 3. Lanes are dense: every lane below the lane count is used.
//! 4. Layout is deterministic.
//! 5. Reversing the input does not change any session's lane when no two
//!    sessions share identical times on the same day.

use chrono::NaiveTime;
use proptest::prelude::*;
use std::collections::HashSet;
use weekplan_core::{Session, WeekConfig, Weekday};
use weekplan_solver::layout_sessions;

// ── Helpers ─────────────────────────────────────────────────────────────

fn minutes(m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(m / 60, m % 60, 0).unwrap()
}

fn session_strategy() -> impl Strategy<Value = Session> {
    (0usize..3, 0u32..1300, 1u32..140).prop_map(|(day, start, len)| {
        Session::new(Weekday::ALL[day], minutes(start), minutes(start + len))
    })
}

fn sessions_strategy() -> impl Strategy<Value = Vec<Session>> {
    prop::collection::vec(session_strategy(), 0..40)
}

/// Concurrency at the busiest start instant, computed naively
fn brute_force_peak(sessions: &[&Session]) -> usize {
    sessions
        .iter()
        .map(|point| {
            sessions
                .iter()
                .filter(|s| s.start <= point.start && point.start < s.end)
                .count()
        })
        .max()
        .unwrap_or(0)
}

fn week() -> WeekConfig {
    WeekConfig::through(Weekday::Wednesday)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. No collisions
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn same_lane_never_overlaps(sessions in sessions_strategy()) {
        let layout = layout_sessions(&sessions, &week()).unwrap();
        for day in &layout.days {
            for (i, a) in day.sessions.iter().enumerate() {
                for b in &day.sessions[i + 1..] {
                    if a.lane == b.lane {
                        prop_assert!(
                            !sessions[a.id].overlaps(&sessions[b.id]),
                            "sessions {} and {} share lane {} but overlap",
                            a.id, b.id, a.lane
                        );
                    }
                }
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Minimality
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn lane_count_is_peak_concurrency(sessions in sessions_strategy()) {
        let layout = layout_sessions(&sessions, &week()).unwrap();
        for day in &layout.days {
            let members: Vec<&Session> = day.sessions.iter().map(|p| &sessions[p.id]).collect();
            prop_assert_eq!(day.lane_count, brute_force_peak(&members), "day {}", day.day);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Dense lanes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn lanes_are_dense(sessions in sessions_strategy()) {
        let layout = layout_sessions(&sessions, &week()).unwrap();
        for day in &layout.days {
            let used: HashSet<usize> = day.sessions.iter().map(|p| p.lane).collect();
            prop_assert_eq!(used.len(), day.lane_count);
            prop_assert!(used.iter().all(|&lane| lane < day.lane_count));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn layout_is_deterministic(sessions in sessions_strategy()) {
        let first = layout_sessions(&sessions, &week()).unwrap();
        let second = layout_sessions(&sessions, &week()).unwrap();
        prop_assert_eq!(first, second);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Input order independence for distinct times
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reversed_input_keeps_lanes(sessions in sessions_strategy()) {
        let mut seen = HashSet::new();
        let distinct: Vec<Session> = sessions
            .into_iter()
            .filter(|s| seen.insert((s.day, s.start, s.end)))
            .collect();
        let reversed: Vec<Session> = distinct.iter().rev().cloned().collect();

        let forward = layout_sessions(&distinct, &week()).unwrap();
        let backward = layout_sessions(&reversed, &week()).unwrap();

        let n = distinct.len();
        for id in 0..n {
            prop_assert_eq!(forward.lane_of(id), backward.lane_of(n - 1 - id));
        }
    }
}
