//! Lane Allocation
//!
//! Greedy colouring of a day's interval graph in start-time order. Each
//! session takes the lowest lane not used by an already-placed session it
//! overlaps. For interval graphs processed by start time this uses exactly
//! as many lanes as there are sessions active at the busiest instant.

/// Smallest non-negative integer not contained in `occupied`
pub fn lowest_missing(occupied: &[usize]) -> usize {
    let mut sorted = occupied.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
        .iter()
        .enumerate()
        .find(|(expected, &lane)| *expected != lane)
        .map(|(expected, _)| expected)
        .unwrap_or(sorted.len())
}

/// Assign lanes to a chronologically sorted day.
///
/// `overlaps[i]` lists the positions overlapping position `i`. Only
/// positions before `i` have a lane when `i` is placed, and only those can
/// constrain it. Returns the lane per position and the lane count.
pub fn allocate_lanes(overlaps: &[Vec<usize>]) -> (Vec<usize>, usize) {
    let mut lanes: Vec<usize> = Vec::with_capacity(overlaps.len());
    let mut lane_count = 0;

    for (position, others) in overlaps.iter().enumerate() {
        let occupied: Vec<usize> = others
            .iter()
            .filter(|&&other| other < position)
            .map(|&other| lanes[other])
            .collect();
        let lane = lowest_missing(&occupied);
        tracing::trace!(position, ?occupied, lane, "placed session");
        lanes.push(lane);
        lane_count = lane_count.max(lane + 1);
    }

    (lanes, lane_count)
}

/// Largest number of half-open intervals active at one instant.
///
/// At equal instants ends are processed before starts, so touching
/// intervals are never counted together.
pub fn peak_concurrency<T: Ord + Copy>(intervals: &[(T, T)]) -> usize {
    let mut events: Vec<(T, i8)> = Vec::with_capacity(intervals.len() * 2);
    for &(start, end) in intervals {
        events.push((start, 1));
        events.push((end, -1));
    }
    events.sort();

    let mut active: i64 = 0;
    let mut peak: i64 = 0;
    for (_, delta) in events {
        active += i64::from(delta);
        peak = peak.max(active);
    }
    peak as usize
}
