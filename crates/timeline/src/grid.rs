//! Time-grid calculation.
//!
//! Turns a set of groups into the visible, step-aligned time range, its tick
//! boundaries, and the total grid width in pixels. Step buckets are measured
//! from the Unix epoch, so two grids with the same step always line up.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{GanttConfig, MAX_EMPTY_WINDOW_HOURS};
use crate::model::{Group, Instant, all_tasks};

const MS_PER_MINUTE: i64 = 60_000;

/// The visible, step-aligned window of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start: Instant,
    pub end: Instant,
}

impl TimeRange {
    /// Create a new range.
    pub fn new(start: Instant, end: Instant) -> Self {
        Self { start, end }
    }

    /// Length of the range in (fractional) minutes.
    pub fn minutes(&self) -> f64 {
        minutes_between(self.start, self.end)
    }

    /// Whether `instant` falls inside the range, bounds included.
    pub fn contains(&self, instant: Instant) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// The computed grid: range, tick boundaries and total size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeGrid {
    /// Visible window.
    pub range: TimeRange,
    /// Step boundaries from `range.start` to `range.end`, both included.
    pub ticks: Vec<Instant>,
    /// Number of step columns (`ticks.len() - 1`, at least 1).
    pub total_cols: usize,
    /// `total_cols * col_width_px`.
    pub grid_width_px: f64,
}

/// Round `instant` down to the nearest step boundary.
pub fn floor_to_step(instant: Instant, step_minutes: u32) -> Instant {
    let step_ms = step_millis(step_minutes);
    let ms = instant.timestamp_millis();
    from_millis(ms.div_euclid(step_ms) * step_ms, instant)
}

/// Round `instant` up to the nearest step boundary.
pub fn ceil_to_step(instant: Instant, step_minutes: u32) -> Instant {
    let step_ms = step_millis(step_minutes);
    let ms = instant.timestamp_millis();
    let buckets = if ms.rem_euclid(step_ms) == 0 {
        ms.div_euclid(step_ms)
    } else {
        ms.div_euclid(step_ms) + 1
    };
    match buckets.checked_mul(step_ms) {
        Some(ceiled) => from_millis(ceiled, instant),
        None => instant,
    }
}

/// Every step boundary from `start` to `end`, both included.
///
/// Both ends are expected to be step-aligned; if `end` is not reachable
/// exactly, generation stops at the last boundary before it. Generation
/// also stops at the last representable instant.
pub fn build_ticks(start: Instant, end: Instant, step_minutes: u32) -> Vec<Instant> {
    let step = Duration::minutes(i64::from(step_minutes.max(1)));
    let mut ticks = Vec::new();
    let mut next = Some(start);
    while let Some(tick) = next
        && tick <= end
    {
        ticks.push(tick);
        next = tick.checked_add_signed(step);
    }
    ticks
}

/// Compute the grid for `groups`, anchoring an empty schedule at the
/// current time.
pub fn compute_grid(groups: &[Group], config: &GanttConfig) -> TimeGrid {
    compute_grid_at(groups, config, Utc::now())
}

/// Compute the grid for `groups` using `now` as the anchor of the fallback
/// window.
///
/// With no tasks the range starts at the step-floor of `now` and spans
/// `config.empty_window_hours` (capped at [`MAX_EMPTY_WINDOW_HOURS`]).
/// Otherwise it spans the floor of the earliest start to the ceiling of the
/// latest end. A range that would be empty or inverted is widened to a
/// single step. Never panics, whatever the config.
pub fn compute_grid_at(groups: &[Group], config: &GanttConfig, now: Instant) -> TimeGrid {
    let step_minutes = config.step_minutes.max(1);
    let step = Duration::minutes(i64::from(step_minutes));

    let bounds = all_tasks(groups).fold(None, |acc: Option<(Instant, Instant)>, task| {
        Some(match acc {
            None => (task.start_at(), task.end_at()),
            Some((min, max)) => (min.min(task.start_at()), max.max(task.end_at())),
        })
    });

    let (mut start, mut end) = match bounds {
        None => {
            let start = floor_to_step(now, step_minutes);
            let hours = config.empty_window_hours.min(MAX_EMPTY_WINDOW_HOURS);
            let end = start
                .checked_add_signed(Duration::hours(i64::from(hours)))
                .map_or(start, |end| ceil_to_step(end, step_minutes));
            (start, end)
        }
        Some((min_start, max_end)) => (
            floor_to_step(min_start, step_minutes),
            ceil_to_step(max_end, step_minutes),
        ),
    };

    if end <= start {
        debug!(%start, %end, "degenerate range widened to one step");
        match start.checked_add_signed(step) {
            Some(widened) => end = widened,
            None => {
                end = start;
                start = start.checked_sub_signed(step).unwrap_or(start);
            }
        }
    }

    let range = TimeRange::new(start, end);
    let span_ms = (end - start).num_milliseconds();
    let step_ms = step_millis(step_minutes);
    let total_cols = ((span_ms + step_ms - 1) / step_ms).max(1) as usize;
    let grid_width_px = total_cols as f64 * config.col_width_px();
    let ticks = build_ticks(start, end, step_minutes);

    debug!(
        %start,
        %end,
        total_cols,
        grid_width_px,
        "computed time grid"
    );

    TimeGrid {
        range,
        ticks,
        total_cols,
        grid_width_px,
    }
}

/// Signed difference `to - from` in fractional minutes.
pub fn minutes_between(from: Instant, to: Instant) -> f64 {
    (to - from).num_milliseconds() as f64 / MS_PER_MINUTE as f64
}

fn step_millis(step_minutes: u32) -> i64 {
    i64::from(step_minutes.max(1)) * MS_PER_MINUTE
}

fn from_millis(ms: i64, fallback: Instant) -> Instant {
    DateTime::from_timestamp_millis(ms).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;
    use chrono::{TimeZone, Timelike};

    fn at(day: u32, hour: u32, minute: u32) -> Instant {
        Utc.with_ymd_and_hms(2026, 1, day, hour, minute, 0).unwrap()
    }

    fn group_with(intervals: &[(Instant, Instant)]) -> Vec<Group> {
        let tasks = intervals
            .iter()
            .enumerate()
            .map(|(i, (s, e))| Task::new(format!("t-{}", i + 1), format!("Task {}", i + 1), *s, *e));
        vec![Group::new("job-a", "Job A").with_tasks(tasks)]
    }

    fn is_aligned(instant: Instant, step_minutes: u32) -> bool {
        instant.timestamp_millis() % (i64::from(step_minutes) * MS_PER_MINUTE) == 0
    }

    #[test]
    fn test_floor_to_step_hour() {
        assert_eq!(floor_to_step(at(13, 9, 42), 60), at(13, 9, 0));
        assert_eq!(floor_to_step(at(13, 9, 0), 60), at(13, 9, 0));
    }

    #[test]
    fn test_ceil_to_step_hour() {
        assert_eq!(ceil_to_step(at(13, 9, 1), 60), at(13, 10, 0));
        assert_eq!(ceil_to_step(at(13, 9, 0), 60), at(13, 9, 0));
    }

    #[test]
    fn test_floor_and_ceil_with_quarter_hours() {
        assert_eq!(floor_to_step(at(13, 9, 29), 15), at(13, 9, 15));
        assert_eq!(ceil_to_step(at(13, 9, 29), 15), at(13, 9, 30));
    }

    #[test]
    fn test_floor_handles_pre_epoch_instants() {
        let before_epoch = Utc.with_ymd_and_hms(1969, 12, 31, 23, 30, 0).unwrap();
        let floored = floor_to_step(before_epoch, 60);
        assert_eq!(floored, Utc.with_ymd_and_hms(1969, 12, 31, 23, 0, 0).unwrap());
    }

    #[test]
    fn test_build_ticks_inclusive() {
        let ticks = build_ticks(at(13, 9, 0), at(13, 12, 0), 60);
        assert_eq!(
            ticks,
            vec![at(13, 9, 0), at(13, 10, 0), at(13, 11, 0), at(13, 12, 0)]
        );
    }

    #[test]
    fn test_end_to_end_two_tasks() {
        let groups = group_with(&[
            (at(13, 9, 0), at(13, 13, 0)),
            (at(13, 13, 0), at(13, 19, 0)),
        ]);
        let config = GanttConfig::new();

        let grid = compute_grid_at(&groups, &config, at(1, 0, 0));

        assert_eq!(grid.range.start, at(13, 9, 0));
        assert_eq!(grid.range.end, at(13, 19, 0));
        assert_eq!(grid.total_cols, 10);
        assert_eq!(grid.grid_width_px, 640.0);
        assert_eq!(grid.ticks.len(), 11);
    }

    #[test]
    fn test_empty_input_uses_default_window() {
        let now = at(13, 10, 37);
        let grid = compute_grid_at(&[], &GanttConfig::new(), now);

        assert_eq!(grid.range.start, at(13, 10, 0));
        assert_eq!(grid.range.end, at(13, 18, 0));
        assert_eq!(grid.total_cols, 8);
        assert_eq!(grid.ticks.len(), 9);
    }

    #[test]
    fn test_groups_without_tasks_use_default_window() {
        let groups = vec![Group::new("a", "A"), Group::new("b", "B")];
        let grid = compute_grid_at(&groups, &GanttConfig::new(), at(13, 10, 0));
        assert_eq!(grid.total_cols, 8);
    }

    #[test]
    fn test_empty_window_is_configurable() {
        let config = GanttConfig::new().with_empty_window_hours(4);
        let grid = compute_grid_at(&[], &config, at(13, 10, 0));
        assert_eq!(grid.total_cols, 4);
    }

    #[test]
    fn test_empty_window_at_half_hour_step() {
        let config = GanttConfig::new().with_step_minutes(30);
        let grid = compute_grid_at(&[], &config, at(13, 10, 45));
        assert_eq!(grid.range.start, at(13, 10, 30));
        assert_eq!(grid.total_cols, 16);
    }

    #[test]
    fn test_empty_window_rounds_up_to_whole_steps() {
        let config = GanttConfig::new().with_step_minutes(90);
        let grid = compute_grid_at(&[], &config, at(13, 10, 0));

        assert_eq!(grid.total_cols, 6);
        assert_eq!(grid.ticks.len(), grid.total_cols + 1);
        assert_eq!(grid.ticks.last(), Some(&grid.range.end));
    }

    #[test]
    fn test_range_alignment_and_bracketing() {
        let groups = group_with(&[
            (at(13, 9, 7), at(13, 10, 53)),
            (at(13, 11, 20), at(14, 2, 41)),
            (at(12, 23, 59), at(13, 0, 1)),
        ]);

        for step in [1, 5, 15, 30, 60, 90, 240, 1440] {
            let config = GanttConfig::new().with_step_minutes(step);
            let grid = compute_grid_at(&groups, &config, at(1, 0, 0));

            assert!(is_aligned(grid.range.start, step), "start not aligned at step {step}");
            assert!(is_aligned(grid.range.end, step), "end not aligned at step {step}");
            assert!(grid.range.start <= at(12, 23, 59));
            assert!(grid.range.end >= at(14, 2, 41));
        }
    }

    #[test]
    fn test_tick_completeness() {
        let groups = group_with(&[(at(13, 9, 10), at(13, 17, 50))]);

        for step in [15, 30, 60, 120] {
            let config = GanttConfig::new().with_step_minutes(step);
            let grid = compute_grid_at(&groups, &config, at(1, 0, 0));

            assert_eq!(grid.ticks.len(), grid.total_cols + 1);
            assert_eq!(grid.ticks.first(), Some(&grid.range.start));
            assert_eq!(grid.ticks.last(), Some(&grid.range.end));
            for pair in grid.ticks.windows(2) {
                assert_eq!(pair[1] - pair[0], Duration::minutes(i64::from(step)));
            }
        }
    }

    #[test]
    fn test_zero_length_task_on_boundary_gets_one_column() {
        let groups = group_with(&[(at(13, 9, 0), at(13, 9, 0))]);
        let grid = compute_grid_at(&groups, &GanttConfig::new(), at(1, 0, 0));

        assert_eq!(grid.range.start, at(13, 9, 0));
        assert_eq!(grid.range.end, at(13, 10, 0));
        assert_eq!(grid.total_cols, 1);
        assert_eq!(grid.ticks.len(), 2);
    }

    #[test]
    fn test_inverted_task_still_produces_valid_grid() {
        let groups = group_with(&[(at(13, 13, 0), at(13, 9, 0))]);
        let grid = compute_grid_at(&groups, &GanttConfig::new(), at(1, 0, 0));

        assert!(grid.range.end > grid.range.start);
        assert_eq!(grid.ticks.len(), grid.total_cols + 1);
    }

    #[test]
    fn test_zero_step_is_treated_as_one_minute() {
        let groups = group_with(&[(at(13, 9, 0), at(13, 9, 3))]);
        let config = GanttConfig::new().with_step_minutes(0);
        let grid = compute_grid_at(&groups, &config, at(1, 0, 0));
        assert_eq!(grid.total_cols, 3);
    }

    #[test]
    fn test_huge_empty_window_is_capped() {
        let config = GanttConfig::new().with_empty_window_hours(u32::MAX);
        let grid = compute_grid_at(&[], &config, at(13, 10, 0));

        assert_eq!(grid.total_cols, MAX_EMPTY_WINDOW_HOURS as usize);
        assert_eq!(grid.ticks.len(), grid.total_cols + 1);
    }

    #[test]
    fn test_zero_empty_window_gets_one_column() {
        let config = GanttConfig::new().with_empty_window_hours(0);
        let grid = compute_grid_at(&[], &config, at(13, 10, 20));

        assert_eq!(grid.range.start, at(13, 10, 0));
        assert_eq!(grid.range.end, at(13, 11, 0));
        assert_eq!(grid.total_cols, 1);
        assert_eq!(grid.ticks.len(), 2);
    }

    #[test]
    fn test_very_large_step() {
        let groups = group_with(&[(at(13, 9, 0), at(13, 17, 0))]);
        let config = GanttConfig::new().with_step_minutes(u32::MAX);
        let grid = compute_grid_at(&groups, &config, at(1, 0, 0));

        assert_eq!(grid.total_cols, 1);
        assert_eq!(grid.ticks.len(), 2);
        assert!(grid.range.start <= at(13, 9, 0));
        assert!(grid.range.end >= at(13, 17, 0));

        let empty = compute_grid_at(&[], &config, at(13, 10, 0));
        assert_eq!(empty.ticks.len(), empty.total_cols + 1);
    }

    #[test]
    fn test_grid_at_last_representable_instant() {
        let grid = compute_grid_at(&[], &GanttConfig::new(), DateTime::<Utc>::MAX_UTC);

        assert!(grid.range.end > grid.range.start);
        assert_eq!(grid.total_cols, 1);
        assert_eq!(grid.ticks.len(), 2);
    }

    #[test]
    fn test_build_ticks_stops_at_last_representable_instant() {
        let end = DateTime::<Utc>::MAX_UTC;
        let ticks = build_ticks(end - Duration::minutes(10), end, 60);
        assert_eq!(ticks.len(), 1);
    }

    #[test]
    fn test_grid_width_uses_column_width() {
        let groups = group_with(&[(at(13, 9, 0), at(13, 12, 0))]);
        let config = GanttConfig::new().with_col_width_px(50.5);
        let grid = compute_grid_at(&groups, &config, at(1, 0, 0));
        assert_eq!(grid.grid_width_px, 151.5);
    }

    #[test]
    fn test_compute_grid_uses_current_time_when_empty() {
        let grid = compute_grid(&[], &GanttConfig::new());
        assert_eq!(grid.range.start.minute(), 0);
        assert_eq!(grid.total_cols, 8);
    }

    #[test]
    fn test_range_minutes_and_contains() {
        let range = TimeRange::new(at(13, 9, 0), at(13, 10, 30));
        assert_eq!(range.minutes(), 90.0);
        assert!(range.contains(at(13, 9, 0)));
        assert!(range.contains(at(13, 10, 30)));
        assert!(!range.contains(at(13, 10, 31)));
    }
}
