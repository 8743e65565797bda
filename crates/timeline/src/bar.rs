//! Bar geometry mapping.
//!
//! Maps a task's absolute interval onto horizontal pixel coordinates
//! relative to a computed [`TimeRange`]. Positions stay fractional.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::grid::{TimeRange, minutes_between};
use crate::model::Task;

/// Minimum rendered bar width, so zero-length tasks stay visible and clickable.
pub const MIN_BAR_WIDTH_PX: f64 = 12.0;

/// Horizontal placement of one task bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarGeometry {
    /// Offset from the start of the grid.
    pub left_px: f64,
    /// Rendered width, never below [`MIN_BAR_WIDTH_PX`].
    pub width_px: f64,
}

/// A bar converted to whole character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpan {
    /// First cell covered by the bar.
    pub start: usize,
    /// Number of cells covered, at least 1.
    pub len: usize,
}

impl CellSpan {
    /// One past the last covered cell, saturating at `usize::MAX`.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.len)
    }
}

impl BarGeometry {
    /// Right edge of the bar.
    pub fn right_px(&self) -> f64 {
        self.left_px + self.width_px
    }

    /// Convert to cells of `px_per_cell` pixels each.
    ///
    /// The span covers every cell the bar touches and is never empty.
    pub fn to_cells(&self, px_per_cell: f64) -> CellSpan {
        let px_per_cell = if px_per_cell.is_finite() && px_per_cell > 0.0 {
            px_per_cell
        } else {
            1.0
        };

        let start = (self.left_px / px_per_cell).floor().max(0.0) as usize;
        let end = (self.right_px() / px_per_cell).ceil().max(0.0) as usize;
        CellSpan {
            start,
            len: end.saturating_sub(start).max(1),
        }
    }
}

/// Compute the bar for `task` within `range`.
///
/// A start outside the range is clamped to its bounds and a reversed
/// interval is left as is; both are logged as caller data problems. The
/// width is floored at [`MIN_BAR_WIDTH_PX`].
pub fn compute_bar(
    task: &Task,
    range: &TimeRange,
    step_minutes: u32,
    col_width_px: f64,
) -> BarGeometry {
    let step = f64::from(step_minutes.max(1));
    let range_minutes = range.minutes().max(0.0);

    let raw_offset = minutes_between(range.start, task.start_at());
    let start_offset = raw_offset.clamp(0.0, range_minutes);
    if start_offset != raw_offset {
        warn!(
            task_id = %task.id,
            offset_minutes = raw_offset,
            "task starts outside the computed range; clamped"
        );
    }

    let duration = minutes_between(task.start_at(), task.end_at());
    if duration < 0.0 {
        warn!(
            task_id = %task.id,
            duration_minutes = duration,
            "task ends before it starts"
        );
    }

    BarGeometry {
        left_px: start_offset / step * col_width_px,
        width_px: (duration / step * col_width_px).max(MIN_BAR_WIDTH_PX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Instant;
    use chrono::{TimeZone, Utc};

    fn at(hour: u32, minute: u32) -> Instant {
        Utc.with_ymd_and_hms(2026, 1, 13, hour, minute, 0).unwrap()
    }

    fn range(start: u32, end: u32) -> TimeRange {
        TimeRange::new(at(start, 0), at(end, 0))
    }

    fn task(start: Instant, end: Instant) -> Task {
        Task::new("t-1", "Task", start, end)
    }

    #[test]
    fn test_bar_at_range_start() {
        let bar = compute_bar(&task(at(9, 0), at(13, 0)), &range(9, 19), 60, 64.0);
        assert_eq!(bar.left_px, 0.0);
        assert_eq!(bar.width_px, 256.0);
    }

    #[test]
    fn test_bar_offset_in_columns() {
        let bar = compute_bar(&task(at(13, 0), at(19, 0)), &range(9, 19), 60, 64.0);
        assert_eq!(bar.left_px, 4.0 * 64.0);
        assert_eq!(bar.width_px, 6.0 * 64.0);
        assert_eq!(bar.right_px(), 640.0);
    }

    #[test]
    fn test_fractional_positions_preserved() {
        let bar = compute_bar(&task(at(9, 20), at(9, 50)), &range(9, 10), 60, 64.0);
        assert!((bar.left_px - 64.0 / 3.0).abs() < 1e-9);
        assert!((bar.width_px - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_length_task_gets_minimum_width() {
        let bar = compute_bar(&task(at(10, 0), at(10, 0)), &range(9, 12), 60, 64.0);
        assert_eq!(bar.width_px, MIN_BAR_WIDTH_PX);
        assert_eq!(bar.left_px, 64.0);
    }

    #[test]
    fn test_short_task_gets_minimum_width() {
        let bar = compute_bar(&task(at(10, 0), at(10, 5)), &range(9, 12), 60, 64.0);
        assert_eq!(bar.width_px, MIN_BAR_WIDTH_PX);
    }

    #[test]
    fn test_reversed_interval_clamps_to_minimum_width() {
        let bar = compute_bar(&task(at(11, 0), at(10, 0)), &range(9, 12), 60, 64.0);
        assert_eq!(bar.width_px, MIN_BAR_WIDTH_PX);
        assert_eq!(bar.left_px, 128.0);
    }

    #[test]
    fn test_start_before_range_is_clamped_to_zero() {
        let bar = compute_bar(&task(at(7, 0), at(10, 0)), &range(9, 12), 60, 64.0);
        assert_eq!(bar.left_px, 0.0);
    }

    #[test]
    fn test_start_after_range_is_clamped_to_end() {
        let bar = compute_bar(&task(at(15, 0), at(16, 0)), &range(9, 12), 60, 64.0);
        assert_eq!(bar.left_px, 3.0 * 64.0);
    }

    #[test]
    fn test_monotonic_left_offsets() {
        let r = range(9, 19);
        let starts = [at(9, 0), at(9, 1), at(10, 30), at(12, 0), at(18, 59)];
        let lefts: Vec<f64> = starts
            .iter()
            .map(|s| compute_bar(&task(*s, at(19, 0)), &r, 60, 64.0).left_px)
            .collect();

        for pair in lefts.windows(2) {
            assert!(pair[0] <= pair[1], "{} > {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_step_scales_geometry() {
        let bar = compute_bar(&task(at(10, 0), at(11, 0)), &range(9, 12), 30, 40.0);
        assert_eq!(bar.left_px, 80.0);
        assert_eq!(bar.width_px, 80.0);
    }

    #[test]
    fn test_to_cells_covers_touched_cells() {
        let bar = BarGeometry {
            left_px: 10.0,
            width_px: 20.0,
        };
        let span = bar.to_cells(8.0);
        assert_eq!(span, CellSpan { start: 1, len: 3 });
        assert_eq!(span.end(), 4);
    }

    #[test]
    fn test_to_cells_is_never_empty() {
        let bar = BarGeometry {
            left_px: 16.0,
            width_px: 0.0,
        };
        assert_eq!(bar.to_cells(8.0).len, 1);
    }

    #[test]
    fn test_to_cells_saturates_on_huge_geometry() {
        let bar = BarGeometry {
            left_px: 1e300,
            width_px: 1e300,
        };
        let span = bar.to_cells(8.0);
        assert_eq!(span.start, usize::MAX);
        assert_eq!(span.len, 1);
        assert_eq!(span.end(), usize::MAX);
    }

    #[test]
    fn test_to_cells_with_invalid_cell_size() {
        let bar = BarGeometry {
            left_px: 3.0,
            width_px: 12.0,
        };
        assert_eq!(bar.to_cells(0.0), CellSpan { start: 3, len: 12 });
    }
}
