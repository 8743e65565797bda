//! The full layout pipeline.
//!
//! Runs grid calculation, row flattening, bar mapping and color resolution
//! in one pass and returns everything a renderer needs, including the
//! header metadata, as a single value.

use serde::Serialize;

use crate::bar::{BarGeometry, compute_bar};
use crate::color::{GroupColor, Palette};
use crate::config::GanttConfig;
use crate::grid::{TimeGrid, TimeRange, compute_grid_at};
use crate::model::{Group, Instant};
use crate::rows::{CollapseState, Row, flatten_rows};

/// Summary shown in the chart header.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutMeta {
    pub range: TimeRange,
    pub total_cols: usize,
    pub grid_width_px: f64,
    pub group_count: usize,
    pub step_minutes: u32,
    pub col_width_px: f64,
    pub left_width_px: f64,
}

/// A laid-out row, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayoutRow {
    /// Group header row.
    #[serde(rename_all = "camelCase")]
    Group {
        group_id: String,
        title: String,
        task_count: usize,
        collapsed: bool,
        color: GroupColor,
    },
    /// Task row with its bar.
    #[serde(rename_all = "camelCase")]
    Task {
        group_id: String,
        task_id: String,
        name: String,
        start_at: Instant,
        end_at: Instant,
        bar: BarGeometry,
        color: GroupColor,
    },
}

impl LayoutRow {
    /// Id of the group the row belongs to.
    pub fn group_id(&self) -> &str {
        match self {
            LayoutRow::Group { group_id, .. } | LayoutRow::Task { group_id, .. } => group_id,
        }
    }

    /// Colors of the row's group.
    pub fn color(&self) -> &GroupColor {
        match self {
            LayoutRow::Group { color, .. } | LayoutRow::Task { color, .. } => color,
        }
    }

    /// Bar geometry, for task rows.
    pub fn bar(&self) -> Option<&BarGeometry> {
        match self {
            LayoutRow::Group { .. } => None,
            LayoutRow::Task { bar, .. } => Some(bar),
        }
    }
}

/// Result of laying out a set of groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttLayout {
    pub meta: LayoutMeta,
    pub grid: TimeGrid,
    pub rows: Vec<LayoutRow>,
}

impl GanttLayout {
    /// Lay out `groups` with `now` anchoring an empty schedule.
    pub fn build(
        groups: &[Group],
        config: &GanttConfig,
        collapse: &CollapseState,
        now: Instant,
    ) -> Self {
        let grid = compute_grid_at(groups, config, now);
        Self::with_grid(groups, config, collapse, grid)
    }

    /// Lay out `groups` on a grid computed earlier, e.g. from a cache.
    pub fn with_grid(
        groups: &[Group],
        config: &GanttConfig,
        collapse: &CollapseState,
        grid: TimeGrid,
    ) -> Self {
        let palette = Palette::from_config(config);
        let col_width_px = config.col_width_px();

        let rows = flatten_rows(groups, collapse)
            .into_iter()
            .map(|row| match row {
                Row::Group { group } => LayoutRow::Group {
                    group_id: group.id.clone(),
                    title: group.title.clone(),
                    task_count: group.tasks.len(),
                    collapsed: collapse.is_collapsed(&group.id),
                    color: palette.resolve(&group.id),
                },
                Row::Task { group, task } => LayoutRow::Task {
                    group_id: group.id.clone(),
                    task_id: task.id.clone(),
                    name: task.name.clone(),
                    start_at: task.start_at(),
                    end_at: task.end_at(),
                    bar: compute_bar(task, &grid.range, config.step_minutes, col_width_px),
                    color: palette.resolve(&group.id),
                },
            })
            .collect();

        let meta = LayoutMeta {
            range: grid.range,
            total_cols: grid.total_cols,
            grid_width_px: grid.grid_width_px,
            group_count: groups.len(),
            step_minutes: config.step_minutes,
            col_width_px,
            left_width_px: config.left_width_px(),
        };

        Self { meta, grid, rows }
    }

    /// Canvas width: label column plus grid.
    pub fn canvas_width_px(&self) -> f64 {
        self.meta.left_width_px + self.meta.grid_width_px
    }

    /// Number of task rows currently visible.
    pub fn task_row_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r, LayoutRow::Task { .. }))
            .count()
    }
}
