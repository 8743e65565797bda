//! Output formatting module for the APS Gantt CLI
//!
//! Provides the layout table, the plain-text Gantt chart and the group
//! color listing.

use std::fmt::Display;

use chrono::TimeZone;

use aps_timeline::label::{day_key, fmt_hm, range_label, tick_label};
use aps_timeline::{GanttLayout, GroupColor, Instant, LayoutRow};

/// Maximum width for group and task names before truncation
const MAX_NAME_WIDTH: usize = 30;

/// Maximum width of the label column in the text chart
const MAX_LABEL_WIDTH: usize = 32;

/// Widest grid the text chart draws; anything further right is cut off
pub const MAX_CHART_CHARS: usize = 8192;

/// Truncate a string to the specified maximum width, adding ellipsis if needed.
fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let head: String = s.chars().take(max_width - 3).collect();
        format!("{head}...")
    }
}

/// Pixel values without a trailing `.0` when whole.
fn format_px(px: f64) -> String {
    if px.fract() == 0.0 {
        format!("{px:.0}")
    } else {
        format!("{px:.1}")
    }
}

fn format_instant<Tz>(instant: Instant, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{} {}", day_key(instant, tz), fmt_hm(instant, tz))
}

/// One-line summary of the grid.
pub fn format_layout_summary<Tz>(layout: &GanttLayout, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let meta = &layout.meta;
    format!(
        "{}  step {}m  {} cols  {}px  {} groups",
        range_label(&meta.range, tz),
        meta.step_minutes,
        meta.total_cols,
        format_px(meta.grid_width_px),
        meta.group_count
    )
}

fn table_cells<Tz>(row: &LayoutRow, tz: &Tz) -> [String; 7]
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match row {
        LayoutRow::Group {
            title,
            task_count,
            collapsed,
            ..
        } => {
            let title = truncate(title, MAX_NAME_WIDTH);
            [
                "group".to_string(),
                if *collapsed {
                    format!("{title} [+]")
                } else {
                    title
                },
                format!("{task_count} tasks"),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
            ]
        }
        LayoutRow::Task {
            group_id,
            name,
            start_at,
            end_at,
            bar,
            ..
        } => [
            "task".to_string(),
            truncate(group_id, MAX_NAME_WIDTH),
            truncate(name, MAX_NAME_WIDTH),
            format_instant(*start_at, tz),
            format_instant(*end_at, tz),
            format_px(bar.left_px),
            format_px(bar.width_px),
        ],
    }
}

/// Format a layout into a summary line followed by an aligned table.
///
/// Produces output in the format:
/// ```text
/// 2026-01-13 09:00 ~ 2026-01-13 19:00  step 60m  10 cols  640px  1 groups
/// Kind   Group        Task     Start             End               Left  Width
/// -----  -----------  -------  ----------------  ----------------  ----  -----
/// group  Bread-A      2 tasks  -                 -                 -     -
/// task   job-bread-a  Knead    2026-01-13 09:00  2026-01-13 13:00  0     256
/// ```
///
/// Collapsed groups are marked with `[+]`.
pub fn format_layout_table<Tz>(layout: &GanttLayout, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut output = format_layout_summary(layout, tz);
    if layout.rows.is_empty() {
        output.push_str("\nNo scheduled tasks.");
        return output;
    }

    let headers = ["Kind", "Group", "Task", "Start", "End", "Left", "Width"].map(String::from);
    let rows: Vec<[String; 7]> = layout.rows.iter().map(|r| table_cells(r, tz)).collect();

    let mut widths = headers.clone().map(|h| h.chars().count());
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    output.push('\n');
    push_table_row(&mut output, &headers, &widths);
    let separator = widths.map(|w| "-".repeat(w));
    push_table_row(&mut output, &separator, &widths);
    for cells in &rows {
        push_table_row(&mut output, cells, &widths);
    }

    // Remove trailing newline
    output.pop();

    output
}

fn push_table_row(output: &mut String, cells: &[String; 7], widths: &[usize; 7]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    output.push_str(line.trim_end());
    output.push('\n');
}

fn chart_label(row: &LayoutRow) -> String {
    match row {
        LayoutRow::Group {
            title,
            task_count,
            collapsed,
            ..
        } => {
            let marker = if *collapsed { '+' } else { '-' };
            format!("{marker} {title} ({task_count})")
        }
        LayoutRow::Task { name, .. } => format!("  {name}"),
    }
}

/// Render a layout as a plain-text Gantt chart.
///
/// Each character covers `px_per_char` pixels of the grid. Bars are drawn
/// with `#` and tick boundaries with `+` on the rule under the header. The
/// grid is cut off after [`MAX_CHART_CHARS`] characters.
pub fn format_chart<Tz>(layout: &GanttLayout, px_per_char: f64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let grid_chars = ((layout.meta.grid_width_px / px_per_char).ceil().max(0.0) as usize)
        .min(MAX_CHART_CHARS);
    let labels: Vec<String> = layout
        .rows
        .iter()
        .map(|r| truncate(&chart_label(r), MAX_LABEL_WIDTH))
        .collect();
    let label_width = labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);

    let tick_pos = |index: usize| {
        ((index as f64 * layout.meta.col_width_px) / px_per_char).round() as usize
    };

    // Tick labels, skipping any that would collide with the previous one
    let mut header = vec![' '; grid_chars + 1];
    let mut next_free = 0;
    for (index, tick) in layout.grid.ticks.iter().enumerate() {
        let pos = tick_pos(index);
        let label = tick_label(*tick, tz);
        let len = label.chars().count();
        if pos < next_free || pos.saturating_add(len) > header.len() {
            continue;
        }
        for (i, c) in label.chars().enumerate() {
            header[pos + i] = c;
        }
        next_free = pos + len + 1;
    }

    let mut rule = vec!['-'; grid_chars + 1];
    for index in 0..layout.grid.ticks.len() {
        if let Some(slot) = rule.get_mut(tick_pos(index)) {
            *slot = '+';
        }
    }

    let pad = " ".repeat(label_width);
    let mut lines = vec![
        format_layout_summary(layout, tz),
        format!("{pad} {}", header.iter().collect::<String>()),
        format!("{pad} {}", rule.iter().collect::<String>()),
    ];

    for (row, label) in layout.rows.iter().zip(&labels) {
        let mut cells = vec![' '; grid_chars];
        if let Some(bar) = row.bar() {
            let span = bar.to_cells(px_per_char);
            for cell in cells.iter_mut().take(span.end()).skip(span.start) {
                *cell = '#';
            }
        }
        lines.push(format!(
            "{label:<label_width$} {}",
            cells.iter().collect::<String>()
        ));
    }

    lines
        .iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the resolved colors of one group.
pub fn format_group_color(group_id: &str, color: &GroupColor) -> String {
    format!(
        "Group:  {group_id}\nHue:    {}\nFill:   {}\nBorder: {}\nAccent: {}",
        format_px(color.hue),
        color.fill_color,
        color.border_color,
        color.accent_color
    )
}
