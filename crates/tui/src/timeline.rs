//! Gantt chart widget.
//!
//! Draws a [`GanttLayout`] into the terminal: a label column on the left,
//! tick headers along the top, and one line per visible row. Pixel geometry
//! from the layout engine is converted to character cells at a fixed
//! density of [`PX_PER_CELL`] pixels per cell, so a 64px step occupies
//! eight cells.

use chrono::Local;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use aps_timeline::label::tick_label;
use aps_timeline::{CellSpan, GanttLayout, LayoutRow};

/// Pixels represented by one terminal cell.
pub const PX_PER_CELL: f64 = 8.0;

/// Widest label column, in cells.
const MAX_LABEL_CELLS: u16 = 30;

/// Glyph used for bar cells.
const BAR_GLYPH: &str = "\u{2588}";

/// Visible window into the chart, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Viewport {
    label_width: usize,
    bar_width: usize,
    /// First grid cell shown.
    offset: usize,
}

impl Viewport {
    fn end(&self) -> usize {
        self.offset.saturating_add(self.bar_width)
    }
}

/// Scroll, selection and focus for the chart panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GanttViewState {
    /// Whether this panel currently has focus.
    pub is_focused: bool,
    /// Index into `GanttLayout::rows` of the highlighted row.
    pub selected_row: usize,
    /// First visible grid cell.
    pub horizontal_offset: usize,
}

/// Width of the whole grid in cells.
pub fn grid_cells(layout: &GanttLayout) -> usize {
    (layout.meta.grid_width_px / PX_PER_CELL).ceil().max(0.0) as usize
}

/// Convert an engine color to a terminal color, falling back to cyan for
/// CSS strings that are not plain hex.
pub fn terminal_color(color: &aps_timeline::Color) -> Color {
    color
        .to_rgb()
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::Cyan)
}

/// Render the chart.
pub fn render_gantt_view(
    frame: &mut Frame,
    area: Rect,
    layout: &GanttLayout,
    state: &GanttViewState,
) {
    let border_color = if state.is_focused {
        Color::Yellow
    } else {
        Color::Cyan
    };

    let block = Block::default()
        .title(" Gantt ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    if layout.rows.is_empty() {
        let paragraph = Paragraph::new("No scheduled tasks")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2) as usize;
    let viewport = viewport_for(layout, inner_width, state.horizontal_offset);

    let mut lines = vec![
        build_tick_header(layout, &viewport),
        build_separator(layout, &viewport),
    ];

    let body_height = inner_height.saturating_sub(lines.len());
    let first = first_visible_row(state.selected_row, body_height);
    for (index, row) in layout.rows.iter().enumerate().skip(first).take(body_height) {
        let is_selected = state.is_focused && index == state.selected_row;
        lines.push(build_row_line(row, &viewport, is_selected));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn viewport_for(layout: &GanttLayout, inner_width: u16, offset: usize) -> Viewport {
    let label_width = MAX_LABEL_CELLS.min(inner_width / 3) as usize;
    let bar_width = (inner_width as usize).saturating_sub(label_width);
    let max_offset = grid_cells(layout).saturating_sub(bar_width);
    Viewport {
        label_width,
        bar_width,
        offset: offset.min(max_offset),
    }
}

/// First row to draw so that `selected` stays on screen.
fn first_visible_row(selected: usize, body_height: usize) -> usize {
    if body_height == 0 {
        return selected;
    }
    (selected + 1).saturating_sub(body_height)
}

fn tick_cell(index: usize, col_width_px: f64) -> usize {
    ((index as f64 * col_width_px) / PX_PER_CELL).round() as usize
}

/// Hour labels at each step boundary. Labels that would overlap the
/// previous one are skipped.
fn build_tick_header(layout: &GanttLayout, viewport: &Viewport) -> Line<'static> {
    let mut header = vec![' '; viewport.bar_width];
    let mut next_free = 0usize;

    for (index, tick) in layout.grid.ticks.iter().enumerate() {
        let cell = tick_cell(index, layout.meta.col_width_px);
        if cell < viewport.offset || cell >= viewport.end() {
            continue;
        }
        let pos = cell - viewport.offset;
        let label = tick_label(*tick, &Local);
        let len = label.chars().count();
        if pos < next_free || pos.saturating_add(len) > viewport.bar_width {
            continue;
        }
        for (i, c) in label.chars().enumerate() {
            header[pos + i] = c;
        }
        next_free = pos + len + 1;
    }

    Line::from(vec![
        Span::raw(" ".repeat(viewport.label_width)),
        Span::styled(
            header.into_iter().collect::<String>(),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// Horizontal rule with a cross at every step boundary.
fn build_separator(layout: &GanttLayout, viewport: &Viewport) -> Line<'static> {
    let mut rule = vec!['\u{2500}'; viewport.bar_width];
    for index in 0..layout.grid.ticks.len() {
        let cell = tick_cell(index, layout.meta.col_width_px);
        if cell >= viewport.offset && cell < viewport.end() {
            rule[cell - viewport.offset] = '\u{253C}';
        }
    }

    Line::from(vec![
        Span::raw("\u{2500}".repeat(viewport.label_width)),
        Span::styled(
            rule.into_iter().collect::<String>(),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn build_row_line(row: &LayoutRow, viewport: &Viewport, is_selected: bool) -> Line<'static> {
    let highlight = |style: Style| {
        if is_selected {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        }
    };

    match row {
        LayoutRow::Group {
            title,
            task_count,
            collapsed,
            color,
            ..
        } => {
            let marker = if *collapsed { '\u{25B8}' } else { '\u{25BE}' };
            let label = fit_label(
                &format!("{marker} {title} ({task_count})"),
                viewport.label_width,
            );
            let style = Style::default()
                .fg(terminal_color(&color.accent_color))
                .add_modifier(Modifier::BOLD);
            Line::from(vec![
                Span::styled(label, highlight(style)),
                Span::raw(" ".repeat(viewport.bar_width)),
            ])
        }
        LayoutRow::Task {
            name, bar, color, ..
        } => {
            let label = fit_label(&format!("  {name}"), viewport.label_width);
            let mut spans = vec![Span::styled(label, highlight(Style::default()))];
            spans.extend(build_bar_spans(
                bar.to_cells(PX_PER_CELL),
                viewport,
                Style::default().fg(terminal_color(&color.border_color)),
            ));
            Line::from(spans)
        }
    }
}

/// Blank cells around the visible part of a bar.
fn build_bar_spans(cells: CellSpan, viewport: &Viewport, style: Style) -> Vec<Span<'static>> {
    let start = cells.start.clamp(viewport.offset, viewport.end());
    let end = cells.end().clamp(viewport.offset, viewport.end());

    let mut spans = Vec::with_capacity(3);
    if start > viewport.offset {
        spans.push(Span::raw(" ".repeat(start - viewport.offset)));
    }
    if end > start {
        spans.push(Span::styled(BAR_GLYPH.repeat(end - start), style));
    }
    if viewport.end() > end {
        spans.push(Span::raw(" ".repeat(viewport.end() - end)));
    }
    spans
}

/// Pad or truncate `text` to exactly `width` characters.
fn fit_label(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{text:<width$}")
    } else if width <= 3 {
        text.chars().take(width).collect()
    } else {
        let mut out: String = text.chars().take(width - 3).collect();
        out.push_str("...");
        out
    }
}
