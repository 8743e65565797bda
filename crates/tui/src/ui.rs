//! UI rendering for the TUI.
//!
//! Provides layout and widget rendering using ratatui.

use chrono::Local;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use aps_timeline::label::range_label;

use crate::app::App;
use crate::timeline::render_gantt_view;

/// Legend text for keyboard shortcuts.
const LEGEND: &str = " [j/k] Move  [Enter] Fold group  [h/l] Scroll  [+/-] Zoom  [g] Job/Tool  [r] Reload  [q] Quit ";

/// Draw the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = create_main_layout(frame.area());

    draw_header(frame, chunks[0], app);
    render_gantt_view(frame, chunks[1], app.layout(), &app.view_state());
    draw_legend(frame, chunks[2], app.status());
}

/// Create the main three-part layout: header, chart, legend.
fn create_main_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Chart
            Constraint::Length(1), // Legend bar
        ])
        .split(area)
        .to_vec()
}

/// Header line: file name, visible range, step and grouping.
fn header_line(app: &App) -> Line<'static> {
    let meta = &app.layout().meta;
    let file = app
        .source()
        .path()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let grouping = if app.source().is_pre_grouped() {
        "groups".to_string()
    } else {
        format!("by {}", app.group_by())
    };

    Line::from(vec![
        Span::styled(
            format!(" {file} "),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {} ", range_label(&meta.range, &Local))),
        Span::styled(
            format!(" {}m ", meta.step_minutes),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::styled(
            format!(" {grouping} \u{00B7} {} groups ", meta.group_count),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let header = Paragraph::new(header_line(app)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(header, area);
}

/// Draw the legend bar at the bottom, or the status message if one is set.
fn draw_legend(frame: &mut Frame, area: Rect, status: Option<&str>) {
    let legend = match status {
        Some(message) => Paragraph::new(format!(" {message} "))
            .style(Style::default().fg(Color::Black).bg(Color::Yellow)),
        None => Paragraph::new(LEGEND).style(Style::default().fg(Color::Black).bg(Color::Cyan)),
    };

    frame.render_widget(legend, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ScheduleSource;
    use aps_timeline::{GanttConfig, ScheduleDocument};

    #[test]
    fn test_legend_not_empty() {
        assert!(!LEGEND.is_empty());
    }

    #[test]
    fn test_create_main_layout_produces_three_chunks() {
        let area = Rect::new(0, 0, 80, 24);
        let chunks = create_main_layout(area);
        assert_eq!(chunks.len(), 3, "Expected 3 chunks: header, chart, legend");
        assert_eq!(chunks[0].height, 3);
        assert_eq!(chunks[2].height, 1);
    }

    #[test]
    fn test_create_main_layout_small_terminal() {
        let area = Rect::new(0, 0, 40, 4);
        let chunks = create_main_layout(area);
        assert_eq!(chunks.len(), 3);
    }

    #[test]
    fn test_header_line_shows_step_and_grouping() {
        let document: ScheduleDocument = serde_json::from_str(
            r#"{"schedules": [{"id": 1, "taskName": "Cut", "toolId": "saw",
                "startAt": "2026-01-13T09:00:00Z", "endAt": "2026-01-13T10:00:00Z"}]}"#,
        )
        .unwrap();
        let app = App::from_source(
            ScheduleSource::from_document("/tmp/plan.json", document),
            GanttConfig::new(),
        )
        .unwrap();

        let text: String = header_line(&app)
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert!(text.starts_with(" plan.json "));
        assert!(text.contains(" 60m "));
        assert!(text.contains("by tool"));
        assert!(text.contains("1 groups"));
    }
}
