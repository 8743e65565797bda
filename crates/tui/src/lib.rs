//! Terminal Gantt viewer for APS schedules
//!
//! Loads a schedule JSON file, lays it out with `aps-timeline` and draws
//! the chart using ratatui and crossterm.

pub mod app;
pub mod data;
pub mod error;
pub mod event;
pub mod timeline;
pub mod ui;

pub use app::App;
pub use data::ScheduleSource;
pub use error::{TuiError, TuiResult};
pub use timeline::{GanttViewState, render_gantt_view};
