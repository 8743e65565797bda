//! Timeline layout engine for APS schedule Gantt charts
//!
//! Converts groups of tasks with arbitrary start/end instants into a
//! step-aligned time grid, pixel geometry for each task bar, stable group
//! colors and the ordered list of rows to draw. Everything here is pure and
//! synchronous; rendering is left to the caller.

pub mod bar;
pub mod color;
pub mod config;
pub mod error;
pub mod grid;
pub mod label;
pub mod layout;
pub mod model;
pub mod rows;
pub mod schedule;

pub use bar::{BarGeometry, CellSpan, MIN_BAR_WIDTH_PX, compute_bar};
pub use color::{Color, ColorOverride, GroupColor, Hsla, Palette, hash_hue, resolve_color};
pub use config::GanttConfig;
pub use error::{TimelineError, TimelineResult};
pub use grid::{TimeGrid, TimeRange, ceil_to_step, compute_grid, compute_grid_at, floor_to_step};
pub use layout::{GanttLayout, LayoutMeta, LayoutRow};
pub use model::{Group, Instant, Task, TimeInterval};
pub use rows::{CollapseState, GroupState, Row, flatten_rows};
pub use schedule::{GroupBy, ScheduleDocument, ScheduleRecord, SimulationResult, group_schedules};

static_assertions::assert_impl_all!(Group: Send, Sync);
static_assertions::assert_impl_all!(GanttLayout: Send, Sync);
static_assertions::assert_impl_all!(CollapseState: Send, Sync);
