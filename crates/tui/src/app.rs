//! Main application state and event loop.

use std::io::{self, Stdout};
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use crossterm::{
    event::KeyEvent,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::prelude::*;

use aps_timeline::{
    CollapseState, GanttConfig, GanttLayout, Group, GroupBy, LayoutRow, TimeGrid, compute_grid_at,
};

use crate::data::ScheduleSource;
use crate::error::TuiResult;
use crate::event::{Action, action_for, poll_key};
use crate::timeline::{GanttViewState, grid_cells};
use crate::ui;

/// Step sizes offered by the zoom keys, finest first.
pub const ZOOM_STEPS: [u32; 7] = [15, 30, 60, 120, 240, 480, 1440];

/// Cells moved per horizontal scroll.
const SCROLL_CELLS: usize = 8;

/// Inputs the time grid depends on. Collapsing groups does not change the
/// grid, so toggling reuses the cached one.
#[derive(Debug, Clone, Copy, PartialEq)]
struct GridKey {
    generation: u64,
    step_minutes: u32,
    col_width_px: f64,
}

#[derive(Debug, Clone)]
struct GridCache {
    key: GridKey,
    grid: TimeGrid,
}

/// Main application state.
pub struct App {
    /// Parsed schedule file.
    source: ScheduleSource,
    /// Current grouping of schedule records.
    group_by: GroupBy,
    /// Groups derived from the source.
    groups: Vec<Group>,
    /// Bumped whenever `groups` is replaced.
    generation: u64,
    config: GanttConfig,
    collapse: CollapseState,
    /// Current laid-out chart.
    layout: GanttLayout,
    grid_cache: Option<GridCache>,
    /// Number of times the grid was actually computed.
    grid_builds: u64,
    /// Index of the highlighted row in `layout.rows`.
    selected_row: usize,
    /// First visible grid cell.
    horizontal_offset: usize,
    /// Message shown in place of the legend until the next key press.
    status: Option<String>,
    /// Whether the application is still running.
    running: bool,
}

impl App {
    /// Load the schedule at `path` and lay it out with `config`.
    ///
    /// # Errors
    ///
    /// Returns `TuiError::Timeline` if `config` is invalid or a timestamp
    /// cannot be parsed, and the input errors of [`ScheduleSource::load`].
    pub fn new(path: &Path, config: GanttConfig) -> TuiResult<Self> {
        let source = ScheduleSource::load(path)?;
        Self::from_source(source, config)
    }

    /// Build the app from an already loaded source.
    pub fn from_source(source: ScheduleSource, config: GanttConfig) -> TuiResult<Self> {
        config.validate()?;
        let group_by = GroupBy::default();
        let groups = source.groups(group_by)?;
        let collapse = CollapseState::expanded(&groups);
        let grid = compute_grid_at(&groups, &config, Utc::now());
        let layout = GanttLayout::with_grid(&groups, &config, &collapse, grid.clone());

        Ok(Self {
            source,
            group_by,
            groups,
            generation: 0,
            grid_cache: Some(GridCache {
                key: GridKey {
                    generation: 0,
                    step_minutes: config.step_minutes,
                    col_width_px: config.col_width_px(),
                },
                grid,
            }),
            grid_builds: 1,
            config,
            collapse,
            layout,
            selected_row: 0,
            horizontal_offset: 0,
            status: None,
            running: true,
        })
    }

    /// Check if the application is still running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The current chart layout.
    pub fn layout(&self) -> &GanttLayout {
        &self.layout
    }

    pub fn group_by(&self) -> GroupBy {
        self.group_by
    }

    pub fn config(&self) -> &GanttConfig {
        &self.config
    }

    pub fn source(&self) -> &ScheduleSource {
        &self.source
    }

    pub fn selected_row(&self) -> usize {
        self.selected_row
    }

    pub fn horizontal_offset(&self) -> usize {
        self.horizontal_offset
    }

    /// Status message, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Scroll and selection for the chart widget.
    pub fn view_state(&self) -> GanttViewState {
        GanttViewState {
            is_focused: true,
            selected_row: self.selected_row,
            horizontal_offset: self.horizontal_offset,
        }
    }

    /// Request the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Handle a keyboard event.
    pub fn handle_key(&mut self, key: &KeyEvent) -> TuiResult<()> {
        self.status = None;
        match action_for(key) {
            Some(action) => self.apply(action),
            None => Ok(()),
        }
    }

    /// Apply one user action.
    pub fn apply(&mut self, action: Action) -> TuiResult<()> {
        match action {
            Action::Quit => self.quit(),
            Action::Down => self.select_next(),
            Action::Up => self.select_previous(),
            Action::ToggleGroup => self.toggle_selected(),
            Action::ScrollLeft => self.scroll_left(),
            Action::ScrollRight => self.scroll_right(),
            Action::ZoomIn => self.zoom(-1),
            Action::ZoomOut => self.zoom(1),
            Action::SwitchGrouping => self.switch_grouping()?,
            Action::Reload => self.reload(),
        }
        Ok(())
    }

    /// Move selection down. Clamps to the last row (does not wrap).
    pub fn select_next(&mut self) {
        let rows = self.layout.rows.len();
        if rows > 0 && self.selected_row < rows - 1 {
            self.selected_row += 1;
        }
    }

    /// Move selection up. Clamps to the first row (does not wrap).
    pub fn select_previous(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    /// Collapse or expand the group under the cursor. Task rows are ignored.
    pub fn toggle_selected(&mut self) {
        if let Some(LayoutRow::Group { group_id, .. }) = self.layout.rows.get(self.selected_row) {
            self.collapse = self.collapse.toggled(group_id);
            self.relayout();
        }
    }

    pub fn scroll_left(&mut self) {
        self.horizontal_offset = self.horizontal_offset.saturating_sub(SCROLL_CELLS);
    }

    /// Scroll right, stopping with the last grid cell still visible.
    pub fn scroll_right(&mut self) {
        let max = grid_cells(&self.layout).saturating_sub(1);
        self.horizontal_offset = self.horizontal_offset.saturating_add(SCROLL_CELLS).min(max);
    }

    /// Move `direction` entries through [`ZOOM_STEPS`].
    fn zoom(&mut self, direction: isize) {
        let current = zoom_index(self.config.step_minutes);
        let next = current
            .saturating_add_signed(direction)
            .min(ZOOM_STEPS.len() - 1);
        if ZOOM_STEPS[next] != self.config.step_minutes {
            self.config.step_minutes = ZOOM_STEPS[next];
            self.horizontal_offset = 0;
            self.relayout();
        }
    }

    /// Regroup the records by the other key. Pre-grouped files are left
    /// alone.
    pub fn switch_grouping(&mut self) -> TuiResult<()> {
        if self.source.is_pre_grouped() {
            self.status = Some("File is already grouped".to_string());
            return Ok(());
        }
        let group_by = self.group_by.other();
        let groups = self.source.groups(group_by)?;
        self.group_by = group_by;
        self.replace_groups(groups);
        Ok(())
    }

    /// Re-read the file from disk. Failures are reported in the status line
    /// and the previous data stays on screen.
    pub fn reload(&mut self) {
        let loaded = self
            .source
            .reload()
            .and_then(|source| source.groups(self.group_by).map(|groups| (source, groups)));
        match loaded {
            Ok((source, groups)) => {
                self.source = source;
                self.replace_groups(groups);
                self.status = Some("Reloaded".to_string());
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn replace_groups(&mut self, groups: Vec<Group>) {
        self.collapse = CollapseState::expanded(&groups);
        self.groups = groups;
        self.generation += 1;
        self.selected_row = 0;
        self.horizontal_offset = 0;
        self.relayout();
    }

    /// Rebuild the layout, recomputing the grid only when its inputs changed.
    fn relayout(&mut self) {
        let key = GridKey {
            generation: self.generation,
            step_minutes: self.config.step_minutes,
            col_width_px: self.config.col_width_px(),
        };

        let grid = match &self.grid_cache {
            Some(cache) if cache.key == key => cache.grid.clone(),
            _ => {
                let grid = compute_grid_at(&self.groups, &self.config, Utc::now());
                self.grid_builds += 1;
                self.grid_cache = Some(GridCache {
                    key,
                    grid: grid.clone(),
                });
                grid
            }
        };

        self.layout = GanttLayout::with_grid(&self.groups, &self.config, &self.collapse, grid);
        if self.selected_row >= self.layout.rows.len() {
            self.selected_row = self.layout.rows.len().saturating_sub(1);
        }
    }

    /// Run the main application loop.
    ///
    /// This initializes the terminal, runs the event loop, and ensures
    /// the terminal is restored on exit (even on panic).
    pub fn run(&mut self) -> TuiResult<()> {
        let mut terminal = init_terminal()?;

        // Restore the terminal even if drawing panics
        let guard = scopeguard::guard((), |()| {
            let _ = restore_terminal();
        });

        let result = self.event_loop(&mut terminal);

        drop(guard);

        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> TuiResult<()> {
        while self.running {
            terminal.draw(|frame| ui::draw(frame, self))?;

            if let Some(key) = poll_key(Duration::from_millis(100))? {
                self.handle_key(&key)?;
            }
        }
        Ok(())
    }
}

/// Position of `step_minutes` in [`ZOOM_STEPS`], or of the first larger
/// entry for steps not on the ladder.
fn zoom_index(step_minutes: u32) -> usize {
    ZOOM_STEPS
        .iter()
        .position(|&s| s >= step_minutes)
        .unwrap_or(ZOOM_STEPS.len() - 1)
}

/// Initialize the terminal for TUI rendering.
fn init_terminal() -> TuiResult<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
fn restore_terminal() -> TuiResult<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}
