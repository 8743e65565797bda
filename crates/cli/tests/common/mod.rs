//! Test infrastructure for integration tests
//!
//! Provides isolated temp directories holding schedule and config files, and
//! command builder helpers. Each test gets its own directory so tests never
//! share files.

use std::path::PathBuf;

use aps_gantt_cli::commands::{ChartCommand, ColorCommand, LayoutCommand, ScheduleArgs};
use aps_timeline::GroupBy;

/// Simulation result with two jobs on three tools.
///
/// By tool: mixer (k1, w1), oven (b1), proofer (p1).
/// By job: bread (k1, p1, b1), cake (w1).
pub const SIMULATION: &str = r#"{
  "schedules": [
    {"id": "k1", "taskName": "Knead", "jobId": "bread", "toolId": "mixer",
     "seq": 1, "taskSeq": 1,
     "startAt": "2026-01-13T09:00:00Z", "endAt": "2026-01-13T10:00:00Z"},
    {"id": "b1", "taskName": "Bake", "jobId": "bread", "toolId": "oven",
     "seq": 1, "taskSeq": 3,
     "startAt": "2026-01-13T12:00:00Z", "endAt": "2026-01-13T13:30:00Z"},
    {"id": "w1", "taskName": "Whisk", "jobId": "cake", "toolId": "mixer",
     "seq": 2, "taskSeq": 1,
     "startAt": "2026-01-13T10:00:00Z", "endAt": "2026-01-13T10:30:00Z"},
    {"id": "p1", "taskName": "Proof", "jobId": "bread", "toolId": "proofer",
     "seq": 1, "taskSeq": 2,
     "startAt": "2026-01-13T10:00:00Z", "endAt": "2026-01-13T12:00:00Z"}
  ]
}"#;

/// Test context owning a unique temp directory.
pub struct TestContext {
    pub temp_dir: PathBuf,
}

impl TestContext {
    /// Create a new test context with an empty temp directory.
    ///
    /// The directory name uses process ID, thread ID, and nanosecond
    /// timestamp to guarantee isolation.
    pub fn new() -> Self {
        let temp_dir = std::env::temp_dir().join(format!(
            "apsg-integration-test-{}-{:?}-{}",
            std::process::id(),
            std::thread::current().id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&temp_dir).unwrap();
        Self { temp_dir }
    }

    /// Write `contents` to `name` inside the temp directory.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Write the standard simulation fixture.
    pub fn simulation(&self) -> PathBuf {
        self.write("simulation.json", SIMULATION)
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        // Auto-cleanup on drop
        let _ = std::fs::remove_dir_all(&self.temp_dir);
    }
}

// =============================================================================
// Command Builder Helpers
// =============================================================================

/// Schedule arguments with no collapsed groups.
pub fn schedule_args(input: PathBuf, group_by: GroupBy) -> ScheduleArgs {
    ScheduleArgs {
        input,
        group_by,
        collapse: vec![],
    }
}

/// Create a LayoutCommand printing JSON.
pub fn layout_json_cmd(input: PathBuf, group_by: GroupBy) -> LayoutCommand {
    LayoutCommand {
        schedule: schedule_args(input, group_by),
        json: true,
    }
}

/// Create a LayoutCommand collapsing the given groups.
pub fn layout_json_cmd_collapsed(
    input: PathBuf,
    group_by: GroupBy,
    collapse: &[&str],
) -> LayoutCommand {
    LayoutCommand {
        schedule: ScheduleArgs {
            input,
            group_by,
            collapse: collapse.iter().map(|s| s.to_string()).collect(),
        },
        json: true,
    }
}

/// Create a ChartCommand at the given scale.
#[allow(dead_code)]
pub fn chart_cmd(input: PathBuf, px_per_char: f64) -> ChartCommand {
    ChartCommand {
        schedule: schedule_args(input, GroupBy::Tool),
        px_per_char,
    }
}

/// Create a ColorCommand printing JSON.
#[allow(dead_code)]
pub fn color_json_cmd(group_id: &str) -> ColorCommand {
    ColorCommand {
        group_id: group_id.to_string(),
        json: true,
    }
}
