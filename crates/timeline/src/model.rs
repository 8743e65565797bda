//! Data model for the timeline engine
//!
//! Groups and tasks are owned by the caller and never mutated by the engine.
//! Field names serialize in camelCase to match the front-end JSON shape.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// An absolute point in time. Time zone resolution happens before data
/// reaches the engine.
pub type Instant = DateTime<Utc>;

/// A closed time interval.
///
/// `end_at >= start_at` is expected but not enforced; a malformed interval
/// still lays out (at minimum bar width).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInterval {
    pub start_at: Instant,
    pub end_at: Instant,
}

impl TimeInterval {
    /// Create a new interval.
    pub fn new(start_at: Instant, end_at: Instant) -> Self {
        Self { start_at, end_at }
    }

    /// Signed duration of the interval (negative if malformed).
    pub fn duration(&self) -> Duration {
        self.end_at.signed_duration_since(self.start_at)
    }

    /// Whether `end_at >= start_at`.
    pub fn is_well_formed(&self) -> bool {
        self.end_at >= self.start_at
    }
}

/// A single scheduled task rendered as one bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// When the task runs.
    #[serde(flatten)]
    pub interval: TimeInterval,
}

impl Task {
    /// Create a new task.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start_at: Instant,
        end_at: Instant,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            interval: TimeInterval::new(start_at, end_at),
        }
    }

    /// Start of the task.
    pub fn start_at(&self) -> Instant {
        self.interval.start_at
    }

    /// End of the task.
    pub fn end_at(&self) -> Instant {
        self.interval.end_at
    }
}

/// A named, collapsible block of tasks (one job or one tool).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Group identifier, also the key for colors and collapse state.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Tasks in display order.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Group {
    /// Create an empty group.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tasks: Vec::new(),
        }
    }

    /// Append a task.
    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    /// Append several tasks, preserving their order.
    pub fn with_tasks(mut self, tasks: impl IntoIterator<Item = Task>) -> Self {
        self.tasks.extend(tasks);
        self
    }
}

/// Iterate over every task of every group, in group then task order.
pub fn all_tasks(groups: &[Group]) -> impl Iterator<Item = &Task> {
    groups.iter().flat_map(|g| g.tasks.iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> Instant {
        Utc.with_ymd_and_hms(2026, 1, 13, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_interval_duration() {
        let interval = TimeInterval::new(at(9), at(13));
        assert_eq!(interval.duration().num_hours(), 4);
        assert!(interval.is_well_formed());
    }

    #[test]
    fn test_zero_length_interval_is_well_formed() {
        let interval = TimeInterval::new(at(9), at(9));
        assert_eq!(interval.duration(), Duration::zero());
        assert!(interval.is_well_formed());
    }

    #[test]
    fn test_reversed_interval_is_malformed() {
        let interval = TimeInterval::new(at(13), at(9));
        assert!(!interval.is_well_formed());
        assert_eq!(interval.duration().num_hours(), -4);
    }

    #[test]
    fn test_group_builder_preserves_task_order() {
        let group = Group::new("job-a", "Job A")
            .with_task(Task::new("t-2", "Second", at(12), at(13)))
            .with_tasks([Task::new("t-1", "First", at(9), at(10))]);

        let ids: Vec<&str> = group.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t-2", "t-1"]);
    }

    #[test]
    fn test_all_tasks_flattens_in_order() {
        let groups = vec![
            Group::new("a", "A").with_task(Task::new("t-1", "One", at(9), at(10))),
            Group::new("b", "B"),
            Group::new("c", "C").with_task(Task::new("t-2", "Two", at(10), at(11))),
        ];

        let ids: Vec<&str> = all_tasks(&groups).map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t-1", "t-2"]);
    }

    #[test]
    fn test_task_serializes_camel_case_flat() {
        let task = Task::new("t-1", "Knead", at(9), at(13));
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["id"], "t-1");
        assert_eq!(json["name"], "Knead");
        assert_eq!(json["startAt"], "2026-01-13T09:00:00Z");
        assert_eq!(json["endAt"], "2026-01-13T13:00:00Z");
    }

    #[test]
    fn test_group_deserializes_without_tasks() {
        let group: Group = serde_json::from_str(r#"{"id":"g","title":"G"}"#).unwrap();
        assert!(group.tasks.is_empty());
    }
}
