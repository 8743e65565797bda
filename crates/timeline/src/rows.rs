//! Row flattening and per-group collapse state.
//!
//! The two-level group -> task structure is flattened into the ordered list
//! of rows that a renderer draws top to bottom. Collapsed groups keep their
//! header row and hide their tasks.

use std::collections::HashMap;

use crate::model::{Group, Task};

/// Display state of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupState {
    /// Tasks are shown below the group row.
    #[default]
    Expanded,
    /// Only the group row is shown.
    Collapsed,
}

impl GroupState {
    /// The state reached by one toggle.
    pub fn toggled(self) -> Self {
        match self {
            Self::Expanded => Self::Collapsed,
            Self::Collapsed => Self::Expanded,
        }
    }
}

/// Caller-owned collapse flags keyed by group id.
///
/// Groups missing from the map are expanded, so groups that appear after a
/// reload are always shown on first display. Updates are copy-on-write:
/// [`CollapseState::toggled`] returns a new state and leaves `self` intact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseState {
    collapsed: HashMap<String, bool>,
}

impl CollapseState {
    /// Create a state with every group expanded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state with an explicit `false` entry for each group.
    pub fn expanded(groups: &[Group]) -> Self {
        Self {
            collapsed: groups.iter().map(|g| (g.id.clone(), false)).collect(),
        }
    }

    /// Whether the group is collapsed.
    pub fn is_collapsed(&self, group_id: &str) -> bool {
        self.collapsed.get(group_id).copied().unwrap_or(false)
    }

    /// Current state of the group.
    pub fn state(&self, group_id: &str) -> GroupState {
        if self.is_collapsed(group_id) {
            GroupState::Collapsed
        } else {
            GroupState::Expanded
        }
    }

    /// Return a copy with the flag for `group_id` flipped.
    ///
    /// An unknown id starts out expanded, so its first toggle collapses it.
    pub fn toggled(&self, group_id: &str) -> Self {
        let mut collapsed = self.collapsed.clone();
        let flag = collapsed.entry(group_id.to_string()).or_insert(false);
        *flag = !*flag;
        Self { collapsed }
    }

    /// Number of groups currently collapsed.
    pub fn collapsed_count(&self) -> usize {
        self.collapsed.values().filter(|c| **c).count()
    }
}

/// One rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row<'a> {
    /// Group header.
    Group { group: &'a Group },
    /// A task inside an expanded group.
    Task { group: &'a Group, task: &'a Task },
}

impl<'a> Row<'a> {
    /// The group this row belongs to.
    pub fn group(&self) -> &'a Group {
        match self {
            Row::Group { group } | Row::Task { group, .. } => group,
        }
    }

    /// The task, for task rows.
    pub fn task(&self) -> Option<&'a Task> {
        match self {
            Row::Group { .. } => None,
            Row::Task { task, .. } => Some(task),
        }
    }

    /// Whether this is a group header row.
    pub fn is_group(&self) -> bool {
        matches!(self, Row::Group { .. })
    }
}

/// Flatten groups into display rows.
///
/// Each group yields its header row, followed by its tasks in their original
/// order unless the group is collapsed.
pub fn flatten_rows<'a>(groups: &'a [Group], collapse: &CollapseState) -> Vec<Row<'a>> {
    let task_count: usize = groups.iter().map(|g| g.tasks.len()).sum();
    let mut rows = Vec::with_capacity(groups.len() + task_count);

    for group in groups {
        rows.push(Row::Group { group });
        if !collapse.is_collapsed(&group.id) {
            rows.extend(group.tasks.iter().map(|task| Row::Task { group, task }));
        }
    }

    rows
}
