//! Schedule loading for the TUI.
//!
//! Reads a schedule JSON file once and turns it into display groups in the
//! local time zone. Regrouping reuses the parsed document so switching
//! between job and tool views never touches the disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use aps_timeline::{Group, GroupBy, ScheduleDocument};

use crate::error::{TuiError, TuiResult};

/// A parsed schedule file.
#[derive(Debug, Clone)]
pub struct ScheduleSource {
    path: PathBuf,
    document: ScheduleDocument,
}

impl ScheduleSource {
    /// Read and parse the schedule at `path`.
    ///
    /// # Errors
    ///
    /// Returns `TuiError::ReadInput` if the file cannot be read and
    /// `TuiError::ParseInput` if it is not a recognized schedule document.
    pub fn load(path: &Path) -> TuiResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| TuiError::ReadInput {
            path: path.to_path_buf(),
            source,
        })?;
        let document = parse_document(path, &text)?;
        Ok(Self {
            path: path.to_path_buf(),
            document,
        })
    }

    /// Wrap an already parsed document.
    pub fn from_document(path: impl Into<PathBuf>, document: ScheduleDocument) -> Self {
        Self {
            path: path.into(),
            document,
        }
    }

    /// Re-read the file from disk.
    pub fn reload(&self) -> TuiResult<Self> {
        Self::load(&self.path)
    }

    /// Path the schedule was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file already carries groups, making `GroupBy` irrelevant.
    pub fn is_pre_grouped(&self) -> bool {
        self.document.is_pre_grouped()
    }

    /// Build display groups, resolving local timestamps in the system zone.
    pub fn groups(&self, by: GroupBy) -> TuiResult<Vec<Group>> {
        Ok(self.document.to_groups(by, &Local)?)
    }
}

fn parse_document(path: &Path, text: &str) -> TuiResult<ScheduleDocument> {
    serde_json::from_str(text).map_err(|source| TuiError::ParseInput {
        path: path.to_path_buf(),
        source,
    })
}
