//! Conversion of simulation output into timeline groups.
//!
//! The APS server returns a flat list of scheduled operations. For display
//! they are grouped either by job or by tool. Timestamps arrive as ISO-8601
//! local date-times (or RFC 3339 with an offset) and are resolved against a
//! caller-supplied time zone here, before the layout engine sees them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::{TimelineError, TimelineResult};
use crate::model::{Group, Instant, Task};

/// Accepted layouts for local date-time strings.
const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// How simulation records are grouped into rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// One group per job; tasks ordered by `taskSeq`.
    Job,
    /// One group per tool; tasks ordered by `seq`.
    #[default]
    Tool,
}

impl GroupBy {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupBy::Job => "job",
            GroupBy::Tool => "tool",
        }
    }

    /// The other grouping.
    pub fn other(self) -> Self {
        match self {
            GroupBy::Job => GroupBy::Tool,
            GroupBy::Tool => GroupBy::Job,
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "job" => Ok(GroupBy::Job),
            "tool" => Ok(GroupBy::Tool),
            other => Err(format!("unknown grouping '{other}' (expected 'job' or 'tool')")),
        }
    }
}

/// One scheduled operation as returned by the simulation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecord {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub task_name: String,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub job_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub tool_id: Option<String>,
    /// Position on the tool.
    #[serde(default)]
    pub seq: i64,
    /// Position within the job.
    #[serde(default)]
    pub task_seq: i64,
    pub start_at: String,
    pub end_at: String,
}

impl ScheduleRecord {
    /// The key of the group this record belongs to under `by`.
    ///
    /// A missing id groups under the empty key.
    pub fn group_key(&self, by: GroupBy) -> &str {
        match by {
            GroupBy::Job => self.job_id.as_deref().unwrap_or(""),
            GroupBy::Tool => self.tool_id.as_deref().unwrap_or(""),
        }
    }

    fn sort_key(&self, by: GroupBy) -> i64 {
        match by {
            GroupBy::Job => self.task_seq,
            GroupBy::Tool => self.seq,
        }
    }

    fn task_id(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("{}-{}", self.job_id.as_deref().unwrap_or(""), self.task_seq),
        }
    }

    /// Convert into a task, resolving local times in `tz`.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::InvalidTimestamp` if either time fails to parse.
    pub fn to_task<Tz: TimeZone>(&self, tz: &Tz) -> TimelineResult<Task> {
        let id = self.task_id();
        let start_at = parse_field(&id, "startAt", &self.start_at, tz)?;
        let end_at = parse_field(&id, "endAt", &self.end_at, tz)?;
        Ok(Task::new(id, self.task_name.clone(), start_at, end_at))
    }
}

/// Response body of the simulation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    #[serde(default)]
    pub schedules: Vec<ScheduleRecord>,
}

/// A task in a pre-grouped document, times still unparsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTask {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub start_at: String,
    pub end_at: String,
}

/// A group in a pre-grouped document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGroup {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<RawTask>,
}

/// Any of the accepted input documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScheduleDocument {
    /// `{ "schedules": [...] }` as returned by the server.
    Simulation(SimulationResult),
    /// A bare array of schedule records.
    Records(Vec<ScheduleRecord>),
    /// Groups already shaped for display.
    Groups(Vec<RawGroup>),
}

impl ScheduleDocument {
    /// Whether the document is already grouped, making `GroupBy` irrelevant.
    pub fn is_pre_grouped(&self) -> bool {
        matches!(self, ScheduleDocument::Groups(_))
    }

    /// Build display groups from the document.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::InvalidTimestamp` on the first unparsable time.
    pub fn to_groups<Tz: TimeZone>(&self, by: GroupBy, tz: &Tz) -> TimelineResult<Vec<Group>> {
        match self {
            ScheduleDocument::Simulation(result) => group_schedules(&result.schedules, by, tz),
            ScheduleDocument::Records(records) => group_schedules(records, by, tz),
            ScheduleDocument::Groups(groups) => groups
                .iter()
                .map(|raw| {
                    let tasks = raw
                        .tasks
                        .iter()
                        .map(|t| {
                            Ok(Task::new(
                                t.id.clone(),
                                t.name.clone(),
                                parse_field(&t.id, "startAt", &t.start_at, tz)?,
                                parse_field(&t.id, "endAt", &t.end_at, tz)?,
                            ))
                        })
                        .collect::<TimelineResult<Vec<_>>>()?;
                    Ok(Group::new(raw.id.clone(), raw.title.clone()).with_tasks(tasks))
                })
                .collect(),
        }
    }
}

/// Group simulation records by job or tool.
///
/// Groups appear in the order their key is first seen. Group titles are the
/// keys. Tasks are stably sorted by `taskSeq` for jobs and `seq` for tools.
///
/// # Errors
///
/// Returns `TimelineError::InvalidTimestamp` on the first unparsable time.
pub fn group_schedules<Tz: TimeZone>(
    records: &[ScheduleRecord],
    by: GroupBy,
    tz: &Tz,
) -> TimelineResult<Vec<Group>> {
    let mut order: Vec<(&str, Vec<&ScheduleRecord>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let key = record.group_key(by);
        let slot = *index.entry(key).or_insert_with(|| {
            order.push((key, Vec::new()));
            order.len() - 1
        });
        order[slot].1.push(record);
    }

    let groups = order
        .into_iter()
        .map(|(key, mut members)| {
            members.sort_by_key(|r| r.sort_key(by));
            let tasks = members
                .iter()
                .map(|r| r.to_task(tz))
                .collect::<TimelineResult<Vec<_>>>()?;
            Ok(Group::new(key, key).with_tasks(tasks))
        })
        .collect::<TimelineResult<Vec<_>>>()?;

    debug!(
        records = records.len(),
        groups = groups.len(),
        group_by = %by,
        "grouped schedule records"
    );

    Ok(groups)
}

/// Parse an ISO-8601 timestamp.
///
/// Strings with an offset are taken as absolute. Local date-times are
/// resolved in `tz`; an ambiguous local time picks the earlier instant and a
/// nonexistent one fails.
pub fn parse_instant<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<Instant> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_field<Tz: TimeZone>(
    record_id: &str,
    field: &'static str,
    value: &str,
    tz: &Tz,
) -> TimelineResult<Instant> {
    parse_instant(value, tz).ok_or_else(|| TimelineError::InvalidTimestamp {
        record_id: record_id.to_string(),
        field,
        value: value.to_string(),
    })
}

/// Ids may arrive as strings or numbers depending on the backend entity.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Integer(n) => n.to_string(),
        }
    }
}

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn de_opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<RawId>::deserialize(deserializer).map(|id| id.map(String::from))
}
