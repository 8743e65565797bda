//! Text labels for ticks, ranges and task tooltips.
//!
//! All labels are formatted in a caller-supplied time zone; the engine
//! itself only deals in UTC instants.

use std::fmt::Display;

use chrono::TimeZone;

use crate::grid::TimeRange;
use crate::model::{Group, Instant, Task};

/// `HH:MM` in the given zone.
pub fn fmt_hm<Tz>(instant: Instant, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant.with_timezone(tz).format("%H:%M").to_string()
}

/// `YYYY-MM-DD` in the given zone.
pub fn day_key<Tz>(instant: Instant, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant.with_timezone(tz).format("%Y-%m-%d").to_string()
}

/// Column header for a tick: the zero-padded hour followed by `:00`.
pub fn tick_label<Tz>(instant: Instant, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant.with_timezone(tz).format("%H:00").to_string()
}

/// `YYYY-MM-DD HH:MM ~ YYYY-MM-DD HH:MM`.
pub fn range_label<Tz>(range: &TimeRange, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{} {} ~ {} {}",
        day_key(range.start, tz),
        fmt_hm(range.start, tz),
        day_key(range.end, tz),
        fmt_hm(range.end, tz)
    )
}

/// Hover text for a task bar: `"{group} / {task}\nHH:MM ~ HH:MM"`.
pub fn task_tooltip<Tz>(group: &Group, task: &Task, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{} / {}\n{} ~ {}",
        group.title,
        task.name,
        fmt_hm(task.start_at(), tz),
        fmt_hm(task.end_at(), tz)
    )
}
