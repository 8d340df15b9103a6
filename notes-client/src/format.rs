use std::fmt::Display;

use chrono::{DateTime, TimeZone};

/// Renders a date the way note cards show it, e.g. `Oct 19, 2026`.
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    date.format("%b %-d, %Y").to_string()
}
