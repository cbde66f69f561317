//! Commit date formatting.
//!
//! Dates are always rendered in the signature's own UTC offset, except for
//! [`DateFormat::Local`] which converts to the machine's zone.

use crate::core::error::{LogViewError, Result};
use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// "Tue Nov 14 22:13:20 2023 +0000"
    #[default]
    Default,
    /// "3 days ago"
    Relative,
    /// Default layout in the local time zone, without the offset
    Local,
    /// "2023-11-14 22:13:20 +0000"
    Iso,
    /// "Tue, 14 Nov 2023 22:13:20 +0000"
    Rfc,
    /// "2023-11-14"
    Short,
    /// "1700000000 +0000"
    Raw,
}

impl DateFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFormat::Default => "default",
            DateFormat::Relative => "relative",
            DateFormat::Local => "local",
            DateFormat::Iso => "iso",
            DateFormat::Rfc => "rfc",
            DateFormat::Short => "short",
            DateFormat::Raw => "raw",
        }
    }

    /// Format a signature time. `now` is only consulted by [`DateFormat::Relative`].
    pub fn format(&self, time: git2::Time, now: i64) -> String {
        match self {
            DateFormat::Raw => {
                let offset = time.offset_minutes();
                let sign = if offset < 0 { '-' } else { '+' };
                let abs = offset.unsigned_abs();
                format!("{} {}{:02}{:02}", time.seconds(), sign, abs / 60, abs % 60)
            }
            DateFormat::Relative => format_relative(time.seconds(), now),
            DateFormat::Local => {
                let local = utc(time.seconds()).with_timezone(&Local);
                local.format("%a %b %-d %H:%M:%S %Y").to_string()
            }
            _ => {
                let dt = utc(time.seconds()).with_timezone(&offset_of(time));
                let layout = match self {
                    DateFormat::Iso => "%Y-%m-%d %H:%M:%S %z",
                    DateFormat::Rfc => "%a, %-d %b %Y %H:%M:%S %z",
                    DateFormat::Short => "%Y-%m-%d",
                    _ => "%a %b %-d %H:%M:%S %Y %z",
                };
                dt.format(layout).to_string()
            }
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateFormat {
    type Err = LogViewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(DateFormat::Default),
            "relative" => Ok(DateFormat::Relative),
            "local" => Ok(DateFormat::Local),
            "iso" | "iso8601" => Ok(DateFormat::Iso),
            "rfc" | "rfc2822" => Ok(DateFormat::Rfc),
            "short" => Ok(DateFormat::Short),
            "raw" => Ok(DateFormat::Raw),
            _ => Err(LogViewError::invalid_date_format(s)),
        }
    }
}

fn utc(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

fn offset_of(time: git2::Time) -> FixedOffset {
    FixedOffset::east_opt(time.offset_minutes() * 60).unwrap_or_else(|| Utc.fix())
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

fn format_relative(seconds: i64, now: i64) -> String {
    let diff = now - seconds;
    if diff < 0 {
        return "in the future".to_string();
    }
    if diff < 90 {
        return format!("{} ago", plural(diff, "second"));
    }
    let minutes = (diff + 30) / 60;
    if minutes < 90 {
        return format!("{} ago", plural(minutes, "minute"));
    }
    let hours = (minutes + 30) / 60;
    if hours < 36 {
        return format!("{} ago", plural(hours, "hour"));
    }
    let days = (hours + 12) / 24;
    if days < 14 {
        return format!("{} ago", plural(days, "day"));
    }
    if days < 70 {
        return format!("{} ago", plural((days + 3) / 7, "week"));
    }
    if days < 365 {
        return format!("{} ago", plural((days + 15) / 30, "month"));
    }
    if days < 1825 {
        let total_months = (days * 12 * 2 + 365) / (365 * 2);
        let years = total_months / 12;
        let months = total_months % 12;
        if months > 0 {
            return format!(
                "{}, {} ago",
                plural(years, "year"),
                plural(months, "month")
            );
        }
        return format!("{} ago", plural(years, "year"));
    }
    format!("{} ago", plural((days + 183) / 365, "year"))
}
