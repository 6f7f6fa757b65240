use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

// ─── ScheduleKind ────────────────────────────────────────────────────

/// Whether a schedule fires exactly once or repeats on a fixed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleKind {
    OneShot,
    Recurring,
}

impl ScheduleKind {
    /// Canonical string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleKind::OneShot => "one_shot",
            ScheduleKind::Recurring => "recurring",
        }
    }

    /// Human-readable name for Telegram UI display.
    pub fn display_name(&self) -> &'static str {
        match self {
            ScheduleKind::OneShot => "One-shot",
            ScheduleKind::Recurring => "Recurring",
        }
    }
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "one_shot" | "oneshot" | "once" => Ok(ScheduleKind::OneShot),
            "recurring" | "repeating" => Ok(ScheduleKind::Recurring),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid schedule kind: {}. Supported: one_shot, recurring",
                s
            ))),
        }
    }
}

// ─── MediaKind ───────────────────────────────────────────────────────

/// Kind of media attached to a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MediaKind::Photo => "Photo",
            MediaKind::Video => "Video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "photo" => Ok(MediaKind::Photo),
            "video" => Ok(MediaKind::Video),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid media kind: {}. Supported: photo, video",
                s
            ))),
        }
    }
}

// ─── Interval ────────────────────────────────────────────────────────

/// Unit of a recurrence interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntervalUnit {
    Minutes,
    Hours,
    Days,
}

impl IntervalUnit {
    /// Single-letter suffix used in operator input and in the database.
    pub fn suffix(&self) -> char {
        match self {
            IntervalUnit::Minutes => 'm',
            IntervalUnit::Hours => 'h',
            IntervalUnit::Days => 'd',
        }
    }
}

/// Recurrence interval in the `<value><unit>` form operators type (e.g. `30m`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub value: u32,
    pub unit: IntervalUnit,
}

impl Interval {
    pub fn to_duration(&self) -> Duration {
        match self.unit {
            IntervalUnit::Minutes => Duration::minutes(self.value as i64),
            IntervalUnit::Hours => Duration::hours(self.value as i64),
            IntervalUnit::Days => Duration::days(self.value as i64),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

impl FromStr for Interval {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let unit = match s.chars().last().map(|c| c.to_ascii_lowercase()) {
            Some('m') => IntervalUnit::Minutes,
            Some('h') => IntervalUnit::Hours,
            Some('d') => IntervalUnit::Days,
            _ => {
                return Err(AppError::InvalidInput(format!(
                    "Invalid interval: {}. Use <number><unit>, e.g. 30m, 12h, 1d",
                    s
                )));
            }
        };

        let value = s[..s.len() - 1]
            .parse::<u32>()
            .map_err(|_| AppError::InvalidInput(format!("Invalid interval value: {}", s)))?;

        if value == 0 {
            return Err(AppError::InvalidInput("Interval must be greater than zero".to_string()));
        }

        Ok(Interval { value, unit })
    }
}
