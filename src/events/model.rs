use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// How long after its start an event still counts as happening.
pub const OUTDATED_GRACE_HOURS: i64 = 6;

/// Wall-clock zone for timestamps that come without an offset.
const LOCAL_TIMEZONE: Tz = chrono_tz::Europe::Paris;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub category: String,
    /// Display date, e.g. "Friday 6 June"
    pub date: String,
    /// Machine-readable start, used for ordering and expiry
    pub iso_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    pub location: String,
    pub description: String,
    pub vibe: String,
    /// Central, well documented and beginner friendly (a "Safe Bet").
    pub is_accessible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_reason: Option<String>,
}

impl Event {
    /// `None` when the model gave something that isn't a timestamp.
    /// Date-times without an offset are Paris wall-clock time, bare dates are
    /// UTC midnight.
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        parse_iso_date(&self.iso_date)
    }

    /// Started more than [`OUTDATED_GRACE_HOURS`] ago. Unreadable dates are
    /// never outdated.
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.starts_at()
            .is_some_and(|start| start < now - TimeDelta::hours(OUTDATED_GRACE_HOURS))
    }

    pub fn schedule_label(&self) -> Option<String> {
        self.start_time.as_ref().map(|start| match &self.end_time {
            Some(end) => format!("{start} - {end}"),
            None => start.to_string(),
        })
    }
}

fn parse_iso_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
        return Some(date_time.with_timezone(&Utc));
    }

    let local = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok());

    if let Some(naive) = local {
        // Times skipped by the spring DST change land an hour later
        return LOCAL_TIMEZONE
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| {
                LOCAL_TIMEZONE
                    .from_local_datetime(&(naive + TimeDelta::hours(1)))
                    .earliest()
            })
            .map(|date_time| date_time.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Fixed filter taxonomy. Event categories come from a generative source, so
/// matching is a loose case-insensitive substring test.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::IntoStaticStr,
    strum::EnumIter,
    strum::EnumString,
    strum::Display,
)]
pub enum Category {
    #[default]
    All,
    Party,
    Culture,
    Workshop,
    Social,
    Clubbing,
    Outdoor,
}

impl Category {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Category::All => true,
            selected => {
                let selected: &'static str = selected.into();
                category.to_lowercase().contains(&selected.to_lowercase())
            }
        }
    }
}
