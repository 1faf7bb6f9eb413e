//! Reminder domain model
//!
//! The record store hands back loosely-typed values (duration-like or
//! string times, free-form frequency text). Everything is normalized here,
//! at the read boundary, so the scheduler only ever sees canonical types.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Canonical wall-clock time at which a reminder fires on a scheduled day.
///
/// Constructed fallibly from any of the representations the store is known
/// to return: hour/minute/second components, an elapsed-seconds count
/// (duration columns), or an `HH:MM[:SS]` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Build from hour/minute/second components
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Result<Self> {
        NaiveTime::from_hms_opt(hour, minute, second)
            .map(Self)
            .ok_or_else(|| Error::InvalidTimeOfDay(format!("{hour:02}:{minute:02}:{second:02}")))
    }

    /// Build from a seconds-since-midnight count (duration-typed columns)
    pub fn from_total_seconds(total: i64) -> Result<Self> {
        if !(0..86_400).contains(&total) {
            return Err(Error::InvalidTimeOfDay(format!("{total} seconds")));
        }
        NaiveTime::from_num_seconds_from_midnight_opt(total as u32, 0)
            .map(Self)
            .ok_or_else(|| Error::InvalidTimeOfDay(format!("{total} seconds")))
    }

    /// Hour component (0-23)
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Minute component (0-59)
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Second component (0-59)
    pub fn second(&self) -> u32 {
        self.0.second()
    }

    /// The underlying naive time, for date arithmetic
    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .map(Self)
            .map_err(|_| Error::InvalidTimeOfDay(s.to_string()))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S"))
    }
}

/// How often a reminder fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Single fire at `start_date` + `time_of_day`
    Once,
    /// Every day at `time_of_day`
    Daily,
    /// Every week on `day_of_week` at `time_of_day`
    Weekly,
    /// Every month on `day_of_month` at `time_of_day`
    Monthly,
}

impl Frequency {
    /// Parse a stored frequency value, case-insensitively
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "once" => Ok(Self::Once),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(Error::InvalidFrequency(s.to_string())),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Once => write!(f, "Once"),
            Self::Daily => write!(f, "Daily"),
            Self::Weekly => write!(f, "Weekly"),
            Self::Monthly => write!(f, "Monthly"),
        }
    }
}

/// A persisted reminder record, as read from the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    /// Stable row id; the scheduling key
    pub id: i64,
    /// Family member the reminder concerns
    pub subject_id: i64,
    /// Short description shown in notifications
    pub title: String,
    /// Record category (Medication, Appointment, Check-in); not interpreted
    pub kind: Option<String>,
    /// Dosage text for medication reminders; not interpreted
    pub dosage: Option<String>,
    /// Free-form notes, included in notification bodies
    pub notes: Option<String>,
    /// First day the reminder is valid
    pub start_date: NaiveDate,
    /// Last day the reminder is valid (inclusive); absent means unbounded
    pub end_date: Option<NaiveDate>,
    /// Wall-clock fire time on any scheduled day
    pub time_of_day: TimeOfDay,
    /// Stored frequency value; parsed case-insensitively at schedule time
    pub frequency: String,
    /// Weekly only: 0-6, 0 = Monday; defaults to `start_date`'s weekday
    pub day_of_week: Option<u32>,
    /// Monthly only: 1-31; defaults to `start_date`'s day
    pub day_of_month: Option<u32>,
    /// Only active reminders are eligible for scheduling
    pub is_active: bool,
    /// Row creation time
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    /// Create a new reminder with the required fields
    pub fn new(
        id: i64,
        subject_id: i64,
        title: impl Into<String>,
        start_date: NaiveDate,
        time_of_day: TimeOfDay,
        frequency: impl Into<String>,
    ) -> Self {
        Self {
            id,
            subject_id,
            title: title.into(),
            kind: None,
            dosage: None,
            notes: None,
            start_date,
            end_date: None,
            time_of_day,
            frequency: frequency.into(),
            day_of_week: None,
            day_of_month: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Set the notes text
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Set the record category
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set the dosage text
    pub fn with_dosage(mut self, dosage: impl Into<String>) -> Self {
        self.dosage = Some(dosage.into());
        self
    }

    /// Set the end date (inclusive)
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Set the weekly fire day (0-6, 0 = Monday)
    pub fn with_day_of_week(mut self, day_of_week: u32) -> Self {
        self.day_of_week = Some(day_of_week);
        self
    }

    /// Set the monthly fire day (1-31)
    pub fn with_day_of_month(mut self, day_of_month: u32) -> Self {
        self.day_of_month = Some(day_of_month);
        self
    }

    /// Set the active flag
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

/// Contact addresses resolved for a reminder's subject.
///
/// Both fields may be empty; that is an ordinary state, distinct from the
/// subject not existing at all (`Ok(None)` from the store).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactAddresses {
    /// The family member's own email, if recorded
    pub subject_email: Option<String>,
    /// The account holder's email (secondary observer recipient)
    pub guardian_email: Option<String>,
}
