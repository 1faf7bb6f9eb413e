//! Recurrence interpretation.
//!
//! Pure functions from a reminder's stored calendar fields to concrete fire
//! instants. No state, no I/O; the engine calls `next_after` both when a
//! reminder is first scheduled and each time a recurring job re-arms.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};

use famcare_core::{Error, Frequency, Reminder, Result, TimeOfDay};

/// The shape of a reminder's repetition, with calendar defaults applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    /// Single fire on the start date
    Once,
    /// Every day
    Daily,
    /// Every week on the given weekday
    Weekly {
        /// Resolved fire weekday (explicit or from the start date)
        weekday: Weekday,
    },
    /// Every month on the given day; months without it are skipped
    Monthly {
        /// Resolved fire day (explicit or from the start date)
        day: u32,
    },
}

/// A fully resolved schedule: recurrence plus validity bounds and fire time.
///
/// Resolution happens once, at schedule time. In particular a weekly
/// reminder without an explicit day keeps the weekday of the start date it
/// was resolved against; later reinterpretation cannot make it drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireSchedule {
    recurrence: Recurrence,
    start_date: NaiveDate,
    until: Option<NaiveDate>,
    time: TimeOfDay,
}

impl FireSchedule {
    /// Interpret a reminder's stored fields.
    ///
    /// Fails when the frequency text is unknown or a calendar field is out
    /// of range; the reminder must not be scheduled in that case.
    pub fn resolve(reminder: &Reminder) -> Result<Self> {
        let recurrence = match Frequency::parse(&reminder.frequency)? {
            Frequency::Once => Recurrence::Once,
            Frequency::Daily => Recurrence::Daily,
            Frequency::Weekly => Recurrence::Weekly {
                weekday: match reminder.day_of_week {
                    Some(n) => weekday_from_index(n)?,
                    None => reminder.start_date.weekday(),
                },
            },
            Frequency::Monthly => Recurrence::Monthly {
                day: match reminder.day_of_month {
                    Some(d) if (1..=31).contains(&d) => d,
                    Some(d) => return Err(Error::InvalidDayOfMonth(d)),
                    None => reminder.start_date.day(),
                },
            },
        };

        Ok(Self {
            recurrence,
            start_date: reminder.start_date,
            until: reminder.end_date,
            time: reminder.time_of_day,
        })
    }

    /// The resolved recurrence shape
    pub fn recurrence(&self) -> Recurrence {
        self.recurrence
    }

    /// Earliest fire instant strictly after `after`, or `None` when the
    /// schedule is exhausted.
    ///
    /// Occurrences never fall before the start date nor after the end
    /// date's end of day.
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.recurrence {
            Recurrence::Once => {
                if self.instant_on(self.start_date) <= after {
                    return None;
                }
                self.bounded(self.start_date)
            }
            Recurrence::Daily => {
                let date = self.first_candidate_date(after)?;
                self.bounded(date)
            }
            Recurrence::Weekly { weekday } => {
                let date = self.first_candidate_date(after)?;
                let ahead = (7 + weekday.num_days_from_monday() as i64
                    - date.weekday().num_days_from_monday() as i64)
                    % 7;
                self.bounded(date + Duration::days(ahead))
            }
            Recurrence::Monthly { day } => {
                let earliest = self.first_candidate_date(after)?;
                let mut year = earliest.year();
                let mut month = earliest.month();
                // a valid day-of-month recurs within at most a few months;
                // the bound only guards against until-date exhaustion
                for _ in 0..48 {
                    if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                        if date >= earliest {
                            return self.bounded(date);
                        }
                    }
                    (year, month) = if month == 12 {
                        (year + 1, 1)
                    } else {
                        (year, month + 1)
                    };
                }
                None
            }
        }
    }

    /// Earliest date whose fire instant can be strictly after `after`,
    /// clamped to the start date
    fn first_candidate_date(&self, after: DateTime<Utc>) -> Option<NaiveDate> {
        let mut date = after.date_naive().max(self.start_date);
        if self.instant_on(date) <= after {
            date = date.succ_opt()?;
        }
        Some(date)
    }

    fn instant_on(&self, date: NaiveDate) -> DateTime<Utc> {
        date.and_time(self.time.as_naive()).and_utc()
    }

    fn bounded(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        match self.until {
            Some(until) if date > until => None,
            _ => Some(self.instant_on(date)),
        }
    }
}

fn weekday_from_index(n: u32) -> Result<Weekday> {
    match n {
        0 => Ok(Weekday::Mon),
        1 => Ok(Weekday::Tue),
        2 => Ok(Weekday::Wed),
        3 => Ok(Weekday::Thu),
        4 => Ok(Weekday::Fri),
        5 => Ok(Weekday::Sat),
        6 => Ok(Weekday::Sun),
        _ => Err(Error::InvalidDayOfWeek(n)),
    }
}
