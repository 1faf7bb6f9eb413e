//! Scheduler outcome and error definitions

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type for scheduler operations
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Scheduler error types
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The reminder's stored fields could not be interpreted as a schedule
    #[error("invalid reminder: {0}")]
    InvalidReminder(famcare_core::Error),

    /// The record store was unavailable
    #[error("store error: {0}")]
    Store(famcare_core::Error),
}

/// What `schedule` did with a reminder.
///
/// The non-`Scheduled` variants are ordinary outcomes, not errors: the
/// caller may want to tell the user that a one-shot reminder was already in
/// the past, without treating it as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// A job is registered and will fire at the given instant
    Scheduled {
        /// The next computed fire instant
        next_fire_at: DateTime<Utc>,
    },
    /// No future occurrence exists (one-shot in the past, or recurrence
    /// already past its end date); nothing was registered
    SkippedPast,
    /// The reminder is not active; any live job was removed
    Inactive,
}

/// Counts from a startup rehydration pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RehydrateReport {
    /// Reminders now holding a live job
    pub scheduled: usize,
    /// Reminders with nothing left to fire
    pub skipped: usize,
    /// Reminders that failed to resolve and were logged
    pub failed: usize,
}
