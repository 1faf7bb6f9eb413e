//! Error types for famcare-core
//!
//! Shared error taxonomy for reminder interpretation and store access.

use thiserror::Error;

/// Core error type
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// The stored frequency value is not one of Once/Daily/Weekly/Monthly
    #[error("invalid frequency: {0:?}")]
    InvalidFrequency(String),

    /// The stored time-of-day value does not decompose into a wall-clock time
    #[error("invalid time of day: {0}")]
    InvalidTimeOfDay(String),

    /// Day-of-week outside 0-6 (0 = Monday)
    #[error("invalid day of week: {0} (expected 0-6)")]
    InvalidDayOfWeek(u32),

    /// Day-of-month outside 1-31
    #[error("invalid day of month: {0} (expected 1-31)")]
    InvalidDayOfMonth(u32),

    /// The external record store could not be reached or failed a read
    #[error("store error: {0}")]
    Store(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
