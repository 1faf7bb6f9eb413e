//! Famcare Core - Domain Model and Boundary Traits
//!
//! This crate provides the shared vocabulary of the Famcare reminder
//! engine:
//! - Model: reminder records, wall-clock times, frequencies, contacts
//! - Store: the read-side boundary to the external record store
//! - Error: the error taxonomy shared across the workspace
//!
//! The scheduling engine itself lives in `famcare-sched`; notification
//! dispatch lives in `famcare-notify`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod model;
pub mod store;

pub use error::{Error, Result};
pub use model::{ContactAddresses, Frequency, Reminder, TimeOfDay};
pub use store::ReminderStore;
