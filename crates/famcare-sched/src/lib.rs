//! Famcare Sched - Reminder Scheduling Engine
//!
//! Turns persisted reminder records into timed notification dispatches:
//!
//! - **Recurrence**: pure interpretation of a reminder's frequency and
//!   calendar fields into successive fire instants
//! - **Registry**: the process-wide table of live jobs, one per reminder id
//! - **Engine**: the shared timing loop, schedule/cancel operations, and
//!   startup rehydration
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐
//! │ ReminderScheduler │  schedule / cancel / rehydrate + timing loop
//! └─────────┬─────────┘
//!           │
//!           ▼
//! ┌───────────────────┐
//! │   JobRegistry     │  id → (FireSchedule, next_fire_at, context)
//! └─────────┬─────────┘
//!           │
//!           ▼
//! ┌───────────────────┐
//! │   FireSchedule    │  next-occurrence computation
//! └─────────┬─────────┘
//!           │ fire
//!           ▼
//! ┌───────────────────┐
//! │   Dispatcher      │  famcare-notify, off the timing loop
//! └───────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use famcare_sched::{ReminderScheduler, SchedulerConfig};
//!
//! let dispatcher = Arc::new(Dispatcher::new(store.clone(), transport));
//! let scheduler = Arc::new(ReminderScheduler::new(
//!     store,
//!     dispatcher,
//!     SchedulerConfig::new().with_check_interval(30),
//! ));
//!
//! // Rebuild schedule state, then start the loop
//! let report = scheduler.rehydrate().await?;
//! let handle = scheduler.clone().start();
//!
//! // ... API layer calls scheduler.schedule(&reminder) / scheduler.cancel(id)
//!
//! handle.stop().await;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod recurrence;
mod registry;
mod types;

pub use engine::{ReminderScheduler, SchedulerConfig, SchedulerHandle};
pub use recurrence::{FireSchedule, Recurrence};
pub use registry::{JobEntry, JobRegistry};
pub use types::{RehydrateReport, Result, ScheduleOutcome, SchedulerError};
