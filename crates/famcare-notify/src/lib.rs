//! Famcare Notify - Notification Dispatch
//!
//! Builds reminder notifications and hands them to the external transport,
//! one attempt per recipient:
//! - Transport: the `send(address, subject, body)` boundary trait
//! - Message: subject-facing and guardian-facing wording
//! - Dispatcher: fire-time recipient resolution and delivery
//!
//! Delivery is best-effort. A failure for one recipient is logged and never
//! blocks the other, and nothing here propagates back into the scheduling
//! loop.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod dispatcher;
pub mod error;
pub mod message;
pub mod transport;

pub use dispatcher::{DispatchContext, DispatchReport, Dispatcher};
pub use error::{Error, Result};
pub use message::ReminderMessage;
pub use transport::NotificationTransport;
