//! Fire-time notification dispatch.
//!
//! Recipient addresses are resolved from the store when the reminder fires,
//! not when it is scheduled, so address edits take effect without
//! re-scheduling. Each recipient is attempted independently.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use famcare_core::ReminderStore;

use crate::error::Result;
use crate::message::{self, ReminderMessage};
use crate::transport::NotificationTransport;

/// Everything a fire needs to build and address its notifications.
///
/// Captured by the job registry entry at schedule time; an in-flight
/// dispatch owns its own clone, so replacing the entry can never change
/// what an already-fired occurrence says.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchContext {
    /// Reminder the fire belongs to
    pub reminder_id: i64,
    /// Family member whose contacts are resolved
    pub subject_id: i64,
    /// Reminder title
    pub title: String,
    /// Reminder notes
    pub notes: Option<String>,
}

/// Per-fire delivery counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Deliveries attempted (non-empty addresses found)
    pub attempted: usize,
    /// Attempts the transport reported as failed
    pub failed: usize,
}

/// Builds recipient messages for a fired reminder and hands each to the
/// transport
pub struct Dispatcher {
    store: Arc<dyn ReminderStore>,
    transport: Arc<dyn NotificationTransport>,
}

impl Dispatcher {
    /// Create a dispatcher over the given store and transport
    pub fn new(store: Arc<dyn ReminderStore>, transport: Arc<dyn NotificationTransport>) -> Self {
        Self { store, transport }
    }

    /// Notify every recorded recipient for a fired reminder.
    ///
    /// Store unavailability is returned to the caller; everything else
    /// degrades to a logged, counted failure for that one recipient.
    pub async fn dispatch(&self, ctx: &DispatchContext) -> Result<DispatchReport> {
        let Some(contacts) = self.store.contacts(ctx.subject_id).await? else {
            warn!(
                reminder_id = ctx.reminder_id,
                subject_id = ctx.subject_id,
                "no contact record for subject, skipping dispatch"
            );
            return Ok(DispatchReport::default());
        };

        let mut report = DispatchReport::default();

        if let Some(address) = non_empty(contacts.subject_email) {
            let msg = message::for_subject(&ctx.title, ctx.notes.as_deref());
            self.attempt(&address, &msg, ctx, &mut report).await;
        } else {
            debug!(reminder_id = ctx.reminder_id, "subject has no address");
        }

        if let Some(address) = non_empty(contacts.guardian_email) {
            let msg = message::for_guardian(&ctx.title, ctx.notes.as_deref());
            self.attempt(&address, &msg, ctx, &mut report).await;
        } else {
            debug!(reminder_id = ctx.reminder_id, "guardian has no address");
        }

        Ok(report)
    }

    async fn attempt(
        &self,
        address: &str,
        msg: &ReminderMessage,
        ctx: &DispatchContext,
        report: &mut DispatchReport,
    ) {
        report.attempted += 1;
        match self.transport.send(address, &msg.subject, &msg.body).await {
            Ok(()) => {
                info!(reminder_id = ctx.reminder_id, address, "notification sent");
            }
            Err(e) => {
                report.failed += 1;
                warn!(
                    reminder_id = ctx.reminder_id,
                    address,
                    error = %e,
                    "notification delivery failed"
                );
            }
        }
    }
}

fn non_empty(address: Option<String>) -> Option<String> {
    address.filter(|a| !a.trim().is_empty())
}
