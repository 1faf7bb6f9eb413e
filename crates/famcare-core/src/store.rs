//! Read-side boundary to the external record store.
//!
//! The scheduling engine never writes; creation and editing of reminders
//! happens in the API layer, which then calls back into the engine. All
//! errors from implementations mean the store itself was unavailable —
//! "row not found" is `Ok(None)`, a distinct signal.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{ContactAddresses, Reminder};

/// Reminder read access, implemented by the hosting process
#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Fetch every reminder flagged active, for startup rehydration
    async fn active_reminders(&self) -> Result<Vec<Reminder>>;

    /// Fetch one reminder by id
    async fn reminder(&self, id: i64) -> Result<Option<Reminder>>;

    /// Fetch the contact addresses for a reminder's subject
    async fn contacts(&self, subject_id: i64) -> Result<Option<ContactAddresses>>;
}
