//! Notification transport boundary.
//!
//! The hosting process supplies the real implementation (an SMTP mailer in
//! the reference deployment). The engine treats every send as best-effort
//! and expects the transport to enforce its own timeout.

use async_trait::async_trait;

use crate::error::Result;

/// Outbound message delivery
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    /// Deliver one message to one address
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}
