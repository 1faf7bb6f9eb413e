//! Error types for famcare-notify

use thiserror::Error;

/// Notification error type
#[derive(Debug, Error)]
pub enum Error {
    /// The transport rejected or failed a single delivery
    #[error("delivery to {address} failed: {message}")]
    Delivery {
        /// Recipient address
        address: String,
        /// Transport-reported reason
        message: String,
    },

    /// Contact lookup failed because the store was unavailable
    #[error("store error: {0}")]
    Store(#[from] famcare_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
