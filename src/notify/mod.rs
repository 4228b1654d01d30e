//! Refund notifications.
//!
//! The checkout service receives a [`NotificationSender`] at construction and
//! never reads mail credentials from anywhere else. Delivery is best-effort:
//! callers log a [`NotificationError`] and carry on.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{config::MailConfig, models::Checkout};

pub mod mailer;
pub mod message;

pub use mailer::{HttpMailer, LogMailer};
pub use message::RefundEmail;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("mail transport failed: {0}")]
    Transport(String),

    #[error("mail relay rejected the message with status {0}")]
    Rejected(u16),

    #[error("mailer is misconfigured: {0}")]
    Config(String),
}

#[async_trait]
pub trait NotificationSender: Send + Sync + 'static {
    /// Deliver a refund confirmation for `checkout` to `checkout.email`.
    async fn send_refund_confirmation(&self, checkout: &Checkout) -> Result<(), NotificationError>;
}

/// Build the sender selected by configuration.
pub fn sender_from_config(config: &MailConfig) -> Result<Arc<dyn NotificationSender>, NotificationError> {
    match config {
        MailConfig::Log { from } => Ok(Arc::new(LogMailer::new(from.clone()))),
        MailConfig::Http {
            endpoint,
            api_key,
            from,
        } => Ok(Arc::new(HttpMailer::new(
            endpoint.clone(),
            api_key.clone(),
            from.clone(),
        )?)),
    }
}
