use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;

use crate::{
    models::Checkout,
    notify::{NotificationError, NotificationSender, RefundEmail},
};

/// Renders the confirmation and writes it to the log. Default transport for
/// local development.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl NotificationSender for LogMailer {
    async fn send_refund_confirmation(&self, checkout: &Checkout) -> Result<(), NotificationError> {
        let email = RefundEmail::for_checkout(checkout, Utc::now());
        tracing::info!(
            from = %self.from,
            to = %email.to,
            subject = %email.subject,
            checkout_id = %checkout.id,
            "refund confirmation rendered"
        );
        tracing::debug!(body = %email.text, "refund confirmation body");
        Ok(())
    }
}

/// Delivers through an HTTP mail relay: `POST {endpoint}` with a bearer key
/// and a JSON body of `from`, `to`, `subject`, `text`, `html`.
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    #[serde(flatten)]
    email: &'a RefundEmail,
}

impl HttpMailer {
    pub fn new(endpoint: String, api_key: String, from: String) -> Result<Self, NotificationError> {
        if endpoint.is_empty() || api_key.is_empty() || from.is_empty() {
            return Err(NotificationError::Config(
                "endpoint, api key and sender address must be non-empty".into(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NotificationError::Config(e.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            from,
        })
    }
}

#[async_trait]
impl NotificationSender for HttpMailer {
    async fn send_refund_confirmation(&self, checkout: &Checkout) -> Result<(), NotificationError> {
        let email = RefundEmail::for_checkout(checkout, Utc::now());
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&RelayMessage {
                from: &self.from,
                email: &email,
            })
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::Rejected(status.as_u16()));
        }

        tracing::info!(to = %email.to, checkout_id = %checkout.id, "refund confirmation sent");
        Ok(())
    }
}
