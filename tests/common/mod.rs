#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use checkout_service::{
    dto::checkout::{CreateCheckoutRequest, ItemsPayload},
    models::Checkout,
    notify::{NotificationError, NotificationSender},
    state::AppState,
    store::MemoryStore,
};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

/// Records every refund confirmation request; optionally fails each one.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<Checkout>>,
    fail: bool,
}

impl RecordingSender {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<Checkout> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send_refund_confirmation(&self, checkout: &Checkout) -> Result<(), NotificationError> {
        self.sent.lock().push(checkout.clone());
        if self.fail {
            return Err(NotificationError::Transport("connection refused".into()));
        }
        Ok(())
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub sender: Arc<RecordingSender>,
    pub state: AppState,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_sender(RecordingSender::default())
    }

    pub fn with_failing_sender() -> Self {
        Self::with_sender(RecordingSender::failing())
    }

    fn with_sender(sender: RecordingSender) -> Self {
        let store = Arc::new(MemoryStore::new());
        let sender = Arc::new(sender);
        let state = AppState::new(store.clone(), sender.clone());
        Self {
            store,
            sender,
            state,
        }
    }
}

pub fn checkout_request(
    user_id: Option<Uuid>,
    items: serde_json::Value,
    total: Decimal,
) -> CreateCheckoutRequest {
    CreateCheckoutRequest {
        user_id,
        address: "12 Harbour Road".into(),
        phone_number: "+1 555 0100".into(),
        email: Some("buyer@example.com".into()),
        items: Some(ItemsPayload::Encoded(items.to_string())),
        total_price: Some(total),
        receipt: None,
    }
}

pub fn item(product_id: Uuid, quantity: i32, price: &str) -> serde_json::Value {
    json!({ "product_id": product_id, "quantity": quantity, "price": price })
}
