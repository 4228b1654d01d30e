use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Checkout;

/// Body of `POST /checkout`. Required fields are optional here so that a
/// missing value surfaces as a validation error rather than a body rejection.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateCheckoutRequest {
    /// Owner; omitted for guest checkouts.
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone_number: String,
    pub email: Option<String>,
    pub items: Option<ItemsPayload>,
    pub total_price: Option<Decimal>,
    /// Stored name of an uploaded receipt file.
    pub receipt: Option<String>,
}

/// Items as sent by the storefront: either a JSON-encoded string (form
/// submissions) or a plain JSON array.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ItemsPayload {
    Encoded(String),
    List(Vec<Value>),
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CheckoutItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
    /// Unit price at order time; a number or a decimal string.
    pub price: Decimal,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// One of the six status names. Any other JSON value is kept as text and
    /// rejected as an invalid status.
    #[serde(default, deserialize_with = "status_text")]
    pub status: String,
}

fn status_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(status) => status,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutList {
    pub items: Vec<Checkout>,
}
