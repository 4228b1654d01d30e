use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle state of a checkout. Any status may replace any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum CheckoutStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refund,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not one of Pending, Processing, Shipped, Delivered, Cancelled, Refund")]
pub struct UnknownStatus(pub String);

impl CheckoutStatus {
    pub const ALL: [CheckoutStatus; 6] = [
        CheckoutStatus::Pending,
        CheckoutStatus::Processing,
        CheckoutStatus::Shipped,
        CheckoutStatus::Delivered,
        CheckoutStatus::Cancelled,
        CheckoutStatus::Refund,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStatus::Pending => "Pending",
            CheckoutStatus::Processing => "Processing",
            CheckoutStatus::Shipped => "Shipped",
            CheckoutStatus::Delivered => "Delivered",
            CheckoutStatus::Cancelled => "Cancelled",
            CheckoutStatus::Refund => "Refund",
        }
    }
}

impl fmt::Display for CheckoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Exact, case-sensitive match against the six names.
impl FromStr for CheckoutStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CheckoutStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Display fields of the owning user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserRef {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// Display fields of a catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductRef {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CheckoutItem {
    pub product_id: Uuid,
    /// `None` when the product no longer exists in the catalog.
    pub product: Option<ProductRef>,
    pub quantity: i32,
    /// Unit price captured when the order was placed.
    pub price: Decimal,
}

impl CheckoutItem {
    pub fn subtotal(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }

    pub fn product_name(&self) -> Option<&str> {
        self.product.as_ref().map(|p| p.name.as_str())
    }
}

/// A submitted order with owner and product references resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Checkout {
    pub id: Uuid,
    /// `None` for guest checkouts.
    pub user_id: Option<Uuid>,
    pub user: Option<UserRef>,
    pub address: String,
    pub phone_number: String,
    pub email: String,
    pub items: Vec<CheckoutItem>,
    /// Client-supplied total, fixed at creation and never recomputed from items.
    pub total_price: Decimal,
    pub status: CheckoutStatus,
    pub receipt: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Checkout {
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }

    /// Last eight characters of the id, used as a customer-facing reference.
    pub fn short_reference(&self) -> String {
        let id = self.id.simple().to_string();
        id[id.len() - 8..].to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCheckoutItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
}

/// Validated input for a new checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCheckout {
    pub user_id: Option<Uuid>,
    pub address: String,
    pub phone_number: String,
    pub email: String,
    pub items: Vec<NewCheckoutItem>,
    pub total_price: Decimal,
    pub receipt: Option<String>,
}
