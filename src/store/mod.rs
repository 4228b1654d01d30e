//! Order store port and its adapters.
//!
//! The checkout service only talks to [`CheckoutStore`]; every read returns
//! checkouts with owner and product display fields already resolved.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Checkout, CheckoutStatus, NewCheckout},
    routes::params::SortOrder,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::SeaOrmStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckoutFilter {
    pub user_id: Option<Uuid>,
    pub status: Option<CheckoutStatus>,
    pub sort_order: SortOrder,
}

impl CheckoutFilter {
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }
}

#[async_trait]
pub trait CheckoutStore: Send + Sync + 'static {
    /// Persist a new checkout and delete the owner's cart in one unit of work.
    async fn create_and_clear_cart(&self, checkout: NewCheckout) -> AppResult<Checkout>;

    async fn find(&self, id: Uuid) -> AppResult<Option<Checkout>>;

    async fn list(&self, filter: &CheckoutFilter) -> AppResult<Vec<Checkout>>;

    /// Write `status` unconditionally. Last-modified time only moves when the
    /// value actually changes. Returns `None` when no checkout has `id`.
    async fn update_status(&self, id: Uuid, status: CheckoutStatus) -> AppResult<Option<Checkout>>;

    /// Hard delete. Returns the removed checkout, or `None` when absent.
    async fn delete(&self, id: Uuid) -> AppResult<Option<Checkout>>;

    async fn ping(&self) -> AppResult<()>;
}
