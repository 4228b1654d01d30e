//! In-memory adapter for [`CheckoutStore`].
//!
//! Holds users, products, carts and checkouts behind a single lock so that
//! creating a checkout and clearing the cart happen atomically. Useful for
//! tests and for running the service without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Checkout, CheckoutItem, CheckoutStatus, NewCheckout, ProductRef, UserRef},
    routes::params::SortOrder,
    store::{CheckoutFilter, CheckoutStore},
};

#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserRef>,
    products: HashMap<Uuid, ProductRef>,
    carts: HashMap<Uuid, Vec<CartLine>>,
    // insertion order breaks ties between equal creation times
    checkouts: Vec<Checkout>,
}

impl Tables {
    fn resolved(&self, checkout: &Checkout) -> Checkout {
        let mut checkout = checkout.clone();
        checkout.user = checkout.user_id.and_then(|id| self.users.get(&id).cloned());
        for item in &mut checkout.items {
            item.product = self.products.get(&item.product_id).cloned();
        }
        checkout
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, username: &str, email: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.write().users.insert(
            id,
            UserRef {
                id,
                username: username.to_string(),
                email: email.to_string(),
            },
        );
        id
    }

    pub fn insert_product(&self, name: &str, price: Decimal) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.write().products.insert(
            id,
            ProductRef {
                id,
                name: name.to_string(),
                price,
            },
        );
        id
    }

    pub fn remove_product(&self, id: Uuid) -> bool {
        self.tables.write().products.remove(&id).is_some()
    }

    pub fn add_to_cart(&self, user_id: Uuid, product_id: Uuid, quantity: i32) {
        self.tables
            .write()
            .carts
            .entry(user_id)
            .or_default()
            .push(CartLine {
                product_id,
                quantity,
            });
    }

    pub fn cart(&self, user_id: Uuid) -> Vec<CartLine> {
        self.tables
            .read()
            .carts
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn checkout_count(&self) -> usize {
        self.tables.read().checkouts.len()
    }
}

#[async_trait]
impl CheckoutStore for MemoryStore {
    async fn create_and_clear_cart(&self, new: NewCheckout) -> AppResult<Checkout> {
        let now = Utc::now();
        let checkout = Checkout {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            user: None,
            address: new.address,
            phone_number: new.phone_number,
            email: new.email,
            items: new
                .items
                .into_iter()
                .map(|item| CheckoutItem {
                    product_id: item.product_id,
                    product: None,
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
            total_price: new.total_price,
            status: CheckoutStatus::Pending,
            receipt: new.receipt,
            created_at: now,
            updated_at: now,
        };

        let mut tables = self.tables.write();
        if let Some(user_id) = checkout.user_id {
            tables.carts.remove(&user_id);
        }
        let resolved = tables.resolved(&checkout);
        tables.checkouts.push(checkout);
        Ok(resolved)
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Checkout>> {
        let tables = self.tables.read();
        Ok(tables
            .checkouts
            .iter()
            .find(|c| c.id == id)
            .map(|c| tables.resolved(c)))
    }

    async fn list(&self, filter: &CheckoutFilter) -> AppResult<Vec<Checkout>> {
        let tables = self.tables.read();
        let mut matches: Vec<Checkout> = tables
            .checkouts
            .iter()
            .filter(|c| filter.user_id.is_none_or(|id| c.user_id == Some(id)))
            .filter(|c| filter.status.is_none_or(|status| c.status == status))
            .map(|c| tables.resolved(c))
            .collect();

        match filter.sort_order {
            SortOrder::Asc => matches.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortOrder::Desc => {
                matches.reverse();
                matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
        }
        Ok(matches)
    }

    async fn update_status(&self, id: Uuid, status: CheckoutStatus) -> AppResult<Option<Checkout>> {
        let mut tables = self.tables.write();
        let Some(index) = tables.checkouts.iter().position(|c| c.id == id) else {
            return Ok(None);
        };

        let checkout = &mut tables.checkouts[index];
        if checkout.status != status {
            checkout.updated_at = Utc::now();
        }
        checkout.status = status;

        let checkout = tables.checkouts[index].clone();
        Ok(Some(tables.resolved(&checkout)))
    }

    async fn delete(&self, id: Uuid) -> AppResult<Option<Checkout>> {
        let mut tables = self.tables.write();
        let Some(index) = tables.checkouts.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        let removed = tables.checkouts.remove(index);
        Ok(Some(tables.resolved(&removed)))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
