use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        checkout_items::{
            ActiveModel as CheckoutItemActive, Column as CheckoutItemCol, Entity as CheckoutItems,
            Model as CheckoutItemModel,
        },
        checkouts::{
            ActiveModel as CheckoutActive, Column as CheckoutCol, Entity as Checkouts,
            Model as CheckoutModel,
        },
        products::{Column as ProdCol, Entity as Products},
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    models::{Checkout, CheckoutItem, CheckoutStatus, NewCheckout, ProductRef, UserRef},
    routes::params::SortOrder,
    store::{CheckoutFilter, CheckoutStore},
};

/// PostgreSQL-backed store using SeaORM.
#[derive(Clone)]
pub struct SeaOrmStore {
    orm: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.orm
    }
}

#[async_trait]
impl CheckoutStore for SeaOrmStore {
    async fn create_and_clear_cart(&self, new: NewCheckout) -> AppResult<Checkout> {
        let txn = self.orm.begin().await?;

        let checkout = CheckoutActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(new.user_id),
            address: Set(new.address),
            phone_number: Set(new.phone_number),
            email: Set(new.email),
            total_price: Set(new.total_price),
            status: Set(CheckoutStatus::Pending.as_str().to_string()),
            receipt: Set(new.receipt),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&txn)
        .await?;

        for (position, item) in new.items.into_iter().enumerate() {
            CheckoutItemActive {
                id: Set(Uuid::new_v4()),
                checkout_id: Set(checkout.id),
                position: Set(position as i32),
                product_id: Set(item.product_id),
                quantity: Set(item.quantity),
                price: Set(item.price),
            }
            .insert(&txn)
            .await?;
        }

        // clear cart; a user without cart rows is not an error
        if let Some(user_id) = checkout.user_id {
            let cleared = CartItems::delete_many()
                .filter(CartCol::UserId.eq(user_id))
                .exec(&txn)
                .await?;
            tracing::debug!(%user_id, rows = cleared.rows_affected, "cart cleared");
        }

        let mut resolved = resolve(&txn, vec![checkout]).await?;
        txn.commit().await?;

        resolved
            .pop()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("inserted checkout not readable")))
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Checkout>> {
        let model = Checkouts::find_by_id(id).one(&self.orm).await?;
        match model {
            Some(model) => Ok(resolve(&self.orm, vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list(&self, filter: &CheckoutFilter) -> AppResult<Vec<Checkout>> {
        let mut condition = Condition::all();
        if let Some(user_id) = filter.user_id {
            condition = condition.add(CheckoutCol::UserId.eq(user_id));
        }
        if let Some(status) = filter.status {
            condition = condition.add(CheckoutCol::Status.eq(status.as_str()));
        }

        let mut finder = Checkouts::find().filter(condition);
        finder = match filter.sort_order {
            SortOrder::Asc => finder.order_by_asc(CheckoutCol::CreatedAt),
            SortOrder::Desc => finder.order_by_desc(CheckoutCol::CreatedAt),
        };

        let models = finder.all(&self.orm).await?;
        Ok(resolve(&self.orm, models).await?)
    }

    async fn update_status(&self, id: Uuid, status: CheckoutStatus) -> AppResult<Option<Checkout>> {
        let existing = match Checkouts::find_by_id(id).one(&self.orm).await? {
            Some(model) => model,
            None => return Ok(None),
        };

        let changed = existing.status != status.as_str();
        let mut active: CheckoutActive = existing.into();
        active.status = Set(status.as_str().to_string());
        if changed {
            active.updated_at = Set(Utc::now().into());
        }
        let updated = match active.update(&self.orm).await {
            Ok(model) => model,
            // deleted between the read and the write
            Err(DbErr::RecordNotUpdated) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        Ok(resolve(&self.orm, vec![updated]).await?.pop())
    }

    async fn delete(&self, id: Uuid) -> AppResult<Option<Checkout>> {
        let txn = self.orm.begin().await?;

        let model = match Checkouts::find_by_id(id).one(&txn).await? {
            Some(model) => model,
            None => return Ok(None),
        };
        let removed = resolve(&txn, vec![model]).await?.pop();

        CheckoutItems::delete_many()
            .filter(CheckoutItemCol::CheckoutId.eq(id))
            .exec(&txn)
            .await?;
        let result = Checkouts::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Ok(None);
        }

        txn.commit().await?;
        Ok(removed)
    }

    async fn ping(&self) -> AppResult<()> {
        self.orm.ping().await?;
        Ok(())
    }
}

/// Load items, owners and products for `models` in three batched queries,
/// keeping the order of `models`.
async fn resolve<C: ConnectionTrait>(
    conn: &C,
    models: Vec<CheckoutModel>,
) -> Result<Vec<Checkout>, DbErr> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let checkout_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let rows = CheckoutItems::find()
        .filter(CheckoutItemCol::CheckoutId.is_in(checkout_ids))
        .order_by_asc(CheckoutItemCol::CheckoutId)
        .order_by_asc(CheckoutItemCol::Position)
        .all(conn)
        .await?;

    let user_ids: HashSet<Uuid> = models.iter().filter_map(|m| m.user_id).collect();
    let users: HashMap<Uuid, UserRef> = if user_ids.is_empty() {
        HashMap::new()
    } else {
        Users::find()
            .filter(UserCol::Id.is_in(user_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|u| {
                (
                    u.id,
                    UserRef {
                        id: u.id,
                        username: u.username,
                        email: u.email,
                    },
                )
            })
            .collect()
    };

    let product_ids: HashSet<Uuid> = rows.iter().map(|r| r.product_id).collect();
    let products: HashMap<Uuid, ProductRef> = if product_ids.is_empty() {
        HashMap::new()
    } else {
        Products::find()
            .filter(ProdCol::Id.is_in(product_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|p| {
                (
                    p.id,
                    ProductRef {
                        id: p.id,
                        name: p.name,
                        price: p.price,
                    },
                )
            })
            .collect()
    };

    let mut items_by_checkout: HashMap<Uuid, Vec<CheckoutItemModel>> = HashMap::new();
    for row in rows {
        items_by_checkout.entry(row.checkout_id).or_default().push(row);
    }

    models
        .into_iter()
        .map(|model| {
            let items = items_by_checkout
                .remove(&model.id)
                .unwrap_or_default()
                .into_iter()
                .map(|row| CheckoutItem {
                    product_id: row.product_id,
                    product: products.get(&row.product_id).cloned(),
                    quantity: row.quantity,
                    price: row.price,
                })
                .collect();
            let user = model.user_id.and_then(|id| users.get(&id).cloned());
            checkout_from_entity(model, user, items)
        })
        .collect()
}

fn checkout_from_entity(
    model: CheckoutModel,
    user: Option<UserRef>,
    items: Vec<CheckoutItem>,
) -> Result<Checkout, DbErr> {
    let status = model
        .status
        .parse::<CheckoutStatus>()
        .map_err(|e| DbErr::Type(format!("checkout {}: {e}", model.id)))?;
    Ok(Checkout {
        id: model.id,
        user_id: model.user_id,
        user,
        address: model.address,
        phone_number: model.phone_number,
        email: model.email,
        items,
        total_price: model.total_price,
        status,
        receipt: model.receipt,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}
