use checkout_service::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        cart_items::ActiveModel as CartActive,
        products::{ActiveModel as ProductActive, Column as ProdCol, Entity as Products},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(config.require_database_url()?).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let user_id = ensure_user(&orm, "ferris", "ferris@example.com").await?;
    let product_ids = seed_products(&orm).await?;
    seed_cart(&orm, user_id, &product_ids).await?;

    println!("Seed completed. User ID: {user_id}");
    Ok(())
}

async fn ensure_user(orm: &DatabaseConnection, username: &str, email: &str) -> anyhow::Result<Uuid> {
    if let Some(existing) = Users::find()
        .filter(UserCol::Username.eq(username))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;

    println!("Ensured user {username}");
    Ok(user.id)
}

async fn seed_products(orm: &DatabaseConnection) -> anyhow::Result<Vec<Uuid>> {
    let products = [
        ("Linen Shirt", Decimal::new(3999, 2)),
        ("Denim Jacket", Decimal::new(8950, 2)),
        ("Wool Scarf", Decimal::new(2500, 2)),
        ("Canvas Sneakers", Decimal::new(6499, 2)),
    ];

    let mut ids = Vec::with_capacity(products.len());
    for (name, price) in products {
        let existing = Products::find()
            .filter(ProdCol::Name.eq(name))
            .one(orm)
            .await?;
        let id = match existing {
            Some(product) => product.id,
            None => {
                ProductActive {
                    id: Set(Uuid::new_v4()),
                    name: Set(name.to_string()),
                    price: Set(price),
                    created_at: NotSet,
                }
                .insert(orm)
                .await?
                .id
            }
        };
        ids.push(id);
    }

    println!("Seeded products");
    Ok(ids)
}

async fn seed_cart(orm: &DatabaseConnection, user_id: Uuid, product_ids: &[Uuid]) -> anyhow::Result<()> {
    for (quantity, product_id) in (1..).zip(product_ids.iter().take(2)) {
        CartActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            product_id: Set(*product_id),
            quantity: Set(quantity),
            created_at: NotSet,
        }
        .insert(orm)
        .await?;
    }

    println!("Seeded cart");
    Ok(())
}
