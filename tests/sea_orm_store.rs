use chrono::Utc;
use checkout_service::{
    entity::checkouts,
    models::CheckoutStatus,
    store::{CheckoutStore, SeaOrmStore},
};
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};
use uuid::Uuid;

fn stored_checkout(id: Uuid) -> checkouts::Model {
    let now = Utc::now().fixed_offset();
    checkouts::Model {
        id,
        user_id: None,
        address: "9 Dock Rd".into(),
        phone_number: "555-0199".into(),
        email: "guest@example.com".into(),
        total_price: dec!(12.50),
        status: "Pending".into(),
        receipt: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn status_update_of_concurrently_deleted_row_is_not_found() {
    let id = Uuid::new_v4();
    // the lookup sees the row, the UPDATE ... RETURNING no longer does
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![stored_checkout(id)]])
        .append_query_results([Vec::<checkouts::Model>::new()])
        .into_connection();
    let store = SeaOrmStore::new(orm);

    let updated = store
        .update_status(id, CheckoutStatus::Shipped)
        .await
        .expect("missing row is not a store failure");

    assert!(updated.is_none());
}

#[tokio::test]
async fn unknown_stored_status_is_a_store_error() {
    let id = Uuid::new_v4();
    let mut row = stored_checkout(id);
    row.status = "pending".into();
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row]])
        .append_query_results([Vec::<checkout_service::entity::checkout_items::Model>::new()])
        .into_connection();
    let store = SeaOrmStore::new(orm);

    let err = store.find(id).await.expect_err("corrupt status");
    assert_eq!(err.kind(), "persistence_error");
}
