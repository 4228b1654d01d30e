use sea_orm_migration::prelude::{
    ColumnDef, DbErr, DeriveIden, DeriveMigrationName, Expr, ForeignKey, ForeignKeyAction,
    Index, MigrationTrait, SchemaManager, Table,
};

use super::m20250601_000001_create_catalog::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Checkouts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Checkouts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Checkouts::UserId).uuid().null())
                    .col(ColumnDef::new(Checkouts::Address).string().not_null())
                    .col(ColumnDef::new(Checkouts::PhoneNumber).string().not_null())
                    .col(ColumnDef::new(Checkouts::Email).string().not_null())
                    .col(ColumnDef::new(Checkouts::TotalPrice).decimal_len(12, 2).not_null())
                    .col(
                        ColumnDef::new(Checkouts::Status)
                            .string_len(16)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(Checkouts::Receipt).string().null())
                    .col(
                        ColumnDef::new(Checkouts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Checkouts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_checkouts_user")
                            .from(Checkouts::Table, Checkouts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CheckoutItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CheckoutItems::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CheckoutItems::CheckoutId).uuid().not_null())
                    .col(ColumnDef::new(CheckoutItems::Position).integer().not_null())
                    .col(ColumnDef::new(CheckoutItems::ProductId).uuid().not_null())
                    .col(ColumnDef::new(CheckoutItems::Quantity).integer().not_null())
                    .col(ColumnDef::new(CheckoutItems::Price).decimal_len(12, 2).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_checkout_items_checkout")
                            .from(CheckoutItems::Table, CheckoutItems::CheckoutId)
                            .to(Checkouts::Table, Checkouts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_checkouts_user")
                    .table(Checkouts::Table)
                    .col(Checkouts::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_checkout_items_checkout")
                    .table(CheckoutItems::Table)
                    .col(CheckoutItems::CheckoutId)
                    .col(CheckoutItems::Position)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CheckoutItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Checkouts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Checkouts {
    Table,
    Id,
    UserId,
    Address,
    PhoneNumber,
    Email,
    TotalPrice,
    Status,
    Receipt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CheckoutItems {
    Table,
    Id,
    CheckoutId,
    Position,
    ProductId,
    Quantity,
    Price,
}
