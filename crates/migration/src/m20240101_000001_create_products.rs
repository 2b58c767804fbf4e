//! Create `products` table.
//! Single catalog entity; identifier is assigned by the store.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_auto(Products::Id))
                    .col(string(Products::Title).not_null())
                    .col(string(Products::Name).not_null())
                    .col(double(Products::Price).not_null())
                    .col(string(Products::Link).not_null())
                    .col(string_null(Products::Year))
                    .col(string_null(Products::GamaDeProduse))
                    .col(string_null(Products::Volume))
                    .col(timestamp_with_time_zone(Products::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Products::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Products::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Title,
    Name,
    Price,
    Link,
    Year,
    GamaDeProduse,
    Volume,
    CreatedAt,
    UpdatedAt,
}
