//! Create `product` table.
//!
//! Single flat table; `deleted` is the soft-delete marker.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(pk_auto(Product::Id))
                    .col(string_len(Product::Name, 255).not_null())
                    .col(string_len(Product::Category, 255).not_null())
                    .col(
                        ColumnDef::new(Product::Price)
                            .decimal_len(10, 2)
                            .null(),
                    )
                    .col(
                        timestamp_with_time_zone(Product::Date)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(boolean(Product::Deleted).not_null().default(false))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Product { Table, Id, Name, Category, Price, Date, Deleted }
