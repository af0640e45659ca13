use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Listing filter
        manager
            .create_index(
                Index::create()
                    .name("idx_product_category")
                    .table(Product::Table)
                    .col(Product::Category)
                    .to_owned(),
            )
            .await?;

        // Date-range filters and reports
        manager
            .create_index(
                Index::create()
                    .name("idx_product_date")
                    .table(Product::Table)
                    .col(Product::Date)
                    .to_owned(),
            )
            .await?;

        // Soft-delete predicate is on nearly every query
        manager
            .create_index(
                Index::create()
                    .name("idx_product_deleted")
                    .table(Product::Table)
                    .col(Product::Deleted)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in ["idx_product_deleted", "idx_product_date", "idx_product_category"] {
            manager
                .drop_index(Index::drop().name(name).table(Product::Table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Product { Table, Category, Date, Deleted }
