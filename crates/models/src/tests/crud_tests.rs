use crate::product;
use anyhow::Result;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use std::str::FromStr;
use uuid::Uuid;

use super::setup_test_db;

/// Category names unique per test so assertions ignore other rows.
fn unique_name(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4())
}

/// Test product create / read / soft delete
#[tokio::test]
async fn test_product_crud() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let category = unique_name("crud");
    let created = product::create(&db, "car 1", &category, Some(Decimal::from_str("10.50")?), None).await?;
    assert_eq!(created.name, "car 1");
    assert_eq!(created.category, category);
    assert_eq!(created.price, Some(Decimal::from_str("10.50")?));
    assert!(!created.deleted);

    let found = product::Entity::find_by_id(created.id).one(&db).await?;
    assert_eq!(found.as_ref().map(|p| p.id), Some(created.id));

    let by_category = product::Entity::find()
        .filter(product::Column::Category.eq(category.clone()))
        .all(&db)
        .await?;
    assert_eq!(by_category.len(), 1);

    assert!(product::soft_delete(&db, created.id).await?);
    let after = product::Entity::find_by_id(created.id).one(&db).await?.expect("row kept");
    assert!(after.deleted);

    product::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

/// Soft delete of a missing id is not an error
#[tokio::test]
async fn test_soft_delete_missing_row() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };
    assert!(!product::soft_delete(&db, i32::MAX).await?);
    Ok(())
}

/// Null price and explicit creation date round-trip
#[tokio::test]
async fn test_product_without_price_keeps_date() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let date = chrono::DateTime::parse_from_rfc3339("2024-01-23T21:47:08.012Z")?;
    let created = product::create(&db, "Apple Mi Watch", &unique_name("nullprice"), None, Some(date)).await?;
    assert_eq!(created.price, None);
    assert_eq!(created.date, date);

    product::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

/// Validation happens before touching the database
#[tokio::test]
async fn test_invalid_product_rejected() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };
    let err = product::create(&db, " ", "cars", None, None).await;
    assert!(matches!(err, Err(crate::errors::ModelError::Validation(_))));
    Ok(())
}
