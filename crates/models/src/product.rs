use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue::NotSet, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::errors;

pub const NAME_MAX_LEN: usize = 255;
pub const CATEGORY_MAX_LEN: usize = 255;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub category: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub price: Option<Decimal>,
    pub date: DateTimeWithTimeZone,
    pub deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("name longer than {NAME_MAX_LEN} characters")));
    }
    Ok(())
}

pub fn validate_category(category: &str) -> Result<(), errors::ModelError> {
    if category.trim().is_empty() {
        return Err(errors::ModelError::Validation("category required".into()));
    }
    if category.chars().count() > CATEGORY_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("category longer than {CATEGORY_MAX_LEN} characters")));
    }
    Ok(())
}

/// Prices are stored as `decimal(10, 2)`; more precision is rounded away.
pub fn validate_price(price: Option<Decimal>) -> Result<Option<Decimal>, errors::ModelError> {
    let Some(p) = price else { return Ok(None) };
    if p.is_sign_negative() && !p.is_zero() {
        return Err(errors::ModelError::Validation("price must not be negative".into()));
    }
    let rounded = p.round_dp(2);
    if rounded >= Decimal::from(100_000_000) {
        return Err(errors::ModelError::Validation("price exceeds decimal(10, 2)".into()));
    }
    Ok(Some(rounded))
}

/// Insert a product. `date` defaults to now when not supplied.
pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    category: &str,
    price: Option<Decimal>,
    date: Option<DateTimeWithTimeZone>,
) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    validate_category(category)?;
    let price = validate_price(price)?;

    let am = ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        category: Set(category.to_string()),
        price: Set(price),
        date: Set(date.unwrap_or_else(|| Utc::now().into())),
        deleted: Set(false),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Mark a product deleted. Returns `false` when no such row exists.
pub async fn soft_delete(db: &DatabaseConnection, id: i32) -> Result<bool, errors::ModelError> {
    let Some(found) = Entity::find_by_id(id).one(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))? else {
        return Ok(false);
    };
    let mut am: ActiveModel = found.into();
    am.deleted = Set(true);
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn blank_name_and_category_rejected() {
        assert!(validate_name("  ").is_err());
        assert!(validate_category("").is_err());
        assert!(validate_name("iPhone 13").is_ok());
        assert!(validate_name(&"x".repeat(NAME_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn price_rules() {
        assert_eq!(validate_price(None).unwrap(), None);
        assert!(validate_price(Some(Decimal::from(-1))).is_err());
        let p = validate_price(Some(Decimal::from_str("999.999").unwrap())).unwrap();
        assert_eq!(p, Some(Decimal::from_str("1000.00").unwrap()));
        assert!(validate_price(Some(Decimal::from(100_000_000))).is_err());
        assert_eq!(validate_price(Some(Decimal::ZERO)).unwrap(), Some(Decimal::ZERO));
    }

    #[test]
    fn model_serializes_price_as_decimal_string() {
        let m = Model {
            id: 1,
            name: "iPhone 13".into(),
            category: "Electronics".into(),
            price: Some(Decimal::from_str("999.99").unwrap()),
            date: chrono::DateTime::parse_from_rfc3339("2024-01-23T21:47:08.012Z").unwrap(),
            deleted: false,
        };
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["price"], "999.99");
        assert_eq!(v["deleted"], false);
        assert_eq!(v["id"], 1);
    }
}
