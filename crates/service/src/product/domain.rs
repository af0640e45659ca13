use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ServiceError;

/// Persisted product row as exposed to callers.
pub type Product = models::product::Model;

/// Create input; `deleted` and `date` are assigned by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub price: Option<Decimal>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProductInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// `None` keeps the price, `Some(None)` (an explicit `null`) clears it.
    #[serde(default, deserialize_with = "present_or_null", skip_serializing_if = "Option::is_none")]
    pub price: Option<Option<Decimal>>,
}

fn present_or_null<'de, D>(de: D) -> Result<Option<Option<Decimal>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Decimal>::deserialize(de).map(Some)
}

/// Validated row ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: Option<Decimal>,
    pub date: DateTime<FixedOffset>,
}

impl NewProduct {
    pub fn new(
        name: &str,
        category: &str,
        price: Option<Decimal>,
        date: DateTime<FixedOffset>,
    ) -> Result<Self, ServiceError> {
        models::product::validate_name(name)?;
        models::product::validate_category(category)?;
        let price = models::product::validate_price(price)?;
        Ok(Self { name: name.to_string(), category: category.to_string(), price, date })
    }
}

/// Listing filters. `None` means "don't filter on this".
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub start_date: Option<DateTime<FixedOffset>>,
    pub end_date: Option<DateTime<FixedOffset>>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Also return soft-deleted rows.
    pub include_deleted: bool,
}

/// One page of products plus the total number of matching rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
    pub data: Vec<Product>,
    pub total: u64,
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date_bound(raw: &str) -> Result<DateTime<FixedOffset>, ServiceError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt);
    }
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ServiceError::Validation(format!("invalid date: {raw}")))?;
    let midnight = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ServiceError::Validation(format!("invalid date: {raw}")))?;
    Ok(DateTime::<Utc>::from_naive_utc_and_offset(midnight, Utc).fixed_offset())
}
