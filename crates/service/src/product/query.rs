//! Storage-agnostic row predicate shared by listing and reports.
//!
//! All set fields are ANDed. Price predicates never match rows whose price
//! is null, the same way SQL comparisons against NULL behave.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use super::domain::{Product, ProductFilter};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub deleted: Option<bool>,
    pub date_from: Option<DateTime<FixedOffset>>,
    pub date_to: Option<DateTime<FixedOffset>>,
    /// `price >= min`
    pub price_min: Option<Decimal>,
    /// `price <= max`
    pub price_max: Option<Decimal>,
    /// `price < x`
    pub price_below: Option<Decimal>,
    /// `price > x`
    pub price_above: Option<Decimal>,
    /// `price IS NOT NULL` / `price IS NULL`
    pub has_price: Option<bool>,
}

impl ProductQuery {
    pub fn all() -> Self { Self::default() }

    pub fn deleted(mut self, deleted: bool) -> Self {
        self.deleted = Some(deleted);
        self
    }

    pub fn has_price(mut self, has_price: bool) -> Self {
        self.has_price = Some(has_price);
        self
    }

    /// Inclusive on both ends.
    pub fn date_between(mut self, from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> Self {
        self.date_from = Some(from);
        self.date_to = Some(to);
        self
    }

    /// Inclusive on both ends.
    pub fn price_between(mut self, min: Decimal, max: Decimal) -> Self {
        self.price_min = Some(min);
        self.price_max = Some(max);
        self
    }

    pub fn price_below(mut self, x: Decimal) -> Self {
        self.price_below = Some(x);
        self
    }

    pub fn price_above(mut self, x: Decimal) -> Self {
        self.price_above = Some(x);
        self
    }

    /// In-memory evaluation, kept equivalent to the SQL condition.
    pub fn matches(&self, p: &Product) -> bool {
        if let Some(c) = &self.category {
            if &p.category != c { return false; }
        }
        if let Some(d) = self.deleted {
            if p.deleted != d { return false; }
        }
        if let Some(from) = self.date_from {
            if p.date < from { return false; }
        }
        if let Some(to) = self.date_to {
            if p.date > to { return false; }
        }
        if let Some(has) = self.has_price {
            if p.price.is_some() != has { return false; }
        }
        let price_checks = [
            self.price_min.map(|m| p.price.is_some_and(|v| v >= m)),
            self.price_max.map(|m| p.price.is_some_and(|v| v <= m)),
            self.price_below.map(|m| p.price.is_some_and(|v| v < m)),
            self.price_above.map(|m| p.price.is_some_and(|v| v > m)),
        ];
        price_checks.into_iter().flatten().all(|ok| ok)
    }
}

impl From<ProductFilter> for ProductQuery {
    fn from(f: ProductFilter) -> Self {
        Self {
            category: f.category,
            deleted: if f.include_deleted { None } else { Some(false) },
            date_from: f.start_date,
            date_to: f.end_date,
            price_min: f.min_price,
            price_max: f.max_price,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: Option<i64>, deleted: bool) -> Product {
        Product {
            id: 1,
            name: "Lamp".into(),
            category: "Home".into(),
            price: price.map(Decimal::from),
            date: DateTime::parse_from_rfc3339("2024-01-15T12:00:00Z").unwrap(),
            deleted,
        }
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(ProductQuery::all().matches(&product(None, true)));
        assert!(ProductQuery::all().matches(&product(Some(3), false)));
    }

    #[test]
    fn price_predicates_skip_null_prices() {
        let q = ProductQuery::all().price_below(Decimal::from(100));
        assert!(!q.matches(&product(None, false)));
        assert!(q.matches(&product(Some(50), false)));
        assert!(!q.matches(&product(Some(100), false)));

        let between = ProductQuery::all().price_between(Decimal::from(10), Decimal::from(50));
        assert!(between.matches(&product(Some(10), false)));
        assert!(between.matches(&product(Some(50), false)));
        assert!(!between.matches(&product(None, false)));
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let d = DateTime::parse_from_rfc3339("2024-01-15T12:00:00Z").unwrap();
        let q = ProductQuery::all().date_between(d, d);
        assert!(q.matches(&product(None, false)));
    }

    #[test]
    fn filter_converts_field_by_field() {
        let q: ProductQuery = ProductFilter {
            category: Some("Home".into()),
            min_price: Some(Decimal::from(1)),
            ..Default::default()
        }
        .into();
        assert_eq!(q.category.as_deref(), Some("Home"));
        assert_eq!(q.deleted, Some(false));
        let all: ProductQuery = ProductFilter { include_deleted: true, ..Default::default() }.into();
        assert!(all.deleted.is_none());
        assert_eq!(q.price_min, Some(Decimal::from(1)));
        assert!(q.price_max.is_none());
    }
}
