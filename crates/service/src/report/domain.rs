use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A count and its share of some denominator, in percent (0 when the denominator is 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductStats {
    pub total: u64,
    pub percentage: f64,
}

impl ProductStats {
    pub fn of(count: u64, denominator: u64) -> Self {
        let percentage = if denominator == 0 { 0.0 } else { count as f64 / denominator as f64 * 100.0 };
        Self { total: count, percentage }
    }

    pub fn empty() -> Self { Self { total: 0, percentage: 0.0 } }
}

/// Split of live products by whether a price is set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceStats {
    pub with_price: ProductStats,
    pub without_price: ProductStats,
}

/// Live products dated inside an inclusive window versus the rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeStats {
    pub within_range: ProductStats,
    pub outside_range: ProductStats,
}

/// Live priced products bucketed against `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeStats {
    pub within_range: ProductStats,
    pub below_range: ProductStats,
    pub above_range: ProductStats,
}

/// Optional bounds for the combined report.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryParams {
    pub start_date: Option<DateTime<FixedOffset>>,
    pub end_date: Option<DateTime<FixedOffset>>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub deleted_stats: ProductStats,
    pub non_deleted_stats: ProductStats,
    pub price_stats: PriceStats,
    /// `null` unless both date bounds were supplied.
    pub date_range_stats: Option<DateRangeStats>,
    /// `null` unless both price bounds were supplied.
    pub price_range_stats: Option<PriceRangeStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominator_yields_zero_percent() {
        assert_eq!(ProductStats::of(0, 0), ProductStats::empty());
        let s = ProductStats::of(1, 4);
        assert_eq!(s.total, 1);
        assert!((s.percentage - 25.0).abs() < 1e-9);
    }

    #[test]
    fn summary_renders_absent_sections_as_null() {
        let s = Summary {
            deleted_stats: ProductStats::of(1, 2),
            non_deleted_stats: ProductStats::of(1, 2),
            price_stats: PriceStats { with_price: ProductStats::of(1, 1), without_price: ProductStats::of(0, 1) },
            date_range_stats: None,
            price_range_stats: None,
        };
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["deletedStats"]["total"], 1);
        assert_eq!(v["nonDeletedStats"]["percentage"], 50.0);
        assert_eq!(v["priceStats"]["withPrice"]["total"], 1);
        assert!(v["dateRangeStats"].is_null());
        assert!(v["priceRangeStats"].is_null());
    }
}
