use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use tracing::instrument;

use super::domain::{DateRangeStats, PriceRangeStats, PriceStats, ProductStats, Summary, SummaryParams};
use crate::errors::ServiceError;
use crate::product::query::ProductQuery;
use crate::product::repository::ProductRepository;

/// Read-only percentage reports computed from count queries.
pub struct ReportService {
    repo: Arc<dyn ProductRepository>,
}

impl ReportService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self { Self { repo } }

    fn live() -> ProductQuery { ProductQuery::all().deleted(false) }

    /// Deleted rows against all rows.
    #[instrument(skip(self))]
    pub async fn deleted_products(&self) -> Result<ProductStats, ServiceError> {
        let total = self.repo.count(&ProductQuery::all()).await?;
        if total == 0 {
            return Ok(ProductStats::empty());
        }
        let deleted = self.repo.count(&ProductQuery::all().deleted(true)).await?;
        Ok(ProductStats::of(deleted, total))
    }

    /// Live rows against all rows.
    #[instrument(skip(self))]
    pub async fn non_deleted_products(&self) -> Result<ProductStats, ServiceError> {
        let total = self.repo.count(&ProductQuery::all()).await?;
        if total == 0 {
            return Ok(ProductStats::empty());
        }
        let live = self.repo.count(&Self::live()).await?;
        Ok(ProductStats::of(live, total))
    }

    /// Live rows with and without a price, against the live total.
    #[instrument(skip(self))]
    pub async fn price_stats(&self) -> Result<PriceStats, ServiceError> {
        let total = self.repo.count(&Self::live()).await?;
        let with_price = self.repo.count(&Self::live().has_price(true)).await?;
        let without_price = self.repo.count(&Self::live().has_price(false)).await?;
        Ok(PriceStats {
            with_price: ProductStats::of(with_price, total),
            without_price: ProductStats::of(without_price, total),
        })
    }

    /// Live rows dated within `[start, end]` versus the rest.
    #[instrument(skip(self))]
    pub async fn date_range(&self, start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Result<DateRangeStats, ServiceError> {
        if start > end {
            return Err(ServiceError::Validation("startDate must not be after endDate".into()));
        }
        let total = self.repo.count(&Self::live()).await?;
        let within = self.repo.count(&Self::live().date_between(start, end)).await?;
        Ok(DateRangeStats {
            within_range: ProductStats::of(within, total),
            outside_range: ProductStats::of(total.saturating_sub(within), total),
        })
    }

    /// Live priced rows bucketed against `[min, max]`. Unpriced rows land in no bucket.
    #[instrument(skip(self))]
    pub async fn price_range(&self, min: Decimal, max: Decimal) -> Result<PriceRangeStats, ServiceError> {
        if min > max {
            return Err(ServiceError::Validation("minPrice must not be greater than maxPrice".into()));
        }
        let total = self.repo.count(&Self::live()).await?;
        let within = self.repo.count(&Self::live().price_between(min, max)).await?;
        let below = self.repo.count(&Self::live().price_below(min)).await?;
        let above = self.repo.count(&Self::live().price_above(max)).await?;
        Ok(PriceRangeStats {
            within_range: ProductStats::of(within, total),
            below_range: ProductStats::of(below, total),
            above_range: ProductStats::of(above, total),
        })
    }

    /// Every report at once. Range sections need both of their bounds.
    #[instrument(skip(self))]
    pub async fn summary(&self, params: SummaryParams) -> Result<Summary, ServiceError> {
        let date_range = async {
            match (params.start_date, params.end_date) {
                (Some(s), Some(e)) => self.date_range(s, e).await.map(Some),
                _ => Ok(None),
            }
        };
        let price_range = async {
            match (params.min_price, params.max_price) {
                (Some(min), Some(max)) => self.price_range(min, max).await.map(Some),
                _ => Ok(None),
            }
        };
        let (deleted_stats, non_deleted_stats, price_stats, date_range_stats, price_range_stats) = tokio::try_join!(
            self.deleted_products(),
            self.non_deleted_products(),
            self.price_stats(),
            date_range,
            price_range,
        )?;
        Ok(Summary { deleted_stats, non_deleted_stats, price_stats, date_range_stats, price_range_stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::domain::Product;
    use crate::product::repository::mock::MockProductRepository;

    fn close(a: f64, b: f64) -> bool { (a - b).abs() < 0.01 }

    fn at(s: &str) -> DateTime<FixedOffset> { DateTime::parse_from_rfc3339(s).unwrap() }

    fn seeded(rows: &[(Option<i64>, &str, bool)]) -> ReportService {
        let repo = Arc::new(MockProductRepository::new());
        for (i, (price, date, deleted)) in rows.iter().enumerate() {
            repo.seed(Product {
                id: i as i32 + 1,
                name: format!("p{i}"),
                category: "Misc".into(),
                price: price.map(Decimal::from),
                date: at(date),
                deleted: *deleted,
            });
        }
        ReportService::new(repo)
    }

    #[tokio::test]
    async fn empty_table_reports_zeroes() {
        let svc = seeded(&[]);
        assert_eq!(svc.deleted_products().await.unwrap(), ProductStats::empty());
        assert_eq!(svc.non_deleted_products().await.unwrap(), ProductStats::empty());
        let ps = svc.price_stats().await.unwrap();
        assert_eq!(ps.with_price, ProductStats::empty());
        assert_eq!(ps.without_price, ProductStats::empty());
        let pr = svc.price_range(Decimal::from(1), Decimal::from(2)).await.unwrap();
        assert_eq!(pr.within_range, ProductStats::empty());
    }

    #[tokio::test]
    async fn deleted_and_live_ratios_use_all_rows() {
        let svc = seeded(&[
            (None, "2024-01-01T00:00:00Z", true),
            (None, "2024-01-01T00:00:00Z", false),
            (None, "2024-01-01T00:00:00Z", false),
            (None, "2024-01-01T00:00:00Z", false),
        ]);
        let d = svc.deleted_products().await.unwrap();
        assert_eq!(d.total, 1);
        assert!(close(d.percentage, 25.0));
        let l = svc.non_deleted_products().await.unwrap();
        assert_eq!(l.total, 3);
        assert!(close(l.percentage, 75.0));
    }

    #[tokio::test]
    async fn price_presence_counts_live_rows_only() {
        let svc = seeded(&[
            (None, "2024-01-01T00:00:00Z", false),
            (Some(50), "2024-01-01T00:00:00Z", false),
            (Some(150), "2024-01-01T00:00:00Z", false),
            (Some(10), "2024-01-01T00:00:00Z", true),
        ]);
        let ps = svc.price_stats().await.unwrap();
        assert_eq!(ps.with_price.total, 2);
        assert_eq!(ps.without_price.total, 1);
        assert!(close(ps.with_price.percentage, 66.67));
        assert!(close(ps.without_price.percentage, 33.33));
    }

    #[tokio::test]
    async fn price_buckets_partition_priced_rows() {
        let svc = seeded(&[
            (None, "2024-01-01T00:00:00Z", false),
            (Some(5), "2024-01-01T00:00:00Z", false),
            (Some(10), "2024-01-01T00:00:00Z", false),
            (Some(20), "2024-01-01T00:00:00Z", false),
            (Some(21), "2024-01-01T00:00:00Z", false),
        ]);
        let pr = svc.price_range(Decimal::from(10), Decimal::from(20)).await.unwrap();
        assert_eq!(pr.within_range.total, 2);
        assert_eq!(pr.below_range.total, 1);
        assert_eq!(pr.above_range.total, 1);
        assert!(close(pr.within_range.percentage, 40.0));
    }

    #[tokio::test]
    async fn date_range_splits_live_rows() {
        let svc = seeded(&[
            (None, "2024-01-05T00:00:00Z", false),
            (None, "2024-02-05T00:00:00Z", false),
            (None, "2024-01-06T00:00:00Z", true),
        ]);
        let dr = svc.date_range(at("2024-01-01T00:00:00Z"), at("2024-01-31T00:00:00Z")).await.unwrap();
        assert_eq!(dr.within_range.total, 1);
        assert_eq!(dr.outside_range.total, 1);
        assert!(close(dr.within_range.percentage, 50.0));
    }

    #[tokio::test]
    async fn inverted_bounds_are_rejected() {
        let svc = seeded(&[]);
        let err = svc.price_range(Decimal::from(5), Decimal::from(1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let err = svc.date_range(at("2024-02-01T00:00:00Z"), at("2024-01-01T00:00:00Z")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn summary_includes_ranges_only_with_both_bounds() {
        let svc = seeded(&[(Some(50), "2024-01-05T00:00:00Z", false), (None, "2024-01-05T00:00:00Z", true)]);
        let partial = SummaryParams { min_price: Some(Decimal::from(1)), ..Default::default() };
        let s = svc.summary(partial).await.unwrap();
        assert!(s.price_range_stats.is_none());
        assert!(s.date_range_stats.is_none());
        assert_eq!(s.deleted_stats.total, 1);
        assert_eq!(s.non_deleted_stats.total, 1);
        assert_eq!(s.price_stats.with_price.total, 1);

        let full = SummaryParams {
            start_date: Some(at("2024-01-01T00:00:00Z")),
            end_date: Some(at("2024-01-31T00:00:00Z")),
            min_price: Some(Decimal::from(1)),
            max_price: Some(Decimal::from(100)),
        };
        let s = svc.summary(full).await.unwrap();
        assert_eq!(s.price_range_stats.unwrap().within_range.total, 1);
        assert_eq!(s.date_range_stats.unwrap().within_range.total, 1);
    }
}
