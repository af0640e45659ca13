use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use rust_decimal::Decimal;
use serde::Deserialize;

use service::product::domain::parse_date_bound;
use service::report::domain::{DateRangeStats, PriceRangeStats, PriceStats, ProductStats, Summary, SummaryParams};

use crate::{errors::JsonApiError, state::ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DateRangeQuery {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PriceRangeQuery {
    #[param(value_type = String)]
    pub min_price: Decimal,
    #[param(value_type = String)]
    pub max_price: Decimal,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[param(value_type = Option<String>)]
    pub min_price: Option<Decimal>,
    #[param(value_type = Option<String>)]
    pub max_price: Option<Decimal>,
}

#[utoipa::path(get, path = "/reports/deleted-products", tag = "reports", responses((status = 200, description = "Deleted share of all products", body = crate::openapi::StatsDoc)))]
pub async fn deleted_products(State(state): State<ServerState>) -> Result<Json<ProductStats>, JsonApiError> {
    Ok(Json(state.reports.deleted_products().await?))
}

#[utoipa::path(get, path = "/reports/non-deleted-products-with-price", tag = "reports", responses((status = 200, description = "Non-deleted share of all products", body = crate::openapi::StatsDoc)))]
pub async fn non_deleted_products_with_price(State(state): State<ServerState>) -> Result<Json<ProductStats>, JsonApiError> {
    Ok(Json(state.reports.non_deleted_products().await?))
}

#[utoipa::path(get, path = "/reports/non-deleted-products-without-price", tag = "reports", responses((status = 200, description = "Non-deleted products without a price", body = crate::openapi::StatsDoc)))]
pub async fn non_deleted_products_without_price(State(state): State<ServerState>) -> Result<Json<ProductStats>, JsonApiError> {
    Ok(Json(state.reports.price_stats().await?.without_price))
}

#[utoipa::path(get, path = "/reports/price-stats", tag = "reports", responses((status = 200, description = "Price presence", body = crate::openapi::PriceStatsDoc)))]
pub async fn price_stats(State(state): State<ServerState>) -> Result<Json<PriceStats>, JsonApiError> {
    Ok(Json(state.reports.price_stats().await?))
}

#[utoipa::path(
    get, path = "/reports/date-range", tag = "reports",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Date range split", body = crate::openapi::DateRangeStatsDoc),
        (status = 400, description = "Bad Query")
    )
)]
pub async fn date_range(State(state): State<ServerState>, WithRejection(Query(q), _): WithRejection<Query<DateRangeQuery>, JsonApiError>) -> Result<Json<DateRangeStats>, JsonApiError> {
    let start = parse_date_bound(&q.start_date)?;
    let end = parse_date_bound(&q.end_date)?;
    Ok(Json(state.reports.date_range(start, end).await?))
}

#[utoipa::path(
    get, path = "/reports/price-range", tag = "reports",
    params(PriceRangeQuery),
    responses(
        (status = 200, description = "Price buckets", body = crate::openapi::PriceRangeStatsDoc),
        (status = 400, description = "Bad Query")
    )
)]
pub async fn price_range(State(state): State<ServerState>, WithRejection(Query(q), _): WithRejection<Query<PriceRangeQuery>, JsonApiError>) -> Result<Json<PriceRangeStats>, JsonApiError> {
    Ok(Json(state.reports.price_range(q.min_price, q.max_price).await?))
}

#[utoipa::path(
    get, path = "/reports/summary", tag = "reports",
    params(SummaryQuery),
    responses(
        (status = 200, description = "All reports", body = crate::openapi::SummaryDoc),
        (status = 400, description = "Bad Query")
    )
)]
pub async fn summary(State(state): State<ServerState>, WithRejection(Query(q), _): WithRejection<Query<SummaryQuery>, JsonApiError>) -> Result<Json<Summary>, JsonApiError> {
    let params = SummaryParams {
        start_date: q.start_date.as_deref().map(parse_date_bound).transpose()?,
        end_date: q.end_date.as_deref().map(parse_date_bound).transpose()?,
        min_price: q.min_price,
        max_price: q.max_price,
    };
    Ok(Json(state.reports.summary(params).await?))
}
