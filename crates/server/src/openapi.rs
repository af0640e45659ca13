use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ProductDoc {
    pub id: i32,
    pub name: String,
    pub category: String,
    /// Decimal string with two places, or null
    pub price: Option<String>,
    /// RFC 3339
    pub date: String,
    pub deleted: bool,
}

#[derive(ToSchema)]
pub struct ProductPageDoc { pub data: Vec<ProductDoc>, pub total: u64 }

#[derive(ToSchema)]
pub struct CreateProductRequest { pub name: String, pub category: String, pub price: Option<f64> }

#[derive(ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    /// Omit to keep the stored price; `null` clears it.
    pub price: Option<f64>,
}

#[derive(ToSchema)]
pub struct LoginRequest { pub username: String, pub password: String }

#[derive(ToSchema)]
pub struct TokenResponse { pub access_token: String }

#[derive(ToSchema)]
pub struct StatsDoc { pub total: u64, pub percentage: f64 }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct PriceStatsDoc { pub with_price: StatsDoc, pub without_price: StatsDoc }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct DateRangeStatsDoc { pub within_range: StatsDoc, pub outside_range: StatsDoc }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct PriceRangeStatsDoc { pub within_range: StatsDoc, pub below_range: StatsDoc, pub above_range: StatsDoc }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct SummaryDoc {
    pub deleted_stats: StatsDoc,
    pub non_deleted_stats: StatsDoc,
    pub price_stats: PriceStatsDoc,
    pub date_range_stats: Option<DateRangeStatsDoc>,
    pub price_range_stats: Option<PriceRangeStatsDoc>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::products::create,
        crate::routes::products::find_all,
        crate::routes::products::find_one,
        crate::routes::products::update,
        crate::routes::products::remove,
        crate::routes::reports::deleted_products,
        crate::routes::reports::non_deleted_products_with_price,
        crate::routes::reports::non_deleted_products_without_price,
        crate::routes::reports::price_stats,
        crate::routes::reports::date_range,
        crate::routes::reports::price_range,
        crate::routes::reports::summary,
    ),
    components(
        schemas(
            HealthResponse,
            ProductDoc,
            ProductPageDoc,
            CreateProductRequest,
            UpdateProductRequest,
            LoginRequest,
            TokenResponse,
            StatsDoc,
            PriceStatsDoc,
            DateRangeStatsDoc,
            PriceRangeStatsDoc,
            SummaryDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "products"),
        (name = "reports")
    )
)]
pub struct ApiDoc;
