use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use service::product::domain::{parse_date_bound, CreateProductInput, Product, ProductFilter, ProductPage, UpdateProductInput};

use crate::{errors::JsonApiError, state::ServerState};

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// 1-based page number
    pub page: Option<u32>,
    pub category: Option<String>,
    /// RFC 3339 or YYYY-MM-DD
    pub start_date: Option<String>,
    /// RFC 3339 or YYYY-MM-DD
    pub end_date: Option<String>,
    #[param(value_type = Option<String>)]
    pub min_price: Option<Decimal>,
    #[param(value_type = Option<String>)]
    pub max_price: Option<Decimal>,
    /// Include deleted products
    pub deleted: Option<bool>,
}

impl ListQuery {
    fn into_filter(self) -> Result<(u32, ProductFilter), JsonApiError> {
        let filter = ProductFilter {
            category: self.category.filter(|c| !c.is_empty()),
            start_date: self.start_date.as_deref().map(parse_date_bound).transpose()?,
            end_date: self.end_date.as_deref().map(parse_date_bound).transpose()?,
            min_price: self.min_price,
            max_price: self.max_price,
            include_deleted: self.deleted.unwrap_or(false),
        };
        Ok((self.page.unwrap_or(1), filter))
    }
}

#[utoipa::path(
    post, path = "/products", tag = "products",
    request_body = crate::openapi::CreateProductRequest,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ProductDoc),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create(State(state): State<ServerState>, WithRejection(Json(input), _): WithRejection<Json<CreateProductInput>, JsonApiError>) -> Result<(StatusCode, Json<Product>), JsonApiError> {
    let p = state.products.create(input).await?;
    Ok((StatusCode::CREATED, Json(p)))
}

#[utoipa::path(
    get, path = "/products", tag = "products",
    params(ListQuery),
    responses(
        (status = 200, description = "List OK", body = crate::openapi::ProductPageDoc),
        (status = 400, description = "Bad Query")
    )
)]
pub async fn find_all(State(state): State<ServerState>, WithRejection(Query(q), _): WithRejection<Query<ListQuery>, JsonApiError>) -> Result<Json<ProductPage>, JsonApiError> {
    let (page, filter) = q.into_filter()?;
    let out = state.products.find_all(page, filter).await?;
    info!(page, total = out.total, "list products");
    Ok(Json(out))
}

#[utoipa::path(
    get, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ProductDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn find_one(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<Product>, JsonApiError> {
    Ok(Json(state.products.find_one(id).await?))
}

#[utoipa::path(
    put, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = crate::openapi::UpdateProductRequest,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ProductDoc),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(State(state): State<ServerState>, Path(id): Path<i32>, WithRejection(Json(input), _): WithRejection<Json<UpdateProductInput>, JsonApiError>) -> Result<Json<Product>, JsonApiError> {
    Ok(Json(state.products.update(id, input).await?))
}

#[utoipa::path(
    delete, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses((status = 200, description = "Product marked as deleted (also when absent)"))
)]
pub async fn remove(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<StatusCode, JsonApiError> {
    state.products.remove(id).await?;
    Ok(StatusCode::OK)
}
