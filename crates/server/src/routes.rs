pub mod auth;
pub mod products;
pub mod reports;

use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Prometheus text exposition.
pub async fn metrics() -> impl IntoResponse {
    common::metrics::encode_metrics()
}

/// Build the full application router: public, product, report and auth routes.
pub fn build_router(state: ServerState, cors: CorsLayer, serve_docs: bool) -> Router {
    let products = Router::new()
        .route("/products", post(products::create).get(products::find_all))
        .route(
            "/products/:id",
            get(products::find_one).put(products::update).delete(products::remove),
        );

    let reports = Router::new()
        .route("/reports/deleted-products", get(reports::deleted_products))
        .route("/reports/non-deleted-products-with-price", get(reports::non_deleted_products_with_price))
        .route("/reports/non-deleted-products-without-price", get(reports::non_deleted_products_without_price))
        .route("/reports/price-stats", get(reports::price_stats))
        .route("/reports/date-range", get(reports::date_range))
        .route("/reports/price-range", get(reports::price_range))
        .route("/reports/summary", get(reports::summary));

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/auth/login", post(auth::login))
        .merge(products)
        .merge(reports);

    if serve_docs {
        app = app.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    if state.require_token {
        app = app.layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token_state));
    }

    app.with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use service::product::repository::mock::MockProductRepository;
    use tower::ServiceExt;

    fn app(require_token: bool) -> Router {
        let mut cfg = configs::AppConfig::default();
        cfg.auth.require_token = require_token;
        let state = ServerState::new(Arc::new(MockProductRepository::new()), &cfg);
        build_router(state, CorsLayer::very_permissive(), false)
    }

    #[tokio::test]
    async fn health_returns_ok_json() {
        let res = app(false).oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn guard_only_applies_when_enabled() {
        let req = || Request::get("/reports/price-stats").body(Body::empty()).unwrap();
        assert_eq!(app(false).oneshot(req()).await.unwrap().status(), StatusCode::OK);
        assert_eq!(app(true).oneshot(req()).await.unwrap().status(), StatusCode::BAD_REQUEST);
        let preflight = Request::builder().method("OPTIONS").uri("/products").body(Body::empty()).unwrap();
        assert_ne!(app(true).oneshot(preflight).await.unwrap().status(), StatusCode::BAD_REQUEST);
    }
}
