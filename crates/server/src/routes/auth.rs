use axum::{
    extract::{Request, State},
    http::{header, Method},
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::extract::WithRejection;

use service::auth::domain::{AuthSession, LoginInput};
use service::auth::errors::AuthError;

use crate::{errors::JsonApiError, state::ServerState};

pub const AUTH_COOKIE: &str = "auth_token";

#[utoipa::path(
    post, path = "/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses((status = 200, description = "Logged In", body = crate::openapi::TokenResponse))
)]
pub async fn login(State(state): State<ServerState>, jar: CookieJar, WithRejection(Json(input), _): WithRejection<Json<LoginInput>, JsonApiError>) -> Result<(CookieJar, Json<AuthSession>), JsonApiError> {
    let session = state.auth.login(input)?;
    let mut cookie = Cookie::new(AUTH_COOKIE, session.access_token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    Ok((jar.add(cookie), Json(session)))
}

fn is_public(method: &Method, path: &str) -> bool {
    method == Method::OPTIONS
        || path == "/health"
        || path == "/metrics"
        || path == "/auth/login"
        || path.starts_with("/docs")
        || path.starts_with("/api-docs")
}

/// Bearer token from `Authorization`, falling back to the `auth_token` cookie.
/// `Err` means a malformed `Authorization` header.
fn extract_token(req: &Request) -> Result<Option<String>, ()> {
    if let Some(h) = req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return match h.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => Ok(Some(t.trim().to_string())),
            _ => Err(()),
        };
    }
    let jar = CookieJar::from_headers(req.headers());
    Ok(jar.get(AUTH_COOKIE).map(|c| c.value().to_string()).filter(|v| !v.is_empty()))
}

/// Global guard: every non-public route needs a valid token.
/// Missing token is 400, invalid or expired is 401.
pub async fn require_bearer_token_state(State(state): State<ServerState>, req: Request, next: Next) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    if is_public(req.method(), &path) {
        return Ok(next.run(req).await);
    }

    let token = match extract_token(&req) {
        Ok(Some(t)) => t,
        Ok(None) => {
            tracing::warn!(path = %path, "missing Authorization header and auth_token cookie");
            return Err(AuthError::MissingToken.into());
        }
        Err(()) => {
            tracing::warn!(path = %path, "invalid Authorization format (expect Bearer)");
            return Err(AuthError::Unauthorized.into());
        }
    };

    let claims = state.auth.verify(&token)?;
    tracing::debug!(path = %path, username = %claims.username, "token accepted");
    Ok(next.run(req).await)
}
