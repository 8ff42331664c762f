// Authentication middleware for protected routes.
// Validates JWTs and injects the authenticated principal into request
// extensions. Tokens that fail signature, audience, or issuer checks are
// rejected - there is no alternate decode path.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::str::FromStr;
use uuid::Uuid;

use crate::{
    app::AppState,
    middleware::auth::{permissions_from_scope, AuthenticatedAdmin, AuthenticatedUser},
};

fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "message": message
        })),
    )
        .into_response()
}

/// Middleware for tenant routes
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Some(token) => token,
        None => return unauthorized("Missing or invalid authorization header"),
    };

    match app_state.jwt_service.validate_access_token(token) {
        Ok(claims) => {
            let user_id = match Uuid::from_str(&claims.sub) {
                Ok(id) => id,
                Err(_) => return unauthorized("Invalid or expired token"),
            };
            let company_id = match Uuid::from_str(&claims.company_id) {
                Ok(id) => id,
                Err(_) => return unauthorized("Invalid or expired token"),
            };

            let auth_user = AuthenticatedUser {
                user_id,
                token_id: claims.jti,
                email: claims.email,
                role: claims.role,
                company_id,
                company_name: claims.company_name,
                permissions: permissions_from_scope(&claims.scope),
                exp: claims.exp,
            };

            request.extensions_mut().insert(auth_user);
            next.run(request).await
        },
        Err(e) => {
            tracing::warn!("JWT validation failed: {}", e);
            unauthorized("Invalid or expired token")
        },
    }
}

/// Middleware for admin-portal routes
pub async fn admin_auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Some(token) => token,
        None => return unauthorized("Missing token"),
    };

    match app_state.jwt_service.validate_admin_token(token) {
        Ok(claims) => {
            let admin_id = match Uuid::from_str(&claims.sub) {
                Ok(id) => id,
                Err(_) => return unauthorized("Invalid or expired token"),
            };

            let auth_admin = AuthenticatedAdmin {
                admin_id,
                token_id: claims.jti,
                email: claims.email,
                role: claims.role,
                permissions: permissions_from_scope(&claims.scope),
                exp: claims.exp,
            };

            request.extensions_mut().insert(auth_admin);
            next.run(request).await
        },
        Err(e) => {
            tracing::warn!("Admin JWT validation failed: {}", e);
            unauthorized("Invalid or expired token")
        },
    }
}

/// Extractor for AuthenticatedUser from request extensions
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "message": "Authentication required"
                    })),
                )
            })
    }
}

/// Extractor for AuthenticatedAdmin from request extensions
impl FromRequestParts<AppState> for AuthenticatedAdmin {
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedAdmin>()
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "message": "Authentication required"
                    })),
                )
            })
    }
}
