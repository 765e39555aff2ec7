//! API handlers for hold eligibility endpoints

pub mod health;
pub mod holds;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::PatronClaims, AppState};

/// Bearer token of the request, if any
fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(auth_header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_header = auth_header
        .to_str()
        .map_err(|_| AppError::Authentication("Invalid authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(Some)
        .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))
}

fn decode_claims(token: &str, state: &AppState) -> Result<PatronClaims, AppError> {
    PatronClaims::from_token(token, &state.config.auth.jwt_secret)
        .map_err(|e| AppError::Authentication(e.to_string()))
}

/// Extractor for an authenticated patron from JWT token
pub struct AuthenticatedPatron(pub PatronClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedPatron {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;
        Ok(AuthenticatedPatron(decode_claims(token, state)?))
    }
}

/// Extractor for an optional patron: anonymous requests are accepted,
/// invalid tokens are rejected
pub struct OptionalPatron(pub Option<PatronClaims>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalPatron {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => Ok(OptionalPatron(Some(decode_claims(token, state)?))),
            None => Ok(OptionalPatron(None)),
        }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Title holds
        .route("/records/:id/hold", get(holds::get_hold))
        .route("/records/:id/hold/validate", get(holds::validate_hold_request))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
