//! Title hold endpoints

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{hold::HOLDS_FUNCTION, ActionToken, HoldLink, HoldRequestDescriptor},
    services::{auth::BearerLogin, signing},
};

use super::{AuthenticatedPatron, OptionalPatron};

/// Hold action for a record: a signed action, a catalog URL, or `false`
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum HoldResponse {
    Token(ActionToken),
    Link { url: String },
    Unavailable(bool),
}

impl From<Option<HoldLink>> for HoldResponse {
    fn from(link: Option<HoldLink>) -> Self {
        match link {
            Some(HoldLink::Token(token)) => HoldResponse::Token(token),
            Some(HoldLink::CatalogUrl(url)) => HoldResponse::Link { url },
            None => HoldResponse::Unavailable(false),
        }
    }
}

/// Result of checking a returning hold request
#[derive(Debug, Serialize, ToSchema)]
pub struct HoldValidation {
    /// Whether the signature matches and the request targets this record
    pub valid: bool,
    /// Record from the path
    pub record: String,
    /// Signed request fields, when valid
    #[schema(value_type = Option<Object>)]
    pub request: Option<HoldRequestDescriptor>,
}

/// Get the title hold action for a record
#[utoipa::path(
    get,
    path = "/records/{id}/hold",
    tag = "holds",
    params(
        ("id" = String, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Hold action, catalog hold URL, or false when no hold is offered", body = ActionToken),
        (status = 401, description = "Invalid bearer token"),
        (status = 502, description = "Catalog failure")
    )
)]
pub async fn get_hold(
    State(state): State<crate::AppState>,
    OptionalPatron(claims): OptionalPatron,
    Path(id): Path<String>,
) -> AppResult<Json<HoldResponse>> {
    let login = BearerLogin::from(claims);
    let link = state.services.title_holds(&login).get_hold(&id).await?;
    Ok(Json(HoldResponse::from(link)))
}

/// Check the signature of a returning hold request
#[utoipa::path(
    get,
    path = "/records/{id}/hold/validate",
    tag = "holds",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Validation result", body = HoldValidation),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn validate_hold_request(
    State(state): State<crate::AppState>,
    AuthenticatedPatron(claims): AuthenticatedPatron,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<HoldValidation>> {
    let rejected = || HoldValidation {
        valid: false,
        record: id.clone(),
        request: None,
    };

    let Some(catalog) = state.services.catalog.as_deref() else {
        return Ok(Json(rejected()));
    };
    let Some(capability) = catalog.check_function(HOLDS_FUNCTION, &id).await? else {
        return Ok(Json(rejected()));
    };

    let request = signing::validate_request(&params, &capability.signed_keys, state.services.signer.as_ref())?
        .filter(|request| request.id() == Some(id.as_str()));

    let Some(request) = request else {
        tracing::warn!("Rejected hold request on record {} from patron {}", id, claims.user_id);
        return Ok(Json(rejected()));
    };

    Ok(Json(HoldValidation {
        valid: true,
        record: id.clone(),
        request: Some(request),
    }))
}
