//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, holds};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Elidune Holds API",
        version = "0.1.0",
        description = "Title hold eligibility and signed hold actions",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Elidune Team", email = "contact@elidune.org")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Holds
        holds::get_hold,
        holds::validate_hold_request,
    ),
    components(
        schemas(
            // Holds
            crate::models::ActionToken,
            crate::models::PolicyMode,
            crate::models::HoldingItem,
            holds::HoldValidation,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "holds", description = "Title hold actions")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
