//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the HTTP surface. It registers:
//!
//! - **Paths**: page handlers from the inbound layer (catalogue, auth,
//!   member admin) and the health probes
//! - **Schemas**: the page envelope ([`PageView`]) instantiated per page
//!   payload, the request bodies, and the error contract ([`DomainError`])
//! - **Security**: session cookie authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::domain::{DomainError, PageView, Plant};
use crate::inbound::http::admin::{PageDocument, RoleChangeRequest};
use crate::inbound::http::auth::{Confirmation, LoginForm, LoginRequest, SignupForm, SignupRequest};
use crate::inbound::http::catalog::{CategoryPage, HomePage};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /login.",
            ))),
        );
    }
}

/// OpenAPI document for the HTTP surface.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "HarvestWorld backend API",
        description = "HTTP interface for the plant catalogue, community pages, and health probes.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::catalog::home,
        crate::inbound::http::catalog::category_page,
        crate::inbound::http::catalog::plant_page,
        crate::inbound::http::auth::login_page,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::signup_page,
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::signup_success,
        crate::inbound::http::admin::directory_page,
        crate::inbound::http::admin::page_snapshot,
        crate::inbound::http::admin::change_role,
        crate::inbound::http::admin::close_page,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        PageView<HomePage>,
        PageView<CategoryPage>,
        PageView<Plant>,
        PageView<LoginForm>,
        PageView<SignupForm>,
        PageView<Confirmation>,
        LoginRequest,
        SignupRequest,
        RoleChangeRequest,
        PageDocument,
        DomainError,
    )),
    tags(
        (name = "catalog", description = "Plant catalogue pages"),
        (name = "auth", description = "Login, signup, and logout"),
        (name = "admin", description = "Member directory and page sessions"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
