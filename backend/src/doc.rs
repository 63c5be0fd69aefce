//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (accounts,
//!   donations, profiles, notifications, password reset, health)
//! - **Schemas**: Domain types that derive `ToSchema` directly, so the
//!   documented payloads are the ones the handlers serialize
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::domain::ErrorDto;
use crate::domain::donations::{DonorFacingRecord, OrganizationFacingRecord};
use crate::domain::notifications::Notification;
use crate::domain::ports::{DonorProfile, OrganizationDirectoryEntry, OrganizationProfile};
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
                "Session cookie issued by POST /api/v1/donors/login and \
                 POST /api/v1/organizations/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "FoodBridge backend API",
        description = "HTTP interface for donor and organization accounts, donation \
                       hand-offs, notification feeds, password reset, and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::register_donor,
        crate::inbound::http::accounts::register_organization,
        crate::inbound::http::accounts::login_donor,
        crate::inbound::http::accounts::login_organization,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::donations::submit_food,
        crate::inbound::http::donations::submit_grocery,
        crate::inbound::http::donations::accept_donation,
        crate::inbound::http::donations::reject_donation,
        crate::inbound::http::donations::collect_donation,
        crate::inbound::http::donations::list_organizations,
        crate::inbound::http::profiles::donor_donations,
        crate::inbound::http::profiles::donor_profile,
        crate::inbound::http::profiles::organization_donations,
        crate::inbound::http::profiles::organization_profile,
        crate::inbound::http::notifications::feed,
        crate::inbound::http::notifications::mark_read,
        crate::inbound::http::password_reset::forgot_password,
        crate::inbound::http::password_reset::reset_password,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorDto,
        Notification,
        DonorFacingRecord,
        OrganizationFacingRecord,
        DonorProfile,
        OrganizationProfile,
        OrganizationDirectoryEntry,
    )),
    tags(
        (name = "accounts", description = "Registration, login, and logout"),
        (name = "donations", description = "Donation submission and hand-off transitions"),
        (name = "profiles", description = "Account profiles and donation histories"),
        (name = "notifications", description = "Per-account notification feeds"),
        (name = "password-reset", description = "Forgotten-password recovery"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema and path registration.

    use super::*;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("ErrorDto").expect("ErrorDto schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn openapi_notification_schema_uses_wire_names() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get("Notification").expect("Notification schema");

        assert_object_schema_has_field(schema, "id");
        assert_object_schema_has_field(schema, "message");
        assert_object_schema_has_field(schema, "createdAt");
        assert_object_schema_has_field(schema, "read");
    }

    #[test]
    fn openapi_registers_every_route_group() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/v1/donors/register",
            "/api/v1/donations/food",
            "/api/v1/donors/me/donations",
            "/api/v1/notifications",
            "/api/v1/password/forgot",
            "/health/ready",
        ] {
            assert!(paths.contains_key(path), "missing path '{path}'");
        }
    }

    #[test]
    fn openapi_declares_the_session_cookie_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("components");

        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
