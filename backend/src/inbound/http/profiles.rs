//! Profile and history HTTP handlers for the logged-in account.
//!
//! ```text
//! GET /api/v1/donors/me/donations
//! GET /api/v1/donors/me/profile
//! GET /api/v1/organizations/me/donations?filter=pending|settled
//! GET /api/v1/organizations/me/profile
//! ```
//!
//! The organization history view is always filtered: `pending` is the
//! accept/reject work list, `settled` is everything already decided. The
//! donor history has no filter and returns every record.

use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::donations::DonationFilter;
use crate::domain::{Error, ErrorDto};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize)]
struct DonationsFilterQuery {
    filter: Option<String>,
}

/// The filter is mandatory; the two views it selects are disjoint and
/// neither is a sensible default for the other's screen.
fn parse_filter(raw: Option<String>) -> ApiResult<DonationFilter> {
    match raw.as_deref() {
        Some("pending") => Ok(DonationFilter::Pending),
        Some("settled") => Ok(DonationFilter::Settled),
        Some(other) => Err(
            Error::invalid_request("filter must be `pending` or `settled`")
                .with_details(json!({ "field": "filter", "value": other })),
        ),
        None => Err(
            Error::invalid_request("missing required query parameter: filter")
                .with_details(json!({ "field": "filter" })),
        ),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/donors/me/donations",
    responses(
        (
            status = 200,
            description = "Every donation the donor has submitted",
            body = [crate::domain::donations::DonorFacingRecord]
        ),
        (status = 401, description = "Donor login required", body = ErrorDto),
        (status = 503, description = "Store unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    tags = ["profiles"],
    operation_id = "donorDonationHistory",
    security(("SessionCookie" = []))
)]
#[get("/donors/me/donations")]
pub async fn donor_donations(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let email = session.require_donor()?;
    let records = state.donations_query.donor_history(&email).await?;
    Ok(HttpResponse::Ok().json(records))
}

#[utoipa::path(
    get,
    path = "/api/v1/donors/me/profile",
    responses(
        (
            status = 200,
            description = "Donor account details and donation count",
            body = crate::domain::ports::DonorProfile
        ),
        (status = 401, description = "Donor login required", body = ErrorDto),
        (status = 503, description = "Store unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    tags = ["profiles"],
    operation_id = "donorProfile",
    security(("SessionCookie" = []))
)]
#[get("/donors/me/profile")]
pub async fn donor_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let email = session.require_donor()?;
    let profile = state.donations_query.donor_profile(&email).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[utoipa::path(
    get,
    path = "/api/v1/organizations/me/donations",
    params(
        ("filter" = String, Query, description = "Either `pending` or `settled`")
    ),
    responses(
        (
            status = 200,
            description = "The organization's received donations in the selected slice",
            body = [crate::domain::donations::OrganizationFacingRecord]
        ),
        (status = 400, description = "Missing or unknown filter", body = ErrorDto),
        (status = 401, description = "Organization login required", body = ErrorDto),
        (status = 503, description = "Store unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    tags = ["profiles"],
    operation_id = "organizationDonations",
    security(("SessionCookie" = []))
)]
#[get("/organizations/me/donations")]
pub async fn organization_donations(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<DonationsFilterQuery>,
) -> ApiResult<HttpResponse> {
    let email = session.require_organization()?;
    let filter = parse_filter(query.into_inner().filter)?;
    let records = state
        .donations_query
        .organization_donations(&email, filter)
        .await?;
    Ok(HttpResponse::Ok().json(records))
}

#[utoipa::path(
    get,
    path = "/api/v1/organizations/me/profile",
    responses(
        (
            status = 200,
            description = "Organization account details, totals, and drop-off list",
            body = crate::domain::ports::OrganizationProfile
        ),
        (status = 401, description = "Organization login required", body = ErrorDto),
        (status = 503, description = "Store unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    tags = ["profiles"],
    operation_id = "organizationProfile",
    security(("SessionCookie" = []))
)]
#[get("/organizations/me/profile")]
pub async fn organization_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let email = session.require_organization()?;
    let profile = state.donations_query.organization_profile(&email).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[cfg(test)]
#[path = "profiles_tests.rs"]
mod tests;
