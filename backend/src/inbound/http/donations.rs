//! Donation HTTP handlers: submission, lifecycle transitions, and the
//! organization directory behind the donation form.
//!
//! ```text
//! POST /api/v1/donations/food
//! POST /api/v1/donations/grocery
//! POST /api/v1/donations/accept
//! POST /api/v1/donations/reject
//! POST /api/v1/donations/collect
//! GET  /api/v1/organizations
//! ```
//!
//! Submission routes require a donor login; transition routes require an
//! organization login. The two submission routes share one body shape and
//! differ only in the category the path fixes.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::accounts::EmailAddress;
use crate::domain::donations::{
    DonationCategory, DonationSubmission, DonationTransition, OrderId,
};
use crate::domain::{Error, ErrorDto};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request payload for `POST /api/v1/donations/food` and
/// `POST /api/v1/donations/grocery`.
///
/// `items` and `quantities` are parallel lists exactly as the donation form
/// posts them; the domain zips and validates the pairing.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationSubmissionRequest {
    #[schema(example = "Helping Hands")]
    pub organization_name: String,
    #[schema(example = json!(["Rice", "Dal"]))]
    pub items: Vec<String>,
    #[schema(example = json!([5, 2]))]
    pub quantities: Vec<u32>,
}

impl DonationSubmissionRequest {
    fn into_submission(self, category: DonationCategory) -> DonationSubmission {
        DonationSubmission {
            organization_name: self.organization_name,
            category,
            items: self.items,
            quantities: self.quantities,
        }
    }
}

/// Request payload for `POST /api/v1/donations/accept`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcceptDonationRequest {
    pub order_id: String,
    #[schema(example = "ada@example.org")]
    pub donor_email: String,
    /// Free-form pickup time quoted to the donor, e.g. "tomorrow 10am".
    #[schema(example = "tomorrow 10am")]
    pub pickup_time: String,
}

/// Request payload for `POST /api/v1/donations/reject` and
/// `POST /api/v1/donations/collect`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationActionRequest {
    pub order_id: String,
    #[schema(example = "ada@example.org")]
    pub donor_email: String,
}

/// Response payload for a successful submission.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedBody {
    pub order_id: OrderId,
}

/// Transition bodies name the donor by email; reject garbage before the
/// store sees it.
fn parse_donor_email(raw: String) -> ApiResult<EmailAddress> {
    EmailAddress::parse(raw).map_err(|error| Error::invalid_request(error.to_string()))
}

async fn submit(
    state: &HttpState,
    session: &SessionContext,
    body: DonationSubmissionRequest,
    category: DonationCategory,
) -> ApiResult<HttpResponse> {
    let donor_email = session.require_donor()?;
    let order_id = state
        .donations
        .submit(&donor_email, body.into_submission(category))
        .await?;
    Ok(HttpResponse::Created().json(OrderCreatedBody { order_id }))
}

#[utoipa::path(
    post,
    path = "/api/v1/donations/food",
    request_body = DonationSubmissionRequest,
    responses(
        (status = 201, description = "Donation recorded", body = OrderCreatedBody),
        (status = 400, description = "Invalid request", body = ErrorDto),
        (status = 401, description = "Donor login required", body = ErrorDto),
        (status = 404, description = "No organization with that name", body = ErrorDto),
        (status = 503, description = "Store unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    tags = ["donations"],
    operation_id = "submitFoodDonation",
    security(("SessionCookie" = []))
)]
#[post("/donations/food")]
pub async fn submit_food(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DonationSubmissionRequest>,
) -> ApiResult<HttpResponse> {
    submit(
        &state,
        &session,
        payload.into_inner(),
        DonationCategory::Food,
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/v1/donations/grocery",
    request_body = DonationSubmissionRequest,
    responses(
        (status = 201, description = "Donation recorded", body = OrderCreatedBody),
        (status = 400, description = "Invalid request", body = ErrorDto),
        (status = 401, description = "Donor login required", body = ErrorDto),
        (status = 404, description = "No organization with that name", body = ErrorDto),
        (status = 503, description = "Store unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    tags = ["donations"],
    operation_id = "submitGroceryDonation",
    security(("SessionCookie" = []))
)]
#[post("/donations/grocery")]
pub async fn submit_grocery(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DonationSubmissionRequest>,
) -> ApiResult<HttpResponse> {
    submit(
        &state,
        &session,
        payload.into_inner(),
        DonationCategory::Grocery,
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/v1/donations/accept",
    request_body = AcceptDonationRequest,
    responses(
        (
            status = 200,
            description = "Donation accepted; returns the remaining pending work list",
            body = [crate::domain::donations::OrganizationFacingRecord]
        ),
        (status = 400, description = "Invalid request", body = ErrorDto),
        (status = 401, description = "Organization login required", body = ErrorDto),
        (status = 404, description = "No pending donation under that order id", body = ErrorDto),
        (status = 503, description = "Store unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    tags = ["donations"],
    operation_id = "acceptDonation",
    security(("SessionCookie" = []))
)]
#[post("/donations/accept")]
pub async fn accept_donation(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AcceptDonationRequest>,
) -> ApiResult<HttpResponse> {
    let organization_email = session.require_organization()?;
    let body = payload.into_inner();
    let donor_email = parse_donor_email(body.donor_email)?;
    let transition = DonationTransition::accept(body.pickup_time)
        .map_err(|error| Error::invalid_request(error.to_string()))?;
    let records = state
        .donations
        .transition(
            &organization_email,
            &donor_email,
            &OrderId::from_stored(body.order_id),
            transition,
        )
        .await?;
    Ok(HttpResponse::Ok().json(records))
}

#[utoipa::path(
    post,
    path = "/api/v1/donations/reject",
    request_body = DonationActionRequest,
    responses(
        (
            status = 200,
            description = "Donation rejected; returns the remaining pending work list",
            body = [crate::domain::donations::OrganizationFacingRecord]
        ),
        (status = 400, description = "Invalid request", body = ErrorDto),
        (status = 401, description = "Organization login required", body = ErrorDto),
        (status = 404, description = "No pending donation under that order id", body = ErrorDto),
        (status = 503, description = "Store unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    tags = ["donations"],
    operation_id = "rejectDonation",
    security(("SessionCookie" = []))
)]
#[post("/donations/reject")]
pub async fn reject_donation(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DonationActionRequest>,
) -> ApiResult<HttpResponse> {
    let organization_email = session.require_organization()?;
    let body = payload.into_inner();
    let donor_email = parse_donor_email(body.donor_email)?;
    let records = state
        .donations
        .transition(
            &organization_email,
            &donor_email,
            &OrderId::from_stored(body.order_id),
            DonationTransition::Reject,
        )
        .await?;
    Ok(HttpResponse::Ok().json(records))
}

#[utoipa::path(
    post,
    path = "/api/v1/donations/collect",
    request_body = DonationActionRequest,
    responses(
        (
            status = 200,
            description = "Donation collected; returns the settled history",
            body = [crate::domain::donations::OrganizationFacingRecord]
        ),
        (status = 400, description = "Invalid request", body = ErrorDto),
        (status = 401, description = "Organization login required", body = ErrorDto),
        (status = 404, description = "No accepted donation under that order id", body = ErrorDto),
        (status = 503, description = "Store unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    tags = ["donations"],
    operation_id = "collectDonation",
    security(("SessionCookie" = []))
)]
#[post("/donations/collect")]
pub async fn collect_donation(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DonationActionRequest>,
) -> ApiResult<HttpResponse> {
    let organization_email = session.require_organization()?;
    let body = payload.into_inner();
    let donor_email = parse_donor_email(body.donor_email)?;
    let records = state
        .donations
        .transition(
            &organization_email,
            &donor_email,
            &OrderId::from_stored(body.order_id),
            DonationTransition::Collect,
        )
        .await?;
    Ok(HttpResponse::Ok().json(records))
}

#[utoipa::path(
    get,
    path = "/api/v1/organizations",
    responses(
        (
            status = 200,
            description = "Every registered organization, for the donation form's picker",
            body = [crate::domain::ports::OrganizationDirectoryEntry]
        ),
        (status = 401, description = "Donor login required", body = ErrorDto),
        (status = 503, description = "Store unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    tags = ["donations"],
    operation_id = "listOrganizations",
    security(("SessionCookie" = []))
)]
#[get("/organizations")]
pub async fn list_organizations(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_donor()?;
    let directory = state.donations_query.organizations_directory().await?;
    Ok(HttpResponse::Ok().json(directory))
}

#[cfg(test)]
#[path = "donations_tests.rs"]
mod tests;
