//! Account HTTP handlers: registration, login, and logout for both roles.
//!
//! ```text
//! POST /api/v1/donors/register
//! POST /api/v1/donors/login
//! POST /api/v1/organizations/register
//! POST /api/v1/organizations/login
//! POST /api/v1/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ErrorDto;
use crate::domain::accounts::{
    Donor, DonorRegistration, EmailAddress, Organization, OrganizationRegistration,
    PostalAddressParts,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request payload for `POST /api/v1/donors/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonorRegisterRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.org")]
    pub email: String,
    #[schema(example = "9876543210")]
    pub phone: String,
    pub address: PostalAddressParts,
    pub password: String,
    pub confirm_password: String,
}

impl From<DonorRegisterRequest> for DonorRegistration {
    fn from(value: DonorRegisterRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            phone: value.phone,
            address: value.address,
            password: value.password,
            confirm_password: value.confirm_password,
        }
    }
}

/// Request payload for `POST /api/v1/organizations/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRegisterRequest {
    #[schema(example = "Helping Hands")]
    pub organization_name: String,
    /// Operator-issued registration identifier, quoted again at every login.
    #[schema(example = "NGO-2291")]
    pub registration_id: String,
    #[schema(example = "Grace Hopper")]
    pub owner_name: String,
    #[schema(example = "contact@helpinghands.example")]
    pub email: String,
    #[schema(example = "9123456780")]
    pub phone: String,
    pub address: PostalAddressParts,
    pub password: String,
    pub confirm_password: String,
}

impl From<OrganizationRegisterRequest> for OrganizationRegistration {
    fn from(value: OrganizationRegisterRequest) -> Self {
        Self {
            organization_name: value.organization_name,
            registration_id: value.registration_id,
            owner_name: value.owner_name,
            email: value.email,
            phone: value.phone,
            address: value.address,
            password: value.password,
            confirm_password: value.confirm_password,
        }
    }
}

/// Request payload for `POST /api/v1/donors/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonorLoginRequest {
    pub email: String,
    pub password: String,
}

/// Request payload for `POST /api/v1/organizations/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationLoginRequest {
    pub email: String,
    pub password: String,
    pub registration_id: String,
}

/// Donor account summary returned by registration and login.
///
/// Credentials and reset state never leave the domain.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonorSummaryBody {
    pub name: String,
    pub email: EmailAddress,
    pub phone: String,
    pub address: PostalAddressParts,
}

impl From<Donor> for DonorSummaryBody {
    fn from(value: Donor) -> Self {
        Self {
            name: value.name,
            email: value.email,
            phone: value.phone,
            address: value.address,
        }
    }
}

/// Organization account summary returned by registration and login.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSummaryBody {
    pub organization_name: String,
    pub registration_id: String,
    pub owner_name: String,
    pub email: EmailAddress,
    pub phone: String,
    pub address: PostalAddressParts,
}

impl From<Organization> for OrganizationSummaryBody {
    fn from(value: Organization) -> Self {
        Self {
            organization_name: value.organization_name,
            registration_id: value.registration_id,
            owner_name: value.owner_name,
            email: value.email,
            phone: value.phone,
            address: value.address,
        }
    }
}

/// Open a donor account.
#[utoipa::path(
    post,
    path = "/api/v1/donors/register",
    request_body = DonorRegisterRequest,
    responses(
        (status = 201, description = "Donor account created", body = DonorSummaryBody),
        (status = 400, description = "Invalid request", body = ErrorDto),
        (status = 409, description = "Email already registered as a donor", body = ErrorDto),
        (status = 503, description = "Store unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    tags = ["accounts"],
    operation_id = "registerDonor",
    security([])
)]
#[post("/donors/register")]
pub async fn register_donor(
    state: web::Data<HttpState>,
    payload: web::Json<DonorRegisterRequest>,
) -> ApiResult<HttpResponse> {
    let donor = state
        .registration
        .register_donor(payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(DonorSummaryBody::from(donor)))
}

/// Open an organization account.
#[utoipa::path(
    post,
    path = "/api/v1/organizations/register",
    request_body = OrganizationRegisterRequest,
    responses(
        (status = 201, description = "Organization account created", body = OrganizationSummaryBody),
        (status = 400, description = "Invalid request", body = ErrorDto),
        (status = 409, description = "Email or organization name already taken", body = ErrorDto),
        (status = 503, description = "Store unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    tags = ["accounts"],
    operation_id = "registerOrganization",
    security([])
)]
#[post("/organizations/register")]
pub async fn register_organization(
    state: web::Data<HttpState>,
    payload: web::Json<OrganizationRegisterRequest>,
) -> ApiResult<HttpResponse> {
    let organization = state
        .registration
        .register_organization(payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(OrganizationSummaryBody::from(organization)))
}

/// Authenticate a donor and establish the donor session identity.
#[utoipa::path(
    post,
    path = "/api/v1/donors/login",
    request_body = DonorLoginRequest,
    responses(
        (
            status = 200,
            description = "Login success",
            body = DonorSummaryBody,
            headers(("Set-Cookie" = String, description = "Session cookie"))
        ),
        (status = 400, description = "Unknown email or wrong password", body = ErrorDto),
        (status = 503, description = "Store unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    tags = ["accounts"],
    operation_id = "loginDonor",
    security([])
)]
#[post("/donors/login")]
pub async fn login_donor(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DonorLoginRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let donor = state
        .login
        .login_donor(&request.email, &request.password)
        .await?;
    session.persist_donor(&donor.email)?;
    Ok(HttpResponse::Ok().json(DonorSummaryBody::from(donor)))
}

/// Authenticate an organization and establish the organization session
/// identity.
#[utoipa::path(
    post,
    path = "/api/v1/organizations/login",
    request_body = OrganizationLoginRequest,
    responses(
        (
            status = 200,
            description = "Login success",
            body = OrganizationSummaryBody,
            headers(("Set-Cookie" = String, description = "Session cookie"))
        ),
        (
            status = 400,
            description = "Unknown email, wrong password, or mismatched organization id",
            body = ErrorDto
        ),
        (status = 503, description = "Store unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    tags = ["accounts"],
    operation_id = "loginOrganization",
    security([])
)]
#[post("/organizations/login")]
pub async fn login_organization(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<OrganizationLoginRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let organization = state
        .login
        .login_organization(&request.email, &request.password, &request.registration_id)
        .await?;
    session.persist_organization(&organization.email)?;
    Ok(HttpResponse::Ok().json(OrganizationSummaryBody::from(organization)))
}

/// Drop every identity the session holds.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Session purged")
    ),
    tags = ["accounts"],
    operation_id = "logout",
    security(("SessionCookie" = []))
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
