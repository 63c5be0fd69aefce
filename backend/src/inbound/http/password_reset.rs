//! Password reset HTTP handlers.
//!
//! ```text
//! POST /api/v1/password/forgot
//! POST /api/v1/password/reset
//! ```
//!
//! Neither route needs a session. The forgot route returns the same
//! acknowledgement whether or not the email holds an account, and the reset
//! route reports every redemption failure with one generic message, so the
//! API cannot be used to probe which addresses are registered.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::accounts::AccountRole;
use crate::domain::{Error, ErrorDto};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request payload for `POST /api/v1/password/forgot`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    #[schema(example = "ada@example.org")]
    pub email: String,
    /// Which account namespace to search: `donor` or `organization`.
    #[schema(example = "donor")]
    pub role: String,
}

/// Request payload for `POST /api/v1/password/reset`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Acknowledgement body for the forgot route.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequestedBody {
    #[schema(example = "If that account exists, a reset link is on its way")]
    pub message: String,
}

fn parse_role(raw: &str) -> ApiResult<AccountRole> {
    match raw {
        "donor" => Ok(AccountRole::Donor),
        "organization" => Ok(AccountRole::Organization),
        other => Err(
            Error::invalid_request("role must be `donor` or `organization`")
                .with_details(json!({ "field": "role", "value": other })),
        ),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/password/forgot",
    request_body = ForgotPasswordRequest,
    responses(
        (
            status = 202,
            description = "Acknowledged; identical whether or not the email holds an account",
            body = ResetRequestedBody
        ),
        (status = 400, description = "Unknown role", body = ErrorDto),
        (status = 503, description = "Store unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    tags = ["password-reset"],
    operation_id = "forgotPassword",
    security([])
)]
#[post("/password/forgot")]
pub async fn forgot_password(
    state: web::Data<HttpState>,
    payload: web::Json<ForgotPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let role = parse_role(&body.role)?;
    state.password_resets.request_reset(&body.email, role).await?;
    Ok(HttpResponse::Accepted().json(ResetRequestedBody {
        message: "If that account exists, a reset link is on its way".into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/password/reset",
    request_body = ResetPasswordRequest,
    responses(
        (status = 204, description = "Password replaced; the token is now spent"),
        (
            status = 400,
            description = "Invalid, expired, or already-used token, or an unacceptable password",
            body = ErrorDto
        ),
        (status = 503, description = "Store unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    tags = ["password-reset"],
    operation_id = "resetPassword",
    security([])
)]
#[post("/password/reset")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    payload: web::Json<ResetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    state
        .password_resets
        .reset_password(&body.token, &body.new_password, &body.confirm_password)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "password_reset_tests.rs"]
mod tests;
