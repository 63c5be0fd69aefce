//! Notification feed HTTP handlers.
//!
//! ```text
//! GET  /api/v1/notifications
//! POST /api/v1/notifications/{id}/read
//! ```
//!
//! Both routes serve whichever identity the session holds. A session that
//! carries both logins at once can name the feed explicitly with the `role`
//! query parameter; without it the donor identity wins.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::accounts::AccountRole;
use crate::domain::notifications::NotificationId;
use crate::domain::{Error, ErrorDto};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize)]
struct RoleQuery {
    role: Option<String>,
}

fn parse_role(raw: Option<String>) -> ApiResult<Option<AccountRole>> {
    match raw.as_deref() {
        None => Ok(None),
        Some("donor") => Ok(Some(AccountRole::Donor)),
        Some("organization") => Ok(Some(AccountRole::Organization)),
        Some(other) => Err(
            Error::invalid_request("role must be `donor` or `organization`")
                .with_details(json!({ "field": "role", "value": other })),
        ),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    params(
        ("role" = Option<String>, Query, description = "Feed to read when both logins share the session: `donor` or `organization`")
    ),
    responses(
        (
            status = 200,
            description = "The account's feed, newest entry first",
            body = [crate::domain::notifications::Notification]
        ),
        (status = 400, description = "Unknown role", body = ErrorDto),
        (status = 401, description = "Login required", body = ErrorDto),
        (status = 503, description = "Store unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    tags = ["notifications"],
    operation_id = "notificationFeed",
    security(("SessionCookie" = []))
)]
#[get("/notifications")]
pub async fn feed(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RoleQuery>,
) -> ApiResult<HttpResponse> {
    let role = parse_role(query.into_inner().role)?;
    let account = session.require_identity(role)?;
    let entries = state.notifications_query.feed(&account).await?;
    Ok(HttpResponse::Ok().json(entries))
}

#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    params(
        ("id" = String, Path, description = "Notification identifier"),
        ("role" = Option<String>, Query, description = "Feed to touch when both logins share the session: `donor` or `organization`")
    ),
    responses(
        (status = 204, description = "Entry marked read; repeating the call changes nothing"),
        (status = 400, description = "Unknown role", body = ErrorDto),
        (status = 401, description = "Login required", body = ErrorDto),
        (status = 404, description = "The feed holds no entry with that id", body = ErrorDto),
        (status = 503, description = "Store unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead",
    security(("SessionCookie" = []))
)]
#[post("/notifications/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<RoleQuery>,
) -> ApiResult<HttpResponse> {
    let role = parse_role(query.into_inner().role)?;
    let account = session.require_identity(role)?;
    let id = NotificationId::from_stored(path.into_inner());
    state.notifications.mark_read(&account, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "notifications_tests.rs"]
mod tests;
