//! Shared HTTP helpers for the account, donation, and password-reset suites.
//!
//! Every helper drives the listening server through `awc` and records the
//! outcome on the world, so `then` steps assert against one place. Session
//! cookies are kept per role; a sign-in that reuses the other role's cookie
//! stores the refreshed cookie under both roles, mirroring how a browser
//! holds one session for both identities.

use actix_web::http::{Method, header};
use awc::Client;
use backend::domain::TRACE_ID_HEADER;
use backend::domain::mail::MailMessage;
use backend::test_support::wait_for_mail;
use serde_json::{Value, json};

use crate::harness::{SharedWorld, with_world_async};

pub(crate) const DONOR_NAME: &str = "Ada Lovelace";
pub(crate) const DONOR_EMAIL: &str = "ada@example.org";
pub(crate) const DONOR_PHONE: &str = "9876543210";
pub(crate) const DONOR_PASSWORD: &str = "s3cret!pass";

pub(crate) const ORGANIZATION_NAME: &str = "Helping Hands";
pub(crate) const ORGANIZATION_EMAIL: &str = "desk@helpinghands.example";
pub(crate) const ORGANIZATION_PHONE: &str = "9123456780";
pub(crate) const ORGANIZATION_PASSWORD: &str = "p1ckup&Crate";
pub(crate) const REGISTRATION_ID: &str = "TN-REG-4311";

/// Which stored session cookie a request should carry.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Identity {
    Anonymous,
    Donor,
    Organization,
}

pub(crate) struct JsonRequest<'a> {
    pub(crate) identity: Identity,
    pub(crate) method: Method,
    pub(crate) path: &'a str,
    pub(crate) payload: Option<Value>,
}

struct CapturedResponse {
    status: u16,
    trace_id: Option<String>,
    set_cookie: Option<String>,
    body: Option<Value>,
}

fn record_response(world: &SharedWorld, captured: &CapturedResponse) {
    let mut ctx = world.borrow_mut();
    ctx.last_status = Some(captured.status);
    ctx.last_trace_id = captured.trace_id.clone();
    ctx.last_body = captured.body.clone();
}

fn cookie_pair(world: &SharedWorld, identity: Identity) -> Option<String> {
    let ctx = world.borrow();
    let stored = match identity {
        Identity::Anonymous => return None,
        Identity::Donor => ctx.donor_cookie.clone(),
        Identity::Organization => ctx.organization_cookie.clone(),
    };
    let header_value = stored.expect("session cookie for the requested role");
    Some(
        header_value
            .split(';')
            .next()
            .expect("cookie pair")
            .to_owned(),
    )
}

fn parse_json_body(bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(bytes).expect("json body"))
    }
}

async fn send_request(
    base_url: String,
    cookie: Option<String>,
    method: Method,
    path: String,
    payload: Option<Value>,
) -> CapturedResponse {
    let mut request = Client::default().request(method, format!("{base_url}{path}"));
    if let Some(cookie) = cookie {
        request = request.insert_header((header::COOKIE, cookie));
    }
    let mut response = match payload {
        Some(payload) => request.send_json(&payload).await.expect("json request"),
        None => request.send().await.expect("request"),
    };
    let status = response.status().as_u16();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);
    let body = response.body().await.expect("body");

    CapturedResponse {
        status,
        trace_id,
        set_cookie,
        body: parse_json_body(&body),
    }
}

fn perform(world: &SharedWorld, spec: JsonRequest<'_>) -> CapturedResponse {
    let cookie = cookie_pair(world, spec.identity);
    let path = spec.path.to_owned();
    let captured = with_world_async(world, |base_url| {
        send_request(base_url, cookie, spec.method, path, spec.payload)
    });
    record_response(world, &captured);
    captured
}

pub(crate) fn perform_json_request(world: &SharedWorld, spec: JsonRequest<'_>) {
    perform(world, spec);
}

fn donor_registration_payload(email: &str) -> Value {
    json!({
        "name": DONOR_NAME,
        "email": email,
        "phone": DONOR_PHONE,
        "address": {
            "street": "21 Baker Street",
            "city": "Coimbatore",
            "district": "Coimbatore",
            "state": "Tamil Nadu",
            "postalCode": "641001"
        },
        "password": DONOR_PASSWORD,
        "confirmPassword": DONOR_PASSWORD
    })
}

fn organization_registration_payload(email: &str) -> Value {
    json!({
        "organizationName": ORGANIZATION_NAME,
        "registrationId": REGISTRATION_ID,
        "ownerName": "Grace Hopper",
        "email": email,
        "phone": ORGANIZATION_PHONE,
        "address": {
            "street": "4 Harbour Road",
            "city": "Chennai",
            "district": "Chennai",
            "state": "Tamil Nadu",
            "postalCode": "600001"
        },
        "password": ORGANIZATION_PASSWORD,
        "confirmPassword": ORGANIZATION_PASSWORD
    })
}

/// Register the fixture donor, recording the response for later assertions.
pub(crate) fn register_donor_account(world: &SharedWorld) {
    perform_json_request(
        world,
        JsonRequest {
            identity: Identity::Anonymous,
            method: Method::POST,
            path: "/api/v1/donors/register",
            payload: Some(donor_registration_payload(DONOR_EMAIL)),
        },
    );
}

/// Register the fixture organization under the given email.
pub(crate) fn register_organization_account(world: &SharedWorld, email: &str) {
    perform_json_request(
        world,
        JsonRequest {
            identity: Identity::Anonymous,
            method: Method::POST,
            path: "/api/v1/organizations/register",
            payload: Some(organization_registration_payload(email)),
        },
    );
}

/// Sign the donor in and stash the session cookie under the donor slot.
pub(crate) fn sign_in_donor(world: &SharedWorld, email: &str, password: &str) {
    let captured = perform(
        world,
        JsonRequest {
            identity: Identity::Anonymous,
            method: Method::POST,
            path: "/api/v1/donors/login",
            payload: Some(json!({ "email": email, "password": password })),
        },
    );
    if captured.status == 200 {
        world.borrow_mut().donor_cookie = captured.set_cookie;
    }
}

/// Sign the organization in. When `identity` carries the donor cookie the
/// refreshed cookie now holds both identities, so it is stored under both
/// slots.
pub(crate) fn sign_in_organization(
    world: &SharedWorld,
    identity: Identity,
    credentials: &OrganizationCredentials<'_>,
) {
    let captured = perform(
        world,
        JsonRequest {
            identity,
            method: Method::POST,
            path: "/api/v1/organizations/login",
            payload: Some(json!({
                "email": credentials.email,
                "password": credentials.password,
                "registrationId": credentials.registration_id,
            })),
        },
    );
    if captured.status == 200 {
        let mut ctx = world.borrow_mut();
        if identity == Identity::Donor {
            ctx.donor_cookie.clone_from(&captured.set_cookie);
        }
        ctx.organization_cookie = captured.set_cookie;
    }
}

pub(crate) struct OrganizationCredentials<'a> {
    pub(crate) email: &'a str,
    pub(crate) password: &'a str,
    pub(crate) registration_id: &'a str,
}

impl Default for OrganizationCredentials<'_> {
    fn default() -> Self {
        Self {
            email: ORGANIZATION_EMAIL,
            password: ORGANIZATION_PASSWORD,
            registration_id: REGISTRATION_ID,
        }
    }
}

/// Sign out with the given identity's cookie. The purged cookie replaces
/// both stored cookies, as a browser would replace its one session cookie.
pub(crate) fn sign_out(world: &SharedWorld, identity: Identity) {
    let captured = perform(
        world,
        JsonRequest {
            identity,
            method: Method::POST,
            path: "/api/v1/logout",
            payload: None,
        },
    );
    if let Some(purged) = captured.set_cookie {
        let mut ctx = world.borrow_mut();
        ctx.donor_cookie = Some(purged.clone());
        ctx.organization_cookie = Some(purged);
    }
}

/// Submit a donation as the signed-in donor and stash the returned order id.
pub(crate) fn submit_donation(world: &SharedWorld, category_path: &str, items: Value) {
    let mut payload = items;
    payload["organizationName"] = Value::String(ORGANIZATION_NAME.to_owned());
    let captured = perform(
        world,
        JsonRequest {
            identity: Identity::Donor,
            method: Method::POST,
            path: category_path,
            payload: Some(payload),
        },
    );
    if captured.status == 201 {
        world.borrow_mut().order_id = captured
            .body
            .as_ref()
            .and_then(|body| body.get("orderId"))
            .and_then(Value::as_str)
            .map(ToOwned::to_owned);
    }
}

pub(crate) fn stored_order_id(world: &SharedWorld) -> String {
    world.borrow().order_id.clone().expect("submitted order id")
}

/// Drive an accept/reject/collect transition as the organization.
pub(crate) fn transition_donation(world: &SharedWorld, path: &str, extra: Option<(&str, &str)>) {
    let mut payload = json!({
        "orderId": stored_order_id(world),
        "donorEmail": DONOR_EMAIL,
    });
    if let Some((key, value)) = extra {
        payload[key] = Value::String(value.to_owned());
    }
    perform_json_request(
        world,
        JsonRequest {
            identity: Identity::Organization,
            method: Method::POST,
            path,
            payload: Some(payload),
        },
    );
}

/// Block until the capture log holds `count` messages, newest last.
pub(crate) fn delivered_mail(world: &SharedWorld, count: usize) -> Vec<MailMessage> {
    let mailer = world.borrow().mailer.clone();
    let ctx = world.borrow();
    ctx.local
        .block_on(&ctx.runtime, wait_for_mail(&mailer, count))
}

/// The parsed body of the last response, panicking when there was none.
pub(crate) fn last_json(world: &SharedWorld) -> Value {
    world.borrow().last_body.clone().expect("response body")
}

pub(crate) fn assert_last_status(world: &SharedWorld, expected: u16) {
    assert_eq!(world.borrow().last_status, Some(expected));
}

/// Assert the last response was the given error, with the trace id echoed in
/// the body.
pub(crate) fn assert_error_response(world: &SharedWorld, status: u16, code: &str, message: &str) {
    assert_last_status(world, status);
    let ctx = world.borrow();
    let body = ctx.last_body.as_ref().expect("error body");
    assert_eq!(body.get("code").and_then(Value::as_str), Some(code));
    assert_eq!(body.get("message").and_then(Value::as_str), Some(message));
    let trace_id = ctx.last_trace_id.as_deref().expect("trace id header");
    assert_eq!(body.get("traceId").and_then(Value::as_str), Some(trace_id));
}
