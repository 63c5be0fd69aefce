//! Tests for the donor and organization profile handlers.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use serde_json::Value;

use super::*;
use crate::domain::accounts::{EmailAddress, PostalAddress, PostalAddressParts};
use crate::domain::donations::{
    DonationCategory, DonationCore, DonationItem, DonationStatus, DonorFacingRecord, OrderId,
};
use crate::domain::ports::{DonorProfile, DropOff, OrganizationProfile};
use crate::inbound::http::test_utils::MockPorts;

fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(crate::inbound::http::test_utils::test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(donor_donations)
                .service(donor_profile)
                .service(organization_donations)
                .service(organization_profile)
                .route(
                    "/identify/donor",
                    web::post().to(|session: SessionContext| async move {
                        let email =
                            EmailAddress::parse("ada@example.org").expect("fixture email parses");
                        session.persist_donor(&email)?;
                        Ok::<_, Error>(HttpResponse::NoContent().finish())
                    }),
                )
                .route(
                    "/identify/organization",
                    web::post().to(|session: SessionContext| async move {
                        let email = EmailAddress::parse("contact@helpinghands.example")
                            .expect("fixture email parses");
                        session.persist_organization(&email)?;
                        Ok::<_, Error>(HttpResponse::NoContent().finish())
                    }),
                ),
        )
}

async fn identity_cookie(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    path: &str,
) -> actix_web::cookie::Cookie<'static> {
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post().uri(path).to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

fn donor_record() -> DonorFacingRecord {
    DonorFacingRecord {
        core: DonationCore {
            order_id: OrderId::from_stored("ord-11".into()),
            date: "9/14/2025".into(),
            category: DonationCategory::Food,
            items: vec![DonationItem {
                name: "Rice".into(),
                quantity: 5,
            }],
            status: DonationStatus::Pending,
            pickup_time: None,
        },
        organization_name: "Helping Hands".into(),
        organization_phone: "9123456780".into(),
        address: PostalAddress::from_stored(
            "21 Baker Street/Coimbatore/Coimbatore/Tamil Nadu/641001".into(),
        ),
    }
}

fn fixture_address() -> PostalAddressParts {
    PostalAddressParts {
        street: "21 Baker Street".into(),
        city: "Coimbatore".into(),
        district: "Coimbatore".into(),
        state: "Tamil Nadu".into(),
        postal_code: "641001".into(),
    }
}

#[actix_web::test]
async fn donor_history_lists_the_donor_records() {
    let mut ports = MockPorts::default();
    ports
        .donations_query
        .expect_donor_history()
        .withf(|email| email.as_str() == "ada@example.org")
        .returning(|_| Ok(vec![donor_record()]));
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = identity_cookie(&app, "/api/v1/identify/donor").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/donors/me/donations")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    let first = body.get(0).expect("one record returned");
    assert_eq!(first.get("orderId").and_then(Value::as_str), Some("ord-11"));
    assert_eq!(
        first.get("organizationName").and_then(Value::as_str),
        Some("Helping Hands")
    );
    assert_eq!(first.get("status").and_then(Value::as_str), Some("Pending"));
    assert!(
        first.get("pickupTime").is_none(),
        "unset pickup time must be omitted"
    );
}

#[actix_web::test]
async fn donor_history_requires_a_donor_login() {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/donors/me/donations")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn donor_profile_counts_every_donation() {
    let mut ports = MockPorts::default();
    ports
        .donations_query
        .expect_donor_profile()
        .returning(|_| {
            Ok(DonorProfile {
                name: "Ada Lovelace".into(),
                email: EmailAddress::parse("ada@example.org").expect("fixture email parses"),
                phone: "9876543210".into(),
                address: fixture_address(),
                total_donations: 3,
            })
        });
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = identity_cookie(&app, "/api/v1/identify/donor").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/donors/me/profile")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.get("totalDonations").and_then(Value::as_u64),
        Some(3)
    );
    assert!(
        body.get("password").is_none(),
        "credentials must not appear in profiles"
    );
}

#[actix_web::test]
async fn organization_donations_pass_the_selected_filter() {
    let mut ports = MockPorts::default();
    ports
        .donations_query
        .expect_organization_donations()
        .withf(|email, filter| {
            email.as_str() == "contact@helpinghands.example"
                && matches!(filter, DonationFilter::Settled)
        })
        .returning(|_, _| Ok(Vec::new()));
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = identity_cookie(&app, "/api/v1/identify/organization").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/organizations/me/donations?filter=settled")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_web::test]
async fn organization_donations_require_the_filter() {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state())).await;
    let cookie = identity_cookie(&app, "/api/v1/identify/organization").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/organizations/me/donations")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.pointer("/details/field").and_then(Value::as_str),
        Some("filter")
    );
}

#[actix_web::test]
async fn organization_donations_reject_unknown_filters() {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state())).await;
    let cookie = identity_cookie(&app, "/api/v1/identify/organization").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/organizations/me/donations?filter=done")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.pointer("/details/value").and_then(Value::as_str),
        Some("done")
    );
}

#[actix_web::test]
async fn organization_profile_includes_the_drop_off_list() {
    let mut ports = MockPorts::default();
    ports
        .donations_query
        .expect_organization_profile()
        .returning(|_| {
            Ok(OrganizationProfile {
                organization_name: "Helping Hands".into(),
                registration_id: "NGO-2291".into(),
                owner_name: "Grace Hopper".into(),
                email: EmailAddress::parse("contact@helpinghands.example")
                    .expect("fixture email parses"),
                phone: "9123456780".into(),
                address: PostalAddressParts {
                    street: "4 Relief Road".into(),
                    city: "Chennai".into(),
                    district: "Chennai".into(),
                    state: "Tamil Nadu".into(),
                    postal_code: "600001".into(),
                },
                total_received: 2,
                drop_offs: vec![DropOff {
                    donor_name: "Ada Lovelace".into(),
                    address: PostalAddress::from_stored(
                        "21 Baker Street/Coimbatore/Coimbatore/Tamil Nadu/641001".into(),
                    ),
                    status: DonationStatus::Accepted,
                }],
            })
        });
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = identity_cookie(&app, "/api/v1/identify/organization").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/organizations/me/profile")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.get("totalReceived").and_then(Value::as_u64),
        Some(2)
    );
    assert_eq!(
        body.pointer("/dropOffs/0/donorName").and_then(Value::as_str),
        Some("Ada Lovelace")
    );
    assert_eq!(
        body.pointer("/dropOffs/0/status").and_then(Value::as_str),
        Some("Accepted")
    );
}

#[actix_web::test]
async fn organization_views_reject_a_donor_login() {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state())).await;
    let cookie = identity_cookie(&app, "/api/v1/identify/donor").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/organizations/me/profile")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
