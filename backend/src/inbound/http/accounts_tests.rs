//! Tests for the account registration, login, and logout handlers.

use actix_web::{App, HttpResponse, test as actix_test, web};
use credentials::HashedPassword;
use rstest::rstest;
use serde_json::Value;

use super::*;
use crate::domain::Error;
use crate::inbound::http::test_utils::MockPorts;

fn stored_donor() -> Donor {
    Donor {
        name: "Ada Lovelace".into(),
        email: EmailAddress::parse("ada@example.org").expect("fixture email parses"),
        phone: "9876543210".into(),
        address: PostalAddressParts {
            street: "21 Baker Street".into(),
            city: "Coimbatore".into(),
            district: "Coimbatore".into(),
            state: "Tamil Nadu".into(),
            postal_code: "641001".into(),
        },
        password: HashedPassword::from_plaintext("s3cret!pass").expect("test hashing succeeds"),
        reset_grant: None,
    }
}

fn stored_organization() -> Organization {
    Organization {
        organization_name: "Helping Hands".into(),
        registration_id: "NGO-2291".into(),
        owner_name: "Grace Hopper".into(),
        email: EmailAddress::parse("contact@helpinghands.example").expect("fixture email parses"),
        phone: "9123456780".into(),
        address: PostalAddressParts {
            street: "4 Relief Road".into(),
            city: "Chennai".into(),
            district: "Chennai".into(),
            state: "Tamil Nadu".into(),
            postal_code: "600001".into(),
        },
        password: HashedPassword::from_plaintext("f33d&share").expect("test hashing succeeds"),
        reset_grant: None,
    }
}

fn donor_register_request() -> DonorRegisterRequest {
    DonorRegisterRequest {
        name: "Ada Lovelace".into(),
        email: "ada@example.org".into(),
        phone: "9876543210".into(),
        address: PostalAddressParts {
            street: "21 Baker Street".into(),
            city: "Coimbatore".into(),
            district: "Coimbatore".into(),
            state: "Tamil Nadu".into(),
            postal_code: "641001".into(),
        },
        password: "s3cret!pass".into(),
        confirm_password: "s3cret!pass".into(),
    }
}

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
                .service(register_donor)
                .service(register_organization)
                .service(login_donor)
                .service(login_organization)
                .service(logout)
                .route(
                    "/probe/donor",
                    web::get().to(|session: SessionContext| async move {
                        let email = session.require_donor()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(email.to_string()))
                    }),
                )
                .route(
                    "/probe/organization",
                    web::get().to(|session: SessionContext| async move {
                        let email = session.require_organization()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(email.to_string()))
                    }),
                ),
        )
}

fn session_cookie(
    response: &actix_web::dev::ServiceResponse,
) -> actix_web::cookie::Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

#[actix_web::test]
async fn register_donor_returns_created_summary() {
    let mut ports = MockPorts::default();
    ports
        .registration
        .expect_register_donor()
        .withf(|registration| {
            registration.name == "Ada Lovelace"
                && registration.email == "ada@example.org"
                && registration.address.postal_code == "641001"
                && registration.password == "s3cret!pass"
                && registration.confirm_password == "s3cret!pass"
        })
        .returning(|_| Ok(stored_donor()));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/donors/register")
            .set_json(donor_register_request())
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), actix_web::http::StatusCode::CREATED);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        value.get("email").and_then(Value::as_str),
        Some("ada@example.org")
    );
    assert_eq!(
        value
            .pointer("/address/postalCode")
            .and_then(Value::as_str),
        Some("641001")
    );
    assert!(
        value.get("password").is_none(),
        "credentials must not appear in summaries"
    );
}

#[rstest]
#[case(
    Error::invalid_request("name must not be empty"),
    actix_web::http::StatusCode::BAD_REQUEST,
    "invalid_request"
)]
#[case(
    Error::conflict("a donor account already exists for this email"),
    actix_web::http::StatusCode::CONFLICT,
    "conflict"
)]
#[actix_web::test]
async fn register_donor_maps_domain_failures(
    #[case] error: Error,
    #[case] expected_status: actix_web::http::StatusCode,
    #[case] expected_code: &str,
) {
    let mut ports = MockPorts::default();
    ports
        .registration
        .expect_register_donor()
        .return_once(move |_| Err(error));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/donors/register")
            .set_json(donor_register_request())
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), expected_status);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        value.get("code").and_then(Value::as_str),
        Some(expected_code)
    );
}

#[actix_web::test]
async fn register_organization_returns_created_summary() {
    let mut ports = MockPorts::default();
    ports
        .registration
        .expect_register_organization()
        .withf(|registration| {
            registration.organization_name == "Helping Hands"
                && registration.registration_id == "NGO-2291"
                && registration.owner_name == "Grace Hopper"
        })
        .returning(|_| Ok(stored_organization()));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/organizations/register")
            .set_json(OrganizationRegisterRequest {
                organization_name: "Helping Hands".into(),
                registration_id: "NGO-2291".into(),
                owner_name: "Grace Hopper".into(),
                email: "contact@helpinghands.example".into(),
                phone: "9123456780".into(),
                address: PostalAddressParts {
                    street: "4 Relief Road".into(),
                    city: "Chennai".into(),
                    district: "Chennai".into(),
                    state: "Tamil Nadu".into(),
                    postal_code: "600001".into(),
                },
                password: "f33d&share".into(),
                confirm_password: "f33d&share".into(),
            })
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), actix_web::http::StatusCode::CREATED);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        value.get("organizationName").and_then(Value::as_str),
        Some("Helping Hands")
    );
    assert_eq!(
        value.get("registrationId").and_then(Value::as_str),
        Some("NGO-2291")
    );
}

#[actix_web::test]
async fn login_donor_establishes_the_donor_identity() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_login_donor()
        .withf(|email, password| email == "ada@example.org" && password == "s3cret!pass")
        .returning(|_, _| Ok(stored_donor()));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let login_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/donors/login")
            .set_json(DonorLoginRequest {
                email: "ada@example.org".into(),
                password: "s3cret!pass".into(),
            })
            .to_request(),
    )
    .await;
    assert_eq!(login_res.status(), actix_web::http::StatusCode::OK);
    let cookie = session_cookie(&login_res);
    let value: Value = actix_test::read_body_json(login_res).await;
    assert_eq!(value.get("name").and_then(Value::as_str), Some("Ada Lovelace"));

    let probe_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/probe/donor")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(probe_res.status(), actix_web::http::StatusCode::OK);
    let body = actix_test::read_body(probe_res).await;
    assert_eq!(body, "ada@example.org");
}

#[actix_web::test]
async fn login_organization_checks_the_registration_id() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_login_organization()
        .withf(|email, password, registration_id| {
            email == "contact@helpinghands.example"
                && password == "f33d&share"
                && registration_id == "NGO-2291"
        })
        .returning(|_, _, _| Ok(stored_organization()));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let login_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/organizations/login")
            .set_json(OrganizationLoginRequest {
                email: "contact@helpinghands.example".into(),
                password: "f33d&share".into(),
                registration_id: "NGO-2291".into(),
            })
            .to_request(),
    )
    .await;
    assert_eq!(login_res.status(), actix_web::http::StatusCode::OK);
    let cookie = session_cookie(&login_res);

    let probe_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/probe/organization")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(probe_res.status(), actix_web::http::StatusCode::OK);
    let body = actix_test::read_body(probe_res).await;
    assert_eq!(body, "contact@helpinghands.example");
}

#[actix_web::test]
async fn login_rejects_bad_credentials_as_invalid_request() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_login_donor()
        .returning(|_, _| Err(Error::invalid_request("incorrect password")));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/donors/login")
            .set_json(DonorLoginRequest {
                email: "ada@example.org".into(),
                password: "wrong".into(),
            })
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some("incorrect password")
    );
}

#[actix_web::test]
async fn logout_purges_the_session() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_login_donor()
        .returning(|_, _| Ok(stored_donor()));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let login_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/donors/login")
            .set_json(DonorLoginRequest {
                email: "ada@example.org".into(),
                password: "s3cret!pass".into(),
            })
            .to_request(),
    )
    .await;
    let cookie = session_cookie(&login_res);

    let logout_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(
        logout_res.status(),
        actix_web::http::StatusCode::NO_CONTENT
    );
    let cleared = session_cookie(&logout_res);

    let probe_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/probe/donor")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    assert_eq!(
        probe_res.status(),
        actix_web::http::StatusCode::UNAUTHORIZED
    );
}
