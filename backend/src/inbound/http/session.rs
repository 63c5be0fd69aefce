//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! One cookie can carry a donor identity, an organization identity, or both
//! at once; the two logins are independent. Handlers deal only in typed
//! per-role operations on this wrapper.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::Error;
use crate::domain::accounts::{AccountRef, AccountRole, EmailAddress};

pub(crate) const DONOR_EMAIL_KEY: &str = "donor_email";
pub(crate) const ORGANIZATION_EMAIL_KEY: &str = "organization_email";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated donor's email in the session cookie.
    pub fn persist_donor(&self, email: &EmailAddress) -> Result<(), Error> {
        self.persist(DONOR_EMAIL_KEY, email)
    }

    /// Persist the authenticated organization's email in the session cookie.
    pub fn persist_organization(&self, email: &EmailAddress) -> Result<(), Error> {
        self.persist(ORGANIZATION_EMAIL_KEY, email)
    }

    fn persist(&self, key: &str, email: &EmailAddress) -> Result<(), Error> {
        self.0
            .insert(key, email.as_str())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the logged-in donor's email from the session, if present.
    pub fn donor_email(&self) -> Result<Option<EmailAddress>, Error> {
        self.read(DONOR_EMAIL_KEY)
    }

    /// Fetch the logged-in organization's email from the session, if present.
    pub fn organization_email(&self) -> Result<Option<EmailAddress>, Error> {
        self.read(ORGANIZATION_EMAIL_KEY)
    }

    fn read(&self, key: &str) -> Result<Option<EmailAddress>, Error> {
        let value = self
            .0
            .get::<String>(key)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match value {
            Some(raw) => match EmailAddress::parse(raw) {
                Ok(email) => Ok(Some(email)),
                Err(error) => {
                    tracing::warn!(key, "invalid email in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require a donor login or return `401 Unauthorized`.
    pub fn require_donor(&self) -> Result<EmailAddress, Error> {
        self.donor_email()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Require an organization login or return `401 Unauthorized`.
    pub fn require_organization(&self) -> Result<EmailAddress, Error> {
        self.organization_email()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Resolve the identity behind a role-agnostic request.
    ///
    /// With an explicit role, that role's login is required. Without one,
    /// the donor login wins when both are present; a session holding
    /// neither is `401 Unauthorized`.
    pub fn require_identity(&self, role: Option<AccountRole>) -> Result<AccountRef, Error> {
        match role {
            Some(AccountRole::Donor) => Ok(AccountRef::donor(self.require_donor()?)),
            Some(AccountRole::Organization) => {
                Ok(AccountRef::organization(self.require_organization()?))
            }
            None => {
                if let Some(email) = self.donor_email()? {
                    return Ok(AccountRef::donor(email));
                }
                if let Some(email) = self.organization_email()? {
                    return Ok(AccountRef::organization(email));
                }
                Err(Error::unauthorized("login required"))
            }
        }
    }

    /// Drop every identity the session holds.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_session::Session;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().wrap(crate::inbound::http::test_utils::test_session_middleware())
    }

    fn fixture_email(raw: &str) -> EmailAddress {
        EmailAddress::parse(raw).expect("fixture email")
    }

    #[actix_web::test]
    async fn round_trips_donor_email() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_donor(&fixture_email("ada@example.org"))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let email = session.require_donor()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(email.to_string()))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        let body = test::read_body(get_res).await;
        assert_eq!(body, "ada@example.org");
    }

    #[actix_web::test]
    async fn both_roles_share_one_cookie() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set-both",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_donor(&fixture_email("ada@example.org"))?;
                        session.persist_organization(&fixture_email("org@example.org"))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get-organization",
                    web::get().to(|session: SessionContext| async move {
                        let donor = session.require_donor()?;
                        let organization = session.require_organization()?;
                        Ok::<_, Error>(
                            HttpResponse::Ok().body(format!("{donor} {organization}")),
                        )
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set-both").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get-organization")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(body, "ada@example.org org@example.org");
    }

    #[actix_web::test]
    async fn missing_identity_is_unauthorised() {
        let app = test::init_service(session_test_app().route(
            "/require",
            web::get().to(|session: SessionContext| async move {
                let _ = session.require_organization()?;
                Ok::<_, Error>(HttpResponse::Ok())
            }),
        ))
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/require").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn tampered_email_is_unauthorised() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(DONOR_EMAIL_KEY, "not an email")
                            .expect("set invalid email");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/require",
                    web::get().to(|session: SessionContext| async move {
                        let _ = session.require_donor()?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                ),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/require")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn identity_resolution_prefers_the_donor_login() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set-both",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_donor(&fixture_email("ada@example.org"))?;
                        session.persist_organization(&fixture_email("org@example.org"))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/identity",
                    web::get().to(|session: SessionContext| async move {
                        let ambient = session.require_identity(None)?;
                        let explicit =
                            session.require_identity(Some(AccountRole::Organization))?;
                        Ok::<_, Error>(HttpResponse::Ok().body(format!(
                            "{}:{} {}:{}",
                            ambient.role, ambient.email, explicit.role, explicit.email
                        )))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set-both").to_request()).await;
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/identity")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(
            body,
            "donor:ada@example.org organization:org@example.org"
        );
    }

    #[actix_web::test]
    async fn purge_drops_every_identity() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_donor(&fixture_email("ada@example.org"))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/logout",
                    web::get().to(|session: SessionContext| async move {
                        session.purge();
                        HttpResponse::NoContent()
                    }),
                )
                .route(
                    "/require",
                    web::get().to(|session: SessionContext| async move {
                        let _ = session.require_donor()?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let logout_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(logout_res.status(), StatusCode::NO_CONTENT);
        let cleared = logout_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("purge rewrites the session cookie");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/require")
                .cookie(cleared.into_owned())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
