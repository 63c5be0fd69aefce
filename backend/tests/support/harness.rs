//! Server harness and shared world for the HTTP flow suites.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. The `WorldFixture` ensures the server
//! is stopped even if a test panics.
//!
//! Every suite runs against the full `/api/v1` route set over an in-memory
//! backend, so a scenario can register accounts, donate, and read feeds
//! without caring which suite it lives in. Outbound mail lands in a
//! [`CapturingMailer`] unless the suite asks for the failing variant.

use std::cell::RefCell;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite, time::Duration as CookieDuration};
use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

use backend::Trace;
use backend::domain::ports::Mailer;
use backend::inbound::http::accounts::{
    login_donor, login_organization, logout, register_donor, register_organization,
};
use backend::inbound::http::donations::{
    accept_donation, collect_donation, list_organizations, reject_donation, submit_food,
    submit_grocery,
};
use backend::inbound::http::notifications::{feed, mark_read};
use backend::inbound::http::password_reset::{forgot_password, reset_password};
use backend::inbound::http::profiles::{
    donor_donations, donor_profile, organization_donations, organization_profile,
};
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::InMemoryStores;
use backend::test_support::{CapturingMailer, FailingMailer, TestBackend, in_memory_backend_with};

pub(crate) struct FlowWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    /// The store behind every port, for seeding and direct inspection.
    pub(crate) stores: InMemoryStores,
    /// Captures outbound mail; empty when the world uses the failing mailer.
    pub(crate) mailer: CapturingMailer,
    pub(crate) donor_cookie: Option<String>,
    pub(crate) organization_cookie: Option<String>,
    /// Order id captured from the most recent submission.
    pub(crate) order_id: Option<String>,
    /// Raw reset token extracted from the most recent reset mail.
    pub(crate) reset_token: Option<String>,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_body: Option<Value>,
    pub(crate) last_trace_id: Option<String>,
}

pub(crate) type SharedWorld = Rc<RefCell<FlowWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        shutdown(self.world.clone());
    }
}

pub(crate) fn shutdown(world: SharedWorld) {
    // `LocalSet` must be driven on the thread that owns it, so we lock the world
    // while calling `block_on`. The future must not try to lock the world.
    let ctx = world.borrow();
    let server = ctx.server.clone();
    ctx.local.block_on(&ctx.runtime, async move {
        server.stop(true).await;
    });
}

pub(crate) fn with_world_async<R, F>(world: &SharedWorld, operation: impl FnOnce(String) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let base_url = ctx.base_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(base_url))
}

fn test_session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(PersistentSession::default().session_ttl(CookieDuration::hours(2)))
        .build()
}

async fn spawn_backend_server(state: web::Data<HttpState>) -> Result<(String, ServerHandle), String> {
    let key = Key::generate();
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;

    let server = HttpServer::new(move || {
        let api = web::scope("/api/v1")
            .wrap(test_session_middleware(key.clone()))
            .service(register_donor)
            .service(register_organization)
            .service(login_donor)
            .service(login_organization)
            .service(logout)
            .service(submit_food)
            .service(submit_grocery)
            .service(accept_donation)
            .service(reject_donation)
            .service(collect_donation)
            .service(list_organizations)
            .service(donor_donations)
            .service(donor_profile)
            .service(organization_donations)
            .service(organization_profile)
            .service(feed)
            .service(mark_read)
            .service(forgot_password)
            .service(reset_password);

        App::new().app_data(state.clone()).wrap(Trace).service(api)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok((format!("http://{addr}"), handle))
}

fn create_runtime_and_local() -> (Runtime, LocalSet) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();

    (runtime, local)
}

fn build_world(mail_port: Arc<dyn Mailer>, mailer: CapturingMailer) -> WorldFixture {
    let (runtime, local) = create_runtime_and_local();
    let TestBackend { stores, state } = in_memory_backend_with(mail_port, Arc::new(DefaultClock));

    let (base_url, server) = local
        .block_on(&runtime, async { spawn_backend_server(state).await })
        .expect("server should start");

    let world = Rc::new(RefCell::new(FlowWorld {
        runtime,
        local,
        base_url,
        server,
        stores,
        mailer,
        donor_cookie: None,
        organization_cookie: None,
        order_id: None,
        reset_token: None,
        last_status: None,
        last_body: None,
        last_trace_id: None,
    }));

    WorldFixture { world }
}

#[fixture]
pub(crate) fn world() -> WorldFixture {
    let mailer = CapturingMailer::new();
    build_world(Arc::new(mailer.clone()), mailer)
}

/// A world whose mail gateway rejects every message; the capture log stays
/// empty. Scenarios use it to show donation flows shrug off mail failures.
#[fixture]
pub(crate) fn mail_down_world() -> WorldFixture {
    build_world(Arc::new(FailingMailer), CapturingMailer::new())
}
