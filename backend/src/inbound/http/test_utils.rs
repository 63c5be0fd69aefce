//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::web;

use crate::domain::ports::{
    MockDonationCommand, MockDonationQuery, MockLoginService, MockNotificationCommand,
    MockNotificationQuery, MockPasswordResetCommand, MockRegistrationCommand,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Mutable bundle of port mocks from which handler tests assemble state.
///
/// Fresh mocks carry no expectations, so any port a test does not stub
/// panics when touched; each test configures only the ports its route
/// exercises before calling [`MockPorts::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub registration: MockRegistrationCommand,
    pub login: MockLoginService,
    pub donations: MockDonationCommand,
    pub donations_query: MockDonationQuery,
    pub notifications: MockNotificationCommand,
    pub notifications_query: MockNotificationQuery,
    pub password_resets: MockPasswordResetCommand,
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            registration: Arc::new(self.registration),
            login: Arc::new(self.login),
            donations: Arc::new(self.donations),
            donations_query: Arc::new(self.donations_query),
            notifications: Arc::new(self.notifications),
            notifications_query: Arc::new(self.notifications_query),
            password_resets: Arc::new(self.password_resets),
        }))
    }
}
