//! Shared helpers for integration tests.
//!
//! Compiled only with the `test-support` feature, which the crate turns on
//! for its own dev-dependency so suites under `tests/` can assemble a real
//! application over in-memory stores.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::web;
use async_trait::async_trait;
use mockable::{Clock, DefaultClock};

use crate::domain::mail::MailMessage;
use crate::domain::ports::{Mailer, MailerError};
use crate::domain::{AccountService, DonationService, NotificationService, PasswordResetService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::mail::LogMailer;
use crate::outbound::persistence::InMemoryStores;

/// Public origin reset links point at in test mail.
pub const TEST_BASE_URL: &str = "https://foodbridge.test";

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

/// An assembled in-memory application backend.
pub struct TestBackend {
    /// The shared store behind every port, for direct seeding and inspection.
    pub stores: InMemoryStores,
    /// Handler state wired over the store.
    pub state: web::Data<HttpState>,
}

/// Assemble handler state over in-memory stores and a log-only mailer.
#[must_use]
pub fn in_memory_backend() -> TestBackend {
    in_memory_backend_with(Arc::new(LogMailer::new()), Arc::new(DefaultClock))
}

/// Assemble handler state with explicit mail and clock implementations.
#[must_use]
pub fn in_memory_backend_with(mailer: Arc<dyn Mailer>, clock: Arc<dyn Clock>) -> TestBackend {
    let stores = InMemoryStores::new();
    let store = || Arc::new(stores.clone());

    let accounts = Arc::new(AccountService::new(store(), store()));
    let donations = Arc::new(DonationService::new(
        store(),
        store(),
        store(),
        store(),
        Arc::clone(&mailer),
        Arc::clone(&clock),
    ));
    let notifications = Arc::new(NotificationService::new(store()));
    let password_resets = Arc::new(PasswordResetService::new(
        store(),
        store(),
        mailer,
        clock,
        TEST_BASE_URL.to_owned(),
    ));

    let state = web::Data::new(HttpState::new(HttpStatePorts {
        registration: accounts.clone(),
        login: accounts,
        donations: donations.clone(),
        donations_query: donations,
        notifications: notifications.clone(),
        notifications_query: notifications,
        password_resets,
    }));

    TestBackend { stores, state }
}

/// Mailer that records every message for later assertions.
#[derive(Clone, Default)]
pub struct CapturingMailer {
    sent: Arc<Mutex<Vec<MailMessage>>>,
}

impl CapturingMailer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().expect("mail log poisoned").clone()
    }
}

#[async_trait]
impl Mailer for CapturingMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailerError> {
        self.sent
            .lock()
            .expect("mail log poisoned")
            .push(message.clone());
        Ok(())
    }
}

/// Mailer that always fails; mutations must succeed regardless.
#[derive(Clone, Copy, Default)]
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _message: &MailMessage) -> Result<(), MailerError> {
        Err(MailerError::transport("mail API is down"))
    }
}

/// Wait until the capturing mailer holds at least `count` messages.
///
/// Sends ride on spawned tasks, so tests poll briefly instead of racing the
/// runtime.
pub async fn wait_for_mail(mailer: &CapturingMailer, count: usize) -> Vec<MailMessage> {
    for _ in 0..200 {
        let sent = mailer.sent();
        if sent.len() >= count {
            return sent;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "expected at least {count} mail message(s); got {}",
        mailer.sent().len()
    );
}
