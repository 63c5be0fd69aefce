//! HTTP server configuration object and helpers.

use actix_web::cookie::{Key, SameSite};
use backend::outbound::mail::MailerConfig;
use backend::outbound::persistence::MongoHandle;
use std::net::SocketAddr;

/// Origin used in emailed links when `PUBLIC_BASE_URL` is not set.
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: Option<MongoHandle>,
    pub(crate) mail: Option<MailerConfig>,
    pub(crate) public_base_url: String,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            store: None,
            mail: None,
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_owned(),
        }
    }

    /// Attach a MongoDB handle for the persistence adapters.
    ///
    /// When provided, the server keeps accounts, donation histories, and
    /// notification feeds in MongoDB; otherwise everything lives in process
    /// memory and vanishes on restart.
    #[must_use]
    pub fn with_store(mut self, store: MongoHandle) -> Self {
        self.store = Some(store);
        self
    }

    /// Attach a mail API configuration for outbound email.
    ///
    /// Without one, mail is logged instead of sent.
    #[must_use]
    pub fn with_mailer(mut self, mail: MailerConfig) -> Self {
        self.mail = Some(mail);
        self
    }

    /// Set the public origin emailed password-reset links point at.
    #[must_use]
    pub fn with_public_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.public_base_url = base_url.into();
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(
            dead_code,
            reason = "Exercised by integration tests; retained for fixture access"
        )
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
