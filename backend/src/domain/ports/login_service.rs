//! Driving port for login use-cases.
//!
//! Inbound adapters call this port to verify credentials before persisting
//! an identity into the session, so handler tests can substitute a test
//! double instead of wiring repositories and password hashing.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::accounts::{Donor, Organization};

/// Driving port for credential verification in either namespace.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify donor credentials and return the account.
    async fn login_donor(&self, email: &str, password: &str) -> Result<Donor, Error>;

    /// Verify organization credentials and return the account.
    ///
    /// Three factors, checked in order: email, password, and the
    /// operator-issued registration identifier quoted at signup.
    async fn login_organization(
        &self,
        email: &str,
        password: &str,
        registration_id: &str,
    ) -> Result<Organization, Error>;
}
