//! Driving port for account registration.
//!
//! Inbound adapters call this port to open donor and organization accounts
//! without knowing which repositories back them.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::accounts::{Donor, DonorRegistration, Organization, OrganizationRegistration};

/// Driving port for opening accounts in either namespace.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationCommand: Send + Sync {
    /// Validate and persist a donor registration.
    ///
    /// Field and password-policy validation runs before the store is
    /// consulted; an email already holding a donor account is a conflict.
    async fn register_donor(&self, registration: DonorRegistration) -> Result<Donor, Error>;

    /// Validate and persist an organization registration.
    ///
    /// Beyond the donor checks, the organization name must also be free:
    /// donation submissions address organizations by name.
    async fn register_organization(
        &self,
        registration: OrganizationRegistration,
    ) -> Result<Organization, Error>;
}
