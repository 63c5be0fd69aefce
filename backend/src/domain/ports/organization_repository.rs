//! Port abstraction for organization account persistence adapters and their
//! errors.
use async_trait::async_trait;
use credentials::{HashedPassword, ResetGrant, TokenFingerprint};

use crate::domain::accounts::{EmailAddress, Organization};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by organization repository adapters.
    pub enum OrganizationPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "organization repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "organization repository query failed: {message}",
        /// A mutation addressed an account that does not exist.
        MissingAccount { email: String } => "no organization account for {email}",
    }
}

/// Port for organization account reads and writes.
///
/// Both the email and the organization name are unique within the
/// organization population; donation submissions address organizations by
/// name, so the name lookup is an exact match too.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Persist a freshly registered organization.
    async fn insert(&self, organization: &Organization) -> Result<(), OrganizationPersistenceError>;

    /// Fetch an organization by email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Organization>, OrganizationPersistenceError>;

    /// Fetch an organization by its registered name.
    async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Organization>, OrganizationPersistenceError>;

    /// Every registered organization, for the donation form's target picker.
    async fn list_all(&self) -> Result<Vec<Organization>, OrganizationPersistenceError>;

    /// Fetch the organization holding an outstanding reset grant, if any.
    async fn find_by_reset_fingerprint(
        &self,
        fingerprint: &TokenFingerprint,
    ) -> Result<Option<Organization>, OrganizationPersistenceError>;

    /// Attach a reset grant to the account, replacing any previous one.
    async fn store_reset_grant(
        &self,
        email: &EmailAddress,
        grant: &ResetGrant,
    ) -> Result<(), OrganizationPersistenceError>;

    /// Store the new password hash and clear the reset grant in one update.
    async fn complete_password_reset(
        &self,
        email: &EmailAddress,
        password: &HashedPassword,
    ) -> Result<(), OrganizationPersistenceError>;
}
