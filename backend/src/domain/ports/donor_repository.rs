//! Port abstraction for donor account persistence adapters and their errors.
use async_trait::async_trait;
use credentials::{HashedPassword, ResetGrant, TokenFingerprint};

use crate::domain::accounts::{Donor, EmailAddress};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by donor repository adapters.
    pub enum DonorPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "donor repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "donor repository query failed: {message}",
        /// A mutation addressed an account that does not exist.
        MissingAccount { email: String } => "no donor account for {email}",
    }
}

/// Port for donor account reads and writes.
///
/// Emails are unique within the donor population; lookups are exact matches
/// on the stored address.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonorRepository: Send + Sync {
    /// Persist a freshly registered donor.
    async fn insert(&self, donor: &Donor) -> Result<(), DonorPersistenceError>;

    /// Fetch a donor by email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Donor>, DonorPersistenceError>;

    /// Fetch the donor holding an outstanding reset grant, if any.
    async fn find_by_reset_fingerprint(
        &self,
        fingerprint: &TokenFingerprint,
    ) -> Result<Option<Donor>, DonorPersistenceError>;

    /// Attach a reset grant to the account, replacing any previous one.
    async fn store_reset_grant(
        &self,
        email: &EmailAddress,
        grant: &ResetGrant,
    ) -> Result<(), DonorPersistenceError>;

    /// Store the new password hash and clear the reset grant in one update.
    async fn complete_password_reset(
        &self,
        email: &EmailAddress,
        password: &HashedPassword,
    ) -> Result<(), DonorPersistenceError>;
}
