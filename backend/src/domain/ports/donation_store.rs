//! Port abstraction for the mirrored donation store and its errors.
use async_trait::async_trait;

use crate::domain::accounts::EmailAddress;
use crate::domain::donations::{
    DonationFilter, DonationTransition, DonorFacingRecord, MirroredDonation, OrderId,
    OrganizationFacingRecord,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by donation store adapters.
    pub enum DonationStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "donation store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "donation store query failed: {message}",
        /// One of the accounts a mirrored write addresses does not exist.
        MissingAccount { email: String } => "no account holds donations for {email}",
        /// No donation with the order id exists under the addressed account.
        MissingRecord { order_id: String } => "no donation with order id {order_id}",
    }
}

/// Port for the mirrored donation records.
///
/// Both mutations touch the donor copy and the organization copy of a
/// donation as one atomic operation; adapters must never leave one side
/// written and the other not.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonationStore: Send + Sync {
    /// Append both copies of a freshly submitted donation.
    async fn record_mirrored(&self, donation: &MirroredDonation) -> Result<(), DonationStoreError>;

    /// Apply a status transition to both copies of a donation.
    ///
    /// Fails with [`DonationStoreError::MissingRecord`] when either copy is
    /// absent, in which case nothing is written.
    async fn apply_mirrored_transition(
        &self,
        donor_email: &EmailAddress,
        organization_email: &EmailAddress,
        order_id: &OrderId,
        transition: &DonationTransition,
    ) -> Result<(), DonationStoreError>;

    /// Every record under the donor, in submission order.
    ///
    /// An email no donor holds reads as an empty history, not an error.
    async fn donor_history(
        &self,
        donor_email: &EmailAddress,
    ) -> Result<Vec<DonorFacingRecord>, DonationStoreError>;

    /// Records under the organization, optionally restricted to one slice.
    ///
    /// `None` returns the full history, in submission order. An email no
    /// organization holds reads as empty, not an error.
    async fn organization_donations(
        &self,
        organization_email: &EmailAddress,
        filter: Option<DonationFilter>,
    ) -> Result<Vec<OrganizationFacingRecord>, DonationStoreError>;
}
