//! Driving port for donation mutations.
//!
//! Submission and lifecycle transitions both write mirrored records under
//! the donor and the organization; adapters see only this contract and the
//! domain error taxonomy.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::accounts::EmailAddress;
use crate::domain::donations::{
    DonationSubmission, DonationTransition, OrderId, OrganizationFacingRecord,
};

/// Driving port for donation write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonationCommand: Send + Sync {
    /// Submit a donation to the organization the form names.
    ///
    /// Both mirrored records are written in one store operation before the
    /// organization is notified. A notification failure after that write
    /// surfaces as an internal error while the donation stays committed;
    /// the email is fire-and-forget either way.
    async fn submit(
        &self,
        donor_email: &EmailAddress,
        submission: DonationSubmission,
    ) -> Result<OrderId, Error>;

    /// Apply a transition to both copies of a donation and notify the donor.
    ///
    /// Returns the slice of the organization's records its screen shows
    /// next: the pending work list after accept or reject, the settled
    /// history after collect.
    async fn transition(
        &self,
        organization_email: &EmailAddress,
        donor_email: &EmailAddress,
        order_id: &OrderId,
        transition: DonationTransition,
    ) -> Result<Vec<OrganizationFacingRecord>, Error>;
}
