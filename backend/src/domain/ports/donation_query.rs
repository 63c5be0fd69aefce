//! Driving port for the donation read-side.
//!
//! Histories, profiles, and the organization directory are projections over
//! the account repositories and the donation store; the view types here are
//! what the HTTP layer serializes.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::accounts::{EmailAddress, PostalAddress, PostalAddressParts};
use crate::domain::donations::{
    DonationFilter, DonationStatus, DonorFacingRecord, OrganizationFacingRecord,
};

/// Donor account details plus donation count, for the profile view.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonorProfile {
    pub name: String,
    pub email: EmailAddress,
    pub phone: String,
    pub address: PostalAddressParts,
    pub total_donations: usize,
}

/// One row of the drop-off list on an organization's profile.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DropOff {
    pub donor_name: String,
    pub address: PostalAddress,
    pub status: DonationStatus,
}

/// Organization account details plus received-donation summaries.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationProfile {
    pub organization_name: String,
    pub registration_id: String,
    pub owner_name: String,
    pub email: EmailAddress,
    pub phone: String,
    pub address: PostalAddressParts,
    pub total_received: usize,
    pub drop_offs: Vec<DropOff>,
}

/// Directory row for the donation form's target picker.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDirectoryEntry {
    pub organization_name: String,
    pub city: String,
    pub state: String,
}

/// Driving port for donation read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonationQuery: Send + Sync {
    /// Every record under the donor, as submitted.
    async fn donor_history(
        &self,
        donor_email: &EmailAddress,
    ) -> Result<Vec<DonorFacingRecord>, Error>;

    /// The slice of an organization's received records the filter names.
    async fn organization_donations(
        &self,
        organization_email: &EmailAddress,
        filter: DonationFilter,
    ) -> Result<Vec<OrganizationFacingRecord>, Error>;

    /// Donor account details plus the total donation count.
    async fn donor_profile(&self, donor_email: &EmailAddress) -> Result<DonorProfile, Error>;

    /// Organization account details, received count, and the drop-off list.
    async fn organization_profile(
        &self,
        organization_email: &EmailAddress,
    ) -> Result<OrganizationProfile, Error>;

    /// Every registered organization, for the donation form's picker.
    async fn organizations_directory(&self) -> Result<Vec<OrganizationDirectoryEntry>, Error>;
}
