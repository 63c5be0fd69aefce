//! Donation lifecycle: submission, mirrored records, and status transitions.
//!
//! Every donation exists as exactly two records sharing one order id: the
//! donor's copy and the receiving organization's copy. The pair is created
//! together by [`MirroredDonation::submit`] and must only ever be mutated
//! through a single store operation, so the two copies cannot drift apart.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::accounts::{Donor, EmailAddress, Organization, PostalAddress};

/// Process-unique donation order identifier.
///
/// Generated at submission as a compact (hyphen-free) UUID v4; treated as
/// practically collision-free, so no uniqueness check runs against the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wrap an identifier previously generated and persisted.
    pub const fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// Access the textual form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<OrderId> for String {
    fn from(value: OrderId) -> Self {
        value.0
    }
}

/// What is being donated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum DonationCategory {
    Food,
    Grocery,
}

impl DonationCategory {
    /// Wire name, shared by the store documents and outgoing mail.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Grocery => "Grocery",
        }
    }
}

impl fmt::Display for DonationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a donation.
///
/// The reachable flow is `Pending` → `Accepted` → `Collected`, with
/// `Pending` → `Rejected` as the refusal branch. Transitions do not inspect
/// the current state before applying the new one; re-accepting a collected
/// order simply rewrites the status on both copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum DonationStatus {
    Pending,
    Accepted,
    Rejected,
    Collected,
}

impl DonationStatus {
    /// Wire name, capitalised as the store documents spell it.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
            Self::Collected => "Collected",
        }
    }

    /// Whether the donation still awaits an organization decision.
    pub fn is_pending(self) -> bool {
        self == Self::Pending
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One donated item with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationItem {
    #[schema(example = "Rice")]
    pub name: String,
    #[schema(example = 3)]
    pub quantity: u32,
}

/// Validation errors returned by [`DonationSubmission::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionValidationError {
    MissingOrganizationName,
    NoItems,
    MismatchedQuantities { items: usize, quantities: usize },
    BlankItem { index: usize },
    ZeroQuantity { item: String },
}

impl fmt::Display for SubmissionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOrganizationName => {
                write!(f, "target organization must not be empty")
            }
            Self::NoItems => write!(f, "at least one item is required"),
            Self::MismatchedQuantities { items, quantities } => write!(
                f,
                "every item needs a quantity: got {items} items and {quantities} quantities",
            ),
            Self::BlankItem { index } => {
                write!(f, "item {} must not be blank", index + 1)
            }
            Self::ZeroQuantity { item } => {
                write!(f, "quantity for {item} must be at least 1")
            }
        }
    }
}

impl std::error::Error for SubmissionValidationError {}

/// Raw donation submission, with items and quantities as the parallel lists
/// the donation form sends.
#[derive(Debug, Clone)]
pub struct DonationSubmission {
    pub organization_name: String,
    pub category: DonationCategory,
    pub items: Vec<String>,
    pub quantities: Vec<u32>,
}

impl DonationSubmission {
    /// Validate the parallel lists and zip them into typed items.
    pub fn validate(self) -> Result<ValidatedSubmission, SubmissionValidationError> {
        let organization_name = self.organization_name.trim();
        if organization_name.is_empty() {
            return Err(SubmissionValidationError::MissingOrganizationName);
        }
        if self.items.is_empty() {
            return Err(SubmissionValidationError::NoItems);
        }
        if self.items.len() != self.quantities.len() {
            return Err(SubmissionValidationError::MismatchedQuantities {
                items: self.items.len(),
                quantities: self.quantities.len(),
            });
        }

        let mut items = Vec::with_capacity(self.items.len());
        for (index, (name, quantity)) in self.items.iter().zip(&self.quantities).enumerate() {
            let name = name.trim();
            if name.is_empty() {
                return Err(SubmissionValidationError::BlankItem { index });
            }
            if *quantity == 0 {
                return Err(SubmissionValidationError::ZeroQuantity {
                    item: name.to_owned(),
                });
            }
            items.push(DonationItem {
                name: name.to_owned(),
                quantity: *quantity,
            });
        }

        Ok(ValidatedSubmission {
            organization_name: organization_name.to_owned(),
            category: self.category,
            items,
        })
    }
}

/// A donation submission whose lists have been validated and zipped.
#[derive(Debug, Clone)]
pub struct ValidatedSubmission {
    pub organization_name: String,
    pub category: DonationCategory,
    pub items: Vec<DonationItem>,
}

/// Content shared verbatim by both copies of a donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationCore {
    pub order_id: OrderId,
    /// Submission date in `M/D/YYYY` wire form; see [`wire_date`].
    #[schema(example = "9/14/2025")]
    pub date: String,
    pub category: DonationCategory,
    pub items: Vec<DonationItem>,
    pub status: DonationStatus,
    /// Pickup time quoted by the organization at acceptance, free-form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
}

/// The donor's copy of a donation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonorFacingRecord {
    #[serde(flatten)]
    pub core: DonationCore,
    /// Name of the receiving organization.
    pub organization_name: String,
    pub organization_phone: String,
    /// The donor's own composed pickup address at submission time.
    pub address: PostalAddress,
}

/// The organization's copy of a donation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationFacingRecord {
    #[serde(flatten)]
    pub core: DonationCore,
    pub donor_name: String,
    pub donor_phone: String,
    pub donor_email: EmailAddress,
    /// The donor's composed pickup address at submission time.
    pub donor_address: PostalAddress,
}

/// Both copies of a freshly submitted donation, plus the accounts they
/// belong under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirroredDonation {
    pub donor_email: EmailAddress,
    pub organization_email: EmailAddress,
    pub donor_copy: DonorFacingRecord,
    pub organization_copy: OrganizationFacingRecord,
}

impl MirroredDonation {
    /// Build both copies of a new pending donation.
    ///
    /// The shared core is constructed once and cloned, so order id, date,
    /// items, and status cannot differ between the copies. The donor's
    /// display address is composed here, at submission time.
    pub fn submit(
        donor: &Donor,
        organization: &Organization,
        submission: ValidatedSubmission,
        order_id: OrderId,
        date: String,
    ) -> Self {
        let address = PostalAddress::compose(&donor.address);
        let core = DonationCore {
            order_id,
            date,
            category: submission.category,
            items: submission.items,
            status: DonationStatus::Pending,
            pickup_time: None,
        };

        let donor_copy = DonorFacingRecord {
            core: core.clone(),
            organization_name: organization.organization_name.clone(),
            organization_phone: organization.phone.clone(),
            address: address.clone(),
        };
        let organization_copy = OrganizationFacingRecord {
            core,
            donor_name: donor.name.clone(),
            donor_phone: donor.phone.clone(),
            donor_email: donor.email.clone(),
            donor_address: address,
        };

        Self {
            donor_email: donor.email.clone(),
            organization_email: organization.email.clone(),
            donor_copy,
            organization_copy,
        }
    }

    /// The order id shared by both copies.
    pub fn order_id(&self) -> &OrderId {
        &self.donor_copy.core.order_id
    }
}

/// Validation errors returned by [`DonationTransition::accept`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionValidationError {
    MissingPickupTime,
}

impl fmt::Display for TransitionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPickupTime => write!(f, "pickup time must not be empty"),
        }
    }
}

impl std::error::Error for TransitionValidationError {}

/// Free-form pickup time quoted by the organization when accepting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PickupTime(String);

impl PickupTime {
    /// Validate and construct a [`PickupTime`].
    pub fn new(value: impl Into<String>) -> Result<Self, TransitionValidationError> {
        Self::from_owned(value.into())
    }

    fn from_owned(value: String) -> Result<Self, TransitionValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(TransitionValidationError::MissingPickupTime);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Access the textual form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PickupTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PickupTime> for String {
    fn from(value: PickupTime) -> Self {
        value.0
    }
}

impl TryFrom<String> for PickupTime {
    type Error = TransitionValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// A status change applied to both copies of a donation at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DonationTransition {
    Accept { pickup_time: PickupTime },
    Reject,
    Collect,
}

impl DonationTransition {
    /// Build the accept transition, validating the quoted pickup time.
    pub fn accept(pickup_time: impl Into<String>) -> Result<Self, TransitionValidationError> {
        Ok(Self::Accept {
            pickup_time: PickupTime::new(pickup_time)?,
        })
    }

    /// The status both copies will carry after the transition.
    pub fn target_status(&self) -> DonationStatus {
        match self {
            Self::Accept { .. } => DonationStatus::Accepted,
            Self::Reject => DonationStatus::Rejected,
            Self::Collect => DonationStatus::Collected,
        }
    }

    /// The pickup time to stamp on both copies, if this transition sets one.
    pub fn pickup_time(&self) -> Option<&str> {
        match self {
            Self::Accept { pickup_time } => Some(pickup_time.as_str()),
            Self::Reject | Self::Collect => None,
        }
    }
}

/// Which slice of an organization's received donations a query wants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DonationFilter {
    /// Records still awaiting a decision; the accept/reject work list.
    #[default]
    Pending,
    /// Records no longer pending; the history view.
    Settled,
}

impl DonationFilter {
    /// Whether a record with `status` belongs in this slice.
    pub fn matches(self, status: DonationStatus) -> bool {
        match self {
            Self::Pending => status.is_pending(),
            Self::Settled => !status.is_pending(),
        }
    }
}

pub mod wire_date {
    //! Submission dates travel as `M/D/YYYY` with no zero padding, the
    //! format the donation manifests have always shown.

    use chrono::{Datelike, NaiveDate};

    /// Format a date in the `M/D/YYYY` wire form.
    pub fn format(date: NaiveDate) -> String {
        format!("{}/{}/{}", date.month(), date.day(), date.year())
    }
}

#[cfg(test)]
mod tests;
