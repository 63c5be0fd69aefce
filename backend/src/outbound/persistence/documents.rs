//! BSON document shapes for the two account collections.
//!
//! Wire names are the origin data set's (`ph_no`, `dist`, `pincode`,
//! `Donation_History`, `EachItem_Qty`, ...) so an existing database keeps
//! working unchanged. These types are implementation details of the
//! persistence layer and must never be exposed to the domain.

use chrono::{DateTime, Utc};
use credentials::{HashError, HashedPassword, ResetGrant, TokenFingerprint};
use mongodb::bson;
use serde::{Deserialize, Serialize};

use crate::domain::accounts::{
    Donor, EmailAddress, EmailValidationError, Organization, PostalAddress, PostalAddressParts,
};
use crate::domain::donations::{
    DonationCategory, DonationCore, DonationItem, DonationStatus, DonorFacingRecord, OrderId,
    OrganizationFacingRecord,
};
use crate::domain::notifications::{Notification, NotificationId};

/// Collection holding the donor account documents.
pub(crate) const DONORS_COLLECTION: &str = "Donors";

/// Collection holding the organization account documents.
pub(crate) const ORGANIZATIONS_COLLECTION: &str = "Organizations";

/// Errors raised while rebuilding domain values from stored documents.
///
/// Every variant means the database holds something this build never
/// writes; adapters surface them as query errors.
#[derive(Debug, thiserror::Error)]
pub(crate) enum DocumentError {
    #[error("stored email is malformed: {0}")]
    Email(EmailValidationError),
    #[error("{0}")]
    Password(HashError),
    #[error("stored timestamp {millis} is out of range")]
    Timestamp { millis: i64 },
    #[error("unknown donation category `{value}`")]
    Category { value: String },
    #[error("unknown donation status `{value}`")]
    Status { value: String },
    #[error("items and quantities disagree: {items} names, {quantities} quantities")]
    ItemShape { items: usize, quantities: usize },
}

/// A donor account document in the `Donors` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct DonorDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<bson::oid::ObjectId>,
    #[serde(rename = "Donor_name")]
    pub name: String,
    pub email: String,
    /// PHC string produced by the credentials crate.
    pub password: String,
    pub ph_no: String,
    pub street: String,
    pub city: String,
    pub dist: String,
    pub state: String,
    pub pincode: String,
    /// SHA-256 fingerprint of the outstanding reset token, if any.
    #[serde(rename = "resetToken", skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
    /// Reset expiry as epoch milliseconds.
    #[serde(rename = "resetTokenExpiry", skip_serializing_if = "Option::is_none")]
    pub reset_token_expiry: Option<i64>,
    #[serde(rename = "Donation_History", default)]
    pub donation_history: Vec<DonorDonationEntry>,
    #[serde(rename = "Notifications", default)]
    pub notifications: Vec<NotificationEntry>,
}

impl DonorDocument {
    /// Fresh insert document for a registered account; histories start empty.
    pub fn from_account(donor: &Donor) -> Self {
        let (reset_token, reset_token_expiry) = reset_fields(donor.reset_grant.as_ref());
        Self {
            id: None,
            name: donor.name.clone(),
            email: donor.email.as_str().to_owned(),
            password: donor.password.as_str().to_owned(),
            ph_no: donor.phone.clone(),
            street: donor.address.street.clone(),
            city: donor.address.city.clone(),
            dist: donor.address.district.clone(),
            state: donor.address.state.clone(),
            pincode: donor.address.postal_code.clone(),
            reset_token,
            reset_token_expiry,
            donation_history: Vec::new(),
            notifications: Vec::new(),
        }
    }

    /// Rebuild the domain account. The embedded histories are read through
    /// their own entry types by the stores that own them.
    pub fn into_account(self) -> Result<Donor, DocumentError> {
        Ok(Donor {
            name: self.name,
            email: EmailAddress::parse(self.email).map_err(DocumentError::Email)?,
            phone: self.ph_no,
            address: PostalAddressParts {
                street: self.street,
                city: self.city,
                district: self.dist,
                state: self.state,
                postal_code: self.pincode,
            },
            password: HashedPassword::from_stored(self.password).map_err(DocumentError::Password)?,
            reset_grant: reset_grant(self.reset_token, self.reset_token_expiry)?,
        })
    }
}

/// An organization account document in the `Organizations` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct OrganizationDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<bson::oid::ObjectId>,
    pub organization_name: String,
    /// The registration number quoted at signup.
    pub organization_id: String,
    pub owner_name: String,
    pub email: String,
    /// PHC string produced by the credentials crate.
    pub password: String,
    pub ph_no: String,
    pub street: String,
    pub city: String,
    pub dist: String,
    pub state: String,
    pub pincode: String,
    #[serde(rename = "resetToken", skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
    #[serde(rename = "resetTokenExpiry", skip_serializing_if = "Option::is_none")]
    pub reset_token_expiry: Option<i64>,
    #[serde(rename = "Donation_History", default)]
    pub donation_history: Vec<OrganizationDonationEntry>,
    #[serde(rename = "Notifications", default)]
    pub notifications: Vec<NotificationEntry>,
}

impl OrganizationDocument {
    /// Fresh insert document for a registered account; histories start empty.
    pub fn from_account(organization: &Organization) -> Self {
        let (reset_token, reset_token_expiry) = reset_fields(organization.reset_grant.as_ref());
        Self {
            id: None,
            organization_name: organization.organization_name.clone(),
            organization_id: organization.registration_id.clone(),
            owner_name: organization.owner_name.clone(),
            email: organization.email.as_str().to_owned(),
            password: organization.password.as_str().to_owned(),
            ph_no: organization.phone.clone(),
            street: organization.address.street.clone(),
            city: organization.address.city.clone(),
            dist: organization.address.district.clone(),
            state: organization.address.state.clone(),
            pincode: organization.address.postal_code.clone(),
            reset_token,
            reset_token_expiry,
            donation_history: Vec::new(),
            notifications: Vec::new(),
        }
    }

    /// Rebuild the domain account.
    pub fn into_account(self) -> Result<Organization, DocumentError> {
        Ok(Organization {
            organization_name: self.organization_name,
            registration_id: self.organization_id,
            owner_name: self.owner_name,
            email: EmailAddress::parse(self.email).map_err(DocumentError::Email)?,
            phone: self.ph_no,
            address: PostalAddressParts {
                street: self.street,
                city: self.city,
                district: self.dist,
                state: self.state,
                postal_code: self.pincode,
            },
            password: HashedPassword::from_stored(self.password).map_err(DocumentError::Password)?,
            reset_grant: reset_grant(self.reset_token, self.reset_token_expiry)?,
        })
    }
}

/// Donor-side entry in `Donation_History`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct DonorDonationEntry {
    #[serde(rename = "OrderId")]
    pub order_id: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Donate_to")]
    pub organization_name: String,
    #[serde(rename = "Donation")]
    pub category: String,
    #[serde(rename = "Organization_ph")]
    pub organization_phone: String,
    pub address: String,
    #[serde(rename = "Items")]
    pub items: Vec<String>,
    #[serde(rename = "EachItem_Qty")]
    pub quantities: Vec<u32>,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "time", skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
}

impl DonorDonationEntry {
    pub fn from_record(record: &DonorFacingRecord) -> Self {
        let (items, quantities) = split_items(&record.core.items);
        Self {
            order_id: record.core.order_id.as_str().to_owned(),
            date: record.core.date.clone(),
            organization_name: record.organization_name.clone(),
            category: record.core.category.as_str().to_owned(),
            organization_phone: record.organization_phone.clone(),
            address: record.address.display_line().to_owned(),
            items,
            quantities,
            status: record.core.status.as_str().to_owned(),
            pickup_time: record.core.pickup_time.clone(),
        }
    }

    pub fn into_record(self) -> Result<DonorFacingRecord, DocumentError> {
        Ok(DonorFacingRecord {
            core: DonationCore {
                order_id: OrderId::from_stored(self.order_id),
                date: self.date,
                category: parse_category(&self.category)?,
                items: zip_items(self.items, self.quantities)?,
                status: parse_status(&self.status)?,
                pickup_time: self.pickup_time,
            },
            organization_name: self.organization_name,
            organization_phone: self.organization_phone,
            address: PostalAddress::from_stored(self.address),
        })
    }
}

/// Organization-side entry in `Donation_History`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct OrganizationDonationEntry {
    #[serde(rename = "OrderId")]
    pub order_id: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Donor_name")]
    pub donor_name: String,
    #[serde(rename = "Donor_ph_no")]
    pub donor_phone: String,
    #[serde(rename = "Donor_email")]
    pub donor_email: String,
    #[serde(rename = "Donation")]
    pub category: String,
    #[serde(rename = "Donor_address")]
    pub donor_address: String,
    #[serde(rename = "Items")]
    pub items: Vec<String>,
    #[serde(rename = "EachItem_Qty")]
    pub quantities: Vec<u32>,
    #[serde(rename = "time", skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
}

impl OrganizationDonationEntry {
    pub fn from_record(record: &OrganizationFacingRecord) -> Self {
        let (items, quantities) = split_items(&record.core.items);
        Self {
            order_id: record.core.order_id.as_str().to_owned(),
            status: record.core.status.as_str().to_owned(),
            date: record.core.date.clone(),
            donor_name: record.donor_name.clone(),
            donor_phone: record.donor_phone.clone(),
            donor_email: record.donor_email.as_str().to_owned(),
            category: record.core.category.as_str().to_owned(),
            donor_address: record.donor_address.display_line().to_owned(),
            items,
            quantities,
            pickup_time: record.core.pickup_time.clone(),
        }
    }

    pub fn into_record(self) -> Result<OrganizationFacingRecord, DocumentError> {
        Ok(OrganizationFacingRecord {
            core: DonationCore {
                order_id: OrderId::from_stored(self.order_id),
                date: self.date,
                category: parse_category(&self.category)?,
                items: zip_items(self.items, self.quantities)?,
                status: parse_status(&self.status)?,
                pickup_time: self.pickup_time,
            },
            donor_name: self.donor_name,
            donor_phone: self.donor_phone,
            donor_email: EmailAddress::parse(self.donor_email).map_err(DocumentError::Email)?,
            donor_address: PostalAddress::from_stored(self.donor_address),
        })
    }
}

/// Entry in an account's `Notifications` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct NotificationEntry {
    pub id: String,
    pub message: String,
    #[serde(rename = "createdAt")]
    pub created_at: bson::DateTime,
    pub read: bool,
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub status: String,
}

impl NotificationEntry {
    pub fn from_notification(notification: &Notification) -> Self {
        Self {
            id: notification.id.as_str().to_owned(),
            message: notification.message.clone(),
            created_at: bson::DateTime::from_millis(notification.created_at.timestamp_millis()),
            read: notification.read,
            order_id: notification.order_id.as_str().to_owned(),
            status: notification.status.as_str().to_owned(),
        }
    }

    pub fn into_notification(self) -> Result<Notification, DocumentError> {
        let millis = self.created_at.timestamp_millis();
        let created_at = DateTime::<Utc>::from_timestamp_millis(millis)
            .ok_or(DocumentError::Timestamp { millis })?;
        Ok(Notification {
            id: NotificationId::from_stored(self.id),
            message: self.message,
            created_at,
            read: self.read,
            order_id: OrderId::from_stored(self.order_id),
            status: parse_status(&self.status)?,
        })
    }
}

/// Projection of a donor document down to its donation history.
#[derive(Debug, Deserialize)]
pub(crate) struct DonorHistoryDocument {
    #[serde(rename = "Donation_History", default)]
    pub donation_history: Vec<DonorDonationEntry>,
}

/// Projection of an organization document down to its donation history.
#[derive(Debug, Deserialize)]
pub(crate) struct OrganizationHistoryDocument {
    #[serde(rename = "Donation_History", default)]
    pub donation_history: Vec<OrganizationDonationEntry>,
}

/// Projection of either account document down to its notification feed.
#[derive(Debug, Deserialize)]
pub(crate) struct FeedDocument {
    #[serde(rename = "Notifications", default)]
    pub notifications: Vec<NotificationEntry>,
}

fn reset_fields(grant: Option<&ResetGrant>) -> (Option<String>, Option<i64>) {
    match grant {
        Some(grant) => (
            Some(grant.fingerprint().as_str().to_owned()),
            Some(grant.expires_at().timestamp_millis()),
        ),
        None => (None, None),
    }
}

/// A half-written pair (one field present, the other absent) reads as no
/// grant at all; the token cannot be validated without both halves.
fn reset_grant(
    token: Option<String>,
    expiry_millis: Option<i64>,
) -> Result<Option<ResetGrant>, DocumentError> {
    match (token, expiry_millis) {
        (Some(fingerprint), Some(millis)) => {
            let expires_at = DateTime::<Utc>::from_timestamp_millis(millis)
                .ok_or(DocumentError::Timestamp { millis })?;
            Ok(Some(ResetGrant::from_stored(
                TokenFingerprint::from_stored(fingerprint),
                expires_at,
            )))
        }
        _ => Ok(None),
    }
}

fn split_items(items: &[DonationItem]) -> (Vec<String>, Vec<u32>) {
    let names = items.iter().map(|item| item.name.clone()).collect();
    let quantities = items.iter().map(|item| item.quantity).collect();
    (names, quantities)
}

fn zip_items(items: Vec<String>, quantities: Vec<u32>) -> Result<Vec<DonationItem>, DocumentError> {
    if items.len() != quantities.len() {
        return Err(DocumentError::ItemShape {
            items: items.len(),
            quantities: quantities.len(),
        });
    }
    Ok(items
        .into_iter()
        .zip(quantities)
        .map(|(name, quantity)| DonationItem { name, quantity })
        .collect())
}

fn parse_category(value: &str) -> Result<DonationCategory, DocumentError> {
    match value {
        "Food" => Ok(DonationCategory::Food),
        "Grocery" => Ok(DonationCategory::Grocery),
        other => Err(DocumentError::Category {
            value: other.to_owned(),
        }),
    }
}

fn parse_status(value: &str) -> Result<DonationStatus, DocumentError> {
    match value {
        "Pending" => Ok(DonationStatus::Pending),
        "Accepted" => Ok(DonationStatus::Accepted),
        "Rejected" => Ok(DonationStatus::Rejected),
        "Collected" => Ok(DonationStatus::Collected),
        other => Err(DocumentError::Status {
            value: other.to_owned(),
        }),
    }
}
