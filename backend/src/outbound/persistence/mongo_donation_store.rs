//! MongoDB-backed implementation of the mirrored donation store.
//!
//! Each mutation touches one donor document and one organization document.
//! Both updates run inside a single client-session transaction so a failure
//! on either side leaves neither entry written; the two copies of a donation
//! can only move together.

use async_trait::async_trait;
use mongodb::ClientSession;
use mongodb::bson::{self, Bson, Document, doc};

use crate::domain::accounts::EmailAddress;
use crate::domain::donations::{
    DonationFilter, DonationTransition, DonorFacingRecord, MirroredDonation, OrderId,
    OrganizationFacingRecord,
};
use crate::domain::ports::{DonationStore, DonationStoreError};

use super::documents::{
    DocumentError, DonorDonationEntry, DonorHistoryDocument, OrganizationDonationEntry,
    OrganizationHistoryDocument,
};
use super::mongo::{MongoHandle, is_unreachable};

/// Donation records embedded in the account documents' `Donation_History`
/// arrays, one entry per side.
#[derive(Clone)]
pub struct MongoDonationStore {
    handle: MongoHandle,
}

impl MongoDonationStore {
    pub fn new(handle: MongoHandle) -> Self {
        Self { handle }
    }

    async fn push_both_copies(
        &self,
        session: &mut ClientSession,
        donation: &MirroredDonation,
        donor_entry: Bson,
        organization_entry: Bson,
    ) -> Result<(), DonationStoreError> {
        let donor_result = self
            .handle
            .donors()
            .update_one(
                doc! { "email": donation.donor_email.as_str() },
                doc! { "$push": { "Donation_History": donor_entry } },
            )
            .session(&mut *session)
            .await
            .map_err(map_driver_error)?;
        if donor_result.matched_count == 0 {
            return Err(DonationStoreError::missing_account(
                donation.donor_email.as_str(),
            ));
        }

        let organization_result = self
            .handle
            .organizations()
            .update_one(
                doc! { "email": donation.organization_email.as_str() },
                doc! { "$push": { "Donation_History": organization_entry } },
            )
            .session(&mut *session)
            .await
            .map_err(map_driver_error)?;
        if organization_result.matched_count == 0 {
            return Err(DonationStoreError::missing_account(
                donation.organization_email.as_str(),
            ));
        }
        Ok(())
    }

    async fn update_both_copies(
        &self,
        session: &mut ClientSession,
        donor_email: &EmailAddress,
        organization_email: &EmailAddress,
        order_id: &OrderId,
        update: Document,
    ) -> Result<(), DonationStoreError> {
        let donor_result = self
            .handle
            .donors()
            .update_one(entry_query(donor_email, order_id), update.clone())
            .array_filters([entry_filter(order_id)])
            .session(&mut *session)
            .await
            .map_err(map_driver_error)?;
        if donor_result.matched_count == 0 {
            return Err(DonationStoreError::missing_record(order_id.as_str()));
        }

        let organization_result = self
            .handle
            .organizations()
            .update_one(entry_query(organization_email, order_id), update)
            .array_filters([entry_filter(order_id)])
            .session(&mut *session)
            .await
            .map_err(map_driver_error)?;
        if organization_result.matched_count == 0 {
            return Err(DonationStoreError::missing_record(order_id.as_str()));
        }
        Ok(())
    }
}

fn map_driver_error(error: mongodb::error::Error) -> DonationStoreError {
    if is_unreachable(&error) {
        DonationStoreError::connection(error.to_string())
    } else {
        DonationStoreError::query(error.to_string())
    }
}

fn map_document_error(error: DocumentError) -> DonationStoreError {
    DonationStoreError::query(error.to_string())
}

fn serialize_error(error: bson::ser::Error) -> DonationStoreError {
    DonationStoreError::query(error.to_string())
}

/// Match an account document that holds an entry with `order_id`.
fn entry_query(email: &EmailAddress, order_id: &OrderId) -> Document {
    doc! {
        "email": email.as_str(),
        "Donation_History.OrderId": order_id.as_str(),
    }
}

/// Array filter binding `entry` to the addressed history element.
fn entry_filter(order_id: &OrderId) -> Document {
    doc! { "entry.OrderId": order_id.as_str() }
}

/// `$set` update stamping the transition onto the matched history entry.
fn entry_update(status: &str, pickup_time: Option<&str>) -> Document {
    let mut set = doc! { "Donation_History.$[entry].Status": status };
    if let Some(time) = pickup_time {
        set.insert("Donation_History.$[entry].time", time);
    }
    doc! { "$set": set }
}

#[async_trait]
impl DonationStore for MongoDonationStore {
    async fn record_mirrored(&self, donation: &MirroredDonation) -> Result<(), DonationStoreError> {
        let donor_entry = bson::to_bson(&DonorDonationEntry::from_record(&donation.donor_copy))
            .map_err(serialize_error)?;
        let organization_entry = bson::to_bson(&OrganizationDonationEntry::from_record(
            &donation.organization_copy,
        ))
        .map_err(serialize_error)?;

        let mut session = self
            .handle
            .client()
            .start_session()
            .await
            .map_err(map_driver_error)?;
        session
            .start_transaction()
            .await
            .map_err(map_driver_error)?;

        match self
            .push_both_copies(&mut session, donation, donor_entry, organization_entry)
            .await
        {
            Ok(()) => session
                .commit_transaction()
                .await
                .map_err(map_driver_error),
            Err(error) => {
                // Preserve the write failure even if the abort itself fails.
                let _ = session.abort_transaction().await;
                Err(error)
            }
        }
    }

    async fn apply_mirrored_transition(
        &self,
        donor_email: &EmailAddress,
        organization_email: &EmailAddress,
        order_id: &OrderId,
        transition: &DonationTransition,
    ) -> Result<(), DonationStoreError> {
        let update = entry_update(
            transition.target_status().as_str(),
            transition.pickup_time(),
        );

        let mut session = self
            .handle
            .client()
            .start_session()
            .await
            .map_err(map_driver_error)?;
        session
            .start_transaction()
            .await
            .map_err(map_driver_error)?;

        match self
            .update_both_copies(
                &mut session,
                donor_email,
                organization_email,
                order_id,
                update,
            )
            .await
        {
            Ok(()) => session
                .commit_transaction()
                .await
                .map_err(map_driver_error),
            Err(error) => {
                // Preserve the write failure even if the abort itself fails.
                let _ = session.abort_transaction().await;
                Err(error)
            }
        }
    }

    async fn donor_history(
        &self,
        donor_email: &EmailAddress,
    ) -> Result<Vec<DonorFacingRecord>, DonationStoreError> {
        let document = self
            .handle
            .donors()
            .clone_with_type::<DonorHistoryDocument>()
            .find_one(doc! { "email": donor_email.as_str() })
            .await
            .map_err(map_driver_error)?;
        let Some(document) = document else {
            return Ok(Vec::new());
        };
        document
            .donation_history
            .into_iter()
            .map(|entry| entry.into_record().map_err(map_document_error))
            .collect()
    }

    async fn organization_donations(
        &self,
        organization_email: &EmailAddress,
        filter: Option<DonationFilter>,
    ) -> Result<Vec<OrganizationFacingRecord>, DonationStoreError> {
        let document = self
            .handle
            .organizations()
            .clone_with_type::<OrganizationHistoryDocument>()
            .find_one(doc! { "email": organization_email.as_str() })
            .await
            .map_err(map_driver_error)?;
        let Some(document) = document else {
            return Ok(Vec::new());
        };
        let records = document
            .donation_history
            .into_iter()
            .map(|entry| entry.into_record().map_err(map_document_error))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(match filter {
            Some(filter) => records
                .into_iter()
                .filter(|record| filter.matches(record.core.status))
                .collect(),
            None => records,
        })
    }
}
