//! MongoDB-backed implementation of the donor repository port.

use async_trait::async_trait;
use credentials::{HashedPassword, ResetGrant, TokenFingerprint};
use mongodb::bson::doc;

use crate::domain::accounts::{Donor, EmailAddress};
use crate::domain::ports::{DonorPersistenceError, DonorRepository};

use super::documents::{DocumentError, DonorDocument};
use super::mongo::{MongoHandle, is_unreachable};

/// Donor accounts stored as single documents in the `Donors` collection.
#[derive(Clone)]
pub struct MongoDonorRepository {
    handle: MongoHandle,
}

impl MongoDonorRepository {
    pub fn new(handle: MongoHandle) -> Self {
        Self { handle }
    }
}

fn map_driver_error(error: mongodb::error::Error) -> DonorPersistenceError {
    if is_unreachable(&error) {
        DonorPersistenceError::connection(error.to_string())
    } else {
        DonorPersistenceError::query(error.to_string())
    }
}

fn map_document_error(error: DocumentError) -> DonorPersistenceError {
    DonorPersistenceError::query(error.to_string())
}

#[async_trait]
impl DonorRepository for MongoDonorRepository {
    async fn insert(&self, donor: &Donor) -> Result<(), DonorPersistenceError> {
        self.handle
            .donors()
            .insert_one(DonorDocument::from_account(donor))
            .await
            .map_err(map_driver_error)?;
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Donor>, DonorPersistenceError> {
        self.handle
            .donors()
            .find_one(doc! { "email": email.as_str() })
            .await
            .map_err(map_driver_error)?
            .map(DonorDocument::into_account)
            .transpose()
            .map_err(map_document_error)
    }

    async fn find_by_reset_fingerprint(
        &self,
        fingerprint: &TokenFingerprint,
    ) -> Result<Option<Donor>, DonorPersistenceError> {
        self.handle
            .donors()
            .find_one(doc! { "resetToken": fingerprint.as_str() })
            .await
            .map_err(map_driver_error)?
            .map(DonorDocument::into_account)
            .transpose()
            .map_err(map_document_error)
    }

    async fn store_reset_grant(
        &self,
        email: &EmailAddress,
        grant: &ResetGrant,
    ) -> Result<(), DonorPersistenceError> {
        let update = doc! {
            "$set": {
                "resetToken": grant.fingerprint().as_str(),
                "resetTokenExpiry": grant.expires_at().timestamp_millis(),
            }
        };
        let result = self
            .handle
            .donors()
            .update_one(doc! { "email": email.as_str() }, update)
            .await
            .map_err(map_driver_error)?;
        if result.matched_count == 0 {
            return Err(DonorPersistenceError::missing_account(email.as_str()));
        }
        Ok(())
    }

    async fn complete_password_reset(
        &self,
        email: &EmailAddress,
        password: &HashedPassword,
    ) -> Result<(), DonorPersistenceError> {
        let update = doc! {
            "$set": { "password": password.as_str() },
            "$unset": { "resetToken": "", "resetTokenExpiry": "" },
        };
        let result = self
            .handle
            .donors()
            .update_one(doc! { "email": email.as_str() }, update)
            .await
            .map_err(map_driver_error)?;
        if result.matched_count == 0 {
            return Err(DonorPersistenceError::missing_account(email.as_str()));
        }
        Ok(())
    }
}
