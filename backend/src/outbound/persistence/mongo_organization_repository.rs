//! MongoDB-backed implementation of the organization repository port.

use async_trait::async_trait;
use credentials::{HashedPassword, ResetGrant, TokenFingerprint};
use futures_util::TryStreamExt;
use mongodb::bson::doc;

use crate::domain::accounts::{EmailAddress, Organization};
use crate::domain::ports::{OrganizationPersistenceError, OrganizationRepository};

use super::documents::{DocumentError, OrganizationDocument};
use super::mongo::{MongoHandle, is_unreachable};

/// Organization accounts stored as single documents in the `Organizations`
/// collection.
#[derive(Clone)]
pub struct MongoOrganizationRepository {
    handle: MongoHandle,
}

impl MongoOrganizationRepository {
    pub fn new(handle: MongoHandle) -> Self {
        Self { handle }
    }
}

fn map_driver_error(error: mongodb::error::Error) -> OrganizationPersistenceError {
    if is_unreachable(&error) {
        OrganizationPersistenceError::connection(error.to_string())
    } else {
        OrganizationPersistenceError::query(error.to_string())
    }
}

fn map_document_error(error: DocumentError) -> OrganizationPersistenceError {
    OrganizationPersistenceError::query(error.to_string())
}

#[async_trait]
impl OrganizationRepository for MongoOrganizationRepository {
    async fn insert(&self, organization: &Organization) -> Result<(), OrganizationPersistenceError> {
        self.handle
            .organizations()
            .insert_one(OrganizationDocument::from_account(organization))
            .await
            .map_err(map_driver_error)?;
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Organization>, OrganizationPersistenceError> {
        self.handle
            .organizations()
            .find_one(doc! { "email": email.as_str() })
            .await
            .map_err(map_driver_error)?
            .map(OrganizationDocument::into_account)
            .transpose()
            .map_err(map_document_error)
    }

    async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Organization>, OrganizationPersistenceError> {
        self.handle
            .organizations()
            .find_one(doc! { "organization_name": name })
            .await
            .map_err(map_driver_error)?
            .map(OrganizationDocument::into_account)
            .transpose()
            .map_err(map_document_error)
    }

    async fn list_all(&self) -> Result<Vec<Organization>, OrganizationPersistenceError> {
        let documents: Vec<OrganizationDocument> = self
            .handle
            .organizations()
            .find(doc! {})
            .await
            .map_err(map_driver_error)?
            .try_collect()
            .await
            .map_err(map_driver_error)?;
        documents
            .into_iter()
            .map(|document| document.into_account().map_err(map_document_error))
            .collect()
    }

    async fn find_by_reset_fingerprint(
        &self,
        fingerprint: &TokenFingerprint,
    ) -> Result<Option<Organization>, OrganizationPersistenceError> {
        self.handle
            .organizations()
            .find_one(doc! { "resetToken": fingerprint.as_str() })
            .await
            .map_err(map_driver_error)?
            .map(OrganizationDocument::into_account)
            .transpose()
            .map_err(map_document_error)
    }

    async fn store_reset_grant(
        &self,
        email: &EmailAddress,
        grant: &ResetGrant,
    ) -> Result<(), OrganizationPersistenceError> {
        let update = doc! {
            "$set": {
                "resetToken": grant.fingerprint().as_str(),
                "resetTokenExpiry": grant.expires_at().timestamp_millis(),
            }
        };
        let result = self
            .handle
            .organizations()
            .update_one(doc! { "email": email.as_str() }, update)
            .await
            .map_err(map_driver_error)?;
        if result.matched_count == 0 {
            return Err(OrganizationPersistenceError::missing_account(email.as_str()));
        }
        Ok(())
    }

    async fn complete_password_reset(
        &self,
        email: &EmailAddress,
        password: &HashedPassword,
    ) -> Result<(), OrganizationPersistenceError> {
        let update = doc! {
            "$set": { "password": password.as_str() },
            "$unset": { "resetToken": "", "resetTokenExpiry": "" },
        };
        let result = self
            .handle
            .organizations()
            .update_one(doc! { "email": email.as_str() }, update)
            .await
            .map_err(map_driver_error)?;
        if result.matched_count == 0 {
            return Err(OrganizationPersistenceError::missing_account(email.as_str()));
        }
        Ok(())
    }
}
