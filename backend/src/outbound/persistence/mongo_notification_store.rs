//! MongoDB-backed implementation of the notification store.
//!
//! Feeds live as `Notifications` arrays on the account documents, appended
//! in arrival order and reversed on read so the newest entry comes first.
//! The account role picks which collection the feed lives in.

use async_trait::async_trait;
use mongodb::Collection;
use mongodb::bson::{self, doc};

use crate::domain::accounts::{AccountRef, AccountRole};
use crate::domain::notifications::{Notification, NotificationId};
use crate::domain::ports::{NotificationStore, NotificationStoreError};

use super::documents::{DocumentError, FeedDocument, NotificationEntry};
use super::mongo::{MongoHandle, is_unreachable};

/// Notification feeds embedded in the account documents.
#[derive(Clone)]
pub struct MongoNotificationStore {
    handle: MongoHandle,
}

impl MongoNotificationStore {
    pub fn new(handle: MongoHandle) -> Self {
        Self { handle }
    }

    /// The feed view of whichever collection holds `role` accounts.
    fn feed_collection(&self, role: AccountRole) -> Collection<FeedDocument> {
        match role {
            AccountRole::Donor => self.handle.donors().clone_with_type(),
            AccountRole::Organization => self.handle.organizations().clone_with_type(),
        }
    }
}

fn map_driver_error(error: mongodb::error::Error) -> NotificationStoreError {
    if is_unreachable(&error) {
        NotificationStoreError::connection(error.to_string())
    } else {
        NotificationStoreError::query(error.to_string())
    }
}

fn map_document_error(error: DocumentError) -> NotificationStoreError {
    NotificationStoreError::query(error.to_string())
}

#[async_trait]
impl NotificationStore for MongoNotificationStore {
    async fn append(
        &self,
        account: &AccountRef,
        notification: &Notification,
    ) -> Result<(), NotificationStoreError> {
        let entry = bson::to_bson(&NotificationEntry::from_notification(notification))
            .map_err(|err| NotificationStoreError::query(err.to_string()))?;
        let result = self
            .feed_collection(account.role)
            .update_one(
                doc! { "email": account.email.as_str() },
                doc! { "$push": { "Notifications": entry } },
            )
            .await
            .map_err(map_driver_error)?;
        if result.matched_count == 0 {
            return Err(NotificationStoreError::missing_account(
                account.email.as_str(),
            ));
        }
        Ok(())
    }

    async fn feed(
        &self,
        account: &AccountRef,
    ) -> Result<Vec<Notification>, NotificationStoreError> {
        let document = self
            .feed_collection(account.role)
            .find_one(doc! { "email": account.email.as_str() })
            .await
            .map_err(map_driver_error)?;
        let Some(document) = document else {
            return Ok(Vec::new());
        };
        let mut feed = document
            .notifications
            .into_iter()
            .map(|entry| entry.into_notification().map_err(map_document_error))
            .collect::<Result<Vec<_>, _>>()?;
        // Stored in arrival order; served newest first.
        feed.reverse();
        Ok(feed)
    }

    async fn mark_read(
        &self,
        account: &AccountRef,
        id: &NotificationId,
    ) -> Result<(), NotificationStoreError> {
        let result = self
            .feed_collection(account.role)
            .update_one(
                doc! {
                    "email": account.email.as_str(),
                    "Notifications.id": id.as_str(),
                },
                doc! { "$set": { "Notifications.$[note].read": true } },
            )
            .array_filters([doc! { "note.id": id.as_str() }])
            .await
            .map_err(map_driver_error)?;
        // Matched with nothing modified means the entry was already read;
        // that still counts as success.
        if result.matched_count == 0 {
            return Err(NotificationStoreError::missing_notification(id.as_str()));
        }
        Ok(())
    }
}
