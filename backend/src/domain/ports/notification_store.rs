//! Port abstraction for per-account notification feeds and their errors.
use async_trait::async_trait;

use crate::domain::accounts::AccountRef;
use crate::domain::notifications::{Notification, NotificationId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification store adapters.
    pub enum NotificationStoreError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "notification store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "notification store query failed: {message}",
        /// The addressed account does not exist.
        MissingAccount { email: String } => "no notification feed for {email}",
        /// The addressed entry does not exist in the account's feed.
        MissingNotification { id: String } => "no notification with id {id}",
    }
}

/// Port for the per-account notification feeds.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Append an entry to the account's feed.
    async fn append(
        &self,
        account: &AccountRef,
        notification: &Notification,
    ) -> Result<(), NotificationStoreError>;

    /// The account's feed, newest entry first.
    ///
    /// An account with no feed reads as empty, not an error.
    async fn feed(&self, account: &AccountRef) -> Result<Vec<Notification>, NotificationStoreError>;

    /// Mark one entry read.
    ///
    /// Marking an already-read entry succeeds without change; an id absent
    /// from the account's feed fails with
    /// [`NotificationStoreError::MissingNotification`].
    async fn mark_read(
        &self,
        account: &AccountRef,
        id: &NotificationId,
    ) -> Result<(), NotificationStoreError>;
}
