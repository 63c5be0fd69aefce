//! Notification feed reads and the read-flag mutation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::accounts::AccountRef;
use crate::domain::notifications::{Notification, NotificationId};
use crate::domain::ports::{NotificationCommand, NotificationQuery, NotificationStore};
use crate::domain::service_support::map_notification_store_error;

/// Per-account notification feed operations.
///
/// Implements [`NotificationQuery`] and [`NotificationCommand`].
pub struct NotificationService<N: ?Sized> {
    notifications: Arc<N>,
}

impl<N: ?Sized> NotificationService<N> {
    /// Create a new service over the notification store.
    pub fn new(notifications: Arc<N>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl<N> NotificationQuery for NotificationService<N>
where
    N: NotificationStore + ?Sized,
{
    async fn feed(&self, account: &AccountRef) -> Result<Vec<Notification>, Error> {
        self.notifications
            .feed(account)
            .await
            .map_err(map_notification_store_error)
    }
}

#[async_trait]
impl<N> NotificationCommand for NotificationService<N>
where
    N: NotificationStore + ?Sized,
{
    async fn mark_read(&self, account: &AccountRef, id: &NotificationId) -> Result<(), Error> {
        self.notifications
            .mark_read(account, id)
            .await
            .map_err(map_notification_store_error)
    }
}

#[cfg(test)]
#[path = "notification_service_tests.rs"]
mod tests;
