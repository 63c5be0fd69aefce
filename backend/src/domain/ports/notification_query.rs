//! Driving port for notification feed reads.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::accounts::AccountRef;
use crate::domain::notifications::Notification;

/// Driving port for reading a per-account notification feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationQuery: Send + Sync {
    /// The calling account's feed, newest entry first.
    async fn feed(&self, account: &AccountRef) -> Result<Vec<Notification>, Error>;
}
