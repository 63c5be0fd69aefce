//! Driving port for notification mutations.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::accounts::AccountRef;
use crate::domain::notifications::NotificationId;

/// Driving port for flipping notification read flags.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationCommand: Send + Sync {
    /// Mark one entry of the calling account's feed read.
    ///
    /// Marking an already-read entry succeeds without change; an id the
    /// feed does not hold is a not-found error.
    async fn mark_read(&self, account: &AccountRef, id: &NotificationId) -> Result<(), Error>;
}
