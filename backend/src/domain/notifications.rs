//! Per-account notification feed entries.
//!
//! Each account owns a feed of short messages describing donation activity.
//! Entries start unread and are marked read one at a time; the feed is
//! served newest-first.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::donations::{DonationStatus, OrderId};

/// Stable notification identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
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

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<NotificationId> for String {
    fn from(value: NotificationId) -> Self {
        value.0
    }
}

/// One entry in an account's notification feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    #[schema(example = "New donation received from Ada Lovelace (Order ID: 7f9c…)")]
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    /// The donation this entry reports on.
    pub order_id: OrderId,
    /// The donation status the entry reports.
    pub status: DonationStatus,
}

impl Notification {
    fn new(
        message: String,
        created_at: DateTime<Utc>,
        order_id: OrderId,
        status: DonationStatus,
    ) -> Self {
        Self {
            id: NotificationId::generate(),
            message,
            created_at,
            read: false,
            order_id,
            status,
        }
    }

    /// Entry appended under the organization when a donation arrives.
    pub fn donation_received(
        donor_name: &str,
        order_id: &OrderId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            format!("New donation received from {donor_name} (Order ID: {order_id})"),
            created_at,
            order_id.clone(),
            DonationStatus::Pending,
        )
    }

    /// Entry appended under the donor when the organization accepts.
    pub fn donation_accepted(
        organization_name: &str,
        order_id: &OrderId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            format!(
                "Your donation (Order ID: {order_id}) has been accepted by {organization_name}"
            ),
            created_at,
            order_id.clone(),
            DonationStatus::Accepted,
        )
    }

    /// Entry appended under the donor when the organization rejects.
    pub fn donation_rejected(
        organization_name: &str,
        order_id: &OrderId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            format!(
                "Your donation (Order ID: {order_id}) has been rejected by {organization_name}"
            ),
            created_at,
            order_id.clone(),
            DonationStatus::Rejected,
        )
    }

    /// Entry appended under the donor when the pickup completes.
    pub fn donation_collected(
        organization_name: &str,
        order_id: &OrderId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            format!(
                "Your donation (Order ID: {order_id}) has been collected by {organization_name}"
            ),
            created_at,
            order_id.clone(),
            DonationStatus::Collected,
        )
    }
}
