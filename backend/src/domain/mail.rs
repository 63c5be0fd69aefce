//! Outbound mail message composition.
//!
//! Plain-text messages sent around donation activity and password resets.
//! Dispatch is always best-effort: composition happens on the request path,
//! sending does not.

use credentials::{ResetToken, token::TOKEN_TTL_MINUTES};

use super::accounts::EmailAddress;
use super::donations::{DonationCategory, DonationItem, OrderId, PickupTime};

/// The business event a message reports; used in dispatch logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailKind {
    DonationReceived,
    DonationAccepted,
    DonationRejected,
    DonationCollected,
    PasswordReset,
}

impl MailKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DonationReceived => "donation_received",
            Self::DonationAccepted => "donation_accepted",
            Self::DonationRejected => "donation_rejected",
            Self::DonationCollected => "donation_collected",
            Self::PasswordReset => "password_reset",
        }
    }
}

/// A composed plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub kind: MailKind,
    pub to: EmailAddress,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    /// Mail to the organization when a donation arrives.
    ///
    /// Item names and quantities are comma-joined lists, the layout the
    /// receiving desks are used to reading.
    pub fn donation_received(
        to: EmailAddress,
        donor_name: &str,
        order_id: &OrderId,
        category: DonationCategory,
        items: &[DonationItem],
    ) -> Self {
        let names = items
            .iter()
            .map(|item| item.name.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let quantities = items
            .iter()
            .map(|item| item.quantity.to_string())
            .collect::<Vec<_>>()
            .join(",");

        Self {
            kind: MailKind::DonationReceived,
            to,
            subject: "New Donation Received".to_owned(),
            body: format!(
                "You have a new donation from {donor_name}.\n\
                 Order ID: {order_id}\n\
                 Donation Type: {category}\n\
                 Items: {names}\n\
                 Quantity: {quantities}"
            ),
        }
    }

    /// Mail to the donor when the organization accepts.
    pub fn donation_accepted(
        to: EmailAddress,
        organization_name: &str,
        order_id: &OrderId,
        pickup_time: &PickupTime,
    ) -> Self {
        Self {
            kind: MailKind::DonationAccepted,
            to,
            subject: "Donation Accepted".to_owned(),
            body: format!(
                "Your donation (Order ID: {order_id}) has been accepted by \
                 {organization_name}.\n\
                 Please be ready for pickup at the scheduled time: {pickup_time}."
            ),
        }
    }

    /// Mail to the donor when the organization rejects.
    pub fn donation_rejected(
        to: EmailAddress,
        organization_name: &str,
        order_id: &OrderId,
    ) -> Self {
        Self {
            kind: MailKind::DonationRejected,
            to,
            subject: "Donation Rejected".to_owned(),
            body: format!(
                "Your donation (Order ID: {order_id}) has been rejected by \
                 {organization_name}."
            ),
        }
    }

    /// Mail to the donor when the pickup completes.
    pub fn donation_collected(
        to: EmailAddress,
        organization_name: &str,
        order_id: &OrderId,
    ) -> Self {
        Self {
            kind: MailKind::DonationCollected,
            to,
            subject: "Donation Collected".to_owned(),
            body: format!(
                "Your donation (Order ID: {order_id}) has been successfully collected by \
                 {organization_name}.\n\
                 Thank you for your generous contribution!"
            ),
        }
    }

    /// Mail carrying a password-reset link.
    ///
    /// The raw token appears only here; the stores never see it.
    pub fn password_reset(to: EmailAddress, base_url: &str, token: &ResetToken) -> Self {
        let link = format!(
            "{}/reset-password?token={}",
            base_url.trim_end_matches('/'),
            token.reveal(),
        );
        Self {
            kind: MailKind::PasswordReset,
            to,
            subject: "Password Reset".to_owned(),
            body: format!(
                "You requested a password reset.\n\
                 Reset your password here: {link}\n\
                 This link is valid for {TOKEN_TTL_MINUTES} minutes."
            ),
        }
    }
}
