//! Driving port for the password reset flow.
//!
//! Both halves of the flow deliberately leak nothing about which emails
//! hold accounts: requesting a reset for an unknown address succeeds, and
//! every redemption failure collapses into one generic message.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::accounts::AccountRole;

/// Driving port for requesting and redeeming password resets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordResetCommand: Send + Sync {
    /// Issue a reset token for the account holding `email` in the stated
    /// role's namespace and mail the reset link.
    ///
    /// An unknown or malformed email completes without error and without
    /// side effects.
    async fn request_reset(&self, email: &str, role: AccountRole) -> Result<(), Error>;

    /// Redeem a reset token and store the new password.
    ///
    /// The token is matched by fingerprint across both namespaces, donors
    /// first. Unknown and expired tokens fail alike. The new password only
    /// has to clear the minimum length and match its confirmation; the
    /// full signup policy is not re-applied here.
    async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), Error>;
}
