//! Port abstraction for outbound mail dispatch and its errors.
use async_trait::async_trait;

use crate::domain::mail::MailMessage;

use super::define_port_error;

define_port_error! {
    /// Dispatch errors raised by mailer adapters.
    pub enum MailerError {
        /// The mail API did not answer within the configured deadline.
        Timeout { message: String } => "mail dispatch timed out: {message}",
        /// The mail API asked us to back off.
        RateLimited { message: String } => "mail dispatch rate limited: {message}",
        /// The mail API rejected the message itself.
        InvalidRequest { message: String } => "mail API rejected the message: {message}",
        /// Transport-level failure reaching the mail API.
        Transport { message: String } => "mail dispatch failed: {message}",
    }
}

/// Port for sending composed messages.
///
/// Callers treat dispatch as best-effort: failures are logged by the caller
/// and never surface to the account holder's request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one message.
    async fn send(&self, message: &MailMessage) -> Result<(), MailerError>;
}
