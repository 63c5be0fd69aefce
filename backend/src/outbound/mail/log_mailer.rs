//! Logging mailer used when no mail API is configured.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::mail::MailMessage;
use crate::domain::ports::{Mailer, MailerError};

/// Mailer that records messages in the log instead of delivering them.
///
/// Keeps the donation and password-reset flows usable in development: the
/// reset link ends up in the debug log rather than an inbox. Never fails.
#[derive(Clone, Copy, Default)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailerError> {
        info!(
            kind = message.kind.as_str(),
            recipient = %message.to,
            subject = %message.subject,
            "mail delivery skipped; no mail API configured"
        );
        // Bodies can carry reset links, so they stay out of info logs.
        debug!(body = %message.body, "undelivered mail body");
        Ok(())
    }
}
