//! Outbound mail adapters.
//!
//! # Architecture
//!
//! - **Transport only**: message text is composed in the domain layer;
//!   adapters move bytes and map failures onto [`MailerError`].
//! - **Best effort end to end**: callers dispatch off the request path and
//!   log failures, so neither adapter can fail an account holder's request.
//!
//! [`MailerError`]: crate::domain::ports::MailerError

mod http_mailer;
mod log_mailer;

pub use http_mailer::{HttpMailer, MailerConfig};
pub use log_mailer::LogMailer;
