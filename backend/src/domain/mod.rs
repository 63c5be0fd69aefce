//! Domain primitives and aggregates.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - TraceId (alias to `trace_id::TraceId`) — per-request trace identifier.
//! - Account types under [`accounts`], donation lifecycle under
//!   [`donations`], notification feed entries under [`notifications`], and
//!   outbound mail under [`mail`].
//! - Port traits under [`ports`]; the `*_service` modules orchestrate them.

pub mod account_service;
pub mod accounts;
pub mod donation_service;
pub mod donations;
pub mod error;
pub mod mail;
pub mod notification_service;
pub mod notifications;
pub mod password_reset_service;
pub mod ports;
mod service_support;
pub mod trace_id;

pub use self::account_service::AccountService;
pub use self::donation_service::DonationService;
pub use self::error::{Error, ErrorCode, ErrorDto, ErrorValidationError, TRACE_ID_HEADER};
pub use self::notification_service::NotificationService;
pub use self::password_reset_service::PasswordResetService;
pub use self::trace_id::TraceId;
