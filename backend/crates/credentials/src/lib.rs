//! Credential primitives for FoodBridge accounts.
//!
//! Donor and organization accounts share the same credential rules, so the
//! pieces live in one leaf crate the backend can depend on from both its
//! domain services and its persistence adapters:
//!
//! - [`policy`] — the registration password policy (length, character
//!   classes, and the permitted symbol set);
//! - [`hash`] — Argon2 password hashing and verification behind the
//!   [`HashedPassword`] newtype, so plaintext never crosses a port;
//! - [`token`] — password-reset tokens. Only a SHA-256 fingerprint of a
//!   token is ever stored; the raw value goes to the account holder by
//!   email and is valid for fifteen minutes.

pub mod hash;
pub mod policy;
pub mod token;

pub use hash::{HashError, HashedPassword};
pub use policy::PolicyViolation;
pub use token::{ResetGrant, ResetToken, TOKEN_LENGTH, TOKEN_TTL_MINUTES, TokenFingerprint};
