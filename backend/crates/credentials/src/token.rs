//! Password-reset tokens.
//!
//! A reset token is a 32-character alphanumeric value sent to the account
//! holder by email. Accounts never store the token itself, only its
//! SHA-256 fingerprint plus an expiry instant, so a leaked store cannot be
//! replayed into working reset links. Lookup happens by fingerprint and the
//! expiry is evaluated in application code after the account is loaded.

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use sha2::{Digest, Sha256};

/// Length of a generated token, in characters.
pub const TOKEN_LENGTH: usize = 32;

/// How long a token stays valid after issuance.
pub const TOKEN_TTL_MINUTES: i64 = 15;

/// A raw reset token value. Held only in flight: in the reset email and in
/// the subsequent reset request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetToken(String);

impl ResetToken {
    /// Generate a fresh token from `rng`.
    #[must_use]
    pub fn generate_with<R: Rng>(rng: &mut R) -> Self {
        let value: String = rng
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();
        Self(value)
    }

    /// Generate a fresh token from the thread-local RNG.
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Wrap a token value received back from an account holder.
    #[must_use]
    pub const fn new(value: String) -> Self {
        Self(value)
    }

    /// The SHA-256 fingerprint under which this token is stored.
    #[must_use]
    pub fn fingerprint(&self) -> TokenFingerprint {
        TokenFingerprint(hex::encode(Sha256::digest(self.0.as_bytes())))
    }

    /// The raw value, for inclusion in the reset email.
    #[must_use]
    pub fn reveal(&self) -> &str {
        &self.0
    }
}

/// Lowercase SHA-256 hex digest of a token value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFingerprint(String);

impl TokenFingerprint {
    /// Wrap a fingerprint loaded from storage.
    #[must_use]
    pub const fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// The hex digest, for persistence and equality queries.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The stored half of an issued token: fingerprint plus expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetGrant {
    fingerprint: TokenFingerprint,
    expires_at: DateTime<Utc>,
}

impl ResetGrant {
    /// Issue a grant for `token`, expiring [`TOKEN_TTL_MINUTES`] after
    /// `issued_at`.
    #[must_use]
    pub fn issue(token: &ResetToken, issued_at: DateTime<Utc>) -> Self {
        Self {
            fingerprint: token.fingerprint(),
            expires_at: issued_at + TimeDelta::minutes(TOKEN_TTL_MINUTES),
        }
    }

    /// Rebuild a grant from its stored parts.
    #[must_use]
    pub const fn from_stored(fingerprint: TokenFingerprint, expires_at: DateTime<Utc>) -> Self {
        Self {
            fingerprint,
            expires_at,
        }
    }

    /// Whether the grant has lapsed at `now`. The expiry instant itself
    /// counts as lapsed.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// The stored fingerprint.
    #[must_use]
    pub const fn fingerprint(&self) -> &TokenFingerprint {
        &self.fingerprint
    }

    /// The stored expiry instant.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}
