//! Argon2 password hashing.
//!
//! Passwords are stored as PHC strings produced by [`Argon2::default`],
//! which pins the algorithm, parameters, and a fresh random salt into the
//! stored value. Verification re-reads those parameters from the stored
//! string, so parameter upgrades only affect newly hashed passwords.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

/// A password hash in PHC string form, as persisted on an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

/// Failures while hashing or verifying a password.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// Hashing the plaintext failed.
    #[error("failed to hash password: {0}")]
    Hashing(argon2::password_hash::Error),
    /// A stored hash is not a valid PHC string.
    #[error("stored password hash is malformed: {0}")]
    MalformedStored(argon2::password_hash::Error),
}

impl HashedPassword {
    /// Hash `plaintext` with a freshly generated salt.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Hashing`] if the Argon2 computation fails.
    pub fn from_plaintext(plaintext: &str) -> Result<Self, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hashed = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(HashError::Hashing)?;
        Ok(Self(hashed.to_string()))
    }

    /// Wrap a PHC string loaded from storage, validating its shape.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::MalformedStored`] if `phc` does not parse as a
    /// PHC string.
    pub fn from_stored(phc: String) -> Result<Self, HashError> {
        PasswordHash::new(&phc).map_err(HashError::MalformedStored)?;
        Ok(Self(phc))
    }

    /// Check `candidate` against the stored hash.
    ///
    /// A mismatch is an `Ok(false)`, not an error; only a malformed stored
    /// value or an internal Argon2 failure is an `Err`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::MalformedStored`] if the stored value no longer
    /// parses, or [`HashError::Hashing`] if verification itself fails.
    pub fn verify(&self, candidate: &str) -> Result<bool, HashError> {
        let parsed = PasswordHash::new(&self.0).map_err(HashError::MalformedStored)?;
        match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(error) => Err(HashError::Hashing(error)),
        }
    }

    /// The PHC string, for persistence.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{HashError, HashedPassword};

    #[rstest]
    fn round_trips_verification() -> Result<(), HashError> {
        let hashed = HashedPassword::from_plaintext("Br3ad&Rice")?;
        assert!(hashed.verify("Br3ad&Rice")?);
        assert!(!hashed.verify("Br3ad&Rice2")?);
        Ok(())
    }

    #[rstest]
    fn produces_phc_strings() -> Result<(), HashError> {
        let hashed = HashedPassword::from_plaintext("aaaaaa1!")?;
        assert!(hashed.as_str().starts_with("$argon2"));
        Ok(())
    }

    #[rstest]
    fn salts_are_unique_per_hash() -> Result<(), HashError> {
        let first = HashedPassword::from_plaintext("aaaaaa1!")?;
        let second = HashedPassword::from_plaintext("aaaaaa1!")?;
        assert_ne!(first, second);
        Ok(())
    }

    #[rstest]
    fn accepts_stored_phc_strings() -> Result<(), HashError> {
        let hashed = HashedPassword::from_plaintext("aaaaaa1!")?;
        let reloaded = HashedPassword::from_stored(hashed.as_str().to_owned())?;
        assert!(reloaded.verify("aaaaaa1!")?);
        Ok(())
    }

    #[rstest]
    fn rejects_malformed_stored_values() {
        let result = HashedPassword::from_stored("not-a-phc-string".to_owned());
        assert!(matches!(result, Err(HashError::MalformedStored(_))));
    }
}
