//! Email address value type shared by both account roles.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors returned by [`EmailAddress::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailValidationError {
    Empty,
    MissingAtSign,
    MissingLocalPart,
    MissingDomain,
    ContainsWhitespace,
}

impl fmt::Display for EmailValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "email must not be empty"),
            Self::MissingAtSign => write!(f, "email must contain an @ sign"),
            Self::MissingLocalPart => write!(f, "email must have a name before the @ sign"),
            Self::MissingDomain => write!(f, "email must have a domain after the @ sign"),
            Self::ContainsWhitespace => write!(f, "email must not contain spaces"),
        }
    }
}

impl std::error::Error for EmailValidationError {}

/// A structurally plausible email address.
///
/// Addresses are compared exactly as entered; lookups against stored accounts
/// are case-sensitive, so no normalisation happens here beyond trimming the
/// surrounding whitespace.
///
/// ## Invariants
/// - Non-empty local part and domain separated by a single leading `@`.
/// - No interior whitespace.
///
/// # Examples
/// ```
/// use backend::domain::accounts::EmailAddress;
///
/// let email = EmailAddress::parse(" ada@example.org ")?;
/// assert_eq!(email.as_str(), "ada@example.org");
/// # Ok::<(), backend::domain::accounts::EmailValidationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "ada@example.org")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn parse(value: impl Into<String>) -> Result<Self, EmailValidationError> {
        Self::from_owned(value.into())
    }

    fn from_owned(value: String) -> Result<Self, EmailValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(EmailValidationError::ContainsWhitespace);
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(EmailValidationError::MissingAtSign);
        };
        if local.is_empty() {
            return Err(EmailValidationError::MissingLocalPart);
        }
        if domain.is_empty() {
            return Err(EmailValidationError::MissingDomain);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Access the canonical textual form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}
