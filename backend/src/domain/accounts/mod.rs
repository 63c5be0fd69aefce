//! Account aggregates for the two registration roles.
//!
//! Donors and organizations are distinct account populations with separate
//! stores; an email registered for one role may be registered again for the
//! other. Shared value types (email, postal address) and the shared
//! registration validation error live here.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod address;
pub mod donor;
pub mod email;
pub mod organization;

pub use self::address::{AddressValidationError, PostalAddress, PostalAddressParts};
pub use self::donor::{Donor, DonorRegistration, NewDonor};
pub use self::email::{EmailAddress, EmailValidationError};
pub use self::organization::{NewOrganization, Organization, OrganizationRegistration};

/// Which of the two account populations an email belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Donor,
    Organization,
}

impl AccountRole {
    /// Stable `snake_case` name, used in logs and session bookkeeping.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Donor => "donor",
            Self::Organization => "organization",
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Addresses one account across either population.
///
/// Used by operations that work the same way for both roles, such as the
/// notification feed and password reset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountRef {
    pub role: AccountRole,
    pub email: EmailAddress,
}

impl AccountRef {
    pub fn donor(email: EmailAddress) -> Self {
        Self {
            role: AccountRole::Donor,
            email,
        }
    }

    pub fn organization(email: EmailAddress) -> Self {
        Self {
            role: AccountRole::Organization,
            email,
        }
    }
}

/// Validation errors raised by the registration flows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationValidationError {
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error(transparent)]
    Email(#[from] EmailValidationError),
    #[error(transparent)]
    Address(#[from] AddressValidationError),
    #[error(transparent)]
    Password(#[from] credentials::PolicyViolation),
}

fn require_non_blank(
    field: &'static str,
    value: &str,
) -> Result<String, RegistrationValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RegistrationValidationError::MissingField { field });
    }
    Ok(trimmed.to_owned())
}

/// Check the confirmation matches, then apply the shared password policy.
fn validate_password_pair(
    password: &str,
    confirmation: &str,
) -> Result<(), RegistrationValidationError> {
    if password != confirmation {
        return Err(RegistrationValidationError::PasswordMismatch);
    }
    credentials::policy::validate(password)?;
    Ok(())
}
