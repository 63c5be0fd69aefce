//! Donor account aggregate and its registration flow.

use credentials::{HashedPassword, ResetGrant};

use super::email::EmailAddress;
use super::{
    RegistrationValidationError, address::PostalAddressParts, require_non_blank,
    validate_password_pair,
};

/// Raw donor registration input, exactly as submitted.
#[derive(Debug, Clone)]
pub struct DonorRegistration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: PostalAddressParts,
    pub password: String,
    pub confirm_password: String,
}

impl DonorRegistration {
    /// Validate every field, returning the typed registration.
    ///
    /// The password is checked against the shared policy but deliberately
    /// left in plaintext; hashing happens once the caller has confirmed the
    /// email is not already registered.
    pub fn validate(self) -> Result<NewDonor, RegistrationValidationError> {
        let name = require_non_blank("name", &self.name)?;
        let email = EmailAddress::parse(self.email)?;
        let phone = require_non_blank("phone number", &self.phone)?;
        let address = self.address.validated()?;
        validate_password_pair(&self.password, &self.confirm_password)?;

        Ok(NewDonor {
            name,
            email,
            phone,
            address,
            password: self.password,
        })
    }
}

/// A validated donor registration whose password is still plaintext.
#[derive(Debug, Clone)]
pub struct NewDonor {
    pub name: String,
    pub email: EmailAddress,
    pub phone: String,
    pub address: PostalAddressParts,
    /// Policy-checked plaintext; hash before persisting.
    pub password: String,
}

impl NewDonor {
    /// Finish registration by attaching the password hash.
    pub fn into_account(self, password: HashedPassword) -> Donor {
        Donor {
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            password,
            reset_grant: None,
        }
    }
}

/// A registered donor account.
///
/// Fields are public; each component type enforces its own invariants. The
/// donation history and notification feed the account owns are modelled
/// separately and reached through the store ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Donor {
    pub name: String,
    pub email: EmailAddress,
    pub phone: String,
    pub address: PostalAddressParts,
    pub password: HashedPassword,
    pub reset_grant: Option<ResetGrant>,
}
