//! Organization account aggregate and its registration flow.

use credentials::{HashedPassword, ResetGrant};

use super::email::EmailAddress;
use super::{
    RegistrationValidationError, address::PostalAddressParts, require_non_blank,
    validate_password_pair,
};

/// Raw organization registration input, exactly as submitted.
#[derive(Debug, Clone)]
pub struct OrganizationRegistration {
    pub organization_name: String,
    pub registration_id: String,
    pub owner_name: String,
    pub email: String,
    pub phone: String,
    pub address: PostalAddressParts,
    pub password: String,
    pub confirm_password: String,
}

impl OrganizationRegistration {
    /// Validate every field, returning the typed registration.
    ///
    /// Field checks mirror [`DonorRegistration::validate`]; uniqueness of
    /// the organization name and email is the caller's concern because it
    /// needs the store.
    ///
    /// [`DonorRegistration::validate`]: super::DonorRegistration::validate
    pub fn validate(self) -> Result<NewOrganization, RegistrationValidationError> {
        let organization_name = require_non_blank("organization name", &self.organization_name)?;
        let registration_id = require_non_blank("registration id", &self.registration_id)?;
        let owner_name = require_non_blank("owner name", &self.owner_name)?;
        let email = EmailAddress::parse(self.email)?;
        let phone = require_non_blank("phone number", &self.phone)?;
        let address = self.address.validated()?;
        validate_password_pair(&self.password, &self.confirm_password)?;

        Ok(NewOrganization {
            organization_name,
            registration_id,
            owner_name,
            email,
            phone,
            address,
            password: self.password,
        })
    }
}

/// A validated organization registration whose password is still plaintext.
#[derive(Debug, Clone)]
pub struct NewOrganization {
    pub organization_name: String,
    pub registration_id: String,
    pub owner_name: String,
    pub email: EmailAddress,
    pub phone: String,
    pub address: PostalAddressParts,
    /// Policy-checked plaintext; hash before persisting.
    pub password: String,
}

impl NewOrganization {
    /// Finish registration by attaching the password hash.
    pub fn into_account(self, password: HashedPassword) -> Organization {
        Organization {
            organization_name: self.organization_name,
            registration_id: self.registration_id,
            owner_name: self.owner_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            password,
            reset_grant: None,
        }
    }
}

/// A registered organization account.
///
/// `registration_id` is the registration number quoted at signup;
/// organization login re-checks it as a third credential factor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    pub organization_name: String,
    pub registration_id: String,
    pub owner_name: String,
    pub email: EmailAddress,
    pub phone: String,
    pub address: PostalAddressParts,
    pub password: HashedPassword,
    pub reset_grant: Option<ResetGrant>,
}
