//! Account registration and login.
//!
//! Donors and organizations live in separate namespaces: the same email may
//! hold one account of each role, and a login only ever consults the
//! namespace of the role it claims.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::accounts::{
    Donor, DonorRegistration, EmailAddress, Organization, OrganizationRegistration,
};
use crate::domain::ports::{
    DonorRepository, LoginService, OrganizationRepository, RegistrationCommand,
};
use crate::domain::service_support::{
    hash_password, map_donor_repository_error, map_organization_repository_error, verify_password,
};

fn parse_email(email: &str) -> Result<EmailAddress, Error> {
    EmailAddress::parse(email).map_err(|err| Error::invalid_request(err.to_string()))
}

/// Registration and credential verification for both account roles.
///
/// Implements [`RegistrationCommand`] and [`LoginService`].
pub struct AccountService<D: ?Sized, O: ?Sized> {
    donors: Arc<D>,
    organizations: Arc<O>,
}

impl<D: ?Sized, O: ?Sized> AccountService<D, O> {
    /// Create a new service with the given account repositories.
    pub fn new(donors: Arc<D>, organizations: Arc<O>) -> Self {
        Self {
            donors,
            organizations,
        }
    }
}

#[async_trait]
impl<D, O> RegistrationCommand for AccountService<D, O>
where
    D: DonorRepository + ?Sized,
    O: OrganizationRepository + ?Sized,
{
    async fn register_donor(&self, registration: DonorRegistration) -> Result<Donor, Error> {
        let new_donor = registration
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        let existing = self
            .donors
            .find_by_email(&new_donor.email)
            .await
            .map_err(map_donor_repository_error)?;
        if existing.is_some() {
            return Err(Error::conflict(
                "a donor account already exists for this email",
            ));
        }

        let password = hash_password(new_donor.password.clone()).await?;
        let donor = new_donor.into_account(password);
        self.donors
            .insert(&donor)
            .await
            .map_err(map_donor_repository_error)?;
        Ok(donor)
    }

    async fn register_organization(
        &self,
        registration: OrganizationRegistration,
    ) -> Result<Organization, Error> {
        let new_organization = registration
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        let existing = self
            .organizations
            .find_by_email(&new_organization.email)
            .await
            .map_err(map_organization_repository_error)?;
        if existing.is_some() {
            return Err(Error::conflict(
                "an organization account already exists for this email",
            ));
        }

        let duplicate_name = self
            .organizations
            .find_by_name(&new_organization.organization_name)
            .await
            .map_err(map_organization_repository_error)?;
        if duplicate_name.is_some() {
            return Err(Error::conflict(
                "an organization with this name already exists",
            ));
        }

        let password = hash_password(new_organization.password.clone()).await?;
        let organization = new_organization.into_account(password);
        self.organizations
            .insert(&organization)
            .await
            .map_err(map_organization_repository_error)?;
        Ok(organization)
    }
}

#[async_trait]
impl<D, O> LoginService for AccountService<D, O>
where
    D: DonorRepository + ?Sized,
    O: OrganizationRepository + ?Sized,
{
    async fn login_donor(&self, email: &str, password: &str) -> Result<Donor, Error> {
        let email = parse_email(email)?;
        let Some(donor) = self
            .donors
            .find_by_email(&email)
            .await
            .map_err(map_donor_repository_error)?
        else {
            return Err(Error::invalid_request("donor email not found"));
        };

        if !verify_password(donor.password.clone(), password.to_owned()).await? {
            return Err(Error::invalid_request("incorrect password"));
        }
        Ok(donor)
    }

    async fn login_organization(
        &self,
        email: &str,
        password: &str,
        registration_id: &str,
    ) -> Result<Organization, Error> {
        let email = parse_email(email)?;
        let Some(organization) = self
            .organizations
            .find_by_email(&email)
            .await
            .map_err(map_organization_repository_error)?
        else {
            return Err(Error::invalid_request("organization email not found"));
        };

        if !verify_password(organization.password.clone(), password.to_owned()).await? {
            return Err(Error::invalid_request("incorrect password"));
        }
        if organization.registration_id != registration_id {
            return Err(Error::invalid_request("organization id does not match"));
        }
        Ok(organization)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
