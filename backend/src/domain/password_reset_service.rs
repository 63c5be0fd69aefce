//! Password reset: token issuance and redemption.
//!
//! Tokens travel by email and are stored only as fingerprints. Redemption
//! looks the fingerprint up across both account namespaces, donors first;
//! tokens are long enough that a cross-namespace collision is not a
//! practical concern.

use std::sync::Arc;

use async_trait::async_trait;
use credentials::{ResetGrant, ResetToken};
use mockable::Clock;

use crate::domain::Error;
use crate::domain::accounts::{AccountRole, EmailAddress};
use crate::domain::mail::MailMessage;
use crate::domain::ports::{DonorRepository, Mailer, OrganizationRepository, PasswordResetCommand};
use crate::domain::service_support::{
    dispatch_mail, hash_password, map_donor_repository_error, map_organization_repository_error,
};

/// The one message every failed redemption shows; it never distinguishes
/// unknown tokens from expired ones.
fn invalid_link() -> Error {
    Error::invalid_request("reset link is invalid or has expired")
}

/// Issues reset tokens and redeems them for a new password.
///
/// Implements [`PasswordResetCommand`].
pub struct PasswordResetService<D: ?Sized, O: ?Sized, M: ?Sized> {
    donors: Arc<D>,
    organizations: Arc<O>,
    mailer: Arc<M>,
    clock: Arc<dyn Clock>,
    base_url: String,
}

impl<D: ?Sized, O: ?Sized, M: ?Sized> PasswordResetService<D, O, M> {
    /// Create a new service; `base_url` is the public origin the emailed
    /// reset links point at.
    pub fn new(
        donors: Arc<D>,
        organizations: Arc<O>,
        mailer: Arc<M>,
        clock: Arc<dyn Clock>,
        base_url: String,
    ) -> Self {
        Self {
            donors,
            organizations,
            mailer,
            clock,
            base_url,
        }
    }
}

impl<D, O, M> PasswordResetService<D, O, M>
where
    D: DonorRepository + ?Sized,
    O: OrganizationRepository + ?Sized,
    M: Mailer + ?Sized + 'static,
{
    async fn request_donor_reset(&self, email: &EmailAddress) -> Result<(), Error> {
        let Some(donor) = self
            .donors
            .find_by_email(email)
            .await
            .map_err(map_donor_repository_error)?
        else {
            return Ok(());
        };

        let token = ResetToken::generate();
        let grant = ResetGrant::issue(&token, self.clock.utc());
        self.donors
            .store_reset_grant(email, &grant)
            .await
            .map_err(map_donor_repository_error)?;

        dispatch_mail(
            &self.mailer,
            MailMessage::password_reset(donor.email, &self.base_url, &token),
        );
        Ok(())
    }

    async fn request_organization_reset(&self, email: &EmailAddress) -> Result<(), Error> {
        let Some(organization) = self
            .organizations
            .find_by_email(email)
            .await
            .map_err(map_organization_repository_error)?
        else {
            return Ok(());
        };

        let token = ResetToken::generate();
        let grant = ResetGrant::issue(&token, self.clock.utc());
        self.organizations
            .store_reset_grant(email, &grant)
            .await
            .map_err(map_organization_repository_error)?;

        dispatch_mail(
            &self.mailer,
            MailMessage::password_reset(organization.email, &self.base_url, &token),
        );
        Ok(())
    }
}

#[async_trait]
impl<D, O, M> PasswordResetCommand for PasswordResetService<D, O, M>
where
    D: DonorRepository + ?Sized,
    O: OrganizationRepository + ?Sized,
    M: Mailer + ?Sized + 'static,
{
    async fn request_reset(&self, email: &str, role: AccountRole) -> Result<(), Error> {
        let Ok(email) = EmailAddress::parse(email) else {
            return Ok(());
        };
        match role {
            AccountRole::Donor => self.request_donor_reset(&email).await,
            AccountRole::Organization => self.request_organization_reset(&email).await,
        }
    }

    async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), Error> {
        if new_password.chars().count() < 8 {
            return Err(Error::invalid_request(
                "password must be at least 8 characters long",
            ));
        }
        if new_password != confirm_password {
            return Err(Error::invalid_request("passwords do not match"));
        }

        let fingerprint = ResetToken::new(token.to_owned()).fingerprint();
        let now = self.clock.utc();

        if let Some(donor) = self
            .donors
            .find_by_reset_fingerprint(&fingerprint)
            .await
            .map_err(map_donor_repository_error)?
        {
            return match donor.reset_grant {
                Some(grant) if !grant.is_expired(now) => {
                    let password = hash_password(new_password.to_owned()).await?;
                    self.donors
                        .complete_password_reset(&donor.email, &password)
                        .await
                        .map_err(map_donor_repository_error)
                }
                _ => Err(invalid_link()),
            };
        }

        if let Some(organization) = self
            .organizations
            .find_by_reset_fingerprint(&fingerprint)
            .await
            .map_err(map_organization_repository_error)?
        {
            return match organization.reset_grant {
                Some(grant) if !grant.is_expired(now) => {
                    let password = hash_password(new_password.to_owned()).await?;
                    self.organizations
                        .complete_password_reset(&organization.email, &password)
                        .await
                        .map_err(map_organization_repository_error)
                }
                _ => Err(invalid_link()),
            };
        }

        Err(invalid_link())
    }
}

#[cfg(test)]
#[path = "password_reset_service_tests.rs"]
mod tests;
