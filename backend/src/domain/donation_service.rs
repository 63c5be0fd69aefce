//! Donation submission, lifecycle transitions, and the read-side views.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::Error;
use crate::domain::accounts::{AccountRef, EmailAddress};
use crate::domain::donations::{
    DonationFilter, DonationSubmission, DonationTransition, DonorFacingRecord, MirroredDonation,
    OrderId, OrganizationFacingRecord, wire_date,
};
use crate::domain::mail::MailMessage;
use crate::domain::notifications::Notification;
use crate::domain::ports::{
    DonationCommand, DonationQuery, DonationStore, DonorProfile, DonorRepository, DropOff, Mailer,
    NotificationStore, OrganizationDirectoryEntry, OrganizationProfile, OrganizationRepository,
};
use crate::domain::service_support::{
    dispatch_mail, map_donation_store_error, map_donor_repository_error,
    map_organization_repository_error,
};

/// Donation orchestration across both account namespaces.
///
/// Implements [`DonationCommand`] and [`DonationQuery`].
pub struct DonationService<D: ?Sized, O: ?Sized, S: ?Sized, N: ?Sized, M: ?Sized> {
    donors: Arc<D>,
    organizations: Arc<O>,
    donations: Arc<S>,
    notifications: Arc<N>,
    mailer: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<D: ?Sized, O: ?Sized, S: ?Sized, N: ?Sized, M: ?Sized> DonationService<D, O, S, N, M> {
    /// Create a new service over the account, donation, notification, and
    /// mail ports.
    pub fn new(
        donors: Arc<D>,
        organizations: Arc<O>,
        donations: Arc<S>,
        notifications: Arc<N>,
        mailer: Arc<M>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            donors,
            organizations,
            donations,
            notifications,
            mailer,
            clock,
        }
    }
}

impl<D, O, S, N, M> DonationService<D, O, S, N, M>
where
    D: DonorRepository + ?Sized,
    O: OrganizationRepository + ?Sized,
    S: DonationStore + ?Sized,
    N: NotificationStore + ?Sized,
    M: Mailer + ?Sized + 'static,
{
    /// Append the post-commit notification.
    ///
    /// The donation write has already committed by the time this runs, so
    /// any store failure here is an internal error: the caller's mutation
    /// stands, only the side effect was lost.
    async fn append_notification(
        &self,
        account: AccountRef,
        notification: &Notification,
        order_id: &OrderId,
    ) -> Result<(), Error> {
        if let Err(error) = self.notifications.append(&account, notification).await {
            tracing::error!(
                order_id = order_id.as_str(),
                recipient = %account.email,
                error = %error,
                "donation write committed but the notification append failed"
            );
            return Err(Error::internal(format!(
                "notification append failed after commit: {error}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<D, O, S, N, M> DonationCommand for DonationService<D, O, S, N, M>
where
    D: DonorRepository + ?Sized,
    O: OrganizationRepository + ?Sized,
    S: DonationStore + ?Sized,
    N: NotificationStore + ?Sized,
    M: Mailer + ?Sized + 'static,
{
    async fn submit(
        &self,
        donor_email: &EmailAddress,
        submission: DonationSubmission,
    ) -> Result<OrderId, Error> {
        let donor = self
            .donors
            .find_by_email(donor_email)
            .await
            .map_err(map_donor_repository_error)?
            .ok_or_else(|| Error::not_found("donor account not found"))?;

        let organization = self
            .organizations
            .find_by_name(submission.organization_name.trim())
            .await
            .map_err(map_organization_repository_error)?
            .ok_or_else(|| Error::not_found("no organization with that name"))?;

        let validated = submission
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        let order_id = OrderId::generate();
        let date = wire_date::format(self.clock.local().date_naive());
        let mirrored =
            MirroredDonation::submit(&donor, &organization, validated, order_id.clone(), date);

        self.donations
            .record_mirrored(&mirrored)
            .await
            .map_err(map_donation_store_error)?;

        let notification =
            Notification::donation_received(&donor.name, &order_id, self.clock.utc());
        self.append_notification(
            AccountRef::organization(organization.email.clone()),
            &notification,
            &order_id,
        )
        .await?;

        dispatch_mail(
            &self.mailer,
            MailMessage::donation_received(
                organization.email.clone(),
                &donor.name,
                &order_id,
                mirrored.donor_copy.core.category,
                &mirrored.donor_copy.core.items,
            ),
        );

        Ok(order_id)
    }

    async fn transition(
        &self,
        organization_email: &EmailAddress,
        donor_email: &EmailAddress,
        order_id: &OrderId,
        transition: DonationTransition,
    ) -> Result<Vec<OrganizationFacingRecord>, Error> {
        let organization = self
            .organizations
            .find_by_email(organization_email)
            .await
            .map_err(map_organization_repository_error)?
            .ok_or_else(|| Error::not_found("organization account not found"))?;

        let donor = self
            .donors
            .find_by_email(donor_email)
            .await
            .map_err(map_donor_repository_error)?
            .ok_or_else(|| Error::not_found("donor account not found"))?;

        self.donations
            .apply_mirrored_transition(donor_email, organization_email, order_id, &transition)
            .await
            .map_err(map_donation_store_error)?;

        let now = self.clock.utc();
        let notification = match &transition {
            DonationTransition::Accept { .. } => {
                Notification::donation_accepted(&organization.organization_name, order_id, now)
            }
            DonationTransition::Reject => {
                Notification::donation_rejected(&organization.organization_name, order_id, now)
            }
            DonationTransition::Collect => {
                Notification::donation_collected(&organization.organization_name, order_id, now)
            }
        };
        self.append_notification(AccountRef::donor(donor.email.clone()), &notification, order_id)
            .await?;

        let message = match &transition {
            DonationTransition::Accept { pickup_time } => MailMessage::donation_accepted(
                donor.email.clone(),
                &organization.organization_name,
                order_id,
                pickup_time,
            ),
            DonationTransition::Reject => MailMessage::donation_rejected(
                donor.email.clone(),
                &organization.organization_name,
                order_id,
            ),
            DonationTransition::Collect => MailMessage::donation_collected(
                donor.email.clone(),
                &organization.organization_name,
                order_id,
            ),
        };
        dispatch_mail(&self.mailer, message);

        let filter = match transition {
            DonationTransition::Collect => DonationFilter::Settled,
            DonationTransition::Accept { .. } | DonationTransition::Reject => {
                DonationFilter::Pending
            }
        };
        self.organization_donations(organization_email, filter).await
    }
}

#[async_trait]
impl<D, O, S, N, M> DonationQuery for DonationService<D, O, S, N, M>
where
    D: DonorRepository + ?Sized,
    O: OrganizationRepository + ?Sized,
    S: DonationStore + ?Sized,
    N: NotificationStore + ?Sized,
    M: Mailer + ?Sized + 'static,
{
    async fn donor_history(
        &self,
        donor_email: &EmailAddress,
    ) -> Result<Vec<DonorFacingRecord>, Error> {
        self.donations
            .donor_history(donor_email)
            .await
            .map_err(map_donation_store_error)
    }

    async fn organization_donations(
        &self,
        organization_email: &EmailAddress,
        filter: DonationFilter,
    ) -> Result<Vec<OrganizationFacingRecord>, Error> {
        self.donations
            .organization_donations(organization_email, Some(filter))
            .await
            .map_err(map_donation_store_error)
    }

    async fn donor_profile(&self, donor_email: &EmailAddress) -> Result<DonorProfile, Error> {
        let donor = self
            .donors
            .find_by_email(donor_email)
            .await
            .map_err(map_donor_repository_error)?
            .ok_or_else(|| Error::not_found("donor account not found"))?;
        let history = self
            .donations
            .donor_history(donor_email)
            .await
            .map_err(map_donation_store_error)?;

        Ok(DonorProfile {
            name: donor.name,
            email: donor.email,
            phone: donor.phone,
            address: donor.address,
            total_donations: history.len(),
        })
    }

    async fn organization_profile(
        &self,
        organization_email: &EmailAddress,
    ) -> Result<OrganizationProfile, Error> {
        let organization = self
            .organizations
            .find_by_email(organization_email)
            .await
            .map_err(map_organization_repository_error)?
            .ok_or_else(|| Error::not_found("organization account not found"))?;
        let received = self
            .donations
            .organization_donations(organization_email, None)
            .await
            .map_err(map_donation_store_error)?;

        let drop_offs = received
            .iter()
            .map(|record| DropOff {
                donor_name: record.donor_name.clone(),
                address: record.donor_address.clone(),
                status: record.core.status,
            })
            .collect();

        Ok(OrganizationProfile {
            organization_name: organization.organization_name,
            registration_id: organization.registration_id,
            owner_name: organization.owner_name,
            email: organization.email,
            phone: organization.phone,
            address: organization.address,
            total_received: received.len(),
            drop_offs,
        })
    }

    async fn organizations_directory(&self) -> Result<Vec<OrganizationDirectoryEntry>, Error> {
        let organizations = self
            .organizations
            .list_all()
            .await
            .map_err(map_organization_repository_error)?;
        Ok(organizations
            .into_iter()
            .map(|organization| OrganizationDirectoryEntry {
                organization_name: organization.organization_name,
                city: organization.address.city,
                state: organization.address.state,
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "donation_service_tests.rs"]
mod tests;
