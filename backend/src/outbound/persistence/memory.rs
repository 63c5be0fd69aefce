//! In-memory implementations of every store port.
//!
//! One `RwLock` guards both account populations, so the mirrored donation
//! write can check and mutate the donor and organization slots under a
//! single lock and stay atomic. Startup falls back to these stores when no
//! MongoDB deployment is configured; nothing survives a restart.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use credentials::{HashedPassword, ResetGrant, TokenFingerprint};

use crate::domain::accounts::{AccountRef, AccountRole, Donor, EmailAddress, Organization};
use crate::domain::donations::{
    DonationFilter, DonationTransition, DonorFacingRecord, MirroredDonation, OrderId,
    OrganizationFacingRecord,
};
use crate::domain::notifications::{Notification, NotificationId};
use crate::domain::ports::{
    DonationStore, DonationStoreError, DonorPersistenceError, DonorRepository,
    NotificationStore, NotificationStoreError, OrganizationPersistenceError,
    OrganizationRepository,
};

/// One donor account with the history and feed it owns.
#[derive(Debug, Clone)]
struct DonorSlot {
    account: Donor,
    history: Vec<DonorFacingRecord>,
    notifications: Vec<Notification>,
}

impl DonorSlot {
    fn new(account: Donor) -> Self {
        Self {
            account,
            history: Vec::new(),
            notifications: Vec::new(),
        }
    }
}

/// One organization account with the history and feed it owns.
#[derive(Debug, Clone)]
struct OrganizationSlot {
    account: Organization,
    history: Vec<OrganizationFacingRecord>,
    notifications: Vec<Notification>,
}

impl OrganizationSlot {
    fn new(account: Organization) -> Self {
        Self {
            account,
            history: Vec::new(),
            notifications: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
struct State {
    donors: Vec<DonorSlot>,
    organizations: Vec<OrganizationSlot>,
}

/// Marker for a poisoned state lock; each port maps it to its own
/// query-error variant through `From`.
struct PoisonedLock;

const POISONED: &str = "in-memory state lock poisoned";

impl From<PoisonedLock> for DonorPersistenceError {
    fn from(_: PoisonedLock) -> Self {
        Self::query(POISONED)
    }
}

impl From<PoisonedLock> for OrganizationPersistenceError {
    fn from(_: PoisonedLock) -> Self {
        Self::query(POISONED)
    }
}

impl From<PoisonedLock> for DonationStoreError {
    fn from(_: PoisonedLock) -> Self {
        Self::query(POISONED)
    }
}

impl From<PoisonedLock> for NotificationStoreError {
    fn from(_: PoisonedLock) -> Self {
        Self::query(POISONED)
    }
}

/// All four store ports over one shared in-process state.
///
/// Clones share the state, so the same instance can be handed to every
/// service that needs a store.
#[derive(Clone, Default)]
pub struct InMemoryStores {
    state: Arc<RwLock<State>>,
}

impl InMemoryStores {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, PoisonedLock> {
        self.state.read().map_err(|_| PoisonedLock)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, PoisonedLock> {
        self.state.write().map_err(|_| PoisonedLock)
    }
}

fn donor_position(state: &State, email: &EmailAddress) -> Option<usize> {
    state
        .donors
        .iter()
        .position(|slot| slot.account.email == *email)
}

fn organization_position(state: &State, email: &EmailAddress) -> Option<usize> {
    state
        .organizations
        .iter()
        .position(|slot| slot.account.email == *email)
}

fn holds_fingerprint(grant: Option<&ResetGrant>, fingerprint: &TokenFingerprint) -> bool {
    grant.is_some_and(|grant| grant.fingerprint() == fingerprint)
}

/// Stamp a transition onto one stored record.
///
/// The pickup time is only touched when the transition quotes one, so a
/// collected donation keeps the time quoted at acceptance.
fn apply_transition(
    status: &mut crate::domain::donations::DonationStatus,
    pickup_time: &mut Option<String>,
    transition: &DonationTransition,
) {
    *status = transition.target_status();
    if let Some(time) = transition.pickup_time() {
        *pickup_time = Some(time.to_owned());
    }
}

#[async_trait]
impl DonorRepository for InMemoryStores {
    async fn insert(&self, donor: &Donor) -> Result<(), DonorPersistenceError> {
        let mut state = self.write()?;
        state.donors.push(DonorSlot::new(donor.clone()));
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Donor>, DonorPersistenceError> {
        let state = self.read()?;
        Ok(donor_position(&state, email).map(|index| state.donors[index].account.clone()))
    }

    async fn find_by_reset_fingerprint(
        &self,
        fingerprint: &TokenFingerprint,
    ) -> Result<Option<Donor>, DonorPersistenceError> {
        let state = self.read()?;
        Ok(state
            .donors
            .iter()
            .find(|slot| holds_fingerprint(slot.account.reset_grant.as_ref(), fingerprint))
            .map(|slot| slot.account.clone()))
    }

    async fn store_reset_grant(
        &self,
        email: &EmailAddress,
        grant: &ResetGrant,
    ) -> Result<(), DonorPersistenceError> {
        let mut state = self.write()?;
        let index = donor_position(&state, email)
            .ok_or_else(|| DonorPersistenceError::missing_account(email.as_str()))?;
        state.donors[index].account.reset_grant = Some(grant.clone());
        Ok(())
    }

    async fn complete_password_reset(
        &self,
        email: &EmailAddress,
        password: &HashedPassword,
    ) -> Result<(), DonorPersistenceError> {
        let mut state = self.write()?;
        let index = donor_position(&state, email)
            .ok_or_else(|| DonorPersistenceError::missing_account(email.as_str()))?;
        let account = &mut state.donors[index].account;
        account.password = password.clone();
        account.reset_grant = None;
        Ok(())
    }
}

#[async_trait]
impl OrganizationRepository for InMemoryStores {
    async fn insert(&self, organization: &Organization) -> Result<(), OrganizationPersistenceError> {
        let mut state = self.write()?;
        state
            .organizations
            .push(OrganizationSlot::new(organization.clone()));
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Organization>, OrganizationPersistenceError> {
        let state = self.read()?;
        Ok(organization_position(&state, email)
            .map(|index| state.organizations[index].account.clone()))
    }

    async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Organization>, OrganizationPersistenceError> {
        let state = self.read()?;
        Ok(state
            .organizations
            .iter()
            .find(|slot| slot.account.organization_name == name)
            .map(|slot| slot.account.clone()))
    }

    async fn list_all(&self) -> Result<Vec<Organization>, OrganizationPersistenceError> {
        let state = self.read()?;
        Ok(state
            .organizations
            .iter()
            .map(|slot| slot.account.clone())
            .collect())
    }

    async fn find_by_reset_fingerprint(
        &self,
        fingerprint: &TokenFingerprint,
    ) -> Result<Option<Organization>, OrganizationPersistenceError> {
        let state = self.read()?;
        Ok(state
            .organizations
            .iter()
            .find(|slot| holds_fingerprint(slot.account.reset_grant.as_ref(), fingerprint))
            .map(|slot| slot.account.clone()))
    }

    async fn store_reset_grant(
        &self,
        email: &EmailAddress,
        grant: &ResetGrant,
    ) -> Result<(), OrganizationPersistenceError> {
        let mut state = self.write()?;
        let index = organization_position(&state, email)
            .ok_or_else(|| OrganizationPersistenceError::missing_account(email.as_str()))?;
        state.organizations[index].account.reset_grant = Some(grant.clone());
        Ok(())
    }

    async fn complete_password_reset(
        &self,
        email: &EmailAddress,
        password: &HashedPassword,
    ) -> Result<(), OrganizationPersistenceError> {
        let mut state = self.write()?;
        let index = organization_position(&state, email)
            .ok_or_else(|| OrganizationPersistenceError::missing_account(email.as_str()))?;
        let account = &mut state.organizations[index].account;
        account.password = password.clone();
        account.reset_grant = None;
        Ok(())
    }
}

#[async_trait]
impl DonationStore for InMemoryStores {
    async fn record_mirrored(&self, donation: &MirroredDonation) -> Result<(), DonationStoreError> {
        let mut state = self.write()?;
        // Resolve both slots before writing either side.
        let donor_index = donor_position(&state, &donation.donor_email).ok_or_else(|| {
            DonationStoreError::missing_account(donation.donor_email.as_str())
        })?;
        let organization_index = organization_position(&state, &donation.organization_email)
            .ok_or_else(|| {
                DonationStoreError::missing_account(donation.organization_email.as_str())
            })?;

        state.donors[donor_index]
            .history
            .push(donation.donor_copy.clone());
        state.organizations[organization_index]
            .history
            .push(donation.organization_copy.clone());
        Ok(())
    }

    async fn apply_mirrored_transition(
        &self,
        donor_email: &EmailAddress,
        organization_email: &EmailAddress,
        order_id: &OrderId,
        transition: &DonationTransition,
    ) -> Result<(), DonationStoreError> {
        let mut state = self.write()?;
        let missing = || DonationStoreError::missing_record(order_id.as_str());

        // Resolve both record positions before touching either copy.
        let donor_index = donor_position(&state, donor_email).ok_or_else(missing)?;
        let donor_record = state.donors[donor_index]
            .history
            .iter()
            .position(|record| record.core.order_id == *order_id)
            .ok_or_else(missing)?;
        let organization_index =
            organization_position(&state, organization_email).ok_or_else(missing)?;
        let organization_record = state.organizations[organization_index]
            .history
            .iter()
            .position(|record| record.core.order_id == *order_id)
            .ok_or_else(missing)?;

        let donor_core = &mut state.donors[donor_index].history[donor_record].core;
        apply_transition(&mut donor_core.status, &mut donor_core.pickup_time, transition);
        let organization_core =
            &mut state.organizations[organization_index].history[organization_record].core;
        apply_transition(
            &mut organization_core.status,
            &mut organization_core.pickup_time,
            transition,
        );
        Ok(())
    }

    async fn donor_history(
        &self,
        donor_email: &EmailAddress,
    ) -> Result<Vec<DonorFacingRecord>, DonationStoreError> {
        let state = self.read()?;
        Ok(donor_position(&state, donor_email)
            .map(|index| state.donors[index].history.clone())
            .unwrap_or_default())
    }

    async fn organization_donations(
        &self,
        organization_email: &EmailAddress,
        filter: Option<DonationFilter>,
    ) -> Result<Vec<OrganizationFacingRecord>, DonationStoreError> {
        let state = self.read()?;
        let records = organization_position(&state, organization_email)
            .map(|index| state.organizations[index].history.clone())
            .unwrap_or_default();
        Ok(match filter {
            Some(filter) => records
                .into_iter()
                .filter(|record| filter.matches(record.core.status))
                .collect(),
            None => records,
        })
    }
}

#[async_trait]
impl NotificationStore for InMemoryStores {
    async fn append(
        &self,
        account: &AccountRef,
        notification: &Notification,
    ) -> Result<(), NotificationStoreError> {
        let mut state = self.write()?;
        let feed = match account.role {
            AccountRole::Donor => donor_position(&state, &account.email)
                .map(|index| &mut state.donors[index].notifications),
            AccountRole::Organization => organization_position(&state, &account.email)
                .map(|index| &mut state.organizations[index].notifications),
        }
        .ok_or_else(|| NotificationStoreError::missing_account(account.email.as_str()))?;
        feed.push(notification.clone());
        Ok(())
    }

    async fn feed(
        &self,
        account: &AccountRef,
    ) -> Result<Vec<Notification>, NotificationStoreError> {
        let state = self.read()?;
        let feed = match account.role {
            AccountRole::Donor => donor_position(&state, &account.email)
                .map(|index| state.donors[index].notifications.clone()),
            AccountRole::Organization => organization_position(&state, &account.email)
                .map(|index| state.organizations[index].notifications.clone()),
        };
        let mut feed = feed.unwrap_or_default();
        // Stored in arrival order; served newest first.
        feed.reverse();
        Ok(feed)
    }

    async fn mark_read(
        &self,
        account: &AccountRef,
        id: &NotificationId,
    ) -> Result<(), NotificationStoreError> {
        let mut state = self.write()?;
        let feed = match account.role {
            AccountRole::Donor => donor_position(&state, &account.email)
                .map(|index| &mut state.donors[index].notifications),
            AccountRole::Organization => organization_position(&state, &account.email)
                .map(|index| &mut state.organizations[index].notifications),
        }
        .ok_or_else(|| NotificationStoreError::missing_notification(id.as_str()))?;
        let entry = feed
            .iter_mut()
            .find(|notification| notification.id == *id)
            .ok_or_else(|| NotificationStoreError::missing_notification(id.as_str()))?;
        // Marking twice is allowed and changes nothing.
        entry.read = true;
        Ok(())
    }
}
