//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, stores, the mailer) are implemented by
//! outbound adapters; driving ports are implemented by the domain services
//! and consumed by the HTTP layer.

mod macros;
pub(crate) use macros::define_port_error;

mod donation_command;
mod donation_query;
mod donation_store;
mod donor_repository;
mod login_service;
mod mailer;
mod notification_command;
mod notification_query;
mod notification_store;
mod organization_repository;
mod password_reset_command;
mod registration_command;

#[cfg(test)]
pub use donation_command::MockDonationCommand;
pub use donation_command::DonationCommand;
#[cfg(test)]
pub use donation_query::MockDonationQuery;
pub use donation_query::{
    DonationQuery, DonorProfile, DropOff, OrganizationDirectoryEntry, OrganizationProfile,
};
#[cfg(test)]
pub use donation_store::MockDonationStore;
pub use donation_store::{DonationStore, DonationStoreError};
#[cfg(test)]
pub use donor_repository::MockDonorRepository;
pub use donor_repository::{DonorPersistenceError, DonorRepository};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use mailer::MockMailer;
pub use mailer::{Mailer, MailerError};
#[cfg(test)]
pub use notification_command::MockNotificationCommand;
pub use notification_command::NotificationCommand;
#[cfg(test)]
pub use notification_query::MockNotificationQuery;
pub use notification_query::NotificationQuery;
#[cfg(test)]
pub use notification_store::MockNotificationStore;
pub use notification_store::{NotificationStore, NotificationStoreError};
#[cfg(test)]
pub use organization_repository::MockOrganizationRepository;
pub use organization_repository::{OrganizationPersistenceError, OrganizationRepository};
#[cfg(test)]
pub use password_reset_command::MockPasswordResetCommand;
pub use password_reset_command::PasswordResetCommand;
#[cfg(test)]
pub use registration_command::MockRegistrationCommand;
pub use registration_command::RegistrationCommand;
