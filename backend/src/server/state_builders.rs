//! Builders for the HTTP state ports over the configured backing stores.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use backend::domain::ports::{
    DonationStore, DonorRepository, Mailer, NotificationStore, OrganizationRepository,
};
use backend::domain::{AccountService, DonationService, NotificationService, PasswordResetService};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::mail::{HttpMailer, LogMailer, MailerConfig};
use backend::outbound::persistence::{
    InMemoryStores, MongoDonationStore, MongoDonorRepository, MongoHandle, MongoNotificationStore,
    MongoOrganizationRepository,
};

use super::ServerConfig;

/// The four backing-store ports, always selected as a unit so mirrored
/// donation copies and notification feeds land in the same backend.
struct StorePorts {
    donors: Arc<dyn DonorRepository>,
    organizations: Arc<dyn OrganizationRepository>,
    donations: Arc<dyn DonationStore>,
    notifications: Arc<dyn NotificationStore>,
}

/// Select store-backed ports when a handle is available, otherwise fall back
/// to a single shared in-memory store.
fn build_store_ports_with<H>(
    store: &Option<H>,
    make_store_backed: impl FnOnce(&H) -> StorePorts,
) -> StorePorts {
    match store {
        Some(handle) => make_store_backed(handle),
        None => memory_store_ports(),
    }
}

fn memory_store_ports() -> StorePorts {
    let stores = InMemoryStores::new();
    StorePorts {
        donors: Arc::new(stores.clone()),
        organizations: Arc::new(stores.clone()),
        donations: Arc::new(stores.clone()),
        notifications: Arc::new(stores),
    }
}

fn mongo_store_ports(handle: &MongoHandle) -> StorePorts {
    StorePorts {
        donors: Arc::new(MongoDonorRepository::new(handle.clone())),
        organizations: Arc::new(MongoOrganizationRepository::new(handle.clone())),
        donations: Arc::new(MongoDonationStore::new(handle.clone())),
        notifications: Arc::new(MongoNotificationStore::new(handle.clone())),
    }
}

fn build_store_ports(config: &ServerConfig) -> StorePorts {
    match &config.store {
        Some(_) => info!("using MongoDB-backed persistence"),
        None => warn!(
            "MongoDB is not configured; accounts and donations are held in process memory \
             and vanish on restart"
        ),
    }
    build_store_ports_with(&config.store, mongo_store_ports)
}

fn build_mailer(mail: &Option<MailerConfig>) -> std::io::Result<Arc<dyn Mailer>> {
    match mail {
        Some(config) => {
            let mailer = HttpMailer::new(config.clone()).map_err(|err| {
                std::io::Error::other(format!("failed to build mail client: {err}"))
            })?;
            Ok(Arc::new(mailer))
        }
        None => {
            info!("no mail API configured; outbound mail is logged instead of sent");
            Ok(Arc::new(LogMailer::new()))
        }
    }
}

/// Build the shared HTTP state from the configured store and mail backends.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let StorePorts {
        donors,
        organizations,
        donations,
        notifications,
    } = build_store_ports(config);
    let mailer = build_mailer(&config.mail)?;
    let clock = Arc::new(mockable::DefaultClock);

    let accounts = Arc::new(AccountService::new(
        Arc::clone(&donors),
        Arc::clone(&organizations),
    ));
    let donation_service = Arc::new(DonationService::new(
        Arc::clone(&donors),
        Arc::clone(&organizations),
        donations,
        Arc::clone(&notifications),
        Arc::clone(&mailer),
        clock.clone(),
    ));
    let notification_service = Arc::new(NotificationService::new(notifications));
    let password_resets = Arc::new(PasswordResetService::new(
        donors,
        organizations,
        mailer,
        clock,
        config.public_base_url.clone(),
    ));

    Ok(web::Data::new(HttpState::new(HttpStatePorts {
        registration: accounts.clone(),
        login: accounts,
        donations: donation_service.clone(),
        donations_query: donation_service,
        notifications: notification_service.clone(),
        notifications_query: notification_service,
        password_resets,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::domain::accounts::{Donor, EmailAddress, PostalAddressParts};
    use backend::domain::donations::OrderId;
    use backend::domain::mail::MailMessage;
    use credentials::HashedPassword;
    use rstest::{fixture, rstest};
    use url::Url;

    #[fixture]
    fn donor() -> Donor {
        Donor {
            name: "Ada Lovelace".into(),
            email: EmailAddress::parse("ada@example.org").expect("valid email"),
            phone: "9876543210".into(),
            address: PostalAddressParts {
                street: "21 Baker Street".into(),
                city: "Coimbatore".into(),
                district: "Coimbatore".into(),
                state: "Tamil Nadu".into(),
                postal_code: "641001".into(),
            },
            password: HashedPassword::from_plaintext("s3cret!pass").expect("hashing succeeds"),
            reset_grant: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn configured_store_selects_the_backed_ports(donor: Donor) {
        let backed = InMemoryStores::new();
        DonorRepository::insert(&backed, &donor)
            .await
            .expect("seed donor");

        let ports = build_store_ports_with(&Some(()), |_| StorePorts {
            donors: Arc::new(backed.clone()),
            organizations: Arc::new(backed.clone()),
            donations: Arc::new(backed.clone()),
            notifications: Arc::new(backed.clone()),
        });

        let found = ports
            .donors
            .find_by_email(&donor.email)
            .await
            .expect("lookup succeeds");
        assert_eq!(found, Some(donor));
    }

    #[rstest]
    #[tokio::test]
    async fn absent_store_keeps_state_in_memory(donor: Donor) {
        let ports = build_store_ports_with::<()>(&None, |_| {
            unreachable!("no handle should be consulted without a configured store")
        });

        let before = ports
            .donors
            .find_by_email(&donor.email)
            .await
            .expect("lookup succeeds");
        assert_eq!(before, None);

        ports.donors.insert(&donor).await.expect("insert succeeds");
        let after = ports
            .donors
            .find_by_email(&donor.email)
            .await
            .expect("lookup succeeds");
        assert_eq!(after, Some(donor));
    }

    #[rstest]
    #[tokio::test]
    async fn absent_mail_config_falls_back_to_the_log_mailer() {
        let mailer = build_mailer(&None).expect("mailer builds");

        let to = EmailAddress::parse("donor@example.org").expect("valid email");
        let message =
            MailMessage::donation_collected(to, "Helping Hands", &OrderId::generate());
        mailer.send(&message).await.expect("log delivery succeeds");
    }

    #[rstest]
    fn configured_mail_api_builds_an_http_client() {
        let config = MailerConfig {
            api_url: Url::parse("https://mail.example.org/v3/send").expect("valid url"),
            api_key: "test-key".into(),
            from: "FoodBridge <noreply@foodbridge.example.org>".into(),
        };
        assert!(build_mailer(&Some(config)).is_ok());
    }
}
