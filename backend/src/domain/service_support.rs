//! Shared plumbing for the domain services: port-error mapping, blocking
//! credential work, and fire-and-forget mail dispatch.

use std::sync::Arc;

use credentials::HashedPassword;

use crate::domain::Error;
use crate::domain::mail::MailMessage;
use crate::domain::ports::{
    DonationStoreError, DonorPersistenceError, Mailer, NotificationStoreError,
    OrganizationPersistenceError,
};

pub(crate) fn map_donor_repository_error(error: DonorPersistenceError) -> Error {
    match error {
        DonorPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("donor repository unavailable: {message}"))
        }
        DonorPersistenceError::Query { message } => {
            Error::internal(format!("donor repository error: {message}"))
        }
        DonorPersistenceError::MissingAccount { email } => {
            Error::not_found(format!("no donor account for {email}"))
        }
    }
}

pub(crate) fn map_organization_repository_error(error: OrganizationPersistenceError) -> Error {
    match error {
        OrganizationPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("organization repository unavailable: {message}"))
        }
        OrganizationPersistenceError::Query { message } => {
            Error::internal(format!("organization repository error: {message}"))
        }
        OrganizationPersistenceError::MissingAccount { email } => {
            Error::not_found(format!("no organization account for {email}"))
        }
    }
}

pub(crate) fn map_donation_store_error(error: DonationStoreError) -> Error {
    match error {
        DonationStoreError::Connection { message } => {
            Error::service_unavailable(format!("donation store unavailable: {message}"))
        }
        DonationStoreError::Query { message } => {
            Error::internal(format!("donation store error: {message}"))
        }
        DonationStoreError::MissingAccount { email } => {
            Error::not_found(format!("no account holds donations for {email}"))
        }
        DonationStoreError::MissingRecord { order_id } => {
            Error::not_found(format!("no donation with order id {order_id}"))
        }
    }
}

pub(crate) fn map_notification_store_error(error: NotificationStoreError) -> Error {
    match error {
        NotificationStoreError::Connection { message } => {
            Error::service_unavailable(format!("notification store unavailable: {message}"))
        }
        NotificationStoreError::Query { message } => {
            Error::internal(format!("notification store error: {message}"))
        }
        NotificationStoreError::MissingAccount { email } => {
            Error::not_found(format!("no notification feed for {email}"))
        }
        NotificationStoreError::MissingNotification { id } => {
            Error::not_found(format!("no notification with id {id}"))
        }
    }
}

/// Hash a password on the blocking pool; Argon2 takes tens of milliseconds.
pub(crate) async fn hash_password(plaintext: String) -> Result<HashedPassword, Error> {
    tokio::task::spawn_blocking(move || HashedPassword::from_plaintext(&plaintext))
        .await
        .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
        .map_err(|err| Error::internal(format!("password hashing failed: {err}")))
}

/// Verify a password candidate on the blocking pool.
pub(crate) async fn verify_password(
    hash: HashedPassword,
    candidate: String,
) -> Result<bool, Error> {
    tokio::task::spawn_blocking(move || hash.verify(&candidate))
        .await
        .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?
        .map_err(|err| Error::internal(format!("password verification failed: {err}")))
}

/// Spawn a mail send onto the runtime and forget it.
///
/// Mail never sits on a request's critical path: the caller's mutation has
/// already committed by the time this runs, and a failed send only leaves a
/// warning in the log.
pub(crate) fn dispatch_mail<M>(mailer: &Arc<M>, message: MailMessage)
where
    M: Mailer + ?Sized + 'static,
{
    let mailer = Arc::clone(mailer);
    tokio::spawn(async move {
        if let Err(error) = mailer.send(&message).await {
            tracing::warn!(
                kind = message.kind.as_str(),
                recipient = %message.to,
                error = %error,
                "mail dispatch failed"
            );
        }
    });
}
