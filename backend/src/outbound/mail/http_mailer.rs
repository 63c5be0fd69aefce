//! Reqwest-backed mailer adapter.
//!
//! This adapter owns transport details only: request serialisation, timeout
//! and HTTP error mapping. Message composition happens in the domain layer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::domain::mail::MailMessage;
use crate::domain::ports::{Mailer, MailerError};

const DEFAULT_SEND_TIMEOUT_SECONDS: u64 = 10;

/// Connection settings for the transactional mail API.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Endpoint accepting the JSON send request.
    pub api_url: Url,
    /// Bearer token presented on every request.
    pub api_key: String,
    /// Sender address stamped on every message.
    pub from: String,
}

/// Wire form of one send request.
#[derive(Serialize)]
struct OutboundMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Mailer adapter that POSTs each message to one HTTP endpoint.
pub struct HttpMailer {
    client: Client,
    config: MailerConfig,
}

impl HttpMailer {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: MailerConfig) -> Result<Self, reqwest::Error> {
        Self::with_timeout(config, Duration::from_secs(DEFAULT_SEND_TIMEOUT_SECONDS))
    }

    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(config: MailerConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailerError> {
        let payload = OutboundMessage {
            from: self.config.from.as_str(),
            to: message.to.as_str(),
            subject: message.subject.as_str(),
            text: message.body.as_str(),
        };
        let response = self
            .client
            .post(self.config.api_url.clone())
            .bearer_auth(self.config.api_key.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(())
    }
}

fn map_transport_error(error: reqwest::Error) -> MailerError {
    if error.is_timeout() {
        MailerError::timeout(error.to_string())
    } else {
        MailerError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> MailerError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => MailerError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => MailerError::timeout(message),
        _ if status.is_client_error() => MailerError::invalid_request(message),
        _ => MailerError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
