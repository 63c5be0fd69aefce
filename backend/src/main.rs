//! Backend entry-point: wires the REST endpoints, backing stores, and mail.

mod server;

use std::env;
use std::net::SocketAddr;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::{BuildMode, SessionSettings};
use backend::outbound::mail::MailerConfig;
use backend::outbound::persistence::{MongoConfig, MongoHandle};
use server::ServerConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DATABASE: &str = "FoodBridge";
const DEFAULT_MAIL_FROM: &str = "FoodBridge <noreply@foodbridge.example>";

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let session = SessionSettings::from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|err| std::io::Error::other(format!("session configuration invalid: {err}")))?;

    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.into())
        .parse()
        .map_err(|err| std::io::Error::other(format!("invalid BIND_ADDR: {err}")))?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    );
    if let Some(handle) = mongo_handle_from_env().await? {
        config = config.with_store(handle);
    }
    if let Some(mail) = mailer_config_from_env()? {
        config = config.with_mailer(mail);
    }
    if let Ok(base_url) = env::var("PUBLIC_BASE_URL") {
        config = config.with_public_base_url(base_url);
    }

    let health_state = web::Data::new(HealthState::new());
    server::create_server(health_state, config)?.await
}

/// Connect to MongoDB when `MONGODB_URI` is set.
///
/// A configured deployment that cannot be reached is a startup failure; an
/// unconfigured one falls back to in-memory state.
async fn mongo_handle_from_env() -> std::io::Result<Option<MongoHandle>> {
    let Ok(uri) = env::var("MONGODB_URI") else {
        return Ok(None);
    };
    let database = env::var("MONGODB_DB").unwrap_or_else(|_| DEFAULT_DATABASE.into());
    let mongo = MongoConfig::new(uri, database);
    let handle = MongoHandle::connect(&mongo)
        .await
        .map_err(|err| std::io::Error::other(format!("MongoDB connection failed: {err}")))?;
    info!(database = %mongo.database(), "connected to MongoDB");
    Ok(Some(handle))
}

/// Assemble the mail API configuration when `MAIL_API_URL` and
/// `MAIL_API_KEY` are both set.
fn mailer_config_from_env() -> std::io::Result<Option<MailerConfig>> {
    let Ok(raw_url) = env::var("MAIL_API_URL") else {
        return Ok(None);
    };
    let api_url = Url::parse(&raw_url)
        .map_err(|err| std::io::Error::other(format!("invalid MAIL_API_URL: {err}")))?;
    let Ok(api_key) = env::var("MAIL_API_KEY") else {
        warn!("MAIL_API_URL is set but MAIL_API_KEY is not; mail will be logged instead");
        return Ok(None);
    };
    let from = env::var("MAIL_FROM").unwrap_or_else(|_| DEFAULT_MAIL_FROM.into());
    Ok(Some(MailerConfig {
        api_url,
        api_key,
        from,
    }))
}
