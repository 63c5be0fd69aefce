//! MongoDB client handle shared by the persistence adapters.
//!
//! Connecting validates the deployment with a `ping` so a bad URI or an
//! unreachable server surfaces at startup rather than on the first request.
//! The handle is cheap to clone; every adapter holds its own copy.

use mongodb::bson::doc;
use mongodb::error::ErrorKind;
use mongodb::{Client, Collection, Database};

use super::documents::{
    DONORS_COLLECTION, DonorDocument, ORGANIZATIONS_COLLECTION, OrganizationDocument,
};

/// Errors that can occur while establishing the MongoDB connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MongoError {
    /// The connection string could not be parsed or applied.
    #[error("invalid MongoDB configuration: {message}")]
    Config { message: String },

    /// The deployment did not answer the startup ping.
    #[error("MongoDB deployment is unreachable: {message}")]
    Unreachable { message: String },
}

impl MongoError {
    /// Create a configuration error with the given message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an unreachable error with the given message.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }
}

/// Connection settings for the document store.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    uri: String,
    database: String,
}

impl MongoConfig {
    /// Create a new configuration from a connection string and database name.
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
        }
    }

    /// Get the connection string.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Get the database name.
    pub fn database(&self) -> &str {
        &self.database
    }
}

/// Shared handle to the account collections.
#[derive(Clone)]
pub struct MongoHandle {
    client: Client,
    database: Database,
}

impl MongoHandle {
    /// Connect to the deployment described by `config` and verify it answers.
    ///
    /// # Errors
    ///
    /// Returns [`MongoError::Config`] when the URI cannot be parsed and
    /// [`MongoError::Unreachable`] when the ping gets no healthy server.
    pub async fn connect(config: &MongoConfig) -> Result<Self, MongoError> {
        let client = Client::with_uri_str(config.uri())
            .await
            .map_err(|err| MongoError::config(err.to_string()))?;
        let database = client.database(config.database());
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|err| MongoError::unreachable(err.to_string()))?;
        Ok(Self { client, database })
    }

    /// The underlying client, for starting transaction sessions.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The donor account collection.
    pub(crate) fn donors(&self) -> Collection<DonorDocument> {
        self.database.collection(DONORS_COLLECTION)
    }

    /// The organization account collection.
    pub(crate) fn organizations(&self) -> Collection<OrganizationDocument> {
        self.database.collection(ORGANIZATIONS_COLLECTION)
    }
}

/// Whether a driver error means the deployment could not be reached at all,
/// as opposed to a rejected operation.
pub(crate) fn is_unreachable(error: &mongodb::error::Error) -> bool {
    matches!(*error.kind, ErrorKind::ServerSelection { .. })
}
