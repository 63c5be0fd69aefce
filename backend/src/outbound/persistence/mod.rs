//! MongoDB persistence adapters, with in-memory fallbacks.
//!
//! Concrete implementations of the store ports, backed by two document
//! collections: each account document owns its donation history and its
//! notification feed.
//!
//! # Architecture
//!
//! The persistence layer follows these principles:
//!
//! - **Thin adapters**: Adapter implementations only translate between
//!   stored documents and domain types. No business logic resides here.
//! - **Internal documents**: BSON document structs (`documents.rs`) and
//!   their wire names are internal implementation details, never exposed
//!   to the domain layer.
//! - **Mirrored writes stay atomic**: the two copies of a donation are
//!   written and updated inside one client-session transaction.
//! - **Strongly typed errors**: All driver errors are mapped to the port
//!   error types, with unreachable-deployment failures kept apart from
//!   rejected operations.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{MongoConfig, MongoDonorRepository, MongoHandle};
//!
//! let config = MongoConfig::new("mongodb://localhost:27017", "foodbridge");
//! let handle = MongoHandle::connect(&config).await?;
//! let donors = MongoDonorRepository::new(handle);
//! ```

mod documents;
mod memory;
mod mongo;
mod mongo_donation_store;
mod mongo_donor_repository;
mod mongo_notification_store;
mod mongo_organization_repository;

pub use memory::InMemoryStores;
pub use mongo::{MongoConfig, MongoError, MongoHandle};
pub use mongo_donation_store::MongoDonationStore;
pub use mongo_donor_repository::MongoDonorRepository;
pub use mongo_notification_store::MongoNotificationStore;
pub use mongo_organization_repository::MongoOrganizationRepository;
