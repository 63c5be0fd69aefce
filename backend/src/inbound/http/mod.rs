//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod donations;
pub mod error;
pub mod health;
pub mod notifications;
pub mod password_reset;
pub mod profiles;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
