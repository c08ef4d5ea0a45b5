//! HTTP inbound adapter: page handlers, the page-session API, and probes.

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod error;
pub(crate) mod guard;
pub mod health;
pub(crate) mod redirects;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
