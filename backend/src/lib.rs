//! HarvestWorld backend library.
//!
//! The crate follows a ports-and-adapters layout: [`domain`] holds the
//! view-state machine, identity model, and port traits; [`inbound`] exposes
//! them over HTTP; [`outbound`] adapts the hosted REST gateway to the ports;
//! [`server`] assembles the application and its middleware.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
