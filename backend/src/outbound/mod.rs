//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern: adapters are thin
//! translators between domain types and wire representations and contain no
//! business logic.
//!
//! - **gateway**: HTTP client for the hosted gateway's identity and table
//!   surfaces, implementing the auth, catalog, and directory ports.

pub mod gateway;
