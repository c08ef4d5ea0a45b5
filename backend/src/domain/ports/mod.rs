//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_gateway;
mod plant_catalog;
mod profile_directory;

#[cfg(test)]
pub use auth_gateway::MockAuthGateway;
pub use auth_gateway::{AuthGateway, AuthGatewayError, FixtureAuthGateway};
#[cfg(test)]
pub use plant_catalog::MockPlantCatalog;
pub use plant_catalog::{FixturePlantCatalog, PlantCatalog, PlantCatalogError};
#[cfg(test)]
pub use profile_directory::MockProfileDirectory;
pub use profile_directory::{FixtureProfileDirectory, ProfileDirectory, ProfileDirectoryError};
