//! Driven port for reading the plant catalogue.
//!
//! Pages only ever read plants. Listing is filtered by category and ordered
//! by name, matching what the gateway's query surface is asked for.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::category::Category;
use crate::domain::plant::{Plant, PlantId};

define_port_error! {
    /// Errors surfaced while reading the catalogue.
    pub enum PlantCatalogError {
        /// The gateway rejected the request for auth reasons.
        Denied { message: String } =>
            "catalogue denied request: {message}",
        /// The gateway rejected the request shape.
        InvalidRequest { message: String } =>
            "catalogue rejected request: {message}",
        /// Call exceeded the configured timeout.
        Timeout { message: String } =>
            "catalogue timeout: {message}",
        /// The gateway rate-limited the request.
        RateLimited { message: String } =>
            "catalogue rate limited request: {message}",
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "catalogue transport failed: {message}",
        /// The response payload could not be decoded.
        Decode { message: String } =>
            "catalogue response decode failed: {message}",
    }
}

impl PlantCatalogError {
    /// Message suitable for showing to the user, when the gateway sent one.
    pub fn gateway_message(&self) -> Option<&str> {
        match self {
            Self::Denied { message } | Self::InvalidRequest { message } => {
                let trimmed = message.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            Self::Timeout { .. }
            | Self::RateLimited { .. }
            | Self::Transport { .. }
            | Self::Decode { .. } => None,
        }
    }
}

/// Port for catalogue reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlantCatalog: Send + Sync {
    /// List the whole catalogue, ordered by name.
    async fn all_plants(&self) -> Result<Vec<Plant>, PlantCatalogError>;

    /// List every plant in `category`, ordered by name.
    async fn plants_in_category(
        &self,
        category: Category,
    ) -> Result<Vec<Plant>, PlantCatalogError>;

    /// Fetch a single plant by identifier, if one exists.
    async fn plant_by_id(&self, id: PlantId) -> Result<Option<Plant>, PlantCatalogError>;
}

/// In-memory catalogue used for demo deployments and tests.
#[derive(Debug, Clone, Default)]
pub struct FixturePlantCatalog {
    plants: Vec<Plant>,
}

impl FixturePlantCatalog {
    /// Create a catalogue holding the provided plants.
    #[must_use]
    pub fn with_plants(plants: impl IntoIterator<Item = Plant>) -> Self {
        Self {
            plants: plants.into_iter().collect(),
        }
    }
}

#[async_trait]
impl PlantCatalog for FixturePlantCatalog {
    async fn all_plants(&self) -> Result<Vec<Plant>, PlantCatalogError> {
        let mut all = self.plants.clone();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn plants_in_category(
        &self,
        category: Category,
    ) -> Result<Vec<Plant>, PlantCatalogError> {
        let mut matching: Vec<Plant> = self
            .plants
            .iter()
            .filter(|plant| plant.category == category.storage_name())
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matching)
    }

    async fn plant_by_id(&self, id: PlantId) -> Result<Option<Plant>, PlantCatalogError> {
        Ok(self.plants.iter().find(|plant| plant.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn plant(id: i64, name: &str, category: &str) -> Plant {
        Plant {
            id: PlantId::new(id),
            name: name.to_owned(),
            scientific_name: None,
            category: category.to_owned(),
            description: String::new(),
            image_url: None,
            difficulty: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn listing_filters_by_category_and_orders_by_name() {
        let catalog = FixturePlantCatalog::with_plants([
            plant(1, "Kangkung", "vegetables"),
            plant(2, "Bayam", "vegetables"),
            plant(3, "Jahe", "spices"),
        ]);

        let listed = catalog
            .plants_in_category(Category::Vegetables)
            .await
            .expect("fixture reads succeed");
        let names: Vec<&str> = listed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Bayam", "Kangkung"]);
    }

    #[rstest]
    #[tokio::test]
    async fn full_listing_spans_categories_in_name_order() {
        let catalog = FixturePlantCatalog::with_plants([
            plant(1, "Kangkung", "vegetables"),
            plant(2, "Bayam", "vegetables"),
            plant(3, "Jahe", "spices"),
        ]);

        let listed = catalog.all_plants().await.expect("fixture reads succeed");
        let names: Vec<&str> = listed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Bayam", "Jahe", "Kangkung"]);
    }

    #[rstest]
    #[tokio::test]
    async fn lookup_by_id_returns_none_for_missing_plants() {
        let catalog = FixturePlantCatalog::with_plants([plant(1, "Bayam", "vegetables")]);

        assert!(
            catalog
                .plant_by_id(PlantId::new(1))
                .await
                .expect("fixture reads succeed")
                .is_some()
        );
        assert!(
            catalog
                .plant_by_id(PlantId::new(99))
                .await
                .expect("fixture reads succeed")
                .is_none()
        );
    }
}
