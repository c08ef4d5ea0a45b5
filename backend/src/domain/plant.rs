//! Plant catalogue records.
//!
//! Catalogue rows store the category as the raw storage string rather than
//! the parsed [`Category`](crate::domain::Category). Records with a category
//! outside the vocabulary still render; the label falls back to the stored
//! string so the row is never silently dropped.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::category::Category;

/// Opaque identifier of a catalogue plant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct PlantId(i64);

impl PlantId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PlantId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Catalogue plant as served to pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    /// Catalogue identifier.
    pub id: PlantId,
    /// Common name, e.g. "Bayam".
    pub name: String,
    /// Botanical name, when recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    /// Category storage name as persisted by the gateway.
    pub category: String,
    /// Care description shown on the detail page.
    pub description: String,
    /// Illustration URL, when recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Free-form difficulty label, when recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl Plant {
    /// Parse the stored category name on demand.
    #[must_use]
    pub fn category(&self) -> Option<Category> {
        Category::from_storage(&self.category)
    }

    /// Category label for display, falling back to the stored string when
    /// the name is outside the vocabulary.
    #[must_use]
    pub fn category_label(&self) -> &str {
        self.category()
            .map_or(self.category.as_str(), |category| {
                category.display_name()
            })
    }
}
