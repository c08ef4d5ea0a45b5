//! Plant category vocabulary and slug resolution.
//!
//! Categories appear in three renditions: the URL slug (Indonesian,
//! hyphenated), the storage name persisted by the catalogue gateway
//! (English), and the display label shown in page headers. Slug resolution
//! never guesses: a slug outside the vocabulary yields
//! [`CategoryLookup::Unknown`] with the requested slug preserved verbatim so
//! callers can report it.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Known plant categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Leafy and fruiting vegetables.
    Vegetables,
    /// Fruit-bearing plants.
    Fruits,
    /// Cereal and staple grains.
    Grains,
    /// Culinary and medicinal spices.
    Spices,
}

/// Outcome of resolving a URL slug against the category vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryLookup {
    /// The slug names a known category.
    Known(Category),
    /// The slug is outside the vocabulary.
    Unknown {
        /// Requested slug, preserved verbatim for error reporting.
        slug: String,
    },
}

impl Category {
    /// Every category, in presentation order.
    pub const ALL: [Self; 4] = [Self::Vegetables, Self::Fruits, Self::Grains, Self::Spices];

    /// URL slug for category pages.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Vegetables => "sayuran",
            Self::Fruits => "buah-buahan",
            Self::Grains => "biji-bijian",
            Self::Spices => "rempah-rempah",
        }
    }

    /// Name persisted by the catalogue gateway.
    #[must_use]
    pub const fn storage_name(self) -> &'static str {
        match self {
            Self::Vegetables => "vegetables",
            Self::Fruits => "fruits",
            Self::Grains => "grains",
            Self::Spices => "spices",
        }
    }

    /// Label shown in page headers.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Vegetables => "Sayuran",
            Self::Fruits => "Buah-buahan",
            Self::Grains => "Biji-bijian",
            Self::Spices => "Rempah-rempah",
        }
    }

    /// Resolve a URL slug, matching case-insensitively.
    ///
    /// # Examples
    /// ```
    /// use harvestworld::domain::{Category, CategoryLookup};
    ///
    /// assert_eq!(
    ///     Category::resolve("Sayuran"),
    ///     CategoryLookup::Known(Category::Vegetables)
    /// );
    /// assert_eq!(
    ///     Category::resolve("xyz"),
    ///     CategoryLookup::Unknown { slug: "xyz".to_owned() }
    /// );
    /// ```
    #[must_use]
    pub fn resolve(slug: &str) -> CategoryLookup {
        Self::ALL
            .into_iter()
            .find(|category| category.slug().eq_ignore_ascii_case(slug))
            .map_or_else(
                || CategoryLookup::Unknown {
                    slug: slug.to_owned(),
                },
                CategoryLookup::Known,
            )
    }

    /// Parse a storage name from a catalogue record.
    #[must_use]
    pub fn from_storage(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.storage_name() == raw)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
