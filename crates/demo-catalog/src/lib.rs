//! Curated demo catalog data for running HarvestWorld without a hosted
//! gateway.
//!
//! This crate provides a small, deterministic set of plants and profiles
//! used to seed the backend's fixture adapters when demo mode is enabled.
//! It is deliberately independent of backend domain types to avoid
//! circular dependencies; the backend converts these records at the
//! adapter boundary and revalidates them there.
//!
//! # Example
//!
//! ```
//! use demo_catalog::{demo_plants, demo_profiles, verify_integrity};
//!
//! let plants = demo_plants();
//! let profiles = demo_profiles();
//! verify_integrity(&plants, &profiles).expect("curated data is coherent");
//!
//! assert!(profiles.iter().any(|p| p.role == "admin"));
//! ```

use serde::{Deserialize, Serialize};

/// Storage category values the backend recognises.
///
/// Kept in sync with the backend's category table; [`verify_integrity`]
/// rejects plants outside this vocabulary so drift is caught by tests
/// rather than by an empty category page.
pub const KNOWN_CATEGORIES: [&str; 4] = ["vegetables", "fruits", "grains", "spices"];

/// Password accepted by the fixture auth gateway for every demo profile.
pub const DEMO_PASSWORD: &str = "berkebun123";

/// One plant record in demo storage shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoPlant {
    /// Stable plant identifier.
    pub id: i64,
    /// Common (Indonesian) plant name.
    pub name: String,
    /// Latin name, when curated.
    pub scientific_name: Option<String>,
    /// Storage category value, one of [`KNOWN_CATEGORIES`].
    pub category: String,
    /// Short growing note shown on detail pages.
    pub description: String,
    /// Relative image path, when curated.
    pub image_url: Option<String>,
    /// Free-form difficulty label (`mudah`, `sedang`, `sulit`).
    pub difficulty: Option<String>,
}

/// One profile record in demo storage shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoProfile {
    /// Stable profile identifier.
    pub id: i64,
    /// Sign-in email address, unique across the set.
    pub email: String,
    /// Public display name, when curated.
    pub display_name: Option<String>,
    /// Role wire value: `user`, `expert`, or `admin`.
    pub role: String,
    /// Avatar image path, when curated.
    pub avatar_url: Option<String>,
}

/// Integrity failures in curated demo data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DemoCatalogError {
    /// Two plants share an identifier.
    #[error("duplicate plant id {id}")]
    DuplicatePlantId {
        /// The duplicated plant identifier.
        id: i64,
    },
    /// Two profiles share an identifier.
    #[error("duplicate profile id {id}")]
    DuplicateProfileId {
        /// The duplicated profile identifier.
        id: i64,
    },
    /// A plant names a category outside [`KNOWN_CATEGORIES`].
    #[error("plant {id} has unknown category '{category}'")]
    UnknownCategory {
        /// Identifier of the offending plant.
        id: i64,
        /// The unrecognised category name.
        category: String,
    },
    /// A profile names a role outside the backend vocabulary.
    #[error("profile {id} has unknown role '{role}'")]
    UnknownRole {
        /// Identifier of the offending profile.
        id: i64,
        /// The unrecognised role name.
        role: String,
    },
    /// Two profiles share an email address.
    #[error("duplicate profile email '{email}'")]
    DuplicateEmail {
        /// The duplicated email address.
        email: String,
    },
}

fn plant(
    id: i64,
    name: &str,
    scientific_name: Option<&str>,
    category: &str,
    description: &str,
    difficulty: Option<&str>,
) -> DemoPlant {
    DemoPlant {
        id,
        name: name.to_owned(),
        scientific_name: scientific_name.map(str::to_owned),
        category: category.to_owned(),
        description: description.to_owned(),
        image_url: Some(format!("/images/plants/{id}.jpg")),
        difficulty: difficulty.map(str::to_owned),
    }
}

fn profile(id: i64, email: &str, display_name: Option<&str>, role: &str) -> DemoProfile {
    DemoProfile {
        id,
        email: email.to_owned(),
        display_name: display_name.map(str::to_owned),
        role: role.to_owned(),
        avatar_url: None,
    }
}

/// Curated plant listing covering every category.
#[must_use]
pub fn demo_plants() -> Vec<DemoPlant> {
    vec![
        plant(
            1,
            "Bayam",
            Some("Amaranthus"),
            "vegetables",
            "Sayuran daun cepat panen, cocok untuk pot dan kebun kecil.",
            Some("mudah"),
        ),
        plant(
            2,
            "Kangkung",
            Some("Ipomoea aquatica"),
            "vegetables",
            "Tumbuh subur di media basah dan bisa dipanen berulang.",
            Some("mudah"),
        ),
        plant(
            3,
            "Tomat",
            Some("Solanum lycopersicum"),
            "fruits",
            "Butuh ajir dan sinar matahari penuh untuk berbuah lebat.",
            Some("sedang"),
        ),
        plant(
            4,
            "Stroberi",
            Some("Fragaria x ananassa"),
            "fruits",
            "Menyukai dataran tinggi yang sejuk, berbuah sepanjang tahun.",
            Some("sulit"),
        ),
        plant(
            5,
            "Jagung",
            Some("Zea mays"),
            "grains",
            "Tanam berkelompok agar penyerbukan angin berhasil.",
            Some("sedang"),
        ),
        plant(
            6,
            "Padi",
            Some("Oryza sativa"),
            "grains",
            "Membutuhkan genangan air dan perawatan gulma rutin.",
            Some("sulit"),
        ),
        plant(
            7,
            "Jahe",
            Some("Zingiber officinale"),
            "spices",
            "Rimpang ditanam dangkal di media gembur yang kaya kompos.",
            Some("mudah"),
        ),
        plant(
            8,
            "Kunyit",
            Some("Curcuma longa"),
            "spices",
            "Tahan naungan ringan, dipanen setelah daun mengering.",
            Some("mudah"),
        ),
    ]
}

/// Curated profile listing with one admin and a mixed user/expert set.
///
/// Profile `7` is a plain user so a fresh demo environment can walk the
/// promote-to-expert flow end to end.
#[must_use]
pub fn demo_profiles() -> Vec<DemoProfile> {
    vec![
        profile(1, "admin@harvestworld.id", Some("Dewi Lestari"), "admin"),
        profile(2, "made@harvestworld.id", Some("Made Wirawan"), "expert"),
        profile(3, "siti@harvestworld.id", Some("Siti Rahma"), "expert"),
        profile(5, "agus@harvestworld.id", Some("Agus Pratama"), "user"),
        profile(7, "budi@harvestworld.id", Some("Budi Santoso"), "user"),
        profile(11, "rina@harvestworld.id", None, "user"),
    ]
}

/// Check curated data for duplicate ids, duplicate emails, and vocabulary
/// drift.
///
/// # Errors
///
/// Returns the first [`DemoCatalogError`] encountered.
pub fn verify_integrity(
    plants: &[DemoPlant],
    profiles: &[DemoProfile],
) -> Result<(), DemoCatalogError> {
    let mut plant_ids = std::collections::BTreeSet::new();
    for plant in plants {
        if !plant_ids.insert(plant.id) {
            return Err(DemoCatalogError::DuplicatePlantId { id: plant.id });
        }
        if !KNOWN_CATEGORIES.contains(&plant.category.as_str()) {
            return Err(DemoCatalogError::UnknownCategory {
                id: plant.id,
                category: plant.category.clone(),
            });
        }
    }

    let mut profile_ids = std::collections::BTreeSet::new();
    let mut emails = std::collections::BTreeSet::new();
    for profile in profiles {
        if !profile_ids.insert(profile.id) {
            return Err(DemoCatalogError::DuplicateProfileId { id: profile.id });
        }
        if !emails.insert(profile.email.clone()) {
            return Err(DemoCatalogError::DuplicateEmail {
                email: profile.email.clone(),
            });
        }
        if !["user", "expert", "admin"].contains(&profile.role.as_str()) {
            return Err(DemoCatalogError::UnknownRole {
                id: profile.id,
                role: profile.role.clone(),
            });
        }
    }

    Ok(())
}
