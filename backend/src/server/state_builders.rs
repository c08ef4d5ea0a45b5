//! Builders selecting port implementations for the HTTP state.
//!
//! With gateway settings present, one [`HttpGateway`] client backs all
//! three driven ports. Without them the server falls back to the in-memory
//! fixtures, seeded from the curated demo catalog when the `demo-catalog`
//! feature is compiled in and the runtime toggle has not disabled it.

use std::io;
use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use crate::domain::ports::{FixtureAuthGateway, FixturePlantCatalog, FixtureProfileDirectory};
use crate::inbound::http::state::HttpState;
use crate::outbound::gateway::HttpGateway;

use super::config::ServerConfig;

/// Shared password accepted by the fixture gateway when no demo catalog is
/// seeded. Accounts created through signup authenticate with this password,
/// not the one submitted.
const FIXTURE_PASSWORD: &str = "berkebun123";

/// Build the shared HTTP state from gateway settings or fixture fallbacks.
pub(super) fn build_http_state(config: &ServerConfig) -> io::Result<web::Data<HttpState>> {
    let Some(gateway) = &config.gateway else {
        return build_fixture_state(config.demo_catalog);
    };

    let client = HttpGateway::new(
        gateway.url.clone(),
        gateway.api_key.clone(),
        gateway.timeout,
    )
    .map_err(|err| io::Error::other(format!("gateway client construction failed: {err}")))?;
    let client = Arc::new(client);
    info!(url = %gateway.url, "hosted gateway backs auth, catalog, and directory");
    Ok(web::Data::new(HttpState::new(
        client.clone(),
        client.clone(),
        client,
    )))
}

#[cfg(feature = "demo-catalog")]
fn build_fixture_state(seed_demo: bool) -> io::Result<web::Data<HttpState>> {
    use demo_catalog::{demo_plants, demo_profiles, verify_integrity, DEMO_PASSWORD};

    if !seed_demo {
        warn!("demo catalog seeding is disabled; fixture adapters start empty");
        return Ok(empty_fixture_state());
    }

    let plants = demo_plants();
    let profiles = demo_profiles();
    verify_integrity(&plants, &profiles)
        .map_err(|err| io::Error::other(format!("demo catalog integrity check failed: {err}")))?;

    let plant_count = plants.len();
    let profile_count = profiles.len();
    let members = profiles
        .into_iter()
        .map(demo_identity)
        .collect::<io::Result<Vec<_>>>()?;

    let directory = FixtureProfileDirectory::with_members(members);
    let catalog = FixturePlantCatalog::with_plants(plants.into_iter().map(demo_plant));
    let auth = FixtureAuthGateway::new(directory.clone(), DEMO_PASSWORD);
    info!(
        plants = plant_count,
        profiles = profile_count,
        "fixture adapters seeded with the curated demo catalog"
    );

    Ok(web::Data::new(HttpState::new(
        Arc::new(auth),
        Arc::new(catalog),
        Arc::new(directory),
    )))
}

#[cfg(not(feature = "demo-catalog"))]
fn build_fixture_state(_seed_demo: bool) -> io::Result<web::Data<HttpState>> {
    warn!("no gateway configured and the demo catalog is not compiled in; fixture adapters start empty");
    Ok(empty_fixture_state())
}

fn empty_fixture_state() -> web::Data<HttpState> {
    let directory = FixtureProfileDirectory::new();
    let auth = FixtureAuthGateway::new(directory.clone(), FIXTURE_PASSWORD);

    web::Data::new(HttpState::new(
        Arc::new(auth),
        Arc::new(FixturePlantCatalog::default()),
        Arc::new(directory),
    ))
}

#[cfg(feature = "demo-catalog")]
fn demo_plant(record: demo_catalog::DemoPlant) -> crate::domain::Plant {
    use crate::domain::{Plant, PlantId};

    Plant {
        id: PlantId::new(record.id),
        name: record.name,
        scientific_name: record.scientific_name,
        category: record.category,
        description: record.description,
        image_url: record.image_url,
        difficulty: record.difficulty,
    }
}

#[cfg(feature = "demo-catalog")]
fn demo_identity(record: demo_catalog::DemoProfile) -> io::Result<crate::domain::Identity> {
    use crate::domain::{DisplayName, EmailAddress, Identity, IdentityId, Role};

    let email = EmailAddress::parse(&record.email)
        .map_err(|err| io::Error::other(format!("demo profile {}: {err}", record.id)))?;
    let display_name = record
        .display_name
        .as_deref()
        .map(DisplayName::parse)
        .transpose()
        .map_err(|err| io::Error::other(format!("demo profile {}: {err}", record.id)))?;
    let role: Role = record
        .role
        .parse()
        .map_err(|err| io::Error::other(format!("demo profile {}: {err}", record.id)))?;

    Ok(Identity {
        id: IdentityId::new(record.id),
        email,
        display_name,
        role,
        avatar_url: record.avatar_url,
        created_at: None,
    })
}
