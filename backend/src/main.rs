//! Backend entry-point: resolves configuration and starts the HTTP server.

use actix_web::web;
use color_eyre::eyre::WrapErr;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use harvestworld::inbound::http::health::HealthState;
use harvestworld::inbound::http::session_config::fingerprint::key_fingerprint;
use harvestworld::inbound::http::session_config::{BuildMode, SessionSettings};
use harvestworld::server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let session = SessionSettings::from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("session configuration is invalid")?;
    info!(
        key_fingerprint = %key_fingerprint(&session.key),
        cookie_secure = session.cookie_secure,
        "session settings resolved"
    );

    let settings = ServerSettings::load().wrap_err("server settings failed to load")?;
    let bind_addr = settings.bind_addr()?;
    let gateway = settings.gateway()?;
    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_gateway(gateway)
    .with_demo_catalog(settings.demo_catalog);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await.wrap_err("server terminated abnormally")
}
