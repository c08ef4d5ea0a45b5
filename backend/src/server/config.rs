//! Server settings loaded via OrthoConfig and the resolved configuration
//! handed to [`create_server`](super::create_server).

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 10;

/// Configuration values controlling the listener and gateway wiring.
///
/// When `gateway_url` is unset the server runs on in-memory fixture
/// adapters instead of the hosted gateway.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HARVESTWORLD")]
pub struct ServerSettings {
    /// Base URL of the hosted gateway.
    pub gateway_url: Option<String>,
    /// Service key sent with every gateway request.
    pub gateway_api_key: Option<String>,
    /// Per-request gateway timeout in seconds.
    pub gateway_timeout_secs: Option<u64>,
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// Seed the fixture adapters with the curated demo catalog on startup.
    ///
    /// Only consulted when the `demo-catalog` feature is compiled in; a
    /// feature-enabled build seeds by default and can be told not to.
    #[ortho_config(default = true, cli_default_as_absent)]
    pub demo_catalog: bool,
}

/// Errors raised while resolving [`ServerSettings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("bind address '{value}' is not a socket address")]
    InvalidBindAddr { value: String },
    #[error("gateway URL '{value}' does not parse: {source}")]
    InvalidGatewayUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("HARVESTWORLD_GATEWAY_URL is set but HARVESTWORLD_GATEWAY_API_KEY is missing")]
    MissingApiKey,
    #[error("HARVESTWORLD_GATEWAY_API_KEY is set but HARVESTWORLD_GATEWAY_URL is missing")]
    KeyWithoutUrl,
}

/// Resolved connection settings for the hosted gateway.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub(crate) url: Url,
    pub(crate) api_key: String,
    pub(crate) timeout: Duration,
}

impl ServerSettings {
    /// Return the configured bind address, falling back to the default.
    ///
    /// # Errors
    /// Returns an error when the configured value is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
        })
    }

    /// Return the gateway settings, or `None` when fixtures should be used.
    ///
    /// # Errors
    /// Returns an error when the URL does not parse or when only one half of
    /// the URL/key pair is configured.
    pub fn gateway(&self) -> Result<Option<GatewaySettings>, SettingsError> {
        let Some(raw_url) = self.gateway_url.as_deref() else {
            if self.gateway_api_key.is_some() {
                return Err(SettingsError::KeyWithoutUrl);
            }
            return Ok(None);
        };

        let url = Url::parse(raw_url).map_err(|source| SettingsError::InvalidGatewayUrl {
            value: raw_url.to_owned(),
            source,
        })?;
        let api_key = self
            .gateway_api_key
            .clone()
            .ok_or(SettingsError::MissingApiKey)?;
        let timeout = Duration::from_secs(
            self.gateway_timeout_secs
                .unwrap_or(DEFAULT_GATEWAY_TIMEOUT_SECS),
        );

        Ok(Some(GatewaySettings {
            url,
            api_key,
            timeout,
        }))
    }
}

/// Resolved configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) gateway: Option<GatewaySettings>,
    pub(crate) demo_catalog: bool,
}

impl ServerConfig {
    /// Construct a server configuration from validated session settings and a
    /// bind address.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            gateway: None,
            demo_catalog: true,
        }
    }

    /// Attach hosted gateway settings.
    ///
    /// Without them the server wires in-memory fixture adapters.
    #[must_use]
    pub fn with_gateway(mut self, gateway: Option<GatewaySettings>) -> Self {
        self.gateway = gateway;
        self
    }

    /// Control demo catalog seeding when the server runs on fixtures.
    #[must_use]
    pub fn with_demo_catalog(mut self, demo_catalog: bool) -> Self {
        self.demo_catalog = demo_catalog;
        self
    }
}
