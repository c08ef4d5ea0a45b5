//! Driven port for authentication against the identity gateway.
//!
//! Sign-in and sign-up are the only operations pages perform against the
//! gateway's auth surface. Session persistence happens on this side of the
//! boundary (a private cookie), so the port deals purely in credentials and
//! resolved identities.

use async_trait::async_trait;

use super::define_port_error;
use super::profile_directory::FixtureProfileDirectory;
use crate::domain::auth::{Credentials, Registration};
use crate::domain::identity::{Identity, Role};

define_port_error! {
    /// Errors surfaced while calling the identity gateway.
    pub enum AuthGatewayError {
        /// Credentials were rejected or the caller lacks permission.
        Denied { message: String } =>
            "identity gateway denied request: {message}",
        /// The account cannot be created as requested.
        Conflict { message: String } =>
            "identity gateway conflict: {message}",
        /// Call exceeded the configured timeout.
        Timeout { message: String } =>
            "identity gateway timeout: {message}",
        /// The gateway rate-limited the request.
        RateLimited { message: String } =>
            "identity gateway rate limited request: {message}",
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "identity gateway transport failed: {message}",
        /// The response payload could not be decoded.
        Decode { message: String } =>
            "identity gateway response decode failed: {message}",
    }
}

impl AuthGatewayError {
    /// Message suitable for showing to the user, when the gateway sent one.
    pub fn gateway_message(&self) -> Option<&str> {
        match self {
            Self::Denied { message } | Self::Conflict { message } => {
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

/// Port for authentication operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Authenticate credentials and return the signed-in identity.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthGatewayError>;

    /// Register a new account and return the created identity.
    async fn sign_up(&self, registration: &Registration) -> Result<Identity, AuthGatewayError>;
}

/// In-memory gateway used for demo deployments and tests.
///
/// Accepts one shared password for every member known to the wrapped
/// directory, mirroring how a seeded demo environment behaves.
#[derive(Debug, Clone)]
pub struct FixtureAuthGateway {
    directory: FixtureProfileDirectory,
    password: String,
}

impl FixtureAuthGateway {
    /// Wire the gateway over a shared member directory.
    #[must_use]
    pub fn new(directory: FixtureProfileDirectory, password: impl Into<String>) -> Self {
        Self {
            directory,
            password: password.into(),
        }
    }
}

#[async_trait]
impl AuthGateway for FixtureAuthGateway {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthGatewayError> {
        if credentials.password() != self.password {
            return Err(AuthGatewayError::denied("Invalid login credentials"));
        }
        self.directory
            .find_by_email(credentials.email().as_str())
            .ok_or_else(|| AuthGatewayError::denied("Invalid login credentials"))
    }

    async fn sign_up(&self, registration: &Registration) -> Result<Identity, AuthGatewayError> {
        if self
            .directory
            .find_by_email(registration.email().as_str())
            .is_some()
        {
            return Err(AuthGatewayError::conflict("User already registered"));
        }

        let identity = Identity {
            id: self.directory.next_id(),
            email: registration.email().clone(),
            display_name: registration.display_name().cloned(),
            role: Role::User,
            avatar_url: None,
            created_at: None,
        };
        self.directory.insert(identity.clone());
        Ok(identity)
    }
}
