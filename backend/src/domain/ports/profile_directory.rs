//! Driven port for reading and mutating member profiles.
//!
//! The gateway's `profiles` table backs session resolution, the
//! authorisation gate's role lookup, the member directory, and the admin
//! role mutation. The domain owns the contract so page orchestration stays
//! adapter-agnostic.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::identity::{AssignableRole, Identity, IdentityId, Role};

define_port_error! {
    /// Errors surfaced while talking to the profile store.
    pub enum ProfileDirectoryError {
        /// The gateway rejected the request for auth reasons.
        Denied { message: String } =>
            "profile store denied request: {message}",
        /// The gateway rejected the request shape.
        InvalidRequest { message: String } =>
            "profile store rejected request: {message}",
        /// No profile row exists for the identifier.
        NotFound { message: String } =>
            "profile not found: {message}",
        /// Call exceeded the configured timeout.
        Timeout { message: String } =>
            "profile store timeout: {message}",
        /// The gateway rate-limited the request.
        RateLimited { message: String } =>
            "profile store rate limited request: {message}",
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "profile store transport failed: {message}",
        /// The response payload could not be decoded.
        Decode { message: String } =>
            "profile store response decode failed: {message}",
    }
}

impl ProfileDirectoryError {
    /// Message suitable for showing to the user, when the gateway sent one.
    ///
    /// Transport-level failures carry diagnostic text rather than copy users
    /// should read, so those return `None` and callers fall back to the
    /// generic localised string.
    pub fn gateway_message(&self) -> Option<&str> {
        match self {
            Self::Denied { message }
            | Self::InvalidRequest { message }
            | Self::NotFound { message } => {
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

/// Port for profile reads and role mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Fetch the full profile for an identity, if one exists.
    async fn profile_of(
        &self,
        id: IdentityId,
    ) -> Result<Option<Identity>, ProfileDirectoryError>;

    /// Fetch just the role for an identity.
    ///
    /// A missing profile row is an error rather than an empty result: the
    /// authorisation gate treats every failure here as a denial.
    async fn role_of(&self, id: IdentityId) -> Result<Role, ProfileDirectoryError>;

    /// List every member holding `role`, ordered by display name.
    async fn members_with_role(
        &self,
        role: Role,
    ) -> Result<Vec<Identity>, ProfileDirectoryError>;

    /// Set the role of the member identified by `id`.
    async fn assign_role(
        &self,
        id: IdentityId,
        role: AssignableRole,
    ) -> Result<(), ProfileDirectoryError>;
}

/// In-memory directory used for demo deployments and tests.
///
/// Cloning shares the underlying store, so an auth fixture and a directory
/// fixture can be wired over the same members.
#[derive(Debug, Clone, Default)]
pub struct FixtureProfileDirectory {
    members: Arc<RwLock<BTreeMap<IdentityId, Identity>>>,
}

impl FixtureProfileDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory holding the provided members.
    #[must_use]
    pub fn with_members(members: impl IntoIterator<Item = Identity>) -> Self {
        let directory = Self::new();
        for member in members {
            directory.insert(member);
        }
        directory
    }

    /// Insert or replace a member.
    pub fn insert(&self, member: Identity) {
        let mut members = self.members.write().unwrap_or_else(|err| err.into_inner());
        members.insert(member.id, member);
    }

    /// Look up a member by email.
    #[must_use]
    pub fn find_by_email(&self, email: &str) -> Option<Identity> {
        let members = self.members.read().unwrap_or_else(|err| err.into_inner());
        members
            .values()
            .find(|member| member.email.as_str() == email)
            .cloned()
    }

    /// Smallest identifier not yet taken.
    #[must_use]
    pub fn next_id(&self) -> IdentityId {
        let members = self.members.read().unwrap_or_else(|err| err.into_inner());
        let max = members.keys().map(|id| id.value()).max().unwrap_or(0);
        IdentityId::new(max + 1)
    }
}

#[async_trait]
impl ProfileDirectory for FixtureProfileDirectory {
    async fn profile_of(
        &self,
        id: IdentityId,
    ) -> Result<Option<Identity>, ProfileDirectoryError> {
        let members = self.members.read().unwrap_or_else(|err| err.into_inner());
        Ok(members.get(&id).cloned())
    }

    async fn role_of(&self, id: IdentityId) -> Result<Role, ProfileDirectoryError> {
        let members = self.members.read().unwrap_or_else(|err| err.into_inner());
        members.get(&id).map(|member| member.role).ok_or_else(|| {
            ProfileDirectoryError::not_found(format!("no profile row for id {id}"))
        })
    }

    async fn members_with_role(
        &self,
        role: Role,
    ) -> Result<Vec<Identity>, ProfileDirectoryError> {
        let members = self.members.read().unwrap_or_else(|err| err.into_inner());
        let mut matching: Vec<Identity> = members
            .values()
            .filter(|member| member.role == role)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.label().cmp(b.label()));
        Ok(matching)
    }

    async fn assign_role(
        &self,
        id: IdentityId,
        role: AssignableRole,
    ) -> Result<(), ProfileDirectoryError> {
        let mut members = self.members.write().unwrap_or_else(|err| err.into_inner());
        let member = members.get_mut(&id).ok_or_else(|| {
            ProfileDirectoryError::not_found(format!("no profile row for id {id}"))
        })?;
        member.role = role.as_role();
        Ok(())
    }
}
