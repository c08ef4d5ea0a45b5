//! Authorisation gate evaluated before a protected page touches any data.
//!
//! The gate is split in two. [`screen`] is a pure function from session
//! state to a decision value, so the redirect policy is testable without an
//! HTTP server or a directory. [`authorize`] drives the one asynchronous
//! arm: when a page requires a role, the member's current role is fetched
//! from the profile directory and compared. That lookup completes before the
//! caller may issue its own reads; callers sequence their data fetch after
//! this function returns `Allow`.
//!
//! Role lookup failure is treated exactly like a role mismatch: redirect to
//! the home page with nothing shown to the user. The failure is logged here,
//! fail closed.

use crate::domain::identity::{IdentityId, Role};
use crate::domain::ports::ProfileDirectory;
use crate::domain::session::SessionState;

/// Where a rejected visitor is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    /// Sign-in page, for visitors with no identity.
    Login,
    /// Home page, for signed-in visitors lacking the required role.
    Home,
}

impl RedirectTarget {
    /// Path of the redirect destination.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Home => "/",
        }
    }
}

/// Final gate decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The visitor may proceed and the page may fetch its data.
    Allow,
    /// The visitor is sent elsewhere; no data fetch happens.
    Redirect(RedirectTarget),
}

/// Outcome of the pure screening step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screening {
    /// Session resolution is still pending. Render a placeholder and decide
    /// nothing yet.
    Suspend,
    /// Decided without consulting the directory.
    Decided(GateDecision),
    /// Signed in, but the required role must be verified against the
    /// directory before deciding.
    RoleCheck {
        /// Identity whose role is checked.
        id: IdentityId,
        /// Role the page requires.
        required: Role,
    },
}

/// Screen a visitor against a page's role requirement.
///
/// # Examples
/// ```
/// use harvestworld::domain::{
///     GateDecision, RedirectTarget, Screening, SessionState, screen,
/// };
///
/// let screening = screen(&SessionState::Anonymous, None);
/// assert_eq!(
///     screening,
///     Screening::Decided(GateDecision::Redirect(RedirectTarget::Login))
/// );
/// ```
#[must_use]
pub fn screen(state: &SessionState, required: Option<Role>) -> Screening {
    match state {
        SessionState::Resolving => Screening::Suspend,
        SessionState::Anonymous => {
            Screening::Decided(GateDecision::Redirect(RedirectTarget::Login))
        }
        SessionState::SignedIn(identity) => match required {
            None => Screening::Decided(GateDecision::Allow),
            Some(role) => Screening::RoleCheck {
                id: identity.id,
                required: role,
            },
        },
    }
}

/// Outcome of the full gate, with any role check resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Session resolution is still pending.
    Suspend,
    /// The visitor may proceed.
    Allow,
    /// The visitor is sent elsewhere.
    Redirect(RedirectTarget),
}

/// Run the gate, consulting the directory when a role check is needed.
pub async fn authorize(
    state: &SessionState,
    required: Option<Role>,
    directory: &dyn ProfileDirectory,
) -> GateOutcome {
    match screen(state, required) {
        Screening::Suspend => GateOutcome::Suspend,
        Screening::Decided(GateDecision::Allow) => GateOutcome::Allow,
        Screening::Decided(GateDecision::Redirect(target)) => GateOutcome::Redirect(target),
        Screening::RoleCheck { id, required } => match directory.role_of(id).await {
            Ok(role) if role == required => GateOutcome::Allow,
            Ok(role) => {
                tracing::debug!(%id, held = %role, required = %required, "role mismatch");
                GateOutcome::Redirect(RedirectTarget::Home)
            }
            Err(err) => {
                tracing::warn!(%id, error = %err, "role lookup failed, failing closed");
                GateOutcome::Redirect(RedirectTarget::Home)
            }
        },
    }
}
