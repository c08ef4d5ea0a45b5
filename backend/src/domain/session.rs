//! Session resolution state.
//!
//! Pages never look at a nullable identity plus a "still loading" flag.
//! Resolution is a three-way sum: still resolving, resolved to anonymous, or
//! resolved to a signed-in identity. A gateway failure during resolution
//! collapses to [`SessionState::Anonymous`], so callers cannot distinguish
//! "not signed in" from "could not check"; the failure is logged where it
//! happens instead.

use crate::domain::identity::Identity;

/// Where session resolution currently stands for a request.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Resolution has not completed. Gated pages suspend on this state
    /// rather than deciding.
    Resolving,
    /// Resolution completed without an identity.
    Anonymous,
    /// Resolution completed with a signed-in identity.
    SignedIn(Identity),
}

impl SessionState {
    /// Collapse an optional resolution result into a resolved state.
    #[must_use]
    pub fn from_resolution(identity: Option<Identity>) -> Self {
        identity.map_or(Self::Anonymous, Self::SignedIn)
    }

    /// The signed-in identity, when resolution reached one.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        match self {
            Self::SignedIn(identity) => Some(identity),
            Self::Resolving | Self::Anonymous => None,
        }
    }

    /// Whether resolution is still pending.
    #[must_use]
    pub const fn is_resolving(&self) -> bool {
        matches!(self, Self::Resolving)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::identity::{EmailAddress, IdentityId, Role};
    use rstest::rstest;

    fn identity() -> Identity {
        Identity {
            id: IdentityId::new(5),
            email: EmailAddress::parse("agus@harvestworld.id").expect("valid email"),
            display_name: None,
            role: Role::User,
            avatar_url: None,
            created_at: None,
        }
    }

    #[rstest]
    fn from_resolution_maps_present_identity() {
        let state = SessionState::from_resolution(Some(identity()));
        assert_eq!(state.identity(), Some(&identity()));
        assert!(!state.is_resolving());
    }

    #[rstest]
    fn from_resolution_maps_absent_identity() {
        let state = SessionState::from_resolution(None);
        assert_eq!(state, SessionState::Anonymous);
        assert!(state.identity().is_none());
    }

    #[rstest]
    fn resolving_exposes_no_identity() {
        let state = SessionState::Resolving;
        assert!(state.is_resolving());
        assert!(state.identity().is_none());
    }
}
