//! Member directory composition for the admin page.
//!
//! The admin page shows one merged list built from two directory reads, the
//! `user` cohort then the `expert` cohort. The reads run sequentially and
//! both must succeed; a failure in either produces [`DirectoryLoad::PartialFailure`]
//! naming the cohort, and any rows already fetched are discarded rather than
//! exposed as a partial list.

use serde::{Deserialize, Serialize};

use crate::domain::identity::{AssignableRole, Identity, IdentityId, Role};
use crate::domain::ports::{ProfileDirectory, ProfileDirectoryError};

/// Which directory read a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cohort {
    /// The `role=user` read.
    Users,
    /// The `role=expert` read.
    Experts,
}

impl std::fmt::Display for Cohort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Users => f.write_str("users"),
            Self::Experts => f.write_str("experts"),
        }
    }
}

/// Outcome of the composite directory load.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryLoad {
    /// Both reads succeeded; members are merged users-then-experts.
    AllSucceeded(Vec<Identity>),
    /// A read failed; nothing fetched so far is kept.
    PartialFailure {
        /// Cohort whose read failed.
        cohort: Cohort,
        /// Underlying directory error.
        error: ProfileDirectoryError,
    },
}

/// Load the merged member list, users first then experts.
///
/// The second read is only issued after the first succeeds, so its latency
/// is additive.
pub async fn load_directory(directory: &dyn ProfileDirectory) -> DirectoryLoad {
    let users = match directory.members_with_role(Role::User).await {
        Ok(users) => users,
        Err(error) => {
            tracing::warn!(cohort = %Cohort::Users, %error, "directory read failed");
            return DirectoryLoad::PartialFailure {
                cohort: Cohort::Users,
                error,
            };
        }
    };

    let experts = match directory.members_with_role(Role::Expert).await {
        Ok(experts) => experts,
        Err(error) => {
            tracing::warn!(cohort = %Cohort::Experts, %error, "directory read failed");
            return DirectoryLoad::PartialFailure {
                cohort: Cohort::Experts,
                error,
            };
        }
    };

    let mut members = users;
    members.extend(experts);
    DirectoryLoad::AllSucceeded(members)
}

/// Patch a member's role in a loaded list, leaving every other entry
/// untouched. Returns whether a matching entry was found.
pub fn apply_role_change(members: &mut [Identity], id: IdentityId, role: AssignableRole) -> bool {
    let Some(member) = members.iter_mut().find(|member| member.id == id) else {
        return false;
    };
    member.role = role.as_role();
    true
}
