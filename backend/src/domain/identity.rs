//! Identity primitives shared across session handling and the member
//! directory.
//!
//! Validation happens in constructors so inbound payload parsing stays out
//! of the domain. Handlers convert raw strings into these types before any
//! port is consulted.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Opaque identifier of a registered identity.
///
/// # Examples
/// ```
/// use harvestworld::domain::IdentityId;
///
/// let id = IdentityId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct IdentityId(i64);

impl IdentityId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for IdentityId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Domain error returned when identity field values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email lacks the local-part/domain separator.
    MalformedEmail,
    /// Display name was blank once trimmed.
    EmptyDisplayName,
    /// Role string is not part of the role vocabulary.
    UnknownRole(String),
}

impl fmt::Display for IdentityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::MalformedEmail => write!(f, "email must contain '@'"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::UnknownRole(raw) => write!(f, "unknown role: {raw}"),
        }
    }
}

impl std::error::Error for IdentityValidationError {}

/// Validated email address.
///
/// ## Invariants
/// - Trimmed, non-empty, and contains at least one `@` with characters on
///   both sides. Full RFC 5321 validation is left to the identity gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse and validate a raw email string.
    pub fn parse(raw: &str) -> Result<Self, IdentityValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentityValidationError::EmptyEmail);
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(IdentityValidationError::MalformedEmail);
        };
        if local.is_empty() || domain.is_empty() {
            return Err(IdentityValidationError::MalformedEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Email as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Validated display name.
///
/// ## Invariants
/// - Trimmed and non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Parse and validate a raw display name.
    pub fn parse(raw: &str) -> Result<Self, IdentityValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentityValidationError::EmptyDisplayName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Display name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for DisplayName {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

/// Role attached to an identity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Ordinary member.
    User,
    /// Vetted gardening expert.
    Expert,
    /// Administrator with access to member management.
    Admin,
}

impl Role {
    /// Storage-level name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Expert => "expert",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = IdentityValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "expert" => Ok(Self::Expert),
            "admin" => Ok(Self::Admin),
            other => Err(IdentityValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Roles an administrator may assign to another member.
///
/// `admin` is deliberately absent: promotions to administrator are out of
/// scope for the member management page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssignableRole {
    /// Demote to ordinary member.
    User,
    /// Promote to gardening expert.
    Expert,
}

impl AssignableRole {
    /// Storage-level name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.as_role().as_str()
    }

    /// Widen into the full role vocabulary.
    #[must_use]
    pub const fn as_role(self) -> Role {
        match self {
            Self::User => Role::User,
            Self::Expert => Role::Expert,
        }
    }
}

impl fmt::Display for AssignableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile of a registered identity as served to pages.
///
/// # Examples
/// ```
/// use harvestworld::domain::{EmailAddress, Identity, IdentityId, Role};
///
/// let identity = Identity {
///     id: IdentityId::new(1),
///     email: EmailAddress::parse("dewi@example.id").expect("valid email"),
///     display_name: None,
///     role: Role::Admin,
///     avatar_url: None,
///     created_at: None,
/// };
/// assert_eq!(identity.label(), "dewi@example.id");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Identifier assigned at registration.
    pub id: IdentityId,
    /// Contact and login email.
    pub email: EmailAddress,
    /// Optional human-friendly name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<DisplayName>,
    /// Current role.
    pub role: Role,
    /// Avatar image URL, when recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Registration timestamp, when the gateway supplies one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identity {
    /// Name shown in page headers, falling back to the email address when no
    /// display name was provided at registration.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name
            .as_ref()
            .map_or_else(|| self.email.as_str(), DisplayName::as_str)
    }
}
