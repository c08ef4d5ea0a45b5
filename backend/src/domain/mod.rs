//! Domain types and the page protocol.
//!
//! Purpose: define the strongly typed entities and the per-page protocol
//! (session resolution, authorisation gate, view state, page sessions) that
//! inbound and outbound adapters plug into. Types are validated at
//! construction and document their invariants and serde contracts in each
//! type's Rustdoc.

pub mod auth;
pub mod category;
pub mod directory;
pub mod error;
pub mod gate;
pub mod identity;
pub mod messages;
pub mod page;
pub mod plant;
pub mod ports;
pub mod session;
pub mod trace_id;
pub mod view;

pub use self::auth::{CredentialValidationError, Credentials, Registration};
pub use self::category::{Category, CategoryLookup};
pub use self::directory::{Cohort, DirectoryLoad, apply_role_change, load_directory};
pub use self::error::{DomainError, DomainErrorValidationError, ErrorCode};
pub use self::gate::{
    GateDecision, GateOutcome, RedirectTarget, Screening, authorize, screen,
};
pub use self::identity::{
    AssignableRole, DisplayName, EmailAddress, Identity, IdentityId, IdentityValidationError, Role,
};
pub use self::page::{
    DirectoryView, NOTICE_TTL, PageClosed, PageHandle, PageId, PageRegistry,
};
pub use self::plant::{Plant, PlantId};
pub use self::session::SessionState;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::view::{LoadSeq, LoadTicket, Notice, PageView, ViewState};

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use harvestworld::domain::{DomainError, DomainResult};
///
/// fn guard(allowed: bool) -> DomainResult<()> {
///     if allowed {
///         Ok(())
///     } else {
///         Err(DomainError::forbidden("nope"))
///     }
/// }
/// ```
pub type DomainResult<T> = Result<T, DomainError>;
