//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

use crate::domain::identity::{DisplayName, EmailAddress, Identity, IdentityId, Role};
use crate::domain::ports::FixtureProfileDirectory;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Identity literal with a derived email, for seeding fixture directories.
pub fn member(id: i64, name: &str, role: Role) -> Identity {
    Identity {
        id: IdentityId::new(id),
        email: EmailAddress::parse(&format!("member{id}@harvestworld.id")).expect("valid email"),
        display_name: Some(DisplayName::parse(name).expect("valid name")),
        role,
        avatar_url: None,
        created_at: None,
    }
}

/// Directory holding the cast the handler tests work with: one admin, one
/// expert, and two ordinary members.
pub fn seeded_directory() -> FixtureProfileDirectory {
    FixtureProfileDirectory::with_members([
        member(1, "Ibu Sari", Role::Admin),
        member(2, "Made Wirawan", Role::Expert),
        member(5, "Agus", Role::User),
        member(7, "Budi Santoso", Role::User),
    ])
}
