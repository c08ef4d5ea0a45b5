//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: persisting a signed-in identity, resolving the
//! cookie to a [`SessionState`], and signing out.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::ports::ProfileDirectory;
use crate::domain::{DomainError, IdentityId, SessionState};

pub(crate) const IDENTITY_ID_KEY: &str = "identity_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the signed-in identity's id in the session cookie.
    pub fn persist_identity(&self, id: IdentityId) -> Result<(), DomainError> {
        self.0.insert(IDENTITY_ID_KEY, id.value())?;
        Ok(())
    }

    /// Fetch the stored identity id, if present.
    ///
    /// A stored value that does not deserialise is treated as absent. The
    /// middleware already rejects cookies failing authentication, so this
    /// only covers stale values written by older releases.
    pub fn identity_id(&self) -> Option<IdentityId> {
        match self.0.get::<i64>(IDENTITY_ID_KEY) {
            Ok(raw) => raw.map(IdentityId::new),
            Err(error) => {
                warn!("invalid identity id in session cookie: {error}");
                None
            }
        }
    }

    /// Resolve the session cookie against the profile directory.
    ///
    /// Resolution never fails: a missing profile or a directory failure
    /// collapses to [`SessionState::Anonymous`] and is logged here.
    pub async fn resolve(&self, directory: &dyn ProfileDirectory) -> SessionState {
        let Some(id) = self.identity_id() else {
            return SessionState::Anonymous;
        };
        match directory.profile_of(id).await {
            Ok(identity) => {
                if identity.is_none() {
                    warn!(%id, "session references a profile that no longer exists");
                }
                SessionState::from_resolution(identity)
            }
            Err(error) => {
                warn!(%id, %error, "session resolution failed, treating as anonymous");
                SessionState::Anonymous
            }
        }
    }

    /// Sign out: drop all session state and instruct the client to delete
    /// the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
