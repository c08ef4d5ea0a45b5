//! Environment-driven session settings.
//!
//! Debug builds tolerate a missing or malformed toggle, falling back to a
//! safe default with a warning. Release builds require every toggle to be
//! explicit and valid, and refuse to start on an ephemeral signing key.
//! Reads go through the [`mockable::Env`] abstraction so validation is
//! testable without touching the process environment.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

pub mod fingerprint;

const KEY_FILE_DEFAULT: &str = "/var/run/secrets/session_key";
const KEY_MIN_LEN: usize = 64;
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode governing how strictly session settings are validated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Tolerates defaults and warns about missing toggles.
    Debug,
    /// Requires explicit, valid toggles.
    Release,
}

impl BuildMode {
    /// Pick the mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated session settings.
pub struct SessionSettings {
    /// Signing key for the private session cookie.
    pub key: Key,
    /// Whether session cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
    /// `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

impl std::fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSettings")
            .field("key", &"<redacted>")
            .field("cookie_secure", &self.cookie_secure)
            .field("same_site", &self.same_site)
            .finish()
    }
}

/// Errors raised while validating session settings.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required variable is absent.
    #[error("missing required environment variable: {name}")]
    Missing {
        /// Name of the absent variable.
        name: &'static str,
    },
    /// A variable holds a value outside its vocabulary.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    Invalid {
        /// Name of the offending variable.
        name: &'static str,
        /// Value as found in the environment.
        value: String,
        /// Accepted values.
        expected: &'static str,
    },
    /// The key file could not be read.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The key file is shorter than a release build accepts.
    #[error("session key at {path} too short: need >= {min} bytes, got {length}")]
    KeyTooShort {
        /// Path that was read.
        path: PathBuf,
        /// Bytes found.
        length: usize,
        /// Bytes required.
        min: usize,
    },
    /// `SameSite=None` cookies must also be `Secure`.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Release builds must hold a persistent signing key.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralKeyForbidden,
}

impl SessionSettings {
    /// Read and validate session settings for the given build mode.
    ///
    /// # Examples
    /// ```
    /// use harvestworld::inbound::http::session_config::{BuildMode, SessionSettings};
    /// use mockable::MockEnv;
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string().returning(|_| None);
    ///
    /// let settings = SessionSettings::from_env(&env, BuildMode::Debug)
    ///     .expect("debug tolerates an empty environment");
    /// assert!(settings.cookie_secure);
    /// ```
    pub fn from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Self, SessionConfigError> {
        let cookie_secure = cookie_secure(env, mode)?;
        let same_site = same_site(env, mode, cookie_secure)?;
        let allow_ephemeral = allow_ephemeral(env, mode)?;
        let key = signing_key(env, mode, allow_ephemeral)?;

        Ok(Self {
            key,
            cookie_secure,
            same_site,
        })
    }
}

/// In debug builds, log the problem and use `fallback`; in release builds,
/// fail with it.
fn debug_fallback<T>(
    mode: BuildMode,
    error: SessionConfigError,
    fallback: T,
) -> Result<T, SessionConfigError> {
    if mode.is_debug() {
        warn!(%error, "session setting falling back to its debug default");
        Ok(fallback)
    } else {
        Err(error)
    }
}

fn cookie_secure<E: Env>(env: &E, mode: BuildMode) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(COOKIE_SECURE_ENV) else {
        return debug_fallback(
            mode,
            SessionConfigError::Missing {
                name: COOKIE_SECURE_ENV,
            },
            true,
        );
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None => debug_fallback(
            mode,
            SessionConfigError::Invalid {
                name: COOKIE_SECURE_ENV,
                value,
                expected: BOOL_EXPECTED,
            },
            true,
        ),
    }
}

fn same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let Some(value) = env.string(SAMESITE_ENV) else {
        return debug_fallback(
            mode,
            SessionConfigError::Missing { name: SAMESITE_ENV },
            SameSite::Lax,
        );
    };
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" => {
            if !cookie_secure {
                if !mode.is_debug() {
                    return Err(SessionConfigError::InsecureSameSiteNone);
                }
                warn!("SESSION_SAMESITE=None without a secure cookie; browsers may drop it");
            }
            Ok(SameSite::None)
        }
        _ => debug_fallback(
            mode,
            SessionConfigError::Invalid {
                name: SAMESITE_ENV,
                value,
                expected: SAMESITE_EXPECTED,
            },
            SameSite::Lax,
        ),
    }
}

fn allow_ephemeral<E: Env>(env: &E, mode: BuildMode) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return debug_fallback(
            mode,
            SessionConfigError::Missing {
                name: ALLOW_EPHEMERAL_ENV,
            },
            false,
        );
    };
    match parse_bool(&value) {
        Some(true) if mode.is_debug() => Ok(true),
        Some(true) => Err(SessionConfigError::EphemeralKeyForbidden),
        Some(false) => Ok(false),
        None => debug_fallback(
            mode,
            SessionConfigError::Invalid {
                name: ALLOW_EPHEMERAL_ENV,
                value,
                expected: BOOL_EXPECTED,
            },
            false,
        ),
    }
}

fn signing_key<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| KEY_FILE_DEFAULT.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length < KEY_MIN_LEN {
                bytes.zeroize();
                if mode == BuildMode::Release {
                    return Err(SessionConfigError::KeyTooShort {
                        path,
                        length,
                        min: KEY_MIN_LEN,
                    });
                }
                warn!(
                    path = %path.display(),
                    length,
                    min = KEY_MIN_LEN,
                    "session key file is too short; generating an ephemeral key"
                );
                return Ok(Key::generate());
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "generating an ephemeral session key; sessions will not survive restarts"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path,
            source: error,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
