//! Authentication primitives such as login credentials and signup payloads.
//!
//! Constructors validate raw string inputs before a handler talks to a port,
//! so malformed payloads never reach the identity gateway.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::identity::{DisplayName, EmailAddress, IdentityValidationError};

/// Domain error returned when authentication payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Email failed identity validation.
    Email(IdentityValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) => write!(f, "{err}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

impl From<IdentityValidationError> for CredentialValidationError {
    fn from(err: IdentityValidationError) -> Self {
        Self::Email(err)
    }
}

/// Validated login credentials used by the identity gateway.
///
/// ## Invariants
/// - `email` passes [`EmailAddress`] validation.
/// - `password` must be non-empty but retains caller-provided whitespace to
///   avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use harvestworld::domain::Credentials;
///
/// let creds = Credentials::try_from_parts("dewi@example.id", "rahasia").unwrap();
/// assert_eq!(creds.email().as_str(), "dewi@example.id");
/// assert_eq!(creds.password(), "rahasia");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let email = EmailAddress::parse(email)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the sign-in attempt.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated signup payload.
///
/// ## Invariants
/// - `email` and `password` follow the [`Credentials`] rules.
/// - `display_name`, when present, is trimmed and non-empty. A blank input
///   is treated as absent rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    credentials: Credentials,
    display_name: Option<DisplayName>,
}

impl Registration {
    /// Construct a registration from raw form inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Self, CredentialValidationError> {
        let credentials = Credentials::try_from_parts(email, password)?;
        let display_name = if display_name.trim().is_empty() {
            None
        } else {
            Some(DisplayName::parse(display_name)?)
        };

        Ok(Self {
            credentials,
            display_name,
        })
    }

    /// Email used to create the account.
    pub fn email(&self) -> &EmailAddress {
        self.credentials.email()
    }

    /// Password for the new account.
    pub fn password(&self) -> &str {
        self.credentials.password()
    }

    /// Optional display name captured at signup.
    pub fn display_name(&self) -> Option<&DisplayName> {
        self.display_name.as_ref()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw")]
    #[case("   ", "pw")]
    #[case("not-an-email", "pw")]
    fn invalid_emails_fail(#[case] email: &str, #[case] password: &str) {
        let err = Credentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert!(matches!(err, CredentialValidationError::Email(_)));
    }

    #[rstest]
    fn empty_password_fails() {
        let err = Credentials::try_from_parts("budi@harvestworld.id", "")
            .expect_err("blank passwords must fail");
        assert_eq!(err, CredentialValidationError::EmptyPassword);
    }

    #[rstest]
    #[case("  budi@harvestworld.id  ", "berkebun123")]
    #[case("dewi@harvestworld.id", "correct horse battery staple")]
    fn valid_credentials_trim_email(#[case] email: &str, #[case] password: &str) {
        let creds = Credentials::try_from_parts(email, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.email().as_str(), email.trim());
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    fn registration_treats_blank_display_name_as_absent() {
        let registration = Registration::try_from_parts("rina@harvestworld.id", "pw", "   ")
            .expect("valid inputs should succeed");
        assert!(registration.display_name().is_none());
    }

    #[rstest]
    fn registration_trims_display_name() {
        let registration =
            Registration::try_from_parts("rina@harvestworld.id", "pw", "  Rina Wulandari  ")
                .expect("valid inputs should succeed");
        assert_eq!(
            registration.display_name().map(|name| name.as_str()),
            Some("Rina Wulandari")
        );
    }
}
