//! User-facing Indonesian copy.
//!
//! Pages render these strings verbatim, so changing any of them is a
//! user-visible change. Keep the wording in one place rather than scattered
//! across handlers.

use crate::domain::identity::AssignableRole;

/// Shown when a sign-in attempt is rejected by the identity gateway.
pub const INVALID_CREDENTIALS: &str =
    "Email atau kata sandi yang Anda masukkan tidak valid. Silakan coba lagi.";

/// Generic fallback when a gateway failure carries no usable message.
pub const GENERIC_FAILURE: &str = "Terjadi kesalahan. Silakan coba lagi.";

/// Shown under the signup form when the submitted email does not parse.
pub const INVALID_EMAIL: &str = "Alamat email tidak valid.";

/// Shown under the signup form when the password is empty.
pub const EMPTY_PASSWORD: &str = "Kata sandi tidak boleh kosong.";

/// Body of the signup confirmation page.
pub const SIGNUP_SUCCESS: &str = "Pendaftaran berhasil! Silakan masuk dengan akun baru Anda.";

/// Shown on the plant detail page when the requested plant does not exist.
pub const PLANT_NOT_FOUND: &str = "Tanaman tidak ditemukan.";

/// Success notice after an administrator changes a member's role.
///
/// # Examples
/// ```
/// use harvestworld::domain::{messages, AssignableRole};
///
/// assert_eq!(
///     messages::role_changed(AssignableRole::Expert),
///     "Berhasil mengubah peran pengguna menjadi expert"
/// );
/// ```
#[must_use]
pub fn role_changed(role: AssignableRole) -> String {
    format!("Berhasil mengubah peran pengguna menjadi {role}")
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AssignableRole::User, "Berhasil mengubah peran pengguna menjadi user")]
    #[case(AssignableRole::Expert, "Berhasil mengubah peran pengguna menjadi expert")]
    fn role_changed_names_the_new_role(#[case] role: AssignableRole, #[case] expected: &str) {
        assert_eq!(role_changed(role), expected);
    }
}
