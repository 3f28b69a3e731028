//! Pure predicates run before anything is handed to libxcrypt.
//!
//! libxcrypt's behaviour on malformed settings or oversized passphrases is
//! undefined rather than an error, so [`hash`](super::hash) and
//! [`verify`](super::verify) refuse input these checks reject.

use std::ffi::CString;

use crate::sys::{
    self, CRYPT_MAX_PASSPHRASE_SIZE, CRYPT_OUTPUT_SIZE, CRYPT_SALT_INVALID,
    CRYPT_SALT_METHOD_DISABLED, CRYPT_SALT_METHOD_LEGACY, CRYPT_SALT_OK, CRYPT_SALT_TOO_CHEAP,
};

/// libxcrypt's verdict on a setting string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaltStatus {
    /// Usable and not deprecated.
    Ok,
    /// Malformed, unknown method, or does not fit the setting buffer.
    Invalid,
    /// Method compiled out of this build.
    MethodDisabled,
    /// Usable, but the method is deprecated.
    Legacy,
    /// Usable, but the cost parameter is below the recommended minimum.
    TooCheap,
}

impl SaltStatus {
    /// Whether `crypt_rn` will accept the setting.
    pub fn is_usable(self) -> bool {
        matches!(self, SaltStatus::Ok | SaltStatus::Legacy | SaltStatus::TooCheap)
    }
}

/// Asks libxcrypt what it thinks of `salt`.
///
/// Strings containing NUL, or too long to fit the setting region with its
/// terminator, are `Invalid` without consulting the library: truncating a
/// salt would silently change its meaning.
pub fn check_salt(salt: &str) -> SaltStatus {
    if salt.len() >= CRYPT_OUTPUT_SIZE {
        return SaltStatus::Invalid;
    }
    let Ok(setting) = CString::new(salt) else {
        return SaltStatus::Invalid;
    };

    // SAFETY: `setting` is a valid NUL-terminated string for the call.
    match unsafe { sys::crypt_checksalt(setting.as_ptr()) } {
        CRYPT_SALT_OK => SaltStatus::Ok,
        CRYPT_SALT_METHOD_LEGACY => SaltStatus::Legacy,
        CRYPT_SALT_TOO_CHEAP => SaltStatus::TooCheap,
        CRYPT_SALT_METHOD_DISABLED => SaltStatus::MethodDisabled,
        CRYPT_SALT_INVALID => SaltStatus::Invalid,
        _ => SaltStatus::Invalid,
    }
}

/// `true` iff `salt` is a setting this libxcrypt build will hash with.
pub fn is_valid_salt(salt: &str) -> bool {
    check_salt(salt).is_usable()
}

/// `true` iff `passphrase` is strictly shorter than
/// [`CRYPT_MAX_PASSPHRASE_SIZE`], leaving room for the terminator.
pub fn is_passphrase_acceptable(passphrase: &[u8]) -> bool {
    passphrase.len() < CRYPT_MAX_PASSPHRASE_SIZE
}
