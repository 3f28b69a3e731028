//! Raw libxcrypt declarations.
//!
//! Only the three entry points this crate needs are declared. Buffer limits
//! are generated from `<crypt.h>` by the build script.

use std::ffi::{c_char, c_int, c_ulong, c_void};

include!(concat!(env!("OUT_DIR"), "/crypt_limits.rs"));

// crypt_checksalt verdicts
pub const CRYPT_SALT_OK: c_int = 0;
pub const CRYPT_SALT_INVALID: c_int = 1;
pub const CRYPT_SALT_METHOD_DISABLED: c_int = 2;
pub const CRYPT_SALT_METHOD_LEGACY: c_int = 3;
pub const CRYPT_SALT_TOO_CHEAP: c_int = 4;

unsafe extern "C" {
    /// Hashes `phrase` with `setting` using `data` as scratch space.
    /// Returns a pointer into `data` or NULL on failure, with errno set.
    pub fn crypt_rn(
        phrase: *const c_char,
        setting: *const c_char,
        data: *mut c_void,
        size: c_int,
    ) -> *mut c_char;

    /// Writes a fresh setting string into `output`. A NULL `rbytes` lets the
    /// library draw its own randomness. Returns `output` or NULL on failure.
    pub fn crypt_gensalt_rn(
        prefix: *const c_char,
        count: c_ulong,
        rbytes: *const c_char,
        nrbytes: c_int,
        output: *mut c_char,
        output_size: c_int,
    ) -> *mut c_char;

    pub fn crypt_checksalt(setting: *const c_char) -> c_int;
}
