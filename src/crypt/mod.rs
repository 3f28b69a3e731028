//! Salt generation, hashing and verification over libxcrypt.
//!
//! Every call owns its own scratch state; nothing here is shared between
//! threads, so the functions are safe to call concurrently as long as the
//! system libxcrypt's `crypt_rn` is (it is for all supported methods).

pub mod hash;
pub mod salt;
mod state;
pub mod validate;

pub use hash::{HashRecord, hash, verify};
pub use salt::{Salt, SaltParams, Scheme, gensalt, gensalt_with};
pub use validate::{SaltStatus, check_salt, is_passphrase_acceptable, is_valid_salt};

/// Longest result `crypt_rn` can produce, terminator included.
pub const MAX_OUTPUT_SIZE: usize = crate::sys::CRYPT_OUTPUT_SIZE;
/// Passphrases must be strictly shorter than this many bytes.
pub const MAX_PASSPHRASE_SIZE: usize = crate::sys::CRYPT_MAX_PASSPHRASE_SIZE;
/// Size of the buffer salts are generated into.
pub const GENSALT_OUTPUT_SIZE: usize = crate::sys::CRYPT_GENSALT_OUTPUT_SIZE;
