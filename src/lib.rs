//! Safe bindings to the system libxcrypt.
//!
//! Three operations are exposed, plus the checks that guard them:
//!
//! - [`gensalt`] asks the library for a fresh, randomized setting string.
//! - [`hash`] hashes a passphrase with a salt into a [`HashRecord`].
//! - [`verify`] recomputes a hash from a stored record and compares.
//!
//! libxcrypt does not fail cleanly on malformed settings or oversized
//! passphrases, so [`hash`] and [`verify`] run [`is_valid_salt`] and
//! [`is_passphrase_acceptable`] themselves before anything crosses the
//! boundary. Each computation gets its own scratch state, zeroed before
//! use and again before it is released.
//!
//! ```no_run
//! let salt = passcrypt::gensalt("$6$", 10_000)?;
//! let record = passcrypt::hash(&salt, "correct horse")?;
//! assert!(passcrypt::verify(&record, "correct horse")?);
//! assert!(!passcrypt::verify(&record, "wrong")?);
//! # Ok::<(), passcrypt::Error>(())
//! ```
//!
//! The [`ffi`] module exposes the same surface over the C ABI.

pub mod crypt;
mod error;
pub mod ffi;
pub mod scrub;
mod sys;

pub use crate::crypt::{
    GENSALT_OUTPUT_SIZE, HashRecord, MAX_OUTPUT_SIZE, MAX_PASSPHRASE_SIZE, Salt, SaltParams,
    SaltStatus, Scheme, check_salt, gensalt, gensalt_with, hash, is_passphrase_acceptable,
    is_valid_salt, verify,
};
pub use crate::error::{Error, Result, ValidationError};
pub use crate::scrub::scrub;
