//! Passphrase hashing and verification.

use std::fmt;

use subtle::ConstantTimeEq;
use tracing::debug;

use super::state::ComputationState;
use super::validate::{is_passphrase_acceptable, is_valid_salt};
use crate::error::{Result, ValidationError};
use crate::sys::CRYPT_MAX_PASSPHRASE_SIZE;

/// The encoded result of hashing a passphrase with a salt.
///
/// Begins with the salt it was produced from, so it is itself a valid salt
/// and can be handed straight to [`verify`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct HashRecord(String);

impl HashRecord {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for HashRecord {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HashRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn check_inputs(salt: &str, passphrase: &[u8]) -> Result<()> {
    if !is_valid_salt(salt) {
        return Err(ValidationError::InvalidSalt.into());
    }
    if !is_passphrase_acceptable(passphrase) {
        return Err(ValidationError::PassphraseTooLong {
            len: passphrase.len(),
            max: CRYPT_MAX_PASSPHRASE_SIZE,
        }
        .into());
    }
    if passphrase.contains(&0) {
        return Err(ValidationError::InteriorNul("passphrase").into());
    }
    Ok(())
}

fn hash_in(state: &mut ComputationState, salt: &str, passphrase: &[u8]) -> Result<HashRecord> {
    check_inputs(salt, passphrase)?;
    state.load(salt.as_bytes(), passphrase);
    state.compute().map(HashRecord)
}

/// Hashes `passphrase` with `salt`.
///
/// Both inputs are validated first; nothing reaches libxcrypt unless
/// `salt` passes [`is_valid_salt`] and `passphrase` passes
/// [`is_passphrase_acceptable`] and holds no NUL byte. The scratch state
/// is zeroed once the result has been copied out.
pub fn hash(salt: impl AsRef<str>, passphrase: impl AsRef<[u8]>) -> Result<HashRecord> {
    let salt = salt.as_ref();
    debug!(salt_len = salt.len(), "hashing passphrase");
    let mut state = ComputationState::new();
    hash_in(&mut state, salt, passphrase.as_ref())
}

/// Checks `passphrase` against a stored hash record.
///
/// Returns `Ok(false)` only for a mismatch; if the hash cannot be computed
/// the error is returned instead. The comparison runs in constant time.
pub fn verify(stored: impl AsRef<str>, passphrase: impl AsRef<[u8]>) -> Result<bool> {
    let stored = stored.as_ref();
    let computed = hash(stored, passphrase)?;
    Ok(computed.as_str().as_bytes().ct_eq(stored.as_bytes()).into())
}
