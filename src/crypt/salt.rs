//! Salt generation and its configuration.

use std::ffi::{CStr, CString, c_char, c_int, c_ulong};
use std::fmt;
use std::io;
use std::ptr;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::{Error, Result, ValidationError};
use crate::sys::{self, CRYPT_GENSALT_OUTPUT_SIZE};

/// Environment variable overriding the hashing method prefix.
pub const ENV_PREFIX: &str = "PASSCRYPT_PREFIX";
/// Environment variable overriding the cost count.
pub const ENV_COUNT: &str = "PASSCRYPT_COUNT";

/// An opaque setting string produced by libxcrypt.
///
/// Encodes the method, its cost and random bits. Never parsed here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Salt(String);

impl Salt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Salt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Well-known method prefixes.
///
/// A convenience for building [`SaltParams`]; whether a method is available
/// depends on how the system libxcrypt was configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Yescrypt,
    GostYescrypt,
    Scrypt,
    Bcrypt,
    Sha512Crypt,
    Sha256Crypt,
    Md5Crypt,
}

impl Scheme {
    const ALL: [Scheme; 7] = [
        Scheme::Yescrypt,
        Scheme::GostYescrypt,
        Scheme::Scrypt,
        Scheme::Bcrypt,
        Scheme::Sha512Crypt,
        Scheme::Sha256Crypt,
        Scheme::Md5Crypt,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            Scheme::Yescrypt => "$y$",
            Scheme::GostYescrypt => "$gy$",
            Scheme::Scrypt => "$7$",
            Scheme::Bcrypt => "$2b$",
            Scheme::Sha512Crypt => "$6$",
            Scheme::Sha256Crypt => "$5$",
            Scheme::Md5Crypt => "$1$",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Scheme::Yescrypt => "yescrypt",
            Scheme::GostYescrypt => "gost-yescrypt",
            Scheme::Scrypt => "scrypt",
            Scheme::Bcrypt => "bcrypt",
            Scheme::Sha512Crypt => "sha512crypt",
            Scheme::Sha256Crypt => "sha256crypt",
            Scheme::Md5Crypt => "md5crypt",
        }
    }
}

impl FromStr for Scheme {
    type Err = ValidationError;

    /// Accepts either the name (`"sha512crypt"`) or the prefix (`"$6$"`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Scheme::ALL
            .into_iter()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(s) || scheme.prefix() == s)
            .ok_or_else(|| ValidationError::UnknownScheme(s.to_owned()))
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Method and cost used for salt generation.
///
/// The (prefix, count) pair is not checked here; libxcrypt rejects
/// unsupported combinations at generation time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaltParams {
    prefix: Option<String>,
    count: u64,
}

impl SaltParams {
    /// `None` selects libxcrypt's preferred method; `count` 0 selects the
    /// method's default cost.
    pub fn new(prefix: Option<String>, count: u64) -> Self {
        Self { prefix, count }
    }

    pub fn with_scheme(scheme: Scheme, count: u64) -> Self {
        Self::new(Some(scheme.prefix().to_owned()), count)
    }

    /// Defaults overridden by `PASSCRYPT_PREFIX` and `PASSCRYPT_COUNT`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut params = Self::default();

        if let Some(prefix) = lookup(ENV_PREFIX).filter(|p| !p.is_empty()) {
            params.prefix = Some(match prefix.parse::<Scheme>() {
                Ok(scheme) => scheme.prefix().to_owned(),
                Err(_) => prefix,
            });
        }

        if let Some(raw) = lookup(ENV_COUNT).filter(|c| !c.is_empty()) {
            params.count = raw
                .trim()
                .parse()
                .map_err(|_| ValidationError::InvalidCount(raw.clone()))?;
        }

        Ok(params)
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

/// Generates a fresh salt for `prefix` with cost `count`.
///
/// Randomness is drawn by libxcrypt itself.
pub fn gensalt(prefix: &str, count: u64) -> Result<Salt> {
    gensalt_with(&SaltParams::new(Some(prefix.to_owned()), count))
}

/// Generates a fresh salt as configured by `params`.
///
/// The result is written into a stack buffer owned by this call and copied
/// out, so nothing allocated by the library needs releasing.
pub fn gensalt_with(params: &SaltParams) -> Result<Salt> {
    debug!(prefix = ?params.prefix, count = params.count, "generating salt");

    let prefix = params
        .prefix
        .as_deref()
        .map(CString::new)
        .transpose()
        .map_err(|_| ValidationError::InteriorNul("prefix"))?;
    let prefix_ptr = prefix.as_ref().map_or(ptr::null(), |p| p.as_ptr());

    let failed = |source: io::Error| {
        warn!(prefix = ?params.prefix, count = params.count, error = %source, "salt generation failed");
        Error::SaltGeneration {
            prefix: params.prefix.clone(),
            count: params.count,
            source,
        }
    };

    #[cfg(target_pointer_width = "64")]
    let count = params.count as c_ulong;
    #[cfg(not(target_pointer_width = "64"))]
    let count = c_ulong::try_from(params.count).map_err(|_| {
        failed(io::Error::new(
            io::ErrorKind::InvalidInput,
            "count exceeds unsigned long",
        ))
    })?;

    let mut buf = [0 as c_char; CRYPT_GENSALT_OUTPUT_SIZE];
    // SAFETY: `prefix_ptr` is NULL or a live NUL-terminated string; `buf` is
    // writable for its full length, which is the size passed in.
    let raw = unsafe {
        sys::crypt_gensalt_rn(
            prefix_ptr,
            count,
            ptr::null(),
            0,
            buf.as_mut_ptr(),
            CRYPT_GENSALT_OUTPUT_SIZE as c_int,
        )
    };
    if raw.is_null() {
        return Err(failed(io::Error::last_os_error()));
    }

    // SAFETY: on success the library NUL-terminates within `buf`.
    let setting = unsafe { CStr::from_ptr(raw) };
    match setting.to_str() {
        Ok(s) if !s.is_empty() && !s.starts_with('*') => Ok(Salt(s.to_owned())),
        _ => Err(failed(io::Error::new(
            io::ErrorKind::InvalidData,
            "library returned an empty or unusable salt",
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypt::validate::is_valid_salt;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn default_params_defer_to_library() {
        let params = SaltParams::default();
        assert_eq!(params.prefix(), None);
        assert_eq!(params.count(), 0);
    }

    #[test]
    fn env_overrides_prefix_and_count() {
        let params =
            SaltParams::from_lookup(lookup(&[(ENV_PREFIX, "$6$"), (ENV_COUNT, "10000")])).unwrap();
        assert_eq!(params.prefix(), Some("$6$"));
        assert_eq!(params.count(), 10000);
    }

    #[test]
    fn env_prefix_accepts_scheme_name() {
        let params = SaltParams::from_lookup(lookup(&[(ENV_PREFIX, "SHA256crypt")])).unwrap();
        assert_eq!(params.prefix(), Some("$5$"));
    }

    #[test]
    fn env_bad_count_fails() {
        let err = SaltParams::from_lookup(lookup(&[(ENV_COUNT, "lots")])).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidCount(ref c)) if c == "lots"
        ));
    }

    #[test]
    fn env_empty_values_are_ignored() {
        let params =
            SaltParams::from_lookup(lookup(&[(ENV_PREFIX, ""), (ENV_COUNT, "")])).unwrap();
        assert_eq!(params, SaltParams::default());
    }

    #[test]
    fn scheme_parses_name_and_prefix() {
        assert_eq!("yescrypt".parse::<Scheme>().unwrap(), Scheme::Yescrypt);
        assert_eq!("$2b$".parse::<Scheme>().unwrap(), Scheme::Bcrypt);
        assert!("$9$".parse::<Scheme>().is_err());
    }

    #[test]
    fn gensalt_sha512_with_rounds() {
        let salt = gensalt("$6$", 10000).unwrap();
        assert!(salt.as_str().starts_with("$6$rounds=10000$"));
        assert!(is_valid_salt(salt.as_str()));
    }

    #[test]
    fn gensalt_library_default() {
        let salt = gensalt_with(&SaltParams::default()).unwrap();
        assert!(salt.as_str().starts_with('$'));
        assert!(is_valid_salt(salt.as_str()));
    }

    #[test]
    fn gensalt_is_random() {
        let a = gensalt("$6$", 10000).unwrap();
        let b = gensalt("$6$", 10000).unwrap();
        assert_ne!(a, b);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn gensalt_large_count_is_left_to_library() {
        // sha512crypt clamps the rounds to its maximum instead of failing
        let salt = gensalt("$6$", u64::MAX).unwrap();
        assert!(salt.as_str().starts_with("$6$rounds="));
        assert!(is_valid_salt(salt.as_str()));
    }

    #[test]
    fn gensalt_unknown_prefix_fails() {
        let err = gensalt("$unknown$", 0).unwrap_err();
        assert!(matches!(err, Error::SaltGeneration { .. }));
    }

    #[test]
    fn gensalt_prefix_with_nul_is_validation_error() {
        let err = gensalt("$6\0$", 0).unwrap_err();
        assert!(err.is_validation());
    }
}
