use std::io;

use thiserror::Error;

/// Input rejected before it reaches libxcrypt.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("salt is not accepted by this libxcrypt build")]
    InvalidSalt,
    #[error("passphrase is {len} bytes; must be shorter than {max}")]
    PassphraseTooLong { len: usize, max: usize },
    #[error("{0} contains an interior NUL byte")]
    InteriorNul(&'static str),
    #[error("unknown hashing scheme '{0}'")]
    UnknownScheme(String),
    #[error("invalid cost count '{0}'")]
    InvalidCount(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("salt generation failed for prefix {prefix:?} with count {count}")]
    SaltGeneration {
        prefix: Option<String>,
        count: u64,
        #[source]
        source: io::Error,
    },

    #[error("hash computation failed")]
    HashComputation(#[source] io::Error),
}

impl Error {
    /// `true` when the caller supplied bad input, as opposed to the library
    /// failing on input that passed validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
