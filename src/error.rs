use std::io;

use thiserror::Error;

use crate::config::MAX_PASSWORD_LENGTH;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("no character class enabled; choose at least one of lower, upper, digit, symbol")]
    EmptyAlphabet,

    #[error("password length {requested} is outside 1..={max}", max = MAX_PASSWORD_LENGTH)]
    SizeOutOfRange { requested: usize },
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("failed to allocate {size} bytes of secret memory")]
    AllocationFailure { size: usize },

    #[error("failed to lock secret memory")]
    MemoryLockFailure {
        #[source]
        source: io::Error,
    },

    #[error("operating system entropy unavailable: {0}")]
    OsEntropy(getrandom::Error),

    #[error("failed to read entropy from the terminal")]
    Terminal(#[source] io::Error),

    #[error("entropy input of {length} bytes is outside the accepted range")]
    EntropyLength { length: usize },
}
