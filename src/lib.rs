pub mod alphabet;
pub mod config;
pub mod csprng;
pub mod entropy;
pub mod error;
pub mod format;
pub mod generator;
pub mod mapper;
pub mod secure;

pub use alphabet::Alphabet;
pub use config::{
    CharacterClass, CharacterClasses, Config, LockPolicy, MAX_ENTROPY_LENGTH, MAX_PASSWORD_LENGTH,
};
pub use error::{ConfigurationError, GenerationError};
pub use format::write_password;
pub use generator::{Generator, generate};
