use thiserror::Error;

/// Error returned for encode/decode errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Value {value} does not fit in {width} digits")]
    OutOfRange { value: String, width: usize },

    #[error("Encoded width was {received}, expected {expected}")]
    WidthMismatch { expected: usize, received: usize },

    #[error("Digit {digit} at position {position} has no preimage")]
    NotInvertible { position: usize, digit: u8 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Error returned for invalid configurations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid length {0}, must be at most {max}", max = crate::MAX_WIDTH - 1)]
    InvalidLength(usize),

    #[error("Invalid prefix length {0}, must be at most {max}", max = crate::MAX_WIDTH - 1)]
    InvalidPrefixLength(usize),

    #[error("Spin {spin} does not give a bijective substitution at position {position}")]
    NonBijectiveSpin { spin: i64, position: usize },

    #[error("Source column is required when the source is a column")]
    MissingColumn,

    #[error("Global configuration is not set")]
    MissingGlobal,

    #[error("A different global configuration is already installed")]
    AlreadyInstalled,
}
