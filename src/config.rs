use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::prefix::PrefixPosition;
use crate::swap::validate_spin;
use crate::MAX_WIDTH;

static GLOBAL_CONFIG: Lazy<Mutex<Option<Config>>> = Lazy::new(|| Mutex::new(None));

// Bumped under the `GLOBAL_CONFIG` lock every time the global configuration changes.
static GLOBAL_GENERATION: AtomicU64 = AtomicU64::new(0);

/// What to do with values that have more digits than the configured length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overflow {
    /// Encode the value at its natural, wider width.
    #[default]
    PassThrough,
    /// Reject the value with [`crate::Error::OutOfRange`].
    Strict,
}

/// Where the value to obfuscate comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// A monotonically increasing sequence.
    #[default]
    Sequence,
    /// An existing column of the row, named by `Config::column`.
    Column,
}

/// Configuring the draper library.
///
/// All fields have defaults, so a partial config file deserializes:
///
/// ```
/// let config: draper_rs::Config = serde_json::from_str(r#"{"spin": 1, "length": 6}"#).unwrap();
/// assert_eq!(config, draper_rs::Config::new().spin(1).length(6).unwrap());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub(crate) spin: i64,
    pub(crate) length: usize,
    pub(crate) prefix_length: usize,
    pub(crate) prefix_position: PrefixPosition,
    pub(crate) overflow: Overflow,
    pub(crate) source: Source,
    pub(crate) column: Option<String>,
    pub(crate) target: String,
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Creates a new configuration with default settings.
    /// - `spin` defaults to 0.
    /// - `length` defaults to 10, enough for every 32 bit key.
    /// - `prefix_length` defaults to 0, no random prefix.
    /// - `overflow` defaults to [`Overflow::PassThrough`].
    /// - `source` defaults to [`Source::Sequence`], and `target` to `draper_id`.
    pub fn new() -> Self {
        Config {
            spin: 0,
            length: 10,
            prefix_length: 0,
            prefix_position: PrefixPosition::Before,
            overflow: Overflow::PassThrough,
            source: Source::Sequence,
            column: None,
            target: "draper_id".to_string(),
        }
    }

    /// Sets the spin, which selects the permutation family.
    pub fn spin(mut self, spin: i64) -> Self {
        self.spin = spin;
        self
    }

    /// Sets the number of digits in the encoded value.
    /// The value must be below 20 so that every encoded value fits in a `u64`.
    pub fn length(mut self, length: usize) -> Result<Self, ConfigError> {
        if length >= MAX_WIDTH {
            Err(ConfigError::InvalidLength(length))
        } else {
            self.length = length;
            Ok(self)
        }
    }

    /// Sets the number of random digits added to the encoded value.
    /// The value must be below 20.
    pub fn prefix_length(mut self, prefix_length: usize) -> Result<Self, ConfigError> {
        if prefix_length >= MAX_WIDTH {
            Err(ConfigError::InvalidPrefixLength(prefix_length))
        } else {
            self.prefix_length = prefix_length;
            Ok(self)
        }
    }

    /// Sets whether the random digits go before or after the encoded value.
    pub fn prefix_position(mut self, position: PrefixPosition) -> Self {
        self.prefix_position = position;
        self
    }

    pub fn overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    /// Reads source values from a sequence.
    pub fn source_sequence(mut self) -> Self {
        self.source = Source::Sequence;
        self.column = None;
        self
    }

    /// Reads source values from the named column.
    pub fn source_column(mut self, column: &str) -> Self {
        self.source = Source::Column;
        self.column = Some(column.to_string());
        self
    }

    /// Sets the name of the field the encoded value is written to.
    pub fn target(mut self, target: &str) -> Self {
        self.target = target.to_string();
        self
    }

    /// Checks the whole configuration.  Deserialized configs should be validated before use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.length >= MAX_WIDTH {
            return Err(ConfigError::InvalidLength(self.length));
        }
        if self.prefix_length >= MAX_WIDTH {
            return Err(ConfigError::InvalidPrefixLength(self.prefix_length));
        }
        if self.source == Source::Column && self.column.as_deref().unwrap_or("").is_empty() {
            return Err(ConfigError::MissingColumn);
        }
        validate_spin(self.spin, self.checked_width())
    }

    /// Number of digit positions whose substitution tables must be bijective.  Overflowing
    /// values are encoded at their natural width, up to the width of `u64::MAX`.
    pub(crate) fn checked_width(&self) -> usize {
        match self.overflow {
            Overflow::Strict => self.length,
            Overflow::PassThrough => MAX_WIDTH,
        }
    }

    pub fn get_spin(&self) -> i64 {
        self.spin
    }

    pub fn get_length(&self) -> usize {
        self.length
    }

    pub fn get_source(&self) -> Source {
        self.source
    }

    pub fn get_column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn get_target(&self) -> &str {
        &self.target
    }

    /// Sets the global configuration, replacing any previous one.  `Field` values encoded
    /// afterwards use the new configuration.
    pub fn set_global(config: Config) {
        let mut global_config = GLOBAL_CONFIG.lock().unwrap_or_else(PoisonError::into_inner);
        *global_config = Some(config);
        GLOBAL_GENERATION.fetch_add(1, Ordering::Release);
    }

    /// Installs the global configuration once.
    ///
    /// Installing the same configuration again is a no-op, installing a different one is
    /// an error.  Use [`Config::set_global`] to replace it deliberately.
    pub fn install_global(config: Config) -> Result<(), ConfigError> {
        config.validate()?;
        let mut global_config = GLOBAL_CONFIG.lock().unwrap_or_else(PoisonError::into_inner);
        match global_config.as_ref() {
            Some(existing) if *existing != config => Err(ConfigError::AlreadyInstalled),
            Some(_) => Ok(()),
            None => {
                *global_config = Some(config);
                GLOBAL_GENERATION.fetch_add(1, Ordering::Release);
                Ok(())
            }
        }
    }

    /// Changes whenever the global configuration is set, so caches built from it can tell
    /// when they are stale.
    pub(crate) fn global_generation() -> u64 {
        GLOBAL_GENERATION.load(Ordering::Acquire)
    }

    /// Accesses the global configuration, if set.
    pub fn global() -> Option<Config> {
        GLOBAL_CONFIG
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.get_spin(), 0);
        assert_eq!(config.get_length(), 10);
        assert_eq!(config.prefix_length, 0);
        assert_eq!(config.overflow, Overflow::PassThrough);
        assert_eq!(config.get_source(), Source::Sequence);
        assert_eq!(config.get_target(), "draper_id");
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_builder_limits() {
        assert!(Config::new().length(19).is_ok());
        assert_eq!(
            Config::new().length(20).err(),
            Some(ConfigError::InvalidLength(20))
        );
        assert_eq!(
            Config::new().prefix_length(25).err(),
            Some(ConfigError::InvalidPrefixLength(25))
        );
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            Config::new().spin(5).validate(),
            Err(ConfigError::NonBijectiveSpin {
                spin: 5,
                position: 0
            })
        );
        assert_eq!(Config::new().spin(1).validate(), Ok(()));

        let mut config = Config::new().source_column("legacy_id");
        assert_eq!(config.get_column(), Some("legacy_id"));
        assert_eq!(config.validate(), Ok(()));
        config.column = None;
        assert_eq!(config.validate(), Err(ConfigError::MissingColumn));
        assert_eq!(config.source_sequence().validate(), Ok(()));
    }

    #[test]
    fn test_deserialize() {
        let config: Config = serde_json::from_str(
            r#"{
                "spin": 1,
                "length": 8,
                "prefix_length": 2,
                "prefix_position": "after",
                "overflow": "strict",
                "source": "column",
                "column": "legacy_id",
                "target": "public_id"
            }"#,
        )
        .unwrap();
        let expected = Config::new()
            .spin(1)
            .length(8)
            .unwrap()
            .prefix_length(2)
            .unwrap()
            .prefix_position(PrefixPosition::After)
            .overflow(Overflow::Strict)
            .source_column("legacy_id")
            .target("public_id");
        assert_eq!(config, expected);

        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::new());

        // Deserialization skips the builder checks.
        let config: Config = serde_json::from_str(r#"{"length": 40}"#).unwrap();
        assert_eq!(config.validate(), Err(ConfigError::InvalidLength(40)));
    }
}
