use rand::Rng;
use tracing::{debug, warn};

use crate::config::{Config, Overflow};
use crate::error::{ConfigError, Error};
use crate::prefix::Prefix;
use crate::scatter::{scatter, unscatter};
use crate::swap::{swap, unswap};
use crate::MAX_WIDTH;

fn digit_count(value: u64) -> usize {
    value.checked_ilog10().map_or(1, |log| log as usize + 1)
}

// Renders `value` zero-padded to `length` digits.  A zero length holds only the value 0,
// which renders as no digits at all.
fn to_digits(value: u64, length: usize) -> Vec<u8> {
    if value == 0 && length == 0 {
        return Vec::new();
    }
    format!("{:0>width$}", value, width = length)
        .bytes()
        .map(|b| b - b'0')
        .collect()
}

fn parse_digits(encoded: &str) -> Result<Vec<u8>, Error> {
    encoded
        .bytes()
        .map(|b| {
            if b.is_ascii_digit() {
                Ok(b - b'0')
            } else {
                Err(Error::InvalidInput(format!("{:?} is not a number", encoded)))
            }
        })
        .collect()
}

fn join(digits: &[u8]) -> String {
    digits.iter().map(|&d| char::from(b'0' + d)).collect()
}

/// Encodes `value` into a digit string of at least `length` digits.
///
/// The value is zero-padded to `length` digits, substituted and scattered.  A value with
/// more than `length` digits is encoded at its natural width without padding, so the output
/// is wider than `length`.  [`Cipher`] can reject such values instead.
///
/// # Examples
///
/// ```
/// use draper_rs::{draperize, undraperize};
///
/// assert_eq!(draperize(42, 0, 4), "0945");
/// assert_eq!(undraperize("0945", 0).unwrap(), "0042");
/// ```
pub fn draperize(value: u64, spin: i64, length: usize) -> String {
    let digits = to_digits(value, length);
    let scattered = scatter(&swap(&digits, spin), spin, digits.len());
    join(&scattered)
}

/// Decodes a string produced by [`draperize`] with the same spin.
///
/// The result keeps the zero padding.  Width is not encoded in the output, so the caller
/// must pass exactly the digits `draperize` produced.  Decoding with another spin gives an
/// unrelated digit string, not an error.
pub fn undraperize(encoded: &str, spin: i64) -> Result<String, Error> {
    let digits = parse_digits(encoded)?;
    let unswapped = unswap(&unscatter(&digits, spin), spin)?;
    Ok(join(&unswapped))
}

/// Encoder/decoder for a validated configuration.
///
/// # Examples
///
/// ```
/// use draper_rs::{Cipher, Config};
///
/// let cipher = Cipher::new(&Config::new().length(4).unwrap()).unwrap();
/// assert_eq!(cipher.encode(42).unwrap(), "0945");
/// assert_eq!(cipher.decode("0945").unwrap(), 42);
/// ```
#[derive(Clone, Debug)]
pub struct Cipher {
    spin: i64,
    length: usize,
    overflow: Overflow,
    prefix: Prefix,
}

impl Cipher {
    /// Creates a new `Cipher` after checking that `config` can be decoded.
    pub fn new(config: &Config) -> Result<Cipher, ConfigError> {
        config.validate()?;
        debug!(
            spin = config.spin,
            length = config.length,
            prefix_length = config.prefix_length,
            overflow = ?config.overflow,
            "created cipher"
        );
        Ok(Cipher {
            spin: config.spin,
            length: config.length,
            overflow: config.overflow,
            prefix: Prefix::new(config.prefix_length, config.prefix_position)?,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Encodes `value`, without the random prefix.
    pub fn encode(&self, value: u64) -> Result<String, Error> {
        // Zero fits any width, at width 0 it encodes to no digits at all.
        if value != 0 && digit_count(value) > self.length {
            match self.overflow {
                Overflow::Strict => {
                    return Err(Error::OutOfRange {
                        value: value.to_string(),
                        width: self.length,
                    })
                }
                Overflow::PassThrough => {
                    warn!(value, length = self.length, "value wider than length, not padded");
                }
            }
        }
        Ok(draperize(value, self.spin, self.length))
    }

    /// Encodes a signed value, such as a Postgres `BIGINT`.  Negative values are rejected.
    pub fn encode_signed(&self, value: i64) -> Result<String, Error> {
        let value = u64::try_from(value)
            .map_err(|_| Error::InvalidInput(format!("{} is negative", value)))?;
        self.encode(value)
    }

    /// Encodes a decimal string.  Leading zeros are allowed.
    pub fn encode_str(&self, value: &str) -> Result<String, Error> {
        if value.is_empty() {
            return Err(Error::InvalidInput("empty value".to_string()));
        }
        parse_digits(value)?;
        let num = value.parse::<u64>().map_err(|_| Error::OutOfRange {
            value: value.to_string(),
            width: self.length,
        })?;
        self.encode(num)
    }

    /// Encodes `value` and adds the random digits, using the thread-local RNG.
    pub fn encode_prefixed(&self, value: u64) -> Result<String, Error> {
        self.encode_prefixed_with(value, &mut rand::thread_rng())
    }

    pub fn encode_prefixed_with<R: Rng>(
        &self,
        value: u64,
        rng: &mut R,
    ) -> Result<String, Error> {
        let encoded = self.encode(value)?;
        Ok(self.prefix.attach(&encoded, rng))
    }

    /// Decodes `encoded` back to the zero-padded digit string.
    pub fn decode_padded(&self, encoded: &str) -> Result<String, Error> {
        parse_digits(encoded)?;
        let received = encoded.len();
        let width_ok = match self.overflow {
            Overflow::Strict => received == self.length,
            Overflow::PassThrough => received >= self.length && received <= MAX_WIDTH,
        };
        if !width_ok {
            return Err(Error::WidthMismatch {
                expected: self.length,
                received,
            });
        }
        let padded = undraperize(encoded, self.spin)?;
        // Only values that did not fit are encoded wider, and those never start with a zero.
        if received > self.length && padded.starts_with('0') {
            return Err(Error::InvalidInput(format!(
                "{:?} is not a valid encoding",
                encoded
            )));
        }
        Ok(padded)
    }

    /// Decodes `encoded` back to the original value.
    pub fn decode(&self, encoded: &str) -> Result<u64, Error> {
        let padded = self.decode_padded(encoded)?;
        if padded.is_empty() {
            return Ok(0);
        }
        padded.parse::<u64>().map_err(|_| Error::OutOfRange {
            value: padded.clone(),
            width: self.length,
        })
    }

    /// Removes the random digits and decodes the rest.
    pub fn decode_prefixed(&self, value: &str) -> Result<u64, Error> {
        self.decode(self.prefix.strip(value)?)
    }
}
