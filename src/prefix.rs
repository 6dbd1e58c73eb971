//! Random digits added around an encoded value.
//!
//! The block hides the length and first digits of the cipher output.  It is not part of
//! the cipher and cannot be decoded, so it has to be stripped before decoding.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error};
use crate::MAX_WIDTH;

/// Where the random block goes relative to the cipher output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixPosition {
    #[default]
    Before,
    After,
}

/// A fixed-width block of random digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prefix {
    width: usize,
    position: PrefixPosition,
}

impl Prefix {
    /// Creates a block of `width` digits.  The width must be below 20, so that every block
    /// fits in a `u64`.
    pub fn new(width: usize, position: PrefixPosition) -> Result<Self, ConfigError> {
        if width >= MAX_WIDTH {
            return Err(ConfigError::InvalidPrefixLength(width));
        }
        Ok(Prefix { width, position })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Draws a block uniformly from `[10^(width-1), 10^width - 1]`, so it never starts
    /// with a zero.  A zero width gives an empty block.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> String {
        if self.width == 0 {
            return String::new();
        }
        let low = 10u64.pow(self.width as u32 - 1);
        let high = 10u64.pow(self.width as u32) - 1;
        rng.gen_range(low..=high).to_string()
    }

    /// Combines a random block with `encoded`.
    pub fn attach<R: Rng>(&self, encoded: &str, rng: &mut R) -> String {
        let block = self.generate(rng);
        match self.position {
            PrefixPosition::Before => format!("{}{}", block, encoded),
            PrefixPosition::After => format!("{}{}", encoded, block),
        }
    }

    /// Removes the random block, returning the cipher output.
    pub fn strip<'a>(&self, value: &'a str) -> Result<&'a str, Error> {
        if !value.is_ascii() {
            return Err(Error::InvalidInput(format!("{:?} is not a number", value)));
        }
        if value.len() < self.width {
            return Err(Error::WidthMismatch {
                expected: self.width,
                received: value.len(),
            });
        }
        Ok(match self.position {
            PrefixPosition::Before => &value[self.width..],
            PrefixPosition::After => &value[..value.len() - self.width],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for width in 1..20 {
            let prefix = Prefix::new(width, PrefixPosition::Before).unwrap();
            for _ in 0..100 {
                let block = prefix.generate(&mut rng);
                assert_eq!(block.len(), width);
                assert!(!block.starts_with('0'));
                assert!(block.bytes().all(|b| b.is_ascii_digit()));
            }
        }
    }

    #[test]
    fn test_single_digit_block() {
        let mut rng = StdRng::seed_from_u64(1);
        let prefix = Prefix::new(1, PrefixPosition::Before).unwrap();
        for _ in 0..200 {
            let block = prefix.generate(&mut rng);
            assert_ne!(block, "0");
        }
    }

    #[test]
    fn test_width_limit() {
        assert!(Prefix::new(19, PrefixPosition::Before).is_ok());
        assert_eq!(
            Prefix::new(20, PrefixPosition::Before),
            Err(ConfigError::InvalidPrefixLength(20))
        );
        assert_eq!(
            Prefix::new(usize::MAX, PrefixPosition::After),
            Err(ConfigError::InvalidPrefixLength(usize::MAX))
        );
    }

    #[test]
    fn test_zero_width() {
        let mut rng = StdRng::seed_from_u64(0);
        let prefix = Prefix::new(0, PrefixPosition::After).unwrap();
        assert_eq!(prefix.generate(&mut rng), "");
        assert_eq!(prefix.attach("0945", &mut rng), "0945");
        assert_eq!(prefix.strip("0945"), Ok("0945"));
    }

    #[test]
    fn test_attach_and_strip() {
        let mut rng = StdRng::seed_from_u64(42);

        let before = Prefix::new(2, PrefixPosition::Before).unwrap();
        let value = before.attach("0945", &mut rng);
        assert_eq!(value.len(), 6);
        assert!(value.ends_with("0945"));
        assert_eq!(before.strip(&value), Ok("0945"));

        let after = Prefix::new(3, PrefixPosition::After).unwrap();
        let value = after.attach("0945", &mut rng);
        assert_eq!(value.len(), 7);
        assert!(value.starts_with("0945"));
        assert_eq!(after.strip(&value), Ok("0945"));

        assert_eq!(
            after.strip("12"),
            Err(Error::WidthMismatch {
                expected: 3,
                received: 2
            })
        );
    }
}
