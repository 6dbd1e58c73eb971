//! Row-insert integration.
//!
//! On every insert the database layer takes a value from the configured source, runs it
//! through [`Obfuscator::on_insert`] and writes the returned [`Assignment`] into the row
//! before it becomes visible.  Installing the trigger itself is left to the caller.

use std::sync::atomic::{AtomicI64, Ordering};

use tracing::trace;

use crate::config::Source;
use crate::{Cipher, Config, ConfigError, Error};

/// Supplies the value to obfuscate for one insert.
pub trait ValueSource {
    fn next_value(&self) -> Result<i64, Error>;
}

/// An in-process, monotonically increasing sequence.  Safe to share between threads.
#[derive(Debug)]
pub struct Sequence {
    next: AtomicI64,
}

impl Sequence {
    /// Creates a sequence whose first value is `start`.
    pub fn new(start: i64) -> Self {
        Sequence {
            next: AtomicI64::new(start),
        }
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Sequence::new(1)
    }
}

impl ValueSource for Sequence {
    fn next_value(&self) -> Result<i64, Error> {
        // The counter stops at i64::MAX, which is never handed out.
        self.next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |value| {
                value.checked_add(1)
            })
            .map_err(|value| Error::OutOfRange {
                value: value.to_string(),
                width: crate::MAX_WIDTH - 1,
            })
    }
}

/// The value of an existing column of the row being inserted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnValue(pub i64);

impl ValueSource for ColumnValue {
    fn next_value(&self) -> Result<i64, Error> {
        Ok(self.0)
    }
}

/// The obfuscated value for the target field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub field: String,
    pub value: String,
}

/// Obfuscates source values into the configured target field.
#[derive(Clone, Debug)]
pub struct Obfuscator {
    cipher: Cipher,
    source: Source,
    column: Option<String>,
    target: String,
}

impl Obfuscator {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Obfuscator {
            cipher: Cipher::new(config)?,
            source: config.source,
            column: config.column.clone(),
            target: config.target.clone(),
        })
    }

    pub fn cipher(&self) -> &Cipher {
        &self.cipher
    }

    pub fn source(&self) -> Source {
        self.source
    }

    /// The column values are read from, when the source is a column.
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Obfuscates `value` for a new row, including the random digits.
    pub fn on_insert(&self, value: i64) -> Result<Assignment, Error> {
        let value = u64::try_from(value)
            .map_err(|_| Error::InvalidInput(format!("{} is negative", value)))?;
        let encoded = self.cipher.encode_prefixed(value)?;
        trace!(field = %self.target, "assigned obfuscated value");
        Ok(Assignment {
            field: self.target.clone(),
            value: encoded,
        })
    }

    /// Takes one value from `source` and obfuscates it.
    pub fn on_insert_from<S>(&self, source: &S) -> Result<Assignment, Error>
    where
        S: ValueSource + ?Sized,
    {
        self.on_insert(source.next_value()?)
    }

    /// Decodes a value written by [`Obfuscator::on_insert`].
    pub fn reveal(&self, value: &str) -> Result<u64, Error> {
        self.cipher.decode_prefixed(value)
    }
}
