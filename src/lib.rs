//! `draper` obfuscates sequential integer IDs into fixed-width digit strings and back, and
//! provides a generic field type to conveniently manage the process with Serde and Diesel.
//!
//! Auto-incrementing database keys leak how many rows a table has and in which order they
//! were created.  `draper` maps each key to a digit string of the same width, so that the
//! exposed identifiers look unordered while the mapping stays unique and reversible.  You
//! keep using the integers as your database keys.
//!
//! The cipher works on the zero-padded decimal digits of the value in two stages, both
//! selected by an integer `spin`:
//!
//! 1. every digit is substituted using a table specific to its position, then
//! 2. the digit positions are shuffled, seeded by the digit sum.
//!
//! This is obfuscation, not encryption.  Anyone who knows the spin can decode the IDs, and
//! the spin can be recovered from a handful of known pairs.  Use a keyed cipher when the
//! identifiers must resist a determined attacker.
//!
//! Not every spin gives an invertible substitution.  [`Cipher::new`] checks the spin and
//! rejects the ones that would lose information.
//!
//! An optional block of random digits can be added in front of (or after) the encoded value
//! to hide its width.  The block is not decodable and is stripped by width before decoding.
//!
//! # Usage
//!
//! ##  Generic `Field` API
//!
//! ```
//! use draper_rs;
//! use serde::{Serialize, Deserialize};
//! use serde_json;
//!
//! #[derive(Debug)]
//! pub struct ExampleIdMarker;
//! impl draper_rs::TypeMarker for ExampleIdMarker {
//!     fn name() -> &'static str { "example" }
//! }
//!
//! type ExampleId = draper_rs::Field<ExampleIdMarker>;
//!
//! #[derive(serde::Serialize)]
//! struct Example {
//!     pub id: ExampleId,
//! }
//!
//! draper_rs::Config::set_global(draper_rs::Config::new().spin(1).length(6).unwrap());
//! let obj = Example {id: ExampleId::from(12345)};
//! let obj_str = serde_json::to_string(&obj).unwrap();
//! assert_eq!(obj_str.len(), "{\"id\":\"000000\"}".len());
//! ```
//!
//! ## Low level API
//!
//! `Cipher` encodes and decodes integers for a validated `Config`, and [`draperize`] /
//! [`undraperize`] expose the raw transform.
//!
//! ```
//! use draper_rs::{Cipher, Config};
//!
//! let cipher = Cipher::new(&Config::new().length(4).unwrap()).unwrap();
//! let encoded = cipher.encode(42).unwrap();
//! let decoded = cipher.decode(&encoded).unwrap();
//! assert_eq!(encoded, "0945");
//! assert_eq!(decoded, 42);
//! ```
//!

mod cipher;
mod config;
mod error;
mod field;
mod obfuscator;
mod prefix;
mod rotate;
mod scatter;
mod swap;

pub use cipher::{draperize, undraperize, Cipher};
pub use config::{Config, Overflow, Source};
pub use error::{ConfigError, Error};
pub use field::{Field, TypeMarker};
pub use obfuscator::{Assignment, ColumnValue, Obfuscator, Sequence, ValueSource};
pub use prefix::{Prefix, PrefixPosition};
pub use rotate::rotate_left;
pub use scatter::{scatter, unscatter};
pub use swap::{is_bijective, swap, table, unswap, validate_spin};

/// Number of digits in `u64::MAX`, the widest value that can be encoded.
pub const MAX_WIDTH: usize = 20;
