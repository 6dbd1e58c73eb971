use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use diesel::deserialize::{self, FromSql, Queryable};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Cipher, Config, ConfigError, Error};

// Ciphers per marker name, tagged with the global config generation they were built from.
struct CipherCache {
    generation: u64,
    ciphers: HashMap<String, Arc<Cipher>>,
}

thread_local! {
    static CIPHER_CACHE: RefCell<CipherCache> = RefCell::new(CipherCache {
        generation: 0,
        ciphers: HashMap::new(),
    });
}

fn get_or_create_cipher<T: TypeMarker>() -> Result<Arc<Cipher>, ConfigError> {
    CIPHER_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        let generation = Config::global_generation();
        if cache.generation != generation {
            cache.ciphers.clear();
            cache.generation = generation;
        }
        if let Some(cipher) = cache.ciphers.get(T::name()) {
            return Ok(cipher.clone());
        }
        let mut config = Config::global().ok_or(ConfigError::MissingGlobal)?;
        if let Some(spin) = T::spin() {
            config = config.spin(spin);
        }
        let cipher = Arc::new(Cipher::new(&config)?);
        cache.ciphers.insert(T::name().to_string(), cipher.clone());
        Ok(cipher)
    })
}

pub trait TypeMarker: std::fmt::Debug {
    fn name() -> &'static str;

    /// Overrides the global spin for this type, so that IDs of different types are
    /// scrambled differently.
    fn spin() -> Option<i64> {
        None
    }
}

/// An generic type-safe object ID field (a wrapped u64).
///
/// When serialized with Serde, the number is automatically obfuscated into a fixed-width
/// digit string.  Deserialization decodes the string back to an integer.  The random
/// prefix is not added here, so serializing the same field twice gives the same string.
///
/// Traits are also provided for Diesel compatibility with Postgres BigInt fields, which
/// store the raw value.
///
/// # Examples
///
/// ```
/// use draper_rs;
/// use serde::{Serialize, Deserialize};
/// use serde_json;
///
/// #[derive(Clone, Copy, Debug)]
/// pub struct ExampleIdMarker;
/// impl draper_rs::TypeMarker for ExampleIdMarker {
///     fn name() -> &'static str { "example" }
/// }
///
/// type ExampleId = draper_rs::Field<ExampleIdMarker>;
///
/// #[derive(serde::Serialize)]
/// struct Example {
///     pub id: ExampleId,
/// }
///
/// draper_rs::Config::set_global(draper_rs::Config::new().length(4).unwrap());
/// let obj = Example {id: ExampleId::from(42)};
/// let obj_str = serde_json::to_string(&obj).unwrap();
/// assert_eq!(obj_str, "{\"id\":\"0945\"}");
/// ```
#[derive(AsExpression, Debug, Clone, Copy)]
#[diesel(sql_type = BigInt)]
pub struct Field<T: TypeMarker> {
    id: u64,
    _marker: std::marker::PhantomData<T>,
}

impl<T: TypeMarker> From<Field<T>> for u64 {
    /// Returns the raw `u64` value.
    fn from(field: Field<T>) -> Self {
        field.id
    }
}

impl<T: TypeMarker> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Field {{ id: {}, marker: {} }}", self.id, T::name())
    }
}

impl<T: TypeMarker> PartialEq for Field<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T: TypeMarker> Eq for Field<T> {}

impl<T: TypeMarker> Field<T> {
    /// Creates a `Field<T>` value from a `u64`.
    pub fn from(id: u64) -> Self {
        Field {
            id,
            _marker: std::marker::PhantomData,
        }
    }

    /// Creates a `Field<T>` from a database value.  Negative values are rejected.
    pub fn try_from_signed(id: i64) -> Result<Self, Error> {
        u64::try_from(id)
            .map(Field::from)
            .map_err(|_| Error::InvalidInput(format!("{} is negative", id)))
    }

    /// Obfuscates the ID with the configuration of the type.
    pub fn encode(&self) -> Result<String, Error> {
        get_or_create_cipher::<T>()?.encode(self.id)
    }

    /// Decodes an obfuscated ID of this type.
    pub fn decode(encoded: &str) -> Result<Self, Error> {
        get_or_create_cipher::<T>()?
            .decode(encoded)
            .map(Field::from)
    }
}

impl<T: TypeMarker> Serialize for Field<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = self.encode().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&encoded)
    }
}

impl<'de, T: TypeMarker> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        Field::decode(&encoded).map_err(serde::de::Error::custom)
    }
}

impl<T: TypeMarker> ToSql<BigInt, Pg> for Field<T> {
    fn to_sql(&self, out: &mut Output<'_, '_, Pg>) -> serialize::Result {
        let id = i64::try_from(self.id).map_err(|_| Error::OutOfRange {
            value: self.id.to_string(),
            width: 19,
        })?;
        <i64 as ToSql<BigInt, Pg>>::to_sql(&id, &mut out.reborrow())
    }
}

impl<T: TypeMarker> FromSql<BigInt, Pg> for Field<T> {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let id = <i64 as FromSql<BigInt, Pg>>::from_sql(bytes)?;
        Ok(Field::try_from_signed(id)?)
    }
}

impl<T> Queryable<BigInt, Pg> for Field<T>
where
    T: TypeMarker,
{
    type Row = <i64 as Queryable<BigInt, Pg>>::Row;

    fn build(row: Self::Row) -> deserialize::Result<Self> {
        let id = i64::build(row)?;
        Ok(Field::try_from_signed(id)?)
    }
}
