use std::fmt;

use serde::de::{Error as DeError, Visitor};

/// Accepts a snowflake sent either as a JSON string or as an unsigned integer.
pub struct SnowflakeVisitor;

impl Visitor<'_> for SnowflakeVisitor {
    type Value = u64;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a string or integer snowflake")
    }

    fn visit_u64<E: DeError>(self, value: u64) -> Result<Self::Value, E> {
        Ok(value)
    }

    fn visit_i64<E: DeError>(self, value: i64) -> Result<Self::Value, E> {
        u64::try_from(value).map_err(|_| E::custom(format!("invalid snowflake: {value}")))
    }

    fn visit_str<E: DeError>(self, value: &str) -> Result<Self::Value, E> {
        value.parse().map_err(|_| E::custom(format!("invalid snowflake: {value:?}")))
    }
}
