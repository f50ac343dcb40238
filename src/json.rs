//! This module exports different types for JSON interactions.

use serde::de::DeserializeOwned;
use serde::ser::Serialize;

use crate::Result;

pub type Value = serde_json::Value;
pub type JsonMap = serde_json::Map<String, Value>;

pub use serde_json::json;
pub use serde_json::Error as JsonError;

pub const NULL: Value = Value::Null;

pub(crate) async fn decode_resp<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let result = serde_json::from_slice(&resp.bytes().await?)?;
    Ok(result)
}

#[allow(clippy::missing_errors_doc)] // It's obvious
pub fn to_vec<T>(v: &T) -> Result<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    Ok(serde_json::to_vec(v)?)
}

#[allow(clippy::missing_errors_doc)] // It's obvious
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_slice(v)?)
}

#[allow(clippy::missing_errors_doc)] // It's obvious
pub fn to_value<T>(value: T) -> Result<Value>
where
    T: Serialize,
{
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
#[track_caller]
pub(crate) fn assert_json<T>(data: &T, json: Value)
where
    T: Serialize,
{
    let serialized = to_value(data).unwrap();
    assert!(
        serialized == json,
        "data->JSON serialization failed\nexpected: {json:?}\n     got: {serialized:?}"
    );
}
