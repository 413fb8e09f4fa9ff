//! Conversions between [`Value`] and `serde_json::Value`.

use std::os::fd::AsRawFd;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;

use crate::error::MarshalError;
use crate::value::{Map, Value};

impl TryFrom<serde_json::Value> for Value {
    type Error = MarshalError;

    /// JSON `null` has no native counterpart and is rejected, wherever it occurs.
    fn try_from(v: serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match v {
            serde_json::Value::Null => return Err(MarshalError::Unrepresentable("null")),
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int64(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt64(u)
                } else {
                    Value::Float64(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(arr) => Value::Array(
                arr.into_iter()
                    .map(Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::Object(obj) => {
                let mut map = Map::with_capacity(obj.len());
                for (k, v) in obj {
                    map.insert(k, Value::try_from(v)?);
                }
                Value::Map(map)
            }
        })
    }
}

impl Value {
    /// Lossy JSON view for diagnostics.
    ///
    /// Bytes become a base64 data URI, timestamps float seconds, identifiers
    /// hyphenated strings and handles `{"fd": n}`. Non-finite floats become
    /// `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Array(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Timestamp(ts) => json!(ts.as_secs_f64()),
            Value::Bytes(b) => serde_json::Value::String(format!(
                "data:application/octet-stream;base64,{}",
                STANDARD.encode(b)
            )),
            Value::UInt64(n) => json!(n),
            Value::Int64(n) => json!(n),
            Value::Float64(n) => json!(n),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Handle(h) => json!({ "fd": h.as_raw_fd() }),
            Value::UniqueId(id) => serde_json::Value::String(id.hyphenated().to_string()),
        }
    }
}
