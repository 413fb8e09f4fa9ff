//! [`Value`] — the native side of the marshalling boundary.

use std::fmt;
use std::io;
use std::os::fd::OwnedFd;
use std::time::SystemTime;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MarshalError;
use crate::file_handle::FileHandle;
use crate::timestamp::Timestamp;

/// Ordered sequence of values.
pub type Array = Vec<Value>;
/// String-keyed mapping; key order carries no meaning.
pub type Map = IndexMap<String, Value>;

/// Every value that can cross the boundary.
///
/// Trees are finite and acyclic by construction: containers own their
/// children.
#[derive(Debug)]
pub enum Value {
    /// Ordered sequence; order is significant.
    Array(Array),
    /// String keys to values.
    Map(Map),
    /// UTF-8 text.
    Text(String),
    /// Instant as floating seconds since the Unix epoch.
    Timestamp(Timestamp),
    /// Raw byte buffer, possibly empty.
    Bytes(Vec<u8>),
    /// Unsigned 64-bit integer.
    UInt64(u64),
    /// Signed 64-bit integer.
    Int64(i64),
    /// IEEE-754 double.
    Float64(f64),
    Bool(bool),
    /// OS descriptor; compared by device + inode, not descriptor number.
    Handle(FileHandle),
    /// 128-bit identifier, compared byte for byte.
    UniqueId(Uuid),
}

/// The closed set of supported kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Container; see [`Value::Array`].
    Array,
    /// Container; see [`Value::Map`].
    Map,
    Text,
    Timestamp,
    Bytes,
    /// Serialized as `"uint64"`.
    UInt64,
    /// Serialized as `"int64"`.
    Int64,
    /// Serialized as `"float64"`.
    Float64,
    Bool,
    /// File descriptor.
    Handle,
    /// Serialized as `"uniqueid"`.
    UniqueId,
}

impl Kind {
    pub const ALL: [Kind; 11] = [
        Kind::Array,
        Kind::Map,
        Kind::Text,
        Kind::Timestamp,
        Kind::Bytes,
        Kind::UInt64,
        Kind::Int64,
        Kind::Float64,
        Kind::Bool,
        Kind::Handle,
        Kind::UniqueId,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Kind::Array => "array",
            Kind::Map => "map",
            Kind::Text => "text",
            Kind::Timestamp => "timestamp",
            Kind::Bytes => "bytes",
            Kind::UInt64 => "uint64",
            Kind::Int64 => "int64",
            Kind::Float64 => "float64",
            Kind::Bool => "bool",
            Kind::Handle => "handle",
            Kind::UniqueId => "uniqueid",
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, Kind::Array | Kind::Map)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Array(_) => Kind::Array,
            Value::Map(_) => Kind::Map,
            Value::Text(_) => Kind::Text,
            Value::Timestamp(_) => Kind::Timestamp,
            Value::Bytes(_) => Kind::Bytes,
            Value::UInt64(_) => Kind::UInt64,
            Value::Int64(_) => Kind::Int64,
            Value::Float64(_) => Kind::Float64,
            Value::Bool(_) => Kind::Bool,
            Value::Handle(_) => Kind::Handle,
            Value::UniqueId(_) => Kind::UniqueId,
        }
    }

    /// Deep copy; descriptors are duplicated so the copy closes independently.
    pub fn try_clone(&self) -> io::Result<Value> {
        Ok(match self {
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(Value::try_clone)
                    .collect::<io::Result<_>>()?,
            ),
            Value::Map(entries) => {
                let mut out = Map::with_capacity(entries.len());
                for (key, value) in entries {
                    out.insert(key.clone(), value.try_clone()?);
                }
                Value::Map(out)
            }
            Value::Text(s) => Value::Text(s.clone()),
            Value::Timestamp(ts) => Value::Timestamp(*ts),
            Value::Bytes(b) => Value::Bytes(b.clone()),
            Value::UInt64(n) => Value::UInt64(*n),
            Value::Int64(n) => Value::Int64(*n),
            Value::Float64(n) => Value::Float64(*n),
            Value::Bool(b) => Value::Bool(*b),
            Value::Handle(h) => Value::Handle(h.try_clone()?),
            Value::UniqueId(id) => Value::UniqueId(*id),
        })
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt64(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<&FileHandle> {
        match self {
            Value::Handle(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Value::UniqueId(id) => Some(*id),
            _ => None,
        }
    }
}

macro_rules! value_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = MarshalError;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(MarshalError::KindMismatch {
                            expected: Kind::$variant,
                            found: other.kind(),
                        }),
                    }
                }
            }
        )*
    };
}

value_conversions! {
    Array => Array,
    Map => Map,
    String => Text,
    Timestamp => Timestamp,
    Vec<u8> => Bytes,
    u64 => UInt64,
    i64 => Int64,
    f64 => Float64,
    bool => Bool,
    FileHandle => Handle,
    Uuid => UniqueId,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<SystemTime> for Value {
    fn from(time: SystemTime) -> Self {
        Value::Timestamp(time.into())
    }
}

impl From<OwnedFd> for Value {
    fn from(fd: OwnedFd) -> Self {
        Value::Handle(fd.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_are_distinct() {
        let mut names: Vec<_> = Kind::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Kind::ALL.len());
    }

    #[test]
    fn kind_serde_matches_name() {
        for kind in Kind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
            let back: Kind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
        assert_eq!(serde_json::to_string(&Kind::UInt64).unwrap(), "\"uint64\"");
        assert_eq!(serde_json::to_string(&Kind::UniqueId).unwrap(), "\"uniqueid\"");
    }

    #[test]
    fn value_kind_matches_variant() {
        assert_eq!(Value::from("x").kind(), Kind::Text);
        assert_eq!(Value::from(1u64).kind(), Kind::UInt64);
        assert_eq!(Value::from(1i64).kind(), Kind::Int64);
        assert_eq!(Value::from(1.0).kind(), Kind::Float64);
        assert_eq!(Value::from(Uuid::nil()).kind(), Kind::UniqueId);
        assert_eq!(Value::from(Map::new()).kind(), Kind::Map);
        assert_eq!(Value::from(Array::new()).kind(), Kind::Array);
        assert_eq!(Value::from(&b"ab"[..]).kind(), Kind::Bytes);
    }

    #[test]
    fn try_from_reports_kind_mismatch() {
        let err = String::try_from(Value::Bool(true)).unwrap_err();
        assert!(matches!(
            err,
            MarshalError::KindMismatch {
                expected: Kind::Text,
                found: Kind::Bool
            }
        ));
        assert_eq!(u64::try_from(Value::UInt64(7)).unwrap(), 7);
    }

    #[test]
    fn try_clone_duplicates_descriptors() {
        let file = tempfile::tempfile().unwrap();
        let value = Value::Array(vec![Value::from(OwnedFd::from(file)), Value::Int64(3)]);
        let copy = value.try_clone().unwrap();
        let (a, b) = match (&value, &copy) {
            (Value::Array(a), Value::Array(b)) => (a[0].as_handle().unwrap(), b[0].as_handle().unwrap()),
            _ => unreachable!(),
        };
        assert!(a.same_file(b));
        assert_eq!(copy.as_array().unwrap()[1].as_i64(), Some(3));
    }
}
