use crate::timestamp::EQUIVALENCE_EPSILON_SECS;
use crate::value::Value;

/// Structural equivalence between two values.
///
/// - Arrays compare element by element and must have equal length.
/// - Maps must have the same key set; order is ignored.
/// - Timestamps are equivalent within [`EQUIVALENCE_EPSILON_SECS`].
/// - Handles are equivalent when they refer to the same device and inode.
/// - Values of different kinds are never equivalent.
///
/// # Examples
///
/// ```
/// use xpc_marshal::{equivalent, Timestamp, Value};
///
/// let a = Value::Timestamp(Timestamp::from_secs_f64(20.0));
/// let b = Value::Timestamp(Timestamp::from_secs_f64(20.000_000_1));
/// assert!(equivalent(&a, &b));
/// assert!(!equivalent(&Value::Int64(1), &Value::UInt64(1)));
/// ```
pub fn equivalent(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Array(arr_a), Value::Array(arr_b)) => {
            arr_a.len() == arr_b.len()
                && arr_a.iter().zip(arr_b).all(|(x, y)| equivalent(x, y))
        }
        (Value::Map(map_a), Value::Map(map_b)) => {
            if map_a.len() != map_b.len() {
                return false;
            }
            for (key, val_a) in map_a {
                match map_b.get(key) {
                    Some(val_b) if equivalent(val_a, val_b) => {}
                    _ => return false,
                }
            }
            true
        }
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::Timestamp(a), Value::Timestamp(b)) => a.distance(b) < EQUIVALENCE_EPSILON_SECS,
        (Value::Bytes(a), Value::Bytes(b)) => a == b,
        (Value::UInt64(a), Value::UInt64(b)) => a == b,
        (Value::Int64(a), Value::Int64(b)) => a == b,
        (Value::Float64(a), Value::Float64(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Handle(a), Value::Handle(b)) => a.same_file(b),
        (Value::UniqueId(a), Value::UniqueId(b)) => a == b,
        _ => false,
    }
}

impl Value {
    /// See [`equivalent`].
    pub fn equivalent(&self, other: &Value) -> bool {
        equivalent(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::Timestamp;
    use crate::value::Map;
    use crate::FileHandle;
    use uuid::Uuid;

    fn map(entries: Vec<(&str, Value)>) -> Value {
        Value::Map(entries.into_iter().map(|(k, v)| (k.to_owned(), v)).collect())
    }

    #[test]
    fn scalars() {
        assert!(equivalent(&Value::from("a"), &Value::from("a")));
        assert!(!equivalent(&Value::from("a"), &Value::from("b")));
        assert!(equivalent(&Value::Bool(false), &Value::Bool(false)));
        assert!(!equivalent(&Value::Bool(false), &Value::Int64(0)));
        assert!(!equivalent(&Value::Float64(f64::NAN), &Value::Float64(f64::NAN)));
        assert!(equivalent(&Value::UniqueId(Uuid::nil()), &Value::UniqueId(Uuid::nil())));
    }

    #[test]
    fn timestamp_epsilon() {
        let base = Timestamp::from_secs_f64(2_000_000_000.0);
        let near = Timestamp::from_secs_f64(2_000_000_000.000_000_5);
        let far = Timestamp::from_secs_f64(2_000_000_000.000_01);
        assert!(equivalent(&Value::Timestamp(base), &Value::Timestamp(near)));
        assert!(!equivalent(&Value::Timestamp(base), &Value::Timestamp(far)));
    }

    #[test]
    fn arrays_are_positional_and_length_checked() {
        let a = Value::Array(vec![Value::Int64(1), Value::from("x")]);
        let b = Value::Array(vec![Value::from("x"), Value::Int64(1)]);
        let longer = Value::Array(vec![Value::Int64(1), Value::from("x"), Value::Bool(true)]);
        assert!(!equivalent(&a, &b));
        assert!(!equivalent(&a, &longer));
        assert!(!equivalent(&longer, &a));
    }

    #[test]
    fn maps_ignore_order() {
        let a = map(vec![("a", Value::UInt64(1)), ("b", Value::Float64(2.0))]);
        let b = map(vec![("b", Value::Float64(2.0)), ("a", Value::UInt64(1))]);
        assert!(equivalent(&a, &b));
        let missing = map(vec![("a", Value::UInt64(1))]);
        assert!(!equivalent(&a, &missing));
        assert!(!equivalent(&missing, &a));
        assert!(!equivalent(&Value::Map(Map::new()), &Value::Array(vec![])));
    }

    #[test]
    fn handles_compare_by_identity() {
        let h = FileHandle::from(tempfile::tempfile().unwrap());
        let dup = h.try_clone().unwrap();
        let other = FileHandle::from(tempfile::tempfile().unwrap());
        let h = Value::Handle(h);
        assert!(equivalent(&h, &Value::Handle(dup)));
        assert!(!equivalent(&h, &Value::Handle(other)));
    }
}
