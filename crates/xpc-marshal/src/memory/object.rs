use std::os::fd::OwnedFd;
use std::sync::Arc;

/// Runtime type tag of an in-memory [`Object`].
///
/// `Null` and `Shmem` exist on the foreign side but have no native
/// counterpart; decoding them is a contract violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Array,
    Dictionary,
    String,
    /// Nanoseconds since the Unix epoch.
    Date,
    Data,
    UInt64,
    Int64,
    Double,
    Bool,
    /// File descriptor.
    Fd,
    Uuid,
    /// Foreign null; not registered.
    Null,
    /// Shared memory region; not registered.
    Shmem,
}

/// A foreign tagged-union object held in process memory.
///
/// Strings and dictionary keys are raw bytes; nothing here enforces UTF-8.
#[derive(Debug, Clone)]
pub enum Object {
    Array(Vec<Object>),
    /// Entries in insertion order. Setting an existing key replaces its value.
    Dictionary(Vec<(Box<[u8]>, Object)>),
    /// Unvalidated bytes.
    String(Box<[u8]>),
    /// Nanoseconds since the Unix epoch.
    Date(i64),
    /// `None` is a null data pointer.
    Data(Option<Box<[u8]>>),
    UInt64(u64),
    Int64(i64),
    Double(f64),
    Bool(bool),
    /// The object's own duplicate, shared by clones of the object.
    Fd(Arc<OwnedFd>),
    Uuid([u8; 16]),
    Null,
    /// Region size in bytes.
    Shmem(usize),
}

impl Object {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Array(_) => ObjectType::Array,
            Object::Dictionary(_) => ObjectType::Dictionary,
            Object::String(_) => ObjectType::String,
            Object::Date(_) => ObjectType::Date,
            Object::Data(_) => ObjectType::Data,
            Object::UInt64(_) => ObjectType::UInt64,
            Object::Int64(_) => ObjectType::Int64,
            Object::Double(_) => ObjectType::Double,
            Object::Bool(_) => ObjectType::Bool,
            Object::Fd(_) => ObjectType::Fd,
            Object::Uuid(_) => ObjectType::Uuid,
            Object::Null => ObjectType::Null,
            Object::Shmem(_) => ObjectType::Shmem,
        }
    }

    /// String object with arbitrary, possibly invalid, UTF-8 payload.
    pub fn raw_string(bytes: &[u8]) -> Self {
        Object::String(bytes.into())
    }

    /// Data object whose byte pointer is null.
    pub fn null_data() -> Self {
        Object::Data(None)
    }

    /// Sets `key` on a dictionary, replacing any previous entry.
    ///
    /// Does nothing when `self` is not a dictionary, like the foreign runtime.
    pub fn insert_raw(&mut self, key: &[u8], value: Object) {
        if let Object::Dictionary(entries) = self {
            match entries.iter_mut().find(|(k, _)| &k[..] == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key.into(), value)),
            }
        }
    }

    /// Appends to an array; does nothing for other objects.
    pub fn push(&mut self, value: Object) {
        if let Object::Array(items) = self {
            items.push(value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Object> {
        match self {
            Object::Dictionary(entries) => entries
                .iter()
                .find(|(k, _)| &k[..] == key.as_bytes())
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Element or entry count; zero for scalars.
    pub fn len(&self) -> usize {
        match self {
            Object::Array(items) => items.len(),
            Object::Dictionary(entries) => entries.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_raw_replaces_existing_key() {
        let mut dict = Object::Dictionary(Vec::new());
        dict.insert_raw(b"a", Object::Int64(1));
        dict.insert_raw(b"b", Object::Int64(2));
        dict.insert_raw(b"a", Object::Int64(3));
        assert_eq!(dict.len(), 2);
        assert!(matches!(dict.get("a"), Some(Object::Int64(3))));
    }

    #[test]
    fn scalars_ignore_container_mutation() {
        let mut scalar = Object::Bool(true);
        scalar.push(Object::Null);
        scalar.insert_raw(b"k", Object::Null);
        assert!(scalar.is_empty());
        assert_eq!(scalar.object_type(), ObjectType::Bool);
    }
}
