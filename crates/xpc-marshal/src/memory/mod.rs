//! In-memory reference [`Platform`].
//!
//! Models an XPC-like runtime closely enough to exercise every codec path:
//! objects carry runtime type tags, keys and strings are raw bytes, descriptor
//! objects hold their own duplicate, and zero-length buffers can optionally be
//! represented by a null pointer.

mod object;

use std::io;
use std::os::fd::{BorrowedFd, OwnedFd};
use std::sync::{Arc, OnceLock};

pub use object::{Object, ObjectType};

use crate::codec::Codec;
use crate::platform::Platform;

#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryPlatform {
    null_empty_data: bool,
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Represent zero-length byte buffers with a null data pointer.
    pub fn with_null_empty_data(mut self, enabled: bool) -> Self {
        self.null_empty_data = enabled;
        self
    }
}

/// Process-wide codec over the default [`MemoryPlatform`].
pub fn shared_codec() -> &'static Codec<MemoryPlatform> {
    static SHARED: OnceLock<Codec<MemoryPlatform>> = OnceLock::new();
    SHARED.get_or_init(|| Codec::new(MemoryPlatform::new()))
}

impl Platform for MemoryPlatform {
    type Object = Object;
    type Tag = ObjectType;

    fn type_of(&self, object: &Object) -> ObjectType {
        object.object_type()
    }

    fn create_array(&self, elements: Vec<Object>) -> Object {
        Object::Array(elements)
    }

    fn create_map(&self) -> Object {
        Object::Dictionary(Vec::new())
    }

    fn map_set(&self, map: &mut Object, key: &str, value: Object) {
        map.insert_raw(key.as_bytes(), value);
    }

    fn array_for_each(&self, array: &Object, visit: &mut dyn FnMut(usize, &Object) -> bool) {
        if let Object::Array(items) = array {
            for (index, item) in items.iter().enumerate() {
                if !visit(index, item) {
                    break;
                }
            }
        }
    }

    fn map_for_each(&self, map: &Object, visit: &mut dyn FnMut(&[u8], &Object) -> bool) {
        if let Object::Dictionary(entries) = map {
            for (key, value) in entries {
                if !visit(&key[..], value) {
                    break;
                }
            }
        }
    }

    fn map_len(&self, map: &Object) -> usize {
        match map {
            Object::Dictionary(entries) => entries.len(),
            _ => 0,
        }
    }

    fn create_string(&self, utf8: &str) -> Object {
        Object::String(utf8.as_bytes().into())
    }

    fn string_bytes<'a>(&self, object: &'a Object) -> Option<&'a [u8]> {
        match object {
            Object::String(bytes) => Some(&bytes[..]),
            _ => None,
        }
    }

    fn create_timestamp(&self, nanos: i64) -> Object {
        Object::Date(nanos)
    }

    fn timestamp_value(&self, object: &Object) -> Option<i64> {
        match object {
            Object::Date(nanos) => Some(*nanos),
            _ => None,
        }
    }

    fn create_bytes(&self, bytes: &[u8]) -> Object {
        if bytes.is_empty() && self.null_empty_data {
            Object::Data(None)
        } else {
            Object::Data(Some(bytes.into()))
        }
    }

    fn bytes_ptr<'a>(&self, object: &'a Object) -> Option<&'a [u8]> {
        match object {
            Object::Data(Some(bytes)) => Some(&bytes[..]),
            _ => None,
        }
    }

    fn bytes_len(&self, object: &Object) -> usize {
        match object {
            Object::Data(Some(bytes)) => bytes.len(),
            _ => 0,
        }
    }

    fn create_u64(&self, value: u64) -> Object {
        Object::UInt64(value)
    }

    fn u64_value(&self, object: &Object) -> Option<u64> {
        match object {
            Object::UInt64(n) => Some(*n),
            _ => None,
        }
    }

    fn create_i64(&self, value: i64) -> Object {
        Object::Int64(value)
    }

    fn i64_value(&self, object: &Object) -> Option<i64> {
        match object {
            Object::Int64(n) => Some(*n),
            _ => None,
        }
    }

    fn create_f64(&self, value: f64) -> Object {
        Object::Double(value)
    }

    fn f64_value(&self, object: &Object) -> Option<f64> {
        match object {
            Object::Double(n) => Some(*n),
            _ => None,
        }
    }

    fn create_bool(&self, value: bool) -> Object {
        Object::Bool(value)
    }

    fn bool_value(&self, object: &Object) -> Option<bool> {
        match object {
            Object::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn create_descriptor(&self, fd: BorrowedFd<'_>) -> io::Result<Object> {
        Ok(Object::Fd(Arc::new(fd.try_clone_to_owned()?)))
    }

    fn dup_descriptor(&self, object: &Object) -> io::Result<OwnedFd> {
        match object {
            Object::Fd(fd) => fd.try_clone(),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{:?} object carries no descriptor", other.object_type()),
            )),
        }
    }

    fn create_uuid(&self, bytes: [u8; 16]) -> Object {
        Object::Uuid(bytes)
    }

    fn uuid_bytes(&self, object: &Object) -> Option<[u8; 16]> {
        match object {
            Object::Uuid(bytes) => Some(*bytes),
            _ => None,
        }
    }
}
