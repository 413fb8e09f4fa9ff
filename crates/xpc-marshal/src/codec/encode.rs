use std::os::fd::AsFd;

use uuid::Uuid;

use super::Codec;
use crate::error::MarshalError;
use crate::file_handle::FileHandle;
use crate::platform::Platform;
use crate::timestamp::Timestamp;
use crate::value::{Map, Value};

impl<P: Platform> Codec<P> {
    /// Converts a native value into a foreign object owned by the caller.
    ///
    /// Only descriptor duplication can fail.
    pub fn encode(&self, value: &Value) -> Result<P::Object, MarshalError> {
        Ok(match value {
            Value::Array(items) => self.encode_array(items)?,
            Value::Map(entries) => self.encode_map(entries)?,
            Value::Text(s) => self.encode_text(s),
            Value::Timestamp(ts) => self.encode_timestamp(*ts),
            Value::Bytes(b) => self.encode_bytes(b),
            Value::UInt64(n) => self.encode_u64(*n),
            Value::Int64(n) => self.encode_i64(*n),
            Value::Float64(n) => self.encode_f64(*n),
            Value::Bool(b) => self.encode_bool(*b),
            Value::Handle(h) => self.encode_handle(h)?,
            Value::UniqueId(id) => self.encode_uuid(id),
        })
    }

    /// Element order is preserved exactly.
    pub fn encode_array(&self, items: &[Value]) -> Result<P::Object, MarshalError> {
        let mut elements = Vec::with_capacity(items.len());
        for item in items {
            elements.push(self.encode(item)?);
        }
        Ok(self.platform.create_array(elements))
    }

    /// Keys are set in the map's iteration order.
    pub fn encode_map(&self, entries: &Map) -> Result<P::Object, MarshalError> {
        let mut map = self.platform.create_map();
        for (key, value) in entries {
            let object = self.encode(value)?;
            self.platform.map_set(&mut map, key, object);
        }
        Ok(map)
    }

    /// Text is handed over as its UTF-8 bytes.
    pub fn encode_text(&self, s: &str) -> P::Object {
        self.platform.create_string(s)
    }

    /// Seconds become nanoseconds, truncated toward zero; see
    /// [`Timestamp::as_nanos`].
    pub fn encode_timestamp(&self, ts: Timestamp) -> P::Object {
        self.platform.create_timestamp(ts.as_nanos())
    }

    /// Copies `bytes`; an empty slice encodes an empty buffer.
    pub fn encode_bytes(&self, bytes: &[u8]) -> P::Object {
        self.platform.create_bytes(bytes)
    }

    pub fn encode_u64(&self, n: u64) -> P::Object {
        self.platform.create_u64(n)
    }

    pub fn encode_i64(&self, n: i64) -> P::Object {
        self.platform.create_i64(n)
    }

    pub fn encode_f64(&self, n: f64) -> P::Object {
        self.platform.create_f64(n)
    }

    pub fn encode_bool(&self, b: bool) -> P::Object {
        self.platform.create_bool(b)
    }

    /// The platform keeps its own duplicate; `handle` stays open and owned by
    /// the caller.
    pub fn encode_handle(&self, handle: &FileHandle) -> Result<P::Object, MarshalError> {
        Ok(self.platform.create_descriptor(handle.as_fd())?)
    }

    /// The sixteen bytes are copied verbatim.
    pub fn encode_uuid(&self, id: &Uuid) -> P::Object {
        self.platform.create_uuid(*id.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use crate::memory::{shared_codec, Object};
    use crate::{Timestamp, Value};

    #[test]
    fn timestamps_travel_as_nanoseconds() {
        let object = shared_codec().encode_timestamp(Timestamp::from_secs_f64(-10.5));
        assert!(matches!(object, Object::Date(-10_500_000_000)));
    }

    #[test]
    fn arrays_keep_element_order() {
        let value = Value::Array(vec![Value::Int64(1), "x".into(), Value::Bool(true)]);
        match shared_codec().encode(&value).unwrap() {
            Object::Array(items) => {
                assert!(matches!(items[0], Object::Int64(1)));
                assert!(matches!(&items[1], Object::String(s) if &s[..] == b"x"));
                assert!(matches!(items[2], Object::Bool(true)));
            }
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn map_keys_are_utf8_bytes() {
        let value = Value::Map([("ключ".to_owned(), Value::UInt64(9))].into_iter().collect());
        let object = shared_codec().encode(&value).unwrap();
        assert!(matches!(object.get("ключ"), Some(Object::UInt64(9))));
    }
}
