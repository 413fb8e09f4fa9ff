use uuid::Uuid;

use super::Codec;
use crate::error::MarshalError;
use crate::file_handle::FileHandle;
use crate::platform::Platform;
use crate::timestamp::Timestamp;
use crate::value::{Array, Kind, Map, Value};

impl<P: Platform> Codec<P> {
    /// Converts a foreign object back into a native value.
    ///
    /// Returns `Ok(None)` when the object cannot be extracted (a decode miss)
    /// and `Err` when any object in the tree carries an unregistered type tag.
    pub fn decode(&self, object: &P::Object) -> Result<Option<Value>, MarshalError> {
        self.decode_nested(object, 0)
    }

    /// Decodes and converts to a concrete native type.
    ///
    /// A miss is `Ok(None)`; a value of another kind is
    /// [`MarshalError::KindMismatch`].
    pub fn decode_as<T>(&self, object: &P::Object) -> Result<Option<T>, MarshalError>
    where
        T: TryFrom<Value, Error = MarshalError>,
    {
        self.decode(object)?.map(T::try_from).transpose()
    }

    fn decode_nested(
        &self,
        object: &P::Object,
        enclosing: usize,
    ) -> Result<Option<Value>, MarshalError> {
        let kind = match self.try_classify(object) {
            Ok(kind) => kind,
            Err(err) => {
                log::error!("aborting decode: {err}");
                return Err(err);
            }
        };
        Ok(match kind {
            Kind::Array => self.decode_array_nested(object, enclosing)?.map(Value::Array),
            Kind::Map => self.decode_map_nested(object, enclosing)?.map(Value::Map),
            Kind::Text => self.decode_text(object).map(Value::Text),
            Kind::Timestamp => self.decode_timestamp(object).map(Value::Timestamp),
            Kind::Bytes => self.decode_bytes(object).map(Value::Bytes),
            Kind::UInt64 => self.decode_u64(object).map(Value::UInt64),
            Kind::Int64 => self.decode_i64(object).map(Value::Int64),
            Kind::Float64 => self.decode_f64(object).map(Value::Float64),
            Kind::Bool => self.decode_bool(object).map(Value::Bool),
            Kind::Handle => self.decode_handle(object).map(Value::Handle),
            Kind::UniqueId => self.decode_uuid(object).map(Value::UniqueId),
        })
    }

    /// Elements that miss are omitted, so later indices shift down.
    pub fn decode_array(&self, object: &P::Object) -> Result<Option<Array>, MarshalError> {
        self.decode_array_nested(object, 0)
    }

    fn decode_array_nested(
        &self,
        object: &P::Object,
        enclosing: usize,
    ) -> Result<Option<Array>, MarshalError> {
        if !self.options.allows_container_at(enclosing) {
            log::debug!("array nested {enclosing} deep exceeds max_depth");
            return Ok(None);
        }
        let mut items = Array::new();
        let mut failure = None;
        self.platform.array_for_each(object, &mut |index, element| {
            match self.decode_nested(element, enclosing + 1) {
                Ok(Some(value)) => items.push(value),
                Ok(None) => log::debug!("omitting array element {index}"),
                Err(err) => {
                    failure = Some(err);
                    return false;
                }
            }
            true
        });
        match failure {
            Some(err) => Err(err),
            None => Ok(Some(items)),
        }
    }

    /// Entries whose key is not UTF-8 or whose value misses are dropped,
    /// unless [`DecodeOptions::strict_keys`](super::DecodeOptions) is set.
    ///
    /// Every entry is visited before a strict-key miss is reported, so a
    /// contract violation anywhere under a UTF-8 key is an `Err` regardless of
    /// iteration order.
    pub fn decode_map(&self, object: &P::Object) -> Result<Option<Map>, MarshalError> {
        self.decode_map_nested(object, 0)
    }

    fn decode_map_nested(
        &self,
        object: &P::Object,
        enclosing: usize,
    ) -> Result<Option<Map>, MarshalError> {
        if !self.options.allows_container_at(enclosing) {
            log::debug!("map nested {enclosing} deep exceeds max_depth");
            return Ok(None);
        }
        let strict_keys = self.options.strict_keys;
        let mut entries = Map::with_capacity(self.platform.map_len(object));
        let mut rejected_key = false;
        let mut failure = None;
        self.platform.map_for_each(object, &mut |key, value| {
            let Ok(key) = std::str::from_utf8(key) else {
                log::debug!("dropping map entry with non-UTF-8 key {key:?}");
                rejected_key = true;
                return true;
            };
            match self.decode_nested(value, enclosing + 1) {
                Ok(Some(value)) => {
                    entries.insert(key.to_owned(), value);
                }
                Ok(None) => log::debug!("dropping map entry {key:?}"),
                Err(err) => {
                    failure = Some(err);
                    return false;
                }
            }
            true
        });
        if let Some(err) = failure {
            return Err(err);
        }
        if strict_keys && rejected_key {
            return Ok(None);
        }
        Ok(Some(entries))
    }

    /// Misses when the bytes are not valid UTF-8.
    pub fn decode_text(&self, object: &P::Object) -> Option<String> {
        let bytes = self.platform.string_bytes(object)?;
        match std::str::from_utf8(bytes) {
            Ok(s) => Some(s.to_owned()),
            Err(err) => {
                log::debug!("string is not UTF-8: {err}");
                None
            }
        }
    }

    /// Nanoseconds are divided by 10⁹ as a float.
    pub fn decode_timestamp(&self, object: &P::Object) -> Option<Timestamp> {
        self.platform.timestamp_value(object).map(Timestamp::from_nanos)
    }

    /// A null data pointer is a miss, even for a zero-length buffer.
    pub fn decode_bytes(&self, object: &P::Object) -> Option<Vec<u8>> {
        let Some(data) = self.platform.bytes_ptr(object) else {
            log::debug!("byte buffer has a null data pointer");
            return None;
        };
        let len = self.platform.bytes_len(object);
        data.get(..len).map(<[u8]>::to_vec)
    }

    pub fn decode_u64(&self, object: &P::Object) -> Option<u64> {
        self.platform.u64_value(object)
    }

    pub fn decode_i64(&self, object: &P::Object) -> Option<i64> {
        self.platform.i64_value(object)
    }

    pub fn decode_f64(&self, object: &P::Object) -> Option<f64> {
        self.platform.f64_value(object)
    }

    pub fn decode_bool(&self, object: &P::Object) -> Option<bool> {
        self.platform.bool_value(object)
    }

    /// Returns a fresh duplicate, closable independently of the foreign object.
    pub fn decode_handle(&self, object: &P::Object) -> Option<FileHandle> {
        match self.platform.dup_descriptor(object) {
            Ok(fd) => Some(FileHandle::new(fd)),
            Err(err) => {
                log::debug!("descriptor duplication failed: {err}");
                None
            }
        }
    }

    /// Byte for byte.
    pub fn decode_uuid(&self, object: &P::Object) -> Option<Uuid> {
        self.platform.uuid_bytes(object).map(Uuid::from_bytes)
    }
}
