//! The collaborator that owns foreign tagged-union objects.
//!
//! Implementations wrap a concrete IPC runtime. The codec only ever touches
//! objects through these primitives and never assumes anything about their
//! layout.

use std::fmt::Debug;
use std::hash::Hash;
use std::io;
use std::os::fd::{BorrowedFd, OwnedFd};

/// Primitives a foreign runtime must expose.
///
/// Extractors return `None` when handed an object of a different type. Map
/// keys are surfaced as raw bytes because the foreign side does not guarantee
/// UTF-8.
pub trait Platform {
    /// Owned handle to a foreign object.
    type Object;
    /// Runtime type tag of a foreign object.
    type Tag: Copy + Eq + Hash + Debug + Send + Sync;

    fn type_of(&self, object: &Self::Object) -> Self::Tag;

    fn create_array(&self, elements: Vec<Self::Object>) -> Self::Object;
    fn create_map(&self) -> Self::Object;
    fn map_set(&self, map: &mut Self::Object, key: &str, value: Self::Object);

    /// Visits elements in ascending index order until `visit` returns `false`.
    fn array_for_each(
        &self,
        array: &Self::Object,
        visit: &mut dyn FnMut(usize, &Self::Object) -> bool,
    );
    /// Visits entries in unspecified order until `visit` returns `false`.
    fn map_for_each(&self, map: &Self::Object, visit: &mut dyn FnMut(&[u8], &Self::Object) -> bool);
    fn map_len(&self, map: &Self::Object) -> usize;

    fn create_string(&self, utf8: &str) -> Self::Object;
    fn string_bytes<'a>(&self, object: &'a Self::Object) -> Option<&'a [u8]>;

    fn create_timestamp(&self, nanos: i64) -> Self::Object;
    fn timestamp_value(&self, object: &Self::Object) -> Option<i64>;

    fn create_bytes(&self, bytes: &[u8]) -> Self::Object;
    /// `None` models a null data pointer, which is distinct from an empty buffer.
    fn bytes_ptr<'a>(&self, object: &'a Self::Object) -> Option<&'a [u8]>;
    fn bytes_len(&self, object: &Self::Object) -> usize;

    fn create_u64(&self, value: u64) -> Self::Object;
    fn u64_value(&self, object: &Self::Object) -> Option<u64>;
    fn create_i64(&self, value: i64) -> Self::Object;
    fn i64_value(&self, object: &Self::Object) -> Option<i64>;
    fn create_f64(&self, value: f64) -> Self::Object;
    fn f64_value(&self, object: &Self::Object) -> Option<f64>;
    fn create_bool(&self, value: bool) -> Self::Object;
    fn bool_value(&self, object: &Self::Object) -> Option<bool>;

    /// Wraps a descriptor. The platform keeps its own duplicate.
    fn create_descriptor(&self, fd: BorrowedFd<'_>) -> io::Result<Self::Object>;
    /// Returns a fresh duplicate that the caller owns and may close.
    fn dup_descriptor(&self, object: &Self::Object) -> io::Result<OwnedFd>;

    fn create_uuid(&self, bytes: [u8; 16]) -> Self::Object;
    fn uuid_bytes(&self, object: &Self::Object) -> Option<[u8; 16]>;
}
