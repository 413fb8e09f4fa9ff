//! Round-trip marshalling between native values and XPC-style tagged-union objects.
//!
//! The crate converts a closed native [`Value`] model into opaque objects owned by a
//! [`Platform`] collaborator and back again. Decoding dispatches through a
//! [`TypeRegistry`] that maps the collaborator's runtime type tags onto the eleven
//! supported [`Kind`]s.
//!
//! ```
//! use xpc_marshal::{memory::shared_codec, Value};
//!
//! let codec = shared_codec();
//! let value = Value::Array(vec![Value::Int64(1), "x".into(), true.into()]);
//! let object = codec.encode(&value).unwrap();
//! let back = codec.decode(&object).unwrap().unwrap();
//! assert!(back.equivalent(&value));
//! ```

mod error;
mod equivalence;
mod file_handle;
mod json;
mod registry;
mod timestamp;
mod value;

pub mod codec;
pub mod memory;
pub mod platform;

pub use codec::{Codec, DecodeOptions};
pub use equivalence::equivalent;
pub use error::MarshalError;
pub use file_handle::{FileHandle, FileIdentity};
pub use platform::Platform;
pub use registry::TypeRegistry;
pub use timestamp::{Timestamp, EQUIVALENCE_EPSILON_SECS, NANOS_PER_SEC};
pub use value::{Array, Kind, Map, Value};

pub use uuid::Uuid;
