use std::io;

use thiserror::Error;

use crate::value::Kind;

/// Errors surfaced by the marshalling layer.
///
/// Decode misses (invalid UTF-8, null byte buffers) are not errors: they are
/// reported as `None` from [`Codec::decode`](crate::Codec::decode).
#[derive(Debug, Error)]
pub enum MarshalError {
    /// The platform produced an object whose type tag is not registered.
    #[error("contract violation: unregistered foreign type tag {tag}")]
    ContractViolation { tag: String },
    /// The type registry could not be built from the platform.
    #[error("type registry unavailable: {0}")]
    RegistryInit(String),
    /// Duplicating an OS descriptor failed.
    #[error("descriptor duplication failed: {0}")]
    Descriptor(#[from] io::Error),
    /// The input has no native representation.
    #[error("value has no native representation: {0}")]
    Unrepresentable(&'static str),
    #[error("expected {expected} value, found {found}")]
    KindMismatch { expected: Kind, found: Kind },
}

impl MarshalError {
    /// Returns `true` for errors that indicate a platform bug rather than a
    /// runtime condition.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, MarshalError::ContractViolation { .. })
    }
}
