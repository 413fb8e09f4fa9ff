use serde::{Deserialize, Serialize};

/// Decode-side configuration.
///
/// The defaults reproduce the lossy policy of the wire format: unbounded
/// nesting, and map entries with non-UTF-8 keys are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Maximum container nesting; a deeper container decodes as a miss.
    pub max_depth: Option<usize>,
    /// Treat a non-UTF-8 map key as a miss for the whole map.
    pub strict_keys: bool,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_strict_keys(mut self, strict_keys: bool) -> Self {
        self.strict_keys = strict_keys;
        self
    }

    /// Whether a container with `enclosing` containers above it may be decoded.
    pub(crate) fn allows_container_at(&self, enclosing: usize) -> bool {
        self.max_depth.map_or(true, |max| enclosing < max)
    }
}
