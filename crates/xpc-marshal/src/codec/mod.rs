//! Encode/decode engine.
//!
//! [`Codec::encode`] is total over [`Value`](crate::Value) apart from OS
//! descriptor duplication. [`Codec::decode`] is partial: a subtree that cannot
//! be extracted is a *miss* (`None`), and a miss inside a container drops only
//! that element or entry. An object whose type tag is not registered aborts the
//! whole call with [`MarshalError::ContractViolation`].

mod decode;
mod encode;
mod options;

use std::sync::OnceLock;

pub use options::DecodeOptions;

use crate::error::MarshalError;
use crate::platform::Platform;
use crate::registry::TypeRegistry;
use crate::value::Kind;

pub struct Codec<P: Platform> {
    platform: P,
    options: DecodeOptions,
    registry: OnceLock<TypeRegistry<P::Tag>>,
}

impl<P: Platform> Codec<P> {
    pub fn new(platform: P) -> Self {
        Self::with_options(platform, DecodeOptions::default())
    }

    pub fn with_options(platform: P, options: DecodeOptions) -> Self {
        Self {
            platform,
            options,
            registry: OnceLock::new(),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// The type registry, built from the platform on first use.
    ///
    /// Only a successful build is published, so a transient failure (for
    /// example an exhausted descriptor table) is retried on the next call.
    /// Racing first callers may each build a table, but exactly one is
    /// published and nobody observes a partially built table.
    pub fn registry(&self) -> Result<&TypeRegistry<P::Tag>, MarshalError> {
        if let Some(registry) = self.registry.get() {
            return Ok(registry);
        }
        match TypeRegistry::build(&self.platform) {
            Ok(built) => Ok(self.registry.get_or_init(|| built)),
            Err(err) => {
                log::debug!("type registry build failed: {err}");
                Err(MarshalError::RegistryInit(err.to_string()))
            }
        }
    }

    /// Kind of a foreign object.
    ///
    /// # Panics
    ///
    /// Panics on an unregistered type tag or an unusable registry; use
    /// [`Codec::try_classify`] to observe these as errors.
    pub fn classify(&self, object: &P::Object) -> Kind {
        match self.try_classify(object) {
            Ok(kind) => kind,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_classify(&self, object: &P::Object) -> Result<Kind, MarshalError> {
        self.registry()?.try_classify(self.platform.type_of(object))
    }
}
