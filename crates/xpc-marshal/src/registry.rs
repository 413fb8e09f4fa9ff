use std::collections::HashMap;
use std::fmt::Debug;
use std::fs::File;
use std::hash::Hash;
use std::os::fd::AsFd;

use uuid::Uuid;

use crate::error::MarshalError;
use crate::platform::Platform;
use crate::value::Kind;

/// Maps foreign type tags onto the eleven supported kinds.
///
/// Built once from representative objects created through the platform, then
/// read-only. The mapping is a bijection: [`TypeRegistry::build`] rejects a
/// platform that reports the same tag for two kinds.
#[derive(Debug, Clone)]
pub struct TypeRegistry<T> {
    kinds: HashMap<T, Kind>,
    tags: HashMap<Kind, T>,
}

impl<T> TypeRegistry<T>
where
    T: Copy + Eq + Hash + Debug,
{
    /// Builds the table by creating one representative object per kind and
    /// recording the tag the platform reports for it.
    ///
    /// Fails if `/dev/null` cannot be opened or duplicated for the handle
    /// representative, or if the platform reports one tag for two kinds.
    pub fn build<P>(platform: &P) -> Result<Self, MarshalError>
    where
        P: Platform<Tag = T>,
    {
        let null_device = File::open("/dev/null")?;
        let mut registry = Self {
            kinds: HashMap::with_capacity(Kind::ALL.len()),
            tags: HashMap::with_capacity(Kind::ALL.len()),
        };
        for kind in Kind::ALL {
            let representative = match kind {
                Kind::Array => platform.create_array(Vec::new()),
                Kind::Map => platform.create_map(),
                Kind::Text => platform.create_string(""),
                Kind::Timestamp => platform.create_timestamp(0),
                Kind::Bytes => platform.create_bytes(&[]),
                Kind::UInt64 => platform.create_u64(0),
                Kind::Int64 => platform.create_i64(0),
                Kind::Float64 => platform.create_f64(0.0),
                Kind::Bool => platform.create_bool(true),
                Kind::Handle => platform.create_descriptor(null_device.as_fd())?,
                Kind::UniqueId => platform.create_uuid(*Uuid::nil().as_bytes()),
            };
            let tag = platform.type_of(&representative);
            registry.insert(tag, kind)?;
        }
        log::trace!("type registry built with {} tags", registry.len());
        Ok(registry)
    }

    fn insert(&mut self, tag: T, kind: Kind) -> Result<(), MarshalError> {
        if let Some(previous) = self.kinds.insert(tag, kind) {
            return Err(MarshalError::ContractViolation {
                tag: format!("{tag:?} (shared by {previous} and {kind})"),
            });
        }
        self.tags.insert(kind, tag);
        Ok(())
    }

    /// Kind registered for `tag`.
    ///
    /// # Panics
    ///
    /// Panics if `tag` is not registered. A conforming platform never produces
    /// such a tag, so this is a contract violation rather than a runtime
    /// condition.
    pub fn classify(&self, tag: T) -> Kind {
        match self.kinds.get(&tag) {
            Some(kind) => *kind,
            None => panic!("unregistered foreign type tag {tag:?}"),
        }
    }

    pub fn try_classify(&self, tag: T) -> Result<Kind, MarshalError> {
        self.kinds
            .get(&tag)
            .copied()
            .ok_or_else(|| MarshalError::ContractViolation {
                tag: format!("{tag:?}"),
            })
    }

    pub fn tag_of(&self, kind: Kind) -> T {
        // Every kind is inserted by `build`.
        self.tags[&kind]
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (T, Kind)> + '_ {
        self.kinds.iter().map(|(tag, kind)| (*tag, *kind))
    }
}
