//! Constructor registry: tag → factory for every known boxed type.
//!
//! [`Registry::global`] is built once, on first use, from the entry tables
//! generated for each schema namespace and is read-only afterwards. Hand-made
//! registries (tests, embedders with extra types) go through
//! [`RegistryBuilder`].

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use crate::deserialize::{Buffer, Cursor, Deserializable, Error};
use crate::object::TlObject;

/// Produces an empty instance ready for [`TlObject::decode_body`].
pub type Factory = fn() -> Box<dyn TlObject>;

/// One registered constructor.
#[derive(Clone, Copy, Debug)]
pub struct Entry {
    /// Constructor tag.
    pub id: u32,
    /// Fully qualified predicate name, e.g. `"chat.getMutableChat"`.
    pub name: &'static str,
    /// Empty-instance factory.
    pub factory: Factory,
}

/// Default-constructs `T` identified as tag `ID`, behind a trait object.
/// Generated tables use `make::<T, ID>` as the factory for each tag.
pub fn make<T: TlObject + Default, const ID: u32>() -> Box<dyn TlObject> {
    let mut value = T::default();
    let known = value.identify(ID);
    debug_assert!(known, "{:#010x} is not a tag of {}", ID, std::any::type_name::<T>());
    Box::new(value)
}

/// Failure to assemble a registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// Two entries claim the same tag.
    DuplicateConstructor {
        /// The contested tag.
        id: u32,
        /// Name already registered.
        existing: &'static str,
        /// Name that tried to register.
        new: &'static str,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateConstructor { id, existing, new } => write!(
                f,
                "constructor {id:#010x} registered by both {existing} and {new}"
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Collects entries and rejects duplicate tags.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: HashMap<u32, Entry>,
}

impl RegistryBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one entry.
    pub fn register(&mut self, entry: Entry) -> Result<&mut Self, RegistryError> {
        if let Some(existing) = self.entries.get(&entry.id) {
            return Err(RegistryError::DuplicateConstructor {
                id: entry.id,
                existing: existing.name,
                new: entry.name,
            });
        }
        self.entries.insert(entry.id, entry);
        Ok(self)
    }

    /// Add a whole table.
    pub fn extend(&mut self, table: &[Entry]) -> Result<&mut Self, RegistryError> {
        for entry in table {
            self.register(*entry)?;
        }
        Ok(self)
    }

    /// Freeze into a [`Registry`].
    pub fn build(self) -> Registry {
        Registry { entries: self.entries }
    }
}

/// Immutable tag → factory map.
pub struct Registry {
    entries: HashMap<u32, Entry>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("len", &self.entries.len()).finish()
    }
}

impl Registry {
    /// The process-wide registry holding every generated constructor.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let mut builder = RegistryBuilder::new();
            for (namespace, table) in crate::generated::REGISTRY_TABLES {
                if let Err(e) = builder.extend(table) {
                    // Generation rejects duplicates, so this means a
                    // hand-edited table. Keep the first registration.
                    log::warn!("[tlcodec] namespace {namespace:?}: {e}");
                }
            }
            let registry = builder.build();
            log::debug!("[tlcodec] registry built with {} constructors", registry.len());
            registry
        })
    }

    /// Start a hand-made registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// The factory for `id`.
    pub fn resolve(&self, id: u32) -> Option<Factory> {
        self.entries.get(&id).map(|e| e.factory)
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: u32) -> bool {
        self.entries.contains_key(&id)
    }

    /// The predicate name registered for `id`.
    pub fn name_for_id(&self, id: u32) -> Option<&'static str> {
        self.entries.get(&id).map(|e| e.name)
    }

    /// Number of registered constructors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Every registered entry, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.entries.values()
    }

    /// `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read a tag, build the matching empty object and decode into it.
    ///
    /// Cursor faults are left in `buf`; check it once done.
    pub fn decode_any(&self, buf: Buffer) -> Result<Box<dyn TlObject>, Error> {
        let id = u32::deserialize(buf);
        buf.check()?;
        let entry = self.entries.get(&id).ok_or(Error::UnknownConstructor { id })?;
        log::trace!("[tlcodec] decode_any {id:#010x} → {}", entry.name);
        let mut object = (entry.factory)();
        object.decode_body(id, buf)?;
        Ok(object)
    }

    /// [`decode_any`](Self::decode_any) over a whole byte slice, surfacing
    /// any fault.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<Box<dyn TlObject>, Error> {
        let mut cursor = Cursor::from_slice(bytes);
        let object = self.decode_any(&mut cursor)?;
        cursor.check()?;
        Ok(object)
    }
}
