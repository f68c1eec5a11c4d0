//! The object model shared by every generated record.
//!
//! A *storage record* (one per boxed TL type, in [`crate::boxed`]) holds the
//! union of the fields of all its variants plus an [`Identity`] naming the
//! variant it currently represents. A *view* (in [`crate::types`]) borrows a
//! storage record mutably and exposes one variant's fields. *Method records*
//! (in [`crate::functions`]) are standalone. All three encode through
//! [`TlObject`].

use std::any::Any;
use std::fmt;

use crate::deserialize::{Buffer, Cursor, Deserializable, Error};

// ─── Predicates and identity ─────────────────────────────────────────────────

/// One variant of a boxed type with its tag per schema layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Predicate {
    /// The predicate name, e.g. `"chatInvitePeek"`.
    pub name: &'static str,
    /// `(layer, tag)` pairs in ascending layer order.
    pub layers: &'static [(i32, u32)],
}

impl Predicate {
    /// The tag to write for `layer`: the entry with the greatest layer not
    /// above it.
    pub fn tag_for_layer(&self, layer: i32) -> Option<u32> {
        self.layers
            .iter()
            .rev()
            .find(|(since, _)| *since <= layer)
            .map(|&(_, tag)| tag)
    }

    /// The tag of the newest layer.
    pub fn newest_tag(&self) -> u32 {
        self.layers.last().map_or(0, |&(_, tag)| tag)
    }

    /// Whether `tag` is one of this predicate's tags.
    pub fn knows(&self, tag: u32) -> bool {
        self.layers.iter().any(|&(_, t)| t == tag)
    }
}

/// Which variant a storage record currently represents.
///
/// The constructor tag and the predicate name are only ever set together,
/// from the owning type's predicate table, so they cannot disagree. Two
/// identities are equal when they name the same predicate, whichever of its
/// per-layer tags they carry.
#[derive(Clone, Copy, Debug, Default, Eq)]
pub struct Identity {
    constructor: u32,
    predicate: Option<&'static str>,
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.predicate == other.predicate
    }
}

impl Identity {
    /// Neither tag nor predicate set.
    pub const UNRESOLVED: Self = Self { constructor: 0, predicate: None };

    /// The default identity for a type: resolved when the type has a single
    /// predicate, unresolved otherwise.
    pub fn default_for(table: &'static [Predicate]) -> Self {
        match table {
            [only] => Self { constructor: only.newest_tag(), predicate: Some(only.name) },
            _ => Self::UNRESOLVED,
        }
    }

    /// Resolve a decoded tag against `table`.
    pub fn from_constructor(table: &'static [Predicate], tag: u32) -> Option<Self> {
        table
            .iter()
            .find(|p| p.knows(tag))
            .map(|p| Self { constructor: tag, predicate: Some(p.name) })
    }

    /// Resolve a predicate name against `table`, picking its newest tag.
    pub fn from_predicate(table: &'static [Predicate], name: &str) -> Option<Self> {
        table
            .iter()
            .find(|p| p.name == name)
            .map(|p| Self { constructor: p.newest_tag(), predicate: Some(p.name) })
    }

    /// The constructor tag, 0 when unresolved.
    pub fn constructor(&self) -> u32 { self.constructor }

    /// The predicate name, if resolved.
    pub fn predicate(&self) -> Option<&'static str> { self.predicate }

    /// `true` once a predicate is set.
    pub fn is_resolved(&self) -> bool { self.predicate.is_some() }

    /// Pick the tag to encode this identity at `layer`.
    pub fn tag_for_layer(
        &self,
        table: &'static [Predicate],
        type_name: &'static str,
        layer: i32,
    ) -> Result<u32, EncodeError> {
        let name = self.predicate.ok_or(EncodeError::UnresolvedIdentity { type_name })?;
        let predicate = table
            .iter()
            .find(|p| p.name == name)
            .ok_or(EncodeError::UnresolvedIdentity { type_name })?;
        predicate
            .tag_for_layer(layer)
            .ok_or(EncodeError::UnsupportedLayer { predicate: predicate.name, layer })
    }
}

// ─── Encoding context ────────────────────────────────────────────────────────

/// How encode failures are reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodeMode {
    /// Failures come back as [`EncodeError`].
    Strict,
    /// A failing object contributes zero bytes and encoding carries on.
    /// Matches peers that expect the old empty-output behaviour.
    Legacy,
}

impl Default for EncodeMode {
    fn default() -> Self {
        if cfg!(feature = "legacy-encode") { Self::Legacy } else { Self::Strict }
    }
}

/// Parameters passed down through every nested encode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeContext {
    /// The schema layer the peer speaks.
    pub layer: i32,
    /// Failure reporting.
    pub mode: EncodeMode,
}

impl EncodeContext {
    /// `layer` with the crate's default [`EncodeMode`].
    pub fn new(layer: i32) -> Self {
        Self { layer, mode: EncodeMode::default() }
    }

    /// `layer` in [`EncodeMode::Strict`].
    pub fn strict(layer: i32) -> Self {
        Self { layer, mode: EncodeMode::Strict }
    }

    /// `layer` in [`EncodeMode::Legacy`].
    pub fn legacy(layer: i32) -> Self {
        Self { layer, mode: EncodeMode::Legacy }
    }
}

impl Default for EncodeContext {
    fn default() -> Self {
        Self::new(crate::LAYER)
    }
}

/// Why an object could not be encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// The predicate has no tag at or below the requested layer.
    UnsupportedLayer {
        /// The predicate being encoded.
        predicate: &'static str,
        /// The layer asked for.
        layer: i32,
    },
    /// A storage record with no predicate set.
    UnresolvedIdentity {
        /// The boxed type of the record.
        type_name: &'static str,
    },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedLayer { predicate, layer } => {
                write!(f, "{predicate} has no constructor for layer {layer}")
            }
            Self::UnresolvedIdentity { type_name } => {
                write!(f, "{type_name} has no predicate set")
            }
        }
    }
}

impl std::error::Error for EncodeError {}

// ─── TlObject ────────────────────────────────────────────────────────────────

/// A boxed TL value: something that writes its own constructor tag.
pub trait TlObject: Any + fmt::Debug {
    /// The tag this value carries right now, 0 when unresolved.
    fn constructor_id(&self) -> u32;

    /// The predicate this value represents, `""` when unresolved.
    fn predicate_name(&self) -> &'static str;

    /// Take on the variant `tag` names. Returns `false`, changing nothing,
    /// for a tag this type does not know.
    fn identify(&mut self, tag: u32) -> bool;

    /// Write tag and body, failing on the first unresolvable object.
    fn encode_to(&self, ctx: EncodeContext, buf: &mut Vec<u8>) -> Result<(), EncodeError>;

    /// Read the body for an already-consumed `tag`.
    ///
    /// Unknown tags are rejected before `self` is touched. Cursor faults are
    /// left in `buf` for the caller to check once.
    fn decode_body(&mut self, tag: u32, buf: Buffer) -> Result<(), Error>;

    /// Upcast for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Upcast for downcasting.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// [`encode_to`](Self::encode_to), honouring `ctx.mode`: in legacy mode a
    /// failure is logged and rolled back to zero bytes.
    fn encode_into(&self, ctx: EncodeContext, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
        let start = buf.len();
        match self.encode_to(ctx, buf) {
            Ok(()) => Ok(()),
            Err(e) => {
                buf.truncate(start);
                match ctx.mode {
                    EncodeMode::Strict => Err(e),
                    EncodeMode::Legacy => {
                        log::warn!("[tlcodec] legacy encode wrote nothing: {e}");
                        Ok(())
                    }
                }
            }
        }
    }

    /// Encode into a fresh buffer.
    fn encode(&self, ctx: EncodeContext) -> Result<Vec<u8>, EncodeError> {
        let mut buf = Vec::new();
        self.encode_into(ctx, &mut buf)?;
        Ok(buf)
    }

    /// Read a tag and then the body. A fault while reading the tag is left
    /// in the cursor.
    fn read_from(&mut self, buf: Buffer) -> Result<(), Error> {
        let tag = u32::deserialize(buf);
        if buf.is_faulted() {
            return Ok(());
        }
        self.decode_body(tag, buf)
    }

    /// Decode `bytes` into `self` and surface any cursor fault.
    ///
    /// On `Err(BufferFault)` some fields may already hold partial data; the
    /// value must be discarded.
    fn decode(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let mut cursor = Cursor::from_slice(bytes);
        self.read_from(&mut cursor)?;
        cursor.check()
    }
}

impl dyn TlObject {
    /// Borrow as `T` if that is the concrete type.
    pub fn downcast_ref<T: TlObject>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Mutably borrow as `T` if that is the concrete type.
    pub fn downcast_mut<T: TlObject>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    /// Take ownership as `T` if that is the concrete type.
    pub fn downcast<T: TlObject>(self: Box<Self>) -> Option<Box<T>> {
        self.into_any().downcast().ok()
    }
}

/// Decode a fresh `T` (tag included). Used for nested fields.
pub fn read_object<T: TlObject + Default>(buf: Buffer) -> Result<T, Error> {
    let mut value = T::default();
    value.read_from(buf)?;
    Ok(value)
}

/// Build a value from `bytes`, tag included.
pub fn from_bytes<T: TlObject + Default>(bytes: &[u8]) -> Result<T, Error> {
    let mut value = T::default();
    value.decode(bytes)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &[Predicate] = &[
        Predicate { name: "photoEmpty", layers: &[(0, 0x2331b22d)] },
        Predicate { name: "photo", layers: &[(0, 0xd07504a5), (116, 0xfb197a65)] },
    ];

    #[test]
    fn picks_greatest_layer_not_above() {
        let photo = &TABLE[1];
        assert_eq!(photo.tag_for_layer(0), Some(0xd07504a5));
        assert_eq!(photo.tag_for_layer(115), Some(0xd07504a5));
        assert_eq!(photo.tag_for_layer(116), Some(0xfb197a65));
        assert_eq!(photo.tag_for_layer(200), Some(0xfb197a65));
        assert_eq!(photo.tag_for_layer(-1), None);
    }

    #[test]
    fn identity_halves_agree() {
        let by_tag = Identity::from_constructor(TABLE, 0xd07504a5).unwrap();
        let by_name = Identity::from_predicate(TABLE, "photo").unwrap();
        assert_eq!(by_tag.predicate(), Some("photo"));
        assert_eq!(by_name.constructor(), 0xfb197a65);
        assert_eq!(by_tag, by_name);
        assert!(Identity::from_constructor(TABLE, 0xdeadbeef).is_none());
        assert!(!Identity::default_for(TABLE).is_resolved());
    }

    #[test]
    fn unresolved_identity_cannot_pick_a_tag() {
        assert_eq!(
            Identity::UNRESOLVED.tag_for_layer(TABLE, "Photo", 0),
            Err(EncodeError::UnresolvedIdentity { type_name: "Photo" })
        );
    }
}
