//! Schema-driven TL object codec.
//!
//! This crate is **generated** from the schema files in `tl/` and carries
//! the runtime the generated code is written against.
//!
//! # Overview
//!
//! | Module          | Contents                                                        |
//! |-----------------|-----------------------------------------------------------------|
//! | [`boxed`]       | One shared-storage record per boxed type (union of all variants)|
//! | [`types`]       | One borrowed view per predicate over its storage record          |
//! | [`functions`]   | RPC method records implementing [`RemoteCall`]                   |
//! | [`deserialize`] | Sticky-fault [`Cursor`] and [`Deserializable`] for primitives    |
//! | [`serialize`]   | [`Serializable`] for primitives                                  |
//! | [`object`]      | [`TlObject`], [`Identity`], [`EncodeContext`]                    |
//! | [`vector`]      | [`TlVector`] and helpers for vectors of objects                  |
//! | [`registry`]    | [`Registry`]: decode a value whose type is known only by its tag |
//!
//! # Encoding and decoding
//!
//! ```rust
//! use tlcodec_types::{boxed, EncodeContext, TlObject};
//!
//! let mut invite = boxed::ChatInviteExt::default();
//! {
//!     let mut peek = invite.to_chat_invite_peek();
//!     peek.set_expires(1_700_000_000);
//! }
//! let bytes = invite.encode(EncodeContext::strict(tlcodec_types::LAYER)).unwrap();
//!
//! let mut decoded = boxed::ChatInviteExt::default();
//! decoded.decode(&bytes).unwrap();
//! assert_eq!(decoded.identity().predicate(), Some("chatInvitePeek"));
//! ```
//!
//! # Adding a schema layer
//!
//! Append a `---layer N---` section with the changed definitions to the
//! relevant file in `tl/` and bump its `// LAYER N` header. The build script
//! regenerates everything.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod deserialize;
pub mod object;
pub mod registry;
pub mod serialize;
pub mod vector;
mod generated;

pub use deserialize::{Cursor, Deserializable};
pub use generated::{LAYER, boxed, functions, types};
#[cfg(feature = "name-for-id")]
pub use generated::name_for_id;
pub use object::{EncodeContext, EncodeError, EncodeMode, Identity, Predicate, TlObject};
pub use registry::{Registry, RegistryError};
pub use serialize::Serializable;
pub use vector::TlVector;

// ─── Core traits ──────────────────────────────────────────────────────────────

/// Every method record has a fixed 32-bit constructor ID.
pub trait Identifiable {
    /// The constructor ID of the newest layer.
    const CONSTRUCTOR_ID: u32;
}

/// Marks a method record that can be sent as an RPC call.
///
/// `Return` is the type the callee responds with.
pub trait RemoteCall: TlObject {
    /// The decoded response type.
    type Return;
}
