//! # tlcodec: schema-driven TL binary codec
//!
//! `tlcodec` encodes typed objects of a Telegram-compatible chat/user server
//! to the TL wire format and decodes them back, including polymorphic types
//! and RPC method payloads. It consists of three focused sub-crates wired
//! together here for convenience:
//!
//! | Sub-crate        | Role                                                    |
//! |------------------|---------------------------------------------------------|
//! | `tlcodec-parser` | Parse `.tl` schema files (with layer sections)          |
//! | `tlcodec-gen`    | Generate Rust source from the definitions (build-time)  |
//! | `tlcodec-types`  | Generated records plus the cursor/object/registry runtime |
//!
//! ## Quick start
//!
//! ```rust
//! use tlcodec::tl::{functions::chat, EncodeContext, Registry, TlObject};
//!
//! let call = chat::GetMutableChat { chat_id: 42 };
//! let bytes = call.encode(EncodeContext::strict(tlcodec::LAYER)).unwrap();
//!
//! // The receiving side does not know the type in advance.
//! let object = Registry::global().decode_bytes(&bytes).unwrap();
//! assert_eq!(object.predicate_name(), "chat.getMutableChat");
//! ```
//!
//! ## Updating the schema
//!
//! Edit the files in `tlcodec-types/tl/` and run `cargo build`. Everything
//! else regenerates automatically.

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Re-export of [`tlcodec_types`]: generated records and the codec runtime.
pub use tlcodec_types as tl;

/// Re-export of [`tlcodec_parser`] (requires `feature = "parser"`).
#[cfg(feature = "parser")]
pub use tlcodec_parser as parser;

/// Re-export of [`tlcodec_gen`] (requires `feature = "codegen"`).
#[cfg(feature = "codegen")]
pub use tlcodec_gen as codegen;

// ─── Convenience re-exports ───────────────────────────────────────────────────

pub use tlcodec_types::{
    Deserializable,
    EncodeContext,
    EncodeError,
    EncodeMode,
    Identifiable,
    Registry,
    RemoteCall,
    Serializable,
    TlObject,
    LAYER,
};
