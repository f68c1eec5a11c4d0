//! Code produced by `build.rs` from the schema files in `tl/`.

#![allow(clippy::all, missing_docs, unused_imports, unused_mut, unused_variables)]

include!(concat!(env!("OUT_DIR"), "/generated_common.rs"));
include!(concat!(env!("OUT_DIR"), "/generated_boxed.rs"));
include!(concat!(env!("OUT_DIR"), "/generated_types.rs"));
include!(concat!(env!("OUT_DIR"), "/generated_functions.rs"));
