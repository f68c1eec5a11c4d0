//! Build-time code generator that transforms a parsed TL schema into Rust source files.
//!
//! Intended to be used from a `build.rs` script. The generated code targets
//! the runtime in `tlcodec-types`: one shared-storage record per boxed type,
//! one borrowed view per predicate, one record per RPC method and the
//! constructor tables the registry is built from.
//!
//! # Usage
//!
//! ```no_run
//! // build.rs
//! use tlcodec_gen::{Config, Outputs, generate};
//! use tlcodec_parser::parse_tl_file;
//! use std::fs;
//!
//! fn main() {
//!     let schema = fs::read_to_string("tl/chat.tl").unwrap();
//!     let defs: Vec<_> = parse_tl_file(&schema)
//!         .filter_map(|r| r.ok())
//!         .collect();
//!
//!     let out = std::env::var("OUT_DIR").unwrap();
//!     let mut outputs = Outputs::from_dir(&out).unwrap();
//!     generate(&defs, &Config::default(), &mut outputs).unwrap();
//!     outputs.flush().unwrap();
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod grouper;
mod metadata;
mod namegen;
pub mod codegen;

pub use codegen::{generate, Config, Outputs};
