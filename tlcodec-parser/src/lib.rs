//! Parser for [Type Language] (TL) schema files.
//!
//! Turns `.tl` text into [`Definition`]s for the code generator in
//! `tlcodec-gen`. Besides the usual `---types---` / `---functions---`
//! separators the parser understands `---layer N---` markers: every
//! definition after such a marker is tagged with [`Definition::layer`] `N`,
//! which lets one predicate carry a different constructor tag and field list
//! per schema layer.
//!
//! ```rust
//! use tlcodec_parser::parse_tl_file;
//!
//! let src = "
//! photoEmpty#2331b22d id:long = Photo;
//! ---layer 119---
//! photoEmpty#2331b22d id:long = Photo;
//! ";
//! let defs: Vec<_> = parse_tl_file(src).collect::<Result<_, _>>().unwrap();
//! assert_eq!(defs[0].layer, 0);
//! assert_eq!(defs[1].layer, 119);
//! ```
//!
//! [Type Language]: https://core.telegram.org/mtproto/TL

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Parse error types.
pub mod errors;
pub mod tl;
mod iterator;
mod utils;

use errors::ParseError;
use tl::Definition;

/// Parses a complete schema file, yielding [`Definition`]s one by one.
///
/// `//` lines are comments. Section markers (`---types---`,
/// `---functions---`, `---layer N---`) apply to every following definition.
/// Bad lines come back as `Err` so the caller decides whether to skip them.
pub fn parse_tl_file(contents: &str) -> impl Iterator<Item = Result<Definition, ParseError>> + '_ {
    iterator::TlIterator::new(contents)
}

/// Reads the `// LAYER N` header a schema file may start with.
pub fn declared_layer(contents: &str) -> Option<i32> {
    contents
        .lines()
        .next()?
        .trim()
        .strip_prefix("// LAYER ")?
        .trim()
        .parse()
        .ok()
}
