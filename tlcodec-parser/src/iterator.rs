//! Line-oriented driver behind [`crate::parse_tl_file`].

use std::str::FromStr;

use crate::errors::ParseError;
use crate::tl::{Category, Definition};

pub(crate) struct TlIterator<'a> {
    lines: std::str::Lines<'a>,
    /// Flips when we see `---functions---` / `---types---`.
    category: Category,
    /// Set by the most recent `---layer N---` marker; 0 before any marker.
    layer: i32,
    /// Accumulates multi-line definitions until the `;` terminator.
    pending: String,
}

impl<'a> TlIterator<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self {
            lines: src.lines(),
            category: Category::Types,
            layer: 0,
            pending: String::new(),
        }
    }

    /// Returns `None` if `line` is not a section marker, otherwise the
    /// outcome of applying it.
    fn apply_marker(&mut self, line: &str) -> Option<Result<(), ParseError>> {
        let inner = line.strip_prefix("---")?.strip_suffix("---")?.trim();
        match inner {
            "functions" => self.category = Category::Functions,
            "types" => self.category = Category::Types,
            other => {
                let number = other.strip_prefix("layer")?.trim();
                match number.parse::<i32>() {
                    Ok(n) if n >= 0 => self.layer = n,
                    _ => return Some(Err(ParseError::InvalidLayer(line.to_owned()))),
                }
            }
        }
        Some(Ok(()))
    }
}

impl Iterator for TlIterator<'_> {
    type Item = Result<Definition, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }

            match self.apply_marker(trimmed) {
                Some(Ok(())) => continue,
                Some(Err(e)) => return Some(Err(e)),
                None => {}
            }

            self.pending.push(' ');
            self.pending.push_str(trimmed);
            if !trimmed.ends_with(';') {
                continue;
            }

            let raw = std::mem::take(&mut self.pending);
            let raw = raw.trim().trim_end_matches(';').trim();
            if raw.is_empty() {
                continue;
            }

            let result = Definition::from_str(raw).map(|mut d| {
                d.category = self.category;
                d.layer = self.layer;
                d
            });
            return Some(result);
        }
    }
}
