use std::fmt;
use std::num::ParseIntError;

/// Errors produced while parsing a single `name:type` token.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamParseError {
    /// An empty name or type where one was expected.
    Empty,
    /// A `{X:Type}` generic definition. The codec schemas never declare one.
    Generic,
    /// A flag expression (`name.N?Type`) was malformed.
    InvalidFlag,
    /// A `Vector<…>` argument was malformed (missing closing `>`).
    InvalidGeneric,
    /// A bare `name` with no `:type`, e.g. old-style `? = Int`.
    NotImplemented,
}

impl fmt::Display for ParamParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty token"),
            Self::Generic => write!(f, "generic type definitions are not supported"),
            Self::InvalidFlag => write!(f, "invalid flag expression"),
            Self::InvalidGeneric => write!(f, "invalid generic argument (unclosed `<`)"),
            Self::NotImplemented => write!(f, "parameter without `:type` is not supported"),
        }
    }
}

impl std::error::Error for ParamParseError {}

/// Errors produced while parsing a complete definition or a section marker.
#[derive(Debug, PartialEq)]
pub enum ParseError {
    /// The input was blank.
    Empty,
    /// No `= Type` was found.
    MissingType,
    /// The name (before `=`) was missing or had empty namespace components.
    MissingName,
    /// The `#id` hex literal was unparseable.
    InvalidId(ParseIntError),
    /// A parameter was invalid.
    InvalidParam(ParamParseError),
    /// An optional parameter refers to a flags field that was not declared
    /// before it.
    UndeclaredFlags(String),
    /// The definition uses a syntax we don't support.
    NotImplemented,
    /// A `---layer N---` marker whose `N` is not a non-negative integer.
    InvalidLayer(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty definition"),
            Self::MissingType => write!(f, "missing `= Type`"),
            Self::MissingName => write!(f, "missing or malformed name"),
            Self::InvalidId(e) => write!(f, "invalid constructor ID: {e}"),
            Self::InvalidParam(e) => write!(f, "invalid parameter: {e}"),
            Self::UndeclaredFlags(name) => write!(f, "flags field `{name}` used before declaration"),
            Self::NotImplemented => write!(f, "unsupported TL syntax"),
            Self::InvalidLayer(raw) => write!(f, "invalid layer marker: {raw:?}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidId(e) => Some(e),
            Self::InvalidParam(e) => Some(e),
            _ => None,
        }
    }
}
