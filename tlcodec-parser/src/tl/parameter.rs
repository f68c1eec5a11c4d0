use std::fmt;
use std::str::FromStr;

use crate::errors::ParamParseError;
use crate::tl::Type;

/// A flag reference such as `flags.4` in `participants:flags.4?Vector<long>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Flag {
    /// The flags field holding the bit (almost always `"flags"`).
    pub name: String,
    /// Bit index, 0-based.
    pub index: u32,
}

/// A single `name:type` parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Parameter {
    /// The parameter name as written in the schema.
    pub name: String,
    /// What the parameter holds.
    pub ty: ParameterType,
}

/// The kind of a parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParameterType {
    /// `name:#`: a bitmask computed from the optional parameters at encode
    /// time, never stored.
    Flags,
    /// A typed value, gated by a flag bit when `flag` is set.
    Normal {
        /// The value's type.
        ty: Type,
        /// The gating bit, if optional.
        flag: Option<Flag>,
    },
}

impl Parameter {
    /// The gating flag, if this parameter is optional.
    pub fn flag(&self) -> Option<&Flag> {
        match &self.ty {
            ParameterType::Normal { flag, .. } => flag.as_ref(),
            ParameterType::Flags => None,
        }
    }

    /// `true` for `flags.N?true` parameters, which live entirely in the bitmask.
    pub fn is_flag_bool(&self) -> bool {
        matches!(&self.ty, ParameterType::Normal { ty, flag: Some(_) } if ty.name == "true")
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.ty)
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flags => write!(f, "#"),
            Self::Normal { ty, flag: Some(fl) } => write!(f, "{}.{}?{ty}", fl.name, fl.index),
            Self::Normal { ty, flag: None } => write!(f, "{ty}"),
        }
    }
}

impl FromStr for Parameter {
    type Err = ParamParseError;

    /// Parses one token such as `flags:#`, `chat_id:long` or
    /// `about:flags.5?string`.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if token.starts_with('{') {
            return Err(ParamParseError::Generic);
        }

        let (name, ty_str) = token.split_once(':').ok_or(ParamParseError::NotImplemented)?;
        if name.is_empty() || ty_str.is_empty() {
            return Err(ParamParseError::Empty);
        }

        Ok(Self {
            name: name.to_owned(),
            ty: ty_str.parse()?,
        })
    }
}

impl FromStr for ParameterType {
    type Err = ParamParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "#" {
            return Ok(Self::Flags);
        }

        let Some((flag_part, ty_part)) = s.split_once('?') else {
            return Ok(Self::Normal { ty: s.parse()?, flag: None });
        };

        let (name, index) = flag_part.split_once('.').ok_or(ParamParseError::InvalidFlag)?;
        if name.is_empty() {
            return Err(ParamParseError::InvalidFlag);
        }
        let index = index.parse::<u32>().map_err(|_| ParamParseError::InvalidFlag)?;
        if index > 31 || ty_part.contains('?') {
            return Err(ParamParseError::InvalidFlag);
        }

        Ok(Self::Normal {
            ty: ty_part.parse()?,
            flag: Some(Flag { name: name.to_owned(), index }),
        })
    }
}
