use std::fmt;
use std::str::FromStr;

use crate::errors::{ParamParseError, ParseError};
use crate::tl::{Category, Flag, Parameter, ParameterType, Type};
use crate::utils::tl_id;

/// A single TL definition, either a constructor or a function.
///
/// ```text
/// chatInviteAlready#a40e7d5e chat:MutableChat = ChatInvite;
/// ```
/// becomes a `Definition` with `name = "chatInviteAlready"`,
/// `id = 0xa40e7d5e`, `params = [chat:MutableChat]` and `ty = ChatInvite`.
#[derive(Clone, Debug, PartialEq)]
pub struct Definition {
    /// Namespace parts. Empty when the definition is in the global namespace.
    pub namespace: Vec<String>,

    /// The constructor/method name without namespace.
    pub name: String,

    /// 32-bit constructor tag, either parsed from `#XXXXXXXX` or CRC32-derived.
    pub id: u32,

    /// Ordered list of parameters.
    pub params: Vec<Parameter>,

    /// The boxed type this definition belongs to.
    pub ty: Type,

    /// Whether this is a data constructor or an RPC function.
    pub category: Category,

    /// The `---layer N---` section the definition appeared in, 0 when none.
    pub layer: i32,
}

impl Definition {
    /// Returns `namespace.name` joined with dots.
    pub fn full_name(&self) -> String {
        let cap = self.namespace.iter().map(|ns| ns.len() + 1).sum::<usize>() + self.name.len();
        let mut s = String::with_capacity(cap);
        for ns in &self.namespace {
            s.push_str(ns);
            s.push('.');
        }
        s.push_str(&self.name);
        s
    }

    /// Flag bits gating more than one parameter, as `(flags field, bit)`.
    ///
    /// Such parameters are indistinguishable on the wire once the bit is set.
    pub fn shared_flag_bits(&self) -> Vec<(String, u32)> {
        let mut seen: Vec<&Flag> = Vec::new();
        let mut shared: Vec<(String, u32)> = Vec::new();
        for flag in self.params.iter().filter_map(Parameter::flag) {
            if seen.contains(&flag) {
                let entry = (flag.name.clone(), flag.index);
                if !shared.contains(&entry) {
                    shared.push(entry);
                }
            } else {
                seen.push(flag);
            }
        }
        shared
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{:08x}", self.full_name(), self.id)?;
        for p in &self.params {
            write!(f, " {p}")?;
        }
        write!(f, " = {}", self.ty)
    }
}

impl FromStr for Definition {
    type Err = ParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ParseError::Empty);
        }

        let (lhs, ty_str) = raw.split_once('=').ok_or(ParseError::MissingType)?;
        let lhs = lhs.trim();
        let ty_str = ty_str.trim().trim_end_matches(';').trim();
        if ty_str.is_empty() {
            return Err(ParseError::MissingType);
        }
        let ty = Type::from_str(ty_str).map_err(|_| ParseError::MissingType)?;

        let (head, rest) = match lhs.split_once(char::is_whitespace) {
            Some((h, r)) => (h, r.trim_start()),
            None => (lhs, ""),
        };

        let (full_name, explicit_id) = match head.split_once('#') {
            Some((n, id)) => (n, Some(id)),
            None => (head, None),
        };

        let (namespace, name) = match full_name.rsplit_once('.') {
            Some((ns, n)) => (ns.split('.').map(String::from).collect::<Vec<_>>(), n),
            None => (Vec::new(), full_name),
        };
        if namespace.iter().any(String::is_empty) || name.is_empty() {
            return Err(ParseError::MissingName);
        }

        let id = match explicit_id {
            Some(hex) => u32::from_str_radix(hex.trim(), 16).map_err(ParseError::InvalidId)?,
            None => tl_id(raw),
        };

        let mut flag_defs: Vec<&str> = Vec::new();
        let mut params = Vec::new();
        for token in rest.split_whitespace() {
            let param = match Parameter::from_str(token) {
                Ok(p) => p,
                Err(ParamParseError::NotImplemented) => return Err(ParseError::NotImplemented),
                Err(e) => return Err(ParseError::InvalidParam(e)),
            };
            match &param.ty {
                ParameterType::Flags => flag_defs.push(
                    token.split_once(':').map_or(token, |(n, _)| n),
                ),
                ParameterType::Normal { flag: Some(flag), .. } => {
                    if !flag_defs.contains(&flag.name.as_str()) {
                        return Err(ParseError::UndeclaredFlags(flag.name.clone()));
                    }
                }
                ParameterType::Normal { flag: None, .. } => {}
            }
            params.push(param);
        }

        Ok(Definition {
            namespace,
            name: name.to_owned(),
            id,
            params,
            ty,
            category: Category::Types,
            layer: 0,
        })
    }
}
