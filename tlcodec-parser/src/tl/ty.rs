use std::fmt;
use std::str::FromStr;

use crate::errors::ParamParseError;

/// The type of a definition or parameter, e.g. `Vector<long>` or `Photo`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Type {
    /// Namespace components, e.g. `["chat"]` for `chat.Foo`.
    pub namespace: Vec<String>,
    /// The bare name, e.g. `"Vector"`.
    pub name: String,
    /// `true` when the name starts lowercase (`long`, `string`, `vector`).
    pub bare: bool,
    /// The element type of `Vector<T>`.
    pub generic_arg: Option<Box<Type>>,
}

impl Type {
    /// `Vector<T>` (boxed) or `vector<T>` (bare) element type, if any.
    pub fn vector_element(&self) -> Option<&Type> {
        match self.name.as_str() {
            "Vector" | "vector" => self.generic_arg.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ns in &self.namespace {
            write!(f, "{ns}.")?;
        }
        write!(f, "{}", self.name)?;
        if let Some(arg) = &self.generic_arg {
            write!(f, "<{arg}>")?;
        }
        Ok(())
    }
}

impl FromStr for Type {
    type Err = ParamParseError;

    /// ```
    /// use tlcodec_parser::tl::Type;
    /// let ty: Type = "Vector<long>".parse().unwrap();
    /// assert_eq!(ty.vector_element().unwrap().name, "long");
    /// ```
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.starts_with('!') {
            return Err(ParamParseError::Generic);
        }

        let (name_part, generic_arg) = match raw.split_once('<') {
            Some((name, rest)) => {
                let arg = rest.strip_suffix('>').ok_or(ParamParseError::InvalidGeneric)?;
                (name, Some(Box::new(arg.parse::<Type>()?)))
            }
            None => (raw, None),
        };

        let (namespace, name) = match name_part.rsplit_once('.') {
            Some((ns, n)) => (ns.split('.').map(String::from).collect::<Vec<_>>(), n),
            None => (Vec::new(), name_part),
        };
        if namespace.iter().any(String::is_empty) {
            return Err(ParamParseError::Empty);
        }

        let first = name.chars().next().ok_or(ParamParseError::Empty)?;
        Ok(Self {
            namespace,
            name: name.to_owned(),
            bare: first.is_ascii_lowercase(),
            generic_arg,
        })
    }
}
