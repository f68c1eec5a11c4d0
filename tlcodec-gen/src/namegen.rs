//! Functions that convert TL names to idiomatic Rust identifiers.

use tlcodec_parser::tl::{Definition, Parameter, ParameterType, Type};

// ─── primitive → Rust type ───────────────────────────────────────────────────

/// Map a TL scalar name to a Rust built-in type string, if applicable.
pub(crate) fn builtin_type(name: &str) -> Option<&'static str> {
    Some(match name {
        "Bool"   => "bool",
        "true"   => "bool",
        "int"    => "i32",
        "long"   => "i64",
        "double" => "f64",
        "string" => "String",
        "bytes"  => "Vec<u8>",
        _ => return None,
    })
}

/// Rust types that are `Copy` and returned by value from view getters.
pub(crate) fn is_copy(rust: &str) -> bool {
    matches!(rust, "bool" | "i32" | "i64" | "f64")
}

// ─── PascalCase / snake_case ─────────────────────────────────────────────────

/// Converts `some_ok_name` or `SomeOKName` into `SomeOkName` (PascalCase).
pub(crate) fn to_pascal(name: &str) -> String {
    let name = match name.rfind('.') {
        Some(pos) => &name[pos + 1..],
        None => name,
    };

    let mut out = String::with_capacity(name.len());
    let mut next_upper = true;
    let mut prev_upper = false;

    for ch in name.chars() {
        if ch == '_' {
            next_upper = true;
            prev_upper = false;
            continue;
        }
        if next_upper {
            out.push(ch.to_ascii_uppercase());
            next_upper = false;
            prev_upper = ch.is_ascii_uppercase();
        } else if ch.is_ascii_uppercase() {
            // Lowercase the tail of a cap-run: "someOKName" → "SomeOkName".
            if prev_upper {
                out.push(ch.to_ascii_lowercase());
            } else {
                out.push(ch);
            }
            prev_upper = true;
        } else {
            out.push(ch);
            prev_upper = false;
        }
    }
    out
}

/// Converts `chatInvitePeek` into `chat_invite_peek`.
pub(crate) fn to_snake(name: &str) -> String {
    let name = match name.rfind('.') {
        Some(pos) => &name[pos + 1..],
        None => name,
    };

    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}

// ─── Definition helpers ───────────────────────────────────────────────────────

/// Struct name for a view or method record.
pub(crate) fn def_type_name(def: &Definition) -> String {
    to_pascal(&def.name)
}

/// `crate::types::ns::Name` for a view.
pub(crate) fn view_qual_name(def: &Definition) -> String {
    qualify("crate::types::", &def.namespace, &def_type_name(def))
}

/// `crate::functions::ns::Name` for a method record.
pub(crate) fn function_qual_name(def: &Definition) -> String {
    qualify("crate::functions::", &def.namespace, &def_type_name(def))
}

/// The `to_…` / `as_…` suffix on storage records for a predicate.
pub(crate) fn view_method_suffix(def: &Definition) -> String {
    to_snake(&def.name)
}

// ─── Type helpers ─────────────────────────────────────────────────────────────

/// PascalCase name for a boxed TL type.
pub(crate) fn type_name(ty: &Type) -> String {
    to_pascal(&ty.name)
}

/// `crate::boxed::ns::Name` for a boxed type.
pub(crate) fn boxed_qual_name(ty: &Type) -> String {
    qualify("crate::boxed::", &ty.namespace, &type_name(ty))
}

fn qualify(root: &str, namespace: &[String], name: &str) -> String {
    let mut s = String::from(root);
    for ns in namespace {
        s.push_str(ns);
        s.push_str("::");
    }
    s.push_str(name);
    s
}

/// Rust type of an RPC result.
pub(crate) fn return_type(ty: &Type) -> Option<String> {
    if let Some(elem) = ty.vector_element() {
        return Some(match elem.name.as_str() {
            "int" => "Vec<i32>".into(),
            "long" => "Vec<i64>".into(),
            "string" => "Vec<String>".into(),
            _ if builtin_type(&elem.name).is_some() => return None,
            _ => format!("crate::TlVector<{}>", boxed_qual_name(elem)),
        });
    }
    Some(match builtin_type(&ty.name) {
        Some(b) => b.to_owned(),
        None => boxed_qual_name(ty),
    })
}

// ─── Parameter helpers ────────────────────────────────────────────────────────

/// The Rust field name for a parameter (handles reserved keywords).
pub(crate) fn param_attr_name(param: &Parameter) -> String {
    match param.name.as_str() {
        "final"    => "r#final".into(),
        "loop"     => "r#loop".into(),
        "self"     => "is_self".into(),
        "static"   => "r#static".into(),
        "type"     => "r#type".into(),
        "identity" => "identity_".into(),
        other      => other.to_ascii_lowercase(),
    }
}

/// The local variable holding a `#` parameter while coding.
pub(crate) fn flags_var(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// The identifier with any `r#` prefix removed, for building `set_…` names.
pub(crate) fn plain_name(attr: &str) -> &str {
    attr.strip_prefix("r#").unwrap_or(attr)
}

/// Getter name on a view; avoids clashing with the view's own methods.
pub(crate) fn getter_name(attr: &str) -> String {
    match plain_name(attr) {
        "new" | "storage" | "into_storage" | "encode" | "decode" => format!("{attr}_field"),
        _ => attr.to_owned(),
    }
}

/// How a parameter is stored and coded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FieldKind {
    /// `flags.N?true`: lives only in the bitmask.
    FlagBool,
    /// `int`, `long`, `double`, `string`, `bytes`, `Bool` and the scalar
    /// vectors, coded through `Serializable` / `Deserializable`.
    Scalar,
    /// A boxed object, coded through `TlObject`.
    Object {
        /// Wrapped in `Box` to break a type cycle.
        boxed: bool,
    },
    /// `Vector<Object>`.
    ObjectVec,
}

/// The storage shape of one non-flags parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FieldType {
    pub(crate) kind: FieldKind,
    /// Rust type without the `Option` wrapper.
    pub(crate) base: String,
    /// Gated by a flag bit (other than `FlagBool`).
    pub(crate) optional: bool,
}

impl FieldType {
    /// The full Rust type of the storage field.
    pub(crate) fn rust(&self) -> String {
        if self.optional {
            format!("Option<{}>", self.base)
        } else {
            self.base.clone()
        }
    }
}

/// Classify a parameter. `is_recursive(ty)` says whether an object field of
/// type `ty` must be boxed. Returns `None` for `#` parameters and an error
/// message for unsupported types.
pub(crate) fn field_type(
    param: &Parameter,
    is_recursive: impl Fn(&Type) -> bool,
) -> Result<Option<FieldType>, String> {
    let ParameterType::Normal { ty, flag } = &param.ty else {
        return Ok(None);
    };
    let optional = flag.is_some();

    if ty.name == "true" {
        if !optional {
            return Err(format!("`{}:true` without a flag", param.name));
        }
        return Ok(Some(FieldType { kind: FieldKind::FlagBool, base: "bool".into(), optional: false }));
    }

    if let Some(elem) = ty.vector_element() {
        let (kind, base) = match elem.name.as_str() {
            "int" => (FieldKind::Scalar, "Vec<i32>".to_owned()),
            "long" => (FieldKind::Scalar, "Vec<i64>".to_owned()),
            "string" => (FieldKind::Scalar, "Vec<String>".to_owned()),
            _ if builtin_type(&elem.name).is_some() || elem.vector_element().is_some() => {
                return Err(format!("unsupported vector element in `{param}`"));
            }
            _ => (FieldKind::ObjectVec, format!("Vec<{}>", boxed_qual_name(elem))),
        };
        return Ok(Some(FieldType { kind, base, optional }));
    }

    if let Some(b) = builtin_type(&ty.name) {
        return Ok(Some(FieldType { kind: FieldKind::Scalar, base: b.to_owned(), optional }));
    }

    let boxed = is_recursive(ty);
    let base = if boxed {
        format!("Box<{}>", boxed_qual_name(ty))
    } else {
        boxed_qual_name(ty)
    };
    Ok(Some(FieldType { kind: FieldKind::Object { boxed }, base, optional }))
}
