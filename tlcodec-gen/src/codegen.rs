//! The public code-generation API.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tlcodec_parser::tl::{Definition, Parameter, ParameterType};

use crate::grouper;
use crate::metadata::{BoxedType, Group, Metadata, Predicate};
use crate::namegen::{self as n, FieldKind};

// ─── Config ───────────────────────────────────────────────────────────────────

/// Generation configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Emit `name_for_id(id) -> Option<&'static str>` in the common module.
    pub gen_name_for_id: bool,
}

// ─── Outputs ─────────────────────────────────────────────────────────────────

/// Writers for each generated Rust module.
pub struct Outputs<W: Write> {
    /// Receives the layer constant, registry tables and `name_for_id`.
    pub common: W,
    /// Receives `pub mod boxed { … }` (one storage record per boxed type).
    pub boxed: W,
    /// Receives `pub mod types { … }` (one view per predicate).
    pub types: W,
    /// Receives `pub mod functions { … }` (method records).
    pub functions: W,
}

impl Outputs<File> {
    /// Convenience constructor that opens files inside `out_dir`.
    pub fn from_dir(out_dir: &str) -> io::Result<Self> {
        let p = Path::new(out_dir);
        Ok(Self {
            common:    File::create(p.join("generated_common.rs"))?,
            boxed:     File::create(p.join("generated_boxed.rs"))?,
            types:     File::create(p.join("generated_types.rs"))?,
            functions: File::create(p.join("generated_functions.rs"))?,
        })
    }
}

impl<W: Write> Outputs<W> {
    /// Flush all writers.
    pub fn flush(&mut self) -> io::Result<()> {
        self.common.flush()?;
        self.boxed.flush()?;
        self.types.flush()?;
        self.functions.flush()
    }
}

// ─── Public API ───────────────────────────────────────────────────────────────

/// Generate Rust source code from a slice of parsed TL definitions.
///
/// Schema problems (conflicting field types, shared tags, unknown types)
/// come back as [`io::ErrorKind::InvalidData`]. Call `outputs.flush()` when
/// done.
pub fn generate<W: Write>(
    defs: &[Definition],
    config: &Config,
    outputs: &mut Outputs<W>,
) -> io::Result<()> {
    let meta = Metadata::build(defs).map_err(invalid_data)?;

    write_common(&meta, config, &mut outputs.common)?;
    write_boxed_mod(&meta, &mut outputs.boxed)?;
    write_types_mod(&meta, &mut outputs.types)?;
    write_functions_mod(&meta, &mut outputs.functions)?;

    Ok(())
}

fn invalid_data(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

const HEADER: &str = "// @generated by tlcodec-gen; do not edit by hand.";

/// Opens `pub mod {ns} {` for non-root buckets and returns the item indent.
fn open_ns<W: Write>(out: &mut W, ns: &str) -> io::Result<&'static str> {
    if ns.is_empty() {
        Ok("    ")
    } else {
        writeln!(out, "    pub mod {ns} {{")?;
        Ok("        ")
    }
}

fn close_ns<W: Write>(out: &mut W, ns: &str) -> io::Result<()> {
    if ns.is_empty() { Ok(()) } else { writeln!(out, "    }}") }
}

fn layers_literal(layers: &[(i32, u32)]) -> String {
    let items: Vec<String> = layers.iter().map(|(l, t)| format!("({l}, {t:#010x})")).collect();
    format!("&[{}]", items.join(", "))
}

// ─── Common module ────────────────────────────────────────────────────────────

fn write_common<W: Write>(meta: &Metadata, config: &Config, out: &mut W) -> io::Result<()> {
    writeln!(out, "{HEADER}")?;
    writeln!(out)?;
    writeln!(out, "/// The newest schema layer this code was generated from.")?;
    writeln!(out, "pub const LAYER: i32 = 0; // update via build.rs")?;
    writeln!(out)?;

    // (namespace → [(tag, full name, factory type)])
    let mut tables: BTreeMap<String, Vec<(u32, String, String)>> = BTreeMap::new();
    for b in &meta.boxed {
        let storage = n::boxed_qual_name(b.ty);
        for pred in &b.group.predicates {
            let def = pred.newest();
            let ns = def.namespace.first().cloned().unwrap_or_default();
            for (_, tag) in pred.layers() {
                tables.entry(ns.clone()).or_default().push((tag, pred.name.clone(), storage.clone()));
            }
        }
    }
    for f in &meta.functions {
        let pred = &f.predicates[0];
        let def = pred.newest();
        let ns = def.namespace.first().cloned().unwrap_or_default();
        let path = n::function_qual_name(def);
        for (_, tag) in pred.layers() {
            tables.entry(ns.clone()).or_default().push((tag, pred.name.clone(), path.clone()));
        }
    }

    writeln!(out, "/// Registry entries, one table per schema namespace.")?;
    writeln!(out, "pub(crate) const REGISTRY_TABLES: &[(&str, &[crate::registry::Entry])] = &[")?;
    for (ns, entries) in &tables {
        writeln!(out, "    ({ns:?}, &[")?;
        for (tag, name, path) in entries {
            writeln!(
                out,
                "        crate::registry::Entry {{ id: {tag:#010x}, name: {name:?}, factory: crate::registry::make::<{path}, {tag:#010x}> }},"
            )?;
        }
        writeln!(out, "    ]),")?;
    }
    writeln!(out, "];")?;

    if config.gen_name_for_id {
        writeln!(out)?;
        writeln!(out, "/// Returns the TL name for a known constructor ID.")?;
        writeln!(out, "pub fn name_for_id(id: u32) -> Option<&'static str> {{")?;
        writeln!(out, "    match id {{")?;
        for (tag, name, _) in tables.values().flatten() {
            writeln!(out, "        {tag:#010x} => Some({name:?}),")?;
        }
        writeln!(out, "        _ => None,")?;
        writeln!(out, "    }}")?;
        writeln!(out, "}}")?;
    }

    Ok(())
}

// ─── Encode / decode bodies ───────────────────────────────────────────────────

/// Statements writing the fields of `def` (tag already written).
fn write_encode_fields<W: Write>(
    out: &mut W,
    indent: &str,
    def: &Definition,
    group: &Group,
) -> io::Result<()> {
    for param in &def.params {
        if param.ty == ParameterType::Flags {
            write_flags_value(out, indent, def, param)?;
            writeln!(out, "{indent}{}.serialize(buf);", n::flags_var(&param.name))?;
            continue;
        }
        let Some(field) = group.field_of(param) else { continue };
        let attr = &field.attr;
        let (value, guard_open, guard_close) = if field.ty.optional {
            ("v".to_owned(), format!("if let Some(v) = &self.{attr} {{ "), " }")
        } else {
            (format!("self.{attr}"), String::new(), "")
        };
        let stmt = match field.ty.kind {
            FieldKind::FlagBool => continue,
            FieldKind::Scalar => format!("{value}.serialize(buf);"),
            FieldKind::Object { .. } => format!("{value}.encode_into(ctx, buf)?;"),
            FieldKind::ObjectVec if field.ty.optional => "crate::vector::encode_objects(v, ctx, buf)?;".to_owned(),
            FieldKind::ObjectVec => format!("crate::vector::encode_objects(&{value}, ctx, buf)?;"),
        };
        writeln!(out, "{indent}{guard_open}{stmt}{guard_close}")?;
    }
    Ok(())
}

/// `let flags: u32 = …;` computed from the fields it gates.
fn write_flags_value<W: Write>(
    out: &mut W,
    indent: &str,
    def: &Definition,
    flags: &Parameter,
) -> io::Result<()> {
    let mut terms: Vec<String> = Vec::new();
    for other in &def.params {
        let Some(fl) = other.flag() else { continue };
        if fl.name != flags.name {
            continue;
        }
        let attr = n::param_attr_name(other);
        let cond = if other.is_flag_bool() { format!("self.{attr}") } else { format!("self.{attr}.is_some()") };
        terms.push(format!("if {cond} {{ 1 << {} }} else {{ 0 }}", fl.index));
    }
    let name = n::flags_var(&flags.name);
    if terms.is_empty() {
        writeln!(out, "{indent}let {name}: u32 = 0;")
    } else {
        writeln!(out, "{indent}let {name}: u32 = 0")?;
        for term in terms {
            writeln!(out, "{indent}    | {term}")?;
        }
        writeln!(out, "{indent};")
    }
}

/// Statements reading the fields of `def` (tag already consumed).
fn write_decode_fields<W: Write>(
    out: &mut W,
    indent: &str,
    def: &Definition,
    group: &Group,
) -> io::Result<()> {
    for param in &def.params {
        if param.ty == ParameterType::Flags {
            writeln!(
                out,
                "{indent}let {}: u32 = <u32 as crate::Deserializable>::deserialize(buf);",
                n::flags_var(&param.name)
            )?;
            continue;
        }
        let Some(field) = group.field_of(param) else { continue };
        let attr = &field.attr;
        let bit = param.flag().map(|fl| format!("({} & (1 << {})) != 0", n::flags_var(&fl.name), fl.index));

        let read = match &field.ty.kind {
            FieldKind::FlagBool => {
                let bit = bit.unwrap_or_else(|| "false".into());
                writeln!(out, "{indent}self.{attr} = {bit};")?;
                continue;
            }
            FieldKind::Scalar => format!("<{} as crate::Deserializable>::deserialize(buf)", field.ty.base),
            FieldKind::Object { boxed: false } => "crate::object::read_object(buf)?".to_owned(),
            FieldKind::Object { boxed: true } => "Box::new(crate::object::read_object(buf)?)".to_owned(),
            FieldKind::ObjectVec => "crate::vector::decode_objects(buf)?".to_owned(),
        };
        match bit {
            Some(bit) => writeln!(out, "{indent}if {bit} {{ self.{attr} = Some({read}); }}")?,
            None => writeln!(out, "{indent}self.{attr} = {read};")?,
        }
    }
    Ok(())
}

/// Doc lines calling out flag bits that gate more than one field.
fn write_shared_bit_docs<W: Write>(out: &mut W, indent: &str, def: &Definition) -> io::Result<()> {
    for (flags, bit) in def.shared_flag_bits() {
        let names: Vec<String> = def
            .params
            .iter()
            .filter(|p| p.flag().is_some_and(|f| f.name == flags && f.index == bit))
            .map(|p| format!("`{}`", p.name))
            .collect();
        writeln!(out, "{indent}///")?;
        writeln!(
            out,
            "{indent}/// Bit {bit} of `{flags}` gates {}: it is set when any of them is present and all of them are read back when it is set.",
            names.join(" and ")
        )?;
    }
    Ok(())
}

fn write_schema_doc<W: Write>(out: &mut W, indent: &str, pred: &Predicate) -> io::Result<()> {
    writeln!(out, "{indent}///")?;
    writeln!(out, "{indent}/// ```tl")?;
    for def in &pred.defs {
        if def.layer > 0 {
            writeln!(out, "{indent}/// // layer {}", def.layer)?;
        }
        writeln!(out, "{indent}/// {def};")?;
    }
    writeln!(out, "{indent}/// ```")?;
    for def in &pred.defs {
        write_shared_bit_docs(out, indent, def)?;
    }
    Ok(())
}

fn write_any_methods<W: Write>(out: &mut W, indent: &str) -> io::Result<()> {
    writeln!(out, "{indent}    fn as_any(&self) -> &dyn std::any::Any {{ self }}")?;
    writeln!(out, "{indent}    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {{ self }}")?;
    writeln!(out, "{indent}    fn into_any(self: Box<Self>) -> Box<dyn std::any::Any> {{ self }}")
}

/// `match tag { … }` with one arm per definition of the group.
fn write_tag_match<W: Write>(
    out: &mut W,
    indent: &str,
    group: &Group,
    encode: bool,
) -> io::Result<()> {
    writeln!(out, "{indent}        match tag {{")?;
    for def in group.predicates.iter().flat_map(|p| &p.defs) {
        writeln!(out, "{indent}            {:#010x} => {{", def.id)?;
        let body_indent = format!("{indent}                ");
        if encode {
            write_encode_fields(out, &body_indent, def, group)?;
        } else {
            write_decode_fields(out, &body_indent, def, group)?;
        }
        writeln!(out, "{indent}            }}")?;
    }
    writeln!(out, "{indent}            _ => {{}}")?;
    writeln!(out, "{indent}        }}")
}

// ─── Storage records ──────────────────────────────────────────────────────────

fn write_boxed_mod<W: Write>(meta: &Metadata, out: &mut W) -> io::Result<()> {
    writeln!(out, "{HEADER}")?;
    writeln!(out, "pub mod boxed {{")?;

    let grouped = grouper::group_by_ns(&meta.boxed, |b| b.ty.namespace.as_slice()).map_err(invalid_data)?;
    for (ns, bucket) in &grouped {
        let indent = open_ns(out, ns)?;
        for b in bucket {
            write_storage_struct(out, indent, b)?;
            write_storage_impl(out, indent, b)?;
            write_storage_tl_object(out, indent, b)?;
        }
        close_ns(out, ns)?;
    }

    writeln!(out, "}}")
}

fn write_storage_struct<W: Write>(out: &mut W, indent: &str, b: &BoxedType) -> io::Result<()> {
    let name = n::type_name(b.ty);
    writeln!(out, "\n{indent}/// Storage for the boxed type `{}`.", b.ty)?;
    writeln!(out, "{indent}///")?;
    writeln!(out, "{indent}/// Variants:")?;
    for pred in &b.group.predicates {
        writeln!(out, "{indent}/// * [`{}`] (`{}`)", n::view_qual_name(pred.newest()), pred.name)?;
    }
    writeln!(out, "{indent}#[derive(Clone, Debug, PartialEq)]")?;
    writeln!(out, "{indent}pub struct {name} {{")?;
    writeln!(out, "{indent}    identity: crate::Identity,")?;
    for field in &b.group.fields {
        writeln!(out, "{indent}    pub {}: {},", field.attr, field.ty.rust())?;
    }
    writeln!(out, "{indent}}}")?;

    writeln!(out, "{indent}impl Default for {name} {{")?;
    writeln!(out, "{indent}    fn default() -> Self {{")?;
    writeln!(out, "{indent}        Self {{")?;
    writeln!(out, "{indent}            identity: crate::Identity::default_for(Self::PREDICATES),")?;
    for field in &b.group.fields {
        writeln!(out, "{indent}            {}: Default::default(),", field.attr)?;
    }
    writeln!(out, "{indent}        }}")?;
    writeln!(out, "{indent}    }}")?;
    writeln!(out, "{indent}}}")
}

fn write_storage_impl<W: Write>(out: &mut W, indent: &str, b: &BoxedType) -> io::Result<()> {
    let name = n::type_name(b.ty);
    writeln!(out, "{indent}impl {name} {{")?;
    writeln!(out, "{indent}    /// Every variant of this type with its tag per layer.")?;
    writeln!(out, "{indent}    pub const PREDICATES: &'static [crate::Predicate] = &[")?;
    for pred in &b.group.predicates {
        writeln!(
            out,
            "{indent}        crate::Predicate {{ name: {:?}, layers: {} }},",
            pred.name,
            layers_literal(&pred.layers())
        )?;
    }
    writeln!(out, "{indent}    ];")?;

    writeln!(out, "{indent}    /// Which variant this record currently represents.")?;
    writeln!(out, "{indent}    pub fn identity(&self) -> crate::Identity {{ self.identity }}")?;
    writeln!(out, "{indent}    /// Re-identify by tag. Returns `false`, leaving the identity alone, for a foreign tag.")?;
    writeln!(out, "{indent}    pub fn set_constructor(&mut self, id: u32) -> bool {{")?;
    writeln!(out, "{indent}        match crate::Identity::from_constructor(Self::PREDICATES, id) {{")?;
    writeln!(out, "{indent}            Some(identity) => {{ self.identity = identity; true }}")?;
    writeln!(out, "{indent}            None => false,")?;
    writeln!(out, "{indent}        }}")?;
    writeln!(out, "{indent}    }}")?;
    writeln!(out, "{indent}    /// Re-identify by predicate name. Returns `false`, leaving the identity alone, for a foreign name.")?;
    writeln!(out, "{indent}    pub fn set_predicate(&mut self, name: &str) -> bool {{")?;
    writeln!(out, "{indent}        match crate::Identity::from_predicate(Self::PREDICATES, name) {{")?;
    writeln!(out, "{indent}            Some(identity) => {{ self.identity = identity; true }}")?;
    writeln!(out, "{indent}            None => false,")?;
    writeln!(out, "{indent}        }}")?;
    writeln!(out, "{indent}    }}")?;

    for pred in &b.group.predicates {
        let def = pred.newest();
        let view = n::view_qual_name(def);
        let suffix = n::view_method_suffix(def);
        writeln!(out, "{indent}    /// Re-identify as `{}` and borrow that view.", pred.name)?;
        writeln!(out, "{indent}    pub fn to_{suffix}(&mut self) -> {view}<'_> {{")?;
        writeln!(out, "{indent}        {view}::new(self)")?;
        writeln!(out, "{indent}    }}")?;
        writeln!(out, "{indent}    /// Borrow as `{}` if that is the current variant.", pred.name)?;
        writeln!(out, "{indent}    pub fn as_{suffix}(&mut self) -> Option<{view}<'_>> {{")?;
        writeln!(out, "{indent}        if self.identity.predicate() == Some({:?}) {{", pred.name)?;
        writeln!(out, "{indent}            Some({view}::new(self))")?;
        writeln!(out, "{indent}        }} else {{")?;
        writeln!(out, "{indent}            None")?;
        writeln!(out, "{indent}        }}")?;
        writeln!(out, "{indent}    }}")?;
    }
    writeln!(out, "{indent}}}")
}

fn write_storage_tl_object<W: Write>(out: &mut W, indent: &str, b: &BoxedType) -> io::Result<()> {
    let name = n::type_name(b.ty);
    writeln!(out, "{indent}impl crate::TlObject for {name} {{")?;
    writeln!(out, "{indent}    fn constructor_id(&self) -> u32 {{ self.identity.constructor() }}")?;
    writeln!(out, "{indent}    fn predicate_name(&self) -> &'static str {{ self.identity.predicate().unwrap_or(\"\") }}")?;
    writeln!(out, "{indent}    fn identify(&mut self, tag: u32) -> bool {{ self.set_constructor(tag) }}")?;

    writeln!(
        out,
        "{indent}    fn encode_to(&self, ctx: crate::EncodeContext, buf: &mut Vec<u8>) -> Result<(), crate::EncodeError> {{"
    )?;
    writeln!(out, "{indent}        use crate::{{Serializable, TlObject}};")?;
    writeln!(
        out,
        "{indent}        let tag = self.identity.tag_for_layer(Self::PREDICATES, {:?}, ctx.layer)?;",
        b.ty.to_string()
    )?;
    writeln!(out, "{indent}        tag.serialize(buf);")?;
    write_tag_match(out, indent, &b.group, true)?;
    writeln!(out, "{indent}        Ok(())")?;
    writeln!(out, "{indent}    }}")?;

    writeln!(
        out,
        "{indent}    fn decode_body(&mut self, tag: u32, buf: crate::deserialize::Buffer) -> Result<(), crate::deserialize::Error> {{"
    )?;
    writeln!(out, "{indent}        let Some(identity) = crate::Identity::from_constructor(Self::PREDICATES, tag) else {{")?;
    writeln!(out, "{indent}            return Err(crate::deserialize::Error::UnknownConstructor {{ id: tag }});")?;
    writeln!(out, "{indent}        }};")?;
    writeln!(out, "{indent}        *self = Self::default();")?;
    writeln!(out, "{indent}        self.identity = identity;")?;
    write_tag_match(out, indent, &b.group, false)?;
    writeln!(out, "{indent}        Ok(())")?;
    writeln!(out, "{indent}    }}")?;

    write_any_methods(out, indent)?;
    writeln!(out, "{indent}}}")
}

// ─── Views ────────────────────────────────────────────────────────────────────

fn write_types_mod<W: Write>(meta: &Metadata, out: &mut W) -> io::Result<()> {
    writeln!(out, "{HEADER}")?;
    writeln!(out, "pub mod types {{")?;

    let views: Vec<(&BoxedType, &Predicate)> = meta
        .boxed
        .iter()
        .flat_map(|b| b.group.predicates.iter().map(move |p| (b, p)))
        .collect();
    let grouped = grouper::group_by_ns(&views, |(_, p)| p.newest().namespace.as_slice()).map_err(invalid_data)?;

    for (ns, bucket) in &grouped {
        let indent = open_ns(out, ns)?;
        for (b, pred) in bucket {
            write_view(out, indent, b, pred)?;
        }
        close_ns(out, ns)?;
    }

    writeln!(out, "}}")
}

fn write_view<W: Write>(out: &mut W, indent: &str, b: &BoxedType, pred: &Predicate) -> io::Result<()> {
    let name = n::def_type_name(pred.newest());
    let storage = n::boxed_qual_name(b.ty);

    writeln!(out, "\n{indent}/// View of [`{storage}`] as `{}`.", pred.name)?;
    write_schema_doc(out, indent, pred)?;
    writeln!(out, "{indent}#[derive(Debug)]")?;
    writeln!(out, "{indent}pub struct {name}<'a> {{")?;
    writeln!(out, "{indent}    storage: &'a mut {storage},")?;
    writeln!(out, "{indent}}}")?;

    writeln!(out, "{indent}impl<'a> {name}<'a> {{")?;
    writeln!(out, "{indent}    /// The predicate this view represents.")?;
    writeln!(out, "{indent}    pub const PREDICATE: &'static str = {:?};", pred.name)?;
    writeln!(out, "{indent}    /// Project `storage` as this variant, re-identifying it.")?;
    writeln!(out, "{indent}    pub fn new(storage: &'a mut {storage}) -> Self {{")?;
    writeln!(out, "{indent}        storage.set_predicate(Self::PREDICATE);")?;
    writeln!(out, "{indent}        Self {{ storage }}")?;
    writeln!(out, "{indent}    }}")?;
    writeln!(out, "{indent}    /// The shared storage record.")?;
    writeln!(out, "{indent}    pub fn storage(&self) -> &{storage} {{ &*self.storage }}")?;
    writeln!(out, "{indent}    /// Give the storage borrow back.")?;
    writeln!(out, "{indent}    pub fn into_storage(self) -> &'a mut {storage} {{ self.storage }}")?;
    writeln!(out, "{indent}    /// Encode the storage record as this variant.")?;
    writeln!(
        out,
        "{indent}    pub fn encode(&self, ctx: crate::EncodeContext) -> Result<Vec<u8>, crate::EncodeError> {{"
    )?;
    writeln!(out, "{indent}        crate::TlObject::encode(&*self.storage, ctx)")?;
    writeln!(out, "{indent}    }}")?;
    writeln!(out, "{indent}    /// Decode bytes that must carry one of this variant's tags.")?;
    writeln!(out, "{indent}    pub fn decode(&mut self, bytes: &[u8]) -> Result<(), crate::deserialize::Error> {{")?;
    writeln!(out, "{indent}        let mut cursor = crate::Cursor::from_slice(bytes);")?;
    writeln!(out, "{indent}        let tag = <u32 as crate::Deserializable>::deserialize(&mut cursor);")?;
    writeln!(out, "{indent}        cursor.check()?;")?;
    writeln!(
        out,
        "{indent}        if !{storage}::PREDICATES.iter().any(|p| p.name == Self::PREDICATE && p.knows(tag)) {{"
    )?;
    writeln!(out, "{indent}            return Err(crate::deserialize::Error::UnknownConstructor {{ id: tag }});")?;
    writeln!(out, "{indent}        }}")?;
    writeln!(out, "{indent}        crate::TlObject::decode_body(&mut *self.storage, tag, &mut cursor)?;")?;
    writeln!(out, "{indent}        cursor.check()")?;
    writeln!(out, "{indent}    }}")?;

    for attr in pred.attrs() {
        let Some(field) = b.group.field(&attr) else { continue };
        let rust = field.ty.rust();
        let getter = n::getter_name(&attr);
        let plain = n::plain_name(&attr);
        if n::is_copy(&field.ty.base) {
            writeln!(out, "{indent}    pub fn {getter}(&self) -> {rust} {{ self.storage.{attr} }}")?;
        } else {
            writeln!(out, "{indent}    pub fn {getter}(&self) -> &{rust} {{ &self.storage.{attr} }}")?;
            writeln!(out, "{indent}    pub fn {plain}_mut(&mut self) -> &mut {rust} {{ &mut self.storage.{attr} }}")?;
        }
        writeln!(out, "{indent}    pub fn set_{plain}(&mut self, v: {rust}) {{ self.storage.{attr} = v; }}")?;
    }
    writeln!(out, "{indent}}}")
}

// ─── Method records ───────────────────────────────────────────────────────────

fn write_functions_mod<W: Write>(meta: &Metadata, out: &mut W) -> io::Result<()> {
    writeln!(out, "{HEADER}")?;
    writeln!(out, "pub mod functions {{")?;

    let grouped = grouper::group_by_ns(&meta.functions, |g| g.predicates[0].newest().namespace.as_slice())
        .map_err(invalid_data)?;
    for (ns, bucket) in &grouped {
        let indent = open_ns(out, ns)?;
        for group in bucket {
            write_method(out, indent, group)?;
        }
        close_ns(out, ns)?;
    }

    writeln!(out, "}}")
}

fn write_method<W: Write>(out: &mut W, indent: &str, group: &Group) -> io::Result<()> {
    let pred = &group.predicates[0];
    let def = pred.newest();
    let name = n::def_type_name(def);
    let ret = n::return_type(&def.ty).ok_or_else(|| invalid_data(format!("return type of {}", pred.name)))?;

    writeln!(out, "\n{indent}/// RPC method `{}`.", pred.name)?;
    write_schema_doc(out, indent, pred)?;
    writeln!(out, "{indent}#[derive(Clone, Debug, Default, PartialEq)]")?;
    writeln!(out, "{indent}pub struct {name} {{")?;
    for field in &group.fields {
        writeln!(out, "{indent}    pub {}: {},", field.attr, field.ty.rust())?;
    }
    writeln!(out, "{indent}}}")?;

    writeln!(out, "{indent}impl {name} {{")?;
    writeln!(out, "{indent}    /// `(layer, tag)` pairs in ascending layer order.")?;
    writeln!(out, "{indent}    pub const LAYERS: &'static [(i32, u32)] = {};", layers_literal(&pred.layers()))?;
    writeln!(
        out,
        "{indent}    const PREDICATE: crate::Predicate = crate::Predicate {{ name: {:?}, layers: Self::LAYERS }};",
        pred.name
    )?;
    writeln!(out, "{indent}}}")?;

    writeln!(out, "{indent}impl crate::Identifiable for {name} {{")?;
    writeln!(out, "{indent}    const CONSTRUCTOR_ID: u32 = {:#010x};", def.id)?;
    writeln!(out, "{indent}}}")?;

    writeln!(out, "{indent}impl crate::RemoteCall for {name} {{")?;
    writeln!(out, "{indent}    type Return = {ret};")?;
    writeln!(out, "{indent}}}")?;

    writeln!(out, "{indent}impl crate::TlObject for {name} {{")?;
    writeln!(out, "{indent}    fn constructor_id(&self) -> u32 {{ <Self as crate::Identifiable>::CONSTRUCTOR_ID }}")?;
    writeln!(out, "{indent}    fn predicate_name(&self) -> &'static str {{ Self::PREDICATE.name }}")?;
    writeln!(out, "{indent}    fn identify(&mut self, tag: u32) -> bool {{ Self::PREDICATE.knows(tag) }}")?;
    writeln!(
        out,
        "{indent}    fn encode_to(&self, ctx: crate::EncodeContext, buf: &mut Vec<u8>) -> Result<(), crate::EncodeError> {{"
    )?;
    writeln!(out, "{indent}        use crate::{{Serializable, TlObject}};")?;
    writeln!(out, "{indent}        let tag = Self::PREDICATE.tag_for_layer(ctx.layer).ok_or(crate::EncodeError::UnsupportedLayer {{")?;
    writeln!(out, "{indent}            predicate: Self::PREDICATE.name,")?;
    writeln!(out, "{indent}            layer: ctx.layer,")?;
    writeln!(out, "{indent}        }})?;")?;
    writeln!(out, "{indent}        tag.serialize(buf);")?;
    write_tag_match(out, indent, group, true)?;
    writeln!(out, "{indent}        Ok(())")?;
    writeln!(out, "{indent}    }}")?;

    writeln!(
        out,
        "{indent}    fn decode_body(&mut self, tag: u32, buf: crate::deserialize::Buffer) -> Result<(), crate::deserialize::Error> {{"
    )?;
    writeln!(out, "{indent}        if !Self::PREDICATE.knows(tag) {{")?;
    writeln!(out, "{indent}            return Err(crate::deserialize::Error::UnknownConstructor {{ id: tag }});")?;
    writeln!(out, "{indent}        }}")?;
    writeln!(out, "{indent}        *self = Self::default();")?;
    write_tag_match(out, indent, group, false)?;
    writeln!(out, "{indent}        Ok(())")?;
    writeln!(out, "{indent}    }}")?;

    write_any_methods(out, indent)?;
    writeln!(out, "{indent}}}")
}
