//! Pre-computed metadata used throughout the code generator.
//!
//! Definitions are folded into *groups*: one per boxed type (all of its
//! predicates, every layer) and one per RPC method (every layer). Each group
//! knows the union of its fields, which becomes the storage layout.

use std::collections::{BTreeMap, HashMap, HashSet};

use tlcodec_parser::tl::{Category, Definition, Parameter, ParameterType, Type};

use crate::namegen::{self as n, FieldType};

/// TL types handled as Rust primitives; no storage is generated for them.
const BUILTIN_TYPES: &[&str] = &["Bool", "True", "Vector"];

#[derive(Debug)]
pub(crate) struct Field {
    pub(crate) attr: String,
    pub(crate) ty: FieldType,
}

/// One predicate with its definitions in ascending layer order, one per tag.
#[derive(Debug)]
pub(crate) struct Predicate<'a> {
    pub(crate) name: String,
    pub(crate) defs: Vec<&'a Definition>,
}

impl<'a> Predicate<'a> {
    pub(crate) fn newest(&self) -> &'a Definition {
        self.defs[self.defs.len() - 1]
    }

    pub(crate) fn layers(&self) -> Vec<(i32, u32)> {
        self.defs.iter().map(|d| (d.layer, d.id)).collect()
    }

    /// Attribute names this predicate uses in any layer, first-seen order.
    pub(crate) fn attrs(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for def in &self.defs {
            for p in def.params.iter().filter(|p| p.ty != ParameterType::Flags) {
                let attr = n::param_attr_name(p);
                if !out.contains(&attr) {
                    out.push(attr);
                }
            }
        }
        out
    }
}

/// A boxed type or a method: predicates plus the union of their fields.
#[derive(Debug)]
pub(crate) struct Group<'a> {
    pub(crate) predicates: Vec<Predicate<'a>>,
    pub(crate) fields: Vec<Field>,
}

impl Group<'_> {
    pub(crate) fn field(&self, attr: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.attr == attr)
    }

    pub(crate) fn field_of(&self, param: &Parameter) -> Option<&Field> {
        self.field(&n::param_attr_name(param))
    }
}

#[derive(Debug)]
pub(crate) struct BoxedType<'a> {
    pub(crate) ty: &'a Type,
    pub(crate) group: Group<'a>,
}

#[derive(Debug)]
pub(crate) struct Metadata<'a> {
    /// Sorted by type name.
    pub(crate) boxed: Vec<BoxedType<'a>>,
    /// Sorted by full method name.
    pub(crate) functions: Vec<Group<'a>>,
}

/// `ns.Name` without generic arguments.
fn type_key(ty: &Type) -> String {
    let mut key = ty.namespace.join(".");
    if !key.is_empty() {
        key.push('.');
    }
    key.push_str(&ty.name);
    key
}

fn is_object(ty: &Type) -> bool {
    n::builtin_type(&ty.name).is_none() && ty.vector_element().is_none()
}

impl<'a> Metadata<'a> {
    pub(crate) fn build(defs: &'a [Definition]) -> Result<Self, String> {
        let defs: Vec<&Definition> = defs
            .iter()
            .filter(|d| !(d.category == Category::Types && BUILTIN_TYPES.contains(&d.ty.name.as_str())))
            .collect();

        check_unique_tags(&defs)?;

        // Object edges between boxed types, for recursion detection.
        let mut edges: HashMap<String, HashSet<String>> = HashMap::new();
        for def in defs.iter().copied().filter(|d| d.category == Category::Types) {
            let from = edges.entry(type_key(&def.ty)).or_default();
            for p in &def.params {
                if let ParameterType::Normal { ty, .. } = &p.ty {
                    if is_object(ty) {
                        from.insert(type_key(ty));
                    }
                }
            }
        }

        // Boxed types, predicates kept in schema order.
        let mut by_type: BTreeMap<String, (&'a Type, Vec<Predicate<'a>>)> = BTreeMap::new();
        for def in defs.iter().copied().filter(|d| d.category == Category::Types) {
            let entry = by_type.entry(type_key(&def.ty)).or_insert_with(|| (&def.ty, Vec::new()));
            push_def(&mut entry.1, def);
        }

        let mut boxed = Vec::with_capacity(by_type.len());
        for (key, (ty, mut predicates)) in by_type {
            for p in &mut predicates {
                normalize(p)?;
            }
            let fields = union_fields(&predicates, |field_ty| {
                reaches(&edges, &type_key(field_ty), &key)
            })?;
            boxed.push(BoxedType { ty, group: Group { predicates, fields } });
        }

        let mut by_name: BTreeMap<String, Vec<Predicate<'a>>> = BTreeMap::new();
        for def in defs.iter().copied().filter(|d| d.category == Category::Functions) {
            push_def(by_name.entry(def.full_name()).or_default(), def);
        }

        let mut functions = Vec::with_capacity(by_name.len());
        for (name, mut predicates) in by_name {
            let predicate = &mut predicates[0];
            normalize(predicate)?;
            if n::return_type(&predicate.newest().ty).is_none() {
                return Err(format!("unsupported return type for {name}"));
            }
            let fields = union_fields(&predicates, |_| false)?;
            functions.push(Group { predicates, fields });
        }

        let meta = Self { boxed, functions };
        meta.check_references()?;
        Ok(meta)
    }

    /// The boxed type named by `ty`, if one was generated.
    pub(crate) fn boxed_for(&self, ty: &Type) -> Option<&BoxedType<'a>> {
        let key = type_key(ty);
        self.boxed.iter().find(|b| type_key(b.ty) == key)
    }

    fn check_references(&self) -> Result<(), String> {
        let groups = self.boxed.iter().map(|b| &b.group).chain(&self.functions);
        for group in groups {
            for def in group.predicates.iter().flat_map(|p| &p.defs) {
                for p in &def.params {
                    let ParameterType::Normal { ty, .. } = &p.ty else { continue };
                    let target = ty.vector_element().unwrap_or(ty);
                    if is_object(target) && self.boxed_for(target).is_none() {
                        return Err(format!("{} refers to unknown type {target}", def.full_name()));
                    }
                }
            }
        }
        Ok(())
    }
}

fn push_def<'a>(predicates: &mut Vec<Predicate<'a>>, def: &'a Definition) {
    let name = def.full_name();
    match predicates.iter_mut().find(|p| p.name == name) {
        Some(p) => p.defs.push(def),
        None => predicates.push(Predicate { name, defs: vec![def] }),
    }
}

/// Sort by layer, drop re-declarations that kept the same tag and reject two
/// different tags in one layer.
fn normalize(predicate: &mut Predicate<'_>) -> Result<(), String> {
    predicate.defs.sort_by_key(|d| d.layer);
    let mut seen_tags = HashSet::new();
    predicate.defs.retain(|d| seen_tags.insert(d.id));
    for pair in predicate.defs.windows(2) {
        if pair[0].layer == pair[1].layer {
            return Err(format!(
                "{} declared twice in layer {}",
                predicate.name, pair[0].layer
            ));
        }
    }
    Ok(())
}

fn check_unique_tags(defs: &[&Definition]) -> Result<(), String> {
    let mut owners: HashMap<u32, String> = HashMap::new();
    for def in defs {
        let name = def.full_name();
        if let Some(existing) = owners.get(&def.id) {
            if *existing != name {
                return Err(format!(
                    "constructor {:#010x} used by both {existing} and {name}",
                    def.id
                ));
            }
        } else {
            owners.insert(def.id, name);
        }
    }
    Ok(())
}

fn union_fields(
    predicates: &[Predicate<'_>],
    is_recursive: impl Fn(&Type) -> bool,
) -> Result<Vec<Field>, String> {
    let mut fields: Vec<Field> = Vec::new();
    for def in predicates.iter().flat_map(|p| &p.defs) {
        for param in &def.params {
            let Some(ty) = n::field_type(param, &is_recursive)
                .map_err(|e| format!("{}: {e}", def.full_name()))?
            else {
                continue;
            };
            let attr = n::param_attr_name(param);
            match fields.iter().find(|f| f.attr == attr) {
                Some(existing) if existing.ty != ty => {
                    return Err(format!(
                        "field `{attr}` of {} is `{}` here but `{}` elsewhere",
                        def.full_name(),
                        ty.rust(),
                        existing.ty.rust(),
                    ));
                }
                Some(_) => {}
                None => fields.push(Field { attr, ty }),
            }
        }
    }
    Ok(fields)
}

/// Whether `from` reaches `to` through non-vector object fields.
fn reaches(edges: &HashMap<String, HashSet<String>>, from: &str, to: &str) -> bool {
    let mut stack = vec![from.to_owned()];
    let mut visited = HashSet::new();
    while let Some(current) = stack.pop() {
        if current == to {
            return true;
        }
        if !visited.insert(current.clone()) {
            continue;
        }
        if let Some(next) = edges.get(&current) {
            stack.extend(next.iter().cloned());
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlcodec_parser::parse_tl_file;

    fn parse(src: &str) -> Vec<Definition> {
        parse_tl_file(src).collect::<Result<_, _>>().unwrap()
    }

    #[test]
    fn unions_fields_across_variants() {
        let defs = parse(
            "chatInviteAlready#a40e7d5e chat:MutableChat = ChatInviteExt;
             chatInvitePeek#ace3e26e chat:MutableChat expires:int = ChatInviteExt;
             mutableChat#1 id:long = MutableChat;",
        );
        let meta = Metadata::build(&defs).unwrap();
        let invite = meta.boxed.iter().find(|b| b.ty.name == "ChatInviteExt").unwrap();
        let attrs: Vec<_> = invite.group.fields.iter().map(|f| f.attr.as_str()).collect();
        assert_eq!(attrs, ["chat", "expires"]);
        assert_eq!(invite.group.predicates.len(), 2);
    }

    #[test]
    fn orders_layers_and_drops_redeclarations() {
        let defs = parse(
            "---layer 116---
             photo#fb197a65 id:long = Photo;
             ---layer 0---
             photo#d07504a5 id:long = Photo;
             ---layer 120---
             photo#fb197a65 id:long = Photo;",
        );
        let meta = Metadata::build(&defs).unwrap();
        let layers = meta.boxed[0].group.predicates[0].layers();
        assert_eq!(layers, [(0, 0xd07504a5), (116, 0xfb197a65)]);
    }

    #[test]
    fn rejects_conflicting_field_types() {
        let defs = parse(
            "a#1 x:int = T;
             b#2 x:string = T;",
        );
        assert!(Metadata::build(&defs).unwrap_err().contains("field `x`"));
    }

    #[test]
    fn rejects_shared_tags() {
        let defs = parse(
            "a#1 = T;
             b#1 = U;",
        );
        assert!(Metadata::build(&defs).unwrap_err().contains("0x00000001"));
    }

    #[test]
    fn rejects_unknown_types() {
        let defs = parse("a#1 x:Missing = T;");
        assert!(Metadata::build(&defs).unwrap_err().contains("unknown type Missing"));
    }

    #[test]
    fn boxes_recursive_fields() {
        let defs = parse(
            "node#1 flags:# next:flags.0?Node value:int = Node;
             leaf#2 value:int = Leaf;
             holder#3 leaf:Leaf = Holder;",
        );
        let meta = Metadata::build(&defs).unwrap();
        let node = meta.boxed.iter().find(|b| b.ty.name == "Node").unwrap();
        assert_eq!(node.group.field("next").unwrap().ty.rust(), "Option<Box<crate::boxed::Node>>");
        let holder = meta.boxed.iter().find(|b| b.ty.name == "Holder").unwrap();
        assert_eq!(holder.group.field("leaf").unwrap().ty.rust(), "crate::boxed::Leaf");
    }
}
