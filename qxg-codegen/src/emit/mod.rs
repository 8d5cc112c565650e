//! Code emission: turns a built [`crate::ir::Schema`] into the declarations
//! and definitions `syn::File`s. Both emitters walk the IR twice conceptually
//! — a first pass over all records to work out which ones need special
//! handling (forward-declaration-equivalent boxing for recursive types),
//! then a second pass that actually emits — mirroring the two-level
//! `CodeGenerator::generate_types` walk this crate's reader/declaration
//! emitters are grounded on.

pub mod declarations;
pub mod reader;

use std::collections::{BTreeMap, HashSet};

use proc_macro2::Ident;
use syn::{parse_quote, Type, Visibility};

use crate::{
    annotation::builtin_scalar_type,
    ir::{Schema, TypeRef},
    ir::Visibility as ConfigVisibility,
    utils::type_ident,
};

/// Translates `qxg:config/@visibility` (§3) into the `syn::Visibility` the
/// emitters stamp onto generated items: it marks the boundary between the
/// public reader API (`read_document`/`read_document_file`, always `pub`)
/// and everything behind it — declarations and the per-type reader/helper
/// functions.
pub fn vis_token(schema: &Schema) -> Visibility {
    match schema.config.visibility {
        ConfigVisibility::Public => parse_quote!(pub),
        ConfigVisibility::Protected => parse_quote!(pub(crate)),
        ConfigVisibility::Private => Visibility::Inherited,
    }
}

/// Resolves a `type_key` to the identifier of the Rust item it names: the
/// built-in scalar's own name if it maps straight through, or the
/// `UpperCamelCase` name of the matching `BasicType`/record otherwise.
pub fn type_ident_for(schema: &Schema, type_key: &str) -> Ident {
    if let Some(builtin) = builtin_scalar_type(type_key) {
        return Ident::new(builtin, proc_macro2::Span::call_site());
    }
    match schema.resolve(type_key) {
        Some(TypeRef::Basic(b)) => type_ident(&b.name),
        Some(TypeRef::Record(r)) => type_ident(r.name()),
        None => type_ident(type_key),
    }
}

/// The `syn::Type` for a field referencing `type_key`, boxed when
/// `type_key` names a record caught up in a reference cycle.
pub fn field_type(schema: &Schema, type_key: &str, cyclic: &HashSet<String>) -> Type {
    let ident = type_ident_for(schema, type_key);
    if cyclic.contains(type_key) {
        parse_quote!(Box<#ident>)
    } else {
        parse_quote!(#ident)
    }
}

/// The set of record names that participate in a reference cycle (directly
/// or transitively, through plain — not `Vec`/`Option` — field types). A
/// Rust struct can't contain itself by value, so every field naming one of
/// these records is boxed regardless of its occurrence shape; see
/// `DESIGN.md` for the simplification this buys us over a tighter
/// occurrence-aware analysis.
pub fn cyclic_record_names(schema: &Schema) -> HashSet<String> {
    let graph: BTreeMap<&str, Vec<&str>> = schema.dependency_graph();
    let mut reachable: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
    for &node in graph.keys() {
        let mut seen = HashSet::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            if let Some(deps) = graph.get(n) {
                for &d in deps {
                    if graph.contains_key(d) && seen.insert(d) {
                        stack.push(d);
                    }
                }
            }
        }
        reachable.insert(node, seen);
    }
    reachable
        .into_iter()
        .filter(|(node, reach)| reach.contains(node))
        .map(|(node, _)| node.to_owned())
        .collect()
}
