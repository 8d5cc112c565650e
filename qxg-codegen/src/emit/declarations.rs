//! Declaration emitter (§4.F): for every `BasicType` a typedef/alias/enum,
//! for every record a struct, plus the `Root` type used by the reader
//! emitter's `read_document`. Schema inheritance (`complexContent`
//! extension, inherited attribute-group/content refs) has no structural
//! counterpart in Rust, so it is flattened: an inheriting record's field set
//! is the literal union described in testable property 1, assembled by
//! walking the `inherits()` chain rather than expressed as a base class.

use std::collections::HashSet;

use convert_case::{Case, Casing};
use proc_macro2::{Ident, Span};
use syn::{parse_quote, Field, FieldsNamed, Item, ItemEnum, ItemStruct, ItemType, Type, Variant};

use crate::{
    emit::{cyclic_record_names, field_type, type_ident_for, vis_token},
    error::CodeGenError,
    ir::{
        AllSlot, BasicType, BasicTypeKind, Bounds, ChoiceDef, ContentDef, Record, RecordKind,
        Schema, SequenceItem,
    },
    utils::{lower_first, safe_ident, type_ident},
};

pub fn emit_declarations(schema: &Schema) -> Result<Vec<Item>, CodeGenError> {
    let cyclic = cyclic_record_names(schema);
    let vis = vis_token(schema);
    let mut items = Vec::new();

    for basic in &schema.basic_types {
        items.push(emit_basic_type(basic, &vis)?);
    }

    for record in &schema.records {
        let mut companions = Vec::new();
        let fields = record_fields(schema, record, &cyclic, &vis, &mut companions)?;
        items.push(Item::Struct(build_struct(record.name(), fields, &vis)));
        items.extend(companions);
    }

    items.push(emit_root(schema, &vis)?);

    Ok(items)
}

fn emit_basic_type(basic: &BasicType, vis: &syn::Visibility) -> Result<Item, CodeGenError> {
    let ident = type_ident(&basic.name);
    Ok(match &basic.kind {
        BasicTypeKind::Alias { host_type } => {
            let ty = parse_type(host_type)?;
            Item::Type(ItemType {
                attrs: Vec::new(),
                vis: vis.clone(),
                type_token: Default::default(),
                ident,
                generics: Default::default(),
                eq_token: Default::default(),
                ty: Box::new(ty),
                semi_token: Default::default(),
            })
        }
        BasicTypeKind::List { item_type } => {
            let ty = parse_type(item_type)?;
            parse_quote!(#vis type #ident = Vec<#ty>;)
        }
        BasicTypeKind::Union { member_types } => {
            let tys = member_types
                .iter()
                .map(|m| parse_type(m))
                .collect::<Result<Vec<_>, _>>()?;
            parse_quote!(#vis type #ident = (#(#tys),*);)
        }
        BasicTypeKind::Enum { values } => {
            let variants: Vec<Variant> = values
                .iter()
                .map(|v| {
                    let variant_ident = type_ident(&v.key);
                    match v.value {
                        Some(n) => {
                            let lit = proc_macro2::Literal::i64_unsuffixed(n);
                            parse_quote!(#variant_ident = #lit)
                        }
                        None => parse_quote!(#variant_ident),
                    }
                })
                .collect();
            Item::Enum(ItemEnum {
                attrs: vec![parse_quote!(#[derive(Debug, Clone, Copy, PartialEq, Eq)])],
                vis: vis.clone(),
                enum_token: Default::default(),
                ident,
                generics: Default::default(),
                brace_token: Default::default(),
                variants: variants.into_iter().collect(),
            })
        }
    })
}

fn emit_root(schema: &Schema, vis: &syn::Visibility) -> Result<Item, CodeGenError> {
    let root_ident = Ident::new("Root", Span::call_site());
    match schema.root_elements.as_slice() {
        [] => Err(CodeGenError::schema_shape(
            "schema declares no top-level elements",
        )),
        [only] => {
            let ty = type_ident_for(schema, &only.type_key);
            Ok(parse_quote!(#vis type #root_ident = #ty;))
        }
        many => {
            let variants: Vec<Variant> = many
                .iter()
                .map(|el| {
                    let variant_ident = type_ident(&el.name);
                    let ty = type_ident_for(schema, &el.type_key);
                    parse_quote!(#variant_ident(#ty))
                })
                .collect();
            Ok(Item::Enum(ItemEnum {
                attrs: vec![parse_quote!(#[derive(Debug, Clone, PartialEq)])],
                vis: vis.clone(),
                enum_token: Default::default(),
                ident: root_ident,
                generics: Default::default(),
                brace_token: Default::default(),
                variants: variants.into_iter().collect(),
            }))
        }
    }
}

fn parse_type(src: &str) -> Result<Type, CodeGenError> {
    syn::parse_str(src).map_err(CodeGenError::from)
}

fn named_field(name: &str, ty: Type, vis: &syn::Visibility) -> Field {
    let (ident, _) = safe_ident(name);
    Field {
        attrs: Vec::new(),
        vis: vis.clone(),
        mutability: syn::FieldMutability::None,
        ident: Some(ident),
        colon_token: Some(Default::default()),
        ty,
    }
}

fn build_struct(name: &str, fields: Vec<Field>, vis: &syn::Visibility) -> ItemStruct {
    ItemStruct {
        attrs: vec![parse_quote!(#[derive(Debug, Clone, PartialEq)])],
        vis: vis.clone(),
        struct_token: Default::default(),
        ident: type_ident(name),
        generics: Default::default(),
        fields: syn::Fields::Named(FieldsNamed {
            brace_token: Default::default(),
            named: fields.into_iter().collect(),
        }),
        semi_token: None,
    }
}

/// The full, flattened field set for `record`: inherited fields (base type,
/// inherited attr-groups, inherited content) followed by its own.
pub fn record_fields(
    schema: &Schema,
    record: &Record,
    cyclic: &HashSet<String>,
    vis: &syn::Visibility,
    companions: &mut Vec<Item>,
) -> Result<Vec<Field>, CodeGenError> {
    let mut fields = Vec::new();

    if let RecordKind::Complex(c) = &record.kind {
        if let Some(base) = &c.base_type {
            fields.extend(inherited_fields(schema, base, cyclic, vis)?);
        }
    }
    for g in &record.common.attr_groups {
        if g.inherit {
            fields.extend(inherited_fields(schema, &g.type_key, cyclic, vis)?);
        }
    }

    fields.extend(record_own_fields(schema, record, cyclic, vis, companions)?);
    Ok(fields)
}

fn inherited_fields(
    schema: &Schema,
    type_key: &str,
    cyclic: &HashSet<String>,
    vis: &syn::Visibility,
) -> Result<Vec<Field>, CodeGenError> {
    let record = schema
        .record(type_key)
        .ok_or_else(|| CodeGenError::undefined_type(type_key))?;
    let mut discarded = Vec::new();
    record_fields(schema, record, cyclic, vis, &mut discarded)
}

fn record_own_fields(
    schema: &Schema,
    record: &Record,
    cyclic: &HashSet<String>,
    vis: &syn::Visibility,
    companions: &mut Vec<Item>,
) -> Result<Vec<Field>, CodeGenError> {
    let mut fields = Vec::new();

    for attr in &record.common.attrs {
        let ty = parse_type(&attr.host_type)?;
        let ty = if !attr.required && attr.default.is_none() {
            parse_quote!(Option<#ty>)
        } else {
            ty
        };
        fields.push(named_field(&attr.member, ty, vis));
    }

    for g in &record.common.attr_groups {
        if !g.inherit {
            let member = g.member.clone().unwrap_or_else(|| lower_first(&g.type_key));
            fields.push(named_field(&member, field_type(schema, &g.type_key, cyclic), vis));
        }
    }

    match &record.kind {
        RecordKind::Simple(s) => {
            let ty = parse_type(&s.content_host_type)?;
            fields.push(named_field(&s.content_member, ty, vis));
        }
        RecordKind::Complex(c) => {
            if let Some(content) = &c.content {
                fields.extend(content_fields(schema, record.name(), content, cyclic, vis, companions)?);
            }
        }
        RecordKind::Mixed(m) => {
            if let Some(content) = &m.content {
                fields.extend(content_fields(schema, record.name(), content, cyclic, vis, companions)?);
            }
            let ty = parse_type(&m.content_host_type)?;
            fields.push(named_field(&m.content_member, parse_quote!(Option<#ty>), vis));
        }
        RecordKind::Group(g) => {
            if let Some(content) = &g.content {
                fields.extend(content_fields(schema, record.name(), content, cyclic, vis, companions)?);
            }
        }
        RecordKind::AttrGroup(_) => {}
    }

    Ok(fields)
}

fn content_fields(
    schema: &Schema,
    record_name: &str,
    content: &ContentDef,
    cyclic: &HashSet<String>,
    vis: &syn::Visibility,
    companions: &mut Vec<Item>,
) -> Result<Vec<Field>, CodeGenError> {
    Ok(match content {
        ContentDef::Single(leaf) => {
            if leaf.inherit {
                inherited_fields(schema, &leaf.type_key, cyclic, vis)?
            } else {
                let name = leaf.member.clone().unwrap_or_else(|| lower_first(&leaf.name));
                vec![named_field(&name, field_type(schema, &leaf.type_key, cyclic), vis)]
            }
        }
        ContentDef::Sequence(slots) => {
            let mut fields = Vec::new();
            for slot in slots {
                match &slot.item {
                    SequenceItem::Leaf(leaf) => {
                        if leaf.inherit {
                            fields.extend(inherited_fields(schema, &leaf.type_key, cyclic, vis)?);
                            continue;
                        }
                        let name = leaf.member.clone().unwrap_or_else(|| lower_first(&leaf.name));
                        let ty = field_type(schema, &leaf.type_key, cyclic);
                        let ty = if slot.bounds.is_single() {
                            ty
                        } else if slot.bounds == Bounds::OPTIONAL {
                            parse_quote!(Option<#ty>)
                        } else {
                            parse_quote!(Vec<#ty>)
                        };
                        fields.push(named_field(&name, ty, vis));
                    }
                    SequenceItem::UnorderedChoice(choice) => {
                        fields.extend(unordered_choice_fields(schema, choice, cyclic, vis));
                    }
                }
            }
            fields
        }
        ContentDef::Choice(choice) => {
            let (enum_item, enum_ty) = emit_choice_enum(schema, record_name, choice, cyclic, vis)?;
            companions.push(enum_item);
            let member = choice
                .member
                .clone()
                .expect("non-unordered choice content always carries a member (checked at build)");
            vec![named_field(&member, enum_ty, vis)]
        }
        ContentDef::All(slots) => all_fields(schema, slots, cyclic, vis),
    })
}

fn unordered_choice_fields(
    schema: &Schema,
    choice: &ChoiceDef,
    cyclic: &HashSet<String>,
    vis: &syn::Visibility,
) -> Vec<Field> {
    choice
        .alternatives
        .iter()
        .map(|alt| {
            let name = alt.member.clone().unwrap_or_else(|| lower_first(&alt.name));
            let ty = field_type(schema, &alt.type_key, cyclic);
            named_field(&name, parse_quote!(Vec<#ty>), vis)
        })
        .collect()
}

fn all_fields(schema: &Schema, slots: &[AllSlot], cyclic: &HashSet<String>, vis: &syn::Visibility) -> Vec<Field> {
    slots
        .iter()
        .map(|slot| {
            let name = slot
                .element
                .member
                .clone()
                .unwrap_or_else(|| lower_first(&slot.element.name));
            let ty = field_type(schema, &slot.element.type_key, cyclic);
            let ty = if slot.optional { parse_quote!(Option<#ty>) } else { ty };
            named_field(&name, ty, vis)
        })
        .collect()
}

fn emit_choice_enum(
    schema: &Schema,
    record_name: &str,
    choice: &ChoiceDef,
    cyclic: &HashSet<String>,
    vis: &syn::Visibility,
) -> Result<(Item, Type), CodeGenError> {
    let member = choice
        .member
        .clone()
        .expect("non-unordered choice content always carries a member (checked at build)");
    let enum_name = format!("{record_name}{}Variant", member.to_case(Case::UpperCamel));
    let ident = type_ident(&enum_name);
    let variants: Vec<Variant> = choice
        .alternatives
        .iter()
        .map(|alt| {
            let variant_ident = type_ident(&alt.name);
            let ty = field_type(schema, &alt.type_key, cyclic);
            parse_quote!(#variant_ident(#ty))
        })
        .collect();
    let item = Item::Enum(ItemEnum {
        attrs: vec![parse_quote!(#[derive(Debug, Clone, PartialEq)])],
        vis: vis.clone(),
        enum_token: Default::default(),
        ident: ident.clone(),
        generics: Default::default(),
        brace_token: Default::default(),
        variants: variants.into_iter().collect(),
    });
    Ok((item, parse_quote!(#ident)))
}
