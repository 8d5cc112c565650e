//! Reader emitter (§4.G): per-record streaming reader routines plus the
//! shared value-conversion and error-raising helpers.
//!
//! Every emitted item here is written against a pull-parser contract this
//! crate does not implement — `qxg_runtime::parser::{PullParser, ReadError,
//! Position}` — the same way `async-opcua-codegen`'s emitted code calls into
//! `opcua::types::*` without the codegen crate depending on it itself.
//!
//! The host-language out-parameter convention the source spec describes
//! (`read_T(reader, out, ...)`) has no idiomatic Rust equivalent — a reader
//! here constructs its record and returns it by value, consistent with §5's
//! "every output record is constructed locally and moved into its parent's
//! field". The has-next handshake documented for groups and for the
//! complexContent base-extension call is kept as an explicit return value or
//! an explicit `reader.is_start_element()` check, exactly where §4.G calls
//! for it.

use std::collections::HashSet;

use convert_case::{Case, Casing};
use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote};
use syn::{parse_quote, Item};

use crate::{
    emit::{cyclic_record_names, declarations::record_fields, type_ident_for, vis_token},
    error::CodeGenError,
    ir::{
        AllSlot, BasicType, BasicTypeKind, Bounds, ChoiceDef, ContentDef, MemberDef, Occurs,
        Record, RecordKind, Schema, SequenceItem, SequenceSlot, TypeContent,
    },
    utils::{lower_first, safe_ident, type_ident},
};

pub fn emit_reader(schema: &Schema) -> Result<Vec<Item>, CodeGenError> {
    let cyclic = cyclic_record_names(schema);
    let vis = vis_token(schema);
    let mut items = Vec::new();

    items.push(parse_quote! {
        use qxg_runtime::parser::{ElementTextMode, PullParser, Position, ReadError};
    });
    items.push(convert_data_trait(&vis));
    for basic in &schema.basic_types {
        if let Some(item) = emit_convert_data_impl(schema, basic)? {
            items.push(item);
        }
    }
    items.extend(emit_helpers(&vis));
    items.extend(emit_read_document(schema)?);
    for record in &schema.records {
        items.push(emit_record_reader(schema, record, &cyclic, &vis)?);
    }

    Ok(items)
}

fn convert_data_trait(vis: &syn::Visibility) -> Item {
    parse_quote! {
        /// Host value coercion for a parsed attribute/text value. Generic
        /// reads (`read_content`, `read_required_attrib`, ...) go through
        /// this trait; top-level `simpleType`s override it per §4.G.
        #vis trait ConvertData: Sized {
            fn convert_data(reader: &impl PullParser, raw: &str) -> Result<Self, ReadError>;
        }
    }
}

const BUILTIN_SCALARS: &[&str] = &["String", "bool", "f32", "f64", "i32", "i64", "u32", "u64"];

fn emit_helpers(vis: &syn::Visibility) -> Vec<Item> {
    let mut items: Vec<Item> = BUILTIN_SCALARS
        .iter()
        .map(|ty| {
            let ident = Ident::new(ty, Span::call_site());
            if *ty == "String" {
                parse_quote! {
                    impl ConvertData for String {
                        fn convert_data(_reader: &impl PullParser, raw: &str) -> Result<Self, ReadError> {
                            Ok(raw.to_owned())
                        }
                    }
                }
            } else {
                parse_quote! {
                    impl ConvertData for #ident {
                        fn convert_data(reader: &impl PullParser, raw: &str) -> Result<Self, ReadError> {
                            raw.parse().map_err(|_| throw_invalid_simple(reader, raw))
                        }
                    }
                }
            }
        })
        .collect();

    items.extend([
        parse_quote! {
            #vis fn check_error(reader: &impl PullParser) -> Result<(), ReadError> {
                if reader.has_error() {
                    Err(ReadError::other(reader.position(), "pull-parser reported an error"))
                } else {
                    Ok(())
                }
            }
        },
        parse_quote! {
            #vis fn throw_child(reader: &impl PullParser, expected: &str) -> ReadError {
                ReadError::unexpected_child(
                    reader.position(),
                    reader.local_name().to_owned(),
                    expected.to_owned(),
                )
            }
        },
        parse_quote! {
            #vis fn throw_no_child(reader: &impl PullParser, expected: &str) -> ReadError {
                ReadError::no_child(reader.position(), expected.to_owned())
            }
        },
        parse_quote! {
            #vis fn throw_invalid_simple(reader: &impl PullParser, raw: &str) -> ReadError {
                ReadError::invalid_simple(reader.position(), raw.to_owned())
            }
        },
        parse_quote! {
            #vis fn throw_size_error(
                reader: &impl PullParser,
                min: u64,
                current: u64,
                exact: Option<u64>,
            ) -> ReadError {
                ReadError::size(reader.position(), min, current, exact)
            }
        },
        parse_quote! {
            #vis fn throw_invalid_enum(reader: &impl PullParser, value: &str) -> ReadError {
                ReadError::invalid_enum(reader.position(), value.to_owned())
            }
        },
        parse_quote! {
            #vis fn throw_missing_child(reader: &impl PullParser, expected: &str) -> ReadError {
                ReadError::missing_child(reader.position(), expected.to_owned())
            }
        },
        parse_quote! {
            #vis fn read_required_attrib<T: ConvertData>(
                reader: &impl PullParser,
                key: &str,
            ) -> Result<T, ReadError> {
                match reader.attribute(key) {
                    Some(raw) => T::convert_data(reader, raw),
                    None => Err(ReadError::missing_attribute(reader.position(), key.to_owned())),
                }
            }
        },
        parse_quote! {
            #vis fn read_optional_attrib<T: ConvertData>(
                reader: &impl PullParser,
                key: &str,
            ) -> Result<Option<T>, ReadError> {
                reader.attribute(key).map(|raw| T::convert_data(reader, raw)).transpose()
            }
        },
        parse_quote! {
            #vis fn read_optional_attrib_default<T: ConvertData>(
                reader: &impl PullParser,
                key: &str,
                default: &str,
            ) -> Result<T, ReadError> {
                let raw = reader.attribute(key).unwrap_or(default);
                T::convert_data(reader, raw)
            }
        },
        parse_quote! {
            #vis fn read_content<T: ConvertData>(reader: &mut impl PullParser) -> Result<T, ReadError> {
                let raw = reader.read_element_text(ElementTextMode::ErrorOnUnexpectedElement)?;
                check_error(reader)?;
                T::convert_data(reader, &raw)
            }
        },
    ]);

    items
}

fn emit_convert_data_impl(schema: &Schema, basic: &BasicType) -> Result<Option<Item>, CodeGenError> {
    let ident = type_ident(&basic.name);
    Ok(match &basic.kind {
        BasicTypeKind::Alias { .. } => None,
        BasicTypeKind::List { item_type } => {
            let item_ty = type_ident_for(schema, item_type);
            Some(parse_quote! {
                impl ConvertData for #ident {
                    fn convert_data(reader: &impl PullParser, raw: &str) -> Result<Self, ReadError> {
                        raw.split_whitespace()
                            .map(|part| <#item_ty as ConvertData>::convert_data(reader, part))
                            .collect()
                    }
                }
            })
        }
        BasicTypeKind::Union { member_types } => {
            let tys: Vec<_> = member_types.iter().map(|m| type_ident_for(schema, m)).collect();
            let n = tys.len();
            let parts: Vec<TokenStream> = (0..n)
                .map(|i| {
                    let ty = &tys[i];
                    quote! { <#ty as ConvertData>::convert_data(reader, parts[#i])? }
                })
                .collect();
            Some(parse_quote! {
                impl ConvertData for #ident {
                    fn convert_data(reader: &impl PullParser, raw: &str) -> Result<Self, ReadError> {
                        let parts: Vec<&str> = raw.split_whitespace().collect();
                        if parts.len() != #n {
                            return Err(throw_invalid_simple(reader, raw));
                        }
                        Ok((#(#parts),*))
                    }
                }
            })
        }
        BasicTypeKind::Enum { values } => {
            let arms: Vec<TokenStream> = values
                .iter()
                .map(|v| {
                    let xml_value = &v.xml_value;
                    let variant = type_ident(&v.key);
                    quote! { #xml_value => #ident::#variant }
                })
                .collect();
            Some(parse_quote! {
                impl ConvertData for #ident {
                    fn convert_data(reader: &impl PullParser, raw: &str) -> Result<Self, ReadError> {
                        Ok(match raw {
                            #(#arms),*,
                            _ => return Err(throw_invalid_enum(reader, raw)),
                        })
                    }
                }
            })
        }
    })
}

fn emit_read_document(schema: &Schema) -> Result<Vec<Item>, CodeGenError> {
    let (root_ty, dispatch) = match schema.root_elements.as_slice() {
        [] => return Err(CodeGenError::schema_shape("schema declares no top-level elements")),
        [only] => {
            let ty = type_ident_for(schema, &only.type_key);
            let read_expr = if only.is_basic_type {
                quote! { read_content::<#ty>(&mut reader) }
            } else {
                let fn_ident = record_reader_fn_ident(schema, &only.type_key);
                quote! { #fn_ident(&mut reader, false) }
            };
            (quote!(#ty), read_expr)
        }
        many => {
            let root_ident = Ident::new("Root", Span::call_site());
            let arms: Vec<TokenStream> = many
                .iter()
                .map(|el| {
                    let variant = type_ident(&el.name);
                    let ty = type_ident_for(schema, &el.type_key);
                    let name = &el.name;
                    let read_expr = if el.is_basic_type {
                        quote! { read_content::<#ty>(&mut reader)? }
                    } else {
                        let fn_ident = record_reader_fn_ident(schema, &el.type_key);
                        quote! { #fn_ident(&mut reader, false)? }
                    };
                    quote! { #name => Ok(Root::#variant(#read_expr)) }
                })
                .collect();
            (
                quote!(#root_ident),
                quote! {
                    match reader.local_name() {
                        #(#arms),*,
                        _ => Err(throw_child(&reader, "root element")),
                    }
                },
            )
        }
    };

    Ok(vec![
        parse_quote! {
            pub fn read_document<R: std::io::Read>(input: R) -> Result<#root_ty, ReadError> {
                let mut reader = qxg_runtime::parser::Reader::from_reader(input);
                if !reader.read_next_start_element()? {
                    return Err(throw_no_child(&reader, "<root>"));
                }
                #dispatch
            }
        },
        parse_quote! {
            pub fn read_document_file<P: AsRef<std::path::Path>>(path: P) -> Result<#root_ty, ReadError> {
                let file = std::fs::File::open(path.as_ref())
                    .map_err(|e| ReadError::io(path.as_ref().display().to_string(), e))?;
                read_document(file)
            }
        },
    ])
}

fn record_reader_fn_ident(schema: &Schema, type_key: &str) -> Ident {
    format_ident!("read_{}", type_ident_for(schema, type_key))
}

/// `let <TypePattern> { f1, f2 } = <value_expr>;` — flattens an inherited
/// record's own (recursively flattened) fields into local bindings with the
/// exact names our own struct literal expects.
fn destructure(
    schema: &Schema,
    type_key: &str,
    cyclic: &HashSet<String>,
    vis: &syn::Visibility,
    value: TokenStream,
) -> Result<TokenStream, CodeGenError> {
    let record = schema
        .record(type_key)
        .ok_or_else(|| CodeGenError::undefined_type(type_key))?;
    let fields = record_fields(schema, record, cyclic, vis, &mut Vec::new())?;
    let ty = type_ident_for(schema, type_key);
    let names: Vec<Ident> = fields.into_iter().map(|f| f.ident.unwrap()).collect();
    Ok(quote! {
        let #ty { #(#names),* } = #value;
    })
}

fn emit_record_reader(
    schema: &Schema,
    record: &Record,
    cyclic: &HashSet<String>,
    vis: &syn::Visibility,
) -> Result<Item, CodeGenError> {
    let fn_ident = record_reader_fn_ident(schema, record.name());
    let ty = type_ident(record.name());
    let fields = record_fields(schema, record, cyclic, vis, &mut Vec::new())?;
    let field_names: Vec<Ident> = fields.into_iter().map(|f| f.ident.unwrap()).collect();

    if let RecordKind::AttrGroup(_) = &record.kind {
        let attr_stmts = attr_stmts(record)?;
        return Ok(parse_quote! {
            #vis fn #fn_ident(reader: &impl PullParser) -> Result<#ty, ReadError> {
                #(#attr_stmts)*
                Ok(#ty { #(#field_names),* })
            }
        });
    }

    let mut pre: Vec<TokenStream> = Vec::new();

    if let RecordKind::Complex(c) = &record.kind {
        if let Some(base) = &c.base_type {
            let base_fn = record_reader_fn_ident(schema, base);
            let destructure = destructure(schema, base, cyclic, vis, quote!(__base))?;
            pre.push(quote! {
                let __base = #base_fn(reader, true)?;
                #destructure
                let mut has_next = if reader.is_start_element() {
                    true
                } else {
                    reader.read_next_start_element()?
                };
            });
        }
    }
    for g in &record.common.attr_groups {
        let group_fn = record_reader_fn_ident(schema, &g.type_key);
        if g.inherit {
            let destructure = destructure(schema, &g.type_key, cyclic, vis, quote!(__ag))?;
            pre.push(quote! {
                let __ag = #group_fn(reader)?;
                #destructure
            });
        } else {
            let member = safe_ident(g.member.as_deref().unwrap_or(&lower_first(&g.type_key))).0;
            pre.push(quote! {
                let #member = #group_fn(reader)?;
            });
        }
    }

    pre.extend(attr_stmts(record)?);

    match &record.kind {
        RecordKind::Simple(s) => {
            let member = safe_ident(&s.content_member).0;
            let host_ty = syn::parse_str::<syn::Type>(&s.content_host_type).map_err(CodeGenError::from)?;
            pre.push(quote! {
                let #member = read_content::<#host_ty>(reader)?;
            });
            Ok(parse_quote! {
                #vis fn #fn_ident(reader: &mut impl PullParser, keep_element_open: bool) -> Result<#ty, ReadError> {
                    let _ = keep_element_open;
                    #(#pre)*
                    Ok(#ty { #(#field_names),* })
                }
            })
        }
        RecordKind::Complex(c) => {
            let has_base = c.base_type.is_some();
            let content_stmts = match &c.content {
                Some(content) => content_drive_stmts(schema, record.name(), content, cyclic, has_base)?,
                None => quote! {},
            };
            Ok(parse_quote! {
                #vis fn #fn_ident(reader: &mut impl PullParser, keep_element_open: bool) -> Result<#ty, ReadError> {
                    #(#pre)*
                    #content_stmts
                    if has_next && !keep_element_open {
                        return Err(throw_child(reader, "end of element"));
                    }
                    Ok(#ty { #(#field_names),* })
                }
            })
        }
        RecordKind::Mixed(m) => {
            let member = safe_ident(&m.content_member).0;
            let host_ty = syn::parse_str::<syn::Type>(&m.content_host_type).map_err(CodeGenError::from)?;
            let content_stmts = match &m.content {
                Some(content) => content_drive_stmts(schema, record.name(), content, cyclic, true)?,
                None => quote! {},
            };
            Ok(parse_quote! {
                #vis fn #fn_ident(reader: &mut impl PullParser, keep_element_open: bool) -> Result<#ty, ReadError> {
                    #(#pre)*
                    let mut __text = String::new();
                    let mut has_next = false;
                    loop {
                        match reader.next_text_or_element()? {
                            qxg_runtime::parser::TextOrElement::Text(s) => __text.push_str(&s),
                            qxg_runtime::parser::TextOrElement::StartElement => {
                                has_next = true;
                                break;
                            }
                            qxg_runtime::parser::TextOrElement::EndElement => break,
                        }
                    }
                    // Text is only meaningful when the loop ran out at the
                    // closing tag; a `StartElement` means the text seen so
                    // far was incidental whitespace ahead of real children.
                    let #member = if has_next || __text.is_empty() { None } else {
                        Some(<#host_ty as ConvertData>::convert_data(reader, &__text)?)
                    };
                    #content_stmts
                    if has_next && !keep_element_open {
                        return Err(throw_child(reader, "end of element"));
                    }
                    Ok(#ty { #(#field_names),* })
                }
            })
        }
        RecordKind::Group(g) => {
            let content_stmts = match &g.content {
                Some(content) => content_drive_stmts(schema, record.name(), content, cyclic, true)?,
                None => quote! {},
            };
            Ok(parse_quote! {
                #vis fn #fn_ident(reader: &mut impl PullParser, has_next: bool) -> Result<(#ty, bool), ReadError> {
                    let mut has_next = has_next;
                    #(#pre)*
                    #content_stmts
                    Ok((#ty { #(#field_names),* }, has_next))
                }
            })
        }
        RecordKind::AttrGroup(_) => unreachable!("handled above"),
    }
}

fn attr_stmts(record: &Record) -> Result<Vec<TokenStream>, CodeGenError> {
    record.common.attrs.iter().map(attr_read_stmt).collect()
}

fn attr_read_stmt(attr: &MemberDef) -> Result<TokenStream, CodeGenError> {
    let member = safe_ident(&attr.member).0;
    let key = &attr.name;
    let host_ty = syn::parse_str::<syn::Type>(&attr.host_type).map_err(CodeGenError::from)?;
    Ok(if attr.required {
        quote! { let #member = read_required_attrib::<#host_ty>(reader, #key)?; }
    } else if let Some(default) = &attr.default {
        quote! { let #member = read_optional_attrib_default::<#host_ty>(reader, #key, #default)?; }
    } else {
        quote! { let #member = read_optional_attrib::<#host_ty>(reader, #key)?; }
    })
}

/// Emits the statements that drive one [`ContentDef`], in-place inside a
/// reader function body that already has `has_next`/`reader` in scope (or,
/// for the first content of a non-group, non-base-extended record,
/// establishes `has_next` itself before driving).
fn content_drive_stmts(
    schema: &Schema,
    record_name: &str,
    content: &ContentDef,
    cyclic: &HashSet<String>,
    has_next_established: bool,
) -> Result<TokenStream, CodeGenError> {
    let establish = if has_next_established {
        quote! {}
    } else {
        quote! { let mut has_next = reader.read_next_start_element()?; }
    };

    let drive = match content {
        ContentDef::Single(leaf) if leaf.is_group => group_slot_stmts(schema, leaf, Bounds::ONE)?,
        ContentDef::Single(leaf) => element_slot_stmts(schema, leaf, Bounds::ONE)?,
        ContentDef::Sequence(slots) => sequence_stmts(schema, record_name, slots, cyclic)?,
        ContentDef::Choice(choice) => choice_stmts(schema, record_name, choice, cyclic)?,
        ContentDef::All(slots) => all_stmts(schema, slots, cyclic)?,
    };

    Ok(quote! {
        #establish
        #drive
    })
}

/// Expression that, once evaluated, yields the leaf's own value (not yet
/// bound to a variable). For a group reference this also threads `has_next`
/// via reassignment inside the expression's containing block — callers that
/// need the updated flag wrap this with a `has_next = ...` statement
/// instead of a `let` binding (see [`sequence_stmts`]).
fn leaf_read_expr(schema: &Schema, leaf: &TypeContent, reader: TokenStream) -> Result<TokenStream, CodeGenError> {
    if let Some(method) = &leaf.method_ref {
        let fn_ident = format_ident!("method_{}", type_ident(&method.name));
        let params: Vec<&str> = method.params.iter().map(String::as_str).collect();
        return Ok(quote! { crate::methods::#fn_ident(#reader, &[#(#params),*])? });
    }
    // A leaf naming a scalar (a built-in or a top-level `simpleType`, never
    // itself a generated record) has no `read_<T>` function of its own; its
    // element text is read straight through the generic `read_content`.
    if leaf.is_basic_type {
        let ty = type_ident_for(schema, &leaf.type_key);
        return Ok(quote! { read_content::<#ty>(#reader)? });
    }
    let fn_ident = record_reader_fn_ident(schema, &leaf.type_key);
    Ok(if leaf.is_group {
        quote! { #fn_ident(#reader, has_next)?.0 }
    } else {
        quote! { #fn_ident(#reader, false)? }
    })
}

fn sequence_stmts(
    schema: &Schema,
    record_name: &str,
    slots: &[SequenceSlot],
    _cyclic: &HashSet<String>,
) -> Result<TokenStream, CodeGenError> {
    let _ = record_name;
    let mut stmts = Vec::new();
    for slot in slots {
        stmts.push(match &slot.item {
            SequenceItem::Leaf(leaf) if leaf.is_group => group_slot_stmts(schema, leaf, slot.bounds)?,
            SequenceItem::Leaf(leaf) => element_slot_stmts(schema, leaf, slot.bounds)?,
            SequenceItem::UnorderedChoice(choice) => unordered_choice_slot_stmts(schema, choice)?,
        });
    }
    Ok(quote! { #(#stmts)* })
}

fn group_slot_stmts(schema: &Schema, leaf: &TypeContent, bounds: Bounds) -> Result<TokenStream, CodeGenError> {
    let member = safe_ident(leaf.member.as_deref().unwrap_or(&lower_first(&leaf.name))).0;
    let fn_ident = record_reader_fn_ident(schema, &leaf.type_key);
    Ok(if bounds.is_single() {
        quote! {
            let (#member, __has_next) = #fn_ident(reader, has_next)?;
            has_next = __has_next;
        }
    } else if bounds.is_fixed() {
        let n = bounds.min as usize;
        quote! {
            let mut #member = Vec::with_capacity(#n);
            for _ in 0..#n {
                let (__item, __has_next) = #fn_ident(reader, has_next)?;
                has_next = __has_next;
                #member.push(__item);
            }
        }
    } else {
        let min = bounds.min;
        let max_check = match bounds.max {
            Occurs::Unbounded => quote! { true },
            Occurs::Count(n) => quote! { #member.len() < #n as usize },
        };
        quote! {
            let mut #member = Vec::new();
            while has_next && #max_check {
                let (__item, __has_next) = #fn_ident(reader, has_next)?;
                has_next = __has_next;
                #member.push(__item);
            }
            if (#member.len() as u64) < #min {
                return Err(throw_size_error(reader, #min, #member.len() as u64, None));
            }
        }
    })
}

fn element_slot_stmts(schema: &Schema, leaf: &TypeContent, bounds: Bounds) -> Result<TokenStream, CodeGenError> {
    let member = safe_ident(leaf.member.as_deref().unwrap_or(&lower_first(&leaf.name))).0;
    let name = &leaf.name;
    let read_expr = leaf_read_expr(schema, leaf, quote!(reader))?;

    Ok(if bounds.is_single() {
        quote! {
            if !has_next {
                return Err(throw_no_child(reader, #name));
            }
            if reader.local_name() != #name {
                return Err(throw_child(reader, #name));
            }
            let #member = #read_expr;
            has_next = reader.read_next_start_element()?;
        }
    } else if bounds.is_optional() {
        quote! {
            let mut #member = None;
            if has_next && reader.local_name() == #name {
                #member = Some(#read_expr);
                has_next = reader.read_next_start_element()?;
            }
        }
    } else {
        let min = bounds.min;
        let (reserve, max_check) = match bounds.max {
            Occurs::Unbounded => (quote! {}, quote! { true }),
            Occurs::Count(n) if n == bounds.min => {
                (quote! { Vec::with_capacity(#n as usize) }, quote! { #member.len() < #n as usize })
            }
            Occurs::Count(n) => (quote! { Vec::new() }, quote! { #member.len() < #n as usize }),
        };
        let init = if reserve.is_empty() { quote! { Vec::new() } } else { reserve };
        quote! {
            let mut #member = #init;
            while has_next && reader.local_name() == #name && #max_check {
                #member.push(#read_expr);
                has_next = reader.read_next_start_element()?;
            }
            if (#member.len() as u64) < #min {
                return Err(throw_size_error(reader, #min, #member.len() as u64, None));
            }
        }
    })
}

fn unordered_choice_slot_stmts(schema: &Schema, choice: &ChoiceDef) -> Result<TokenStream, CodeGenError> {
    let mut inits = Vec::new();
    let mut arms = Vec::new();
    for alt in &choice.alternatives {
        let member = safe_ident(alt.member.as_deref().unwrap_or(&lower_first(&alt.name))).0;
        let name = &alt.name;
        let read_expr = leaf_read_expr(schema, alt, quote!(reader))?;
        inits.push(quote! { let mut #member = Vec::new(); });
        arms.push(quote! {
            #name => { #member.push(#read_expr); matched = true; }
        });
    }
    let min = choice.bounds.min;
    let max_check = match choice.bounds.max {
        Occurs::Unbounded => quote! { true },
        Occurs::Count(n) => quote! { __total < #n },
    };
    Ok(quote! {
        #(#inits)*
        let mut __total: u64 = 0;
        while has_next && #max_check {
            let mut matched = false;
            match reader.local_name() {
                #(#arms)*
                _ => {}
            }
            if !matched {
                break;
            }
            __total += 1;
            has_next = reader.read_next_start_element()?;
        }
        if __total < #min {
            return Err(throw_size_error(reader, #min, __total, None));
        }
    })
}

fn choice_stmts(schema: &Schema, record_name: &str, choice: &ChoiceDef, _cyclic: &HashSet<String>) -> Result<TokenStream, CodeGenError> {
    let member = safe_ident(
        choice
            .member
            .as_deref()
            .expect("non-unordered choice content always carries a member (checked at build)"),
    )
    .0;
    let enum_name = format!(
        "{record_name}{}Variant",
        choice.member.as_deref().unwrap_or_default().to_case(Case::UpperCamel)
    );
    let enum_ident = type_ident(&enum_name);
    let arms: Vec<TokenStream> = choice
        .alternatives
        .iter()
        .map(|alt| -> Result<TokenStream, CodeGenError> {
            let name = &alt.name;
            let variant = type_ident(&alt.name);
            let read_expr = leaf_read_expr(schema, alt, quote!(reader))?;
            Ok(quote! { #name => #enum_ident::#variant(#read_expr) })
        })
        .collect::<Result<_, _>>()?;
    Ok(quote! {
        if !has_next {
            return Err(throw_no_child(reader, "choice alternative"));
        }
        let #member = match reader.local_name() {
            #(#arms),*,
            _ => return Err(throw_child(reader, "choice alternative")),
        };
        has_next = reader.read_next_start_element()?;
    })
}

fn all_stmts(schema: &Schema, slots: &[AllSlot], _cyclic: &HashSet<String>) -> Result<TokenStream, CodeGenError> {
    let mut inits = Vec::new();
    let mut arms = Vec::new();
    for (idx, slot) in slots.iter().enumerate() {
        let member = safe_ident(
            slot.element
                .member
                .as_deref()
                .unwrap_or(&lower_first(&slot.element.name)),
        )
        .0;
        let name = &slot.element.name;
        let read_expr = leaf_read_expr(schema, &slot.element, quote!(reader))?;
        inits.push(quote! { let mut #member = None; });
        arms.push(quote! {
            #name => {
                if __used.contains(&#idx) { break; }
                #member = Some(#read_expr);
                __used.insert(#idx);
                has_next = reader.read_next_start_element()?;
                continue;
            }
        });
    }
    let required_indices: Vec<usize> = slots
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.optional)
        .map(|(i, _)| i)
        .collect();
    let finalize: Vec<TokenStream> = slots
        .iter()
        .map(|slot| {
            let member = safe_ident(
                slot.element
                    .member
                    .as_deref()
                    .unwrap_or(&lower_first(&slot.element.name)),
            )
            .0;
            if slot.optional {
                quote! { let #member = #member; }
            } else {
                let name = &slot.element.name;
                quote! {
                    let #member = #member.ok_or_else(|| throw_missing_child(reader, #name))?;
                }
            }
        })
        .collect();
    Ok(quote! {
        #(#inits)*
        {
            let mut __used: std::collections::HashSet<usize> = std::collections::HashSet::new();
            loop {
                if !has_next { break; }
                match reader.local_name() {
                    #(#arms)*
                    _ => break,
                }
            }
            for req in [#(#required_indices),*] {
                if !__used.contains(&req) {
                    return Err(throw_missing_child(reader, "all-group member"));
                }
            }
        }
        #(#finalize)*
    })
}
