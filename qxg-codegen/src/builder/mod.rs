//! One-pass recursive descent building the [`crate::ir::Schema`] from a raw
//! `xs:schema` node. Semantic validation (§4.E) is folded in: invariant
//! violations raise immediately, there is no repair/recovery path.

use std::path::Path;

use qxg_xml::{uint_attr, value_from_attr, value_from_attr_opt, value_from_ns_attr_opt, XsdNodeExt};
use roxmltree::{Document, Node};

use crate::{
    annotation::{annotation_bool, annotation_str, annotation_type, local_name_of},
    config,
    error::CodeGenError,
    ir::*,
    ns::QXG_NAMESPACE,
    utils::lower_first,
};

pub struct SchemaBuilder {
    methods: Vec<MethodDecl>,
}

impl SchemaBuilder {
    pub fn build(xsd_text: &str, input_path: &Path) -> Result<Schema, CodeGenError> {
        let document =
            Document::parse(xsd_text).map_err(|e| CodeGenError::from(qxg_xml::XsdError::from_roxmltree(e)))?;
        let root = document.root_element();
        if !is_xsd_element(&root, "schema") {
            return Err(CodeGenError::schema_shape("root element is not xs:schema")
                .in_file(input_path.display().to_string()));
        }

        let config = config::load_config(&root, input_path)?;

        let mut builder = SchemaBuilder {
            methods: Vec::new(),
        };

        for child in root.children().filter(Node::is_element) {
            if is_qxg_element(&child, "method") {
                let method = builder.read_method(&child)?;
                builder.methods.push(method);
            }
        }

        let mut basic_types = Vec::new();
        let mut records = Vec::new();
        let mut root_elements = Vec::new();

        for child in root.children().filter(Node::is_element) {
            if is_qxg_element(&child, "method") {
                continue;
            }
            if child.tag_name().namespace() == Some(QXG_NAMESPACE) {
                continue;
            }
            match child.tag_name().name() {
                "complexType" => records.push(builder.read_type(&child)?),
                "simpleType" => {
                    if let Some(basic) = builder.read_simple_type(&child)? {
                        basic_types.push(basic);
                    }
                }
                "element" => root_elements.push(builder.read_type_content(&child, false)?),
                "group" => records.push(builder.read_group(&child)?),
                "attributeGroup" => records.push(builder.read_attr_group(&child)?),
                other => {
                    return Err(CodeGenError::schema_shape(format!(
                        "unsupported top-level schema child: {other}"
                    ))
                    .in_file(input_path.display().to_string()))
                }
            }
        }

        Ok(Schema {
            config,
            basic_types,
            records,
            root_elements,
            methods: builder.methods,
        })
    }

    fn read_method(&self, node: &Node<'_, '_>) -> Result<MethodDecl, CodeGenError> {
        Ok(MethodDecl {
            name: value_from_attr(node, "name")?,
            return_type: value_from_attr(node, "type")?,
            as_group: value_from_attr_opt(node, "asGroup")?.unwrap_or(false),
            params: node
                .with_name("param")
                .map(|p| p.try_contents().map(str::to_owned))
                .collect::<Result<_, _>>()?,
        })
    }

    fn read_type(&self, node: &Node<'_, '_>) -> Result<Record, CodeGenError> {
        let name: String = value_from_attr(node, "name")?;
        let declare = annotation_bool(node, "declare", false)?;
        let mixed = value_from_attr_opt::<bool>(node, "mixed")?.unwrap_or(false);

        if let Some(simple_content) = first_xsd_child(node, "simpleContent") {
            let ext = first_xsd_child(&simple_content, "extension").ok_or_else(|| {
                CodeGenError::schema_shape("simpleContent requires an extension child")
            })?;
            let base: String = value_from_attr(&ext, "base")?;
            let content_xml_type = local_name_of(&base).to_owned();
            let content_host_type = annotation_type(&ext, "type", &content_xml_type)?;
            let content_member = annotation_str(&ext, "member", "value")?;
            let (attrs, attr_groups) = self.read_attribs(&ext)?;
            return Ok(Record {
                common: RecordCommon {
                    name,
                    attrs,
                    attr_groups,
                    declare,
                },
                kind: RecordKind::Simple(SimpleTypeDef {
                    content_xml_type,
                    content_host_type,
                    content_member,
                }),
            });
        }

        if let Some(complex_content) = first_xsd_child(node, "complexContent") {
            let ext = first_xsd_child(&complex_content, "extension").ok_or_else(|| {
                CodeGenError::schema_shape("complexContent requires an extension child")
            })?;
            let base: String = value_from_attr(&ext, "base")?;
            let (attrs, attr_groups) = self.read_attribs(&ext)?;
            let content = self.read_single_content(&ext)?;
            if mixed {
                return Err(CodeGenError::schema_shape(
                    "a mixed type may not extend a base type",
                ));
            }
            return Ok(Record {
                common: RecordCommon {
                    name,
                    attrs,
                    attr_groups,
                    declare,
                },
                kind: RecordKind::Complex(ComplexTypeDef {
                    base_type: Some(local_name_of(&base).to_owned()),
                    content,
                }),
            });
        }

        let (attrs, attr_groups) = self.read_attribs(node)?;
        let content = self.read_single_content(node)?;
        let common = RecordCommon {
            name,
            attrs,
            attr_groups,
            declare,
        };
        if mixed {
            Ok(Record {
                common,
                kind: RecordKind::Mixed(MixedTypeDef {
                    content,
                    content_host_type: annotation_type(node, "textType", "string")?,
                    content_member: annotation_str(node, "textMember", "text")?,
                }),
            })
        } else {
            Ok(Record {
                common,
                kind: RecordKind::Complex(ComplexTypeDef {
                    base_type: None,
                    content,
                }),
            })
        }
    }

    fn read_simple_type(&self, node: &Node<'_, '_>) -> Result<Option<BasicType>, CodeGenError> {
        let Some(name): Option<String> = value_from_attr_opt(node, "name")? else {
            return Ok(None);
        };

        if let Some(list) = first_xsd_child(node, "list") {
            let item_type: String = value_from_attr(&list, "itemType")?;
            return Ok(Some(BasicType {
                name,
                kind: BasicTypeKind::List {
                    item_type: annotation_type(&list, "type", local_name_of(&item_type))?,
                },
            }));
        }

        if let Some(union) = first_xsd_child(node, "union") {
            let member_types: String = value_from_attr(&union, "memberTypes")?;
            let member_types = member_types
                .split_whitespace()
                .map(|m| local_name_of(m).to_owned())
                .collect();
            return Ok(Some(BasicType {
                name,
                kind: BasicTypeKind::Union { member_types },
            }));
        }

        if let Some(restriction) = first_xsd_child(node, "restriction") {
            let base: Option<String> = value_from_attr_opt(&restriction, "base")?;
            let enumerations: Vec<Node<'_, '_>> = restriction.with_name("enumeration").collect();
            if !enumerations.is_empty() {
                let values = enumerations
                    .into_iter()
                    .map(|e| {
                        let xml_value: String = value_from_attr(&e, "value")?;
                        let key = annotation_str(&e, "key", &xml_value)?;
                        let value = value_from_ns_attr_opt::<i64>(&e, QXG_NAMESPACE, "value")?;
                        Ok(EnumValue {
                            xml_value,
                            key,
                            value,
                        })
                    })
                    .collect::<Result<_, qxg_xml::XsdError>>()?;
                return Ok(Some(BasicType {
                    name,
                    kind: BasicTypeKind::Enum { values },
                }));
            }
            let base = base.unwrap_or_else(|| "string".to_owned());
            return Ok(Some(BasicType {
                name,
                kind: BasicTypeKind::Alias {
                    host_type: annotation_type(&restriction, "type", local_name_of(&base))?,
                },
            }));
        }

        Err(CodeGenError::schema_shape(format!(
            "simpleType {name} has no list/union/restriction content"
        )))
    }

    fn read_group(&self, node: &Node<'_, '_>) -> Result<Record, CodeGenError> {
        let name: String = value_from_attr(node, "name")?;
        let declare = annotation_bool(node, "declare", false)?;
        let content = self.read_single_content(node)?;
        Ok(Record {
            common: RecordCommon {
                name,
                attrs: Vec::new(),
                attr_groups: Vec::new(),
                declare,
            },
            kind: RecordKind::Group(GroupTypeDef { content }),
        })
    }

    fn read_attr_group(&self, node: &Node<'_, '_>) -> Result<Record, CodeGenError> {
        let name: String = value_from_attr(node, "name")?;
        let declare = annotation_bool(node, "declare", false)?;
        let (attrs, attr_groups) = self.read_attribs(node)?;
        Ok(Record {
            common: RecordCommon {
                name,
                attrs,
                attr_groups,
                declare,
            },
            kind: RecordKind::AttrGroup(AttrGroupTypeDef::default()),
        })
    }

    /// Produces `(members, attr_group_refs)` from `xs:attribute` and
    /// `xs:attributeGroup` children, in document order.
    fn read_attribs(
        &self,
        node: &Node<'_, '_>,
    ) -> Result<(Vec<MemberDef>, Vec<AttrGroupRef>), CodeGenError> {
        let mut attrs = Vec::new();
        let mut attr_groups = Vec::new();
        for child in node.children().filter(Node::is_element) {
            if !is_xsd_namespace_node(&child) {
                continue;
            }
            match child.tag_name().name() {
                "attribute" => attrs.push(self.read_attribute(&child)?),
                "attributeGroup" => attr_groups.push(self.read_attr_group_ref(&child)?),
                _ => {}
            }
        }
        Ok((attrs, attr_groups))
    }

    fn read_attribute(&self, node: &Node<'_, '_>) -> Result<MemberDef, CodeGenError> {
        let name: String = value_from_attr(node, "name")?;
        let use_str: Option<String> = value_from_attr_opt(node, "use")?;
        let required = use_str.as_deref() == Some("required");
        let default: Option<String> = value_from_attr_opt(node, "default")?;
        let xml_type_raw: String =
            value_from_attr_opt(node, "type")?.unwrap_or_else(|| "string".to_owned());
        let xml_type = local_name_of(&xml_type_raw).to_owned();
        let host_type = annotation_type(node, "type", &xml_type)?;
        let member = annotation_str(node, "member", &lower_first(&name))?;
        Ok(MemberDef {
            name,
            member,
            xml_type,
            host_type,
            required,
            default,
        })
    }

    fn read_attr_group_ref(&self, node: &Node<'_, '_>) -> Result<AttrGroupRef, CodeGenError> {
        let r#ref: String = value_from_attr(node, "ref")?;
        let type_key = local_name_of(&r#ref).to_owned();
        let inherit = annotation_bool(node, "inherit", false)?;
        let member = if inherit {
            None
        } else {
            annotation_attr_opt(node, "member")?
        };
        if !inherit && member.is_none() {
            return Err(CodeGenError::schema_shape(format!(
                "attribute group reference to {type_key} must set qxg:member or qxg:inherit"
            )));
        }
        Ok(AttrGroupRef {
            type_key,
            member,
            inherit,
        })
    }

    /// `read_single_content`: probes `sequence`, `choice`, `all`, `element`,
    /// `group` in that order.
    fn read_single_content(&self, node: &Node<'_, '_>) -> Result<Option<ContentDef>, CodeGenError> {
        if let Some(seq) = first_xsd_child(node, "sequence") {
            return Ok(Some(ContentDef::Sequence(self.read_sequence_content(&seq)?)));
        }
        if let Some(choice) = first_xsd_child(node, "choice") {
            return Ok(Some(self.read_choice_as_content(&choice)?));
        }
        if let Some(all) = first_xsd_child(node, "all") {
            return Ok(Some(ContentDef::All(self.read_all_content(&all)?)));
        }
        if let Some(el) = first_xsd_child(node, "element") {
            return Ok(Some(self.wrap_single_leaf(&el, false)?));
        }
        if let Some(group) = first_xsd_child(node, "group") {
            return Ok(Some(self.wrap_single_leaf(&group, true)?));
        }
        Ok(None)
    }

    fn read_choice_as_content(&self, choice: &Node<'_, '_>) -> Result<ContentDef, CodeGenError> {
        let bounds = read_bounds(choice)?;
        let unordered = annotation_bool(choice, "unordered", false)?;
        let def = self.read_choice_def(choice, unordered, bounds)?;
        if unordered || !bounds.is_single() {
            // A repeated choice can only be stored as one list per
            // alternative, exactly like an unordered choice; wrap it in a
            // synthetic one-slot sequence so the reader emitter sees a
            // uniform `Sequence` driving loop (§4.G).
            return Ok(ContentDef::Sequence(vec![SequenceSlot {
                bounds,
                item: SequenceItem::UnorderedChoice(def),
            }]));
        }
        if def.member.is_none() {
            return Err(CodeGenError::schema_shape(
                "a non-unordered choice must carry an explicit qxg:member",
            ));
        }
        Ok(ContentDef::Choice(def))
    }

    fn read_choice_def(
        &self,
        choice: &Node<'_, '_>,
        unordered: bool,
        bounds: Bounds,
    ) -> Result<ChoiceDef, CodeGenError> {
        let member = annotation_attr_opt(choice, "member")?;
        let mut alternatives = Vec::new();
        for child in choice.children().filter(Node::is_element) {
            if !is_xsd_namespace_node(&child) {
                continue;
            }
            match child.tag_name().name() {
                "element" => alternatives.push(self.read_type_content(&child, false)?),
                "group" => alternatives.push(self.read_type_content(&child, true)?),
                other => {
                    return Err(CodeGenError::schema_shape(format!(
                        "a choice may not directly contain {other}; only element/group alternatives are supported"
                    )))
                }
            }
        }
        Ok(ChoiceDef {
            member,
            unordered,
            bounds,
            alternatives,
        })
    }

    fn read_sequence_content(&self, seq: &Node<'_, '_>) -> Result<Vec<SequenceSlot>, CodeGenError> {
        let mut slots = Vec::new();
        for child in seq.children().filter(Node::is_element) {
            if !is_xsd_namespace_node(&child) {
                continue;
            }
            match child.tag_name().name() {
                "element" => {
                    let bounds = read_bounds(&child)?;
                    let leaf = self.read_type_content(&child, false)?;
                    if leaf.inherit && !bounds.is_single() {
                        return Err(CodeGenError::schema_shape(
                            "qxg:inherit requires a (1,1) occurrence",
                        ));
                    }
                    slots.push(SequenceSlot {
                        bounds,
                        item: SequenceItem::Leaf(leaf),
                    });
                }
                "group" => {
                    let bounds = read_bounds(&child)?;
                    if !bounds.is_single() && !bounds.is_fixed() {
                        return Err(CodeGenError::schema_shape(
                            "a group reference inside a sequence must have fixed-arity occurrence",
                        ));
                    }
                    let leaf = self.read_type_content(&child, true)?;
                    if leaf.inherit && !bounds.is_single() {
                        return Err(CodeGenError::schema_shape(
                            "qxg:inherit requires a (1,1) occurrence",
                        ));
                    }
                    slots.push(SequenceSlot {
                        bounds,
                        item: SequenceItem::Leaf(leaf),
                    });
                }
                "choice" => {
                    let bounds = read_bounds(&child)?;
                    let unordered = annotation_bool(&child, "unordered", false)?;
                    let def = self.read_choice_def(&child, unordered, bounds)?;
                    if unordered {
                        slots.push(SequenceSlot {
                            bounds,
                            item: SequenceItem::UnorderedChoice(def),
                        });
                    } else if bounds.is_single() && def.member.is_some() {
                        return Err(CodeGenError::schema_shape(
                            "a non-unordered choice nested in a sequence is not supported; wrap it in a group",
                        ));
                    } else {
                        return Err(CodeGenError::schema_shape(
                            "a choice nested in a sequence must set qxg:unordered=\"true\"",
                        ));
                    }
                }
                "sequence" => {
                    let bounds = read_bounds(&child)?;
                    if !bounds.is_single() {
                        return Err(CodeGenError::schema_shape(
                            "a sequence may not directly contain another sequence with a non-(1,1) occurrence; wrap it in a group",
                        ));
                    }
                    // A (1,1) nested sequence is equivalent to inlining its slots.
                    slots.extend(self.read_sequence_content(&child)?);
                }
                other => {
                    return Err(CodeGenError::schema_shape(format!(
                        "unsupported sequence member: {other}"
                    )))
                }
            }
        }
        Ok(slots)
    }

    fn read_all_content(&self, all: &Node<'_, '_>) -> Result<Vec<AllSlot>, CodeGenError> {
        let mut slots = Vec::new();
        for child in all.children().filter(Node::is_element) {
            if !is_xsd_namespace_node(&child) {
                continue;
            }
            if child.tag_name().name() != "element" {
                return Err(CodeGenError::schema_shape(
                    "xs:all may only directly contain xs:element",
                ));
            }
            let bounds = read_bounds(&child)?;
            if !(bounds == Bounds::ONE || bounds == Bounds::OPTIONAL) {
                return Err(CodeGenError::schema_shape(
                    "elements inside xs:all must have occurrence (0,1) or (1,1)",
                ));
            }
            let element = self.read_type_content(&child, false)?;
            slots.push(AllSlot {
                optional: bounds == Bounds::OPTIONAL,
                element,
            });
        }
        Ok(slots)
    }

    fn wrap_single_leaf(&self, node: &Node<'_, '_>, is_group: bool) -> Result<ContentDef, CodeGenError> {
        let bounds = read_bounds(node)?;
        let leaf = self.read_type_content(node, is_group)?;
        if bounds.is_single() {
            return Ok(ContentDef::Single(leaf));
        }
        if leaf.inherit {
            return Err(CodeGenError::schema_shape(
                "qxg:inherit requires a (1,1) occurrence",
            ));
        }
        Ok(ContentDef::Sequence(vec![SequenceSlot {
            bounds,
            item: SequenceItem::Leaf(leaf),
        }]))
    }

    /// `read_type_content`: extracts `name`, `member`, `type_key`, and
    /// `is_basic_type`, attaching a `qxg:method` override when present.
    fn read_type_content(&self, node: &Node<'_, '_>, is_group: bool) -> Result<TypeContent, CodeGenError> {
        let name: String = if is_group {
            value_from_attr(node, "ref")?
        } else {
            value_from_attr_opt(node, "ref")?
                .or(value_from_attr_opt(node, "name")?)
                .ok_or_else(|| CodeGenError::missing_required_value("name or ref"))?
        };
        let xml_type_raw: Option<String> = value_from_attr_opt(node, "type")?;
        let type_key = local_name_of(xml_type_raw.as_deref().unwrap_or(&name)).to_owned();
        let member = annotation_attr_opt(node, "member")?.or_else(|| Some(lower_first(&name)));
        let inherit = annotation_bool(node, "inherit", false)?;
        let is_basic_type = annotation_bool(node, "basicType", false)?
            || crate::annotation::builtin_scalar_type(&type_key).is_some();

        let method_ref = match annotation_attr_opt(node, "method")? {
            Some(method_name) => Some(
                self.methods
                    .iter()
                    .find(|m| m.name == method_name)
                    .cloned()
                    .ok_or_else(|| CodeGenError::undefined_method(method_name))?,
            ),
            None => None,
        };

        Ok(TypeContent {
            is_group,
            name,
            member,
            type_key,
            inherit,
            is_basic_type,
            method_ref,
        })
    }
}

fn is_xsd_element(node: &Node<'_, '_>, name: &str) -> bool {
    node.tag_name().name() == name
        && node
            .tag_name()
            .namespace()
            .is_some_and(qxg_xml::schema::is_xsd_namespace)
}

fn is_xsd_namespace_node(node: &Node<'_, '_>) -> bool {
    node.tag_name()
        .namespace()
        .is_some_and(qxg_xml::schema::is_xsd_namespace)
}

fn is_qxg_element(node: &Node<'_, '_>, name: &str) -> bool {
    node.tag_name().name() == name && node.tag_name().namespace() == Some(QXG_NAMESPACE)
}

fn first_xsd_child<'a, 'input>(node: &Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| is_xsd_element(n, name))
}

fn read_bounds(node: &Node<'_, '_>) -> Result<Bounds, CodeGenError> {
    let min = uint_attr(node, "minOccurs")?.unwrap_or(1);
    let max = match node.attribute("maxOccurs") {
        Some("unbounded") => Occurs::Unbounded,
        Some(v) => Occurs::Count(
            v.parse()
                .map_err(|e| CodeGenError::parse_int("maxOccurs", e))?,
        ),
        None => Occurs::Count(1),
    };
    Ok(Bounds { min, max })
}

fn annotation_attr_opt(node: &Node<'_, '_>, attr: &str) -> Result<Option<String>, CodeGenError> {
    Ok(value_from_ns_attr_opt(node, QXG_NAMESPACE, attr)?)
}
