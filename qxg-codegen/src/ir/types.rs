use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Protected
    }
}

#[derive(Debug, Clone)]
pub struct Include {
    pub path: String,
    pub is_local: bool,
}

/// Singleton per run; parsed from the root's `qxg:config` child by
/// [`crate::config`].
#[derive(Debug, Clone)]
pub struct Config {
    pub class_name: String,
    pub prefix: Option<String>,
    pub namespace: Option<String>,
    pub visibility: Visibility,
    pub std_compat: bool,
    pub includes: Vec<Include>,
    pub schema_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
/// `min ∈ ℕ`, `max ∈ ℕ ∪ {∞}`.
pub enum Occurs {
    Count(u64),
    Unbounded,
}

impl Occurs {
    pub fn is_one(&self) -> bool {
        matches!(self, Occurs::Count(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: u64,
    pub max: Occurs,
}

impl Bounds {
    pub const ONE: Bounds = Bounds {
        min: 1,
        max: Occurs::Count(1),
    };
    pub const OPTIONAL: Bounds = Bounds {
        min: 0,
        max: Occurs::Count(1),
    };

    pub fn is_single(&self) -> bool {
        *self == Self::ONE
    }

    pub fn is_optional(&self) -> bool {
        *self == Self::OPTIONAL
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.max, Occurs::Count(n) if n == self.min)
    }
}

#[derive(Debug, Clone)]
pub struct EnumValue {
    pub xml_value: String,
    pub key: String,
    pub value: Option<i64>,
}

#[derive(Debug, Clone)]
pub enum BasicTypeKind {
    Alias { host_type: String },
    List { item_type: String },
    Union { member_types: Vec<String> },
    Enum { values: Vec<EnumValue> },
}

#[derive(Debug, Clone)]
pub struct BasicType {
    pub name: String,
    pub kind: BasicTypeKind,
}

#[derive(Debug, Clone)]
pub struct MemberDef {
    pub name: String,
    pub member: String,
    pub xml_type: String,
    pub host_type: String,
    pub required: bool,
    pub default: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AttrGroupRef {
    pub type_key: String,
    pub member: Option<String>,
    pub inherit: bool,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub return_type: String,
    pub as_group: bool,
    pub params: Vec<String>,
}

#[derive(Debug, Clone)]
/// A leaf reference to an element or group inside a `ContentDef`.
pub struct TypeContent {
    pub is_group: bool,
    pub name: String,
    pub member: Option<String>,
    pub type_key: String,
    pub inherit: bool,
    pub is_basic_type: bool,
    pub method_ref: Option<MethodDecl>,
}

#[derive(Debug, Clone)]
pub enum SequenceItem {
    Leaf(TypeContent),
    UnorderedChoice(ChoiceDef),
}

#[derive(Debug, Clone)]
pub struct SequenceSlot {
    pub bounds: Bounds,
    pub item: SequenceItem,
}

#[derive(Debug, Clone)]
pub struct ChoiceDef {
    pub member: Option<String>,
    pub unordered: bool,
    pub bounds: Bounds,
    pub alternatives: Vec<TypeContent>,
}

#[derive(Debug, Clone)]
pub struct AllSlot {
    pub optional: bool,
    pub element: TypeContent,
}

#[derive(Debug, Clone)]
pub enum ContentDef {
    Sequence(Vec<SequenceSlot>),
    Choice(ChoiceDef),
    All(Vec<AllSlot>),
    /// A bare `(1,1)` element or group directly inside the parent, with no
    /// enclosing `sequence`/`choice`/`all`.
    Single(TypeContent),
}

#[derive(Debug, Clone)]
pub struct RecordCommon {
    pub name: String,
    pub attrs: Vec<MemberDef>,
    pub attr_groups: Vec<AttrGroupRef>,
    pub declare: bool,
}

#[derive(Debug, Clone)]
pub struct SimpleTypeDef {
    pub content_xml_type: String,
    pub content_host_type: String,
    pub content_member: String,
}

#[derive(Debug, Clone)]
pub struct ComplexTypeDef {
    pub base_type: Option<String>,
    pub content: Option<ContentDef>,
}

#[derive(Debug, Clone)]
pub struct MixedTypeDef {
    pub content: Option<ContentDef>,
    pub content_host_type: String,
    pub content_member: String,
}

#[derive(Debug, Clone)]
pub struct GroupTypeDef {
    pub content: Option<ContentDef>,
}

#[derive(Debug, Clone, Default)]
pub struct AttrGroupTypeDef {}

#[derive(Debug, Clone)]
pub enum RecordKind {
    Simple(SimpleTypeDef),
    Complex(ComplexTypeDef),
    Mixed(MixedTypeDef),
    Group(GroupTypeDef),
    AttrGroup(AttrGroupTypeDef),
}

#[derive(Debug, Clone)]
pub struct Record {
    pub common: RecordCommon,
    pub kind: RecordKind,
}

impl Record {
    pub fn name(&self) -> &str {
        &self.common.name
    }

    /// Base list in emission order: base type (if `complexContent/extension`)
    /// ++ inherited attr-group type keys ++ inherited content-leaf type
    /// keys, deduplicated.
    pub fn inherits(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let RecordKind::Complex(c) = &self.kind {
            if let Some(base) = &c.base_type {
                out.push(base.clone());
            }
        }
        for g in &self.common.attr_groups {
            if g.inherit {
                out.push(g.type_key.clone());
            }
        }
        let content = match &self.kind {
            RecordKind::Complex(c) => c.content.as_ref(),
            RecordKind::Mixed(m) => m.content.as_ref(),
            RecordKind::Group(g) => g.content.as_ref(),
            _ => None,
        };
        if let Some(content) = content {
            collect_inherited_leaves(content, &mut out);
        }
        let mut seen = std::collections::HashSet::new();
        out.retain(|k| seen.insert(k.clone()));
        out
    }
}

fn collect_inherited_leaves(content: &ContentDef, out: &mut Vec<String>) {
    match content {
        ContentDef::Single(leaf) if leaf.inherit => out.push(leaf.type_key.clone()),
        ContentDef::Single(_) => {}
        ContentDef::Sequence(slots) => {
            for slot in slots {
                if let SequenceItem::Leaf(leaf) = &slot.item {
                    if leaf.inherit {
                        out.push(leaf.type_key.clone());
                    }
                }
            }
        }
        ContentDef::Choice(_) | ContentDef::All(_) => {}
    }
}

#[derive(Debug, Clone, Copy)]
pub enum TypeRef<'a> {
    Basic(&'a BasicType),
    Record(&'a Record),
}

/// The full IR for one generator invocation: built once by
/// [`crate::builder::SchemaBuilder`], never mutated afterwards, consumed
/// twice by the two emitters.
#[derive(Debug, Clone)]
pub struct Schema {
    pub config: Config,
    pub basic_types: Vec<BasicType>,
    pub records: Vec<Record>,
    pub root_elements: Vec<TypeContent>,
    pub methods: Vec<MethodDecl>,
}

impl Schema {
    pub fn basic_type(&self, name: &str) -> Option<&BasicType> {
        self.basic_types.iter().find(|t| t.name == name)
    }

    pub fn record(&self, name: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.name() == name)
    }

    pub fn resolve(&self, name: &str) -> Option<TypeRef<'_>> {
        if let Some(b) = self.basic_type(name) {
            return Some(TypeRef::Basic(b));
        }
        self.record(name).map(TypeRef::Record)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDecl> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Dependency graph over record names, used by the declaration emitter's
    /// first pass to decide which records need a forward declaration.
    pub fn dependency_graph(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut graph = BTreeMap::new();
        for record in &self.records {
            graph.insert(record.name(), record_dependencies(record));
        }
        graph
    }
}

fn record_dependencies(record: &Record) -> Vec<&str> {
    let mut deps = Vec::new();
    if let RecordKind::Complex(c) = &record.kind {
        if let Some(base) = &c.base_type {
            deps.push(base.as_str());
        }
    }
    for g in &record.common.attr_groups {
        deps.push(g.type_key.as_str());
    }
    let content = match &record.kind {
        RecordKind::Complex(c) => c.content.as_ref(),
        RecordKind::Mixed(m) => m.content.as_ref(),
        RecordKind::Group(g) => g.content.as_ref(),
        _ => None,
    };
    if let Some(content) = content {
        push_content_deps(content, &mut deps);
    }
    deps
}

fn push_content_deps<'a>(content: &'a ContentDef, deps: &mut Vec<&'a str>) {
    match content {
        ContentDef::Single(leaf) => deps.push(leaf.type_key.as_str()),
        ContentDef::Sequence(slots) => {
            for slot in slots {
                match &slot.item {
                    SequenceItem::Leaf(leaf) => deps.push(leaf.type_key.as_str()),
                    SequenceItem::UnorderedChoice(choice) => {
                        for alt in &choice.alternatives {
                            deps.push(alt.type_key.as_str());
                        }
                    }
                }
            }
        }
        ContentDef::Choice(choice) => {
            for alt in &choice.alternatives {
                deps.push(alt.type_key.as_str());
            }
        }
        ContentDef::All(slots) => {
            for slot in slots {
                deps.push(slot.element.type_key.as_str());
            }
        }
    }
}
