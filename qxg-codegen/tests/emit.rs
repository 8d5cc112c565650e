//! Declaration/reader emission smoke tests that aren't already covered by
//! a literal S1-S6 scenario: basic-type aliases (List/Union/Enum/Alias),
//! multi-root dispatch, group has-next threading, and the `AttrGroup`
//! inherit-vs-member field shapes.

use std::path::Path;

use qxg_codegen::{
    builder::SchemaBuilder,
    emit::{declarations::emit_declarations, reader::emit_reader},
    validate::validate,
};
use syn::Item;

const XSD_NS: &str = r#"xmlns:xs="http://www.w3.org/2001/XMLSchema""#;
const QXG_NS: &str = r#"xmlns:qxg="https://skycoder42.de/xml/schemas/QXmlCodeGen""#;

fn build_and_render(xsd: &str) -> (String, String) {
    let schema = SchemaBuilder::build(xsd, Path::new("t.xsd")).unwrap();
    validate(&schema).unwrap();
    let render = |items: Vec<Item>| {
        prettyplease::unparse(&syn::File {
            shebang: None,
            attrs: Vec::new(),
            items,
        })
    };
    (
        render(emit_declarations(&schema).unwrap()),
        render(emit_reader(&schema).unwrap()),
    )
}

#[test]
fn basic_type_list_and_union_aliases() {
    let xsd = format!(
        r#"<xs:schema {XSD_NS}>
            <xs:element name="R" type="xs:string"/>
            <xs:simpleType name="IntList">
                <xs:list itemType="xs:int"/>
            </xs:simpleType>
            <xs:simpleType name="Pair">
                <xs:union memberTypes="xs:int xs:string"/>
            </xs:simpleType>
        </xs:schema>"#
    );
    let (decls, reader) = build_and_render(&xsd);

    assert!(decls.contains("pub type IntList = Vec < i64 >") || decls.contains("pub type IntList = Vec<i64>"));
    assert!(decls.contains("pub type Pair = (i64, String)") || decls.contains("pub type Pair = (i64 , String)"));

    // List/Union get their own ConvertData impl; Alias does not (inherits
    // the generic fallback, per §4.G).
    assert!(reader.contains("impl ConvertData for IntList"));
    assert!(reader.contains("impl ConvertData for Pair"));
    assert!(reader.contains("split_whitespace"));
}

#[test]
fn multi_root_emits_root_enum_and_dispatch() {
    let xsd = format!(
        r#"<xs:schema {XSD_NS}>
            <xs:element name="First" type="xs:string"/>
            <xs:element name="Second" type="xs:int"/>
        </xs:schema>"#
    );
    let (decls, reader) = build_and_render(&xsd);

    assert!(decls.contains("pub enum Root"));
    assert!(decls.contains("First (String)") || decls.contains("First(String)"));
    assert!(decls.contains("Second (i64)") || decls.contains("Second(i64)"));

    assert!(reader.contains("match reader . local_name ()") || reader.contains("match reader.local_name()"));
    assert!(reader.contains("Root :: First") || reader.contains("Root::First"));
}

#[test]
fn group_reader_threads_has_next_as_a_tuple_return() {
    let xsd = format!(
        r#"<xs:schema {XSD_NS}>
            <xs:element name="R" type="T"/>
            <xs:group name="G">
                <xs:sequence>
                    <xs:element name="g1" type="xs:int"/>
                </xs:sequence>
            </xs:group>
            <xs:complexType name="T">
                <xs:sequence>
                    <xs:group ref="G"/>
                </xs:sequence>
            </xs:complexType>
        </xs:schema>"#
    );
    let (_decls, reader) = build_and_render(&xsd);

    assert!(reader.contains("fn read_G (reader : & mut impl PullParser , has_next : bool) -> Result < (G , bool) , ReadError >")
        || reader.contains("fn read_G(reader: &mut impl PullParser, has_next: bool) -> Result<(G, bool), ReadError>"));
    assert!(reader.contains("let (g , __has_next) = read_G (reader , has_next) ? ;")
        || reader.contains("let (g, __has_next) = read_G(reader, has_next)?;"));
}

#[test]
fn attr_group_inherit_flattens_while_member_nests() {
    let xsd = format!(
        r#"<xs:schema {XSD_NS} {QXG_NS}>
            <xs:element name="R" type="T"/>
            <xs:attributeGroup name="Shared">
                <xs:attribute name="id" type="xs:string" use="required"/>
            </xs:attributeGroup>
            <xs:complexType name="T">
                <xs:attributeGroup ref="Shared" qxg:inherit="true"/>
            </xs:complexType>
        </xs:schema>"#
    );
    let (decls, reader) = build_and_render(&xsd);

    // inherited attr-group fields flatten straight into T, not nested.
    assert!(decls.contains("pub id : String") || decls.contains("pub id: String"));
    assert!(!decls.contains("shared"));

    assert!(reader.contains("read_Shared (reader) ?") || reader.contains("read_Shared(reader)?"));
    assert!(reader.contains("let Shared { id } = __ag ;") || reader.contains("let Shared { id } = __ag;"));
}

#[test]
fn mixed_type_gets_optional_text_field() {
    let xsd = format!(
        r#"<xs:schema {XSD_NS}>
            <xs:element name="R" type="T"/>
            <xs:complexType name="T" mixed="true">
                <xs:sequence>
                    <xs:element name="x" type="xs:int"/>
                </xs:sequence>
            </xs:complexType>
        </xs:schema>"#
    );
    let (decls, reader) = build_and_render(&xsd);

    assert!(decls.contains("pub text : Option < String >") || decls.contains("pub text: Option<String>"));
    assert!(reader.contains("next_text_or_element"));
}
