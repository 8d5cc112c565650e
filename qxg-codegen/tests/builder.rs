//! Invariants 1-3 and the negative-build cases from spec §3/§8 that are
//! checked at schema-build time, plus invariant 3's inheritance-chain
//! flattening exercised through both emitters.

use std::path::Path;

use qxg_codegen::{
    builder::SchemaBuilder,
    emit::declarations::emit_declarations,
    error::CodeGenErrorKind,
    ir::RecordKind,
    validate::validate,
};

const XSD_NS: &str = r#"xmlns:xs="http://www.w3.org/2001/XMLSchema""#;
const QXG_NS: &str = r#"xmlns:qxg="https://skycoder42.de/xml/schemas/QXmlCodeGen""#;

#[test]
fn invariant_1_undefined_type_reference_is_rejected() {
    let xsd = format!(
        r#"<xs:schema {XSD_NS}>
            <xs:element name="R" type="DoesNotExist"/>
        </xs:schema>"#
    );
    let schema = SchemaBuilder::build(&xsd, Path::new("t.xsd")).expect("builder itself doesn't resolve types");
    let err = validate(&schema).expect_err("undefined root type must be rejected");
    assert!(matches!(
        *err.kind,
        CodeGenErrorKind::TypeResolution { kind: "type", .. }
    ));
}

#[test]
fn invariant_5_inherit_requires_single_occurrence() {
    let xsd = format!(
        r#"<xs:schema {XSD_NS} {QXG_NS}>
            <xs:element name="R" type="T"/>
            <xs:complexType name="Base"/>
            <xs:complexType name="T">
                <xs:sequence>
                    <xs:element name="base" type="Base" qxg:inherit="true" minOccurs="0" maxOccurs="unbounded"/>
                </xs:sequence>
            </xs:complexType>
        </xs:schema>"#
    );
    let err = SchemaBuilder::build(&xsd, Path::new("t.xsd"))
        .expect_err("qxg:inherit with a non-(1,1) occurrence must be rejected at build");
    assert!(matches!(*err.kind, CodeGenErrorKind::SchemaShape(_)));
}

#[test]
fn invariant_7_mixed_type_cannot_extend_a_base() {
    let xsd = format!(
        r#"<xs:schema {XSD_NS}>
            <xs:element name="R" type="T"/>
            <xs:complexType name="Base"/>
            <xs:complexType name="T" mixed="true">
                <xs:complexContent>
                    <xs:extension base="Base"/>
                </xs:complexContent>
            </xs:complexType>
        </xs:schema>"#
    );
    let err = SchemaBuilder::build(&xsd, Path::new("t.xsd"))
        .expect_err("mixed=true combined with complexContent/extension must be rejected");
    assert!(matches!(*err.kind, CodeGenErrorKind::SchemaShape(_)));
}

#[test]
fn invariant_8_attr_group_ref_needs_member_or_inherit() {
    let xsd = format!(
        r#"<xs:schema {XSD_NS}>
            <xs:element name="R" type="T"/>
            <xs:attributeGroup name="G">
                <xs:attribute name="g" type="xs:string" use="required"/>
            </xs:attributeGroup>
            <xs:complexType name="T">
                <xs:attributeGroup ref="G"/>
            </xs:complexType>
        </xs:schema>"#
    );
    let err = SchemaBuilder::build(&xsd, Path::new("t.xsd"))
        .expect_err("an attribute group ref without qxg:member or qxg:inherit must be rejected");
    assert!(matches!(*err.kind, CodeGenErrorKind::SchemaShape(_)));
}

#[test]
fn invariant_3_inheritance_chain_is_base_then_attr_groups_then_content() {
    let xsd = format!(
        r#"<xs:schema {XSD_NS} {QXG_NS}>
            <xs:element name="R" type="Derived"/>
            <xs:complexType name="Base">
                <xs:attribute name="x" type="xs:int" use="required"/>
            </xs:complexType>
            <xs:complexType name="Derived">
                <xs:complexContent>
                    <xs:extension base="Base">
                        <xs:attribute name="y" type="xs:string" use="required"/>
                    </xs:extension>
                </xs:complexContent>
            </xs:complexType>
        </xs:schema>"#
    );
    let schema = SchemaBuilder::build(&xsd, Path::new("t.xsd")).unwrap();
    validate(&schema).unwrap();

    let derived = schema.record("Derived").unwrap();
    assert_eq!(derived.inherits(), vec!["Base".to_owned()]);
    let RecordKind::Complex(c) = &derived.kind else { panic!("expected complex type") };
    assert_eq!(c.base_type.as_deref(), Some("Base"));

    // declarations.rs flattens Base's fields ahead of Derived's own, per §4.F.
    let decls = emit_declarations(&schema).unwrap();
    let derived_struct = decls
        .iter()
        .find_map(|item| match item {
            syn::Item::Struct(s) if s.ident == "Derived" => Some(s),
            _ => None,
        })
        .expect("Derived struct emitted");
    let field_names: Vec<String> = derived_struct
        .fields
        .iter()
        .map(|f| f.ident.as_ref().unwrap().to_string())
        .collect();
    assert_eq!(field_names, vec!["x".to_owned(), "y".to_owned()]);

    let reader = qxg_codegen::emit::reader::emit_reader(&schema).unwrap();
    let rendered = prettyplease::unparse(&syn::File {
        shebang: None,
        attrs: Vec::new(),
        items: reader,
    });
    // the derived reader calls the base reader and destructures its result.
    assert!(rendered.contains("read_Base (reader , true)") || rendered.contains("read_Base(reader, true)"));
    assert!(rendered.contains("let Base { x } = __base ;") || rendered.contains("let Base { x } = __base;"));
}

#[test]
fn invariant_6_determinism_across_two_builds() {
    let xsd = format!(
        r#"<xs:schema {XSD_NS}>
            <xs:element name="R" type="T"/>
            <xs:complexType name="T">
                <xs:attribute name="a" type="xs:int" use="required"/>
            </xs:complexType>
        </xs:schema>"#
    );

    let render = |xsd: &str| {
        let schema = SchemaBuilder::build(xsd, Path::new("t.xsd")).unwrap();
        let decls = emit_declarations(&schema).unwrap();
        let reader = qxg_codegen::emit::reader::emit_reader(&schema).unwrap();
        let decls = prettyplease::unparse(&syn::File { shebang: None, attrs: Vec::new(), items: decls });
        let reader = prettyplease::unparse(&syn::File { shebang: None, attrs: Vec::new(), items: reader });
        (decls, reader)
    };

    let (decls_a, reader_a) = render(&xsd);
    let (decls_b, reader_b) = render(&xsd);
    assert_eq!(decls_a, decls_b);
    assert_eq!(reader_a, reader_b);
}
