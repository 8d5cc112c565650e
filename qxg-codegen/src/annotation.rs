//! Reads `qxg:`-namespaced annotation attributes off raw XSD nodes.

use qxg_xml::{value_from_ns_attr_opt, XsdError};
use roxmltree::Node;

use crate::ns::QXG_NAMESPACE;

/// Maps an XSD built-in scalar's local name to the scalar type used in
/// generated declarations. Anything not listed here is assumed to be a
/// schema-local named type instead of a built-in.
pub fn builtin_scalar_type(xsd_local_name: &str) -> Option<&'static str> {
    Some(match xsd_local_name {
        "string" | "token" | "normalizedString" | "language" | "Name" | "NCName" | "ID"
        | "IDREF" | "anyURI" => "String",
        "boolean" => "bool",
        "decimal" | "double" => "f64",
        "float" => "f32",
        "integer" | "int" | "long" => "i64",
        "short" | "byte" => "i32",
        "unsignedInt" | "unsignedLong" => "u64",
        "unsignedShort" | "unsignedByte" => "u32",
        "date" | "dateTime" | "time" => "chrono::NaiveDateTime",
        "duration" => "chrono::Duration",
        _ => return None,
    })
}

/// `annotation(node, attr, default, map_type=false)`: reads `qxg:{attr}` off
/// `node`, falling back to `default` when absent.
pub fn annotation_str(node: &Node<'_, '_>, attr: &str, default: &str) -> Result<String, XsdError> {
    Ok(value_from_ns_attr_opt::<String>(node, QXG_NAMESPACE, attr)?.unwrap_or_else(|| default.to_owned()))
}

/// Same as [`annotation_str`], but when the attribute is absent, `default` is
/// interpreted as an XSD built-in type name and mapped through
/// [`builtin_scalar_type`] (falling back to the input string unchanged for
/// unrecognized, presumably schema-local, type names).
pub fn annotation_type(node: &Node<'_, '_>, attr: &str, default: &str) -> Result<String, XsdError> {
    if let Some(explicit) = value_from_ns_attr_opt::<String>(node, QXG_NAMESPACE, attr)? {
        return Ok(explicit);
    }
    if default.is_empty() {
        return Ok(String::new());
    }
    Ok(builtin_scalar_type(default)
        .map(str::to_owned)
        .unwrap_or_else(|| default.to_owned()))
}

pub fn annotation_bool(node: &Node<'_, '_>, attr: &str, default: bool) -> Result<bool, XsdError> {
    Ok(value_from_ns_attr_opt::<bool>(node, QXG_NAMESPACE, attr)?.unwrap_or(default))
}

pub fn annotation_u64(node: &Node<'_, '_>, attr: &str) -> Result<Option<u64>, XsdError> {
    value_from_ns_attr_opt::<u64>(node, QXG_NAMESPACE, attr)
}

/// Strips a leading `xs:`/known-prefix qualifier off a `@type`/`@base`
/// reference, leaving the bare local name used as an IR type key. Qxg is a
/// single flat namespace of type keys, so any prefix is dropped rather than
/// resolved against the document's namespace bindings.
pub fn local_name_of(qname: &str) -> &str {
    qname.split_once(':').map_or(qname, |(_, local)| local)
}
