//! Namespace canonicalization: two pure total functions turning the
//! expanded `{uri}local` names `roxmltree` hands us into the short,
//! human-readable prefixes used in diagnostics and back.

/// The fixed URI carrying `qxg:*` generator directives.
pub const QXG_NAMESPACE: &str = "https://skycoder42.de/xml/schemas/QXmlCodeGen";

pub use qxg_xml::schema::XSD_NAMESPACE_URIS;

/// Renders an expanded name as `xs:local` / `qxg:local` when the namespace is
/// recognized, or `{uri}local` otherwise.
pub fn canonicalize(uri: Option<&str>, local: &str) -> String {
    match uri {
        Some(uri) if qxg_xml::schema::is_xsd_namespace(uri) => format!("xs:{local}"),
        Some(uri) if uri == QXG_NAMESPACE => format!("qxg:{local}"),
        Some(uri) => format!("{{{uri}}}{local}"),
        None => local.to_owned(),
    }
}
