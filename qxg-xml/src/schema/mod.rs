//! XSD namespace classification: distinguishing `xs:`-native elements from
//! vendor (`qxg:`) annotation elements regardless of which prefix a document
//! happens to bind either to.

/// `http(s)://www.w3.org/{2001,2009}/XMLSchema`, the namespace URIs a
/// conforming document may bind its `xs:` prefix to.
pub const XSD_NAMESPACE_URIS: &[&str] = &[
    "http://www.w3.org/2001/XMLSchema",
    "https://www.w3.org/2001/XMLSchema",
    "http://www.w3.org/2009/XMLSchema",
    "https://www.w3.org/2009/XMLSchema",
];

pub fn is_xsd_namespace(uri: &str) -> bool {
    XSD_NAMESPACE_URIS.contains(&uri)
}
