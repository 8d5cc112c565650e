use roxmltree::Node;

use crate::{error::XsdError, FromValue};

/// Convenience accessors on top of [`roxmltree::Node`].
pub trait NodeExt<'a, 'input: 'a> {
    fn with_name(&self, name: &str) -> impl Iterator<Item = Node<'a, 'input>>;

    fn try_attribute(&self, name: &str) -> Result<&'a str, XsdError>;

    fn try_contents(&self) -> Result<&'a str, XsdError>;
}

impl<'a, 'input: 'a> NodeExt<'a, 'input> for Node<'a, 'input> {
    fn with_name(&self, name: &str) -> impl Iterator<Item = Node<'a, 'input>> {
        self.children().filter(move |n| n.has_tag_name(name))
    }

    fn try_attribute(&self, name: &str) -> Result<&'a str, XsdError> {
        self.attribute(name)
            .ok_or_else(|| XsdError::missing_attribute(self, name))
    }

    fn try_contents(&self) -> Result<&'a str, XsdError> {
        self.text().ok_or_else(|| XsdError::missing_content(self))
    }
}

pub fn uint_attr(node: &Node<'_, '_>, name: &str) -> Result<Option<u64>, XsdError> {
    node.attribute(name)
        .map(|a| a.parse())
        .transpose()
        .map_err(|e| XsdError::parse_int(node, name, e))
}

pub fn value_from_attr<T: FromValue>(node: &Node<'_, '_>, attr: &str) -> Result<T, XsdError> {
    T::from_value(node, attr, node.try_attribute(attr)?)
}

pub fn value_from_attr_opt<T: FromValue>(
    node: &Node<'_, '_>,
    attr: &str,
) -> Result<Option<T>, XsdError> {
    let Some(c) = node.attribute(attr) else {
        return Ok(None);
    };
    T::from_value(node, attr, c).map(Some)
}

/// Looks up an attribute by its expanded `(namespace_uri, local_name)` pair, used
/// for attributes in the `qxg:` annotation namespace regardless of which prefix
/// the document happens to bind it to.
pub fn value_from_ns_attr_opt<T: FromValue>(
    node: &Node<'_, '_>,
    ns: &str,
    attr: &str,
) -> Result<Option<T>, XsdError> {
    let Some(c) = node.attribute((ns, attr)) else {
        return Ok(None);
    };
    T::from_value(node, attr, c).map(Some)
}
