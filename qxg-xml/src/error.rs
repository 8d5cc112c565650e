use std::{num::ParseIntError, ops::Range};

use roxmltree::Node;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XsdErrorKind {
    #[error("failed to parse XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("expected child element: {0}")]
    MissingChild(String),
    #[error("expected attribute: {0}")]
    MissingAttribute(String),
    #[error("missing node content")]
    MissingContent,
    #[error("failed to parse {0} as integer: {1}")]
    ParseInt(String, ParseIntError),
    #[error("{0}")]
    Other(String),
}

/// An error produced while loading a raw XSD document object model.
///
/// Carries the byte span of the offending node so callers can report
/// file/line/column style diagnostics.
#[derive(Error, Debug)]
#[error("{kind} at {span:?}")]
pub struct XsdError {
    pub span: Range<usize>,
    pub kind: XsdErrorKind,
}

impl XsdError {
    pub fn from_roxmltree(e: roxmltree::Error) -> Self {
        Self {
            span: 0..1,
            kind: XsdErrorKind::Xml(e),
        }
    }

    pub fn missing_child(node: &Node<'_, '_>, name: &str) -> Self {
        Self {
            span: node.range(),
            kind: XsdErrorKind::MissingChild(name.to_owned()),
        }
    }

    pub fn missing_attribute(node: &Node<'_, '_>, name: &str) -> Self {
        Self {
            span: node.range(),
            kind: XsdErrorKind::MissingAttribute(name.to_owned()),
        }
    }

    pub fn missing_content(node: &Node<'_, '_>) -> Self {
        Self {
            span: node.range(),
            kind: XsdErrorKind::MissingContent,
        }
    }

    pub fn parse_int(node: &Node<'_, '_>, attr: &str, err: ParseIntError) -> Self {
        Self {
            span: node.range(),
            kind: XsdErrorKind::ParseInt(attr.to_owned(), err),
        }
    }

    pub fn other(node: &Node<'_, '_>, msg: impl Into<String>) -> Self {
        Self {
            span: node.range(),
            kind: XsdErrorKind::Other(msg.into()),
        }
    }
}
