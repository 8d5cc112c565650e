//! Typed, fallible attribute/content access over raw [`roxmltree`] nodes,
//! plus XSD namespace-URI classification. This crate knows nothing about
//! code generation: `qxg-codegen` walks the `roxmltree::Node` tree itself
//! and uses this crate only for coercion and namespace lookups.

use roxmltree::Node;

mod error;
pub mod ext;
pub mod schema;

pub use error::{XsdError, XsdErrorKind};
pub use ext::{
    uint_attr, value_from_attr, value_from_attr_opt, value_from_ns_attr_opt, NodeExt as XsdNodeExt,
};

/// Implemented by leaf value types that can be parsed out of an attribute or
/// text-node string.
pub trait FromValue: Sized {
    fn from_value(node: &Node<'_, '_>, attr: &str, v: &str) -> Result<Self, XsdError>;
}

macro_rules! from_int {
    ($ty:ident) => {
        impl FromValue for $ty {
            fn from_value(node: &Node<'_, '_>, attr: &str, v: &str) -> Result<Self, XsdError> {
                v.parse().map_err(|e| XsdError::parse_int(node, attr, e))
            }
        }
    };
}

from_int!(i64);
from_int!(u64);
from_int!(u32);

impl FromValue for String {
    fn from_value(_node: &Node<'_, '_>, _attr: &str, v: &str) -> Result<Self, XsdError> {
        Ok(v.to_owned())
    }
}

impl FromValue for bool {
    fn from_value(node: &Node<'_, '_>, attr: &str, v: &str) -> Result<Self, XsdError> {
        match v {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(XsdError::other(
                node,
                format!("invalid boolean value for {attr}: {v}"),
            )),
        }
    }
}

impl<T> FromValue for Vec<T>
where
    T: FromValue,
{
    fn from_value(node: &Node<'_, '_>, attr: &str, v: &str) -> Result<Self, XsdError> {
        v.split_whitespace()
            .map(|v| T::from_value(node, attr, v))
            .collect()
    }
}
