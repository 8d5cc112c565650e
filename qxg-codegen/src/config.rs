//! Parses the optional `qxg:config` child of the schema root (§4.C).

use std::path::Path;

use qxg_xml::{XsdNodeExt, value_from_attr_opt};
use roxmltree::Node;

use crate::{
    ir::{Config, Include, Visibility},
    ns::QXG_NAMESPACE,
    utils::title_case_file_stem,
};

impl Config {
    /// Applies §3's defaults for a schema with no `qxg:config` child.
    pub fn defaults(input_path: &Path) -> Self {
        Self {
            class_name: title_case_file_stem(input_path),
            prefix: None,
            namespace: None,
            visibility: Visibility::Protected,
            std_compat: false,
            includes: Vec::new(),
            schema_url: None,
        }
    }
}

/// Reads the `qxg:config` child of `root`, if any, overlaying its fields
/// onto the defaults computed from `input_path`.
pub fn load_config(root: &Node<'_, '_>, input_path: &Path) -> Result<Config, qxg_xml::XsdError> {
    let mut config = Config::defaults(input_path);

    let Some(node) = root
        .children()
        .find(|n| n.tag_name().name() == "config" && n.tag_name().namespace() == Some(QXG_NAMESPACE))
    else {
        return Ok(config);
    };

    if let Some(class) = value_from_attr_opt::<String>(&node, "class")? {
        config.class_name = class;
    }
    config.prefix = value_from_attr_opt(&node, "prefix")?;
    config.namespace = value_from_attr_opt(&node, "ns")?;
    if let Some(std_compat) = value_from_attr_opt::<bool>(&node, "stdcompat")? {
        config.std_compat = std_compat;
    }
    config.schema_url = value_from_attr_opt(&node, "schemaUrl")?;
    if let Some(visibility) = value_from_attr_opt::<String>(&node, "visibility")? {
        config.visibility = match visibility.as_str() {
            "public" => Visibility::Public,
            "protected" => Visibility::Protected,
            "private" => Visibility::Private,
            other => {
                return Err(qxg_xml::XsdError::other(
                    &node,
                    format!("unknown visibility: {other}"),
                ))
            }
        };
    }

    config.includes = node
        .with_name("include")
        .map(|include| {
            Ok(Include {
                path: include.try_contents()?.to_owned(),
                is_local: value_from_attr_opt(&include, "local")?.unwrap_or(true),
            })
        })
        .collect::<Result<_, qxg_xml::XsdError>>()?;

    Ok(config)
}
