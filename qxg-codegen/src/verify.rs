//! The optional pre-pass that validates an input XSD against the W3C XSD
//! meta-schema (§6). This is explicitly out of scope to implement — "a
//! diagnostic convenience" reduced to an interface contract — so this
//! module only performs the cheap, local checks that don't require fetching
//! or embedding the meta-schema itself: that the file exists, is readable,
//! and parses as well-formed XML with an `xs:schema` root. A full
//! implementation would also validate structurally against the W3C
//! meta-schema; that facility is assumed external and, when unavailable,
//! this step is silently skipped rather than failing the run (the CLI's
//! `--skip-verify` flag exists to make that explicit instead).

use std::{fs, path::Path};

use roxmltree::Document;

use crate::error::CodeGenError;

pub fn verify_against_meta_schema(xsd_path: &Path) -> Result<(), CodeGenError> {
    log::info!("verifying {} against the XSD meta-schema", xsd_path.display());

    let text = fs::read_to_string(xsd_path)
        .map_err(|e| CodeGenError::io(xsd_path.display().to_string(), e))?;

    let document =
        Document::parse(&text).map_err(|e| CodeGenError::from(qxg_xml::XsdError::from_roxmltree(e)))?;

    let root = document.root_element();
    let is_xsd = root
        .tag_name()
        .namespace()
        .is_some_and(qxg_xml::schema::is_xsd_namespace);
    if root.tag_name().name() != "schema" || !is_xsd {
        return Err(CodeGenError::meta_validation(
            "root element is not a recognized xs:schema",
        ));
    }

    log::debug!("no local W3C meta-schema facility available; skipping structural validation");
    Ok(())
}
