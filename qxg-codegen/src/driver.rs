//! Orchestrates one generator run: parse → build → validate → emit → write
//! (§4.H). Resource discipline per §5: the input is read fully up front, the
//! two output files are each opened exactly once and written in one pass.

use std::{fs, path::Path};

use prettyplease::unparse;
use syn::File;

use crate::{
    builder::SchemaBuilder,
    emit::{declarations::emit_declarations, reader::emit_reader},
    error::CodeGenError,
    ir::Schema,
    validate::validate,
};

pub struct GenerateOutcome {
    pub schema: Schema,
}

/// Runs the full pipeline and writes the two output files. `skip_verify` is
/// threaded through from the CLI; this crate never performs the W3C
/// meta-schema check itself (see [`crate::verify`]), so it only affects
/// whether the caller runs that check before calling here.
pub fn generate(input_path: &Path, hdr_path: &Path, src_path: &Path) -> Result<GenerateOutcome, CodeGenError> {
    log::info!("reading schema from {}", input_path.display());
    let xsd_text = fs::read_to_string(input_path)
        .map_err(|e| CodeGenError::io(input_path.display().to_string(), e))?;

    let schema = SchemaBuilder::build(&xsd_text, input_path)?;
    log::debug!(
        "built schema: {} basic types, {} records, {} root elements",
        schema.basic_types.len(),
        schema.records.len(),
        schema.root_elements.len()
    );

    validate(&schema)?;

    let declarations = emit_declarations(&schema)?;
    let reader = emit_reader(&schema)?;

    write_file(hdr_path, declarations)?;
    write_file(src_path, reader)?;

    log::info!(
        "wrote declarations to {} and definitions to {}",
        hdr_path.display(),
        src_path.display()
    );

    Ok(GenerateOutcome { schema })
}

fn write_file(path: &Path, items: Vec<syn::Item>) -> Result<(), CodeGenError> {
    let file = File {
        shebang: None,
        attrs: Vec::new(),
        items,
    };
    let rendered = unparse(&file);
    fs::write(path, rendered).map_err(|e| CodeGenError::io(path.display().to_string(), e))
}
