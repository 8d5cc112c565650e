//! Semantic validation (§4.E, invariant 1): every `type_key` referenced
//! anywhere in the built [`Schema`] must resolve to exactly one `BasicType`
//! or record. The builder already rejects most shape violations as it
//! walks the XSD, but cross-references (a `@type`/`qxg:type` naming a
//! sibling declared later, or never declared at all) can only be checked
//! once the whole schema is in hand.

use crate::{
    error::CodeGenError,
    ir::{ContentDef, Record, RecordKind, Schema, SequenceItem},
};

pub fn validate(schema: &Schema) -> Result<(), CodeGenError> {
    if schema.root_elements.is_empty() {
        return Err(CodeGenError::schema_shape(
            "schema declares no top-level elements",
        ));
    }

    for el in &schema.root_elements {
        require_resolves(schema, &el.type_key)?;
    }

    for record in &schema.records {
        validate_record(schema, record)?;
    }

    Ok(())
}

fn validate_record(schema: &Schema, record: &Record) -> Result<(), CodeGenError> {
    for g in &record.common.attr_groups {
        if !schema.record(&g.type_key).is_some_and(|r| matches!(r.kind, RecordKind::AttrGroup(_))) {
            return Err(CodeGenError::undefined_attribute_group(g.type_key.clone()));
        }
    }

    match &record.kind {
        RecordKind::Complex(c) => {
            if let Some(base) = &c.base_type {
                require_resolves(schema, base)?;
            }
            if let Some(content) = &c.content {
                validate_content(schema, content)?;
            }
        }
        RecordKind::Mixed(m) => {
            if let Some(content) = &m.content {
                validate_content(schema, content)?;
            }
        }
        RecordKind::Group(g) => {
            if let Some(content) = &g.content {
                validate_content(schema, content)?;
            }
        }
        RecordKind::Simple(_) | RecordKind::AttrGroup(_) => {}
    }

    Ok(())
}

fn validate_content(schema: &Schema, content: &ContentDef) -> Result<(), CodeGenError> {
    match content {
        ContentDef::Single(leaf) => require_resolves(schema, &leaf.type_key)?,
        ContentDef::Sequence(slots) => {
            for slot in slots {
                match &slot.item {
                    SequenceItem::Leaf(leaf) => require_resolves(schema, &leaf.type_key)?,
                    SequenceItem::UnorderedChoice(choice) => {
                        for alt in &choice.alternatives {
                            require_resolves(schema, &alt.type_key)?;
                        }
                    }
                }
            }
        }
        ContentDef::Choice(choice) => {
            for alt in &choice.alternatives {
                require_resolves(schema, &alt.type_key)?;
            }
        }
        ContentDef::All(slots) => {
            for slot in slots {
                require_resolves(schema, &slot.element.type_key)?;
            }
        }
    }
    Ok(())
}

fn require_resolves(schema: &Schema, type_key: &str) -> Result<(), CodeGenError> {
    if crate::annotation::builtin_scalar_type(type_key).is_some() {
        return Ok(());
    }
    if schema.resolve(type_key).is_some() {
        return Ok(());
    }
    Err(CodeGenError::undefined_type(type_key.to_owned()))
}
