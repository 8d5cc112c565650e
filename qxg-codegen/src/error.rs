use std::fmt::Display;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodeGenErrorKind {
    #[error("failed to load schema: {0}")]
    Xml(#[from] qxg_xml::XsdError),
    #[error("unsupported schema shape: {0}")]
    SchemaShape(String),
    #[error("reference to undefined {kind}: {name}")]
    TypeResolution { kind: &'static str, name: String },
    #[error("missing required field: {0}")]
    MissingRequiredValue(&'static str),
    #[error("wrong format on field. expected {0}, got {1}")]
    WrongFormat(String, String),
    #[error("failed to parse {0}: {1}")]
    ParseInt(String, std::num::ParseIntError),
    #[error("{0}")]
    Other(String),
    #[error("failed to generate code: {0}")]
    Syn(#[from] syn::Error),
    #[error("{0}: {1}")]
    Io(String, std::io::Error),
    #[error("schema failed meta-schema validation: {0}")]
    MetaValidation(String),
}

/// An error from any stage of the generator pipeline: builder, semantic
/// validator, or either emitter. Every error is fatal; the generator never
/// produces partial output.
#[derive(Error, Debug)]
pub struct CodeGenError {
    #[source]
    pub kind: Box<CodeGenErrorKind>,
    pub context: Option<String>,
    pub file: Option<String>,
}

impl Display for CodeGenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "code generation failed: {}", self.kind)?;
        if let Some(context) = &self.context {
            write!(f, ", while {context}")?;
        }
        if let Some(file) = &self.file {
            write!(f, ", while processing {file}")?;
        }
        Ok(())
    }
}

impl From<qxg_xml::XsdError> for CodeGenError {
    fn from(value: qxg_xml::XsdError) -> Self {
        Self::new(value.into())
    }
}

impl From<syn::Error> for CodeGenError {
    fn from(value: syn::Error) -> Self {
        Self::new(value.into())
    }
}

impl CodeGenError {
    pub fn io(msg: impl Into<String>, e: std::io::Error) -> Self {
        Self::new(CodeGenErrorKind::Io(msg.into(), e))
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::new(CodeGenErrorKind::Other(msg.into()))
    }

    pub fn schema_shape(msg: impl Into<String>) -> Self {
        Self::new(CodeGenErrorKind::SchemaShape(msg.into()))
    }

    pub fn undefined_type(name: impl Into<String>) -> Self {
        Self::new(CodeGenErrorKind::TypeResolution {
            kind: "type",
            name: name.into(),
        })
    }

    pub fn undefined_group(name: impl Into<String>) -> Self {
        Self::new(CodeGenErrorKind::TypeResolution {
            kind: "group",
            name: name.into(),
        })
    }

    pub fn undefined_attribute_group(name: impl Into<String>) -> Self {
        Self::new(CodeGenErrorKind::TypeResolution {
            kind: "attribute group",
            name: name.into(),
        })
    }

    pub fn undefined_method(name: impl Into<String>) -> Self {
        Self::new(CodeGenErrorKind::TypeResolution {
            kind: "method",
            name: name.into(),
        })
    }

    pub fn parse_int(field: impl Into<String>, error: std::num::ParseIntError) -> Self {
        Self::new(CodeGenErrorKind::ParseInt(field.into(), error))
    }

    pub fn wrong_format(format: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(CodeGenErrorKind::WrongFormat(format.into(), value.into()))
    }

    pub fn missing_required_value(name: &'static str) -> Self {
        Self::new(CodeGenErrorKind::MissingRequiredValue(name))
    }

    pub fn meta_validation(msg: impl Into<String>) -> Self {
        Self::new(CodeGenErrorKind::MetaValidation(msg.into()))
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn new(kind: CodeGenErrorKind) -> Self {
        Self {
            kind: Box::new(kind),
            context: None,
            file: None,
        }
    }
}
