//! Reads an XSD schema annotated with `qxg:`-namespaced directives and
//! emits a declarations/definitions pair of Rust sources: typed records and
//! enums plus the streaming reader routines that build them off an
//! external XML pull-parser.
//!
//! The pipeline is: [`builder::SchemaBuilder`] turns the raw XSD DOM into
//! an [`ir::Schema`], [`validate::validate`] checks the cross-schema
//! invariants the builder couldn't check in one pass, and [`emit`] walks
//! the schema twice to produce the two output files. [`driver::generate`]
//! wires all three together; [`main`] is the thin CLI wrapper around it.

pub mod annotation;
pub mod builder;
pub mod config;
pub mod driver;
pub mod emit;
pub mod error;
pub mod ir;
pub mod ns;
pub mod utils;
pub mod validate;
pub mod verify;
