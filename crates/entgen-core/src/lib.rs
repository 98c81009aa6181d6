//! Relationship and field resolution compiler for entgen.
//!
//! This crate turns a set of entity descriptors into the resolved schema
//! IR consumed by the emitters: classified storage fields, paired edges
//! with inferred cardinality and direction, and derived annotations.

pub mod compile;
pub mod descriptor;
pub mod error;
pub mod field;
pub mod index;
pub mod naming;
pub mod options;
pub mod resolve;
pub mod schema;
pub mod types;

pub use compile::compile;
pub use descriptor::{
    DescriptorSet, EdgeOptions, EdgeStorageKey, FieldDescriptor, FieldKind, FieldOptions,
    MessageDescriptor, MessageOptions,
};
pub use error::{ClassificationError, Error, ResolutionError, ResolutionErrorKind, Result};
pub use field::{FieldDef, ID_DEFAULT, ID_FIELD};
pub use index::{EntityIndex, IndexedEntity};
pub use options::CompileOptions;
pub use resolve::{EdgeDef, resolve_edge, resolve_edges};
pub use schema::{IrDocument, SchemaObject};
pub use types::{Annotation, Cardinality, EdgeDirection, EntityAnnotation, StorageKind};

/// Current contract version for `ir.json` artifacts.
pub const IR_VERSION: &str = "0.1";
