use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::field::FieldDef;
use crate::naming::{pluralize, snake};
use crate::resolve::EdgeDef;
use crate::types::EntityAnnotation;

/// Fully resolved per-entity record handed to the emitters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaObject {
    pub name: String,
    /// Pluralized display name, e.g. `Categories`.
    pub plural_name: String,
    /// File name of the generated ORM schema source.
    pub schema_file_name: String,
    /// File name of the generated API schema.
    pub graphql_schema_file_name: String,
    /// Classified fields in declaration order.
    pub fields: Vec<FieldDef>,
    /// Resolved edges in declaration order.
    pub edges: Vec<EdgeDef>,
    pub annotations: Vec<EntityAnnotation>,
    /// Distinct API scalar names used by `fields`.
    pub graphql_types: BTreeSet<String>,
}

impl SchemaObject {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn edge(&self, name: &str) -> Option<&EdgeDef> {
        self.edges.iter().find(|edge| edge.name == name)
    }

    /// Non-identity fields, the ones exposed on mutation inputs.
    pub fn mutable_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|field| !field.is_identity)
    }
}

/// Versioned container for the serialized IR (`ir.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IrDocument {
    pub ir_version: String,
    pub entities: Vec<SchemaObject>,
}

impl IrDocument {
    pub fn new(entities: Vec<SchemaObject>) -> Self {
        Self {
            ir_version: crate::IR_VERSION.to_string(),
            entities,
        }
    }
}

/// Assemble the IR record for one entity.
///
/// Field and edge order is kept as given.
pub fn build(name: &str, fields: Vec<FieldDef>, edges: Vec<EdgeDef>) -> SchemaObject {
    let graphql_types = fields
        .iter()
        .filter_map(FieldDef::graphql_scalar)
        .map(str::to_string)
        .collect();

    let mut annotations = vec![EntityAnnotation::QueryField, EntityAnnotation::RelayConnection];
    if fields.iter().any(|field| !field.is_identity) {
        annotations.push(EntityAnnotation::Mutations {
            create: true,
            update: true,
        });
    }

    let file_stem = snake(name);
    SchemaObject {
        name: name.to_string(),
        plural_name: pluralize(name),
        schema_file_name: format!("{file_stem}.go"),
        graphql_schema_file_name: format!("{file_stem}.graphql"),
        fields,
        edges,
        annotations,
        graphql_types,
    }
}
