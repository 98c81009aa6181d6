//! API schema extension holding the single and bulk mutations of an entity.

use std::fmt::Write;

use convert_case::{Case, Casing};
use entgen_core::{EntityAnnotation, SchemaObject};

use crate::errors::Result;

/// Returns true when the entity exposes create/update mutations.
pub fn has_mutations(object: &SchemaObject) -> bool {
    object
        .annotations
        .iter()
        .any(|annotation| matches!(annotation, EntityAnnotation::Mutations { .. }))
}

/// Render the `extend type Mutation` block for `object`.
pub fn render_mutations(object: &SchemaObject) -> Result<String> {
    let name = &object.name;
    let plural = &object.plural_name;

    let mut out = String::new();
    writeln!(out, "extend type Mutation {{")?;
    writeln!(out, "  create{name}(input: Create{name}Input!): {name}")?;
    writeln!(out, "  create{plural}(input: [Create{name}Input!]!): [{name}!]")?;
    writeln!(out, "  update{name}(id: ID!, input: Update{name}Input!): {name}")?;
    writeln!(out, "  update{plural}(input: [Update{plural}Input!]!): [{name}!]")?;
    writeln!(out, "  delete{name}(id: ID!): Boolean!")?;
    writeln!(out, "  delete{plural}(ids: [ID!]!): Boolean!")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "input Update{plural}Input {{")?;
    writeln!(out, "  id: ID!")?;
    writeln!(out, "  {}: Update{name}Input!", name.to_case(Case::Camel))?;
    writeln!(out, "}}")?;
    Ok(out)
}
