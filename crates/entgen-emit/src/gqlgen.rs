//! `gqlgen.yml` manifest covering every emitted entity.

use std::collections::BTreeSet;
use std::fmt::Write;

use entgen_core::SchemaObject;

use crate::config::EmitConfig;
use crate::errors::Result;
use crate::graphql::has_mutations;

/// Generated schema produced by the ORM's own GraphQL extension.
const ENT_GRAPHQL: &str = "ent.graphql";

/// Render the manifest for `objects` under `config`.
pub fn render(objects: &[SchemaObject], config: &EmitConfig) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "resolver:")?;
    writeln!(out, "  layout: follow-schema")?;
    writeln!(out, "  dir: .")?;

    writeln!(out, "autobind:")?;
    writeln!(out, "  - {}", config.ent_package)?;
    for object in objects {
        writeln!(
            out,
            "  - {}/{}",
            config.ent_package,
            object.name.to_lowercase()
        )?;
    }

    writeln!(out, "models:")?;
    write_model(&mut out, "ID", "github.com/99designs/gqlgen/graphql.UUID")?;
    write_model(&mut out, "Node", &format!("{}.Noder", config.ent_package))?;
    let used: BTreeSet<&str> = objects
        .iter()
        .flat_map(|object| object.graphql_types.iter().map(String::as_str))
        .collect();
    for scalar in used {
        if let Some(model) = scalar_model(scalar) {
            write_model(&mut out, scalar, model)?;
        }
    }

    writeln!(out, "schema:")?;
    writeln!(out, "  - {ENT_GRAPHQL}")?;
    for object in objects.iter().filter(|object| has_mutations(object)) {
        writeln!(out, "  - {}", object.graphql_schema_file_name)?;
    }
    Ok(out)
}

// Scalars the ORM's GraphQL integration cannot bind on its own.
fn scalar_model(scalar: &str) -> Option<&'static str> {
    match scalar {
        "Uint32" => Some("github.com/99designs/gqlgen/graphql.Uint32"),
        "Uint64" => Some("github.com/99designs/gqlgen/graphql.Uint64"),
        "Float" => Some("github.com/99designs/gqlgen/graphql.Float"),
        _ => None,
    }
}

fn write_model(out: &mut String, name: &str, model: &str) -> Result<()> {
    writeln!(out, "  {name}:")?;
    writeln!(out, "    model:")?;
    writeln!(out, "      - {model}")?;
    Ok(())
}
