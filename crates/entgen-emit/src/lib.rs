//! Text emitters over the entgen schema IR.
//!
//! Every emitter is a pure function from resolved schema objects to source
//! text; writing the files is left to the caller.

pub mod config;
pub mod ent_schema;
pub mod errors;
pub mod go;
pub mod gqlgen;
pub mod graphql;

use std::collections::BTreeSet;
use std::path::PathBuf;

use entgen_core::SchemaObject;

pub use config::EmitConfig;
pub use errors::{EmitError, Result};

/// Banner at the top of every generated Go source.
pub const HEADER: &str = "// Code generated by entgen. DO NOT EDIT.";

/// A rendered file, addressed relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Render every output file for `objects`, in declaration order.
///
/// Fails when an edge points at an entity missing from `objects`, which
/// only happens for an IR that was edited or filtered after compilation.
pub fn emit_all(objects: &[SchemaObject], config: &EmitConfig) -> Result<Vec<EmittedFile>> {
    check_edge_targets(objects)?;

    let mut files = Vec::new();
    for object in objects {
        files.push(EmittedFile {
            path: config.schema_dir.join(&object.schema_file_name),
            contents: ent_schema::render(object)?,
        });
    }
    for object in objects.iter().filter(|object| graphql::has_mutations(object)) {
        files.push(EmittedFile {
            path: config.graphql_dir.join(&object.graphql_schema_file_name),
            contents: graphql::render_mutations(object)?,
        });
    }
    files.push(EmittedFile {
        path: config.config_dir.join("gqlgen.yml"),
        contents: gqlgen::render(objects, config)?,
    });

    tracing::debug!(event = "files_rendered", files = files.len());
    Ok(files)
}

fn check_edge_targets(objects: &[SchemaObject]) -> Result<()> {
    let names: BTreeSet<&str> = objects.iter().map(|object| object.name.as_str()).collect();
    for object in objects {
        if let Some(edge) = object
            .edges
            .iter()
            .find(|edge| !names.contains(edge.target.as_str()))
        {
            return Err(EmitError::UnknownEntity {
                entity: object.name.clone(),
                edge: edge.name.clone(),
                target: edge.target.clone(),
            });
        }
    }
    Ok(())
}
