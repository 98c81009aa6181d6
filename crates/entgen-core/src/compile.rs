use crate::descriptor::DescriptorSet;
use crate::error::Result;
use crate::index::EntityIndex;
use crate::options::CompileOptions;
use crate::resolve::resolve_edges;
use crate::schema::{SchemaObject, build};

/// Compile a descriptor set into one schema object per selected entity.
///
/// Phase one classifies the fields of every selected entity; phase two
/// resolves edges against the complete index. The first error aborts the
/// run and no schema object is returned. Output follows declaration order.
pub fn compile(set: &DescriptorSet, options: &CompileOptions) -> Result<Vec<SchemaObject>> {
    let index = EntityIndex::build(set, options)?;
    tracing::info!(
        event = "entities_indexed",
        entities = index.len(),
        skipped = set.entities.len() - index.len()
    );

    let mut objects = Vec::with_capacity(index.len());
    for entity in index.entities() {
        let edges = resolve_edges(&index, entity)?;
        objects.push(build(entity.name(), entity.fields.clone(), edges));
    }

    tracing::info!(
        event = "edges_resolved",
        entities = objects.len(),
        edges = objects.iter().map(|object| object.edges.len()).sum::<usize>()
    );
    Ok(objects)
}
