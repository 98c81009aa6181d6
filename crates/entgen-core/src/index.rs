use std::collections::{BTreeMap, BTreeSet};

use crate::descriptor::{DescriptorSet, FieldDescriptor, MessageDescriptor};
use crate::error::{Error, Result};
use crate::field::{FieldDef, ID_FIELD, classify_field, is_reference};
use crate::naming::short_type_name;
use crate::options::CompileOptions;

/// Phase-one view of a selected entity: its classified fields and the
/// reference fields still waiting for resolution.
#[derive(Debug)]
pub struct IndexedEntity<'a> {
    pub descriptor: &'a MessageDescriptor,
    pub fields: Vec<FieldDef>,
    pub references: Vec<&'a FieldDescriptor>,
}

impl<'a> IndexedEntity<'a> {
    pub fn name(&self) -> &'a str {
        &self.descriptor.name
    }

    /// Reference fields whose type is the given entity, in declaration order.
    pub fn references_to(&self, entity: &str) -> Vec<&'a FieldDescriptor> {
        self.references
            .iter()
            .copied()
            .filter(|field| reference_target(field) == Some(entity))
            .collect()
    }

    /// Classified fields a unique edge pointing here may be ordered by,
    /// collections included.
    pub fn orderable_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|field| !field.is_identity)
    }
}

/// Entity name → classified entity, built once before any edge is resolved.
#[derive(Debug)]
pub struct EntityIndex<'a> {
    entities: Vec<IndexedEntity<'a>>,
    by_name: BTreeMap<&'a str, usize>,
}

impl<'a> EntityIndex<'a> {
    /// Select entities and classify every non-reference field of each one.
    ///
    /// Fails fast on the first classification error; nothing is resolved
    /// until every selected entity has been indexed.
    pub fn build(set: &'a DescriptorSet, options: &CompileOptions) -> Result<Self> {
        let mut entities = Vec::new();
        let mut by_name = BTreeMap::new();

        for descriptor in select_entities(set) {
            if by_name.contains_key(descriptor.name.as_str()) {
                return Err(Error::InvalidDescriptor(format!(
                    "duplicate entity name: {}",
                    descriptor.name
                )));
            }

            let entity = index_entity(descriptor, options)?;
            tracing::debug!(
                event = "entity_indexed",
                entity = %descriptor.name,
                fields = entity.fields.len(),
                references = entity.references.len()
            );
            by_name.insert(descriptor.name.as_str(), entities.len());
            entities.push(entity);
        }

        Ok(Self { entities, by_name })
    }

    /// Entities in declaration order.
    pub fn entities(&self) -> &[IndexedEntity<'a>] {
        &self.entities
    }

    pub fn get(&self, name: &str) -> Option<&IndexedEntity<'a>> {
        self.by_name.get(name).map(|idx| &self.entities[*idx])
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Entity filter: only messages that opt into generation participate.
pub fn select_entities(set: &DescriptorSet) -> impl Iterator<Item = &MessageDescriptor> {
    set.entities
        .iter()
        .filter(|entity| entity.options.generate)
}

/// Entity name a reference field points at.
pub fn reference_target(field: &FieldDescriptor) -> Option<&str> {
    field.type_name.as_deref().map(short_type_name)
}

fn index_entity<'a>(
    descriptor: &'a MessageDescriptor,
    options: &CompileOptions,
) -> Result<IndexedEntity<'a>> {
    let mut seen = BTreeSet::new();
    let mut fields = Vec::new();
    let mut references = Vec::new();

    for field in &descriptor.fields {
        if !seen.insert(field.name.as_str()) {
            return Err(Error::InvalidDescriptor(format!(
                "duplicate field name: {}.{}",
                descriptor.name, field.name
            )));
        }
        if field.is_ignored() {
            continue;
        }

        // `id` is the identity column whatever its declared kind.
        if field.name != ID_FIELD && is_reference(field, options) {
            if field.type_name.as_deref().is_none_or(str::is_empty) {
                return Err(Error::InvalidDescriptor(format!(
                    "message field {}.{} has no type name",
                    descriptor.name, field.name
                )));
            }
            references.push(field);
        } else {
            let def = classify_field(descriptor, field, options)?;
            tracing::debug!(
                event = "field_classified",
                entity = %descriptor.name,
                field = %def.name,
                storage_kind = %def.storage_kind
            );
            fields.push(def);
        }
    }

    Ok(IndexedEntity {
        descriptor,
        fields,
        references,
    })
}
