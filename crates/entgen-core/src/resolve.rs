use std::ptr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::descriptor::{EdgeStorageKey, FieldDescriptor};
use crate::error::{ResolutionError, ResolutionErrorKind};
use crate::field::non_empty;
use crate::index::{EntityIndex, IndexedEntity, reference_target};
use crate::naming::{order_key, snake};
use crate::types::{Annotation, Cardinality, EdgeDirection};

/// A resolved relationship, seen from its declaring field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EdgeDef {
    /// Edge name (snake case of the declaring field).
    pub name: String,
    pub declared_name: String,
    pub owner: String,
    pub target: String,
    pub direction: EdgeDirection,
    /// Self-referencing field naming itself: emitted as an owning edge
    /// on both ends.
    pub bidirectional: bool,
    /// Declared name of the paired field on the target.
    pub counterpart: String,
    pub cardinality: Cardinality,
    pub unique: bool,
    pub required: bool,
    pub immutable: bool,
    pub bind_field: Option<String>,
    pub storage_key: Option<EdgeStorageKey>,
    pub struct_tag: Option<String>,
    pub comment: Option<String>,
    pub annotations: Vec<Annotation>,
}

impl EdgeDef {
    pub fn order_fields(&self) -> impl Iterator<Item = &str> {
        self.annotations.iter().filter_map(Annotation::order_field)
    }
}

/// Resolve every reference field of `owner`, in declaration order.
pub fn resolve_edges(
    index: &EntityIndex<'_>,
    owner: &IndexedEntity<'_>,
) -> Result<Vec<EdgeDef>, ResolutionError> {
    owner
        .references
        .iter()
        .map(|field| resolve_edge(index, owner, field))
        .collect()
}

/// Pair a reference field with its counterpart and derive the edge.
///
/// Requires a fully built index: the counterpart lookup inspects every
/// field of the target entity regardless of declaration order.
pub fn resolve_edge(
    index: &EntityIndex<'_>,
    owner: &IndexedEntity<'_>,
    field: &FieldDescriptor,
) -> Result<EdgeDef, ResolutionError> {
    let target_name = reference_target(field).unwrap_or_default();
    let fail = |kind| ResolutionError {
        entity: owner.name().to_string(),
        field: field.name.clone(),
        target: target_name.to_string(),
        kind,
    };

    let target = index
        .get(target_name)
        .ok_or_else(|| fail(ResolutionErrorKind::UnknownTarget))?;
    let candidates = target.references_to(owner.name());
    let counterpart = find_counterpart(field, &candidates).map_err(fail)?;
    check_pairing(field, counterpart).map_err(fail)?;

    let bidirectional =
        owner.name() == target.name() && field.ref_hint() == Some(field.name.as_str());
    let direction = match field.ref_hint() {
        Some(ref_name) if !bidirectional => EdgeDirection::Referencing {
            ref_name: ref_name.to_string(),
        },
        _ => EdgeDirection::Owning,
    };

    let cardinality = Cardinality::between(field.repeated, counterpart.repeated);
    let unique = cardinality.is_unique();
    let name = snake(&field.name);
    let annotations = if unique {
        unique_edge_annotations(&name, target)
    } else {
        vec![
            Annotation::RelayConnection,
            Annotation::OrderField(count_order_field(owner, field, target.name())),
        ]
    };

    let options = &field.options.edge;
    let bind_field = if options.bind_field || options.bind_field_name.is_some() {
        Some(
            options
                .bind_field_name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| format!("{name}_id")),
        )
    } else {
        None
    };

    tracing::debug!(
        event = "edge_resolved",
        entity = %owner.name(),
        edge = %name,
        target = %target.name(),
        counterpart = %counterpart.name,
        cardinality = %cardinality,
        owning = direction.is_owning()
    );

    Ok(EdgeDef {
        declared_name: field.name.clone(),
        owner: owner.name().to_string(),
        target: target.name().to_string(),
        direction,
        bidirectional,
        counterpart: counterpart.name.clone(),
        cardinality,
        unique,
        required: options.required,
        immutable: options.immutable,
        bind_field,
        storage_key: options
            .storage_key
            .clone()
            .filter(|storage_key| !storage_key.is_empty()),
        struct_tag: non_empty(&options.struct_tag),
        comment: non_empty(&options.comment),
        annotations,
        name,
    })
}

fn find_counterpart<'f>(
    field: &FieldDescriptor,
    candidates: &[&'f FieldDescriptor],
) -> Result<&'f FieldDescriptor, ResolutionErrorKind> {
    if candidates.is_empty() {
        return Err(ResolutionErrorKind::NoCounterpart);
    }

    if let Some(ref_name) = field.ref_hint() {
        return candidates
            .iter()
            .copied()
            .find(|candidate| candidate.name == ref_name)
            .ok_or_else(|| ResolutionErrorKind::RefNotFound {
                ref_name: ref_name.to_string(),
            });
    }

    if let [only] = candidates {
        return Ok(*only);
    }

    let referencing: Vec<_> = candidates
        .iter()
        .copied()
        .filter(|candidate| candidate.ref_hint() == Some(field.name.as_str()))
        .collect();
    match referencing.as_slice() {
        [counterpart] => Ok(*counterpart),
        _ => Err(ResolutionErrorKind::Ambiguous {
            candidates: candidates
                .iter()
                .map(|candidate| candidate.name.clone())
                .collect(),
        }),
    }
}

// Exactly one side of a pair may carry the ref, and it must name the
// other side.
fn check_pairing(
    field: &FieldDescriptor,
    counterpart: &FieldDescriptor,
) -> Result<(), ResolutionErrorKind> {
    if ptr::eq(field, counterpart) {
        return Ok(());
    }
    let Some(counterpart_ref) = counterpart.ref_hint() else {
        return Ok(());
    };
    if field.ref_hint().is_some() || counterpart_ref != field.name {
        return Err(ResolutionErrorKind::ConflictingRefs {
            counterpart: counterpart.name.clone(),
        });
    }
    Ok(())
}

fn unique_edge_annotations(edge_name: &str, target: &IndexedEntity<'_>) -> Vec<Annotation> {
    let prefix = order_key(edge_name);
    target
        .orderable_fields()
        .map(|field| Annotation::OrderField(format!("{prefix}_{}", order_key(&field.name))))
        .collect()
}

// Keyed by the target entity; falls back to the edge name when the owner
// has several non-unique edges to the same target.
fn count_order_field(owner: &IndexedEntity<'_>, field: &FieldDescriptor, target: &str) -> String {
    let siblings = owner
        .references_to(target)
        .into_iter()
        .filter(|sibling| sibling.repeated)
        .count();
    if siblings > 1 {
        format!("{}_COUNT", order_key(&field.name))
    } else {
        format!("{}_COUNT", order_key(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DescriptorSet, FieldKind, MessageDescriptor};
    use crate::options::CompileOptions;

    fn resolve(set: &DescriptorSet, entity: &str, field: &str) -> Result<EdgeDef, ResolutionError> {
        let index = EntityIndex::build(set, &CompileOptions::default()).unwrap();
        let owner = index.get(entity).unwrap();
        let field = owner.descriptor.field(field).unwrap();
        resolve_edge(&index, owner, field)
    }

    #[test]
    fn single_candidate_needs_no_hint() {
        let set = DescriptorSet::new(vec![
            MessageDescriptor::new("User")
                .with_field(FieldDescriptor::message("profile", "Profile")),
            MessageDescriptor::new("Profile").with_field(FieldDescriptor::message("user", "User")),
        ]);
        let edge = resolve(&set, "User", "profile").unwrap();
        assert_eq!(edge.counterpart, "user");
        assert_eq!(edge.cardinality, Cardinality::OneToOne);
        assert!(edge.unique);
        assert_eq!(edge.direction, EdgeDirection::Owning);
    }

    #[test]
    fn missing_counterpart_is_an_error() {
        let set = DescriptorSet::new(vec![
            MessageDescriptor::new("User")
                .with_field(FieldDescriptor::message("profile", "Profile")),
            MessageDescriptor::new("Profile")
                .with_field(FieldDescriptor::new("bio", FieldKind::String)),
        ]);
        let err = resolve(&set, "User", "profile").unwrap_err();
        assert_eq!(err.kind, ResolutionErrorKind::NoCounterpart);
        assert_eq!(err.entity, "User");
        assert_eq!(err.field, "profile");
        assert_eq!(err.target, "Profile");
    }

    #[test]
    fn unselected_target_is_unknown() {
        let set = DescriptorSet::new(vec![
            MessageDescriptor::new("User")
                .with_field(FieldDescriptor::message("profile", "Profile")),
            MessageDescriptor::new("Profile")
                .with_field(FieldDescriptor::message("user", "User"))
                .skip_generation(),
        ]);
        let err = resolve(&set, "User", "profile").unwrap_err();
        assert_eq!(err.kind, ResolutionErrorKind::UnknownTarget);
    }

    #[test]
    fn ref_must_name_a_candidate() {
        let set = DescriptorSet::new(vec![
            MessageDescriptor::new("User")
                .with_field(FieldDescriptor::message("profile", "Profile").with_ref("owner")),
            MessageDescriptor::new("Profile").with_field(FieldDescriptor::message("user", "User")),
        ]);
        let err = resolve(&set, "User", "profile").unwrap_err();
        assert_eq!(
            err.kind,
            ResolutionErrorKind::RefNotFound {
                ref_name: "owner".to_string()
            }
        );
    }

    #[test]
    fn counterpart_ref_disambiguates() {
        let set = DescriptorSet::new(vec![
            MessageDescriptor::new("User")
                .with_field(FieldDescriptor::message("written", "Post").repeated())
                .with_field(FieldDescriptor::message("reviewed", "Post").repeated()),
            MessageDescriptor::new("Post")
                .with_field(FieldDescriptor::message("author", "User").with_ref("written"))
                .with_field(FieldDescriptor::message("reviewer", "User").with_ref("reviewed")),
        ]);
        let edge = resolve(&set, "User", "reviewed").unwrap();
        assert_eq!(edge.counterpart, "reviewer");
        assert_eq!(edge.direction, EdgeDirection::Owning);
        assert_eq!(edge.cardinality, Cardinality::OneToMany);
        assert_eq!(
            edge.order_fields().collect::<Vec<_>>(),
            vec!["REVIEWED_COUNT"]
        );
    }

    #[test]
    fn both_sides_naming_each_other_conflict() {
        let set = DescriptorSet::new(vec![
            MessageDescriptor::new("User")
                .with_field(FieldDescriptor::message("posts", "Post").repeated().with_ref("author")),
            MessageDescriptor::new("Post")
                .with_field(FieldDescriptor::message("author", "User").with_ref("posts")),
        ]);
        let err = resolve(&set, "User", "posts").unwrap_err();
        assert_eq!(
            err.kind,
            ResolutionErrorKind::ConflictingRefs {
                counterpart: "author".to_string()
            }
        );
    }

    #[test]
    fn counterpart_pairing_elsewhere_conflicts() {
        let set = DescriptorSet::new(vec![
            MessageDescriptor::new("User")
                .with_field(FieldDescriptor::message("written", "Post").repeated())
                .with_field(FieldDescriptor::message("edited", "Post").repeated()),
            MessageDescriptor::new("Post")
                .with_field(FieldDescriptor::message("author", "User").with_ref("written")),
        ]);
        let err = resolve(&set, "User", "edited").unwrap_err();
        assert!(matches!(err.kind, ResolutionErrorKind::ConflictingRefs { .. }));
    }

    #[test]
    fn edge_options_are_copied_through() {
        let mut owner_field = FieldDescriptor::message("author", "User").with_ref("posts");
        owner_field.options.edge.required = true;
        owner_field.options.edge.immutable = true;
        owner_field.options.edge.bind_field = true;
        owner_field.options.edge.comment = "written by".to_string();
        owner_field.options.edge.struct_tag = "json:\"author\"".to_string();
        owner_field.options.edge.storage_key = Some(EdgeStorageKey {
            column: "author_id".to_string(),
            ..EdgeStorageKey::default()
        });

        let set = DescriptorSet::new(vec![
            MessageDescriptor::new("Post").with_field(owner_field),
            MessageDescriptor::new("User")
                .with_field(FieldDescriptor::message("posts", "Post").repeated()),
        ]);
        let edge = resolve(&set, "Post", "author").unwrap();
        assert!(edge.required && edge.immutable);
        assert_eq!(edge.bind_field.as_deref(), Some("author_id"));
        assert_eq!(edge.comment.as_deref(), Some("written by"));
        assert_eq!(edge.struct_tag.as_deref(), Some("json:\"author\""));
        assert_eq!(
            edge.storage_key.as_ref().map(|key| key.column.as_str()),
            Some("author_id")
        );
    }

    #[test]
    fn empty_storage_key_is_dropped() {
        let mut field = FieldDescriptor::message("profile", "Profile");
        field.options.edge.storage_key = Some(EdgeStorageKey::default());
        field.options.edge.bind_field_name = Some("profile_ref".to_string());
        let set = DescriptorSet::new(vec![
            MessageDescriptor::new("User").with_field(field),
            MessageDescriptor::new("Profile").with_field(FieldDescriptor::message("user", "User")),
        ]);
        let edge = resolve(&set, "User", "profile").unwrap();
        assert!(edge.storage_key.is_none());
        assert_eq!(edge.bind_field.as_deref(), Some("profile_ref"));
    }

    #[test]
    fn several_count_edges_to_one_target_use_edge_names() {
        let set = DescriptorSet::new(vec![
            MessageDescriptor::new("Tag")
                .with_field(FieldDescriptor::message("posts", "Post").repeated())
                .with_field(FieldDescriptor::message("pinned", "Post").repeated()),
            MessageDescriptor::new("Post")
                .with_field(FieldDescriptor::message("tags", "Tag").repeated().with_ref("posts"))
                .with_field(FieldDescriptor::message("pinned_by", "Tag").repeated().with_ref("pinned")),
        ]);
        let posts = resolve(&set, "Tag", "posts").unwrap();
        let pinned = resolve(&set, "Tag", "pinned").unwrap();
        assert_eq!(posts.order_fields().collect::<Vec<_>>(), vec!["POSTS_COUNT"]);
        assert_eq!(pinned.order_fields().collect::<Vec<_>>(), vec!["PINNED_COUNT"]);
        assert_eq!(posts.cardinality, Cardinality::ManyToMany);
        assert!(!posts.unique);
    }
}
