use entgen_core::{
    Cardinality, CompileOptions, DescriptorSet, EdgeDirection, Error, FieldDescriptor, FieldKind,
    MessageDescriptor, ResolutionErrorKind, SchemaObject, StorageKind, compile,
};

fn entity(name: &str) -> MessageDescriptor {
    MessageDescriptor::new(name).with_field(FieldDescriptor::new("id", FieldKind::String))
}

fn run(entities: Vec<MessageDescriptor>) -> Result<Vec<SchemaObject>, Error> {
    compile(&DescriptorSet::new(entities), &CompileOptions::default())
}

fn resolution_kind(err: Error) -> ResolutionErrorKind {
    match err {
        Error::Resolution(err) => err.kind,
        other => panic!("expected resolution error, got {other}"),
    }
}

// A declares one edge to B; B declares two fields of type A.
fn two_candidates(ref_on_a: Option<&str>) -> Vec<MessageDescriptor> {
    let mut owner = FieldDescriptor::message("reviewer_of", "B");
    if let Some(ref_name) = ref_on_a {
        owner = owner.with_ref(ref_name);
    }
    vec![
        entity("A").with_field(owner),
        entity("B")
            .with_field(FieldDescriptor::message("author", "A"))
            .with_field(FieldDescriptor::message("reviewer", "A")),
    ]
}

#[test]
fn ambiguity_is_rejected_without_a_ref() {
    let err = run(two_candidates(None)).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("A.reviewer_of"), "{message}");
    assert_eq!(
        resolution_kind(err),
        ResolutionErrorKind::Ambiguous {
            candidates: vec!["author".to_string(), "reviewer".to_string()]
        }
    );
}

#[test]
fn ignored_field_is_not_a_candidate() {
    let mut legacy = FieldDescriptor::message("legacy_author", "A");
    legacy.options.ignore = true;
    let objects = run(vec![
        entity("A").with_field(FieldDescriptor::message("b", "B")),
        entity("B")
            .with_field(FieldDescriptor::message("author", "A"))
            .with_field(legacy),
    ])
    .unwrap();

    assert_eq!(objects[0].edges[0].counterpart, "author");
    assert_eq!(objects[1].edges.len(), 1);
    assert_eq!(objects[1].edges[0].counterpart, "b");
}

#[test]
fn message_typed_id_stays_the_identity_column() {
    let objects = run(vec![
        MessageDescriptor::new("Post")
            .with_field(FieldDescriptor::message("id", "acme.PostId"))
            .with_field(FieldDescriptor::new("title", FieldKind::String)),
    ])
    .unwrap();
    let id = &objects[0].fields[0];
    assert!(id.is_identity);
    assert_eq!(id.storage_kind, StorageKind::Uuid);
    assert!(objects[0].edges.is_empty());
}

#[test]
fn ref_on_declaring_side_picks_the_named_candidate() {
    let entities = two_candidates(Some("reviewer"));
    let index_set = DescriptorSet::new(entities);
    let index = entgen_core::EntityIndex::build(&index_set, &CompileOptions::default()).unwrap();
    let owner = index.get("A").unwrap();
    let field = owner.descriptor.field("reviewer_of").unwrap();
    let edge = entgen_core::resolve_edge(&index, owner, field).unwrap();

    assert_eq!(edge.counterpart, "reviewer");
    assert_eq!(edge.cardinality, Cardinality::OneToOne);
    assert_eq!(edge.direction.ref_name(), Some("reviewer"));
}

#[test]
fn unmatched_ref_is_reported() {
    let err = run(two_candidates(Some("editor"))).unwrap_err();
    assert_eq!(
        resolution_kind(err),
        ResolutionErrorKind::RefNotFound {
            ref_name: "editor".to_string()
        }
    );
}

#[test]
fn missing_counterpart_is_reported() {
    let err = run(vec![
        entity("Post").with_field(FieldDescriptor::message("author", "Author")),
        entity("Author").with_field(FieldDescriptor::new("name", FieldKind::String)),
    ])
    .unwrap_err();
    assert_eq!(resolution_kind(err), ResolutionErrorKind::NoCounterpart);
}

#[test]
fn reference_outside_the_generation_set_is_reported() {
    let err = run(vec![
        entity("Post").with_field(FieldDescriptor::message("author", "Author")),
        entity("Author")
            .with_field(FieldDescriptor::message("posts", "Post").repeated())
            .skip_generation(),
    ])
    .unwrap_err();
    assert_eq!(resolution_kind(err), ResolutionErrorKind::UnknownTarget);
}

#[test]
fn refs_on_both_sides_conflict() {
    let err = run(vec![
        entity("Post").with_field(FieldDescriptor::message("author", "Author").with_ref("posts")),
        entity("Author")
            .with_field(FieldDescriptor::message("posts", "Post").repeated().with_ref("author")),
    ])
    .unwrap_err();
    assert!(matches!(
        resolution_kind(err),
        ResolutionErrorKind::ConflictingRefs { .. }
    ));
}

#[test]
fn group_kind_halts_before_any_object_is_built() {
    let err = run(vec![
        entity("Post").with_field(FieldDescriptor::new("title", FieldKind::String)),
        entity("Legacy").with_field(FieldDescriptor::new("payload", FieldKind::Group)),
    ])
    .unwrap_err();
    match err {
        Error::Classification(err) => {
            assert_eq!(err.entity, "Legacy");
            assert_eq!(err.field, "payload");
            assert_eq!(err.kind, FieldKind::Group);
        }
        other => panic!("expected classification error, got {other}"),
    }
}

#[test]
fn bidirectional_many_to_many_between_two_entities() {
    let objects = run(vec![
        entity("Student")
            .with_field(FieldDescriptor::message("courses", "Course").repeated()),
        entity("Course").with_field(
            FieldDescriptor::message("students", "Student")
                .repeated()
                .with_ref("courses"),
        ),
    ])
    .unwrap();
    let courses = &objects[0].edges[0];
    let students = &objects[1].edges[0];

    assert_eq!(courses.cardinality, Cardinality::ManyToMany);
    assert_eq!(students.cardinality, Cardinality::ManyToMany);
    assert!(!courses.unique && !students.unique);
    assert!(!courses.bidirectional && !students.bidirectional);
    assert_eq!(courses.direction, EdgeDirection::Owning);
    assert_eq!(students.direction.ref_name(), Some("courses"));
}

#[test]
fn self_reference_to_itself_is_bidirectional_one_to_one() {
    let objects = run(vec![
        entity("Person").with_field(FieldDescriptor::message("spouse", "Person").with_ref("spouse")),
    ])
    .unwrap();
    let spouse = &objects[0].edges[0];
    assert!(spouse.bidirectional);
    assert_eq!(spouse.direction, EdgeDirection::Owning);
    assert_eq!(spouse.cardinality, Cardinality::OneToOne);
    assert!(spouse.unique);
}

#[test]
fn self_reference_pair_uses_owning_and_referencing_sides() {
    let objects = run(vec![
        entity("Employee")
            .with_field(FieldDescriptor::new("name", FieldKind::String))
            .with_field(FieldDescriptor::message("manager", "Employee").with_ref("reports"))
            .with_field(FieldDescriptor::message("reports", "Employee").repeated()),
    ])
    .unwrap();
    let employee = &objects[0];
    let manager = employee.edge("manager").unwrap();
    let reports = employee.edge("reports").unwrap();

    assert_eq!(manager.cardinality, Cardinality::ManyToOne);
    assert_eq!(manager.direction.ref_name(), Some("reports"));
    assert!(!manager.bidirectional);
    assert_eq!(
        manager.order_fields().collect::<Vec<_>>(),
        vec!["MANAGER_NAME"]
    );

    assert_eq!(reports.cardinality, Cardinality::OneToMany);
    assert_eq!(reports.counterpart, "manager");
    assert!(reports.direction.is_owning());
}

#[test]
fn every_repeated_combination_resolves_to_a_defined_cardinality() {
    for (left, right) in [(false, false), (true, false), (false, true), (true, true)] {
        let mut forward = FieldDescriptor::message("b", "B");
        forward.repeated = left;
        let mut back = FieldDescriptor::message("a", "A");
        back.repeated = right;

        let objects = run(vec![entity("A").with_field(forward), entity("B").with_field(back)])
            .unwrap();
        let edge = &objects[0].edges[0];
        assert_eq!(edge.cardinality, Cardinality::between(left, right));
        assert_eq!(edge.unique, !left);
    }
}
