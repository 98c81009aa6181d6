use std::fs;
use std::path::{Path, PathBuf};

use entgen_core::{CompileOptions, DescriptorSet, SchemaObject, compile};
use entgen_emit::{EmitConfig, EmitError, emit_all};

fn compile_fixture() -> Vec<SchemaObject> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../entgen-core/tests/fixtures/blog.descriptors.json");
    let raw = fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("missing fixture at {}", path.display()));
    let set: DescriptorSet = serde_json::from_str(&raw).expect("parse fixture");
    compile(&set, &CompileOptions::default()).expect("compile fixture")
}

#[test]
fn emits_schema_graphql_and_manifest_files() {
    let objects = compile_fixture();
    let files = emit_all(&objects, &EmitConfig::default()).expect("emit");
    let paths: Vec<_> = files.iter().map(|file| file.path.clone()).collect();

    assert_eq!(paths.len(), objects.len() * 2 + 1);
    assert_eq!(paths[0], PathBuf::from("ent/schema/author.go"));
    assert!(paths.contains(&PathBuf::from("graphql/comment.graphql")));
    assert_eq!(paths.last(), Some(&PathBuf::from("config/gqlgen.yml")));

    let post = &files[1].contents;
    assert!(post.starts_with("// Code generated by entgen. DO NOT EDIT.\n"));
    assert!(post.contains("field.Enum(\"status\").Values(\"STATUS_DRAFT\", \"STATUS_PUBLISHED\")"));
    assert!(post.contains("field.Uint32(\"views\").Annotations(entgql.OrderField(\"VIEWS\"), entgql.Type(\"Uint32\"))"));
    assert!(post.contains("field.Strings(\"keywords\"),"));
    assert!(post.contains("edge.To(\"tags\", Tag.Type)"));
    assert!(!post.contains("legacy_blob"));
}

#[test]
fn emission_is_deterministic() {
    let objects = compile_fixture();
    let first = emit_all(&objects, &EmitConfig::default()).expect("first emit");
    let second = emit_all(&objects, &EmitConfig::default()).expect("second emit");
    assert_eq!(first, second);
}

#[test]
fn dangling_edge_target_is_rejected() {
    let objects: Vec<_> = compile_fixture()
        .into_iter()
        .filter(|object| object.name != "Tag")
        .collect();
    let err = emit_all(&objects, &EmitConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        EmitError::UnknownEntity { ref entity, ref target, .. } if entity == "Post" && target == "Tag"
    ));
}
