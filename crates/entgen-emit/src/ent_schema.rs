//! ORM schema source for one entity.

use std::collections::BTreeSet;
use std::fmt::Write;

use entgen_core::{
    Annotation, EdgeDef, EdgeDirection, EdgeStorageKey, EntityAnnotation, FieldDef, SchemaObject,
};

use crate::errors::Result;
use crate::go::{quote, quote_all, raw};
use crate::HEADER;

const ENTGQL: &str = "entgo.io/contrib/entgql";
const ENT: &str = "entgo.io/ent";
const ENT_SCHEMA: &str = "entgo.io/ent/schema";
const ENT_EDGE: &str = "entgo.io/ent/schema/edge";
const ENT_FIELD: &str = "entgo.io/ent/schema/field";
const UUID: &str = "github.com/google/uuid";

/// Render the `package schema` source file for `object`.
pub fn render(object: &SchemaObject) -> Result<String> {
    let fields: Vec<String> = object.fields.iter().map(field_definition).collect();
    let edges: Vec<String> = object.edges.iter().map(edge_definition).collect();
    let annotations: Vec<String> = object.annotations.iter().map(entity_annotation).collect();

    let mut out = String::new();
    writeln!(out, "{HEADER}")?;
    writeln!(out)?;
    writeln!(out, "package schema")?;
    writeln!(out)?;
    writeln!(out, "import (")?;
    for import in imports(object) {
        writeln!(out, "\t{}", quote(import))?;
    }
    writeln!(out, ")")?;
    writeln!(out)?;
    writeln!(out, "type {} struct {{", object.name)?;
    writeln!(out, "\tent.Schema")?;
    writeln!(out, "}}")?;
    write_block(&mut out, &object.name, "Fields", "ent.Field", &fields)?;
    write_block(&mut out, &object.name, "Edges", "ent.Edge", &edges)?;
    write_block(
        &mut out,
        &object.name,
        "Annotations",
        "schema.Annotation",
        &annotations,
    )?;
    Ok(out)
}

fn write_block(
    out: &mut String,
    name: &str,
    method: &str,
    item_type: &str,
    items: &[String],
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "func ({name}) {method}() []{item_type} {{")?;
    writeln!(out, "\treturn []{item_type}{{")?;
    for item in items {
        writeln!(out, "\t\t{item},")?;
    }
    writeln!(out, "\t}}")?;
    writeln!(out, "}}")?;
    Ok(())
}

// Only packages the body refers to; gofmt order.
fn imports(object: &SchemaObject) -> BTreeSet<&'static str> {
    let mut imports = BTreeSet::from([ENT, ENT_SCHEMA]);
    if !object.fields.is_empty() {
        imports.insert(ENT_FIELD);
    }
    if !object.edges.is_empty() {
        imports.insert(ENT_EDGE);
    }
    if object.fields.iter().any(|field| field.is_identity) {
        imports.insert(UUID);
    }
    let uses_entgql = !object.annotations.is_empty()
        || object.fields.iter().any(|field| !field.annotations.is_empty())
        || object.edges.iter().any(|edge| !edge.annotations.is_empty());
    if uses_entgql {
        imports.insert(ENTGQL);
    }
    imports
}

fn field_definition(field: &FieldDef) -> String {
    let mut parts = Vec::new();
    if field.is_identity {
        parts.push(format!(
            "field.{}({}, uuid.UUID{{}})",
            field.storage_kind,
            quote(&field.name)
        ));
    } else {
        parts.push(format!("field.{}({})", field.storage_kind, quote(&field.name)));
    }
    if !field.enum_values.is_empty() {
        parts.push(format!("Values({})", quote_all(&field.enum_values)));
    }
    if let Some(default) = &field.default_expr {
        parts.push(format!("Default({default})"));
    }
    if let Some(default_func) = &field.default_func_expr {
        parts.push(format!("DefaultFunc({default_func})"));
    }
    if field.optional {
        parts.push("Optional()".to_string());
    }
    if field.nillable {
        parts.push("Nillable()".to_string());
    }
    if field.immutable {
        parts.push("Immutable()".to_string());
    }
    if field.unique {
        parts.push("Unique()".to_string());
    }
    if let Some(comment) = &field.comment {
        parts.push(format!("Comment({})", quote(comment)));
    }
    if let Some(storage_key) = &field.storage_key {
        parts.push(format!("StorageKey({})", quote(storage_key)));
    }
    if let Some(struct_tag) = &field.struct_tag {
        parts.push(format!("StructTag({})", raw(struct_tag)));
    }
    if field.sensitive {
        parts.push("Sensitive()".to_string());
    }
    if let Some(go_type) = &field.go_type {
        parts.push(format!("GoType({go_type})"));
    }
    if !field.annotations.is_empty() {
        parts.push(annotations_call(&field.annotations));
    }
    parts.join(".")
}

fn edge_definition(edge: &EdgeDef) -> String {
    let mut parts = Vec::new();
    match &edge.direction {
        EdgeDirection::Owning => parts.push(format!(
            "edge.To({}, {}.Type)",
            quote(&edge.name),
            edge.target
        )),
        EdgeDirection::Referencing { ref_name } => {
            parts.push(format!(
                "edge.From({}, {}.Type)",
                quote(&edge.name),
                edge.target
            ));
            parts.push(format!("Ref({})", quote(ref_name)));
        }
    }
    if edge.unique {
        parts.push("Unique()".to_string());
    }
    if let Some(bind_field) = &edge.bind_field {
        parts.push(format!("Field({})", quote(bind_field)));
    }
    if edge.required {
        parts.push("Required()".to_string());
    }
    if edge.immutable {
        parts.push("Immutable()".to_string());
    }
    if let Some(storage_key) = &edge.storage_key {
        parts.push(format!("StorageKey({})", storage_key_options(storage_key)));
    }
    if let Some(struct_tag) = &edge.struct_tag {
        parts.push(format!("StructTag({})", raw(struct_tag)));
    }
    if let Some(comment) = &edge.comment {
        parts.push(format!("Comment({})", quote(comment)));
    }
    if !edge.annotations.is_empty() {
        parts.push(annotations_call(&edge.annotations));
    }
    parts.join(".")
}

fn storage_key_options(key: &EdgeStorageKey) -> String {
    let mut options = Vec::new();
    if !key.symbols.is_empty() {
        options.push(format!("edge.Symbols({})", quote_all(&key.symbols)));
    }
    if !key.columns.is_empty() {
        options.push(format!("edge.Columns({})", quote_all(&key.columns)));
    }
    if !key.column.is_empty() {
        options.push(format!("edge.Column({})", quote(&key.column)));
    }
    if !key.table.is_empty() {
        options.push(format!("edge.Table({})", quote(&key.table)));
    }
    if !key.symbol.is_empty() {
        options.push(format!("edge.Symbol({})", quote(&key.symbol)));
    }
    options.join(", ")
}

fn annotations_call(annotations: &[Annotation]) -> String {
    let rendered: Vec<String> = annotations
        .iter()
        .map(|annotation| match annotation {
            Annotation::OrderField(name) => format!("entgql.OrderField({})", quote(name)),
            Annotation::GraphqlType(name) => format!("entgql.Type({})", quote(name)),
            Annotation::RelayConnection => "entgql.RelayConnection()".to_string(),
        })
        .collect();
    format!("Annotations({})", rendered.join(", "))
}

fn entity_annotation(annotation: &EntityAnnotation) -> String {
    match annotation {
        EntityAnnotation::QueryField => "entgql.QueryField()".to_string(),
        EntityAnnotation::RelayConnection => "entgql.RelayConnection()".to_string(),
        EntityAnnotation::Mutations { create, update } => {
            let mut mutations = Vec::new();
            if *create {
                mutations.push("entgql.MutationCreate()");
            }
            if *update {
                mutations.push("entgql.MutationUpdate()");
            }
            format!("entgql.Mutations({})", mutations.join(", "))
        }
    }
}
