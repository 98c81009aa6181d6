use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::descriptor::{FieldDescriptor, FieldKind, MessageDescriptor};
use crate::error::ClassificationError;
use crate::naming::{order_key, pascal, snake};
use crate::options::CompileOptions;
use crate::types::{Annotation, StorageKind};

/// Name of the identity field.
pub const ID_FIELD: &str = "id";

/// Default expression stamped on the identity field.
pub const ID_DEFAULT: &str = "uuid.New";

/// A classified, non-reference field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldDef {
    /// Storage name (snake case).
    pub name: String,
    /// Name as declared in the descriptor.
    pub declared_name: String,
    pub storage_kind: StorageKind,
    pub is_identity: bool,
    pub go_type: Option<String>,
    pub default_expr: Option<String>,
    pub default_func_expr: Option<String>,
    pub optional: bool,
    pub nillable: bool,
    pub immutable: bool,
    pub unique: bool,
    pub comment: Option<String>,
    pub storage_key: Option<String>,
    pub struct_tag: Option<String>,
    pub sensitive: bool,
    pub enum_values: Vec<String>,
    /// Enum type name for API schemas (`<Entity><Field>`), enum fields only.
    pub enum_type_name: Option<String>,
    pub annotations: Vec<Annotation>,
}

impl FieldDef {
    /// The explicit or derived API type override, if any.
    pub fn graphql_type_override(&self) -> Option<&str> {
        self.annotations.iter().find_map(|annotation| match annotation {
            Annotation::GraphqlType(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// API scalar name this field exposes.
    pub fn graphql_scalar(&self) -> Option<&str> {
        self.graphql_type_override()
            .or_else(|| self.storage_kind.graphql_scalar())
    }
}

/// Returns true when a field is routed to the relationship resolver.
pub fn is_reference(field: &FieldDescriptor, options: &CompileOptions) -> bool {
    field.is_message() && !is_timestamp(field, options)
}

fn is_timestamp(field: &FieldDescriptor, options: &CompileOptions) -> bool {
    field.is_message()
        && field
            .type_name
            .as_deref()
            .is_some_and(|type_name| options.is_timestamp(type_name))
}

/// Classify a non-reference field into its storage definition.
pub fn classify_field(
    entity: &MessageDescriptor,
    field: &FieldDescriptor,
    options: &CompileOptions,
) -> Result<FieldDef, ClassificationError> {
    if field.name == ID_FIELD {
        return Ok(identity_field());
    }

    let storage_kind = storage_kind(field, options).ok_or_else(|| ClassificationError {
        entity: entity.name.clone(),
        field: field.name.clone(),
        kind: field.kind,
        repeated: field.repeated,
    })?;

    let field_options = &field.options;
    let name = snake(&field.name);

    let (enum_values, enum_type_name) = if field.kind == FieldKind::Enum {
        (
            enum_values(field, options),
            Some(format!("{}{}", entity.name, pascal(&field.name))),
        )
    } else {
        (Vec::new(), None)
    };

    let mut annotations = Vec::new();
    if !storage_kind.is_collection() {
        annotations.push(Annotation::OrderField(order_key(&name)));
    }
    if let Some(graphql_type) = non_empty(&field_options.graphql_type) {
        annotations.push(Annotation::GraphqlType(graphql_type));
    } else if let Some(graphql_type) = storage_kind.graphql_override() {
        annotations.push(Annotation::GraphqlType(graphql_type.to_string()));
    }

    Ok(FieldDef {
        name,
        declared_name: field.name.clone(),
        storage_kind,
        is_identity: false,
        go_type: non_empty(&field_options.go_type),
        default_expr: non_empty(&field_options.default),
        default_func_expr: non_empty(&field_options.default_func),
        optional: field.optional,
        nillable: field_options.nillable,
        immutable: field_options.immutable,
        unique: field_options.unique,
        comment: non_empty(&field_options.comment),
        storage_key: non_empty(&field_options.storage_key),
        struct_tag: non_empty(&field_options.struct_tag),
        sensitive: field_options.sensitive,
        enum_values,
        enum_type_name,
        annotations,
    })
}

fn identity_field() -> FieldDef {
    FieldDef {
        name: ID_FIELD.to_string(),
        declared_name: ID_FIELD.to_string(),
        storage_kind: StorageKind::Uuid,
        is_identity: true,
        go_type: None,
        default_expr: Some(ID_DEFAULT.to_string()),
        default_func_expr: None,
        optional: false,
        nillable: false,
        immutable: false,
        unique: false,
        comment: None,
        storage_key: None,
        struct_tag: None,
        sensitive: false,
        enum_values: Vec::new(),
        enum_type_name: None,
        annotations: Vec::new(),
    }
}

fn storage_kind(field: &FieldDescriptor, options: &CompileOptions) -> Option<StorageKind> {
    if is_timestamp(field, options) {
        return (!field.repeated).then_some(StorageKind::Time);
    }
    if field.repeated {
        repeated_storage_kind(field.kind)
    } else {
        scalar_storage_kind(field.kind)
    }
}

fn scalar_storage_kind(kind: FieldKind) -> Option<StorageKind> {
    let storage_kind = match kind {
        FieldKind::String => StorageKind::String,
        FieldKind::Bool => StorageKind::Bool,
        FieldKind::Enum => StorageKind::Enum,
        FieldKind::Int32 | FieldKind::Sint32 | FieldKind::Sfixed32 => StorageKind::Int32,
        FieldKind::Uint32 | FieldKind::Fixed32 => StorageKind::Uint32,
        FieldKind::Int64 | FieldKind::Sint64 | FieldKind::Sfixed64 => StorageKind::Int64,
        FieldKind::Uint64 | FieldKind::Fixed64 => StorageKind::Uint64,
        FieldKind::Float | FieldKind::Double => StorageKind::Float,
        FieldKind::Bytes => StorageKind::Bytes,
        FieldKind::Group | FieldKind::Message => return None,
    };
    Some(storage_kind)
}

// No collection kind exists for bool, enum or bytes.
fn repeated_storage_kind(kind: FieldKind) -> Option<StorageKind> {
    let storage_kind = match kind {
        FieldKind::String => StorageKind::Strings,
        FieldKind::Int32
        | FieldKind::Sint32
        | FieldKind::Uint32
        | FieldKind::Sfixed32
        | FieldKind::Fixed32
        | FieldKind::Int64
        | FieldKind::Sint64
        | FieldKind::Uint64
        | FieldKind::Sfixed64
        | FieldKind::Fixed64 => StorageKind::Ints,
        FieldKind::Float | FieldKind::Double => StorageKind::Floats,
        FieldKind::Bool
        | FieldKind::Enum
        | FieldKind::Bytes
        | FieldKind::Group
        | FieldKind::Message => return None,
    };
    Some(storage_kind)
}

fn enum_values(field: &FieldDescriptor, options: &CompileOptions) -> Vec<String> {
    let suffix = options.unspecified_enum_suffix.as_str();
    let keep_unspecified = field.options.include_unspecified_enum || suffix.is_empty();
    field
        .enum_values
        .iter()
        .filter(|value| keep_unspecified || !value.ends_with(suffix))
        .cloned()
        .collect()
}

pub(crate) fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
