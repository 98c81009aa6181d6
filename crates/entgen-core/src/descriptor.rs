use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Descriptor set handed over by the IDL front end.
///
/// The compiler only ever borrows this tree; everything it produces owns
/// its own copies of the attributes it needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DescriptorSet {
    /// Entities in declaration order.
    pub entities: Vec<MessageDescriptor>,
}

impl DescriptorSet {
    pub fn new(entities: Vec<MessageDescriptor>) -> Self {
        Self { entities }
    }
}

/// A message-like record supplied by the front end.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MessageDescriptor {
    pub name: String,
    #[serde(default)]
    pub options: MessageOptions,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl MessageDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: MessageOptions { generate: true },
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn skip_generation(mut self) -> Self {
        self.options.generate = false;
        self
    }

    /// Looks up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Per-message generation options.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct MessageOptions {
    /// Opt-in flag: only messages with `generate` set become entities.
    #[serde(default)]
    pub generate: bool,
}

/// A single declared field.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub repeated: bool,
    /// Explicit-presence marker (`optional` keyword) on the source field.
    #[serde(default)]
    pub optional: bool,
    /// Full name of the referenced message or enum type.
    #[serde(default)]
    pub type_name: Option<String>,
    /// Declared enum literals, in declaration order.
    #[serde(default)]
    pub enum_values: Vec<String>,
    #[serde(default)]
    pub options: FieldOptions,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            repeated: false,
            optional: false,
            type_name: None,
            enum_values: Vec::new(),
            options: FieldOptions::default(),
        }
    }

    /// Shorthand for a field referencing another message by name.
    pub fn message(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let mut field = Self::new(name, FieldKind::Message);
        field.type_name = Some(type_name.into());
        field
    }

    pub fn enumeration<I, S>(name: impl Into<String>, type_name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut field = Self::new(name, FieldKind::Enum);
        field.type_name = Some(type_name.into());
        field.enum_values = values.into_iter().map(Into::into).collect();
        field
    }

    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_ref(mut self, ref_name: impl Into<String>) -> Self {
        self.options.edge.ref_name = ref_name.into();
        self
    }

    pub fn with_options(mut self, options: FieldOptions) -> Self {
        self.options = options;
        self
    }

    pub fn is_message(&self) -> bool {
        self.kind == FieldKind::Message
    }

    pub fn is_ignored(&self) -> bool {
        self.options.ignore
    }

    /// The ref hint, if one is set.
    pub fn ref_hint(&self) -> Option<&str> {
        let ref_name = self.options.edge.ref_name.as_str();
        if ref_name.is_empty() {
            None
        } else {
            Some(ref_name)
        }
    }
}

/// Wire kind of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Group,
    Message,
    Bytes,
    Uint32,
    Enum,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Double => "double",
            FieldKind::Float => "float",
            FieldKind::Int64 => "int64",
            FieldKind::Uint64 => "uint64",
            FieldKind::Int32 => "int32",
            FieldKind::Fixed64 => "fixed64",
            FieldKind::Fixed32 => "fixed32",
            FieldKind::Bool => "bool",
            FieldKind::String => "string",
            FieldKind::Group => "group",
            FieldKind::Message => "message",
            FieldKind::Bytes => "bytes",
            FieldKind::Uint32 => "uint32",
            FieldKind::Enum => "enum",
            FieldKind::Sfixed32 => "sfixed32",
            FieldKind::Sfixed64 => "sfixed64",
            FieldKind::Sint32 => "sint32",
            FieldKind::Sint64 => "sint64",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit overrides attached to a field.
///
/// The compiler copies these through verbatim; it never interprets the
/// content of expressions such as `default` or `struct_tag`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FieldOptions {
    pub ignore: bool,
    pub default: String,
    pub default_func: String,
    pub nillable: bool,
    pub immutable: bool,
    pub unique: bool,
    pub comment: String,
    pub storage_key: String,
    pub struct_tag: String,
    pub sensitive: bool,
    pub go_type: String,
    /// Explicit API type, wins over the derived unsigned-integer override.
    pub graphql_type: String,
    /// Keep enum literals carrying the unspecified marker.
    pub include_unspecified_enum: bool,
    pub edge: EdgeOptions,
}

/// Edge-specific overrides for message-typed fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EdgeOptions {
    /// Name of the counterpart field on the target entity.
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub required: bool,
    pub immutable: bool,
    pub storage_key: Option<EdgeStorageKey>,
    pub struct_tag: String,
    pub comment: String,
    /// Bind the edge to a scalar foreign-key field.
    pub bind_field: bool,
    /// Overrides the default `<edge>_id` bind field name; implies `bind_field`.
    pub bind_field_name: Option<String>,
}

/// Physical storage override for an edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EdgeStorageKey {
    pub table: String,
    pub columns: Vec<String>,
    pub column: String,
    pub symbols: Vec<String>,
    pub symbol: String,
}

impl EdgeStorageKey {
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
            && self.columns.is_empty()
            && self.column.is_empty()
            && self.symbols.is_empty()
            && self.symbol.is_empty()
    }
}
