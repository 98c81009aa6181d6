use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Storage field type of a classified field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    Uuid,
    String,
    Bool,
    Enum,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float,
    Bytes,
    Time,
    /// Collection kinds.
    Strings,
    Ints,
    Floats,
}

impl StorageKind {
    /// Name of the storage type constructor, e.g. `Int32` or `Strings`.
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::Uuid => "UUID",
            StorageKind::String => "String",
            StorageKind::Bool => "Bool",
            StorageKind::Enum => "Enum",
            StorageKind::Int32 => "Int32",
            StorageKind::Uint32 => "Uint32",
            StorageKind::Int64 => "Int64",
            StorageKind::Uint64 => "Uint64",
            StorageKind::Float => "Float",
            StorageKind::Bytes => "Bytes",
            StorageKind::Time => "Time",
            StorageKind::Strings => "Strings",
            StorageKind::Ints => "Ints",
            StorageKind::Floats => "Floats",
        }
    }

    pub fn is_collection(self) -> bool {
        matches!(
            self,
            StorageKind::Strings | StorageKind::Ints | StorageKind::Floats
        )
    }

    /// API scalar this kind is exposed as, when there is one.
    pub fn graphql_scalar(self) -> Option<&'static str> {
        match self {
            StorageKind::Uuid => Some("ID"),
            StorageKind::String | StorageKind::Strings => Some("String"),
            StorageKind::Bool => Some("Boolean"),
            StorageKind::Int32 | StorageKind::Int64 | StorageKind::Ints => Some("Int"),
            StorageKind::Uint32 => Some("Uint32"),
            StorageKind::Uint64 => Some("Uint64"),
            StorageKind::Float | StorageKind::Floats => Some("Float"),
            StorageKind::Time => Some("Time"),
            StorageKind::Enum | StorageKind::Bytes => None,
        }
    }

    /// Substitute API type for kinds without a native equivalent.
    pub fn graphql_override(self) -> Option<&'static str> {
        match self {
            StorageKind::Uint32 => Some("Uint32"),
            StorageKind::Uint64 => Some("Uint64"),
            _ => None,
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many counterpart records each side of an edge may relate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Cardinality {
    /// Cardinality from the repeated-ness of the declaring field and its counterpart.
    pub fn between(declaring_repeated: bool, counterpart_repeated: bool) -> Self {
        match (declaring_repeated, counterpart_repeated) {
            (false, false) => Cardinality::OneToOne,
            (true, false) => Cardinality::OneToMany,
            (false, true) => Cardinality::ManyToOne,
            (true, true) => Cardinality::ManyToMany,
        }
    }

    /// The declaring end holds at most one counterpart.
    pub fn is_unique(self) -> bool {
        matches!(self, Cardinality::OneToOne | Cardinality::ManyToOne)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Cardinality::OneToOne => "OneToOne",
            Cardinality::OneToMany => "OneToMany",
            Cardinality::ManyToOne => "ManyToOne",
            Cardinality::ManyToMany => "ManyToMany",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of an edge carries the storage declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgeDirection {
    /// Forward relationship, may carry a physical storage override.
    Owning,
    /// Back-reference to the counterpart field by name.
    Referencing { ref_name: String },
}

impl EdgeDirection {
    pub fn is_owning(&self) -> bool {
        matches!(self, EdgeDirection::Owning)
    }

    pub fn ref_name(&self) -> Option<&str> {
        match self {
            EdgeDirection::Owning => None,
            EdgeDirection::Referencing { ref_name } => Some(ref_name),
        }
    }
}

/// Derived annotation attached to a field or an edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Annotation {
    /// Orderable by the named order field.
    OrderField(String),
    /// Explicit API type override.
    GraphqlType(String),
    /// Paginated connection for non-unique edges.
    RelayConnection,
}

impl Annotation {
    pub fn order_field(&self) -> Option<&str> {
        match self {
            Annotation::OrderField(name) => Some(name),
            _ => None,
        }
    }
}

/// Entity-level annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityAnnotation {
    QueryField,
    RelayConnection,
    Mutations { create: bool, update: bool },
}
