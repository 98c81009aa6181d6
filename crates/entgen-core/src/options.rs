use serde::{Deserialize, Serialize};

/// Suffix marking the conventional zero-value enum literal.
pub const DEFAULT_UNSPECIFIED_ENUM_SUFFIX: &str = "_UNSPECIFIED";

/// Message type classified as a `Time` scalar instead of an edge.
pub const DEFAULT_TIMESTAMP_TYPE: &str = "google.protobuf.Timestamp";

/// Explicit configuration for a compile run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompileOptions {
    /// Enum literals ending with this suffix are dropped unless a field
    /// opts into keeping them.
    pub unspecified_enum_suffix: String,
    /// Fully-qualified message names treated as timestamps.
    pub timestamp_type_names: Vec<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            unspecified_enum_suffix: DEFAULT_UNSPECIFIED_ENUM_SUFFIX.to_string(),
            timestamp_type_names: vec![DEFAULT_TIMESTAMP_TYPE.to_string()],
        }
    }
}

impl CompileOptions {
    pub fn is_timestamp(&self, type_name: &str) -> bool {
        let type_name = type_name.trim_start_matches('.');
        self.timestamp_type_names
            .iter()
            .any(|name| name.trim_start_matches('.') == type_name)
    }
}
