use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Output layout of the emitted files, relative to the output directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EmitConfig {
    /// Directory holding the ORM schema sources.
    pub schema_dir: PathBuf,
    /// Directory holding the API schema extensions.
    pub graphql_dir: PathBuf,
    /// Go import path of the generated ORM package.
    pub ent_package: String,
    /// Directory holding tool configuration such as `gqlgen.yml`.
    pub config_dir: PathBuf,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            schema_dir: PathBuf::from("ent/schema"),
            graphql_dir: PathBuf::from("graphql"),
            ent_package: "app/ent".to_string(),
            config_dir: PathBuf::from("config"),
        }
    }
}
