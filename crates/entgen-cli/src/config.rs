use std::path::Path;

use entgen_core::CompileOptions;
use entgen_emit::EmitConfig;
use serde::{Deserialize, Serialize};

use crate::CliError;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "entgen.toml";

/// Contents of `entgen.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EntgenConfig {
    pub compile: CompileOptions,
    pub emit: EmitConfig,
}

/// Load an explicit config file, or the default one when it exists.
pub fn load_config(path: Option<&Path>) -> Result<EntgenConfig, CliError> {
    let path = match path {
        Some(path) => path,
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                return Ok(EntgenConfig::default());
            }
            default
        }
    };
    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str(&content)?;
    Ok(config)
}
