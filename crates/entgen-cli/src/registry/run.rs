use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RegistryResult;
use crate::atomic::write_json_atomic;

pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub input: PathBuf,
    pub out_dir: PathBuf,
    pub ir_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    Running,
    Ok,
    Error,
}

/// `manifest.json` written next to the generated output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: String,
    pub status: RunStatus,
    pub input: String,
    pub ir_only: bool,
    pub ir_version: String,
    pub cli_version: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub entities: Option<usize>,
    /// Written files, relative to the output directory.
    pub files: Vec<String>,
    pub error: Option<String>,
    pub git: GitInfo,
}

/// Git metadata for reproducibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitInfo {
    pub commit: Option<String>,
    pub dirty: Option<bool>,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub out_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub ir_path: PathBuf,
    pub logs_path: PathBuf,
}

/// Create the output directory and record a `RUNNING` manifest.
pub fn start_run(ctx: &RunContext) -> RegistryResult<(RunPaths, RunManifest)> {
    create_dir_all(&ctx.out_dir)?;

    let paths = RunPaths {
        out_dir: ctx.out_dir.clone(),
        manifest_path: ctx.out_dir.join("manifest.json"),
        ir_path: ctx.out_dir.join("ir.json"),
        logs_path: ctx.out_dir.join("logs.ndjson"),
    };

    let manifest = RunManifest {
        run_id: ctx.run_id.clone(),
        status: RunStatus::Running,
        input: ctx.input.display().to_string(),
        ir_only: ctx.ir_only,
        ir_version: entgen_core::IR_VERSION.to_string(),
        cli_version: CLI_VERSION.to_string(),
        started_at: ctx.started_at.to_rfc3339(),
        finished_at: None,
        entities: None,
        files: Vec::new(),
        error: None,
        git: collect_git_info(),
    };
    write_json_atomic(&paths.manifest_path, &manifest)?;

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.logs_path)?;

    Ok((paths, manifest))
}

/// Stamp the final status on the manifest.
pub fn finish_run(
    paths: &RunPaths,
    mut manifest: RunManifest,
    status: RunStatus,
    error: Option<String>,
) -> RegistryResult<RunManifest> {
    manifest.status = status;
    manifest.error = error;
    manifest.finished_at = Some(Utc::now().to_rfc3339());
    write_json_atomic(&paths.manifest_path, &manifest)?;
    Ok(manifest)
}

/// Path of `path` relative to the output directory, for the manifest.
pub fn relative_to(out_dir: &Path, path: &Path) -> String {
    path.strip_prefix(out_dir)
        .unwrap_or(path)
        .display()
        .to_string()
}

pub fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            } else {
                None
            }
        })
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}
