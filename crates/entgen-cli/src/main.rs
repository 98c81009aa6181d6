mod atomic;
mod config;
mod registry;
mod validate;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use entgen_core::{DescriptorSet, Error as CoreError, IrDocument, compile};
use entgen_emit::{EmitError, emit_all};
use registry::{
    RunContext, RunPaths, RunStatus, finish_run, init_run_logging, relative_to, start_run,
};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use atomic::{write_bytes_atomic, write_json_atomic};
use config::{EntgenConfig, load_config};
use validate::{descriptor_schema, validate_descriptor_json};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("compile error: {0}")]
    Compile(#[from] CoreError),
    #[error("emit error: {0}")]
    Emit(#[from] EmitError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("descriptor schema error: {0}")]
    Schema(String),
    #[error("invalid descriptor input: {0}")]
    InvalidInput(String),
}

#[derive(Parser, Debug)]
#[command(name = "entgen", version, about = "Entity schema compiler")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile descriptors into the schema IR and emit generated sources.
    Compile(CompileArgs),
    /// Print the JSON Schema of the descriptor input format.
    JsonSchema(JsonSchemaArgs),
}

#[derive(Args, Debug)]
struct CompileArgs {
    /// Descriptor set in JSON form.
    #[arg(long)]
    input: PathBuf,
    /// Config file (defaults to ./entgen.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output directory.
    #[arg(long, default_value = "gen")]
    out: PathBuf,
    /// Write ir.json only, skip the emitters.
    #[arg(long, default_value_t = false)]
    ir_only: bool,
}

#[derive(Args, Debug)]
struct JsonSchemaArgs {
    /// Write the schema to a file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Compile(args) => run_compile(args),
        Command::JsonSchema(args) => run_json_schema(args),
    }
}

fn run_compile(args: CompileArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;

    let run_id = Uuid::new_v4().to_string();
    let ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        input: args.input,
        out_dir: args.out,
        ir_only: args.ir_only,
    };

    let (paths, mut manifest) = start_run(&ctx)?;
    init_run_logging(&paths.logs_path)?;
    tracing::info!(event = "run_started", run_id = %run_id, input = %ctx.input.display());

    let timer = Instant::now();
    match execute(&ctx, &paths, &config) {
        Ok(outcome) => {
            manifest.entities = Some(outcome.entities);
            manifest.files = outcome.files;
            finish_run(&paths, manifest, RunStatus::Ok, None)?;
            tracing::info!(
                event = "run_finished",
                status = "success",
                duration_ms = timer.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            tracing::error!(event = "run_failed", error = %err);
            finish_run(&paths, manifest, RunStatus::Error, Some(err.to_string()))?;
            Err(err)
        }
    }
}

#[derive(Debug)]
struct RunOutcome {
    entities: usize,
    files: Vec<String>,
}

fn execute(
    ctx: &RunContext,
    paths: &RunPaths,
    config: &EntgenConfig,
) -> Result<RunOutcome, CliError> {
    let raw = std::fs::read_to_string(&ctx.input)?;
    let document: Value = serde_json::from_str(&raw)?;

    let violations = validate_descriptor_json(&document)?;
    if let Some(first) = violations.first() {
        for violation in &violations {
            tracing::error!(
                event = "descriptor_invalid",
                path = %violation.path,
                message = %violation.message
            );
        }
        return Err(CliError::InvalidInput(format!(
            "{} schema violation(s), first at {}: {}",
            violations.len(),
            first.path,
            first.message
        )));
    }

    let set: DescriptorSet = serde_json::from_value(document)?;
    let objects = compile(&set, &config.compile)?;
    let entities = objects.len();

    // Render before writing so a failed emitter leaves no partial output.
    let emitted = if ctx.ir_only {
        Vec::new()
    } else {
        emit_all(&objects, &config.emit)?
    };

    write_json_atomic(&paths.ir_path, &IrDocument::new(objects))?;
    tracing::info!(event = "ir_written", path = %paths.ir_path.display(), entities);

    let mut files = vec![relative_to(&paths.out_dir, &paths.ir_path)];
    for file in emitted {
        let path = paths.out_dir.join(&file.path);
        write_bytes_atomic(&path, file.contents.as_bytes())?;
        tracing::debug!(event = "file_written", path = %path.display());
        files.push(relative_to(&paths.out_dir, &path));
    }
    tracing::info!(event = "files_written", files = files.len());

    Ok(RunOutcome { entities, files })
}

fn run_json_schema(args: JsonSchemaArgs) -> Result<(), CliError> {
    let schema = descriptor_schema()?;
    match args.out {
        Some(path) => write_json_atomic(&path, &schema)?,
        None => println!("{}", serde_json::to_string_pretty(&schema)?),
    }
    Ok(())
}
