use thiserror::Error;

use crate::descriptor::FieldKind;

/// Core error type for a compile run.
///
/// Every variant is terminal: the run aborts and no schema object is
/// produced.
#[derive(Debug, Error)]
pub enum Error {
    /// A field kind has no storage mapping.
    #[error(transparent)]
    Classification(#[from] ClassificationError),
    /// A reference field could not be paired with a counterpart.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    /// The descriptor set itself is malformed.
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),
}

/// Convenience alias for results returned by the compiler.
pub type Result<T> = std::result::Result<T, Error>;

/// Unsupported or unmapped field kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported type {}{kind} for field {entity}.{field}", repeated_prefix(.repeated))]
pub struct ClassificationError {
    pub entity: String,
    pub field: String,
    pub kind: FieldKind,
    pub repeated: bool,
}

/// Failure to pair a reference field with its counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot resolve edge {entity}.{field} -> {target}: {kind}")]
pub struct ResolutionError {
    pub entity: String,
    pub field: String,
    pub target: String,
    pub kind: ResolutionErrorKind,
}

/// Which resolution condition failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionErrorKind {
    #[error("target type is not part of the generation set")]
    UnknownTarget,
    #[error("no counterpart field; the target declares no field of the owning type")]
    NoCounterpart,
    #[error(
        "ambiguous edge; multiple fields of the same type require an explicit ref on one side ({})",
        join_names(.candidates)
    )]
    Ambiguous { candidates: Vec<String> },
    #[error("ref `{ref_name}` does not match any field of the owning type on the target")]
    RefNotFound { ref_name: String },
    #[error("conflicting refs with counterpart `{counterpart}`; exactly one side may name the other")]
    ConflictingRefs { counterpart: String },
}

fn repeated_prefix(repeated: &bool) -> &'static str {
    if *repeated { "repeated " } else { "" }
}

fn join_names(names: &[String]) -> String {
    names.join(", ")
}
