use thiserror::Error;

/// Errors emitted while rendering the IR into source text.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("edge {entity}.{edge} targets {target}, which is not part of the emitted set")]
    UnknownEntity {
        entity: String,
        edge: String,
        target: String,
    },
    #[error("format error: {0}")]
    Format(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, EmitError>;
