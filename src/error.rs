use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvotreeError {
    #[error("Invalid program: {0}")]
    InvalidProgram(String),

    #[error("Tree too wide: node has {arity} subtrees (> 65535)")]
    TreeTooWide { arity: usize },

    #[error("Code too long: {count} instructions (> 65535)")]
    CodeTooLong { count: usize },

    #[error("Unresolved function: no definition branch named '{0}'")]
    UnresolvedFunction(String),

    #[error("Duplicate function: more than one definition branch named '{0}'")]
    DuplicateFunction(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EvotreeError>;
