use std::io;
use thiserror::Error;

/// Errors raised while loading, building or querying a dependency graph.
#[derive(Debug, Error)]
pub enum DflowError {
    #[error("instruction count {expected} does not match trace length {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("instruction {index} uses opcode {opcode} which has no latency entry")]
    UnknownOpcode { index: usize, opcode: u32 },

    #[error("completion time of instruction {index} exceeds the cycle counter range")]
    DepthOverflow { index: usize },

    #[error("program context is not initialized")]
    InvalidContext,

    #[error("instruction index {index} is out of range for {len} instructions")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("{source_name}:{line}: could not parse `{text}`")]
    Parse {
        source_name: String,
        line: usize,
        text: String,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type for dataflow operations
pub type Result<T> = std::result::Result<T, DflowError>;
