//! Error types for analysis runs and per-file extraction.

use std::path::PathBuf;

/// Errors that abort a whole run. No document is produced.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("project root does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("project root is not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to serialise report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write report to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors confined to a single file. They turn into a degraded record.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("file is {size} bytes, over the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    #[error("unreadable: {0}")]
    Unreadable(#[from] std::io::Error),

    #[error("not valid UTF-8")]
    InvalidUtf8,

    #[error("extraction exceeded {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("syntax error near line {line}")]
    Syntax { line: usize },

    #[error("grammar unavailable: {0}")]
    Grammar(String),
}
