//! @ai:module:intent Error types for process invocation, output parsing and reporting
//! @ai:module:layer domain
//! @ai:module:public_api BenchError, Result
//! @ai:module:stateless true

use std::time::Duration;
use thiserror::Error;

/// @ai:intent Unified error type for all benchmark pipeline operations
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Failed to launch `{command}`: {source}")]
    LaunchFailure {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` did not finish within {after:?}")]
    Timeout { command: String, after: Duration },

    #[error("No number after {pattern} label on output line {line_number}: {line:?}")]
    ExtractionFailure {
        pattern: &'static str,
        line_number: usize,
        line: String,
    },

    #[error("Not enough data for a summary, missing: {}", .missing.join(", "))]
    InsufficientData { missing: Vec<&'static str> },

    #[error("Throughput undefined: average runtime is zero ({operation_count} operations)")]
    UndefinedThroughput { operation_count: u64 },

    #[error("Operation count {first} x {second} does not fit in 64 bits")]
    OperationCountOverflow { first: u64, second: u64 },

    #[error("Invocation {index} failed: {source}")]
    RunFailed {
        index: u32,
        #[source]
        source: Box<BenchError>,
    },

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BenchError {
    /// @ai:intent Attach the invocation index to a per-run failure
    /// @ai:effects pure
    pub fn in_run(self, index: u32) -> Self {
        BenchError::RunFailed {
            index,
            source: Box::new(self),
        }
    }

    /// @ai:intent Innermost error, skipping RunFailed wrappers
    /// @ai:effects pure
    pub fn root(&self) -> &BenchError {
        match self {
            BenchError::RunFailed { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
