//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while reading profiling statistics
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to read statistics file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid statistics format: {0}")]
    InvalidFormat(String),
}

/// Errors that can occur while building the call graph
///
/// All of these mean the input is structurally invalid; nothing is rendered.
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("call edge {caller} -> {callee} is defined more than once")]
    DuplicateEdge { caller: String, callee: String },

    #[error("{callee} lists caller {caller}, which has no statistics of its own")]
    UnknownCaller { caller: String, callee: String },

    #[error("no functions in profiling statistics")]
    EmptyGraph,
}

/// Errors that can occur during flamegraph generation
#[derive(Error, Debug)]
pub enum FlamegraphError {
    #[error("No forward blocks to render")]
    EmptyStacks,

    #[error("Inferno rendering failed: {0}")]
    Render(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
