//! Error types for the specli crate.

use thiserror::Error;

/// Error raised by a user handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that abort a command-tree build.
///
/// A build either succeeds completely or fails with the first fatal
/// error; no partial tree is returned.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("extension {key} on operation {operation}: expected {expected}")]
    DirectiveDecode {
        key: String,
        operation: String,
        expected: &'static str,
    },

    #[error("cannot parse OpenAPI document")]
    InvalidDocument(#[source] serde_json::Error),

    #[error("cannot read spec from {path}")]
    SpecFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced while an invoked command runs its bound action.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvokeError {
    #[error("cannot build substitution pattern for path parameter {name}")]
    PathPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown command {name}")]
    UnknownCommand { name: String },

    #[error("handler failed")]
    Handler(#[source] HandlerError),
}
