//! Error types for ffshell.

use crate::argument::Kind;
use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building command lines or supervising the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required external tool is not available at the configured location.
    #[error("dependency missing: {tool} not found at {}", location.display())]
    DependencyMissing { tool: String, location: PathBuf },

    /// An input file that must exist does not.
    #[error("input file missing: {}", path.display())]
    FileMissing { path: PathBuf },

    /// An output file that must not exist already does.
    #[error("output file already exists: {}", path.display())]
    FileAlreadyExists { path: PathBuf },

    /// An argument of this kind is already present in the container.
    #[error("duplicate argument kind: {kind:?}")]
    DuplicateKind { kind: Kind },

    /// The container does not hold exactly one input source and an output.
    #[error("container holds no valid input/output pair")]
    MissingInputOrOutput,

    /// Neither an input nor a concat argument is present.
    #[error("no input argument found")]
    NoInputFound,

    /// The output extension does not match what the selected codec produces.
    #[error("extension mismatch: expected {expected}, got {actual}")]
    ExtensionMismatch { expected: String, actual: String },

    /// The supervisor is already driving a live process.
    #[error("a conversion is already running on this instance")]
    AlreadyRunning,

    /// The engine exited without producing a usable output artifact.
    ///
    /// `diagnostics` is the accumulated stderr text; `exit_code` is auxiliary
    /// context and never drives the success/failure classification.
    #[error("conversion failed: {diagnostics}")]
    ConversionFailed {
        diagnostics: String,
        exit_code: Option<i32>,
    },

    /// Failed to parse tool output.
    #[error("failed to parse {tool} output: {message}")]
    ParseError { tool: String, message: String },

    /// Invalid input provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a dependency missing error.
    pub fn dependency_missing(tool: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self::DependencyMissing {
            tool: tool.into(),
            location: location.into(),
        }
    }

    /// Create a missing input file error.
    pub fn file_missing(path: impl Into<PathBuf>) -> Self {
        Self::FileMissing { path: path.into() }
    }

    /// Create an already-existing output file error.
    pub fn file_already_exists(path: impl Into<PathBuf>) -> Self {
        Self::FileAlreadyExists { path: path.into() }
    }

    /// Create an extension mismatch error.
    pub fn extension_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::ExtensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a parse error.
    pub fn parse_error(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a conversion failure carrying the accumulated diagnostic text.
    pub fn conversion_failed(diagnostics: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self::ConversionFailed {
            diagnostics: diagnostics.into(),
            exit_code,
        }
    }
}
