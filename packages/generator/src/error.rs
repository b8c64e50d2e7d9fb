//! Error types for the generator.
//!
//! Skipped symbols are not errors; they travel as
//! [`Diagnostic`](crate::router::Diagnostic) values through a
//! [`DiagnosticSink`](crate::router::DiagnosticSink).

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the generator library.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Module name does not follow the module-name grammar.
    #[error("Invalid module name: '{0}'. Expected identifiers separated by '.' (e.g., mylib.core)")]
    InvalidModuleName(String),

    /// Output path exists but is not a directory.
    #[error("Output path is not a directory: {}", .0.display())]
    OutputNotDirectory(PathBuf),

    /// Working directory needed as default output directory is unavailable.
    #[error("Cannot determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    /// Source file could not be resolved to a canonical path.
    #[error("Cannot resolve source file {}: {source}", .path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source file has no base name to derive artifact names from.
    #[error("Source file has no base name: {}", .0.display())]
    MissingBaseName(PathBuf),

    /// Failed to create the output directory.
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a generated artifact.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read a declaration dump.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Declaration dump has an extension we cannot decode.
    #[error("Unsupported dump format: {}. Expected .json, .yaml or .yml", .0.display())]
    UnsupportedDumpFormat(PathBuf),

    /// Declaration dump is not well-formed.
    #[error("Failed to parse {}: {message}", .path.display())]
    DumpParse { path: PathBuf, message: String },

    /// A single declaration record could not be decoded.
    #[error("Invalid declaration record #{index}: {source}")]
    InvalidDeclaration {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// One or more translation units failed.
    #[error("{failed} of {total} translation unit(s) failed")]
    UnitsFailed { failed: usize, total: usize },
}

impl GeneratorError {
    /// Whether this error was caused by unusable configuration.
    ///
    /// Configuration errors surface before any artifact is written.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidModuleName(_)
                | Self::OutputNotDirectory(_)
                | Self::CurrentDir(_)
                | Self::SourceNotFound { .. }
                | Self::MissingBaseName(_)
        )
    }
}

/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, GeneratorError>;
