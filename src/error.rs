//! Error types for docbind.
//!
//! This module defines all error types that can occur during registry,
//! merge, and export operations. Errors are designed to be informative and
//! actionable, providing clear context about what went wrong.
//!
//! # Error Categories
//!
//! - **Registry errors**: rename conflicts, unsupported extensions
//! - **Conversion errors**: decode/encode failures, missing capabilities
//! - **I/O errors**: file creation, writing, OS-level rename failures

use std::io;
use std::path::{Path, PathBuf};

/// Result type alias for docbind operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for docbind operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rename target carries an extension outside the supported set.
    #[error("Unsupported extension: {name}. Keep the file as PDF, TIF, TIFF, or JPG")]
    UnsupportedExtension {
        /// The offending file name.
        name: String,
    },

    /// Rename target already exists and the caller declined to overwrite.
    #[error(
        "{} already exists and overwriting was declined\n  \
         Use --force to overwrite the existing file",
        .path.display()
    )]
    NameConflictDeclined {
        /// Path of the already-existing target.
        path: PathBuf,
    },

    /// The OS rejected a file rename (permissions, cross-device, file in use).
    #[error("Failed to rename {} to {}\n  Reason: {source}", .from.display(), .to.display())]
    RenameFailed {
        /// Original path of the file.
        from: PathBuf,
        /// Intended new path.
        to: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A conversion capability is unavailable in the runtime environment.
    #[error(
        "Missing dependency: {name}\n  Reason: {reason}\n  \
         Install the required library and try again"
    )]
    MissingDependency {
        /// Name of the missing library or capability.
        name: String,
        /// Details about why it could not be loaded.
        reason: String,
    },

    /// A file with no matching conversion handler reached a pipeline.
    #[error("Unsupported file encountered: {}", .path.display())]
    UnsupportedFile {
        /// Path of the unsupported file.
        path: PathBuf,
    },

    /// An underlying format library failed to decode or encode a file.
    #[error("Conversion failed for {}\n  Reason: {reason}", .path.display())]
    ConversionFailed {
        /// Path of the file being converted.
        path: PathBuf,
        /// Details from the underlying codec.
        reason: String,
    },

    /// No files were provided for merging.
    #[error("No input files specified for merging")]
    NoFilesToMerge,

    /// Failed to load a PDF file.
    #[error("Failed to load PDF: {}\n  Reason: {reason}", .path.display())]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create the output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", .path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to write to the output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Invalid configuration or argument combination.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Create an UnsupportedExtension error.
    pub fn unsupported_extension(name: impl Into<String>) -> Self {
        Self::UnsupportedExtension { name: name.into() }
    }

    /// Create a MissingDependency error.
    pub fn missing_dependency(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MissingDependency {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnsupportedFile error.
    pub fn unsupported_file(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedFile { path: path.into() }
    }

    /// Create a ConversionFailed error.
    pub fn conversion_failed(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::ConversionFailed {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error.
    ///
    /// Returns the appropriate process exit code based on error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnsupportedExtension { .. } => 2,
            Self::NameConflictDeclined { .. } => 4,
            Self::RenameFailed { .. } => 5,
            Self::MissingDependency { .. } => 7,
            Self::UnsupportedFile { .. } => 2,
            Self::ConversionFailed { .. } => 3,
            Self::NoFilesToMerge => 1,
            Self::FailedToLoadPdf { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::InvalidConfig { .. } => 1,
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
