//! Error handling for the crxkit CLI.
//!
//! This module provides a hierarchical error type system using `thiserror`.
//! Every fatal outcome of a build or dev-server run maps to one variant here,
//! and each variant renders as a single actionable message.
//!
//! # Architecture
//!
//! - **Top-level errors** (`CliError`) represent broad categories of failures
//! - **Domain-specific errors** (`ConfigError`, `BuildError`, `ManifestError`,
//!   `StagingError`) carry the details
//! - **Error conversion** is automatic via `#[from]` attributes
//! - **`ResultExt::with_path`** turns a missing file into a path-bearing error
//!
//! # Example
//!
//! ```rust,no_run
//! use crxkit_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_package(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path).with_path(path)
//! }
//! ```

pub mod miette;

pub use self::miette::cli_error_to_miette;

use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
///
/// This is the primary error type returned by CLI commands. It automatically
/// converts from domain-specific errors via `From` implementations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors (invalid file, bad layout, etc.)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Compilation and validation failures
    #[error("{0}")]
    Build(#[from] BuildError),

    /// Manifest generation failures
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Staging reset or tree copy failures
    #[error("Filesystem error: {0}")]
    Staging(#[from] StagingError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Development server errors
    #[error("Server error: {0}")]
    Server(String),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file doesn't exist at the requested location
    #[error("Config file not found: {}\n\nHint: Create a crxkit.config.json file or drop the --config flag", .0.display())]
    NotFound(PathBuf),

    /// Staging and final output are the same directory or nested in each other
    #[error("Staging directory and output directory must differ and must not contain each other: {}\n\nHint: Change 'staging_dir' or 'output_root' in crxkit.config.json", .0.display())]
    OverlappingDirectories(PathBuf),

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },
}

/// Build process errors.
///
/// Each variant is a terminal state of the production pipeline. None of them
/// deploy anything.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The compiler could not start or produce output at all
    #[error("Failed to compile.\n\n{0}")]
    Configuration(String),

    /// The compiler reported one or more errors
    #[error("Failed to compile.\n\n{}", .0.join("\n\n"))]
    CompileErrors(Vec<String>),

    /// Warnings were reported while strict warnings are enabled
    #[error("Treating warnings as errors because CI is set.\n\n{}", .0.join("\n\n"))]
    StrictWarnings(Vec<String>),
}

impl BuildError {
    /// Diagnostic strings carried by this error, if any.
    pub fn diagnostics(&self) -> &[String] {
        match self {
            BuildError::CompileErrors(messages) | BuildError::StrictWarnings(messages) => messages,
            _ => &[],
        }
    }
}

/// Manifest generation errors.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The declarative manifest source is absent
    #[error("Manifest source not found: {}\n\nHint: The extension manifest lives at src/manifest.yml", .0.display())]
    SourceNotFound(PathBuf),

    /// The manifest source is not a valid YAML mapping
    #[error("Invalid manifest source {}: {message}", .path.display())]
    Parse {
        /// Source document path
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// The packaged manifest could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailure {
        /// Destination file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Staging and tree copy errors.
#[derive(Debug, Error)]
pub enum StagingError {
    /// Copy source does not exist
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// A path that must be a directory is something else
    #[error("Path exists but is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// An I/O operation failed on a specific path
    #[error("{}: {source}", .path.display())]
    Io {
        /// Path being operated on
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed (permission denied, symlink loop, ...)
    #[error("Failed to walk directory tree: {0}")]
    Walk(#[from] walkdir::Error),
}

impl StagingError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| StagingError::Io { path, source }
    }
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding a path to I/O failures.
pub trait ResultExt<T> {
    /// Add a file path to the error context.
    ///
    /// Turns `NotFound` I/O errors into [`CliError::FileNotFound`].
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            match err {
                CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                    CliError::FileNotFound(path.as_ref().to_path_buf())
                }
                other => other,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_errors_joins_all_messages() {
        let err = BuildError::CompileErrors(vec![
            "syntax error in x".to_string(),
            "missing module y".to_string(),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to compile."));
        assert!(msg.contains("syntax error in x"));
        assert!(msg.contains("missing module y"));
        assert_eq!(err.diagnostics().len(), 2);
    }

    #[test]
    fn test_strict_warnings_message() {
        let err = BuildError::StrictWarnings(vec!["unused variable 'a'".to_string()]);
        let msg = err.to_string();
        assert!(msg.contains("Treating warnings as errors"));
        assert!(msg.contains("unused variable 'a'"));
    }

    #[test]
    fn test_configuration_error_is_verbatim() {
        let err = BuildError::Configuration("Invalid configuration object".to_string());
        assert!(err.to_string().ends_with("Invalid configuration object"));
        assert!(err.diagnostics().is_empty());
    }

    #[test]
    fn test_manifest_source_not_found() {
        let err = ManifestError::SourceNotFound(PathBuf::from("src/manifest.yml"));
        let msg = err.to_string();
        assert!(msg.contains("Manifest source not found"));
        assert!(msg.contains("src/manifest.yml"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_overlapping_directories() {
        let err = ConfigError::OverlappingDirectories(PathBuf::from("_build/_dev"));
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn test_cli_error_from_domain_errors() {
        let cli_err: CliError = BuildError::CompileErrors(vec![]).into();
        assert!(matches!(cli_err, CliError::Build(_)));

        let cli_err: CliError = StagingError::SourceNotFound(PathBuf::from("public")).into();
        assert!(matches!(cli_err, CliError::Staging(_)));

        let cli_err: CliError = ManifestError::SourceNotFound(PathBuf::from("m.yml")).into();
        assert!(matches!(cli_err, CliError::Manifest(_)));
    }

    #[test]
    fn test_result_ext_with_path() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));

        let err = result.with_path("/test/package.json").unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }
}
