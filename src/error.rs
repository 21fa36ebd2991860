//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ConfigError: source table problems (fatal for the whole run)
//! - CheckError: upstream version lookup failures
//! - SpecError: spec file location and parsing failures
//! - CompareError: version comparator failures
//! - WriteError: spec file rewrite failures
//!
//! Everything except ConfigError is a per-package condition: it is
//! recorded in the run summary and processing continues with the
//! remaining packages.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Source table related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Upstream version lookup errors
    #[error(transparent)]
    Check(#[from] CheckError),

    /// Spec file related errors
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// Version comparison errors
    #[error(transparent)]
    Compare(#[from] CompareError),

    /// Spec file write errors
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Errors related to the source table configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("source table not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Failed to read config file
    #[error("failed to read source table {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("failed to parse source table {}: {message}", path.display())]
    ParseError { path: PathBuf, message: String },

    /// A descriptor entry is missing its required location key
    #[error("invalid descriptor for '{package}': {message}")]
    InvalidDescriptor { package: String, message: String },

    /// A package named on the command line has no table entry
    #[error("package '{package}' is not in the source table")]
    UnknownPackage { package: String },
}

/// Errors related to upstream version lookup
#[derive(Error, Debug)]
pub enum CheckError {
    /// The checker binary could not be spawned
    #[error("version checker '{command}' is not available: {message}")]
    CheckerUnavailable { command: String, message: String },

    /// The checker ran but reported no version matching the filters
    #[error("no upstream version found for '{package}'")]
    NoVersionFound { package: String },

    /// The checker exited with a failure status
    #[error("version checker failed for '{package}': {message}")]
    CheckerFailed { package: String, message: String },

    /// A version rewrite pattern in the descriptor does not compile
    #[error("invalid from_pattern '{pattern}' for '{package}': {message}")]
    BadPattern {
        package: String,
        pattern: String,
        message: String,
    },
}

/// Errors related to spec file access and parsing
#[derive(Error, Debug)]
pub enum SpecError {
    /// No spec file found for the package
    #[error("spec file for '{package}' not found under {}", search_dir.display())]
    NotFound {
        package: String,
        search_dir: PathBuf,
    },

    /// Failed to read the spec file
    #[error("failed to read spec file {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Spec file has no parseable Version field
    #[error("failed to parse spec file {}: {message}", path.display())]
    ParseError { path: PathBuf, message: String },

    /// Downloading the spec file from the packaging forge failed
    #[error("failed to fetch spec file for '{package}': {message}")]
    FetchError { package: String, message: String },

    /// The HTTP client for forge downloads could not be built
    #[error("failed to create HTTP client: {message}")]
    ClientError { message: String },
}

/// Errors related to version comparison
#[derive(Error, Debug)]
pub enum CompareError {
    /// The comparator binary could not be spawned
    #[error("version comparator '{command}' is not available: {message}")]
    ComparatorUnavailable { command: String, message: String },

    /// The comparator failed for a reason other than version ordering
    #[error("version comparison of '{current}' and '{upstream}' failed: {message}")]
    ComparatorError {
        current: String,
        upstream: String,
        message: String,
    },
}

/// Errors related to rewriting a spec file
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to stage the new content in a temporary file
    #[error("failed to stage rewrite of {}: {source}", path.display())]
    StageError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to atomically replace the spec file
    #[error("failed to replace {}: {source}", path.display())]
    ReplaceError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ConfigError::NotFound { path: path.into() }
    }

    /// Creates a new ParseError
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidDescriptor error
    pub fn invalid_descriptor(package: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidDescriptor {
            package: package.into(),
            message: message.into(),
        }
    }

    /// Creates a new UnknownPackage error
    pub fn unknown_package(package: impl Into<String>) -> Self {
        ConfigError::UnknownPackage {
            package: package.into(),
        }
    }
}

impl CheckError {
    /// Creates a new NoVersionFound error
    pub fn no_version_found(package: impl Into<String>) -> Self {
        CheckError::NoVersionFound {
            package: package.into(),
        }
    }

    /// Creates a new CheckerFailed error
    pub fn checker_failed(package: impl Into<String>, message: impl Into<String>) -> Self {
        CheckError::CheckerFailed {
            package: package.into(),
            message: message.into(),
        }
    }
}

impl SpecError {
    /// Creates a new NotFound error
    pub fn not_found(package: impl Into<String>, search_dir: impl Into<PathBuf>) -> Self {
        SpecError::NotFound {
            package: package.into(),
            search_dir: search_dir.into(),
        }
    }

    /// Creates a new ParseError
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        SpecError::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new FetchError
    pub fn fetch_error(package: impl Into<String>, message: impl Into<String>) -> Self {
        SpecError::FetchError {
            package: package.into(),
            message: message.into(),
        }
    }

    /// Creates a new ClientError
    pub fn client_error(message: impl Into<String>) -> Self {
        SpecError::ClientError {
            message: message.into(),
        }
    }
}
