//! Error types for apigen runs

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for generator operations
pub type GenResult<T> = Result<T, GenError>;

/// Error type for generator operations
///
/// Every variant is fatal: a run that hits one aborts before committing any
/// output. Missing marker pairs are not errors, see [`crate::Warning`].
#[derive(Error, Debug)]
pub enum GenError {
    /// The same catalog key is defined twice
    #[error("duplicate key '{key}' in {file} (first defined in {first_defined_in})")]
    DuplicateKey {
        key: String,
        file: PathBuf,
        first_defined_in: PathBuf,
    },

    /// Two keys normalize to the same handler symbol
    #[error("keys '{first_key}' and '{key}' both map to handler {symbol}")]
    SymbolCollision {
        symbol: String,
        first_key: String,
        key: String,
    },

    /// A schema file is not valid JSON or does not match the entry layout
    #[error("failed to parse schema file {file}: {source}")]
    SchemaParse {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration file is unusable
    #[error("configuration error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// A template cannot receive its generated content
    #[error("template error in {path}: {message}")]
    Template { path: PathBuf, message: String },

    /// Handler tree traversal failed
    #[error("failed to walk handler tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// I/O error on a specific path
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors raised while building the catalog
    pub fn is_catalog_error(&self) -> bool {
        matches!(
            self,
            GenError::DuplicateKey { .. }
                | GenError::SymbolCollision { .. }
                | GenError::SchemaParse { .. }
        )
    }
}
