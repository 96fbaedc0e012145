//! Shared building blocks for the vorschlag word-completion engine.
//!
//! - [`character`] -- Case folding, case-insensitive prefix matching and
//!   word-shape checks used by every index
//! - [`resource`] -- Reading line-oriented resource files with a UTF-8 first,
//!   Latin-1 second decoding policy
//!
//! The error taxonomy for resource loading lives in [`LoadError`]. Callers in
//! the language module recover from all of its variants locally; it is only
//! surfaced by the low-level loaders themselves.

pub mod character;
pub mod resource;

use std::path::PathBuf;

/// Error type for resource loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The resource file does not exist.
    #[error("resource not found: {}", .0.display())]
    ResourceMissing(PathBuf),

    /// The resource exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single line of a resource could not be parsed.
    #[error("line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },
}

impl LoadError {
    /// Whether this error means "the file is not there" as opposed to a
    /// read or parse failure.
    pub fn is_missing(&self) -> bool {
        matches!(self, LoadError::ResourceMissing(_))
    }
}
