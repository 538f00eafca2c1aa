use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for map, tileset and config loading
#[derive(Debug, Error)]
pub enum MapError {
    /// The named JSON resource could not be located
    #[error("resource not found: {name}")]
    NotFound {
        /// Resource name as requested, without extension
        name: String,
    },
    /// File I/O error
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        /// File that failed to read
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
    /// Strict JSON parse error (config files only, maps decode leniently)
    #[error("JSON parse error in {}: {source}", path.display())]
    Json {
        /// File that failed to parse
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },
    /// A config value is out of its valid range
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// A field the lenient decoder ignored or defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeIssue {
    /// JSON path of the field, e.g. `layers[2].opacity`. `$` is the document root.
    pub path: String,
    /// Why the field kept its default.
    pub reason: String,
}

impl DecodeIssue {
    pub(crate) fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DecodeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}
