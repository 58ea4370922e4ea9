//! Parameter validation errors
//!
//! Typed errors for parameter documents and CLI flags.

use thiserror::Error;

/// Parameter validation errors
#[derive(Debug, Error)]
pub enum ParamsError {
    /// `name` and `name_filter` were both given
    #[error("parameters are mutually exclusive: name|name_filter")]
    MutuallyExclusive,

    /// A field failed its declared constraint
    #[error("invalid parameters: {0}")]
    Invalid(String),

    /// `--tag` flag not in KEY=VALUE or KEY form
    #[error("invalid tag '{0}': expected KEY=VALUE or KEY")]
    InvalidTag(String),

    /// Failed to parse the JSON parameter document
    #[error("Failed to parse parameters: {0}")]
    Parse(#[from] serde_json::Error),

    /// Failed to read the parameter document
    #[error("Failed to read parameters file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ParamsError {
    /// Create an IO error with path context
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<garde::Report> for ParamsError {
    fn from(report: garde::Report) -> Self {
        Self::Invalid(report.to_string())
    }
}
