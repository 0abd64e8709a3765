//! Error types for the harvester.
//!
//! [`HarvestError`] covers everything that can end a run or a page loop.
//! [`RecordParseError`] is scoped to a single result row and never escapes
//! the page extraction step.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, HarvestError>;

#[derive(Error, Debug)]
pub enum HarvestError {
    /// Transport-level failure talking to the listing endpoint.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered, but not with a usable payload.
    #[error("request to {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Landing page summary fields are missing or unparsable.
    #[error("could not resolve listing metadata: {0}")]
    MetadataParse(String),

    #[error("could not create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write result artifact {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize listings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// A configured CSS selector does not parse.
    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

impl HarvestError {
    pub fn metadata(message: impl Into<String>) -> Self {
        Self::MetadataParse(message.into())
    }

    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Whether this failure came from fetching a page, as opposed to
    /// parsing or persisting.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Status { .. })
    }
}

/// Failure to turn one result row into a [`Listing`](crate::models::Listing).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordParseError {
    #[error("row has no data-id attribute")]
    MissingId,

    #[error("row id {0:?} is not an integer")]
    InvalidId(String),

    #[error("result {id}: expected {expected} cells, found {found}")]
    Layout {
        id: u64,
        expected: usize,
        found: usize,
    },

    #[error("result {id}: field `{field}` {reason}")]
    Field {
        id: u64,
        field: &'static str,
        reason: String,
    },
}

impl RecordParseError {
    /// The offending record's id, when it could be read.
    pub fn id(&self) -> Option<u64> {
        match self {
            Self::MissingId | Self::InvalidId(_) => None,
            Self::Layout { id, .. } | Self::Field { id, .. } => Some(*id),
        }
    }
}
