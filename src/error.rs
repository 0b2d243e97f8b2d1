//! Custom error types and result handling for Renzoku operations.
//!
//! All fallible operations return a [`Result<T>`] which is a type alias for
//! `std::result::Result<T, Error>`. The analysis engine itself only fails on
//! malformed configuration; everything else here belongs to the collaborators
//! (the Kavita client, snapshot loading, report sinks and the interactive session).
//!
use std::path::PathBuf;

/// Type alias for Results with Renzoku errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for all Renzoku operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O errors from the standard library
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Regular expression parsing errors
    #[error(transparent)]
    Regex(#[from] regex::Error),
    /// HTTP transport errors from the Kavita client
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// Malformed JSON payloads (remote responses or snapshot files)
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    RenzokuBuilder(#[from] crate::renzoku::RenzokuConfigBuilderError),
    /// The OPDS URL does not have the `<base>/api/opds/<api key>` shape
    #[error("Invalid OPDS URL '{0}': {1}")]
    InvalidOpdsUrl(String, String),
    /// A chapter number that is not a plain invariant decimal
    #[error("Unable to convert \"{0}\" to a chapter number")]
    InvalidChapterNumber(String),
    /// Operator entered a library id that cannot be used
    #[error("Invalid library id '{0}'")]
    InvalidLibraryId(String),
    /// Authentication against the library server failed or was skipped
    #[error("Authentication failed: {0}")]
    Authentication(String),
    /// The library server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
    /// Volumes of one series could not be retrieved; earlier series were already reported
    #[error("Failed to fetch volumes for series '{series}': {source}")]
    SeriesFetch {
        series: String,
        #[source]
        source: Box<Error>,
    },
    /// Snapshot file could not be opened
    #[error("Snapshot '{0:?}' could not be read: {1}")]
    Snapshot(PathBuf, String),
    /// Error for resources that couldn't be found (e.g., library or series id)
    #[error("Not found: {0}")]
    NotFound(String),
    /// Other errors that don't fit into specific categories
    #[error("Other error: {0}")]
    Other(String),
}

// Basic From<String> conversion for convenience
impl From<String> for Error {
    fn from(error: String) -> Self {
        Error::Other(error)
    }
}

impl From<&str> for Error {
    fn from(error: &str) -> Self {
        Error::Other(error.to_string())
    }
}

impl From<dialoguer::Error> for Error {
    fn from(error: dialoguer::Error) -> Self {
        Error::Io(error.into())
    }
}

impl serde::Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}
