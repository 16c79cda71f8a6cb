//! Error types for extraction and comparison

/// Error type for the extraction pipeline
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The page could not be retrieved (transport failure or non-success status)
    #[error("failed to fetch '{page}': {reason}")]
    Fetch { page: String, reason: String },

    /// The page body could not be turned into a document
    #[error("failed to parse '{page}': {reason}")]
    Parse { page: String, reason: String },

    /// The page parsed, but at least one language has no code on it
    #[error("code not found for {lang1} and {lang2} on '{task}'")]
    NotFound {
        task: String,
        lang1: String,
        lang2: String,
    },

    /// Both requested languages normalize to the same identifier
    #[error("cannot compare '{0}' with itself")]
    SameLanguage(String),

    /// The fragment cache failed; never returned from the comparison pipeline
    #[error("cache unavailable: {0}")]
    Cache(String),
}

impl Error {
    /// Whether this is a legitimate negative result rather than an infrastructure failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Cache(e.to_string())
    }
}

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, Error>;
