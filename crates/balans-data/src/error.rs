//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
///
/// Validation and rate-limit errors are fatal to a call. Failures that only
/// concern one filing are reported through [`FetchError`] instead.
#[derive(Debug, Error)]
pub enum DataError {
    /// Company number does not have 10 or 11 digits once non-digits are removed
    #[error("Invalid company number {input:?}: expected 10 or 11 digits, found {digits}")]
    InvalidCompanyNumber {
        /// Raw input as given by the caller
        input: String,
        /// Number of digits left after cleaning
        digits: usize,
    },

    /// Requested year span is not a positive number
    #[error("Invalid year span {0}: at least one year must be requested")]
    InvalidYearSpan(usize),

    /// Upstream signalled too many requests
    #[error("Rate limit exceeded{}", retry_hint(.retry_after_secs))]
    RateLimited {
        /// Seconds to wait before retrying, when the registry says so
        retry_after_secs: Option<u64>,
    },

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status other than 404/429
    #[error("HTTP {status} from {url}")]
    Http {
        /// Status code returned by the registry
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV error while reading the line-code table
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Missing configuration value
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn retry_hint(retry_after_secs: &Option<u64>) -> String {
    retry_after_secs.map_or_else(String::new, |secs| format!(", retry after {secs}s"))
}

impl DataError {
    /// Returns true when the caller should back off before calling again.
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

/// Failure to obtain one filing's detail document.
///
/// These never abort sibling fetches; they are collected next to the
/// successful records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Reference carries no data locator
    #[error("Reference {0} has no accounting data URL")]
    NoLocator(String),

    /// Transport failed before a response was received
    #[error("Transport error: {0}")]
    Transport(String),

    /// Registry answered with a non-success status
    #[error("HTTP {status} while fetching filing")]
    Http {
        /// Status code
        status: u16,
    },

    /// Body is not a JSON-XBRL document
    #[error("Not a JSON-XBRL document: {0}")]
    NotJsonXbrl(String),

    /// Document belongs to another reference than the one requested
    #[error("Requested reference {requested} but document is {received}")]
    ReferenceMismatch {
        /// Reference that was requested
        requested: String,
        /// Reference found in the document
        received: String,
    },
}

impl From<DataError> for FetchError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::Http { status, .. } => Self::Http { status },
            DataError::Parse(msg) => Self::NotJsonXbrl(msg),
            DataError::Serialization(e) => Self::NotJsonXbrl(e.to_string()),
            other => Self::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_message() {
        let err = DataError::RateLimited {
            retry_after_secs: Some(30),
        };
        assert_eq!(err.to_string(), "Rate limit exceeded, retry after 30s");
        assert!(err.is_rate_limited());

        let err = DataError::RateLimited {
            retry_after_secs: None,
        };
        assert_eq!(err.to_string(), "Rate limit exceeded");
    }

    #[test]
    fn test_fetch_error_from_data_error() {
        let err: FetchError = DataError::Http {
            status: 500,
            url: "https://example.test".to_string(),
        }
        .into();
        assert_eq!(err, FetchError::Http { status: 500 });

        let err: FetchError = DataError::Parse("bad".to_string()).into();
        assert_eq!(err, FetchError::NotJsonXbrl("bad".to_string()));
    }
}
