//! Client configuration.
//!
//! Credentials are carried by an explicit [`ClientConfig`] handed to the
//! client at construction time. [`ClientConfig::from_env`] reads them from the
//! environment (and a `.env` file when present).

use crate::error::{DataError, Result};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Production web service of the Central Balance Sheet Office.
pub const DEFAULT_BASE_URL: &str = "https://ws.cbso.nbb.be";

/// Environment variable holding the subscription key.
pub const ENV_SUBSCRIPTION_KEY: &str = "NBB_CBSO_SUB_KEY";

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "NBB_CBSO_BASE_URL";

/// Environment variable selecting the database.
pub const ENV_DATABASE: &str = "NBB_CBSO_DATABASE";

const DEFAULT_USER_AGENT: &str = concat!("balans/", env!("CARGO_PKG_VERSION"));

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Minimum spacing between two requests
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Registry database to query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Database {
    /// Filings exactly as deposited
    #[default]
    Authentic,
    /// Extracted data
    Extracts,
    /// Data improved by the registry after deposit
    Improved,
}

impl Database {
    /// URL path segment for this database.
    pub const fn path_segment(&self) -> &'static str {
        match self {
            Self::Authentic => "authentic",
            Self::Extracts => "extracts",
            Self::Improved => "improved",
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for Database {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "authentic" => Ok(Self::Authentic),
            "extracts" => Ok(Self::Extracts),
            "improved" => Ok(Self::Improved),
            other => Err(DataError::InvalidConfig(format!(
                "unknown database {other:?} (expected authentic, extracts or improved)"
            ))),
        }
    }
}

/// Settings for [`CbsoClient`](crate::cbso::CbsoClient).
#[derive(Clone)]
pub struct ClientConfig {
    /// Web service root, without trailing slash
    pub base_url: String,
    /// Database queried for references
    pub database: Database,
    /// Subscription key sent with every request
    pub subscription_key: String,
    /// User agent header
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Minimum spacing between two requests
    pub min_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            database: Database::default(),
            subscription_key: String::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            min_interval: DEFAULT_MIN_INTERVAL,
        }
    }
}

impl ClientConfig {
    /// Create a configuration with the given subscription key and defaults
    /// for everything else.
    pub fn new(subscription_key: impl Into<String>) -> Self {
        Self {
            subscription_key: subscription_key.into(),
            ..Self::default()
        }
    }

    /// Build a configuration from the environment.
    ///
    /// Loads a `.env` file if one is present, then reads
    /// `NBB_CBSO_SUB_KEY` (required), `NBB_CBSO_BASE_URL` and
    /// `NBB_CBSO_DATABASE` (optional).
    ///
    /// # Errors
    /// Returns [`DataError::MissingConfig`] when the subscription key is not
    /// set, or [`DataError::InvalidConfig`] for an unknown database name.
    pub fn from_env() -> Result<Self> {
        // A missing .env file is not an error
        let _ = dotenvy::dotenv();

        let subscription_key = env::var(ENV_SUBSCRIPTION_KEY)
            .map_err(|_| DataError::MissingConfig(ENV_SUBSCRIPTION_KEY.to_string()))?;
        let mut config = Self::new(subscription_key);

        if let Ok(base_url) = env::var(ENV_BASE_URL) {
            config = config.with_base_url(base_url);
        }
        if let Ok(database) = env::var(ENV_DATABASE) {
            config.database = database.parse()?;
        }

        Ok(config)
    }

    /// Override the base URL. A trailing slash is removed.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Select the database.
    pub const fn with_database(mut self, database: Database) -> Self {
        self.database = database;
        self
    }

    /// Override the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the per-request timeout.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the minimum spacing between requests.
    pub const fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    /// Check that the configuration can be used to build a client.
    ///
    /// # Errors
    /// Returns [`DataError::MissingConfig`] for an empty subscription key and
    /// [`DataError::InvalidConfig`] for a base URL that is not http(s).
    pub fn validate(&self) -> Result<()> {
        if self.subscription_key.trim().is_empty() {
            return Err(DataError::MissingConfig(ENV_SUBSCRIPTION_KEY.to_string()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(DataError::InvalidConfig(format!(
                "base URL must be http(s): {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("database", &self.database)
            .field("subscription_key", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("min_interval", &self.min_interval)
            .finish()
    }
}
