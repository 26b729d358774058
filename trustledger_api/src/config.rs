//! Client configuration, read from the environment or built explicitly.

/// Base URL used when `TRUSTLEDGER_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Configuration for a [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API root that request paths are appended to, e.g. `https://ledger.example.com/api`.
    pub base_url: String,
    /// Overrides the default `User-Agent`.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: None,
        }
    }

    /// Reads `TRUSTLEDGER_BASE_URL` and `TRUSTLEDGER_USER_AGENT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("TRUSTLEDGER_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            user_agent: lookup("TRUSTLEDGER_USER_AGENT").filter(|v| !v.trim().is_empty()),
            ..Self::new(&base_url)
        }
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }
}
