use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEVELOPMENT_URL: &str = "http://localhost:8000/api";
pub const PRODUCTION_URL: &str = "https://your-backend-domain.com/api";

/// Applied uniformly to every call, refresh included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Chosen by build profile: debug builds talk to the local backend.
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Production
        }
    }

    pub fn base_url(self) -> &'static str {
        match self {
            Self::Development => DEVELOPMENT_URL,
            Self::Production => PRODUCTION_URL,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::current()
    }
}

/// Connection settings handed to [`crate::Client::new`] by the composition root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn for_environment(environment: Environment) -> Self {
        Self::new(environment.base_url())
    }

    pub(crate) fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_environment(Environment::current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_urls() {
        assert_eq!(Environment::Development.base_url(), "http://localhost:8000/api");
        assert_eq!(
            Environment::Production.base_url(),
            "https://your-backend-domain.com/api"
        );
    }

    #[test]
    fn test_default_follows_build_profile() {
        let expected = if cfg!(debug_assertions) {
            Environment::Development
        } else {
            Environment::Production
        };
        assert_eq!(Environment::default(), expected);
        assert_eq!(ClientConfig::default().base_url, expected.base_url());
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = ClientConfig::new("http://127.0.0.1:1234/api/");
        assert_eq!(config.url("/posts/"), "http://127.0.0.1:1234/api/posts/");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
