// crates/core/src/config.rs

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SESSION_PATH: &str = ".hr_admin_session.json";

/// Backend connection settings.
///
/// Environment variables:
/// - HR_API_BASE_URL: e.g. "https://hr.example.com" (required)
/// - HR_API_TIMEOUT_SECS: per-request timeout, default 30
/// - HR_SESSION_PATH: where the logged-in user is kept, default ".hr_admin_session.json"
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub session_path: PathBuf,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_path: PathBuf::from(DEFAULT_SESSION_PATH),
        }
    }

    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("HR_API_BASE_URL").context("HR_API_BASE_URL not set")?;
        let mut config = Self::new(&base_url);

        if let Ok(raw) = std::env::var("HR_API_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("HR_API_TIMEOUT_SECS is not a number: {raw}"))?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Ok(path) = std::env::var("HR_SESSION_PATH") {
            config.session_path = PathBuf::from(path);
        }

        info!(base_url = %config.base_url, timeout_secs = config.timeout.as_secs(), "loaded API config");
        Ok(config)
    }

    /// Absolute URL for an API path such as "/api/login".
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_and_joins_paths() {
        let config = ApiConfig::new("https://hr.example.com/");
        assert_eq!(config.base_url, "https://hr.example.com");
        assert_eq!(
            config.url("/api/login"),
            "https://hr.example.com/api/login"
        );
        assert_eq!(config.url("api/login"), "https://hr.example.com/api/login");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
