//! Process configuration, built once at startup and threaded into the
//! components that need it. Core components never read the environment.

use anyhow::{Result, bail};

/// Configuration for commands that talk to the remote feed.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// GitHub personal access token.
    pub token: String,
}

impl FetchConfig {
    /// Build the fetch configuration from an optional credential.
    ///
    /// # Errors
    ///
    /// Returns an error when no credential is available; fetch commands treat
    /// this as fatal at startup rather than attempting degraded operation.
    pub fn new(token: Option<String>) -> Result<Self> {
        match token.filter(|t| !t.is_empty()) {
            Some(token) => Ok(Self { token }),
            None => bail!("a GitHub token is required; pass --token or set GITHUB_TOKEN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_accepted() {
        let config = FetchConfig::new(Some("ghp_example".to_string())).unwrap();
        assert_eq!(config.token, "ghp_example");
    }

    #[test]
    fn test_missing_token_rejected() {
        assert!(FetchConfig::new(None).is_err());
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(FetchConfig::new(Some(String::new())).is_err());
    }
}
