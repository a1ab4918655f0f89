// src/config/builder.rs

use super::validation::{parse_base_url, validate_builder_options};
use super::{Config, FetchPolicy};
use crate::cli::GlobalArgs;
use crate::constants::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::errors::Result;
use crate::transport::Auth;
use std::time::Duration;

/// A builder for creating a [`Config`] programmatically.
///
/// Every setter is optional; unset values fall back to the defaults in
/// [`crate::constants`].
///
/// # Examples
///
/// ```
/// use bitbucket::config::{ConfigBuilder, FetchPolicy};
///
/// let config = ConfigBuilder::new()
///     .username("alice")
///     .password("app-password")
///     .repo_slug("tools")
///     .fail_fast(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.base_url, "https://api.bitbucket.org/2.0/");
/// assert_eq!(config.repo_slug.as_deref(), Some("tools"));
/// assert_eq!(config.fetch_policy, FetchPolicy::FailFast);
/// ```
#[derive(Default, Clone)]
pub struct ConfigBuilder {
    pub(super) base_url: Option<String>,
    pub(super) username: Option<String>,
    pub(super) password: Option<String>,
    pub(super) token: Option<String>,
    pub(super) repo_slug: Option<String>,
    pub(super) fail_fast: Option<bool>,
    pub(super) timeout_secs: Option<u64>,
    pub(super) user_agent: Option<String>,
}

impl ConfigBuilder {
    /// Creates a new `ConfigBuilder` with nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder pre-filled from the command line's global options.
    pub fn from_cli(args: &GlobalArgs) -> Self {
        Self {
            base_url: args.base_url.clone(),
            username: args.username.clone(),
            password: args.password.clone(),
            token: args.token.clone(),
            repo_slug: args.repo_slug.clone(),
            fail_fast: Some(args.fail_fast),
            timeout_secs: args.timeout,
            user_agent: None,
        }
    }

    /// Sets the root of the REST API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the account username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the password (or app password) for basic authentication. Requires a username.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets a bearer access token. Conflicts with `password`.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the repository used when an operation is given no slug.
    pub fn repo_slug(mut self, slug: impl Into<String>) -> Self {
        self.repo_slug = Some(slug.into());
        self
    }

    /// Aborts archive tree walks on the first failed fetch instead of embedding it.
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = Some(fail_fast);
        self
    }

    /// Sets the per-request timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Overrides the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Validates the options and builds the [`Config`].
    ///
    /// # Errors
    /// Returns a [`ConfigError`](crate::errors::ConfigError) if options conflict,
    /// a dependency is missing, or a value is invalid.
    pub fn build(self) -> Result<Config> {
        validate_builder_options(&self)?;

        let base_url = parse_base_url(self.base_url.as_deref().unwrap_or(DEFAULT_API_URL))?;

        let auth = match (self.password, self.token) {
            (Some(password), _) => Some(Auth::Basic {
                // Presence checked by validation.
                username: self.username.clone().unwrap_or_default(),
                password,
            }),
            (None, Some(token)) => Some(Auth::Bearer(token)),
            (None, None) => None,
        };

        let fetch_policy = if self.fail_fast.unwrap_or(false) {
            FetchPolicy::FailFast
        } else {
            FetchPolicy::BestEffort
        };

        Ok(Config {
            base_url,
            username: self.username,
            auth,
            repo_slug: self.repo_slug,
            fetch_policy,
            timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::errors::{ConfigError, Error};
    use clap::Parser;

    #[test]
    fn test_defaults() -> Result<()> {
        let config = ConfigBuilder::new().build()?;
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert!(config.username.is_none());
        assert!(config.auth.is_none());
        assert_eq!(config.fetch_policy, FetchPolicy::BestEffort);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        Ok(())
    }

    #[test]
    fn test_basic_auth_uses_username() -> Result<()> {
        let config = ConfigBuilder::new()
            .username("alice")
            .password("secret")
            .build()?;
        assert_eq!(
            config.auth,
            Some(Auth::Basic {
                username: "alice".to_string(),
                password: "secret".to_string()
            })
        );
        Ok(())
    }

    #[test]
    fn test_token_auth() -> Result<()> {
        let config = ConfigBuilder::new().token("abc").build()?;
        assert_eq!(config.auth, Some(Auth::Bearer("abc".to_string())));
        Ok(())
    }

    #[test]
    fn test_password_and_token_conflict() {
        let result = ConfigBuilder::new()
            .username("alice")
            .password("secret")
            .token("abc")
            .build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::Conflict { .. }))
        ));
    }

    #[test]
    fn test_password_requires_username() {
        let result = ConfigBuilder::new().password("secret").build();
        match result {
            Err(Error::Config(ConfigError::MissingDependency { option, required })) => {
                assert_eq!(option, "--password");
                assert_eq!(required, "--username");
            }
            other => panic!("Expected MissingDependency, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_base_url_normalized() -> Result<()> {
        let config = ConfigBuilder::new()
            .base_url("https://bitbucket.example.com/rest/api/1.0")
            .build()?;
        assert_eq!(config.base_url, "https://bitbucket.example.com/rest/api/1.0/");
        Ok(())
    }

    #[test]
    fn test_from_cli() -> Result<()> {
        let cli = Cli::parse_from([
            "bitbucket",
            "--username",
            "alice",
            "--token",
            "abc",
            "--repo",
            "tools",
            "--fail-fast",
            "--timeout",
            "5",
            "repo",
            "get",
        ]);
        let config = ConfigBuilder::from_cli(&cli.global).build()?;
        assert_eq!(config.username.as_deref(), Some("alice"));
        assert_eq!(config.auth, Some(Auth::Bearer("abc".to_string())));
        assert_eq!(config.repo_slug.as_deref(), Some("tools"));
        assert_eq!(config.fetch_policy, FetchPolicy::FailFast);
        assert_eq!(config.timeout, Duration::from_secs(5));
        Ok(())
    }
}
