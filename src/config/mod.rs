//! Defines the `Config` struct and related types for client configuration.
//!
//! A `Config` holds everything a [`Session`](crate::session::Session) needs before
//! its first request: where the API lives, who is calling, the default
//! repository, and how tree walks treat failed fetches.

use crate::constants::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::transport::Auth;
use std::time::Duration;

pub use builder::ConfigBuilder;
mod builder;
mod validation;

/// How the archive tree walk handles a file or directory fetch that fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Keep going. A failed file fetch is stored in the archive as whatever the
    /// API answered; a failed directory listing is skipped.
    #[default]
    BestEffort,
    /// Abort the walk on the first failed fetch.
    FailFast,
}

/// Client configuration, validated and ready to open a session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the REST API, always ending in `/`.
    pub base_url: String,
    /// The account whose repositories are addressed by default.
    pub username: Option<String>,
    /// Credentials attached to authenticated requests.
    pub auth: Option<Auth>,
    /// The repository addressed when an operation is given no slug.
    pub repo_slug: Option<String>,
    /// Tree-walk behavior on failed fetches.
    pub fetch_policy: FetchPolicy,
    /// Per-request timeout applied by the HTTP transport.
    pub timeout: Duration,
    /// `User-Agent` header sent by the HTTP transport.
    pub user_agent: String,
}

impl Config {
    /// Creates a default `Config` for testing purposes.
    ///
    /// The base URL points at a host that never resolves; tests pair this with
    /// a scripted transport.
    #[doc(hidden)]
    pub fn new_for_test() -> Self {
        Self {
            base_url: "https://api.bitbucket.test/2.0/".to_string(),
            username: Some("alice".to_string()),
            auth: Some(Auth::Basic {
                username: "alice".to_string(),
                password: "app-password".to_string(),
            }),
            repo_slug: Some("tools".to_string()),
            fetch_policy: FetchPolicy::BestEffort,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for Config {
    /// An anonymous configuration against the public API.
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            username: None,
            auth: None,
            repo_slug: None,
            fetch_policy: FetchPolicy::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
