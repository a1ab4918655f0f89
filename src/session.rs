//! The session: the explicit context every API operation runs against.
//!
//! A `Session` owns the transport, the URL template table, the credentials, and
//! the current username and repository slug. Managers borrow it for the
//! duration of a call, so there is no hidden shared state between them, and
//! nothing an operation produces (such as the file tree of an archive) is left
//! behind on the session.

use crate::config::{Config, FetchPolicy};
use crate::errors::{Error, Result};
use crate::progress::{NoOpProgress, ProgressReporter};
use crate::repository::{self, RepositoryManager};
use crate::transport::{Auth, HttpTransport, Method, Response, Transport};
use crate::urls::{self, UrlTemplates};
use crate::webhook::{self, WebhookManager};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// An authenticated context for talking to the API.
///
/// # Examples
///
/// ```no_run
/// use bitbucket::config::ConfigBuilder;
/// use bitbucket::Session;
///
/// # fn main() -> bitbucket::Result<()> {
/// let config = ConfigBuilder::new()
///     .username("alice")
///     .password("app-password")
///     .build()?;
/// let mut session = Session::new(&config)?;
/// session.set_repo_slug("tools");
///
/// let repo = session.repositories().get(None)?;
/// println!("ok={} body={:?}", repo.ok, repo.body);
/// # Ok(())
/// # }
/// ```
pub struct Session {
    transport: Arc<dyn Transport>,
    urls: UrlTemplates,
    auth: Option<Auth>,
    username: Option<String>,
    repo_slug: Option<String>,
    fetch_policy: FetchPolicy,
    progress: Arc<dyn ProgressReporter>,
}

impl Session {
    /// Opens a session over the default blocking HTTP transport.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(&config.user_agent, config.timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Opens a session over any transport.
    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>) -> Self {
        let mut urls = UrlTemplates::new(config.base_url.clone());
        urls.register(urls::URLS);
        urls.register(repository::URLS);
        urls.register(webhook::URLS);

        Self {
            transport,
            urls,
            auth: config.auth.clone(),
            username: config.username.clone(),
            repo_slug: config.repo_slug.clone(),
            fetch_policy: config.fetch_policy,
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Reports archive tree walks to `progress`.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Repository operations.
    pub fn repositories(&self) -> RepositoryManager<'_> {
        RepositoryManager::new(self)
    }

    /// Webhook (service) operations.
    pub fn webhooks(&self) -> WebhookManager<'_> {
        WebhookManager::new(self)
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
    }

    pub fn repo_slug(&self) -> Option<&str> {
        self.repo_slug.as_deref()
    }

    /// Sets the repository addressed by operations that are given no slug.
    pub fn set_repo_slug(&mut self, slug: impl Into<String>) {
        self.repo_slug = Some(slug.into());
    }

    pub fn fetch_policy(&self) -> FetchPolicy {
        self.fetch_policy
    }

    pub fn set_fetch_policy(&mut self, policy: FetchPolicy) {
        self.fetch_policy = policy;
    }

    /// The URL template table. Mutable access allows overriding templates.
    pub fn urls(&self) -> &UrlTemplates {
        &self.urls
    }

    pub fn urls_mut(&mut self) -> &mut UrlTemplates {
        &mut self.urls
    }

    pub(crate) fn progress(&self) -> &dyn ProgressReporter {
        self.progress.as_ref()
    }

    /// Renders the URL template registered under `action`.
    pub fn url(&self, action: &str, params: &[(&str, &str)]) -> Result<String> {
        self.urls.url(action, params)
    }

    /// Sends one request through the transport, attaching credentials when `authenticated`.
    pub fn dispatch(
        &self,
        method: Method,
        url: &str,
        authenticated: bool,
        body: Option<&Value>,
    ) -> Result<Response> {
        let auth = if authenticated { self.auth.as_ref() } else { None };
        self.transport.dispatch(method, url, auth, body)
    }

    /// Downloads file content with credentials, keeping the bytes as served.
    pub fn fetch_raw(&self, url: &str) -> Result<Response> {
        self.transport.fetch_raw(url, self.auth.as_ref())
    }

    /// The explicit username if given, else the session's.
    pub(crate) fn resolve_username(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .or(self.username.as_deref())
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .ok_or(Error::MissingContext("username"))
    }

    /// The explicit slug if given, else the session's current repository.
    pub(crate) fn resolve_slug(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .or(self.repo_slug.as_deref())
            .filter(|slug| !slug.is_empty())
            .map(str::to_owned)
            .ok_or(Error::MissingContext("repository slug"))
    }
}

// Custom Debug implementation, as the progress reporter does not implement Debug.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("transport", &self.transport)
            .field("base_url", &self.urls.base())
            .field("auth", &self.auth)
            .field("username", &self.username)
            .field("repo_slug", &self.repo_slug)
            .field("fetch_policy", &self.fetch_policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ScriptedTransport;

    fn session() -> Session {
        Session::with_transport(&Config::new_for_test(), Arc::new(ScriptedTransport::new()))
    }

    #[test]
    fn test_resolve_slug_prefers_explicit() -> Result<()> {
        let mut session = session();
        assert_eq!(session.resolve_slug(Some("other"))?, "other");
        assert_eq!(session.resolve_slug(None)?, "tools");

        session.set_repo_slug("renamed");
        assert_eq!(session.resolve_slug(None)?, "renamed");
        Ok(())
    }

    #[test]
    fn test_resolve_slug_missing() {
        let mut config = Config::new_for_test();
        config.repo_slug = None;
        let session = Session::with_transport(&config, Arc::new(ScriptedTransport::new()));
        assert!(matches!(
            session.resolve_slug(None),
            Err(Error::MissingContext("repository slug"))
        ));
        assert!(matches!(
            session.resolve_slug(Some("")),
            Err(Error::MissingContext(_))
        ));
    }

    #[test]
    fn test_all_templates_registered() -> Result<()> {
        let session = session();
        for action in [
            "GET_USER",
            "CREATE_REPO",
            "GET_ALL",
            "GET_REPO",
            "UPDATE_REPO",
            "DELETE_REPO",
            "GET_ARCHIVE",
            "GET_WEBHOOK",
            "GET_WEBHOOKS",
            "SET_WEBHOOK",
            "UPDATE_WEBHOOK",
            "DELETE_WEBHOOK",
        ] {
            assert!(session.urls().template(action).is_some(), "{} missing", action);
        }
        Ok(())
    }

    #[test]
    fn test_dispatch_attaches_auth_only_when_asked() -> Result<()> {
        let transport = Arc::new(ScriptedTransport::new());
        let session = Session::with_transport(&Config::new_for_test(), transport.clone());

        session.dispatch(Method::Get, "https://x/a", true, None)?;
        session.dispatch(Method::Get, "https://x/b", false, None)?;

        let calls = transport.calls();
        assert!(calls[0].authenticated);
        assert!(!calls[1].authenticated);
        Ok(())
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", session());
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("app-password"));
    }
}
