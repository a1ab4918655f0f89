//! The URL template table shared by the API managers.
//!
//! Each manager module declares the templates it needs as `(action, template)`
//! pairs and registers them into the session's table. Templates are relative to
//! the API base and use `{name}` placeholders.

use crate::errors::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Matches `{placeholder}` segments in a template.
static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").unwrap());

/// Templates not owned by a specific manager.
pub(crate) const URLS: &[(&str, &str)] = &[("GET_USER", "users/{username}/")];

/// A table of URL templates keyed by action name, rendered against a base URL.
#[derive(Debug, Clone)]
pub struct UrlTemplates {
    base: String,
    table: HashMap<String, String>,
}

impl UrlTemplates {
    /// Creates an empty table. A trailing `/` is added to `base` if missing.
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self {
            base,
            table: HashMap::new(),
        }
    }

    /// The base every template is rendered against.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Registers templates. Later registrations replace earlier ones with the same action.
    pub fn register(&mut self, entries: &[(&str, &str)]) {
        for (action, template) in entries {
            self.table.insert(action.to_string(), template.to_string());
        }
    }

    /// Returns the raw template registered under `action`.
    pub fn template(&self, action: &str) -> Option<&str> {
        self.table.get(action).map(String::as_str)
    }

    /// Renders the template for `action`, substituting `params`, and prefixes the base.
    ///
    /// # Errors
    /// Returns [`Error::UnknownAction`] if nothing is registered under `action`, and
    /// [`Error::MissingUrlParam`] if the template uses a placeholder not in `params`.
    ///
    /// # Examples
    /// ```
    /// use bitbucket::urls::UrlTemplates;
    ///
    /// let mut urls = UrlTemplates::new("https://api.bitbucket.org/2.0");
    /// urls.register(&[("GET_REPO", "repositories/{username}/{repo_slug}/")]);
    /// let url = urls
    ///     .url("GET_REPO", &[("username", "alice"), ("repo_slug", "tools")])
    ///     .unwrap();
    /// assert_eq!(url, "https://api.bitbucket.org/2.0/repositories/alice/tools/");
    /// ```
    pub fn url(&self, action: &str, params: &[(&str, &str)]) -> Result<String> {
        let template = self
            .template(action)
            .ok_or_else(|| Error::UnknownAction(action.to_string()))?;

        let mut rendered = String::with_capacity(self.base.len() + template.len());
        rendered.push_str(&self.base);

        let mut last_end = 0;
        for caps in PLACEHOLDER_RE.captures_iter(template) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = params
                .iter()
                .find(|(key, _)| *key == name.as_str())
                .map(|(_, value)| *value)
                .ok_or_else(|| Error::MissingUrlParam {
                    action: action.to_string(),
                    placeholder: name.as_str().to_string(),
                })?;
            rendered.push_str(&template[last_end..whole.start()]);
            rendered.push_str(value);
            last_end = whole.end();
        }
        rendered.push_str(&template[last_end..]);

        Ok(rendered)
    }
}
