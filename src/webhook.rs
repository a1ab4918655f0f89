//! Webhook (service) operations on a repository.
//!
//! Services are registered by type; each type expects its own set of fields.
//! The field lists in [`advisory_fields`] document what the API expects, but
//! nothing here enforces them: the API is the authority on what it accepts.

use crate::errors::Result;
use crate::session::Session;
use crate::transport::{Method, Response};
use serde_json::{Map, Value};

/// URL templates used by webhook operations.
pub(crate) const URLS: &[(&str, &str)] = &[
    (
        "GET_WEBHOOK",
        "repositories/{username}/{repo_slug}/hooks/{service_id}/",
    ),
    ("GET_WEBHOOKS", "repositories/{username}/{repo_slug}/hooks/"),
    ("SET_WEBHOOK", "repositories/{username}/{repo_slug}/hooks/"),
    (
        "UPDATE_WEBHOOK",
        "repositories/{username}/{repo_slug}/hooks/{service_id}/",
    ),
    (
        "DELETE_WEBHOOK",
        "repositories/{username}/{repo_slug}/hooks/{service_id}/",
    ),
];

/// Known service types and the fields each one expects.
const SERVICE_FIELDS: &[(&str, &[&str])] = &[
    ("Basecamp", &["Username", "Password", "Discussion URL"]),
    ("CIA.vc", &["Module", "Project"]),
    ("Email Diff", &["Email"]),
    ("Email", &["Email"]),
    ("FogBugz", &["Repository ID", "CVSSubmit URL"]),
    ("FriendFeed", &["Username", "Remote Key", "Format"]),
    ("Geocommit", &[]),
    ("Issues", &[]),
    ("Lighthouse", &["Project ID", "API Key", "Subdomain"]),
    ("Pivotal Tracker", &["Token"]),
    ("POST", &["URL"]),
    ("Rietveld", &["Email", "Password", "URL"]),
    ("Superfeedr", &[]),
];

/// The fields a service type is documented to expect, or `None` for an unknown type.
///
/// # Examples
/// ```
/// use bitbucket::webhook::advisory_fields;
///
/// assert_eq!(advisory_fields("POST"), Some(&["URL"][..]));
/// assert_eq!(advisory_fields("Issues"), Some(&[][..]));
/// assert!(advisory_fields("Carrier Pigeon").is_none());
/// ```
pub fn advisory_fields(service_type: &str) -> Option<&'static [&'static str]> {
    SERVICE_FIELDS
        .iter()
        .find(|(name, _)| *name == service_type)
        .map(|(_, fields)| *fields)
}

/// Webhook operations against a [`Session`].
///
/// Obtained from [`Session::webhooks`]. Every operation takes an optional slug
/// that falls back to the session's current repository.
#[derive(Debug, Clone, Copy)]
pub struct WebhookManager<'a> {
    session: &'a Session,
}

impl<'a> WebhookManager<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Registers a service of type `service_type` on a repository.
    ///
    /// The submitted payload always carries `type = service_type`, even if
    /// `fields` contains its own `type`.
    pub fn create(
        &self,
        service_type: &str,
        slug: Option<&str>,
        mut fields: Map<String, Value>,
    ) -> Result<Response> {
        let url = self.hooks_url("SET_WEBHOOK", slug, None)?;

        match advisory_fields(service_type) {
            Some(expected) => {
                let missing: Vec<&str> = expected
                    .iter()
                    .copied()
                    .filter(|field| !fields.contains_key(*field))
                    .collect();
                if !missing.is_empty() {
                    log::debug!(
                        "Service '{}' usually expects fields {:?}; sending anyway.",
                        service_type,
                        missing
                    );
                }
            }
            None => log::debug!("Service type '{}' is not a known type.", service_type),
        }

        fields.insert("type".to_string(), Value::String(service_type.to_string()));
        let body = Value::Object(fields);
        self.session.dispatch(Method::Post, &url, true, Some(&body))
    }

    /// Fetches one service.
    pub fn get(&self, service_id: &str, slug: Option<&str>) -> Result<Response> {
        let url = self.hooks_url("GET_WEBHOOK", slug, Some(service_id))?;
        self.session.dispatch(Method::Get, &url, true, None)
    }

    /// Updates a service with the given fields.
    pub fn update(
        &self,
        service_id: &str,
        slug: Option<&str>,
        fields: Map<String, Value>,
    ) -> Result<Response> {
        let url = self.hooks_url("UPDATE_WEBHOOK", slug, Some(service_id))?;
        let body = Value::Object(fields);
        self.session.dispatch(Method::Put, &url, true, Some(&body))
    }

    /// Deletes a service. There is no confirmation and no undo.
    pub fn delete(&self, service_id: &str, slug: Option<&str>) -> Result<Response> {
        let url = self.hooks_url("DELETE_WEBHOOK", slug, Some(service_id))?;
        self.session.dispatch(Method::Delete, &url, true, None)
    }

    /// Lists every service registered on a repository.
    pub fn list_all(&self, slug: Option<&str>) -> Result<Response> {
        let url = self.hooks_url("GET_WEBHOOKS", slug, None)?;
        self.session.dispatch(Method::Get, &url, true, None)
    }

    fn hooks_url(
        &self,
        action: &str,
        slug: Option<&str>,
        service_id: Option<&str>,
    ) -> Result<String> {
        let username = self.session.resolve_username(None)?;
        let slug = self.session.resolve_slug(slug)?;
        let mut params = vec![("username", username.as_str()), ("repo_slug", slug.as_str())];
        if let Some(id) = service_id {
            params.push(("service_id", id));
        }
        self.session.url(action, &params)
    }
}
