//! Repository operations: CRUD, paginated listings, and archive export.
//!
//! Most operations are a URL template plus one dispatch. Two have more shape:
//! - [`RepositoryManager::list_own`] and [`RepositoryManager::list_projects`]
//!   drain a paginated listing (see [`pagination`]).
//! - [`RepositoryManager::archive`] walks the source tree (see [`tree`]) and
//!   packs the downloaded files into a zip container.

use crate::constants::ARCHIVE_FORMAT;
use crate::errors::Result;
use crate::session::Session;
use crate::transport::{Body, Method, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

mod archive;
pub mod pagination;
pub mod tree;

pub use archive::{ArchiveOptions, ArchiveOutcome};
pub use tree::FileTree;

/// URL templates used by repository operations.
pub(crate) const URLS: &[(&str, &str)] = &[
    ("CREATE_REPO", "repositories/{username}/{repo_slug}"),
    ("GET_ALL", "repositories/{username}/"),
    ("GET_REPO", "repositories/{username}/{repo_slug}/"),
    ("UPDATE_REPO", "repositories/{username}/{repo_slug}/"),
    ("DELETE_REPO", "repositories/{username}/{repo_slug}/"),
    (
        "GET_ARCHIVE",
        "repositories/{username}/{repo_slug}/{format}/master/",
    ),
];

/// A project, as embedded in repository records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub key: String,
    pub name: String,
}

/// Repository operations against a [`Session`].
///
/// Obtained from [`Session::repositories`]. Operations that take an optional slug
/// fall back to the session's current repository.
#[derive(Debug, Clone, Copy)]
pub struct RepositoryManager<'a> {
    session: &'a Session,
}

impl<'a> RepositoryManager<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Lists a user's public repositories (the session user by default).
    ///
    /// When the response carries a `repositories` array the body is replaced by
    /// that array; any other shape is returned exactly as the transport produced it.
    pub fn list_public(&self, username: Option<&str>) -> Result<Response> {
        let username = self.session.resolve_username(username)?;
        let url = self.session.url("GET_USER", &[("username", &username)])?;
        let response = self.session.dispatch(Method::Get, &url, false, None)?;
        Ok(extract_repositories(response))
    }

    /// Lists every repository of the session user, keyed by `uuid`.
    ///
    /// Follows the `next` cursor across all pages. A repository seen on more than
    /// one page is kept as first seen.
    pub fn list_own(&self) -> Result<BTreeMap<String, Value>> {
        let url = self.all_url()?;
        pagination::drain_pages(self.session, url, |repo| {
            let uuid = repo.get("uuid")?.as_str()?.to_owned();
            Some((uuid, repo))
        })
    }

    /// Lists the projects the session user's repositories belong to, keyed by project key.
    pub fn list_projects(&self) -> Result<BTreeMap<String, Project>> {
        let url = self.all_url()?;
        pagination::drain_pages(self.session, url, |repo| {
            let project = Project::deserialize(repo.get("project")?).ok()?;
            Some((project.key.clone(), project))
        })
    }

    /// Fetches one repository.
    pub fn get(&self, slug: Option<&str>) -> Result<Response> {
        let url = self.repo_url("GET_REPO", slug)?;
        self.session.dispatch(Method::Get, &url, true, None)
    }

    /// Creates a repository named `slug` with the given fields.
    pub fn create(&self, slug: &str, fields: Map<String, Value>) -> Result<Response> {
        let url = self.repo_url("CREATE_REPO", Some(slug))?;
        let body = Value::Object(fields);
        self.session.dispatch(Method::Post, &url, true, Some(&body))
    }

    /// Updates a repository with the given fields.
    pub fn update(&self, slug: Option<&str>, fields: Map<String, Value>) -> Result<Response> {
        let url = self.repo_url("UPDATE_REPO", slug)?;
        let body = Value::Object(fields);
        self.session.dispatch(Method::Put, &url, true, Some(&body))
    }

    /// Deletes a repository. There is no confirmation and no undo.
    pub fn delete(&self, slug: Option<&str>) -> Result<Response> {
        let url = self.repo_url("DELETE_REPO", slug)?;
        self.session.dispatch(Method::Delete, &url, true, None)
    }

    /// Downloads every file of a repository and packs them into a zip archive.
    ///
    /// `options.format` is accepted but not honored: a zip container is always
    /// written. Returns [`ArchiveOutcome::Empty`] when the walk yields no files.
    /// The written file is not cleaned up; it belongs to the caller.
    ///
    /// # Errors
    /// Returns an error if the slug or username is missing, on transport errors,
    /// on failed fetches under [`FetchPolicy::FailFast`](crate::config::FetchPolicy),
    /// and on any failure writing the archive.
    #[tracing::instrument(skip(self, options))]
    pub fn archive(&self, slug: Option<&str>, options: &ArchiveOptions) -> Result<ArchiveOutcome> {
        let slug = self.session.resolve_slug(slug)?;
        if !options.format.eq_ignore_ascii_case(ARCHIVE_FORMAT) {
            log::warn!(
                "Archive format '{}' is not supported; writing a {} archive instead.",
                options.format,
                ARCHIVE_FORMAT
            );
        }

        let files = tree::walk_tree(self.session, &slug, "/")?;
        log::debug!("Downloaded {} files from '{}'", files.len(), slug);

        let outcome = archive::write_archive(&files, &options.prefix)?;
        match &outcome {
            ArchiveOutcome::Written(path) => {
                log::info!("Archived '{}' to {}", slug, path.display())
            }
            ArchiveOutcome::Empty => log::info!("'{}' has no files to archive", slug),
        }
        Ok(outcome)
    }

    fn all_url(&self) -> Result<String> {
        let username = self.session.resolve_username(None)?;
        self.session.url("GET_ALL", &[("username", &username)])
    }

    fn repo_url(&self, action: &str, slug: Option<&str>) -> Result<String> {
        let username = self.session.resolve_username(None)?;
        let slug = self.session.resolve_slug(slug)?;
        self.session
            .url(action, &[("username", &username), ("repo_slug", &slug)])
    }
}

/// Narrows a public-listing response to its `repositories` array when present.
fn extract_repositories(response: Response) -> Response {
    let repositories = response
        .json()
        .and_then(|body| body.get("repositories"))
        .filter(|repos| repos.is_array())
        .cloned();
    match repositories {
        Some(repos) => Response {
            ok: response.ok,
            body: Body::Json(repos),
        },
        None => response,
    }
}
