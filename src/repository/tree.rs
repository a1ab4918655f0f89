// src/repository/tree.rs
//! Walks a repository's source tree through the API and downloads every file.

use crate::config::FetchPolicy;
use crate::errors::{Error, Result};
use crate::session::Session;
use crate::transport::{Body, Method};
use serde::Deserialize;
use std::collections::{BTreeMap, VecDeque};

/// Repository-relative path to file content, as downloaded.
pub type FileTree = BTreeMap<String, Vec<u8>>;

/// A directory listing from the `src` endpoint.
///
/// Either key may be absent or `null`, but not both: an object with neither is
/// some other document (an error, a paginated listing) and not a directory.
#[derive(Deserialize, Debug)]
struct DirectoryListing {
    /// Files in this directory, with repository-relative paths.
    files: Option<Vec<FileEntry>>,
    /// Names of subdirectories, relative to this directory.
    directories: Option<Vec<String>>,
}

#[derive(Deserialize, Debug)]
struct FileEntry {
    path: String,
}

/// Downloads every file below `root` in the repository `slug` into a fresh [`FileTree`].
///
/// Directories are visited breadth-first through a work queue; each directory
/// costs one listing request and each file one raw-content request, strictly in
/// sequence. There is no depth limit and no cycle detection: remote trees are
/// assumed to be acyclic.
///
/// With [`FetchPolicy::BestEffort`] a failed file download is stored as whatever
/// the API answered (typically an error document) and a failed directory listing
/// is skipped. With [`FetchPolicy::FailFast`] either aborts the walk.
///
/// # Errors
/// Returns an error if the session has no username, on a transport error, or on
/// any failed fetch under [`FetchPolicy::FailFast`].
pub fn walk_tree(session: &Session, slug: &str, root: &str) -> Result<FileTree> {
    let username = session.resolve_username(None)?;
    let listing_base = session.url(
        "GET_ARCHIVE",
        &[("username", &username), ("repo_slug", slug), ("format", "src")],
    )?;
    let raw_base = session.url(
        "GET_ARCHIVE",
        &[("username", &username), ("repo_slug", slug), ("format", "raw")],
    )?;

    let mut tree = FileTree::new();
    let walked = walk_into(session, &listing_base, &raw_base, root, &mut tree);
    session.progress().walk_finished(tree.len() as u64);
    walked.map(|()| tree)
}

/// Runs the breadth-first walk, filling `tree` as files arrive.
fn walk_into(
    session: &Session,
    listing_base: &str,
    raw_base: &str,
    root: &str,
    tree: &mut FileTree,
) -> Result<()> {
    let policy = session.fetch_policy();
    let progress = session.progress();

    let mut queue: VecDeque<String> = VecDeque::new();
    queue.push_back(root.trim_matches('/').to_string());

    while let Some(dir) = queue.pop_front() {
        let dir_url = format!("{}{}", listing_base, dir);
        log::debug!("Listing '/{}' from: {}", dir, dir_url);

        let Some(listing) = fetch_listing(session, &dir_url, policy)? else {
            continue;
        };
        progress.directory_listed(&dir);

        for file in listing.files.unwrap_or_default() {
            let path = file.path.trim_start_matches('/').to_string();
            let file_url = format!("{}{}", raw_base, path);
            log::debug!("Downloading '{}' from: {}", path, file_url);

            let response = session.fetch_raw(&file_url)?;
            if !response.ok {
                if policy == FetchPolicy::FailFast {
                    return Err(Error::Api {
                        url: file_url,
                        body: response.body.to_text(),
                    });
                }
                log::warn!(
                    "Downloading '{}' failed; archiving the error response in its place.",
                    path
                );
            }
            let count = tree.len() as u64 + 1;
            progress.file_fetched(&path, count);
            tree.insert(path, response.body.into_bytes()?);
        }

        for name in listing.directories.unwrap_or_default() {
            queue.push_back(join_dir(&dir, &name));
        }
    }
    Ok(())
}

/// Fetches and parses one directory listing. `Ok(None)` means "skip this directory".
fn fetch_listing(
    session: &Session,
    url: &str,
    policy: FetchPolicy,
) -> Result<Option<DirectoryListing>> {
    let response = session.dispatch(Method::Get, url, true, None)?;
    if !response.ok {
        if policy == FetchPolicy::FailFast {
            return Err(Error::Api {
                url: url.to_string(),
                body: response.body.to_text(),
            });
        }
        log::warn!("Listing {} failed; skipping the directory.", url);
        return Ok(None);
    }

    let parsed = match response.body {
        Body::Json(value) => serde_json::from_value::<DirectoryListing>(value)
            .map_err(|e| e.to_string())
            .and_then(|listing| {
                if listing.files.is_none() && listing.directories.is_none() {
                    Err("neither 'files' nor 'directories' in the response".to_string())
                } else {
                    Ok(listing)
                }
            }),
        _ => Err("directory listing is not JSON".to_string()),
    };
    match parsed {
        Ok(listing) => Ok(Some(listing)),
        Err(reason) if policy == FetchPolicy::FailFast => Err(Error::UnexpectedResponse {
            url: url.to_string(),
            reason,
        }),
        Err(reason) => {
            log::warn!("Skipping {}: {}", url, reason);
            Ok(None)
        }
    }
}

/// Joins a subdirectory name onto a repository-relative directory path.
fn join_dir(parent: &str, child: &str) -> String {
    let child = child.trim_matches('/');
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{}/{}", parent.trim_end_matches('/'), child)
    }
}
