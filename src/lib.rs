//! `bitbucket` is a blocking client library and command-line tool for the
//! Bitbucket REST API.
//!
//! It covers repositories (listing with pagination, CRUD, and exporting a
//! repository's files as a zip archive) and the webhooks/services registered
//! on them. Every operation renders a URL template and sends one request
//! through a [`Transport`](transport::Transport); the default transport is a
//! blocking `reqwest` client.
//!
//! All state lives in an explicit [`Session`]: credentials, the current user
//! and repository, the URL templates, and the tree-walk error policy.
//!
//! # Example: Library Usage
//!
//! The example below runs against an in-memory transport so it needs no
//! network. Swap in [`Session::new`] to talk to the real API.
//!
//! ```
//! use bitbucket::config::ConfigBuilder;
//! use bitbucket::transport::{Method, ScriptedTransport};
//! use bitbucket::Session;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # fn main() -> bitbucket::Result<()> {
//! let config = ConfigBuilder::new()
//!     .base_url("https://api.example.test/2.0/")
//!     .username("alice")
//!     .password("app-password")
//!     .build()?;
//!
//! let transport = ScriptedTransport::new().with_json(
//!     Method::Get,
//!     "https://api.example.test/2.0/repositories/alice/",
//!     json!({"values": [{"uuid": "{1}", "slug": "tools"}]}),
//! );
//! let session = Session::with_transport(&config, Arc::new(transport));
//!
//! let repos = session.repositories().list_own()?;
//! assert_eq!(repos["{1}"]["slug"], "tools");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;
pub mod progress;
pub mod repository;
pub mod session;
pub mod transport;
pub mod urls;
pub mod webhook;

// Re-export key public types for easier use as a library
pub use config::{Config, ConfigBuilder, FetchPolicy};
pub use errors::{Error, Result};
pub use repository::{ArchiveOptions, ArchiveOutcome, Project, RepositoryManager};
pub use session::Session;
pub use transport::{Auth, Body, HttpTransport, Method, Response, Transport};
pub use webhook::WebhookManager;
