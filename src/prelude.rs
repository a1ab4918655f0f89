//! The `bitbucket` prelude for convenient library usage.
//!
//! ```
//! use bitbucket::prelude::*;
//! # fn main() -> Result<()> {
//! let config = ConfigBuilder::new().username("alice").token("abc").build()?;
//! let session = Session::new(&config)?;
//! assert_eq!(session.username(), Some("alice"));
//! # Ok(())
//! # }
//! ```

pub use crate::config::{Config, ConfigBuilder, FetchPolicy};
pub use crate::errors::{Error, Result};
pub use crate::progress::{NoOpProgress, ProgressReporter};
pub use crate::repository::{ArchiveOptions, ArchiveOutcome, FileTree, Project};
pub use crate::session::Session;
pub use crate::transport::{Auth, Body, Method, Response, Transport};
pub use crate::webhook::advisory_fields;
