//! Defines the error types returned by the client.
//!
//! Remote failures that the API reports (non-2xx statuses) are not errors at this
//! layer: they come back as a [`Response`](crate::transport::Response) with
//! `ok == false`. The variants here cover local failures and the few places where
//! the client needs a well-formed response to continue (pagination, fail-fast
//! tree walks).

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the API or writing archives.
#[derive(Error, Debug)]
pub enum Error {
    // --- Transport ---
    /// The HTTP client could not be built or a response body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A JSON value could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered a request the client depends on with a failure.
    #[error("Request to '{url}' failed: {body}")]
    Api {
        /// The URL that was requested.
        url: String,
        /// The response body, rendered as text.
        body: String,
    },

    /// The API answered with a shape the client cannot interpret.
    #[error("Unexpected response from '{url}': {reason}")]
    UnexpectedResponse {
        /// The URL that was requested.
        url: String,
        /// What was wrong with the response.
        reason: String,
    },

    // --- URL templates ---
    /// No URL template is registered under this action name.
    #[error("Unknown URL action '{0}'")]
    UnknownAction(String),

    /// A URL template references a placeholder that was not supplied.
    #[error("URL template '{action}' requires a value for '{placeholder}'")]
    MissingUrlParam {
        /// The action whose template was being rendered.
        action: String,
        /// The placeholder without a value.
        placeholder: String,
    },

    /// The operation needs session context (username, repository slug) that is not set.
    #[error("No {0} given and none set on the session")]
    MissingContext(&'static str),

    // --- I/O ---
    /// Error occurring while writing an archive to disk.
    #[error("I/O error accessing path '{path}': {source}")]
    Io {
        /// The path that caused the I/O error.
        path: String,
        /// The underlying `std::io::Error`.
        #[source]
        source: std::io::Error,
    },

    /// The zip writer failed.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // --- Configuration ---
    /// Invalid configuration settings or combinations.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while validating a [`Config`](crate::config::Config).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Two options were given that cannot be combined.
    #[error("Invalid configuration: {option1} cannot be used together with {option2}")]
    Conflict {
        /// The first option.
        option1: String,
        /// The second option.
        option2: String,
    },

    /// An option has a value that cannot be used.
    #[error("Invalid configuration: {option} {reason}")]
    InvalidValue {
        /// The offending option.
        option: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// An option was given without another option it depends on.
    #[error("Invalid configuration: {option} requires {required}")]
    MissingDependency {
        /// The option that was given.
        option: String,
        /// The option it requires.
        required: String,
    },
}

/// Helper function to create an `Error::Io` with path context.
///
/// # Arguments
/// * `source` - The original `std::io::Error`.
/// * `path` - The path associated with the error, convertible to `AsRef<std::path::Path>`.
pub fn io_error_with_path<P: AsRef<std::path::Path>>(source: std::io::Error, path: P) -> Error {
    Error::Io {
        path: path.as_ref().display().to_string(),
        source,
    }
}
