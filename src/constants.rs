// src/constants.rs

/// Default root of the Bitbucket REST API. URL templates are rendered relative to it.
pub const DEFAULT_API_URL: &str = "https://api.bitbucket.org/2.0/";

/// `User-Agent` header sent by the default HTTP transport.
pub const DEFAULT_USER_AGENT: &str = concat!("bitbucket-rs/", env!("CARGO_PKG_VERSION"));

/// Default request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Message reported when an archive request yields no files.
pub const ARCHIVE_EMPTY_MESSAGE: &str = "Could not archive your project.";

/// The only archive container format that is actually produced.
pub const ARCHIVE_FORMAT: &str = "zip";

/// File name prefix of the temporary archive container.
pub const ARCHIVE_FILE_PREFIX: &str = "bitbucket-archive-";
