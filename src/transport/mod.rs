//! The seam between the API managers and the network.
//!
//! Every manager operation ends in a single call to [`Transport::dispatch`]. The
//! managers never build HTTP requests themselves, which keeps them testable
//! against the in-memory [`ScriptedTransport`] and lets callers plug in their own
//! client (proxies, retries, recording) without touching the managers.

use crate::errors::Result;
use serde_json::Value;
use std::fmt;

mod http;
mod scripted;

pub use http::HttpTransport;
#[doc(hidden)]
pub use scripted::{RecordedCall, ScriptedTransport};

/// The HTTP methods used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// The upper-case method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials attached to authenticated requests.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// HTTP basic authentication (username plus password or app password).
    Basic { username: String, password: String },
    /// A bearer access token.
    Bearer(String),
}

// Secrets never end up in logs.
impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Auth::Bearer(_) => f.debug_tuple("Bearer").field(&"<redacted>").finish(),
        }
    }
}

/// A response body, normalized by the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// A body that parsed as JSON.
    Json(Value),
    /// A non-JSON body that is valid UTF-8.
    Text(String),
    /// Anything else.
    Bytes(Vec<u8>),
    /// No body at all (e.g. `204 No Content`).
    Empty,
}

impl Body {
    /// Returns the JSON value, if this is a JSON body.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Converts the body into the bytes that would be written to a file.
    ///
    /// JSON bodies are re-serialized, so an error payload stored this way stays
    /// readable.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        Ok(match self {
            Body::Json(value) => serde_json::to_vec(&value)?,
            Body::Text(text) => text.into_bytes(),
            Body::Bytes(bytes) => bytes,
            Body::Empty => Vec::new(),
        })
    }

    /// Renders the body as text, lossily for binary content.
    pub fn to_text(&self) -> String {
        match self {
            Body::Json(value) => value.to_string(),
            Body::Text(text) => text.clone(),
            Body::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Body::Empty => String::new(),
        }
    }
}

/// The normalized result of one dispatch: a success flag plus the body.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// `true` when the API answered with a 2xx status.
    pub ok: bool,
    /// The response body.
    pub body: Body,
}

impl Response {
    /// A successful response with the given body.
    pub fn success(body: Body) -> Self {
        Self { ok: true, body }
    }

    /// A failed response with the given body.
    pub fn failure(body: Body) -> Self {
        Self { ok: false, body }
    }

    /// Returns the JSON body, if any.
    pub fn json(&self) -> Option<&Value> {
        self.body.as_json()
    }

    /// Splits the response into the `(ok, body)` pair.
    pub fn into_parts(self) -> (bool, Body) {
        (self.ok, self.body)
    }
}

/// Performs one HTTP request and returns a normalized [`Response`].
///
/// Implementations report API-level failures (non-2xx statuses, unreachable
/// hosts) as `Response { ok: false, .. }`. `Err` is reserved for failures that
/// leave no response to hand back.
pub trait Transport: Send + Sync + fmt::Debug {
    fn dispatch(
        &self,
        method: Method,
        url: &str,
        auth: Option<&Auth>,
        body: Option<&Value>,
    ) -> Result<Response>;

    /// GETs file content. The body must come back with the bytes exactly as
    /// served: never as [`Body::Json`], whatever the content type.
    fn fetch_raw(&self, url: &str, auth: Option<&Auth>) -> Result<Response> {
        self.dispatch(Method::Get, url, auth, None)
    }
}
