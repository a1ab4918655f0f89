// src/transport/http.rs
//! The default transport, built on a blocking `reqwest` client.

use super::{Auth, Body, Method, Response, Transport};
use crate::errors::Result;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;

/// Sends requests with a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a client with JSON `Accept` headers, the given user agent, and a request timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Wraps an already configured client (proxies, TLS settings, etc.).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl HttpTransport {
    fn send(
        &self,
        method: Method,
        url: &str,
        auth: Option<&Auth>,
        body: Option<&Value>,
        raw: bool,
    ) -> Result<Response> {
        log::debug!("{} {}", method, url);

        let mut request = self.client.request(method.into(), url);
        request = match auth {
            Some(Auth::Basic { username, password }) => {
                request.basic_auth(username, Some(password))
            }
            Some(Auth::Bearer(token)) => request.bearer_auth(token),
            None => request,
        };
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send() {
            Ok(response) => response,
            Err(e) => {
                log::warn!("{} {} failed: {}", method, url, e);
                return Ok(Response::failure(Body::Text(e.to_string())));
            }
        };

        let status = response.status();
        if !status.is_success() {
            log::debug!("{} {} returned {}", method, url, status);
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes()?.to_vec();

        let body = if raw {
            decode_raw_body(bytes)
        } else {
            decode_body(content_type.as_deref(), bytes)
        };
        Ok(Response {
            ok: status.is_success(),
            body,
        })
    }
}

impl Transport for HttpTransport {
    fn dispatch(
        &self,
        method: Method,
        url: &str,
        auth: Option<&Auth>,
        body: Option<&Value>,
    ) -> Result<Response> {
        self.send(method, url, auth, body, false)
    }

    fn fetch_raw(&self, url: &str, auth: Option<&Auth>) -> Result<Response> {
        self.send(Method::Get, url, auth, None, true)
    }
}

/// Normalizes a raw response body according to its content type.
pub(crate) fn decode_body(content_type: Option<&str>, bytes: Vec<u8>) -> Body {
    if bytes.is_empty() {
        return Body::Empty;
    }
    let is_json = content_type.is_some_and(|ct| ct.contains("json"));
    if is_json {
        if let Ok(value) = serde_json::from_slice(&bytes) {
            return Body::Json(value);
        }
        log::debug!("Response declared as JSON but failed to parse; keeping it as raw content.");
    }
    decode_raw_body(bytes)
}

/// Keeps a body as served: text when it is valid UTF-8, bytes otherwise.
pub(crate) fn decode_raw_body(bytes: Vec<u8>) -> Body {
    if bytes.is_empty() {
        return Body::Empty;
    }
    match String::from_utf8(bytes) {
        Ok(text) => Body::Text(text),
        Err(e) => Body::Bytes(e.into_bytes()),
    }
}
