// src/transport/scripted.rs
//! An in-memory transport that serves canned responses.
//!
//! Used by the test suites to exercise the managers without a network. Routes are
//! matched on the exact `(method, url)` pair; anything unmatched answers with a
//! failed JSON response, the way the API answers an unknown path.

use super::{Auth, Body, Method, Response, Transport};
use crate::errors::Result;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

/// One dispatch observed by a [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub url: String,
    pub authenticated: bool,
    pub body: Option<Value>,
    /// `true` for [`Transport::fetch_raw`] calls.
    pub raw: bool,
}

/// A transport that replays canned responses and records every call.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: HashMap<(Method, String), Response>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `method url` with the given response.
    pub fn with_response(mut self, method: Method, url: &str, response: Response) -> Self {
        self.routes.insert((method, url.to_string()), response);
        self
    }

    /// Answers `method url` successfully with a JSON body.
    pub fn with_json(self, method: Method, url: &str, value: Value) -> Self {
        self.with_response(method, url, Response::success(Body::Json(value)))
    }

    /// Answers `GET url` successfully with a text body.
    pub fn with_text(self, url: &str, text: &str) -> Self {
        self.with_response(
            Method::Get,
            url,
            Response::success(Body::Text(text.to_string())),
        )
    }

    /// All calls dispatched so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The URLs dispatched so far, in order.
    pub fn urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.url).collect()
    }
}

impl ScriptedTransport {
    fn answer(&self, call: RecordedCall) -> Response {
        let method = call.method;
        let url = call.url.clone();
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);

        self.routes
            .get(&(method, url.clone()))
            .cloned()
            .unwrap_or_else(|| {
                Response::failure(Body::Json(json!({
                    "type": "error",
                    "error": { "message": format!("No route for {} {}", method, url) }
                })))
            })
    }
}

impl Transport for ScriptedTransport {
    fn dispatch(
        &self,
        method: Method,
        url: &str,
        auth: Option<&Auth>,
        body: Option<&Value>,
    ) -> Result<Response> {
        Ok(self.answer(RecordedCall {
            method,
            url: url.to_string(),
            authenticated: auth.is_some(),
            body: body.cloned(),
            raw: false,
        }))
    }

    /// Serves the `GET url` route; a JSON route is handed back as its serialized text.
    fn fetch_raw(&self, url: &str, auth: Option<&Auth>) -> Result<Response> {
        let response = self.answer(RecordedCall {
            method: Method::Get,
            url: url.to_string(),
            authenticated: auth.is_some(),
            body: None,
            raw: true,
        });
        let body = match response.body {
            Body::Json(value) => Body::Text(value.to_string()),
            other => other,
        };
        Ok(Response {
            ok: response.ok,
            body,
        })
    }
}
