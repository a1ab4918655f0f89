//! Draining of paginated listings.
//!
//! A paginated endpoint answers with a page object holding a `values` array and,
//! unless it is the last page, a `next` field with the absolute URL of the
//! following page.

use crate::errors::{Error, Result};
use crate::session::Session;
use crate::transport::{Body, Method};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One page of a paginated listing.
#[derive(Debug, Deserialize)]
struct Page {
    /// Missing and `null` both mean an empty page.
    values: Option<Vec<Value>>,
    next: Option<String>,
}

/// Follows the `next` cursor from `first_url` until it runs out, merging every page.
///
/// Each value is handed to `key_fn`, which returns the merge key and the item to
/// keep, or `None` to skip the value. When the same key appears more than once
/// the first occurrence is kept.
///
/// # Errors
/// Returns [`Error::Api`] if a page request fails and
/// [`Error::UnexpectedResponse`] if a page is not a JSON page object.
pub fn drain_pages<T, F>(
    session: &Session,
    first_url: String,
    mut key_fn: F,
) -> Result<BTreeMap<String, T>>
where
    F: FnMut(Value) -> Option<(String, T)>,
{
    let mut merged = BTreeMap::new();
    let mut next_url = Some(first_url);
    let mut page_count = 0usize;

    while let Some(url) = next_url.take() {
        let response = session.dispatch(Method::Get, &url, true, None)?;
        if !response.ok {
            return Err(Error::Api {
                url,
                body: response.body.to_text(),
            });
        }
        let Body::Json(value) = response.body else {
            return Err(Error::UnexpectedResponse {
                url,
                reason: "page is not JSON".to_string(),
            });
        };
        let page: Page = serde_json::from_value(value).map_err(|e| Error::UnexpectedResponse {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let values = page.values.unwrap_or_default();
        page_count += 1;
        log::debug!("Page {} from {}: {} values", page_count, url, values.len());

        for value in values {
            match key_fn(value) {
                Some((key, item)) => {
                    merged.entry(key).or_insert(item);
                }
                None => log::debug!("Skipping a record without a merge key on {}", url),
            }
        }

        next_url = page.next.filter(|next| !next.is_empty());
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::transport::{Response, ScriptedTransport};
    use serde_json::json;
    use std::sync::Arc;

    fn by_id(value: Value) -> Option<(String, Value)> {
        let id = value.get("id")?.as_str()?.to_owned();
        Some((id, value))
    }

    fn session_over(transport: ScriptedTransport) -> (Session, Arc<ScriptedTransport>) {
        let transport = Arc::new(transport);
        let session = Session::with_transport(&Config::new_for_test(), transport.clone());
        (session, transport)
    }

    #[test]
    fn test_three_pages_are_merged() -> Result<()> {
        let (session, transport) = session_over(
            ScriptedTransport::new()
                .with_json(
                    Method::Get,
                    "https://p/1",
                    json!({"values": [{"id": "a"}], "next": "https://p/2"}),
                )
                .with_json(
                    Method::Get,
                    "https://p/2",
                    json!({"values": [{"id": "b"}, {"id": "c"}], "next": "https://p/3"}),
                )
                .with_json(Method::Get, "https://p/3", json!({"values": [{"id": "d"}]})),
        );

        let merged = drain_pages(&session, "https://p/1".to_string(), by_id)?;

        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
        assert_eq!(transport.urls(), vec!["https://p/1", "https://p/2", "https://p/3"]);
        Ok(())
    }

    #[test]
    fn test_first_occurrence_wins() -> Result<()> {
        let (session, _) = session_over(
            ScriptedTransport::new()
                .with_json(
                    Method::Get,
                    "https://p/1",
                    json!({"values": [{"id": "a", "v": 1}], "next": "https://p/2"}),
                )
                .with_json(
                    Method::Get,
                    "https://p/2",
                    json!({"values": [{"id": "a", "v": 2}, {"id": "b", "v": 3}], "next": null}),
                ),
        );

        let merged = drain_pages(&session, "https://p/1".to_string(), by_id)?;

        assert_eq!(merged.len(), 2);
        assert_eq!(merged["a"]["v"], json!(1));
        Ok(())
    }

    #[test]
    fn test_empty_first_page() -> Result<()> {
        let (session, transport) = session_over(
            ScriptedTransport::new().with_json(Method::Get, "https://p/1", json!({"values": []})),
        );
        let merged = drain_pages(&session, "https://p/1".to_string(), by_id)?;
        assert!(merged.is_empty());
        assert_eq!(transport.calls().len(), 1);
        Ok(())
    }

    #[test]
    fn test_null_and_missing_values_are_empty_pages() -> Result<()> {
        let (session, transport) = session_over(
            ScriptedTransport::new()
                .with_json(
                    Method::Get,
                    "https://p/1",
                    json!({"values": null, "next": "https://p/2"}),
                )
                .with_json(Method::Get, "https://p/2", json!({"pagelen": 10}))
                .with_json(Method::Get, "https://p/3", json!({"values": [{"id": "x"}]})),
        );
        let merged = drain_pages(&session, "https://p/1".to_string(), by_id)?;
        assert!(merged.is_empty());
        assert_eq!(transport.urls(), vec!["https://p/1", "https://p/2"]);
        Ok(())
    }

    #[test]
    fn test_records_without_key_are_skipped() -> Result<()> {
        let (session, _) = session_over(ScriptedTransport::new().with_json(
            Method::Get,
            "https://p/1",
            json!({"values": [{"name": "no id"}, {"id": "a"}]}),
        ));
        let merged = drain_pages(&session, "https://p/1".to_string(), by_id)?;
        assert_eq!(merged.len(), 1);
        Ok(())
    }

    #[test]
    fn test_failed_page_is_an_error() {
        let (session, _) = session_over(
            ScriptedTransport::new()
                .with_json(
                    Method::Get,
                    "https://p/1",
                    json!({"values": [{"id": "a"}], "next": "https://p/2"}),
                )
                .with_response(
                    Method::Get,
                    "https://p/2",
                    Response::failure(Body::Text("rate limited".to_string())),
                ),
        );
        let result = drain_pages(&session, "https://p/1".to_string(), by_id);
        match result {
            Err(Error::Api { url, body }) => {
                assert_eq!(url, "https://p/2");
                assert_eq!(body, "rate limited");
            }
            other => panic!("Expected Error::Api, got {:?}", other.map(|m| m.len())),
        }
    }

    #[test]
    fn test_non_page_body_is_unexpected() {
        let (session, _) = session_over(ScriptedTransport::new().with_json(
            Method::Get,
            "https://p/1",
            json!(["not", "a", "page"]),
        ));
        let result = drain_pages(&session, "https://p/1".to_string(), by_id);
        assert!(matches!(result, Err(Error::UnexpectedResponse { .. })));
    }
}
