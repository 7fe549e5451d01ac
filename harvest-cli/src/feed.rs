//! HTTP client for the remote activity feed.
//!
//! One account's public+private activity, exposed as a paginated,
//! reverse-chronological JSON endpoint. The feed serves a documented
//! window of at most [`MAX_PAGES`] pages of [`PAGE_SIZE`] events; anything
//! older is unreachable through this API and must already be in the log.

use harvest_core::config::Config;
use harvest_core::error::DataError;
use harvest_core::types::{Event, FetchPage};
use harvest_sync::error::data_err;
use harvest_sync::{PageSource, SyncError};

/// Fixed page size of the feed endpoint.
pub const PAGE_SIZE: u32 = 30;

/// Maximum page count the feed serves (a 300-event window).
pub const MAX_PAGES: u32 = 10;

const USER_AGENT: &str = concat!("harvest/", env!("CARGO_PKG_VERSION"));

/// `ureq`-backed [`PageSource`] over `GET /users/{login}/events`.
pub struct EventFeed {
    agent: ureq::Agent,
    api_url: String,
    login: String,
    token: String,
}

impl EventFeed {
    pub fn new(config: &Config) -> Self {
        Self {
            agent: ureq::agent(),
            api_url: config.api_url.clone(),
            login: config.login.clone(),
            token: config.token.clone(),
        }
    }

    fn events_url(&self) -> String {
        format!("{}/users/{}/events", self.api_url, self.login)
    }
}

impl PageSource for EventFeed {
    fn fetch_page(&mut self, page: u32) -> Result<FetchPage, SyncError> {
        let response = self
            .agent
            .get(&self.events_url())
            .query("page", &page.to_string())
            .query("per_page", &PAGE_SIZE.to_string())
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| SyncError::Feed {
                page,
                detail: e.to_string(),
            })?;

        // Reading the body off the wire is still transport territory.
        let body = response.into_string().map_err(|e| SyncError::Feed {
            page,
            detail: e.to_string(),
        })?;

        parse_page(page, &body)
    }
}

/// Decode one page body: a JSON array of event objects, order preserved.
fn parse_page(page: u32, body: &str) -> Result<FetchPage, SyncError> {
    let context = format!("feed page {page}");
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| data_err(&context, DataError::Json(e)))?;
    let items = value
        .as_array()
        .ok_or_else(|| data_err(&context, DataError::NotAnArray))?;

    let mut events = Vec::with_capacity(items.len());
    for item in items {
        events.push(Event::from_value(item).map_err(|e| data_err(&context, e))?);
    }
    Ok(FetchPage { events })
}

#[cfg(test)]
mod tests {
    use harvest_core::types::EventId;

    use super::*;

    #[test]
    fn parses_a_page_preserving_feed_order() {
        let body = r#"[{"id":"45","type":"Push"},{"id":"44","type":"Watch"}]"#;
        let page = parse_page(1, body).unwrap();
        let ids: Vec<EventId> = page.events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![EventId(45), EventId(44)]);
    }

    #[test]
    fn empty_array_is_an_empty_page() {
        let page = parse_page(3, "[]").unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn non_array_body_is_a_data_error() {
        let err = parse_page(1, r#"{"message":"Bad credentials"}"#).unwrap_err();
        assert!(matches!(err, SyncError::Data { .. }));
    }

    #[test]
    fn malformed_json_body_is_a_data_error() {
        let err = parse_page(2, "<!doctype html>").unwrap_err();
        assert!(matches!(err, SyncError::Data { .. }));
    }

    #[test]
    fn event_without_id_poisons_the_page() {
        let err = parse_page(1, r#"[{"id":"45"},{"type":"Push"}]"#).unwrap_err();
        assert!(matches!(err, SyncError::Data { .. }));
    }
}
