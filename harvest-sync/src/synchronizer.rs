//! Incremental-fetch / append-only merge.
//!
//! The feed hands out pages newest-first; the log wants oldest-first.
//! [`collect_newer`] walks pages until one stops contributing events above
//! the watermark, then reverses the accumulation into chronological order.
//!
//! Correctness of the early stop rests on the feed's documented id
//! semantics: ids are allocated monotonically with recency and pages are
//! strictly descending. See [`harvest_core::types::EventId`].

use harvest_core::types::{Event, EventId, FetchPage};

use crate::error::SyncError;

/// A paginated, reverse-chronological event source.
///
/// Pages are requested by increasing page number starting at 1. Each page
/// holds events in descending id order; an empty page signals exhaustion.
pub trait PageSource {
    fn fetch_page(&mut self, page: u32) -> Result<FetchPage, SyncError>;
}

/// Collect every event strictly newer than `watermark`, in chronological
/// (ascending id) order, ready to append.
///
/// Pages are requested one at a time up to `max_pages`. Per page, events
/// with `id > watermark` are kept; the loop ends as soon as a page
/// contributes zero qualifying events or comes back empty. Both are
/// ordinary termination, not errors — the latter happens when the account
/// has fewer than a full page of history.
///
/// Any error from the source aborts the whole collection; the partial
/// accumulation is dropped, leaving the caller's log untouched.
pub fn collect_newer(
    watermark: EventId,
    source: &mut dyn PageSource,
    max_pages: u32,
) -> Result<Vec<Event>, SyncError> {
    let mut newer: Vec<Event> = Vec::new();

    for page in 1..=max_pages {
        let fetched = source.fetch_page(page)?;
        if fetched.is_empty() {
            tracing::debug!("page {page} empty; feed exhausted");
            break;
        }

        let before = newer.len();
        newer.extend(fetched.events.into_iter().filter(|e| e.id > watermark));
        let kept = newer.len() - before;
        tracing::debug!("page {page}: kept {kept} events above watermark {watermark}");

        if kept == 0 {
            break;
        }
    }

    // Accumulated newest-first; the log wants oldest-first.
    newer.reverse();
    Ok(newer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(id: u64) -> Event {
        Event {
            id: EventId(id),
            raw: format!(r#"{{"id":"{id}"}}"#),
        }
    }

    fn page(ids: &[u64]) -> FetchPage {
        FetchPage {
            events: ids.iter().copied().map(ev).collect(),
        }
    }

    /// Scripted source: each slot is one page response, consumed in order.
    /// Requests past the script return an empty page.
    struct ScriptedFeed {
        pages: Vec<Option<Result<FetchPage, SyncError>>>,
        requests: u32,
    }

    impl ScriptedFeed {
        fn new(pages: Vec<Result<FetchPage, SyncError>>) -> Self {
            Self {
                pages: pages.into_iter().map(Some).collect(),
                requests: 0,
            }
        }
    }

    impl PageSource for ScriptedFeed {
        fn fetch_page(&mut self, page: u32) -> Result<FetchPage, SyncError> {
            self.requests += 1;
            match self.pages.get_mut((page - 1) as usize) {
                Some(slot) => slot.take().expect("page requested twice"),
                None => Ok(FetchPage::default()),
            }
        }
    }

    #[test]
    fn filters_by_watermark_and_reverses() {
        // Watermark 42; page 1 all newer, page 2 at-or-below.
        let mut feed = ScriptedFeed::new(vec![Ok(page(&[45, 44, 43])), Ok(page(&[42, 41]))]);
        let got = collect_newer(EventId(42), &mut feed, 10).unwrap();
        let ids: Vec<u64> = got.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![43, 44, 45]);
        // Page 2 contributed nothing, so page 3 is never requested.
        assert_eq!(feed.requests, 2);
    }

    #[test]
    fn spans_multiple_contributing_pages() {
        let mut feed = ScriptedFeed::new(vec![
            Ok(page(&[6, 5])),
            Ok(page(&[4, 3])),
            Ok(page(&[2, 1])),
        ]);
        let got = collect_newer(EventId(0), &mut feed, 10).unwrap();
        let ids: Vec<u64> = got.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        // Script exhausted; the empty fourth page terminates the loop.
        assert_eq!(feed.requests, 4);
    }

    #[test]
    fn empty_first_page_yields_nothing() {
        let mut feed = ScriptedFeed::new(vec![]);
        let got = collect_newer(EventId(0), &mut feed, 10).unwrap();
        assert!(got.is_empty());
        assert_eq!(feed.requests, 1);
    }

    #[test]
    fn all_stale_page_yields_nothing() {
        let mut feed = ScriptedFeed::new(vec![Ok(page(&[10, 9, 8]))]);
        let got = collect_newer(EventId(10), &mut feed, 10).unwrap();
        assert!(got.is_empty());
        assert_eq!(feed.requests, 1);
    }

    #[test]
    fn partially_qualifying_page_keeps_only_the_newer_prefix() {
        let mut feed = ScriptedFeed::new(vec![Ok(page(&[5, 4, 3, 2]))]);
        let got = collect_newer(EventId(3), &mut feed, 10).unwrap();
        let ids: Vec<u64> = got.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![4, 5]);
    }

    #[test]
    fn respects_max_pages_cap() {
        let mut feed = ScriptedFeed::new(vec![
            Ok(page(&[6, 5])),
            Ok(page(&[4, 3])),
            Ok(page(&[2, 1])),
        ]);
        let got = collect_newer(EventId(0), &mut feed, 2).unwrap();
        let ids: Vec<u64> = got.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![3, 4, 5, 6]);
        assert_eq!(feed.requests, 2);
    }

    #[test]
    fn transport_error_mid_pagination_drops_the_accumulation() {
        let mut feed = ScriptedFeed::new(vec![
            Ok(page(&[5, 4])),
            Err(SyncError::Feed {
                page: 2,
                detail: "rate limited".into(),
            }),
        ]);
        let err = collect_newer(EventId(0), &mut feed, 10).unwrap_err();
        assert!(matches!(err, SyncError::Feed { page: 2, .. }));
    }
}
