//! Paginated, JSON-ready views over a target's result log.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::stats::PollResult;

/// Fixed number of results per page.
pub const PAGE_SIZE: usize = 5;

/// Pagination metadata accompanying one page of results.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub total_pages: usize,
    pub items: usize,
    pub total_items: usize,
}

/// One recorded fetch on the wire.
///
/// `duration` is whole milliseconds, converted deliberately from the
/// recorded wall-clock duration.
#[derive(Debug, Serialize)]
pub struct RequestEntry {
    pub date: DateTime<Utc>,
    pub ok: bool,
    #[serde(rename = "duration")]
    pub duration_ms: u64,
}

impl From<PollResult> for RequestEntry {
    fn from(result: PollResult) -> Self {
        Self {
            date: result.date,
            ok: result.ok,
            duration_ms: result.duration.as_millis() as u64,
        }
    }
}

/// One page of a target's history plus its pagination metadata.
#[derive(Debug, Serialize)]
pub struct StatsPage {
    pub pagination: Pagination,
    pub requests: Vec<RequestEntry>,
}

/// Parse a raw page parameter, defaulting to 1 on anything that is not a
/// positive integer. Bad input is normalized, never reported.
pub fn parse_page(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.parse::<usize>().ok())
        .filter(|&p| p > 0)
        .unwrap_or(1)
}

/// Assemble a [`StatsPage`] from one page of results and the total log size.
pub fn build_page(page: usize, results: Vec<PollResult>, total_items: usize) -> StatsPage {
    StatsPage {
        pagination: Pagination {
            page,
            total_pages: total_items.div_ceil(PAGE_SIZE),
            items: results.len(),
            total_items,
        },
        requests: results.into_iter().map(RequestEntry::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn results(n: usize) -> Vec<PollResult> {
        (0..n)
            .map(|i| PollResult {
                date: Utc::now(),
                duration: Duration::from_millis(i as u64),
                ok: true,
                size_kib: 0,
            })
            .collect()
    }

    #[test]
    fn test_parse_page_defaults() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-3")), 1);
        assert_eq!(parse_page(Some("7")), 7);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = build_page(1, results(5), 12);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.pagination.total_items, 12);
        assert_eq!(page.pagination.items, 5);
    }

    #[test]
    fn test_empty_page_past_end() {
        let page = build_page(10, Vec::new(), 12);
        assert_eq!(page.pagination.page, 10);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.pagination.items, 0);
        assert!(page.requests.is_empty());
    }

    #[test]
    fn test_duration_serializes_as_millis() {
        let entry = RequestEntry::from(PollResult {
            date: Utc::now(),
            duration: Duration::from_micros(12_700),
            ok: false,
            size_kib: 0,
        });
        assert_eq!(entry.duration_ms, 12);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["duration"], 12);
        assert_eq!(json["ok"], false);
        assert!(json.get("date").is_some());
    }

    #[test]
    fn test_pagination_keys_are_camel_case() {
        let page = build_page(2, results(1), 6);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pagination"]["totalPages"], 2);
        assert_eq!(json["pagination"]["totalItems"], 6);
        assert_eq!(json["pagination"]["items"], 1);
        assert_eq!(json["pagination"]["page"], 2);
    }
}
