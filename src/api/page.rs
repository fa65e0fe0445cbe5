//! Pagination parameters and results.

use reqwest::header::HeaderValue;

/// Response header carrying the total number of records.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Page/size/sort parameters passed through to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: u32,
    pub size: u32,
    /// `field,asc` or `field,desc`.
    pub sort: Option<String>,
}

impl PageRequest {
    /// First page, backend default ordering.
    pub fn first_page(size: u32) -> Self {
        Self {
            page: 0,
            size,
            sort: None,
        }
    }

    /// Query string pairs, including the cache buster.
    pub fn query_pairs(&self, cache_buster: u128) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        if let Some(sort) = self.sort.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("sort", sort.to_string()));
        }
        pairs.push(("cacheBuster", cache_buster.to_string()));
        pairs
    }
}

/// One page of records as returned by a List call.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<E> {
    pub entities: Vec<E>,
    pub total_items: u64,
}

/// Parse `x-total-count`, treating a missing or malformed header as zero.
pub fn parse_total_count(header: Option<&HeaderValue>) -> u64 {
    let parsed = header
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    match parsed {
        Some(total) => total,
        None => {
            tracing::warn!(
                header = TOTAL_COUNT_HEADER,
                "Missing or invalid total count header, assuming 0"
            );
            0
        }
    }
}
