//! Pagination

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use super::filter::ALL_TAG;

/// Characters left as-is in query values
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Number of pages needed for `count` items
pub fn total_pages(count: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    count.div_ceil(per_page)
}

/// Slice out 1-based page `page`; out-of-range pages are empty
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    if page == 0 || per_page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(per_page);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}

/// Coerce a `page` query value to a 1-based page number
///
/// Anything that is not a positive integer (missing, empty, `"abc"`, `"0"`,
/// `"-2"`) becomes page 1.
pub fn parse_page_param(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1)
}

/// Pagination state of one listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub prev: Option<usize>,
    pub next: Option<usize>,
}

/// A numbered link in a pager
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub active: bool,
}

impl Pagination {
    pub fn new(current: usize, per_page: usize, total_items: usize) -> Self {
        let total = total_pages(total_items, per_page);
        Self {
            current,
            per_page,
            total_pages: total,
            total_items,
            prev: (current > 1 && current - 1 <= total).then(|| current - 1),
            next: (current < total).then(|| current + 1),
        }
    }

    /// Links for every page, keeping the selected tag in the query string
    pub fn links(&self, base_path: &str, tag: &str) -> Vec<PageLink> {
        (1..=self.total_pages)
            .map(|number| PageLink {
                number,
                href: page_href(base_path, tag, number),
                active: number == self.current,
            })
            .collect()
    }
}

/// Build `base_path?tag=..&page=..`; the tag is omitted when it is `"All"`
pub fn page_href(base_path: &str, tag: &str, page: usize) -> String {
    if tag == ALL_TAG {
        format!("{}?page={}", base_path, page)
    } else {
        format!(
            "{}?tag={}&page={}",
            base_path,
            utf8_percent_encode(tag, QUERY_VALUE),
            page
        )
    }
}
