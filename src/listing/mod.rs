//! Listing pipeline - filter by tag, sort by date, paginate
//!
//! Every stage borrows the loaded records and returns a new view, so one
//! shared collection can serve any number of `tag`/`page` combinations.

mod filter;
mod paginate;
mod query;
mod sort;

pub use filter::{available_tags, filter_by_tag, tag_counts, ALL_TAG};
pub use paginate::{page_href, paginate, parse_page_param, total_pages, PageLink, Pagination};
pub use query::ListingQuery;
pub use sort::{latest, sort_by_date};

use serde::Serialize;

use crate::content::ContentRecord;

/// One page of a section listing, ready for presentation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing<'a> {
    /// Records on the requested page, newest first
    pub items: Vec<&'a ContentRecord>,
    /// Tags offered for selection, computed from the whole section
    pub tags: Vec<String>,
    pub selected_tag: String,
    pub pagination: Pagination,
    pub links: Vec<PageLink>,
}

/// Run filter, sort and paginate over `records` for one request
pub fn build_listing<'a>(
    records: &'a [ContentRecord],
    query: &ListingQuery,
    per_page: usize,
    base_path: &str,
) -> Listing<'a> {
    let tag = query.tag();
    let page = query.page();

    let filtered = filter_by_tag(records, tag);
    let sorted = sort_by_date(filtered);
    let items = paginate(&sorted, page, per_page).to_vec();

    let pagination = Pagination::new(page, per_page, sorted.len());
    let links = pagination.links(base_path, tag);

    Listing {
        items,
        tags: available_tags(records),
        selected_tag: tag.to_string(),
        pagination,
        links,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::content::{parse_date_string, ContentRecord, Metadata};
    use indexmap::IndexMap;
    use std::path::PathBuf;

    /// Build a record without touching the filesystem
    pub fn record(slug: &str, date: &str, category: &str) -> ContentRecord {
        ContentRecord {
            slug: slug.to_string(),
            metadata: Metadata {
                title: slug.to_uppercase(),
                published_at: parse_date_string(date).unwrap(),
                summary: None,
                category: category.to_string(),
                banner: None,
                alt: None,
                link: None,
                draft: false,
                extra: IndexMap::new(),
            },
            body: None,
            source: PathBuf::from(format!("{}.md", slug)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::record;
    use super::*;

    fn nine_records() -> Vec<ContentRecord> {
        let categories = ["A", "A", "B", "A", "B", "B", "A", "A", "B"];
        categories
            .iter()
            .enumerate()
            .map(|(i, c)| record(&format!("post-{}", i), &format!("2024-01-{:02}", i + 1), c))
            .collect()
    }

    #[test]
    fn test_filter_sort_paginate_scenario() {
        let records = nine_records();
        let query = ListingQuery::new(Some("B"), None);
        let listing = build_listing(&records, &query, 4, "/post");

        // Four of the nine carry `B`; one page of four holds them all
        assert_eq!(listing.pagination.total_items, 4);
        assert_eq!(listing.pagination.total_pages, 1);
        let slugs: Vec<_> = listing.items.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["post-8", "post-5", "post-4", "post-2"]);
        assert_eq!(listing.tags, vec!["All", "A", "B"]);
        assert_eq!(listing.selected_tag, "B");
    }

    #[test]
    fn test_all_pages_cover_section() {
        let records = nine_records();
        let first = build_listing(&records, &ListingQuery::default(), 4, "/post");
        assert_eq!(first.pagination.total_pages, 3);

        let mut seen = 0;
        for page in 1..=first.pagination.total_pages {
            let query = ListingQuery::new(None, Some(&page.to_string()));
            seen += build_listing(&records, &query, 4, "/post").items.len();
        }
        assert_eq!(seen, records.len());

        let beyond = ListingQuery::new(None, Some("4"));
        assert!(build_listing(&records, &beyond, 4, "/post").items.is_empty());
    }

    #[test]
    fn test_bad_page_param_is_first_page() {
        let records = nine_records();
        let query = ListingQuery::new(None, Some("abc"));
        let listing = build_listing(&records, &query, 4, "/post");
        assert_eq!(listing.pagination.current, 1);
        assert_eq!(listing.items[0].slug, "post-8");
        assert_eq!(listing.links[0].href, "/post?page=1");
    }

    #[test]
    fn test_source_order_untouched() {
        let records = nine_records();
        let before = records.clone();
        let _ = build_listing(&records, &ListingQuery::new(Some("A"), Some("2")), 2, "/post");
        assert_eq!(records, before);
    }

    #[test]
    fn test_serializes_for_presentation() {
        let records = nine_records();
        let listing = build_listing(&records, &ListingQuery::default(), 4, "/post");
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["selectedTag"], "All");
        assert_eq!(json["pagination"]["totalPages"], 3);
        assert_eq!(json["items"][0]["slug"], "post-8");
        assert_eq!(json["items"][0]["metadata"]["category"], "B");
    }
}
