//! Listing query parameters

use serde::Deserialize;

use super::filter::ALL_TAG;
use super::paginate::parse_page_param;

/// Raw `tag` / `page` query parameters, as received
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListingQuery {
    pub tag: Option<String>,
    pub page: Option<String>,
}

impl ListingQuery {
    pub fn new(tag: Option<&str>, page: Option<&str>) -> Self {
        Self {
            tag: tag.map(str::to_string),
            page: page.map(str::to_string),
        }
    }

    /// Selected tag; `"All"` when the parameter is absent
    pub fn tag(&self) -> &str {
        self.tag.as_deref().unwrap_or(ALL_TAG)
    }

    /// Requested page, never failing
    pub fn page(&self) -> usize {
        parse_page_param(self.page.as_deref())
    }
}
