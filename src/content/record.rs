//! Content record model

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;

use super::{ContentError, FieldValue, FrontMatter};

/// A loaded content document (blog post, portfolio project, ...)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRecord {
    /// URL-safe identifier derived from the file name
    pub slug: String,

    /// Fields from the front-matter header
    pub metadata: Metadata,

    /// Raw document body, if any
    pub body: Option<String>,

    /// Source file path
    #[serde(skip)]
    pub source: PathBuf,
}

/// Structured front-matter of a record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: String,

    /// Publication date
    pub published_at: DateTime<FixedOffset>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Category tag; empty when the document has none
    pub category: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    /// External link for portfolio entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    pub draft: bool,

    /// Unrecognized fields
    #[serde(flatten)]
    pub extra: IndexMap<String, FieldValue>,
}

impl Metadata {
    /// Build metadata from parsed front-matter, requiring `title` and `publishedAt`
    pub fn from_front_matter(mut fm: FrontMatter) -> Result<Self, ContentError> {
        let title = fm
            .remove("title")
            .map(|v| v.to_text())
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ContentError::malformed("missing required field `title`"))?;

        let published_at = match fm.remove("publishedAt") {
            Some(FieldValue::Date(d)) => d,
            Some(other) => {
                return Err(ContentError::InvalidDateFormat {
                    path: None,
                    field: "publishedAt".to_string(),
                    value: other.to_text(),
                })
            }
            None => {
                return Err(ContentError::malformed(
                    "missing required field `publishedAt`",
                ))
            }
        };

        let mut text = |key: &str| fm.remove(key).map(|v| v.to_text());
        let summary = text("summary");
        let category = text("category").unwrap_or_default();
        let banner = text("banner");
        let alt = text("alt");
        let link = text("link");

        let draft = match fm.remove("draft") {
            Some(value) => value.as_bool().unwrap_or_else(|| {
                tracing::debug!("Unrecognised draft value {:?}, treating as false", value.to_text());
                false
            }),
            None => false,
        };

        Ok(Self {
            title,
            published_at,
            summary,
            category,
            banner,
            alt,
            link,
            draft,
            extra: fm.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        })
    }

    /// Convert back into front-matter fields
    pub fn to_front_matter(&self) -> FrontMatter {
        let mut fm = FrontMatter::default();
        let mut set = |key: &str, value: FieldValue| fm.set(key, value);

        set("title", FieldValue::String(self.title.clone()));
        set("publishedAt", FieldValue::Date(self.published_at));
        if let Some(summary) = &self.summary {
            set("summary", FieldValue::String(summary.clone()));
        }
        if !self.category.is_empty() {
            set("category", FieldValue::String(self.category.clone()));
        }
        if let Some(banner) = &self.banner {
            set("banner", FieldValue::String(banner.clone()));
        }
        if let Some(alt) = &self.alt {
            set("alt", FieldValue::String(alt.clone()));
        }
        if let Some(link) = &self.link {
            set("link", FieldValue::String(link.clone()));
        }
        if self.draft {
            set("draft", FieldValue::Bool(true));
        }
        for (key, value) in &self.extra {
            set(key, value.clone());
        }
        fm
    }
}

impl ContentRecord {
    /// Alt text for the banner, falling back to the title
    pub fn banner_alt(&self) -> &str {
        self.metadata.alt.as_deref().unwrap_or(&self.metadata.title)
    }

    /// Get the previous (newer) record in a sorted list
    pub fn prev<'a>(&self, records: &[&'a ContentRecord]) -> Option<&'a ContentRecord> {
        let pos = records.iter().position(|r| r.slug == self.slug)?;
        pos.checked_sub(1).map(|i| records[i])
    }

    /// Get the next (older) record in a sorted list
    pub fn next<'a>(&self, records: &[&'a ContentRecord]) -> Option<&'a ContentRecord> {
        let pos = records.iter().position(|r| r.slug == self.slug)?;
        records.get(pos + 1).copied()
    }
}
