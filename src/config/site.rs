//! Site configuration (_config.yml)

use anyhow::{bail, Context, Result};
use chrono::format::{Item, StrftimeItems};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::LoadPolicy;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,

    // Content
    pub content_dir: String,
    pub load_policy: LoadPolicy,
    pub render_drafts: bool,
    pub cache_content: bool,

    // Display
    pub date_format: String,

    /// Listed sections by name, e.g. `post` and `portfolio`
    pub sections: IndexMap<String, SectionConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let mut sections = IndexMap::new();
        sections.insert(
            "post".to_string(),
            SectionConfig {
                dir: "posts".to_string(),
                per_page: 8,
                base_path: "/post".to_string(),
            },
        );
        sections.insert(
            "portfolio".to_string(),
            SectionConfig {
                dir: "portfolio".to_string(),
                per_page: 9,
                base_path: "/portfolio".to_string(),
            },
        );

        Self {
            title: "My Portfolio".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            url: "http://example.com".to_string(),

            content_dir: "content".to_string(),
            load_policy: LoadPolicy::Lenient,
            render_drafts: false,
            cache_content: true,

            date_format: "%B %-d, %Y".to_string(),

            sections,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the listing pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            bail!("invalid date_format: {:?}", self.date_format);
        }
        if self.sections.is_empty() {
            bail!("at least one section must be configured");
        }
        for (name, section) in &self.sections {
            if section.per_page == 0 {
                bail!("section `{}`: per_page must be greater than 0", name);
            }
            if section.dir.trim().is_empty() {
                bail!("section `{}`: dir must not be empty", name);
            }
        }
        Ok(())
    }

    /// Look up a section by name
    pub fn section(&self, name: &str) -> Option<&SectionConfig> {
        self.sections.get(name)
    }
}

/// One listed content section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    /// Directory under `content_dir`
    pub dir: String,
    pub per_page: usize,
    /// Path the section is served under, used for pager links
    pub base_path: String,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            dir: String::new(),
            per_page: 10,
            base_path: "/".to_string(),
        }
    }
}
