//! folio: content listing engine for a portfolio and blog site
//!
//! Documents with a YAML front-matter header are loaded per section,
//! filtered by category tag, sorted newest first and paginated. The results
//! are plain data for whatever renders the pages.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod listing;
pub mod server;

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cache::ContentCache;
use config::{SectionConfig, SiteConfig};
use content::{ContentRecord, ContentRepository};

/// The main application
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory holding one folder per section
    pub content_dir: PathBuf,
    cache: Arc<ContentCache>,
}

impl Folio {
    /// Create a new instance from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        Self {
            config,
            base_dir,
            content_dir,
            cache: Arc::new(ContentCache::new()),
        }
    }

    /// Look up a configured section
    pub fn section(&self, name: &str) -> Result<&SectionConfig> {
        self.config.section(name).ok_or_else(|| {
            let known: Vec<_> = self.config.sections.keys().map(String::as_str).collect();
            anyhow!(
                "Unknown section: {}. Available: {}",
                name,
                known.join(", ")
            )
        })
    }

    /// Repository for a section, using the configured load policy
    pub fn repository(&self, name: &str) -> Result<ContentRepository> {
        let section = self.section(name)?;
        Ok(ContentRepository::new(self.content_dir.join(&section.dir))
            .with_policy(self.config.load_policy)
            .with_drafts(self.config.render_drafts))
    }

    /// Records of a section, served from the cache when enabled
    pub fn records(&self, name: &str) -> Result<Arc<[ContentRecord]>> {
        let repo = self.repository(name)?;
        let records = if self.config.cache_content {
            self.cache.get_or_load(&repo)?
        } else {
            repo.load()?.into()
        };
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_new_without_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        assert_eq!(folio.content_dir, tmp.path().join("content"));
        assert!(folio.records("post").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_section() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        let err = folio.records("gallery").unwrap_err();
        assert!(err.to_string().contains("post, portfolio"));
    }

    #[test]
    fn test_records_follow_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("_config.yml"),
            "content_dir: site\nload_policy: strict\nsections:\n  blog:\n    dir: blog\n    per_page: 2\n",
        )
        .unwrap();
        let blog = tmp.path().join("site/blog");
        fs::create_dir_all(&blog).unwrap();
        fs::write(
            blog.join("hello.md"),
            "---\ntitle: Hello\npublishedAt: 2024-01-01\n---\n",
        )
        .unwrap();

        let folio = Folio::new(tmp.path()).unwrap();
        let records = folio.records("blog").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].slug, "hello");

        fs::write(blog.join("broken.md"), "no header").unwrap();
        assert!(folio.records("blog").is_err());
    }
}
