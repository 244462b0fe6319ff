//! Content repository - loads the documents of one section from disk

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{ContentError, ContentRecord, FrontMatter, Metadata};

/// What to do when a document fails to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPolicy {
    /// Skip the document, log a warning and keep going
    #[default]
    Lenient,
    /// Abort the whole load on the first failing document
    Strict,
}

/// Result of scanning a section without applying a policy
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Records in emission (file name) order
    pub records: Vec<ContentRecord>,
    /// Documents that could not be turned into records
    pub skipped: Vec<ContentError>,
}

/// Loads content records from a directory of markdown documents
#[derive(Debug, Clone)]
pub struct ContentRepository {
    dir: PathBuf,
    policy: LoadPolicy,
    include_drafts: bool,
}

impl ContentRepository {
    /// Create a repository over `dir` with the lenient policy
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            policy: LoadPolicy::default(),
            include_drafts: false,
        }
    }

    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Include documents marked `draft: true`
    pub fn with_drafts(mut self, include_drafts: bool) -> Self {
        self.include_drafts = include_drafts;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load all records, applying the configured policy to failures
    pub fn load(&self) -> Result<Vec<ContentRecord>, ContentError> {
        let report = self.scan();

        match self.policy {
            LoadPolicy::Strict => {
                if let Some(err) = report.skipped.into_iter().next() {
                    return Err(err);
                }
            }
            LoadPolicy::Lenient => {
                for err in &report.skipped {
                    tracing::warn!("Skipping document: {}", err);
                }
            }
        }

        tracing::debug!(
            "Loaded {} records from {:?}",
            report.records.len(),
            self.dir
        );
        Ok(report.records)
    }

    /// Read every document, collecting records and failures side by side
    pub fn scan(&self) -> LoadReport {
        let mut report = LoadReport::default();
        if !self.dir.exists() {
            tracing::debug!("Content directory {:?} does not exist", self.dir);
            return report;
        }

        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        for entry in WalkDir::new(&self.dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(self.dir.as_path()).to_path_buf();
                    report.skipped.push(ContentError::Io {
                        path,
                        source: e.into(),
                    });
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !is_content_file(path) {
                continue;
            }

            let record = match load_record(path) {
                Ok(record) => record,
                Err(e) => {
                    report.skipped.push(e);
                    continue;
                }
            };

            if record.metadata.draft && !self.include_drafts {
                tracing::debug!("Skipping draft {:?}", path);
                continue;
            }

            if let Some(first) = seen.get(&record.slug) {
                report.skipped.push(ContentError::DuplicateSlug {
                    slug: record.slug.clone(),
                    first: first.clone(),
                    second: path.to_path_buf(),
                });
                continue;
            }

            seen.insert(record.slug.clone(), path.to_path_buf());
            report.records.push(record);
        }

        report
    }
}

/// Load a single record from a file
pub fn load_record(path: &Path) -> Result<ContentRecord, ContentError> {
    let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let slug = slug_for(path).ok_or_else(|| {
        ContentError::malformed("file name does not produce a usable slug").at(path)
    })?;

    let (fm, body) = FrontMatter::parse(&content).map_err(|e| e.at(path))?;
    let metadata = Metadata::from_front_matter(fm).map_err(|e| e.at(path))?;

    let body = if body.trim().is_empty() {
        None
    } else {
        Some(body.to_string())
    };

    Ok(ContentRecord {
        slug,
        metadata,
        body,
        source: path.to_path_buf(),
    })
}

/// Derive the slug from the file name (not from metadata)
pub fn slug_for(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let slug = slug::slugify(stem);
    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}

/// Check if a file is a content document
fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e, "md" | "mdx" | "markdown"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn doc(title: &str, date: &str, category: Option<&str>) -> String {
        let mut s = format!("---\ntitle: {}\npublishedAt: {}\n", title, date);
        if let Some(c) = category {
            s.push_str(&format!("category: {}\n", c));
        }
        s.push_str("---\n\nBody of the post.\n");
        s
    }

    #[test]
    fn test_load_in_file_name_order() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "b-second.md", &doc("Second", "2024-02-01", Some("Rust")));
        write(tmp.path(), "a-first.mdx", &doc("First", "2024-01-01", None));
        write(tmp.path(), "notes.txt", "not content");

        let records = ContentRepository::new(tmp.path()).load().unwrap();
        let slugs: Vec<_> = records.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a-first", "b-second"]);
        assert_eq!(records[0].metadata.category, "");
        assert_eq!(records[1].metadata.category, "Rust");
        assert_eq!(records[0].body.as_deref(), Some("Body of the post.\n"));
    }

    #[test]
    fn test_slug_from_file_name() {
        assert_eq!(
            slug_for(Path::new("posts/Hello World.md")).as_deref(),
            Some("hello-world")
        );
        assert_eq!(slug_for(Path::new("posts/!!!.md")), None);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        let repo = ContentRepository::new(tmp.path().join("nope")).with_policy(LoadPolicy::Strict);
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_lenient_skips_malformed() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "good.md", &doc("Good", "2024-01-01", None));
        write(tmp.path(), "no-header.md", "just text");
        write(tmp.path(), "bad-date.md", &doc("Bad", "someday", None));

        let repo = ContentRepository::new(tmp.path());
        let report = repo.scan();
        assert_eq!(report.records.len(), 1);
        let mut kinds: Vec<_> = report.skipped.iter().map(|e| e.kind()).collect();
        kinds.sort();
        assert_eq!(kinds, vec!["InvalidDateFormat", "MalformedDocument"]);

        let records = repo.load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].slug, "good");
    }

    #[test]
    fn test_strict_fails_fast() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "good.md", &doc("Good", "2024-01-01", None));
        write(tmp.path(), "no-header.md", "just text");

        let err = ContentRepository::new(tmp.path())
            .with_policy(LoadPolicy::Strict)
            .load()
            .unwrap_err();
        assert_eq!(err.kind(), "MalformedDocument");
        assert!(err.to_string().contains("no-header.md"));
    }

    #[test]
    fn test_duplicate_slug() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "hello.md", &doc("One", "2024-01-01", None));
        write(tmp.path(), "nested/hello.md", &doc("Two", "2024-01-02", None));

        let report = ContentRepository::new(tmp.path()).scan();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].metadata.title, "One");
        match &report.skipped[..] {
            [ContentError::DuplicateSlug { slug, .. }] => assert_eq!(slug, "hello"),
            other => panic!("unexpected: {:?}", other),
        }

        let err = ContentRepository::new(tmp.path())
            .with_policy(LoadPolicy::Strict)
            .load()
            .unwrap_err();
        assert_eq!(err.kind(), "DuplicateSlug");
    }

    #[test]
    fn test_drafts() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "wip.md",
            "---\ntitle: WIP\npublishedAt: 2024-01-01\ndraft: true\n---\n",
        );
        write(tmp.path(), "done.md", &doc("Done", "2024-01-01", None));

        let repo = ContentRepository::new(tmp.path());
        assert_eq!(repo.load().unwrap().len(), 1);
        assert_eq!(repo.with_drafts(true).load().unwrap().len(), 2);
    }
}
