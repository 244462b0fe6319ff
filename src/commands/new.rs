//! Create a new content document

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::content::{FieldValue, FrontMatter};
use crate::Folio;

/// Fields for a new document
#[derive(Debug, Clone, Default)]
pub struct NewDocument<'a> {
    pub title: &'a str,
    pub category: Option<&'a str>,
    pub summary: Option<&'a str>,
}

/// Write a new document into a section, returning its path
pub fn create_document(folio: &Folio, section: &str, doc: &NewDocument<'_>) -> Result<PathBuf> {
    let section_config = folio.section(section)?;
    let target_dir = folio.content_dir.join(&section_config.dir);
    fs::create_dir_all(&target_dir)
        .with_context(|| format!("failed to create {:?}", target_dir))?;

    let slug = slug::slugify(doc.title);
    if slug.is_empty() {
        bail!("Title {:?} does not produce a usable file name", doc.title);
    }
    let file_path = target_dir.join(format!("{}.md", slug));

    // Check if file already exists
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Local::now().fixed_offset();
    let mut fm = FrontMatter::default();
    fm.insert("title", FieldValue::String(doc.title.to_string()))?;
    fm.insert("publishedAt", FieldValue::Date(now))?;
    if let Some(summary) = doc.summary {
        fm.insert("summary", FieldValue::String(summary.to_string()))?;
    }
    if let Some(category) = doc.category {
        fm.insert("category", FieldValue::String(category.to_string()))?;
    }

    let content = format!("{}\n", fm.render());
    fs::write(&file_path, content).with_context(|| format!("failed to write {:?}", file_path))?;

    tracing::info!("Created {:?}", file_path);
    Ok(file_path)
}

/// Run the new command
pub fn run(folio: &Folio, section: &str, doc: &NewDocument<'_>) -> Result<()> {
    let path = create_document(folio, section, doc)?;
    println!("Created: {:?}", path);
    Ok(())
}
