//! List section content

use anyhow::Result;

use crate::content::ContentRecord;
use crate::listing::{build_listing, tag_counts, ListingQuery};
use crate::Folio;

/// Print one page of a section listing
pub fn run(folio: &Folio, section: &str, query: &ListingQuery) -> Result<()> {
    let section_config = folio.section(section)?;
    let records = folio.records(section)?;
    let listing = build_listing(
        &records,
        query,
        section_config.per_page,
        &section_config.base_path,
    );

    let pagination = &listing.pagination;
    println!(
        "{} [{}] page {}/{} ({} items):",
        section,
        listing.selected_tag,
        pagination.current,
        pagination.total_pages,
        pagination.total_items
    );
    for record in &listing.items {
        println!("  {}", format_record(folio, record));
    }
    if listing.items.is_empty() {
        println!("  (nothing here)");
    }

    let nav: Vec<String> = listing
        .links
        .iter()
        .map(|link| {
            if link.active {
                format!("[{}]", link.number)
            } else {
                link.href.clone()
            }
        })
        .collect();
    if !nav.is_empty() {
        println!("Pages: {}", nav.join("  "));
    }
    let tags: Vec<&str> = listing.tags.iter().map(|t| display_tag(t)).collect();
    println!("Tags: {}", tags.join(", "));

    Ok(())
}

/// Print the tags offered for a section with their record counts
pub fn tags(folio: &Folio, section: &str) -> Result<()> {
    let records = folio.records(section)?;
    let counts = tag_counts(records.iter());
    println!("Tags ({}):", counts.len());
    for (tag, count) in counts {
        println!("  {} ({})", display_tag(&tag), count);
    }
    Ok(())
}

fn format_record(folio: &Folio, record: &ContentRecord) -> String {
    let date = record
        .metadata
        .published_at
        .format(&folio.config.date_format);
    format!(
        "{} - {} [{}] {}",
        date,
        record.metadata.title,
        record.slug,
        display_tag(&record.metadata.category)
    )
}

fn display_tag(tag: &str) -> &str {
    if tag.is_empty() {
        "(uncategorized)"
    } else {
        tag
    }
}
