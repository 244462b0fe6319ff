//! Tag filtering

use indexmap::{IndexMap, IndexSet};

use crate::content::ContentRecord;

/// Tag that selects every record
pub const ALL_TAG: &str = "All";

/// Keep the records whose category equals `tag`; `"All"` keeps everything
pub fn filter_by_tag<'a, I>(records: I, tag: &str) -> Vec<&'a ContentRecord>
where
    I: IntoIterator<Item = &'a ContentRecord>,
{
    let records = records.into_iter();
    if tag == ALL_TAG {
        return records.collect();
    }
    records.filter(|r| r.metadata.category == tag).collect()
}

/// Tags offered for selection: `"All"` followed by each category in first-seen order
///
/// A category literally named `"All"` is not repeated.
pub fn available_tags<'a, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a ContentRecord>,
{
    let categories: IndexSet<&str> = records
        .into_iter()
        .map(|r| r.metadata.category.as_str())
        .filter(|c| *c != ALL_TAG)
        .collect();

    std::iter::once(ALL_TAG)
        .chain(categories)
        .map(str::to_string)
        .collect()
}

/// Count the records in each offered tag, in `available_tags` order
pub fn tag_counts<'a, I>(records: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a ContentRecord>,
{
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    let mut total = 0;
    for record in records {
        total += 1;
        if record.metadata.category != ALL_TAG {
            *counts.entry(record.metadata.category.as_str()).or_insert(0) += 1;
        }
    }

    std::iter::once((ALL_TAG.to_string(), total))
        .chain(counts.into_iter().map(|(tag, n)| (tag.to_string(), n)))
        .collect()
}
