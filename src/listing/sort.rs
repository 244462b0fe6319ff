//! Date ordering

use crate::content::ContentRecord;

/// Order records newest first; records with equal dates keep their input order
pub fn sort_by_date<'a, I>(records: I) -> Vec<&'a ContentRecord>
where
    I: IntoIterator<Item = &'a ContentRecord>,
{
    let mut sorted: Vec<&ContentRecord> = records.into_iter().collect();
    // `sort_by` is stable
    sorted.sort_by(|a, b| b.metadata.published_at.cmp(&a.metadata.published_at));
    sorted
}

/// The `amount` most recent records
pub fn latest<'a, I>(records: I, amount: usize) -> Vec<&'a ContentRecord>
where
    I: IntoIterator<Item = &'a ContentRecord>,
{
    let mut sorted = sort_by_date(records);
    sorted.truncate(amount);
    sorted
}
