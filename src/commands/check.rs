//! Validate every section's documents

use anyhow::{bail, Result};

use crate::content::LoadReport;
use crate::Folio;

/// Scan each configured section without applying the load policy
pub fn scan_all(folio: &Folio) -> Result<Vec<(String, LoadReport)>> {
    folio
        .config
        .sections
        .keys()
        .map(|name| -> Result<(String, LoadReport)> {
            Ok((name.clone(), folio.repository(name)?.scan()))
        })
        .collect()
}

/// Report every document that fails to load; errors if any did
pub fn run(folio: &Folio) -> Result<()> {
    let reports = scan_all(folio)?;
    let mut failures = 0;

    for (name, report) in &reports {
        println!(
            "{}: {} ok, {} failed",
            name,
            report.records.len(),
            report.skipped.len()
        );
        for err in &report.skipped {
            println!("  [{}] {}", err.kind(), err);
        }
        failures += report.skipped.len();
    }

    if failures > 0 {
        bail!("{} document(s) failed to load", failures);
    }
    Ok(())
}
