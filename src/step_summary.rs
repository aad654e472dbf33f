//! CI step-summary sink (`GITHUB_STEP_SUMMARY`). Append-only.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Append `markdown` to the summary file, creating it (and its parent
/// directory) when needed.
pub fn append_summary(path: &Path, markdown: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{markdown}")?;
    Ok(())
}

/// Write to the configured sink. A missing sink is only worth a warning.
pub fn publish(path: Option<&Path>, markdown: &str) -> io::Result<bool> {
    match path {
        Some(path) => {
            log::info!("Appending summary to {}", path.display());
            append_summary(path, markdown)?;
            Ok(true)
        }
        None => {
            log::warn!("GITHUB_STEP_SUMMARY is not set; step summary not written");
            Ok(false)
        }
    }
}
