// Match corpus loading
//
// Reads a directory of match JSON documents into memory, one `MatchRecord`
// per file. No transformation. A missing directory or an unreadable or
// unparseable file aborts the whole run - partial corpora would silently
// skew every downstream count.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use cricsheet2stats_core::MatchRecord;
use tracing::debug;

/// Load every `*.json` document under `dir`, in file-name order.
pub fn load_matches(dir: &Path) -> Result<Vec<MatchRecord>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read matches directory: {}", dir.display()))?;

    let mut paths: Vec<_> = entries
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to list matches directory: {}", dir.display()))?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut matches = Vec::with_capacity(paths.len());
    for path in paths {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open match file: {}", path.display()))?;
        let record: MatchRecord = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse match file: {}", path.display()))?;
        validate(&record)
            .with_context(|| format!("Invalid match record: {}", path.display()))?;
        debug!("loaded match {} from {}", record.match_id(), path.display());
        matches.push(record);
    }

    Ok(matches)
}

/// Minimal schema validation beyond what serde enforces: the fields the
/// match identifier is derived from must be present.
fn validate(record: &MatchRecord) -> Result<()> {
    if record.info.dates.is_empty() {
        bail!("match record has no dates");
    }
    if record.info.venue.trim().is_empty() {
        bail!("match record has no venue");
    }
    Ok(())
}
