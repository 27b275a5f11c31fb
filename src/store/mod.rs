//! Flat-table persistence for record sets and statistics.
//!
//! Every table is written wholesale on each run; there are no merge or append
//! semantics. Column order comes from the record structs, and readers are
//! header-driven.

use crate::aggregate::ReleaseStat;
use crate::enrich::{EnrichedRelease, ReleaseRecord};
use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Log target for persistence
const LOG_TARGET: &str = "store";

/// File name of the raw release record table.
pub const RAW_TABLE: &str = "release_details.csv";

/// File name of the enriched release table.
pub const ENRICHED_TABLE: &str = "release_enriched.csv";

/// File name of a statistic table, e.g. `stats_table("yearly_weekday")`.
#[must_use]
pub fn stats_table(name: &str) -> String {
    format!("release_statistics_{name}.csv")
}

/// Write the raw release record table.
pub fn write_release_records(records: &[ReleaseRecord], dir: &Path) -> Result<()> {
    write_table(&dir.join(RAW_TABLE), records)
}

/// Read the raw release record table back.
pub fn read_release_records(dir: &Path) -> Result<Vec<ReleaseRecord>> {
    read_table(&dir.join(RAW_TABLE))
}

/// Write the enriched release table.
pub fn write_enriched(records: &[EnrichedRelease], dir: &Path) -> Result<()> {
    write_table(&dir.join(ENRICHED_TABLE), records)
}

/// Read the enriched release table back.
pub fn read_enriched(dir: &Path) -> Result<Vec<EnrichedRelease>> {
    read_table(&dir.join(ENRICHED_TABLE))
}

/// Write one statistic table under the given name.
pub fn write_stats(stats: &[ReleaseStat], name: &str, dir: &Path) -> Result<()> {
    write_table(&dir.join(stats_table(name)), stats)
}

/// Read one statistic table under the given name.
pub fn read_stats(dir: &Path, name: &str) -> Result<Vec<ReleaseStat>> {
    read_table(&dir.join(stats_table(name)))
}

fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating output directory '{}'", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating '{}'", path.display()))?;
    for row in rows {
        writer.serialize(row).with_context(|| format!("writing a row to '{}'", path.display()))?;
    }
    writer.flush().with_context(|| format!("flushing '{}'", path.display()))?;

    log::info!(target: LOG_TARGET, "Wrote {} row(s) to '{}'", rows.len(), path.display());
    Ok(())
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path).with_context(|| format!("opening '{}'", path.display()))?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row.with_context(|| format!("parsing a row of '{}'", path.display()))?);
    }
    Ok(rows)
}
