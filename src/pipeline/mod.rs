//! Batch orchestration: fetch, normalize, aggregate, persist.

use crate::aggregate::{self, PeriodUnit};
use crate::enrich::{self, MetricsSource, ReleaseRecord};
use crate::feed::{self, ReleaseFeed, RepoId};
use crate::store;
use anyhow::Result;
use std::path::Path;

/// Log target for orchestration
const LOG_TARGET: &str = "pipeline";

/// The weekday-filtered statistic tables persisted on every stats run.
const STAT_UNITS: [(PeriodUnit, &str); 3] = [
    (PeriodUnit::Yearly, "yearly_weekday"),
    (PeriodUnit::Weekly, "weekly_weekday"),
    (PeriodUnit::Daily, "daily_weekday"),
];

/// Fetch the full release history of every repository, persist the combined
/// raw record table, and persist the weekday-filtered statistic tables.
///
/// Repositories are processed sequentially and their records accumulated into
/// one set; the statistics deliberately do not distinguish repositories.
/// Everything is recomputed from the feed and prior output overwritten wholesale.
pub async fn run_stats<F: ReleaseFeed>(feed: &F, repos: &[RepoId], out_dir: &Path) -> Result<()> {
    let mut all_records: Vec<ReleaseRecord> = Vec::new();

    for repo in repos {
        log::info!(target: LOG_TARGET, "Loading release history for '{repo}'");
        let raw = feed::fetch_all_releases(feed, repo).await?;
        all_records.extend(enrich::to_release_records(raw, &repo.name));
    }

    store::write_release_records(&all_records, out_dir)?;

    for (unit, name) in STAT_UNITS {
        let stats = aggregate::aggregate_filtered(&all_records, &unit, aggregate::weekdays_only);
        store::write_stats(&stats, name, out_dir)?;
    }

    log::info!(target: LOG_TARGET, "Release statistics written for {} record(s)", all_records.len());
    Ok(())
}

/// Read the persisted raw record table, assemble the enriched table, and
/// persist it, overwriting any previous version.
pub fn run_enrich(out_dir: &Path, metrics: Option<&dyn MetricsSource>) -> Result<()> {
    let records = store::read_release_records(out_dir)?;
    let enriched = enrich::assemble(records, metrics);
    store::write_enriched(&enriched, out_dir)?;

    log::info!(target: LOG_TARGET, "Enriched release table written, {} record(s)", enriched.len());
    Ok(())
}
