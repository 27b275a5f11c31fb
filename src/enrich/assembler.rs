//! Assembly of raw feed items into enriched release records.

use crate::enrich::record::{EnrichedRelease, ReleaseRecord};
use crate::enrich::sequence::{self, DeltaParts, MetricsSource};
use crate::enrich::temporal;
use crate::enrich::version;
use crate::feed::RawRelease;
use std::collections::HashMap;

/// Log target for enrichment
const LOG_TARGET: &str = "enrich";

/// Convert a repository's raw feed into normalized records, dropping releases
/// that were never published.
#[must_use]
pub fn to_release_records(raw: Vec<RawRelease>, repository: &str) -> Vec<ReleaseRecord> {
    raw.into_iter()
        .filter_map(|r| ReleaseRecord::from_raw(r, repository))
        .collect()
}

/// Assemble one enriched record per release.
///
/// Records are grouped by repository in first-seen order and each group is
/// ordered ascending by publish instant; no cross-repository sort is imposed.
/// This is a pure transformation, all I/O belongs to collaborators.
#[must_use]
pub fn assemble(records: Vec<ReleaseRecord>, metrics: Option<&dyn MetricsSource>) -> Vec<EnrichedRelease> {
    let mut repo_order: Vec<String> = Vec::new();
    let mut by_repo: HashMap<String, Vec<ReleaseRecord>> = HashMap::new();
    for record in records {
        if !by_repo.contains_key(&record.repository) {
            repo_order.push(record.repository.clone());
        }
        by_repo.entry(record.repository.clone()).or_default().push(record);
    }

    let mut enriched = Vec::new();
    for repo in repo_order {
        let Some(group) = by_repo.remove(&repo) else { continue };
        let ordered = sequence::order_releases(group);
        let deltas = sequence::compute_deltas(&ordered, metrics);

        log::debug!(target: LOG_TARGET, "Enriching {} release(s) for '{repo}'", ordered.len());
        for (record, delta) in ordered.into_iter().zip(deltas) {
            enriched.push(enrich_one(record, delta, metrics));
        }
    }

    enriched
}

fn enrich_one(record: ReleaseRecord, delta: DeltaParts, metrics: Option<&dyn MetricsSource>) -> EnrichedRelease {
    let version = version::classify_tag(&record.tag_name);
    let temporal = temporal::decompose(record.published_at);

    let mut contributors = delta.top_contributors.into_iter();
    let first = contributors.next();
    let second = contributors.next();
    let third = contributors.next();

    let assets = metrics.and_then(|source| match source.assets_for(&record) {
        Ok(assets) => Some(assets),
        Err(e) => {
            log::warn!(target: LOG_TARGET, "Asset lookup failed for '{}' tag '{}': {e:#}", record.repository, record.tag_name);
            None
        }
    });

    EnrichedRelease {
        repository: record.repository,
        id: record.id,
        tag_name: record.tag_name,
        author: record.author,
        published_at: record.published_at,
        draft: record.draft,
        prerelease: record.prerelease,

        version_major: version.major,
        version_minor: version.minor,
        version_patch: version.patch,
        release_type: version.release_type,

        published_date: temporal.published_date,
        published_time: temporal.published_time,
        year: temporal.year,
        month: temporal.month,
        day: temporal.day,
        weekday: temporal.weekday,
        weekday_name: temporal.weekday_name.to_string(),
        hour: temporal.hour,
        time_slot: temporal.time_slot,
        is_weekend: temporal.is_weekend,

        prev_release_date: delta.prev_release_date,
        days_since_prev_release: delta.days_since_prev_release,
        commit_count_since_prev: delta.commit_count_since_prev,
        pr_count_since_prev: delta.pr_count_since_prev,
        closed_issues_since_prev: delta.closed_issues_since_prev,
        top_contributor_1: first.as_ref().map(|c| c.name.clone()),
        top_contributor_1_count: first.map(|c| c.count),
        top_contributor_2: second.as_ref().map(|c| c.name.clone()),
        top_contributor_2_count: second.map(|c| c.count),
        top_contributor_3: third.as_ref().map(|c| c.name.clone()),
        top_contributor_3_count: third.map(|c| c.count),

        body_length: None,
        breaking_change_flag: None,
        notes_url: None,
        asset_count: assets.as_ref().map(|a| a.len() as u64),
        asset_total_size_kb: assets.as_ref().map(|a| a.iter().map(|asset| asset.size).sum::<u64>() / 1024),
        download_count_total: assets.map(|a| a.iter().map(|asset| asset.download_count).sum()),
    }
}
