//! Chronological ordering of a repository's releases and inter-release deltas.

use crate::enrich::record::ReleaseRecord;
use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDate};

/// Log target for delta computation
const LOG_TARGET: &str = "sequence";

/// Number of top contributors retained per release.
pub const TOP_CONTRIBUTOR_COUNT: usize = 3;

/// A single asset attached to a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub name: String,
    pub size: u64,
    pub download_count: u64,
}

/// A contributor and their commit count within one release interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributorStat {
    pub name: String,
    pub count: u64,
}

/// Auxiliary metrics collector consulted for the interval between two releases.
///
/// Implementations typically call back into the hosting provider; when no
/// collector is wired in, every optional delta field stays empty.
pub trait MetricsSource {
    /// Assets attached to the given release.
    fn assets_for(&self, release: &ReleaseRecord) -> Result<Vec<ReleaseAsset>>;

    /// Commits between two refs.
    fn commit_count_between(&self, repository: &str, base_ref: &str, head_ref: &str) -> Result<u64>;

    /// Pull requests merged between the publication instants of two tags.
    fn merged_pr_count_between(&self, repository: &str, base_tag: &str, head_tag: &str) -> Result<u64>;

    /// Issues closed at or after the given instant.
    fn closed_issue_count_since(&self, repository: &str, since: DateTime<FixedOffset>) -> Result<u64>;

    /// Contributors between two refs with their commit counts, ordered by count descending.
    fn top_contributors_between(
        &self,
        repository: &str,
        base_ref: &str,
        head_ref: &str,
        limit: usize,
    ) -> Result<Vec<ContributorStat>>;
}

/// Per-release delta fields, aligned by index with the ordered record list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaParts {
    /// Publish date of the previous release in the same repository, `None` for the first.
    pub prev_release_date: Option<NaiveDate>,
    /// Calendar-day difference between this and the previous publish date.
    pub days_since_prev_release: Option<i64>,
    pub commit_count_since_prev: Option<u64>,
    pub pr_count_since_prev: Option<u64>,
    pub closed_issues_since_prev: Option<u64>,
    /// Up to [`TOP_CONTRIBUTOR_COUNT`] contributors, count descending, ties in first-seen order.
    pub top_contributors: Vec<ContributorStat>,
}

/// Order one repository's releases ascending by publish instant.
///
/// The sort is stable so releases sharing a timestamp keep their fetch order.
#[must_use]
pub fn order_releases(mut records: Vec<ReleaseRecord>) -> Vec<ReleaseRecord> {
    records.sort_by_key(|r| r.published_at);
    records
}

/// Walk an ordered single-repository record list and compute per-release deltas.
///
/// State never leaks across repository boundaries; callers must invoke this
/// once per repository group. Metrics failures degrade the affected fields to
/// `None` rather than aborting the walk.
#[must_use]
pub fn compute_deltas(ordered: &[ReleaseRecord], metrics: Option<&dyn MetricsSource>) -> Vec<DeltaParts> {
    let mut deltas = Vec::with_capacity(ordered.len());
    let mut prev: Option<&ReleaseRecord> = None;

    for record in ordered {
        let mut parts = DeltaParts::default();

        if let Some(prev_record) = prev {
            let prev_date = prev_record.published_at.date_naive();
            parts.prev_release_date = Some(prev_date);
            parts.days_since_prev_release = Some((record.published_at.date_naive() - prev_date).num_days());

            if let Some(source) = metrics {
                parts.commit_count_since_prev =
                    metric_or_none(source.commit_count_between(&record.repository, &prev_record.tag_name, &record.tag_name), record);
                parts.pr_count_since_prev =
                    metric_or_none(source.merged_pr_count_between(&record.repository, &prev_record.tag_name, &record.tag_name), record);
                parts.closed_issues_since_prev =
                    metric_or_none(source.closed_issue_count_since(&record.repository, prev_record.published_at), record);
                parts.top_contributors = top_contributors(source, prev_record, record);
            }
        }

        deltas.push(parts);
        prev = Some(record);
    }

    deltas
}

fn metric_or_none(result: Result<u64>, record: &ReleaseRecord) -> Option<u64> {
    match result {
        Ok(count) => Some(count),
        Err(e) => {
            log::warn!(target: LOG_TARGET, "Metrics lookup failed for '{}' tag '{}': {e:#}", record.repository, record.tag_name);
            None
        }
    }
}

fn top_contributors(source: &dyn MetricsSource, prev: &ReleaseRecord, record: &ReleaseRecord) -> Vec<ContributorStat> {
    match source.top_contributors_between(&record.repository, &prev.tag_name, &record.tag_name, TOP_CONTRIBUTOR_COUNT) {
        Ok(mut contributors) => {
            // Stable sort keeps first-seen order among equal counts.
            contributors.sort_by(|a, b| b.count.cmp(&a.count));
            contributors.truncate(TOP_CONTRIBUTOR_COUNT);
            contributors
        }
        Err(e) => {
            log::warn!(target: LOG_TARGET, "Contributor lookup failed for '{}' tag '{}': {e:#}", record.repository, record.tag_name);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn record(repo: &str, id: u64, tag: &str, published_at: &str) -> ReleaseRecord {
        ReleaseRecord {
            repository: repo.to_string(),
            id,
            tag_name: tag.to_string(),
            published_at: DateTime::parse_from_rfc3339(published_at).unwrap(),
            author: "octocat".to_string(),
            draft: false,
            prerelease: false,
        }
    }

    #[test]
    fn test_order_releases_sorts_by_instant() {
        let records = vec![
            record("demo", 3, "v1.1.1", "2024-02-01T08:00:00Z"),
            record("demo", 1, "v1.0.0", "2024-01-10T08:00:00Z"),
            record("demo", 2, "v1.1.0", "2024-01-20T08:00:00Z"),
        ];

        let ordered = order_releases(records);
        let ids: Vec<u64> = ordered.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_order_releases_is_stable_for_equal_instants() {
        let records = vec![
            record("demo", 10, "a", "2024-01-10T08:00:00Z"),
            record("demo", 11, "b", "2024-01-10T08:00:00Z"),
            record("demo", 12, "c", "2024-01-10T08:00:00Z"),
        ];

        let ordered = order_releases(records);
        let ids: Vec<u64> = ordered.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
    }

    #[test]
    fn test_deltas_without_metrics() {
        let ordered = order_releases(vec![
            record("demo", 1, "v1.0.0", "2024-01-10T08:00:00Z"),
            record("demo", 2, "v1.1.0", "2024-01-20T08:00:00Z"),
            record("demo", 3, "v1.1.1", "2024-02-01T08:00:00Z"),
        ]);

        let deltas = compute_deltas(&ordered, None);
        assert_eq!(deltas.len(), 3);

        assert_eq!(deltas[0].prev_release_date, None);
        assert_eq!(deltas[0].days_since_prev_release, None);

        assert_eq!(deltas[1].prev_release_date, Some("2024-01-10".parse().unwrap()));
        assert_eq!(deltas[1].days_since_prev_release, Some(10));

        assert_eq!(deltas[2].prev_release_date, Some("2024-01-20".parse().unwrap()));
        assert_eq!(deltas[2].days_since_prev_release, Some(12));

        for parts in &deltas {
            assert_eq!(parts.commit_count_since_prev, None);
            assert!(parts.top_contributors.is_empty());
        }
    }

    #[test]
    fn test_deltas_use_date_portion_only() {
        // 23:00 on the 10th to 01:00 on the 11th is one calendar day apart.
        let ordered = vec![
            record("demo", 1, "v1.0.0", "2024-01-10T23:00:00Z"),
            record("demo", 2, "v1.0.1", "2024-01-11T01:00:00Z"),
        ];

        let deltas = compute_deltas(&ordered, None);
        assert_eq!(deltas[1].days_since_prev_release, Some(1));
    }

    #[test]
    fn test_deltas_nonnegative_after_ordering() {
        let ordered = order_releases(vec![
            record("demo", 2, "v2", "2024-03-01T00:00:00Z"),
            record("demo", 1, "v1", "2024-01-01T00:00:00Z"),
            record("demo", 3, "v3", "2024-02-01T00:00:00Z"),
        ]);

        for parts in compute_deltas(&ordered, None).iter().skip(1) {
            assert!(parts.days_since_prev_release.unwrap() >= 0);
        }
    }

    struct FakeMetrics;

    impl MetricsSource for FakeMetrics {
        fn assets_for(&self, _release: &ReleaseRecord) -> Result<Vec<ReleaseAsset>> {
            Ok(vec![ReleaseAsset {
                name: "pkg.tar.gz".to_string(),
                size: 2048,
                download_count: 7,
            }])
        }

        fn commit_count_between(&self, _repository: &str, _base_ref: &str, _head_ref: &str) -> Result<u64> {
            Ok(12)
        }

        fn merged_pr_count_between(&self, _repository: &str, _base_tag: &str, _head_tag: &str) -> Result<u64> {
            Ok(4)
        }

        fn closed_issue_count_since(&self, _repository: &str, _since: DateTime<FixedOffset>) -> Result<u64> {
            Err(anyhow!("search unavailable"))
        }

        fn top_contributors_between(
            &self,
            _repository: &str,
            _base_ref: &str,
            _head_ref: &str,
            _limit: usize,
        ) -> Result<Vec<ContributorStat>> {
            // Unsorted on purpose; ana and bob tie on count.
            Ok(vec![
                ContributorStat { name: "ana".to_string(), count: 3 },
                ContributorStat { name: "bob".to_string(), count: 3 },
                ContributorStat { name: "cyd".to_string(), count: 9 },
                ContributorStat { name: "dee".to_string(), count: 1 },
            ])
        }
    }

    #[test]
    fn test_deltas_with_metrics_source() {
        let ordered = vec![
            record("demo", 1, "v1.0.0", "2024-01-10T08:00:00Z"),
            record("demo", 2, "v1.1.0", "2024-01-20T08:00:00Z"),
        ];

        let deltas = compute_deltas(&ordered, Some(&FakeMetrics));

        // First release has no interval, so no metrics either.
        assert_eq!(deltas[0].commit_count_since_prev, None);

        assert_eq!(deltas[1].commit_count_since_prev, Some(12));
        assert_eq!(deltas[1].pr_count_since_prev, Some(4));
        // Failed lookups degrade to None instead of aborting.
        assert_eq!(deltas[1].closed_issues_since_prev, None);

        let names: Vec<&str> = deltas[1].top_contributors.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["cyd", "ana", "bob"]);
    }
}
