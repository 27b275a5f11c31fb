//! End-to-end pipeline runs against an in-memory release feed.

use chrono::DateTime;
use release_pulse::aggregate::{PeriodUnit, ReleaseStat, aggregate};
use release_pulse::api::{self, StatPeriod};
use release_pulse::enrich::ReleaseType;
use release_pulse::feed::{RawRelease, ReleaseFeed, RepoId};
use release_pulse::{pipeline, store};
use std::collections::HashMap;

/// Fixed in-memory feed keyed by repository name; everything fits on one page.
struct FixtureFeed {
    repos: HashMap<String, Vec<RawRelease>>,
}

impl ReleaseFeed for FixtureFeed {
    async fn fetch_page(&self, repo: &RepoId, page: u32) -> anyhow::Result<Vec<RawRelease>> {
        if page > 1 {
            return Ok(Vec::new());
        }
        Ok(self.repos.get(&repo.name).cloned().unwrap_or_default())
    }
}

fn release(id: u64, tag: &str, published_at: &str) -> RawRelease {
    RawRelease {
        id,
        tag_name: tag.to_string(),
        author: "octocat".to_string(),
        published_at: Some(DateTime::parse_from_rfc3339(published_at).unwrap()),
        draft: false,
        prerelease: false,
        created_at: Some(DateTime::parse_from_rfc3339(published_at).unwrap()),
    }
}

fn demo_feed() -> FixtureFeed {
    let mut repos = HashMap::new();
    let _ = repos.insert(
        "demo".to_string(),
        vec![
            release(1, "v1.0.0", "2024-01-10T08:00:00Z"),
            release(2, "v1.1.0", "2024-01-20T08:00:00Z"),
            release(3, "v1.1.1", "2024-02-01T08:00:00Z"),
        ],
    );
    FixtureFeed { repos }
}

#[tokio::test]
async fn test_stats_and_enrich_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    let feed = demo_feed();
    let repos = vec![RepoId::new("demo-org", "demo")];

    pipeline::run_stats(&feed, &repos, tmp.path()).await.unwrap();

    let records = store::read_release_records(tmp.path()).unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.repository == "demo"));

    // Unfiltered aggregates over the persisted record set.
    assert_eq!(
        aggregate(&records, &PeriodUnit::Yearly),
        vec![ReleaseStat { period: "2024".to_string(), count: 3 }]
    );
    assert_eq!(
        aggregate(&records, &PeriodUnit::Monthly),
        vec![
            ReleaseStat { period: "2024-01".to_string(), count: 2 },
            ReleaseStat { period: "2024-02".to_string(), count: 1 },
        ]
    );

    // The persisted yearly table excludes 2024-01-20, a Saturday release.
    let yearly = store::read_stats(tmp.path(), "yearly_weekday").unwrap();
    assert_eq!(yearly, vec![ReleaseStat { period: "2024".to_string(), count: 2 }]);

    let weekly = store::read_stats(tmp.path(), "weekly_weekday").unwrap();
    assert_eq!(
        weekly,
        vec![
            ReleaseStat { period: "2024-W02".to_string(), count: 1 },
            ReleaseStat { period: "2024-W05".to_string(), count: 1 },
        ]
    );

    let daily = store::read_stats(tmp.path(), "daily_weekday").unwrap();
    assert_eq!(
        daily,
        vec![
            ReleaseStat { period: "2024-01-10".to_string(), count: 1 },
            ReleaseStat { period: "2024-02-01".to_string(), count: 1 },
        ]
    );

    // Enrich from the persisted raw table.
    pipeline::run_enrich(tmp.path(), None).unwrap();
    let enriched = store::read_enriched(tmp.path()).unwrap();
    assert_eq!(enriched.len(), 3);

    let gaps: Vec<_> = enriched.iter().map(|e| e.days_since_prev_release).collect();
    assert_eq!(gaps, vec![None, Some(10), Some(12)]);

    let types: Vec<_> = enriched.iter().map(|e| e.release_type).collect();
    assert_eq!(
        types,
        vec![Some(ReleaseType::Major), Some(ReleaseType::Minor), Some(ReleaseType::Patch)]
    );
}

#[tokio::test]
async fn test_stats_accumulates_across_repositories() {
    let tmp = tempfile::tempdir().unwrap();
    let mut feed = demo_feed();
    let _ = feed.repos.insert(
        "sibling".to_string(),
        vec![release(9, "v2.0.0", "2024-02-02T10:00:00Z")],
    );
    let repos = vec![RepoId::new("demo-org", "demo"), RepoId::new("demo-org", "sibling")];

    pipeline::run_stats(&feed, &repos, tmp.path()).await.unwrap();

    let records = store::read_release_records(tmp.path()).unwrap();
    assert_eq!(records.len(), 4);

    // Aggregation spans the combined set without a per-repository breakdown.
    let yearly = store::read_stats(tmp.path(), "yearly_weekday").unwrap();
    assert_eq!(yearly, vec![ReleaseStat { period: "2024".to_string(), count: 3 }]);
}

#[tokio::test]
async fn test_reruns_overwrite_prior_output() {
    let tmp = tempfile::tempdir().unwrap();
    let repos = vec![RepoId::new("demo-org", "demo")];

    pipeline::run_stats(&demo_feed(), &repos, tmp.path()).await.unwrap();

    // A second run against a shrunken history replaces the tables wholesale.
    let mut shrunk = demo_feed();
    let _ = shrunk
        .repos
        .insert("demo".to_string(), vec![release(1, "v1.0.0", "2024-01-10T08:00:00Z")]);
    pipeline::run_stats(&shrunk, &repos, tmp.path()).await.unwrap();

    assert_eq!(store::read_release_records(tmp.path()).unwrap().len(), 1);
    let yearly = store::read_stats(tmp.path(), "yearly_weekday").unwrap();
    assert_eq!(yearly, vec![ReleaseStat { period: "2024".to_string(), count: 1 }]);
}

#[tokio::test]
async fn test_api_serves_persisted_tables() {
    let tmp = tempfile::tempdir().unwrap();
    let repos = vec![RepoId::new("demo-org", "demo")];

    pipeline::run_stats(&demo_feed(), &repos, tmp.path()).await.unwrap();
    pipeline::run_enrich(tmp.path(), None).unwrap();

    let response = api::enriched_releases(tmp.path());
    assert_eq!(response.status, 200);
    assert_eq!(response.body.as_array().unwrap().len(), 3);

    let response = api::statistics(tmp.path(), StatPeriod::Yearly);
    assert_eq!(response.status, 200);
    assert_eq!(response.body[0]["period"], "2024");
    assert_eq!(response.body[0]["count"], 2);
}
