//! Normalized and enriched release records.

use crate::aggregate::Dated;
use crate::enrich::version::ReleaseType;
use crate::feed::RawRelease;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// One normalized record per included raw release.
///
/// `published_at` is always present; raw releases without a publish timestamp
/// are filtered out before this stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub repository: String,
    pub id: u64,
    pub tag_name: String,
    pub published_at: DateTime<FixedOffset>,
    pub author: String,
    pub draft: bool,
    pub prerelease: bool,
}

impl ReleaseRecord {
    /// Convert a raw feed item into a record for the given repository,
    /// returning `None` when the release was never published.
    #[must_use]
    pub fn from_raw(raw: RawRelease, repository: &str) -> Option<Self> {
        let published_at = raw.published_at?;
        Some(Self {
            repository: repository.to_string(),
            id: raw.id,
            tag_name: raw.tag_name,
            published_at,
            author: raw.author,
            draft: raw.draft,
            prerelease: raw.prerelease,
        })
    }
}

impl Dated for ReleaseRecord {
    fn published_at(&self) -> DateTime<FixedOffset> {
        self.published_at
    }
}

/// A release record augmented with derived version, temporal, delta, and
/// optional contribution metrics.
///
/// Field declaration order is the persisted column order; consumers should
/// still treat the header row, not the position, as authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRelease {
    pub repository: String,
    pub id: u64,
    pub tag_name: String,
    pub author: String,
    pub published_at: DateTime<FixedOffset>,
    pub draft: bool,
    pub prerelease: bool,

    pub version_major: Option<u64>,
    pub version_minor: Option<u64>,
    pub version_patch: Option<u64>,
    pub release_type: Option<ReleaseType>,

    pub published_date: String,
    pub published_time: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub weekday: u32,
    pub weekday_name: String,
    pub hour: u32,
    pub time_slot: String,
    pub is_weekend: bool,

    pub prev_release_date: Option<NaiveDate>,
    pub days_since_prev_release: Option<i64>,
    pub commit_count_since_prev: Option<u64>,
    pub pr_count_since_prev: Option<u64>,
    pub closed_issues_since_prev: Option<u64>,
    pub top_contributor_1: Option<String>,
    pub top_contributor_1_count: Option<u64>,
    pub top_contributor_2: Option<String>,
    pub top_contributor_2_count: Option<u64>,
    pub top_contributor_3: Option<String>,
    pub top_contributor_3_count: Option<u64>,

    pub body_length: Option<u64>,
    pub breaking_change_flag: Option<bool>,
    pub notes_url: Option<String>,
    pub asset_count: Option<u64>,
    pub asset_total_size_kb: Option<u64>,
    pub download_count_total: Option<u64>,
}

impl Dated for EnrichedRelease {
    fn published_at(&self) -> DateTime<FixedOffset> {
        self.published_at
    }
}
