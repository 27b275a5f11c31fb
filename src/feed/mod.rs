//! Access to the remote release feed.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use core::fmt::{Display, Formatter, Result as FmtResult};
use core::time::Duration;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};

/// Log target for feed operations
const LOG_TARGET: &str = "feed";

/// Releases fetched per page; pagination stops at the first empty page.
pub const PAGE_SIZE: u8 = 100;

/// Safety margin added on top of the reported rate-limit reset instant.
const RATE_LIMIT_MARGIN: Duration = Duration::from_secs(5);

/// One release as delivered by the feed, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRelease {
    pub id: u64,
    pub tag_name: String,
    pub author: String,
    /// Absent for releases that were drafted but never published.
    pub published_at: Option<DateTime<FixedOffset>>,
    pub draft: bool,
    pub prerelease: bool,
    pub created_at: Option<DateTime<FixedOffset>>,
}

/// A repository addressed by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl Display for RepoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A paged source of raw releases.
pub trait ReleaseFeed {
    /// Fetch one page (1-based) of a repository's releases; an empty page ends pagination.
    fn fetch_page(&self, repo: &RepoId, page: u32) -> impl Future<Output = Result<Vec<RawRelease>>>;
}

/// Fetch a repository's full release history, page by page.
///
/// Pages are requested strictly sequentially since each page's existence is
/// only known once the previous page came back non-empty.
pub async fn fetch_all_releases<F: ReleaseFeed>(feed: &F, repo: &RepoId) -> Result<Vec<RawRelease>> {
    let mut all = Vec::new();
    let mut page = 1_u32;

    loop {
        let batch = feed.fetch_page(repo, page).await?;
        if batch.is_empty() {
            break;
        }
        all.extend(batch);
        page += 1;
    }

    log::info!(target: LOG_TARGET, "Fetched {} release(s) from '{repo}'", all.len());
    Ok(all)
}

/// GitHub-backed release feed.
///
/// The client is constructed once with an explicit token and injected into
/// fetch operations; nothing in here reads the environment.
#[derive(Debug)]
pub struct GithubFeed {
    inner: Octocrab,
}

impl GithubFeed {
    /// Build a feed authenticated with the given personal access token.
    pub fn new(token: &str) -> Result<Self> {
        let inner = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .context("building the GitHub client")?;
        Ok(Self { inner })
    }

    async fn list_page(&self, repo: &RepoId, page: u32) -> octocrab::Result<Vec<RawRelease>> {
        let releases = self
            .inner
            .repos(repo.owner.clone(), repo.name.clone())
            .releases()
            .list()
            .per_page(PAGE_SIZE)
            .page(page)
            .send()
            .await?;

        Ok(releases.items.into_iter().map(to_raw).collect())
    }

    /// How long to wait before the request quota is restored.
    async fn rate_limit_wait(&self) -> Duration {
        match self.inner.ratelimit().get().await {
            Ok(limits) => {
                let reset = u64::try_from(limits.resources.core.reset).unwrap_or(0);
                let now = u64::try_from(Utc::now().timestamp()).unwrap_or(0);
                Duration::from_secs(reset.saturating_sub(now)) + RATE_LIMIT_MARGIN
            }
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Could not query the rate limit reset instant: {e}");
                RATE_LIMIT_MARGIN
            }
        }
    }
}

impl ReleaseFeed for GithubFeed {
    /// Fetch one page, waiting out a rate-limit rejection and retrying the same
    /// request exactly once.
    async fn fetch_page(&self, repo: &RepoId, page: u32) -> Result<Vec<RawRelease>> {
        match self.list_page(repo, page).await {
            Ok(batch) => Ok(batch),
            Err(e) if is_rate_limited(&e) => {
                let wait = self.rate_limit_wait().await;
                log::warn!(target: LOG_TARGET, "GitHub rate limit exceeded, retrying in {}s", wait.as_secs());
                tokio::time::sleep(wait).await;

                self.list_page(repo, page)
                    .await
                    .with_context(|| format!("fetching releases page {page} of '{repo}' after rate-limit wait"))
            }
            Err(e) => Err(e).with_context(|| format!("fetching releases page {page} of '{repo}'")),
        }
    }
}

fn is_rate_limited(err: &octocrab::Error) -> bool {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            let status = source.status_code.as_u16();
            (status == 403 || status == 429) && source.message.to_lowercase().contains("rate limit")
        }
        _ => false,
    }
}

fn to_raw(release: octocrab::models::repos::Release) -> RawRelease {
    RawRelease {
        id: release.id.0,
        tag_name: release.tag_name,
        author: release.author.map(|a| a.login).unwrap_or_default(),
        published_at: release.published_at.map(|t| t.fixed_offset()),
        draft: release.draft,
        prerelease: release.prerelease,
        created_at: release.created_at.map(|t| t.fixed_offset()),
    }
}
