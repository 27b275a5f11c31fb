//! The release-enrichment pipeline: version classification, temporal
//! decomposition, per-repository sequencing, and record assembly.

mod assembler;
mod record;
mod sequence;
mod temporal;
mod version;

pub use assembler::{assemble, to_release_records};
pub use record::{EnrichedRelease, ReleaseRecord};
pub use sequence::{
    ContributorStat, DeltaParts, MetricsSource, ReleaseAsset, TOP_CONTRIBUTOR_COUNT, compute_deltas, order_releases,
};
pub use temporal::{TemporalParts, WEEKDAY_NAMES, decompose};
pub use version::{ReleaseType, VersionParts, classify_tag};
