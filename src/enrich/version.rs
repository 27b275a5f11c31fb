//! Classification of free-form release tags into version numbers and a release kind.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// First dotted numeric triple found anywhere in a tag, e.g. the `1.3.2` in
/// `@scope/pkg@1.3.2`.
static VERSION_TRIPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").expect("version pattern must compile"));

static PRERELEASE_HINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)rc|alpha|beta|pre").expect("prerelease pattern must compile"));

/// Coarse classification of a version tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Major,
    Minor,
    Patch,
    Prerelease,
}

/// Structured version information extracted from a release tag.
///
/// All fields are `None` when the tag is unclassifiable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionParts {
    pub major: Option<u64>,
    pub minor: Option<u64>,
    pub patch: Option<u64>,
    pub release_type: Option<ReleaseType>,
}

/// Classify a release tag.
///
/// The first `major.minor.patch` numeric pattern found anywhere in the tag wins;
/// the prerelease-keyword fallback is only consulted when no such pattern exists.
/// The kind is a simple tie-break on the extracted numbers, not strict SemVer
/// precedence: `major` when minor and patch are both zero, `minor` when only
/// patch is zero, otherwise `patch`. Malformed tags degrade to all-`None` rather
/// than failing.
#[must_use]
pub fn classify_tag(tag: &str) -> VersionParts {
    match extract_triple(tag) {
        Some((major, minor, patch)) => {
            let release_type = if minor == 0 && patch == 0 {
                ReleaseType::Major
            } else if patch == 0 {
                ReleaseType::Minor
            } else {
                ReleaseType::Patch
            };

            VersionParts {
                major: Some(major),
                minor: Some(minor),
                patch: Some(patch),
                release_type: Some(release_type),
            }
        }
        None if PRERELEASE_HINT.is_match(tag) => VersionParts {
            release_type: Some(ReleaseType::Prerelease),
            ..VersionParts::default()
        },
        None => VersionParts::default(),
    }
}

/// Extract the first numeric triple from the tag. Digit runs too large for a
/// `u64` are treated the same as no match at all.
fn extract_triple(tag: &str) -> Option<(u64, u64, u64)> {
    let caps = VERSION_TRIPLE.captures(tag)?;
    let major = caps[1].parse().ok()?;
    let minor = caps[2].parse().ok()?;
    let patch = caps[3].parse().ok()?;
    Some((major, minor, patch))
}
