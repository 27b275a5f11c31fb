//! Grouping of release record sets into periodic counts.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use core::fmt::{Debug, Formatter, Result as FmtResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Anything carrying a publish instant can be aggregated.
pub trait Dated {
    fn published_at(&self) -> DateTime<FixedOffset>;
}

/// Key derivation for the [`PeriodUnit::Custom`] unit.
#[derive(Clone)]
pub enum KeyFormat {
    /// A chrono format string, e.g. `"%Y-%m"`. Must only use valid specifiers.
    Pattern(String),
    /// An arbitrary formatting function over the parsed instant.
    Func(Arc<dyn Fn(DateTime<FixedOffset>) -> String + Send + Sync>),
}

impl Debug for KeyFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Pattern(pattern) => f.debug_tuple("Pattern").field(pattern).finish(),
            Self::Func(_) => f.debug_tuple("Func").finish(),
        }
    }
}

/// The aggregation bucket size.
///
/// Carrying the custom formatter inside the variant makes both the
/// "unrecognized unit" and the "custom without formatter" failure modes
/// unrepresentable.
#[derive(Debug, Clone)]
pub enum PeriodUnit {
    /// `"2024"`
    Yearly,
    /// `"2024-06"`
    Monthly,
    /// `"2024-W23"`, Monday-start week numbering, see [`week_of_year`].
    Weekly,
    /// `"2024-06-15"`
    Daily,
    /// `"2024-06-15 14"`
    Hourly,
    /// Caller-supplied bucketing.
    Custom(KeyFormat),
}

/// One aggregation bucket: a period label and the number of releases in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseStat {
    pub period: String,
    pub count: u64,
}

/// Week number with weeks starting on Monday and week 1 being the week that
/// contains January 1 of the calendar year.
///
/// This is deliberately not the ISO-8601 week-year rule: the year component of
/// a weekly key is always the calendar year, and a year may end in week 53 or
/// 54. The same rule backs every weekly key this crate emits.
#[must_use]
pub fn week_of_year(date: NaiveDate) -> u32 {
    let jan1 = date.with_ordinal(1).expect("January 1st always exists");
    (date.ordinal0() + jan1.weekday().num_days_from_monday()) / 7 + 1
}

/// Derive the period key for one instant.
#[must_use]
pub fn period_key(unit: &PeriodUnit, instant: DateTime<FixedOffset>) -> String {
    match unit {
        PeriodUnit::Yearly => instant.format("%Y").to_string(),
        PeriodUnit::Monthly => instant.format("%Y-%m").to_string(),
        PeriodUnit::Weekly => format!("{}-W{:02}", instant.year(), week_of_year(instant.date_naive())),
        PeriodUnit::Daily => instant.format("%Y-%m-%d").to_string(),
        PeriodUnit::Hourly => instant.format("%Y-%m-%d %H").to_string(),
        PeriodUnit::Custom(KeyFormat::Pattern(pattern)) => instant.format(pattern).to_string(),
        PeriodUnit::Custom(KeyFormat::Func(func)) => func(instant),
    }
}

/// Group a record set by period key and count membership.
///
/// The result is sorted lexicographically by period, which is chronological for
/// every fixed-width built-in key format.
#[must_use]
pub fn aggregate<T: Dated>(records: &[T], unit: &PeriodUnit) -> Vec<ReleaseStat> {
    aggregate_filtered(records, unit, |_| true)
}

/// Like [`aggregate`], but records failing the predicate are excluded entirely
/// before grouping; they appear in no period's count.
#[must_use]
pub fn aggregate_filtered<T, F>(records: &[T], unit: &PeriodUnit, keep: F) -> Vec<ReleaseStat>
where
    T: Dated,
    F: Fn(&T) -> bool,
{
    let mut buckets: BTreeMap<String, u64> = BTreeMap::new();
    for record in records.iter().filter(|r| keep(r)) {
        *buckets.entry(period_key(unit, record.published_at())).or_default() += 1;
    }

    buckets.into_iter().map(|(period, count)| ReleaseStat { period, count }).collect()
}

/// Predicate excluding Saturday and Sunday releases.
#[must_use]
pub fn weekdays_only<T: Dated>(record: &T) -> bool {
    let weekday = record.published_at().weekday().num_days_from_sunday();
    weekday != 0 && weekday != 6
}
