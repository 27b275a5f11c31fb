//! Read-only API operations over the persisted tables.
//!
//! Each operation produces a status code plus a JSON body; wiring these into an
//! actual HTTP listener is left to the serving layer. Persistence or parse
//! failures never escape as errors, they become structured 500 payloads.

use crate::store;
use serde::Serialize;
use serde_json::{Value, json};
use std::path::Path;

/// Log target for API operations
const LOG_TARGET: &str = "api";

/// The statistic tables exposed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatPeriod {
    Yearly,
    Weekly,
    Daily,
}

impl StatPeriod {
    /// Name of the weekday-filtered table backing this period.
    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Yearly => "yearly_weekday",
            Self::Weekly => "weekly_weekday",
            Self::Daily => "daily_weekday",
        }
    }
}

/// Status code and JSON body of one API operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(body) => Self { status: 200, body },
            Err(e) => Self {
                status: 500,
                body: json!({ "error": e.to_string() }),
            },
        }
    }
}

/// `GET /api/releases/enriched`
#[must_use]
pub fn enriched_releases(data_dir: &Path) -> ApiResponse {
    match store::read_enriched(data_dir) {
        Ok(records) => ApiResponse::ok(&records),
        Err(e) => {
            log::error!(target: LOG_TARGET, "Reading the enriched release table failed: {e:#}");
            ApiResponse {
                status: 500,
                body: json!({ "message": "internal server error", "error": format!("{e:#}") }),
            }
        }
    }
}

/// `GET /api/statistics/{yearly|weekly|daily}`
#[must_use]
pub fn statistics(data_dir: &Path, period: StatPeriod) -> ApiResponse {
    match store::read_stats(data_dir, period.table_name()) {
        Ok(stats) => ApiResponse::ok(&stats),
        Err(e) => {
            log::error!(target: LOG_TARGET, "Reading the {period:?} statistic table failed: {e:#}");
            ApiResponse {
                status: 500,
                body: json!({ "error": format!("{e:#}") }),
            }
        }
    }
}

/// Dispatch a request path to its operation, `None` for unknown paths.
#[must_use]
pub fn handle(path: &str, data_dir: &Path) -> Option<ApiResponse> {
    match path {
        "/api/releases/enriched" => Some(enriched_releases(data_dir)),
        "/api/statistics/yearly" => Some(statistics(data_dir, StatPeriod::Yearly)),
        "/api/statistics/weekly" => Some(statistics(data_dir, StatPeriod::Weekly)),
        "/api/statistics/daily" => Some(statistics(data_dir, StatPeriod::Daily)),
        _ => None,
    }
}
