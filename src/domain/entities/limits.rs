//! Usage limits snapshot and provider trait.

use async_trait::async_trait;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Counters for each limited resource. `None` means unlimited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitCounts {
    #[serde(default)]
    pub documents: Option<u64>,

    #[serde(default)]
    pub recipients: Option<u64>,

    #[serde(default)]
    pub direct_templates: Option<u64>,
}

/// Point-in-time read of a team's quota and what is left of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsSnapshot {
    pub quota: LimitCounts,
    pub remaining: LimitCounts,
}

/// Limits lookup contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LimitsProvider: Send + Sync {
    /// Read the limits for `team_id` (or the personal account when `None`),
    /// authenticating with the caller's original request headers.
    async fn limits(
        &self,
        headers: &HeaderMap,
        team_id: Option<i64>,
    ) -> Result<LimitsSnapshot, AppError>;
}
