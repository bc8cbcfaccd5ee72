//! Public profile entity and directory trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A public profile page with the templates its owner chose to share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub url: String,
    pub name: String,

    #[serde(default)]
    pub bio: Option<String>,

    #[serde(default)]
    pub templates: Vec<PublicTemplate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicTemplate {
    pub id: i64,
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Profile lookup contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Resolve a profile by its public URL slug.
    async fn find_by_url(&self, url: &str) -> Result<Option<PublicProfile>, AppError>;
}
