//! Site settings and the site-wide banner.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Well-known id of the banner setting.
pub const SITE_SETTINGS_BANNER_ID: &str = "site.banner";

/// Raw site setting row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSetting {
    pub id: String,

    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub data: serde_json::Value,
}

/// Banner payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerData {
    pub content: String,

    #[serde(default)]
    pub bg_color: Option<String>,

    #[serde(default)]
    pub text_color: Option<String>,
}

/// Site-wide banner shown above the authenticated area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteBanner {
    pub id: String,
    pub enabled: bool,
    pub data: BannerData,
}

impl SiteBanner {
    /// Pick the banner out of a settings list.
    pub fn find_in(settings: Vec<SiteSetting>) -> Result<Option<Self>, AppError> {
        settings
            .into_iter()
            .find(|setting| setting.id == SITE_SETTINGS_BANNER_ID)
            .map(Self::try_from)
            .transpose()
    }
}

impl TryFrom<SiteSetting> for SiteBanner {
    type Error = AppError;

    fn try_from(setting: SiteSetting) -> Result<Self, Self::Error> {
        let data = serde_json::from_value(setting.data).map_err(|e| {
            AppError::upstream("site_settings", format!("malformed banner setting: {}", e))
        })?;

        Ok(Self {
            id: setting.id,
            enabled: setting.enabled,
            data,
        })
    }
}

/// Site settings contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SiteSettingsProvider: Send + Sync {
    /// Fetch every site setting. Never cached.
    async fn site_settings(&self) -> Result<Vec<SiteSetting>, AppError>;
}
