//! Runtime configuration resolved from the host page.
//!
//! The shell reads `<meta>` tags and the build environment, then hands the raw
//! values here so precedence rules stay testable without a DOM.

use uda_fbsdk::SdkConfig;

/// API prefix used when the page does not override it.
pub const DEFAULT_API_BASE: &str = "/api/v1";
/// `<meta name=...>` carrying the Facebook app id.
pub const APP_ID_META: &str = "uda-facebook-app-id";
/// `<meta name=...>` carrying the API base URL.
pub const API_BASE_META: &str = "uda-api-base";

/// Settings the web client needs before rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UiConfig {
    /// Base URL for REST calls, without a trailing slash.
    pub api_base: String,
    /// Facebook app id, when one was configured.
    pub facebook_app_id: Option<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            facebook_app_id: None,
        }
    }
}

impl UiConfig {
    /// Merge page and build-time values. The page wins over the build for the
    /// app id; blank values count as absent.
    #[must_use]
    pub fn resolve(
        page_app_id: Option<&str>,
        build_app_id: Option<&str>,
        page_api_base: Option<&str>,
    ) -> Self {
        let facebook_app_id = non_blank(page_app_id).or_else(|| non_blank(build_app_id));
        let api_base = non_blank(page_api_base).map_or_else(
            || DEFAULT_API_BASE.to_string(),
            |base| base.trim_end_matches('/').to_string(),
        );
        Self {
            api_base,
            facebook_app_id,
        }
    }

    /// SDK configuration with defaults and the resolved app id.
    #[must_use]
    pub fn sdk_config(&self) -> SdkConfig {
        SdkConfig::with_app_id(self.facebook_app_id.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
