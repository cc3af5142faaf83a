//! SDK configuration and defaults.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::error::ConfigError;
use crate::sdk::{InitParams, ScriptTag};

/// Graph API version requested from `FB.init`.
pub const DEFAULT_SDK_VERSION: &str = "v18.0";
/// Location of the SDK script.
pub const DEFAULT_SCRIPT_SRC: &str = "https://connect.facebook.net/en_US/sdk.js";
/// Element id used to detect an existing SDK script.
pub const DEFAULT_SCRIPT_ID: &str = "facebook-jssdk";
/// Budget for the whole bootstrap handshake.
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(10);
/// Window event dispatched once the SDK is ready.
pub const DEFAULT_READY_EVENT: &str = "fb-sdk-ready";
/// Permissions requested when the caller does not ask for specific ones.
pub const DEFAULT_SCOPES: [&str; 2] = ["email", "public_profile"];

/// Settings for loading and initialising the SDK.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SdkConfig {
    /// Facebook application identifier; `None` disables the gate.
    pub app_id: Option<String>,
    /// Graph API version.
    pub version: String,
    /// Script URL.
    pub script_src: String,
    /// Script element id.
    pub script_id: String,
    /// `FB.init` cookie flag.
    pub cookie: bool,
    /// `FB.init` xfbml flag.
    pub xfbml: bool,
    /// `FB.init` status flag.
    pub status: bool,
    /// Budget from the start of loading until READY.
    pub ready_timeout: Duration,
    /// Name of the readiness event.
    pub ready_event: String,
    /// Default login scopes.
    pub default_scopes: BTreeSet<String>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            version: DEFAULT_SDK_VERSION.to_string(),
            script_src: DEFAULT_SCRIPT_SRC.to_string(),
            script_id: DEFAULT_SCRIPT_ID.to_string(),
            cookie: true,
            xfbml: true,
            status: true,
            ready_timeout: DEFAULT_READY_TIMEOUT,
            ready_event: DEFAULT_READY_EVENT.to_string(),
            default_scopes: DEFAULT_SCOPES.into_iter().map(String::from).collect(),
        }
    }
}

impl SdkConfig {
    /// Defaults with the given app id. Blank ids count as missing.
    #[must_use]
    pub fn with_app_id(app_id: Option<&str>) -> Self {
        Self {
            app_id: app_id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from),
            ..Self::default()
        }
    }

    /// Override the readiness budget.
    #[must_use]
    pub const fn ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    /// Check the configuration before any side effect happens.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first unusable field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app_id.as_deref().is_none_or(|id| id.trim().is_empty()) {
            return Err(ConfigError::MissingAppId);
        }
        if !self.version.starts_with('v') {
            return Err(ConfigError::InvalidField {
                field: "version",
                reason: "must look like v18.0",
            });
        }
        if self.script_src.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "script_src",
                reason: "must not be empty",
            });
        }
        if self.script_id.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "script_id",
                reason: "must not be empty",
            });
        }
        if self.ready_event.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "ready_event",
                reason: "must not be empty",
            });
        }
        if self.ready_timeout.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "ready_timeout",
                reason: "must be positive",
            });
        }
        Ok(())
    }

    /// Arguments for `FB.init`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingAppId`] when no app id is configured.
    pub fn init_params(&self) -> Result<InitParams, ConfigError> {
        let app_id = self.app_id.clone().ok_or(ConfigError::MissingAppId)?;
        Ok(InitParams {
            app_id,
            cookie: self.cookie,
            xfbml: self.xfbml,
            version: self.version.clone(),
            status: self.status,
        })
    }

    /// Script element description for the loader.
    #[must_use]
    pub fn script_tag(&self) -> ScriptTag {
        ScriptTag {
            id: self.script_id.clone(),
            src: self.script_src.clone(),
            async_load: true,
            defer: true,
            cross_origin: Some("anonymous".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_app_id_counts_as_missing() {
        let config = SdkConfig::with_app_id(Some("   "));
        assert_eq!(config.app_id, None);
        assert_eq!(config.validate(), Err(ConfigError::MissingAppId));
        assert_eq!(config.init_params(), Err(ConfigError::MissingAppId));
    }

    #[test]
    fn defaults_validate_once_app_id_is_set() {
        let config = SdkConfig::with_app_id(Some(" 1234 "));
        assert_eq!(config.validate(), Ok(()));
        let params = config.init_params().expect("params");
        assert_eq!(params.app_id, "1234");
        assert_eq!(params.version, DEFAULT_SDK_VERSION);
        assert!(params.cookie && params.xfbml && params.status);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = SdkConfig::with_app_id(Some("1")).ready_timeout(Duration::ZERO);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidField {
                field: "ready_timeout",
                reason: "must be positive",
            })
        );
    }

    #[test]
    fn version_must_be_prefixed() {
        let config = SdkConfig {
            version: "18.0".into(),
            ..SdkConfig::with_app_id(Some("1"))
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidField {
                field: "version",
                ..
            })
        ));
    }

    #[test]
    fn script_tag_loads_async() {
        let tag = SdkConfig::default().script_tag();
        assert_eq!(tag.id, DEFAULT_SCRIPT_ID);
        assert_eq!(tag.src, DEFAULT_SCRIPT_SRC);
        assert!(tag.async_load && tag.defer);
        assert_eq!(tag.cross_origin.as_deref(), Some("anonymous"));
    }

    #[test]
    fn default_scopes_request_email() {
        let scopes = SdkConfig::default().default_scopes;
        assert!(scopes.contains("email"));
        assert!(scopes.contains("public_profile"));
    }
}
