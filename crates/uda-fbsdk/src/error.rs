//! Error types for the SDK readiness gate and the login adapter.

use thiserror::Error;

/// Invalid or incomplete SDK configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No application identifier was supplied at build or run time.
    #[error("facebook app id is not configured")]
    MissingAppId,
    /// Field contained an invalid value.
    #[error("invalid sdk configuration field")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
}

/// Terminal failure of the readiness gate. Sticky for the page lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// The script resource failed to load (network, CSP, blocker).
    #[error("facebook sdk script failed to load: {reason}")]
    LoadFailure {
        /// Detail reported by the document.
        reason: String,
    },
    /// The bootstrap handshake did not complete within the configured budget.
    #[error("facebook sdk did not become ready within {timeout_ms}ms")]
    InitTimeout {
        /// Budget that elapsed, in milliseconds.
        timeout_ms: u64,
    },
    /// The SDK rejected or threw during initialisation.
    #[error("facebook sdk initialisation failed: {detail}")]
    InitFailed {
        /// Detail reported by the SDK.
        detail: String,
    },
    /// Configuration was unusable, so loading never started.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GateError {
    /// Whether the UI should treat this as a failed script load.
    #[must_use]
    pub const fn is_load_failure(&self) -> bool {
        matches!(self, Self::LoadFailure { .. } | Self::InitTimeout { .. })
    }

    /// Message suitable for showing to the member.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::LoadFailure { .. } | Self::InitTimeout { .. } => {
                "Facebook could not be loaded. Please reload the page."
            }
            Self::InitFailed { .. } => "Facebook login failed to start. Please reload the page.",
            Self::Config(_) => "Facebook login is not configured for this site.",
        }
    }
}

/// Fault raised by a call into the SDK, or by its reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdkFault {
    /// The SDK global is not installed.
    #[error("facebook sdk global is missing")]
    Missing,
    /// The SDK threw synchronously.
    #[error("facebook sdk call threw: {0}")]
    Threw(String),
    /// The SDK replied with data that could not be decoded.
    #[error("malformed facebook sdk reply: {0}")]
    Malformed(String),
    /// The SDK released the callback without invoking it.
    #[error("facebook sdk dropped the callback")]
    Dropped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_count_as_load_failures() {
        assert!(GateError::InitTimeout { timeout_ms: 10 }.is_load_failure());
        assert!(
            GateError::LoadFailure {
                reason: "blocked".into()
            }
            .is_load_failure()
        );
        assert!(
            !GateError::InitFailed {
                detail: "boom".into()
            }
            .is_load_failure()
        );
        assert!(!GateError::Config(ConfigError::MissingAppId).is_load_failure());
    }

    #[test]
    fn load_failures_ask_for_reload() {
        let err = GateError::InitTimeout { timeout_ms: 10_000 };
        assert!(err.user_message().contains("reload"));
        assert_eq!(
            err.to_string(),
            "facebook sdk did not become ready within 10000ms"
        );
    }

    #[test]
    fn config_errors_are_transparent() {
        let err = GateError::from(ConfigError::MissingAppId);
        assert_eq!(err.to_string(), "facebook app id is not configured");
    }
}
