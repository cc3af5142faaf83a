//! Facebook login flow: button state and user-facing notices.
//!
//! Kept DOM-free so the mapping from gate state and login outcomes to what the
//! member sees is covered by native tests.

use thiserror::Error;
use uda_fbsdk::{GateError, LoginOutcome, SdkLoadState, UnavailableReason};

/// Shown after the member closes the Facebook dialog.
pub const CANCELLED_MESSAGE: &str = "Facebook login was cancelled.";
const WAIT_MESSAGE: &str = "Facebook is still loading. Please wait a moment and try again.";
const IN_PROGRESS_MESSAGE: &str = "A Facebook login window is already open.";
const SDK_FAILURE_MESSAGE: &str = "Facebook login failed. Please try again.";
const BACKEND_FALLBACK_MESSAGE: &str = "Could not sign in with Facebook.";

/// Why a Facebook sign-in did not produce a session.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LoginFlowError {
    /// The SDK never became ready.
    #[error(transparent)]
    Gate(#[from] GateError),
    /// The login itself could not run or returned unusable data.
    #[error("facebook login unavailable: {0}")]
    Unavailable(UnavailableReason),
    /// The backend rejected the token exchange.
    #[error("{message}")]
    Backend {
        /// HTTP status, when a response arrived.
        status: Option<u16>,
        /// Server-provided message.
        message: String,
    },
}

/// Rendering state of the Facebook button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    /// SDK still loading; disabled with a spinner.
    Loading,
    /// Clickable.
    Ready,
    /// A login round trip is in flight; disabled.
    Busy,
    /// SDK failed; disabled with an explanation.
    Unavailable {
        /// Text shown under the button.
        message: &'static str,
        /// Offer a page reload; set when the script itself never came up.
        reload: bool,
    },
}

impl ButtonState {
    /// Whether clicks should be accepted.
    #[must_use]
    pub const fn enabled(self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Reduce gate state plus the local busy flag to a button state.
#[must_use]
pub fn button_state(load: &SdkLoadState, busy: bool) -> ButtonState {
    match load {
        SdkLoadState::Failed(err) => ButtonState::Unavailable {
            message: err.user_message(),
            reload: err.is_load_failure(),
        },
        SdkLoadState::Ready if busy => ButtonState::Busy,
        SdkLoadState::Ready => ButtonState::Ready,
        SdkLoadState::Unloaded | SdkLoadState::Loading | SdkLoadState::LoadedUninitialized => {
            ButtonState::Loading
        }
    }
}

/// Split a login outcome into a token, a cancellation, or an error.
///
/// # Errors
///
/// Returns [`LoginFlowError::Unavailable`] when no login happened.
pub fn access_token(outcome: LoginOutcome) -> Result<Option<String>, LoginFlowError> {
    match outcome {
        LoginOutcome::Authorized(token) => Ok(Some(token)),
        LoginOutcome::Cancelled => Ok(None),
        LoginOutcome::Unavailable(reason) => Err(LoginFlowError::Unavailable(reason)),
    }
}

/// Visual weight of a notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeTone {
    /// Neutral information.
    Info,
    /// Something went wrong.
    Error,
}

/// Message shown under the login controls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Visual weight.
    pub tone: NoticeTone,
    /// Text shown to the member.
    pub message: String,
}

impl Notice {
    /// Neutral notice.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            tone: NoticeTone::Info,
            message: message.into(),
        }
    }

    /// Error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            tone: NoticeTone::Error,
            message: message.into(),
        }
    }

    /// Notice for a cancelled dialog.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::info(CANCELLED_MESSAGE)
    }
}

impl From<&LoginFlowError> for Notice {
    fn from(err: &LoginFlowError) -> Self {
        match err {
            LoginFlowError::Gate(gate) => Self::error(gate.user_message()),
            LoginFlowError::Unavailable(UnavailableReason::NotReady) => Self::info(WAIT_MESSAGE),
            LoginFlowError::Unavailable(UnavailableReason::InProgress) => {
                Self::info(IN_PROGRESS_MESSAGE)
            }
            LoginFlowError::Unavailable(UnavailableReason::Sdk(_)) => {
                Self::error(SDK_FAILURE_MESSAGE)
            }
            LoginFlowError::Backend { message, .. } if message.trim().is_empty() => {
                Self::error(BACKEND_FALLBACK_MESSAGE)
            }
            LoginFlowError::Backend { message, .. } => Self::error(message.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uda_fbsdk::{ConfigError, SdkFault};

    #[test]
    fn button_is_disabled_until_ready() {
        for state in [
            SdkLoadState::Unloaded,
            SdkLoadState::Loading,
            SdkLoadState::LoadedUninitialized,
        ] {
            assert_eq!(button_state(&state, false), ButtonState::Loading);
            assert!(!button_state(&state, false).enabled());
        }
        assert!(button_state(&SdkLoadState::Ready, false).enabled());
        assert_eq!(button_state(&SdkLoadState::Ready, true), ButtonState::Busy);
    }

    #[test]
    fn failed_load_prompts_reload() {
        let failed = SdkLoadState::Failed(GateError::LoadFailure {
            reason: "blocked".into(),
        });
        match button_state(&failed, false) {
            ButtonState::Unavailable { message, reload } => {
                assert!(message.contains("reload"));
                assert!(reload);
            }
            other => panic!("unexpected state {other:?}"),
        }
        let timed_out = SdkLoadState::Failed(GateError::InitTimeout { timeout_ms: 10_000 });
        assert!(!button_state(&timed_out, true).enabled());
        assert!(matches!(
            button_state(&timed_out, false),
            ButtonState::Unavailable { reload: true, .. }
        ));
    }

    #[test]
    fn missing_configuration_does_not_offer_reload() {
        let unconfigured = SdkLoadState::Failed(GateError::Config(ConfigError::MissingAppId));
        assert_eq!(
            button_state(&unconfigured, false),
            ButtonState::Unavailable {
                message: "Facebook login is not configured for this site.",
                reload: false,
            }
        );
    }

    #[test]
    fn outcomes_split_into_token_cancel_or_error() {
        assert_eq!(
            access_token(LoginOutcome::Authorized("abc123".into())),
            Ok(Some("abc123".into()))
        );
        assert_eq!(access_token(LoginOutcome::Cancelled), Ok(None));
        assert_eq!(
            access_token(LoginOutcome::Unavailable(UnavailableReason::NotReady)),
            Err(LoginFlowError::Unavailable(UnavailableReason::NotReady))
        );
    }

    #[test]
    fn notices_distinguish_waiting_from_failure() {
        let waiting = Notice::from(&LoginFlowError::Unavailable(UnavailableReason::NotReady));
        assert_eq!(waiting.tone, NoticeTone::Info);
        let busy = Notice::from(&LoginFlowError::Unavailable(UnavailableReason::InProgress));
        assert_eq!(busy.tone, NoticeTone::Info);
        let threw = Notice::from(&LoginFlowError::Unavailable(UnavailableReason::Sdk(
            SdkFault::Threw("popup blocked".into()),
        )));
        assert_eq!(threw, Notice::error(SDK_FAILURE_MESSAGE));
        assert_eq!(Notice::cancelled().tone, NoticeTone::Info);
    }

    #[test]
    fn backend_message_is_shown_verbatim() {
        let err = LoginFlowError::Backend {
            status: Some(401),
            message: "Invalid Facebook access token".into(),
        };
        assert_eq!(err.to_string(), "Invalid Facebook access token");
        assert_eq!(
            Notice::from(&err),
            Notice::error("Invalid Facebook access token")
        );
        let blank = LoginFlowError::Backend {
            status: None,
            message: String::new(),
        };
        assert_eq!(Notice::from(&blank), Notice::error(BACKEND_FALLBACK_MESSAGE));
    }
}
