//! Login round trip through a ready SDK.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::callback::reply_channel;
use crate::error::SdkFault;
use crate::gate::SdkInitGate;
use crate::sdk::{LoginOptions, SdkReply, StatusCallback};

/// Why a login could not produce a token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnavailableReason {
    /// The gate is not READY yet.
    NotReady,
    /// Another login is still waiting on the SDK.
    InProgress,
    /// The SDK threw or replied with unusable data.
    Sdk(SdkFault),
}

impl Display for UnavailableReason {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => formatter.write_str("not ready"),
            Self::InProgress => formatter.write_str("login already in progress"),
            Self::Sdk(fault) => write!(formatter, "{fault}"),
        }
    }
}

/// Typed result of a login attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The user authorised the app; carries the user access token.
    Authorized(String),
    /// The user closed or declined the consent dialog.
    Cancelled,
    /// No login happened.
    Unavailable(UnavailableReason),
}

impl LoginOutcome {
    /// Map a raw SDK reply.
    #[must_use]
    pub fn from_reply(reply: SdkReply) -> Self {
        match reply {
            Ok(status) => match status.auth_response {
                Some(auth) if !auth.access_token.trim().is_empty() => {
                    Self::Authorized(auth.access_token)
                }
                Some(_) => Self::Unavailable(UnavailableReason::Sdk(SdkFault::Malformed(
                    "empty access token".to_string(),
                ))),
                None => Self::Cancelled,
            },
            Err(fault) => Self::Unavailable(UnavailableReason::Sdk(fault)),
        }
    }
}

/// Issues `FB.login` once the gate is READY.
#[derive(Clone)]
pub struct LoginInvoker {
    gate: SdkInitGate,
}

impl LoginInvoker {
    /// Invoker bound to `gate`.
    #[must_use]
    pub const fn new(gate: SdkInitGate) -> Self {
        Self { gate }
    }

    /// Gate this invoker checks before calling the SDK.
    #[must_use]
    pub const fn gate(&self) -> &SdkInitGate {
        &self.gate
    }

    /// Log in with the configured default scopes.
    pub async fn login_default(&self) -> LoginOutcome {
        let scopes = self.gate.config().default_scopes.clone();
        self.login(&scopes).await
    }

    /// Ask the user to log in with `scopes`.
    ///
    /// Fails fast without touching the SDK unless the gate is READY and no
    /// other login is pending. Never retries.
    ///
    /// The slot stays claimed until the SDK answers or releases the callback,
    /// even if the returned future is dropped first.
    pub async fn login(&self, scopes: &BTreeSet<String>) -> LoginOutcome {
        if !self.gate.is_ready() {
            debug!(state = self.gate.state().label(), "login refused before ready");
            return LoginOutcome::Unavailable(UnavailableReason::NotReady);
        }
        let Some(slot) = self.gate.claim_login() else {
            return LoginOutcome::Unavailable(UnavailableReason::InProgress);
        };
        let slot = Rc::new(Cell::new(Some(slot)));

        let options = LoginOptions::for_scopes(scopes);
        let (reply, pending) = reply_channel();
        let held = Rc::clone(&slot);
        let callback: StatusCallback = Box::new(move |result| {
            drop(held.take());
            reply(result);
        });
        if let Err(fault) = self.gate.sdk().login(&options, callback) {
            // A throwing SDK may keep the callback alive without ever calling it.
            drop(slot.take());
            warn!(%fault, "facebook login call failed");
            return LoginOutcome::Unavailable(UnavailableReason::Sdk(fault));
        }
        let outcome = LoginOutcome::from_reply(pending.wait().await);
        if let LoginOutcome::Unavailable(reason) = &outcome {
            warn!(%reason, "facebook login reply unusable");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::{AuthResponse, ConnectionStatus, LoginStatus};

    fn connected(token: &str) -> SdkReply {
        Ok(LoginStatus {
            status: ConnectionStatus::Connected,
            auth_response: Some(AuthResponse {
                access_token: token.to_string(),
                expires_in: 3600,
                signed_request: String::new(),
                user_id: "1".to_string(),
            }),
        })
    }

    #[test]
    fn token_maps_to_authorized() {
        assert_eq!(
            LoginOutcome::from_reply(connected("abc123")),
            LoginOutcome::Authorized("abc123".to_string())
        );
    }

    #[test]
    fn missing_auth_response_is_cancelled() {
        let reply = Ok(LoginStatus {
            status: ConnectionStatus::Unknown,
            auth_response: None,
        });
        assert_eq!(LoginOutcome::from_reply(reply), LoginOutcome::Cancelled);
    }

    #[test]
    fn empty_token_is_malformed() {
        assert!(matches!(
            LoginOutcome::from_reply(connected("  ")),
            LoginOutcome::Unavailable(UnavailableReason::Sdk(SdkFault::Malformed(_)))
        ));
    }

    #[test]
    fn faults_pass_through() {
        assert_eq!(
            LoginOutcome::from_reply(Err(SdkFault::Dropped)),
            LoginOutcome::Unavailable(UnavailableReason::Sdk(SdkFault::Dropped))
        );
    }

    #[test]
    fn reasons_render_for_logs() {
        assert_eq!(UnavailableReason::NotReady.to_string(), "not ready");
        assert_eq!(
            UnavailableReason::Sdk(SdkFault::Threw("boom".into())).to_string(),
            "facebook sdk call threw: boom"
        );
    }
}
