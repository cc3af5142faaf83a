//! Session primitives shared across the UI.
//!
//! # Design
//! - Keep tokens as plain data so callers can store/clear them without side effects.
//! - Treat blank tokens as signed out at the call site.
//! - Leave header encoding to the transport client to keep core DOM-free.

use uda_api_models::{AuthResponse, UserProfile};

/// Tokens persisted between page loads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionTokens {
    /// Bearer access token.
    pub token: String,
    /// Refresh token, when the server issued one.
    pub refresh_token: Option<String>,
}

impl SessionTokens {
    #[must_use]
    /// Whether the access token is usable.
    pub fn has_credentials(&self) -> bool {
        !self.token.trim().is_empty()
    }

    #[must_use]
    /// Refresh token, if present and non-blank.
    pub fn refresh(&self) -> Option<&str> {
        self.refresh_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
    }
}

impl From<&AuthResponse> for SessionTokens {
    fn from(session: &AuthResponse) -> Self {
        Self {
            token: session.token.clone(),
            refresh_token: Some(session.refresh_token.clone()),
        }
    }
}

/// What the shell renders.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    /// Stored tokens are being checked against `/auth/me`.
    Restoring,
    /// No usable session.
    SignedOut,
    /// A member is signed in.
    SignedIn(UserProfile),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn member() -> UserProfile {
        UserProfile {
            id: Uuid::nil(),
            email: Some("rider@example.mn".into()),
            last_name: "Bat".into(),
            first_name: "Bold".into(),
            phone: None,
            avatar_url: None,
            strava_url: None,
            is_private: false,
            is_ride_leader: false,
            is_admin: false,
            total_distance_km: 0.0,
            total_rides: 0,
            created_at: Utc.timestamp_opt(0, 0).single().unwrap_or_default(),
        }
    }

    #[test]
    fn blank_token_has_no_credentials() {
        let tokens = SessionTokens {
            token: "  ".into(),
            refresh_token: Some(String::new()),
        };
        assert!(!tokens.has_credentials());
        assert_eq!(tokens.refresh(), None);
    }

    #[test]
    fn tokens_copy_from_auth_response() {
        let session = AuthResponse {
            token: "access".into(),
            refresh_token: "refresh".into(),
            user: member(),
        };
        let tokens = SessionTokens::from(&session);
        assert!(tokens.has_credentials());
        assert_eq!(tokens.refresh(), Some("refresh"));
    }
}
