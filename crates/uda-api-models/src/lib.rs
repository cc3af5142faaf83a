#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the club's `/api/v1/auth` endpoints.
//!
//! The web client encodes requests and decodes responses through these types
//! so the wire contract lives in one place.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error document returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorBody {
    /// Human-readable message, already localised by the server.
    pub error: String,
}

/// `POST /auth/facebook` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacebookLoginRequest {
    /// User access token obtained from the Facebook SDK.
    pub access_token: String,
}

/// `POST /auth/login` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account email; the server lowercases and trims it.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// `POST /auth/register` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    /// Account email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
    /// Family name.
    pub last_name: String,
    /// Given name.
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional phone number.
    pub phone: Option<String>,
}

/// `POST /auth/refresh` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshRequest {
    /// Refresh token issued with the last session.
    pub refresh_token: String,
}

/// `PUT /auth/me` body. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New family name.
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New given name.
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New phone number.
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New avatar URL.
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New Strava profile URL.
    pub strava_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Hide name and contact details from other members.
    pub is_private: Option<bool>,
}

/// Member profile as returned by the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    /// Member identifier.
    pub id: Uuid,
    #[serde(default)]
    /// Email; omitted for private profiles seen by other members.
    pub email: Option<String>,
    /// Family name (masked for private profiles).
    pub last_name: String,
    /// Given name (masked for private profiles).
    pub first_name: String,
    #[serde(default)]
    /// Phone number.
    pub phone: Option<String>,
    #[serde(default)]
    /// Avatar URL.
    pub avatar_url: Option<String>,
    #[serde(default)]
    /// Strava profile URL.
    pub strava_url: Option<String>,
    /// Whether the profile is private.
    pub is_private: bool,
    /// Whether the member may lead rides.
    pub is_ride_leader: bool,
    /// Whether the member administers the club.
    pub is_admin: bool,
    /// Lifetime distance ridden with the club.
    pub total_distance_km: f64,
    /// Lifetime number of completed club rides.
    pub total_rides: u32,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// "First Last", trimmed when either part is empty.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Session issued by login, register, refresh and the Facebook exchange.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    /// Bearer access token.
    pub token: String,
    /// Token used with `POST /auth/refresh`.
    pub refresh_token: String,
    /// Signed-in member.
    pub user: UserProfile,
}
