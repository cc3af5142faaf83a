//! Seams to the browser document and the Facebook JS SDK.
//!
//! # Design
//! - Keep the raw SDK surface behind two object-safe traits so the gate runs
//!   natively under test and against `window.FB` in the browser.
//! - Replies arrive as `Result<LoginStatus, SdkFault>`; decoding the JS object
//!   into [`LoginStatus`] is the binding's job.
//! - Callbacks are `FnOnce`: the SDK replies at most once per call.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::SdkFault;

/// Reply delivered by `getLoginStatus` and `login`.
pub type SdkReply = Result<LoginStatus, SdkFault>;

/// Callback receiving a single SDK reply.
pub type StatusCallback = Box<dyn FnOnce(SdkReply)>;

/// Hook the SDK invokes once its script has executed.
pub type BootstrapHook = Box<dyn FnOnce()>;

/// Hook the document invokes when the script element reports an error.
pub type ScriptErrorHook = Box<dyn FnOnce(String)>;

/// Session status reported by the SDK.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// Logged into Facebook and authorised for the app.
    Connected,
    /// Logged into Facebook but the app is not authorised.
    NotAuthorized,
    /// Not logged into Facebook, or a status this client does not know.
    #[serde(other)]
    Unknown,
}

/// Authorisation details attached to a connected status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// User access token to exchange with the backend.
    pub access_token: String,
    /// Seconds until the token expires.
    #[serde(default)]
    pub expires_in: u64,
    /// Signed request blob.
    #[serde(default)]
    pub signed_request: String,
    /// App-scoped Facebook user id.
    #[serde(rename = "userID", default)]
    pub user_id: String,
}

/// Payload of a status-check or login reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginStatus {
    /// Connection status.
    pub status: ConnectionStatus,
    /// Present only when the user authorised the app.
    #[serde(default)]
    pub auth_response: Option<AuthResponse>,
}

impl LoginStatus {
    /// Access token carried by the reply, if any.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.auth_response
            .as_ref()
            .map(|auth| auth.access_token.as_str())
    }
}

/// Arguments of `FB.init`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitParams {
    /// Facebook application identifier.
    pub app_id: String,
    /// Enable cookies so the server can read the session.
    pub cookie: bool,
    /// Parse XFBML social plugins.
    pub xfbml: bool,
    /// Graph API version, e.g. `v18.0`.
    pub version: String,
    /// Fetch the login status during init.
    pub status: bool,
}

/// Options of `FB.login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginOptions {
    /// Comma-separated permission scopes.
    pub scope: String,
    /// Ask the SDK to report the granted scopes.
    pub return_scopes: bool,
}

impl LoginOptions {
    /// Build options for a scope set. `BTreeSet` keeps the join order stable.
    #[must_use]
    pub fn for_scopes(scopes: &BTreeSet<String>) -> Self {
        Self {
            scope: scopes
                .iter()
                .map(|scope| scope.trim())
                .filter(|scope| !scope.is_empty())
                .collect::<Vec<_>>()
                .join(","),
            return_scopes: false,
        }
    }
}

/// Attributes of the SDK `<script>` element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptTag {
    /// Element id used for the presence check.
    pub id: String,
    /// Script source URL.
    pub src: String,
    /// Load without blocking the parser.
    pub async_load: bool,
    /// Defer execution until the document is parsed.
    pub defer: bool,
    /// `crossorigin` attribute value.
    pub cross_origin: Option<String>,
}

/// The parts of the document the gate touches.
pub trait HostDocument {
    /// Whether an element with `id` already exists.
    fn script_present(&self, id: &str) -> bool;

    /// Insert `tag` before the first script element, or into `<head>` when there
    /// is none. `on_error` fires if the resource later fails to load.
    ///
    /// # Errors
    ///
    /// Returns a description when the element cannot be created or inserted.
    fn insert_script(&self, tag: &ScriptTag, on_error: ScriptErrorHook) -> Result<(), String>;

    /// Broadcast a named readiness event to non-Rust listeners.
    fn announce(&self, event: &str);
}

/// The Facebook JS SDK surface used by the gate and the login invoker.
pub trait FacebookSdk {
    /// Whether the `FB` global is already installed.
    fn is_loaded(&self) -> bool;

    /// Register the global bootstrap hook (`window.fbAsyncInit`).
    ///
    /// # Errors
    ///
    /// Returns [`SdkFault`] when the hook cannot be installed.
    fn register_bootstrap_hook(&self, hook: BootstrapHook) -> Result<(), SdkFault>;

    /// Call `FB.init`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkFault`] when the SDK is missing or throws.
    fn init(&self, params: &InitParams) -> Result<(), SdkFault>;

    /// Call `FB.getLoginStatus`; `callback` receives the reply.
    ///
    /// # Errors
    ///
    /// Returns [`SdkFault`] when the SDK is missing or throws synchronously.
    fn get_login_status(&self, callback: StatusCallback) -> Result<(), SdkFault>;

    /// Call `FB.login`; `callback` receives the reply.
    ///
    /// # Errors
    ///
    /// Returns [`SdkFault`] when the SDK is missing or throws synchronously.
    fn login(&self, options: &LoginOptions, callback: StatusCallback) -> Result<(), SdkFault>;
}
