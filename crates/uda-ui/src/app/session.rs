//! Bridge between Facebook login, the club backend and stored tokens.

use gloo::console;
use uda_api_models::{AuthResponse, RegisterRequest, UpdateProfileRequest, UserProfile};
use uda_fbsdk::LoginInvoker;

use crate::app::preferences::{
    clear_session_tokens, load_session_tokens, load_ui_config, persist_session_tokens,
};
use crate::core::login_flow::{LoginFlowError, access_token};
use crate::core::session::{SessionState, SessionTokens};
use crate::services::api::{ApiClient, ApiError};

/// Client without credentials, pointed at the configured API base.
pub(crate) fn anonymous_client() -> ApiClient {
    ApiClient::new(load_ui_config().api_base, None)
}

/// Client carrying the stored access token, if any.
pub(crate) fn session_client() -> ApiClient {
    anonymous_client().with_token(load_session_tokens().map(|tokens| tokens.token))
}

fn establish(session: AuthResponse) -> UserProfile {
    persist_session_tokens(&SessionTokens::from(&session));
    session.user
}

/// Run the Facebook dialog on a ready SDK and exchange the token.
///
/// `Ok(None)` means the member closed the dialog.
pub(crate) async fn sign_in_with_facebook(
    invoker: &LoginInvoker,
) -> Result<Option<UserProfile>, LoginFlowError> {
    let Some(token) = access_token(invoker.login_default().await)? else {
        return Ok(None);
    };
    let session = anonymous_client().facebook(&token).await?;
    Ok(Some(establish(session)))
}

pub(crate) async fn sign_in_with_password(
    email: &str,
    password: &str,
) -> Result<UserProfile, ApiError> {
    let session = anonymous_client().login(email, password).await?;
    Ok(establish(session))
}

pub(crate) async fn register(request: &RegisterRequest) -> Result<UserProfile, ApiError> {
    let session = anonymous_client().register(request).await?;
    Ok(establish(session))
}

pub(crate) async fn update_profile(update: &UpdateProfileRequest) -> Result<UserProfile, ApiError> {
    session_client().update_me(update).await
}

/// Check stored tokens against `/auth/me`, refreshing once on 401.
/// Anything else that fails clears the stored tokens.
pub(crate) async fn restore_session() -> SessionState {
    let Some(tokens) = load_session_tokens() else {
        return SessionState::SignedOut;
    };
    let client = anonymous_client().with_token(Some(tokens.token.clone()));
    match client.me().await {
        Ok(user) => return SessionState::SignedIn(user),
        Err(err) if err.is_unauthorized() => {}
        Err(err) => console::warn!("session restore failed", err.to_string()),
    }
    if let Some(refresh) = tokens.refresh() {
        match client.refresh(refresh).await {
            Ok(session) => return SessionState::SignedIn(establish(session)),
            Err(err) => console::warn!("session refresh failed", err.to_string()),
        }
    }
    clear_session_tokens();
    SessionState::SignedOut
}

pub(crate) fn sign_out() {
    clear_session_tokens();
}
