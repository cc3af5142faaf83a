//! Persistence and environment helpers for the app shell.

use crate::core::config::{API_BASE_META, APP_ID_META, UiConfig};
use crate::core::session::SessionTokens;
use crate::services::facebook::describe;
use gloo::console;
use gloo::storage::{LocalStorage, Storage};
use gloo::utils::document;

/// Keys shared with the rest of the club site, which reads them unprefixed.
pub(crate) const TOKEN_KEY: &str = "token";
pub(crate) const REFRESH_TOKEN_KEY: &str = "refresh_token";

pub(crate) fn load_ui_config() -> UiConfig {
    UiConfig::resolve(
        meta_content(APP_ID_META).as_deref(),
        option_env!("UDA_FACEBOOK_APP_ID"),
        meta_content(API_BASE_META).as_deref(),
    )
}

fn meta_content(name: &str) -> Option<String> {
    document()
        .query_selector(&format!("meta[name=\"{name}\"]"))
        .ok()
        .flatten()
        .and_then(|meta| meta.get_attribute("content"))
}

pub(crate) fn load_session_tokens() -> Option<SessionTokens> {
    let tokens = SessionTokens {
        token: get_raw(TOKEN_KEY)?,
        refresh_token: get_raw(REFRESH_TOKEN_KEY),
    };
    tokens.has_credentials().then_some(tokens)
}

pub(crate) fn persist_session_tokens(tokens: &SessionTokens) {
    set_raw(TOKEN_KEY, &tokens.token);
    match tokens.refresh() {
        Some(refresh) => set_raw(REFRESH_TOKEN_KEY, refresh),
        None => delete_storage(REFRESH_TOKEN_KEY),
    }
}

pub(crate) fn clear_session_tokens() {
    delete_storage(TOKEN_KEY);
    delete_storage(REFRESH_TOKEN_KEY);
}

// Tokens are stored as bare strings, not JSON, so other pages can read them.
fn get_raw(key: &'static str) -> Option<String> {
    match LocalStorage::raw().get_item(key) {
        Ok(value) => value.filter(|value| !value.trim().is_empty()),
        Err(err) => {
            log_storage_error("get", key, &describe(&err));
            None
        }
    }
}

fn set_raw(key: &'static str, value: &str) {
    if let Err(err) = LocalStorage::raw().set_item(key, value) {
        log_storage_error("set", key, &describe(&err));
    }
}

fn delete_storage(key: &'static str) {
    LocalStorage::delete(key);
}

fn log_storage_error(operation: &'static str, key: &'static str, detail: &str) {
    console::error!("storage operation failed", operation, key, detail);
}
