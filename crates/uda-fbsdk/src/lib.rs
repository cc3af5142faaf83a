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
#![allow(clippy::module_name_repetitions)]
//! Readiness gate and login adapter for the Facebook JS SDK.
//!
//! The crate is DOM-free: the browser document and the `FB` global sit behind
//! [`HostDocument`] and [`FacebookSdk`], so the protocol runs natively in tests
//! and against `web-sys` bindings in the browser.
//!
//! Layout: `config.rs` (defaults), `error.rs` (taxonomy), `state.rs` (state
//! machine), `loader.rs` (script insertion), `gate.rs` (readiness gate),
//! `login.rs` (login invoker), `callback.rs` (callback adapter), `clock.rs`
//! (time seam), `sdk.rs` (SDK seams and wire shapes).

pub mod callback;
pub mod clock;
pub mod config;
pub mod error;
pub mod gate;
pub mod loader;
pub mod login;
pub mod sdk;
pub mod state;

pub use clock::Clock;
#[cfg(not(target_arch = "wasm32"))]
pub use clock::TokioClock;
pub use config::SdkConfig;
pub use error::{ConfigError, GateError, SdkFault};
pub use gate::{ReadinessWatch, SdkInitGate};
pub use loader::{ScriptInsertion, ScriptLoader};
pub use login::{LoginInvoker, LoginOutcome, UnavailableReason};
pub use sdk::{
    AuthResponse, BootstrapHook, ConnectionStatus, FacebookSdk, HostDocument, InitParams,
    LoginOptions, LoginStatus, ScriptErrorHook, ScriptTag, SdkReply, StatusCallback,
};
pub use state::SdkLoadState;
