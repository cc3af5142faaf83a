//! Reply fixtures, gate wiring and logging helpers.

use std::rc::Rc;
use std::sync::Once;
use std::time::Duration;

use uda_fbsdk::{
    AuthResponse, Clock, ConnectionStatus, LoginStatus, SdkConfig, SdkInitGate, SdkReply,
};

use crate::fakes::{FakeDocument, FakeSdk};

/// App id used by fixture configs.
pub const TEST_APP_ID: &str = "1234567890";

static TRACING: Once = Once::new();

/// Route `tracing` output to the test harness. Safe to call from every test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Default config carrying [`TEST_APP_ID`].
#[must_use]
pub fn test_config() -> SdkConfig {
    SdkConfig::with_app_id(Some(TEST_APP_ID))
}

/// Connected reply carrying `token`.
#[must_use]
pub fn connected(token: &str) -> SdkReply {
    Ok(LoginStatus {
        status: ConnectionStatus::Connected,
        auth_response: Some(AuthResponse {
            access_token: token.to_string(),
            expires_in: 5_183_999,
            signed_request: "signed".to_string(),
            user_id: "10001".to_string(),
        }),
    })
}

/// Reply for a user who closed the dialog or is not logged in.
#[must_use]
pub fn declined() -> SdkReply {
    Ok(LoginStatus {
        status: ConnectionStatus::Unknown,
        auth_response: None,
    })
}

/// A gate wired to fresh fakes, with handles kept for assertions.
pub struct GateHarness {
    /// Gate under test.
    pub gate: SdkInitGate,
    /// Document double.
    pub document: Rc<FakeDocument>,
    /// SDK double.
    pub sdk: Rc<FakeSdk>,
}

impl GateHarness {
    /// Wire `config` to the given fakes and clock.
    #[must_use]
    pub fn build(
        config: SdkConfig,
        document: FakeDocument,
        sdk: FakeSdk,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let document = Rc::new(document);
        let sdk = Rc::new(sdk);
        let gate = SdkInitGate::new(config, document.clone(), sdk.clone(), clock);
        Self {
            gate,
            document,
            sdk,
        }
    }

    /// Drive a pending load through the hook and the status check.
    pub fn complete_handshake(&self) {
        assert!(self.sdk.fire_bootstrap(), "bootstrap hook was not registered");
        assert!(self.sdk.answer_status(declined()), "status check was not issued");
    }
}

/// Timeout used by suites that want short budgets.
pub const SHORT_TIMEOUT: Duration = Duration::from_millis(500);
