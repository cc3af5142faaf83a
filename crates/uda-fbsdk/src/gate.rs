//! Single-shot readiness gate for the Facebook SDK.
//!
//! # Design
//! - One gate per page. All state sits behind one `Rc`; SDK and document
//!   callbacks only hold a `Weak` to it.
//! - State lives in a `tokio::sync::watch` channel: every waiter observes the
//!   same transition, and late observers read the settled value directly.
//! - READY needs both the bootstrap hook and the status-check round trip.
//! - Waiters race the state change against a shared deadline; whoever reaches
//!   the deadline first fails the gate for everyone.
//! - Never hold a watch or `RefCell` borrow across a call into the SDK or the
//!   document: their callbacks may run synchronously.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use futures::future::{Either, select};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::SdkConfig;
use crate::error::GateError;
use crate::loader::{ScriptInsertion, ScriptLoader};
use crate::sdk::{FacebookSdk, HostDocument, LoginStatus, SdkReply};
use crate::state::SdkLoadState;

struct GateInner {
    config: SdkConfig,
    loader: ScriptLoader,
    sdk: Rc<dyn FacebookSdk>,
    clock: Rc<dyn Clock>,
    state: watch::Sender<SdkLoadState>,
    deadline: Cell<Option<Duration>>,
    login_status: RefCell<Option<LoginStatus>>,
    login_in_flight: Cell<bool>,
}

/// Shared handle to the page's SDK gate. Clones share state.
#[derive(Clone)]
pub struct SdkInitGate {
    inner: Rc<GateInner>,
}

/// Holds the login slot until dropped. Owns only a `Weak`, so it can travel
/// with the callback handed to the SDK.
pub(crate) struct LoginSlot {
    gate: Weak<GateInner>,
}

impl Drop for LoginSlot {
    fn drop(&mut self) {
        if let Some(inner) = self.gate.upgrade() {
            inner.login_in_flight.set(false);
        }
    }
}

/// Read-only view of the gate state for UI observers.
#[derive(Clone, Debug)]
pub struct ReadinessWatch {
    receiver: watch::Receiver<SdkLoadState>,
}

impl ReadinessWatch {
    /// State at this instant.
    #[must_use]
    pub fn current(&self) -> SdkLoadState {
        self.receiver.borrow().clone()
    }

    /// Wait for the next transition and return the new state.
    ///
    /// Returns `None` once the gate has been dropped.
    pub async fn changed(&mut self) -> Option<SdkLoadState> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}

impl SdkInitGate {
    /// Build an idle gate. Nothing is loaded until [`Self::acquire_ready`].
    #[must_use]
    pub fn new(
        config: SdkConfig,
        document: Rc<dyn HostDocument>,
        sdk: Rc<dyn FacebookSdk>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let loader = ScriptLoader::new(document, config.script_tag());
        let (state, _) = watch::channel(SdkLoadState::Unloaded);
        Self {
            inner: Rc::new(GateInner {
                config,
                loader,
                sdk,
                clock,
                state,
                deadline: Cell::new(None),
                login_status: RefCell::new(None),
                login_in_flight: Cell::new(false),
            }),
        }
    }

    /// Current load state.
    #[must_use]
    pub fn state(&self) -> SdkLoadState {
        self.inner.state.borrow().clone()
    }

    /// Whether the SDK can be called.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(*self.inner.state.borrow(), SdkLoadState::Ready)
    }

    /// Observe state transitions without driving the load.
    #[must_use]
    pub fn subscribe(&self) -> ReadinessWatch {
        ReadinessWatch {
            receiver: self.inner.state.subscribe(),
        }
    }

    /// Status reported by the bootstrap status check, once READY.
    #[must_use]
    pub fn login_status(&self) -> Option<LoginStatus> {
        self.inner.login_status.borrow().clone()
    }

    /// Configuration the gate was built with.
    #[must_use]
    pub fn config(&self) -> &SdkConfig {
        &self.inner.config
    }

    /// Start loading on first use and wait until the SDK is ready.
    ///
    /// Every caller, concurrent or late, gets the same outcome. Settled gates
    /// answer without suspending.
    ///
    /// # Errors
    ///
    /// Returns the sticky [`GateError`] once the gate has failed.
    pub async fn acquire_ready(&self) -> Result<(), GateError> {
        let state = self.state();
        if let Some(outcome) = state.outcome() {
            return outcome;
        }
        if state == SdkLoadState::Unloaded {
            self.begin_load();
        }
        self.wait_settled().await
    }

    pub(crate) fn sdk(&self) -> &Rc<dyn FacebookSdk> {
        &self.inner.sdk
    }

    /// Claim the process-wide login slot. `None` if a login is already pending.
    pub(crate) fn claim_login(&self) -> Option<LoginSlot> {
        if self.inner.login_in_flight.replace(true) {
            return None;
        }
        Some(LoginSlot { gate: self.weak() })
    }

    fn advance(&self, next: SdkLoadState) -> bool {
        self.inner.state.send_if_modified(|current| {
            if !current.can_advance_to(&next) {
                debug!(from = current.label(), to = next.label(), "ignored sdk transition");
                return false;
            }
            debug!(from = current.label(), to = next.label(), "sdk transition");
            *current = next;
            true
        })
    }

    fn fail(&self, err: GateError) {
        let message = err.to_string();
        if self.advance(SdkLoadState::Failed(err)) {
            warn!(error = %message, "facebook sdk unavailable");
        }
    }

    fn weak(&self) -> Weak<GateInner> {
        Rc::downgrade(&self.inner)
    }

    fn upgrade(weak: &Weak<GateInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    fn begin_load(&self) {
        if let Err(err) = self.inner.config.validate() {
            self.fail(err.into());
            return;
        }
        if !self.advance(SdkLoadState::Loading) {
            return;
        }
        let deadline = self.inner.clock.now() + self.inner.config.ready_timeout;
        self.inner.deadline.set(Some(deadline));

        if self.inner.sdk.is_loaded() {
            debug!("sdk global already installed; bootstrapping directly");
            self.bootstrap();
            return;
        }

        let weak = self.weak();
        let hook = Box::new(move || {
            if let Some(gate) = Self::upgrade(&weak) {
                gate.bootstrap();
            }
        });
        if let Err(fault) = self.inner.sdk.register_bootstrap_hook(hook) {
            self.fail(GateError::LoadFailure {
                reason: fault.to_string(),
            });
            return;
        }

        let weak = self.weak();
        let on_error = Box::new(move |reason: String| {
            if let Some(gate) = Self::upgrade(&weak) {
                gate.fail(GateError::LoadFailure { reason });
            }
        });
        match self.inner.loader.ensure_script_present(on_error) {
            Ok(ScriptInsertion::Inserted) => {}
            Ok(ScriptInsertion::AlreadyPresent) => {
                debug!("waiting on a script inserted by earlier markup");
            }
            Err(err) => self.fail(err),
        }
    }

    /// Phase one: the SDK's bootstrap hook fired.
    fn bootstrap(&self) {
        if self.state() != SdkLoadState::Loading {
            debug!(state = self.state().label(), "bootstrap hook ignored");
            return;
        }
        if self.remaining().is_zero() {
            self.fail(self.timeout_error());
            return;
        }
        let params = match self.inner.config.init_params() {
            Ok(params) => params,
            Err(err) => {
                self.fail(err.into());
                return;
            }
        };
        if let Err(fault) = self.inner.sdk.init(&params) {
            self.fail(GateError::InitFailed {
                detail: fault.to_string(),
            });
            return;
        }
        if !self.advance(SdkLoadState::LoadedUninitialized) {
            return;
        }

        let weak = self.weak();
        let callback = Box::new(move |reply: SdkReply| {
            if let Some(gate) = Self::upgrade(&weak) {
                gate.complete_handshake(reply);
            }
        });
        if let Err(fault) = self.inner.sdk.get_login_status(callback) {
            self.fail(GateError::InitFailed {
                detail: fault.to_string(),
            });
        }
    }

    /// Phase two: the status check answered, so the SDK session is queryable.
    fn complete_handshake(&self, reply: SdkReply) {
        if self.state() != SdkLoadState::LoadedUninitialized {
            debug!(state = self.state().label(), "late status-check reply ignored");
            return;
        }
        if self.remaining().is_zero() {
            self.fail(self.timeout_error());
            return;
        }
        match reply {
            Ok(status) => {
                debug!(status = ?status.status, "sdk status check answered");
                *self.inner.login_status.borrow_mut() = Some(status);
            }
            Err(fault) => warn!(%fault, "sdk status check reply unreadable"),
        }
        if self.advance(SdkLoadState::Ready) {
            info!("facebook sdk ready");
            self.inner
                .loader
                .document()
                .announce(&self.inner.config.ready_event);
        }
    }

    fn timeout_error(&self) -> GateError {
        let timeout_ms =
            u64::try_from(self.inner.config.ready_timeout.as_millis()).unwrap_or(u64::MAX);
        GateError::InitTimeout { timeout_ms }
    }

    fn remaining(&self) -> Duration {
        let deadline = self
            .inner
            .deadline
            .get()
            .unwrap_or(self.inner.config.ready_timeout);
        deadline.saturating_sub(self.inner.clock.now())
    }

    async fn wait_settled(&self) -> Result<(), GateError> {
        let mut receiver = self.inner.state.subscribe();
        loop {
            let settled = receiver.borrow_and_update().outcome();
            if let Some(outcome) = settled {
                return outcome;
            }
            let remaining = self.remaining();
            if remaining.is_zero() {
                self.fail(self.timeout_error());
                continue;
            }
            let changed = Box::pin(receiver.changed());
            let sleep = self.inner.clock.sleep(remaining);
            if let Either::Left((Err(_), _)) = select(changed, sleep).await {
                return Err(GateError::LoadFailure {
                    reason: "readiness channel closed".to_string(),
                });
            }
        }
    }
}
