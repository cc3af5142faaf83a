//! Scripted stand-ins for the browser document and the Facebook SDK.
//!
//! Nothing happens on its own: tests fire the bootstrap hook, script errors and
//! SDK replies explicitly, which makes every interleaving reproducible.

use std::cell::{Cell, RefCell};

use uda_fbsdk::{
    BootstrapHook, FacebookSdk, HostDocument, InitParams, LoginOptions, ScriptErrorHook,
    ScriptTag, SdkFault, SdkReply, StatusCallback,
};

/// In-memory document that records inserted scripts and announced events.
#[derive(Default)]
pub struct FakeDocument {
    scripts: RefCell<Vec<ScriptTag>>,
    preexisting: RefCell<Vec<String>>,
    error_hooks: RefCell<Vec<ScriptErrorHook>>,
    announced: RefCell<Vec<String>>,
    reject_insert: RefCell<Option<String>>,
}

impl FakeDocument {
    /// Empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Document that already carries a script element with `id`.
    #[must_use]
    pub fn with_existing_script(id: &str) -> Self {
        let document = Self::default();
        document.preexisting.borrow_mut().push(id.to_string());
        document
    }

    /// Make the next insertion fail with `reason`.
    pub fn reject_insertions(&self, reason: &str) {
        *self.reject_insert.borrow_mut() = Some(reason.to_string());
    }

    /// Number of script elements inserted through the trait.
    #[must_use]
    pub fn script_count(&self) -> usize {
        self.scripts.borrow().len()
    }

    /// Inserted script elements, in order.
    #[must_use]
    pub fn scripts(&self) -> Vec<ScriptTag> {
        self.scripts.borrow().clone()
    }

    /// Events dispatched through [`HostDocument::announce`].
    #[must_use]
    pub fn announced(&self) -> Vec<String> {
        self.announced.borrow().clone()
    }

    /// Fire the `error` event of every inserted script. Returns how many fired.
    pub fn fail_script_load(&self, reason: &str) -> usize {
        let hooks: Vec<ScriptErrorHook> = self.error_hooks.borrow_mut().drain(..).collect();
        let fired = hooks.len();
        for hook in hooks {
            hook(reason.to_string());
        }
        fired
    }
}

impl HostDocument for FakeDocument {
    fn script_present(&self, id: &str) -> bool {
        self.preexisting.borrow().iter().any(|existing| existing == id)
            || self.scripts.borrow().iter().any(|tag| tag.id == id)
    }

    fn insert_script(&self, tag: &ScriptTag, on_error: ScriptErrorHook) -> Result<(), String> {
        if let Some(reason) = self.reject_insert.borrow_mut().take() {
            return Err(reason);
        }
        self.scripts.borrow_mut().push(tag.clone());
        self.error_hooks.borrow_mut().push(on_error);
        Ok(())
    }

    fn announce(&self, event: &str) {
        self.announced.borrow_mut().push(event.to_string());
    }
}

/// Facebook SDK double that queues callbacks until the test answers them.
#[derive(Default)]
pub struct FakeSdk {
    loaded: Cell<bool>,
    hook: RefCell<Option<BootstrapHook>>,
    hook_registrations: Cell<usize>,
    init_calls: RefCell<Vec<InitParams>>,
    init_fault: RefCell<Option<SdkFault>>,
    status_callbacks: RefCell<Vec<StatusCallback>>,
    status_calls: Cell<usize>,
    login_callbacks: RefCell<Vec<StatusCallback>>,
    login_calls: RefCell<Vec<LoginOptions>>,
    login_fault: RefCell<Option<SdkFault>>,
    retained_callbacks: RefCell<Vec<StatusCallback>>,
    immediate_status: RefCell<Option<SdkReply>>,
    immediate_login: RefCell<Option<SdkReply>>,
}

impl FakeSdk {
    /// SDK whose script has not executed yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// SDK whose `FB` global is already installed.
    #[must_use]
    pub fn preloaded() -> Self {
        let sdk = Self::default();
        sdk.loaded.set(true);
        sdk
    }

    /// Loaded SDK that invokes status and login callbacks before returning.
    #[must_use]
    pub fn answering_synchronously(status: SdkReply, login: SdkReply) -> Self {
        let sdk = Self::preloaded();
        *sdk.immediate_status.borrow_mut() = Some(status);
        *sdk.immediate_login.borrow_mut() = Some(login);
        sdk
    }

    /// Make `FB.init` throw.
    pub fn fail_init(&self, fault: SdkFault) {
        *self.init_fault.borrow_mut() = Some(fault);
    }

    /// Make the next `FB.login` throw synchronously. The callback is kept and
    /// never called, like a closure already handed to the page.
    pub fn fail_login(&self, fault: SdkFault) {
        *self.login_fault.borrow_mut() = Some(fault);
    }

    /// Simulate the script executing: install `FB` and call the hook.
    /// Returns `false` when no hook was registered.
    pub fn fire_bootstrap(&self) -> bool {
        self.loaded.set(true);
        let hook = self.hook.borrow_mut().take();
        hook.is_some_and(|hook| {
            hook();
            true
        })
    }

    /// Answer the oldest pending `getLoginStatus` call.
    /// Returns `false` when nothing was pending.
    pub fn answer_status(&self, reply: SdkReply) -> bool {
        let callback = pop_front(&self.status_callbacks);
        callback.is_some_and(|callback| {
            callback(reply);
            true
        })
    }

    /// Answer the oldest pending `FB.login` call.
    /// Returns `false` when nothing was pending.
    pub fn answer_login(&self, reply: SdkReply) -> bool {
        let callback = pop_front(&self.login_callbacks);
        callback.is_some_and(|callback| {
            callback(reply);
            true
        })
    }

    /// Drop the oldest pending `FB.login` callback without calling it.
    pub fn drop_login_callback(&self) -> bool {
        pop_front(&self.login_callbacks).is_some()
    }

    /// How many times the bootstrap hook was registered.
    #[must_use]
    pub fn hook_registrations(&self) -> usize {
        self.hook_registrations.get()
    }

    /// Arguments of every `FB.init` call.
    #[must_use]
    pub fn init_calls(&self) -> Vec<InitParams> {
        self.init_calls.borrow().clone()
    }

    /// Number of `FB.getLoginStatus` calls.
    #[must_use]
    pub fn status_calls(&self) -> usize {
        self.status_calls.get()
    }

    /// Callbacks kept by a throwing `FB.login` and never invoked.
    #[must_use]
    pub fn retained_callbacks(&self) -> usize {
        self.retained_callbacks.borrow().len()
    }

    /// Options of every `FB.login` call.
    #[must_use]
    pub fn login_calls(&self) -> Vec<LoginOptions> {
        self.login_calls.borrow().clone()
    }
}

fn pop_front(queue: &RefCell<Vec<StatusCallback>>) -> Option<StatusCallback> {
    let mut queue = queue.borrow_mut();
    if queue.is_empty() {
        None
    } else {
        Some(queue.remove(0))
    }
}

impl FacebookSdk for FakeSdk {
    fn is_loaded(&self) -> bool {
        self.loaded.get()
    }

    fn register_bootstrap_hook(&self, hook: BootstrapHook) -> Result<(), SdkFault> {
        self.hook_registrations.set(self.hook_registrations.get() + 1);
        *self.hook.borrow_mut() = Some(hook);
        Ok(())
    }

    fn init(&self, params: &InitParams) -> Result<(), SdkFault> {
        self.init_calls.borrow_mut().push(params.clone());
        match self.init_fault.borrow_mut().take() {
            Some(fault) => Err(fault),
            None => Ok(()),
        }
    }

    fn get_login_status(&self, callback: StatusCallback) -> Result<(), SdkFault> {
        if !self.loaded.get() {
            return Err(SdkFault::Missing);
        }
        self.status_calls.set(self.status_calls.get() + 1);
        let immediate = self.immediate_status.borrow().clone();
        match immediate {
            Some(reply) => callback(reply),
            None => self.status_callbacks.borrow_mut().push(callback),
        }
        Ok(())
    }

    fn login(&self, options: &LoginOptions, callback: StatusCallback) -> Result<(), SdkFault> {
        if !self.loaded.get() {
            return Err(SdkFault::Missing);
        }
        self.login_calls.borrow_mut().push(options.clone());
        let fault = self.login_fault.borrow_mut().take();
        if let Some(fault) = fault {
            self.retained_callbacks.borrow_mut().push(callback);
            return Err(fault);
        }
        let immediate = self.immediate_login.borrow().clone();
        match immediate {
            Some(reply) => callback(reply),
            None => self.login_callbacks.borrow_mut().push(callback),
        }
        Ok(())
    }
}
