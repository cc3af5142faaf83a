//! Page-wide Facebook SDK gate.

use std::cell::OnceCell;
use std::rc::Rc;

use uda_fbsdk::{LoginInvoker, SdkInitGate};

use crate::app::preferences::load_ui_config;
use crate::services::facebook::{BrowserClock, BrowserDocument, BrowserSdk};

thread_local! {
    static FACEBOOK: OnceCell<LoginInvoker> = const { OnceCell::new() };
}

/// The page's single invoker. The first call builds the gate; nothing loads
/// until someone calls `acquire_ready`.
pub(crate) fn facebook() -> LoginInvoker {
    FACEBOOK.with(|cell| cell.get_or_init(build).clone())
}

fn build() -> LoginInvoker {
    let config = load_ui_config();
    let gate = SdkInitGate::new(
        config.sdk_config(),
        Rc::new(BrowserDocument),
        Rc::new(BrowserSdk),
        Rc::new(BrowserClock::new()),
    );
    LoginInvoker::new(gate)
}
