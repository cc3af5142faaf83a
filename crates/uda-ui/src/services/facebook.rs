//! `web-sys` / `js-sys` bindings for the document and the `FB` global.
//!
//! These are the only places that touch the real page. Everything else talks to
//! the gate through the [`HostDocument`], [`FacebookSdk`] and [`Clock`] seams.

use std::time::Duration;

use futures::future::LocalBoxFuture;
use gloo::events::EventListener;
use gloo::utils::{document, window};
use gloo_timers::future::TimeoutFuture;
use js_sys::{Date, Function, Reflect};
use serde::Serialize;
use uda_fbsdk::{
    BootstrapHook, Clock, FacebookSdk, HostDocument, InitParams, LoginOptions, LoginStatus,
    ScriptErrorHook, ScriptTag, SdkFault, SdkReply, StatusCallback,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, HtmlScriptElement};

const FB_GLOBAL: &str = "FB";
const BOOTSTRAP_GLOBAL: &str = "fbAsyncInit";

/// Best-effort text for a thrown JS value.
pub(crate) fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| String::from(err.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// The live `document`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserDocument;

impl HostDocument for BrowserDocument {
    fn script_present(&self, id: &str) -> bool {
        document().get_element_by_id(id).is_some()
    }

    fn insert_script(&self, tag: &ScriptTag, on_error: ScriptErrorHook) -> Result<(), String> {
        let document = document();
        let script: HtmlScriptElement = document
            .create_element("script")
            .map_err(|err| describe(&err))?
            .dyn_into()
            .map_err(|_| "created element is not a <script>".to_string())?;
        script.set_id(&tag.id);
        script.set_src(&tag.src);
        script.set_async(tag.async_load);
        script.set_defer(tag.defer);
        if let Some(cross_origin) = &tag.cross_origin {
            script.set_cross_origin(Some(cross_origin.as_str()));
        }

        let src = tag.src.clone();
        EventListener::once(&script, "error", move |_| {
            on_error(format!("could not load {src}"));
        })
        .forget();

        let anchor = document.get_elements_by_tag_name("script").item(0);
        match anchor.and_then(|first| first.parent_node().map(|parent| (first, parent))) {
            Some((first, parent)) => parent
                .insert_before(&script, Some(first.as_ref()))
                .map(|_| ())
                .map_err(|err| describe(&err)),
            None => document
                .head()
                .ok_or_else(|| "document has no <head>".to_string())?
                .append_child(&script)
                .map(|_| ())
                .map_err(|err| describe(&err)),
        }
    }

    fn announce(&self, event: &str) {
        match Event::new(event) {
            Ok(event) => {
                if let Err(err) = window().dispatch_event(&event) {
                    tracing::warn!(error = %describe(&err), "event dispatch failed");
                }
            }
            Err(err) => tracing::warn!(error = %describe(&err), "event construction failed"),
        }
    }
}

/// The `FB` global installed by the SDK script.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSdk;

fn fb_global() -> Option<JsValue> {
    Reflect::get(&window(), &JsValue::from_str(FB_GLOBAL))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn fb_method(fb: &JsValue, name: &str) -> Result<Function, SdkFault> {
    Reflect::get(fb, &JsValue::from_str(name))
        .map_err(|err| SdkFault::Threw(describe(&err)))?
        .dyn_into::<Function>()
        .map_err(|_| SdkFault::Missing)
}

fn decode_reply(value: &JsValue) -> SdkReply {
    serde_wasm_bindgen::from_value::<LoginStatus>(value.clone())
        .map_err(|err| SdkFault::Malformed(err.to_string()))
}

fn reply_closure(callback: StatusCallback) -> JsValue {
    Closure::once_into_js(move |response: JsValue| callback(decode_reply(&response)))
}

impl FacebookSdk for BrowserSdk {
    fn is_loaded(&self) -> bool {
        fb_global().is_some_and(|fb| fb_method(&fb, "init").is_ok())
    }

    fn register_bootstrap_hook(&self, hook: BootstrapHook) -> Result<(), SdkFault> {
        let hook = Closure::once_into_js(move || hook());
        Reflect::set(&window(), &JsValue::from_str(BOOTSTRAP_GLOBAL), &hook)
            .map(|_| ())
            .map_err(|err| SdkFault::Threw(describe(&err)))
    }

    fn init(&self, params: &InitParams) -> Result<(), SdkFault> {
        let fb = fb_global().ok_or(SdkFault::Missing)?;
        let init = fb_method(&fb, "init")?;
        let params = params
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|err| SdkFault::Malformed(err.to_string()))?;
        init.call1(&fb, &params)
            .map(|_| ())
            .map_err(|err| SdkFault::Threw(describe(&err)))
    }

    fn get_login_status(&self, callback: StatusCallback) -> Result<(), SdkFault> {
        let fb = fb_global().ok_or(SdkFault::Missing)?;
        let get_login_status = fb_method(&fb, "getLoginStatus")?;
        get_login_status
            .call1(&fb, &reply_closure(callback))
            .map(|_| ())
            .map_err(|err| SdkFault::Threw(describe(&err)))
    }

    fn login(&self, options: &LoginOptions, callback: StatusCallback) -> Result<(), SdkFault> {
        let fb = fb_global().ok_or(SdkFault::Missing)?;
        let login = fb_method(&fb, "login")?;
        let options = options
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|err| SdkFault::Malformed(err.to_string()))?;
        login
            .call2(&fb, &reply_closure(callback), &options)
            .map(|_| ())
            .map_err(|err| SdkFault::Threw(describe(&err)))
    }
}

/// Wall clock backed by `Date.now()` and `setTimeout`.
#[derive(Clone, Copy, Debug)]
pub struct BrowserClock {
    origin_ms: f64,
}

impl BrowserClock {
    /// Clock whose zero is the moment of construction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin_ms: Date::now(),
        }
    }
}

impl Default for BrowserClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for BrowserClock {
    fn now(&self) -> Duration {
        Duration::from_secs_f64(((Date::now() - self.origin_ms) / 1000.0).max(0.0))
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        Box::pin(TimeoutFuture::new(millis))
    }
}
