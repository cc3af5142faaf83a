use std::rc::Rc;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::yield_now;
use tokio::time::Instant;
use uda_fbsdk::{
    ConfigError, GateError, SdkConfig, SdkFault, SdkLoadState, TokioClock,
};
use uda_test_support::fakes::{FakeDocument, FakeSdk};
use uda_test_support::fixtures::{
    GateHarness, SHORT_TIMEOUT, TEST_APP_ID, connected, declined, init_tracing, test_config,
};

fn harness(config: SdkConfig, document: FakeDocument, sdk: FakeSdk) -> GateHarness {
    init_tracing();
    GateHarness::build(config, document, sdk, Rc::new(TokioClock::new()))
}

fn fresh() -> GateHarness {
    harness(test_config(), FakeDocument::new(), FakeSdk::new())
}

/// Let every other future in the `join!` run once, then act.
async fn after_yield(step: impl FnOnce()) {
    yield_now().await;
    step();
}

#[tokio::test(start_paused = true)]
async fn concurrent_callers_share_one_load() {
    let h = fresh();

    let (a, b, c, ()) = tokio::join!(
        h.gate.acquire_ready(),
        h.gate.acquire_ready(),
        h.gate.acquire_ready(),
        after_yield(|| h.complete_handshake()),
    );

    assert_eq!((a, b, c), (Ok(()), Ok(()), Ok(())));
    assert_eq!(h.document.script_count(), 1);
    assert_eq!(h.sdk.hook_registrations(), 1);
    assert_eq!(h.sdk.init_calls().len(), 1);
    assert_eq!(h.sdk.status_calls(), 1);
    assert_eq!(h.document.announced(), vec!["fb-sdk-ready".to_string()]);
    assert_eq!(h.gate.state(), SdkLoadState::Ready);
}

#[tokio::test(start_paused = true)]
async fn init_receives_configured_parameters() {
    let h = fresh();

    let (ready, ()) = tokio::join!(
        h.gate.acquire_ready(),
        after_yield(|| h.complete_handshake())
    );

    assert_eq!(ready, Ok(()));
    let init = h.sdk.init_calls();
    assert_eq!(init[0].app_id, TEST_APP_ID);
    assert_eq!(init[0].version, "v18.0");
    assert!(init[0].cookie && init[0].xfbml && init[0].status);
    let script = &h.document.scripts()[0];
    assert_eq!(script.id, "facebook-jssdk");
    assert!(script.async_load && script.defer);
}

#[tokio::test(start_paused = true)]
async fn late_caller_resolves_without_reloading() {
    let h = fresh();
    let (first, ()) = tokio::join!(
        h.gate.acquire_ready(),
        after_yield(|| h.complete_handshake())
    );
    assert_eq!(first, Ok(()));

    assert_eq!(h.gate.acquire_ready().now_or_never(), Some(Ok(())));
    assert_eq!(h.gate.clone().acquire_ready().now_or_never(), Some(Ok(())));
    assert_eq!(h.document.script_count(), 1);
    assert_eq!(h.sdk.init_calls().len(), 1);
    assert_eq!(h.sdk.status_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn ready_waits_for_status_check() {
    let h = fresh();
    let mut pending = Box::pin(h.gate.acquire_ready());
    assert!(pending.as_mut().now_or_never().is_none());

    assert!(h.sdk.fire_bootstrap());
    assert_eq!(h.gate.state(), SdkLoadState::LoadedUninitialized);
    assert!(!h.gate.is_ready());
    assert!(pending.as_mut().now_or_never().is_none());

    assert!(h.sdk.answer_status(connected("existing-session")));
    assert!(h.gate.is_ready());
    assert_eq!(pending.await, Ok(()));
    assert_eq!(
        h.gate
            .login_status()
            .and_then(|status| status.access_token().map(String::from)),
        Some("existing-session".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn missing_hook_times_out_for_every_waiter() {
    let h = harness(
        test_config().ready_timeout(SHORT_TIMEOUT),
        FakeDocument::new(),
        FakeSdk::new(),
    );
    let started = Instant::now();

    let (a, b) = tokio::join!(h.gate.acquire_ready(), h.gate.acquire_ready());

    let expected = GateError::InitTimeout { timeout_ms: 500 };
    assert_eq!(a, Err(expected.clone()));
    assert_eq!(b, Err(expected.clone()));
    let waited = started.elapsed();
    assert!(waited >= SHORT_TIMEOUT, "{waited:?}");
    assert!(waited < SHORT_TIMEOUT + Duration::from_millis(50), "{waited:?}");
    assert_eq!(h.gate.state(), SdkLoadState::Failed(expected.clone()));
    assert_eq!(h.gate.acquire_ready().now_or_never(), Some(Err(expected)));
}

#[tokio::test(start_paused = true)]
async fn default_budget_is_ten_seconds() {
    let h = fresh();
    let started = Instant::now();

    let result = h.gate.acquire_ready().await;

    assert_eq!(result, Err(GateError::InitTimeout { timeout_ms: 10_000 }));
    assert!(started.elapsed() >= Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn caller_after_deadline_fails_the_gate() {
    let h = harness(
        test_config().ready_timeout(SHORT_TIMEOUT),
        FakeDocument::new(),
        FakeSdk::new(),
    );
    assert!(h.gate.acquire_ready().now_or_never().is_none());

    tokio::time::advance(SHORT_TIMEOUT).await;

    assert_eq!(
        h.gate.acquire_ready().now_or_never(),
        Some(Err(GateError::InitTimeout { timeout_ms: 500 }))
    );
}

#[tokio::test(start_paused = true)]
async fn hook_after_timeout_is_ignored() {
    let h = harness(
        test_config().ready_timeout(SHORT_TIMEOUT),
        FakeDocument::new(),
        FakeSdk::new(),
    );
    assert!(h.gate.acquire_ready().await.is_err());

    assert!(h.sdk.fire_bootstrap());

    assert!(h.sdk.init_calls().is_empty());
    assert_eq!(h.sdk.status_calls(), 0);
    assert!(matches!(h.gate.state(), SdkLoadState::Failed(_)));
    assert!(h.document.announced().is_empty());
}

#[tokio::test(start_paused = true)]
async fn script_error_disables_both_buttons() {
    let h = fresh();
    let first_button = h.gate.subscribe();
    let second_button = h.gate.subscribe();

    let (a, b, ()) = tokio::join!(
        h.gate.acquire_ready(),
        h.gate.acquire_ready(),
        after_yield(|| {
            assert_eq!(h.document.fail_script_load("net::ERR_BLOCKED_BY_CLIENT"), 1);
        }),
    );

    let expected = GateError::LoadFailure {
        reason: "net::ERR_BLOCKED_BY_CLIENT".to_string(),
    };
    assert_eq!(a, Err(expected.clone()));
    assert_eq!(b, Err(expected.clone()));
    assert!(expected.user_message().contains("reload"));
    for button in [&first_button, &second_button] {
        assert_eq!(button.current(), SdkLoadState::Failed(expected.clone()));
    }
    assert_eq!(h.gate.acquire_ready().now_or_never(), Some(Err(expected)));
    assert_eq!(h.document.script_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn watchers_see_ready_on_the_same_tick() {
    let h = fresh();
    let mut first_button = h.gate.subscribe();
    let second_button = h.gate.subscribe();
    assert_eq!(first_button.current(), SdkLoadState::Unloaded);

    let mut pending = Box::pin(h.gate.acquire_ready());
    assert!(pending.as_mut().now_or_never().is_none());
    assert_eq!(first_button.changed().await, Some(SdkLoadState::Loading));

    h.complete_handshake();

    assert_eq!(first_button.current(), SdkLoadState::Ready);
    assert_eq!(second_button.current(), SdkLoadState::Ready);
    assert_eq!(pending.await, Ok(()));

    let late_button = h.gate.subscribe();
    assert_eq!(late_button.current(), SdkLoadState::Ready);
}

#[tokio::test(start_paused = true)]
async fn missing_app_id_fails_without_loading() {
    let h = harness(
        SdkConfig::with_app_id(None),
        FakeDocument::new(),
        FakeSdk::new(),
    );

    assert_eq!(
        h.gate.acquire_ready().now_or_never(),
        Some(Err(GateError::Config(ConfigError::MissingAppId)))
    );
    assert_eq!(h.document.script_count(), 0);
    assert_eq!(h.sdk.hook_registrations(), 0);
}

#[tokio::test(start_paused = true)]
async fn init_exception_fails_the_gate() {
    let h = fresh();
    h.sdk.fail_init(SdkFault::Threw("invalid app id".into()));

    let (result, ()) = tokio::join!(
        h.gate.acquire_ready(),
        after_yield(|| assert!(h.sdk.fire_bootstrap()))
    );

    assert_eq!(
        result,
        Err(GateError::InitFailed {
            detail: "facebook sdk call threw: invalid app id".to_string()
        })
    );
    assert_eq!(h.sdk.status_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn preloaded_sdk_bootstraps_without_a_hook() {
    let h = harness(
        test_config(),
        FakeDocument::with_existing_script("facebook-jssdk"),
        FakeSdk::preloaded(),
    );

    let mut pending = Box::pin(h.gate.acquire_ready());
    assert!(pending.as_mut().now_or_never().is_none());
    assert_eq!(h.sdk.hook_registrations(), 0);
    assert_eq!(h.sdk.init_calls().len(), 1);
    assert_eq!(h.document.script_count(), 0);

    assert!(h.sdk.answer_status(declined()));
    assert_eq!(pending.await, Ok(()));
}

#[tokio::test(start_paused = true)]
async fn existing_script_tag_is_reused() {
    let h = harness(
        test_config(),
        FakeDocument::with_existing_script("facebook-jssdk"),
        FakeSdk::new(),
    );

    let (ready, ()) = tokio::join!(
        h.gate.acquire_ready(),
        after_yield(|| h.complete_handshake())
    );

    assert_eq!(ready, Ok(()));
    assert_eq!(h.document.script_count(), 0);
    assert_eq!(h.sdk.init_calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn insertion_failure_is_a_load_failure() {
    let document = FakeDocument::new();
    document.reject_insertions("no <head> element");
    let h = harness(test_config(), document, FakeSdk::new());

    assert_eq!(
        h.gate.acquire_ready().now_or_never(),
        Some(Err(GateError::LoadFailure {
            reason: "no <head> element".to_string()
        }))
    );
}

#[tokio::test(start_paused = true)]
async fn unreadable_status_reply_still_completes_the_handshake() {
    let h = fresh();
    let mut pending = Box::pin(h.gate.acquire_ready());
    assert!(pending.as_mut().now_or_never().is_none());

    assert!(h.sdk.fire_bootstrap());
    assert!(
        h.sdk
            .answer_status(Err(SdkFault::Malformed("status: \"weird\"".into())))
    );

    assert_eq!(pending.await, Ok(()));
    assert_eq!(h.gate.login_status(), None);
}

#[tokio::test(start_paused = true)]
async fn hook_after_deadline_without_waiters_fails_the_gate() {
    let h = harness(
        test_config().ready_timeout(SHORT_TIMEOUT),
        FakeDocument::new(),
        FakeSdk::new(),
    );
    // Start the load, then abandon the only waiter.
    assert!(h.gate.acquire_ready().now_or_never().is_none());
    tokio::time::advance(SHORT_TIMEOUT).await;

    assert!(h.sdk.fire_bootstrap());

    let expected = GateError::InitTimeout { timeout_ms: 500 };
    assert_eq!(h.gate.state(), SdkLoadState::Failed(expected.clone()));
    assert!(h.sdk.init_calls().is_empty());
    assert!(h.document.announced().is_empty());
    assert_eq!(h.gate.acquire_ready().now_or_never(), Some(Err(expected)));
}

#[tokio::test(start_paused = true)]
async fn status_reply_after_deadline_without_waiters_fails_the_gate() {
    let h = harness(
        test_config().ready_timeout(SHORT_TIMEOUT),
        FakeDocument::new(),
        FakeSdk::new(),
    );
    assert!(h.gate.acquire_ready().now_or_never().is_none());
    assert!(h.sdk.fire_bootstrap());
    tokio::time::advance(SHORT_TIMEOUT).await;

    assert!(h.sdk.answer_status(declined()));

    assert_eq!(
        h.gate.state(),
        SdkLoadState::Failed(GateError::InitTimeout { timeout_ms: 500 })
    );
    assert!(h.document.announced().is_empty());
}

#[tokio::test(start_paused = true)]
async fn synchronous_status_reply_is_ready_on_first_poll() {
    let h = harness(
        test_config(),
        FakeDocument::with_existing_script("facebook-jssdk"),
        FakeSdk::answering_synchronously(connected("existing-session"), declined()),
    );

    assert_eq!(h.gate.acquire_ready().now_or_never(), Some(Ok(())));
    assert_eq!(h.sdk.init_calls().len(), 1);
    assert_eq!(h.sdk.status_calls(), 1);
    assert_eq!(h.document.announced(), vec!["fb-sdk-ready".to_string()]);
    assert_eq!(
        h.gate
            .login_status()
            .and_then(|status| status.access_token().map(String::from)),
        Some("existing-session".to_string())
    );
}
