//! "Continue with Facebook" button.
//!
//! Mounting the button starts the page-wide SDK load; every mounted button
//! watches the same gate, so they enable and fail together.

use std::cell::Cell;
use std::rc::Rc;

use gloo::console;
use gloo::utils::window;
use uda_api_models::UserProfile;
use uda_fbsdk::SdkLoadState;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::app::sdk::facebook;
use crate::app::session::sign_in_with_facebook;
use crate::components::notice::NoticeLine;
use crate::core::login_flow::{ButtonState, LoginFlowError, Notice, button_state};

#[derive(Properties, PartialEq)]
pub(crate) struct FacebookLoginButtonProps {
    pub(crate) on_signed_in: Callback<UserProfile>,
}

#[function_component(FacebookLoginButton)]
pub(crate) fn facebook_login_button(props: &FacebookLoginButtonProps) -> Html {
    let load_state = use_state(|| facebook().gate().state());
    let busy = use_state(|| false);
    let notice = use_state(|| None::<Notice>);

    {
        let load_state = load_state.clone();
        use_effect_with_deps(
            move |_| {
                let mounted = Rc::new(Cell::new(true));
                let alive = mounted.clone();
                spawn_local(async move {
                    let gate = facebook().gate().clone();
                    let mut watch = gate.subscribe();
                    let observe = async {
                        loop {
                            let state = watch.current();
                            if !alive.get() {
                                break;
                            }
                            load_state.set(state.clone());
                            if state.is_terminal() || watch.changed().await.is_none() {
                                break;
                            }
                        }
                    };
                    let (result, ()) = futures::join!(gate.acquire_ready(), observe);
                    if let Err(err) = result {
                        console::warn!(
                            "facebook login unavailable",
                            LoginFlowError::from(err).to_string()
                        );
                    }
                });
                move || mounted.set(false)
            },
            (),
        );
    }

    let state = button_state(&load_state, *busy);

    let onclick = {
        let busy = busy.clone();
        let notice = notice.clone();
        let on_signed_in = props.on_signed_in.clone();
        Callback::from(move |_: MouseEvent| {
            if !state.enabled() {
                return;
            }
            busy.set(true);
            notice.set(None);
            let busy = busy.clone();
            let notice = notice.clone();
            let on_signed_in = on_signed_in.clone();
            spawn_local(async move {
                match sign_in_with_facebook(&facebook()).await {
                    Ok(Some(user)) => on_signed_in.emit(user),
                    Ok(None) => notice.set(Some(Notice::cancelled())),
                    Err(err) => {
                        console::warn!("facebook sign-in failed", err.to_string());
                        notice.set(Some(Notice::from(&err)));
                    }
                }
                busy.set(false);
            });
        })
    };

    let label = match state {
        ButtonState::Loading => "Loading Facebook…",
        ButtonState::Busy => "Signing in…",
        ButtonState::Ready | ButtonState::Unavailable { .. } => "Continue with Facebook",
    };
    let spinner = matches!(state, ButtonState::Loading | ButtonState::Busy);
    let (failure, offer_reload) = match state {
        ButtonState::Unavailable { message, reload } => (Some(Notice::error(message)), reload),
        _ => (None, false),
    };
    let reload_page = Callback::from(|_: MouseEvent| {
        if let Err(err) = window().location().reload() {
            console::error!("page reload failed", err);
        }
    });
    let ready = matches!(*load_state, SdkLoadState::Ready);

    html! {
        <div class="facebook-login stack">
            <button
                type="button"
                class="btn btn-facebook w-full"
                disabled={!state.enabled()}
                aria-busy={spinner.to_string()}
                data-sdk-ready={ready.to_string()}
                {onclick}
            >
                {if spinner {
                    html! { <span class="loading loading-spinner loading-sm"></span> }
                } else { html! {} }}
                <span>{label}</span>
            </button>
            <NoticeLine notice={failure.or_else(|| (*notice).clone())} />
            {if offer_reload {
                html! {
                    <button type="button" class="btn btn-ghost btn-sm" onclick={reload_page}>
                        {"Reload page"}
                    </button>
                }
            } else { html! {} }}
        </div>
    }
}
