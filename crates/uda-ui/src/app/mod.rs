//! App shell: session restore, sign-in panel and the signed-in member view.

pub(crate) mod preferences;
pub(crate) mod sdk;
pub(crate) mod session;

use gloo::console;
use uda_api_models::UserProfile;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::components::facebook_login::FacebookLoginButton;
use crate::components::login_form::LoginForm;
use crate::components::member_card::MemberCard;
use crate::core::session::SessionState;

#[function_component(UdaApp)]
fn uda_app() -> Html {
    let state = use_state(|| SessionState::Restoring);

    {
        let state = state.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    state.set(session::restore_session().await);
                });
                || ()
            },
            (),
        );
    }

    let on_signed_in = {
        let state = state.clone();
        Callback::from(move |user: UserProfile| {
            console::info!("signed in", user.id.to_string());
            state.set(SessionState::SignedIn(user));
        })
    };

    let on_logout = {
        let state = state.clone();
        Callback::from(move |()| {
            session::sign_out();
            state.set(SessionState::SignedOut);
        })
    };

    let body = match &*state {
        SessionState::Restoring => html! {
            <div class="center"><span class="loading loading-spinner loading-lg"></span></div>
        },
        SessionState::SignedIn(user) => html! {
            <MemberCard
                user={user.clone()}
                on_updated={on_signed_in.clone()}
                on_logout={on_logout}
            />
        },
        SessionState::SignedOut => html! {
            <div class="auth-panel card">
                <div class="card-body stack">
                    <h1 class="card-title">{"UDA Cycling Club"}</h1>
                    <FacebookLoginButton on_signed_in={on_signed_in.clone()} />
                    <div class="divider">{"or"}</div>
                    <LoginForm on_signed_in={on_signed_in} />
                </div>
            </div>
        },
    };

    html! { <main class="app-shell">{body}</main> }
}

/// Install browser logging and mount the app.
pub fn run_app() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::INFO)
            .build(),
    );
    if let Some(root) = gloo::utils::document().get_element_by_id("root") {
        yew::Renderer::<UdaApp>::with_root(root).render();
    } else {
        yew::Renderer::<UdaApp>::new().render();
    }
}
