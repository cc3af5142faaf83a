//! Email/password sign-in with an inline registration mode.

use gloo::console;
use uda_api_models::{RegisterRequest, UserProfile};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::app::session::{register, sign_in_with_password};
use crate::components::notice::NoticeLine;
use crate::core::login_flow::Notice;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FormMode {
    SignIn,
    Register,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct FormFields {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    phone: String,
}

impl FormFields {
    fn missing_required(&self, mode: FormMode) -> bool {
        let blank = |value: &str| value.trim().is_empty();
        blank(&self.email)
            || self.password.is_empty()
            || (mode == FormMode::Register && (blank(&self.first_name) || blank(&self.last_name)))
    }

    fn register_request(&self) -> RegisterRequest {
        let phone = self.phone.trim();
        RegisterRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            last_name: self.last_name.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            phone: (!phone.is_empty()).then(|| phone.to_string()),
        }
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct LoginFormProps {
    pub(crate) on_signed_in: Callback<UserProfile>,
}

fn field_input(
    fields: &UseStateHandle<FormFields>,
    update: fn(&mut FormFields, String),
) -> Callback<InputEvent> {
    let fields = fields.clone();
    Callback::from(move |event: InputEvent| {
        if let Some(input) = event.target_dyn_into::<web_sys::HtmlInputElement>() {
            let mut next = (*fields).clone();
            update(&mut next, input.value());
            fields.set(next);
        }
    })
}

#[function_component(LoginForm)]
pub(crate) fn login_form(props: &LoginFormProps) -> Html {
    let mode = use_state(|| FormMode::SignIn);
    let fields = use_state(FormFields::default);
    let busy = use_state(|| false);
    let notice = use_state(|| None::<Notice>);

    let onsubmit = {
        let mode = mode.clone();
        let fields = fields.clone();
        let busy = busy.clone();
        let notice = notice.clone();
        let on_signed_in = props.on_signed_in.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *busy {
                return;
            }
            if fields.missing_required(*mode) {
                notice.set(Some(Notice::error("Please fill in the required fields.")));
                return;
            }
            busy.set(true);
            notice.set(None);
            let current_mode = *mode;
            let form = (*fields).clone();
            let busy = busy.clone();
            let notice = notice.clone();
            let on_signed_in = on_signed_in.clone();
            spawn_local(async move {
                let result = match current_mode {
                    FormMode::SignIn => sign_in_with_password(form.email.trim(), &form.password).await,
                    FormMode::Register => register(&form.register_request()).await,
                };
                match result {
                    Ok(user) => on_signed_in.emit(user),
                    Err(err) => {
                        console::warn!("password sign-in failed", err.to_string());
                        notice.set(Some(Notice::error(err.to_string())));
                    }
                }
                busy.set(false);
            });
        })
    };

    let toggle_mode = {
        let mode = mode.clone();
        let notice = notice.clone();
        Callback::from(move |_: MouseEvent| {
            notice.set(None);
            mode.set(match *mode {
                FormMode::SignIn => FormMode::Register,
                FormMode::Register => FormMode::SignIn,
            });
        })
    };

    let registering = *mode == FormMode::Register;
    let (submit_label, toggle_label) = if registering {
        ("Create account", "I already have an account")
    } else {
        ("Sign in", "Create an account")
    };

    html! {
        <form class="login-form stack" onsubmit={onsubmit}>
            {if registering {
                html! {
                    <>
                        <label class="stack">
                            <span>{"First name"}</span>
                            <input class="input input-bordered" autocomplete="given-name"
                                value={fields.first_name.clone()}
                                oninput={field_input(&fields, |f, v| f.first_name = v)} />
                        </label>
                        <label class="stack">
                            <span>{"Last name"}</span>
                            <input class="input input-bordered" autocomplete="family-name"
                                value={fields.last_name.clone()}
                                oninput={field_input(&fields, |f, v| f.last_name = v)} />
                        </label>
                        <label class="stack">
                            <span>{"Phone (optional)"}</span>
                            <input class="input input-bordered" type="tel" autocomplete="tel"
                                value={fields.phone.clone()}
                                oninput={field_input(&fields, |f, v| f.phone = v)} />
                        </label>
                    </>
                }
            } else { html! {} }}
            <label class="stack">
                <span>{"Email"}</span>
                <input class="input input-bordered" type="email" autocomplete="email"
                    value={fields.email.clone()}
                    oninput={field_input(&fields, |f, v| f.email = v)} />
            </label>
            <label class="stack">
                <span>{"Password"}</span>
                <input class="input input-bordered" type="password"
                    autocomplete={if registering { "new-password" } else { "current-password" }}
                    value={fields.password.clone()}
                    oninput={field_input(&fields, |f, v| f.password = v)} />
            </label>
            <NoticeLine notice={(*notice).clone()} />
            <button type="submit" class="btn btn-primary w-full" disabled={*busy}>
                {submit_label}
            </button>
            <button type="button" class="btn btn-ghost btn-sm" onclick={toggle_mode}>
                {toggle_label}
            </button>
        </form>
    }
}

