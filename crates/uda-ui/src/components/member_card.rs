use gloo::console;
use uda_api_models::{UpdateProfileRequest, UserProfile};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::app::session::update_profile;
use crate::components::notice::NoticeLine;
use crate::core::login_flow::Notice;

#[derive(Properties, PartialEq)]
pub(crate) struct MemberCardProps {
    pub(crate) user: UserProfile,
    pub(crate) on_updated: Callback<UserProfile>,
    pub(crate) on_logout: Callback<()>,
}

#[function_component(MemberCard)]
pub(crate) fn member_card(props: &MemberCardProps) -> Html {
    let busy = use_state(|| false);
    let notice = use_state(|| None::<Notice>);
    let user = &props.user;

    let toggle_privacy = {
        let busy = busy.clone();
        let notice = notice.clone();
        let on_updated = props.on_updated.clone();
        let next = !user.is_private;
        Callback::from(move |_: MouseEvent| {
            if *busy {
                return;
            }
            busy.set(true);
            notice.set(None);
            let busy = busy.clone();
            let notice = notice.clone();
            let on_updated = on_updated.clone();
            spawn_local(async move {
                let update = UpdateProfileRequest {
                    is_private: Some(next),
                    ..UpdateProfileRequest::default()
                };
                match update_profile(&update).await {
                    Ok(user) => on_updated.emit(user),
                    Err(err) => {
                        console::warn!("profile update failed", err.to_string());
                        notice.set(Some(Notice::error(err.to_string())));
                    }
                }
                busy.set(false);
            });
        })
    };

    let logout = {
        let on_logout = props.on_logout.clone();
        Callback::from(move |_: MouseEvent| on_logout.emit(()))
    };

    html! {
        <div class="card member-card">
            <div class="card-body stack">
                {if let Some(avatar) = &user.avatar_url {
                    html! { <img class="avatar" src={avatar.clone()} alt="" /> }
                } else { html! {} }}
                <h2 class="card-title">{user.display_name()}</h2>
                {if let Some(email) = &user.email {
                    html! { <p class="muted">{email.clone()}</p> }
                } else { html! {} }}
                <div class="stats">
                    <div class="stat">
                        <span class="stat-title">{"Rides"}</span>
                        <span class="stat-value">{user.total_rides}</span>
                    </div>
                    <div class="stat">
                        <span class="stat-title">{"Distance"}</span>
                        <span class="stat-value">{format!("{:.1} km", user.total_distance_km)}</span>
                    </div>
                </div>
                {if user.is_ride_leader {
                    html! { <span class="badge badge-accent">{"Ride leader"}</span> }
                } else { html! {} }}
                <label class="label cursor-pointer">
                    <span>{"Hide my profile from other members"}</span>
                    <input type="checkbox" class="toggle" checked={user.is_private}
                        disabled={*busy} onclick={toggle_privacy} />
                </label>
                <NoticeLine notice={(*notice).clone()} />
                <button type="button" class="btn btn-ghost" onclick={logout}>{"Sign out"}</button>
            </div>
        </div>
    }
}
