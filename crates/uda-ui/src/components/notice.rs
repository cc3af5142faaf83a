use crate::core::login_flow::{Notice, NoticeTone};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct NoticeLineProps {
    pub(crate) notice: Option<Notice>,
}

#[function_component(NoticeLine)]
pub(crate) fn notice_line(props: &NoticeLineProps) -> Html {
    let Some(notice) = &props.notice else {
        return html! {};
    };
    let class = match notice.tone {
        NoticeTone::Info => "notice muted",
        NoticeTone::Error => "notice error-text",
    };
    html! { <p class={class} role="status">{notice.message.clone()}</p> }
}
