pub(crate) mod facebook_login;
pub(crate) mod login_form;
pub(crate) mod member_card;
pub(crate) mod notice;
