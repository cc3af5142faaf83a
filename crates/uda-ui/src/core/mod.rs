//! Core, DOM-free primitives and helpers for the web client.
pub mod config;
pub mod login_flow;
pub mod session;
