//! Browser-facing services: REST client and Facebook SDK bindings.
pub mod api;
pub mod facebook;
