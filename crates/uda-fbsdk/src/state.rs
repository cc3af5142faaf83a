//! Load state of the SDK and its allowed transitions.

use crate::error::GateError;

/// Where the SDK is in its two-phase bootstrap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SdkLoadState {
    /// Nothing requested yet.
    #[default]
    Unloaded,
    /// Script requested; waiting for the bootstrap hook.
    Loading,
    /// `FB.init` succeeded; waiting for the status-check callback.
    LoadedUninitialized,
    /// Safe to call the SDK.
    Ready,
    /// Loading failed for the rest of the page lifetime.
    Failed(GateError),
}

impl SdkLoadState {
    /// Ready and Failed never change again.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed(_))
    }

    /// Settled outcome, or `None` while loading is still in progress.
    #[must_use]
    pub fn outcome(&self) -> Option<Result<(), GateError>> {
        match self {
            Self::Ready => Some(Ok(())),
            Self::Failed(err) => Some(Err(err.clone())),
            Self::Unloaded | Self::Loading | Self::LoadedUninitialized => None,
        }
    }

    /// Whether `next` is a legal successor of `self`.
    #[must_use]
    pub const fn can_advance_to(&self, next: &Self) -> bool {
        match (self, next) {
            (Self::Ready | Self::Failed(_), _) => false,
            (_, Self::Failed(_)) => true,
            (Self::Unloaded, Self::Loading)
            | (Self::Loading, Self::LoadedUninitialized)
            | (Self::LoadedUninitialized, Self::Ready) => true,
            _ => false,
        }
    }

    /// Short label for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Unloaded => "unloaded",
            Self::Loading => "loading",
            Self::LoadedUninitialized => "loaded_uninitialized",
            Self::Ready => "ready",
            Self::Failed(_) => "failed",
        }
    }
}
