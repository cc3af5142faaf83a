//! Adapter from SDK callbacks to futures.

use futures::channel::oneshot;

use crate::error::SdkFault;
use crate::sdk::{SdkReply, StatusCallback};

/// Pending reply of a callback handed to the SDK.
#[derive(Debug)]
pub struct PendingReply {
    receiver: oneshot::Receiver<SdkReply>,
}

impl PendingReply {
    /// Wait for the SDK to invoke the callback.
    ///
    /// # Errors
    ///
    /// Returns the fault carried by the reply, or [`SdkFault::Dropped`] when the
    /// SDK released the callback without calling it.
    pub async fn wait(self) -> SdkReply {
        self.receiver.await.unwrap_or(Err(SdkFault::Dropped))
    }
}

/// Callback to hand to the SDK, and the future that resolves with its reply.
#[must_use]
pub fn reply_channel() -> (StatusCallback, PendingReply) {
    let (sender, receiver) = oneshot::channel();
    let callback: StatusCallback = Box::new(move |reply| {
        // The receiver is gone when the caller stopped waiting.
        let _ = sender.send(reply);
    });
    (callback, PendingReply { receiver })
}
