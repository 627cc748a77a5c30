//! Scoped keydown listener registration

use std::fmt;
use std::sync::Weak;

use tracing::debug;

use crate::hook::KeyHandler;

use super::document::{Document, ListenerId, ListenerTarget};

/// Keeps a keydown listener registered for as long as it lives.
///
/// Dropping it removes the listener and cancels any debounced call the
/// handler still has pending, so nothing fires after teardown.
#[must_use = "the listener is removed as soon as the subscription is dropped"]
pub struct Subscription {
    document: Weak<Document>,
    id: ListenerId,
    target: ListenerTarget,
    handler: KeyHandler,
}

impl Subscription {
    pub(crate) fn new(
        document: Weak<Document>,
        id: ListenerId,
        target: ListenerTarget,
        handler: KeyHandler,
    ) -> Self {
        Self {
            document,
            id,
            target,
            handler,
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn target(&self) -> ListenerTarget {
        self.target
    }

    pub fn handler(&self) -> &KeyHandler {
        &self.handler
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handler.cancel_pending();

        let removed = self
            .document
            .upgrade()
            .is_some_and(|document| document.remove_listener(self.id));
        debug!(id = ?self.id, target = ?self.target, removed, "keydown listener released");
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("target", &self.target)
            .finish()
    }
}
