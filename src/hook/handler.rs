//! Attachable keydown handlers

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::debounce::Debounced;
use crate::events::KeyEvent;

use super::dispatch::Dispatch;

enum HandlerKind {
    Immediate(Arc<Dispatch>),
    Debounced(Debounced<Arc<KeyEvent>>),
}

/// A keydown handler ready to attach to an element or the document.
///
/// Cloning is cheap and preserves identity; [`KeyHandler::ptr_eq`] tells
/// whether two handlers are the same instance.
#[derive(Clone)]
pub struct KeyHandler(Arc<HandlerKind>);

impl KeyHandler {
    pub(crate) fn immediate(dispatch: Arc<Dispatch>) -> Self {
        Self(Arc::new(HandlerKind::Immediate(dispatch)))
    }

    /// The whole dispatch step (matching included) is deferred
    pub(crate) fn debounced(dispatch: Arc<Dispatch>, delay: Duration, runtime: Handle) -> Self {
        let debounced = Debounced::new(
            move |event: Arc<KeyEvent>| dispatch.dispatch(&event),
            delay,
            runtime,
        );
        Self(Arc::new(HandlerKind::Debounced(debounced)))
    }

    /// Feed one keydown to the handler
    pub fn handle(&self, event: &Arc<KeyEvent>) {
        match self.0.as_ref() {
            HandlerKind::Immediate(dispatch) => dispatch.dispatch(event),
            HandlerKind::Debounced(debounced) => debounced.call(Arc::clone(event)),
        }
    }

    pub fn ptr_eq(&self, other: &KeyHandler) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn debounce_delay(&self) -> Option<Duration> {
        match self.0.as_ref() {
            HandlerKind::Immediate(_) => None,
            HandlerKind::Debounced(debounced) => Some(debounced.delay()),
        }
    }

    /// Whether a debounced dispatch is waiting to run
    pub fn has_pending(&self) -> bool {
        match self.0.as_ref() {
            HandlerKind::Immediate(_) => false,
            HandlerKind::Debounced(debounced) => debounced.is_pending(),
        }
    }

    pub fn cancel_pending(&self) {
        if let HandlerKind::Debounced(debounced) = self.0.as_ref() {
            debounced.cancel();
        }
    }
}

impl PartialEq for KeyHandler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for KeyHandler {}

impl fmt::Debug for KeyHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyHandler")
            .field("ptr", &Arc::as_ptr(&self.0))
            .field("debounce", &self.debounce_delay())
            .finish()
    }
}
