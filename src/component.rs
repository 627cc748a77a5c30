//! The `Shortcut` container component
//!
//! Renders a focusable `div` (`tabindex="0"`) into the document. In scoped
//! mode the derived handler is attached to that `div`, so keydowns from
//! anything inside it trigger the shortcut. In global mode the `div` is a
//! plain wrapper and the hook listens on the document instead.

use std::sync::Arc;

use tracing::debug;

use crate::config::ShortcutConfig;
use crate::dom::{Document, Element, ListenerTarget, Subscription};
use crate::error::ShortcutError;
use crate::hook::ShortcutHook;
use crate::platform::PlatformProbe;

/// A mounted shortcut container
pub struct Shortcut {
    document: Arc<Document>,
    element: Arc<Element>,
    hook: ShortcutHook,
    local: Option<Subscription>,
}

impl Shortcut {
    /// Create the wrapper element under `parent` (or at the document root)
    pub fn mount(
        document: &Arc<Document>,
        platform: Arc<dyn PlatformProbe>,
        parent: Option<&Arc<Element>>,
    ) -> Self {
        let element = document.append(parent, "div", &[("tabindex", "0")]);
        debug!(element = ?element.id(), "shortcut container mounted");

        Self {
            document: Arc::clone(document),
            element,
            hook: ShortcutHook::new(Arc::clone(document), platform),
            local: None,
        }
    }

    /// The wrapper element; children are appended under it
    pub fn element(&self) -> &Arc<Element> {
        &self.element
    }

    /// Apply the current configuration
    pub fn render(&mut self, config: &ShortcutConfig) -> Result<(), ShortcutError> {
        let Some(handler) = self.hook.use_shortcut(config)? else {
            self.local = None;
            return Ok(());
        };

        let unchanged = self
            .local
            .as_ref()
            .is_some_and(|current| current.handler().ptr_eq(&handler));
        if !unchanged {
            self.local = None;
            self.local = Some(
                self.document
                    .add_keydown_listener(ListenerTarget::Element(self.element.id()), handler),
            );
        }
        Ok(())
    }

    /// Whether a listener is attached to the wrapper element itself
    pub fn is_listening_locally(&self) -> bool {
        self.local.is_some()
    }

    /// Remove listeners and the wrapper (with its subtree) from the document
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for Shortcut {
    fn drop(&mut self) {
        self.local = None;
        self.hook.unmount();
        self.document.remove_element(&self.element);
        debug!(element = ?self.element.id(), "shortcut container unmounted");
    }
}
