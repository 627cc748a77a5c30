//! Listener lifecycle for a mounted shortcut
//!
//! A [`ShortcutHook`] lives as long as the host component that owns it.
//! On every render the component calls [`ShortcutHook::use_shortcut`] with
//! its current configuration; the hook reuses its handler when nothing
//! relevant changed and owns the document subscription in global mode.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::config::{OnKey, ShortcutConfig};
use crate::dom::{Document, ListenerTarget, Subscription};
use crate::error::ShortcutError;
use crate::keys::KeySpecifier;
use crate::platform::PlatformProbe;

use super::dispatch::Dispatch;
use super::handler::KeyHandler;

/// Inputs that decide whether the dispatch step must be rebuilt.
///
/// Exclusion selectors are deliberately absent: changing only
/// `exclude_selectors` keeps the previous handler and its previous
/// selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MemoKey {
    keys: Vec<KeySpecifier>,
    on_key: OnKey,
    debounced: bool,
    prevent_default: bool,
}

struct Memo {
    key: MemoKey,
    dispatch: Arc<Dispatch>,
    delay: Option<Duration>,
    handler: KeyHandler,
}

/// The active document-level registration and the interval it was made with
struct GlobalListener {
    delay: Option<Duration>,
    subscription: Subscription,
}

/// Per-component shortcut state
pub struct ShortcutHook {
    document: Arc<Document>,
    platform: Arc<dyn PlatformProbe>,
    memo: Option<Memo>,
    global: Option<GlobalListener>,
}

impl ShortcutHook {
    pub fn new(document: Arc<Document>, platform: Arc<dyn PlatformProbe>) -> Self {
        Self {
            document,
            platform,
            memo: None,
            global: None,
        }
    }

    /// Derive the handler for `config`.
    ///
    /// Scoped configs get `Some(handler)` for the caller to attach to its
    /// own element. Global configs get `None`; the hook keeps exactly one
    /// document listener for them, replaced only when `global`, the
    /// debounce interval or the handler itself changes.
    pub fn use_shortcut(
        &mut self,
        config: &ShortcutConfig,
    ) -> Result<Option<KeyHandler>, ShortcutError> {
        let handler = self.derive_handler(config)?;

        if config.global {
            self.subscribe_global(&handler, config.options.debounce_delay());
            Ok(None)
        } else {
            self.release_global();
            Ok(Some(handler))
        }
    }

    fn derive_handler(&mut self, config: &ShortcutConfig) -> Result<KeyHandler, ShortcutError> {
        let delay = config.options.debounce_delay();
        let key = MemoKey {
            keys: config.keys.to_list()?,
            on_key: config.on_key.clone(),
            debounced: delay.is_some(),
            prevent_default: config.options.prevent_default,
        };

        let reusable_dispatch = match &self.memo {
            Some(memo) if memo.key == key && memo.delay == delay => {
                return Ok(memo.handler.clone());
            }
            Some(memo) if memo.key == key => Some(Arc::clone(&memo.dispatch)),
            _ => None,
        };

        let dispatch = match reusable_dispatch {
            Some(dispatch) => dispatch,
            None => {
                debug!(keys = ?key.keys, "building shortcut dispatch");
                Arc::new(Dispatch::new(
                    key.keys.clone(),
                    key.on_key.clone(),
                    &config.options,
                    &self.document,
                    Arc::clone(&self.platform),
                ))
            }
        };

        let handler = match delay {
            Some(delay) => {
                let runtime = Handle::try_current().map_err(|_| ShortcutError::NoRuntime)?;
                KeyHandler::debounced(Arc::clone(&dispatch), delay, runtime)
            }
            None => KeyHandler::immediate(Arc::clone(&dispatch)),
        };

        let replaced = self.memo.replace(Memo {
            key,
            dispatch,
            delay,
            handler: handler.clone(),
        });
        if let Some(old) = replaced {
            old.handler.cancel_pending();
        }

        Ok(handler)
    }

    fn subscribe_global(&mut self, handler: &KeyHandler, delay: Option<Duration>) {
        if let Some(active) = &self.global {
            if active.delay == delay && active.subscription.handler().ptr_eq(handler) {
                return;
            }
        }

        // The old listener goes away before the new one is installed
        self.release_global();

        let subscription = self
            .document
            .add_keydown_listener(ListenerTarget::Document, handler.clone());
        info!(id = ?subscription.id(), ?delay, "global shortcut listener installed");
        self.global = Some(GlobalListener {
            delay,
            subscription,
        });
    }

    fn release_global(&mut self) {
        if let Some(active) = self.global.take() {
            info!(id = ?active.subscription.id(), "global shortcut listener removed");
        }
    }

    /// Whether a document-level listener is currently installed
    pub fn is_listening_globally(&self) -> bool {
        self.global.is_some()
    }

    /// Tear down: remove the global listener and cancel pending calls
    pub fn unmount(&mut self) {
        self.release_global();
        if let Some(memo) = self.memo.take() {
            memo.handler.cancel_pending();
        }
    }
}

impl Drop for ShortcutHook {
    fn drop(&mut self) {
        self.unmount();
    }
}
