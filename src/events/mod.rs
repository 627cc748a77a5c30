//! Keyboard event types
//!
//! [`KeyEvent`] mirrors the subset of a DOM `KeyboardEvent` the matcher
//! reads. [`KeyEventInit`] is its serializable form, used when events are
//! replayed from JSON.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dom::Element;

/// A keydown event travelling through the document
#[derive(Debug)]
pub struct KeyEvent {
    /// Logical key value, e.g. `"a"`, `"Enter"`, `" "`
    pub key: String,
    pub ctrl_key: bool,
    pub meta_key: bool,
    pub alt_key: bool,
    pub shift_key: bool,
    /// Originating element; `None` when fired at the document itself
    pub target: Option<Arc<Element>>,
    /// Whether `prevent_default` has any effect
    pub cancelable: bool,
    default_prevented: AtomicBool,
}

impl KeyEvent {
    /// A cancelable keydown for `key` with no modifiers, fired at the document
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl_key: false,
            meta_key: false,
            alt_key: false,
            shift_key: false,
            target: None,
            cancelable: true,
            default_prevented: AtomicBool::new(false),
        }
    }

    pub fn with_target(mut self, target: &Arc<Element>) -> Self {
        self.target = Some(Arc::clone(target));
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl_key = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta_key = true;
        self
    }

    /// Build an event from its serialized form and an already resolved target
    pub fn from_init(init: &KeyEventInit, target: Option<Arc<Element>>) -> Self {
        Self {
            key: init.key.clone(),
            ctrl_key: init.ctrl_key,
            meta_key: init.meta_key,
            alt_key: init.alt_key,
            shift_key: init.shift_key,
            target,
            cancelable: init.cancelable,
            default_prevented: AtomicBool::new(false),
        }
    }

    /// Cancel the browser's default action. No-op on non-cancelable events.
    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.store(true, Ordering::SeqCst);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.load(Ordering::SeqCst)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl_key {
            f.write_str("Ctrl+")?;
        }
        if self.meta_key {
            f.write_str("Meta+")?;
        }
        if self.alt_key {
            f.write_str("Alt+")?;
        }
        if self.shift_key {
            f.write_str("Shift+")?;
        }
        write!(f, "{:?}", self.key)
    }
}

/// Serializable keydown description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEventInit {
    pub key: String,
    #[serde(default)]
    pub ctrl_key: bool,
    #[serde(default)]
    pub meta_key: bool,
    #[serde(default)]
    pub alt_key: bool,
    #[serde(default)]
    pub shift_key: bool,
    /// Selector for the target element; absent means the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default = "default_cancelable")]
    pub cancelable: bool,
}

fn default_cancelable() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prevent_default() {
        let event = KeyEvent::new("Enter");
        assert!(!event.default_prevented());
        event.prevent_default();
        assert!(event.default_prevented());
    }

    #[test]
    fn test_prevent_default_requires_cancelable() {
        let mut event = KeyEvent::new("Enter");
        event.cancelable = false;
        event.prevent_default();
        assert!(!event.default_prevented());
    }

    #[test]
    fn test_init_deserialization() {
        let json = r#"{"key":"k","metaKey":true,"target":"input"}"#;
        let init: KeyEventInit = serde_json::from_str(json).unwrap();
        assert_eq!(init.key, "k");
        assert!(init.meta_key);
        assert!(!init.ctrl_key);
        assert!(init.cancelable);
        assert_eq!(init.target.as_deref(), Some("input"));
    }

    #[test]
    fn test_display() {
        let event = KeyEvent::new("k").with_meta();
        assert_eq!(event.to_string(), r#"Meta+"k""#);
    }
}
