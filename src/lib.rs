//! keyshortcut: keyboard shortcut binding for UI components
//!
//! Given one or more key specifiers and a callback, wires keydown events
//! to application actions:
//! - Bare keys (`"a"`, `"Enter"`) and platform-aware `cmd+`/`ctrl+` combos
//! - Optional debouncing, `prevent_default` and exclusion selectors
//! - Scoped listening on one element, or global listening on the document
//!
//! ```no_run
//! use keyshortcut::{Document, KeyEvent, OnKey, Platform, Shortcut, ShortcutConfig};
//!
//! let document = Document::new();
//! let mut shortcut = Shortcut::mount(&document, Platform::detect(), None);
//! shortcut
//!     .render(&ShortcutConfig::new(["cmd+k", "ctrl+k"], OnKey::new(|key, _| println!("{key}"))))
//!     .unwrap();
//!
//! document.dispatch_keydown(KeyEvent::new("k").with_ctrl().with_target(shortcut.element()));
//! ```

pub mod component;
pub mod config;
pub mod debounce;
pub mod dom;
pub mod error;
pub mod events;
pub mod hook;
pub mod keys;
pub mod platform;

pub use component::Shortcut;
pub use config::{OnKey, ReplayConfig, ShortcutConfig, ShortcutOptions};
pub use dom::{Document, Element, ListenerTarget, Selector, Subscription};
pub use error::ShortcutError;
pub use events::{KeyEvent, KeyEventInit};
pub use hook::{KeyHandler, ShortcutHook};
pub use keys::{match_key, KeySpecifier, Keys};
pub use platform::{Platform, PlatformProbe, UserAgent};
