//! Shortcut configuration
//!
//! [`ShortcutConfig`] is what a host component passes on every render.
//! [`ReplayConfig`] is the environment-driven variant used by the replay
//! binary.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::events::KeyEvent;
use crate::keys::Keys;

/// Environment variable names read by [`ReplayConfig::load`]
pub mod env {
    pub const KEYS: &str = "KEYSHORTCUT_KEYS";
    pub const OPTIONS: &str = "KEYSHORTCUT_OPTIONS";
    pub const GLOBAL: &str = "KEYSHORTCUT_GLOBAL";
    pub use crate::platform::USER_AGENT_ENV as USER_AGENT;
}

type KeyCallback = dyn Fn(&str, &KeyEvent) + Send + Sync;

/// Callback receiving the matched specifier and the original event.
///
/// Compared by identity: two `OnKey`s are equal only when they share the
/// same allocation, which is what keeps a re-rendered hook from rebuilding
/// its handler.
#[derive(Clone)]
pub struct OnKey(Arc<KeyCallback>);

impl OnKey {
    pub fn new(f: impl Fn(&str, &KeyEvent) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, key: &str, event: &KeyEvent) {
        (self.0)(key, event)
    }
}

impl PartialEq for OnKey {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.0) as *const (),
            Arc::as_ptr(&other.0) as *const (),
        )
    }
}

impl Eq for OnKey {}

impl fmt::Debug for OnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OnKey({:p})", Arc::as_ptr(&self.0) as *const ())
    }
}

/// Optional shortcut behaviour
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShortcutOptions {
    /// Debounce interval in milliseconds; `0` disables debouncing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debounce: Option<u64>,
    /// Selectors for targets whose matched keydowns must not call `on_key`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_selectors: Option<Vec<String>>,
    /// Call `prevent_default` on every matched event
    pub prevent_default: bool,
}

impl ShortcutOptions {
    pub fn with_debounce(mut self, millis: u64) -> Self {
        self.debounce = Some(millis);
        self
    }

    pub fn with_exclude_selectors<S: Into<String>>(
        mut self,
        selectors: impl IntoIterator<Item = S>,
    ) -> Self {
        self.exclude_selectors = Some(selectors.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_prevent_default(mut self) -> Self {
        self.prevent_default = true;
        self
    }

    /// The effective debounce interval, `None` when disabled
    pub fn debounce_delay(&self) -> Option<Duration> {
        self.debounce
            .filter(|millis| *millis > 0)
            .map(Duration::from_millis)
    }
}

/// Everything a host component supplies for one shortcut
#[derive(Debug, Clone)]
pub struct ShortcutConfig {
    pub keys: Keys,
    pub on_key: OnKey,
    pub options: ShortcutOptions,
    /// Listen on the whole document instead of one element
    pub global: bool,
}

impl ShortcutConfig {
    pub fn new(keys: impl Into<Keys>, on_key: OnKey) -> Self {
        Self {
            keys: keys.into(),
            on_key,
            options: ShortcutOptions::default(),
            global: false,
        }
    }

    pub fn with_options(mut self, options: ShortcutOptions) -> Self {
        self.options = options;
        self
    }

    pub fn global(mut self, global: bool) -> Self {
        self.global = global;
        self
    }
}

/// Replay configuration loaded from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayConfig {
    pub keys: Keys,
    pub options: ShortcutOptions,
    pub global: bool,
    pub user_agent: Option<String>,
}

impl ReplayConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::load_from(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value
    pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw_keys = lookup(env::KEYS).with_context(|| format!("{} is not set", env::KEYS))?;
        let keys: Keys = serde_json::from_str(&raw_keys)
            .with_context(|| format!("{} must be a JSON string or array of strings", env::KEYS))?;

        let options = match lookup(env::OPTIONS) {
            Some(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse {}", env::OPTIONS))?,
            None => ShortcutOptions::default(),
        };

        let global = match lookup(env::GLOBAL).as_deref() {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => anyhow::bail!("{} must be true or false, got {other:?}", env::GLOBAL),
        };

        Ok(Self {
            keys,
            options,
            global,
            user_agent: lookup(env::USER_AGENT).filter(|agent| !agent.is_empty()),
        })
    }
}
