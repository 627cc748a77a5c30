//! Key specifier parsing
//!
//! A specifier is either a bare key name compared verbatim against
//! `KeyboardEvent.key`, or a `<modifier>+<key>` combination.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Modifier names accepted in combination specifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Command key, only honoured on mac-like platforms
    Cmd,
    /// Control key, only honoured on other platforms
    Ctrl,
}

impl Modifier {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "cmd" => Some(Self::Cmd),
            "ctrl" => Some(Self::Ctrl),
            _ => None,
        }
    }
}

/// The parsed shape of a specifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Matches `event.key` exactly, whatever modifiers are held
    Bare(String),
    /// Matches `event.key` with the platform modifier held
    Combo { modifier: Modifier, key: String },
    /// Contains `+` but names no known modifier; never matches
    Unrecognized,
}

/// A single shortcut trigger as written by the caller
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct KeySpecifier {
    raw: String,
    trigger: Trigger,
}

impl KeySpecifier {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let trigger = Self::parse(&raw);
        Self { raw, trigger }
    }

    /// Any `+` makes this a combination. Only the first two segments are
    /// considered, so `"+"` and `"ctrl++"` can never match.
    fn parse(raw: &str) -> Trigger {
        if !raw.contains('+') {
            return Trigger::Bare(raw.to_owned());
        }

        let mut parts = raw.split('+');
        let modifier = parts.next().and_then(Modifier::parse);
        let key = parts.next().unwrap_or_default();

        match modifier {
            Some(modifier) if !key.is_empty() => Trigger::Combo {
                modifier,
                key: key.to_owned(),
            },
            _ => Trigger::Unrecognized,
        }
    }

    /// The specifier exactly as supplied; this is what `on_key` receives
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }
}

impl fmt::Display for KeySpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<String> for KeySpecifier {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for KeySpecifier {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<KeySpecifier> for String {
    fn from(spec: KeySpecifier) -> Self {
        spec.raw
    }
}
