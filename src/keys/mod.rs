//! Key specifiers and shortcut matching
//!
//! Specifiers are plain strings (`"a"`, `"Enter"`, `"cmd+k"`); a shortcut
//! is configured with one or an ordered list of them.

mod matcher;
mod specifier;

use serde::{Deserialize, Serialize};

use crate::error::ShortcutError;

pub use matcher::match_key;
pub use specifier::{KeySpecifier, Modifier, Trigger};

/// One specifier or an ordered list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Keys {
    One(KeySpecifier),
    Many(Vec<KeySpecifier>),
}

impl Keys {
    /// Normalize into the ordered list used for matching
    pub fn to_list(&self) -> Result<Vec<KeySpecifier>, ShortcutError> {
        let list = match self {
            Keys::One(spec) => vec![spec.clone()],
            Keys::Many(specs) => specs.clone(),
        };

        if list.is_empty() {
            return Err(ShortcutError::EmptyKeys);
        }
        Ok(list)
    }
}

impl From<&str> for Keys {
    fn from(spec: &str) -> Self {
        Keys::One(spec.into())
    }
}

impl From<String> for Keys {
    fn from(spec: String) -> Self {
        Keys::One(spec.into())
    }
}

impl<S: Into<KeySpecifier>> From<Vec<S>> for Keys {
    fn from(specs: Vec<S>) -> Self {
        Keys::Many(specs.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<KeySpecifier>, const N: usize> From<[S; N]> for Keys {
    fn from(specs: [S; N]) -> Self {
        Keys::Many(specs.into_iter().map(Into::into).collect())
    }
}
