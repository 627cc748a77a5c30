//! Shortcut handlers and their listener lifecycle
//!
//! - `dispatch`: match, prevent default, check exclusions, call back
//! - `handler`: the attachable [`KeyHandler`], immediate or debounced
//! - `manager`: [`ShortcutHook`], memoization and global subscription

mod dispatch;
mod handler;
mod manager;

#[cfg(test)]
pub(crate) use dispatch::Dispatch;
pub use handler::KeyHandler;
pub use manager::ShortcutHook;
