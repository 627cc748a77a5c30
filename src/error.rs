//! Error types for shortcut configuration

/// Errors that can occur while deriving a shortcut handler
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShortcutError {
    #[error("shortcut needs at least one key specifier")]
    EmptyKeys,

    #[error("debounced shortcuts need a tokio runtime")]
    NoRuntime,
}
