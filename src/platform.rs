//! Platform detection for modifier resolution
//!
//! `cmd+` shortcuts only fire on mac-like hosts and `ctrl+` shortcuts only
//! fire everywhere else. The host is identified through an injected
//! [`PlatformProbe`] so matching can be tested without a real environment.

use std::sync::Arc;

/// Environment variable carrying the host identification string
pub const USER_AGENT_ENV: &str = "KEYSHORTCUT_USER_AGENT";

/// Reports whether the host platform is mac-like
pub trait PlatformProbe: Send + Sync {
    fn is_mac_like(&self) -> bool;
}

/// A host identification string, e.g. a browser user agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgent(pub String);

impl UserAgent {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl PlatformProbe for UserAgent {
    fn is_mac_like(&self) -> bool {
        self.0.to_ascii_lowercase().contains("mac")
    }
}

/// A fixed answer, mostly useful in tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Mac,
    Other,
}

impl Platform {
    /// Probe the current process environment.
    ///
    /// `KEYSHORTCUT_USER_AGENT` wins when set; otherwise the compile target
    /// OS name is used as the identification string.
    pub fn detect() -> Arc<dyn PlatformProbe> {
        match std::env::var(USER_AGENT_ENV) {
            Ok(agent) if !agent.is_empty() => Arc::new(UserAgent(agent)),
            _ => Arc::new(UserAgent::new(std::env::consts::OS)),
        }
    }
}

impl PlatformProbe for Platform {
    fn is_mac_like(&self) -> bool {
        matches!(self, Platform::Mac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mac_user_agent() {
        let agent = UserAgent::new(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36",
        );
        assert!(agent.is_mac_like());
    }

    #[test]
    fn test_windows_user_agent() {
        let agent = UserAgent::new("Mozilla/5.0 (Windows NT 10.0; Win64; x64)");
        assert!(!agent.is_mac_like());
    }

    #[test]
    fn test_case_insensitive() {
        assert!(UserAgent::new("macos").is_mac_like());
        assert!(UserAgent::new("MACINTOSH").is_mac_like());
    }

    #[test]
    fn test_fixed_platform() {
        assert!(Platform::Mac.is_mac_like());
        assert!(!Platform::Other.is_mac_like());
    }
}
