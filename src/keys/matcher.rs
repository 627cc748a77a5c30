//! First-match-wins resolution of a specifier list against a key event

use crate::events::KeyEvent;
use crate::platform::PlatformProbe;

use super::specifier::{KeySpecifier, Modifier, Trigger};

/// Return the first specifier in `specifiers` satisfied by `event`.
///
/// Bare specifiers compare `event.key` exactly and ignore modifier state.
/// `cmd+` requires a mac-like platform and `meta_key`; `ctrl+` requires a
/// non-mac platform and `ctrl_key`.
pub fn match_key<'a>(
    specifiers: &'a [KeySpecifier],
    event: &KeyEvent,
    platform: &dyn PlatformProbe,
) -> Option<&'a KeySpecifier> {
    let mac_like = platform.is_mac_like();

    specifiers.iter().find(|spec| match spec.trigger() {
        Trigger::Bare(key) => *key == event.key,
        Trigger::Combo { modifier, key } => {
            if *key != event.key {
                return false;
            }
            match modifier {
                Modifier::Cmd => event.meta_key && mac_like,
                Modifier::Ctrl => event.ctrl_key && !mac_like,
            }
        }
        Trigger::Unrecognized => false,
    })
}
