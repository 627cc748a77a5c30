//! The dispatch step run for every raw keydown

use std::sync::{Arc, Weak};

use tracing::{debug, trace, warn};

use crate::config::{OnKey, ShortcutOptions};
use crate::dom::{Document, Selector};
use crate::events::KeyEvent;
use crate::keys::{match_key, KeySpecifier};
use crate::platform::PlatformProbe;

/// Matching plus side effects for one shortcut configuration
pub(crate) struct Dispatch {
    keys: Vec<KeySpecifier>,
    on_key: OnKey,
    prevent_default: bool,
    exclude: Vec<Selector>,
    document: Weak<Document>,
    platform: Arc<dyn PlatformProbe>,
}

impl Dispatch {
    pub(crate) fn new(
        keys: Vec<KeySpecifier>,
        on_key: OnKey,
        options: &ShortcutOptions,
        document: &Arc<Document>,
        platform: Arc<dyn PlatformProbe>,
    ) -> Self {
        let exclude = options
            .exclude_selectors
            .iter()
            .flatten()
            .filter_map(|raw| match Selector::parse(raw) {
                Ok(selector) => Some(selector),
                Err(e) => {
                    warn!(selector = %raw, error = %e, "ignoring unparseable exclude selector");
                    None
                }
            })
            .collect();

        Self {
            keys,
            on_key,
            prevent_default: options.prevent_default,
            exclude,
            document: Arc::downgrade(document),
            platform,
        }
    }

    pub(crate) fn dispatch(&self, event: &KeyEvent) {
        let Some(matched) = match_key(&self.keys, event, self.platform.as_ref()) else {
            trace!(%event, "no shortcut matched");
            return;
        };

        // Default is prevented even when the target turns out to be excluded
        if self.prevent_default {
            event.prevent_default();
        }

        if let Some(selector) = self.excluding_selector(event) {
            debug!(key = %matched, %selector, "shortcut suppressed on excluded target");
            return;
        }

        debug!(key = %matched, %event, "shortcut matched");
        self.on_key.call(matched.as_str(), event);
    }

    /// A selector is only tested against the target when at least one
    /// connected element matches it
    fn excluding_selector(&self, event: &KeyEvent) -> Option<&Selector> {
        let target = event.target.as_ref()?;
        let document = self.document.upgrade()?;
        self.exclude
            .iter()
            .find(|selector| document.query_selector(selector).is_some() && target.matches(selector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;
    use parking_lot::Mutex;

    struct Fixture {
        document: Arc<Document>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                document: Document::new(),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn dispatch(&self, keys: &[&str], options: ShortcutOptions, platform: Platform) -> Dispatch {
            let calls = Arc::clone(&self.calls);
            Dispatch::new(
                keys.iter().map(|k| KeySpecifier::new(*k)).collect(),
                OnKey::new(move |key, _| calls.lock().push(key.to_owned())),
                &options,
                &self.document,
                Arc::new(platform),
            )
        }
    }

    #[test]
    fn test_callback_receives_matched_specifier() {
        let fx = Fixture::new();
        let dispatch = fx.dispatch(&["a", "ctrl+k"], ShortcutOptions::default(), Platform::Other);

        dispatch.dispatch(&KeyEvent::new("k").with_ctrl());
        dispatch.dispatch(&KeyEvent::new("a"));
        dispatch.dispatch(&KeyEvent::new("b"));
        assert_eq!(*fx.calls.lock(), ["ctrl+k", "a"]);
    }

    #[test]
    fn test_unmatched_event_has_no_side_effects() {
        let fx = Fixture::new();
        let options = ShortcutOptions::default().with_prevent_default();
        let dispatch = fx.dispatch(&["a"], options, Platform::Other);

        let event = KeyEvent::new("b");
        dispatch.dispatch(&event);
        assert!(!event.default_prevented());
        assert!(fx.calls.lock().is_empty());
    }

    #[test]
    fn test_prevent_default_runs_before_exclusion() {
        let fx = Fixture::new();
        let input = fx.document.append(None, "input", &[]);
        let options = ShortcutOptions::default()
            .with_prevent_default()
            .with_exclude_selectors(["input"]);
        let dispatch = fx.dispatch(&["Enter"], options, Platform::Other);

        let event = KeyEvent::new("Enter").with_target(&input);
        dispatch.dispatch(&event);
        assert!(event.default_prevented());
        assert!(fx.calls.lock().is_empty());
    }

    #[test]
    fn test_exclusion_applies_only_to_matching_targets() {
        let fx = Fixture::new();
        let form = fx.document.append(None, "form", &[]);
        let first = fx.document.append(Some(&form), "input", &[("placeholder", "First Name")]);
        let textarea = fx.document.append(Some(&form), "textarea", &[]);
        let button = fx.document.append(Some(&form), "button", &[]);
        let options = ShortcutOptions::default().with_exclude_selectors(["input"]);
        let dispatch = fx.dispatch(&["a"], options, Platform::Other);

        for target in [&first, &textarea, &button] {
            dispatch.dispatch(&KeyEvent::new("a").with_target(target));
        }
        assert_eq!(fx.calls.lock().len(), 2);
    }

    #[test]
    fn test_selector_without_document_match_is_skipped() {
        let fx = Fixture::new();
        // Connected only long enough to create the target
        let input = fx.document.append(None, "input", &[]);
        fx.document.remove_element(&input);

        let options = ShortcutOptions::default().with_exclude_selectors(["input"]);
        let dispatch = fx.dispatch(&["a"], options, Platform::Other);

        dispatch.dispatch(&KeyEvent::new("a").with_target(&input));
        assert_eq!(fx.calls.lock().len(), 1);
    }

    #[test]
    fn test_unparseable_selector_is_ignored() {
        let fx = Fixture::new();
        let input = fx.document.append(None, "input", &[]);
        let options = ShortcutOptions::default().with_exclude_selectors(["input[", "textarea"]);
        let dispatch = fx.dispatch(&["a"], options, Platform::Other);

        dispatch.dispatch(&KeyEvent::new("a").with_target(&input));
        assert_eq!(fx.calls.lock().len(), 1);
    }

    #[test]
    fn test_document_target_is_never_excluded() {
        let fx = Fixture::new();
        fx.document.append(None, "input", &[]);
        let options = ShortcutOptions::default().with_exclude_selectors(["*"]);
        let dispatch = fx.dispatch(&["a"], options, Platform::Other);

        dispatch.dispatch(&KeyEvent::new("a"));
        assert_eq!(fx.calls.lock().len(), 1);
    }
}
