//! End-to-end behaviour of the hook and the container component against a
//! document holding a small form.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use keyshortcut::{
    Document, Element, KeyEvent, ListenerTarget, OnKey, Platform, PlatformProbe, Shortcut,
    ShortcutConfig, ShortcutHook, ShortcutOptions, UserAgent,
};

const MAC_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36";
const WINDOWS_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                             (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Records `(matched, key)` for every callback
#[derive(Clone, Default)]
struct Calls(Arc<Mutex<Vec<(String, String)>>>);

impl Calls {
    fn on_key(&self) -> OnKey {
        let calls = Arc::clone(&self.0);
        OnKey::new(move |matched, event| {
            calls.lock().push((matched.to_owned(), event.key.clone()))
        })
    }

    fn len(&self) -> usize {
        self.0.lock().len()
    }

    fn matched(&self) -> Vec<String> {
        self.0.lock().iter().map(|(m, _)| m.clone()).collect()
    }
}

struct Page {
    document: Arc<Document>,
    shortcut: Shortcut,
    form: Arc<Element>,
    first_name: Arc<Element>,
    textarea: Arc<Element>,
    button: Arc<Element>,
}

impl Page {
    fn new(platform: Arc<dyn PlatformProbe>) -> Self {
        let document = Document::new();
        let shortcut = Shortcut::mount(&document, platform, None);
        let form = document.append(Some(shortcut.element()), "form", &[("data-testid", "form")]);
        let first_name = document.append(
            Some(&form),
            "input",
            &[("type", "text"), ("placeholder", "First Name")],
        );
        let textarea = document.append(Some(&form), "textarea", &[("placeholder", "Your Message")]);
        let button = document.append(Some(&form), "button", &[]);

        Self {
            document,
            shortcut,
            form,
            first_name,
            textarea,
            button,
        }
    }

    fn render(&mut self, config: ShortcutConfig) {
        self.shortcut.render(&config).unwrap();
    }

    fn key_down(&self, target: &Arc<Element>, key: &str) -> Arc<KeyEvent> {
        self.document
            .dispatch_keydown(KeyEvent::new(key).with_target(target))
    }
}

#[test]
fn test_calls_on_key_for_specified_key() {
    let calls = Calls::default();
    let mut page = Page::new(Arc::new(Platform::Other));
    page.render(ShortcutConfig::new("a", calls.on_key()));

    page.key_down(&page.button, "a");
    assert_eq!(calls.matched(), ["a"]);
}

#[test]
fn test_key_presses_are_case_sensitive() {
    let calls = Calls::default();
    let mut page = Page::new(Arc::new(Platform::Other));
    page.render(ShortcutConfig::new("a", calls.on_key()));

    page.key_down(&page.button, "A");
    assert_eq!(calls.len(), 0);
}

#[test]
fn test_any_key_in_the_list_triggers() {
    let calls = Calls::default();
    let mut page = Page::new(Arc::new(Platform::Other));
    page.render(ShortcutConfig::new(["a", "b", "c"], calls.on_key()));

    for key in ["a", "b", "c", "d"] {
        page.key_down(&page.button, key);
    }
    assert_eq!(calls.matched(), ["a", "b", "c"]);
}

#[test]
fn test_excluded_targets_do_not_call_back() {
    let calls = Calls::default();
    let mut page = Page::new(Arc::new(Platform::Other));
    page.render(
        ShortcutConfig::new(["a"], calls.on_key())
            .with_options(ShortcutOptions::default().with_exclude_selectors(["input"])),
    );

    page.key_down(&page.first_name, "a");
    page.key_down(&page.textarea, "a");
    page.key_down(&page.button, "a");
    assert_eq!(calls.len(), 2);
}

#[test]
fn test_prevent_default_marks_matched_events() {
    let calls = Calls::default();
    let mut page = Page::new(Arc::new(Platform::Other));
    page.render(
        ShortcutConfig::new(["Enter", "a"], calls.on_key())
            .with_options(ShortcutOptions::default().with_prevent_default()),
    );

    let matched = page.key_down(&page.form, "Enter");
    let unmatched = page.key_down(&page.form, "b");
    assert!(matched.default_prevented());
    assert!(!unmatched.default_prevented());
}

#[test]
fn test_prevent_default_applies_to_excluded_targets() {
    let calls = Calls::default();
    let mut page = Page::new(Arc::new(Platform::Other));
    page.render(
        ShortcutConfig::new("Enter", calls.on_key()).with_options(
            ShortcutOptions::default()
                .with_prevent_default()
                .with_exclude_selectors(["input"]),
        ),
    );

    let event = page.key_down(&page.first_name, "Enter");
    assert!(event.default_prevented());
    assert_eq!(calls.len(), 0);
}

#[test]
fn test_cmd_k_on_mac() {
    let calls = Calls::default();
    let mut page = Page::new(Arc::new(UserAgent::new(MAC_AGENT)));
    page.render(ShortcutConfig::new("cmd+k", calls.on_key()));

    page.document
        .dispatch_keydown(KeyEvent::new("k").with_meta().with_target(&page.button));
    page.document
        .dispatch_keydown(KeyEvent::new("k").with_ctrl().with_target(&page.button));
    assert_eq!(calls.matched(), ["cmd+k"]);
}

#[test]
fn test_ctrl_k_on_windows() {
    let calls = Calls::default();
    let mut page = Page::new(Arc::new(UserAgent::new(WINDOWS_AGENT)));
    page.render(ShortcutConfig::new(["cmd+k", "ctrl+k"], calls.on_key()));

    page.document
        .dispatch_keydown(KeyEvent::new("k").with_meta().with_target(&page.button));
    page.document
        .dispatch_keydown(KeyEvent::new("k").with_ctrl().with_target(&page.button));
    assert_eq!(calls.matched(), ["ctrl+k"]);
}

#[test]
fn test_global_listens_on_document() {
    let calls = Calls::default();
    let mut page = Page::new(Arc::new(Platform::Other));
    page.render(ShortcutConfig::new("a", calls.on_key()).global(true));

    page.document.dispatch_keydown(KeyEvent::new("a"));
    assert_eq!(calls.len(), 1);

    // Focus does not matter, and bubbling does not double count
    page.key_down(&page.button, "a");
    assert_eq!(calls.len(), 2);
}

#[test]
fn test_global_stops_after_unmount() {
    let calls = Calls::default();
    let document = Document::new();
    let mut hook = ShortcutHook::new(Arc::clone(&document), Arc::new(Platform::Other));
    hook.use_shortcut(&ShortcutConfig::new("a", calls.on_key()).global(true))
        .unwrap();

    document.dispatch_keydown(KeyEvent::new("a"));
    drop(hook);
    document.dispatch_keydown(KeyEvent::new("a"));
    assert_eq!(calls.len(), 1);
}

#[test]
fn test_rerendering_does_not_duplicate_global_listener() {
    let calls = Calls::default();
    let on_key = calls.on_key();
    let mut page = Page::new(Arc::new(Platform::Other));
    for _ in 0..5 {
        page.render(ShortcutConfig::new(vec!["a"], on_key.clone()).global(true));
    }

    assert_eq!(page.document.listener_count(ListenerTarget::Document), 1);
    page.document.dispatch_keydown(KeyEvent::new("a"));
    assert_eq!(calls.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_debounce_collapses_burst_to_last_event() {
    let calls = Calls::default();
    let mut page = Page::new(Arc::new(Platform::Other));
    page.render(
        ShortcutConfig::new(["a", "b"], calls.on_key())
            .with_options(ShortcutOptions::default().with_debounce(200)),
    );

    page.key_down(&page.button, "a");
    page.key_down(&page.button, "a");
    page.key_down(&page.button, "b");
    assert_eq!(calls.len(), 0);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(calls.len(), 0);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(calls.matched(), ["b"]);
}

#[tokio::test(start_paused = true)]
async fn test_debounced_global_listener_is_cancelled_on_unmount() {
    let calls = Calls::default();
    let mut page = Page::new(Arc::new(Platform::Other));
    page.render(
        ShortcutConfig::new("a", calls.on_key())
            .global(true)
            .with_options(ShortcutOptions::default().with_debounce(200)),
    );

    page.document.dispatch_keydown(KeyEvent::new("a"));
    let Page { document, shortcut, .. } = page;
    shortcut.unmount();

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(calls.len(), 0);
    assert_eq!(document.listener_count(ListenerTarget::Document), 0);
}

#[tokio::test(start_paused = true)]
async fn test_changing_debounce_interval_replaces_global_listener() {
    let calls = Calls::default();
    let on_key = calls.on_key();
    let document = Document::new();
    let mut hook = ShortcutHook::new(Arc::clone(&document), Arc::new(Platform::Other));

    let config = |millis| {
        ShortcutConfig::new("a", on_key.clone())
            .global(true)
            .with_options(ShortcutOptions::default().with_debounce(millis))
    };

    hook.use_shortcut(&config(200)).unwrap();
    // Pending under the 200ms listener, dropped by the re-render below
    document.dispatch_keydown(KeyEvent::new("a"));

    hook.use_shortcut(&config(300)).unwrap();
    assert_eq!(document.listener_count(ListenerTarget::Document), 1);
    document.dispatch_keydown(KeyEvent::new("a"));

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(calls.len(), 0);

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(calls.len(), 1);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(calls.len(), 1);
}
