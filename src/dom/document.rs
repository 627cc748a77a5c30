//! The host document: connected elements and keydown listener lists

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use crate::events::KeyEvent;
use crate::hook::KeyHandler;

use super::element::{Element, ElementId};
use super::selector::{Selector, SelectorError};
use super::subscription::Subscription;

/// Identity of a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Where a keydown listener is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    /// The document-wide keydown stream
    Document,
    /// A single element's own keydown stream
    Element(ElementId),
}

struct Listener {
    id: ListenerId,
    target: ListenerTarget,
    handler: KeyHandler,
}

/// A minimal document holding elements and keydown listeners
pub struct Document {
    elements: RwLock<Vec<Arc<Element>>>,
    listeners: Mutex<Vec<Listener>>,
    next_element: AtomicU64,
    next_listener: AtomicU64,
}

impl Document {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            elements: RwLock::new(Vec::new()),
            listeners: Mutex::new(Vec::new()),
            next_element: AtomicU64::new(1),
            next_listener: AtomicU64::new(1),
        })
    }

    /// Create an element and connect it under `parent` (or at the root)
    pub fn append(
        &self,
        parent: Option<&Arc<Element>>,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> Arc<Element> {
        let id = ElementId(self.next_element.fetch_add(1, Ordering::Relaxed));
        let element = Arc::new(Element::new(id, tag, attributes, parent.cloned()));
        self.elements.write().push(Arc::clone(&element));
        element
    }

    /// Disconnect `element` and its whole subtree
    pub fn remove_element(&self, element: &Element) {
        let mut elements = self.elements.write();
        let before = elements.len();
        elements.retain(|el| !el.is_inclusive_descendant_of(element));
        trace!(removed = before - elements.len(), "elements removed");
    }

    pub fn is_connected(&self, element: &Element) -> bool {
        self.elements.read().iter().any(|el| el.id() == element.id())
    }

    /// First connected element matching `selector`, in insertion order
    pub fn query_selector(&self, selector: &Selector) -> Option<Arc<Element>> {
        self.elements
            .read()
            .iter()
            .find(|el| el.matches(selector))
            .cloned()
    }

    pub fn query_selector_all(&self, selector: &Selector) -> Vec<Arc<Element>> {
        self.elements
            .read()
            .iter()
            .filter(|el| el.matches(selector))
            .cloned()
            .collect()
    }

    /// Parse `selector` and run [`Document::query_selector`]
    pub fn query(&self, selector: &str) -> Result<Option<Arc<Element>>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.query_selector(&selector))
    }

    /// Attach `handler` to `target`'s keydown stream.
    ///
    /// The listener stays registered until the returned [`Subscription`]
    /// is dropped.
    pub fn add_keydown_listener(
        self: &Arc<Self>,
        target: ListenerTarget,
        handler: KeyHandler,
    ) -> Subscription {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push(Listener {
            id,
            target,
            handler: handler.clone(),
        });
        debug!(?id, ?target, "keydown listener added");
        Subscription::new(Arc::downgrade(self), id, target, handler)
    }

    /// Returns whether the listener was still registered
    pub(crate) fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        before != listeners.len()
    }

    fn is_listening(&self, id: ListenerId) -> bool {
        self.listeners.lock().iter().any(|l| l.id == id)
    }

    /// Number of listeners attached to `target`
    pub fn listener_count(&self, target: ListenerTarget) -> usize {
        self.listeners
            .lock()
            .iter()
            .filter(|l| l.target == target)
            .count()
    }

    /// Fire a keydown at `event.target`, bubbling through its ancestors and
    /// then to the document.
    ///
    /// Listeners are snapshotted per node, so a handler may add or remove
    /// listeners while it runs; removed listeners that have not run yet are
    /// skipped. A disconnected target never reaches the document.
    pub fn dispatch_keydown(&self, event: KeyEvent) -> Arc<KeyEvent> {
        let event = Arc::new(event);

        let mut path = Vec::new();
        let mut reaches_document = true;
        if let Some(target) = &event.target {
            path.push(ListenerTarget::Element(target.id()));
            path.extend(target.ancestors().map(|el| ListenerTarget::Element(el.id())));
            reaches_document = self.is_connected(target);
        }
        if reaches_document {
            path.push(ListenerTarget::Document);
        }

        trace!(%event, nodes = path.len(), "dispatching keydown");

        for node in path {
            let snapshot: Vec<(ListenerId, KeyHandler)> = self
                .listeners
                .lock()
                .iter()
                .filter(|l| l.target == node)
                .map(|l| (l.id, l.handler.clone()))
                .collect();

            for (id, handler) in snapshot {
                if self.is_listening(id) {
                    handler.handle(&event);
                }
            }
        }

        event
    }
}
