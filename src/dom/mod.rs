//! In-process model of the host document
//!
//! Just enough DOM to route keydown events: elements with tags and
//! attributes, a CSS selector subset, and per-node listener lists with
//! bubbling from the target up to the document.

mod document;
mod element;
mod selector;
mod subscription;

pub use document::{Document, ListenerId, ListenerTarget};
pub use element::{Element, ElementId};
pub use selector::{Selector, SelectorError};
pub use subscription::Subscription;
