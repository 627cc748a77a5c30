//! Document elements
//!
//! Elements are immutable once created: tag, attributes and parent are
//! fixed, so they can be shared across threads behind an `Arc`.

use std::collections::BTreeMap;
use std::fmt;
use std::iter;
use std::sync::Arc;

use super::selector::Selector;

/// Identity of an element within its document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) u64);

/// A node in the host document
pub struct Element {
    id: ElementId,
    tag: String,
    attributes: BTreeMap<String, String>,
    parent: Option<Arc<Element>>,
}

impl Element {
    pub(crate) fn new(
        id: ElementId,
        tag: &str,
        attributes: &[(&str, &str)],
        parent: Option<Arc<Element>>,
    ) -> Self {
        Self {
            id,
            tag: tag.to_ascii_lowercase(),
            attributes: attributes
                .iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), (*value).to_owned()))
                .collect(),
            parent,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Lowercased tag name
    pub fn tag_name(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Value of the `id` attribute
    pub fn html_id(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class")
            .into_iter()
            .flat_map(str::split_ascii_whitespace)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn parent(&self) -> Option<&Arc<Element>> {
        self.parent.as_ref()
    }

    /// Parent, grandparent, ... up to the root
    pub fn ancestors(&self) -> impl Iterator<Item = &Arc<Element>> {
        iter::successors(self.parent.as_ref(), |&el| el.parent.as_ref())
    }

    /// Whether `other` is this element or one of its ancestors
    pub fn is_inclusive_descendant_of(&self, other: &Element) -> bool {
        self.id == other.id || self.ancestors().any(|a| a.id == other.id)
    }

    pub fn matches(&self, selector: &Selector) -> bool {
        selector.matches(self)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("attributes", &self.attributes)
            .field("parent", &self.parent.as_ref().map(|p| p.id))
            .finish()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attributes {
            write!(f, " {name}=\"{value}\"")?;
        }
        f.write_str(">")
    }
}
