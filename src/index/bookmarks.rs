//! Bookmark Index - structural path lookup
//!
//! Maps a structural position inside one locale of a page document to the
//! DOM node holding its value. Rebuilt from scratch on every parse; the index
//! is never patched incrementally.

use std::collections::HashMap;
use std::fmt;

use crate::dom::NodeId;
use crate::locale::Locale;

/// Structured key for a bookmark
///
/// All indices are 0-based positions among same-named siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BookmarkPath {
    /// A `Containers` node
    Container { container: usize },
    /// A direct child of a container, e.g. `Name` or `Type`
    ContainerField { container: usize, field: &'static str },
    /// An `Elements` node
    Element { container: usize, element: usize },
    /// A direct child of an element, e.g. `Uri` or `Formatter`
    ElementField { container: usize, element: usize, field: &'static str },
    /// A `Properties` node of an element
    ElementProperty { container: usize, element: usize, property: usize },
}

/// Renders the 1-based XPath-like form, e.g. `Containers[1]/Elements[2]/Uri[1]`
impl fmt::Display for BookmarkPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BookmarkPath::Container { container } => write!(f, "Containers[{}]", container + 1),
            BookmarkPath::ContainerField { container, field } => {
                write!(f, "Containers[{}]/{}[1]", container + 1, field)
            }
            BookmarkPath::Element { container, element } => {
                write!(f, "Containers[{}]/Elements[{}]", container + 1, element + 1)
            }
            BookmarkPath::ElementField { container, element, field } => {
                write!(f, "Containers[{}]/Elements[{}]/{}[1]", container + 1, element + 1, field)
            }
            BookmarkPath::ElementProperty { container, element, property } => write!(
                f,
                "Containers[{}]/Elements[{}]/Properties[{}]",
                container + 1,
                element + 1,
                property + 1
            ),
        }
    }
}

/// A registered value handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bookmark {
    /// DOM node holding the value
    pub node: NodeId,
    /// Whether the node is a nested structure rather than a simple value
    pub structural: bool,
}

/// Flat `(path, locale) -> bookmark` map
#[derive(Debug, Default, Clone)]
pub struct BookmarkIndex {
    entries: HashMap<(BookmarkPath, Locale), Bookmark>,
}

impl BookmarkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value at a `(path, locale)` key
    ///
    /// Paths are unique by construction; a repeated key replaces the older
    /// entry and is logged.
    pub fn add_bookmark(&mut self, path: BookmarkPath, locale: &Locale, structural: bool, node: NodeId) {
        let previous = self
            .entries
            .insert((path, locale.clone()), Bookmark { node, structural });
        if previous.is_some() {
            tracing::warn!(path = %path, locale = %locale, "Duplicate bookmark registration, replacing");
        }
    }

    pub fn lookup(&self, path: &BookmarkPath, locale: &Locale) -> Option<Bookmark> {
        self.entries.get(&(*path, locale.clone())).copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All registered paths for one locale, sorted
    pub fn paths(&self, locale: &Locale) -> Vec<BookmarkPath> {
        let mut paths: Vec<BookmarkPath> = self
            .entries
            .keys()
            .filter(|(_, l)| l == locale)
            .map(|(p, _)| *p)
            .collect();
        paths.sort();
        paths
    }
}
