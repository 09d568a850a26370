//! Locale tags and the locale selection policy shared by page and
//! configuration documents.

use std::fmt;

/// A language tag such as `en` or `de_CH`, as written in the `language`
/// attribute of a locale node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale(String);

impl Locale {
    pub fn new(tag: impl Into<String>) -> Self {
        Locale(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Locale::new(tag)
    }
}

impl From<String> for Locale {
    fn from(tag: String) -> Self {
        Locale(tag)
    }
}

/// Source of the system default locale.
pub trait LocaleCatalog: Send + Sync {
    fn default_locale(&self) -> Locale;
}

/// A catalog that always answers with the same default.
#[derive(Debug, Clone)]
pub struct FixedLocaleCatalog {
    default: Locale,
}

impl FixedLocaleCatalog {
    pub fn new(default: impl Into<Locale>) -> Self {
        FixedLocaleCatalog { default: default.into() }
    }
}

impl LocaleCatalog for FixedLocaleCatalog {
    fn default_locale(&self) -> Locale {
        self.default.clone()
    }
}

/// Pick the locale to read from a multi-locale document.
///
/// The requested locale wins if the document has it, then the catalog
/// default, then the first locale in document order. Returns `None` only
/// when `available` is empty.
pub fn resolve_locale(
    requested: Option<&Locale>,
    catalog: &dyn LocaleCatalog,
    available: &[Locale],
) -> Option<Locale> {
    if let Some(requested) = requested {
        if available.contains(requested) {
            return Some(requested.clone());
        }
    }
    let default = catalog.default_locale();
    if available.contains(&default) {
        return Some(default);
    }
    available.first().cloned()
}
