//! Formatter bindings of a resource type.

use std::collections::{BTreeMap, HashMap};

/// One `Formatter` entry of a type configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterBinding {
    /// Root path of the formatter JSP
    pub jsp: String,
    /// Container type this formatter renders for
    pub container_type: Option<String>,
    /// Minimum container width, unparsed
    pub width: Option<String>,
}

/// Lookup tables compiled from a type's formatter bindings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatterConfiguration {
    by_type: HashMap<String, String>,
    by_width: BTreeMap<u32, String>,
}

impl FormatterConfiguration {
    /// Compile bindings into the type and width tables
    ///
    /// A binding with a container type goes to the type table, otherwise one
    /// with a numeric width goes to the width table. Bindings with neither
    /// are logged and ignored. Later bindings replace earlier ones with the
    /// same key.
    pub fn from_bindings<'b>(bindings: impl IntoIterator<Item = &'b FormatterBinding>, config_path: &str) -> Self {
        let mut config = FormatterConfiguration::default();
        for binding in bindings {
            if let Some(container_type) = binding.container_type.as_deref().filter(|t| !t.is_empty()) {
                config.by_type.insert(container_type.to_string(), binding.jsp.clone());
                continue;
            }
            match binding.width.as_deref().map(str::trim).map(str::parse::<u32>) {
                Some(Ok(width)) => {
                    config.by_width.insert(width, binding.jsp.clone());
                }
                _ => {
                    tracing::warn!(
                        config = config_path,
                        jsp = %binding.jsp,
                        width = ?binding.width,
                        "Formatter binding has neither a container type nor a valid width, ignoring"
                    );
                }
            }
        }
        config
    }

    /// Formatter per container type
    pub fn by_type(&self) -> &HashMap<String, String> {
        &self.by_type
    }

    /// Formatter per minimum width
    pub fn by_width(&self) -> &BTreeMap<u32, String> {
        &self.by_width
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty() && self.by_width.is_empty()
    }

    /// Pick the formatter for a container
    ///
    /// A container type match wins. Otherwise the binding with the largest
    /// width not exceeding `width` is used.
    pub fn formatter_for(&self, container_type: &str, width: Option<u32>) -> Option<&str> {
        if let Some(jsp) = self.by_type.get(container_type) {
            return Some(jsp);
        }
        let width = width?;
        self.by_width
            .range(..=width)
            .next_back()
            .map(|(_, jsp)| jsp.as_str())
    }
}
