//! Element setting definitions.
//!
//! The same record describes a setting declared by a resource type and an
//! `ADEField` entry of a configuration document.

use std::str::FromStr;

/// Storage type of an element setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyType {
    /// Plain text
    #[default]
    String,
    /// Comma separated list of resource structure ids, persisted as links
    VfsList,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::VfsList => "vfslist",
        }
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "" => Ok(PropertyType::String),
            "vfslist" => Ok(PropertyType::VfsList),
            other => Err(other.to_string()),
        }
    }
}

/// Definition of one element setting
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyDefinition {
    pub name: String,
    pub property_type: PropertyType,
    pub widget: Option<String>,
    pub widget_configuration: Option<String>,
    /// Validation pattern the value must match
    pub rule_regex: Option<String>,
    /// Severity of a failed validation (`error` or `warning`)
    pub rule_type: Option<String>,
    pub default: Option<String>,
    pub nice_name: Option<String>,
    pub description: Option<String>,
    /// Message shown when validation fails
    pub error: Option<String>,
    pub advanced: bool,
    pub select_inherit: bool,
}

impl PropertyDefinition {
    /// A plain string setting with no widget metadata
    pub fn string(name: impl Into<String>) -> Self {
        PropertyDefinition {
            name: name.into(),
            ..Default::default()
        }
    }

    /// A setting holding a list of resource references
    pub fn vfs_list(name: impl Into<String>) -> Self {
        PropertyDefinition {
            name: name.into(),
            property_type: PropertyType::VfsList,
            ..Default::default()
        }
    }

    pub fn is_vfs_list(&self) -> bool {
        self.property_type == PropertyType::VfsList
    }
}
