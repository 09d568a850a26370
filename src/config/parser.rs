//! Configuration document parser
//!
//! Reads the type, field and detail page declarations of one locale of a
//! configuration document:
//!
//! ```text
//! ADETypeConfiguration
//! └── ADETypeConfig language="en"
//!     ├── ADEType* { Source{link}, Destination{ Folder{link}?, Pattern? }?,
//!     │              Formatter* { Jsp{link}, Width?, Type? } }
//!     ├── ADEField* { Name, Type, Widget, ... }
//!     ├── DetailPage* { Type, Page{link} }
//!     ├── ADEExportName?
//!     ├── ContainerPageNameGenerator?
//!     └── MaxDepth?
//! ```
//!
//! A broken `ADEType` entry is logged and skipped; the rest of the document
//! is still read.

use std::collections::HashMap;

use uuid::Uuid;

use super::errors::ConfigError;
use super::formatter::{FormatterBinding, FormatterConfiguration};
use super::item::{ConfigurationItem, DetailPageInfo, LazyFolder};
use crate::containerpage::link::{read_link, Link};
use crate::containerpage::nodes::LANGUAGE_ATTRIBUTE;
use crate::dom::{NodeId, XmlDocument};
use crate::locale::{resolve_locale, Locale};
use crate::store::{PropertyDefinition, PropertyType, RequestContext, Resource};

pub const DEFAULT_MAX_DEPTH: u32 = 15;

pub const N_ADE_TYPE: &str = "ADEType";
pub const N_ADE_FIELD: &str = "ADEField";
pub const N_DETAIL_PAGE: &str = "DetailPage";
pub const N_ADE_EXPORTNAME: &str = "ADEExportName";
pub const N_ADE_NAME_GENERATOR: &str = "ContainerPageNameGenerator";
pub const N_MAXDEPTH: &str = "MaxDepth";
pub const N_SOURCE: &str = "Source";
pub const N_DESTINATION: &str = "Destination";
pub const N_FOLDER: &str = "Folder";
pub const N_PATTERN: &str = "Pattern";
pub const N_FORMATTER: &str = "Formatter";
pub const N_JSP: &str = "Jsp";
pub const N_WIDTH: &str = "Width";
pub const N_TYPE: &str = "Type";
pub const N_PAGE: &str = "Page";

/// Parsed configuration of one configuration document
#[derive(Debug, Clone, Default)]
pub struct ConfigurationParser {
    configuration: HashMap<String, ConfigurationItem>,
    type_order: Vec<String>,
    formatter_configuration: HashMap<String, FormatterConfiguration>,
    new_elements: Vec<Resource>,
    properties: Vec<PropertyDefinition>,
    detail_pages: Vec<DetailPageInfo>,
    export_name: Option<String>,
    name_generator: Option<String>,
    max_depth: u32,
}

impl ConfigurationParser {
    /// An empty configuration, e.g. as the target of [`Self::update`]
    pub fn new() -> Self {
        ConfigurationParser {
            max_depth: DEFAULT_MAX_DEPTH,
            ..Default::default()
        }
    }

    /// Read and parse a configuration resource
    pub fn parse(ctx: &RequestContext<'_>, resource: &Resource) -> Result<Self, ConfigError> {
        let content = ctx.store.read_file(resource)?;
        Self::from_xml(ctx, &content, &resource.root_path)
    }

    /// Parse configuration XML; `path` only labels log output and errors
    pub fn from_xml(ctx: &RequestContext<'_>, input: &[u8], path: &str) -> Result<Self, ConfigError> {
        let document = XmlDocument::parse(input)?;
        let mut parser = Self::new();
        parser.parse_document(ctx, &document, path)?;
        Ok(parser)
    }

    fn parse_document(&mut self, ctx: &RequestContext<'_>, doc: &XmlDocument, path: &str) -> Result<(), ConfigError> {
        let root = doc
            .root_element_id()
            .ok_or_else(|| ConfigError::NoTypeConfiguration { path: path.to_string() })?;

        let mut nodes: HashMap<Locale, NodeId> = HashMap::new();
        let mut locales = Vec::new();
        for node in doc.child_elements(root) {
            let Some(tag) = doc.attribute(node, LANGUAGE_ATTRIBUTE).map(str::trim).filter(|t| !t.is_empty()) else {
                tracing::warn!(config = path, "Locale node without language attribute, ignoring");
                continue;
            };
            let locale = Locale::from(tag);
            if !nodes.contains_key(&locale) {
                nodes.insert(locale.clone(), node);
                locales.push(locale);
            }
        }

        let locale = resolve_locale(ctx.request_locale, ctx.locales, &locales)
            .ok_or_else(|| ConfigError::NoTypeConfiguration { path: path.to_string() })?;
        let Some(&locale_node) = nodes.get(&locale) else {
            return Err(ConfigError::NoTypeConfiguration { path: path.to_string() });
        };
        tracing::debug!(config = path, locale = %locale, "Parsing configuration");

        for entry in doc.child_elements_named(locale_node, N_ADE_TYPE) {
            match self.parse_type(ctx, doc, entry, path) {
                Ok(()) => {}
                Err(e) if e.is_entry_error() => {
                    tracing::error!(config = path, error = %e, "Malformed type configuration entry, skipping");
                }
                Err(e) => return Err(e),
            }
        }

        for field in doc.child_elements_named(locale_node, N_ADE_FIELD) {
            match parse_field(doc, field) {
                Some(definition) => self.properties.push(definition),
                None => tracing::error!(config = path, "Field declaration without a name, skipping"),
            }
        }

        self.detail_pages = doc
            .child_elements_named(locale_node, N_DETAIL_PAGE)
            .filter_map(|node| parse_detail_page(doc, node))
            .collect();

        self.export_name = sub_text(doc, locale_node, N_ADE_EXPORTNAME);
        self.name_generator = sub_text(doc, locale_node, N_ADE_NAME_GENERATOR);
        if let Some(depth) = sub_text(doc, locale_node, N_MAXDEPTH) {
            match depth.parse::<u32>() {
                Ok(depth) => self.max_depth = depth,
                Err(_) => tracing::debug!(config = path, value = %depth, "Ignoring invalid max depth"),
            }
        }
        Ok(())
    }

    fn parse_type(
        &mut self,
        ctx: &RequestContext<'_>,
        doc: &XmlDocument,
        entry: NodeId,
        path: &str,
    ) -> Result<(), ConfigError> {
        let source_id = sub_link(doc, entry, N_SOURCE)
            .and_then(|link| link.structure_id)
            .ok_or_else(|| ConfigError::malformed("type entry without a source link"))?;
        let source = read_referenced(ctx, source_id, N_SOURCE)?;
        let type_name = source.type_name.clone();

        let destination = doc.first_child_named(entry, N_DESTINATION);
        let folder_id = destination
            .and_then(|node| sub_link(doc, node, N_FOLDER))
            .and_then(|link| link.structure_id);
        let pattern = destination.and_then(|node| sub_text(doc, node, N_PATTERN));

        let (folder, lazy_folder) = match folder_id {
            Some(id) => {
                let folder = read_referenced(ctx, id, N_FOLDER)?;
                (Some(folder.clone()), LazyFolder::Resolved(folder))
            }
            None => (None, LazyFolder::for_type(&type_name)),
        };

        let formatters: Vec<FormatterBinding> = doc
            .child_elements_named(entry, N_FORMATTER)
            .map(|node| FormatterBinding {
                jsp: sub_link(doc, node, N_JSP)
                    .map(|link| link.target)
                    .or_else(|| sub_text(doc, node, N_JSP))
                    .unwrap_or_default(),
                container_type: sub_text(doc, node, N_TYPE),
                width: sub_text(doc, node, N_WIDTH),
            })
            .collect();
        if !formatters.is_empty() {
            self.formatter_configuration
                .insert(type_name.clone(), FormatterConfiguration::from_bindings(&formatters, path));
        }

        self.add_new_element(source.clone());
        let item = ConfigurationItem {
            source,
            folder,
            lazy_folder,
            pattern,
            formatters,
        };
        self.insert_type(type_name, item);
        Ok(())
    }

    fn insert_type(&mut self, type_name: String, item: ConfigurationItem) {
        if self.configuration.insert(type_name.clone(), item).is_none() {
            self.type_order.push(type_name);
        }
    }

    fn add_new_element(&mut self, resource: Resource) {
        if !self
            .new_elements
            .iter()
            .any(|r| r.structure_id == resource.structure_id)
        {
            self.new_elements.push(resource);
        }
    }

    /// Type name to creation settings
    pub fn type_configuration(&self) -> &HashMap<String, ConfigurationItem> {
        &self.configuration
    }

    /// Configured type names in declaration order
    pub fn type_names(&self) -> &[String] {
        &self.type_order
    }

    pub fn formatter_configuration_for_type(&self, type_name: &str) -> Option<&FormatterConfiguration> {
        self.formatter_configuration.get(type_name)
    }

    /// Setting declarations from `ADEField` entries
    pub fn defined_properties(&self) -> &[PropertyDefinition] {
        &self.properties
    }

    pub fn detail_pages(&self) -> &[DetailPageInfo] {
        &self.detail_pages
    }

    pub fn export_name(&self) -> Option<&str> {
        self.export_name.as_deref()
    }

    /// Class name of the container page name generator
    pub fn name_generator_class(&self) -> Option<&str> {
        self.name_generator.as_deref()
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Prototype resources new elements can be created from, without duplicates
    pub fn new_elements(&self) -> &[Resource] {
        &self.new_elements
    }

    /// Merge the types, prototypes and formatters of `other` into `self`
    ///
    /// Types configured in both take the settings of `other`.
    pub fn update(&mut self, other: &ConfigurationParser) {
        for type_name in &other.type_order {
            if let Some(item) = other.configuration.get(type_name) {
                self.insert_type(type_name.clone(), item.clone());
            }
        }
        for resource in &other.new_elements {
            self.add_new_element(resource.clone());
        }
        self.formatter_configuration.extend(
            other
                .formatter_configuration
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
    }
}

fn read_referenced(ctx: &RequestContext<'_>, id: Uuid, node: &str) -> Result<Resource, ConfigError> {
    ctx.store
        .read_resource(id)
        .map_err(|e| ConfigError::malformed(format!("{node} {id} cannot be read: {e}")))
}

/// Trimmed text of a named child, `None` if absent or blank
fn sub_text(doc: &XmlDocument, parent: NodeId, name: &str) -> Option<String> {
    let node = doc.first_child_named(parent, name)?;
    let text = doc.text(node);
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn sub_link(doc: &XmlDocument, parent: NodeId, name: &str) -> Option<Link> {
    read_link(doc, doc.first_child_named(parent, name)?)
}

fn sub_flag(doc: &XmlDocument, parent: NodeId, name: &str) -> bool {
    sub_text(doc, parent, name).is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

fn parse_field(doc: &XmlDocument, field: NodeId) -> Option<PropertyDefinition> {
    let name = sub_text(doc, field, "Name")?;
    let property_type = match sub_text(doc, field, "Type").map(|t| t.parse::<PropertyType>()) {
        None => PropertyType::String,
        Some(Ok(property_type)) => property_type,
        Some(Err(other)) => {
            tracing::warn!(field = %name, property_type = %other, "Unknown setting type, using string");
            PropertyType::String
        }
    };
    Some(PropertyDefinition {
        name,
        property_type,
        widget: sub_text(doc, field, "Widget"),
        widget_configuration: sub_text(doc, field, "WidgetConfig"),
        rule_regex: sub_text(doc, field, "RuleRegex"),
        rule_type: sub_text(doc, field, "RuleType"),
        default: sub_text(doc, field, "Default"),
        nice_name: sub_text(doc, field, "NiceName"),
        description: sub_text(doc, field, "Description"),
        error: sub_text(doc, field, "Error"),
        advanced: sub_flag(doc, field, "Advanced"),
        select_inherit: sub_flag(doc, field, "SelectInherit"),
    })
}

fn parse_detail_page(doc: &XmlDocument, node: NodeId) -> Option<DetailPageInfo> {
    let type_name = sub_text(doc, node, N_TYPE)?;
    let link = sub_link(doc, node, N_PAGE)?;
    Some(DetailPageInfo {
        type_name,
        page_id: link.structure_id?,
        page_path: link.target,
    })
}
