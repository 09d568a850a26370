//! Container page document
//!
//! Wraps an [`XmlDocument`] holding one locale node per language variant and
//! keeps two derived caches next to it: the page model per locale and the
//! bookmark index. Both are rebuilt from the XML after every structural
//! change, never patched.
//!
//! Writes resolve every reference against the store first, then rewrite a
//! copy of the DOM, marshal and re-parse it. The document is only replaced
//! once all of that succeeded.

use std::collections::HashMap;

use uuid::Uuid;

use super::beans::{Container, ContainerElement, ContainerPage};
use super::errors::PageError;
use super::link::{read_link_id, write_link};
use super::nodes::{PageNode, DEFAULT_LOCALE_NODE, DEFAULT_ROOT_NODE, LANGUAGE_ATTRIBUTE};
use super::properties::{read_properties, resolve_properties, write_properties, ResolvedProperty};
use crate::dom::{NodeId, XmlDocument};
use crate::index::{BookmarkIndex, BookmarkPath};
use crate::locale::{resolve_locale, Locale};
use crate::store::{RequestContext, Resource};

/// A parsed container page with its derived page model and bookmarks
#[derive(Debug, Clone)]
pub struct ContainerPageDocument {
    document: XmlDocument,
    locales: Vec<Locale>,
    locale_nodes: HashMap<Locale, NodeId>,
    pages: HashMap<Locale, ContainerPage>,
    bookmarks: BookmarkIndex,
}

/// An element whose references are all resolved
struct ResolvedElement {
    uri: Resource,
    formatter: Option<Resource>,
    create_new: bool,
    properties: Vec<ResolvedProperty>,
}

struct ResolvedContainer<'p> {
    container: &'p Container,
    elements: Vec<ResolvedElement>,
}

impl ContainerPageDocument {
    /// Parse raw XML bytes
    pub fn parse(input: &[u8]) -> Result<Self, PageError> {
        Self::from_document(XmlDocument::parse(input)?)
    }

    /// Read and parse the content of a stored resource
    pub fn load(ctx: &RequestContext<'_>, resource: &Resource) -> Result<Self, PageError> {
        let content = ctx.store.read_file(resource)?;
        Self::parse(&content)
    }

    /// Empty document with a single locale variant
    pub fn create(locale: &Locale) -> Result<Self, PageError> {
        let mut document = XmlDocument::new(DEFAULT_ROOT_NODE);
        let root = document
            .root_element_id()
            .ok_or_else(|| PageError::malformed("document has no root element"))?;
        let node = document.append_element(root, DEFAULT_LOCALE_NODE);
        document.set_attribute(node, LANGUAGE_ATTRIBUTE, locale.as_str());
        Self::from_document(document)
    }

    /// Build the page model and bookmarks from a DOM
    pub fn from_document(document: XmlDocument) -> Result<Self, PageError> {
        let mut page_doc = ContainerPageDocument {
            document,
            locales: Vec::new(),
            locale_nodes: HashMap::new(),
            pages: HashMap::new(),
            bookmarks: BookmarkIndex::new(),
        };
        page_doc.init()?;
        Ok(page_doc)
    }

    // =========================================================================
    // Read path
    // =========================================================================

    fn init(&mut self) -> Result<(), PageError> {
        self.locales.clear();
        self.locale_nodes.clear();
        self.pages.clear();
        self.bookmarks.clear();

        let root = self
            .document
            .root_element_id()
            .ok_or_else(|| PageError::malformed("document has no root element"))?;
        let locale_nodes: Vec<NodeId> = self.document.child_elements(root).collect();

        for node in locale_nodes {
            let locale = self
                .document
                .attribute(node, LANGUAGE_ATTRIBUTE)
                .map(|tag| Locale::new(tag.trim()))
                .filter(|locale| !locale.as_str().is_empty())
                .ok_or_else(|| PageError::malformed("locale node without language attribute"))?;
            if self.locale_nodes.contains_key(&locale) {
                return Err(PageError::DuplicateLocale { locale });
            }

            let page = self.read_page(node, &locale)?;
            self.locales.push(locale.clone());
            self.locale_nodes.insert(locale.clone(), node);
            self.pages.insert(locale, page);
        }
        Ok(())
    }

    fn read_page(&mut self, locale_node: NodeId, locale: &Locale) -> Result<ContainerPage, PageError> {
        let doc = &self.document;
        let bookmarks = &mut self.bookmarks;
        let mut containers = Vec::new();

        let container_nodes: Vec<NodeId> = doc
            .child_elements_named(locale_node, PageNode::Containers.name())
            .collect();
        for (c, container_node) in container_nodes.into_iter().enumerate() {
            let context = || BookmarkPath::Container { container: c }.to_string();
            let attribute_context = || format!("{}/{}", context(), PageNode::Attribute.name());

            let mut attributes = HashMap::new();
            for attribute in doc.child_elements_named(container_node, PageNode::Attribute.name()) {
                let key = required_child(doc, attribute, PageNode::Key, attribute_context)?;
                let value = required_child(doc, attribute, PageNode::Value, attribute_context)?;
                attributes.insert(doc.text(key), doc.text(value));
            }

            bookmarks.add_bookmark(BookmarkPath::Container { container: c }, locale, true, container_node);
            let name = required_child(doc, container_node, PageNode::Name, context)?;
            bookmarks.add_bookmark(
                BookmarkPath::ContainerField { container: c, field: PageNode::Name.name() },
                locale,
                false,
                name,
            );
            let container_type = required_child(doc, container_node, PageNode::Type, context)?;
            bookmarks.add_bookmark(
                BookmarkPath::ContainerField { container: c, field: PageNode::Type.name() },
                locale,
                false,
                container_type,
            );

            let mut elements = Vec::new();
            let element_nodes: Vec<NodeId> = doc
                .child_elements_named(container_node, PageNode::Elements.name())
                .collect();
            for (e, element_node) in element_nodes.into_iter().enumerate() {
                let path = BookmarkPath::Element { container: c, element: e };
                bookmarks.add_bookmark(path, locale, true, element_node);

                let uri = required_child(doc, element_node, PageNode::Uri, || path.to_string())?;
                bookmarks.add_bookmark(element_field(c, e, PageNode::Uri), locale, false, uri);
                let id = read_link_id(doc, uri);

                let mut formatter_id = None;
                if let Some(formatter) = doc.first_child_named(element_node, PageNode::Formatter.name()) {
                    bookmarks.add_bookmark(element_field(c, e, PageNode::Formatter), locale, false, formatter);
                    formatter_id = read_link_id(doc, formatter);
                }

                let mut create_new = false;
                if let Some(flag) = doc.first_child_named(element_node, PageNode::CreateNew.name()) {
                    bookmarks.add_bookmark(element_field(c, e, PageNode::CreateNew), locale, false, flag);
                    create_new = doc.text(flag).trim().eq_ignore_ascii_case("true");
                }

                let (settings, property_nodes) = read_properties(doc, element_node)?;
                for (p, property_node) in property_nodes.into_iter().enumerate() {
                    bookmarks.add_bookmark(
                        BookmarkPath::ElementProperty { container: c, element: e, property: p },
                        locale,
                        true,
                        property_node,
                    );
                }

                match id {
                    Some(id) => elements.push(ContainerElement {
                        id,
                        formatter_id,
                        settings,
                        create_new,
                    }),
                    None => tracing::debug!(path = %path, locale = %locale, "Dropping element without a resolvable link"),
                }
            }

            let mut container = Container::new(doc.text(name), doc.text(container_type), elements);
            container.attributes = attributes;
            containers.push(container);
        }

        Ok(ContainerPage::new(locale.clone(), containers))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Locales in document order
    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    pub fn has_locale(&self, locale: &Locale) -> bool {
        self.locale_nodes.contains_key(locale)
    }

    /// Page model of one locale
    pub fn container_page(&self, locale: &Locale) -> Option<&ContainerPage> {
        let page = self.pages.get(locale);
        if page.is_none() {
            tracing::warn!(locale = %locale, "No container page for locale");
        }
        page
    }

    /// Page model for the locale chosen from the request context
    ///
    /// Prefers the request locale, then the catalog default, then the first
    /// locale of the document.
    pub fn resolve_container_page(&self, ctx: &RequestContext<'_>) -> Option<&ContainerPage> {
        let locale = resolve_locale(ctx.request_locale, ctx.locales, &self.locales)?;
        self.pages.get(&locale)
    }

    pub fn bookmarks(&self) -> &BookmarkIndex {
        &self.bookmarks
    }

    /// Text of the node registered at `path`
    pub fn value(&self, path: &BookmarkPath, locale: &Locale) -> Option<String> {
        self.bookmarks
            .lookup(path, locale)
            .map(|bookmark| self.document.text(bookmark.node))
    }

    pub fn document(&self) -> &XmlDocument {
        &self.document
    }

    /// Serialize the current XML
    pub fn marshal(&self) -> String {
        self.document.marshal()
    }

    // =========================================================================
    // Locale variants
    // =========================================================================

    /// Add an empty variant for `locale`
    pub fn add_locale(&mut self, locale: &Locale) -> Result<(), PageError> {
        if self.has_locale(locale) {
            return Err(PageError::DuplicateLocale { locale: locale.clone() });
        }
        let mut document = self.document.clone();
        append_locale_node(&mut document, locale)?;
        *self = Self::from_document(document)?;
        Ok(())
    }

    /// Remove the variant for `locale`
    pub fn remove_locale(&mut self, locale: &Locale) -> Result<(), PageError> {
        let node = *self
            .locale_nodes
            .get(locale)
            .ok_or_else(|| PageError::MissingLocale { locale: locale.clone() })?;
        let mut document = self.document.clone();
        document.detach(node);
        *self = Self::from_document(document)?;
        Ok(())
    }

    // =========================================================================
    // Write path
    // =========================================================================

    /// Replace the containers of `page` in the variant for `locale`
    ///
    /// Containers of the current variant that `page` does not name are kept
    /// after the new ones, in their current order. The variant is created if
    /// missing.
    pub fn write_container_page(
        &mut self,
        ctx: &RequestContext<'_>,
        locale: &Locale,
        page: &ContainerPage,
    ) -> Result<(), PageError> {
        let merged = match self.pages.get(locale) {
            Some(previous) => page.merged_with(previous),
            None => page.clone(),
        };
        let resolved = resolve_page(ctx, &merged)?;

        let mut document = self.document.clone();
        let locale_node = match self.locale_nodes.get(locale) {
            Some(&node) => node,
            None => append_locale_node(&mut document, locale)?,
        };
        save_container_page(&mut document, locale_node, &resolved);

        let reparsed = XmlDocument::parse(document.marshal().as_bytes())?;
        *self = Self::from_document(reparsed)?;
        tracing::debug!(locale = %locale, containers = merged.len(), "Container page written");
        Ok(())
    }

    /// Serialized document as it would look after [`Self::write_container_page`],
    /// leaving `self` unchanged
    pub fn create_container_page_xml(
        &self,
        ctx: &RequestContext<'_>,
        locale: &Locale,
        page: &ContainerPage,
    ) -> Result<Vec<u8>, PageError> {
        let mut copy = self.clone();
        copy.write_container_page(ctx, locale, page)?;
        Ok(copy.marshal().into_bytes())
    }

    /// Write `page` and persist the result to `resource`
    ///
    /// The resource is locked for the write and unlocked afterwards, also when
    /// the write fails. `self` only changes if the store accepted the content.
    pub fn save(
        &mut self,
        ctx: &RequestContext<'_>,
        resource: &Resource,
        locale: &Locale,
        page: &ContainerPage,
    ) -> Result<Resource, PageError> {
        let mut updated = self.clone();
        updated.write_container_page(ctx, locale, page)?;
        let content = updated.marshal();

        ctx.store.lock_resource(resource)?;
        let written = ctx.store.write_file(resource, content.as_bytes());
        let unlocked = ctx.store.unlock_resource(resource);

        let written = written?;
        *self = updated;
        unlocked?;
        tracing::info!(path = %resource.root_path, locale = %locale, version = written.version, "Container page saved");
        Ok(written)
    }
}

fn required_child(
    doc: &XmlDocument,
    parent: NodeId,
    node: PageNode,
    context: impl Fn() -> String,
) -> Result<NodeId, PageError> {
    doc.first_child_named(parent, node.name())
        .ok_or_else(|| PageError::malformed(format!("{} is missing {}", context(), node.name())))
}

fn element_field(container: usize, element: usize, node: PageNode) -> BookmarkPath {
    BookmarkPath::ElementField { container, element, field: node.name() }
}

/// Append a locale node named like its siblings
fn append_locale_node(document: &mut XmlDocument, locale: &Locale) -> Result<NodeId, PageError> {
    let root = document
        .root_element_id()
        .ok_or_else(|| PageError::malformed("document has no root element"))?;
    let node_name = document
        .child_elements(root)
        .next()
        .and_then(|sibling| document.node_name(sibling))
        .unwrap_or(DEFAULT_LOCALE_NODE)
        .to_string();
    let node = document.append_element(root, &node_name);
    document.set_attribute(node, LANGUAGE_ATTRIBUTE, locale.as_str());
    Ok(node)
}

fn resolve_reference(ctx: &RequestContext<'_>, id: Uuid) -> Result<Resource, PageError> {
    ctx.store
        .read_resource(id)
        .map_err(|source| PageError::UnresolvableReference { id, source })
}

fn resolve_page<'p>(ctx: &RequestContext<'_>, page: &'p ContainerPage) -> Result<Vec<ResolvedContainer<'p>>, PageError> {
    page.iter()
        .map(|container| -> Result<ResolvedContainer<'p>, PageError> {
            let elements = container
                .elements
                .iter()
                .map(|element| -> Result<ResolvedElement, PageError> {
                    let uri = resolve_reference(ctx, element.id)?;
                    let formatter = element
                        .formatter_id
                        .map(|id| resolve_reference(ctx, id))
                        .transpose()?;
                    let definitions = ctx.properties.element_settings(&uri)?;
                    let properties = resolve_properties(ctx, &element.settings, &definitions)?;
                    Ok(ResolvedElement {
                        uri,
                        formatter,
                        create_new: element.create_new,
                        properties,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ResolvedContainer { container, elements })
        })
        .collect()
}

/// Replace the content of a locale node with the resolved containers
fn save_container_page(document: &mut XmlDocument, locale_node: NodeId, containers: &[ResolvedContainer<'_>]) {
    document.clear_content(locale_node);

    for resolved in containers {
        let container = resolved.container;
        let cnt = document.append_element(locale_node, PageNode::Containers.name());
        let name = document.append_element(cnt, PageNode::Name.name());
        document.append_cdata(name, &container.name);
        let container_type = document.append_element(cnt, PageNode::Type.name());
        document.append_cdata(container_type, &container.container_type);

        let mut attributes: Vec<(&String, &String)> = container.attributes.iter().collect();
        attributes.sort();
        for (key, value) in attributes {
            let attribute = document.append_element(cnt, PageNode::Attribute.name());
            let key_node = document.append_element(attribute, PageNode::Key.name());
            document.append_cdata(key_node, key);
            let value_node = document.append_element(attribute, PageNode::Value.name());
            document.append_cdata(value_node, value);
        }

        for element in &resolved.elements {
            let elem = document.append_element(cnt, PageNode::Elements.name());
            let uri = document.append_element(elem, PageNode::Uri.name());
            write_link(document, uri, &element.uri);
            let formatter = document.append_element(elem, PageNode::Formatter.name());
            if let Some(resource) = &element.formatter {
                write_link(document, formatter, resource);
            }
            if element.create_new {
                let flag = document.append_element(elem, PageNode::CreateNew.name());
                document.append_text(flag, "true");
            }
            write_properties(document, elem, &element.properties);
        }
    }
}
