//! XML Document - Arena-based DOM representation
//!
//! Owned, mutable DOM storage with:
//! - Arena allocation for nodes
//! - NodeId indices for traversal
//! - String interning for names and text
//!
//! The container page layer reads, clears and re-emits subtrees of this
//! document; everything structural goes through the methods below.

use super::errors::XmlError;
use super::node::{NodeId, NodeKind, XmlAttribute, XmlNode};
use super::strings::StringPool;
use crate::reader::events::{StartElement, XmlEvent};
use crate::reader::slice::SliceReader;

/// The document node is always the first arena entry
pub const DOCUMENT_NODE: NodeId = 0;

/// An XML document stored in arena format
#[derive(Debug, Clone)]
pub struct XmlDocument {
    /// Arena of nodes
    nodes: Vec<XmlNode>,
    /// Interned strings
    strings: StringPool,
    /// Root element node ID (not document node)
    root_element: Option<NodeId>,
}

impl XmlDocument {
    /// Create a document holding only an empty root element
    pub fn new(root_name: &str) -> Self {
        let mut doc = Self::empty();
        let root = doc.append_element(DOCUMENT_NODE, root_name);
        doc.root_element = Some(root);
        doc
    }

    fn empty() -> Self {
        let mut doc = XmlDocument {
            nodes: Vec::with_capacity(256),
            strings: StringPool::new(),
            root_element: None,
        };
        doc.nodes.push(XmlNode::document());
        doc
    }

    /// Parse an XML document from bytes
    ///
    /// The whole input must be well-formed: one root element, matching tags,
    /// no stray text outside the root.
    pub fn parse(input: &[u8]) -> Result<Self, XmlError> {
        std::str::from_utf8(input).map_err(|e| XmlError::InvalidUtf8 { position: e.valid_up_to() })?;

        let mut doc = Self::empty();
        doc.build_from_events(input)?;
        Ok(doc)
    }

    /// Build DOM from XML events
    fn build_from_events(&mut self, input: &[u8]) -> Result<(), XmlError> {
        let mut reader = SliceReader::new(input);
        let mut stack: Vec<NodeId> = vec![DOCUMENT_NODE];
        let mut tag_stack: Vec<&[u8]> = Vec::new();

        while let Some(event) = reader.next_event()? {
            let parent_id = *stack.last().unwrap_or(&DOCUMENT_NODE);
            let at_top_level = stack.len() == 1;

            match event {
                XmlEvent::StartElement(elem) | XmlEvent::EmptyElement(elem) if at_top_level && self.root_element.is_some() => {
                    return Err(XmlError::ContentAfterRoot { position: elem.position });
                }

                XmlEvent::StartElement(elem) => {
                    tag_stack.push(elem.name);
                    let node_id = self.handle_element(&elem, parent_id)?;
                    stack.push(node_id);
                }

                XmlEvent::EmptyElement(elem) => {
                    self.handle_element(&elem, parent_id)?;
                }

                XmlEvent::EndElement(end_elem) => match tag_stack.pop() {
                    Some(start_name) if start_name == end_elem.name => {
                        stack.pop();
                    }
                    Some(start_name) => {
                        return Err(XmlError::TagMismatch {
                            position: end_elem.position,
                            expected: String::from_utf8_lossy(start_name).into_owned(),
                            found: String::from_utf8_lossy(end_elem.name).into_owned(),
                        });
                    }
                    None => {
                        return Err(XmlError::syntax(end_elem.position, "end tag without matching start tag"));
                    }
                },

                XmlEvent::Text(content) => {
                    if at_top_level {
                        if !content.iter().all(|&b| crate::core::scanner::is_whitespace(b)) {
                            return Err(XmlError::ContentAfterRoot { position: reader.position() });
                        }
                        continue;
                    }
                    let text = to_str(&content, reader.position())?;
                    self.push_character_data(NodeKind::Text, parent_id, text);
                }

                XmlEvent::CData(content) => {
                    if at_top_level {
                        return Err(XmlError::syntax(reader.position(), "CDATA section not allowed at document level"));
                    }
                    let text = to_str(content, reader.position())?;
                    self.push_character_data(NodeKind::CData, parent_id, text);
                }

                XmlEvent::Comment(content) => {
                    let text = to_str(content, reader.position())?;
                    self.push_character_data(NodeKind::Comment, parent_id, text);
                }

                XmlEvent::ProcessingInstruction { target, data } => {
                    let target_id = self.strings.intern(to_str(target, reader.position())?);
                    let data_id = match data {
                        Some(d) => self.strings.intern(to_str(d, reader.position())?),
                        None => 0,
                    };
                    let node_id = self.nodes.len() as NodeId;
                    self.nodes.push(XmlNode::processing_instruction(target_id, data_id, Some(parent_id)));
                    self.link_child(parent_id, node_id);
                }

                // The writer emits its own declaration; DTDs are not used by these documents
                XmlEvent::XmlDeclaration { .. } | XmlEvent::DocType(_) => {}
            }
        }

        if let Some(unclosed) = tag_stack.first() {
            return Err(XmlError::UnclosedTag(String::from_utf8_lossy(unclosed).into_owned()));
        }
        if self.root_element.is_none() {
            return Err(XmlError::NoRootElement);
        }
        Ok(())
    }

    /// Handle start/empty element
    fn handle_element(&mut self, elem: &StartElement<'_>, parent_id: NodeId) -> Result<NodeId, XmlError> {
        let name = to_str(elem.name, elem.position)?;
        let node_id = self.append_element(parent_id, name);

        for attr in &elem.attributes {
            let attr_name = to_str(attr.name, elem.position)?;
            let attr_value = to_str(attr.value.as_ref(), elem.position)?;
            let xml_attr = XmlAttribute {
                name_id: self.strings.intern(attr_name),
                value_id: self.strings.intern(attr_value),
            };
            self.nodes[node_id as usize].attributes.push(xml_attr);
        }

        if self.root_element.is_none() && parent_id == DOCUMENT_NODE {
            self.root_element = Some(node_id);
        }
        Ok(node_id)
    }

    fn push_character_data(&mut self, kind: NodeKind, parent_id: NodeId, text: &str) -> NodeId {
        let value_id = self.strings.intern(text);
        let node_id = self.nodes.len() as NodeId;
        self.nodes.push(XmlNode::character_data(kind, value_id, Some(parent_id)));
        self.link_child(parent_id, node_id);
        node_id
    }

    /// Link a child node to its parent
    fn link_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        let last_child_opt = self.nodes[parent_id as usize].last_child;

        if let Some(last_child_id) = last_child_opt {
            self.nodes[child_id as usize].prev_sibling = Some(last_child_id);
            self.nodes[last_child_id as usize].next_sibling = Some(child_id);
        } else {
            self.nodes[parent_id as usize].first_child = Some(child_id);
        }
        self.nodes[child_id as usize].parent = Some(parent_id);
        self.nodes[parent_id as usize].last_child = Some(child_id);
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Append a new element as last child of `parent`
    pub fn append_element(&mut self, parent: NodeId, name: &str) -> NodeId {
        let name_id = self.strings.intern(name);
        let node_id = self.nodes.len() as NodeId;
        self.nodes.push(XmlNode::element(name_id, Some(parent)));
        self.link_child(parent, node_id);
        node_id
    }

    /// Append a text node as last child of `parent`
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push_character_data(NodeKind::Text, parent, text)
    }

    /// Append a CDATA section as last child of `parent`
    pub fn append_cdata(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push_character_data(NodeKind::CData, parent, text)
    }

    /// Set or replace an attribute on an element
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let name_id = self.strings.intern(name);
        let value_id = self.strings.intern(value);
        let Some(target) = self.nodes.get_mut(node as usize) else {
            return;
        };
        match target.attributes.iter_mut().find(|a| a.name_id == name_id) {
            Some(existing) => existing.value_id = value_id,
            None => target.attributes.push(XmlAttribute { name_id, value_id }),
        }
    }

    /// Remove every child of `node`, leaving the node itself in place
    pub fn clear_content(&mut self, node: NodeId) {
        let mut child = self.nodes.get(node as usize).and_then(|n| n.first_child);
        while let Some(id) = child {
            let current = &mut self.nodes[id as usize];
            child = current.next_sibling;
            current.parent = None;
            current.prev_sibling = None;
            current.next_sibling = None;
        }
        if let Some(target) = self.nodes.get_mut(node as usize) {
            target.first_child = None;
            target.last_child = None;
        }
    }

    /// Unlink `node` from its parent; the subtree becomes unreachable
    pub fn detach(&mut self, node: NodeId) {
        let Some(current) = self.nodes.get(node as usize) else {
            return;
        };
        let (parent, prev, next) = (current.parent, current.prev_sibling, current.next_sibling);
        let Some(parent) = parent else {
            return;
        };

        match prev {
            Some(p) => self.nodes[p as usize].next_sibling = next,
            None => self.nodes[parent as usize].first_child = next,
        }
        match next {
            Some(n) => self.nodes[n as usize].prev_sibling = prev,
            None => self.nodes[parent as usize].last_child = prev,
        }
        let current = &mut self.nodes[node as usize];
        current.parent = None;
        current.prev_sibling = None;
        current.next_sibling = None;
        if self.root_element == Some(node) {
            self.root_element = None;
        }
    }

    // =========================================================================
    // Access
    // =========================================================================

    /// Get root element ID
    pub fn root_element_id(&self) -> Option<NodeId> {
        self.root_element
    }

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&XmlNode> {
        self.nodes.get(id as usize)
    }

    /// Get node name as string (elements and PIs)
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        match node.kind {
            NodeKind::Element | NodeKind::ProcessingInstruction => self.strings.get(node.name_id),
            _ => None,
        }
    }

    /// Get the character data held by a text, CDATA, comment or PI node
    pub fn node_value(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        match node.kind {
            NodeKind::Document | NodeKind::Element => None,
            _ => self.strings.get(node.value_id),
        }
    }

    /// Concatenated text and CDATA content of the direct children of `id`
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            if let Some(node) = self.get_node(child) {
                if node.is_text() {
                    out.push_str(self.strings.get(node.value_id).unwrap_or_default());
                }
            }
        }
        out
    }

    /// Get attribute value by name
    pub fn attribute(&self, node_id: NodeId, name: &str) -> Option<&str> {
        self.get_node(node_id)?
            .attributes
            .iter()
            .find(|attr| self.strings.get(attr.name_id) == Some(name))
            .and_then(|attr| self.strings.get(attr.value_id))
    }

    /// Get all attribute names and values for a node
    pub fn attribute_values(&self, node_id: NodeId) -> Vec<(&str, &str)> {
        self.get_node(node_id)
            .map(|node| {
                node.attributes
                    .iter()
                    .filter_map(|attr| Some((self.strings.get(attr.name_id)?, self.strings.get(attr.value_id)?)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Iterate over children of a node
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.get_node(id).and_then(|n| n.first_child);
        ChildIter { doc: self, next: first }
    }

    /// Iterate over element children of a node
    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .filter(move |&child| self.get_node(child).is_some_and(XmlNode::is_element))
    }

    /// Iterate over element children with the given name, in document order
    pub fn child_elements_named<'s>(&'s self, id: NodeId, name: &'s str) -> impl Iterator<Item = NodeId> + 's {
        self.child_elements(id)
            .filter(move |&child| self.node_name(child) == Some(name))
    }

    /// First element child with the given name
    pub fn first_child_named(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.child_elements_named(id, name).next()
    }

    /// Get total number of arena nodes, including detached ones
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the string pool for direct access
    pub fn strings(&self) -> &StringPool {
        &self.strings
    }
}

/// Iterator over child nodes
pub struct ChildIter<'d> {
    doc: &'d XmlDocument,
    next: Option<NodeId>,
}

impl<'d> Iterator for ChildIter<'d> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get_node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

fn to_str(bytes: &[u8], position: usize) -> Result<&str, XmlError> {
    std::str::from_utf8(bytes).map_err(|e| XmlError::InvalidUtf8 { position: position + e.valid_up_to() })
}
