//! XML Node representation
//!
//! Uses NodeId (u32) for compact, cache-friendly node references.

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of XML node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node
    Element,
    /// Text content
    Text,
    /// CDATA section
    CData,
    /// Comment
    Comment,
    /// Processing instruction
    ProcessingInstruction,
}

/// An XML node in the arena
///
/// Nodes are never removed from the arena. Detaching a node only clears its
/// links, after which it is unreachable from the document root.
#[derive(Debug, Clone)]
pub struct XmlNode {
    /// Type of this node
    pub kind: NodeKind,
    /// Parent node (None for document root and detached nodes)
    pub parent: Option<NodeId>,
    /// First child node
    pub first_child: Option<NodeId>,
    /// Last child node
    pub last_child: Option<NodeId>,
    /// Previous sibling
    pub prev_sibling: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// Index into string pool for the element name or PI target
    pub name_id: u32,
    /// Index into string pool for text, CDATA, comment content or PI data
    pub value_id: u32,
    /// Element attributes in document order
    pub attributes: Vec<XmlAttribute>,
}

impl XmlNode {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        XmlNode {
            kind,
            parent,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            name_id: 0,
            value_id: 0,
            attributes: Vec::new(),
        }
    }

    /// Create a new document root node
    pub fn document() -> Self {
        Self::new(NodeKind::Document, None)
    }

    /// Create a new element node
    pub fn element(name_id: u32, parent: Option<NodeId>) -> Self {
        XmlNode {
            name_id,
            ..Self::new(NodeKind::Element, parent)
        }
    }

    /// Create a character data node (text, CDATA or comment)
    pub fn character_data(kind: NodeKind, value_id: u32, parent: Option<NodeId>) -> Self {
        XmlNode {
            value_id,
            ..Self::new(kind, parent)
        }
    }

    /// Create a processing instruction node
    pub fn processing_instruction(name_id: u32, value_id: u32, parent: Option<NodeId>) -> Self {
        XmlNode {
            name_id,
            value_id,
            ..Self::new(NodeKind::ProcessingInstruction, parent)
        }
    }

    /// Check if this is an element node
    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Check if this node carries character data that counts as element text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text | NodeKind::CData)
    }

    /// Check if this node has children
    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }
}

/// Stored attribute
#[derive(Debug, Clone, Copy)]
pub struct XmlAttribute {
    /// Index into string pool for attribute name
    pub name_id: u32,
    /// Index into string pool for attribute value
    pub value_id: u32,
}
