//! Serialization of an [`XmlDocument`] back to text.
//!
//! Elements whose children are all markup (no text or CDATA) are indented
//! two spaces per level. Anything holding character data is written
//! verbatim, so whitespace read from a parsed document is never doubled on
//! the next write.

use super::document::{XmlDocument, DOCUMENT_NODE};
use super::node::{NodeId, NodeKind};
use crate::core::entities::{cdata_sections, escape_attribute, escape_text};

/// Declaration emitted at the head of every marshalled document
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

const INDENT: &str = "  ";

/// Serialize the whole document including the XML declaration
pub fn write_document(doc: &XmlDocument) -> String {
    let mut buf = String::with_capacity(doc.node_count() * 16 + 64);
    buf.push_str(XML_DECLARATION);
    buf.push('\n');
    for child in doc.children(DOCUMENT_NODE) {
        write_subtree(doc, child, 0, &mut buf);
        buf.push('\n');
    }
    buf
}

/// Uses an explicit stack so deeply nested input cannot overflow the call stack
fn write_subtree(doc: &XmlDocument, node_id: NodeId, base_depth: usize, buf: &mut String) {
    enum StackEntry {
        Enter { id: NodeId, depth: usize, indented: bool },
        Close { id: NodeId, depth: usize, indented: bool },
    }

    let mut stack: Vec<StackEntry> = Vec::with_capacity(64);
    stack.push(StackEntry::Enter { id: node_id, depth: base_depth, indented: false });

    while let Some(entry) = stack.pop() {
        match entry {
            StackEntry::Close { id, depth, indented } => {
                if indented {
                    newline(buf, depth);
                }
                buf.push_str("</");
                buf.push_str(doc.node_name(id).unwrap_or_default());
                buf.push('>');
            }
            StackEntry::Enter { id, depth, indented } => {
                let Some(node) = doc.get_node(id) else {
                    continue;
                };
                if indented {
                    newline(buf, depth);
                }

                match node.kind {
                    NodeKind::Element => {
                        let name = doc.node_name(id).unwrap_or_default();
                        buf.push('<');
                        buf.push_str(name);
                        for (attr_name, attr_value) in doc.attribute_values(id) {
                            buf.push(' ');
                            buf.push_str(attr_name);
                            buf.push_str("=\"");
                            buf.push_str(&escape_attribute(attr_value));
                            buf.push('"');
                        }

                        if !node.has_children() {
                            buf.push_str("/>");
                            continue;
                        }
                        buf.push('>');

                        let indent_children = doc.children(id).all(|child| {
                            doc.get_node(child).is_some_and(|n| !n.is_text())
                        });
                        stack.push(StackEntry::Close { id, depth, indented: indent_children });

                        let mut child_id = node.last_child;
                        while let Some(cid) = child_id {
                            stack.push(StackEntry::Enter { id: cid, depth: depth + 1, indented: indent_children });
                            child_id = doc.get_node(cid).and_then(|n| n.prev_sibling);
                        }
                    }
                    NodeKind::Text => {
                        buf.push_str(&escape_text(doc.node_value(id).unwrap_or_default()));
                    }
                    NodeKind::CData => {
                        buf.push_str(&cdata_sections(doc.node_value(id).unwrap_or_default()));
                    }
                    NodeKind::Comment => {
                        buf.push_str("<!--");
                        buf.push_str(doc.node_value(id).unwrap_or_default());
                        buf.push_str("-->");
                    }
                    NodeKind::ProcessingInstruction => {
                        buf.push_str("<?");
                        buf.push_str(doc.node_name(id).unwrap_or_default());
                        if let Some(data) = doc.node_value(id).filter(|d| !d.is_empty()) {
                            buf.push(' ');
                            buf.push_str(data);
                        }
                        buf.push_str("?>");
                    }
                    NodeKind::Document => {
                        for child in doc.children(id) {
                            write_subtree(doc, child, depth, buf);
                        }
                    }
                }
            }
        }
    }
}

#[inline]
fn newline(buf: &mut String, depth: usize) {
    buf.push('\n');
    for _ in 0..depth {
        buf.push_str(INDENT);
    }
}

impl XmlDocument {
    /// Serialize the document to UTF-8 XML text with declaration
    pub fn marshal(&self) -> String {
        write_document(self)
    }
}
