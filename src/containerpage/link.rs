//! Resource links stored inside `Uri`, `Formatter` and list nodes.
//!
//! ```text
//! <link type="STRONG">
//!   <target><![CDATA[/sites/default/article.html]]></target>
//!   <uuid>8d4f...</uuid>
//! </link>
//! ```

use uuid::Uuid;

use crate::dom::{NodeId, XmlDocument};
use crate::store::Resource;

pub const LINK_NODE: &str = "link";
pub const TARGET_NODE: &str = "target";
pub const UUID_NODE: &str = "uuid";
pub const TYPE_ATTRIBUTE: &str = "type";
pub const STRONG_LINK: &str = "STRONG";

/// A parsed link node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Root path recorded when the link was written
    pub target: String,
    /// Structure id of the target, if present and well-formed
    pub structure_id: Option<Uuid>,
}

/// Read the `link` child of `parent`
pub fn read_link(doc: &XmlDocument, parent: NodeId) -> Option<Link> {
    let link = doc.first_child_named(parent, LINK_NODE)?;
    let target = doc
        .first_child_named(link, TARGET_NODE)
        .map(|node| doc.text(node).trim().to_string())
        .unwrap_or_default();
    let structure_id = doc
        .first_child_named(link, UUID_NODE)
        .and_then(|node| Uuid::parse_str(doc.text(node).trim()).ok());
    Some(Link { target, structure_id })
}

/// Structure id of the `link` child of `parent`, if any
pub fn read_link_id(doc: &XmlDocument, parent: NodeId) -> Option<Uuid> {
    read_link(doc, parent)?.structure_id
}

/// Append a strong link to `resource` under `parent`
pub fn write_link(doc: &mut XmlDocument, parent: NodeId, resource: &Resource) -> NodeId {
    let link = doc.append_element(parent, LINK_NODE);
    doc.set_attribute(link, TYPE_ATTRIBUTE, STRONG_LINK);
    let target = doc.append_element(link, TARGET_NODE);
    doc.append_cdata(target, &resource.root_path);
    let uuid = doc.append_element(link, UUID_NODE);
    doc.append_text(uuid, &resource.structure_id.to_string());
    link
}
