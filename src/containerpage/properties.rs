//! Element settings sub-tree.
//!
//! ```text
//! <Properties>
//!   <Name><![CDATA[related]]></Name>
//!   <Value>
//!     <FileList><Uri><link>...</link></Uri><Uri><link>...</link></Uri></FileList>
//!   </Value>
//! </Properties>
//! ```
//!
//! `vfslist` settings hold comma separated structure ids in the page model
//! and a `FileList` of links in XML. Every other setting is a `String`.

use std::collections::HashMap;

use uuid::Uuid;

use super::errors::PageError;
use super::link::{read_link_id, write_link};
use super::nodes::PageNode;
use crate::dom::{NodeId, XmlDocument};
use crate::store::{PropertyDefinition, RequestContext, Resource};

pub const STRING_NODE: &str = "String";
pub const FILE_LIST_NODE: &str = "FileList";

/// Separator of structure ids in a `vfslist` value
pub const LIST_SEPARATOR: char = ',';

/// A setting ready to be written, references already resolved
#[derive(Debug, Clone)]
pub(crate) struct ResolvedProperty {
    pub name: String,
    pub value: ResolvedValue,
}

#[derive(Debug, Clone)]
pub(crate) enum ResolvedValue {
    Text(String),
    Files(Vec<Resource>),
}

/// Read every `Properties` child of an element node
///
/// Returns the settings map and the `Properties` nodes in document order.
pub(crate) fn read_properties(
    doc: &XmlDocument,
    element: NodeId,
) -> Result<(HashMap<String, String>, Vec<NodeId>), PageError> {
    let mut settings = HashMap::new();
    let mut nodes = Vec::new();

    for property in doc.child_elements_named(element, PageNode::Properties.name()) {
        let name = doc
            .first_child_named(property, PageNode::Name.name())
            .map(|node| doc.text(node))
            .ok_or_else(|| PageError::malformed("Properties node without Name"))?;
        let value = doc
            .first_child_named(property, PageNode::Value.name())
            .ok_or_else(|| PageError::malformed(format!("setting {name} has no Value")))?;

        let text = if let Some(string) = doc.first_child_named(value, STRING_NODE) {
            doc.text(string)
        } else if let Some(list) = doc.first_child_named(value, FILE_LIST_NODE) {
            let ids: Vec<String> = doc
                .child_elements_named(list, PageNode::Uri.name())
                .filter_map(|uri| read_link_id(doc, uri))
                .map(|id| id.to_string())
                .collect();
            ids.join(&LIST_SEPARATOR.to_string())
        } else {
            String::new()
        };

        settings.insert(name, text);
        nodes.push(property);
    }
    Ok((settings, nodes))
}

/// Resolve the settings of one element against its definitions
///
/// Settings are returned sorted by name. Unknown settings are kept as text.
pub(crate) fn resolve_properties(
    ctx: &RequestContext<'_>,
    settings: &HashMap<String, String>,
    definitions: &HashMap<String, PropertyDefinition>,
) -> Result<Vec<ResolvedProperty>, PageError> {
    let mut names: Vec<&String> = settings.keys().collect();
    names.sort();

    let mut resolved = Vec::with_capacity(names.len());
    for name in names {
        let value = &settings[name];
        let is_list = definitions.get(name).is_some_and(PropertyDefinition::is_vfs_list);
        let value = if is_list {
            ResolvedValue::Files(resolve_list(ctx, name, value)?)
        } else {
            ResolvedValue::Text(value.clone())
        };
        resolved.push(ResolvedProperty { name: name.clone(), value });
    }
    Ok(resolved)
}

fn resolve_list(ctx: &RequestContext<'_>, setting: &str, value: &str) -> Result<Vec<Resource>, PageError> {
    value
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let id = Uuid::parse_str(entry).map_err(|_| PageError::InvalidReference {
                setting: setting.to_string(),
                value: entry.to_string(),
            })?;
            ctx.store
                .read_resource(id)
                .map_err(|source| PageError::UnresolvableReference { id, source })
        })
        .collect()
}

/// Append one `Properties` node per resolved setting
pub(crate) fn write_properties(doc: &mut XmlDocument, element: NodeId, properties: &[ResolvedProperty]) {
    for property in properties {
        let node = doc.append_element(element, PageNode::Properties.name());
        let name = doc.append_element(node, PageNode::Name.name());
        doc.append_cdata(name, &property.name);
        let value = doc.append_element(node, PageNode::Value.name());
        match &property.value {
            ResolvedValue::Text(text) => {
                let string = doc.append_element(value, STRING_NODE);
                doc.append_cdata(string, text);
            }
            ResolvedValue::Files(resources) => {
                let list = doc.append_element(value, FILE_LIST_NODE);
                for resource in resources {
                    let uri = doc.append_element(list, PageNode::Uri.name());
                    write_link(doc, uri, resource);
                }
            }
        }
    }
}
