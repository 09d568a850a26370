//! Node names of the persisted container page layout.

/// Element names below a locale node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageNode {
    Containers,
    Name,
    Type,
    Attribute,
    Key,
    Value,
    Elements,
    Uri,
    Formatter,
    CreateNew,
    Properties,
}

impl PageNode {
    pub const fn name(self) -> &'static str {
        match self {
            PageNode::Containers => "Containers",
            PageNode::Name => "Name",
            PageNode::Type => "Type",
            PageNode::Attribute => "Attribute",
            PageNode::Key => "Key",
            PageNode::Value => "Value",
            PageNode::Elements => "Elements",
            PageNode::Uri => "Uri",
            PageNode::Formatter => "Formatter",
            PageNode::CreateNew => "CreateNew",
            PageNode::Properties => "Properties",
        }
    }
}

/// Root element name of a newly created document
pub const DEFAULT_ROOT_NODE: &str = "ContainerPages";

/// Locale node name used when a document has none to copy from
pub const DEFAULT_LOCALE_NODE: &str = "ContainerPage";

/// Attribute of a locale node carrying its language tag
pub const LANGUAGE_ATTRIBUTE: &str = "language";
