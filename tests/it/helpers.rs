//! Shared fixtures.

use containerpage::{FixedLocaleCatalog, MemoryStore, RequestContext, Resource};
use uuid::Uuid;

/// A store with a fixed default locale of `en`
pub struct Fixture {
    pub store: MemoryStore,
    pub catalog: FixedLocaleCatalog,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_default_locale("en")
    }

    pub fn with_default_locale(locale: &str) -> Self {
        Fixture {
            store: MemoryStore::new(),
            catalog: FixedLocaleCatalog::new(locale),
        }
    }

    pub fn ctx(&self) -> RequestContext<'_> {
        RequestContext::new(&self.store, &self.store, &self.catalog)
    }

    /// Add an `article` resource under `/sites/default/`
    pub fn article(&self, name: &str) -> Resource {
        self.store
            .add_resource(&format!("/sites/default/{name}.html"), "article", "")
    }
}

/// A `link` node pointing at `id`
pub fn link(id: Uuid, target: &str) -> String {
    format!("<link type=\"STRONG\"><target><![CDATA[{target}]]></target><uuid>{id}</uuid></link>")
}

/// An `Elements` node for `resource`
pub fn element_xml(resource: &Resource) -> String {
    format!(
        "<Elements><Uri>{}</Uri><Formatter/></Elements>",
        link(resource.structure_id, &resource.root_path)
    )
}

/// A `Containers` node with the given elements
pub fn container_xml(name: &str, container_type: &str, elements: &[&Resource]) -> String {
    let body: String = elements.iter().map(|r| element_xml(r)).collect();
    format!("<Containers><Name><![CDATA[{name}]]></Name><Type><![CDATA[{container_type}]]></Type>{body}</Containers>")
}

/// A page document with one locale node per `(language, body)` pair
pub fn page_xml(locales: &[(&str, String)]) -> String {
    let body: String = locales
        .iter()
        .map(|(lang, inner)| format!("  <ContainerPage language=\"{lang}\">{inner}</ContainerPage>\n"))
        .collect();
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<ContainerPages>\n{body}</ContainerPages>\n")
}
