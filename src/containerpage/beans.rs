//! Page model: pages, containers and elements.

use std::collections::HashMap;

use uuid::Uuid;

use crate::locale::Locale;

/// One placed content reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerElement {
    /// Structure id of the backing content
    pub id: Uuid,
    /// Structure id of the formatter overriding the default rendering
    pub formatter_id: Option<Uuid>,
    /// Individual settings, name to value
    pub settings: HashMap<String, String>,
    /// The backing content does not exist yet
    pub create_new: bool,
}

impl ContainerElement {
    pub fn new(id: Uuid) -> Self {
        ContainerElement {
            id,
            formatter_id: None,
            settings: HashMap::new(),
            create_new: false,
        }
    }

    pub fn with_formatter(mut self, formatter_id: Uuid) -> Self {
        self.formatter_id = Some(formatter_id);
        self
    }

    pub fn with_setting(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(name.into(), value.into());
        self
    }

    pub fn with_create_new(mut self, create_new: bool) -> Self {
        self.create_new = create_new;
        self
    }
}

/// A named, typed slot holding elements in render order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub name: String,
    pub container_type: String,
    pub elements: Vec<ContainerElement>,
    pub attributes: HashMap<String, String>,
}

impl Container {
    pub fn new(name: impl Into<String>, container_type: impl Into<String>, elements: Vec<ContainerElement>) -> Self {
        Container {
            name: name.into(),
            container_type: container_type.into(),
            elements,
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// All containers of one locale variant, in page order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerPage {
    locale: Locale,
    names: Vec<String>,
    containers: HashMap<String, Container>,
}

impl ContainerPage {
    /// Build a page from containers in order
    ///
    /// A repeated name keeps the position of its first occurrence and the
    /// content of its last.
    pub fn new(locale: Locale, containers: impl IntoIterator<Item = Container>) -> Self {
        let mut names = Vec::new();
        let mut by_name = HashMap::new();
        for container in containers {
            let name = container.name.clone();
            if by_name.insert(name.clone(), container).is_some() {
                tracing::warn!(container = %name, locale = %locale, "Duplicate container name, keeping the later one");
            } else {
                names.push(name);
            }
        }
        ContainerPage {
            locale,
            names,
            containers: by_name,
        }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Container names in page order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Containers by name
    pub fn containers(&self) -> &HashMap<String, Container> {
        &self.containers
    }

    pub fn container(&self, name: &str) -> Option<&Container> {
        self.containers.get(name)
    }

    /// Containers in page order
    pub fn iter(&self) -> impl Iterator<Item = &Container> + '_ {
        self.names.iter().filter_map(|name| self.containers.get(name))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Containers of `self` in order, followed by those of `previous` whose
    /// names `self` does not use, in their previous order
    pub fn merged_with(&self, previous: &ContainerPage) -> ContainerPage {
        let untouched = previous
            .iter()
            .filter(|container| !self.containers.contains_key(&container.name));
        ContainerPage::new(self.locale.clone(), self.iter().chain(untouched).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(name: &str, elements: usize) -> Container {
        Container::new(name, "main", (0..elements).map(|_| ContainerElement::new(Uuid::new_v4())).collect())
    }

    #[test]
    fn test_names_keep_order() {
        let page = ContainerPage::new(Locale::from("en"), [container("b", 0), container("a", 1)]);
        assert_eq!(page.names(), ["b", "a"]);
        assert_eq!(page.container("a").map(|c| c.elements.len()), Some(1));
        assert_eq!(page.len(), 2);
    }

    #[test]
    fn test_duplicate_name_keeps_first_position_last_content() {
        let page = ContainerPage::new(
            Locale::from("en"),
            [container("a", 1), container("b", 0), container("a", 3)],
        );
        assert_eq!(page.names(), ["a", "b"]);
        assert_eq!(page.container("a").map(|c| c.elements.len()), Some(3));
    }

    #[test]
    fn test_merge_appends_untouched_containers() {
        let previous = ContainerPage::new(Locale::from("en"), [container("a", 1), container("b", 1), container("c", 1)]);
        let edited = ContainerPage::new(Locale::from("en"), [container("a", 2)]);
        let merged = edited.merged_with(&previous);

        assert_eq!(merged.names(), ["a", "b", "c"]);
        assert_eq!(merged.container("a"), edited.container("a"));
        assert_eq!(merged.container("b"), previous.container("b"));
        assert_eq!(merged.container("c"), previous.container("c"));
    }

    #[test]
    fn test_merge_with_itself_is_identity() {
        let page = ContainerPage::new(Locale::from("en"), [container("x", 2), container("y", 0)]);
        assert_eq!(page.merged_with(&page), page);
    }

    #[test]
    fn test_element_builders() {
        let formatter = Uuid::new_v4();
        let element = ContainerElement::new(Uuid::new_v4())
            .with_formatter(formatter)
            .with_setting("color", "red")
            .with_create_new(true);
        assert_eq!(element.formatter_id, Some(formatter));
        assert_eq!(element.settings["color"], "red");
        assert!(element.create_new);
    }
}
