use containerpage::{
    BookmarkPath, Container, ContainerElement, ContainerPage, ContainerPageDocument, Locale, PageError,
    PropertyDefinition, ResourceStore, StoreError,
};
use uuid::Uuid;

use crate::helpers::{container_xml, element_xml, page_xml, Fixture};

/// (container name, element ids) in page order
fn summary(page: &ContainerPage) -> Vec<(String, Vec<Uuid>)> {
    page.iter()
        .map(|c| (c.name.clone(), c.elements.iter().map(|e| e.id).collect()))
        .collect()
}

#[test]
fn test_round_trip_preserves_containers_and_order() {
    let fx = Fixture::new();
    let (a, b, c) = (fx.article("a"), fx.article("b"), fx.article("c"));
    let xml = page_xml(&[(
        "en",
        container_xml("header", "top", &[&a]) + &container_xml("main", "center", &[&b, &c]),
    )]);
    let en = Locale::from("en");
    let ctx = fx.ctx();

    let mut doc = ContainerPageDocument::parse(xml.as_bytes()).unwrap();
    let before = summary(doc.container_page(&en).unwrap());
    let current = doc.container_page(&en).unwrap().clone();
    doc.write_container_page(&ctx, &en, &current).unwrap();

    let reparsed = ContainerPageDocument::parse(doc.marshal().as_bytes()).unwrap();
    assert_eq!(summary(reparsed.container_page(&en).unwrap()), before);
    assert_eq!(
        before,
        vec![
            ("header".to_string(), vec![a.structure_id]),
            ("main".to_string(), vec![b.structure_id, c.structure_id]),
        ]
    );
}

#[test]
fn test_merge_is_idempotent() {
    let fx = Fixture::new();
    let (a, b) = (fx.article("a"), fx.article("b"));
    let xml = page_xml(&[(
        "en",
        container_xml("left", "side", &[&a]) + &container_xml("right", "side", &[&b]),
    )]);
    let en = Locale::from("en");
    let ctx = fx.ctx();

    let mut doc = ContainerPageDocument::parse(xml.as_bytes()).unwrap();
    let current = doc.container_page(&en).unwrap().clone();
    doc.write_container_page(&ctx, &en, &current).unwrap();
    let once = doc.marshal();
    let again = doc.container_page(&en).unwrap().clone();
    doc.write_container_page(&ctx, &en, &again).unwrap();

    assert_eq!(doc.container_page(&en).unwrap(), &current);
    assert_eq!(doc.marshal(), once);
}

#[test]
fn test_partial_edit_keeps_untouched_containers() {
    let fx = Fixture::new();
    let (a, b, c, d) = (fx.article("a"), fx.article("b"), fx.article("c"), fx.article("d"));
    let xml = page_xml(&[(
        "en",
        container_xml("A", "t", &[&a]) + &container_xml("B", "t", &[&b]) + &container_xml("C", "t", &[&c]),
    )]);
    let en = Locale::from("en");
    let ctx = fx.ctx();

    let mut doc = ContainerPageDocument::parse(xml.as_bytes()).unwrap();
    let previous = doc.container_page(&en).unwrap().clone();

    let edited = ContainerPage::new(
        en.clone(),
        [Container::new("C", "t", vec![ContainerElement::new(d.structure_id), ContainerElement::new(c.structure_id)])],
    );
    doc.write_container_page(&ctx, &en, &edited).unwrap();

    let page = doc.container_page(&en).unwrap();
    assert_eq!(page.names(), ["C", "A", "B"]);
    assert_eq!(page.container("C"), edited.container("C"));
    assert_eq!(page.container("A"), previous.container("A"));
    assert_eq!(page.container("B"), previous.container("B"));
}

#[test]
fn test_element_without_link_does_not_come_back() {
    let fx = Fixture::new();
    let a = fx.article("a");
    let body = format!(
        "<Containers><Name>main</Name><Type>t</Type><Elements><Uri/><Formatter/></Elements>{}</Containers>",
        element_xml(&a)
    );
    let xml = page_xml(&[("en", body)]);
    let en = Locale::from("en");
    let ctx = fx.ctx();

    let mut doc = ContainerPageDocument::parse(xml.as_bytes()).unwrap();
    // the raw XML still has both elements
    assert!(doc
        .bookmarks()
        .lookup(&BookmarkPath::Element { container: 0, element: 1 }, &en)
        .is_some());
    assert_eq!(doc.container_page(&en).unwrap().container("main").unwrap().elements.len(), 1);

    let current = doc.container_page(&en).unwrap().clone();
    doc.write_container_page(&ctx, &en, &current).unwrap();
    assert!(doc
        .bookmarks()
        .lookup(&BookmarkPath::Element { container: 0, element: 1 }, &en)
        .is_none());
    assert_eq!(doc.container_page(&en).unwrap().container("main").unwrap().elements[0].id, a.structure_id);
}

#[test]
fn test_other_locales_untouched_by_write() {
    let fx = Fixture::new();
    let (a, b) = (fx.article("a"), fx.article("b"));
    let xml = page_xml(&[
        ("en", container_xml("main", "t", &[&a])),
        ("de", container_xml("main", "t", &[&b])),
    ]);
    let (en, de) = (Locale::from("en"), Locale::from("de"));
    let ctx = fx.ctx();

    let mut doc = ContainerPageDocument::parse(xml.as_bytes()).unwrap();
    let de_before = doc.container_page(&de).unwrap().clone();
    let page = ContainerPage::new(en.clone(), [Container::new("main", "t", vec![])]);
    doc.write_container_page(&ctx, &en, &page).unwrap();

    assert!(doc.container_page(&en).unwrap().container("main").unwrap().elements.is_empty());
    assert_eq!(doc.container_page(&de), Some(&de_before));
    assert_eq!(doc.locales(), [en, de]);
}

#[test]
fn test_write_to_new_locale_adds_variant() {
    let fx = Fixture::new();
    let a = fx.article("a");
    let en = Locale::from("en");
    let fr = Locale::from("fr");
    let ctx = fx.ctx();

    let mut doc = ContainerPageDocument::create(&en).unwrap();
    let page = ContainerPage::new(fr.clone(), [Container::new("main", "t", vec![ContainerElement::new(a.structure_id)])]);
    doc.write_container_page(&ctx, &fr, &page).unwrap();

    assert!(doc.has_locale(&fr));
    assert_eq!(summary(doc.container_page(&fr).unwrap()), vec![("main".to_string(), vec![a.structure_id])]);
}

#[test]
fn test_resolve_container_page_uses_locale_policy() {
    let fx = Fixture::with_default_locale("de");
    let (a, b) = (fx.article("a"), fx.article("b"));
    let xml = page_xml(&[
        ("en", container_xml("main", "t", &[&a])),
        ("de", container_xml("main", "t", &[&b])),
    ]);
    let doc = ContainerPageDocument::parse(xml.as_bytes()).unwrap();

    assert_eq!(doc.resolve_container_page(&fx.ctx()).unwrap().locale(), &Locale::from("de"));
    let en = Locale::from("en");
    assert_eq!(doc.resolve_container_page(&fx.ctx().with_locale(&en)).unwrap().locale(), &en);
    let fr = Locale::from("fr");
    assert_eq!(doc.resolve_container_page(&fx.ctx().with_locale(&fr)).unwrap().locale(), &Locale::from("de"));
}

#[test]
fn test_failed_write_leaves_document_unchanged() {
    let fx = Fixture::new();
    let a = fx.article("a");
    let xml = page_xml(&[("en", container_xml("main", "t", &[&a]))]);
    let en = Locale::from("en");
    let ctx = fx.ctx();

    let mut doc = ContainerPageDocument::parse(xml.as_bytes()).unwrap();
    let before_xml = doc.marshal();
    let before_page = doc.container_page(&en).unwrap().clone();

    let missing_formatter = ContainerElement::new(a.structure_id).with_formatter(Uuid::new_v4());
    let page = ContainerPage::new(en.clone(), [Container::new("other", "t", vec![missing_formatter])]);
    let err = doc.write_container_page(&ctx, &en, &page).unwrap_err();

    assert!(matches!(err, PageError::UnresolvableReference { source: StoreError::NotFound { .. }, .. }));
    assert_eq!(doc.marshal(), before_xml);
    assert_eq!(doc.container_page(&en), Some(&before_page));
}

#[test]
fn test_create_container_page_xml_is_pure() {
    let fx = Fixture::new();
    let a = fx.article("a");
    let en = Locale::from("en");
    let doc = ContainerPageDocument::create(&en).unwrap();
    let before = doc.marshal();

    let page = ContainerPage::new(en.clone(), [Container::new("main", "t", vec![ContainerElement::new(a.structure_id)])]);
    let bytes = doc.create_container_page_xml(&fx.ctx(), &en, &page).unwrap();

    assert_eq!(doc.marshal(), before);
    let written = ContainerPageDocument::parse(&bytes).unwrap();
    assert_eq!(summary(written.container_page(&en).unwrap()), vec![("main".to_string(), vec![a.structure_id])]);
}

#[test]
fn test_settings_and_attributes_round_trip() {
    let fx = Fixture::new();
    let a = fx.article("a");
    let related = fx.article("related");
    fx.store.set_element_settings("article", [PropertyDefinition::vfs_list("related")]);
    let en = Locale::from("en");
    let ctx = fx.ctx();

    let element = ContainerElement::new(a.structure_id)
        .with_setting("related", related.structure_id.to_string())
        .with_setting("color", "blue & green")
        .with_create_new(true);
    let container = Container::new("main", "center", vec![element]).with_attribute("cssclass", "wide");
    let page = ContainerPage::new(en.clone(), [container]);

    let mut doc = ContainerPageDocument::create(&en).unwrap();
    doc.write_container_page(&ctx, &en, &page).unwrap();
    let reparsed = ContainerPageDocument::parse(doc.marshal().as_bytes()).unwrap();

    assert_eq!(reparsed.container_page(&en), Some(&page));
    let name = BookmarkPath::ContainerField { container: 0, field: "Name" };
    assert_eq!(reparsed.value(&name, &en).as_deref(), Some("main"));
}

#[test]
fn test_save_persists_and_unlocks() {
    let fx = Fixture::new();
    let a = fx.article("a");
    let en = Locale::from("en");
    let ctx = fx.ctx();
    let initial = ContainerPageDocument::create(&en).unwrap().marshal();
    let resource = fx.store.add_resource("/sites/default/index.html", "containerpage", initial);

    let mut doc = ContainerPageDocument::load(&ctx, &resource).unwrap();
    let page = ContainerPage::new(en.clone(), [Container::new("main", "t", vec![ContainerElement::new(a.structure_id)])]);
    let saved = doc.save(&ctx, &resource, &en, &page).unwrap();

    assert_eq!(saved.version, resource.version + 1);
    assert!(!fx.store.is_locked(resource.structure_id));
    let stored = fx.store.read_file(&saved).unwrap();
    assert_eq!(stored, doc.marshal().into_bytes());
}

#[test]
fn test_failed_save_unlocks_and_keeps_state() {
    let fx = Fixture::new();
    let a = fx.article("a");
    let en = Locale::from("en");
    let ctx = fx.ctx();
    let initial = ContainerPageDocument::create(&en).unwrap().marshal();
    let resource = fx.store.add_resource("/sites/default/index.html", "containerpage", initial.clone());
    let mut doc = ContainerPageDocument::load(&ctx, &resource).unwrap();

    // someone else changed the page since it was loaded
    fx.store.replace_content(&resource.root_path, initial).unwrap();

    let page = ContainerPage::new(en.clone(), [Container::new("main", "t", vec![ContainerElement::new(a.structure_id)])]);
    let err = doc.save(&ctx, &resource, &en, &page).unwrap_err();

    assert!(matches!(err, PageError::Store(StoreError::VersionConflict { .. })));
    assert!(!fx.store.is_locked(resource.structure_id));
    assert!(doc.container_page(&en).unwrap().is_empty());
}

#[test]
fn test_malformed_documents_fail_whole_parse() {
    let missing_type = page_xml(&[("en", "<Containers><Name>main</Name></Containers>".to_string())]);
    assert!(matches!(
        ContainerPageDocument::parse(missing_type.as_bytes()),
        Err(PageError::Malformed { .. })
    ));

    let broken_attribute = page_xml(&[(
        "en",
        "<Containers><Name>main</Name><Type>t</Type><Attribute><Key>k</Key></Attribute></Containers>".to_string(),
    )]);
    assert!(matches!(
        ContainerPageDocument::parse(broken_attribute.as_bytes()),
        Err(PageError::Malformed { .. })
    ));

    assert!(matches!(
        ContainerPageDocument::parse(b"<ContainerPages><ContainerPage language=\"en\">"),
        Err(PageError::Xml(_))
    ));
}
