use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use containerpage::{
    ConfigError, ConfigurationCache, ConfigurationParser, LazyFolder, Locale, MemoryStore, RequestContext, Resource,
    ResourceStore, StoreError,
};
use uuid::Uuid;

use crate::helpers::{link, Fixture};

const CONFIG_PATH: &str = "/sites/default/.content/.config";

fn type_entry(source: &Resource) -> String {
    format!("<ADEType><Source>{}</Source></ADEType>", link(source.structure_id, &source.root_path))
}

fn config_xml(locales: &[(&str, String)]) -> String {
    let body: String = locales
        .iter()
        .map(|(lang, inner)| format!("<ADETypeConfig language=\"{lang}\">{inner}</ADETypeConfig>"))
        .collect();
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<ADETypeConfiguration>{body}</ADETypeConfiguration>")
}

#[test]
fn test_default_locale_is_preferred() {
    let fx = Fixture::new();
    let article = fx.store.add_resource("/proto/article.html", "article", "");
    let news = fx.store.add_resource("/proto/news.html", "news", "");
    let xml = config_xml(&[("de", type_entry(&news)), ("en", type_entry(&article))]);
    let resource = fx.store.add_resource(CONFIG_PATH, "type_config", xml);

    let parser = ConfigurationParser::parse(&fx.ctx(), &resource).unwrap();
    assert_eq!(parser.type_names(), ["article"]);
}

#[test]
fn test_first_locale_when_default_missing() {
    let fx = Fixture::new();
    let news = fx.store.add_resource("/proto/news.html", "news", "");
    let xml = config_xml(&[("de", type_entry(&news))]);
    let resource = fx.store.add_resource(CONFIG_PATH, "type_config", xml);

    let parser = ConfigurationParser::parse(&fx.ctx(), &resource).unwrap();
    assert_eq!(parser.type_names(), ["news"]);
}

#[test]
fn test_request_locale_wins() {
    let fx = Fixture::new();
    let article = fx.store.add_resource("/proto/article.html", "article", "");
    let news = fx.store.add_resource("/proto/news.html", "news", "");
    let xml = config_xml(&[("en", type_entry(&article)), ("de", type_entry(&news))]);
    let resource = fx.store.add_resource(CONFIG_PATH, "type_config", xml);

    let de = Locale::from("de");
    let parser = ConfigurationParser::parse(&fx.ctx().with_locale(&de), &resource).unwrap();
    assert_eq!(parser.type_names(), ["news"]);
}

#[test]
fn test_broken_entry_does_not_hide_others() {
    let fx = Fixture::new();
    let article = fx.store.add_resource("/proto/article.html", "article", "");
    let news = fx.store.add_resource("/proto/news.html", "news", "");
    let missing = link(Uuid::new_v4(), "/proto/deleted.html");
    let body = format!(
        "{}<ADEType><Source>{missing}</Source></ADEType>{}",
        type_entry(&article),
        type_entry(&news)
    );
    let resource = fx.store.add_resource(CONFIG_PATH, "type_config", config_xml(&[("en", body)]));

    let parser = ConfigurationParser::parse(&fx.ctx(), &resource).unwrap();
    assert_eq!(parser.type_names(), ["article", "news"]);
    assert_eq!(parser.new_elements(), [article, news]);
}

#[test]
fn test_default_folder_resolves_once_created() {
    let fx = Fixture::new();
    let article = fx.store.add_resource("/proto/article.html", "article", "");
    let resource = fx
        .store
        .add_resource(CONFIG_PATH, "type_config", config_xml(&[("en", type_entry(&article))]));
    let parser = ConfigurationParser::parse(&fx.ctx(), &resource).unwrap();

    let item = &parser.type_configuration()["article"];
    assert_eq!(item.lazy_folder, LazyFolder::Path("/article".to_string()));
    assert!(item.lazy_folder.resolve(&fx.ctx()).is_err());

    let folder = fx.store.add_resource("/article", "folder", "");
    assert_eq!(item.lazy_folder.resolve(&fx.ctx()).unwrap(), folder);
}

#[test]
fn test_cache_follows_resource_version() {
    let fx = Fixture::new();
    let article = fx.store.add_resource("/proto/article.html", "article", "");
    let news = fx.store.add_resource("/proto/news.html", "news", "");
    fx.store
        .add_resource(CONFIG_PATH, "type_config", config_xml(&[("en", type_entry(&article))]));
    let ctx = fx.ctx();
    let cache = ConfigurationCache::default();

    let first = cache.get_parser(&ctx, CONFIG_PATH).unwrap();
    assert!(Arc::ptr_eq(&first, &cache.get_parser(&ctx, CONFIG_PATH).unwrap()));

    let body = type_entry(&article) + &type_entry(&news);
    fx.store.replace_content(CONFIG_PATH, config_xml(&[("en", body)])).unwrap();
    let second = cache.get_parser(&ctx, CONFIG_PATH).unwrap();
    assert_eq!(second.type_names(), ["article", "news"]);
    assert_eq!(first.type_names(), ["article"]);
}

#[test]
fn test_preload_reports_each_path() {
    let fx = Fixture::new();
    let article = fx.store.add_resource("/proto/article.html", "article", "");
    let paths = ["/a/.config", "/b/.config", "/c/.config"];
    for path in &paths[..2] {
        fx.store
            .add_resource(path, "type_config", config_xml(&[("en", type_entry(&article))]));
    }

    let cache = ConfigurationCache::new(8);
    let results = cache.preload(&fx.ctx(), &paths);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(matches!(&results[2], Err(ConfigError::Store(e)) if e.is_not_found()));
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_concurrent_lookups_share_one_parse() {
    let fx = Fixture::new();
    let article = fx.store.add_resource("/proto/article.html", "article", "");
    fx.store
        .add_resource(CONFIG_PATH, "type_config", config_xml(&[("en", type_entry(&article))]));
    let ctx = fx.ctx();
    let cache = ConfigurationCache::default();

    let parsers: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| cache.get_parser(&ctx, CONFIG_PATH).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(parsers.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    assert_eq!(fx.store.read_resource_by_path(CONFIG_PATH).unwrap().version, 1);
}

/// Store that reports queued versions for path lookups and counts content reads
struct ReportedVersions<'s> {
    inner: &'s MemoryStore,
    versions: Mutex<VecDeque<u64>>,
    reads: AtomicUsize,
}

impl<'s> ReportedVersions<'s> {
    fn new(inner: &'s MemoryStore, versions: &[u64]) -> Self {
        ReportedVersions {
            inner,
            versions: Mutex::new(versions.iter().copied().collect()),
            reads: AtomicUsize::new(0),
        }
    }
}

impl ResourceStore for ReportedVersions<'_> {
    fn read_resource(&self, id: Uuid) -> Result<Resource, StoreError> {
        self.inner.read_resource(id)
    }

    fn read_resource_by_path(&self, path: &str) -> Result<Resource, StoreError> {
        let mut resource = self.inner.read_resource_by_path(path)?;
        if let Some(version) = self.versions.lock().unwrap().pop_front() {
            resource.version = version;
        }
        Ok(resource)
    }

    fn read_file(&self, resource: &Resource) -> Result<Vec<u8>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_file(resource)
    }

    fn write_file(&self, resource: &Resource, content: &[u8]) -> Result<Resource, StoreError> {
        self.inner.write_file(resource, content)
    }

    fn lock_resource(&self, resource: &Resource) -> Result<(), StoreError> {
        self.inner.lock_resource(resource)
    }

    fn unlock_resource(&self, resource: &Resource) -> Result<(), StoreError> {
        self.inner.unlock_resource(resource)
    }
}

#[test]
fn test_stale_version_does_not_replace_newer_entry() {
    let fx = Fixture::new();
    let article = fx.store.add_resource("/proto/article.html", "article", "");
    fx.store
        .add_resource(CONFIG_PATH, "type_config", config_xml(&[("en", type_entry(&article))]));

    // a slow caller still sees version 1 after version 2 was cached
    let store = ReportedVersions::new(&fx.store, &[2, 1, 2, 3]);
    let ctx = RequestContext::new(&store, &fx.store, &fx.catalog);
    let cache = ConfigurationCache::default();

    let current = cache.get_parser(&ctx, CONFIG_PATH).unwrap();
    let stale = cache.get_parser(&ctx, CONFIG_PATH).unwrap();
    let again = cache.get_parser(&ctx, CONFIG_PATH).unwrap();
    assert!(Arc::ptr_eq(&current, &stale));
    assert!(Arc::ptr_eq(&current, &again));
    assert_eq!(store.reads.load(Ordering::SeqCst), 1);

    let newer = cache.get_parser(&ctx, CONFIG_PATH).unwrap();
    assert!(!Arc::ptr_eq(&current, &newer));
    assert_eq!(store.reads.load(Ordering::SeqCst), 2);
}

#[test]
fn test_cached_parser_is_shared_across_locales() {
    let fx = Fixture::new();
    let article = fx.store.add_resource("/proto/article.html", "article", "");
    let news = fx.store.add_resource("/proto/news.html", "news", "");
    let xml = config_xml(&[("en", type_entry(&article)), ("de", type_entry(&news))]);
    fx.store.add_resource(CONFIG_PATH, "type_config", xml);
    let cache = ConfigurationCache::default();

    let en = cache.get_parser(&fx.ctx(), CONFIG_PATH).unwrap();
    let de = Locale::from("de");
    let shared = cache.get_parser(&fx.ctx().with_locale(&de), CONFIG_PATH).unwrap();
    assert!(Arc::ptr_eq(&en, &shared));
    assert_eq!(shared.type_names(), ["article"]);

    cache.invalidate(CONFIG_PATH);
    let reparsed = cache.get_parser(&fx.ctx().with_locale(&de), CONFIG_PATH).unwrap();
    assert_eq!(reparsed.type_names(), ["news"]);
}
