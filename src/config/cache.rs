//! Versioned configuration cache
//!
//! Parsed configurations keyed by the root path of their resource. Each entry
//! remembers the resource version it was parsed from and is re-parsed when
//! the store reports a different one.
//!
//! Every path owns a slot with its own lock, so a given (path, version) is
//! parsed at most once while different paths parse concurrently.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

use lru::LruCache;
use rayon::prelude::*;

use super::errors::ConfigError;
use super::parser::ConfigurationParser;
use crate::store::RequestContext;

/// Capacity used when zero is requested
pub const DEFAULT_CAPACITY: usize = 64;

struct CacheEntry {
    version: u64,
    parser: Arc<ConfigurationParser>,
}

type Slot = Arc<Mutex<Option<CacheEntry>>>;

/// Cache of parsed configuration documents
pub struct ConfigurationCache {
    slots: Mutex<LruCache<String, Slot>>,
}

impl ConfigurationCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or(NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        ConfigurationCache {
            slots: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn slot(&self, path: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = slots.get(path) {
            return Arc::clone(slot);
        }
        let slot = Slot::default();
        slots.put(path.to_string(), Arc::clone(&slot));
        slot
    }

    /// Parsed configuration for the resource at `path`
    ///
    /// Parses on first use and whenever the store reports a newer version.
    /// The version is read under the slot lock, and a cached entry is never
    /// replaced by an older version. Failed parses are returned and not
    /// cached.
    ///
    /// Entries are keyed by path only. The parser is built in the locale of
    /// the request that parsed the current version, and requests in other
    /// locales receive that same parser until the version changes.
    pub fn get_parser(&self, ctx: &RequestContext<'_>, path: &str) -> Result<Arc<ConfigurationParser>, ConfigError> {
        let slot = self.slot(path);
        let mut entry = slot.lock().unwrap_or_else(PoisonError::into_inner);
        let resource = ctx.store.read_resource_by_path(path)?;

        if let Some(cached) = entry.as_ref() {
            if cached.version == resource.version {
                tracing::debug!(path, version = resource.version, "Configuration cache hit");
                return Ok(Arc::clone(&cached.parser));
            }
            if cached.version > resource.version {
                tracing::debug!(
                    path,
                    cached = cached.version,
                    reported = resource.version,
                    "Stale version reported, keeping cached configuration"
                );
                return Ok(Arc::clone(&cached.parser));
            }
            tracing::debug!(path, cached = cached.version, current = resource.version, "Configuration changed, re-parsing");
        }

        match ConfigurationParser::parse(ctx, &resource) {
            Ok(parser) => {
                let parser = Arc::new(parser);
                *entry = Some(CacheEntry {
                    version: resource.version,
                    parser: Arc::clone(&parser),
                });
                Ok(parser)
            }
            Err(e) => {
                *entry = None;
                Err(e)
            }
        }
    }

    /// Drop the entry for `path`, returning whether one was cached
    pub fn invalidate(&self, path: &str) -> bool {
        let removed = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop(path);
        removed.is_some_and(|slot| slot.lock().unwrap_or_else(PoisonError::into_inner).is_some())
    }

    pub fn clear(&self) {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Number of cached configurations
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(_, slot)| slot.lock().unwrap_or_else(PoisonError::into_inner).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse several configurations in parallel
    ///
    /// Results are returned in the order of `paths`.
    pub fn preload(
        &self,
        ctx: &RequestContext<'_>,
        paths: &[&str],
    ) -> Vec<Result<Arc<ConfigurationParser>, ConfigError>> {
        paths
            .par_iter()
            .map(|path| self.get_parser(ctx, path))
            .collect()
    }
}

impl Default for ConfigurationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
