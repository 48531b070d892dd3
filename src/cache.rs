//! Rendered page cache with stale-while-revalidate semantics.
//!
//! ```text
//! lookup(path, ttl)
//!   ├── Fresh(page)    age <= ttl        serve
//!   ├── Stale(page)    age >  ttl        serve, regenerate once in background
//!   ├── NotFound       document missing  404, regenerate once when stale
//!   └── Missing                          placeholder, generate once in background
//! ```
//!
//! Regeneration is claimed per path, so concurrent requests for the same
//! stale or missing page start at most one refresh. A failed refresh
//! releases its claim and leaves any previous entry in place.
//!
//! Paths whose document does not exist are remembered apart from rendered
//! pages, in a set capped at [`MAX_NOT_FOUND`] entries; the oldest entry is
//! evicted first.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use rustc_hash::{FxHashMap, FxHashSet};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

/// Default number of remembered not-found paths.
pub const MAX_NOT_FOUND: usize = 1024;

/// A rendered page.
#[derive(Debug)]
pub struct CachedPage {
    pub html: String,
    /// Quoted blake3 hash of `html`.
    pub etag: String,
    pub generated_at: Instant,
    pub rendered_at: DateTime<Utc>,
}

impl CachedPage {
    pub fn new(html: String) -> Self {
        let etag = format!("\"{}\"", blake3::hash(html.as_bytes()).to_hex());
        Self {
            html,
            etag,
            generated_at: Instant::now(),
            rendered_at: Utc::now(),
        }
    }

    /// Whether an `If-None-Match` header value names this page.
    pub fn matches(&self, if_none_match: &str) -> bool {
        if_none_match.split(',').map(str::trim).any(|tag| {
            tag == "*" || tag.strip_prefix("W/").unwrap_or(tag) == self.etag
        })
    }

    fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.generated_at)
    }
}

/// Result of a cache lookup.
#[derive(Debug, Clone)]
pub enum Lookup {
    Fresh(Arc<CachedPage>),
    Stale(Arc<CachedPage>),
    /// The document was missing when last generated.
    NotFound { stale: bool },
    Missing,
}

#[derive(Debug)]
pub struct PageCache {
    pages: RwLock<FxHashMap<String, Arc<CachedPage>>>,
    /// Paths whose document was missing, with the time that was learned.
    not_found: Mutex<FxHashMap<String, Instant>>,
    not_found_capacity: usize,
    /// Paths with a regeneration in flight.
    pending: Mutex<FxHashSet<String>>,
}

impl Default for PageCache {
    fn default() -> Self {
        Self::with_not_found_capacity(MAX_NOT_FOUND)
    }
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache remembering at most `capacity` not-found paths (at least one).
    pub fn with_not_found_capacity(capacity: usize) -> Self {
        Self {
            pages: RwLock::default(),
            not_found: Mutex::default(),
            not_found_capacity: capacity.max(1),
            pending: Mutex::default(),
        }
    }

    pub fn lookup(&self, path: &str, ttl: Duration) -> Lookup {
        self.lookup_at(path, ttl, Instant::now())
    }

    fn lookup_at(&self, path: &str, ttl: Duration, now: Instant) -> Lookup {
        if let Some(page) = self.pages.read().get(path) {
            return if page.age(now) <= ttl {
                Lookup::Fresh(Arc::clone(page))
            } else {
                Lookup::Stale(Arc::clone(page))
            };
        }

        match self.not_found.lock().get(path) {
            Some(learned) => Lookup::NotFound {
                stale: now.saturating_duration_since(*learned) > ttl,
            },
            None => Lookup::Missing,
        }
    }

    pub fn get(&self, path: &str) -> Option<Arc<CachedPage>> {
        self.pages.read().get(path).cloned()
    }

    /// Store a freshly rendered page, replacing any previous version.
    pub fn insert(&self, path: &str, html: String) -> Arc<CachedPage> {
        let page = Arc::new(CachedPage::new(html));
        self.pages.write().insert(path.to_string(), Arc::clone(&page));
        self.not_found.lock().remove(path);
        page
    }

    /// Remember that the document behind `path` does not exist, dropping any
    /// rendered page for it.
    pub fn insert_not_found(&self, path: &str) {
        self.pages.write().remove(path);

        let mut not_found = self.not_found.lock();
        if !not_found.contains_key(path) && not_found.len() >= self.not_found_capacity {
            let oldest = not_found
                .iter()
                .min_by_key(|(_, learned)| **learned)
                .map(|(oldest, _)| oldest.clone());
            if let Some(oldest) = oldest {
                not_found.remove(&oldest);
            }
        }
        not_found.insert(path.to_string(), Instant::now());
    }

    /// Claim the right to regenerate `path`. Only the first caller gets
    /// `true` until [`release`](Self::release) is called.
    pub fn try_claim(&self, path: &str) -> bool {
        self.pending.lock().insert(path.to_string())
    }

    pub fn release(&self, path: &str) {
        self.pending.lock().remove(path);
    }

    pub fn is_pending(&self, path: &str) -> bool {
        self.pending.lock().contains(path)
    }

    /// All cached pages, sorted by path.
    pub fn pages(&self) -> Vec<(String, Arc<CachedPage>)> {
        let mut pages: Vec<_> = self
            .pages
            .read()
            .iter()
            .map(|(path, page)| (path.clone(), Arc::clone(page)))
            .collect();
        pages.sort_by(|a, b| a.0.cmp(&b.0));
        pages
    }

    /// Number of rendered pages.
    pub fn len(&self) -> usize {
        self.pages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of remembered not-found paths.
    pub fn not_found_len(&self) -> usize {
        self.not_found.lock().len()
    }
}
