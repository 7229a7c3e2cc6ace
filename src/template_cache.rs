//! Compiled-template cache.
//!
//! Compiling a route template costs a parse plus a regex build. Tables are
//! normally built once at startup, but embedders that rebuild tables per
//! configuration reload pay that cost again for every unchanged template.
//! This cache stores compiled templates behind `Arc` and shares them across
//! tables.
//!
//! ## Cache Key Structure
//!
//! Keys are formatted as `{template}:{fingerprint}` where the fingerprint
//! is the first 16 hex chars of a SHA-256 over the sorted defaults and
//! constraints plus the case-sensitivity flag - everything besides the
//! template text that shapes the compiled pattern. Two routes sharing a
//! template but constrained differently therefore never collide.
//!
//! ## Thread Safety
//!
//! `Arc<RwLock<HashMap>>`: many concurrent readers, exclusive writers.
//! Population is idempotent - recompiling an entry yields a structurally
//! identical template - so overwrites are harmless and no cross-request
//! exclusivity is needed beyond the lock itself. Absence of the cache never
//! changes matching semantics, only registration latency.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::router::{compile, CompiledTemplate, RouteError};

/// Thread-safe cache of compiled route templates.
#[derive(Clone, Default)]
pub struct TemplateCache {
    templates: Arc<RwLock<HashMap<String, Arc<CompiledTemplate>>>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl TemplateCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn cache_key(
        template: &str,
        defaults: &HashMap<String, String>,
        constraints: &HashMap<String, String>,
        case_insensitive: bool,
    ) -> String {
        let mut entries: Vec<String> = defaults
            .iter()
            .map(|(k, v)| format!("d:{}={}", k, v))
            .collect();
        entries.extend(constraints.iter().map(|(k, v)| format!("c:{}={}", k, v)));
        entries.sort();

        let mut hasher = Sha256::new();
        for entry in &entries {
            hasher.update(entry.as_bytes());
            hasher.update(b"\n");
        }
        hasher.update(if case_insensitive { b"i" } else { b"s" });
        let hash = format!("{:x}", hasher.finalize());
        format!("{}:{}", template, &hash[..16])
    }

    /// Fetch a compiled template, compiling and inserting on miss.
    ///
    /// # Errors
    ///
    /// Propagates template compilation errors; nothing is cached for a
    /// template that fails to compile.
    pub fn get_or_compile(
        &self,
        template: &str,
        defaults: &HashMap<String, String>,
        constraints: &HashMap<String, String>,
        case_insensitive: bool,
    ) -> Result<Arc<CompiledTemplate>, RouteError> {
        let key = Self::cache_key(template, defaults, constraints, case_insensitive);

        if let Some(found) = self
            .templates
            .read()
            .ok()
            .and_then(|map| map.get(&key).cloned())
        {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(found);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let compiled = Arc::new(compile(template, defaults, constraints, case_insensitive)?);
        // A poisoned lock degrades to recompiling on the next lookup.
        if let Ok(mut map) = self.templates.write() {
            map.insert(key, Arc::clone(&compiled));
        }
        debug!(template, entries = self.len(), "compiled template cached");
        Ok(compiled)
    }

    /// Number of cached templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.read().map(|map| map.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached template. Used when a routes file is reloaded.
    pub fn clear(&self) {
        if let Ok(mut map) = self.templates.write() {
            map.clear();
        }
    }

    /// Cache hits since creation.
    #[must_use]
    pub fn hit_count(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Cache misses since creation.
    #[must_use]
    pub fn miss_count(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}
