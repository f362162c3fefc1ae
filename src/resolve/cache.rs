//! Run-scoped identifier → canonical module path cache.

use std::path::Path;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::{debug, trace};

use super::SymbolResolver;

/// Strip any prefix preceding a vendoring directory segment, so a vendored
/// resolution reports the import path a consumer would actually write.
pub fn normalize_vendored(path: &str) -> &str {
    match path.rfind("/vendor/") {
        Some(idx) => &path[idx + "/vendor/".len()..],
        None => path,
    }
}

/// Memo of identifier text → canonical module path, scoped to one run.
///
/// The cache is owned by the caller and threaded through each per-file
/// pipeline invocation, so an identifier repeated across the files of one
/// run is resolved externally only once. Failed and empty lookups are not
/// cached; a later occurrence of the same identifier retries the external
/// query.
#[derive(Debug, Default)]
pub struct ResolverCache {
    entries: FxHashMap<SmolStr, String>,
}

impl ResolverCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached canonical path for `ident`, if any.
    pub fn get(&self, ident: &str) -> Option<&str> {
        self.entries.get(ident).map(String::as_str)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve `ident` as used at `file`:`offset`, consulting the cache
    /// first. A successful non-empty answer is normalized and cached;
    /// a failure or empty answer yields `None` and caches nothing.
    pub fn resolve(
        &mut self,
        ident: &str,
        file: &Path,
        offset: u32,
        resolver: &dyn SymbolResolver,
    ) -> Option<String> {
        if let Some(hit) = self.entries.get(ident) {
            trace!(ident, path = %hit, "resolver cache hit");
            return Some(hit.clone());
        }

        match resolver.query(file, offset) {
            Ok(Some(path)) if !path.is_empty() => {
                let normalized = normalize_vendored(&path).to_string();
                trace!(ident, path = %normalized, "resolved identifier");
                self.entries.insert(SmolStr::new(ident), normalized.clone());
                Some(normalized)
            }
            Ok(_) => {
                debug!(ident, "resolver returned no package");
                None
            }
            Err(err) => {
                debug!(ident, error = %err, "resolver query failed");
                None
            }
        }
    }
}
