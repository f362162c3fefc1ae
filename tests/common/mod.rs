//! Shared helpers for integration tests.
#![allow(dead_code)] // not every test binary uses every helper

use std::cell::RefCell;
use std::path::Path;

use gosift::{
    Options, ResolveError, ResolverCache, SourceFileRecord, SourceUnit, SymbolResolver,
    extract_unit,
};

/// A resolver that never knows anything.
pub struct NullResolver;

impl SymbolResolver for NullResolver {
    fn query(&self, _file: &Path, _offset: u32) -> Result<Option<String>, ResolveError> {
        Ok(None)
    }
}

/// A resolver with a fixed answer, recording every external call.
#[derive(Default)]
pub struct RecordingResolver {
    pub answer: Option<String>,
    pub fail: bool,
    pub calls: RefCell<Vec<(String, u32)>>,
}

impl RecordingResolver {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl SymbolResolver for RecordingResolver {
    fn query(&self, file: &Path, offset: u32) -> Result<Option<String>, ResolveError> {
        self.calls
            .borrow_mut()
            .push((file.display().to_string(), offset));
        if self.fail {
            return Err(ResolveError::Io(std::io::Error::other("resolver down")));
        }
        Ok(self.answer.clone())
    }
}

/// Parse `source` as `demo.go` and run the extraction pipeline over it.
pub fn extract_source(source: &str, resolver: &dyn SymbolResolver) -> SourceFileRecord {
    let mut cache = ResolverCache::new();
    extract_source_with(source, resolver, &mut cache)
}

pub fn extract_source_with(
    source: &str,
    resolver: &dyn SymbolResolver,
    cache: &mut ResolverCache,
) -> SourceFileRecord {
    let unit = SourceUnit::parse_source("demo.go", source.to_string()).expect("source parses");
    extract_unit(&unit, &Options::default(), cache, resolver)
}
