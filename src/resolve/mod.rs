//! Symbol resolution: the external resolver contract and the run-scoped
//! cache in front of it.
//!
//! The resolver answers positional queries (`file path` + byte offset of an
//! identifier use) with the canonical module path of the package that
//! identifier refers to. Queries are blocking; failures are recovered by the
//! caller, which falls back to the raw identifier text.

mod cache;
mod process;

pub use cache::{ResolverCache, normalize_vendored};
pub use process::ProcessResolver;

use std::path::Path;
use std::time::Duration;

use thiserror::Error;

/// Errors from an external resolver query.
///
/// These are always recovered locally at the call site; they exist so the
/// recovery can be logged with a reason.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to spawn resolver '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("resolver i/o error: {0}")]
    Io(#[source] std::io::Error),

    #[error("resolver produced invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("resolver exited with status {status}")]
    Status { status: std::process::ExitStatus },

    #[error("resolver query timed out after {0:?}")]
    Timeout(Duration),
}

/// The external Symbol Resolver collaborator contract.
///
/// `query(file, offset)` returns the canonical package path for the
/// identifier used at `offset` in `file`, `None` when the resolver has no
/// answer, or an error when the query itself failed.
pub trait SymbolResolver {
    fn query(&self, file: &Path, offset: u32) -> Result<Option<String>, ResolveError>;
}
