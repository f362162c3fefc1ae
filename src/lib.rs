//! # gosift
//!
//! Scope-aware expression extraction from Go source for a code-completion
//! ranking service. One file in, one JSON document out: the file's calls,
//! assignments, literal constants and struct constructions as a simplified
//! expression tree, with local identifiers resolved to canonical module
//! paths through an external resolver.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! extract   → expression builder: pattern walk, scope tracking, dedup
//!   ↓
//! resolve   → resolver contract, subprocess client, run-scoped cache
//!   ↓
//! model     → Expr tagged union, serde document schema
//!   ↓
//! syntax    → SourceUnit loader, fail-fast parse boundary
//!   ↓
//! parser    → logos lexer, recursive-descent parser, rowan CST, typed AST
//!   ↓
//! base      → primitives (LineIndex)
//! ```
//!
//! The pipeline is synchronous and single-threaded: load → walk → (blocking)
//! resolve → serialize, one file at a time. The only state crossing file
//! boundaries is the [`resolve::ResolverCache`], which the caller owns for
//! the whole run.

/// Foundation types: LineIndex
pub mod base;

/// Parser: logos lexer, recursive-descent parser, typed AST layer
pub mod parser;

/// Syntax: SourceUnit loading, fail-fast ParseError boundary
pub mod syntax;

/// Data model: the Expr tagged union and the emitted document schema
pub mod model;

/// Symbol resolution: external resolver contract, subprocess client, cache
pub mod resolve;

/// Extraction: the expression builder, dedup tracker, file outline
pub mod extract;

// Re-export the pipeline surface
pub use extract::{Declaration, Options, extract_file, extract_unit, outline};
pub use model::{Expr, LitKind, Meta, SourceFileRecord, to_json};
pub use resolve::{ProcessResolver, ResolveError, ResolverCache, SymbolResolver};
pub use syntax::{LoadError, SourceUnit};

// Re-export foundation types
pub use base::{LineCol, LineIndex, TextRange, TextSize};
