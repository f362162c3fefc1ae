//! Foundation types for gosift.
//!
//! This module provides the primitives used throughout the pipeline:
//! - [`LineIndex`], [`LineCol`] - byte offset to line/column conversion
//!
//! This module has NO dependencies on other gosift modules.

mod line_index;

pub use line_index::{LineCol, LineIndex};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
