//! Source loading and the fail-fast parse boundary.
//!
//! A [`SourceUnit`] owns one file's text together with its parse result and
//! line index. Loading is fail-fast: any syntax error aborts the unit with
//! [`LoadError::Parse`] and no partial tree escapes.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::base::LineIndex;
use crate::parser::{self, AstNode, Parse, SourceFile, SyntaxNode};

/// Error loading or parsing a source file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse failed for {path}: {count} syntax error(s), first at {line}:{column}: {message}")]
    Parse {
        path: PathBuf,
        count: usize,
        line: u32,
        column: u32,
        message: String,
    },
}

/// A successfully parsed source file: path, text, CST and line index.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    path: PathBuf,
    text: String,
    parse: Parse,
    line_index: LineIndex,
}

impl SourceUnit {
    /// Read and parse a file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_source(path, text)
    }

    /// Parse already-loaded text, associating it with `path` for diagnostics
    /// and resolver queries.
    pub fn parse_source(path: impl AsRef<Path>, text: String) -> Result<Self, LoadError> {
        let path = path.as_ref().to_path_buf();
        let parse = parser::parse(&text);
        let line_index = LineIndex::new(&text);

        if let Some(first) = parse.errors.first() {
            let pos = line_index.line_col(first.range.start());
            return Err(LoadError::Parse {
                path,
                count: parse.errors.len(),
                line: pos.line + 1,
                column: pos.col + 1,
                message: first.message.clone(),
            });
        }

        debug!(path = %path.display(), bytes = text.len(), "parsed source file");
        Ok(Self {
            path,
            text,
            parse,
            line_index,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Root of the CST.
    pub fn syntax(&self) -> SyntaxNode {
        self.parse.syntax()
    }

    /// Typed root node.
    pub fn source_file(&self) -> Option<SourceFile> {
        SourceFile::cast(self.parse.syntax())
    }

    /// Package name from the `package` clause, if present.
    pub fn package_name(&self) -> Option<String> {
        self.source_file()?
            .package_clause()?
            .name()
            .map(|n| n.to_string())
    }

    /// File name component of the path.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_ok() {
        let unit = SourceUnit::parse_source(
            "demo.go",
            "package demo\n\nfunc f() {}\n".to_string(),
        )
        .unwrap();
        assert_eq!(unit.package_name().as_deref(), Some("demo"));
        assert_eq!(unit.file_name(), "demo.go");
    }

    #[test]
    fn test_parse_source_fails_fast() {
        let err = SourceUnit::parse_source("bad.go", "package p\n\nfunc f( {\n".to_string())
            .unwrap_err();
        match err {
            LoadError::Parse { count, line, .. } => {
                assert!(count >= 1);
                assert!(line >= 1);
            }
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn test_missing_package_clause_is_not_fatal() {
        let unit = SourceUnit::parse_source("frag.go", "func f() {}\n".to_string()).unwrap();
        assert_eq!(unit.package_name(), None);
    }
}
