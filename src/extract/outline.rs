//! Flat declaration outline of a source file.
//!
//! Lists top-level functions and methods, type specs and value-spec names
//! with their byte and line extents, for editor surfaces that want a file
//! outline next to the expression stream.

use serde::{Deserialize, Serialize};
use text_size::TextSize;

use crate::parser::{AstNode, FuncDecl, SyntaxKind, SyntaxNode, TypeSpec, ValueSpec};
use crate::syntax::SourceUnit;

/// One outlined declaration. Lines are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "receiverType", default, skip_serializing_if = "String::is_empty")]
    pub receiver_type: String,
    pub start: u32,
    pub end: u32,
    #[serde(rename = "lineStart")]
    pub line_start: u32,
    #[serde(rename = "lineEnd")]
    pub line_end: u32,
}

/// Outline the top-level declarations of a parsed unit.
pub fn outline(unit: &SourceUnit) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    let index = unit.line_index();

    for node in unit.syntax().children() {
        match node.kind() {
            SyntaxKind::FUNC_DECL => {
                let Some(func) = FuncDecl::cast(node.clone()) else {
                    continue;
                };
                let Some(name) = func.name() else { continue };
                let receiver = func
                    .receiver()
                    .and_then(|r| r.type_text())
                    .unwrap_or_default();
                let start = u32::from(node.text_range().start());
                declarations.push(make_declaration(
                    index,
                    name.to_string(),
                    "function",
                    receiver,
                    start,
                    trimmed_end(&node),
                ));
            }
            SyntaxKind::TYPE_DECL => {
                for spec in node.children().filter_map(TypeSpec::cast) {
                    if let Some(name) = spec.name_token() {
                        let start = u32::from(spec.syntax().text_range().start());
                        declarations.push(make_declaration(
                            index,
                            name.text().to_string(),
                            "type",
                            String::new(),
                            start,
                            trimmed_end(spec.syntax()),
                        ));
                    }
                }
            }
            SyntaxKind::CONST_DECL | SyntaxKind::VAR_DECL => {
                for spec in node.children().filter_map(ValueSpec::cast) {
                    for name in spec.names() {
                        let range = name.text_range();
                        declarations.push(make_declaration(
                            index,
                            name.text().to_string(),
                            "variable",
                            String::new(),
                            u32::from(range.start()),
                            u32::from(range.end()),
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    declarations
}

fn make_declaration(
    index: &crate::base::LineIndex,
    label: String,
    kind: &str,
    receiver_type: String,
    start: u32,
    end: u32,
) -> Declaration {
    let line_of = |offset: u32| index.line_col(TextSize::new(offset)).line + 1;
    Declaration {
        label,
        kind: kind.to_string(),
        receiver_type,
        start,
        end,
        line_start: line_of(start),
        line_end: line_of(end),
    }
}

/// End offset of a node's last non-trivia token. Statement terminators pull
/// trailing trivia into declaration nodes; the outline should not count it.
fn trimmed_end(node: &SyntaxNode) -> u32 {
    node.descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| !t.kind().is_trivia())
        .last()
        .map(|t| u32::from(t.text_range().end()))
        .unwrap_or_else(|| u32::from(node.text_range().end()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(source: &str) -> SourceUnit {
        SourceUnit::parse_source("demo.go", source.to_string()).unwrap()
    }

    #[test]
    fn test_outline_functions_and_methods() {
        let unit = unit(
            "package p\n\nfunc Run() {}\n\nfunc (s *Server) Stop() {\n}\n",
        );
        let decls = outline(&unit);
        assert_eq!(decls.len(), 2);

        assert_eq!(decls[0].label, "Run");
        assert_eq!(decls[0].kind, "function");
        assert_eq!(decls[0].receiver_type, "");
        assert_eq!(decls[0].line_start, 3);

        assert_eq!(decls[1].label, "Stop");
        assert_eq!(decls[1].receiver_type, "*Server");
        assert_eq!(decls[1].line_start, 5);
        assert_eq!(decls[1].line_end, 6);
    }

    #[test]
    fn test_outline_types_and_values() {
        let unit = unit(
            "package p\n\ntype Point struct {\n\tX int\n}\n\nvar a, b = 1, 2\n\nconst c = 3\n",
        );
        let decls = outline(&unit);
        let labels: Vec<_> = decls.iter().map(|d| (d.label.as_str(), d.kind.as_str())).collect();
        assert_eq!(
            labels,
            vec![
                ("Point", "type"),
                ("a", "variable"),
                ("b", "variable"),
                ("c", "variable"),
            ]
        );
    }

    #[test]
    fn test_outline_receiver_omitted_in_json() {
        let unit = unit("package p\n\nfunc Run() {}\n");
        let decls = outline(&unit);
        let json = serde_json::to_string(&decls[0]).unwrap();
        assert!(!json.contains("receiverType"));
        assert!(json.contains("\"lineStart\":3"));
    }
}
