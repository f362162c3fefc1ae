//! Typed AST wrappers over the untyped rowan CST.
//!
//! This module provides strongly-typed accessors for the Go syntax nodes the
//! expression builder cares about. Each struct wraps a SyntaxNode and
//! provides methods to access children.

use smol_str::SmolStr;

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    /// Byte offset of the start of this node in its source file
    fn start_offset(&self) -> u32 {
        self.syntax().text_range().start().into()
    }
}

/// Find the first non-trivia token of a given kind among direct children.
fn find_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

// ============================================================================
// File level
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    pub fn package_clause(&self) -> Option<PackageClause> {
        self.0.children().find_map(PackageClause::cast)
    }

    /// Top-level function declarations, in source order.
    pub fn func_decls(&self) -> impl Iterator<Item = FuncDecl> + '_ {
        self.0.children().filter_map(FuncDecl::cast)
    }
}

ast_node!(PackageClause, PACKAGE_CLAUSE);

impl PackageClause {
    pub fn name(&self) -> Option<SmolStr> {
        find_token(&self.0, SyntaxKind::IDENT).map(|t| SmolStr::new(t.text()))
    }
}

// ============================================================================
// Declarations
// ============================================================================

ast_node!(FuncDecl, FUNC_DECL);

impl FuncDecl {
    /// The function name. Receiver and type-parameter identifiers live in
    /// nested nodes, so the first direct IDENT token is the name.
    pub fn name(&self) -> Option<SmolStr> {
        find_token(&self.0, SyntaxKind::IDENT).map(|t| SmolStr::new(t.text()))
    }

    pub fn receiver(&self) -> Option<Receiver> {
        self.0.children().find_map(Receiver::cast)
    }

    pub fn body(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }
}

ast_node!(Receiver, RECEIVER);

impl Receiver {
    /// Source text of the receiver type with whitespace squeezed out, e.g.
    /// `*Server` for `(s * Server)`.
    pub fn type_text(&self) -> Option<String> {
        let type_node = self.0.children().next()?;
        let text: String = type_node
            .text()
            .to_string()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

ast_node!(Block, BLOCK);
ast_node!(ValueSpec, VALUE_SPEC);

impl ValueSpec {
    /// The declared names (identifier tokens before any type or initializer).
    pub fn names(&self) -> Vec<SyntaxToken> {
        let mut names = Vec::new();
        for element in self.0.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Token(t) => match t.kind() {
                    SyntaxKind::IDENT => names.push(t),
                    SyntaxKind::COMMA => {}
                    k if k.is_trivia() => {}
                    _ => break,
                },
                rowan::NodeOrToken::Node(_) => break,
            }
        }
        names
    }
}

ast_node!(TypeSpec, TYPE_SPEC);

impl TypeSpec {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        find_token(&self.0, SyntaxKind::IDENT)
    }
}

// ============================================================================
// Statements
// ============================================================================

ast_node!(AssignStmt, ASSIGN_STMT);

impl AssignStmt {
    /// Split direct child expression nodes at the assignment operator.
    /// Returns `(left_hand_sides, right_hand_sides)`.
    pub fn split(&self) -> (Vec<SyntaxNode>, Vec<SyntaxNode>) {
        let mut lefts = Vec::new();
        let mut rights = Vec::new();
        let mut seen_op = false;

        for element in self.0.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Token(t) if t.kind().is_assign_op() => {
                    seen_op = true;
                }
                rowan::NodeOrToken::Node(n) => {
                    if seen_op {
                        rights.push(n);
                    } else {
                        lefts.push(n);
                    }
                }
                _ => {}
            }
        }
        (lefts, rights)
    }
}

// ============================================================================
// Expressions
// ============================================================================

ast_node!(NameExpr, NAME_EXPR);

impl NameExpr {
    pub fn name(&self) -> SmolStr {
        find_token(&self.0, SyntaxKind::IDENT)
            .map(|t| SmolStr::new(t.text()))
            .unwrap_or_default()
    }
}

ast_node!(Literal, LITERAL);

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind().is_literal_token())
    }

    /// Raw literal text, exactly as written (quotes included).
    pub fn text(&self) -> String {
        self.token().map(|t| t.text().to_string()).unwrap_or_default()
    }
}

ast_node!(SelectorExpr, SELECTOR_EXPR);

impl SelectorExpr {
    /// The expression left of the dot.
    pub fn operand(&self) -> Option<SyntaxNode> {
        self.0.children().next()
    }

    /// The member name right of the dot.
    pub fn member(&self) -> Option<SmolStr> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::IDENT)
            .last()
            .map(|t| SmolStr::new(t.text()))
    }

    /// The operand as a bare identifier, if it is one.
    pub fn qualifier_name(&self) -> Option<SmolStr> {
        let operand = self.operand()?;
        NameExpr::cast(operand).map(|n| n.name())
    }
}

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    /// The callee expression (everything before the argument list).
    pub fn callee(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() != SyntaxKind::ARG_LIST)
    }

    /// Argument expression nodes, in order.
    pub fn args(&self) -> Vec<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ARG_LIST)
            .map(|list| list.children().collect())
            .unwrap_or_default()
    }
}

ast_node!(CompositeLit, COMPOSITE_LIT);

impl CompositeLit {
    /// The type expression before the braces.
    pub fn type_node(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() != SyntaxKind::LITERAL_VALUE)
    }

    /// The struct name, when the literal's type is a bare identifier
    /// (`Foo{...}`). Qualified and slice/map literals yield `None`.
    pub fn type_name(&self) -> Option<SmolStr> {
        let node = self.type_node()?;
        NameExpr::cast(node).map(|n| n.name())
    }

    pub fn literal_value(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::LITERAL_VALUE)
    }

    /// Element nodes between the braces: `KEYED_ELEMENT`s and bare
    /// expressions.
    pub fn elements(&self) -> Vec<SyntaxNode> {
        self.literal_value()
            .map(|v| v.children().collect())
            .unwrap_or_default()
    }
}

ast_node!(KeyedElement, KEYED_ELEMENT);

impl KeyedElement {
    pub fn key(&self) -> Option<SyntaxNode> {
        self.0.children().next()
    }

    pub fn value(&self) -> Option<SyntaxNode> {
        self.0.children().nth(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn first_node(source: &str, kind: SyntaxKind) -> SyntaxNode {
        let parse = parse(source);
        assert!(parse.ok(), "{:?}", parse.errors);
        parse
            .syntax()
            .descendants()
            .find(|n| n.kind() == kind)
            .unwrap_or_else(|| panic!("no {kind:?} in {source:?}"))
    }

    #[test]
    fn test_package_clause_name() {
        let node = first_node("package widgets\n", SyntaxKind::PACKAGE_CLAUSE);
        let clause = PackageClause::cast(node).unwrap();
        assert_eq!(clause.name().unwrap(), "widgets");
    }

    #[test]
    fn test_func_decl_name_and_receiver() {
        let node = first_node(
            "package p\n\nfunc (s *Server) Run() {}\n",
            SyntaxKind::FUNC_DECL,
        );
        let func = FuncDecl::cast(node).unwrap();
        assert_eq!(func.name().unwrap(), "Run");
        assert_eq!(func.receiver().unwrap().type_text().unwrap(), "*Server");
    }

    #[test]
    fn test_func_decl_without_receiver() {
        let node = first_node("package p\n\nfunc main() {}\n", SyntaxKind::FUNC_DECL);
        let func = FuncDecl::cast(node).unwrap();
        assert_eq!(func.name().unwrap(), "main");
        assert!(func.receiver().is_none());
    }

    #[test]
    fn test_assign_split() {
        let node = first_node(
            "package p\n\nfunc f() {\n\tx, y := g()\n}\n",
            SyntaxKind::ASSIGN_STMT,
        );
        let assign = AssignStmt::cast(node).unwrap();
        let (lefts, rights) = assign.split();
        assert_eq!(lefts.len(), 2);
        assert_eq!(rights.len(), 1);
        assert_eq!(lefts[0].kind(), SyntaxKind::NAME_EXPR);
        assert_eq!(rights[0].kind(), SyntaxKind::CALL_EXPR);
    }

    #[test]
    fn test_call_callee_and_args() {
        let node = first_node(
            "package p\n\nfunc f() {\n\tpkg.Get(a, \"lit\")\n}\n",
            SyntaxKind::CALL_EXPR,
        );
        let call = CallExpr::cast(node).unwrap();
        let callee = call.callee().unwrap();
        assert_eq!(callee.kind(), SyntaxKind::SELECTOR_EXPR);

        let sel = SelectorExpr::cast(callee).unwrap();
        assert_eq!(sel.member().unwrap(), "Get");
        assert_eq!(sel.qualifier_name().unwrap(), "pkg");

        let args = call.args();
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].kind(), SyntaxKind::NAME_EXPR);
        assert_eq!(args[1].kind(), SyntaxKind::LITERAL);
    }

    #[test]
    fn test_composite_lit_named() {
        let node = first_node(
            "package p\n\nfunc f() {\n\tx := Foo{A: a, B: b}\n\t_ = x\n}\n",
            SyntaxKind::COMPOSITE_LIT,
        );
        let lit = CompositeLit::cast(node).unwrap();
        assert_eq!(lit.type_name().unwrap(), "Foo");
        assert_eq!(lit.elements().len(), 2);
        assert!(lit.elements().iter().all(|e| e.kind() == SyntaxKind::KEYED_ELEMENT));
    }

    #[test]
    fn test_composite_lit_map_is_unnamed() {
        let node = first_node(
            "package p\n\nvar m = map[string]int{\"a\": 1}\n",
            SyntaxKind::COMPOSITE_LIT,
        );
        let lit = CompositeLit::cast(node).unwrap();
        assert!(lit.type_name().is_none());
    }

    #[test]
    fn test_value_spec_names() {
        let node = first_node("package p\n\nvar a, b int\n", SyntaxKind::VALUE_SPEC);
        let spec = ValueSpec::cast(node).unwrap();
        let names: Vec<_> = spec.names().iter().map(|t| t.text().to_string()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_literal_text_keeps_quotes() {
        let node = first_node(
            "package p\n\nfunc f() {\n\tg(\"lit\")\n}\n",
            SyntaxKind::LITERAL,
        );
        let lit = Literal::cast(node).unwrap();
        assert_eq!(lit.text(), "\"lit\"");
    }
}
