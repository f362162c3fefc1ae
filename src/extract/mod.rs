//! The expression builder: a depth-first pattern walk over the CST.
//!
//! The walk visits every node exactly once, in pre-order. At each unvisited
//! node the builder attempts a fixed sequence of pattern matches; the first
//! match claims the node's whole subtree in the dedup tracker and yields one
//! expression. Non-matches descend without emitting anything, so literals and
//! calls nested in syntax the builder does not model still surface on their
//! own.

mod outline;
mod visited;

pub use outline::{Declaration, outline};
pub use visited::VisitedSet;

use std::path::Path;

use rowan::WalkEvent;
use tracing::{debug, trace, warn};

use crate::model::{Expr, LitKind, Meta, SourceFileRecord};
use crate::parser::{
    AssignStmt, AstNode, CallExpr, CompositeLit, FuncDecl, KeyedElement, Literal, NameExpr,
    SelectorExpr, SyntaxKind, SyntaxNode,
};
use crate::resolve::{ResolverCache, SymbolResolver};
use crate::syntax::{LoadError, SourceUnit};

/// The Go discard placeholder on an assignment's left-hand side.
const DISCARD: &str = "_";

/// Extraction options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Provenance tag written into each document's `meta.source`.
    pub source: String,
    /// Recursion limit for nested expression construction.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            source: "github.com".to_string(),
            max_depth: 64,
        }
    }
}

/// Load `path`, walk it, and emit its record. The cache is owned by the
/// caller so it can span all files of a run.
pub fn extract_file(
    path: impl AsRef<Path>,
    options: &Options,
    cache: &mut ResolverCache,
    resolver: &dyn SymbolResolver,
) -> Result<SourceFileRecord, LoadError> {
    let unit = SourceUnit::load(path)?;
    Ok(extract_unit(&unit, options, cache, resolver))
}

/// Walk an already-parsed unit and emit its record.
pub fn extract_unit(
    unit: &SourceUnit,
    options: &Options,
    cache: &mut ResolverCache,
    resolver: &dyn SymbolResolver,
) -> SourceFileRecord {
    let lines = ExprBuilder::new(unit, options, cache, resolver).run();
    debug!(
        path = %unit.path().display(),
        expressions = lines.len(),
        "extracted expressions"
    );

    SourceFileRecord {
        meta: Meta {
            source: options.source.clone(),
        },
        path: unit.path().display().to_string(),
        package: unit.package_name().unwrap_or_default(),
        file: unit.file_name(),
        lines,
    }
}

struct ExprBuilder<'a> {
    unit: &'a SourceUnit,
    options: &'a Options,
    cache: &'a mut ResolverCache,
    resolver: &'a dyn SymbolResolver,
    visited: VisitedSet,
    scope: String,
    exprs: Vec<Expr>,
}

impl<'a> ExprBuilder<'a> {
    fn new(
        unit: &'a SourceUnit,
        options: &'a Options,
        cache: &'a mut ResolverCache,
        resolver: &'a dyn SymbolResolver,
    ) -> Self {
        Self {
            unit,
            options,
            cache,
            resolver,
            visited: VisitedSet::new(),
            scope: String::new(),
            exprs: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Expr> {
        let root = self.unit.syntax();
        for event in root.preorder() {
            let WalkEvent::Enter(node) = event else {
                continue;
            };

            self.update_scope(&node);

            let start = start_of(&node);
            if self.visited.is_visited(start) {
                continue;
            }

            if let Some(expr) = self.build_node(&node, 0) {
                self.claim_subtree(&node);
                trace!(offset = expr.offset(), scope = expr.scope(), "emitted expression");
                self.exprs.push(expr);
            }
        }
        self.exprs
    }

    /// Pattern 1: function/method entry sets the current scope; a top-level
    /// declaration block resets it. Declarations nested in a function body
    /// leave the scope alone.
    fn update_scope(&mut self, node: &SyntaxNode) {
        match node.kind() {
            SyntaxKind::FUNC_DECL => {
                if let Some(func) = FuncDecl::cast(node.clone()) {
                    if let Some(name) = func.name() {
                        self.scope = match func.receiver().and_then(|r| r.type_text()) {
                            Some(receiver) => format!("{receiver}#{name}"),
                            None => name.to_string(),
                        };
                    }
                }
            }
            SyntaxKind::CONST_DECL
            | SyntaxKind::VAR_DECL
            | SyntaxKind::TYPE_DECL
            | SyntaxKind::IMPORT_DECL => {
                let top_level = node
                    .parent()
                    .is_some_and(|p| p.kind() == SyntaxKind::SOURCE_FILE);
                if top_level {
                    self.scope.clear();
                }
            }
            _ => {}
        }
    }

    /// Mark every node start in the matched subtree as claimed, so no inner
    /// span is later emitted as a separate sibling.
    fn claim_subtree(&mut self, node: &SyntaxNode) {
        for descendant in node.descendants() {
            self.visited.mark(start_of(&descendant));
        }
    }

    /// Attempt the pattern matches, in fixed precedence, at one node.
    fn build_node(&mut self, node: &SyntaxNode, depth: usize) -> Option<Expr> {
        if depth > self.options.max_depth {
            warn!(
                path = %self.unit.path().display(),
                offset = start_of(node),
                "expression nesting exceeds depth limit, subtree dropped"
            );
            return None;
        }

        match node.kind() {
            SyntaxKind::ASSIGN_STMT => {
                // `:= range` headers are loop bindings, not assignments
                if node
                    .children()
                    .any(|c| c.kind() == SyntaxKind::RANGE_CLAUSE)
                {
                    return None;
                }
                AssignStmt::cast(node.clone()).map(|stmt| self.build_assignment(&stmt, depth))
            }
            SyntaxKind::CALL_EXPR => {
                CallExpr::cast(node.clone()).and_then(|call| self.build_call(&call, depth))
            }
            SyntaxKind::COMPOSITE_LIT => {
                CompositeLit::cast(node.clone()).and_then(|lit| self.build_construct(&lit))
            }
            SyntaxKind::LITERAL if !self.scope.is_empty() => {
                Literal::cast(node.clone()).and_then(|lit| self.build_value(&lit))
            }
            _ => None,
        }
    }

    /// Pattern 2: assignment.
    fn build_assignment(&mut self, stmt: &AssignStmt, depth: usize) -> Expr {
        let (lefts, rights) = stmt.split();
        let first_right = rights.first();

        // a named composite literal on the right becomes the bindings' reference
        let construct = first_right
            .cloned()
            .and_then(CompositeLit::cast)
            .filter(|lit| lit.type_name().is_some());
        let binding_reference = construct.as_ref().and_then(|lit| lit.type_name());

        let mut lhs = Vec::new();
        for left in &lefts {
            let Some(name_expr) = NameExpr::cast(left.clone()) else {
                continue;
            };
            let name = name_expr.name();
            if name == DISCARD {
                continue;
            }
            lhs.push(Expr::Variable {
                name,
                reference: binding_reference.clone(),
                offset: start_of(left),
                scope: self.scope.clone(),
            });
        }

        let rhs = match construct {
            Some(lit) => self.build_construct(&lit),
            None => first_right.and_then(|right| self.build_node(right, depth + 1)),
        };

        Expr::Assignment {
            lhs,
            rhs: rhs.map(Box::new),
            offset: start_of(stmt.syntax()),
            scope: self.scope.clone(),
        }
    }

    /// Pattern 3: call.
    fn build_call(&mut self, call: &CallExpr, depth: usize) -> Option<Expr> {
        let callee = call.callee()?;

        let (name, reference) = if let Some(selector) = SelectorExpr::cast(callee.clone()) {
            let name = selector.member()?;
            let reference = selector.qualifier_name().map(|qualifier| {
                self.cache
                    .resolve(
                        &qualifier,
                        self.unit.path(),
                        start_of(selector.syntax()),
                        self.resolver,
                    )
                    .unwrap_or_else(|| qualifier.to_string())
            });
            (name, reference)
        } else if let Some(name_expr) = NameExpr::cast(callee) {
            (name_expr.name(), None)
        } else {
            // calls through func literals, conversions etc. carry no usable
            // name; let the walk descend into them instead
            return None;
        };

        let mut arguments = Vec::new();
        for arg in call.args() {
            if let Some(name_expr) = NameExpr::cast(arg.clone()) {
                arguments.push(Expr::Variable {
                    name: name_expr.name(),
                    reference: None,
                    offset: start_of(&arg),
                    scope: self.scope.clone(),
                });
            } else if let Some(expr) = self.build_node(&arg, depth + 1) {
                arguments.push(expr);
            }
        }

        Some(Expr::Func {
            name,
            reference,
            arguments,
            offset: start_of(call.syntax()),
            scope: self.scope.clone(),
        })
    }

    /// Pattern 4: named composite literal.
    fn build_construct(&mut self, lit: &CompositeLit) -> Option<Expr> {
        let struct_name = lit.type_name()?;

        let mut arguments = Vec::new();
        let mut kvargs = indexmap::IndexMap::new();
        for element in lit.elements() {
            if let Some(keyed) = KeyedElement::cast(element.clone()) {
                // keyed elements are kept only when key and value are both
                // bare identifiers
                let key = keyed.key().and_then(NameExpr::cast);
                let value = keyed.value().and_then(NameExpr::cast);
                if let (Some(key), Some(value)) = (key, value) {
                    kvargs.insert(key.name(), value.name());
                }
            } else if let Some(literal) = Literal::cast(element) {
                arguments.push(literal.text());
            }
        }

        Some(Expr::ConstructStruct {
            struct_name,
            arguments,
            kvargs,
            offset: start_of(lit.syntax()),
            scope: self.scope.clone(),
        })
    }

    /// Pattern 5: literal constant in a non-empty scope.
    fn build_value(&mut self, lit: &Literal) -> Option<Expr> {
        let token = lit.token()?;
        let type_of = match token.kind() {
            SyntaxKind::INT => LitKind::Int,
            SyntaxKind::FLOAT => LitKind::Float,
            SyntaxKind::IMAG => LitKind::Imag,
            SyntaxKind::CHAR => LitKind::Char,
            SyntaxKind::STRING => LitKind::String,
            _ => return None,
        };

        Some(Expr::Value {
            type_of,
            value: token.text().to_string(),
            offset: start_of(lit.syntax()),
            scope: self.scope.clone(),
        })
    }
}

fn start_of(node: &SyntaxNode) -> u32 {
    node.text_range().start().into()
}
