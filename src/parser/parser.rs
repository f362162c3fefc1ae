//! Recursive descent parser for a Go source subset
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST.
//!
//! Automatic semicolon insertion is modeled directly: a statement may be
//! terminated by `;`, by a closing delimiter, or by a line break in the
//! trivia that follows it, and a line break also stops expression
//! continuation (Go's insertion rule is purely lexical). Composite literals
//! are suppressed in `if`/`for`/`switch` headers, mirroring the restriction
//! the Go grammar enforces there.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse Go source code into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    parser.parse_source_file();
    parser.finish()
}

/// Token kinds that may follow an identifier at the start of a parameter or
/// struct field when the identifier is a name rather than a bare type.
const NAME_THEN_TYPE: &[SyntaxKind] = &[
    SyntaxKind::IDENT,
    SyntaxKind::STAR,
    SyntaxKind::L_BRACKET,
    SyntaxKind::L_PAREN,
    SyntaxKind::ARROW,
    SyntaxKind::ELLIPSIS,
    SyntaxKind::MAP_KW,
    SyntaxKind::CHAN_KW,
    SyntaxKind::FUNC_KW,
    SyntaxKind::STRUCT_KW,
    SyntaxKind::INTERFACE_KW,
];

/// Whether a `{` directly after a primary expression may start a composite
/// literal. Type operands like `map[string]int` always may; a bare name only
/// when the surrounding context allows it (not in if/for/switch headers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompositeEligibility {
    Always,
    IfAllowed,
    Never,
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current_kind())
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Look ahead n non-trivia tokens (0 = current non-trivia token)
    fn nth(&self, n: usize) -> SyntaxKind {
        let mut idx = self.pos;
        let mut count = 0;
        while idx < self.tokens.len() {
            if !self.tokens[idx].kind.is_trivia() {
                if count == n {
                    return self.tokens[idx].kind;
                }
                count += 1;
            }
            idx += 1;
        }
        SyntaxKind::ERROR
    }

    /// Check whether the trivia between here and the next non-trivia token
    /// contains a line break. This is what stands in for Go's automatic
    /// semicolon insertion: a pending line break ends the statement and stops
    /// expression continuation.
    fn newline_ahead(&self) -> bool {
        let mut idx = self.pos;
        while idx < self.tokens.len() {
            let token = &self.tokens[idx];
            if !token.kind.is_trivia() {
                return false;
            }
            if token.kind == SyntaxKind::LINE_COMMENT || token.text.contains('\n') {
                return true;
            }
            idx += 1;
        }
        true
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) {
        if let Some(token) = self.current() {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn bump_any(&mut self) {
        self.bump();
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}", kind));
            false
        }
    }

    fn skip_trivia(&mut self) {
        while self.current().map(|t| t.kind.is_trivia()).unwrap_or(false) {
            self.bump();
        }
    }

    /// Statement terminator: `;`, a closing delimiter, end of file, or a
    /// line break in the pending trivia.
    fn expect_terminator(&mut self) {
        let newline = self.newline_ahead();
        self.skip_trivia();
        if self.eat(SyntaxKind::SEMICOLON) {
            return;
        }
        if newline
            || self.at_eof()
            || self.at(SyntaxKind::R_BRACE)
            || self.at(SyntaxKind::R_PAREN)
        {
            return;
        }
        self.error("expected ';' or newline");
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = self
            .current()
            .map(|t| TextRange::at(t.offset, TextSize::of(t.text)))
            .unwrap_or_else(|| TextRange::empty(TextSize::new(0)));
        self.errors.push(SyntaxError::new(message, range));
    }

    fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message);
        self.builder.start_node(SyntaxKind::ERROR.into());
        let mut consumed = false;
        while !self.at_eof() && !self.at_any(recovery) {
            self.bump_any();
            consumed = true;
        }
        // If we didn't consume anything and we're not at EOF, consume one token
        // to prevent infinite loops
        if !consumed && !self.at_eof() {
            self.bump_any();
        }
        self.builder.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.builder.checkpoint()
    }

    // =========================================================================
    // Grammar rules: file level
    // =========================================================================

    /// SourceFile = PackageClause? TopLevelDecl*
    fn parse_source_file(&mut self) {
        self.start_node(SyntaxKind::SOURCE_FILE);

        self.skip_trivia();
        if self.at(SyntaxKind::PACKAGE_KW) {
            self.parse_package_clause();
        }

        while !self.at_eof() {
            let pos_before = self.pos;
            self.skip_trivia();
            if self.at_eof() {
                break;
            }
            self.parse_top_level_decl();
            // Safety: if we didn't make progress, force-skip a token
            if self.pos == pos_before && !self.at_eof() {
                self.error(format!("stuck on token: {:?}", self.current_kind()));
                self.bump_any();
            }
        }

        self.finish_node();
    }

    /// PackageClause = 'package' Ident terminator
    fn parse_package_clause(&mut self) {
        self.start_node(SyntaxKind::PACKAGE_CLAUSE);
        self.expect(SyntaxKind::PACKAGE_KW);
        self.skip_trivia();
        self.expect(SyntaxKind::IDENT);
        self.expect_terminator();
        self.finish_node();
    }

    fn parse_top_level_decl(&mut self) {
        match self.current_kind() {
            SyntaxKind::IMPORT_KW => self.parse_import_decl(),
            SyntaxKind::CONST_KW => self.parse_value_decl(SyntaxKind::CONST_DECL, SyntaxKind::CONST_KW),
            SyntaxKind::VAR_KW => self.parse_value_decl(SyntaxKind::VAR_DECL, SyntaxKind::VAR_KW),
            SyntaxKind::TYPE_KW => self.parse_type_decl(),
            SyntaxKind::FUNC_KW => self.parse_func_decl(),
            _ => {
                self.error_recover(
                    format!("unexpected token at top level: {:?}", self.current_kind()),
                    &[
                        SyntaxKind::IMPORT_KW,
                        SyntaxKind::CONST_KW,
                        SyntaxKind::VAR_KW,
                        SyntaxKind::TYPE_KW,
                        SyntaxKind::FUNC_KW,
                    ],
                );
            }
        }
    }

    /// ImportDecl = 'import' (ImportSpec | '(' ImportSpec* ')' terminator)
    fn parse_import_decl(&mut self) {
        self.start_node(SyntaxKind::IMPORT_DECL);
        self.expect(SyntaxKind::IMPORT_KW);
        self.skip_trivia();

        if self.eat(SyntaxKind::L_PAREN) {
            self.skip_trivia();
            while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) {
                let pos_before = self.pos;
                self.parse_import_spec();
                self.skip_trivia();
                if self.pos == pos_before {
                    self.error("stuck in import group");
                    self.bump_any();
                }
            }
            self.expect(SyntaxKind::R_PAREN);
            self.expect_terminator();
        } else {
            self.parse_import_spec();
        }

        self.finish_node();
    }

    /// ImportSpec = ('.' | Ident)? String terminator
    fn parse_import_spec(&mut self) {
        self.start_node(SyntaxKind::IMPORT_SPEC);
        if self.at(SyntaxKind::IDENT) || self.at(SyntaxKind::DOT) {
            self.bump();
            self.skip_trivia();
        }
        self.expect(SyntaxKind::STRING);
        self.expect_terminator();
        self.finish_node();
    }

    /// ConstDecl / VarDecl = kw (ValueSpec | '(' ValueSpec* ')' terminator)
    fn parse_value_decl(&mut self, node: SyntaxKind, kw: SyntaxKind) {
        self.start_node(node);
        self.expect(kw);
        self.skip_trivia();

        if self.eat(SyntaxKind::L_PAREN) {
            self.skip_trivia();
            while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) {
                let pos_before = self.pos;
                self.parse_value_spec();
                self.skip_trivia();
                if self.pos == pos_before {
                    self.error("stuck in declaration group");
                    self.bump_any();
                }
            }
            self.expect(SyntaxKind::R_PAREN);
            self.expect_terminator();
        } else {
            self.parse_value_spec();
        }

        self.finish_node();
    }

    /// ValueSpec = IdentList (Type? ('=' ExprList)?)? terminator
    ///
    /// A line break directly after the identifier list ends the spec
    /// (`const ( A \n B )` is two bare specs, not `B` typing `A`).
    fn parse_value_spec(&mut self) {
        self.start_node(SyntaxKind::VALUE_SPEC);

        self.expect(SyntaxKind::IDENT);
        while self.nth(0) == SyntaxKind::COMMA {
            self.skip_trivia();
            self.bump(); // ,
            self.skip_trivia();
            if !self.eat(SyntaxKind::IDENT) {
                break;
            }
        }

        if !self.newline_ahead() {
            self.skip_trivia();
            if self.current_kind().can_start_type() && !self.at(SyntaxKind::EQ) {
                self.parse_type();
            }
            if !self.newline_ahead() {
                self.skip_trivia();
                if self.eat(SyntaxKind::EQ) {
                    self.skip_trivia();
                    self.parse_expr_list(true);
                }
            }
        }

        self.expect_terminator();
        self.finish_node();
    }

    /// TypeDecl = 'type' (TypeSpec | '(' TypeSpec* ')' terminator)
    fn parse_type_decl(&mut self) {
        self.start_node(SyntaxKind::TYPE_DECL);
        self.expect(SyntaxKind::TYPE_KW);
        self.skip_trivia();

        if self.eat(SyntaxKind::L_PAREN) {
            self.skip_trivia();
            while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) {
                let pos_before = self.pos;
                self.parse_type_spec();
                self.skip_trivia();
                if self.pos == pos_before {
                    self.error("stuck in type group");
                    self.bump_any();
                }
            }
            self.expect(SyntaxKind::R_PAREN);
            self.expect_terminator();
        } else {
            self.parse_type_spec();
        }

        self.finish_node();
    }

    /// TypeSpec = Ident TypeParams? '='? Type terminator
    fn parse_type_spec(&mut self) {
        self.start_node(SyntaxKind::TYPE_SPEC);
        self.expect(SyntaxKind::IDENT);
        self.skip_trivia();
        if self.at(SyntaxKind::L_BRACKET) {
            self.parse_type_param_list();
            self.skip_trivia();
        }
        self.eat(SyntaxKind::EQ); // type alias
        self.skip_trivia();
        self.parse_type();
        self.expect_terminator();
        self.finish_node();
    }

    /// FuncDecl = 'func' Receiver? Ident TypeParams? Params Result? Block? terminator
    fn parse_func_decl(&mut self) {
        self.start_node(SyntaxKind::FUNC_DECL);
        self.expect(SyntaxKind::FUNC_KW);
        self.skip_trivia();

        if self.at(SyntaxKind::L_PAREN) {
            self.parse_receiver();
            self.skip_trivia();
        }

        if self.at(SyntaxKind::IDENT) {
            self.bump();
        } else {
            self.error("expected function name");
        }
        self.skip_trivia();

        if self.at(SyntaxKind::L_BRACKET) {
            self.parse_type_param_list();
            self.skip_trivia();
        }

        if self.at(SyntaxKind::L_PAREN) {
            self.parse_param_list();
        } else {
            self.error("expected parameter list");
        }
        self.parse_result_opt();

        // a body must open on the same line; otherwise this is a
        // declaration without a body (e.g. an assembly stub)
        if !self.newline_ahead() {
            self.skip_trivia();
            if self.at(SyntaxKind::L_BRACE) {
                self.parse_block();
            }
        }
        self.expect_terminator();
        self.finish_node();
    }

    /// Receiver = '(' Ident? Type ')'
    fn parse_receiver(&mut self) {
        self.start_node(SyntaxKind::RECEIVER);
        self.expect(SyntaxKind::L_PAREN);
        self.skip_trivia();

        if self.at(SyntaxKind::IDENT) && self.nth(1) != SyntaxKind::R_PAREN {
            self.bump(); // receiver name
            self.skip_trivia();
        }
        self.parse_type();
        self.skip_trivia();
        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    /// TypeParams = '[' ... ']' (consumed balanced; the contents do not
    /// affect extraction)
    fn parse_type_param_list(&mut self) {
        self.start_node(SyntaxKind::TYPE_PARAM_LIST);
        let mut depth = 0usize;
        while let Some(token) = self.current() {
            let kind = token.kind;
            self.bump();
            if kind == SyntaxKind::L_BRACKET {
                depth += 1;
            } else if kind == SyntaxKind::R_BRACKET {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
        }
        self.finish_node();
    }

    /// Params = '(' (Param (',' Param)*)? ')'
    fn parse_param_list(&mut self) {
        self.start_node(SyntaxKind::PARAM_LIST);
        self.expect(SyntaxKind::L_PAREN);
        self.skip_trivia();

        while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) {
            let pos_before = self.pos;
            self.parse_param();
            self.skip_trivia();
            if self.at(SyntaxKind::COMMA) {
                self.bump();
                self.skip_trivia();
            }
            if self.pos == pos_before {
                self.error("stuck in parameter list");
                self.bump_any();
            }
        }

        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    /// Param = Ident? '...'? Type
    ///
    /// Whether a leading identifier is a parameter name or a bare type is
    /// decided from the token that follows it.
    fn parse_param(&mut self) {
        self.start_node(SyntaxKind::PARAM);

        if self.at(SyntaxKind::IDENT)
            && self.nth(1) != SyntaxKind::DOT
            && NAME_THEN_TYPE.contains(&self.nth(1))
        {
            self.bump(); // parameter name
            self.skip_trivia();
        }
        if self.at(SyntaxKind::ELLIPSIS) {
            self.bump();
            self.skip_trivia();
        }
        if !self.at(SyntaxKind::R_PAREN) && !self.at(SyntaxKind::COMMA) {
            self.parse_type();
        }

        self.finish_node();
    }

    /// Result = Params | Type, but only on the same line as the signature
    fn parse_result_opt(&mut self) {
        if self.newline_ahead() {
            return;
        }
        self.skip_trivia();
        if self.at(SyntaxKind::L_PAREN) {
            self.parse_param_list();
        } else if self.current_kind().can_start_type() {
            self.parse_type();
        }
    }

    // =========================================================================
    // Grammar rules: statements
    // =========================================================================

    /// Block = '{' Statement* '}'
    fn parse_block(&mut self) {
        self.start_node(SyntaxKind::BLOCK);
        self.expect(SyntaxKind::L_BRACE);
        self.skip_trivia();

        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            let pos_before = self.pos;
            self.parse_stmt();
            self.skip_trivia();
            if self.pos == pos_before && !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
                self.error(format!("stuck on token: {:?}", self.current_kind()));
                self.bump_any();
            }
        }

        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    fn parse_stmt(&mut self) {
        match self.current_kind() {
            SyntaxKind::CONST_KW => self.parse_value_decl(SyntaxKind::CONST_DECL, SyntaxKind::CONST_KW),
            SyntaxKind::VAR_KW => self.parse_value_decl(SyntaxKind::VAR_DECL, SyntaxKind::VAR_KW),
            SyntaxKind::TYPE_KW => self.parse_type_decl(),
            SyntaxKind::RETURN_KW => self.parse_return_stmt(),
            SyntaxKind::IF_KW => self.parse_if_stmt(),
            SyntaxKind::FOR_KW => self.parse_for_stmt(),
            SyntaxKind::SWITCH_KW => self.parse_switch_stmt(),
            SyntaxKind::SELECT_KW => self.parse_select_stmt(),
            SyntaxKind::GO_KW => self.parse_unary_keyword_stmt(SyntaxKind::GO_STMT, SyntaxKind::GO_KW),
            SyntaxKind::DEFER_KW => {
                self.parse_unary_keyword_stmt(SyntaxKind::DEFER_STMT, SyntaxKind::DEFER_KW)
            }
            SyntaxKind::BREAK_KW
            | SyntaxKind::CONTINUE_KW
            | SyntaxKind::GOTO_KW
            | SyntaxKind::FALLTHROUGH_KW => self.parse_branch_stmt(),
            SyntaxKind::L_BRACE => self.parse_block(),
            SyntaxKind::SEMICOLON => {
                self.start_node(SyntaxKind::EMPTY_STMT);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::IDENT if self.nth(1) == SyntaxKind::COLON => self.parse_labeled_stmt(),
            _ => {
                self.parse_simple_stmt(true, false);
                self.expect_terminator();
            }
        }
    }

    /// ReturnStmt = 'return' ExprList? terminator
    fn parse_return_stmt(&mut self) {
        self.start_node(SyntaxKind::RETURN_STMT);
        self.expect(SyntaxKind::RETURN_KW);

        if !self.newline_ahead() {
            self.skip_trivia();
            if !self.at(SyntaxKind::SEMICOLON) && !self.at(SyntaxKind::R_BRACE) && !self.at_eof() {
                self.parse_expr_list(true);
            }
        }

        self.expect_terminator();
        self.finish_node();
    }

    /// GoStmt / DeferStmt = kw Expr terminator
    fn parse_unary_keyword_stmt(&mut self, node: SyntaxKind, kw: SyntaxKind) {
        self.start_node(node);
        self.expect(kw);
        self.skip_trivia();
        self.parse_expr(true);
        self.expect_terminator();
        self.finish_node();
    }

    /// BranchStmt = ('break' | 'continue' | 'goto' | 'fallthrough') Label? terminator
    fn parse_branch_stmt(&mut self) {
        self.start_node(SyntaxKind::BRANCH_STMT);
        self.bump();
        if !self.newline_ahead() {
            self.skip_trivia();
            if self.at(SyntaxKind::IDENT) {
                self.bump();
            }
        }
        self.expect_terminator();
        self.finish_node();
    }

    /// LabeledStmt = Ident ':' Statement
    fn parse_labeled_stmt(&mut self) {
        self.start_node(SyntaxKind::LABELED_STMT);
        self.expect(SyntaxKind::IDENT);
        self.skip_trivia();
        self.expect(SyntaxKind::COLON);
        self.skip_trivia();
        if !self.at(SyntaxKind::R_BRACE) && !self.at_eof() {
            self.parse_stmt();
        }
        self.finish_node();
    }

    /// IfStmt = 'if' (SimpleStmt ';')? Expr Block ('else' (IfStmt | Block))?
    fn parse_if_stmt(&mut self) {
        self.start_node(SyntaxKind::IF_STMT);
        self.expect(SyntaxKind::IF_KW);
        self.skip_trivia();

        self.parse_simple_stmt(false, false);
        self.skip_trivia();
        if self.eat(SyntaxKind::SEMICOLON) {
            self.skip_trivia();
            self.parse_expr(false);
            self.skip_trivia();
        }

        if self.at(SyntaxKind::L_BRACE) {
            self.parse_block();
        } else {
            self.error("expected '{' after if condition");
        }

        // `else` binds only on the same line as the closing brace
        if !self.newline_ahead() {
            self.skip_trivia();
            if self.eat(SyntaxKind::ELSE_KW) {
                self.skip_trivia();
                if self.at(SyntaxKind::IF_KW) {
                    self.parse_if_stmt();
                } else if self.at(SyntaxKind::L_BRACE) {
                    self.parse_block();
                } else {
                    self.error("expected 'if' or '{' after else");
                }
            }
        }

        self.finish_node();
    }

    /// ForStmt = 'for' Header? Block
    ///
    /// The header may be empty, a condition, an init;cond;post clause, or a
    /// range clause.
    fn parse_for_stmt(&mut self) {
        self.start_node(SyntaxKind::FOR_STMT);
        self.expect(SyntaxKind::FOR_KW);
        self.skip_trivia();

        if self.at(SyntaxKind::RANGE_KW) {
            // `for range ch {}`
            self.start_node(SyntaxKind::RANGE_CLAUSE);
            self.bump();
            self.skip_trivia();
            self.parse_expr(false);
            self.finish_node();
            self.skip_trivia();
        } else if !self.at(SyntaxKind::L_BRACE) {
            self.parse_simple_stmt(false, true);
            self.skip_trivia();
            if self.eat(SyntaxKind::SEMICOLON) {
                self.skip_trivia();
                if !self.at(SyntaxKind::SEMICOLON) {
                    self.parse_expr(false);
                    self.skip_trivia();
                }
                self.expect(SyntaxKind::SEMICOLON);
                self.skip_trivia();
                if !self.at(SyntaxKind::L_BRACE) {
                    self.parse_simple_stmt(false, false);
                    self.skip_trivia();
                }
            }
        }

        if self.at(SyntaxKind::L_BRACE) {
            self.parse_block();
        } else {
            self.error("expected '{' after for header");
        }
        self.finish_node();
    }

    /// SwitchStmt = 'switch' (SimpleStmt ';')? SimpleStmt? '{' CaseClause* '}'
    fn parse_switch_stmt(&mut self) {
        self.start_node(SyntaxKind::SWITCH_STMT);
        self.expect(SyntaxKind::SWITCH_KW);
        self.skip_trivia();

        if !self.at(SyntaxKind::L_BRACE) {
            self.parse_simple_stmt(false, false);
            self.skip_trivia();
            if self.eat(SyntaxKind::SEMICOLON) {
                self.skip_trivia();
                if !self.at(SyntaxKind::L_BRACE) {
                    self.parse_simple_stmt(false, false);
                    self.skip_trivia();
                }
            }
        }

        self.parse_case_clauses(SyntaxKind::CASE_CLAUSE);
        self.finish_node();
    }

    /// SelectStmt = 'select' '{' CommClause* '}'
    fn parse_select_stmt(&mut self) {
        self.start_node(SyntaxKind::SELECT_STMT);
        self.expect(SyntaxKind::SELECT_KW);
        self.skip_trivia();
        self.parse_case_clauses(SyntaxKind::COMM_CLAUSE);
        self.finish_node();
    }

    fn parse_case_clauses(&mut self, clause_kind: SyntaxKind) {
        self.expect(SyntaxKind::L_BRACE);
        self.skip_trivia();

        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            let pos_before = self.pos;
            match self.current_kind() {
                SyntaxKind::CASE_KW => {
                    self.start_node(clause_kind);
                    self.bump();
                    self.skip_trivia();
                    if clause_kind == SyntaxKind::COMM_CLAUSE {
                        self.parse_simple_stmt(true, false);
                    } else {
                        self.parse_expr_list(true);
                    }
                    self.skip_trivia();
                    self.expect(SyntaxKind::COLON);
                    self.parse_clause_body();
                    self.finish_node();
                }
                SyntaxKind::DEFAULT_KW => {
                    self.start_node(clause_kind);
                    self.bump();
                    self.skip_trivia();
                    self.expect(SyntaxKind::COLON);
                    self.parse_clause_body();
                    self.finish_node();
                }
                _ => {
                    self.error_recover(
                        "expected 'case' or 'default'",
                        &[SyntaxKind::CASE_KW, SyntaxKind::DEFAULT_KW, SyntaxKind::R_BRACE],
                    );
                }
            }
            self.skip_trivia();
            if self.pos == pos_before && !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
                self.bump_any();
            }
        }

        self.expect(SyntaxKind::R_BRACE);
    }

    fn parse_clause_body(&mut self) {
        self.skip_trivia();
        while !self.at_eof()
            && !self.at(SyntaxKind::R_BRACE)
            && !self.at(SyntaxKind::CASE_KW)
            && !self.at(SyntaxKind::DEFAULT_KW)
        {
            let pos_before = self.pos;
            self.parse_stmt();
            self.skip_trivia();
            if self.pos == pos_before {
                break;
            }
        }
    }

    /// SimpleStmt = ExprList (assign-op ExprList | '<-' Expr | '++' | '--')?
    ///
    /// The statement node is decided retroactively once the token after the
    /// first expression list is known.
    fn parse_simple_stmt(&mut self, composite_ok: bool, allow_range: bool) {
        self.skip_trivia();
        let cp = self.checkpoint();

        self.parse_expr_list(composite_ok);

        if self.newline_ahead() {
            self.start_node_at(cp, SyntaxKind::EXPR_STMT);
            self.finish_node();
            return;
        }
        self.skip_trivia();

        if self.current_kind().is_assign_op() {
            self.start_node_at(cp, SyntaxKind::ASSIGN_STMT);
            self.bump();
            self.skip_trivia();
            if allow_range && self.at(SyntaxKind::RANGE_KW) {
                self.start_node(SyntaxKind::RANGE_CLAUSE);
                self.bump();
                self.skip_trivia();
                self.parse_expr(composite_ok);
                self.finish_node();
            } else {
                self.parse_expr_list(composite_ok);
            }
            self.finish_node();
        } else if self.at(SyntaxKind::ARROW) {
            self.start_node_at(cp, SyntaxKind::SEND_STMT);
            self.bump();
            self.skip_trivia();
            self.parse_expr(composite_ok);
            self.finish_node();
        } else if self.at(SyntaxKind::PLUS_PLUS) || self.at(SyntaxKind::MINUS_MINUS) {
            self.start_node_at(cp, SyntaxKind::INC_DEC_STMT);
            self.bump();
            self.finish_node();
        } else {
            self.start_node_at(cp, SyntaxKind::EXPR_STMT);
            self.finish_node();
        }
    }

    // =========================================================================
    // Grammar rules: expressions
    // =========================================================================

    /// ExprList = Expr (',' Expr)*, continued only on the same line (or with
    /// the comma at the end of a line)
    fn parse_expr_list(&mut self, composite_ok: bool) {
        self.parse_expr(composite_ok);
        loop {
            if self.newline_ahead() {
                break;
            }
            self.skip_trivia();
            if self.at(SyntaxKind::COMMA) {
                self.bump();
                self.skip_trivia();
                self.parse_expr(composite_ok);
            } else {
                break;
            }
        }
    }

    fn parse_expr(&mut self, composite_ok: bool) {
        self.parse_binary_expr(composite_ok, 1);
    }

    /// Binary operator precedence, Go's five levels
    fn binary_prec(kind: SyntaxKind) -> u8 {
        match kind {
            SyntaxKind::PIPE_PIPE => 1,
            SyntaxKind::AMP_AMP => 2,
            SyntaxKind::EQ_EQ
            | SyntaxKind::BANG_EQ
            | SyntaxKind::LT
            | SyntaxKind::LT_EQ
            | SyntaxKind::GT
            | SyntaxKind::GT_EQ => 3,
            SyntaxKind::PLUS | SyntaxKind::MINUS | SyntaxKind::PIPE | SyntaxKind::CARET => 4,
            SyntaxKind::STAR
            | SyntaxKind::SLASH
            | SyntaxKind::PERCENT
            | SyntaxKind::SHL
            | SyntaxKind::SHR
            | SyntaxKind::AMP
            | SyntaxKind::AMP_CARET => 5,
            _ => 0,
        }
    }

    fn parse_binary_expr(&mut self, composite_ok: bool, min_prec: u8) {
        self.skip_trivia();
        let cp = self.checkpoint();
        self.parse_unary_expr(composite_ok);

        loop {
            // a pending line break ends the expression (lexical semicolon)
            if self.newline_ahead() {
                break;
            }
            let prec = Self::binary_prec(self.nth(0));
            if prec == 0 || prec < min_prec {
                break;
            }
            self.start_node_at(cp, SyntaxKind::BINARY_EXPR);
            self.skip_trivia();
            self.bump(); // operator
            self.skip_trivia();
            self.parse_binary_expr(composite_ok, prec + 1);
            self.finish_node();
        }
    }

    fn parse_unary_expr(&mut self, composite_ok: bool) {
        self.skip_trivia();
        match self.current_kind() {
            SyntaxKind::PLUS
            | SyntaxKind::MINUS
            | SyntaxKind::BANG
            | SyntaxKind::CARET
            | SyntaxKind::STAR
            | SyntaxKind::AMP
            | SyntaxKind::ARROW => {
                self.start_node(SyntaxKind::UNARY_EXPR);
                self.bump();
                self.skip_trivia();
                self.parse_unary_expr(composite_ok);
                self.finish_node();
            }
            _ => self.parse_primary_expr(composite_ok),
        }
    }

    /// PrimaryExpr = Operand Suffix*
    fn parse_primary_expr(&mut self, composite_ok: bool) {
        self.skip_trivia();
        let cp = self.checkpoint();
        let mut can_lit = self.parse_operand();

        loop {
            // suffixes may not start on a new line
            if self.newline_ahead() {
                break;
            }
            match self.nth(0) {
                SyntaxKind::DOT => {
                    if self.nth(1) == SyntaxKind::L_PAREN {
                        // type assertion x.(T) or type switch guard x.(type)
                        self.start_node_at(cp, SyntaxKind::TYPE_ASSERT_EXPR);
                        self.skip_trivia();
                        self.bump(); // .
                        self.skip_trivia();
                        self.bump(); // (
                        self.skip_trivia();
                        if !self.eat(SyntaxKind::TYPE_KW) {
                            self.parse_type();
                        }
                        self.skip_trivia();
                        self.expect(SyntaxKind::R_PAREN);
                        self.finish_node();
                        can_lit = CompositeEligibility::Never;
                    } else {
                        self.start_node_at(cp, SyntaxKind::SELECTOR_EXPR);
                        self.skip_trivia();
                        self.bump(); // .
                        self.skip_trivia();
                        if !self.eat(SyntaxKind::IDENT) {
                            self.error("expected field or method name after '.'");
                        }
                        self.finish_node();
                        can_lit = CompositeEligibility::IfAllowed;
                    }
                }
                SyntaxKind::L_PAREN => {
                    self.start_node_at(cp, SyntaxKind::CALL_EXPR);
                    self.skip_trivia();
                    self.parse_arg_list();
                    self.finish_node();
                    can_lit = CompositeEligibility::Never;
                }
                SyntaxKind::L_BRACKET => {
                    self.start_node_at(cp, SyntaxKind::INDEX_EXPR);
                    self.skip_trivia();
                    self.bump(); // [
                    self.skip_trivia();
                    if !self.at(SyntaxKind::R_BRACKET) {
                        if !self.at(SyntaxKind::COLON) {
                            self.parse_expr(true);
                            self.skip_trivia();
                        }
                        // slice bounds and generic argument lists
                        while self.at(SyntaxKind::COLON) || self.at(SyntaxKind::COMMA) {
                            self.bump();
                            self.skip_trivia();
                            if !self.at(SyntaxKind::R_BRACKET)
                                && !self.at(SyntaxKind::COLON)
                                && !self.at(SyntaxKind::COMMA)
                            {
                                self.parse_expr(true);
                                self.skip_trivia();
                            }
                        }
                    }
                    self.expect(SyntaxKind::R_BRACKET);
                    self.finish_node();
                    can_lit = CompositeEligibility::IfAllowed;
                }
                SyntaxKind::L_BRACE => {
                    let allowed = match can_lit {
                        CompositeEligibility::Always => true,
                        CompositeEligibility::IfAllowed => composite_ok,
                        CompositeEligibility::Never => false,
                    };
                    if !allowed {
                        break;
                    }
                    self.start_node_at(cp, SyntaxKind::COMPOSITE_LIT);
                    self.skip_trivia();
                    self.parse_literal_value();
                    self.finish_node();
                    can_lit = CompositeEligibility::Never;
                }
                _ => break,
            }
        }
    }

    /// Operand = Literal | Ident | '(' Expr ')' | FuncLit | TypeOperand
    ///
    /// Returns whether a `{` directly after this operand may begin a
    /// composite literal.
    fn parse_operand(&mut self) -> CompositeEligibility {
        match self.current_kind() {
            SyntaxKind::INT
            | SyntaxKind::FLOAT
            | SyntaxKind::IMAG
            | SyntaxKind::CHAR
            | SyntaxKind::STRING => {
                self.start_node(SyntaxKind::LITERAL);
                self.bump();
                self.finish_node();
                CompositeEligibility::Never
            }
            SyntaxKind::IDENT => {
                self.start_node(SyntaxKind::NAME_EXPR);
                self.bump();
                self.finish_node();
                CompositeEligibility::IfAllowed
            }
            SyntaxKind::L_PAREN => {
                self.start_node(SyntaxKind::PAREN_EXPR);
                self.bump();
                self.skip_trivia();
                self.parse_expr(true);
                self.skip_trivia();
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
                CompositeEligibility::Never
            }
            SyntaxKind::FUNC_KW => {
                self.start_node(SyntaxKind::FUNC_LIT);
                self.bump();
                self.skip_trivia();
                if self.at(SyntaxKind::L_PAREN) {
                    self.parse_param_list();
                }
                self.parse_result_opt();
                if !self.newline_ahead() {
                    self.skip_trivia();
                    if self.at(SyntaxKind::L_BRACE) {
                        self.parse_block();
                    }
                }
                self.finish_node();
                CompositeEligibility::Never
            }
            SyntaxKind::L_BRACKET
            | SyntaxKind::MAP_KW
            | SyntaxKind::CHAN_KW
            | SyntaxKind::STRUCT_KW
            | SyntaxKind::INTERFACE_KW => {
                // a type operand: conversion `[]byte(s)` or literal `map[...]{...}`
                self.parse_type();
                CompositeEligibility::Always
            }
            _ => {
                self.error(format!("expected expression, found {:?}", self.current_kind()));
                CompositeEligibility::Never
            }
        }
    }

    /// ArgList = '(' (Expr (',' Expr)* '...'? ','?)? ')'
    fn parse_arg_list(&mut self) {
        self.start_node(SyntaxKind::ARG_LIST);
        self.expect(SyntaxKind::L_PAREN);
        self.skip_trivia();

        while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) {
            let pos_before = self.pos;
            self.parse_expr(true);
            self.skip_trivia();
            if self.at(SyntaxKind::ELLIPSIS) {
                self.bump();
                self.skip_trivia();
            }
            if self.at(SyntaxKind::COMMA) {
                self.bump();
                self.skip_trivia();
            } else {
                break;
            }
            if self.pos == pos_before {
                self.bump_any();
            }
        }

        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    /// LiteralValue = '{' (Element (',' Element)* ','?)? '}'
    fn parse_literal_value(&mut self) {
        self.start_node(SyntaxKind::LITERAL_VALUE);
        self.expect(SyntaxKind::L_BRACE);
        self.skip_trivia();

        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            let pos_before = self.pos;
            let cp = self.checkpoint();

            if self.at(SyntaxKind::L_BRACE) {
                self.parse_literal_value();
            } else {
                self.parse_expr(true);
            }
            self.skip_trivia();

            if self.at(SyntaxKind::COLON) {
                self.start_node_at(cp, SyntaxKind::KEYED_ELEMENT);
                self.bump(); // :
                self.skip_trivia();
                if self.at(SyntaxKind::L_BRACE) {
                    self.parse_literal_value();
                } else {
                    self.parse_expr(true);
                }
                self.finish_node();
                self.skip_trivia();
            }

            if self.at(SyntaxKind::COMMA) {
                self.bump();
                self.skip_trivia();
            } else if !self.at(SyntaxKind::R_BRACE) {
                self.error("expected ',' or '}' in composite literal");
            }
            if self.pos == pos_before && !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
                self.bump_any();
            }
        }

        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    // =========================================================================
    // Grammar rules: types
    // =========================================================================

    fn parse_type(&mut self) {
        self.skip_trivia();
        let cp = self.checkpoint();
        match self.current_kind() {
            SyntaxKind::IDENT => {
                self.start_node(SyntaxKind::NAME_EXPR);
                self.bump();
                self.finish_node();
                if self.nth(0) == SyntaxKind::DOT && self.nth(1) == SyntaxKind::IDENT {
                    self.start_node_at(cp, SyntaxKind::SELECTOR_EXPR);
                    self.skip_trivia();
                    self.bump(); // .
                    self.skip_trivia();
                    self.bump(); // ident
                    self.finish_node();
                }
                if !self.newline_ahead() && self.nth(0) == SyntaxKind::L_BRACKET {
                    // generic instantiation `List[T]`
                    self.start_node_at(cp, SyntaxKind::INDEX_EXPR);
                    self.skip_trivia();
                    self.bump(); // [
                    self.skip_trivia();
                    while !self.at_eof() && !self.at(SyntaxKind::R_BRACKET) {
                        let pos_before = self.pos;
                        self.parse_type();
                        self.skip_trivia();
                        if self.at(SyntaxKind::COMMA) {
                            self.bump();
                            self.skip_trivia();
                        }
                        if self.pos == pos_before {
                            self.bump_any();
                        }
                    }
                    self.expect(SyntaxKind::R_BRACKET);
                    self.finish_node();
                }
            }
            SyntaxKind::STAR => {
                self.start_node(SyntaxKind::POINTER_TYPE);
                self.bump();
                self.skip_trivia();
                self.parse_type();
                self.finish_node();
            }
            SyntaxKind::L_BRACKET => {
                self.start_node(SyntaxKind::ARRAY_TYPE);
                self.bump();
                self.skip_trivia();
                if self.at(SyntaxKind::ELLIPSIS) {
                    self.bump();
                } else if !self.at(SyntaxKind::R_BRACKET) {
                    self.parse_expr(true);
                }
                self.skip_trivia();
                self.expect(SyntaxKind::R_BRACKET);
                self.skip_trivia();
                self.parse_type();
                self.finish_node();
            }
            SyntaxKind::MAP_KW => {
                self.start_node(SyntaxKind::MAP_TYPE);
                self.bump();
                self.skip_trivia();
                self.expect(SyntaxKind::L_BRACKET);
                self.skip_trivia();
                self.parse_type();
                self.skip_trivia();
                self.expect(SyntaxKind::R_BRACKET);
                self.skip_trivia();
                self.parse_type();
                self.finish_node();
            }
            SyntaxKind::CHAN_KW => {
                self.start_node(SyntaxKind::CHAN_TYPE);
                self.bump();
                self.skip_trivia();
                self.eat(SyntaxKind::ARROW);
                self.skip_trivia();
                self.parse_type();
                self.finish_node();
            }
            SyntaxKind::ARROW => {
                self.start_node(SyntaxKind::CHAN_TYPE);
                self.bump();
                self.skip_trivia();
                self.expect(SyntaxKind::CHAN_KW);
                self.skip_trivia();
                self.parse_type();
                self.finish_node();
            }
            SyntaxKind::FUNC_KW => {
                self.start_node(SyntaxKind::FUNC_TYPE);
                self.bump();
                self.skip_trivia();
                if self.at(SyntaxKind::L_PAREN) {
                    self.parse_param_list();
                }
                self.parse_result_opt();
                self.finish_node();
            }
            SyntaxKind::STRUCT_KW => {
                self.start_node(SyntaxKind::STRUCT_TYPE);
                self.bump();
                self.skip_trivia();
                self.expect(SyntaxKind::L_BRACE);
                self.skip_trivia();
                while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
                    let pos_before = self.pos;
                    self.parse_struct_field();
                    self.skip_trivia();
                    if self.pos == pos_before {
                        self.bump_any();
                    }
                }
                self.expect(SyntaxKind::R_BRACE);
                self.finish_node();
            }
            SyntaxKind::INTERFACE_KW => {
                self.start_node(SyntaxKind::INTERFACE_TYPE);
                self.bump();
                self.skip_trivia();
                self.expect(SyntaxKind::L_BRACE);
                self.skip_trivia();
                while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
                    let pos_before = self.pos;
                    self.parse_method_spec();
                    self.skip_trivia();
                    if self.pos == pos_before {
                        self.bump_any();
                    }
                }
                self.expect(SyntaxKind::R_BRACE);
                self.finish_node();
            }
            SyntaxKind::L_PAREN => {
                self.start_node(SyntaxKind::PAREN_EXPR);
                self.bump();
                self.skip_trivia();
                self.parse_type();
                self.skip_trivia();
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
            }
            _ => {
                self.error(format!("expected type, found {:?}", self.current_kind()));
            }
        }
    }

    /// Field = IdentList Type Tag? | EmbeddedType Tag?
    fn parse_struct_field(&mut self) {
        self.start_node(SyntaxKind::FIELD);

        if self.at(SyntaxKind::IDENT)
            && !self.newline_after_current()
            && self.nth(1) != SyntaxKind::DOT
            && NAME_THEN_TYPE.contains(&self.nth(1))
        {
            self.bump(); // field name
            self.skip_trivia();
            while self.at(SyntaxKind::COMMA) {
                self.bump();
                self.skip_trivia();
                if !self.eat(SyntaxKind::IDENT) {
                    break;
                }
                self.skip_trivia();
            }
            self.parse_type();
        } else {
            // embedded field: T, pkg.T, *T
            self.parse_type();
        }

        if !self.newline_ahead() {
            self.skip_trivia();
            if self.at(SyntaxKind::STRING) {
                self.bump(); // struct tag
            }
        }
        self.expect_terminator();
        self.finish_node();
    }

    /// Check whether a line break separates the current token from the next
    /// non-trivia token.
    fn newline_after_current(&self) -> bool {
        let mut idx = self.pos + 1;
        while idx < self.tokens.len() {
            let token = &self.tokens[idx];
            if !token.kind.is_trivia() {
                return false;
            }
            if token.kind == SyntaxKind::LINE_COMMENT || token.text.contains('\n') {
                return true;
            }
            idx += 1;
        }
        true
    }

    /// MethodSpec = Ident Params Result? | TypeTerm ('|' TypeTerm)*
    fn parse_method_spec(&mut self) {
        self.start_node(SyntaxKind::METHOD_SPEC);

        if self.at(SyntaxKind::IDENT) && self.nth(1) == SyntaxKind::L_PAREN {
            self.bump(); // method name
            self.skip_trivia();
            self.parse_param_list();
            self.parse_result_opt();
        } else {
            // embedded interface or type union term
            loop {
                if self.at(SyntaxKind::TILDE) {
                    self.bump();
                    self.skip_trivia();
                }
                self.parse_type();
                if self.newline_ahead() {
                    break;
                }
                self.skip_trivia();
                if self.at(SyntaxKind::PIPE) {
                    self.bump();
                    self.skip_trivia();
                } else {
                    break;
                }
            }
        }

        self.expect_terminator();
        self.finish_node();
    }
}
