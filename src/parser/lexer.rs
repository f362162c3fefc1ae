//! Logos-based lexer for Go source
//!
//! Fast tokenization using the logos crate. Trivia (whitespace, comments) is
//! kept so the parser can build a lossless CST and model Go's automatic
//! semicolon insertion from the newlines it sees.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/")]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"0[xX][0-9a-fA-F_]+|0[oO][0-7_]+|0[bB][01_]+|[0-9][0-9_]*")]
    Int,

    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?|\.[0-9][0-9_]*([eE][+-]?[0-9]+)?|[0-9][0-9_]*[eE][+-]?[0-9]+")]
    Float,

    #[regex(r"([0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9]+)?|\.[0-9][0-9_]*([eE][+-]?[0-9]+)?)i")]
    Imag,

    #[regex(r"'([^'\\\n]|\\[^\n])*'")]
    Char,

    #[regex(r#""([^"\\\n]|\\[^\n])*"|`[^`]*`"#)]
    String,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (must come before single-char)
    // =========================================================================
    #[token("...")]
    Ellipsis,

    #[token("<<=")]
    ShlEq,

    #[token(">>=")]
    ShrEq,

    #[token("&^=")]
    AmpCaretEq,

    #[token("<<")]
    Shl,

    #[token(">>")]
    Shr,

    #[token("&^")]
    AmpCaret,

    #[token("&&")]
    AmpAmp,

    #[token("||")]
    PipePipe,

    #[token("<-")]
    Arrow,

    #[token("++")]
    PlusPlus,

    #[token("--")]
    MinusMinus,

    #[token("==")]
    EqEq,

    #[token("!=")]
    BangEq,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token(":=")]
    ColonEq,

    #[token("+=")]
    PlusEq,

    #[token("-=")]
    MinusEq,

    #[token("*=")]
    StarEq,

    #[token("/=")]
    SlashEq,

    #[token("%=")]
    PercentEq,

    #[token("&=")]
    AmpEq,

    #[token("|=")]
    PipeEq,

    #[token("^=")]
    CaretEq,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("=")]
    Eq,
    #[token("!")]
    Bang,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("break")]
    BreakKw,
    #[token("case")]
    CaseKw,
    #[token("chan")]
    ChanKw,
    #[token("const")]
    ConstKw,
    #[token("continue")]
    ContinueKw,
    #[token("default")]
    DefaultKw,
    #[token("defer")]
    DeferKw,
    #[token("else")]
    ElseKw,
    #[token("fallthrough")]
    FallthroughKw,
    #[token("for")]
    ForKw,
    #[token("func")]
    FuncKw,
    #[token("go")]
    GoKw,
    #[token("goto")]
    GotoKw,
    #[token("if")]
    IfKw,
    #[token("import")]
    ImportKw,
    #[token("interface")]
    InterfaceKw,
    #[token("map")]
    MapKw,
    #[token("package")]
    PackageKw,
    #[token("range")]
    RangeKw,
    #[token("return")]
    ReturnKw,
    #[token("select")]
    SelectKw,
    #[token("struct")]
    StructKw,
    #[token("switch")]
    SwitchKw,
    #[token("type")]
    TypeKw,
    #[token("var")]
    VarKw,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            // Trivia
            Whitespace => SyntaxKind::WHITESPACE,
            LineComment => SyntaxKind::LINE_COMMENT,
            BlockComment => SyntaxKind::BLOCK_COMMENT,

            // Literals
            Ident => SyntaxKind::IDENT,
            Int => SyntaxKind::INT,
            Float => SyntaxKind::FLOAT,
            Imag => SyntaxKind::IMAG,
            Char => SyntaxKind::CHAR,
            String => SyntaxKind::STRING,

            // Multi-char punctuation
            Ellipsis => SyntaxKind::ELLIPSIS,
            ShlEq => SyntaxKind::SHL_EQ,
            ShrEq => SyntaxKind::SHR_EQ,
            AmpCaretEq => SyntaxKind::AMP_CARET_EQ,
            Shl => SyntaxKind::SHL,
            Shr => SyntaxKind::SHR,
            AmpCaret => SyntaxKind::AMP_CARET,
            AmpAmp => SyntaxKind::AMP_AMP,
            PipePipe => SyntaxKind::PIPE_PIPE,
            Arrow => SyntaxKind::ARROW,
            PlusPlus => SyntaxKind::PLUS_PLUS,
            MinusMinus => SyntaxKind::MINUS_MINUS,
            EqEq => SyntaxKind::EQ_EQ,
            BangEq => SyntaxKind::BANG_EQ,
            LtEq => SyntaxKind::LT_EQ,
            GtEq => SyntaxKind::GT_EQ,
            ColonEq => SyntaxKind::COLON_EQ,
            PlusEq => SyntaxKind::PLUS_EQ,
            MinusEq => SyntaxKind::MINUS_EQ,
            StarEq => SyntaxKind::STAR_EQ,
            SlashEq => SyntaxKind::SLASH_EQ,
            PercentEq => SyntaxKind::PERCENT_EQ,
            AmpEq => SyntaxKind::AMP_EQ,
            PipeEq => SyntaxKind::PIPE_EQ,
            CaretEq => SyntaxKind::CARET_EQ,

            // Single-char punctuation
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            Comma => SyntaxKind::COMMA,
            Semicolon => SyntaxKind::SEMICOLON,
            Colon => SyntaxKind::COLON,
            Dot => SyntaxKind::DOT,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Star => SyntaxKind::STAR,
            Slash => SyntaxKind::SLASH,
            Percent => SyntaxKind::PERCENT,
            Amp => SyntaxKind::AMP,
            Pipe => SyntaxKind::PIPE,
            Caret => SyntaxKind::CARET,
            Tilde => SyntaxKind::TILDE,
            Eq => SyntaxKind::EQ,
            Bang => SyntaxKind::BANG,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,

            // Keywords
            BreakKw => SyntaxKind::BREAK_KW,
            CaseKw => SyntaxKind::CASE_KW,
            ChanKw => SyntaxKind::CHAN_KW,
            ConstKw => SyntaxKind::CONST_KW,
            ContinueKw => SyntaxKind::CONTINUE_KW,
            DefaultKw => SyntaxKind::DEFAULT_KW,
            DeferKw => SyntaxKind::DEFER_KW,
            ElseKw => SyntaxKind::ELSE_KW,
            FallthroughKw => SyntaxKind::FALLTHROUGH_KW,
            ForKw => SyntaxKind::FOR_KW,
            FuncKw => SyntaxKind::FUNC_KW,
            GoKw => SyntaxKind::GO_KW,
            GotoKw => SyntaxKind::GOTO_KW,
            IfKw => SyntaxKind::IF_KW,
            ImportKw => SyntaxKind::IMPORT_KW,
            InterfaceKw => SyntaxKind::INTERFACE_KW,
            MapKw => SyntaxKind::MAP_KW,
            PackageKw => SyntaxKind::PACKAGE_KW,
            RangeKw => SyntaxKind::RANGE_KW,
            ReturnKw => SyntaxKind::RETURN_KW,
            SelectKw => SyntaxKind::SELECT_KW,
            StructKw => SyntaxKind::STRUCT_KW,
            SwitchKw => SyntaxKind::SWITCH_KW,
            TypeKw => SyntaxKind::TYPE_KW,
            VarKw => SyntaxKind::VAR_KW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_package_clause() {
        let tokens = tokenize("package main\n");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::PACKAGE_KW,
                SyntaxKind::WHITESPACE,
                SyntaxKind::IDENT,
                SyntaxKind::WHITESPACE,
            ]
        );
    }

    #[test]
    fn test_lex_short_var_decl() {
        let tokens = tokenize("x := pkg.Get(a)");
        let kinds: Vec<_> = tokens.iter().filter(|t| !t.kind.is_trivia()).map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::COLON_EQ,
                SyntaxKind::IDENT,
                SyntaxKind::DOT,
                SyntaxKind::IDENT,
                SyntaxKind::L_PAREN,
                SyntaxKind::IDENT,
                SyntaxKind::R_PAREN,
            ]
        );
    }

    #[test]
    fn test_lex_numbers() {
        assert_eq!(tokenize("42")[0].kind, SyntaxKind::INT);
        assert_eq!(tokenize("0x2A")[0].kind, SyntaxKind::INT);
        assert_eq!(tokenize("1_000")[0].kind, SyntaxKind::INT);
        assert_eq!(tokenize("3.14")[0].kind, SyntaxKind::FLOAT);
        assert_eq!(tokenize("1e9")[0].kind, SyntaxKind::FLOAT);
        assert_eq!(tokenize("2i")[0].kind, SyntaxKind::IMAG);
    }

    #[test]
    fn test_lex_strings() {
        assert_eq!(tokenize(r#""hi\n""#)[0].kind, SyntaxKind::STRING);
        assert_eq!(tokenize("`raw\nstring`")[0].kind, SyntaxKind::STRING);
        assert_eq!(tokenize(r"'\n'")[0].kind, SyntaxKind::CHAR);
    }

    #[test]
    fn test_lex_operators_longest_match() {
        let kinds: Vec<_> = tokenize("a <<= 1").iter().filter(|t| !t.kind.is_trivia()).map(|t| t.kind).collect();
        assert_eq!(kinds, vec![SyntaxKind::IDENT, SyntaxKind::SHL_EQ, SyntaxKind::INT]);

        let kinds: Vec<_> = tokenize("ch <- v").iter().filter(|t| !t.kind.is_trivia()).map(|t| t.kind).collect();
        assert_eq!(kinds, vec![SyntaxKind::IDENT, SyntaxKind::ARROW, SyntaxKind::IDENT]);
    }

    #[test]
    fn test_lex_comments() {
        let tokens = tokenize("// line\n/* block */x");
        assert_eq!(tokens[0].kind, SyntaxKind::LINE_COMMENT);
        assert_eq!(tokens[1].kind, SyntaxKind::WHITESPACE);
        assert_eq!(tokens[2].kind, SyntaxKind::BLOCK_COMMENT);
        assert_eq!(tokens[3].kind, SyntaxKind::IDENT);
    }

    #[test]
    fn test_offsets_are_cumulative() {
        let tokens = tokenize("ab cd");
        assert_eq!(u32::from(tokens[0].offset), 0);
        assert_eq!(u32::from(tokens[1].offset), 2);
        assert_eq!(u32::from(tokens[2].offset), 3);
    }
}
