//! Syntax kinds for the rowan-based Go CST
//!
//! This enum defines all possible node and token kinds in the syntax tree.
//! Token kinds mirror the Go token set; node kinds mirror the productions of
//! the Go grammar subset the parser understands.

/// All syntax kinds (tokens and nodes) in the Go CST
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (declarations, statements, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,   // identifier
    INT,     // 42, 0x2a, 0b101, 0o17
    FLOAT,   // 3.14, 1e9
    IMAG,    // 2i
    CHAR,    // 'a'
    STRING,  // "hello" or `raw`

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_PAREN,        // (
    R_PAREN,        // )
    L_BRACKET,      // [
    R_BRACKET,      // ]
    L_BRACE,        // {
    R_BRACE,        // }
    COMMA,          // ,
    SEMICOLON,      // ;
    COLON,          // :
    DOT,            // .
    ELLIPSIS,       // ...
    PLUS,           // +
    MINUS,          // -
    STAR,           // *
    SLASH,          // /
    PERCENT,        // %
    AMP,            // &
    PIPE,           // |
    CARET,          // ^
    TILDE,          // ~
    SHL,            // <<
    SHR,            // >>
    AMP_CARET,      // &^
    PLUS_EQ,        // +=
    MINUS_EQ,       // -=
    STAR_EQ,        // *=
    SLASH_EQ,       // /=
    PERCENT_EQ,     // %=
    AMP_EQ,         // &=
    PIPE_EQ,        // |=
    CARET_EQ,       // ^=
    SHL_EQ,         // <<=
    SHR_EQ,         // >>=
    AMP_CARET_EQ,   // &^=
    AMP_AMP,        // &&
    PIPE_PIPE,      // ||
    ARROW,          // <-
    PLUS_PLUS,      // ++
    MINUS_MINUS,    // --
    EQ,             // =
    EQ_EQ,          // ==
    BANG,           // !
    BANG_EQ,        // !=
    LT,             // <
    LT_EQ,          // <=
    GT,             // >
    GT_EQ,          // >=
    COLON_EQ,       // :=

    // =========================================================================
    // KEYWORDS (the 25 Go keywords)
    // =========================================================================
    BREAK_KW,
    CASE_KW,
    CHAN_KW,
    CONST_KW,
    CONTINUE_KW,
    DEFAULT_KW,
    DEFER_KW,
    ELSE_KW,
    FALLTHROUGH_KW,
    FOR_KW,
    FUNC_KW,
    GO_KW,
    GOTO_KW,
    IF_KW,
    IMPORT_KW,
    INTERFACE_KW,
    MAP_KW,
    PACKAGE_KW,
    RANGE_KW,
    RETURN_KW,
    SELECT_KW,
    STRUCT_KW,
    SWITCH_KW,
    TYPE_KW,
    VAR_KW,

    // =========================================================================
    // COMPOSITE NODES (non-terminals in the grammar)
    // =========================================================================
    // Root
    SOURCE_FILE,

    // File-level
    PACKAGE_CLAUSE,
    IMPORT_DECL,
    IMPORT_SPEC,

    // Declarations
    CONST_DECL,
    VAR_DECL,
    TYPE_DECL,
    VALUE_SPEC,
    TYPE_SPEC,
    FUNC_DECL,
    RECEIVER,
    TYPE_PARAM_LIST,
    PARAM_LIST,
    PARAM,

    // Statements
    BLOCK,
    EXPR_STMT,
    ASSIGN_STMT,
    SEND_STMT,
    INC_DEC_STMT,
    RETURN_STMT,
    IF_STMT,
    FOR_STMT,
    RANGE_CLAUSE,
    SWITCH_STMT,
    SELECT_STMT,
    CASE_CLAUSE,
    COMM_CLAUSE,
    GO_STMT,
    DEFER_STMT,
    LABELED_STMT,
    BRANCH_STMT,
    EMPTY_STMT,

    // Expressions
    NAME_EXPR,
    LITERAL,
    PAREN_EXPR,
    SELECTOR_EXPR,
    INDEX_EXPR,
    TYPE_ASSERT_EXPR,
    CALL_EXPR,
    ARG_LIST,
    UNARY_EXPR,
    BINARY_EXPR,
    COMPOSITE_LIT,
    LITERAL_VALUE,
    KEYED_ELEMENT,
    FUNC_LIT,

    // Types
    POINTER_TYPE,
    ARRAY_TYPE,
    MAP_TYPE,
    CHAN_TYPE,
    FUNC_TYPE,
    STRUCT_TYPE,
    INTERFACE_TYPE,
    FIELD,
    METHOD_SPEC,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::BREAK_KW as u16) && (self as u16) <= (Self::VAR_KW as u16)
    }

    /// Check if this is a literal token
    pub fn is_literal_token(self) -> bool {
        matches!(self, Self::INT | Self::FLOAT | Self::IMAG | Self::CHAR | Self::STRING)
    }

    /// Check if this is an assignment operator (including `:=` and the
    /// compound forms)
    pub fn is_assign_op(self) -> bool {
        matches!(
            self,
            Self::EQ
                | Self::COLON_EQ
                | Self::PLUS_EQ
                | Self::MINUS_EQ
                | Self::STAR_EQ
                | Self::SLASH_EQ
                | Self::PERCENT_EQ
                | Self::AMP_EQ
                | Self::PIPE_EQ
                | Self::CARET_EQ
                | Self::SHL_EQ
                | Self::SHR_EQ
                | Self::AMP_CARET_EQ
        )
    }

    /// Check if a token of this kind can start a type
    pub fn can_start_type(self) -> bool {
        matches!(
            self,
            Self::IDENT
                | Self::STAR
                | Self::L_BRACKET
                | Self::L_PAREN
                | Self::ARROW
                | Self::MAP_KW
                | Self::CHAN_KW
                | Self::FUNC_KW
                | Self::STRUCT_KW
                | Self::INTERFACE_KW
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GoLanguage {}

impl rowan::Language for GoLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<GoLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<GoLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<GoLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<GoLanguage>;
