use std::fmt;

/// Kind of a lexical token.
///
/// ESL has no bare words: every field name and value is a quoted literal, so
/// the only non-literal tokens are the operator symbols and three keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Operators
    /// Comment opener `/*`. Never emitted; the lexer skips the comment body.
    CommentOpen,

    /// Comment closer `*/`
    CommentClose,

    /// Condition separator `;` (logical AND between conditions)
    ///
    /// # Example
    /// ```text
    /// { 'a' in ('1'); 'b' in ('2') }
    /// ```
    Semicolon,

    /// Set member separator `,`
    Comma,

    /// Set opener `(`
    LParen,

    /// Set closer `)`
    RParen,

    /// Range opener `[`
    LBracket,

    /// Range closer `]`
    RBracket,

    /// Section opener `{`
    LBrace,

    /// Section closer `}`
    RBrace,

    /// Literal concatenation `+`
    ///
    /// # Example
    /// ```text
    /// 'user' + '_id' in ('42')
    /// ```
    Plus,

    /// Range bound separator `:`
    Colon,

    // Keywords
    /// Logical OR between expressions or sections
    Or,

    /// Negation, only valid directly before `in`
    Not,

    /// Membership operator
    In,

    /// Quoted literal: `'text'` or `"text"`, without the quotes
    Identifier,
}

impl TokenKind {
    /// Canonical source spelling, or a description for literals.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::CommentOpen => "/*",
            TokenKind::CommentClose => "*/",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Plus => "+",
            TokenKind::Colon => ":",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::In => "in",
            TokenKind::Identifier => "identifier",
        }
    }
}

/// Operator symbols, longest first so lookups can stop at the first hit.
pub const OPERATORS: &[(&str, TokenKind)] = &[
    ("/*", TokenKind::CommentOpen),
    ("*/", TokenKind::CommentClose),
    (";", TokenKind::Semicolon),
    (",", TokenKind::Comma),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    ("+", TokenKind::Plus),
    (":", TokenKind::Colon),
];

/// Longest operator symbol, in characters.
pub const MAX_OPERATOR_LEN: usize = 3;

/// Reserved lowercase words.
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("or", TokenKind::Or),
    ("not", TokenKind::Not),
    ("in", TokenKind::In),
];

/// A token: its kind plus the text it carries.
///
/// For operators and keywords `text` is the source spelling; for identifiers
/// it is the literal value with the surrounding quotes removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    /// Token for a fixed-spelling kind (operators and keywords).
    pub fn symbol(kind: TokenKind) -> Self {
        Token::new(kind, kind.as_str())
    }

    pub fn identifier(value: impl Into<String>) -> Self {
        Token::new(TokenKind::Identifier, value)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Identifier => write!(f, "'{}'", self.text),
            _ => write!(f, "{}", self.text),
        }
    }
}
