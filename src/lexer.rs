use thiserror::Error;

use crate::ast::tokens::{KEYWORDS, MAX_OPERATOR_LEN, OPERATORS};
use crate::ast::{Token, TokenKind};

/// Longest accepted source, in characters.
pub const MAX_INPUT_LEN: usize = 65535;

/// Characters of context reported after a bad offset.
const CONTEXT_LEN: usize = 10;

/// Errors raised while scanning ESL text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("input too large: {len} characters, at most {max} allowed")]
    InputTooLarge { len: usize, max: usize },

    #[error("bad token at {offset}: {context}...")]
    Syntax { offset: usize, context: String },

    #[error("unterminated comment starting at {offset}")]
    UnterminatedComment { offset: usize },
}

/// Character position in the source.
pub type Position = usize;

pub struct Lexer {
    input: Vec<char>,
    position: Position,
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            tokens: Vec::new(),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn remaining(&self) -> usize {
        self.input.len() - self.position
    }

    fn slice(&self, len: usize) -> String {
        self.input[self.position..self.position + len].iter().collect()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.position += 1;
            } else {
                break;
            }
        }
    }

    /// Longest operator at the cursor, consumed on success.
    fn read_operator(&mut self) -> Option<TokenKind> {
        for len in (1..=MAX_OPERATOR_LEN.min(self.remaining())).rev() {
            let candidate = self.slice(len);
            if let Some((_, kind)) = OPERATORS.iter().find(|(sym, _)| *sym == candidate) {
                self.position += len;
                return Some(*kind);
            }
        }
        None
    }

    /// Skips a comment body whose opener has already been consumed.
    fn skip_comment(&mut self, start: Position) -> Result<(), LexError> {
        while self.position < self.input.len() {
            if self.input[self.position..].starts_with(&['*', '/']) {
                self.position += 2;
                return Ok(());
            }
            self.position += 1;
        }
        Err(LexError::UnterminatedComment { offset: start })
    }

    /// Maximal lowercase run, consumed only when it is a keyword.
    fn read_keyword(&mut self) -> Option<TokenKind> {
        let word: String = self.input[self.position..]
            .iter()
            .take_while(|c| c.is_lowercase())
            .collect();
        if word.is_empty() {
            return None;
        }

        let (_, kind) = KEYWORDS.iter().find(|(kw, _)| *kw == word)?;
        self.position += word.chars().count();
        Some(*kind)
    }

    /// Quoted literal; the closing quote must match the opening one.
    fn read_identifier(&mut self) -> Option<String> {
        let quote = self.current_char().filter(|c| *c == '\'' || *c == '"')?;
        let body = &self.input[self.position + 1..];
        let end = body.iter().position(|c| *c == quote)?;

        let value: String = body[..end].iter().collect();
        self.position += end + 2;
        Some(value)
    }

    fn bad_token(&self) -> LexError {
        let end = (self.position + CONTEXT_LEN).min(self.input.len());
        LexError::Syntax {
            offset: self.position,
            context: self.input[self.position..end].iter().collect(),
        }
    }

    /// Scans the next token, skipping whitespace and comments.
    /// Returns `Ok(None)` at the end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        loop {
            self.skip_whitespace();
            if self.position >= self.input.len() {
                return Ok(None);
            }

            let start = self.position;
            if let Some(kind) = self.read_operator() {
                if kind == TokenKind::CommentOpen {
                    self.skip_comment(start)?;
                    continue;
                }
                return Ok(Some(Token::symbol(kind)));
            }

            if let Some(kind) = self.read_keyword() {
                return Ok(Some(Token::symbol(kind)));
            }

            if let Some(value) = self.read_identifier() {
                return Ok(Some(Token::identifier(value)));
            }

            return Err(self.bad_token());
        }
    }

    /// Scans the whole input without the length check.
    pub(crate) fn scan(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(token) = self.next_token()? {
            self.tokens.push(token);
        }
        Ok(self.tokens)
    }

    /// Scans the whole input into a token sequence.
    pub fn tokenize(self) -> Result<Vec<Token>, LexError> {
        check_len(self.input.len())?;
        self.scan()
    }
}

/// Rejects sources over [`MAX_INPUT_LEN`] characters.
pub fn check_len(len: usize) -> Result<(), LexError> {
    if len > MAX_INPUT_LEN {
        return Err(LexError::InputTooLarge {
            len,
            max: MAX_INPUT_LEN,
        });
    }
    Ok(())
}

/// Tokenizes `text`.
pub fn tokenize(text: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(text).tokenize()
}

#[test]
fn test_keywords() {
    let tokens = tokenize("or not in").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::symbol(TokenKind::Or),
            Token::symbol(TokenKind::Not),
            Token::symbol(TokenKind::In),
        ]
    );
}

#[test]
fn test_expression() {
    let tokens = tokenize("{'a' not in [:'9']}").unwrap();
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::LBrace,
            TokenKind::Identifier,
            TokenKind::Not,
            TokenKind::In,
            TokenKind::LBracket,
            TokenKind::Colon,
            TokenKind::Identifier,
            TokenKind::RBracket,
            TokenKind::RBrace,
        ]
    );
    assert_eq!(tokens[1].text, "a");
    assert_eq!(tokens[6].text, "9");
}
