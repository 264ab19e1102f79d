use thiserror::Error;

use crate::ast::{Bounds, Filter, Token, TokenKind};

/// Errors raised while building the filter tree.
///
/// `Syntax` covers tokens the grammar does not allow at a position;
/// `Structural` covers well-formed tokens that leave a construct incomplete
/// or empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("structural error: {0}")]
    Structural(String),
}

impl ParseError {
    fn unexpected(found: &Token, expected: &str) -> Self {
        ParseError::Syntax(format!("unexpected {}, expected {}", found, expected))
    }

    fn missing(what: &str) -> Self {
        ParseError::Structural(format!("missing {}", what))
    }
}

type Result<T> = std::result::Result<T, ParseError>;

/// Recursive-descent parser over a materialized token sequence.
///
/// Lookahead is an index into the tokens: `pop` consumes one token and
/// `push_back` undoes exactly the last `pop`.
pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, index: 0 }
    }

    fn pop(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned()?;
        self.index += 1;
        Some(token)
    }

    fn push_back(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// Consumes the next token if it has `kind`.
    fn accept(&mut self, kind: TokenKind) -> bool {
        match self.pop() {
            Some(token) if token.is(kind) => true,
            Some(_) => {
                self.push_back();
                false
            }
            None => false,
        }
    }

    /// Kind of the next token without consuming it.
    fn peek_kind(&mut self) -> Option<TokenKind> {
        let token = self.pop()?;
        self.push_back();
        Some(token.kind)
    }

    /// True once every token has been consumed.
    pub fn is_empty(&self) -> bool {
        self.index >= self.tokens.len()
    }

    /// First token not yet consumed.
    pub fn remaining(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    /// Id := QuotedLiteral ( '+' Id )?
    ///
    /// Returns `Ok(None)` without consuming anything if the next token is not
    /// a literal.
    fn parse_id(&mut self) -> Result<Option<String>> {
        let Some(token) = self.pop() else {
            return Ok(None);
        };
        if !token.is(TokenKind::Identifier) {
            self.push_back();
            return Ok(None);
        }

        let mut value = token.text;
        if self.accept(TokenKind::Plus) {
            match self.parse_id()? {
                Some(rest) => value.push_str(&rest),
                None => return Err(ParseError::missing("literal after '+'")),
            }
        }
        Ok(Some(value))
    }

    /// Set := '(' Id ( ',' Id )* ')'
    fn parse_set(&mut self) -> Result<Vec<String>> {
        if !self.accept(TokenKind::LParen) {
            return Err(ParseError::missing("'(' at start of set"));
        }

        let mut values = Vec::new();
        loop {
            match self.parse_id()? {
                Some(value) if value.is_empty() => {
                    return Err(ParseError::Structural("empty literal in set".into()));
                }
                Some(value) => values.push(value),
                None => {
                    let Some(token) = self.pop() else {
                        return Err(ParseError::missing("')' at end of set"));
                    };
                    return match token.kind {
                        TokenKind::RParen if values.is_empty() => {
                            Err(ParseError::Structural("set is empty".into()))
                        }
                        TokenKind::Plus => Err(ParseError::missing("literal before '+'")),
                        _ => Err(ParseError::unexpected(&token, "literal in set")),
                    };
                }
            }

            let Some(token) = self.pop() else {
                return Err(ParseError::missing("')' at end of set"));
            };
            match token.kind {
                TokenKind::Comma => continue,
                TokenKind::RParen => return Ok(values),
                _ => return Err(ParseError::unexpected(&token, "',' or ')' in set")),
            }
        }
    }

    /// Range := '[' Id? ':' Id? ']'
    fn parse_range(&mut self) -> Result<Bounds> {
        if !self.accept(TokenKind::LBracket) {
            return Err(ParseError::missing("'[' at start of range"));
        }
        if self.peek_kind() == Some(TokenKind::Plus) {
            return Err(ParseError::missing("literal before '+'"));
        }

        let from = self.parse_id()?;
        match self.pop() {
            Some(token) if token.is(TokenKind::Colon) => {}
            Some(token) => return Err(ParseError::unexpected(&token, "':' between range bounds")),
            None => return Err(ParseError::missing("':' between range bounds")),
        }
        if self.peek_kind() == Some(TokenKind::Plus) {
            return Err(ParseError::missing("literal before '+'"));
        }

        let to = self.parse_id()?;
        match self.pop() {
            Some(token) if token.is(TokenKind::RBracket) => {}
            Some(token) => return Err(ParseError::unexpected(&token, "']' at end of range")),
            None => return Err(ParseError::missing("']' at end of range")),
        }

        Bounds::new(from, to).ok_or_else(|| ParseError::Structural("range is empty".into()))
    }

    /// Container := Set | Range
    fn parse_container(&mut self, field: String, negated: bool) -> Result<Filter> {
        let Some(token) = self.pop() else {
            return Err(ParseError::missing(&format!("container after '{}'", field)));
        };
        self.push_back();

        match token.kind {
            TokenKind::LParen => {
                let values = self.parse_set()?;
                Ok(Filter::terms(field, values, negated))
            }
            TokenKind::LBracket => {
                let bounds = self.parse_range()?;
                Ok(Filter::range(field, bounds, negated))
            }
            _ => Err(ParseError::unexpected(&token, "'(' or '['")),
        }
    }

    /// Expr := Id ( 'not' )? 'in' Container
    fn parse_expression(&mut self) -> Result<Filter> {
        let Some(field) = self.parse_id()? else {
            return match self.pop() {
                Some(token) if token.is(TokenKind::Plus) => {
                    Err(ParseError::missing("literal before '+'"))
                }
                Some(token) => Err(ParseError::unexpected(&token, "field literal")),
                None => Err(ParseError::missing("expression")),
            };
        };

        let Some(op) = self.pop() else {
            return Err(ParseError::missing(&format!("operator after '{}'", field)));
        };
        let negated = match op.kind {
            TokenKind::In => false,
            TokenKind::Not => {
                if !self.accept(TokenKind::In) {
                    return match self.pop() {
                        Some(token) => Err(ParseError::unexpected(&token, "'in' after 'not'")),
                        None => Err(ParseError::missing("'in' after 'not'")),
                    };
                }
                true
            }
            _ => return Err(ParseError::unexpected(&op, "'in' or 'not in'")),
        };

        self.parse_container(field, negated)
    }

    /// Cond := Expr ( 'or' Expr )*
    fn parse_cond(&mut self) -> Result<Filter> {
        let mut exprs = vec![self.parse_expression()?];
        while self.accept(TokenKind::Or) {
            exprs.push(self.parse_expression()?);
        }
        Filter::or(exprs).ok_or_else(|| ParseError::missing("expression"))
    }

    /// CondList := Cond ( ';' Cond )* ';'?
    ///
    /// Stops in front of the closing `}`, which the caller consumes.
    fn parse_cond_list(&mut self) -> Result<Filter> {
        let mut conds = Vec::new();
        loop {
            match self.peek_kind() {
                None | Some(TokenKind::RBrace) => break,
                Some(_) => conds.push(self.parse_cond()?),
            }

            match self.pop() {
                Some(token) if token.is(TokenKind::Semicolon) => continue,
                Some(token) if token.is(TokenKind::RBrace) => {
                    self.push_back();
                    break;
                }
                Some(token) => return Err(ParseError::unexpected(&token, "';', 'or' or '}'")),
                None => break,
            }
        }
        Filter::and(conds).ok_or_else(|| ParseError::Structural("section has no conditions".into()))
    }

    /// SectionGroup := '{' Body '}' ( 'or' '{' Body '}' )*
    fn parse_section_group(&mut self) -> Result<Filter> {
        let mut bodies = Vec::new();
        loop {
            if !self.accept(TokenKind::LBrace) {
                return Err(match self.pop() {
                    Some(token) => ParseError::unexpected(&token, "'{'"),
                    None => ParseError::missing("'{' at start of section"),
                });
            }

            // Body := SectionGroup+ | CondList
            let body = match self.peek_kind() {
                None => return Err(ParseError::missing("'}' at end of section")),
                Some(TokenKind::RBrace) => {
                    self.pop();
                    break;
                }
                Some(TokenKind::LBrace) => self.parse_sections()?,
                Some(_) => self.parse_cond_list()?,
            };
            bodies.push(body);

            if !self.accept(TokenKind::RBrace) {
                return Err(match self.pop() {
                    Some(token) => ParseError::unexpected(&token, "'}'"),
                    None => ParseError::missing("'}' at end of section"),
                });
            }
            if !self.accept(TokenKind::Or) {
                break;
            }
        }
        Filter::or(bodies).ok_or_else(|| ParseError::Structural("section is empty".into()))
    }

    /// SectionGroup+ : consecutive groups until something other than `{`.
    fn parse_sections(&mut self) -> Result<Filter> {
        let mut groups = Vec::new();
        while self.peek_kind() == Some(TokenKind::LBrace) {
            groups.push(self.parse_section_group()?);
        }
        Filter::and(groups).ok_or_else(|| match self.remaining() {
            Some(token) => ParseError::unexpected(token, "'{'"),
            None => ParseError::Structural("query is empty".into()),
        })
    }

    /// Query := SectionGroup+
    ///
    /// Does not require the tokens to be exhausted; see [`Parser::parse`].
    pub fn parse_query(&mut self) -> Result<Filter> {
        self.parse_sections()
    }

    /// Parses a complete query and rejects trailing tokens.
    pub fn parse(&mut self) -> Result<Filter> {
        let filter = self.parse_query()?;
        match self.remaining() {
            None => Ok(filter),
            Some(token) => Err(ParseError::Structural(format!(
                "unconsumed trailing input at {}",
                token
            ))),
        }
    }
}
