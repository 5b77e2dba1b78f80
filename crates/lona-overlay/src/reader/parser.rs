// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Parser for Lonala source code.
//!
//! Converts a token stream into [`Form`]s.

use super::lexer::{LexError, Lexer, Token};
use std::fmt;

/// Maximum nesting of lists, vectors and quotes in one form.
pub const MAX_NESTING_DEPTH: usize = 256;

/// A form read from source, before evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Form {
    /// `nil`
    Nil,
    /// `true` / `false`
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// String literal.
    Str(String),
    /// Symbol, possibly qualified (`alias/name`).
    Symbol(String),
    /// Keyword without the leading colon.
    Keyword(String),
    /// `( ... )`
    List(Vec<Self>),
    /// `[ ... ]`
    Vector(Vec<Self>),
}

impl Form {
    /// The symbol name, if this form is a symbol.
    #[must_use]
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Symbol(s) => write!(f, "{s}"),
            Self::Keyword(s) => write!(f, ":{s}"),
            Self::List(items) => write_seq(f, "(", items, ")"),
            Self::Vector(items) => write_seq(f, "[", items, "]"),
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: &str, items: &[Form], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

/// Parse error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Unexpected end of input.
    #[error("line {line}: unexpected end of input")]
    UnexpectedEof { line: u32 },
    /// Unmatched right parenthesis.
    #[error("line {line}: unmatched )")]
    UnmatchedRParen { line: u32 },
    /// Unmatched right bracket.
    #[error("line {line}: unmatched ]")]
    UnmatchedRBracket { line: u32 },
    /// Forms nested deeper than [`MAX_NESTING_DEPTH`].
    #[error("line {line}: forms nested deeper than {MAX_NESTING_DEPTH}")]
    TooDeep { line: u32 },
}

/// Combined read error (lexer + parser).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    /// Lexer error.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// Parser error.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Parser state.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    /// Lookahead token.
    lookahead: Option<Token>,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            lookahead: None,
            depth: 0,
        }
    }

    /// Read one form.
    ///
    /// Returns `None` if at end of input.
    pub fn read(&mut self) -> Result<Option<Form>, ReadError> {
        let token = match self.peek()? {
            Some(t) => t.clone(),
            None => return Ok(None),
        };
        self.advance();

        let form = match token {
            Token::Nil => Form::Nil,
            Token::True => Form::Bool(true),
            Token::False => Form::Bool(false),
            Token::Int(n) => Form::Int(n),
            Token::String(s) => Form::Str(s),
            Token::Symbol(s) => Form::Symbol(s),
            Token::Keyword(s) => Form::Keyword(s),
            Token::Quote => {
                // 'expr => (quote expr)
                let expr = self.nested(Self::read_required)?;
                Form::List(vec![Form::Symbol("quote".into()), expr])
            }
            Token::LParen => Form::List(self.nested(|p| p.read_seq(&Token::RParen))?),
            Token::LBracket => Form::Vector(self.nested(|p| p.read_seq(&Token::RBracket))?),
            Token::RParen => {
                return Err(ParseError::UnmatchedRParen {
                    line: self.lexer.line(),
                }
                .into());
            }
            Token::RBracket => {
                return Err(ParseError::UnmatchedRBracket {
                    line: self.lexer.line(),
                }
                .into());
            }
        };
        Ok(Some(form))
    }

    fn nested<T>(&mut self, read: impl FnOnce(&mut Self) -> Result<T, ReadError>) -> Result<T, ReadError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::TooDeep {
                line: self.lexer.line(),
            }
            .into());
        }
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    fn read_required(&mut self) -> Result<Form, ReadError> {
        let line = self.lexer.line();
        self.read()?
            .ok_or_else(|| ParseError::UnexpectedEof { line }.into())
    }

    fn read_seq(&mut self, close: &Token) -> Result<Vec<Form>, ReadError> {
        let mut elements = Vec::new();
        loop {
            match self.peek()?.map(|t| t == close) {
                None => {
                    return Err(ParseError::UnexpectedEof {
                        line: self.lexer.line(),
                    }
                    .into());
                }
                Some(true) => {
                    self.advance();
                    return Ok(elements);
                }
                Some(false) => elements.push(self.read_required()?),
            }
        }
    }

    fn peek(&mut self) -> Result<Option<&Token>, LexError> {
        if self.lookahead.is_none() {
            self.lookahead = self.lexer.next_token()?;
        }
        Ok(self.lookahead.as_ref())
    }

    fn advance(&mut self) {
        self.lookahead = None;
    }
}

/// Read a single form from a string.
pub fn read(input: &str) -> Result<Option<Form>, ReadError> {
    Parser::new(input).read()
}

/// Read every top-level form from a string.
pub fn read_all(input: &str) -> Result<Vec<Form>, ReadError> {
    let mut parser = Parser::new(input);
    let mut forms = Vec::new();
    while let Some(form) = parser.read()? {
        forms.push(form);
    }
    Ok(forms)
}
