// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Lexer for Lonala source code.
//!
//! Converts a string of source code into a stream of tokens.

use std::iter::Peekable;
use std::str::Chars;

/// A token in the Lonala language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Left parenthesis `(`
    LParen,
    /// Right parenthesis `)`
    RParen,
    /// Left bracket `[`
    LBracket,
    /// Right bracket `]`
    RBracket,
    /// Quote `'`
    Quote,
    /// The `nil` literal
    Nil,
    /// The `true` literal
    True,
    /// The `false` literal
    False,
    /// Integer literal
    Int(i64),
    /// String literal (contents without quotes)
    String(String),
    /// Symbol (identifier)
    Symbol(String),
    /// Keyword (e.g., `:foo` or `:ns/bar`)
    Keyword(String),
}

/// Lexer error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    /// Unterminated string literal.
    #[error("line {line}: unterminated string")]
    UnterminatedString { line: u32 },
    /// Invalid escape sequence in string.
    #[error("line {line}: invalid escape sequence: \\{found}")]
    InvalidEscape { line: u32, found: char },
    /// Invalid number format.
    #[error("line {line}: invalid number")]
    InvalidNumber { line: u32 },
    /// Unexpected character.
    #[error("line {line}: unexpected character: {found}")]
    UnexpectedChar { line: u32, found: char },
}

/// Lexer state.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: u32,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
        }
    }

    /// The 1-based line the lexer is currently positioned on.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Get the next token.
    ///
    /// # Errors
    ///
    /// Returns `LexError` if the input contains invalid syntax such as
    /// unterminated strings, invalid escape sequences, or unexpected characters.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();

        let Some(&c) = self.chars.peek() else {
            return Ok(None);
        };

        match c {
            '(' => {
                self.bump();
                Ok(Some(Token::LParen))
            }
            ')' => {
                self.bump();
                Ok(Some(Token::RParen))
            }
            '[' => {
                self.bump();
                Ok(Some(Token::LBracket))
            }
            ']' => {
                self.bump();
                Ok(Some(Token::RBracket))
            }
            '\'' => {
                self.bump();
                Ok(Some(Token::Quote))
            }
            '"' => self.lex_string(),
            '0'..='9' => self.lex_number(false),
            '-' => {
                // Could be negative number or symbol
                self.bump();
                if let Some('0'..='9') = self.chars.peek() {
                    self.lex_number(true)
                } else {
                    Ok(Some(self.lex_symbol_rest('-')))
                }
            }
            ':' => {
                self.bump();
                self.lex_keyword()
            }
            _ if is_symbol_start(c) => {
                self.bump();
                Ok(Some(self.lex_symbol_rest(c)))
            }
            _ => Err(LexError::UnexpectedChar {
                line: self.line,
                found: c,
            }),
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || c == ',' {
                self.bump();
            } else if c == ';' {
                // Skip comment to end of line
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn lex_string(&mut self) -> Result<Option<Token>, LexError> {
        let start = self.line;
        self.bump(); // consume opening quote
        let mut s = String::new();

        loop {
            match self.bump() {
                Some('"') => return Ok(Some(Token::String(s))),
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some(found) => {
                            return Err(LexError::InvalidEscape {
                                line: self.line,
                                found,
                            });
                        }
                        None => return Err(LexError::UnterminatedString { line: start }),
                    };
                    s.push(escaped);
                }
                Some(c) => s.push(c),
                None => return Err(LexError::UnterminatedString { line: start }),
            }
        }
    }

    fn lex_number(&mut self, negative: bool) -> Result<Option<Token>, LexError> {
        let line = self.line;
        let mut n: i64 = 0;

        while let Some(&c) = self.chars.peek() {
            if let Some(digit) = c.to_digit(10) {
                self.bump();
                n = n
                    .checked_mul(10)
                    .and_then(|n| {
                        if negative {
                            n.checked_sub(i64::from(digit))
                        } else {
                            n.checked_add(i64::from(digit))
                        }
                    })
                    .ok_or(LexError::InvalidNumber { line })?;
            } else if is_delimiter(c) {
                break;
            } else {
                return Err(LexError::InvalidNumber { line });
            }
        }

        Ok(Some(Token::Int(n)))
    }

    fn lex_symbol_rest(&mut self, first: char) -> Token {
        let mut s = String::new();
        s.push(first);

        while let Some(&c) = self.chars.peek() {
            if is_symbol_continue(c) {
                self.bump();
                s.push(c);
            } else {
                break;
            }
        }

        // Check for reserved words
        match s.as_str() {
            "nil" => Token::Nil,
            "true" => Token::True,
            "false" => Token::False,
            _ => Token::Symbol(s),
        }
    }

    /// Lex a keyword (already consumed the leading ':').
    fn lex_keyword(&mut self) -> Result<Option<Token>, LexError> {
        let mut s = String::new();

        // First character must be a keyword-start character (not digit)
        let Some(&c) = self.chars.peek() else {
            return Err(LexError::UnexpectedChar {
                line: self.line,
                found: ':',
            });
        };

        if !is_symbol_start(c) {
            return Err(LexError::UnexpectedChar {
                line: self.line,
                found: c,
            });
        }

        while let Some(&c) = self.chars.peek() {
            if is_symbol_continue(c) {
                self.bump();
                s.push(c);
            } else {
                break;
            }
        }

        Ok(Some(Token::Keyword(s)))
    }
}

fn is_symbol_start(c: char) -> bool {
    c.is_alphabetic()
        || matches!(
            c,
            '!' | '$' | '%' | '&' | '*' | '+' | '-' | '.' | '/' | '<' | '=' | '>' | '?' | '@' | '_'
                | '~'
        )
}

fn is_symbol_continue(c: char) -> bool {
    is_symbol_start(c) || c.is_ascii_digit() || c == ':'
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '"' | '\'' | ';' | ',')
}

/// Tokenize an entire string into a vector of tokens.
#[cfg(test)]
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    while let Some(tok) = lexer.next_token()? {
        tokens.push(tok);
    }
    Ok(tokens)
}
