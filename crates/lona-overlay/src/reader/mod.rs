// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Reader for Lonala source code.
//!
//! Converts source code strings into [`Form`]s.

#[cfg(test)]
mod lexer_test;

mod lexer;
mod parser;

pub use lexer::{LexError, Lexer, Token};
pub use parser::{Form, MAX_NESTING_DEPTH, ParseError, Parser, ReadError, read, read_all};
