// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for the Lonala lexer.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::lexer::tokenize;
use super::{LexError, Token};
use proptest::prelude::*;

fn sym(s: &str) -> Token {
    Token::Symbol(s.to_owned())
}

#[test]
fn lex_parens_and_brackets() {
    assert_eq!(tokenize("()").unwrap(), vec![Token::LParen, Token::RParen]);
    assert_eq!(
        tokenize("[x]").unwrap(),
        vec![Token::LBracket, sym("x"), Token::RBracket]
    );
}

#[test]
fn lex_literals() {
    assert_eq!(tokenize("nil").unwrap(), vec![Token::Nil]);
    assert_eq!(
        tokenize("true false").unwrap(),
        vec![Token::True, Token::False]
    );
    assert_eq!(
        tokenize("0 42 -999").unwrap(),
        vec![Token::Int(0), Token::Int(42), Token::Int(-999)]
    );
}

#[test]
fn lex_extreme_integers() {
    assert_eq!(
        tokenize("-9223372036854775808").unwrap(),
        vec![Token::Int(i64::MIN)]
    );
    assert_eq!(
        tokenize("9223372036854775808").unwrap_err(),
        LexError::InvalidNumber { line: 1 }
    );
}

#[test]
fn lex_strings_with_escapes() {
    assert_eq!(
        tokenize("\"a\\nb\"").unwrap(),
        vec![Token::String("a\nb".into())]
    );
    assert_eq!(
        tokenize("\"\\t\\r\\\\\\\"\"").unwrap(),
        vec![Token::String("\t\r\\\"".into())]
    );
}

#[test]
fn lex_symbols() {
    assert_eq!(tokenize("foo").unwrap(), vec![sym("foo")]);
    assert_eq!(tokenize("+").unwrap(), vec![sym("+")]);
    assert_eq!(tokenize("-").unwrap(), vec![sym("-")]);
    assert_eq!(tokenize("my-func").unwrap(), vec![sym("my-func")]);
    assert_eq!(tokenize("parent/greet").unwrap(), vec![sym("parent/greet")]);
    assert_eq!(tokenize("*file*").unwrap(), vec![sym("*file*")]);
}

#[test]
fn lex_keywords() {
    assert_eq!(
        tokenize(":foo :ns/bar").unwrap(),
        vec![Token::Keyword("foo".into()), Token::Keyword("ns/bar".into())]
    );
}

#[test]
fn lex_commas_and_comments() {
    assert_eq!(
        tokenize("(1, 2) ; trailing\n3").unwrap(),
        vec![
            Token::LParen,
            Token::Int(1),
            Token::Int(2),
            Token::RParen,
            Token::Int(3)
        ]
    );
}

#[test]
fn lex_quote() {
    assert_eq!(
        tokenize("'(a)").unwrap(),
        vec![Token::Quote, Token::LParen, sym("a"), Token::RParen]
    );
}

#[test]
fn lex_errors_report_line() {
    assert_eq!(
        tokenize("\n\"hello").unwrap_err(),
        LexError::UnterminatedString { line: 2 }
    );
    assert_eq!(
        tokenize("\"\\x\"").unwrap_err(),
        LexError::InvalidEscape {
            line: 1,
            found: 'x'
        }
    );
    assert_eq!(
        tokenize("a\n\nb {").unwrap_err(),
        LexError::UnexpectedChar {
            line: 3,
            found: '{'
        }
    );
    assert_eq!(
        tokenize("12abc").unwrap_err(),
        LexError::InvalidNumber { line: 1 }
    );
}

proptest! {
    #[test]
    fn integers_round_trip(n in any::<i64>()) {
        prop_assert_eq!(tokenize(&n.to_string()).unwrap(), vec![Token::Int(n)]);
    }

    #[test]
    fn simple_symbols_lex_as_one_token(s in "[a-z][a-z0-9?!-]{0,16}") {
        prop_assume!(!matches!(s.as_str(), "nil" | "true" | "false"));
        prop_assert_eq!(tokenize(&s).unwrap(), vec![Token::Symbol(s.clone())]);
    }
}
