//! Lexer for order-rule text
//!
//! Rule strings are short one-line attributes taken from component
//! catalogs, e.g. `beforeSibling javax.swing.JButton` or
//! `after setText(java.lang.String)`.

use logos::Logos;

pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Order keywords
    #[token("default")]
    Default,

    #[token("first")]
    First,

    #[token("last")]
    Last,

    #[token("beforeSibling")]
    BeforeSibling,

    #[token("afterCreation")]
    AfterCreation,

    #[token("after")]
    After,

    #[token("afterChildren")]
    AfterChildren,

    #[token("afterParentChildren")]
    AfterParentChildren,

    #[token("beforeAssociation")]
    BeforeAssociation,

    #[token("afterAssociation")]
    AfterAssociation,

    // Matches every child type in a children filter
    #[token("*")]
    Star,

    // Method signature, e.g. `setText(java.lang.String)`
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*\([^)]*\)", |lex| lex.slice().to_owned())]
    Signature(String),

    // Fully qualified type name, e.g. `javax.swing.JButton`
    #[regex(
        r"[a-zA-Z_$][a-zA-Z0-9_$]*(\.[a-zA-Z_$][a-zA-Z0-9_$]*)*",
        |lex| lex.slice().to_owned(),
        priority = 1
    )]
    TypeName(String),
}

/// Tokenize rule text into (token, span) pairs.
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}
