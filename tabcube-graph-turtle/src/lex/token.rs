//! Turtle tokens

use std::fmt;
use std::sync::Arc;

/// A token and the byte offset it starts at
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// `<...>`, escapes already decoded, not yet resolved against the base
    Iri(Arc<str>),
    /// `prefix:local`; `local` may be empty (`prefix:`)
    PrefixedName { prefix: Arc<str>, local: Arc<str> },
    /// `_:label`
    BlankNodeLabel(Arc<str>),
    /// `[]`
    Anon,
    /// `()`
    Nil,
    /// Unescaped string content
    String(Arc<str>),
    Integer(i64),
    /// Kept lexical so precision survives
    Decimal(Arc<str>),
    Double(f64),
    /// Language tag without the `@`
    LangTag(Arc<str>),
    /// `@prefix` or `PREFIX`; `sparql` is true for the latter
    Prefix { sparql: bool },
    /// `@base` or `BASE`
    Base { sparql: bool },
    A,
    True,
    False,
    Dot,
    Comma,
    Semicolon,
    DoubleCaret,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Iri(iri) => write!(f, "<{iri}>"),
            TokenKind::PrefixedName { prefix, local } => write!(f, "{prefix}:{local}"),
            TokenKind::BlankNodeLabel(label) => write!(f, "_:{label}"),
            TokenKind::Anon => f.write_str("[]"),
            TokenKind::Nil => f.write_str("()"),
            TokenKind::String(s) => write!(f, "\"{s}\""),
            TokenKind::Integer(n) => write!(f, "{n}"),
            TokenKind::Decimal(d) => f.write_str(d),
            TokenKind::Double(d) => write!(f, "{d:e}"),
            TokenKind::LangTag(tag) => write!(f, "@{tag}"),
            TokenKind::Prefix { sparql: true } => f.write_str("PREFIX"),
            TokenKind::Prefix { sparql: false } => f.write_str("@prefix"),
            TokenKind::Base { sparql: true } => f.write_str("BASE"),
            TokenKind::Base { sparql: false } => f.write_str("@base"),
            TokenKind::A => f.write_str("a"),
            TokenKind::True => f.write_str("true"),
            TokenKind::False => f.write_str("false"),
            TokenKind::Dot => f.write_str("'.'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Semicolon => f.write_str("';'"),
            TokenKind::DoubleCaret => f.write_str("'^^'"),
            TokenKind::LBracket => f.write_str("'['"),
            TokenKind::RBracket => f.write_str("']'"),
            TokenKind::LParen => f.write_str("'('"),
            TokenKind::RParen => f.write_str("')'"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}
