//! Turtle lexer
//!
//! Produces the whole token stream up front and stops at the first invalid
//! token, reporting its line and column.

use std::sync::Arc;

use winnow::ascii::digit1;
use winnow::combinator::{alt, opt, peek, preceded, repeat};
use winnow::error::{ContextError, ErrMode};
use winnow::stream::{AsChar, Location, Stream};
use winnow::token::{any, one_of, take_till, take_while};
use winnow::{LocatingSlice, ModalResult, Parser};

use super::chars::*;
use super::token::{Token, TokenKind};
use crate::error::{line_col, Result, TurtleError};

type Input<'a> = LocatingSlice<&'a str>;

fn backtrack<T>() -> ModalResult<T> {
    Err(ErrMode::Backtrack(ContextError::new()))
}

/// Tokenize a Turtle document; the last token is always [`TokenKind::Eof`]
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut input = LocatingSlice::new(source);
    let mut tokens = Vec::new();

    loop {
        skip_trivia(&mut input);
        let offset = input.current_token_start();
        if input.is_empty() {
            tokens.push(Token {
                kind: TokenKind::Eof,
                offset,
            });
            return Ok(tokens);
        }
        let kind = next_token
            .parse_next(&mut input)
            .map_err(|_| lex_error(source, offset))?;
        tokens.push(Token { kind, offset });
    }
}

fn lex_error(source: &str, offset: usize) -> TurtleError {
    let (line, column) = line_col(source, offset);
    let message = match source[offset..].chars().next() {
        Some('"' | '\'') => "unterminated string literal".to_string(),
        Some('<') => "invalid or unterminated IRI".to_string(),
        Some(c) => format!("unexpected character '{}'", c.escape_default()),
        None => "unexpected end of input".to_string(),
    };
    TurtleError::Lexer {
        line,
        column,
        message,
    }
}

/// Whitespace and `#` comments
fn skip_trivia(input: &mut Input<'_>) {
    let _: ModalResult<()> = repeat(
        0..,
        alt((
            take_while(1.., is_ws).void(),
            ('#', take_till(0.., ['\n', '\r'])).void(),
        )),
    )
    .parse_next(input);
}

fn next_token(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        "^^".value(TokenKind::DoubleCaret),
        iri_ref,
        blank_node_label,
        ('[', take_while(0.., is_ws), ']').value(TokenKind::Anon),
        ('(', take_while(0.., is_ws), ')').value(TokenKind::Nil),
        at_word,
        string_literal,
        number,
        name_or_keyword,
        punctuation,
    ))
    .parse_next(input)
}

fn iri_ref(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    '<'.parse_next(input)?;
    let mut iri = String::new();
    loop {
        let chunk: &str = take_while(0.., is_iri_char).parse_next(input)?;
        iri.push_str(chunk);
        if input.starts_with('>') {
            break;
        }
        // Only \u and \U escapes are legal inside an IRI
        let width = preceded('\\', alt(('u'.value(4usize), 'U'.value(8usize)))).parse_next(input)?;
        iri.push(hex_char(input, width)?);
    }
    '>'.parse_next(input)?;
    Ok(TokenKind::Iri(Arc::from(iri)))
}

fn hex_char(input: &mut Input<'_>, width: usize) -> ModalResult<char> {
    let hex: &str = take_while(width..=width, AsChar::is_hex_digit).parse_next(input)?;
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(c) => Ok(c),
        None => backtrack(),
    }
}

/// `@prefix`, `@base` or a language tag
fn at_word(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    '@'.parse_next(input)?;
    let word: &str = (
        take_while(1.., |c: char| c.is_ascii_alphabetic()),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '-'),
    )
        .take()
        .parse_next(input)?;
    Ok(match word {
        "prefix" => TokenKind::Prefix { sparql: false },
        "base" => TokenKind::Base { sparql: false },
        tag => TokenKind::LangTag(Arc::from(tag)),
    })
}

fn blank_node_label(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    "_:".parse_next(input)?;
    let label: &str = (
        one_of(|c: char| is_pn_chars_u(c) || c.is_ascii_digit()),
        pn_chars_tail,
    )
        .take()
        .parse_next(input)?;
    Ok(TokenKind::BlankNodeLabel(Arc::from(label)))
}

/// `PN_CHARS*` with interior (never trailing) dots
fn pn_chars_tail(input: &mut Input<'_>) -> ModalResult<()> {
    loop {
        let _: &str = take_while(0.., is_pn_chars).parse_next(input)?;
        if opt(peek(('.', one_of(is_pn_chars)))).parse_next(input)?.is_none() {
            return Ok(());
        }
        '.'.parse_next(input)?;
    }
}

/// Prefixed names, the default prefix, and bare-word keywords
fn name_or_keyword(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let start = input.checkpoint();
    let prefix: &str = opt((one_of(is_pn_chars_base), pn_chars_tail).take())
        .parse_next(input)?
        .unwrap_or("");

    if opt(':').parse_next(input)?.is_some() {
        let local = opt(pn_local).parse_next(input)?.unwrap_or_default();
        return Ok(TokenKind::PrefixedName {
            prefix: Arc::from(prefix),
            local: Arc::from(local),
        });
    }

    let keyword = match prefix {
        "a" => TokenKind::A,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        w if w.eq_ignore_ascii_case("prefix") => TokenKind::Prefix { sparql: true },
        w if w.eq_ignore_ascii_case("base") => TokenKind::Base { sparql: true },
        _ => {
            input.reset(&start);
            return backtrack();
        }
    };
    Ok(keyword)
}

fn is_local_char(c: char) -> bool {
    is_pn_chars(c) || c == ':'
}

/// `PN_LOCAL`, with `\` escapes removed and `%XX` kept as written
fn pn_local(input: &mut Input<'_>) -> ModalResult<String> {
    peek(one_of(|c: char| is_pn_local_start(c) || c == '%' || c == '\\')).parse_next(input)?;

    let mut local = String::new();
    loop {
        let chunk: &str = take_while(0.., is_local_char).parse_next(input)?;
        local.push_str(chunk);

        let escaped = opt(preceded(
            '\\',
            one_of(|c: char| "_~.-!$&'()*+,;=/?#@%".contains(c)),
        ))
        .parse_next(input)?;
        if let Some(c) = escaped {
            local.push(c);
            continue;
        }

        let percent: Option<&str> = opt(('%', take_while(2..=2, AsChar::is_hex_digit)).take())
            .parse_next(input)?;
        if let Some(hex) = percent {
            local.push_str(hex);
            continue;
        }

        let interior_dot = opt(peek((
            '.',
            one_of(|c: char| is_local_char(c) || c == '%' || c == '\\'),
        )))
        .parse_next(input)?;
        if interior_dot.is_none() {
            break;
        }
        '.'.parse_next(input)?;
        local.push('.');
    }

    if local.is_empty() {
        return backtrack();
    }
    Ok(local)
}

/// Short and long strings with either quote character
fn string_literal(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let mut quote: &str = alt(("\"\"\"", "'''", "\"", "'")).parse_next(input)?;
    let long = quote.len() == 3;
    let q = if quote.starts_with('"') { '"' } else { '\'' };

    let mut value = String::new();
    loop {
        let chunk: &str = take_while(0.., |c: char| {
            c != q && c != '\\' && (long || (c != '\n' && c != '\r'))
        })
        .parse_next(input)?;
        value.push_str(chunk);

        if input.starts_with(quote) {
            break;
        }
        if input.starts_with('\\') {
            value.push(string_escape(input)?);
        } else if long && input.starts_with(q) {
            value.push(any.parse_next(input)?);
        } else {
            // end of input, or a line break in a short string
            return backtrack();
        }
    }

    let _: &str = quote.parse_next(input)?;
    Ok(TokenKind::String(Arc::from(value)))
}

fn string_escape(input: &mut Input<'_>) -> ModalResult<char> {
    '\\'.parse_next(input)?;
    let c: char = any.parse_next(input)?;
    match c {
        't' => Ok('\t'),
        'b' => Ok('\x08'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        'f' => Ok('\x0C'),
        '"' | '\'' | '\\' => Ok(c),
        'u' => hex_char(input, 4),
        'U' => hex_char(input, 8),
        _ => backtrack(),
    }
}

/// INTEGER, DECIMAL or DOUBLE
fn number(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let text: &str = (
        opt(one_of(['+', '-'])),
        alt((
            (digit1, '.', digit1).void(),
            (digit1, '.', peek(one_of(['e', 'E']))).void(),
            ('.', digit1).void(),
            digit1.void(),
        )),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .parse_next(input)?;

    if text.contains(['e', 'E']) {
        return Ok(TokenKind::Double(text.parse().unwrap_or(f64::NAN)));
    }
    if text.contains('.') {
        return Ok(TokenKind::Decimal(Arc::from(text)));
    }
    Ok(match text.parse::<i64>() {
        Ok(n) => TokenKind::Integer(n),
        // out of i64 range: keep the lexical form
        Err(_) => TokenKind::Decimal(Arc::from(text)),
    })
}

fn punctuation(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    any.verify_map(|c: char| {
        Some(match c {
            '.' => TokenKind::Dot,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            _ => return None,
        })
    })
    .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| *k != TokenKind::Eof)
            .collect()
    }

    fn pname(prefix: &str, local: &str) -> TokenKind {
        TokenKind::PrefixedName {
            prefix: Arc::from(prefix),
            local: Arc::from(local),
        }
    }

    #[test]
    fn directives_and_names() {
        assert_eq!(
            kinds("@prefix qb: <http://purl.org/linked-data/cube#> .\nPREFIX : <x>"),
            vec![
                TokenKind::Prefix { sparql: false },
                pname("qb", ""),
                TokenKind::Iri(Arc::from("http://purl.org/linked-data/cube#")),
                TokenKind::Dot,
                TokenKind::Prefix { sparql: true },
                pname("", ""),
                TokenKind::Iri(Arc::from("x")),
            ]
        );
    }

    #[test]
    fn trailing_dot_ends_a_statement() {
        assert_eq!(
            kinds("ex:a a ex:b.c ."),
            vec![pname("ex", "a"), TokenKind::A, pname("ex", "b.c"), TokenKind::Dot]
        );
        assert_eq!(
            kinds("ex:a ex:p 1."),
            vec![pname("ex", "a"), pname("ex", "p"), TokenKind::Integer(1), TokenKind::Dot]
        );
    }

    #[test]
    fn local_name_escapes() {
        assert_eq!(kinds(r"ex:a\/b ex:c%20d"), vec![pname("ex", "a/b"), pname("ex", "c%20d")]);
    }

    #[test]
    fn literals() {
        assert_eq!(
            kinds(r#""a\tb"@en-GB "x"^^xsd:string '''multi
line''' -5 2.50 1e3 true"#),
            vec![
                TokenKind::String(Arc::from("a\tb")),
                TokenKind::LangTag(Arc::from("en-GB")),
                TokenKind::String(Arc::from("x")),
                TokenKind::DoubleCaret,
                pname("xsd", "string"),
                TokenKind::String(Arc::from("multi\nline")),
                TokenKind::Integer(-5),
                TokenKind::Decimal(Arc::from("2.50")),
                TokenKind::Double(1000.0),
                TokenKind::True,
            ]
        );
    }

    #[test]
    fn blank_nodes_and_collections() {
        assert_eq!(
            kinds("_:b0 [ ] ( ) ( _:x )"),
            vec![
                TokenKind::BlankNodeLabel(Arc::from("b0")),
                TokenKind::Anon,
                TokenKind::Nil,
                TokenKind::LParen,
                TokenKind::BlankNodeLabel(Arc::from("x")),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(kinds("# header\nex:a # trailing\n"), vec![pname("ex", "a")]);
    }

    #[test]
    fn errors_carry_position() {
        let err = tokenize("ex:a ex:b\n  \"open").unwrap_err();
        match err {
            TurtleError::Lexer { line, column, message } => {
                assert_eq!((line, column), (2, 3));
                assert!(message.contains("unterminated string"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
