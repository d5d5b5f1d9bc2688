//! Recursive-descent Turtle parser emitting to a [`GraphSink`]

use std::collections::HashMap;

use tabcube_graph_ir::{iri, Datatype, GraphSink, LiteralValue, TermId};
use tabcube_vocab::rdf;

use crate::error::{line_col, Result, TurtleError};
use crate::lex::{tokenize, Token, TokenKind};

/// Parse a Turtle document
///
/// `base` is the document's own location; relative IRIs resolve against it
/// until an `@base` directive replaces it.
pub fn parse<S: GraphSink>(input: &str, base: Option<&str>, sink: &mut S) -> Result<()> {
    let mut parser = Parser {
        source: input,
        tokens: tokenize(input)?,
        pos: 0,
        sink,
        prefixes: HashMap::new(),
        base: base.map(str::to_string),
    };
    if let Some(base) = base {
        parser.sink.on_base(base);
    }
    parser.document()
}

struct Parser<'a, S> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    sink: &'a mut S,
    prefixes: HashMap<String, String>,
    base: Option<String>,
}

impl<S: GraphSink> Parser<'_, S> {
    fn document(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                TokenKind::Eof => return Ok(()),
                TokenKind::Prefix { sparql } => {
                    let sparql = *sparql;
                    self.prefix_directive(sparql)?;
                }
                TokenKind::Base { sparql } => {
                    let sparql = *sparql;
                    self.base_directive(sparql)?;
                }
                _ => self.triples()?,
            }
        }
    }

    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn bump(&mut self) -> TokenKind {
        let kind = self.tokens[self.pos].kind.clone();
        if kind != TokenKind::Eof {
            self.pos += 1;
        }
        kind
    }

    /// Step back over a token taken by [`Self::bump`]
    fn unbump(&mut self, bumped: &TokenKind) {
        if *bumped != TokenKind::Eof {
            self.pos -= 1;
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<()> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn unexpected(&self, wanted: &str) -> TurtleError {
        let (line, column) = line_col(self.source, self.tokens[self.pos].offset);
        TurtleError::Syntax {
            line,
            column,
            message: format!("expected {wanted}, found {}", self.peek()),
        }
    }

    fn prefix_directive(&mut self, sparql: bool) -> Result<()> {
        self.bump();
        let prefix = match self.bump() {
            TokenKind::PrefixedName { prefix, local } if local.is_empty() => prefix,
            other => {
                self.unbump(&other);
                return Err(self.unexpected("a prefix declaration like 'ex:'"));
            }
        };
        let namespace = match self.bump() {
            TokenKind::Iri(raw) => self.resolve(&raw),
            other => {
                self.unbump(&other);
                return Err(self.unexpected("a namespace IRI"));
            }
        };
        self.sink.on_prefix(&prefix, &namespace);
        self.prefixes.insert(prefix.to_string(), namespace);
        if !sparql {
            self.expect(&TokenKind::Dot)?;
        }
        Ok(())
    }

    fn base_directive(&mut self, sparql: bool) -> Result<()> {
        self.bump();
        let base = match self.bump() {
            TokenKind::Iri(raw) => self.resolve(&raw),
            other => {
                self.unbump(&other);
                return Err(self.unexpected("a base IRI"));
            }
        };
        self.sink.on_base(&base);
        self.base = Some(base);
        if !sparql {
            self.expect(&TokenKind::Dot)?;
        }
        Ok(())
    }

    fn triples(&mut self) -> Result<()> {
        if self.peek() == &TokenKind::LBracket {
            // `[ :p :o ] .` or `[ :p :o ] :q :r .`
            let subject = self.blank_node_property_list()?;
            if self.peek() != &TokenKind::Dot {
                self.predicate_object_list(subject)?;
            }
        } else {
            let subject = self.subject()?;
            self.predicate_object_list(subject)?;
        }
        self.expect(&TokenKind::Dot)
    }

    fn subject(&mut self) -> Result<TermId> {
        match self.peek() {
            TokenKind::Iri(_) | TokenKind::PrefixedName { .. } => self.iri(),
            TokenKind::BlankNodeLabel(_) | TokenKind::Anon => self.blank_node(),
            TokenKind::LParen | TokenKind::Nil => self.collection(),
            _ => Err(self.unexpected("a subject")),
        }
    }

    fn iri(&mut self) -> Result<TermId> {
        let expanded = match self.bump() {
            TokenKind::Iri(raw) => self.resolve(&raw),
            TokenKind::PrefixedName { prefix, local } => {
                let namespace = self
                    .prefixes
                    .get(&*prefix)
                    .ok_or_else(|| TurtleError::UndefinedPrefix(prefix.to_string()))?;
                format!("{namespace}{local}")
            }
            other => {
                self.unbump(&other);
                return Err(self.unexpected("an IRI"));
            }
        };
        Ok(self.sink.term_iri(&expanded))
    }

    fn resolve(&self, raw: &str) -> String {
        match &self.base {
            Some(base) if !iri::is_absolute(raw) => iri::resolve(base, raw),
            _ => raw.to_string(),
        }
    }

    fn blank_node(&mut self) -> Result<TermId> {
        match self.bump() {
            TokenKind::BlankNodeLabel(label) => Ok(self.sink.term_blank(Some(&*label))),
            _ => Ok(self.sink.term_blank(None)),
        }
    }

    fn predicate_object_list(&mut self, subject: TermId) -> Result<()> {
        loop {
            let predicate = match self.peek() {
                TokenKind::A => {
                    self.bump();
                    self.sink.term_iri(rdf::TYPE)
                }
                _ => self.iri()?,
            };
            self.object_list(subject, predicate)?;

            if !self.eat(&TokenKind::Semicolon) {
                return Ok(());
            }
            // Repeated and trailing semicolons are allowed
            while self.eat(&TokenKind::Semicolon) {}
            if !matches!(
                self.peek(),
                TokenKind::A | TokenKind::Iri(_) | TokenKind::PrefixedName { .. }
            ) {
                return Ok(());
            }
        }
    }

    fn object_list(&mut self, subject: TermId, predicate: TermId) -> Result<()> {
        loop {
            let object = self.object()?;
            self.sink.emit_triple(subject, predicate, object);
            if !self.eat(&TokenKind::Comma) {
                return Ok(());
            }
        }
    }

    fn object(&mut self) -> Result<TermId> {
        match self.peek() {
            TokenKind::Iri(_) | TokenKind::PrefixedName { .. } => self.iri(),
            TokenKind::BlankNodeLabel(_) | TokenKind::Anon => self.blank_node(),
            TokenKind::LBracket => self.blank_node_property_list(),
            TokenKind::LParen | TokenKind::Nil => self.collection(),
            _ => self.literal(),
        }
    }

    fn blank_node_property_list(&mut self) -> Result<TermId> {
        self.expect(&TokenKind::LBracket)?;
        let node = self.sink.term_blank(None);
        self.predicate_object_list(node)?;
        self.expect(&TokenKind::RBracket)?;
        Ok(node)
    }

    /// `( ... )` as an `rdf:first`/`rdf:rest` chain; `()` is `rdf:nil`
    fn collection(&mut self) -> Result<TermId> {
        if self.eat(&TokenKind::Nil) {
            return Ok(self.sink.term_iri(rdf::NIL));
        }
        self.expect(&TokenKind::LParen)?;

        let mut items = Vec::new();
        while !self.eat(&TokenKind::RParen) {
            if self.peek() == &TokenKind::Eof {
                return Err(self.unexpected("')'"));
            }
            items.push(self.object()?);
        }

        let first = self.sink.term_iri(rdf::FIRST);
        let rest = self.sink.term_iri(rdf::REST);
        let mut tail = self.sink.term_iri(rdf::NIL);
        for item in items.into_iter().rev() {
            let cell = self.sink.term_blank(None);
            self.sink.emit_triple(cell, first, item);
            self.sink.emit_triple(cell, rest, tail);
            tail = cell;
        }
        Ok(tail)
    }

    fn literal(&mut self) -> Result<TermId> {
        let id = match self.bump() {
            TokenKind::String(value) => match self.peek().clone() {
                TokenKind::LangTag(tag) => {
                    self.bump();
                    self.sink.term_literal(
                        &value,
                        Datatype::rdf_lang_string(),
                        Some(tag.to_ascii_lowercase().as_str()),
                    )
                }
                TokenKind::DoubleCaret => {
                    self.bump();
                    let datatype = self.datatype_iri()?;
                    self.sink.term_literal(&value, Datatype::from_iri(datatype), None)
                }
                _ => self.sink.term_literal(&value, Datatype::xsd_string(), None),
            },
            TokenKind::Integer(n) => self
                .sink
                .term_literal_value(LiteralValue::Integer(n), Datatype::xsd_integer()),
            TokenKind::Decimal(text) => self.sink.term_literal(&text, Datatype::xsd_decimal(), None),
            TokenKind::Double(d) => self
                .sink
                .term_literal_value(LiteralValue::Double(d), Datatype::xsd_double()),
            TokenKind::True => self
                .sink
                .term_literal_value(LiteralValue::Boolean(true), Datatype::xsd_boolean()),
            TokenKind::False => self
                .sink
                .term_literal_value(LiteralValue::Boolean(false), Datatype::xsd_boolean()),
            other => {
                self.unbump(&other);
                return Err(self.unexpected("an object"));
            }
        };
        Ok(id)
    }

    fn datatype_iri(&mut self) -> Result<String> {
        match self.bump() {
            TokenKind::Iri(raw) => Ok(self.resolve(&raw)),
            TokenKind::PrefixedName { prefix, local } => self
                .prefixes
                .get(&*prefix)
                .map(|ns| format!("{ns}{local}"))
                .ok_or_else(|| TurtleError::UndefinedPrefix(prefix.to_string())),
            other => {
                self.unbump(&other);
                Err(self.unexpected("a datatype IRI"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tabcube_graph_ir::{Graph, GraphCollectorSink, Term};

    fn graph(input: &str, base: Option<&str>) -> Graph {
        let mut sink = GraphCollectorSink::new();
        parse(input, base, &mut sink).unwrap();
        sink.finish()
    }

    #[test]
    fn prefixes_and_type_shorthand() {
        let g = graph(
            r#"
            @prefix qb: <http://purl.org/linked-data/cube#> .
            @prefix ex: <http://example.org/> .
            ex:ds a qb:DataSet ;
                qb:structure ex:dsd .
            "#,
            None,
        );
        assert_eq!(g.len(), 2);
        let first = g.iter().next().unwrap();
        assert_eq!(first.p, Term::iri(rdf::TYPE));
        assert_eq!(first.o, Term::iri("http://purl.org/linked-data/cube#DataSet"));
        assert_eq!(g.prefixes["qb"], "http://purl.org/linked-data/cube#");
    }

    #[test]
    fn relative_iris_use_document_location() {
        let g = graph(
            "<#scheme> <http://rdfs.org/ns/void#dataDump> <codes.csv> .",
            Some("file:///data/lists/region.ttl"),
        );
        let t = g.iter().next().unwrap();
        assert_eq!(t.s, Term::iri("file:///data/lists/region.ttl#scheme"));
        assert_eq!(t.o, Term::iri("file:///data/lists/codes.csv"));
    }

    #[test]
    fn base_directive_overrides_location() {
        let g = graph(
            "@base <http://example.org/a/> . <b> <p> <../c> .",
            Some("file:///x.ttl"),
        );
        let t = g.iter().next().unwrap();
        assert_eq!(t.s, Term::iri("http://example.org/a/b"));
        assert_eq!(t.o, Term::iri("http://example.org/c"));
    }

    #[test]
    fn literals_and_object_lists() {
        let g = graph(
            r#"
            PREFIX ex: <http://example.org/>
            PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>
            ex:s ex:label "Area"@EN, "Ardal"@cy ;
                 ex:count 3 ;
                 ex:ratio 0.25 ;
                 ex:flag false ;
                 ex:issued "2024-01-01"^^xsd:date ;
                 .
            "#,
            None,
        );
        let objects: Vec<&Term> = g.iter().map(|t| &t.o).collect();
        assert_eq!(
            objects,
            vec![
                &Term::lang_string("Area", "en"),
                &Term::lang_string("Ardal", "cy"),
                &Term::integer(3),
                &Term::typed("0.25", Datatype::xsd_decimal()),
                &Term::boolean(false),
                &Term::typed("2024-01-01", Datatype::from_iri("http://www.w3.org/2001/XMLSchema#date")),
            ]
        );
    }

    #[test]
    fn nested_blank_nodes() {
        let g = graph(
            r#"
            @prefix qb: <http://purl.org/linked-data/cube#> .
            <http://example.org/dsd> qb:component [ qb:dimension <http://example.org/area> ],
                                                  [ qb:measure <http://example.org/count> ] .
            "#,
            None,
        );
        assert_eq!(g.len(), 4);
        let components: Vec<&Term> = g
            .iter()
            .filter(|t| t.p == Term::iri("http://purl.org/linked-data/cube#component"))
            .map(|t| &t.o)
            .collect();
        assert_eq!(components.len(), 2);
        assert!(components.iter().all(|c| c.is_blank()));
        assert_ne!(components[0], components[1]);
    }

    #[test]
    fn collections_become_first_rest_chains() {
        let g = graph("<http://e/s> <http://e/p> ( 1 2 ) .", None);
        let firsts = g.iter().filter(|t| t.p == Term::iri(rdf::FIRST)).count();
        let nils = g.iter().filter(|t| t.o == Term::iri(rdf::NIL)).count();
        assert_eq!(firsts, 2);
        assert_eq!(nils, 1);
        assert_eq!(g.len(), 5);
    }

    #[test]
    fn undefined_prefix_is_an_error() {
        let mut sink = GraphCollectorSink::new();
        let err = parse("ex:a ex:b ex:c .", None, &mut sink).unwrap_err();
        assert!(matches!(err, TurtleError::UndefinedPrefix(p) if p == "ex"));
    }

    #[test]
    fn missing_dot_reports_position() {
        let mut sink = GraphCollectorSink::new();
        let err = parse("<http://e/s> <http://e/p> <http://e/o>\n<http://e/t> <http://e/p> 1 .", None, &mut sink)
            .unwrap_err();
        match err {
            TurtleError::Syntax { line, column, .. } => assert_eq!((line, column), (2, 1)),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
