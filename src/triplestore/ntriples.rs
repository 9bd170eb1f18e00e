//! N-Triples reader
//!
//! N-Triples is a line-oriented RDF serialization where every non-blank,
//! non-comment line holds one `<subject> <predicate> <object> .` statement.

use super::{Term, Triple};
use crate::Result;
use anyhow::{bail, ensure, Context};

/// Parse an N-Triples document
///
/// Parsing is all-or-nothing: the first malformed line fails the whole
/// document, and the error mentions its line number.
pub fn parse(document: &str) -> Result<Vec<Triple>> {
    let mut triples = Vec::new();
    for (idx, line) in document.lines().enumerate() {
        if let Some(triple) = parse_line(line).with_context(|| format!("at line {}", idx + 1))? {
            triples.push(triple);
        }
    }
    Ok(triples)
}

/// Parse a single line, which may legitimately hold no statement
fn parse_line(line: &str) -> Result<Option<Triple>> {
    let mut cursor = Cursor(line);
    cursor.skip_whitespace();
    if cursor.is_done() || cursor.peek() == Some('#') {
        return Ok(None);
    }

    let subject = match cursor.peek() {
        Some('<') => Term::Iri(cursor.iri()?),
        Some('_') => Term::Blank(cursor.blank_node()?),
        _ => bail!("expected an IRI or blank node as subject"),
    };
    cursor.skip_whitespace();
    let predicate = cursor.iri().context("parsing predicate")?;
    cursor.skip_whitespace();
    let object = match cursor.peek() {
        Some('<') => Term::Iri(cursor.iri()?),
        Some('_') => Term::Blank(cursor.blank_node()?),
        Some('"') => cursor.literal()?,
        _ => bail!("expected an IRI, blank node or literal as object"),
    };
    cursor.skip_whitespace();
    ensure!(cursor.eat('.'), "expected `.` at the end of the statement");
    cursor.skip_whitespace();
    ensure!(
        cursor.is_done() || cursor.peek() == Some('#'),
        "unexpected trailing content {:?}",
        cursor.0
    );
    Ok(Some(Triple {
        subject,
        predicate,
        object,
    }))
}

/// Remaining unparsed part of a line
struct Cursor<'line>(&'line str);
//
impl Cursor<'_> {
    /// Truth that the whole line was consumed
    fn is_done(&self) -> bool {
        self.0.is_empty()
    }

    /// Next character, if any
    fn peek(&self) -> Option<char> {
        self.0.chars().next()
    }

    /// Consume the next character
    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.0 = &self.0[c.len_utf8()..];
        Some(c)
    }

    /// Consume the next character if it is `expected`
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.next();
            true
        } else {
            false
        }
    }

    /// Consume spaces and tabs
    fn skip_whitespace(&mut self) {
        self.0 = self.0.trim_start_matches([' ', '\t', '\r']);
    }

    /// Consume an `<iri>`, return the IRI without brackets
    fn iri(&mut self) -> Result<Box<str>> {
        ensure!(self.eat('<'), "expected `<` at the start of an IRI");
        let Some(end) = self.0.find('>') else {
            bail!("unterminated IRI");
        };
        let iri = &self.0[..end];
        ensure!(
            !iri.contains(char::is_whitespace),
            "IRI {iri:?} contains whitespace"
        );
        self.0 = &self.0[end + 1..];
        Ok(unescape(iri)?.into())
    }

    /// Consume a `_:label` blank node, return its label
    fn blank_node(&mut self) -> Result<Box<str>> {
        ensure!(self.0.starts_with("_:"), "expected `_:` at the start of a blank node");
        self.0 = &self.0[2..];
        let len = self
            .0
            .find(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.')))
            .unwrap_or(self.0.len());
        // Labels may contain dots, but not end with one
        let label = self.0[..len].trim_end_matches('.');
        ensure!(!label.is_empty(), "empty blank node label");
        self.0 = &self.0[label.len()..];
        Ok(label.into())
    }

    /// Consume a `"literal"` with optional language tag or datatype
    fn literal(&mut self) -> Result<Term> {
        ensure!(self.eat('"'), "expected `\"` at the start of a literal");
        let mut end = None;
        let mut escaped = false;
        for (idx, c) in self.0.char_indices() {
            match (escaped, c) {
                (false, '\\') => escaped = true,
                (false, '"') => {
                    end = Some(idx);
                    break;
                }
                _ => escaped = false,
            }
        }
        let Some(end) = end else {
            bail!("unterminated literal");
        };
        let value = unescape(&self.0[..end])?.into();
        self.0 = &self.0[end + 1..];

        let mut language = None;
        let mut datatype = None;
        if self.eat('@') {
            let len = self
                .0
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
                .unwrap_or(self.0.len());
            ensure!(len > 0, "empty language tag");
            language = Some(self.0[..len].into());
            self.0 = &self.0[len..];
        } else if self.0.starts_with("^^") {
            self.0 = &self.0[2..];
            datatype = Some(self.iri().context("parsing literal datatype")?);
        }
        Ok(Term::Literal {
            value,
            language,
            datatype,
        })
    }
}

/// Resolve the escape sequences of a literal or IRI
fn unescape(escaped: &str) -> Result<String> {
    if !escaped.contains('\\') {
        return Ok(escaped.to_owned());
    }
    let mut result = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        let unescaped = match chars.next() {
            Some('t') => '\t',
            Some('b') => '\u{8}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('f') => '\u{c}',
            Some('"') => '"',
            Some('\'') => '\'',
            Some('\\') => '\\',
            Some(u @ ('u' | 'U')) => {
                let digits = if u == 'u' { 4 } else { 8 };
                let hex = chars.by_ref().take(digits).collect::<String>();
                ensure!(hex.len() == digits, "truncated \\{u} escape");
                let code = u32::from_str_radix(&hex, 16)
                    .with_context(|| format!("invalid \\{u} escape {hex:?}"))?;
                char::from_u32(code)
                    .with_context(|| format!("\\{u}{hex} is not a valid character"))?
            }
            Some(other) => bail!("unknown escape sequence \\{other}"),
            None => bail!("dangling escape at end of input"),
        };
        result.push(unescaped);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(s: &str) -> Term {
        Term::Iri(s.into())
    }

    #[test]
    fn iri_triple() {
        let triples = parse(
            "<http://dbpedia.org/resource/Albert_Einstein> <http://dbpedia.org/ontology/individualisedPnd> <http://d-nb.info/gnd/118529579> .\n",
        )
        .unwrap();
        assert_eq!(
            triples,
            [Triple {
                subject: iri("http://dbpedia.org/resource/Albert_Einstein"),
                predicate: "http://dbpedia.org/ontology/individualisedPnd".into(),
                object: iri("http://d-nb.info/gnd/118529579"),
            }]
        );
    }

    #[test]
    fn literals() {
        let triples = parse(concat!(
            "<s> <p> \"118529579\" .\n",
            "<s> <p> \"Einstein\"@de .\n",
            "<s> <p> \"42\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n",
            "<s> <p> \"say \\\"hi\\\"\\n\\u00e4\\U0001F600\" .\n",
        ))
        .unwrap();
        let objects = triples.into_iter().map(|t| t.object).collect::<Vec<_>>();
        assert_eq!(
            objects,
            [
                Term::Literal {
                    value: "118529579".into(),
                    language: None,
                    datatype: None
                },
                Term::Literal {
                    value: "Einstein".into(),
                    language: Some("de".into()),
                    datatype: None
                },
                Term::Literal {
                    value: "42".into(),
                    language: None,
                    datatype: Some("http://www.w3.org/2001/XMLSchema#integer".into())
                },
                Term::Literal {
                    value: "say \"hi\"\n\u{e4}\u{1F600}".into(),
                    language: None,
                    datatype: None
                },
            ]
        );
    }

    #[test]
    fn blank_nodes_comments_and_blank_lines() {
        let triples = parse(concat!(
            "# A comment\n",
            "\n",
            "   \n",
            "_:b0 <p> _:b1.x . # trailing comment\n",
            "_:b2 <p> _:b3.\n",
        ))
        .unwrap();
        assert_eq!(triples.len(), 2);
        assert_eq!(triples[0].subject, Term::Blank("b0".into()));
        assert_eq!(triples[0].object, Term::Blank("b1.x".into()));
        assert_eq!(triples[1].object, Term::Blank("b3".into()));
    }

    #[test]
    fn errors_report_line_numbers() {
        let error = parse("<s> <p> <o> .\n<s> <p> <o>\n").unwrap_err();
        assert!(format!("{error:#}").contains("line 2"));
    }

    #[test]
    fn malformed_statements() {
        for line in [
            "<s> <p> .",
            "\"literal\" <p> <o> .",
            "<s> _:p <o> .",
            "<s> <p> <o",
            "<s> <p> \"open .",
            "<s> <p> <o> . extra",
            "<s> <p> \"bad \\q escape\" .",
            "<s p> <p> <o> .",
        ] {
            assert!(parse(line).is_err(), "{line:?} should be rejected");
        }
    }
}
