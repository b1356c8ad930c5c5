//! The bootstrap grammar parser: a hand-built grammar that reads OMeta
//! source text into a syntax tree, using only the engine's primitives.
//!
//! Both surface dialects are recognized:
//!
//! * classic: `name :arg ::= body`, application `<rule arg>`, rule value
//!   `=> expr`;
//! * OMeta2: `name :arg = body`, application `rule(arg)`, rule value
//!   `-> expr`, character ranges `'a'-'z'`.
//!
//! Common to both: `'x'` single-quoted character items (with escapes),
//! `"…"` strings matching a whole string item, integer literals (decimal,
//! hex `0x…`, octal `0…`, negative), `*` `+` `?` `|` `~` `~~` `[…]` `(…)`
//! `:name` bindings, `?(…)` predicates, `!(…)` actions, and `# …` comments.
//!
//! The self-hosted grammars in [`crate::grammar`] re-express this parser in
//! OMeta itself; anything consuming input here has to line up with them so
//! both produce identical trees.

use crate::ast::{self, Node, Snippet};
use crate::builder::TreeBuilder;
use crate::codegen::Grammar;
use crate::error::{Expectation, MatchError, ParseError};
use crate::matcher::{step, Match, MatchResult, Matcher, OMeta};
use crate::stream::Stream;
use crate::value::Value;

/// Which grammar surface syntax to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
    /// Classic: `::=` headers, `<rule arg>` applications, `=>` rule values.
    V1,
    /// OMeta2: `=` headers, `rule(arg)` applications, `->` rule values.
    V2,
}

/// Parse OMeta source into a grammar syntax tree, constructing nodes
/// through `builder`.
pub fn parse_grammar(
    source: &str,
    dialect: Dialect,
    name: &str,
    builder: &mut dyn TreeBuilder,
) -> Result<ast::Grammar, ParseError> {
    let mut parser = BootParser {
        m: Matcher::new(Grammar::core(), Stream::from_str(source)),
        builder,
        dialect,
    };
    match parser.grammar(name) {
        Ok((grammar, _)) => Ok(grammar),
        Err(MatchError::Parse(e)) => Err(e),
        Err(MatchError::Host(e)) => {
            unreachable!("the bootstrap parser evaluates no host expressions: {e}")
        }
    }
}

/// Escapes accepted inside character and string literals.
pub(crate) fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'b' => '\u{0008}',
        'f' => '\u{000C}',
        other => other,
    }
}

struct BootParser<'b> {
    m: Matcher,
    builder: &'b mut dyn TreeBuilder,
    dialect: Dialect,
}

impl OMeta for BootParser<'_> {
    fn matcher(&mut self) -> &mut Matcher {
        &mut self.m
    }
}

impl BootParser<'_> {
    fn here(&self) -> ParseError {
        ParseError::at(self.m.input.position())
    }

    fn ch(&mut self, c: char) -> Match {
        self.m.exactly(&Value::Char(c))
    }

    fn any_char(&mut self) -> MatchResult<char> {
        let pos = self.m.input.position();
        match self.m.input.head() {
            Ok(Value::Char(c)) => {
                self.m.input = self.m.input.tail();
                Ok((c, ParseError::at(pos)))
            }
            _ => Err(ParseError::at(pos).into()),
        }
    }

    fn class_char(&mut self, kind: &str, accept: impl Fn(char) -> bool) -> MatchResult<char> {
        let pos = self.m.input.position();
        match self.m.input.head() {
            Ok(Value::Char(c)) if accept(c) => {
                self.m.input = self.m.input.tail();
                Ok((c, ParseError::at(pos)))
            }
            _ => Err(ParseError::expected(pos, Expectation::named(kind)).into()),
        }
    }

    /// Whitespace and `# …` comments.
    fn spaces(&mut self) -> MatchResult<()> {
        loop {
            match self.m.input.head() {
                Ok(Value::Char(c)) if c.is_whitespace() => {
                    self.m.input = self.m.input.tail();
                }
                Ok(Value::Char('#')) => {
                    self.m.input = self.m.input.tail();
                    while let Ok(Value::Char(c)) = self.m.input.head() {
                        if c == '\n' {
                            break;
                        }
                        self.m.input = self.m.input.tail();
                    }
                }
                _ => break,
            }
        }
        Ok(((), self.here()))
    }

    fn tok(&mut self, text: &str) -> MatchResult<()> {
        let saved = self.m.input.clone();
        let mut failure = self.here();
        step(&mut failure, self.spaces())?;
        for c in text.chars() {
            match self.ch(c) {
                Ok(_) => {}
                Err(MatchError::Parse(e)) => {
                    let position = e.position();
                    self.m.input = saved;
                    return Err(
                        ParseError::expected(position, Expectation::token(text)).into()
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(((), self.here()))
    }

    fn name(&mut self) -> MatchResult<String> {
        let mut failure = self.here();
        let first = step(&mut failure, self.class_char("letter", char::is_alphabetic))?;
        let rest = step(
            &mut failure,
            self.many(|p| p.class_char("letter or digit", |c| c.is_alphanumeric() || c == '_')),
        )?;
        let mut name = String::new();
        name.push(first);
        name.extend(rest);
        Ok((name, failure))
    }

    fn end(&mut self) -> MatchResult<()> {
        let pos = self.m.input.position();
        match self.m.input.head() {
            Ok(_) => Err(ParseError::at(pos).into()),
            Err(_) => Ok(((), ParseError::at(pos))),
        }
    }

    fn grammar(&mut self, name: &str) -> MatchResult<ast::Grammar> {
        let mut failure = self.here();
        let rules = step(&mut failure, self.many(|p| p.rule()))?;
        step(&mut failure, self.spaces())?;
        step(&mut failure, self.end())?;
        Ok((self.builder.make_grammar(name, rules), failure))
    }

    fn rule(&mut self) -> MatchResult<(String, Node)> {
        let mut failure = self.here();
        step(&mut failure, self.spaces())?;
        let name = step(&mut failure, self.lookahead(|p| p.name()))?;
        let first = step(&mut failure, self.rule_part(&name))?;
        let more = step(&mut failure, self.many(|p| p.rule_part(name.as_str())))?;
        let body = if more.is_empty() {
            first
        } else {
            let mut alts = Vec::with_capacity(more.len() + 1);
            alts.push(first);
            alts.extend(more);
            self.builder.or_(alts)
        };
        Ok(((name, body), failure))
    }

    fn rule_part(&mut self, required: &str) -> MatchResult<Node> {
        let mut failure = self.here();
        step(&mut failure, self.spaces())?;
        let pos = self.m.input.position();
        let name = step(&mut failure, self.name())?;
        if name != required {
            return Err(MatchError::Parse(failure.merge(ParseError::at(pos))));
        }
        let params = step(&mut failure, self.arg_pattern())?;
        let eq = match self.dialect {
            Dialect::V1 => "::=",
            Dialect::V2 => "=",
        };
        let body = step(
            &mut failure,
            self.optional(|p| {
                let mut f = p.here();
                step(&mut f, p.tok(eq))?;
                let e = step(&mut f, p.expr())?;
                Ok((e, f))
            }),
        )?;
        let node = match body {
            Some(e) => self.builder.seq(vec![params, e]),
            None => params,
        };
        Ok((node, failure))
    }

    /// Everything between a rule's name and its `::=`/`=`: literal patterns
    /// and bindings that consume from the argument stream.
    fn arg_pattern(&mut self) -> MatchResult<Node> {
        let (terms, failure) = self.many(|p| p.expr3())?;
        let terms = terms
            .into_iter()
            .map(|t| match &*t {
                ast::Expr::Literal(v) => self.builder.arg_literal(v.clone()),
                _ => t,
            })
            .collect();
        Ok((self.builder.seq(terms), failure))
    }

    fn expr(&mut self) -> MatchResult<Node> {
        let mut failure = self.here();
        let first = step(&mut failure, self.expr4())?;
        let rest = step(
            &mut failure,
            self.many(|p| {
                let mut f = p.here();
                step(&mut f, p.tok("|"))?;
                let e = step(&mut f, p.expr4())?;
                Ok((e, f))
            }),
        )?;
        let mut alts = Vec::with_capacity(rest.len() + 1);
        alts.push(first);
        alts.extend(rest);
        Ok((self.builder.or_(alts), failure))
    }

    fn expr4(&mut self) -> MatchResult<Node> {
        let (terms, failure) = self.many(|p| p.expr3())?;
        Ok((self.builder.seq(terms), failure))
    }

    fn expr3(&mut self) -> MatchResult<Node> {
        self.or_(&mut [
            &mut |p: &mut Self| {
                let mut failure = p.here();
                let e = step(&mut failure, p.expr2())?;
                let repeated = step(
                    &mut failure,
                    p.or_(&mut [
                        &mut |q: &mut Self| {
                            let (_, f) = q.ch('*')?;
                            Ok((q.builder.many(e.clone()), f))
                        },
                        &mut |q: &mut Self| {
                            let (_, f) = q.ch('+')?;
                            Ok((q.builder.many1(e.clone()), f))
                        },
                        &mut |q: &mut Self| {
                            let (_, f) = q.ch('?')?;
                            Ok((q.builder.optional(e.clone()), f))
                        },
                        &mut |q: &mut Self| Ok((e.clone(), q.here())),
                    ]),
                )?;
                let bound = step(
                    &mut failure,
                    p.optional(|q| {
                        let mut f = q.here();
                        step(&mut f, q.ch(':'))?;
                        let n = step(&mut f, q.name())?;
                        Ok((n, f))
                    }),
                )?;
                let node = match bound {
                    Some(n) => p.builder.bind(&n, repeated),
                    None => repeated,
                };
                Ok((node, failure))
            },
            &mut |p: &mut Self| {
                let mut failure = p.here();
                step(&mut failure, p.tok(":"))?;
                let n = step(&mut failure, p.name())?;
                let anything = p.builder.apply("anything", vec![]);
                Ok((p.builder.bind(&n, anything), failure))
            },
        ])
    }

    fn expr2(&mut self) -> MatchResult<Node> {
        self.or_(&mut [
            &mut |p: &mut Self| {
                let mut failure = p.here();
                step(&mut failure, p.tok("~"))?;
                let node = step(
                    &mut failure,
                    p.or_(&mut [
                        &mut |q: &mut Self| {
                            let mut f = q.here();
                            step(&mut f, q.tok("~"))?;
                            let e = step(&mut f, q.expr2())?;
                            Ok((q.builder.lookahead(e), f))
                        },
                        &mut |q: &mut Self| {
                            let mut f = q.here();
                            let e = step(&mut f, q.expr2())?;
                            Ok((q.builder.not_(e), f))
                        },
                    ]),
                )?;
                Ok((node, failure))
            },
            &mut |p: &mut Self| p.expr1(),
        ])
    }

    fn expr1(&mut self) -> MatchResult<Node> {
        self.or_(&mut [
            &mut |p: &mut Self| p.application(),
            &mut |p: &mut Self| p.rule_value(),
            &mut |p: &mut Self| p.semantic_predicate(),
            &mut |p: &mut Self| p.semantic_action(),
            &mut |p: &mut Self| p.number(),
            &mut |p: &mut Self| p.character(),
            &mut |p: &mut Self| p.string_literal(),
            &mut |p: &mut Self| {
                let mut f = p.here();
                step(&mut f, p.tok("("))?;
                let e = step(&mut f, p.expr())?;
                step(&mut f, p.tok(")"))?;
                Ok((e, f))
            },
            &mut |p: &mut Self| {
                let mut f = p.here();
                step(&mut f, p.tok("["))?;
                let e = step(&mut f, p.expr())?;
                step(&mut f, p.tok("]"))?;
                Ok((p.builder.list_pattern(e), f))
            },
        ])
    }

    fn application(&mut self) -> MatchResult<Node> {
        match self.dialect {
            Dialect::V1 => self.application_v1(),
            Dialect::V2 => self.application_v2(),
        }
    }

    fn application_v1(&mut self) -> MatchResult<Node> {
        let mut failure = self.here();
        step(&mut failure, self.tok("<"))?;
        step(&mut failure, self.spaces())?;
        let name = step(&mut failure, self.name())?;
        let node = step(
            &mut failure,
            self.or_(&mut [
                &mut |p: &mut Self| {
                    let mut f = p.here();
                    step(&mut f, p.ch(' '))?;
                    let args = step(&mut f, p.application_args(" >", '>'))?;
                    Ok((p.builder.apply(&name, args), f))
                },
                &mut |p: &mut Self| {
                    let mut f = p.here();
                    step(&mut f, p.tok(">"))?;
                    Ok((p.builder.apply(&name, vec![]), f))
                },
            ]),
        )?;
        Ok((node, failure))
    }

    fn application_v2(&mut self) -> MatchResult<Node> {
        let mut failure = self.here();
        step(&mut failure, self.spaces())?;
        let name = step(&mut failure, self.name())?;
        // A name followed by argument patterns and `=` is the next rule's
        // header, not an application.
        step(&mut failure, self.not_(|p| p.rule_header_tail()))?;
        let args = step(
            &mut failure,
            self.optional(|p| {
                let mut f = p.here();
                step(&mut f, p.ch('('))?;
                let args = step(&mut f, p.application_args(",)", ')'))?;
                Ok((args, f))
            }),
        )?;
        Ok((
            self.builder.apply(&name, args.unwrap_or_default()),
            failure,
        ))
    }

    fn rule_header_tail(&mut self) -> MatchResult<()> {
        let mut failure = self.here();
        step(&mut failure, self.many(|p| p.header_param()))?;
        step(&mut failure, self.spaces())?;
        step(&mut failure, self.ch('='))?;
        Ok(((), failure))
    }

    fn header_param(&mut self) -> MatchResult<()> {
        let ((), failure) = self.or_(&mut [
            &mut |p: &mut Self| {
                let mut f = p.here();
                step(&mut f, p.tok(":"))?;
                step(&mut f, p.name())?;
                Ok(((), f))
            },
            &mut |p: &mut Self| {
                let mut f = p.here();
                step(&mut f, p.number())?;
                Ok(((), f))
            },
            &mut |p: &mut Self| {
                let mut f = p.here();
                step(&mut f, p.character())?;
                Ok(((), f))
            },
            &mut |p: &mut Self| {
                let mut f = p.here();
                step(&mut f, p.string_literal())?;
                Ok(((), f))
            },
        ])?;
        Ok(((), failure))
    }

    /// Host expressions separated by the first stop character, closed by
    /// `close` (consumed).
    fn application_args(&mut self, stops: &str, close: char) -> MatchResult<Vec<Snippet>> {
        let mut args = Vec::new();
        loop {
            let (snippet, end) = self.m.host_expr(stops)?;
            if !snippet.source.is_empty() {
                args.push(snippet);
            }
            match end {
                Some(c) if c == close => break,
                Some(_) => continue,
                None => return Err(self.here().into()),
            }
        }
        Ok((args, self.here()))
    }

    fn rule_value(&mut self) -> MatchResult<Node> {
        let arrow = match self.dialect {
            Dialect::V1 => "=>",
            Dialect::V2 => "->",
        };
        let mut failure = self.here();
        step(&mut failure, self.tok(arrow))?;
        let snippet = step(&mut failure, self.rule_value_snippet())?;
        Ok((self.builder.rule_value(snippet), failure))
    }

    /// Read the host expression after a rule-value arrow. It runs to end of
    /// line, or to an unbalanced `)` closing the surrounding group, which is
    /// pushed back for the group parser.
    fn rule_value_snippet(&mut self) -> MatchResult<Snippet> {
        let (snippet, end) = self.m.host_expr(")\r\n")?;
        if end == Some(')') {
            self.m.input = self.m.input.prev();
        }
        if snippet.source.is_empty() {
            return Err(ParseError::at(snippet.offset).into());
        }
        Ok((snippet, self.here()))
    }

    fn semantic_predicate(&mut self) -> MatchResult<Node> {
        let mut failure = self.here();
        step(&mut failure, self.tok("?("))?;
        let snippet = step(&mut failure, self.host_parenthesized())?;
        Ok((self.builder.pred(snippet), failure))
    }

    fn semantic_action(&mut self) -> MatchResult<Node> {
        let mut failure = self.here();
        step(&mut failure, self.tok("!("))?;
        let snippet = step(&mut failure, self.host_parenthesized())?;
        Ok((self.builder.action(snippet), failure))
    }

    fn host_parenthesized(&mut self) -> MatchResult<Snippet> {
        let (snippet, end) = self.m.host_expr(")")?;
        if end != Some(')') {
            return Err(self.here().into());
        }
        Ok((snippet, self.here()))
    }

    fn number(&mut self) -> MatchResult<Node> {
        let mut failure = self.here();
        step(&mut failure, self.spaces())?;
        let minus = step(&mut failure, self.optional(|p| p.ch('-')))?;
        let n = step(&mut failure, self.bare_number())?;
        let n = if minus.is_some() { -n } else { n };
        Ok((self.builder.exactly(Value::Int(n)), failure))
    }

    fn bare_number(&mut self) -> MatchResult<i64> {
        self.or_(&mut [
            &mut |p: &mut Self| {
                let mut failure = p.here();
                step(&mut failure, p.ch('0'))?;
                let n = step(
                    &mut failure,
                    p.or_(&mut [
                        &mut |q: &mut Self| {
                            let mut f = q.here();
                            step(
                                &mut f,
                                q.or_(&mut [
                                    &mut |r: &mut Self| r.ch('x'),
                                    &mut |r: &mut Self| r.ch('X'),
                                ]),
                            )?;
                            let digits = step(
                                &mut f,
                                q.many1(|r| {
                                    r.class_char("hex digit", |c| c.is_ascii_hexdigit())
                                }),
                            )?;
                            let text: String = digits.into_iter().collect();
                            let pos = q.m.input.position();
                            let n = i64::from_str_radix(&text, 16)
                                .map_err(|_| MatchError::Parse(ParseError::at(pos)))?;
                            Ok((n, f))
                        },
                        &mut |q: &mut Self| {
                            let mut f = q.here();
                            let digits = step(
                                &mut f,
                                q.many(|r| {
                                    r.class_char("octal digit", |c| ('0'..='7').contains(&c))
                                }),
                            )?;
                            let text: String = digits.into_iter().collect();
                            let pos = q.m.input.position();
                            let n = if text.is_empty() {
                                0
                            } else {
                                i64::from_str_radix(&text, 8)
                                    .map_err(|_| MatchError::Parse(ParseError::at(pos)))?
                            };
                            Ok((n, f))
                        },
                    ]),
                )?;
                Ok((n, failure))
            },
            &mut |p: &mut Self| {
                let mut failure = p.here();
                let digits = step(
                    &mut failure,
                    p.many1(|q| q.class_char("digit", |c| c.is_ascii_digit())),
                )?;
                let text: String = digits.into_iter().collect();
                let pos = p.m.input.position();
                let n = text
                    .parse::<i64>()
                    .map_err(|_| MatchError::Parse(ParseError::at(pos)))?;
                Ok((n, failure))
            },
        ])
    }

    fn char_inner(&mut self) -> MatchResult<char> {
        self.or_(&mut [
            &mut |p: &mut Self| {
                let mut f = p.here();
                step(&mut f, p.ch('\\'))?;
                let c = step(&mut f, p.any_char())?;
                Ok((unescape(c), f))
            },
            &mut |p: &mut Self| p.any_char(),
        ])
    }

    fn character(&mut self) -> MatchResult<Node> {
        let mut failure = self.here();
        step(&mut failure, self.tok("'"))?;
        let c = step(&mut failure, self.char_inner())?;
        step(&mut failure, self.tok("'"))?;
        if self.dialect == Dialect::V2 {
            let hi = step(
                &mut failure,
                self.optional(|p| {
                    let mut f = p.here();
                    step(&mut f, p.ch('-'))?;
                    step(&mut f, p.tok("'"))?;
                    let c2 = step(&mut f, p.char_inner())?;
                    step(&mut f, p.tok("'"))?;
                    Ok((c2, f))
                }),
            )?;
            if let Some(hi) = hi {
                return Ok((
                    self.builder.range(Value::Char(c), Value::Char(hi)),
                    failure,
                ));
            }
        }
        Ok((self.builder.exactly(Value::Char(c)), failure))
    }

    fn string_literal(&mut self) -> MatchResult<Node> {
        let mut failure = self.here();
        step(&mut failure, self.tok("\""))?;
        let chars = step(&mut failure, self.many(|p| p.string_char()))?;
        step(&mut failure, self.ch('"'))?;
        let text: String = chars.into_iter().collect();
        Ok((self.builder.exactly(Value::Str(text)), failure))
    }

    fn string_char(&mut self) -> MatchResult<char> {
        self.or_(&mut [
            &mut |p: &mut Self| {
                let mut f = p.here();
                step(&mut f, p.ch('\\'))?;
                let c = step(&mut f, p.any_char())?;
                Ok((unescape(c), f))
            },
            &mut |p: &mut Self| {
                let mut f = p.here();
                step(&mut f, p.not_(|q| q.ch('"')))?;
                let c = step(&mut f, p.any_char())?;
                Ok((c, f))
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;
    use crate::builder::AstBuilder;

    fn parse(source: &str, dialect: Dialect) -> ast::Grammar {
        parse_grammar(source, dialect, "TestGrammar", &mut AstBuilder)
            .expect("grammar should parse")
    }

    fn rule_body<'g>(grammar: &'g ast::Grammar, name: &str) -> &'g Node {
        &grammar
            .rules
            .iter()
            .find(|r| r.name == name)
            .unwrap_or_else(|| panic!("no rule {name}"))
            .body
    }

    #[test]
    fn literal_rule() {
        let g = parse("digit ::= '1'", Dialect::V1);
        assert_eq!(g.rules.len(), 1);
        // Body shape: Seq[Seq[params], Or[Seq[Literal]]].
        let body = rule_body(&g, "digit");
        let Expr::Seq(parts) = &**body else {
            panic!("expected a sequence, got {body:?}")
        };
        assert_eq!(&*parts[0], &Expr::Seq(vec![]));
        let Expr::Or(alts) = &*parts[1] else {
            panic!("expected a choice")
        };
        let Expr::Seq(terms) = &*alts[0] else {
            panic!("expected a sequence")
        };
        assert_eq!(&*terms[0], &Expr::Literal(Value::Char('1')));
    }

    #[test]
    fn number_forms() {
        let g = parse("stuff ::= 17 0x1F -2 0177", Dialect::V1);
        let body = format!("{:?}", rule_body(&g, "stuff"));
        for expected in ["17", "31", "-2", "127"] {
            assert!(body.contains(expected), "{expected} missing in {body}");
        }
    }

    #[test]
    fn applications_with_arguments() {
        let g = parse("baz ::= <digit>:a <foo a none>:b => [a, b]", Dialect::V1);
        let body = format!("{:?}", rule_body(&g, "baz"));
        assert!(body.contains("foo"));
        assert!(body.contains("none"));
    }

    #[test]
    fn consecutive_definitions_merge_into_a_choice() {
        let g = parse(
            "fact 0 => 1\n             fact :n ::= <fact (n - 1)>:m => n * m",
            Dialect::V1,
        );
        assert_eq!(g.rules.len(), 1);
        let Expr::Or(alts) = &**rule_body(&g, "fact") else {
            panic!("merged rule should be a choice")
        };
        assert_eq!(alts.len(), 2);
    }

    #[test]
    fn argument_literals_are_marked() {
        let g = parse("fact 0 => 1", Dialect::V1);
        let body = format!("{:?}", rule_body(&g, "fact"));
        assert!(body.contains("ArgLiteral"), "{body}");
    }

    #[test]
    fn modern_dialect_applications_are_bare_names() {
        let g = parse("bits = digit+\ndigit = '0' | '1'", Dialect::V2);
        assert_eq!(g.rules.len(), 2);
        let body = format!("{:?}", rule_body(&g, "bits"));
        assert!(body.contains("Many1"));
        assert!(body.contains("digit"));
    }

    #[test]
    fn modern_dialect_ranges() {
        let g = parse("lower = 'a'-'z'", Dialect::V2);
        let body = format!("{:?}", rule_body(&g, "lower"));
        assert!(body.contains("Range"), "{body}");
    }

    #[test]
    fn comments_are_skipped() {
        let g = parse(
            "#comment here\ndigit ::= ( '0' #second comment\n | '1') #another one\nbits ::= <digit>+   #last one",
            Dialect::V1,
        );
        assert_eq!(g.rules.len(), 2);
    }

    #[test]
    fn unterminated_character_literal_fails() {
        let err = parse_grammar(
            "andHandler ::= <handler>:h1 'and' <handler>:h2 => h1",
            Dialect::V1,
            "TestGrammar",
            &mut AstBuilder,
        )
        .expect_err("`'and'` is not a character literal");
        assert_eq!(err.expectations(), &[Expectation::token("'")]);
    }
}
