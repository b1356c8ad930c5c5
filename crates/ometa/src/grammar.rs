//! Self-hosted grammars: the grammar parser re-expressed in OMeta itself.
//!
//! Compiling one of the sources below through the bootstrap parser and the
//! code generator yields a grammar record that parses the same surface
//! syntax as the bootstrap, including this source. The host expressions in
//! these grammars drive tree construction through the `mk_*` native
//! functions installed in the grammar's globals; the extraction helpers
//! (`application_args`, `rule_value`, …) read embedded host snippets off
//! the session's own input, exactly like the bootstrap does, so both
//! parsers produce structurally identical trees with identical snippet
//! offsets.

use crate::ast::{self, Node, Snippet};
use crate::boot::{self, unescape, Dialect};
use crate::builder::{AstBuilder, TreeBuilder};
use crate::codegen::{Globals, Grammar};
use crate::error::{HostError, MatchError, ParseError};
use crate::hostexpr::native;
use crate::matcher::Matcher;
use crate::stream::Stream;
use crate::value::Value;
use triomphe::Arc;

/// The grammar parser for the classic dialect, in the classic dialect.
pub const OMETA_SOURCE: &str = r##"
comment ::= '#' (~'\n' <anything>)*
spaces ::= (' ' | '\t' | '\r' | '\n' | <comment>)*
name ::= <letter>:x <letterOrDigit>*:xs => join(cons(x, xs))
hexdigit ::= :x ?(is_hexdigit(x)) => x
octaldigit ::= :x ?('0' <= x and x <= '7') => x
barenumber ::= '0' (('x' | 'X') <hexdigit>+:hs => int(join(hs), 16)
                   | <octaldigit>*:ds => int("0" + join(ds), 8))
             | <digit>+:ds => int(join(ds))
number ::= <spaces> ('-' <barenumber>:x => mk_exactly(-x)
                    | <barenumber>:x => mk_exactly(x))
escapedChar ::= '\\' <anything>:c => unescape(c)
character ::= <token "'"> (<escapedChar> | <anything>):c <token "'"> => mk_exactly(c)
string ::= <token "\""> (<escapedChar> | ~'"' <anything>)*:cs '"' => mk_exactly(join(cs))
application ::= <token "<"> <spaces> <name>:n
                 (' ' (=> application_args()):as => mk_apply(n, as)
                 | <token ">"> => mk_apply(n, []))
ruleValue ::= <token "=>"> => rule_value()
semanticPredicate ::= <token "?("> => pred_expr()
semanticAction ::= <token "!("> => action_expr()
expr1 ::= <application>
        | <ruleValue>
        | <semanticPredicate>
        | <semanticAction>
        | <number>
        | <character>
        | <string>
        | <token "("> <expr>:e <token ")"> => e
        | <token "["> <expr>:e <token "]"> => mk_listpattern(e)
expr2 ::= <token "~"> (<token "~"> <expr2>:e => mk_lookahead(e)
                      | <expr2>:e => mk_not(e))
        | <expr1>
expr3 ::= <expr2>:e ('*' => mk_many(e)
                    | '+' => mk_many1(e)
                    | '?' => mk_optional(e)
                    | => e):r
          (':' <name>:n => mk_bind(n, r)
          | => r)
        | <token ":"> <name>:n => mk_bind(n, mk_apply("anything", []))
expr4 ::= <expr3>*:es => mk_seq(es)
expr ::= <expr4>:e (<token "|"> <expr4>)*:es => mk_or(cons(e, es))
argPattern ::= <expr4>:e => as_params(e)
rulePart :requiredName ::= <spaces> <name>:n ?(n == requiredName) <argPattern>:args
                           (<token "::="> <expr>:e => mk_seq([args, e])
                           | => args)
rule ::= <spaces> ~~(<name>:n) <rulePart n>:r
         (<rulePart n>+:rs => mk_rule(n, mk_or(cons(r, rs)))
         | => mk_rule(n, r))
grammar ::= <rule>*:rs <spaces> <end> => rs
"##;

/// The grammar parser for the OMeta2 dialect, in the OMeta2 dialect.
pub const OMETA2_SOURCE: &str = r##"
comment = '#' (~'\n' anything)*
spaces = (' ' | '\t' | '\r' | '\n' | comment)*
name = letter:x letterOrDigit*:xs -> join(cons(x, xs))
hexdigit = :x ?(is_hexdigit(x)) -> x
octaldigit = :x ?('0' <= x and x <= '7') -> x
barenumber = '0' (('x' | 'X') hexdigit+:hs -> int(join(hs), 16)
                 | octaldigit*:ds -> int("0" + join(ds), 8))
           | digit+:ds -> int(join(ds))
number = spaces ('-' barenumber:x -> mk_exactly(-x)
                | barenumber:x -> mk_exactly(x))
escapedChar = '\\' anything:c -> unescape(c)
character = token("'") (escapedChar | anything):c token("'")
            ('-' token("'") (escapedChar | anything):d token("'") -> mk_range(c, d)
            | -> mk_exactly(c))
string = token("\"") (escapedChar | ~'"' anything)*:cs '"' -> mk_exactly(join(cs))
headerParam = token(":") name | number | character | string
ruleHeaderRest = headerParam* spaces '='
application = spaces name:n ~ruleHeaderRest
              ('(' (-> application_args()):as -> mk_apply(n, as)
              | -> mk_apply(n, []))
ruleValue = token("->") -> rule_value()
semanticPredicate = token("?(") -> pred_expr()
semanticAction = token("!(") -> action_expr()
expr1 = application
      | ruleValue
      | semanticPredicate
      | semanticAction
      | number
      | character
      | string
      | token("(") expr:e token(")") -> e
      | token("[") expr:e token("]") -> mk_listpattern(e)
expr2 = token("~") (token("~") expr2:e -> mk_lookahead(e)
                   | expr2:e -> mk_not(e))
      | expr1
expr3 = expr2:e ('*' -> mk_many(e)
                | '+' -> mk_many1(e)
                | '?' -> mk_optional(e)
                | -> e):r
        (':' name:n -> mk_bind(n, r)
        | -> r)
      | token(":") name:n -> mk_bind(n, mk_apply("anything", []))
expr4 = expr3*:es -> mk_seq(es)
expr = expr4:e (token("|") expr4)*:es -> mk_or(cons(e, es))
argPattern = expr4:e -> as_params(e)
rulePart :requiredName = spaces name:n ?(n == requiredName) argPattern:args
                         (token("=") expr:e -> mk_seq([args, e])
                         | -> args)
rule = spaces ~~(name:n) rulePart(n):r
       (rulePart(n)+:rs -> mk_rule(n, mk_or(cons(r, rs)))
       | -> mk_rule(n, r))
grammar = rule*:rs spaces end -> rs
"##;

fn snippet_to_value(snippet: Snippet) -> Value {
    Value::list(vec![
        Value::Str(snippet.source),
        Value::Int(snippet.offset as i64),
    ])
}

fn value_to_snippet(value: &Value) -> Result<Snippet, HostError> {
    let pair = value
        .as_list()
        .ok_or_else(|| HostError::type_error("expected an argument snippet"))?;
    match pair.as_slice() {
        [Value::Str(source), Value::Int(offset)] => {
            Ok(Snippet::new(source.clone(), *offset as usize))
        }
        _ => Err(HostError::type_error("malformed argument snippet")),
    }
}

fn as_node(value: &Value) -> Result<Node, HostError> {
    value
        .as_node()
        .cloned()
        .ok_or_else(|| HostError::type_error("expected a syntax node"))
}

fn as_nodes(value: &Value) -> Result<Vec<Node>, HostError> {
    let items = value
        .as_list()
        .ok_or_else(|| HostError::type_error("expected a list of syntax nodes"))?;
    items.iter().map(as_node).collect()
}

fn one<'a>(args: &'a [Value], who: &str) -> Result<&'a Value, HostError> {
    match args {
        [value] => Ok(value),
        _ => Err(HostError::Arity {
            rule: who.to_string(),
            expected: 1,
            got: args.len(),
        }),
    }
}

fn two<'a>(args: &'a [Value], who: &str) -> Result<(&'a Value, &'a Value), HostError> {
    match args {
        [a, b] => Ok((a, b)),
        _ => Err(HostError::Arity {
            rule: who.to_string(),
            expected: 2,
            got: args.len(),
        }),
    }
}

fn unary_node(
    who: &'static str,
    build: fn(&mut AstBuilder, Node) -> Node,
) -> impl Fn(&mut Matcher, &[Value]) -> Result<Value, MatchError> {
    move |_m, args| {
        let node = as_node(one(args, who)?)?;
        Ok(Value::Node(build(&mut AstBuilder, node)))
    }
}

/// Read host expressions off the session input until the dialect's argument
/// list closes, the way the bootstrap's application parser does.
fn read_application_args(m: &mut Matcher, dialect: Dialect) -> Result<Value, MatchError> {
    let (stops, close) = match dialect {
        Dialect::V1 => (" >", '>'),
        Dialect::V2 => (",)", ')'),
    };
    let mut args = Vec::new();
    loop {
        let (snippet, end) = m.host_expr(stops)?;
        if !snippet.source.is_empty() {
            args.push(snippet_to_value(snippet));
        }
        match end {
            Some(c) if c == close => break,
            Some(_) => continue,
            None => return Err(ParseError::at(m.input().position()).into()),
        }
    }
    Ok(Value::list(args))
}

fn read_rule_value(m: &mut Matcher) -> Result<Value, MatchError> {
    let (snippet, end) = m.host_expr(")\r\n")?;
    if end == Some(')') {
        m.input = m.input.prev();
    }
    if snippet.source.is_empty() {
        return Err(ParseError::at(snippet.offset).into());
    }
    Ok(Value::Node(AstBuilder.rule_value(snippet)))
}

fn read_parenthesized(
    m: &mut Matcher,
    build: fn(&mut AstBuilder, Snippet) -> Node,
) -> Result<Value, MatchError> {
    let (snippet, end) = m.host_expr(")")?;
    if end != Some(')') {
        return Err(ParseError::at(m.input().position()).into());
    }
    Ok(Value::Node(build(&mut AstBuilder, snippet)))
}

/// Globals for a grammar-parser grammar: tree constructors plus the
/// snippet-extraction helpers.
pub(crate) fn grammar_globals(dialect: Dialect) -> Globals {
    let mut globals = Globals::new();
    globals.insert(
        "mk_exactly".to_string(),
        native(|_m, args| {
            let item = one(args, "mk_exactly")?;
            Ok(Value::Node(AstBuilder.exactly(item.clone())))
        }),
    );
    globals.insert(
        "mk_range".to_string(),
        native(|_m, args| {
            let (lo, hi) = two(args, "mk_range")?;
            Ok(Value::Node(AstBuilder.range(lo.clone(), hi.clone())))
        }),
    );
    globals.insert(
        "mk_apply".to_string(),
        native(|_m, args| {
            let (name, raw) = two(args, "mk_apply")?;
            let name = name
                .as_str()
                .ok_or_else(|| HostError::type_error("mk_apply: rule name must be a string"))?;
            let snippets = raw
                .as_list()
                .ok_or_else(|| HostError::type_error("mk_apply: expected an argument list"))?
                .iter()
                .map(value_to_snippet)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Node(AstBuilder.apply(name, snippets)))
        }),
    );
    globals.insert(
        "mk_seq".to_string(),
        native(|_m, args| {
            let nodes = as_nodes(one(args, "mk_seq")?)?;
            Ok(Value::Node(AstBuilder.seq(nodes)))
        }),
    );
    globals.insert(
        "mk_or".to_string(),
        native(|_m, args| {
            let nodes = as_nodes(one(args, "mk_or")?)?;
            Ok(Value::Node(AstBuilder.or_(nodes)))
        }),
    );
    globals.insert(
        "mk_many".to_string(),
        native(unary_node("mk_many", |b, e| b.many(e))),
    );
    globals.insert(
        "mk_many1".to_string(),
        native(unary_node("mk_many1", |b, e| b.many1(e))),
    );
    globals.insert(
        "mk_optional".to_string(),
        native(unary_node("mk_optional", |b, e| b.optional(e))),
    );
    globals.insert(
        "mk_not".to_string(),
        native(unary_node("mk_not", |b, e| b.not_(e))),
    );
    globals.insert(
        "mk_lookahead".to_string(),
        native(unary_node("mk_lookahead", |b, e| b.lookahead(e))),
    );
    globals.insert(
        "mk_listpattern".to_string(),
        native(unary_node("mk_listpattern", |b, e| b.list_pattern(e))),
    );
    globals.insert(
        "mk_bind".to_string(),
        native(|_m, args| {
            let (name, node) = two(args, "mk_bind")?;
            let name = name
                .as_str()
                .ok_or_else(|| HostError::type_error("mk_bind: name must be a string"))?;
            Ok(Value::Node(AstBuilder.bind(name, as_node(node)?)))
        }),
    );
    globals.insert(
        "as_params".to_string(),
        native(|_m, args| {
            let node = as_node(one(args, "as_params")?)?;
            let rebuilt = match &*node {
                ast::Expr::Seq(terms) => {
                    let terms = terms
                        .iter()
                        .map(|t| match &**t {
                            ast::Expr::Literal(v) => AstBuilder.arg_literal(v.clone()),
                            _ => t.clone(),
                        })
                        .collect();
                    AstBuilder.seq(terms)
                }
                _ => node,
            };
            Ok(Value::Node(rebuilt))
        }),
    );
    globals.insert(
        "mk_rule".to_string(),
        native(|_m, args| {
            let (name, node) = two(args, "mk_rule")?;
            let name = name
                .as_str()
                .ok_or_else(|| HostError::type_error("mk_rule: name must be a string"))?;
            as_node(node)?;
            Ok(Value::list(vec![Value::Str(name.to_string()), node.clone()]))
        }),
    );
    globals.insert(
        "unescape".to_string(),
        native(|_m, args| {
            let c = one(args, "unescape")?
                .as_char()
                .ok_or_else(|| HostError::type_error("unescape: expected a character"))?;
            Ok(Value::Char(unescape(c)))
        }),
    );
    globals.insert(
        "application_args".to_string(),
        native(move |m, _args| read_application_args(m, dialect)),
    );
    globals.insert(
        "rule_value".to_string(),
        native(|m, _args| read_rule_value(m)),
    );
    globals.insert(
        "pred_expr".to_string(),
        native(|m, _args| read_parenthesized(m, |b, s| b.pred(s))),
    );
    globals.insert(
        "action_expr".to_string(),
        native(|m, _args| read_parenthesized(m, |b, s| b.action(s))),
    );
    globals
}

/// Compile the classic-dialect grammar parser via the bootstrap.
pub fn ometa_grammar() -> Result<Arc<Grammar>, ParseError> {
    let tree = boot::parse_grammar(OMETA_SOURCE, Dialect::V1, "OMeta", &mut AstBuilder)?;
    Grammar::compile(&tree, Grammar::core(), grammar_globals(Dialect::V1))
}

/// Compile the OMeta2-dialect grammar parser via the bootstrap.
pub fn ometa2_grammar() -> Result<Arc<Grammar>, ParseError> {
    let tree = boot::parse_grammar(OMETA2_SOURCE, Dialect::V2, "OMeta2", &mut AstBuilder)?;
    Grammar::compile(&tree, Grammar::core(), grammar_globals(Dialect::V2))
}

/// Parse grammar source with a compiled grammar parser, yielding the same
/// syntax tree the bootstrap would produce.
pub fn parse_with(
    parser: &Arc<Grammar>,
    source: &str,
    name: &str,
) -> Result<ast::Grammar, MatchError> {
    let mut m = Matcher::new(parser.clone(), Stream::from_str(source));
    let (value, _) = m.apply("grammar", &[])?;
    let pairs = value
        .as_list()
        .ok_or_else(|| HostError::type_error("grammar parser returned a non-list"))?;
    let mut rules = Vec::with_capacity(pairs.len());
    for pair in pairs.iter() {
        let fields = pair
            .as_list()
            .ok_or_else(|| HostError::type_error("malformed rule pair"))?;
        match fields.as_slice() {
            [Value::Str(rule_name), Value::Node(body)] => rules.push(ast::Rule {
                name: rule_name.clone(),
                body: body.clone(),
            }),
            _ => return Err(HostError::type_error("malformed rule pair").into()),
        }
    }
    Ok(ast::Grammar {
        name: name.to_string(),
        rules,
    })
}

/// `make_grammar`, but through a self-hosted grammar parser.
pub fn make_grammar_with(
    parser: &Arc<Grammar>,
    name: &str,
    source: &str,
    globals: Globals,
) -> Result<Arc<Grammar>, MatchError> {
    let tree = parse_with(parser, source, name)?;
    Grammar::compile(&tree, Grammar::core(), globals).map_err(MatchError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_self_hosted_sources_compile() {
        ometa_grammar().expect("classic grammar parser should compile");
        ometa2_grammar().expect("OMeta2 grammar parser should compile");
    }
}
