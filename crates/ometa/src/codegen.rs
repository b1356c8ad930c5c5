//! The code generator: turns a grammar syntax tree into an executable
//! grammar record.
//!
//! A [`Grammar`] is an immutable table of compiled rules plus a parent
//! pointer and a globals map. Rules are resolved by name at application time
//! by walking the chain, which is what makes inheritance, overriding and
//! `super` work. Records are shared via `Arc` and never mutated after
//! construction; any number of sessions can run against one record.
//!
//! Compilation is structural: every syntax-tree form lowers to one engine
//! primitive, and embedded host snippets are parsed here, so a malformed
//! action surfaces as a parse error against the grammar source at compile
//! time, not at first use.

use crate::ast::{self, Expr, Node};
use crate::boot::{self, Dialect};
use crate::builder::AstBuilder;
use crate::error::{MatchError, ParseError};
use crate::hostexpr::{self, HostExpr};
use crate::matcher::{self, step, Match, Matcher, OMeta};
use crate::value::Value;
use indexmap::IndexMap;
use std::collections::HashMap;
use triomphe::Arc;

/// Names visible to a grammar's host expressions, beyond rule bindings.
pub type Globals = HashMap<String, Value>;

pub(crate) type NativeRule = fn(&mut Matcher, &[Value]) -> Match;

/// One entry in a grammar's rule table.
#[derive(Clone)]
pub(crate) enum CompiledRule {
    /// An engine built-in.
    Native(NativeRule),
    /// A compiled rule body, run by the evaluator.
    Body(Arc<Code>),
}

/// Executable rule bodies. Structurally the same shape as the syntax tree,
/// with argument patterns folded in and host snippets already parsed.
#[derive(Debug)]
pub(crate) enum Code {
    Exactly(Value),
    Within(Value, Value),
    Apply { rule: String, args: Vec<HostExpr> },
    Super { rule: String, args: Vec<HostExpr> },
    Seq(Vec<Code>),
    Or(Vec<Code>),
    Many(Box<Code>),
    Many1(Box<Code>),
    Optional(Box<Code>),
    Not(Box<Code>),
    Lookahead(Box<Code>),
    Bind { name: String, body: Box<Code> },
    Pred(HostExpr),
    Action(HostExpr),
    RuleValue(HostExpr),
    ListPattern(Box<Code>),
}

fn eval_args(args: &[HostExpr], m: &mut Matcher) -> Result<Vec<Value>, MatchError> {
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        values.push(arg.eval(m)?);
    }
    Ok(values)
}

impl Code {
    pub(crate) fn eval(&self, m: &mut Matcher) -> Match {
        match self {
            Code::Exactly(wanted) => m.exactly(wanted),
            Code::Within(lo, hi) => m.within(lo, hi),
            Code::Apply { rule, args } => {
                let values = eval_args(args, m)?;
                m.apply(rule, &values)
            }
            Code::Super { rule, args } => {
                let values = eval_args(args, m)?;
                m.super_apply(rule, &values)
            }
            Code::Seq(parts) => {
                let mut failure = ParseError::at(m.input.position());
                let mut value = Value::Null;
                for part in parts {
                    value = step(&mut failure, part.eval(m))?;
                }
                Ok((value, failure))
            }
            Code::Or(alts) => {
                let start = m.input.clone();
                let mut failure = ParseError::at(start.position());
                for alt in alts {
                    m.input = start.clone();
                    match alt.eval(m) {
                        Ok((value, f)) => return Ok((value, failure.merge(f))),
                        Err(MatchError::Parse(f)) => failure = failure.merge(f),
                        Err(e) => return Err(e),
                    }
                }
                m.input = start;
                Err(failure.into())
            }
            Code::Many(body) => {
                let (items, failure) = m.many(|m| body.eval(m))?;
                Ok((Value::list(items), failure))
            }
            Code::Many1(body) => {
                let (items, failure) = m.many1(|m| body.eval(m))?;
                Ok((Value::list(items), failure))
            }
            Code::Optional(body) => {
                let (value, failure) = m.optional(|m| body.eval(m))?;
                Ok((value.unwrap_or(Value::Null), failure))
            }
            Code::Not(body) => {
                let ((), failure) = m.not_(|m| body.eval(m))?;
                Ok((Value::Bool(true), failure))
            }
            Code::Lookahead(body) => m.lookahead(|m| body.eval(m)),
            Code::Bind { name, body } => {
                let (value, failure) = body.eval(m)?;
                m.bind(name, value.clone());
                Ok((value, failure))
            }
            Code::Pred(expr) => {
                let value = expr.eval(m)?;
                m.pred(value.truthy())
            }
            Code::Action(expr) => {
                expr.eval(m)?;
                Ok((Value::Bool(true), ParseError::at(m.input.position())))
            }
            Code::RuleValue(expr) => {
                let value = expr.eval(m)?;
                Ok((value, ParseError::at(m.input.position())))
            }
            Code::ListPattern(body) => m.list_pattern(|m| body.eval(m)),
        }
    }
}

/// An executable grammar record: compiled rules, parent, globals.
pub struct Grammar {
    name: String,
    rules: IndexMap<String, CompiledRule>,
    parent: Option<Arc<Grammar>>,
    globals: Globals,
}

impl Grammar {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the rules defined directly on this record, in definition
    /// order. Inherited rules are not listed.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub(crate) fn globals(&self) -> &Globals {
        &self.globals
    }

    pub(crate) fn parent(&self) -> Option<Arc<Grammar>> {
        self.parent.clone()
    }

    pub(crate) fn parent_ref(&self) -> Option<&Grammar> {
        self.parent.as_deref()
    }

    /// Find a rule by name, walking up the inheritance chain from `start`.
    /// Returns the grammar that defines it (the owner `super` resolves
    /// from).
    pub(crate) fn resolve(start: &Arc<Grammar>, rule: &str) -> Option<(Arc<Grammar>, CompiledRule)> {
        let mut grammar = start.clone();
        loop {
            if let Some(found) = grammar.rules.get(rule) {
                let found = found.clone();
                return Some((grammar, found));
            }
            let parent = grammar.parent.clone()?;
            grammar = parent;
        }
    }

    /// The root record every grammar ultimately inherits from: the built-in
    /// rules and the host-expression prelude.
    pub fn core() -> Arc<Grammar> {
        let mut rules: IndexMap<String, CompiledRule> = IndexMap::new();
        let natives: [(&str, NativeRule); 8] = [
            ("anything", matcher::rule_anything),
            ("exactly", matcher::rule_exactly),
            ("letter", matcher::rule_letter),
            ("digit", matcher::rule_digit),
            ("letterOrDigit", matcher::rule_letter_or_digit),
            ("spaces", matcher::rule_spaces),
            ("token", matcher::rule_token),
            ("end", matcher::rule_end),
        ];
        for (name, f) in natives {
            rules.insert(name.to_string(), CompiledRule::Native(f));
        }
        Arc::new(Grammar {
            name: "Core".to_string(),
            rules,
            parent: None,
            globals: hostexpr::prelude(),
        })
    }

    /// Compile a parsed grammar under a parent record.
    pub fn compile(
        tree: &ast::Grammar,
        parent: Arc<Grammar>,
        globals: Globals,
    ) -> Result<Arc<Grammar>, ParseError> {
        let mut rules = IndexMap::new();
        for rule in &tree.rules {
            let code = lower(&rule.body, &rule.name)?;
            // A non-adjacent redefinition replaces the earlier rule;
            // adjacent definitions were already merged into an ordered
            // choice by the grammar parser.
            rules.insert(rule.name.clone(), CompiledRule::Body(Arc::new(code)));
        }
        Ok(Arc::new(Grammar {
            name: tree.name.clone(),
            rules,
            parent: Some(parent),
            globals,
        }))
    }

    /// Derive a grammar from `parent`: new rules shadow, missing rules
    /// resolve upward, and `super` in an overriding rule reaches the
    /// parent's implementation.
    pub fn extend(
        parent: &Arc<Grammar>,
        name: &str,
        source: &str,
        globals: Globals,
    ) -> Result<Arc<Grammar>, ParseError> {
        let tree = boot::parse_grammar(source, Dialect::V1, name, &mut AstBuilder)?;
        Grammar::compile(&tree, parent.clone(), globals)
    }
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar")
            .field("name", &self.name)
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .finish()
    }
}

fn lower_args(args: &[ast::Snippet]) -> Result<Vec<HostExpr>, ParseError> {
    args.iter().map(hostexpr::parse).collect()
}

/// Compile one rule body. `rule` is the enclosing rule's name, recorded on
/// `super` calls so dispatch knows whose implementation to skip.
fn lower(node: &Node, rule: &str) -> Result<Code, ParseError> {
    Ok(match &**node {
        // Argument-stream literals match exactly like input literals; the
        // distinction only matters to tree passes.
        Expr::Literal(v) | Expr::ArgLiteral(v) => Code::Exactly(v.clone()),
        Expr::Range(lo, hi) => Code::Within(lo.clone(), hi.clone()),
        Expr::Apply { rule: name, args } => Code::Apply {
            rule: name.clone(),
            args: lower_args(args)?,
        },
        Expr::Super { args } => Code::Super {
            rule: rule.to_string(),
            args: lower_args(args)?,
        },
        Expr::Seq(parts) => Code::Seq(
            parts
                .iter()
                .map(|p| lower(p, rule))
                .collect::<Result<_, _>>()?,
        ),
        Expr::Or(alts) => Code::Or(
            alts.iter()
                .map(|a| lower(a, rule))
                .collect::<Result<_, _>>()?,
        ),
        Expr::Many(e) => Code::Many(Box::new(lower(e, rule)?)),
        Expr::Many1(e) => Code::Many1(Box::new(lower(e, rule)?)),
        Expr::Optional(e) => Code::Optional(Box::new(lower(e, rule)?)),
        Expr::Not(e) => Code::Not(Box::new(lower(e, rule)?)),
        Expr::Lookahead(e) => Code::Lookahead(Box::new(lower(e, rule)?)),
        Expr::Bind { name, expr } => Code::Bind {
            name: name.clone(),
            body: Box::new(lower(expr, rule)?),
        },
        Expr::Predicate(snippet) => Code::Pred(hostexpr::parse(snippet)?),
        Expr::Action(snippet) => Code::Action(hostexpr::parse(snippet)?),
        Expr::RuleValue(snippet) => Code::RuleValue(hostexpr::parse(snippet)?),
        Expr::ListPattern(e) => Code::ListPattern(Box::new(lower(e, rule)?)),
    })
}

/// Compile OMeta source (classic `::=` dialect) into a grammar record
/// rooted at the built-ins.
pub fn make_grammar(name: &str, source: &str, globals: Globals) -> Result<Arc<Grammar>, ParseError> {
    let tree = boot::parse_grammar(source, Dialect::V1, name, &mut AstBuilder)?;
    Grammar::compile(&tree, Grammar::core(), globals)
}

/// Compile OMeta2 source (`=`/`->` dialect) into a grammar record rooted at
/// the built-ins.
pub fn make_grammar_v2(
    name: &str,
    source: &str,
    globals: Globals,
) -> Result<Arc<Grammar>, ParseError> {
    let tree = boot::parse_grammar(source, Dialect::V2, name, &mut AstBuilder)?;
    Grammar::compile(&tree, Grammar::core(), globals)
}
