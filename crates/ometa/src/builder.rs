//! Tree construction during grammar parsing.
//!
//! `TreeBuilder` is the interface the grammar parsers drive: one constructor
//! per expression form, plus `make_grammar` for the whole. The default
//! [`AstBuilder`] constructs the plain syntax tree; an optimizer implements
//! the same interface to rewrite nodes on the way through.

use crate::ast::{self, Expr, Node, Snippet};
use crate::value::Value;
use triomphe::Arc;

pub trait TreeBuilder {
    fn exactly(&mut self, item: Value) -> Node;
    fn arg_literal(&mut self, item: Value) -> Node;
    fn range(&mut self, lo: Value, hi: Value) -> Node;
    fn apply(&mut self, rule: &str, args: Vec<Snippet>) -> Node;
    fn seq(&mut self, exprs: Vec<Node>) -> Node;
    fn or_(&mut self, alts: Vec<Node>) -> Node;
    fn many(&mut self, expr: Node) -> Node;
    fn many1(&mut self, expr: Node) -> Node;
    fn optional(&mut self, expr: Node) -> Node;
    fn not_(&mut self, expr: Node) -> Node;
    fn lookahead(&mut self, expr: Node) -> Node;
    fn bind(&mut self, name: &str, expr: Node) -> Node;
    fn pred(&mut self, snippet: Snippet) -> Node;
    fn action(&mut self, snippet: Snippet) -> Node;
    fn rule_value(&mut self, snippet: Snippet) -> Node;
    fn list_pattern(&mut self, expr: Node) -> Node;
    fn make_grammar(&mut self, name: &str, rules: Vec<(String, Node)>) -> ast::Grammar;
}

/// The default tree builder: a straightforward AST constructor.
#[derive(Debug, Default)]
pub struct AstBuilder;

impl TreeBuilder for AstBuilder {
    fn exactly(&mut self, item: Value) -> Node {
        Arc::new(Expr::Literal(item))
    }

    fn arg_literal(&mut self, item: Value) -> Node {
        Arc::new(Expr::ArgLiteral(item))
    }

    fn range(&mut self, lo: Value, hi: Value) -> Node {
        Arc::new(Expr::Range(lo, hi))
    }

    fn apply(&mut self, rule: &str, args: Vec<Snippet>) -> Node {
        if rule == "super" {
            Arc::new(Expr::Super { args })
        } else {
            Arc::new(Expr::Apply {
                rule: rule.to_string(),
                args,
            })
        }
    }

    fn seq(&mut self, exprs: Vec<Node>) -> Node {
        Arc::new(Expr::Seq(exprs))
    }

    fn or_(&mut self, alts: Vec<Node>) -> Node {
        Arc::new(Expr::Or(alts))
    }

    fn many(&mut self, expr: Node) -> Node {
        Arc::new(Expr::Many(expr))
    }

    fn many1(&mut self, expr: Node) -> Node {
        Arc::new(Expr::Many1(expr))
    }

    fn optional(&mut self, expr: Node) -> Node {
        Arc::new(Expr::Optional(expr))
    }

    fn not_(&mut self, expr: Node) -> Node {
        Arc::new(Expr::Not(expr))
    }

    fn lookahead(&mut self, expr: Node) -> Node {
        Arc::new(Expr::Lookahead(expr))
    }

    fn bind(&mut self, name: &str, expr: Node) -> Node {
        Arc::new(Expr::Bind {
            name: name.to_string(),
            expr,
        })
    }

    fn pred(&mut self, snippet: Snippet) -> Node {
        Arc::new(Expr::Predicate(snippet))
    }

    fn action(&mut self, snippet: Snippet) -> Node {
        Arc::new(Expr::Action(snippet))
    }

    fn rule_value(&mut self, snippet: Snippet) -> Node {
        Arc::new(Expr::RuleValue(snippet))
    }

    fn list_pattern(&mut self, expr: Node) -> Node {
        Arc::new(Expr::ListPattern(expr))
    }

    fn make_grammar(&mut self, name: &str, rules: Vec<(String, Node)>) -> ast::Grammar {
        ast::Grammar {
            name: name.to_string(),
            rules: rules
                .into_iter()
                .map(|(name, body)| ast::Rule { name, body })
                .collect(),
        }
    }
}
