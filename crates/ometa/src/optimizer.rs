//! Tree-to-tree passes over grammar syntax trees.

use crate::ast::{self, Expr, Node};
use crate::builder::TreeBuilder;

/// The identity pass: walks a grammar and re-emits every node through a
/// tree builder. This is the template an optimizing pass starts from:
/// override the interesting forms, keep the walk. Driven by
/// [`crate::AstBuilder`], the contract is `optimize(t) ≡ t` under
/// structural equality.
#[derive(Debug, Default)]
pub struct NullOptimizer;

impl NullOptimizer {
    pub fn optimize(
        &mut self,
        grammar: &ast::Grammar,
        builder: &mut dyn TreeBuilder,
    ) -> ast::Grammar {
        let rules = grammar
            .rules
            .iter()
            .map(|rule| (rule.name.clone(), self.walk(&rule.body, builder)))
            .collect();
        builder.make_grammar(&grammar.name, rules)
    }

    fn walk(&mut self, node: &Node, builder: &mut dyn TreeBuilder) -> Node {
        match &**node {
            Expr::Literal(v) => builder.exactly(v.clone()),
            Expr::ArgLiteral(v) => builder.arg_literal(v.clone()),
            Expr::Range(lo, hi) => builder.range(lo.clone(), hi.clone()),
            Expr::Apply { rule, args } => builder.apply(rule, args.clone()),
            Expr::Super { args } => builder.apply("super", args.clone()),
            Expr::Seq(parts) => {
                let parts = parts.iter().map(|p| self.walk(p, builder)).collect();
                builder.seq(parts)
            }
            Expr::Or(alts) => {
                let alts = alts.iter().map(|a| self.walk(a, builder)).collect();
                builder.or_(alts)
            }
            Expr::Many(e) => {
                let e = self.walk(e, builder);
                builder.many(e)
            }
            Expr::Many1(e) => {
                let e = self.walk(e, builder);
                builder.many1(e)
            }
            Expr::Optional(e) => {
                let e = self.walk(e, builder);
                builder.optional(e)
            }
            Expr::Not(e) => {
                let e = self.walk(e, builder);
                builder.not_(e)
            }
            Expr::Lookahead(e) => {
                let e = self.walk(e, builder);
                builder.lookahead(e)
            }
            Expr::Bind { name, expr } => {
                let e = self.walk(expr, builder);
                builder.bind(name, e)
            }
            Expr::Predicate(snippet) => builder.pred(snippet.clone()),
            Expr::Action(snippet) => builder.action(snippet.clone()),
            Expr::RuleValue(snippet) => builder.rule_value(snippet.clone()),
            Expr::ListPattern(e) => {
                let e = self.walk(e, builder);
                builder.list_pattern(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boot::{parse_grammar, Dialect};
    use crate::builder::AstBuilder;

    #[test]
    fn optimizing_is_the_identity() {
        let tree = parse_grammar(
            "num ::= (<num>:n <digit>:d => n * 10 + d | <digit>:d => int(d))\n\
             pair ::= [<num>:a <num>:b] => [a, b]",
            Dialect::V1,
            "TestGrammar",
            &mut AstBuilder,
        )
        .expect("grammar should parse");
        let optimized = NullOptimizer.optimize(&tree, &mut AstBuilder);
        assert_eq!(optimized, tree);
    }
}
