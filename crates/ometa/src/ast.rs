//! Grammar syntax trees: tagged expression forms for rule bodies.
//!
//! Host-language snippets (predicates, actions, rule values, application
//! arguments) are opaque at this level; the tree records their source text
//! and where in the grammar source they begin, and the code generator parses
//! them when the grammar is compiled.

use crate::value::Value;
use triomphe::Arc;

/// Shared handle to an expression node.
pub type Node = Arc<Expr>;

/// An embedded host-language snippet.
#[derive(Clone, Debug, PartialEq)]
pub struct Snippet {
    pub source: String,
    /// Item offset of the snippet's first character in the grammar source.
    pub offset: usize,
}

impl Snippet {
    pub fn new(source: impl Into<String>, offset: usize) -> Snippet {
        Snippet {
            source: source.into(),
            offset,
        }
    }
}

/// A parse expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Match one item by equality.
    Literal(Value),
    /// Match one item from the argument stream against a literal constant.
    ArgLiteral(Value),
    /// Match one item within an inclusive range.
    Range(Value, Value),
    /// Invoke a rule, with zero or more host-expression arguments.
    Apply { rule: String, args: Vec<Snippet> },
    /// Invoke the parent grammar's implementation of the current rule.
    Super { args: Vec<Snippet> },
    /// Sequence; the value is the last sub-value.
    Seq(Vec<Node>),
    /// Ordered choice.
    Or(Vec<Node>),
    /// Zero or more repetitions; yields the list of sub-values.
    Many(Node),
    /// One or more repetitions; yields the list of sub-values.
    Many1(Node),
    /// Zero or one.
    Optional(Node),
    /// Succeeds, consuming nothing, iff the sub-expression fails.
    Not(Node),
    /// Succeeds if the sub-expression would, consuming nothing.
    Lookahead(Node),
    /// Run the sub-expression and bind its value in the rule's locals.
    Bind { name: String, expr: Node },
    /// Succeed iff the host expression is truthy.
    Predicate(Snippet),
    /// Evaluate the host expression for effect; yields a sentinel success.
    Action(Snippet),
    /// Yield the host expression's value as this alternative's value.
    RuleValue(Snippet),
    /// Descend into a sequence item and require full consumption.
    ListPattern(Node),
}

/// One named rule. Argument patterns are folded into the front of the body
/// as `ArgLiteral`/`Bind` elements, the way the original compiles them.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub name: String,
    pub body: Node,
}

/// A whole grammar, rules in definition order.
#[derive(Clone, Debug, PartialEq)]
pub struct Grammar {
    pub name: String,
    pub rules: Vec<Rule>,
}
