#![doc = include_str!("../README.md")]

pub mod ast;
mod boot;
mod builder;
mod codegen;
mod error;
mod grammar;
mod hostexpr;
mod limit;
mod matcher;
mod optimizer;
mod stream;
mod value;

pub use crate::boot::{parse_grammar, Dialect};
pub use crate::builder::{AstBuilder, TreeBuilder};
pub use crate::codegen::{make_grammar, make_grammar_v2, Globals, Grammar};
pub use crate::error::{Expectation, HostError, MatchError, ParseError};
pub use crate::grammar::{
    make_grammar_with, ometa2_grammar, ometa_grammar, parse_with, OMETA2_SOURCE, OMETA_SOURCE,
};
pub use crate::hostexpr::{native, prelude, BinaryOp, HostExpr, UnaryOp};
pub use crate::limit::LimitTracker;
pub use crate::matcher::{Match, MatchResult, Matcher, OMeta};
pub use crate::optimizer::NullOptimizer;
pub use crate::stream::{EndOfInput, Stream};
pub use crate::value::{NativeFn, Value};
