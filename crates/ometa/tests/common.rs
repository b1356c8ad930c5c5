//! Shared harness for the grammar tests: compile helpers for every
//! compilation path, and a wrapper that mirrors how the engine is used from
//! a host program.

use ometa::{
    make_grammar, make_grammar_v2, make_grammar_with, ometa2_grammar, ometa_grammar,
    parse_grammar, AstBuilder, Dialect, Globals, Grammar, MatchError, Matcher, NullOptimizer,
    ParseError, Stream, Value,
};
use triomphe::Arc;

pub fn ch(c: char) -> Value {
    Value::Char(c)
}

pub fn int(n: i64) -> Value {
    Value::Int(n)
}

pub fn string(s: &str) -> Value {
    Value::Str(s.to_string())
}

pub fn list(items: Vec<Value>) -> Value {
    Value::list(items)
}

/// Items of a character string, for structured inputs mixing characters
/// with nested lists.
pub fn chars(s: &str) -> Vec<Value> {
    s.chars().map(Value::Char).collect()
}

pub struct Wrapper {
    pub grammar: Arc<Grammar>,
}

impl Wrapper {
    pub fn apply_str(&self, rule: &str, input: &str) -> Result<Value, ParseError> {
        run(&self.grammar, rule, Stream::from_str(input))
    }

    pub fn apply_items(&self, rule: &str, items: Vec<Value>) -> Result<Value, ParseError> {
        run(&self.grammar, rule, Stream::from_values(items))
    }
}

/// Apply a rule over a fresh session and require full consumption; leftover
/// input surfaces the failure carried alongside the partial success. A list
/// of characters flattens to a string, the way a host program would read a
/// scanned lexeme.
pub fn run(grammar: &Arc<Grammar>, rule: &str, input: Stream) -> Result<Value, ParseError> {
    let mut session = Matcher::new(grammar.clone(), input);
    match session.apply(rule, &[]) {
        Ok((value, failure)) => {
            if session.at_end() {
                Ok(flatten(value))
            } else {
                Err(failure)
            }
        }
        Err(MatchError::Parse(e)) => Err(e),
        Err(MatchError::Host(e)) => panic!("host error while applying `{rule}`: {e}"),
    }
}

fn flatten(value: Value) -> Value {
    if let Value::List(items) = &value {
        if items.iter().all(|v| matches!(v, Value::Char(_))) {
            let text: String = items.iter().filter_map(Value::as_char).collect();
            return Value::Str(text);
        }
    }
    value
}

pub type Compiler = fn(&str) -> Wrapper;

/// Classic dialect through the bootstrap parser.
pub fn compile(source: &str) -> Wrapper {
    Wrapper {
        grammar: make_grammar("TestGrammar", source, Globals::new())
            .unwrap_or_else(|e| panic!("grammar should compile: {e}")),
    }
}

/// OMeta2 dialect through the bootstrap parser.
pub fn compile_v2(source: &str) -> Wrapper {
    Wrapper {
        grammar: make_grammar_v2("TestGrammar", source, Globals::new())
            .unwrap_or_else(|e| panic!("grammar should compile: {e}")),
    }
}

/// Classic dialect through the self-hosted grammar parser.
pub fn compile_selfhosted(source: &str) -> Wrapper {
    let parser = ometa_grammar().expect("the self-hosted parser should compile");
    Wrapper {
        grammar: make_grammar_with(&parser, "TestGrammar", source, Globals::new())
            .unwrap_or_else(|e| panic!("grammar should compile: {e}")),
    }
}

/// OMeta2 dialect through the self-hosted grammar parser.
pub fn compile_selfhosted_v2(source: &str) -> Wrapper {
    let parser = ometa2_grammar().expect("the self-hosted parser should compile");
    Wrapper {
        grammar: make_grammar_with(&parser, "TestGrammar", source, Globals::new())
            .unwrap_or_else(|e| panic!("grammar should compile: {e}")),
    }
}

/// Classic dialect with the syntax tree piped through the null optimizer.
pub fn compile_optimized(source: &str) -> Wrapper {
    let tree = parse_grammar(source, Dialect::V1, "TestGrammar", &mut AstBuilder)
        .unwrap_or_else(|e| panic!("grammar should parse: {e}"));
    let tree = NullOptimizer.optimize(&tree, &mut AstBuilder);
    Wrapper {
        grammar: Grammar::compile(&tree, Grammar::core(), Globals::new())
            .unwrap_or_else(|e| panic!("grammar should compile: {e}")),
    }
}
