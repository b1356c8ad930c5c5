//! The small host-expression language.
//!
//! The reference implementation evaluates embedded snippets with a dynamic
//! `eval`; here the collaborator contract is an explicit expression language:
//! identifiers, literals, lists, calls, comparisons, arithmetic and boolean
//! operators. Anything beyond that is a native function installed in a
//! grammar's globals (see [`prelude`]), which keeps the evaluator pluggable
//! without dragging in a general-purpose interpreter.
//!
//! Identifier resolution at evaluation time walks the current rule's
//! bindings, then the globals of the session's grammar and its ancestors,
//! child first, so a subclass's globals shadow its parent's.

use crate::ast::Snippet;
use crate::error::{Expectation, HostError, MatchError, ParseError};
use crate::matcher::Matcher;
use crate::value::{NativeFn, Value};
use ordered_float::OrderedFloat;
use std::collections::HashMap;
use std::rc::Rc;

/// Wrap a Rust closure or function as a host value, ready to drop into a
/// globals map.
pub fn native(f: impl Fn(&mut Matcher, &[Value]) -> Result<Value, MatchError> + 'static) -> Value {
    Value::Fn(Rc::new(f) as NativeFn)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// A parsed host expression.
#[derive(Clone, Debug, PartialEq)]
pub enum HostExpr {
    Literal(Value),
    Var(String),
    List(Vec<HostExpr>),
    Call {
        callee: String,
        args: Vec<HostExpr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<HostExpr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<HostExpr>,
        rhs: Box<HostExpr>,
    },
}

#[derive(Clone, Debug, PartialEq)]
enum Tok {
    Ident(String),
    Int(i64),
    Float(f64),
    Char(char),
    Str(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

fn syntax_error(position: usize) -> ParseError {
    ParseError::expected(position, Expectation::named("host expression"))
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'b' => '\u{0008}',
        'f' => '\u{000C}',
        other => other,
    }
}

/// Positions are item offsets into the grammar source, so compile errors in
/// a snippet point at the right place in the original text.
fn tokenize(source: &str, offset: usize) -> Result<Vec<(Tok, usize)>, ParseError> {
    let chars: Vec<char> = source.chars().collect();
    let mut toks = Vec::new();
    let mut i = 0usize;
    while i < chars.len() {
        let pos = offset + i;
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '(' => {
                toks.push((Tok::LParen, pos));
                i += 1;
            }
            ')' => {
                toks.push((Tok::RParen, pos));
                i += 1;
            }
            '[' => {
                toks.push((Tok::LBracket, pos));
                i += 1;
            }
            ']' => {
                toks.push((Tok::RBracket, pos));
                i += 1;
            }
            ',' => {
                toks.push((Tok::Comma, pos));
                i += 1;
            }
            '+' => {
                toks.push((Tok::Plus, pos));
                i += 1;
            }
            '-' => {
                toks.push((Tok::Minus, pos));
                i += 1;
            }
            '*' => {
                toks.push((Tok::Star, pos));
                i += 1;
            }
            '/' => {
                toks.push((Tok::Slash, pos));
                i += 1;
            }
            '%' => {
                toks.push((Tok::Percent, pos));
                i += 1;
            }
            '=' => {
                if chars.get(i + 1) == Some(&'=') {
                    toks.push((Tok::EqEq, pos));
                    i += 2;
                } else {
                    return Err(syntax_error(pos));
                }
            }
            '!' => {
                if chars.get(i + 1) == Some(&'=') {
                    toks.push((Tok::Ne, pos));
                    i += 2;
                } else {
                    return Err(syntax_error(pos));
                }
            }
            '<' => {
                if chars.get(i + 1) == Some(&'=') {
                    toks.push((Tok::Le, pos));
                    i += 2;
                } else {
                    toks.push((Tok::Lt, pos));
                    i += 1;
                }
            }
            '>' => {
                if chars.get(i + 1) == Some(&'=') {
                    toks.push((Tok::Ge, pos));
                    i += 2;
                } else {
                    toks.push((Tok::Gt, pos));
                    i += 1;
                }
            }
            '\'' => {
                i += 1;
                let mut c = *chars.get(i).ok_or_else(|| syntax_error(pos))?;
                if c == '\\' {
                    i += 1;
                    c = unescape(*chars.get(i).ok_or_else(|| syntax_error(pos))?);
                }
                i += 1;
                if chars.get(i) != Some(&'\'') {
                    return Err(syntax_error(offset + i));
                }
                i += 1;
                toks.push((Tok::Char(c), pos));
            }
            '"' => {
                i += 1;
                let mut s = String::new();
                loop {
                    match chars.get(i) {
                        None => return Err(syntax_error(offset + i)),
                        Some('"') => {
                            i += 1;
                            break;
                        }
                        Some('\\') => {
                            i += 1;
                            let c = *chars.get(i).ok_or_else(|| syntax_error(offset + i))?;
                            s.push(unescape(c));
                            i += 1;
                        }
                        Some(c) => {
                            s.push(*c);
                            i += 1;
                        }
                    }
                }
                toks.push((Tok::Str(s), pos));
            }
            c if c.is_ascii_digit() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let mut is_float = false;
                if chars.get(i) == Some(&'.')
                    && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit())
                {
                    is_float = true;
                    i += 1;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                let text: String = chars[start..i].iter().collect();
                if is_float {
                    let x: f64 = text.parse().map_err(|_| syntax_error(pos))?;
                    toks.push((Tok::Float(x), pos));
                } else {
                    let n: i64 = text.parse().map_err(|_| syntax_error(pos))?;
                    toks.push((Tok::Int(n), pos));
                }
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();
                toks.push((Tok::Ident(ident), pos));
            }
            _ => return Err(syntax_error(pos)),
        }
    }
    Ok(toks)
}

struct Parser {
    toks: Vec<(Tok, usize)>,
    i: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.i).map(|(t, _)| t)
    }

    fn pos(&self) -> usize {
        self.toks.get(self.i).map_or(self.end, |(_, p)| *p)
    }

    fn bump(&mut self) -> Option<Tok> {
        let t = self.toks.get(self.i).map(|(t, _)| t.clone());
        if t.is_some() {
            self.i += 1;
        }
        t
    }

    fn eat(&mut self, t: &Tok) -> bool {
        if self.peek() == Some(t) {
            self.i += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, t: &Tok) -> Result<(), ParseError> {
        if self.eat(t) {
            Ok(())
        } else {
            Err(syntax_error(self.pos()))
        }
    }

    fn expr(&mut self) -> Result<HostExpr, ParseError> {
        self.or_expr()
    }

    fn or_expr(&mut self) -> Result<HostExpr, ParseError> {
        let mut lhs = self.and_expr()?;
        while matches!(self.peek(), Some(Tok::Ident(id)) if id == "or") {
            self.i += 1;
            let rhs = self.and_expr()?;
            lhs = HostExpr::Binary {
                op: BinaryOp::Or,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<HostExpr, ParseError> {
        let mut lhs = self.not_expr()?;
        while matches!(self.peek(), Some(Tok::Ident(id)) if id == "and") {
            self.i += 1;
            let rhs = self.not_expr()?;
            lhs = HostExpr::Binary {
                op: BinaryOp::And,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn not_expr(&mut self) -> Result<HostExpr, ParseError> {
        if matches!(self.peek(), Some(Tok::Ident(id)) if id == "not") {
            self.i += 1;
            let operand = self.not_expr()?;
            return Ok(HostExpr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<HostExpr, ParseError> {
        let lhs = self.additive()?;
        let op = match self.peek() {
            Some(Tok::EqEq) => BinaryOp::Eq,
            Some(Tok::Ne) => BinaryOp::Ne,
            Some(Tok::Lt) => BinaryOp::Lt,
            Some(Tok::Le) => BinaryOp::Le,
            Some(Tok::Gt) => BinaryOp::Gt,
            Some(Tok::Ge) => BinaryOp::Ge,
            _ => return Ok(lhs),
        };
        self.i += 1;
        let rhs = self.additive()?;
        Ok(HostExpr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    fn additive(&mut self) -> Result<HostExpr, ParseError> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Plus) => BinaryOp::Add,
                Some(Tok::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.i += 1;
            let rhs = self.multiplicative()?;
            lhs = HostExpr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn multiplicative(&mut self) -> Result<HostExpr, ParseError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Star) => BinaryOp::Mul,
                Some(Tok::Slash) => BinaryOp::Div,
                Some(Tok::Percent) => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            self.i += 1;
            let rhs = self.unary()?;
            lhs = HostExpr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn unary(&mut self) -> Result<HostExpr, ParseError> {
        if self.eat(&Tok::Minus) {
            let operand = self.unary()?;
            return Ok(HostExpr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
            });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<HostExpr, ParseError> {
        let pos = self.pos();
        match self.bump() {
            Some(Tok::Int(n)) => Ok(HostExpr::Literal(Value::Int(n))),
            Some(Tok::Float(x)) => Ok(HostExpr::Literal(Value::Float(OrderedFloat(x)))),
            Some(Tok::Char(c)) => Ok(HostExpr::Literal(Value::Char(c))),
            Some(Tok::Str(s)) => Ok(HostExpr::Literal(Value::Str(s))),
            Some(Tok::Ident(id)) => match id.as_str() {
                "true" => Ok(HostExpr::Literal(Value::Bool(true))),
                "false" => Ok(HostExpr::Literal(Value::Bool(false))),
                "none" => Ok(HostExpr::Literal(Value::Null)),
                _ => {
                    if self.eat(&Tok::LParen) {
                        let mut args = Vec::new();
                        if !self.eat(&Tok::RParen) {
                            loop {
                                args.push(self.expr()?);
                                if self.eat(&Tok::Comma) {
                                    continue;
                                }
                                self.expect(&Tok::RParen)?;
                                break;
                            }
                        }
                        Ok(HostExpr::Call { callee: id, args })
                    } else {
                        Ok(HostExpr::Var(id))
                    }
                }
            },
            Some(Tok::LParen) => {
                let first = self.expr()?;
                if self.eat(&Tok::RParen) {
                    return Ok(first);
                }
                // A parenthesized, comma-separated group is a list.
                let mut items = vec![first];
                while self.eat(&Tok::Comma) {
                    items.push(self.expr()?);
                }
                self.expect(&Tok::RParen)?;
                Ok(HostExpr::List(items))
            }
            Some(Tok::LBracket) => {
                let mut items = Vec::new();
                if !self.eat(&Tok::RBracket) {
                    loop {
                        items.push(self.expr()?);
                        if self.eat(&Tok::Comma) {
                            continue;
                        }
                        self.expect(&Tok::RBracket)?;
                        break;
                    }
                }
                Ok(HostExpr::List(items))
            }
            _ => Err(syntax_error(pos)),
        }
    }
}

/// Parse a snippet into an executable expression. Failures are reported as
/// parse errors against the grammar source.
pub fn parse(snippet: &Snippet) -> Result<HostExpr, ParseError> {
    let end = snippet.offset + snippet.source.chars().count();
    let toks = tokenize(&snippet.source, snippet.offset)?;
    if toks.is_empty() {
        return Err(syntax_error(snippet.offset));
    }
    let mut parser = Parser { toks, i: 0, end };
    let expr = parser.expr()?;
    if parser.peek().is_some() {
        return Err(syntax_error(parser.pos()));
    }
    Ok(expr)
}

impl HostExpr {
    pub fn eval(&self, m: &mut Matcher) -> Result<Value, MatchError> {
        match self {
            HostExpr::Literal(v) => Ok(v.clone()),
            HostExpr::Var(name) => m
                .lookup(name)
                .ok_or_else(|| HostError::UnknownName(name.clone()).into()),
            HostExpr::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(item.eval(m)?);
                }
                Ok(Value::list(out))
            }
            HostExpr::Call { callee, args } => {
                let target = m
                    .lookup(callee)
                    .ok_or_else(|| HostError::UnknownName(callee.clone()))?;
                let Value::Fn(f) = target else {
                    return Err(HostError::NotCallable(callee.clone()).into());
                };
                let mut vals = Vec::with_capacity(args.len());
                for arg in args {
                    vals.push(arg.eval(m)?);
                }
                f(m, &vals)
            }
            HostExpr::Unary { op, operand } => {
                let v = operand.eval(m)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!v.truthy())),
                    UnaryOp::Neg => match v {
                        Value::Int(n) => Ok(Value::Int(-n)),
                        Value::Float(x) => Ok(Value::Float(-x)),
                        other => Err(HostError::type_error(format!(
                            "cannot negate {}",
                            other.type_name()
                        ))
                        .into()),
                    },
                }
            }
            HostExpr::Binary { op, lhs, rhs } => match op {
                // `and`/`or` short-circuit and yield an operand, not a bool.
                BinaryOp::And => {
                    let a = lhs.eval(m)?;
                    if a.truthy() {
                        rhs.eval(m)
                    } else {
                        Ok(a)
                    }
                }
                BinaryOp::Or => {
                    let a = lhs.eval(m)?;
                    if a.truthy() {
                        Ok(a)
                    } else {
                        rhs.eval(m)
                    }
                }
                _ => {
                    let a = lhs.eval(m)?;
                    let b = rhs.eval(m)?;
                    apply_binary(*op, a, b).map_err(MatchError::from)
                }
            },
        }
    }
}

fn numeric(v: &Value) -> Option<f64> {
    match v {
        Value::Int(n) => Some(*n as f64),
        Value::Float(x) => Some(x.0),
        _ => None,
    }
}

fn apply_binary(op: BinaryOp, a: Value, b: Value) -> Result<Value, HostError> {
    use BinaryOp::*;
    match op {
        Eq => return Ok(Value::Bool(a == b)),
        Ne => return Ok(Value::Bool(a != b)),
        Lt | Le | Gt | Ge => return compare(op, &a, &b),
        _ => {}
    }
    match (op, &a, &b) {
        (Add, Value::Int(x), Value::Int(y)) => Ok(Value::Int(x + y)),
        (Sub, Value::Int(x), Value::Int(y)) => Ok(Value::Int(x - y)),
        (Mul, Value::Int(x), Value::Int(y)) => Ok(Value::Int(x * y)),
        (Div, Value::Int(x), Value::Int(y)) => {
            x.checked_div(*y).map(Value::Int).ok_or(HostError::DivisionByZero)
        }
        (Rem, Value::Int(x), Value::Int(y)) => {
            x.checked_rem(*y).map(Value::Int).ok_or(HostError::DivisionByZero)
        }
        (Add, Value::Str(x), Value::Str(y)) => Ok(Value::Str(format!("{x}{y}"))),
        (Add, Value::Str(x), Value::Char(y)) => Ok(Value::Str(format!("{x}{y}"))),
        (Add, Value::Char(x), Value::Str(y)) => Ok(Value::Str(format!("{x}{y}"))),
        (Add, Value::Char(x), Value::Char(y)) => Ok(Value::Str(format!("{x}{y}"))),
        (Add, Value::List(x), Value::List(y)) => {
            let mut items = x.as_ref().clone();
            items.extend(y.iter().cloned());
            Ok(Value::list(items))
        }
        _ => match (numeric(&a), numeric(&b)) {
            (Some(x), Some(y)) => {
                let out = match op {
                    Add => x + y,
                    Sub => x - y,
                    Mul => x * y,
                    Div => {
                        if y == 0.0 {
                            return Err(HostError::DivisionByZero);
                        }
                        x / y
                    }
                    Rem => {
                        if y == 0.0 {
                            return Err(HostError::DivisionByZero);
                        }
                        x % y
                    }
                    _ => unreachable!("comparisons handled above"),
                };
                Ok(Value::Float(OrderedFloat(out)))
            }
            _ => Err(HostError::type_error(format!(
                "cannot apply {op:?} to {} and {}",
                a.type_name(),
                b.type_name()
            ))),
        },
    }
}

fn compare(op: BinaryOp, a: &Value, b: &Value) -> Result<Value, HostError> {
    use std::cmp::Ordering;
    let ord = match (a, b) {
        (Value::Char(x), Value::Char(y)) => x.cmp(y),
        (Value::Str(x), Value::Str(y)) => x.cmp(y),
        _ => match (numeric(a), numeric(b)) {
            (Some(x), Some(y)) => OrderedFloat(x).cmp(&OrderedFloat(y)),
            _ => {
                return Err(HostError::type_error(format!(
                    "cannot order {} and {}",
                    a.type_name(),
                    b.type_name()
                )))
            }
        },
    };
    let out = match op {
        BinaryOp::Lt => ord == Ordering::Less,
        BinaryOp::Le => ord != Ordering::Greater,
        BinaryOp::Gt => ord == Ordering::Greater,
        BinaryOp::Ge => ord != Ordering::Less,
        _ => unreachable!("only ordering operators reach compare"),
    };
    Ok(Value::Bool(out))
}

fn want(args: &[Value], n: usize, who: &str) -> Result<(), HostError> {
    if args.len() == n {
        Ok(())
    } else {
        Err(HostError::Arity {
            rule: who.to_string(),
            expected: n,
            got: args.len(),
        })
    }
}

fn builtin_int(_m: &mut Matcher, args: &[Value]) -> Result<Value, MatchError> {
    let value = args.first().ok_or(HostError::Arity {
        rule: "int".to_string(),
        expected: 1,
        got: 0,
    })?;
    let base = match args.get(1) {
        None => 10u32,
        Some(Value::Int(b)) if (2..=36).contains(b) => *b as u32,
        Some(other) => {
            return Err(HostError::type_error(format!(
                "int: base must be a small integer, got {}",
                other.type_name()
            ))
            .into())
        }
    };
    let out = match value {
        Value::Int(n) => *n,
        Value::Float(x) => x.0 as i64,
        Value::Char(c) => c
            .to_digit(base)
            .map(i64::from)
            .ok_or_else(|| HostError::type_error(format!("int: {c:?} is not a digit")))?,
        Value::Str(s) => i64::from_str_radix(s.trim(), base)
            .map_err(|_| HostError::type_error(format!("int: cannot parse {s:?}")))?,
        other => {
            return Err(HostError::type_error(format!(
                "int: cannot convert {}",
                other.type_name()
            ))
            .into())
        }
    };
    Ok(Value::Int(out))
}

fn builtin_str(_m: &mut Matcher, args: &[Value]) -> Result<Value, MatchError> {
    want(args, 1, "str")?;
    Ok(Value::Str(args[0].render()))
}

fn builtin_join(_m: &mut Matcher, args: &[Value]) -> Result<Value, MatchError> {
    want(args, 1, "join")?;
    let items = args[0]
        .as_list()
        .ok_or_else(|| HostError::type_error("join: expected a list"))?;
    let mut out = String::new();
    for item in items.iter() {
        match item {
            Value::Char(c) => out.push(*c),
            Value::Str(s) => out.push_str(s),
            other => {
                return Err(HostError::type_error(format!(
                    "join: cannot join {}",
                    other.type_name()
                ))
                .into())
            }
        }
    }
    Ok(Value::Str(out))
}

fn builtin_len(_m: &mut Matcher, args: &[Value]) -> Result<Value, MatchError> {
    want(args, 1, "len")?;
    let n = match &args[0] {
        Value::Str(s) => s.chars().count(),
        Value::List(items) => items.len(),
        other => {
            return Err(HostError::type_error(format!(
                "len: expected a string or list, got {}",
                other.type_name()
            ))
            .into())
        }
    };
    Ok(Value::Int(n as i64))
}

fn builtin_cons(_m: &mut Matcher, args: &[Value]) -> Result<Value, MatchError> {
    want(args, 2, "cons")?;
    let rest = args[1]
        .as_list()
        .ok_or_else(|| HostError::type_error("cons: second argument must be a list"))?;
    let mut items = Vec::with_capacity(rest.len() + 1);
    items.push(args[0].clone());
    items.extend(rest.iter().cloned());
    Ok(Value::list(items))
}

fn char_class(args: &[Value], who: &str, f: impl Fn(char) -> bool) -> Result<Value, MatchError> {
    want(args, 1, who)?;
    let out = match &args[0] {
        Value::Char(c) => f(*c),
        Value::Str(s) => !s.is_empty() && s.chars().all(f),
        _ => false,
    };
    Ok(Value::Bool(out))
}

fn builtin_is_digit(_m: &mut Matcher, args: &[Value]) -> Result<Value, MatchError> {
    char_class(args, "is_digit", |c| c.is_ascii_digit())
}

fn builtin_is_hexdigit(_m: &mut Matcher, args: &[Value]) -> Result<Value, MatchError> {
    char_class(args, "is_hexdigit", |c| c.is_ascii_hexdigit())
}

fn builtin_is_letter(_m: &mut Matcher, args: &[Value]) -> Result<Value, MatchError> {
    char_class(args, "is_letter", char::is_alphabetic)
}

fn builtin_is_string(_m: &mut Matcher, args: &[Value]) -> Result<Value, MatchError> {
    want(args, 1, "is_string")?;
    Ok(Value::Bool(matches!(args[0], Value::Str(_))))
}

fn builtin_is_list(_m: &mut Matcher, args: &[Value]) -> Result<Value, MatchError> {
    want(args, 1, "is_list")?;
    Ok(Value::Bool(matches!(args[0], Value::List(_))))
}

fn builtin_is_number(_m: &mut Matcher, args: &[Value]) -> Result<Value, MatchError> {
    want(args, 1, "is_number")?;
    Ok(Value::Bool(matches!(
        args[0],
        Value::Int(_) | Value::Float(_)
    )))
}

/// The globals every grammar can see: conversion and inspection helpers, the
/// root of every grammar's globals chain.
pub fn prelude() -> HashMap<String, Value> {
    let mut globals = HashMap::new();
    globals.insert("int".to_string(), native(builtin_int));
    globals.insert("str".to_string(), native(builtin_str));
    globals.insert("join".to_string(), native(builtin_join));
    globals.insert("len".to_string(), native(builtin_len));
    globals.insert("cons".to_string(), native(builtin_cons));
    globals.insert("is_digit".to_string(), native(builtin_is_digit));
    globals.insert("is_hexdigit".to_string(), native(builtin_is_hexdigit));
    globals.insert("is_letter".to_string(), native(builtin_is_letter));
    globals.insert("is_string".to_string(), native(builtin_is_string));
    globals.insert("is_list".to_string(), native(builtin_is_list));
    globals.insert("is_number".to_string(), native(builtin_is_number));
    globals
}
