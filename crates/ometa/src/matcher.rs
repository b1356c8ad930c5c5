//! The parsing engine: rule dispatch, memoization, left recursion and the
//! combinators generated rule bodies are built from.
//!
//! A [`Matcher`] is one parse session: one grammar record bound to one input,
//! owning its memo table and locals. Sessions are single-threaded and
//! deterministic; alternatives run left to right, repetition is greedy.
//!
//! Rule application is packrat-style. Applying a rule installs an
//! in-progress memo entry first; if a nested application hits that entry the
//! rule is left-recursive, and after the first successful parse the engine
//! grows the seed: it re-runs the body against the cached result until a
//! re-run stops consuming more input.

use crate::codegen::{Code, CompiledRule, Grammar};
use crate::ast::Snippet;
use crate::error::{Expectation, HostError, MatchError, ParseError};
use crate::limit::LimitTracker;
use crate::stream::{EndOfInput, Stream};
use crate::value::Value;
use std::collections::HashMap;
use triomphe::Arc;

/// Outcome of matching: the value plus the deepest failure observed while
/// producing it (kept for error merging), or the failure itself.
pub type MatchResult<T> = Result<(T, ParseError), MatchError>;

/// The common case: a [`Value`]-producing match.
pub type Match = MatchResult<Value>;

/// Fold one sub-result into a running failure, sequencing-style: successes
/// contribute their carried failure, a parse failure is merged and
/// re-raised. Host errors pass through untouched.
pub(crate) fn step<T>(failure: &mut ParseError, result: MatchResult<T>) -> Result<T, MatchError> {
    match result {
        Ok((value, f)) => {
            *failure = failure.clone().merge(f);
            Ok(value)
        }
        Err(MatchError::Parse(f)) => {
            *failure = failure.clone().merge(f);
            Err(MatchError::Parse(failure.clone()))
        }
        Err(e) => Err(e),
    }
}

struct Frame {
    rule: String,
    /// Grammar that defines the executing rule; `super` resolves from its
    /// parent.
    owner: Arc<Grammar>,
    bindings: HashMap<String, Value>,
}

type MemoKey = (usize, usize, String);

enum MemoEntry {
    InProgress { detected: bool },
    Computed {
        value: Value,
        failure: ParseError,
        after: Stream,
    },
}

/// One parse session: a grammar record applied to one input.
pub struct Matcher {
    grammar: Arc<Grammar>,
    pub(crate) input: Stream,
    memo: HashMap<MemoKey, MemoEntry>,
    locals: HashMap<String, HashMap<String, Value>>,
    frames: Vec<Frame>,
    recursion: LimitTracker,
}

impl Matcher {
    pub fn new(grammar: Arc<Grammar>, input: Stream) -> Matcher {
        Matcher {
            grammar,
            input,
            memo: HashMap::new(),
            locals: HashMap::new(),
            frames: Vec::new(),
            recursion: LimitTracker::default(),
        }
    }

    /// Configure the recursion limit to use while matching.
    pub fn recursion_limit(mut self, limit: usize) -> Matcher {
        self.recursion = LimitTracker::new(limit);
        self
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    pub fn input(&self) -> &Stream {
        &self.input
    }

    pub fn at_end(&self) -> bool {
        self.input.at_end()
    }

    /// Recursion usage over the session so far.
    pub fn recursion_usage(&self) -> LimitTracker {
        self.recursion
    }

    /// Bindings observed per rule, most recent value per name.
    pub fn locals(&self) -> &HashMap<String, HashMap<String, Value>> {
        &self.locals
    }

    /// Apply a named rule at the current position. Unknown rule names are a
    /// programmer error and fail loudly, not as a parse error.
    pub fn apply(&mut self, rule: &str, args: &[Value]) -> Match {
        let Some((owner, imp)) = Grammar::resolve(&self.grammar, rule) else {
            return Err(HostError::UnknownRule(rule.to_string()).into());
        };
        match imp {
            CompiledRule::Native(f) => f(self, args),
            CompiledRule::Body(code) => {
                if args.is_empty() {
                    self.apply_memoized(owner, code, rule)
                } else {
                    // Parameterized applications are not memoized; the memo
                    // key has no room for argument values.
                    self.run_compiled(owner, &code, rule, args)
                }
            }
        }
    }

    /// Apply the parent grammar's implementation of a rule. Resolution skips
    /// the table of the grammar that defines the currently executing rule.
    pub fn super_apply(&mut self, rule: &str, args: &[Value]) -> Match {
        let owner = match self.frames.last() {
            Some(frame) => frame.owner.clone(),
            None => {
                return Err(
                    HostError::type_error("`super` can only be applied inside a rule").into(),
                )
            }
        };
        let Some(parent) = owner.parent() else {
            return Err(HostError::UnknownRule(format!("super `{rule}`")).into());
        };
        let Some((powner, imp)) = Grammar::resolve(&parent, rule) else {
            return Err(HostError::UnknownRule(rule.to_string()).into());
        };
        match imp {
            CompiledRule::Native(f) => f(self, args),
            CompiledRule::Body(code) => self.run_compiled(powner, &code, rule, args),
        }
    }

    fn run_compiled(
        &mut self,
        owner: Arc<Grammar>,
        code: &Arc<Code>,
        rule: &str,
        args: &[Value],
    ) -> Match {
        for arg in args.iter().rev() {
            self.input = self.input.push_arg(arg.clone());
        }
        self.run_body(owner, code, rule)
    }

    fn run_body(&mut self, owner: Arc<Grammar>, code: &Arc<Code>, rule: &str) -> Match {
        if !self.recursion.enter() {
            self.recursion.exit();
            return Err(HostError::RecursionLimit(rule.to_string()).into());
        }
        self.frames.push(Frame {
            rule: rule.to_string(),
            owner,
            bindings: HashMap::new(),
        });
        let result = code.eval(self);
        self.frames.pop();
        self.recursion.exit();
        result
    }

    fn apply_memoized(&mut self, owner: Arc<Grammar>, code: Arc<Code>, rule: &str) -> Match {
        let key: MemoKey = (self.input.seq_id(), self.input.position(), rule.to_string());
        match self.memo.get_mut(&key) {
            Some(MemoEntry::Computed {
                value,
                failure,
                after,
            }) => {
                let (value, failure, after) = (value.clone(), failure.clone(), after.clone());
                self.input = after;
                return Ok((value, failure));
            }
            Some(MemoEntry::InProgress { detected }) => {
                // Left recursion: fail with the seed so an alternative can
                // produce the first result to grow from.
                *detected = true;
                return Err(ParseError::at(self.input.position()).into());
            }
            None => {}
        }
        self.memo
            .insert(key.clone(), MemoEntry::InProgress { detected: false });
        let start = self.input.clone();
        match self.run_body(owner.clone(), &code, rule) {
            Err(e) => {
                // The in-progress entry must not outlive this frame, and
                // failures are not cached: seed growing re-runs bodies.
                self.memo.remove(&key);
                Err(e)
            }
            Ok((value, failure)) => {
                let detected = matches!(
                    self.memo.get(&key),
                    Some(MemoEntry::InProgress { detected: true })
                );
                self.memo.insert(
                    key.clone(),
                    MemoEntry::Computed {
                        value,
                        failure,
                        after: self.input.clone(),
                    },
                );
                if detected {
                    self.grow_seed(&key, owner, &code, rule, &start)?;
                }
                match self.memo.get(&key) {
                    Some(MemoEntry::Computed {
                        value,
                        failure,
                        after,
                    }) => {
                        let (value, failure, after) =
                            (value.clone(), failure.clone(), after.clone());
                        self.input = after;
                        Ok((value, failure))
                    }
                    _ => unreachable!("apply always leaves a computed memo entry"),
                }
            }
        }
    }

    fn grow_seed(
        &mut self,
        key: &MemoKey,
        owner: Arc<Grammar>,
        code: &Arc<Code>,
        rule: &str,
        start: &Stream,
    ) -> Result<(), MatchError> {
        loop {
            let best = match self.memo.get(key) {
                Some(MemoEntry::Computed { after, .. }) => after.position(),
                _ => unreachable!("growing requires a computed seed"),
            };
            self.input = start.clone();
            match self.run_body(owner.clone(), code, rule) {
                Err(MatchError::Parse(_)) => break,
                Err(e) => return Err(e),
                Ok((value, failure)) => {
                    if self.input.position() > best {
                        self.memo.insert(
                            key.clone(),
                            MemoEntry::Computed {
                                value,
                                failure,
                                after: self.input.clone(),
                            },
                        );
                    } else {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// Consume any one item; fails only at end of input.
    pub fn next_item(&mut self) -> Match {
        let pos = self.input.position();
        match self.input.head() {
            Ok(v) => {
                self.input = self.input.tail();
                Ok((v, ParseError::at(pos)))
            }
            Err(EndOfInput(p)) => Err(ParseError::at(p).into()),
        }
    }

    /// Match one item by equality.
    pub fn exactly(&mut self, wanted: &Value) -> Match {
        let pos = self.input.position();
        match self.input.head() {
            Ok(v) if v == *wanted => {
                self.input = self.input.tail();
                Ok((v, ParseError::at(pos)))
            }
            _ => Err(ParseError::expected(pos, Expectation::item(wanted.render())).into()),
        }
    }

    /// Match one item within an inclusive range.
    pub fn within(&mut self, lo: &Value, hi: &Value) -> Match {
        let pos = self.input.position();
        let expected = || {
            Expectation {
                kind: Some("range".to_string()),
                value: Some(format!("{}-{}", lo.render(), hi.render())),
            }
        };
        match self.input.head() {
            Ok(v) => {
                let inside = match (&v, lo, hi) {
                    (Value::Char(c), Value::Char(a), Value::Char(b)) => a <= c && c <= b,
                    (Value::Int(n), Value::Int(a), Value::Int(b)) => a <= n && n <= b,
                    _ => false,
                };
                if inside {
                    self.input = self.input.tail();
                    Ok((v, ParseError::at(pos)))
                } else {
                    Err(ParseError::expected(pos, expected()).into())
                }
            }
            Err(EndOfInput(p)) => Err(ParseError::expected(p, expected()).into()),
        }
    }

    fn classify(&mut self, kind: &str, accept: impl Fn(char) -> bool) -> Match {
        let pos = self.input.position();
        match self.input.head() {
            Ok(Value::Char(c)) if accept(c) => {
                self.input = self.input.tail();
                Ok((Value::Char(c), ParseError::at(pos)))
            }
            _ => Err(ParseError::expected(pos, Expectation::named(kind)).into()),
        }
    }

    /// Skip whitespace, then match every character of `text` literally. A
    /// failure anywhere reports `token 'text'` at the position reached.
    ///
    /// Whitespace skipping dispatches the `spaces` rule dynamically, so a
    /// grammar that overrides `spaces` (to skip comments, say) changes what
    /// its tokens skip.
    pub fn token(&mut self, text: &str) -> Match {
        let saved = self.input.clone();
        match self.token_inner(text) {
            Ok(ok) => Ok(ok),
            Err(MatchError::Parse(e)) => {
                self.input = saved;
                Err(ParseError::expected(e.position(), Expectation::token(text)).into())
            }
            Err(e) => Err(e),
        }
    }

    fn token_inner(&mut self, text: &str) -> Match {
        self.apply("spaces", &[])?;
        for c in text.chars() {
            self.exactly(&Value::Char(c))?;
        }
        Ok((
            Value::Str(text.to_string()),
            ParseError::at(self.input.position()),
        ))
    }

    /// Look up a name for host-expression evaluation: the current rule's
    /// bindings first, then grammar globals, child before parent.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(frame) = self.frames.last() {
            if let Some(v) = frame.bindings.get(name) {
                return Some(v.clone());
            }
        }
        let mut grammar: Option<&Grammar> = Some(&self.grammar);
        while let Some(g) = grammar {
            if let Some(v) = g.globals().get(name) {
                return Some(v.clone());
            }
            grammar = g.parent_ref();
        }
        None
    }

    /// Bind a value in the current rule's scope, and record it in the
    /// session's observable locals.
    pub(crate) fn bind(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.bindings.insert(name.to_string(), value.clone());
            self.locals
                .entry(frame.rule.clone())
                .or_default()
                .insert(name.to_string(), value);
        }
    }

    /// Read an embedded host expression off the input, tracking nested
    /// `()`/`[]`/`{}` and string literals (single, double and triple
    /// quoted). Stops at any of `endchars` outside all nesting, consuming
    /// it. An unbalanced delimiter fails at the offending position.
    pub fn host_expr(&mut self, endchars: &str) -> Result<(Snippet, Option<char>), MatchError> {
        let offset = self.input.position();
        let mut stack: Vec<char> = Vec::new();
        let mut text = String::new();
        let endchar: Option<char>;
        loop {
            let pos = self.input.position();
            let item = match self.input.head() {
                Ok(v) => v,
                Err(EndOfInput(p)) => {
                    if stack.is_empty() {
                        endchar = None;
                        break;
                    }
                    return Err(ParseError::at(p).into());
                }
            };
            let Some(c) = item.as_char() else {
                return Err(HostError::type_error(
                    "host expressions can only be read from character input",
                )
                .into());
            };
            if stack.is_empty() && endchars.contains(c) {
                self.input = self.input.tail();
                endchar = Some(c);
                break;
            }
            self.input = self.input.tail();
            text.push(c);
            match c {
                '(' => stack.push(')'),
                '[' => stack.push(']'),
                '{' => stack.push('}'),
                '"' | '\'' => self.read_host_string(c, &mut text)?,
                c if stack.last() == Some(&c) => {
                    stack.pop();
                }
                ')' | ']' | '}' => return Err(ParseError::at(pos).into()),
                _ => {}
            }
        }
        let lead = text.chars().take_while(|c| c.is_whitespace()).count();
        Ok((Snippet::new(text.trim(), offset + lead), endchar))
    }

    fn read_host_string(&mut self, quote: char, text: &mut String) -> Result<(), MatchError> {
        let next = |s: &Stream| s.head().ok().and_then(|v| v.as_char());
        let triple =
            next(&self.input) == Some(quote) && next(&self.input.tail()) == Some(quote);
        if triple {
            self.input = self.input.tail().tail();
            text.push(quote);
            text.push(quote);
            let mut run = 0usize;
            loop {
                match self.input.head() {
                    Err(EndOfInput(p)) => return Err(ParseError::at(p).into()),
                    Ok(v) => {
                        let Some(c) = v.as_char() else {
                            return Err(ParseError::at(self.input.position()).into());
                        };
                        self.input = self.input.tail();
                        text.push(c);
                        if c == quote {
                            run += 1;
                            if run == 3 {
                                return Ok(());
                            }
                        } else {
                            run = 0;
                        }
                    }
                }
            }
        }
        loop {
            match self.input.head() {
                Err(EndOfInput(p)) => return Err(ParseError::at(p).into()),
                Ok(v) => {
                    let Some(c) = v.as_char() else {
                        return Err(ParseError::at(self.input.position()).into());
                    };
                    self.input = self.input.tail();
                    text.push(c);
                    if c == '\\' {
                        if let Ok(v) = self.input.head() {
                            if let Some(escaped) = v.as_char() {
                                self.input = self.input.tail();
                                text.push(escaped);
                            }
                        }
                        continue;
                    }
                    if c == quote {
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// The combinators, written against any context that owns a [`Matcher`].
///
/// The engine itself implements this (compiled rule bodies run on it), and
/// so does the hand-written bootstrap grammar parser, which is what lets the
/// bootstrap reuse the exact matching machinery it is bootstrapping.
pub trait OMeta: Sized {
    fn matcher(&mut self) -> &mut Matcher;

    /// Ordered choice. Alternatives run left to right against the saved
    /// cursor; a failed alternative's consumption never leaks into the next.
    fn or_<T>(
        &mut self,
        alts: &mut [&mut dyn FnMut(&mut Self) -> MatchResult<T>],
    ) -> MatchResult<T> {
        let start = self.matcher().input.clone();
        let mut failure = ParseError::at(start.position());
        for alt in alts.iter_mut() {
            self.matcher().input = start.clone();
            match alt(self) {
                Ok((value, f)) => return Ok((value, failure.merge(f))),
                Err(MatchError::Parse(f)) => failure = failure.merge(f),
                Err(e) => return Err(e),
            }
        }
        self.matcher().input = start;
        Err(failure.into())
    }

    /// Zero or more, greedy. Each success commits; failures carried by the
    /// committed matches and the terminating failure all merge into the
    /// result, so the furthest failure inside a repetition survives.
    fn many<T>(
        &mut self,
        mut f: impl FnMut(&mut Self) -> MatchResult<T>,
    ) -> MatchResult<Vec<T>> {
        let mut items = Vec::new();
        let mut failure = ParseError::at(self.matcher().input.position());
        loop {
            let saved = self.matcher().input.clone();
            match f(self) {
                Ok((v, fl)) => {
                    failure = failure.merge(fl);
                    if self.matcher().input == saved {
                        // An empty match would repeat forever; commit it once.
                        items.push(v);
                        return Ok((items, failure));
                    }
                    items.push(v);
                }
                Err(MatchError::Parse(fl)) => {
                    self.matcher().input = saved;
                    return Ok((items, failure.merge(fl)));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One or more.
    fn many1<T>(
        &mut self,
        mut f: impl FnMut(&mut Self) -> MatchResult<T>,
    ) -> MatchResult<Vec<T>> {
        let (first, f1) = f(self)?;
        let (rest, f2) = self.many(f)?;
        let mut items = Vec::with_capacity(rest.len() + 1);
        items.push(first);
        items.extend(rest);
        Ok((items, f1.merge(f2)))
    }

    /// Zero or one.
    fn optional<T>(
        &mut self,
        mut f: impl FnMut(&mut Self) -> MatchResult<T>,
    ) -> MatchResult<Option<T>> {
        let saved = self.matcher().input.clone();
        match f(self) {
            Ok((v, fl)) => Ok((Some(v), fl)),
            Err(MatchError::Parse(fl)) => {
                self.matcher().input = saved;
                Ok((None, fl))
            }
            Err(e) => Err(e),
        }
    }

    /// Succeeds, consuming nothing, iff the sub-match fails. The inner
    /// failure is carried so it still contributes to the outermost report.
    fn not_<T>(
        &mut self,
        mut f: impl FnMut(&mut Self) -> MatchResult<T>,
    ) -> MatchResult<()> {
        let saved = self.matcher().input.clone();
        match f(self) {
            Ok(_) => {
                let pos = saved.position();
                self.matcher().input = saved;
                Err(ParseError::at(pos).into())
            }
            Err(MatchError::Parse(fl)) => {
                self.matcher().input = saved;
                Ok(((), fl))
            }
            Err(e) => Err(e),
        }
    }

    /// Succeeds if the sub-match would, consuming nothing, yielding its
    /// value. Bindings made inside persist.
    fn lookahead<T>(
        &mut self,
        mut f: impl FnMut(&mut Self) -> MatchResult<T>,
    ) -> MatchResult<T> {
        let saved = self.matcher().input.clone();
        match f(self) {
            Ok((v, fl)) => {
                self.matcher().input = saved;
                Ok((v, fl))
            }
            Err(MatchError::Parse(fl)) => {
                self.matcher().input = saved;
                Err(fl.into())
            }
            Err(e) => Err(e),
        }
    }

    /// Descend into a sequence item, run the sub-match over its contents,
    /// and require full consumption. Yields the entire sub-sequence.
    fn list_pattern<T>(
        &mut self,
        mut f: impl FnMut(&mut Self) -> MatchResult<T>,
    ) -> MatchResult<Value> {
        let saved = self.matcher().input.clone();
        let pos = saved.position();
        let items = match self.matcher().input.head() {
            Ok(Value::List(items)) => items,
            Ok(_) => return Err(ParseError::expected(pos, Expectation::named("list")).into()),
            Err(EndOfInput(p)) => {
                return Err(ParseError::expected(p, Expectation::named("list")).into())
            }
        };
        let outer = self.matcher().input.tail();
        self.matcher().input = Stream::from_seq(items.clone());
        match f(self) {
            Ok((_, fl)) => {
                if self.matcher().input.at_end() {
                    self.matcher().input = outer;
                    Ok((Value::List(items), fl))
                } else {
                    let p = self.matcher().input.position();
                    self.matcher().input = saved;
                    Err(fl.merge(ParseError::at(p)).into())
                }
            }
            Err(MatchError::Parse(fl)) => {
                self.matcher().input = saved;
                Err(fl.into())
            }
            Err(e) => Err(e),
        }
    }

    /// Boolean to unit success or anonymous failure, for semantic
    /// predicates.
    fn pred(&mut self, ok: bool) -> Match {
        let pos = self.matcher().input.position();
        if ok {
            Ok((Value::Bool(true), ParseError::at(pos)))
        } else {
            Err(ParseError::at(pos).into())
        }
    }
}

impl OMeta for Matcher {
    fn matcher(&mut self) -> &mut Matcher {
        self
    }
}

// Built-in rules available in every grammar, installed in the root grammar
// record. `token` goes through dynamic dispatch for `spaces` so grammar
// overrides apply.

pub(crate) fn rule_anything(m: &mut Matcher, _args: &[Value]) -> Match {
    m.next_item()
}

pub(crate) fn rule_exactly(m: &mut Matcher, args: &[Value]) -> Match {
    let [wanted] = args else {
        return Err(HostError::Arity {
            rule: "exactly".to_string(),
            expected: 1,
            got: args.len(),
        }
        .into());
    };
    m.exactly(wanted)
}

pub(crate) fn rule_letter(m: &mut Matcher, _args: &[Value]) -> Match {
    m.classify("letter", char::is_alphabetic)
}

pub(crate) fn rule_digit(m: &mut Matcher, _args: &[Value]) -> Match {
    m.classify("digit", |c| c.is_ascii_digit())
}

pub(crate) fn rule_letter_or_digit(m: &mut Matcher, _args: &[Value]) -> Match {
    m.classify("letter or digit", |c| c.is_alphanumeric() || c == '_')
}

pub(crate) fn rule_spaces(m: &mut Matcher, _args: &[Value]) -> Match {
    while let Ok(Value::Char(c)) = m.input.head() {
        if !c.is_whitespace() {
            break;
        }
        m.input = m.input.tail();
    }
    Ok((Value::Null, ParseError::at(m.input.position())))
}

pub(crate) fn rule_token(m: &mut Matcher, args: &[Value]) -> Match {
    let text = match args {
        [one] => match one.as_str() {
            Some(s) => s.to_string(),
            None => {
                return Err(HostError::type_error(format!(
                    "token: expected a string argument, got {}",
                    one.type_name()
                ))
                .into())
            }
        },
        _ => {
            return Err(HostError::Arity {
                rule: "token".to_string(),
                expected: 1,
                got: args.len(),
            }
            .into())
        }
    };
    m.token(&text)
}

pub(crate) fn rule_end(m: &mut Matcher, _args: &[Value]) -> Match {
    let pos = m.input.position();
    match m.input.head() {
        Ok(_) => Err(ParseError::at(pos).into()),
        Err(_) => Ok((Value::Null, ParseError::at(pos))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::Grammar;

    fn session(input: &str) -> Matcher {
        Matcher::new(Grammar::core(), Stream::from_str(input))
    }

    #[test]
    fn exactly_matches_by_equality() {
        let mut m = session("ab");
        let (v, _) = m.exactly(&Value::Char('a')).expect("should match");
        assert_eq!(v, Value::Char('a'));
        let err = m
            .exactly(&Value::Char('x'))
            .expect_err("wrong item")
            .into_parse()
            .expect("a parse error");
        assert_eq!(err.position(), 1);
        assert_eq!(err.expectations(), &[Expectation::item("x")]);
    }

    #[test]
    fn or_rewinds_between_alternatives() {
        let mut m = session("ab");
        let (v, _) = m
            .or_(&mut [
                &mut |m: &mut Matcher| {
                    m.exactly(&Value::Char('a'))?;
                    m.exactly(&Value::Char('x'))
                },
                &mut |m: &mut Matcher| m.exactly(&Value::Char('a')),
            ])
            .expect("second alternative matches from the start");
        assert_eq!(v, Value::Char('a'));
        assert_eq!(m.input().position(), 1);
    }

    #[test]
    fn or_failure_unions_expectations() {
        let mut m = session("z");
        let err = m
            .or_(&mut [
                &mut |m: &mut Matcher| m.exactly(&Value::Char('a')),
                &mut |m: &mut Matcher| m.exactly(&Value::Char('b')),
            ])
            .expect_err("neither matches")
            .into_parse()
            .expect("a parse error");
        assert_eq!(err.position(), 0);
        assert_eq!(
            err.expectations(),
            &[Expectation::item("a"), Expectation::item("b")]
        );
    }

    #[test]
    fn many_commits_and_carries_the_breaking_failure() {
        let mut m = session("xxy");
        let (items, failure) = m
            .many(|m| m.exactly(&Value::Char('x')))
            .expect("zero or more always succeeds");
        assert_eq!(items.len(), 2);
        assert_eq!(failure.position(), 2);
        assert_eq!(m.input().position(), 2);
    }

    #[test]
    fn not_restores_the_cursor() {
        let mut m = session("0");
        let err = m.not_(|m| m.exactly(&Value::Char('0'))).expect_err("inner matched");
        assert!(err.into_parse().is_some());
        assert_eq!(m.input().position(), 0);
        m.not_(|m| m.exactly(&Value::Char('9'))).expect("inner failed");
        assert_eq!(m.input().position(), 0);
    }

    #[test]
    fn token_skips_whitespace_and_reports_as_token() {
        let mut m = session("  horse");
        let (v, _) = m.token("horse").expect("should match");
        assert_eq!(v, Value::Str("horse".to_string()));

        let mut m = session("  hacker");
        let err = m
            .token("horse")
            .expect_err("mismatch")
            .into_parse()
            .expect("a parse error");
        // Fails mid-token, where the mismatch happened.
        assert_eq!(err.position(), 3);
        assert_eq!(err.expectations(), &[Expectation::token("horse")]);
        assert_eq!(m.input().position(), 0);
    }

    #[test]
    fn unknown_rule_is_loud() {
        let mut m = session("x");
        let err = m.apply("nonesuch", &[]).expect_err("no such rule");
        assert!(matches!(
            err,
            MatchError::Host(HostError::UnknownRule(ref name)) if name == "nonesuch"
        ));
    }

    #[test]
    fn host_expr_balances_delimiters() {
        for src in [
            "x",
            "(x + 1)",
            "{x: (y)}",
            "x, '('",
            "x, \"(\"",
            "x, \"\"\"(\"\"\"",
            "(x +\n 1)",
            "[x, \"]\",\n 1]",
            "{x: \"]\",\ny: \"[\"}",
        ] {
            let source = format!("{src}\nbaz ::= etc\n");
            let mut m = session(&source);
            let (snippet, _) = m.host_expr("\r\n").expect("should extract");
            assert_eq!(snippet.source, src, "extracting from {source:?}");
        }
    }

    #[test]
    fn host_expr_rejects_unbalanced_delimiters() {
        let mut m = session("foo(x[1]])\nbaz ::= etc\n");
        let err = m.host_expr("\r\n").expect_err("stray close bracket");
        assert_eq!(
            err.into_parse().expect("a parse error").position(),
            8
        );

        let mut m = session("foo(x[1]\nbaz ::= etc\n");
        let err = m.host_expr("\r\n").expect_err("unclosed paren");
        assert!(err.into_parse().is_some());
    }

    #[test]
    fn host_expr_reports_the_consumed_endchar() {
        let mut m = session("n - 1>rest");
        let (snippet, end) = m.host_expr(" >").expect("should extract");
        // Stops at the first top-level space.
        assert_eq!(snippet.source, "n");
        assert_eq!(end, Some(' '));
        let (snippet, end) = m.host_expr(" >").expect("should extract");
        assert_eq!(snippet.source, "-");
        assert_eq!(end, Some(' '));
        let (snippet, end) = m.host_expr(" >").expect("should extract");
        assert_eq!(snippet.source, "1");
        assert_eq!(end, Some('>'));
    }
}
