//! Failure records and the furthest-failure accumulator, plus the loud error
//! channel for host-expression and programmer errors.
//!
//! A `ParseError` is recoverable inside the engine: ordered choice, negation
//! and repetition all catch it, merge it into what they have seen so far, and
//! carry on. Merging keeps the failure with the larger position; at equal
//! positions the expectation sets are unioned. A `HostError` is never caught
//! by combinators and surfaces to the caller unchanged.

use std::fmt;

/// One thing the parser would have accepted at the failure position.
///
/// `kind` names the class of expectation (`token`, `digit`); `value` is the
/// concrete item. Either may be absent: a bare literal has no kind, a
/// built-in class like `digit` has no value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Expectation {
    pub kind: Option<String>,
    pub value: Option<String>,
}

impl Expectation {
    /// A bare literal item: `'1'`.
    pub fn item(value: impl Into<String>) -> Expectation {
        Expectation {
            kind: None,
            value: Some(value.into()),
        }
    }

    /// A token: `token 'horse'`.
    pub fn token(value: impl Into<String>) -> Expectation {
        Expectation {
            kind: Some("token".to_string()),
            value: Some(value.into()),
        }
    }

    /// A named class with no particular item: `a digit`.
    pub fn named(kind: impl Into<String>) -> Expectation {
        Expectation {
            kind: Some(kind.into()),
            value: None,
        }
    }

    fn render(&self) -> String {
        match (&self.kind, &self.value) {
            (Some(kind), Some(value)) => format!("{kind} '{value}'"),
            (None, Some(value)) => format!("'{value}'"),
            (Some(kind), None) => format!("a {kind}"),
            (None, None) => "nothing".to_string(),
        }
    }
}

/// A recoverable parse failure: the furthest position reached and the set of
/// expectations collected there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    position: usize,
    expectations: Vec<Expectation>,
}

impl ParseError {
    /// An anonymous failure. Merging treats an empty expectation set as a
    /// wildcard, so these never pollute a real report.
    pub fn at(position: usize) -> ParseError {
        ParseError {
            position,
            expectations: Vec::new(),
        }
    }

    pub fn new(position: usize, expectations: Vec<Expectation>) -> ParseError {
        ParseError {
            position,
            expectations,
        }
    }

    pub fn expected(position: usize, expectation: Expectation) -> ParseError {
        ParseError::new(position, vec![expectation])
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn expectations(&self) -> &[Expectation] {
        &self.expectations
    }

    /// Merge two failures: the one further along wins outright; at the same
    /// position the expectation sets are unioned, first occurrence first.
    /// Commutative and associative up to rendering order.
    pub fn merge(self, other: ParseError) -> ParseError {
        if self.position > other.position {
            return self;
        }
        if other.position > self.position {
            return other;
        }
        let mut expectations = self.expectations;
        for e in other.expectations {
            if !expectations.contains(&e) {
                expectations.push(e);
            }
        }
        ParseError {
            position: self.position,
            expectations,
        }
    }

    /// The `expected …` clause of the report.
    pub fn reason(&self) -> String {
        match self.expectations.as_slice() {
            [] => "unexpected input".to_string(),
            [only] => format!("expected {}", only.render()),
            many => {
                let rendered: Vec<String> = many.iter().map(Expectation::render).collect();
                let (last, rest) = rendered
                    .split_last()
                    .expect("a slice with several elements has a last");
                format!("expected one of {}, or {}", rest.join(", "), last)
            }
        }
    }

    /// Render the failure against the original input: the offending line, a
    /// caret under the column, and the reason.
    ///
    /// ```
    /// use ometa::{Expectation, ParseError};
    ///
    /// let err = ParseError::expected(3, Expectation::named("digit"));
    /// assert_eq!(
    ///     err.format_error("123x321"),
    ///     "\n123x321\n   ^\nParse error at line 1, column 3: expected a digit\n",
    /// );
    /// ```
    pub fn format_error(&self, input: &str) -> String {
        let mut consumed = 0usize;
        let mut line_no = 1usize;
        let mut line = "";
        let mut column = 0usize;
        let mut found = false;
        for (i, candidate) in input.split('\n').enumerate() {
            line = candidate;
            let chars = candidate.chars().count();
            if consumed + chars > self.position {
                line_no = i + 1;
                column = self.position - consumed;
                found = true;
                break;
            }
            consumed += chars + 1;
            line_no = i + 2;
        }
        if !found {
            // Failure at or past end of input: point just after the last line.
            line_no -= 1;
            column = line.chars().count();
        }
        format!(
            "\n{line}\n{caret:>width$}\nParse error at line {line_no}, column {column}: {reason}\n",
            caret = "^",
            width = column + 1,
            reason = self.reason(),
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parse error at position {}: {}",
            self.position,
            self.reason()
        )
    }
}

impl std::error::Error for ParseError {}

/// Errors that are not parse failures: programmer errors and failures inside
/// host-expression evaluation. These bypass every combinator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("no rule named `{0}`")]
    UnknownRule(String),
    #[error("no binding or global named `{0}`")]
    UnknownName(String),
    #[error("`{0}` is not callable")]
    NotCallable(String),
    #[error("`{rule}` takes {expected} argument(s), got {got}")]
    Arity {
        rule: String,
        expected: usize,
        got: usize,
    },
    #[error("type error: {0}")]
    Type(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("recursion limit reached while applying `{0}`")]
    RecursionLimit(String),
}

impl HostError {
    pub fn type_error(message: impl Into<String>) -> HostError {
        HostError::Type(message.into())
    }
}

/// Everything an application can come back with, short of a value.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Host(#[from] HostError),
}

impl MatchError {
    /// The parse failure, if that is what this is. Host errors yield `None`.
    pub fn into_parse(self) -> Option<ParseError> {
        match self {
            MatchError::Parse(e) => Some(e),
            MatchError::Host(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn further_failure_wins() {
        let a = ParseError::expected(3, Expectation::item("x"));
        let b = ParseError::expected(8, Expectation::item("y"));
        assert_eq!(a.clone().merge(b.clone()), b.clone());
        assert_eq!(b.clone().merge(a), b);
    }

    #[test]
    fn equal_positions_union_expectations() {
        let a = ParseError::expected(3, Expectation::item("x"));
        let b = ParseError::new(
            3,
            vec![Expectation::item("x"), Expectation::token("horse")],
        );
        let merged = a.merge(b);
        assert_eq!(merged.position(), 3);
        assert_eq!(
            merged.expectations(),
            &[Expectation::item("x"), Expectation::token("horse")]
        );
    }

    #[test]
    fn anonymous_failures_do_not_pollute() {
        let anon = ParseError::at(3);
        let real = ParseError::expected(3, Expectation::named("digit"));
        assert_eq!(anon.merge(real.clone()), real);
    }

    #[test]
    fn merge_is_commutative_up_to_order() {
        let a = ParseError::expected(2, Expectation::item("a"));
        let b = ParseError::expected(2, Expectation::item("b"));
        let ab = a.clone().merge(b.clone());
        let ba = b.merge(a);
        assert_eq!(ab.position(), ba.position());
        let mut left: Vec<_> = ab.expectations().to_vec();
        let mut right: Vec<_> = ba.expectations().to_vec();
        left.sort_by_key(|e| e.value.clone());
        right.sort_by_key(|e| e.value.clone());
        assert_eq!(left, right);
    }

    #[test]
    fn reason_for_one_and_many() {
        let one = ParseError::expected(0, Expectation::named("digit"));
        assert_eq!(one.reason(), "expected a digit");
        let two = ParseError::new(
            12,
            vec![Expectation::token("foo"), Expectation::item("b")],
        );
        assert_eq!(two.reason(), "expected one of token 'foo', or 'b'");
    }

    #[test]
    fn format_error_points_at_the_column() {
        let err = ParseError::new(
            12,
            vec![Expectation::token("foo"), Expectation::item("b")],
        );
        assert_eq!(
            err.format_error("foo\nbaz\nboz\ncharlie\nbuz"),
            "\ncharlie\n^\nParse error at line 4, column 0: expected one of token 'foo', or 'b'\n",
        );
    }

    #[test]
    fn format_error_past_the_end() {
        let err = ParseError::expected(3, Expectation::item("x"));
        assert_eq!(
            err.format_error("abc"),
            "\nabc\n   ^\nParse error at line 1, column 3: expected 'x'\n",
        );
    }
}
