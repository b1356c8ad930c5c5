//! Positional, logically immutable view over an input sequence.
//!
//! Backtracking is a matter of saving a `Stream` and restoring it later; the
//! engine never mutates a sequence. Rule arguments are delivered by prepending
//! them to the stream, so argument patterns consume them with the ordinary
//! matching operations.

use crate::value::Value;
use triomphe::Arc;

/// Raised by cursor reads past the end of input. The engine converts this
/// into a `ParseError` at the recorded position, with no expectations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndOfInput(pub usize);

#[derive(Clone, Debug, PartialEq)]
enum Repr {
    Items { seq: Arc<Vec<Value>>, pos: usize },
    Arg { value: Value, rest: Box<Stream> },
}

/// A cursor into an input sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Stream(Repr);

impl Stream {
    /// Cursor over a string, one `Value::Char` per character.
    pub fn from_str(input: &str) -> Stream {
        Stream::from_values(input.chars().map(Value::Char).collect())
    }

    /// Cursor over arbitrary items.
    pub fn from_values(items: Vec<Value>) -> Stream {
        Stream::from_seq(Arc::new(items))
    }

    /// Cursor over a shared sequence; used for list-pattern descent, where
    /// the sub-sequence is already shared with the matched item.
    pub(crate) fn from_seq(seq: Arc<Vec<Value>>) -> Stream {
        Stream(Repr::Items { seq, pos: 0 })
    }

    /// Prepend a rule argument. The argument is returned by the next `head`
    /// and does not disturb the underlying position.
    pub(crate) fn push_arg(&self, value: Value) -> Stream {
        Stream(Repr::Arg {
            value,
            rest: Box::new(self.clone()),
        })
    }

    pub fn head(&self) -> Result<Value, EndOfInput> {
        match &self.0 {
            Repr::Items { seq, pos } => {
                seq.get(*pos).cloned().ok_or(EndOfInput(self.position()))
            }
            Repr::Arg { value, .. } => Ok(value.clone()),
        }
    }

    pub fn tail(&self) -> Stream {
        match &self.0 {
            Repr::Items { seq, pos } => Stream(Repr::Items {
                seq: seq.clone(),
                pos: pos + 1,
            }),
            Repr::Arg { rest, .. } => (**rest).clone(),
        }
    }

    /// Step back one item. Used by host-expression extraction to push an
    /// overshot delimiter back onto the input.
    pub(crate) fn prev(&self) -> Stream {
        match &self.0 {
            Repr::Items { seq, pos } => Stream(Repr::Items {
                seq: seq.clone(),
                pos: pos.saturating_sub(1),
            }),
            Repr::Arg { .. } => self.clone(),
        }
    }

    /// Index into the underlying sequence. Prepended arguments report the
    /// position of the input they were pushed onto.
    pub fn position(&self) -> usize {
        match &self.0 {
            Repr::Items { pos, .. } => *pos,
            Repr::Arg { rest, .. } => rest.position(),
        }
    }

    /// Identity of the underlying sequence, for memo keys. Nested list
    /// cursors reuse small positions, so position alone is ambiguous.
    pub(crate) fn seq_id(&self) -> usize {
        match &self.0 {
            Repr::Items { seq, pos: _ } => seq.as_ref() as *const Vec<Value> as usize,
            Repr::Arg { rest, .. } => rest.seq_id(),
        }
    }

    pub fn at_end(&self) -> bool {
        self.head().is_err()
    }
}
