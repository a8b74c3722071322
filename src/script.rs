//! Operation scripts: one buffer operation per line, replayed in order.
//!
//! ```text
//! append:1.5
//! pop
//! resize:6   # grows in place
//! get:2
//! len
//! destroy
//! ```

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{RingError, ScriptError};
use crate::ring::{RingBuffer, SlotAllocator};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", content = "arg", rename_all = "snake_case")]
pub enum Op {
    Append(f64),
    Pop,
    Resize(usize),
    Get(usize),
    Len,
    Destroy,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Append(v) => write!(f, "append:{}", v),
            Op::Pop       => write!(f, "pop"),
            Op::Resize(n) => write!(f, "resize:{}", n),
            Op::Get(i)    => write!(f, "get:{}", i),
            Op::Len       => write!(f, "len"),
            Op::Destroy   => write!(f, "destroy"),
        }
    }
}

impl Op {
    /// Parse one operation; `line` is only used for error reporting.
    pub fn parse(text: &str, line: usize) -> Result<Self, ScriptError> {
        let (name, arg) = match text.split_once(':') {
            Some((n, a)) => (n.trim(), Some(a.trim())),
            None         => (text.trim(), None),
        };
        let op = name.to_string();

        let need = |arg: Option<&str>| arg
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ScriptError::MissingArg { line, op: op.clone() });
        let none = |arg: Option<&str>, parsed: Op| match arg {
            Some(_) => Err(ScriptError::UnexpectedArg { line, op: op.clone() }),
            None    => Ok(parsed),
        };
        let bad = |arg: String| ScriptError::BadArg { line, op: op.clone(), arg };

        match name {
            "append" => {
                let a = need(arg)?;
                a.parse().map(Op::Append).map_err(|_| bad(a))
            }
            "resize" => {
                let a = need(arg)?;
                a.parse().map(Op::Resize).map_err(|_| bad(a))
            }
            "get" => {
                let a = need(arg)?;
                a.parse().map(Op::Get).map_err(|_| bad(a))
            }
            "pop"     => none(arg, Op::Pop),
            "len"     => none(arg, Op::Len),
            "destroy" => none(arg, Op::Destroy),
            _ => Err(ScriptError::UnknownOp { line, op: name.to_string() }),
        }
    }
}

impl FromStr for Op {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Op::parse(s, 1)
    }
}

/// Parse a whole script. Blank lines and `#` comments are skipped.
pub fn parse_script(text: &str) -> Result<Vec<Op>, ScriptError> {
    text.lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let body = raw.split('#').next().unwrap_or("").trim();
            if body.is_empty() { None } else { Some((i + 1, body)) }
        })
        .map(|(line, body)| Op::parse(body, line))
        .collect()
}

/// What one operation did to the buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OpResult {
    Appended,
    Popped { value: Option<f64> },
    Resized { capacity: usize },
    Element { value: Option<f64> },
    Length { len: usize },
    Destroyed,
    Failed { error: String },
}

impl OpResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, OpResult::Failed { .. })
    }
}

impl From<RingError> for OpResult {
    fn from(e: RingError) -> Self {
        OpResult::Failed { error: e.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub op:     Op,
    pub result: OpResult,
}

pub fn apply<A: SlotAllocator>(buf: &mut RingBuffer<A>, op: Op) -> OpResult {
    match op {
        Op::Append(v) => match buf.append(v) {
            Ok(())  => OpResult::Appended,
            Err(e)  => e.into(),
        },
        Op::Pop       => OpResult::Popped { value: buf.try_pop() },
        Op::Resize(n) => match buf.resize(n) {
            Ok(())  => OpResult::Resized { capacity: buf.capacity() },
            Err(e)  => e.into(),
        },
        Op::Get(i)    => OpResult::Element { value: buf.element_at(i).copied() },
        Op::Len       => OpResult::Length { len: buf.len() },
        Op::Destroy   => {
            buf.destroy();
            OpResult::Destroyed
        }
    }
}

/// Apply `ops` in order. With `stop_on_error`, the first failure ends the run
/// and is the last outcome returned.
pub fn replay<A: SlotAllocator>(buf: &mut RingBuffer<A>, ops: &[Op], stop_on_error: bool) -> Vec<Outcome> {
    let mut out = Vec::with_capacity(ops.len());
    for &op in ops {
        let result = apply(buf, op);
        let failed = result.is_failure();
        out.push(Outcome { op, result });
        if failed && stop_on_error {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_operation() {
        let ops = parse_script("append:1.5\npop\nresize: 6\nget:2\nlen\ndestroy\n").unwrap();
        assert_eq!(ops, vec![
            Op::Append(1.5), Op::Pop, Op::Resize(6), Op::Get(2), Op::Len, Op::Destroy,
        ]);
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let ops = parse_script("# header\n\n  pop  # trailing\n").unwrap();
        assert_eq!(ops, vec![Op::Pop]);
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = parse_script("pop\n\nshuffle\n").unwrap_err();
        assert_eq!(err, ScriptError::UnknownOp { line: 3, op: "shuffle".into() });
    }

    #[test]
    fn argument_errors() {
        assert_eq!("append".parse::<Op>(), Err(ScriptError::MissingArg { line: 1, op: "append".into() }));
        assert_eq!("resize:".parse::<Op>(), Err(ScriptError::MissingArg { line: 1, op: "resize".into() }));
        assert_eq!("pop:3".parse::<Op>(), Err(ScriptError::UnexpectedArg { line: 1, op: "pop".into() }));
        assert_eq!(
            "resize:-1".parse::<Op>(),
            Err(ScriptError::BadArg { line: 1, op: "resize".into(), arg: "-1".into() })
        );
    }

    #[test]
    fn display_matches_parse_syntax() {
        for text in ["append:2.5", "pop", "resize:4", "get:0", "len", "destroy"] {
            assert_eq!(text.parse::<Op>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn replay_stops_at_first_failure() {
        let mut buf = RingBuffer::new(1);
        let ops = [Op::Append(1.0), Op::Append(2.0), Op::Pop];
        let out = replay(&mut buf, &ops, true);
        assert_eq!(out.len(), 2);
        assert!(out[1].result.is_failure());
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn replay_keeps_going_when_asked() {
        let mut buf = RingBuffer::new(1);
        let ops = [Op::Append(1.0), Op::Append(2.0), Op::Pop, Op::Pop];
        let out = replay(&mut buf, &ops, false);
        assert_eq!(out.len(), 4);
        assert_eq!(out[2].result, OpResult::Popped { value: Some(1.0) });
        assert_eq!(out[3].result, OpResult::Popped { value: None });
    }

    #[test]
    fn failed_resize_reports_reason() {
        let mut buf = RingBuffer::new(2);
        apply(&mut buf, Op::Append(1.0));
        apply(&mut buf, Op::Append(2.0));
        let res = apply(&mut buf, Op::Resize(1));
        assert_eq!(
            res,
            OpResult::Failed { error: "resize to 1 slots would truncate 2 live elements".into() }
        );
    }
}
