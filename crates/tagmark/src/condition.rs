//! Closed-form evaluator for `if` conditions.
//!
//! A condition is exactly three whitespace-separated tokens:
//! `<left> <op> <right>`. Operands resolve against the render scopes
//! ([`resolve_operand`]) and are then compared without any code evaluation
//! ([`compare`]).
//!
//! # Operand forms
//!
//! | Form | Resolution |
//! |------|------------|
//! | `page:title` | field `title` of record `page` (locals first, then globals) |
//! | `lang` | global value `lang` when non-empty |
//! | anything else | typed literal: `true`, `false`, `null`, numbers, `'quoted'` |
//!
//! # Comparison
//!
//! `===` and `!==` require the same type and value. The loose operators
//! compare numerically when both sides look numeric, by truthiness when
//! either side is a boolean, and as strings otherwise.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde_json::{Number, Value};

use crate::field::{resolve_field, FieldOrder};
use crate::value::{is_empty, to_text, Globals, Scope};

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `==`
    Eq,
    /// `!=` or `<>`
    Ne,
    /// `===`: same type and value.
    Identical,
    /// `!==`
    NotIdentical,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,
}

impl Op {
    /// Returns `true` for `===` and `!==`.
    pub fn is_strict(self) -> bool {
        matches!(self, Op::Identical | Op::NotIdentical)
    }

    /// Evaluates the operator given an ordering of its operands.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq | Op::Identical => ordering == Ordering::Equal,
            Op::Ne | Op::NotIdentical => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "==",
            Op::Ne => "!=",
            Op::Identical => "===",
            Op::NotIdentical => "!==",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::Gt => ">",
            Op::Gte => ">=",
        }
    }
}

impl FromStr for Op {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(Op::Eq),
            "!=" | "<>" => Ok(Op::Ne),
            "===" => Ok(Op::Identical),
            "!==" => Ok(Op::NotIdentical),
            "<" => Ok(Op::Lt),
            "<=" => Ok(Op::Lte),
            ">" => Ok(Op::Gt),
            ">=" => Ok(Op::Gte),
            other => Err(ConditionError::Operator(other.to_string())),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a condition could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionError {
    #[error("expected 3 tokens, found {0}")]
    Arity(usize),

    #[error("unknown operator {0:?}")]
    Operator(String),
}

/// A parsed `<left> <op> <right>` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub left: String,
    pub op: Op,
    pub right: String,
}

impl Condition {
    /// Parses a condition from its attribute text.
    pub fn parse(text: &str) -> Result<Self, ConditionError> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() != 3 {
            return Err(ConditionError::Arity(tokens.len()));
        }
        Ok(Condition {
            left: tokens[0].to_string(),
            op: tokens[1].parse()?,
            right: tokens[2].to_string(),
        })
    }

    /// Resolves both operands and compares them.
    pub fn evaluate(&self, locals: &Scope, globals: &Globals, prefix: &str) -> bool {
        let left = resolve_operand(&self.left, locals, globals, prefix);
        let right = resolve_operand(&self.right, locals, globals, prefix);
        compare(&left, self.op, &right)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}

/// Resolves one operand token to a value.
///
/// A `scope:field` token whose scope exists but lacks the field resolves to
/// null. When the scope does not exist at all, the token is a literal.
pub fn resolve_operand(token: &str, locals: &Scope, globals: &Globals, prefix: &str) -> Value {
    if let Some((scope, field)) = token.split_once(':').filter(|(s, _)| !s.is_empty()) {
        let holder = locals.get(scope).or_else(|| globals.get(scope));
        return match holder {
            Some(Value::Object(record)) => resolve_field(record, field, prefix, FieldOrder::CoreFirst)
                .map(|hit| hit.value.clone())
                .unwrap_or(Value::Null),
            Some(_) => Value::Null,
            None => literal(token),
        };
    }

    match globals.get(token) {
        Some(value) if !is_empty(value) => value.clone(),
        _ => literal(token),
    }
}

/// Interprets a token as a typed literal.
pub fn literal(token: &str) -> Value {
    match token {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }

    for quote in ['\'', '"'] {
        if token.len() >= 2 && token.starts_with(quote) && token.ends_with(quote) {
            return Value::String(token[1..token.len() - 1].to_string());
        }
    }

    if let Ok(n) = token.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Some(n) = parse_decimal(token).and_then(Number::from_f64) {
        return Value::Number(n);
    }

    Value::String(token.to_string())
}

/// Compares two resolved operands.
pub fn compare(left: &Value, op: Op, right: &Value) -> bool {
    if op.is_strict() {
        return op.eval_ordering(strict_ordering(left, right));
    }
    match loose_ordering(left, right) {
        Some(ordering) => op.eval_ordering(ordering),
        // Incomparable (NaN): only inequality holds
        None => op == Op::Ne,
    }
}

fn strict_ordering(left: &Value, right: &Value) -> Ordering {
    let same = match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (a, b) => a == b,
    };
    if same {
        Ordering::Equal
    } else {
        Ordering::Less
    }
}

fn loose_ordering(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (as_number(left), as_number(right)) {
        return a.partial_cmp(&b);
    }
    match (left, right) {
        (Value::Null, Value::String(s)) => Some("".cmp(s.as_str())),
        (Value::String(s), Value::Null) => Some(s.as_str().cmp("")),
        (Value::Bool(_) | Value::Null, _) | (_, Value::Bool(_) | Value::Null) => {
            Some(truthy(left).cmp(&truthy(right)))
        }
        _ => Some(to_text(left).cmp(&to_text(right))),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            parse_decimal(s.trim())
        }
        _ => None,
    }
}

/// Parses decimal or exponent notation. `NaN`, `inf` and other non-finite
/// spellings stay text.
fn parse_decimal(text: &str) -> Option<f64> {
    let numeric_chars = text
        .bytes()
        .all(|c| c.is_ascii_digit() || matches!(c, b'+' | b'-' | b'.' | b'e' | b'E'));
    if text.is_empty() || !numeric_chars || !text.bytes().any(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn truthy(value: &Value) -> bool {
    !is_empty(value)
}
