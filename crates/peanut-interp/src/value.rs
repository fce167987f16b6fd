//! Runtime values and the operator dispatch surface.
//!
//! Six value kinds: Number (integer or IEEE double), String, Array, Bool,
//! user Function and BuiltIn. Every value carries the source span it was
//! produced at, for error reporting; lookups and call results are
//! repositioned copies, so a reported span always points at the use site.
//!
//! Operators dispatch exhaustively over kind pairs; every combination not
//! listed below is an "Illegal operation" runtime error:
//!
//! | op      | accepted operands |
//! |---------|-------------------|
//! | `+`     | Num+Num, Str+Str (concat), Array+any (append) |
//! | `-`     | Num-Num, Array-Num (remove at index) |
//! | `*`     | Num*Num, Str*Num (repeat), Array*Array (concat) |
//! | `/`     | Num/Num, Str/Num (char at index), Array/Num (element) |
//! | `^`     | Num^Num (IEEE semantics) |
//! | `%`     | Num%Num (floored) |
//! | `==` `!=` | Num, Str, Bool same-kind; any cross-kind is false / true |
//! | `<` `>` `<=` `>=` | Num only |
//! | `and` `or` | Num (by truthiness) and Bool, same-kind |
//! | `not`   | Num, Bool |
//!
//! Array operators are copy-on-write: they build a new array and never
//! mutate the operand.

use std::rc::Rc;

use peanut_par::{Node, Param};
use peanut_util::{Position, Symbol};

use crate::builtins::BuiltinSpec;
use crate::context::Context;

/// The sentinel string standing in for "this statement form has no value".
pub const NO_RETURN_TEXT: &str = "No Return Value, ignore this!";

/// A numeric payload: integer or IEEE-754 double.
#[derive(Clone, Copy, Debug)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// The value as a double.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(n) => *n as f64,
            Self::Float(f) => *f,
        }
    }

    /// True for integer or float zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Int(n) => *n == 0,
            Self::Float(f) => *f == 0.0,
        }
    }

    /// The index this number denotes, if it is an integer.
    fn as_index(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Float(_) => None,
        }
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{}", format_float(*x)),
        }
    }
}

/// Render a double the way the language displays floats: always with a
/// decimal point (`2.0`, not `2`), and `inf` / `-inf` for the infinities.
pub(crate) fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    if value == value.trunc() && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// A user-defined function: its body, parameters with default literal
/// tokens, the auto-return flag, and the context captured at definition.
pub struct FuncValue {
    pub name: Option<Symbol>,
    pub body: Rc<Node>,
    pub params: Rc<Vec<Param>>,
    pub auto_return: bool,
    pub ctx: Rc<Context>,
}

impl std::fmt::Debug for FuncValue {
    // The captured context can (via its table) reach this function again,
    // so Debug must not descend into it.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<function {}>", self.display_name())
    }
}

impl FuncValue {
    /// Traceback / repr name.
    pub fn display_name(&self) -> &str {
        self.name.map(|n| n.as_str()).unwrap_or("<anonymous>")
    }
}

/// The kind (and payload) of a runtime value.
#[derive(Clone, Debug)]
pub enum ValueKind {
    Number(Number),
    Str(String),
    Array(Vec<Value>),
    Bool(bool),
    Function(Rc<FuncValue>),
    Builtin(&'static BuiltinSpec),
}

/// A runtime value with its source span.
#[derive(Clone, Debug)]
pub struct Value {
    pub kind: ValueKind,
    pub pos_start: Position,
    pub pos_end: Position,
}

/// A pending runtime error from an operator: the details plus the span it
/// points at. The interpreter attaches the traceback of the current
/// context chain when it turns this into a diagnostic.
#[derive(Debug)]
pub struct OpErr {
    pub details: String,
    pub pos_start: Position,
    pub pos_end: Position,
}

type OpResult = Result<Value, OpErr>;

impl Value {
    /// A value at the given span.
    pub fn new(kind: ValueKind, pos_start: Position, pos_end: Position) -> Self {
        Self {
            kind,
            pos_start,
            pos_end,
        }
    }

    /// An integer Number at the given span.
    pub fn int(value: i64, pos_start: Position, pos_end: Position) -> Self {
        Self::new(ValueKind::Number(Number::Int(value)), pos_start, pos_end)
    }

    /// The no-return sentinel at the given span.
    pub fn no_return(pos_start: Position, pos_end: Position) -> Self {
        Self::new(ValueKind::Str(NO_RETURN_TEXT.to_owned()), pos_start, pos_end)
    }

    /// A copy of this value repositioned to a new span.
    pub fn with_pos(&self, pos_start: Position, pos_end: Position) -> Self {
        Self {
            kind: self.kind.clone(),
            pos_start,
            pos_end,
        }
    }

    /// True when this value is the no-return sentinel.
    pub fn is_no_return(&self) -> bool {
        matches!(&self.kind, ValueKind::Str(s) if s == NO_RETURN_TEXT)
    }

    /// Truthiness: non-zero Number, true Bool, non-empty String; arrays and
    /// functions are always true.
    pub fn is_true(&self) -> bool {
        match &self.kind {
            ValueKind::Number(n) => !n.is_zero(),
            ValueKind::Bool(b) => *b,
            ValueKind::Str(s) => !s.is_empty(),
            ValueKind::Array(_) | ValueKind::Function(_) | ValueKind::Builtin(_) => true,
        }
    }

    /// The `typeof` name of this value's kind.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            ValueKind::Number(_) => "Number",
            ValueKind::Str(_) => "String",
            ValueKind::Array(_) => "Array",
            ValueKind::Bool(_) => "Bool",
            ValueKind::Function(_) | ValueKind::Builtin(_) => "Function",
        }
    }

    /// True for callable values.
    pub fn is_function(&self) -> bool {
        matches!(&self.kind, ValueKind::Function(_) | ValueKind::Builtin(_))
    }

    fn illegal_operation(&self, other: &Value) -> OpErr {
        OpErr {
            details: "Illegal operation".to_owned(),
            pos_start: self.pos_start.clone(),
            pos_end: other.pos_end.clone(),
        }
    }

    fn at_own_span(&self, kind: ValueKind) -> Value {
        Value::new(kind, self.pos_start.clone(), self.pos_end.clone())
    }

    fn number(&self, n: Number) -> Value {
        self.at_own_span(ValueKind::Number(n))
    }

    fn bool_value(&self, b: bool) -> Value {
        self.at_own_span(ValueKind::Bool(b))
    }

    // ------------------------------------------------------------------
    // Arithmetic
    // ------------------------------------------------------------------

    /// `+`: numeric sum, string concatenation, or array append.
    pub fn add(&self, other: &Value) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => Ok(self.number(num_add(*a, *b))),
            (ValueKind::Str(a), ValueKind::Str(b)) => {
                Ok(self.at_own_span(ValueKind::Str(format!("{a}{b}"))))
            }
            (ValueKind::Array(elements), _) => {
                let mut elements = elements.clone();
                elements.push(other.clone());
                Ok(self.at_own_span(ValueKind::Array(elements)))
            }
            _ => Err(self.illegal_operation(other)),
        }
    }

    /// `-`: numeric difference, or array with the element at an index
    /// removed.
    pub fn sub(&self, other: &Value) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => Ok(self.number(num_sub(*a, *b))),
            (ValueKind::Array(elements), ValueKind::Number(index)) => {
                let slot = resolve_index(*index, elements.len()).ok_or_else(|| OpErr {
                    details:
                        "Element at this index could not be removed because the index is out of bounds"
                            .to_owned(),
                    pos_start: other.pos_start.clone(),
                    pos_end: other.pos_end.clone(),
                })?;
                let mut elements = elements.clone();
                elements.remove(slot);
                Ok(self.at_own_span(ValueKind::Array(elements)))
            }
            _ => Err(self.illegal_operation(other)),
        }
    }

    /// `*`: numeric product, string repetition, or array concatenation.
    pub fn mul(&self, other: &Value) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => Ok(self.number(num_mul(*a, *b))),
            (ValueKind::Str(s), ValueKind::Number(Number::Int(count))) => {
                let repeated = s.repeat((*count).max(0) as usize);
                Ok(self.at_own_span(ValueKind::Str(repeated)))
            }
            (ValueKind::Array(a), ValueKind::Array(b)) => {
                let mut elements = a.clone();
                elements.extend(b.iter().cloned());
                Ok(self.at_own_span(ValueKind::Array(elements)))
            }
            _ => Err(self.illegal_operation(other)),
        }
    }

    /// `/`: numeric quotient (always a float), character at index, or
    /// array element at index.
    pub fn div(&self, other: &Value) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => {
                if b.is_zero() {
                    return Err(OpErr {
                        details: "Division by zero".to_owned(),
                        pos_start: other.pos_start.clone(),
                        pos_end: other.pos_end.clone(),
                    });
                }
                Ok(self.number(Number::Float(a.as_f64() / b.as_f64())))
            }
            (ValueKind::Str(s), ValueKind::Number(index)) => {
                let chars: Vec<char> = s.chars().collect();
                let slot = resolve_index(*index, chars.len()).ok_or_else(|| OpErr {
                    details:
                        "Character at this index could not be obtained because the index is out of bounds"
                            .to_owned(),
                    pos_start: other.pos_start.clone(),
                    pos_end: other.pos_end.clone(),
                })?;
                Ok(self.at_own_span(ValueKind::Str(chars[slot].to_string())))
            }
            (ValueKind::Array(elements), ValueKind::Number(index)) => {
                let slot = resolve_index(*index, elements.len()).ok_or_else(|| OpErr {
                    details:
                        "Element at this index could not be obtained because the index is out of bounds"
                            .to_owned(),
                    pos_start: other.pos_start.clone(),
                    pos_end: other.pos_end.clone(),
                })?;
                Ok(elements[slot].clone())
            }
            _ => Err(self.illegal_operation(other)),
        }
    }

    /// `^`: power with IEEE semantics; an integer base and non-negative
    /// integer exponent stay integral while they fit.
    pub fn pow(&self, other: &Value) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => {
                if let (Number::Int(base), Number::Int(exp)) = (a, b) {
                    if *exp >= 0 {
                        if let Ok(exp32) = u32::try_from(*exp) {
                            if let Some(result) = base.checked_pow(exp32) {
                                return Ok(self.number(Number::Int(result)));
                            }
                        }
                    }
                }
                Ok(self.number(Number::Float(a.as_f64().powf(b.as_f64()))))
            }
            _ => Err(self.illegal_operation(other)),
        }
    }

    /// `%`: floored modulo, `a − b·⌊a/b⌋`.
    pub fn modulo(&self, other: &Value) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => {
                if b.is_zero() {
                    return Err(OpErr {
                        details: "Division by zero".to_owned(),
                        pos_start: other.pos_start.clone(),
                        pos_end: other.pos_end.clone(),
                    });
                }
                Ok(self.number(num_mod_floored(*a, *b)))
            }
            _ => Err(self.illegal_operation(other)),
        }
    }

    // ------------------------------------------------------------------
    // Comparisons
    // ------------------------------------------------------------------

    /// `==`: same-kind comparison for Number, String and Bool; every
    /// cross-kind comparison is false.
    pub fn cmp_eq(&self, other: &Value) -> OpResult {
        Ok(self.bool_value(values_equal(self, other)))
    }

    /// `!=`: negation of [`Value::cmp_eq`].
    pub fn cmp_ne(&self, other: &Value) -> OpResult {
        Ok(self.bool_value(!values_equal(self, other)))
    }

    /// `<`, numbers only.
    pub fn cmp_lt(&self, other: &Value) -> OpResult {
        self.numeric_cmp(other, |a, b| a < b)
    }

    /// `>`, numbers only.
    pub fn cmp_gt(&self, other: &Value) -> OpResult {
        self.numeric_cmp(other, |a, b| a > b)
    }

    /// `<=`, numbers only.
    pub fn cmp_lte(&self, other: &Value) -> OpResult {
        self.numeric_cmp(other, |a, b| a <= b)
    }

    /// `>=`, numbers only.
    pub fn cmp_gte(&self, other: &Value) -> OpResult {
        self.numeric_cmp(other, |a, b| a >= b)
    }

    fn numeric_cmp(&self, other: &Value, cmp: fn(f64, f64) -> bool) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => {
                Ok(self.bool_value(cmp(a.as_f64(), b.as_f64())))
            }
            _ => Err(self.illegal_operation(other)),
        }
    }

    // ------------------------------------------------------------------
    // Logic
    // ------------------------------------------------------------------

    /// `and`: both operands Number (by truthiness) or both Bool.
    pub fn and_op(&self, other: &Value) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => {
                Ok(self.bool_value(!a.is_zero() && !b.is_zero()))
            }
            (ValueKind::Bool(a), ValueKind::Bool(b)) => Ok(self.bool_value(*a && *b)),
            _ => Err(self.illegal_operation(other)),
        }
    }

    /// `or`: both operands Number (by truthiness) or both Bool.
    pub fn or_op(&self, other: &Value) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => {
                Ok(self.bool_value(!a.is_zero() || !b.is_zero()))
            }
            (ValueKind::Bool(a), ValueKind::Bool(b)) => Ok(self.bool_value(*a || *b)),
            _ => Err(self.illegal_operation(other)),
        }
    }

    /// `not`: Bool(1) for zero, Bool(0) otherwise.
    pub fn not_op(&self) -> OpResult {
        match &self.kind {
            ValueKind::Number(n) => Ok(self.bool_value(n.is_zero())),
            ValueKind::Bool(b) => Ok(self.bool_value(!b)),
            _ => Err(self.illegal_operation(self)),
        }
    }
}

/// Same-kind equality for Number/String/Bool; false across kinds.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (&left.kind, &right.kind) {
        (ValueKind::Number(a), ValueKind::Number(b)) => a.as_f64() == b.as_f64(),
        (ValueKind::Str(a), ValueKind::Str(b)) => a == b,
        (ValueKind::Bool(a), ValueKind::Bool(b)) => a == b,
        _ => false,
    }
}

/// Map a (possibly negative, Python-style) index into `0..len`.
fn resolve_index(index: Number, len: usize) -> Option<usize> {
    let raw = index.as_index()?;
    let resolved = if raw < 0 { raw + len as i64 } else { raw };
    if resolved < 0 || resolved as usize >= len {
        return None;
    }
    Some(resolved as usize)
}

pub(crate) fn num_add(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => match x.checked_add(y) {
            Some(sum) => Number::Int(sum),
            None => Number::Float(x as f64 + y as f64),
        },
        _ => Number::Float(a.as_f64() + b.as_f64()),
    }
}

fn num_sub(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => match x.checked_sub(y) {
            Some(diff) => Number::Int(diff),
            None => Number::Float(x as f64 - y as f64),
        },
        _ => Number::Float(a.as_f64() - b.as_f64()),
    }
}

fn num_mul(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => match x.checked_mul(y) {
            Some(product) => Number::Int(product),
            None => Number::Float(x as f64 * y as f64),
        },
        _ => Number::Float(a.as_f64() * b.as_f64()),
    }
}

/// Floored modulo: the result takes the divisor's sign.
fn num_mod_floored(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => {
            // `/` truncates toward zero; floor it when the signs differ.
            let floored = if (x % y != 0) && ((x < 0) != (y < 0)) {
                x / y - 1
            } else {
                x / y
            };
            Number::Int(x - y * floored)
        }
        _ => {
            let (x, y) = (a.as_f64(), b.as_f64());
            Number::Float(x - y * (x / y).floor())
        }
    }
}

/// The print form of a value: the display form, except that a top-level
/// array is wrapped in brackets.
pub fn display_value(value: &Value) -> String {
    match &value.kind {
        ValueKind::Array(_) => format!("[{value}]"),
        _ => value.to_string(),
    }
}

impl std::fmt::Display for Value {
    /// The display form: numbers bare, strings raw (no quotes), bools
    /// `True`/`False`, arrays as their elements joined with `", "`, and
    /// functions as `<function name>` / `<built-in $name>`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ValueKind::Number(n) => write!(f, "{n}"),
            ValueKind::Str(s) => f.write_str(s),
            ValueKind::Bool(b) => f.write_str(if *b { "True" } else { "False" }),
            ValueKind::Array(elements) => {
                let mut first = true;
                for element in elements {
                    if !first {
                        f.write_str(", ")?;
                    }
                    first = false;
                    write!(f, "{element}")?;
                }
                Ok(())
            }
            ValueKind::Function(func) => write!(f, "<function {}>", func.display_name()),
            ValueKind::Builtin(spec) => write!(f, "<built-in ${}>", spec.name),
        }
    }
}
