//! Value-inspection and array built-ins.

use crate::builtins::BuiltinCall;
use crate::flow::Flow;
use crate::interp::Interpreter;
use crate::value::{Number, ValueKind};

/// The kind predicates answer with the Numbers 1 and 0, not Bools.
fn predicate(call: &BuiltinCall, truth: bool) -> Flow {
    call.value(ValueKind::Number(Number::Int(i64::from(truth))))
}

/// `isNumber(value)`
pub(super) fn is_number(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    predicate(call, matches!(call.arg(0).kind, ValueKind::Number(_)))
}

/// `isString(value)`
pub(super) fn is_string(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    predicate(call, matches!(call.arg(0).kind, ValueKind::Str(_)))
}

/// `isArray(value)`
pub(super) fn is_array(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    predicate(call, matches!(call.arg(0).kind, ValueKind::Array(_)))
}

/// `isFunction(value)`: true for user functions and built-ins alike.
pub(super) fn is_function(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    predicate(call, call.arg(0).is_function())
}

/// `typeof(value)`: "Number" / "String" / "Array" / "Bool" / "Function".
pub(super) fn type_of(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    call.value(ValueKind::Str(call.arg(0).type_name().to_owned()))
}

/// `append(array, value)`: a new array with the value appended.
pub(super) fn append(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    if !matches!(call.arg(0).kind, ValueKind::Array(_)) {
        return call.error("Argument must be an array");
    }
    match call.arg(0).add(call.arg(1)) {
        Ok(value) => Flow::Value(value),
        Err(err) => call.error(err.details),
    }
}

/// `removeIndex(array, index)`: a new array without the element at the
/// index.
pub(super) fn remove_index(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    if !matches!(call.arg(0).kind, ValueKind::Array(_)) {
        return call.error("Argument must be an array");
    }
    if !matches!(call.arg(1).kind, ValueKind::Number(_)) {
        return call.error("Argument must be a number");
    }
    match call.arg(0).sub(call.arg(1)) {
        Ok(value) => Flow::Value(value),
        Err(err) => call.error(err.details),
    }
}

/// `concat(first, second)`: the two arrays joined into a new one.
pub(super) fn concat(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    let both_arrays = matches!(call.arg(0).kind, ValueKind::Array(_))
        && matches!(call.arg(1).kind, ValueKind::Array(_));
    if !both_arrays {
        return call.error("Arguments must be arrays");
    }
    match call.arg(0).mul(call.arg(1)) {
        Ok(value) => Flow::Value(value),
        Err(err) => call.error(err.details),
    }
}

/// `length(array_or_string)`: element count for arrays, character count
/// for strings.
pub(super) fn length(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    match &call.arg(0).kind {
        ValueKind::Array(elements) => {
            call.value(ValueKind::Number(Number::Int(elements.len() as i64)))
        }
        ValueKind::Str(s) => {
            call.value(ValueKind::Number(Number::Int(s.chars().count() as i64)))
        }
        _ => call.error("Argument must be an array or string"),
    }
}
