//! Encoding and numeric-formatting built-ins: time, base64, Unicode
//! conversions and scientific notation.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::builtins::BuiltinCall;
use crate::flow::Flow;
use crate::interp::Interpreter;
use crate::value::{format_float, Number, ValueKind};

/// Codepoints above this cannot be produced by `toUnicode`.
const MAX_CODEPOINT: i64 = 1_111_998;

/// `time()`: seconds since the Unix epoch, as a float Number.
pub(super) fn time(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    let seconds = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    call.value(ValueKind::Number(Number::Float(seconds)))
}

/// `b64Encode(string)`: standard-alphabet base64 of the string's bytes.
pub(super) fn b64_encode(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    match &call.arg(0).kind {
        ValueKind::Str(s) => call.value(ValueKind::Str(STANDARD.encode(s.as_bytes()))),
        _ => call.error("Argument must be a string"),
    }
}

/// `b64Decode(string)`: the inverse of `b64Encode`.
pub(super) fn b64_decode(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    let ValueKind::Str(s) = &call.arg(0).kind else {
        return call.error("Argument must be a string");
    };
    let decoded = STANDARD
        .decode(s.as_bytes())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok());
    match decoded {
        Some(text) => call.value(ValueKind::Str(text)),
        None => call.error("Failed to decode base64 string"),
    }
}

/// `toUnicode(number)`: the 1-character string for a codepoint.
pub(super) fn to_unicode(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    let out_of_range = || call.error("Argument must be a Number less than 1111998");

    let ValueKind::Number(number) = &call.arg(0).kind else {
        return out_of_range();
    };
    let codepoint = number.as_f64() as i64;
    if !(0..=MAX_CODEPOINT).contains(&codepoint) {
        return out_of_range();
    }
    match u32::try_from(codepoint).ok().and_then(char::from_u32) {
        Some(ch) => call.value(ValueKind::Str(ch.to_string())),
        None => out_of_range(),
    }
}

/// `fromUnicode(string)`: the codepoint of a 1-character string.
pub(super) fn from_unicode(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    let ValueKind::Str(s) = &call.arg(0).kind else {
        return call.error("Argument must be a 1-Character String");
    };
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => call.value(ValueKind::Number(Number::Int(ch as i64))),
        _ => call.error("Argument must be a 1-Character String"),
    }
}

/// `formatNumber(num)`: scientific "Me+E" notation, e.g. `1.4e3`.
pub(super) fn format_number(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    let ValueKind::Number(number) = &call.arg(0).kind else {
        return call.error("Argument must be a Number");
    };
    let value = number.as_f64();

    if value == 0.0 {
        return call.value(ValueKind::Str("0.0e0".to_owned()));
    }

    let exponent = value.abs().log10().floor();
    let mantissa = value / 10f64.powf(exponent);
    call.value(ValueKind::Str(format!(
        "{}e{}",
        format_float(mantissa),
        exponent as i64
    )))
}
