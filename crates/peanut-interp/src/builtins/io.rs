//! Console built-ins: print, printReturn, input, inputNumber, cls.

use std::io::{BufRead, Write};

use crate::builtins::BuiltinCall;
use crate::flow::Flow;
use crate::interp::Interpreter;
use crate::value::{display_value, Number, ValueKind};

/// `print(value)`: write the display form and a newline to stdout.
pub(super) fn print(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    println!("{}", display_value(call.arg(0)));
    call.no_return()
}

/// `printReturn(value)`: the display form as a String, nothing written.
pub(super) fn print_return(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    call.value(ValueKind::Str(display_value(call.arg(0))))
}

/// `input()`: one line from stdin, without its newline.
pub(super) fn input(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    match read_line() {
        Some(line) => call.value(ValueKind::Str(line)),
        None => call.error("Failed to read input"),
    }
}

/// `inputNumber()`: re-prompt until a line with no letters arrives, then
/// parse it as a Number.
pub(super) fn input_number(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    loop {
        let Some(line) = read_line() else {
            return call.error("Failed to read input");
        };
        let text = line.trim();

        if text.is_empty() || text.chars().any(|c| c.is_ascii_alphabetic()) {
            println!("Input must be a Number!");
            continue;
        }

        let parsed = if text.contains('.') {
            text.parse::<f64>().ok().map(Number::Float)
        } else {
            text.parse::<i64>().ok().map(Number::Int)
        };
        match parsed {
            Some(number) => return call.value(ValueKind::Number(number)),
            None => println!("Input must be a Number!"),
        }
    }
}

/// `cls()`: clear the terminal.
pub(super) fn cls(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    print!("\x1b[2J\x1b[1;1H");
    let _ = std::io::stdout().flush();
    call.no_return()
}

fn read_line() -> Option<String> {
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(_) => {
            while line.ends_with('\n') || line.ends_with('\r') {
                line.pop();
            }
            Some(line)
        }
        Err(_) => None,
    }
}
