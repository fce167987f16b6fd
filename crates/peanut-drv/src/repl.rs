//! The interactive line shell.
//!
//! Each line runs as a program named `<stdin>` against the same runtime,
//! so bindings persist between lines. The result of a single-statement
//! line is echoed back unless it is the no-return sentinel.

use peanut_interp::{display_value, Runtime, Value, ValueKind};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = "peanut > ";

/// Run the shell until EOF or Ctrl-C.
pub fn run() -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()?;
    let mut runtime = Runtime::new();

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());

                match runtime.run("<stdin>", &line) {
                    Ok(value) => echo(&value),
                    Err(diagnostic) => eprintln!("{diagnostic}"),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

/// Echo a program result: a single-statement line shows that statement's
/// value, a multi-statement line shows the whole sequence. The no-return
/// sentinel is suppressed.
fn echo(root: &Value) {
    let shown = match &root.kind {
        ValueKind::Array(elements) if elements.len() == 1 => &elements[0],
        _ => root,
    };
    if !shown.is_no_return() {
        println!("{}", display_value(shown));
    }
}
