//! Script-loading built-ins: run, use and read.
//!
//! All three take a file name, appending the `.peanut` extension unless it
//! is already present. `run` and `use` execute the file through the full
//! pipeline against the same global tables as the caller; `read` just
//! returns the file's contents. The file handle is scoped to the built-in
//! call and released on return, including error paths.

use crate::builtins::BuiltinCall;
use crate::flow::Flow;
use crate::interp::Interpreter;
use crate::value::ValueKind;

/// Append `.peanut` unless the name already ends with it.
fn script_name(name: &str) -> String {
    if name.ends_with(".peanut") {
        name.to_owned()
    } else {
        format!("{name}.peanut")
    }
}

/// Load a script file, or produce the load-failure error.
fn load(call: &BuiltinCall) -> Result<(String, String), Flow> {
    let ValueKind::Str(name) = &call.arg(0).kind else {
        return Err(call.error("Argument must be a string"));
    };
    let file_name = script_name(name);
    match std::fs::read_to_string(&file_name) {
        Ok(script) => Ok((file_name, script)),
        Err(err) => Err(call.error(format!("Failed to load script \"{file_name}\"\n{err}"))),
    }
}

/// `run(fn)` / `use(fn)`: execute a script file against the shared global
/// tables.
pub(super) fn run_script(interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    let (file_name, script) = match load(call) {
        Ok(loaded) => loaded,
        Err(flow) => return flow,
    };

    match interp.runtime.run(&file_name, &script) {
        Ok(_) => call.no_return(),
        Err(err) => call.error(format!(
            "Failed to finish executing script \"{file_name}\"\n{err}"
        )),
    }
}

/// `read(fn)`: the script file's contents as a String.
pub(super) fn read_script(_interp: &mut Interpreter<'_>, call: &BuiltinCall) -> Flow {
    match load(call) {
        Ok((_, script)) => call.value(ValueKind::Str(script)),
        Err(flow) => flow,
    }
}

#[cfg(test)]
mod tests {
    use super::script_name;

    #[test]
    fn test_suffix_appended_once() {
        assert_eq!(script_name("lib"), "lib.peanut");
        assert_eq!(script_name("lib.peanut"), "lib.peanut");
        assert_eq!(script_name("dir/lib"), "dir/lib.peanut");
    }
}
