//! Built-in function registry.
//!
//! Built-ins are static specs: a name, a fixed parameter-name list, and a
//! native function pointer. Dispatch is by table entry, not dynamic method
//! resolution - a built-in value in a symbol table is just a reference to
//! its spec. The runtime binds every spec into the global table at
//! startup.

mod encoding;
mod io;
mod scripts;
mod values;

use std::rc::Rc;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use peanut_util::{Diagnostic, Position};

use crate::context::Context;
use crate::flow::Flow;
use crate::interp::build_trace;
use crate::value::{Value, ValueKind};

/// Signature of a native built-in implementation.
pub type BuiltinFn = fn(&mut crate::interp::Interpreter<'_>, &BuiltinCall) -> Flow;

/// One registered built-in.
#[derive(Debug)]
pub struct BuiltinSpec {
    /// Name bound in the global table
    pub name: &'static str,
    /// Fixed parameter names (also the arity)
    pub params: &'static [&'static str],
    /// Native implementation
    pub func: BuiltinFn,
}

/// Everything a native implementation needs: the evaluated arguments, the
/// call-site span, and the execution context entered for the call.
pub struct BuiltinCall {
    pub args: Vec<Value>,
    pub pos_start: Position,
    pub pos_end: Position,
    pub ctx: Rc<Context>,
}

impl BuiltinCall {
    /// The argument bound to parameter `index`.
    pub fn arg(&self, index: usize) -> &Value {
        &self.args[index]
    }

    /// A runtime error at the call site, with traceback.
    pub fn error(&self, details: impl Into<String>) -> Flow {
        Flow::error(Diagnostic::runtime(
            details,
            self.pos_start.clone(),
            self.pos_end.clone(),
            build_trace(&self.ctx, &self.pos_start),
        ))
    }

    /// A value positioned at the call site.
    pub fn value(&self, kind: ValueKind) -> Flow {
        Flow::Value(Value::new(
            kind,
            self.pos_start.clone(),
            self.pos_end.clone(),
        ))
    }

    /// The no-return sentinel positioned at the call site.
    pub fn no_return(&self) -> Flow {
        Flow::Value(Value::no_return(
            self.pos_start.clone(),
            self.pos_end.clone(),
        ))
    }
}

/// Every built-in, in binding order.
pub static BUILTINS: &[BuiltinSpec] = &[
    BuiltinSpec { name: "print", params: &["value"], func: io::print },
    BuiltinSpec { name: "printReturn", params: &["value"], func: io::print_return },
    BuiltinSpec { name: "input", params: &[], func: io::input },
    BuiltinSpec { name: "inputNumber", params: &[], func: io::input_number },
    BuiltinSpec { name: "cls", params: &[], func: io::cls },
    BuiltinSpec { name: "isNumber", params: &["value"], func: values::is_number },
    BuiltinSpec { name: "isString", params: &["value"], func: values::is_string },
    BuiltinSpec { name: "isArray", params: &["value"], func: values::is_array },
    BuiltinSpec { name: "isFunction", params: &["value"], func: values::is_function },
    BuiltinSpec { name: "typeof", params: &["value"], func: values::type_of },
    BuiltinSpec { name: "append", params: &["array", "value"], func: values::append },
    BuiltinSpec { name: "removeIndex", params: &["array", "index"], func: values::remove_index },
    BuiltinSpec { name: "concat", params: &["first", "second"], func: values::concat },
    BuiltinSpec { name: "length", params: &["array"], func: values::length },
    BuiltinSpec { name: "time", params: &[], func: encoding::time },
    BuiltinSpec { name: "b64Encode", params: &["string"], func: encoding::b64_encode },
    BuiltinSpec { name: "b64Decode", params: &["string"], func: encoding::b64_decode },
    BuiltinSpec { name: "toUnicode", params: &["number"], func: encoding::to_unicode },
    BuiltinSpec { name: "fromUnicode", params: &["string"], func: encoding::from_unicode },
    BuiltinSpec { name: "formatNumber", params: &["num"], func: encoding::format_number },
    BuiltinSpec { name: "run", params: &["fn"], func: scripts::run_script },
    BuiltinSpec { name: "use", params: &["fn"], func: scripts::run_script },
    BuiltinSpec { name: "read", params: &["fn"], func: scripts::read_script },
];

/// Name-indexed lookup over [`BUILTINS`].
pub fn registry() -> &'static FxHashMap<&'static str, &'static BuiltinSpec> {
    static REGISTRY: LazyLock<FxHashMap<&'static str, &'static BuiltinSpec>> =
        LazyLock::new(|| BUILTINS.iter().map(|spec| (spec.name, spec)).collect());
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_all_builtins() {
        let registry = registry();
        assert_eq!(registry.len(), BUILTINS.len());
        for name in [
            "print",
            "printReturn",
            "input",
            "inputNumber",
            "cls",
            "isNumber",
            "isString",
            "isArray",
            "isFunction",
            "typeof",
            "append",
            "removeIndex",
            "concat",
            "length",
            "time",
            "b64Encode",
            "b64Decode",
            "toUnicode",
            "fromUnicode",
            "formatNumber",
            "run",
            "use",
            "read",
        ] {
            assert!(registry.contains_key(name), "missing built-in {name}");
        }
    }

    #[test]
    fn test_run_and_use_share_an_implementation() {
        let registry = registry();
        assert_eq!(
            registry["run"].func as usize,
            registry["use"].func as usize
        );
    }
}
