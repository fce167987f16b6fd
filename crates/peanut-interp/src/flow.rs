//! The interpreter's unified result channel.
//!
//! Every AST visitor returns a [`Flow`]. At most one non-value state is
//! live at a time: an error, a function return, or a loop continue/break.
//! Composite visitors check [`Flow::should_return`] (by matching) before
//! combining child results; loops intercept `Continue`/`Break` and clear
//! them per iteration; the call boundary consumes `Return`.

use peanut_util::Diagnostic;

use crate::value::Value;

/// Outcome of evaluating one AST node.
#[derive(Clone, Debug)]
pub enum Flow {
    /// Normal completion with a value
    Value(Value),
    /// A runtime error aborting evaluation up to `run`
    Error(Box<Diagnostic>),
    /// `return` unwinding to the nearest call boundary
    Return(Value),
    /// `continue` unwinding to the nearest loop
    Continue,
    /// `break` unwinding to the nearest loop
    Break,
}

impl Flow {
    /// Wrap an error diagnostic.
    #[inline]
    pub fn error(diagnostic: Diagnostic) -> Self {
        Self::Error(Box::new(diagnostic))
    }

    /// True for every state that aborts the current visitor: error,
    /// function return, continue or break.
    #[inline]
    pub fn should_return(&self) -> bool {
        !matches!(self, Self::Value(_))
    }

    /// The carried value, if this is a normal completion.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// Unwrap a child [`Flow`] to its value, propagating every other state to
/// the caller.
macro_rules! eval_value {
    ($flow:expr) => {
        match $flow {
            $crate::flow::Flow::Value(value) => value,
            other => return other,
        }
    };
}

pub(crate) use eval_value;
