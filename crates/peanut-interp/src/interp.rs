//! The tree-walking evaluator.
//!
//! One visitor per AST node kind, all returning the unified [`Flow`]
//! channel. Evaluation is strict left-to-right, depth-first; that ordering
//! (argument evaluation, loop accumulation, if-case scanning) is part of
//! the observable contract.

use std::rc::Rc;

use peanut_lex::TokenKind;
use peanut_par::{
    AccessNode, ArrayNode, BinOp, BinaryOpNode, CallNode, ForNode, FuncDefNode, IfNode, Node,
    NumberLiteral, NumberNode, ReturnNode, ScopedAssignNode, StrictAssignNode, StringNode, UnOp,
    UnaryOpNode, VarAssignNode, WhileNode,
};
use peanut_util::{Diagnostic, Position, TraceFrame};

use crate::builtins::{BuiltinCall, BuiltinSpec};
use crate::context::Context;
use crate::flow::{eval_value, Flow};
use crate::runtime::Runtime;
use crate::value::{num_add, FuncValue, Number, OpErr, Value, ValueKind};

/// Render the call-chain of `ctx` as traceback frames, outermost first.
///
/// `error_pos` positions the innermost frame; each outer frame is
/// positioned at the point its child was entered.
pub(crate) fn build_trace(ctx: &Rc<Context>, error_pos: &Position) -> Vec<TraceFrame> {
    let mut frames = Vec::new();
    let mut pos = error_pos.clone();
    let mut current = Some(Rc::clone(ctx));

    while let Some(context) = current {
        frames.push(TraceFrame {
            file: pos.file_name().to_owned(),
            line: pos.ln,
            display: context.display_name.clone(),
        });
        if let Some(entry_pos) = &context.parent_entry_pos {
            pos = entry_pos.clone();
        }
        current = context.parent.clone();
    }

    frames.reverse();
    frames
}

/// The evaluator. Holds a mutable handle on the [`Runtime`] so built-ins
/// like `run` and `use` can re-enter the full pipeline against the same
/// global tables.
pub struct Interpreter<'r> {
    pub runtime: &'r mut Runtime,
}

impl<'r> Interpreter<'r> {
    /// Evaluate one node in the given execution context.
    pub fn visit(&mut self, node: &Node, ctx: &Rc<Context>) -> Flow {
        match node {
            Node::Number(n) => self.visit_number(n),
            Node::Str(n) => self.visit_string(n),
            Node::Array(n) => self.visit_array(n, ctx),
            Node::VarAssign(n) => self.visit_var_assign(n, ctx),
            Node::ScopedAssign(n) => self.visit_scoped_assign(n, ctx),
            Node::StrictAssign(n) => self.visit_strict_assign(n, ctx),
            Node::Access(n) => self.visit_access(n, ctx),
            Node::BinaryOp(n) => self.visit_binary_op(n, ctx),
            Node::UnaryOp(n) => self.visit_unary_op(n, ctx),
            Node::If(n) => self.visit_if(n, ctx),
            Node::For(n) => self.visit_for(n, ctx),
            Node::While(n) => self.visit_while(n, ctx),
            Node::FuncDef(n) => self.visit_func_def(n, ctx),
            Node::Call(n) => self.visit_call(n, ctx),
            Node::Return(n) => self.visit_return(n, ctx),
            Node::Continue(_) => Flow::Continue,
            Node::Break(_) => Flow::Break,
        }
    }

    /// A runtime error with the traceback of the given context chain.
    pub(crate) fn runtime_error(
        &self,
        details: impl Into<String>,
        pos_start: &Position,
        pos_end: &Position,
        ctx: &Rc<Context>,
    ) -> Flow {
        Flow::error(Diagnostic::runtime(
            details,
            pos_start.clone(),
            pos_end.clone(),
            build_trace(ctx, pos_start),
        ))
    }

    /// Promote a pending operator error into a diagnostic.
    fn op_error(&self, err: OpErr, ctx: &Rc<Context>) -> Flow {
        Flow::error(Diagnostic::runtime(
            err.details,
            err.pos_start.clone(),
            err.pos_end,
            build_trace(ctx, &err.pos_start),
        ))
    }

    fn visit_number(&mut self, node: &NumberNode) -> Flow {
        let number = match node.value {
            NumberLiteral::Int(n) => Number::Int(n),
            NumberLiteral::Float(f) => Number::Float(f),
        };
        Flow::Value(Value::new(
            ValueKind::Number(number),
            node.pos_start.clone(),
            node.pos_end.clone(),
        ))
    }

    fn visit_string(&mut self, node: &StringNode) -> Flow {
        Flow::Value(Value::new(
            ValueKind::Str(node.value.clone()),
            node.pos_start.clone(),
            node.pos_end.clone(),
        ))
    }

    fn visit_array(&mut self, node: &ArrayNode, ctx: &Rc<Context>) -> Flow {
        let mut elements = Vec::with_capacity(node.elements.len());
        for element in &node.elements {
            elements.push(eval_value!(self.visit(element, ctx)));
        }
        Flow::Value(Value::new(
            ValueKind::Array(elements),
            node.pos_start.clone(),
            node.pos_end.clone(),
        ))
    }

    /// `var`/`let` always bind in the global table, whatever the current
    /// context.
    fn visit_var_assign(&mut self, node: &VarAssignNode, ctx: &Rc<Context>) -> Flow {
        let value = self.assignment_value(&node.value, &node.pos_start, &node.pos_end, ctx);
        let value = eval_value!(value);
        self.runtime
            .globals
            .borrow_mut()
            .set_entry(node.name, value.clone(), true, false, false, None);
        Flow::Value(value)
    }

    /// `scoped` binds in the current context; at the root it goes to the
    /// locked table instead, with a warning.
    fn visit_scoped_assign(&mut self, node: &ScopedAssignNode, ctx: &Rc<Context>) -> Flow {
        let value = self.assignment_value(&node.value, &node.pos_start, &node.pos_end, ctx);
        let value = eval_value!(value);
        if ctx.is_root() {
            self.runtime
                .locked
                .borrow_mut()
                .set_entry(node.name, value.clone(), true, true, false, None);
            self.runtime
                .emit_warning("Scoped is redundant in the Global Context!");
        } else {
            ctx.table
                .borrow_mut()
                .set_entry(node.name, value.clone(), true, true, false, None);
        }
        Flow::Value(value)
    }

    fn visit_strict_assign(&mut self, node: &StrictAssignNode, ctx: &Rc<Context>) -> Flow {
        let value = eval_value!(self.visit(&node.value, ctx));
        self.runtime.globals.borrow_mut().set_entry(
            node.name,
            value.clone(),
            true,
            false,
            true,
            Some(node.declared),
        );
        Flow::Value(value)
    }

    /// The initializer value, or the null Number when the declaration has
    /// no `=` clause.
    fn assignment_value(
        &mut self,
        value: &Option<Box<Node>>,
        pos_start: &Position,
        pos_end: &Position,
        ctx: &Rc<Context>,
    ) -> Flow {
        match value {
            Some(expr) => self.visit(expr, ctx),
            None => Flow::Value(Value::int(0, pos_start.clone(), pos_end.clone())),
        }
    }

    /// Name lookup: the context's table chain, then (at the root only) the
    /// locked table, then the global table for non-scoped bindings. The
    /// result is a copy repositioned to the access site.
    fn visit_access(&mut self, node: &AccessNode, ctx: &Rc<Context>) -> Flow {
        let entry = {
            let locked_hit = if ctx.is_root() {
                self.runtime.locked.borrow().get_local(node.name)
            } else {
                None
            };
            locked_hit
                .or_else(|| ctx.table.borrow().get(node.name))
                .or_else(|| {
                    self.runtime
                        .globals
                        .borrow()
                        .get_local(node.name)
                        .filter(|entry| !entry.is_scoped)
                })
        };

        match entry {
            Some(entry) => Flow::Value(
                entry
                    .value
                    .with_pos(node.pos_start.clone(), node.pos_end.clone()),
            ),
            None => self.runtime_error(
                format!("'{}' is not defined or not in this scope.", node.name),
                &node.pos_start,
                &node.pos_end,
                ctx,
            ),
        }
    }

    fn visit_binary_op(&mut self, node: &BinaryOpNode, ctx: &Rc<Context>) -> Flow {
        let left = eval_value!(self.visit(&node.left, ctx));
        let right = eval_value!(self.visit(&node.right, ctx));

        let result = match node.op {
            BinOp::Add => left.add(&right),
            BinOp::Sub => left.sub(&right),
            BinOp::Mul => left.mul(&right),
            BinOp::Div => left.div(&right),
            BinOp::Pow => left.pow(&right),
            BinOp::Mod => left.modulo(&right),
            BinOp::Ee => left.cmp_eq(&right),
            BinOp::Ne => left.cmp_ne(&right),
            BinOp::Lt => left.cmp_lt(&right),
            BinOp::Gt => left.cmp_gt(&right),
            BinOp::Lte => left.cmp_lte(&right),
            BinOp::Gte => left.cmp_gte(&right),
            BinOp::And => left.and_op(&right),
            BinOp::Or => left.or_op(&right),
        };

        match result {
            Ok(value) => Flow::Value(value.with_pos(node.pos_start.clone(), node.pos_end.clone())),
            Err(err) => self.op_error(err, ctx),
        }
    }

    fn visit_unary_op(&mut self, node: &UnaryOpNode, ctx: &Rc<Context>) -> Flow {
        let value = eval_value!(self.visit(&node.operand, ctx));

        let result = match node.op {
            UnOp::Pos => Ok(value.clone()),
            UnOp::Neg => value.mul(&Value::int(
                -1,
                node.pos_start.clone(),
                node.pos_end.clone(),
            )),
            UnOp::Not => value.not_op(),
        };

        match result {
            Ok(value) => Flow::Value(value.with_pos(node.pos_start.clone(), node.pos_end.clone())),
            Err(err) => self.op_error(err, ctx),
        }
    }

    /// Scan the arms in order; the first truthy condition wins. Block-form
    /// arms yield the no-return sentinel instead of their body's value.
    fn visit_if(&mut self, node: &IfNode, ctx: &Rc<Context>) -> Flow {
        for case in &node.cases {
            let condition = eval_value!(self.visit(&case.condition, ctx));
            if condition.is_true() {
                let value = eval_value!(self.visit(&case.body, ctx));
                return Flow::Value(if case.is_block {
                    Value::no_return(node.pos_start.clone(), node.pos_end.clone())
                } else {
                    value
                });
            }
        }

        if let Some(else_case) = &node.else_case {
            let value = eval_value!(self.visit(&else_case.body, ctx));
            return Flow::Value(if else_case.is_block {
                Value::no_return(node.pos_start.clone(), node.pos_end.clone())
            } else {
                value
            });
        }

        Flow::Value(Value::no_return(
            node.pos_start.clone(),
            node.pos_end.clone(),
        ))
    }

    /// Counted loop. The loop variable is written directly into the
    /// current context's table each iteration (there is no loop scope).
    /// Inline-form loops accumulate their body values into an Array.
    fn visit_for(&mut self, node: &ForNode, ctx: &Rc<Context>) -> Flow {
        let start = eval_value!(self.visit(&node.start, ctx));
        let end = eval_value!(self.visit(&node.end, ctx));
        let step = match &node.step {
            Some(step_node) => Some(eval_value!(self.visit(step_node, ctx))),
            None => None,
        };

        let Some(mut i) = number_of(&start) else {
            return self.runtime_error("Illegal operation", &start.pos_start, &start.pos_end, ctx);
        };
        let Some(end) = number_of(&end) else {
            return self.runtime_error("Illegal operation", &end.pos_start, &end.pos_end, ctx);
        };
        let step = match &step {
            Some(value) => match number_of(value) {
                Some(number) => number,
                None => {
                    return self.runtime_error(
                        "Illegal operation",
                        &value.pos_start,
                        &value.pos_end,
                        ctx,
                    );
                }
            },
            None => Number::Int(1),
        };

        let ascending = step.as_f64() >= 0.0;
        let mut elements = Vec::new();

        loop {
            let proceed = if ascending {
                i.as_f64() < end.as_f64()
            } else {
                i.as_f64() > end.as_f64()
            };
            if !proceed {
                break;
            }

            ctx.table.borrow_mut().set(
                node.var_name,
                Value::new(
                    ValueKind::Number(i),
                    node.pos_start.clone(),
                    node.pos_end.clone(),
                ),
            );
            i = num_add(i, step);

            match self.visit(&node.body, ctx) {
                Flow::Value(value) => elements.push(value),
                Flow::Continue => continue,
                Flow::Break => break,
                other => return other,
            }
        }

        Flow::Value(if node.is_block {
            Value::no_return(node.pos_start.clone(), node.pos_end.clone())
        } else {
            Value::new(
                ValueKind::Array(elements),
                node.pos_start.clone(),
                node.pos_end.clone(),
            )
        })
    }

    fn visit_while(&mut self, node: &WhileNode, ctx: &Rc<Context>) -> Flow {
        let mut elements = Vec::new();

        loop {
            let condition = eval_value!(self.visit(&node.condition, ctx));
            if !condition.is_true() {
                break;
            }

            match self.visit(&node.body, ctx) {
                Flow::Value(value) => elements.push(value),
                Flow::Continue => continue,
                Flow::Break => break,
                other => return other,
            }
        }

        Flow::Value(if node.is_block {
            Value::no_return(node.pos_start.clone(), node.pos_end.clone())
        } else {
            Value::new(
                ValueKind::Array(elements),
                node.pos_start.clone(),
                node.pos_end.clone(),
            )
        })
    }

    /// Build a function value capturing the defining context; a named
    /// definition also binds the name in the current table.
    fn visit_func_def(&mut self, node: &FuncDefNode, ctx: &Rc<Context>) -> Flow {
        let func = FuncValue {
            name: node.name,
            body: Rc::new((*node.body).clone()),
            params: Rc::new(node.params.clone()),
            auto_return: node.auto_return,
            ctx: Rc::clone(ctx),
        };
        let value = Value::new(
            ValueKind::Function(Rc::new(func)),
            node.pos_start.clone(),
            node.pos_end.clone(),
        );

        if let Some(name) = node.name {
            ctx.table.borrow_mut().set(name, value.clone());
        }

        Flow::Value(value)
    }

    fn visit_call(&mut self, node: &CallNode, ctx: &Rc<Context>) -> Flow {
        let callee = eval_value!(self.visit(&node.callee, ctx));
        let callee = callee.with_pos(node.pos_start.clone(), node.pos_end.clone());

        let mut args = Vec::with_capacity(node.args.len());
        for arg in &node.args {
            args.push(eval_value!(self.visit(arg, ctx)));
        }

        let result = match callee.kind.clone() {
            ValueKind::Function(func) => self.call_function(&func, &callee, args),
            ValueKind::Builtin(spec) => self.call_builtin(spec, &callee, args, ctx),
            _ => self.runtime_error("Illegal operation", &callee.pos_start, &callee.pos_end, ctx),
        };

        match result {
            Flow::Value(value) => {
                Flow::Value(value.with_pos(node.pos_start.clone(), node.pos_end.clone()))
            }
            other => other,
        }
    }

    /// Apply a user function: fresh child context of the captured one,
    /// arity check, positional binding with trailing defaults, then the
    /// body. Arrow bodies auto-return their value; block bodies return the
    /// explicit `return` value or the null Number.
    fn call_function(&mut self, func: &Rc<FuncValue>, callee: &Value, args: Vec<Value>) -> Flow {
        let exec_ctx = Context::child(
            func.display_name(),
            &func.ctx,
            callee.pos_start.clone(),
            &func.ctx.table,
        );

        let defaults = func.params.iter().filter(|p| p.default.is_some()).count();
        if let Some(err) =
            self.check_arity(callee, func.params.len(), defaults, args.len(), &func.ctx)
        {
            return err;
        }

        for (i, param) in func.params.iter().enumerate() {
            let value = if i < args.len() {
                args[i].clone()
            } else {
                // Trailing default: convert the stored literal token. The
                // arity check has ensured every unbound parameter has one.
                let kind = match param.default.as_ref().map(|token| &token.kind) {
                    Some(TokenKind::Int(n)) => ValueKind::Number(Number::Int(*n)),
                    Some(TokenKind::Float(f)) => ValueKind::Number(Number::Float(*f)),
                    Some(TokenKind::Str(s)) => ValueKind::Str(s.clone()),
                    _ => ValueKind::Number(Number::Int(0)),
                };
                Value::new(kind, callee.pos_start.clone(), callee.pos_end.clone())
            };
            exec_ctx.table.borrow_mut().set(param.name, value);
        }

        match self.visit(&func.body, &exec_ctx) {
            Flow::Value(value) => Flow::Value(if func.auto_return {
                value
            } else {
                Value::int(0, callee.pos_start.clone(), callee.pos_end.clone())
            }),
            Flow::Return(value) => Flow::Value(value),
            other => other,
        }
    }

    /// Apply a built-in: fresh child context named after it, arity check,
    /// parameter binding, then the native implementation.
    fn call_builtin(
        &mut self,
        spec: &'static BuiltinSpec,
        callee: &Value,
        args: Vec<Value>,
        ctx: &Rc<Context>,
    ) -> Flow {
        let exec_ctx = Context::child(spec.name, ctx, callee.pos_start.clone(), &ctx.table);

        if let Some(err) = self.check_arity(callee, spec.params.len(), 0, args.len(), ctx) {
            return err;
        }

        for (param, value) in spec.params.iter().zip(args.iter()) {
            exec_ctx
                .table
                .borrow_mut()
                .set(peanut_util::Symbol::intern(param), value.clone());
        }

        let call = BuiltinCall {
            args,
            pos_start: callee.pos_start.clone(),
            pos_end: callee.pos_end.clone(),
            ctx: exec_ctx,
        };
        (spec.func)(self, &call)
    }

    /// Arity validation shared by user functions and built-ins.
    fn check_arity(
        &self,
        callee: &Value,
        n_params: usize,
        n_defaults: usize,
        n_args: usize,
        ctx: &Rc<Context>,
    ) -> Option<Flow> {
        if n_args > n_params {
            return Some(self.runtime_error(
                format!("{} too many args passed into {}", n_args - n_params, callee),
                &callee.pos_start,
                &callee.pos_end,
                ctx,
            ));
        }
        let required = n_params - n_defaults;
        if n_args < required {
            return Some(self.runtime_error(
                format!("{} too few args passed into {}", n_params - n_args, callee),
                &callee.pos_start,
                &callee.pos_end,
                ctx,
            ));
        }
        None
    }

    fn visit_return(&mut self, node: &ReturnNode, ctx: &Rc<Context>) -> Flow {
        let value = match &node.value {
            Some(expr) => eval_value!(self.visit(expr, ctx)),
            None => Value::no_return(node.pos_start.clone(), node.pos_end.clone()),
        };
        Flow::Return(value)
    }
}

/// The numeric payload of a value, if it is a Number.
fn number_of(value: &Value) -> Option<Number> {
    match &value.kind {
        ValueKind::Number(n) => Some(*n),
        _ => None,
    }
}
