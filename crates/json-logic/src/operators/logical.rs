//! Logical operators: `!`, `!!`, `and`, `or`.

use crate::error::LogicError;
use crate::eval_ctx::EvalCtx;
use crate::expression::Arg;
use crate::types::{EvalFn, OperatorDefinition, Shape, Signature};
use crate::value::is_truthy;
use serde_json::Value;

const UNARY: &[Signature] = &[Signature::new(&[Shape::Any])];
const VARIADIC: &[Signature] = &[Signature::new(&[]).rest(Shape::Any)];

fn not_eval(args: &[Value], _ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    Ok(Value::Bool(!is_truthy(&args[0])))
}

fn not_not_eval(args: &[Value], _ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    Ok(Value::Bool(is_truthy(&args[0])))
}

/// Returns the first falsy operand, else the last operand; `true` when empty.
fn and_eval(args: &[Arg], ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    let mut acc = Value::Bool(true);
    for i in 0..args.len() {
        acc = ctx.evaluate_arg(args, i)?;
        if !is_truthy(&acc) {
            return Ok(acc);
        }
    }
    Ok(acc)
}

/// Returns the first truthy operand, else the last operand; `false` when empty.
fn or_eval(args: &[Arg], ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    let mut acc = Value::Bool(false);
    for i in 0..args.len() {
        acc = ctx.evaluate_arg(args, i)?;
        if is_truthy(&acc) {
            return Ok(acc);
        }
    }
    Ok(acc)
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition {
            name: "!",
            signatures: UNARY,
            eval_fn: EvalFn::Eager(not_eval),
            pass_data: false,
        },
        OperatorDefinition {
            name: "!!",
            signatures: UNARY,
            eval_fn: EvalFn::Eager(not_not_eval),
            pass_data: false,
        },
        OperatorDefinition {
            name: "and",
            signatures: VARIADIC,
            eval_fn: EvalFn::Lazy(and_eval),
            pass_data: true,
        },
        OperatorDefinition {
            name: "or",
            signatures: VARIADIC,
            eval_fn: EvalFn::Lazy(or_eval),
            pass_data: true,
        },
    ]
}
