//! Branching operators: `if`.

use crate::error::LogicError;
use crate::eval_ctx::EvalCtx;
use crate::expression::Arg;
use crate::types::{EvalFn, OperatorDefinition, Shape, Signature};
use crate::value::is_truthy;
use serde_json::Value;

const IF: &[Signature] = &[Signature::new(&[Shape::Any, Shape::Any]).rest(Shape::Any)];

/// `[cond, then, cond, then, ..., else?]`. Only the conditions up to the first
/// truthy one and the selected branch are evaluated.
fn if_eval(args: &[Arg], ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    let mut i = 0;
    while i + 1 < args.len() {
        if is_truthy(&ctx.evaluate_arg(args, i)?) {
            return ctx.evaluate_arg(args, i + 1);
        }
        i += 2;
    }
    if i < args.len() {
        ctx.evaluate_arg(args, i)
    } else {
        Ok(Value::Null)
    }
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![OperatorDefinition {
        name: "if",
        signatures: IF,
        eval_fn: EvalFn::Lazy(if_eval),
        pass_data: true,
    }]
}
