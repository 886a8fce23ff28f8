//! `log`: passes its argument through and records it with the evaluator's sink.

use crate::error::LogicError;
use crate::eval_ctx::EvalCtx;
use crate::types::{EvalFn, OperatorDefinition, Shape, Signature};
use serde_json::Value;

const LOG: &[Signature] = &[Signature::new(&[Shape::Any])];

fn log_eval(args: &[Value], ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    ctx.log(&args[0]);
    Ok(args[0].clone())
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![OperatorDefinition {
        name: "log",
        signatures: LOG,
        eval_fn: EvalFn::Eager(log_eval),
        pass_data: false,
    }]
}
