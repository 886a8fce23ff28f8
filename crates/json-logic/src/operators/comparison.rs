//! Comparison operators: equality families and chained ordering.

use crate::error::LogicError;
use crate::eval_ctx::EvalCtx;
use crate::types::{EvalFn, OperatorDefinition, Shape, Signature};
use crate::value::{loose_eq, strict_eq, Num};
use serde_json::Value;
use std::cmp::Ordering;

const BINARY: &[Signature] = &[Signature::new(&[Shape::Any, Shape::Any])];
const CHAIN: &[Signature] = &[Signature::new(&[Shape::Number, Shape::Number]).rest(Shape::Number)];

fn eq_eval(args: &[Value], _ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    Ok(Value::Bool(loose_eq(&args[0], &args[1])))
}

fn ne_eval(args: &[Value], _ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    Ok(Value::Bool(!loose_eq(&args[0], &args[1])))
}

fn strict_eq_eval(args: &[Value], _ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    Ok(Value::Bool(strict_eq(&args[0], &args[1])))
}

fn strict_ne_eval(args: &[Value], _ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    Ok(Value::Bool(!strict_eq(&args[0], &args[1])))
}

/// True when every adjacent pair satisfies `accept`; stops at the first pair
/// that does not.
fn chain(args: &[Value], accept: fn(Ordering) -> bool) -> Value {
    let nums: Vec<Option<Num>> = args.iter().map(Num::from_value).collect();
    let holds = nums.windows(2).all(|pair| match (pair[0], pair[1]) {
        (Some(a), Some(b)) => a.partial_cmp_num(b).is_some_and(accept),
        _ => false,
    });
    Value::Bool(holds)
}

fn lt_eval(args: &[Value], _ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    Ok(chain(args, Ordering::is_lt))
}

fn le_eval(args: &[Value], _ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    Ok(chain(args, Ordering::is_le))
}

fn gt_eval(args: &[Value], _ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    Ok(chain(args, Ordering::is_gt))
}

fn ge_eval(args: &[Value], _ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    Ok(chain(args, Ordering::is_ge))
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition {
            name: "==",
            signatures: BINARY,
            eval_fn: EvalFn::Eager(eq_eval),
            pass_data: false,
        },
        OperatorDefinition {
            name: "===",
            signatures: BINARY,
            eval_fn: EvalFn::Eager(strict_eq_eval),
            pass_data: false,
        },
        OperatorDefinition {
            name: "!=",
            signatures: BINARY,
            eval_fn: EvalFn::Eager(ne_eval),
            pass_data: false,
        },
        OperatorDefinition {
            name: "!==",
            signatures: BINARY,
            eval_fn: EvalFn::Eager(strict_ne_eval),
            pass_data: false,
        },
        OperatorDefinition {
            name: "<",
            signatures: CHAIN,
            eval_fn: EvalFn::Eager(lt_eval),
            pass_data: false,
        },
        OperatorDefinition {
            name: "<=",
            signatures: CHAIN,
            eval_fn: EvalFn::Eager(le_eval),
            pass_data: false,
        },
        OperatorDefinition {
            name: ">",
            signatures: CHAIN,
            eval_fn: EvalFn::Eager(gt_eval),
            pass_data: false,
        },
        OperatorDefinition {
            name: ">=",
            signatures: CHAIN,
            eval_fn: EvalFn::Eager(ge_eval),
            pass_data: false,
        },
    ]
}
