//! Array operators, including the higher-order ones that evaluate an
//! expression once per element with the element as the data context.

use crate::error::LogicError;
use crate::eval_ctx::{Data, EvalCtx};
use crate::expression::Arg;
use crate::types::{EvalFn, OperatorDefinition, Shape, Signature};
use crate::value::{is_truthy, native_eq};
use serde_json::{Map, Value};

const ITERATE: &[Signature] = &[Signature::new(&[Shape::Any, Shape::Expr])];
const REDUCE: &[Signature] = &[Signature::new(&[Shape::Any, Shape::Expr]).optional(&[Shape::Any])];
const MERGE: &[Signature] = &[Signature::new(&[]).rest(Shape::Any)];
const IN: &[Signature] = &[
    Signature::new(&[Shape::String, Shape::String]),
    Signature::new(&[Shape::Any, Shape::Array]),
];

/// Evaluates argument 0, which must produce an array. A mismatch is reported
/// at the argument's own location.
fn source_array(args: &[Arg], ctx: &EvalCtx<'_>) -> Result<Vec<Value>, LogicError> {
    match ctx.evaluate_arg(args, 0)? {
        Value::Array(items) => Ok(items),
        other => Err(LogicError::ArgumentTypeMismatch {
            path: ctx.arg_path(0),
            op: ctx.op.to_string(),
            position: 0,
            expected: Shape::Array,
            actual: other,
        }),
    }
}

fn apply(args: &[Arg], ctx: &EvalCtx<'_>, item: &Value) -> Result<Value, LogicError> {
    ctx.evaluate_arg_with(args, 1, Data::Value(item))
}

fn map_eval(args: &[Arg], ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    let items = source_array(args, ctx)?;
    let mapped = items
        .iter()
        .map(|item| apply(args, ctx, item))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array(mapped))
}

fn filter_eval(args: &[Arg], ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    let items = source_array(args, ctx)?;
    let mut kept = Vec::new();
    for item in items {
        if is_truthy(&apply(args, ctx, &item)?) {
            kept.push(item);
        }
    }
    Ok(Value::Array(kept))
}

/// Folds with `{"current": item, "accumulator": acc}` as the data context.
fn reduce_eval(args: &[Arg], ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    let items = source_array(args, ctx)?;
    let mut acc = match args.len() {
        3 => ctx.evaluate_arg(args, 2)?,
        _ => Value::Null,
    };
    for item in items {
        let mut scope = Map::with_capacity(2);
        scope.insert("current".to_string(), item);
        scope.insert("accumulator".to_string(), acc);
        acc = apply(args, ctx, &Value::Object(scope))?;
    }
    Ok(acc)
}

fn all_eval(args: &[Arg], ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    for item in &source_array(args, ctx)? {
        if !is_truthy(&apply(args, ctx, item)?) {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

fn any_match(args: &[Arg], ctx: &EvalCtx<'_>) -> Result<bool, LogicError> {
    for item in &source_array(args, ctx)? {
        if is_truthy(&apply(args, ctx, item)?) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn none_eval(args: &[Arg], ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    Ok(Value::Bool(!any_match(args, ctx)?))
}

fn some_eval(args: &[Arg], ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    Ok(Value::Bool(any_match(args, ctx)?))
}

fn merge_eval(args: &[Value], _ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    let mut merged = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Value::Array(items) => merged.extend(items.iter().cloned()),
            other => merged.push(other.clone()),
        }
    }
    Ok(Value::Array(merged))
}

fn in_eval(args: &[Value], _ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    let found = match (&args[0], &args[1]) {
        (Value::String(needle), Value::String(haystack)) => haystack.contains(needle.as_str()),
        (needle, Value::Array(haystack)) => haystack.iter().any(|item| native_eq(item, needle)),
        _ => false,
    };
    Ok(Value::Bool(found))
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition {
            name: "map",
            signatures: ITERATE,
            eval_fn: EvalFn::Lazy(map_eval),
            pass_data: true,
        },
        OperatorDefinition {
            name: "filter",
            signatures: ITERATE,
            eval_fn: EvalFn::Lazy(filter_eval),
            pass_data: true,
        },
        OperatorDefinition {
            name: "reduce",
            signatures: REDUCE,
            eval_fn: EvalFn::Lazy(reduce_eval),
            pass_data: true,
        },
        OperatorDefinition {
            name: "all",
            signatures: ITERATE,
            eval_fn: EvalFn::Lazy(all_eval),
            pass_data: true,
        },
        OperatorDefinition {
            name: "none",
            signatures: ITERATE,
            eval_fn: EvalFn::Lazy(none_eval),
            pass_data: true,
        },
        OperatorDefinition {
            name: "some",
            signatures: ITERATE,
            eval_fn: EvalFn::Lazy(some_eval),
            pass_data: true,
        },
        OperatorDefinition {
            name: "merge",
            signatures: MERGE,
            eval_fn: EvalFn::Eager(merge_eval),
            pass_data: false,
        },
        OperatorDefinition {
            name: "in",
            signatures: IN,
            eval_fn: EvalFn::Eager(in_eval),
            pass_data: false,
        },
    ]
}
