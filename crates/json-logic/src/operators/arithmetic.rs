//! Arithmetic operators.
//!
//! Integer operands stay integral until a result leaves the JSON integer
//! range or a float joins in; `/` always produces a float.

use crate::error::LogicError;
use crate::eval_ctx::EvalCtx;
use crate::types::{EvalFn, OperatorDefinition, Shape, Signature};
use crate::value::{parse_float_literal, Num};
use serde_json::Value;
use std::cmp::Ordering;

const ADD: &[Signature] = &[
    Signature::new(&[Shape::String]),
    Signature::new(&[]).rest(Shape::Number),
];
const SUB: &[Signature] = &[Signature::new(&[Shape::Number]).optional(&[Shape::Number])];
const MUL: &[Signature] = &[Signature::new(&[]).rest(Shape::Number)];
const BINARY: &[Signature] = &[Signature::new(&[Shape::Number, Shape::Number])];
const EXTREMUM: &[Signature] = &[Signature::new(&[Shape::Number]).rest(Shape::Number)];

fn nums(args: &[Value]) -> impl Iterator<Item = Num> + '_ {
    args.iter().filter_map(Num::from_value)
}

fn combine(
    a: Num,
    b: Num,
    int_op: fn(i128, i128) -> Option<i128>,
    float_op: fn(f64, f64) -> f64,
) -> Num {
    if let (Num::Int(x), Num::Int(y)) = (a, b) {
        if let Some(n) = int_op(x, y) {
            return Num::from_i128(n);
        }
    }
    Num::Float(float_op(a.as_f64(), b.as_f64()))
}

fn finish(n: Num, ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    n.to_value()
        .ok_or_else(|| LogicError::NonFiniteNumber { path: ctx.path.clone() })
}

fn add_eval(args: &[Value], ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    if let [Value::String(s)] = args {
        let parsed = parse_float_literal(s).ok_or_else(|| LogicError::InvalidNumber {
            path: ctx.path.clone(),
            value: s.clone(),
        })?;
        return finish(Num::Float(parsed), ctx);
    }
    let sum = nums(args).fold(Num::Int(0), |acc, n| {
        combine(acc, n, i128::checked_add, |x, y| x + y)
    });
    finish(sum, ctx)
}

fn subtract_eval(args: &[Value], ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    let mut operands = nums(args);
    let first = operands.next().unwrap_or(Num::Int(0));
    let result = match operands.next() {
        Some(second) => combine(first, second, i128::checked_sub, |x, y| x - y),
        None => match first {
            Num::Int(i) => Num::from_i128(-i),
            Num::Float(f) => Num::Float(-f),
        },
    };
    finish(result, ctx)
}

fn multiply_eval(args: &[Value], ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    let product = nums(args).fold(Num::Int(1), |acc, n| {
        combine(acc, n, i128::checked_mul, |x, y| x * y)
    });
    finish(product, ctx)
}

fn divisor(args: &[Value], ctx: &EvalCtx<'_>) -> Result<(Num, Num), LogicError> {
    let mut operands = nums(args);
    match (operands.next(), operands.next()) {
        (Some(_), Some(b)) if b.as_f64() == 0.0 => {
            Err(LogicError::DivisionByZero { path: ctx.path.clone() })
        }
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(LogicError::ArgumentCountMismatch {
            path: ctx.path.clone(),
            op: ctx.op.to_string(),
            expected: "2".to_string(),
            actual: args.len(),
        }),
    }
}

fn divide_eval(args: &[Value], ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    let (a, b) = divisor(args, ctx)?;
    finish(Num::Float(a.as_f64() / b.as_f64()), ctx)
}

/// Floored modulo: a non-zero result takes the sign of the divisor.
fn mod_eval(args: &[Value], ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    let (a, b) = divisor(args, ctx)?;
    let result = match (a, b) {
        (Num::Int(x), Num::Int(y)) => {
            let r = x % y;
            Num::from_i128(if r != 0 && (r < 0) != (y < 0) { r + y } else { r })
        }
        (x, y) => {
            let (x, y) = (x.as_f64(), y.as_f64());
            let r = x % y;
            Num::Float(if r != 0.0 && (r < 0.0) != (y < 0.0) { r + y } else { r })
        }
    };
    finish(result, ctx)
}

fn extremum(args: &[Value], keep: Ordering) -> Value {
    let mut best: Option<(&Value, Num)> = None;
    for value in args {
        if let Some(n) = Num::from_value(value) {
            best = match best {
                Some((_, current)) if n.partial_cmp_num(current) == Some(keep) => Some((value, n)),
                None => Some((value, n)),
                other => other,
            };
        }
    }
    best.map(|(value, _)| value.clone()).unwrap_or(Value::Null)
}

fn max_eval(args: &[Value], _ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    Ok(extremum(args, Ordering::Greater))
}

fn min_eval(args: &[Value], _ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    Ok(extremum(args, Ordering::Less))
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition {
            name: "max",
            signatures: EXTREMUM,
            eval_fn: EvalFn::Eager(max_eval),
            pass_data: false,
        },
        OperatorDefinition {
            name: "min",
            signatures: EXTREMUM,
            eval_fn: EvalFn::Eager(min_eval),
            pass_data: false,
        },
        OperatorDefinition {
            name: "+",
            signatures: ADD,
            eval_fn: EvalFn::Eager(add_eval),
            pass_data: false,
        },
        OperatorDefinition {
            name: "-",
            signatures: SUB,
            eval_fn: EvalFn::Eager(subtract_eval),
            pass_data: false,
        },
        OperatorDefinition {
            name: "*",
            signatures: MUL,
            eval_fn: EvalFn::Eager(multiply_eval),
            pass_data: false,
        },
        OperatorDefinition {
            name: "/",
            signatures: BINARY,
            eval_fn: EvalFn::Eager(divide_eval),
            pass_data: false,
        },
        OperatorDefinition {
            name: "%",
            signatures: BINARY,
            eval_fn: EvalFn::Eager(mod_eval),
            pass_data: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_overflow_falls_back_to_float() {
        let max = i128::from(u64::MAX);
        let sum = combine(Num::Int(i64::MAX.into()), Num::Int(1), i128::checked_add, |x, y| x + y);
        assert_eq!(sum, Num::Int(i128::from(i64::MAX) + 1));
        let sum = combine(Num::Int(max), Num::Int(1), i128::checked_add, |x, y| x + y);
        assert_eq!(sum, Num::Float(u64::MAX as f64 + 1.0));
        let product = combine(Num::Int(max), Num::Int(max), i128::checked_mul, |x, y| x * y);
        assert_eq!(product, Num::Float(u64::MAX as f64 * u64::MAX as f64));
        let sum = combine(Num::Int(2), Num::Int(3), i128::checked_add, |x, y| x + y);
        assert_eq!(sum, Num::Int(5));
        let sum = combine(Num::Int(2), Num::Float(0.5), i128::checked_add, |x, y| x + y);
        assert_eq!(sum, Num::Float(2.5));
    }
}
