//! String operators: `cat`, `substr`.

use crate::error::LogicError;
use crate::eval_ctx::EvalCtx;
use crate::types::{EvalFn, OperatorDefinition, Shape, Signature};
use crate::value::Num;
use serde_json::Value;

const CAT: &[Signature] = &[Signature::new(&[]).rest(Shape::String)];
const SUBSTR: &[Signature] = &[Signature::new(&[Shape::String, Shape::Int]).optional(&[Shape::Int])];

fn cat_eval(args: &[Value], _ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    let joined: String = args.iter().filter_map(Value::as_str).collect();
    Ok(Value::String(joined))
}

/// Clamps a slice bound; negative bounds count back from `len`.
fn slice_index(idx: i128, len: usize) -> usize {
    let len_i = len as i128;
    if idx < 0 {
        (len_i + idx).max(0) as usize
    } else {
        idx.min(len_i) as usize
    }
}

/// Character slice `[start, end)` with negative bounds counting from the end;
/// `end` defaults to the string length.
pub fn substr(s: &str, start: i128, end: Option<i128>) -> String {
    let chars: Vec<char> = s.chars().collect();
    let from = slice_index(start, chars.len());
    let to = end.map_or(chars.len(), |end| slice_index(end, chars.len()));
    if from >= to {
        return String::new();
    }
    chars[from..to].iter().collect()
}

fn substr_eval(args: &[Value], _ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    let s = args[0].as_str().unwrap_or_default();
    let start = Num::int(&args[1]).unwrap_or(0);
    let end = args.get(2).and_then(Num::int);
    Ok(Value::String(substr(s, start, end)))
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition {
            name: "cat",
            signatures: CAT,
            eval_fn: EvalFn::Eager(cat_eval),
            pass_data: false,
        },
        OperatorDefinition {
            name: "substr",
            signatures: SUBSTR,
            eval_fn: EvalFn::Eager(substr_eval),
            pass_data: false,
        },
    ]
}
