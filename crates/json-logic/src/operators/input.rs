//! Data access operators: `var`, `missing`, `missing_some`.

use crate::error::LogicError;
use crate::eval_ctx::EvalCtx;
use crate::types::{EvalFn, OperatorDefinition, Shape, Signature};
use crate::value::{parse_int_literal, Num};
use serde_json::Value;

const KEY: Shape = Shape::Union(&[Shape::String, Shape::Int]);
const KEYS: Shape = Shape::ArrayOf(&Shape::String);

const VAR: &[Signature] = &[Signature::new(&[KEY]).optional(&[Shape::Any])];
const MISSING: &[Signature] = &[Signature::new(&[KEYS]), Signature::new(&[]).rest(Shape::String)];
const MISSING_SOME: &[Signature] = &[Signature::new(&[Shape::Int, KEYS])];

/// Looks up one path segment. An integer-looking segment indexes arrays;
/// against objects every segment is a plain key.
fn step<'v>(data: &'v Value, segment: &str) -> Option<&'v Value> {
    match data {
        Value::Object(obj) => obj.get(segment),
        Value::Array(arr) => parse_int_literal(segment)
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| arr.get(i)),
        _ => None,
    }
}

/// Resolves a `var` key against `data`. `None` means the key is absent.
///
/// A string key is split on `.` and walked one segment at a time; the empty
/// string addresses `data` itself. An integer key is a single segment.
pub fn resolve<'v>(data: &'v Value, key: &Value) -> Option<&'v Value> {
    match key {
        Value::String(s) if s.is_empty() => Some(data),
        Value::String(s) => s.split('.').try_fold(data, |value, segment| step(value, segment)),
        Value::Number(n) => match n.as_u64() {
            Some(i) => step(data, &i.to_string()),
            None => None,
        },
        _ => None,
    }
}

fn var_eval(args: &[Value], ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    let data = ctx.data()?;
    match resolve(data, &args[0]) {
        Some(value) => Ok(value.clone()),
        None => Ok(args.get(1).cloned().unwrap_or(Value::Null)),
    }
}

fn missing_keys<'k>(data: &Value, keys: &'k [Value]) -> Vec<&'k Value> {
    keys.iter().filter(|key| resolve(data, key).is_none()).collect()
}

fn missing_eval(args: &[Value], ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    let data = ctx.data()?;
    let keys = match args {
        [Value::Array(keys)] => keys.as_slice(),
        keys => keys,
    };
    Ok(Value::Array(missing_keys(data, keys).into_iter().cloned().collect()))
}

fn missing_some_eval(args: &[Value], ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    let data = ctx.data()?;
    let need = Num::int(&args[0]).unwrap_or(0);
    let keys = args[1].as_array().map(Vec::as_slice).unwrap_or_default();
    let missing = missing_keys(data, keys);
    let present = (keys.len() - missing.len()) as i128;
    if present >= need {
        return Ok(Value::Array(vec![]));
    }
    Ok(Value::Array(missing.into_iter().cloned().collect()))
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition {
            name: "var",
            signatures: VAR,
            eval_fn: EvalFn::Eager(var_eval),
            pass_data: true,
        },
        OperatorDefinition {
            name: "missing",
            signatures: MISSING,
            eval_fn: EvalFn::Eager(missing_eval),
            pass_data: true,
        },
        OperatorDefinition {
            name: "missing_some",
            signatures: MISSING_SOME,
            eval_fn: EvalFn::Eager(missing_some_eval),
            pass_data: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_segments() {
        let data = json!({"a": [{"b": 1}], "1": "one"});
        assert_eq!(resolve(&data, &json!("a.0.b")), Some(&json!(1)));
        assert_eq!(resolve(&data, &json!("1")), Some(&json!("one")));
        assert_eq!(resolve(&data, &json!(1)), Some(&json!("one")));
        assert_eq!(resolve(&data, &json!("a.1.b")), None);
        assert_eq!(resolve(&data, &json!("a.-1")), None);
        assert_eq!(resolve(&data, &json!("")), Some(&data));
    }

    #[test]
    fn test_resolve_through_scalars_is_absent() {
        let data = json!({"a": 5});
        assert_eq!(resolve(&data, &json!("a.b")), None);
        assert_eq!(resolve(&json!(null), &json!("a")), None);
    }

    #[test]
    fn test_present_null_is_not_missing() {
        let data = json!({"a": null});
        assert_eq!(resolve(&data, &json!("a")), Some(&Value::Null));
    }
}
