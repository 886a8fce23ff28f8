//! Parsed JSONLogic expressions.
//!
//! A value is JSONLogic when it is an object with exactly one key whose value
//! is not `null`. The key names the operator; an array value supplies one
//! argument per element, any other value is the sole argument.

use crate::error::LogicError;
use crate::path::Path;
use serde_json::{Map, Value};

/// One argument slot of an [`Expression`].
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Literal(Value),
    Expr(Box<Expression>),
}

impl Arg {
    /// Parses a nested position: JSONLogic becomes a sub-expression, anything
    /// else stays a literal.
    pub fn parse(value: &Value) -> Arg {
        match Expression::try_parse(value, None, &Path::root()) {
            Ok(Some(expr)) => Arg::Expr(Box::new(expr)),
            _ => Arg::Literal(value.clone()),
        }
    }

    pub fn as_expr(&self) -> Option<&Expression> {
        match self {
            Arg::Expr(expr) => Some(expr),
            Arg::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Arg::Literal(value) => Some(value),
            Arg::Expr(_) => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Arg::Literal(value) => value.clone(),
            Arg::Expr(expr) => expr.to_value(),
        }
    }
}

/// A syntactically valid expression: an operator name and its argument slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub op: String,
    pub args: Vec<Arg>,
}

/// Returns true if `value` is syntactically JSONLogic.
///
/// This says nothing about whether the operator exists.
pub fn is_json_logic(value: &Value) -> bool {
    single_entry(value).is_some()
}

fn single_entry(value: &Value) -> Option<(&String, &Value)> {
    let obj = value.as_object()?;
    if obj.len() != 1 {
        return None;
    }
    obj.iter().next().filter(|(_, arg)| !arg.is_null())
}

impl Expression {
    pub fn new(op: impl Into<String>, args: Vec<Arg>) -> Self {
        Expression { op: op.into(), args }
    }

    /// Parses a top-level expression.
    ///
    /// ```
    /// use json_logic::Expression;
    /// use serde_json::json;
    ///
    /// let expr = Expression::parse(&json!({"var": "a"})).unwrap();
    /// assert_eq!(expr.op, "var");
    /// assert!(Expression::parse(&json!({"a": 1, "b": 2})).is_err());
    /// ```
    pub fn parse(value: &Value) -> Result<Expression, LogicError> {
        Expression::parse_with_limit(value, None)
    }

    /// Like [`Expression::parse`], rejecting nesting deeper than `max_depth`
    /// (a lone operator has depth 1).
    pub fn parse_with_limit(value: &Value, max_depth: Option<usize>) -> Result<Expression, LogicError> {
        Expression::try_parse(value, max_depth, &Path::root())?
            .ok_or_else(|| LogicError::MalformedExpression { value: value.clone() })
    }

    fn try_parse(
        value: &Value,
        max_depth: Option<usize>,
        path: &Path,
    ) -> Result<Option<Expression>, LogicError> {
        Expression::parse_level(value, max_depth, 1, path)
    }

    fn parse_level(
        value: &Value,
        max_depth: Option<usize>,
        depth: usize,
        path: &Path,
    ) -> Result<Option<Expression>, LogicError> {
        let (op, arg) = match single_entry(value) {
            Some(entry) => entry,
            None => return Ok(None),
        };
        if let Some(limit) = max_depth {
            if depth > limit {
                return Err(LogicError::DepthLimitExceeded { path: path.clone(), limit });
            }
        }
        let op_path = path.append(op.as_str());
        let slots: &[Value] = match arg {
            Value::Array(items) => items,
            other => std::slice::from_ref(other),
        };
        let mut args = Vec::with_capacity(slots.len());
        for (i, slot) in slots.iter().enumerate() {
            let parsed = match Expression::parse_level(slot, max_depth, depth + 1, &op_path.append(i))? {
                Some(expr) => Arg::Expr(Box::new(expr)),
                None => Arg::Literal(slot.clone()),
            };
            args.push(parsed);
        }
        Ok(Some(Expression { op: op.clone(), args }))
    }

    /// Rebuilds the JSON form, always with an argument array.
    pub fn to_value(&self) -> Value {
        let args = self.args.iter().map(Arg::to_value).collect();
        let mut obj = Map::with_capacity(1);
        obj.insert(self.op.clone(), Value::Array(args));
        Value::Object(obj)
    }

    /// Nesting depth; a lone operator has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .args
            .iter()
            .filter_map(Arg::as_expr)
            .map(Expression::depth)
            .max()
            .unwrap_or(0)
    }
}

impl TryFrom<&Value> for Expression {
    type Error = LogicError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Expression::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validity_rule() {
        assert!(is_json_logic(&json!({"var": "a"})));
        assert!(is_json_logic(&json!({"unknown_op": [1, 2]})));
        assert!(!is_json_logic(&json!({"var": null})));
        assert!(!is_json_logic(&json!({})));
        assert!(!is_json_logic(&json!({"a": 1, "b": 2})));
        assert!(!is_json_logic(&json!([{"var": "a"}])));
        assert!(!is_json_logic(&json!("var")));
    }

    #[test]
    fn test_scalar_argument_is_single_slot() {
        let expr = Expression::parse(&json!({"var": "a"})).unwrap();
        assert_eq!(expr.args, vec![Arg::Literal(json!("a"))]);
    }

    #[test]
    fn test_nested_expressions_and_literals() {
        let expr = Expression::parse(&json!({"==": [{"var": "a"}, {"x": 1, "y": 2}]})).unwrap();
        assert_eq!(expr.op, "==");
        assert_eq!(
            expr.args[0],
            Arg::Expr(Box::new(Expression::new("var", vec![Arg::Literal(json!("a"))])))
        );
        assert_eq!(expr.args[1], Arg::Literal(json!({"x": 1, "y": 2})));
    }

    #[test]
    fn test_array_inside_argument_list_stays_literal() {
        let expr = Expression::parse(&json!({"in": ["a", ["a", {"var": "b"}]]})).unwrap();
        assert_eq!(expr.args[1], Arg::Literal(json!(["a", {"var": "b"}])));
    }

    #[test]
    fn test_malformed_top_level() {
        let err = Expression::parse(&json!({"var": null})).unwrap_err();
        assert_eq!(err, LogicError::MalformedExpression { value: json!({"var": null}) });
    }

    #[test]
    fn test_depth_limit() {
        let value = json!({"!": {"!": {"!": true}}});
        assert_eq!(Expression::parse(&value).unwrap().depth(), 3);
        assert!(Expression::parse_with_limit(&value, Some(3)).is_ok());
        let err = Expression::parse_with_limit(&value, Some(2)).unwrap_err();
        match err {
            LogicError::DepthLimitExceeded { path, limit } => {
                assert_eq!(path.to_string(), "$.!.0.!.0");
                assert_eq!(limit, 2);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_to_value_normalizes_scalar_argument() {
        let expr = Expression::parse(&json!({"var": "a"})).unwrap();
        assert_eq!(expr.to_value(), json!({"var": ["a"]}));
        assert_eq!(Expression::parse(&expr.to_value()).unwrap(), expr);
    }
}
