//! JSONLogic evaluator.
//!
//! # Overview
//!
//! A JSONLogic expression is a JSON object with a single key, the operator,
//! whose non-null value supplies the arguments: an array gives one argument
//! per element, anything else is the sole argument. Arguments that are
//! themselves JSONLogic are evaluated recursively; everything else is a
//! literal.
//!
//! Operators live in an [`OperatorRegistry`]. Each [`OperatorDefinition`]
//! declares the argument shapes it accepts, whether its arguments are
//! evaluated before the call ([`EvalFn::Eager`]) or handed over raw so it can
//! short-circuit ([`EvalFn::Lazy`]), and whether it may read the data context.
//!
//! # Example
//!
//! ```
//! use json_logic::{evaluate, evaluate_pure, LogicError};
//! use serde_json::json;
//!
//! let rule = json!({"if": [{"<": [{"var": "temp"}, 0]}, "freezing", "fine"]});
//! assert_eq!(evaluate(&rule, &json!({"temp": -5})).unwrap(), json!("freezing"));
//!
//! assert_eq!(evaluate_pure(&json!({"+": [1, 2]})).unwrap(), json!(3));
//! assert!(matches!(
//!     evaluate_pure(&json!({"var": "a"})),
//!     Err(LogicError::NullDataAccess { .. })
//! ));
//! ```

pub mod error;
pub mod eval_ctx;
pub mod evaluate;
pub mod expression;
pub mod operators;
pub mod path;
pub mod registry;
pub mod types;
pub mod value;

pub use error::LogicError;
pub use eval_ctx::{Data, EvalCtx};
pub use evaluate::{Evaluator, EvaluatorOptions, LogSink};
pub use expression::{is_json_logic, Arg, Expression};
pub use path::{Path, PathSegment};
pub use registry::{builtin_registry, register_builtins, OperatorRegistry};
pub use types::{EvalFn, Mismatch, OperatorDefinition, Shape, Signature};
pub use value::{is_truthy, loose_eq, strict_eq, JsonType};

use serde_json::Value;

/// Evaluates `expr` against `data` with the built-in operators.
pub fn evaluate(expr: &Value, data: &Value) -> Result<Value, LogicError> {
    Evaluator::new().evaluate(expr, data)
}

/// Evaluates `expr` with no data context; any data read fails with
/// [`LogicError::NullDataAccess`].
pub fn evaluate_pure(expr: &Value) -> Result<Value, LogicError> {
    Evaluator::new().evaluate_pure(expr)
}
