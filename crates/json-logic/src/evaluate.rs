//! The evaluator: parsing, operator dispatch and recursive argument resolution.

use crate::error::LogicError;
use crate::eval_ctx::{Data, EvalCtx};
use crate::expression::{Arg, Expression};
use crate::path::Path;
use crate::registry::{builtin_registry, OperatorRegistry};
use crate::types::EvalFn;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{info, trace};

/// Receives every value passed through the `log` operator.
pub type LogSink = dyn Fn(&Value) + Send + Sync;

/// Options for [`Evaluator`].
#[derive(Clone, Default)]
pub struct EvaluatorOptions {
    /// Rejects expressions nested deeper than this while parsing.
    pub max_depth: Option<usize>,
    /// Replaces the default `log` sink, which emits a `tracing` event.
    pub log_sink: Option<Arc<LogSink>>,
}

impl fmt::Debug for EvaluatorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluatorOptions")
            .field("max_depth", &self.max_depth)
            .field("log_sink", &self.log_sink.as_ref().map(|_| "custom"))
            .finish()
    }
}

/// Evaluates JSONLogic expressions against a frozen operator registry.
///
/// ```
/// use json_logic::Evaluator;
/// use serde_json::json;
///
/// let evaluator = Evaluator::new();
/// let result = evaluator.evaluate(&json!({"+": [{"var": "a"}, 2]}), &json!({"a": 1}));
/// assert_eq!(result.unwrap(), json!(3));
/// ```
#[derive(Clone, Debug)]
pub struct Evaluator {
    registry: Arc<OperatorRegistry>,
    options: EvaluatorOptions,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new()
    }
}

impl Evaluator {
    /// An evaluator over the shared built-in registry.
    pub fn new() -> Self {
        Evaluator::with_registry(builtin_registry())
    }

    pub fn with_registry(registry: Arc<OperatorRegistry>) -> Self {
        Evaluator {
            registry,
            options: EvaluatorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EvaluatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_log_sink(mut self, sink: Arc<LogSink>) -> Self {
        self.options.log_sink = Some(sink);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = Some(max_depth);
        self
    }

    pub fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    pub fn options(&self) -> &EvaluatorOptions {
        &self.options
    }

    /// Parses a top-level expression, honoring `max_depth`.
    pub fn parse(&self, expr: &Value) -> Result<Expression, LogicError> {
        Expression::parse_with_limit(expr, self.options.max_depth)
    }

    /// Parses `expr` and evaluates it against `data`.
    pub fn evaluate(&self, expr: &Value, data: &Value) -> Result<Value, LogicError> {
        let expr = self.parse(expr)?;
        self.evaluate_expression(&expr, Data::Value(data))
    }

    /// Evaluates `expr` with no data context: any data read fails with
    /// [`LogicError::NullDataAccess`].
    pub fn evaluate_pure(&self, expr: &Value) -> Result<Value, LogicError> {
        let expr = self.parse(expr)?;
        self.evaluate_expression(&expr, Data::Null)
    }

    pub fn evaluate_expression(&self, expr: &Expression, data: Data<'_>) -> Result<Value, LogicError> {
        self.evaluate_at(expr, data, &Path::root())
    }

    /// Evaluates a sub-expression slot; literal slots are returned unchanged.
    pub fn maybe_evaluate(&self, arg: &Arg, data: Data<'_>, path: &Path) -> Result<Value, LogicError> {
        match arg {
            Arg::Expr(expr) => self.evaluate_at(expr, data, path),
            Arg::Literal(value) => Ok(value.clone()),
        }
    }

    /// Evaluates `expr` located at `path`.
    pub fn evaluate_at(&self, expr: &Expression, data: Data<'_>, path: &Path) -> Result<Value, LogicError> {
        let def = self
            .registry
            .get(&expr.op)
            .ok_or_else(|| LogicError::UnrecognizedOperator {
                path: path.clone(),
                op: expr.op.clone(),
            })?;
        trace!(op = def.name, path = %path, "evaluate");

        let ctx = EvalCtx {
            evaluator: self,
            data: def.pass_data.then_some(data),
            path: path.clone(),
            op: def.name,
        };
        match def.eval_fn {
            EvalFn::Eager(eval_fn) => {
                let args = expr
                    .args
                    .iter()
                    .enumerate()
                    .map(|(i, arg)| self.maybe_evaluate(arg, data, &ctx.arg_path(i)))
                    .collect::<Result<Vec<_>, _>>()?;
                def.type_check(&args, path)?;
                eval_fn(&args, &ctx)
            }
            EvalFn::Lazy(eval_fn) => {
                def.type_check_args(&expr.args, path)?;
                eval_fn(&expr.args, &ctx)
            }
        }
    }

    pub(crate) fn log(&self, value: &Value) {
        match &self.options.log_sink {
            Some(sink) => sink(value),
            None => info!(target: "json_logic::log", "{}", value),
        }
    }
}
