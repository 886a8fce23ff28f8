use crate::error::LogicError;
use crate::evaluate::Evaluator;
use crate::expression::Arg;
use crate::path::Path;
use serde_json::Value;

/// The data context `var`-style operators read from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Data<'a> {
    Value(&'a Value),
    /// Fails every read with `NullDataAccess`. Used for pure evaluation.
    Null,
}

impl<'a> Data<'a> {
    pub fn get(&self, path: &Path) -> Result<&'a Value, LogicError> {
        match self {
            Data::Value(value) => Ok(value),
            Data::Null => Err(LogicError::NullDataAccess { path: path.clone() }),
        }
    }
}

impl<'a> From<&'a Value> for Data<'a> {
    fn from(value: &'a Value) -> Self {
        Data::Value(value)
    }
}

/// The context passed to every operator eval function.
pub struct EvalCtx<'a> {
    /// The evaluator, for recursive evaluation and the log sink.
    pub evaluator: &'a Evaluator,
    /// Present only for operators registered with `pass_data`.
    pub data: Option<Data<'a>>,
    /// Location of the expression being evaluated.
    pub path: Path,
    /// The operator name, as registered.
    pub op: &'static str,
}

impl<'a> EvalCtx<'a> {
    /// Reads the data context.
    pub fn data(&self) -> Result<&'a Value, LogicError> {
        self.data_context()?.get(&self.path)
    }

    pub fn data_context(&self) -> Result<Data<'a>, LogicError> {
        self.data.ok_or_else(|| LogicError::DataUnavailable {
            path: self.path.clone(),
            op: self.op.to_string(),
        })
    }

    /// Location of argument `index` of this expression.
    pub fn arg_path(&self, index: usize) -> Path {
        self.path.append(self.op).append(index)
    }

    /// Evaluates argument `index` against this expression's data context.
    pub fn evaluate_arg(&self, args: &[Arg], index: usize) -> Result<Value, LogicError> {
        let data = self.data_context()?;
        self.evaluator.maybe_evaluate(&args[index], data, &self.arg_path(index))
    }

    /// Evaluates argument `index` against another data context, as the
    /// higher-order array operators do per element.
    pub fn evaluate_arg_with(
        &self,
        args: &[Arg],
        index: usize,
        data: Data<'_>,
    ) -> Result<Value, LogicError> {
        self.evaluator.maybe_evaluate(&args[index], data, &self.arg_path(index))
    }

    /// Hands a value to the evaluator's log sink.
    pub fn log(&self, value: &Value) {
        self.evaluator.log(value);
    }
}
