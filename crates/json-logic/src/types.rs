use crate::error::LogicError;
use crate::eval_ctx::EvalCtx;
use crate::expression::Arg;
use crate::path::Path;
use crate::value::JsonType;
use serde_json::Value;
use std::fmt;

/// The shape an operator argument must have.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Any,
    Null,
    Bool,
    Int,
    Float,
    /// Int or float. Booleans are not numbers.
    Number,
    String,
    Array,
    ArrayOf(&'static Shape),
    Object,
    /// The slot must hold a sub-expression. Only lazy operators see slots.
    Expr,
    Union(&'static [Shape]),
}

impl Shape {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Shape::Any => true,
            Shape::Null => value.is_null(),
            Shape::Bool => value.is_boolean(),
            Shape::Int => JsonType::of(value) == JsonType::Int,
            Shape::Float => JsonType::of(value) == JsonType::Float,
            Shape::Number => value.is_number(),
            Shape::String => value.is_string(),
            Shape::Array => value.is_array(),
            Shape::ArrayOf(item) => value
                .as_array()
                .is_some_and(|arr| arr.iter().all(|v| item.matches(v))),
            Shape::Object => value.is_object(),
            Shape::Expr => false,
            Shape::Union(shapes) => shapes.iter().any(|s| s.matches(value)),
        }
    }

    /// Matches an unevaluated argument slot.
    pub fn matches_arg(&self, arg: &Arg) -> bool {
        match arg {
            Arg::Literal(value) => self.matches(value),
            Arg::Expr(_) => match self {
                Shape::Any | Shape::Expr => true,
                Shape::Union(shapes) => shapes.iter().any(|s| s.matches_arg(arg)),
                _ => false,
            },
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Any => f.write_str("any"),
            Shape::Null => f.write_str("null"),
            Shape::Bool => f.write_str("boolean"),
            Shape::Int => f.write_str("int"),
            Shape::Float => f.write_str("float"),
            Shape::Number => f.write_str("number"),
            Shape::String => f.write_str("string"),
            Shape::Array => f.write_str("array"),
            Shape::ArrayOf(item) => write!(f, "array<{}>", item),
            Shape::Object => f.write_str("object"),
            Shape::Expr => f.write_str("expression"),
            Shape::Union(shapes) => {
                for (i, shape) in shapes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{}", shape)?;
                }
                Ok(())
            }
        }
    }
}

/// One accepted argument layout of an operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signature {
    pub required: &'static [Shape],
    pub optional: &'static [Shape],
    /// Shape of every argument past `required` and `optional`; `None` forbids extras.
    pub rest: Option<Shape>,
}

impl Signature {
    pub const fn new(required: &'static [Shape]) -> Self {
        Signature { required, optional: &[], rest: None }
    }

    pub const fn optional(mut self, optional: &'static [Shape]) -> Self {
        self.optional = optional;
        self
    }

    pub const fn rest(mut self, rest: Shape) -> Self {
        self.rest = Some(rest);
        self
    }

    /// Human-readable argument count, e.g. `2`, `1 to 2`, `at least 1`.
    pub fn arity(&self) -> String {
        let min = self.required.len();
        let max = min + self.optional.len();
        match (self.rest, min == max) {
            (Some(_), _) => format!("at least {}", min),
            (None, true) => min.to_string(),
            (None, false) => format!("{} to {}", min, max),
        }
    }

    fn shape_at(&self, position: usize) -> Option<Shape> {
        let required = self.required.len();
        if position < required {
            Some(self.required[position])
        } else if position < required + self.optional.len() {
            Some(self.optional[position - required])
        } else {
            self.rest
        }
    }

    fn check_count(&self, count: usize) -> Result<(), Mismatch> {
        let min = self.required.len();
        let max = min + self.optional.len();
        if count < min || (self.rest.is_none() && count > max) {
            return Err(Mismatch::Arity { expected: self.arity(), actual: count });
        }
        Ok(())
    }

    /// Checks evaluated arguments.
    pub fn check(&self, args: &[Value]) -> Result<(), Mismatch> {
        self.check_count(args.len())?;
        for (position, value) in args.iter().enumerate() {
            if let Some(shape) = self.shape_at(position) {
                if !shape.matches(value) {
                    return Err(Mismatch::Type {
                        position,
                        expected: shape,
                        actual: value.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Checks raw argument slots.
    pub fn check_args(&self, args: &[Arg]) -> Result<(), Mismatch> {
        self.check_count(args.len())?;
        for (position, arg) in args.iter().enumerate() {
            if let Some(shape) = self.shape_at(position) {
                if !shape.matches_arg(arg) {
                    return Err(Mismatch::Type {
                        position,
                        expected: shape,
                        actual: arg.to_value(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Why an argument list failed a [`Signature`].
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch {
    Arity { expected: String, actual: usize },
    Type { position: usize, expected: Shape, actual: Value },
}

impl Mismatch {
    pub fn into_error(self, path: &Path, op: &str) -> LogicError {
        match self {
            Mismatch::Arity { expected, actual } => LogicError::ArgumentCountMismatch {
                path: path.clone(),
                op: op.to_string(),
                expected,
                actual,
            },
            Mismatch::Type { position, expected, actual } => LogicError::ArgumentTypeMismatch {
                path: path.clone(),
                op: op.to_string(),
                position,
                expected,
                actual,
            },
        }
    }
}

/// Operator receiving its arguments already evaluated.
pub type EagerFn = for<'a> fn(&[Value], &EvalCtx<'a>) -> Result<Value, LogicError>;

/// Operator receiving raw argument slots; it evaluates them itself, when and
/// if it needs to.
pub type LazyFn = for<'a> fn(&[Arg], &EvalCtx<'a>) -> Result<Value, LogicError>;

#[derive(Clone, Copy)]
pub enum EvalFn {
    Eager(EagerFn),
    Lazy(LazyFn),
}

impl fmt::Debug for EvalFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalFn::Eager(_) => f.write_str("Eager"),
            EvalFn::Lazy(_) => f.write_str("Lazy"),
        }
    }
}

/// A registered operator.
#[derive(Debug, Clone)]
pub struct OperatorDefinition {
    pub name: &'static str,
    /// Accepted layouts, tried in order. Empty skips checking.
    pub signatures: &'static [Signature],
    pub eval_fn: EvalFn,
    /// Whether the implementation may read the data context.
    pub pass_data: bool,
}

impl OperatorDefinition {
    pub fn evaluate_args(&self) -> bool {
        matches!(self.eval_fn, EvalFn::Eager(_))
    }

    /// Checks evaluated arguments against the declared signatures.
    pub fn type_check(&self, args: &[Value], path: &Path) -> Result<(), LogicError> {
        self.resolve(|sig| sig.check(args), || args.to_vec(), path)
    }

    /// Checks raw argument slots against the declared signatures.
    pub fn type_check_args(&self, args: &[Arg], path: &Path) -> Result<(), LogicError> {
        self.resolve(
            |sig| sig.check_args(args),
            || args.iter().map(Arg::to_value).collect(),
            path,
        )
    }

    fn resolve(
        &self,
        check: impl Fn(&Signature) -> Result<(), Mismatch>,
        values: impl FnOnce() -> Vec<Value>,
        path: &Path,
    ) -> Result<(), LogicError> {
        match self.signatures {
            [] => Ok(()),
            [single] => check(single).map_err(|m| m.into_error(path, self.name)),
            overloads => {
                if overloads.iter().any(|sig| check(sig).is_ok()) {
                    Ok(())
                } else {
                    Err(LogicError::NoMatchingOverload {
                        path: path.clone(),
                        op: self.name.to_string(),
                        args: values(),
                    })
                }
            }
        }
    }
}
