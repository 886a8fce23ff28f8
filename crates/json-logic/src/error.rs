use crate::path::Path;
use crate::types::Shape;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LogicError {
    #[error("Invalid JSONLogic: {value}")]
    MalformedExpression { value: Value },

    #[error("{path}: unrecognized operator \"{op}\"")]
    UnrecognizedOperator { path: Path, op: String },

    #[error("{path}: \"{op}\" operator expects {expected} arguments, got {actual}")]
    ArgumentCountMismatch {
        path: Path,
        op: String,
        expected: String,
        actual: usize,
    },

    #[error("{path}: \"{op}\" argument {position} expected {expected}, got {actual}")]
    ArgumentTypeMismatch {
        path: Path,
        op: String,
        position: usize,
        expected: Shape,
        actual: Value,
    },

    #[error("{path}: no matching overload of \"{op}\" for arguments {}", Value::Array(.args.clone()))]
    NoMatchingOverload {
        path: Path,
        op: String,
        args: Vec<Value>,
    },

    #[error("{path}: data accessed during pure evaluation")]
    NullDataAccess { path: Path },

    #[error("{path}: \"{op}\" operator is not registered with data access")]
    DataUnavailable { path: Path, op: String },

    #[error("{path}: could not convert {value:?} to a number")]
    InvalidNumber { path: Path, value: String },

    #[error("{path}: DIVISION_BY_ZERO")]
    DivisionByZero { path: Path },

    #[error("{path}: arithmetic result is not a finite number")]
    NonFiniteNumber { path: Path },

    #[error("{path}: expression nesting exceeds the limit of {limit}")]
    DepthLimitExceeded { path: Path, limit: usize },

    #[error("Operator \"{op}\" is already registered")]
    DuplicateOperator { op: String },

    #[error("Invalid path {path:?}: paths start at \"$\"")]
    InvalidPath { path: String },
}

impl LogicError {
    /// The location inside the expression document the error was raised at.
    pub fn path(&self) -> Option<&Path> {
        match self {
            LogicError::UnrecognizedOperator { path, .. }
            | LogicError::ArgumentCountMismatch { path, .. }
            | LogicError::ArgumentTypeMismatch { path, .. }
            | LogicError::NoMatchingOverload { path, .. }
            | LogicError::NullDataAccess { path }
            | LogicError::DataUnavailable { path, .. }
            | LogicError::InvalidNumber { path, .. }
            | LogicError::DivisionByZero { path }
            | LogicError::NonFiniteNumber { path }
            | LogicError::DepthLimitExceeded { path, .. } => Some(path),
            LogicError::MalformedExpression { .. }
            | LogicError::DuplicateOperator { .. }
            | LogicError::InvalidPath { .. } => None,
        }
    }

    /// True for the argument-shape family of failures.
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            LogicError::ArgumentCountMismatch { .. }
                | LogicError::ArgumentTypeMismatch { .. }
                | LogicError::NoMatchingOverload { .. }
        )
    }
}
