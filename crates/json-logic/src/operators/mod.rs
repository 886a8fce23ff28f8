//! Built-in operator definitions.

pub mod arithmetic;
pub mod array;
pub mod branching;
pub mod comparison;
pub mod debug;
pub mod input;
pub mod logical;
pub mod string;

use crate::types::OperatorDefinition;

/// All built-in operators, in registration order.
pub fn all_operators() -> Vec<OperatorDefinition> {
    let mut ops = Vec::new();
    ops.extend(input::operators());
    ops.extend(branching::operators());
    ops.extend(logical::operators());
    ops.extend(comparison::operators());
    ops.extend(arithmetic::operators());
    ops.extend(array::operators());
    ops.extend(string::operators());
    ops.extend(debug::operators());
    ops
}
