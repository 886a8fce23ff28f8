//! The operator table.

use crate::error::LogicError;
use crate::operators;
use crate::types::OperatorDefinition;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Map of operator name -> definition. Populated before evaluation starts and
/// read-only afterwards.
#[derive(Debug, Default)]
pub struct OperatorRegistry {
    operators: HashMap<&'static str, Arc<OperatorDefinition>>,
}

impl OperatorRegistry {
    pub fn new() -> Self {
        OperatorRegistry::default()
    }

    /// Registers `def`; a name can be registered only once.
    pub fn register(&mut self, def: OperatorDefinition) -> Result<(), LogicError> {
        if self.operators.contains_key(def.name) {
            return Err(LogicError::DuplicateOperator { op: def.name.to_string() });
        }
        self.operators.insert(def.name, Arc::new(def));
        Ok(())
    }

    pub fn register_all(
        &mut self,
        defs: impl IntoIterator<Item = OperatorDefinition>,
    ) -> Result<(), LogicError> {
        defs.into_iter().try_for_each(|def| self.register(def))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<OperatorDefinition>> {
        self.operators.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operators.contains_key(name)
    }

    /// Registered operator names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.operators.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

/// Registers every built-in operator into `registry`, family by family.
pub fn register_builtins(registry: &mut OperatorRegistry) -> Result<(), LogicError> {
    registry.register_all(operators::all_operators())?;
    debug!(count = registry.len(), "registered built-in operators");
    Ok(())
}

/// The process-wide built-in registry, built on first use.
pub fn builtin_registry() -> Arc<OperatorRegistry> {
    static BUILTINS: OnceLock<Arc<OperatorRegistry>> = OnceLock::new();
    BUILTINS
        .get_or_init(|| {
            let mut registry = OperatorRegistry::new();
            register_builtins(&mut registry).expect("built-in operator names are unique");
            Arc::new(registry)
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EvalFn, Signature};
    use serde_json::{json, Value};

    fn answer(_: &[Value], _: &crate::EvalCtx<'_>) -> Result<Value, LogicError> {
        Ok(json!(42))
    }

    const NO_ARGS: &[Signature] = &[Signature::new(&[])];

    fn answer_op(name: &'static str) -> OperatorDefinition {
        OperatorDefinition {
            name,
            signatures: NO_ARGS,
            eval_fn: EvalFn::Eager(answer),
            pass_data: false,
        }
    }

    #[test]
    fn test_builtins_register_cleanly() {
        let mut registry = OperatorRegistry::new();
        register_builtins(&mut registry).unwrap();
        for name in [
            "var", "missing", "missing_some", "if", "==", "===", "!=", "!==", "!", "!!", "and",
            "or", "<", "<=", ">", ">=", "max", "min", "+", "-", "*", "/", "%", "map", "filter",
            "reduce", "all", "none", "some", "merge", "in", "cat", "substr", "log",
        ] {
            assert!(registry.contains(name), "missing built-in {}", name);
        }
        assert_eq!(registry.len(), 34);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = OperatorRegistry::new();
        registry.register(answer_op("answer")).unwrap();
        assert_eq!(
            registry.register(answer_op("answer")),
            Err(LogicError::DuplicateOperator { op: "answer".to_string() })
        );
        assert!(register_builtins(&mut registry).is_ok());
        assert!(register_builtins(&mut registry).is_err());
    }

    #[test]
    fn test_shared_registry_is_built_once() {
        assert!(Arc::ptr_eq(&builtin_registry(), &builtin_registry()));
        assert!(builtin_registry().get("var").is_some_and(|def| def.pass_data));
        assert!(builtin_registry().get("nope").is_none());
    }
}
