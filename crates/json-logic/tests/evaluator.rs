//! Evaluator configuration: custom registries, options and sharing.

use json_logic::{
    register_builtins, Arg, EvalCtx, EvalFn, Evaluator, EvaluatorOptions, LogicError,
    OperatorDefinition, OperatorRegistry, Shape, Signature,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::thread;

const ONE_INT: &[Signature] = &[Signature::new(&[Shape::Int])];
const ONE_ANY: &[Signature] = &[Signature::new(&[Shape::Any])];
const NO_ARGS: &[Signature] = &[Signature::new(&[])];

fn double_eval(args: &[Value], _ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    Ok(json!(args[0].as_i64().unwrap_or(0) * 2))
}

fn quote_eval(args: &[Arg], _ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    Ok(args[0].to_value())
}

fn peek_eval(_args: &[Value], ctx: &EvalCtx<'_>) -> Result<Value, LogicError> {
    Ok(ctx.data()?.clone())
}

fn custom_registry() -> Arc<OperatorRegistry> {
    let mut registry = OperatorRegistry::new();
    register_builtins(&mut registry).unwrap();
    registry
        .register_all([
            OperatorDefinition {
                name: "double",
                signatures: ONE_INT,
                eval_fn: EvalFn::Eager(double_eval),
                pass_data: false,
            },
            OperatorDefinition {
                name: "quote",
                signatures: ONE_ANY,
                eval_fn: EvalFn::Lazy(quote_eval),
                pass_data: false,
            },
            OperatorDefinition {
                name: "peek",
                signatures: NO_ARGS,
                eval_fn: EvalFn::Eager(peek_eval),
                pass_data: false,
            },
        ])
        .unwrap();
    Arc::new(registry)
}

#[test]
fn test_custom_operators_next_to_builtins() {
    let evaluator = Evaluator::with_registry(custom_registry());
    let data = json!({"n": 21});

    assert_eq!(evaluator.evaluate(&json!({"double": {"var": "n"}}), &data).unwrap(), json!(42));
    assert_eq!(
        evaluator.evaluate(&json!({"+": [1, {"double": 2}]}), &data).unwrap(),
        json!(5)
    );
    assert!(matches!(
        evaluator.evaluate(&json!({"double": "x"}), &data),
        Err(LogicError::ArgumentTypeMismatch { .. })
    ));
}

#[test]
fn test_lazy_custom_operator_sees_raw_slots() {
    let evaluator = Evaluator::with_registry(custom_registry());
    let result = evaluator.evaluate(&json!({"quote": [{"var": "a"}]}), &json!({"a": 1}));
    assert_eq!(result.unwrap(), json!({"var": ["a"]}));
}

#[test]
fn test_operator_without_data_access_cannot_read_data() {
    let evaluator = Evaluator::with_registry(custom_registry());
    match evaluator.evaluate(&json!({"if": [true, {"peek": []}]}), &json!({"a": 1})) {
        Err(LogicError::DataUnavailable { path, op }) => {
            assert_eq!(op, "peek");
            assert_eq!(path.to_string(), "$.if.1");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_builtin_registry_does_not_see_custom_operators() {
    let _ = custom_registry();
    assert!(matches!(
        Evaluator::new().evaluate(&json!({"double": 1}), &json!(null)),
        Err(LogicError::UnrecognizedOperator { .. })
    ));
}

#[test]
fn test_duplicate_custom_operator_is_rejected() {
    let mut registry = OperatorRegistry::new();
    register_builtins(&mut registry).unwrap();
    let shadow = OperatorDefinition {
        name: "var",
        signatures: ONE_ANY,
        eval_fn: EvalFn::Eager(double_eval),
        pass_data: false,
    };
    assert_eq!(
        registry.register(shadow),
        Err(LogicError::DuplicateOperator { op: "var".to_string() })
    );
}

#[test]
fn test_max_depth() {
    let evaluator = Evaluator::new().with_max_depth(2);
    assert_eq!(
        evaluator.evaluate(&json!({"!": {"!": true}}), &json!(null)).unwrap(),
        json!(true)
    );
    match evaluator.evaluate(&json!({"!": {"!": {"!": true}}}), &json!(null)) {
        Err(LogicError::DepthLimitExceeded { limit, .. }) => assert_eq!(limit, 2),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(Evaluator::new()
        .evaluate(&json!({"!": {"!": {"!": true}}}), &json!(null))
        .is_ok());
}

#[test]
fn test_options_round_trip() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let options = EvaluatorOptions {
        max_depth: Some(4),
        log_sink: Some(Arc::new(move |value: &Value| sink.lock().unwrap().push(value.clone()))),
    };
    let evaluator = Evaluator::new().with_options(options);
    assert_eq!(evaluator.options().max_depth, Some(4));
    assert!(format!("{:?}", evaluator.options()).contains("custom"));

    evaluator.evaluate(&json!({"log": "x"}), &json!(null)).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![json!("x")]);
    assert!(evaluator.registry().contains("log"));
}

#[test]
fn test_evaluator_is_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Evaluator>();

    let evaluator = Evaluator::new();
    let rule = json!({"*": [{"var": "n"}, {"var": "n"}]});
    let handles: Vec<_> = (0..4)
        .map(|n| {
            let evaluator = evaluator.clone();
            let rule = rule.clone();
            thread::spawn(move || evaluator.evaluate(&rule, &json!({"n": n})).unwrap())
        })
        .collect();
    let results: Vec<Value> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![json!(0), json!(1), json!(4), json!(9)]);
}

#[test]
fn test_evaluate_parsed_expression() {
    let evaluator = Evaluator::new();
    let expr = evaluator.parse(&json!({"cat": [{"var": "a"}, "!"]})).unwrap();
    let data = json!({"a": "hi"});
    assert_eq!(
        evaluator.evaluate_expression(&expr, (&data).into()).unwrap(),
        json!("hi!")
    );
}
