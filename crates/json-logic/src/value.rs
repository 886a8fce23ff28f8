//! Value helpers: type reporting, truthiness, numbers and equality.

use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

/// The JSON type of a value, with integers and floats kept apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    Null,
    Boolean,
    Int,
    Float,
    String,
    Array,
    Object,
}

impl JsonType {
    pub fn of(value: &Value) -> JsonType {
        match value {
            Value::Null => JsonType::Null,
            Value::Bool(_) => JsonType::Boolean,
            Value::Number(n) if n.is_f64() => JsonType::Float,
            Value::Number(_) => JsonType::Int,
            Value::String(_) => JsonType::String,
            Value::Array(_) => JsonType::Array,
            Value::Object(_) => JsonType::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JsonType::Null => "null",
            JsonType::Boolean => "boolean",
            JsonType::Int => "int",
            JsonType::Float => "float",
            JsonType::String => "string",
            JsonType::Array => "array",
            JsonType::Object => "object",
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON truthiness: `false`, `0`, `0.0`, `null`, `""`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => match Num::of(n) {
            Some(Num::Int(i)) => i != 0,
            Some(Num::Float(f)) => f != 0.0,
            None => true,
        },
        Value::String(s) => !s.is_empty(),
        Value::Array(arr) => !arr.is_empty(),
        Value::Object(obj) => !obj.is_empty(),
    }
}

// ------------------------------------------------------------------- Numbers

/// A numeric view of a JSON number.
///
/// `Int` spans every JSON integer, `i64::MIN` through `u64::MAX`, so signed
/// and unsigned integers compare and combine exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Num {
    Int(i128),
    Float(f64),
}

impl Num {
    pub fn of(n: &Number) -> Option<Num> {
        if let Some(i) = n.as_i64() {
            Some(Num::Int(i.into()))
        } else if let Some(u) = n.as_u64() {
            Some(Num::Int(u.into()))
        } else {
            n.as_f64().map(Num::Float)
        }
    }

    /// Numeric view of a value; booleans are not numbers.
    pub fn from_value(value: &Value) -> Option<Num> {
        match value {
            Value::Number(n) => Num::of(n),
            _ => None,
        }
    }

    /// Integer view of a value; floats and booleans give `None`.
    pub fn int(value: &Value) -> Option<i128> {
        match Num::from_value(value)? {
            Num::Int(i) => Some(i),
            Num::Float(_) => None,
        }
    }

    /// An integer result, degraded to float once it leaves the JSON integer range.
    pub fn from_i128(i: i128) -> Num {
        if (i128::from(i64::MIN)..=i128::from(u64::MAX)).contains(&i) {
            Num::Int(i)
        } else {
            Num::Float(i as f64)
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }

    /// Converts back to a JSON value; `None` for NaN and infinities.
    pub fn to_value(self) -> Option<Value> {
        match self {
            Num::Int(i) => match (i64::try_from(i), u64::try_from(i)) {
                (Ok(v), _) => Some(Value::Number(Number::from(v))),
                (_, Ok(v)) => Some(Value::Number(Number::from(v))),
                _ => Number::from_f64(i as f64).map(Value::Number),
            },
            Num::Float(f) => Number::from_f64(f).map(Value::Number),
        }
    }

    pub fn partial_cmp_num(self, other: Num) -> Option<Ordering> {
        match (self, other) {
            (Num::Int(a), Num::Int(b)) => Some(a.cmp(&b)),
            (Num::Int(a), Num::Float(b)) => cmp_int_float(a, b),
            (Num::Float(a), Num::Int(b)) => cmp_int_float(b, a).map(Ordering::reverse),
            (Num::Float(a), Num::Float(b)) => a.partial_cmp(&b),
        }
    }

    pub fn num_eq(self, other: Num) -> bool {
        self.partial_cmp_num(other) == Some(Ordering::Equal)
    }
}

/// Exact ordering of an integer against a float, without rounding the integer.
fn cmp_int_float(i: i128, f: f64) -> Option<Ordering> {
    const BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0; // 2^127
    if f.is_nan() {
        return None;
    }
    if f >= BOUND {
        return Some(Ordering::Less);
    }
    if f < -BOUND {
        return Some(Ordering::Greater);
    }
    let floor = f.floor();
    // in range and integral, so the cast is exact
    match i.cmp(&(floor as i128)) {
        Ordering::Equal if f > floor => Some(Ordering::Less),
        ord => Some(ord),
    }
}

fn int_literal_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^[+-]?\d+(?:_\d+)*$").expect("valid int literal regex"))
}

fn float_literal_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(
            r"(?i)^[+-]?(?:(?:\d+(?:_\d+)*)?\.?\d+(?:_\d+)*|\d+(?:_\d+)*\.)(?:e[+-]?\d+(?:_\d+)*)?$|^[+-]?(?:inf|infinity|nan)$",
        )
        .expect("valid float literal regex")
    })
}

/// Parses an integer literal: surrounding whitespace and `_` digit separators
/// are allowed, a fractional part is not.
pub fn parse_int_literal(s: &str) -> Option<i128> {
    let s = s.trim();
    if !int_literal_regex().is_match(s) {
        return None;
    }
    s.replace('_', "").parse::<i128>().ok()
}

/// Parses a decimal float literal (also `inf` and `nan` spellings).
pub fn parse_float_literal(s: &str) -> Option<f64> {
    let s = s.trim();
    if !float_literal_regex().is_match(s) {
        return None;
    }
    s.replace('_', "").parse::<f64>().ok()
}

// ------------------------------------------------------------------ Equality

/// Structural equality. Numbers compare by value across int and float, and a
/// boolean nested inside a container compares equal to the number 0 or 1.
pub fn native_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| native_eq(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, l)| y.get(k).is_some_and(|r| native_eq(l, r)))
        }
        _ => match (numeric_or_bool(a), numeric_or_bool(b)) {
            (Some(x), Some(y)) => x.num_eq(y),
            _ => false,
        },
    }
}

fn numeric_or_bool(value: &Value) -> Option<Num> {
    match value {
        Value::Bool(b) => Some(Num::Int(i128::from(*b))),
        other => Num::from_value(other),
    }
}

/// Loose equality, backing `==`.
///
/// - same type: [`native_eq`]
/// - int vs float: by value
/// - `null` only equals `null`
/// - boolean vs number: the boolean counts as 0 or 1; vs anything else: unequal
/// - string vs number: the string is read as a number of the other side's
///   kind; an unreadable string is unequal
pub fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, _) | (_, Value::Null) => left.is_null() && right.is_null(),
        (Value::Bool(_), Value::Number(_)) | (Value::Number(_), Value::Bool(_)) => {
            native_eq(left, right)
        }
        (Value::Bool(_), _) | (_, Value::Bool(_)) => native_eq(left, right),
        (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
            match Num::of(n) {
                Some(Num::Int(i)) => parse_int_literal(s) == Some(i),
                Some(Num::Float(f)) => parse_float_literal(s).is_some_and(|p| p == f),
                None => false,
            }
        }
        _ => native_eq(left, right),
    }
}

/// Strict equality, backing `===`: a boolean only ever equals a boolean and
/// there is no string/number coercion.
pub fn strict_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Bool(_), _) | (_, Value::Bool(_)) => false,
        _ => native_eq(left, right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_type() {
        assert_eq!(JsonType::of(&json!(1)), JsonType::Int);
        assert_eq!(JsonType::of(&json!(1.0)), JsonType::Float);
        assert_eq!(JsonType::of(&json!(true)), JsonType::Boolean);
        assert_eq!(JsonType::of(&json!({})).to_string(), "object");
    }

    #[test]
    fn test_truthiness() {
        for falsy in [json!(false), json!(0), json!(0.0), json!(null), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{} should be falsy", falsy);
        }
        for truthy in [json!(true), json!(-1), json!(0.5), json!("0"), json!([0]), json!({"a": null})] {
            assert!(is_truthy(&truthy), "{} should be truthy", truthy);
        }
    }

    #[test]
    fn test_literal_parsing() {
        assert_eq!(parse_int_literal(" 42 "), Some(42));
        assert_eq!(parse_int_literal("1_000"), Some(1000));
        assert_eq!(parse_int_literal("1.5"), None);
        assert_eq!(parse_float_literal("1.5"), Some(1.5));
        assert_eq!(parse_float_literal(".5"), Some(0.5));
        assert_eq!(parse_float_literal("3."), Some(3.0));
        assert_eq!(parse_float_literal("1e3"), Some(1000.0));
        assert_eq!(parse_float_literal("-inf"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_float_literal("abc"), None);
        assert_eq!(parse_float_literal(""), None);
    }

    #[test]
    fn test_native_eq_crosses_number_kinds() {
        assert!(native_eq(&json!([1, {"a": 2}]), &json!([1.0, {"a": 2.0}])));
        assert!(!native_eq(&json!([1]), &json!([1, 2])));
        assert!(!native_eq(&json!("1"), &json!(1)));
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        let max = Num::Int(u64::MAX.into());
        assert!(!max.num_eq(Num::Int(i128::from(u64::MAX) - 1)));
        assert_eq!(Num::of(&Number::from(u64::MAX)), Some(max));
        assert_eq!(max.to_value(), Some(json!(u64::MAX)));

        let big = Num::Int(9_007_199_254_740_993);
        assert_eq!(big.partial_cmp_num(Num::Float(9_007_199_254_740_992.0)), Some(Ordering::Greater));
        assert_eq!(Num::Int(2).partial_cmp_num(Num::Float(2.5)), Some(Ordering::Less));
        assert_eq!(Num::Int(-3).partial_cmp_num(Num::Float(-2.5)), Some(Ordering::Less));
        assert!(Num::Int(2).num_eq(Num::Float(2.0)));
        assert_eq!(Num::Int(1).partial_cmp_num(Num::Float(f64::INFINITY)), Some(Ordering::Less));
        assert_eq!(Num::Int(1).partial_cmp_num(Num::Float(f64::NAN)), None);
    }

    #[test]
    fn test_int_range_degrades_to_float() {
        assert_eq!(Num::from_i128(i128::from(u64::MAX) + 1), Num::Float(18_446_744_073_709_551_616.0));
        assert_eq!(Num::from_i128(-5), Num::Int(-5));
    }

    #[test]
    fn test_loose_and_strict_diverge() {
        assert!(loose_eq(&json!(1), &json!("1")));
        assert!(!strict_eq(&json!(1), &json!("1")));
        assert!(loose_eq(&json!(true), &json!(1)));
        assert!(!strict_eq(&json!(true), &json!(1)));
        assert!(!loose_eq(&json!(true), &json!("true")));
        assert!(!loose_eq(&json!(null), &json!(0)));
        assert!(loose_eq(&json!(null), &json!(null)));
    }
}
