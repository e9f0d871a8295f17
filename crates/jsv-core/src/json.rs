//! # JSON Value Model
//!
//! Classification and comparison helpers over `serde_json::Value`, the
//! decoded-JSON shape shared by raw schemas and instances.
//!
//! ## Integer Refinement
//!
//! `Integer` is not a separate runtime shape. A number is an integer when it
//! has no fractional part, so `3`, `3.0` and `-0.0` all match `"integer"`
//! while `3.14` does not. [`JsonType::of`] therefore never returns
//! [`JsonType::Integer`]; only [`JsonType::matches`] applies the refinement.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// The seven type names a schema's `type` keyword may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    Null,
    Boolean,
    Number,
    /// A number with no fractional part.
    Integer,
    String,
    Array,
    Object,
}

impl JsonType {
    /// Parse a `type` keyword name. Returns `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "null" => Some(Self::Null),
            "boolean" => Some(Self::Boolean),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "string" => Some(Self::String),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    /// The keyword spelling of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// The runtime shape of a value. Never returns `Integer`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Whether `value` is an instance of this type.
    ///
    /// `Number` accepts every number; `Integer` accepts whole numbers only.
    pub fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Integer, Value::Number(n)) => is_integer(n),
            (Self::Integer, _) => false,
            (ty, value) => ty == Self::of(value),
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A number as `f64`.
///
/// Without serde_json's `arbitrary_precision` feature every `Number` has an
/// `f64` view; the NaN fallback keeps the function total regardless.
pub fn number_value(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

/// Whether a number has no fractional part.
pub fn is_integer(n: &Number) -> bool {
    if n.is_i64() || n.is_u64() {
        return true;
    }
    let f = number_value(n);
    f.is_finite() && f.fract() == 0.0
}

/// String length in Unicode code points, not UTF-8 or UTF-16 units.
pub fn code_point_len(s: &str) -> usize {
    s.chars().count()
}

/// Deep equality with numeric comparison by value.
///
/// Objects are equal when they hold the same key set with pairwise-equal
/// values, independent of key order.
pub fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| json_equal(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, l)| y.get(key).is_some_and(|r| json_equal(l, r)))
        }
        _ => false,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    number_value(a) == number_value(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn parse_accepts_exactly_the_seven_names() {
        for name in ["null", "boolean", "number", "integer", "string", "array", "object"] {
            let ty = JsonType::parse(name).unwrap();
            assert_eq!(ty.as_str(), name);
        }
        assert_eq!(JsonType::parse("not-a-type"), None);
        assert_eq!(JsonType::parse("Integer"), None);
    }

    #[test]
    fn of_never_reports_integer() {
        assert_eq!(JsonType::of(&json!(3)), JsonType::Number);
        assert_eq!(JsonType::of(&json!(null)), JsonType::Null);
        assert_eq!(JsonType::of(&json!({})), JsonType::Object);
    }

    #[test]
    fn integer_refinement_accepts_whole_floats() {
        assert!(JsonType::Integer.matches(&json!(3)));
        assert!(JsonType::Integer.matches(&json!(3.0)));
        assert!(JsonType::Integer.matches(&json!(-0.0)));
        assert!(!JsonType::Integer.matches(&json!(3.14)));
        assert!(!JsonType::Integer.matches(&json!("3")));
        assert!(JsonType::Number.matches(&json!(3)));
        assert!(JsonType::Number.matches(&json!(3.14)));
    }

    #[test]
    fn code_points_not_storage_units() {
        assert_eq!(code_point_len("abc"), 3);
        // U+1F600 is four UTF-8 bytes and a UTF-16 surrogate pair.
        assert_eq!(code_point_len("\u{1F600}"), 1);
        assert_eq!(code_point_len("a\u{1F600}b"), 3);
        assert_eq!(code_point_len(""), 0);
    }

    #[test]
    fn equality_compares_numbers_by_value() {
        assert!(json_equal(&json!(1), &json!(1.0)));
        assert!(!json_equal(&json!(1), &json!(1.5)));
        assert!(json_equal(&json!([1, {"a": 2.0}]), &json!([1.0, {"a": 2}])));
        assert!(!json_equal(&json!(-1), &json!(u64::MAX)));
    }

    #[test]
    fn equality_ignores_key_order_but_not_keys() {
        assert!(json_equal(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1})));
        assert!(!json_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
        assert!(!json_equal(&json!({"a": 1}), &json!({"b": 1})));
    }

    #[test]
    fn equality_never_crosses_types() {
        assert!(!json_equal(&json!(0), &json!(false)));
        assert!(!json_equal(&json!(null), &json!(false)));
        assert!(!json_equal(&json!("1"), &json!(1)));
        assert!(!json_equal(&json!([]), &json!({})));
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            (-1.0e9f64..1.0e9).prop_map(|f| json!(f)),
            "[a-z\u{1F600}]{0,6}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,3}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        /// Every value equals itself.
        #[test]
        fn equality_is_reflexive(value in arb_json()) {
            prop_assert!(json_equal(&value, &value));
        }

        /// Equality is symmetric.
        #[test]
        fn equality_is_symmetric(a in arb_json(), b in arb_json()) {
            prop_assert_eq!(json_equal(&a, &b), json_equal(&b, &a));
        }
    }
}
